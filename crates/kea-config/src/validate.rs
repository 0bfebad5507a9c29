//! Configuration validation.
//!
//! Range checks for numeric settings. Merging applies them to each file so the
//! error can name it; [`validate_config`] applies them again to the effective
//! settings once command-line overrides are in.

use crate::{Config, ConfigError};

/// Checks a gradient descent step size.
pub fn check_learning_rate(value: f64) -> Result<(), &'static str> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err("must be a positive finite number")
    }
}

/// Checks an L2 penalty.
pub fn check_l2(value: f64) -> Result<(), &'static str> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err("must be a finite number, zero or greater")
    }
}

/// Checks a decision threshold. Both ends are allowed: 0 selects every
/// candidate and 1 only certain ones.
pub fn check_threshold(value: f64) -> Result<(), &'static str> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err("must lie between 0 and 1")
    }
}

/// Checks the longest candidate n-gram.
pub fn check_max_ngram(value: usize) -> Result<(), &'static str> {
    if value >= 1 {
        Ok(())
    } else {
        Err("must be at least 1")
    }
}

/// Checks the effective settings, reporting the first value out of range.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let checks = [
        ("analysis.max_ngram", check_max_ngram(config.analysis.max_ngram)),
        ("model.learning_rate", check_learning_rate(config.model.learning_rate)),
        ("model.l2", check_l2(config.model.l2)),
        ("model.threshold", check_threshold(config.model.threshold)),
    ];
    for (key, result) in checks {
        if let Err(reason) = result {
            return Err(ConfigError::InvalidSetting { key, reason });
        }
    }
    Ok(())
}
