//! Configuration template for `kea init`.

use toml::Value;

use crate::ProjectLayout;

/// Default configuration template (valid TOML).
const LOCAL_TEMPLATE: &str = include_str!("../templates/config.toml");

/// Returns the configuration template as a commented-out example.
pub fn local_template() -> String {
    comment_template(LOCAL_TEMPLATE)
}

/// Returns the template with an active `[paths]` section for the project
/// files `kea init` found, ahead of the commented-out defaults.
pub fn project_template(layout: &ProjectLayout) -> String {
    let mut template = String::new();
    if !layout.is_empty() {
        template.push_str("# Project files found by `kea init`.\n[paths]\n");
        for (key, value) in layout.entries() {
            let quoted = Value::String(value.to_string());
            template.push_str(&format!("{key} = {quoted}\n"));
        }
        template.push('\n');
    }
    template.push_str(&local_template());
    template
}

/// Converts a valid TOML template into a commented-out example config.
///
/// Lines that are already comments are preserved as-is. Non-comment, non-empty
/// lines get a "# " prefix. Empty lines are preserved.
fn comment_template(template: &str) -> String {
    let mut result = String::with_capacity(template.len() + template.lines().count() * 2);
    for line in template.lines() {
        if !line.is_empty() && !line.starts_with('#') {
            result.push_str("# ");
        }
        result.push_str(line);
        result.push('\n');
    }
    result
}
