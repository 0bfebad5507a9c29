//! Compiled ontology cache.
//!
//! Compiling an ontology normalizes every label and synonym, which is the
//! slowest part of start-up for large vocabularies. The compiled form is
//! stored next to the source as `<source>.kea-cache.json` together with a
//! fingerprint of everything that affects compilation:
//! - Cache format version (internal, bumped when [`Ontology`] changes shape)
//! - Stemmer language
//! - Source file contents
//!
//! A stale or unreadable cache is silently rebuilt.

use std::{
    ffi::OsString,
    fs,
    hash::{Hash, Hasher},
    path::{Path, PathBuf},
};

use kea_document::Analyzer;
use serde::{Deserialize, Serialize};
use siphasher::sip::SipHasher24;
use tracing::{debug, info, warn};

use crate::{Ontology, OntologyError, read_ontology_file};

/// Current cache format version. Bump this when [`Ontology`] fields change.
pub const CACHE_VERSION: u32 = 1;

/// Suffix appended to the ontology file name to locate its cache.
pub const CACHE_SUFFIX: &str = ".kea-cache.json";

/// On-disk cache record.
#[derive(Serialize, Deserialize)]
struct CachedOntology {
    /// Format version of this record.
    version: u32,
    /// Fingerprint of the inputs the ontology was compiled from.
    fingerprint: String,
    /// The compiled ontology.
    ontology: Ontology,
}

/// Returns the cache file that belongs to an ontology source.
pub fn cache_path(source: &Path) -> PathBuf {
    let mut name = source
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("ontology"));
    name.push(CACHE_SUFFIX);
    source.with_file_name(name)
}

/// Computes the cache fingerprint for a source under a stemmer language.
pub fn fingerprint(stemmer: &str, contents: &str) -> String {
    let mut hasher = SipHasher24::new();
    CACHE_VERSION.hash(&mut hasher);
    stemmer.hash(&mut hasher);
    contents.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// Loads an ontology, reusing the compiled cache when it is current.
///
/// With `recreate` set the cache is ignored and rewritten. Failing to write
/// the cache is logged and does not fail the load.
pub fn load_ontology(
    path: &Path,
    analyzer: &Analyzer,
    recreate: bool,
) -> Result<Ontology, OntologyError> {
    let (raw, contents) = read_ontology_file(path)?;
    let expected = fingerprint(analyzer.language_name(), &contents);
    let cache = cache_path(path);

    if !recreate && let Some(ontology) = read_cache(&cache, &expected) {
        debug!(path = %cache.display(), concepts = ontology.len(), "loaded cached ontology");
        return Ok(ontology);
    }

    let mut analyzer = analyzer.clone();
    let ontology = Ontology::build(&raw, &mut analyzer)?;
    info!(
        path = %path.display(),
        concepts = ontology.len(),
        recreate,
        "compiled ontology"
    );
    write_cache(&cache, &expected, &ontology);
    Ok(ontology)
}

/// Reads a cache file, returning `None` if it is missing, corrupt or stale.
fn read_cache(path: &Path, expected: &str) -> Option<Ontology> {
    let contents = fs::read_to_string(path).ok()?;
    let cached: CachedOntology = match serde_json::from_str(&contents) {
        Ok(c) => c,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "ignoring unreadable ontology cache");
            return None;
        }
    };
    if cached.version != CACHE_VERSION || cached.fingerprint != expected {
        debug!(path = %path.display(), "ontology cache is stale");
        return None;
    }
    Some(cached.ontology)
}

/// Writes a cache file, logging failures.
fn write_cache(path: &Path, fingerprint: &str, ontology: &Ontology) {
    let record = CachedOntology {
        version: CACHE_VERSION,
        fingerprint: fingerprint.to_string(),
        ontology: ontology.clone(),
    };
    let result = serde_json::to_string(&record)
        .map_err(|e| e.to_string())
        .and_then(|json| fs::write(path, json).map_err(|e| e.to_string()));
    if let Err(error) = result {
        warn!(path = %path.display(), %error, "failed to write ontology cache");
    }
}

#[cfg(test)]
mod test {
    use tempfile::TempDir;

    use super::*;
    use crate::{
        RawConcept, RawOntology,
        test_support::{analyzer, physics_raw},
    };

    fn write_source(dir: &Path) -> PathBuf {
        let path = dir.join("physics.json");
        fs::write(&path, serde_json::to_string(&physics_raw()).unwrap()).unwrap();
        path
    }

    #[test]
    fn cache_path_appends_suffix() {
        assert_eq!(
            cache_path(Path::new("/data/physics.json")),
            PathBuf::from("/data/physics.json.kea-cache.json")
        );
    }

    #[test]
    fn fingerprint_depends_on_stemmer_and_contents() {
        let base = fingerprint("english", "{}");
        assert_eq!(base, fingerprint("english", "{}"));
        assert_ne!(base, fingerprint("german", "{}"));
        assert_ne!(base, fingerprint("english", "{ }"));
    }

    #[test]
    fn load_writes_cache() {
        let temp = TempDir::new().unwrap();
        let source = write_source(temp.path());

        let ontology = load_ontology(&source, &analyzer(), false).unwrap();
        assert_eq!(ontology.len(), physics_raw().concepts.len());
        assert!(cache_path(&source).exists());
    }

    #[test]
    fn load_reuses_current_cache() {
        let temp = TempDir::new().unwrap();
        let source = write_source(temp.path());
        load_ontology(&source, &analyzer(), false).unwrap();

        // A cache with the right fingerprint wins even if its payload differs
        // from what the source would compile to.
        let contents = fs::read_to_string(&source).unwrap();
        let tiny = Ontology::build(
            &RawOntology::new(vec![RawConcept::new("only")]),
            &mut analyzer(),
        )
        .unwrap();
        write_cache(
            &cache_path(&source),
            &fingerprint("english", &contents),
            &tiny,
        );

        let loaded = load_ontology(&source, &analyzer(), false).unwrap();
        assert_eq!(loaded.len(), 1);

        let rebuilt = load_ontology(&source, &analyzer(), true).unwrap();
        assert_eq!(rebuilt.len(), physics_raw().concepts.len());
    }

    #[test]
    fn load_rebuilds_stale_cache() {
        let temp = TempDir::new().unwrap();
        let source = write_source(temp.path());
        fs::write(cache_path(&source), "not json").unwrap();

        let ontology = load_ontology(&source, &analyzer(), false).unwrap();
        assert_eq!(ontology.len(), physics_raw().concepts.len());

        let cached = fs::read_to_string(cache_path(&source)).unwrap();
        assert!(cached.contains(&fingerprint("english", &fs::read_to_string(&source).unwrap())));
    }

    #[test]
    fn load_missing_source_errors() {
        let err = load_ontology(Path::new("/nonexistent/o.json"), &analyzer(), false).unwrap_err();
        assert!(matches!(err, OntologyError::ReadFile { .. }));
    }
}
