//! Corpus discovery and ground-truth answers.
//!
//! A corpus is a directory of plain-text documents (`*.txt`). The expected
//! keywords for a document live next to it in a file with the same stem and a
//! `.key` extension, one canonical keyword per line.

use std::{
    collections::BTreeSet,
    ffi::OsStr,
    fs, io,
    path::{Path, PathBuf},
};

use tracing::warn;
use walkdir::WalkDir;

use crate::{Analyzer, Document, DocumentError};

/// Extension of document files.
pub const DOCUMENT_EXTENSION: &str = "txt";

/// Extension of ground-truth answer files.
pub const ANSWERS_EXTENSION: &str = "key";

/// Discovers all document files below `dir`, sorted by path.
///
/// Hidden files and directories are skipped, as are symlinks. Sorting makes
/// document ids stable across runs.
pub fn discover_documents(dir: &Path) -> Result<Vec<PathBuf>, DocumentError> {
    if !dir.is_dir() {
        return Err(DocumentError::CorpusNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "skipping unreadable corpus entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension() == Some(OsStr::new(DOCUMENT_EXTENSION)) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// Loads every document of a corpus, assigning ids in sorted path order.
pub fn load_corpus(dir: &Path, analyzer: &Analyzer) -> Result<Vec<Document>, DocumentError> {
    let mut analyzer = analyzer.clone();
    discover_documents(dir)?
        .into_iter()
        .enumerate()
        .map(|(doc_id, path)| Document::from_file(doc_id, &path, &mut analyzer))
        .collect()
}

/// Returns the answers file that belongs to a document.
pub fn answers_path(document_path: &Path) -> PathBuf {
    document_path.with_extension(ANSWERS_EXTENSION)
}

/// Reads the ground-truth keywords for a document.
///
/// A missing answers file yields an empty set. Lines are trimmed; blank lines
/// are ignored and duplicates collapse.
pub fn read_answers(document_path: &Path) -> Result<BTreeSet<String>, DocumentError> {
    let path = answers_path(document_path);
    let contents = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
        Err(source) => return Err(DocumentError::ReadFile { path, source }),
    };

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Checks if a filename represents a hidden file (starts with '.').
fn is_hidden(name: &OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}
