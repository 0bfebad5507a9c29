//! Document model and text analysis for kea.
//!
//! This crate is the text front-end of the pipeline:
//! - [`Analyzer`]: tokenization and stemming shared by documents and the ontology
//! - [`Document`]: the immutable, normalized representation of one text
//! - Corpus discovery and `.key` ground-truth answers
//! - [`Stopwords`] used to suppress trivial candidates

#![warn(missing_docs)]

mod analyzer;
mod corpus;
mod error;
mod stopwords;

use std::{
    fs,
    path::{Path, PathBuf},
};

pub use analyzer::{Analyzer, parse_language};
pub use corpus::{
    ANSWERS_EXTENSION, DOCUMENT_EXTENSION, answers_path, discover_documents, load_corpus,
    read_answers,
};
pub use error::DocumentError;
pub use stopwords::Stopwords;

/// One analyzed text.
///
/// `tokens` and `words` are parallel: `tokens[i]` is the stemmed form of the
/// lowercased surface word `words[i]`. Positions used throughout the pipeline
/// index into these vectors.
#[derive(Debug, Clone)]
pub struct Document {
    /// Identifier, unique within a corpus run.
    pub doc_id: usize,
    /// Where the text was loaded from.
    pub filepath: PathBuf,
    /// Normalized (lowercased, stemmed) tokens.
    tokens: Vec<String>,
    /// Lowercased surface words.
    words: Vec<String>,
    /// Original text.
    raw_text: String,
    /// Number of leading tokens that belong to the title line.
    title_len: usize,
}

impl Document {
    /// Analyzes `raw_text` into a document.
    ///
    /// The title is the first non-blank line of the text.
    pub fn new(
        doc_id: usize,
        filepath: impl Into<PathBuf>,
        raw_text: String,
        analyzer: &mut Analyzer,
    ) -> Self {
        let words = analyzer.words(&raw_text);
        let tokens = words.iter().map(|w| analyzer.stem(w)).collect();
        let title_len = raw_text
            .lines()
            .find(|line| !line.trim().is_empty())
            .map(|line| analyzer.words(line).len())
            .unwrap_or(0);

        Self {
            doc_id,
            filepath: filepath.into(),
            tokens,
            words,
            raw_text,
            title_len,
        }
    }

    /// Reads and analyzes a document from disk.
    pub fn from_file(
        doc_id: usize,
        path: &Path,
        analyzer: &mut Analyzer,
    ) -> Result<Self, DocumentError> {
        let raw_text = fs::read_to_string(path).map_err(|source| DocumentError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(doc_id, path, raw_text, analyzer))
    }

    /// Normalized tokens in document order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Lowercased surface words in document order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// The original text.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Number of tokens in the title line.
    pub fn title_len(&self) -> usize {
        self.title_len
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if the document has no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// File name without extension, used to pair the document with its answers.
    pub fn name(&self) -> &str {
        self.filepath
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }
}
