//! Text analysis shared by documents and the ontology.
//!
//! Two tantivy pipelines back the [`Analyzer`]:
//! 1. Words: `SimpleTokenizer` → `LowerCaser` → `RemoveLongFilter` produce surface words
//! 2. Stems: `RawTokenizer` → `Stemmer` normalize one surface word
//!
//! Document tokens and ontology synonyms must go through the same analyzer, otherwise
//! candidate lookups and index joins stop matching without any error.

use tantivy::tokenizer::{
    Language, LowerCaser, RawTokenizer, RemoveLongFilter, SimpleTokenizer, Stemmer, TextAnalyzer,
    TokenStream,
};

use crate::DocumentError;

/// Maximum token length in bytes before filtering.
const MAX_TOKEN_LENGTH: usize = 40;

/// Parses a stemmer language string into a tantivy `Language`.
///
/// Supports lowercase language names matching tantivy's `Language` enum.
pub fn parse_language(name: &str) -> Result<Language, DocumentError> {
    match name.to_lowercase().as_str() {
        "arabic" => Ok(Language::Arabic),
        "danish" => Ok(Language::Danish),
        "dutch" => Ok(Language::Dutch),
        "english" => Ok(Language::English),
        "finnish" => Ok(Language::Finnish),
        "french" => Ok(Language::French),
        "german" => Ok(Language::German),
        "greek" => Ok(Language::Greek),
        "hungarian" => Ok(Language::Hungarian),
        "italian" => Ok(Language::Italian),
        "norwegian" => Ok(Language::Norwegian),
        "portuguese" => Ok(Language::Portuguese),
        "romanian" => Ok(Language::Romanian),
        "russian" => Ok(Language::Russian),
        "spanish" => Ok(Language::Spanish),
        "swedish" => Ok(Language::Swedish),
        "tamil" => Ok(Language::Tamil),
        "turkish" => Ok(Language::Turkish),
        other => Err(DocumentError::InvalidLanguage(other.to_string())),
    }
}

/// Tokenizer and normalizer for document text and ontology terms.
#[derive(Clone)]
pub struct Analyzer {
    /// Splits text into lowercased surface words.
    words: TextAnalyzer,
    /// Stems a single surface word.
    stemmer: TextAnalyzer,
    /// Name of the stemmer language, lowercased.
    language_name: String,
}

impl Analyzer {
    /// Builds an analyzer for the named stemmer language.
    pub fn from_name(language_name: &str) -> Result<Self, DocumentError> {
        let language = parse_language(language_name)?;
        Ok(Self {
            words: TextAnalyzer::builder(SimpleTokenizer::default())
                .filter(LowerCaser)
                .filter(RemoveLongFilter::limit(MAX_TOKEN_LENGTH))
                .build(),
            stemmer: TextAnalyzer::builder(RawTokenizer::default())
                .filter(Stemmer::new(language))
                .build(),
            language_name: language_name.to_lowercase(),
        })
    }

    /// Returns the stemmer language name this analyzer was built with.
    pub fn language_name(&self) -> &str {
        &self.language_name
    }

    /// Splits text into lowercased surface words, in order.
    pub fn words(&mut self, text: &str) -> Vec<String> {
        let mut stream = self.words.token_stream(text);
        let mut words = Vec::new();
        while let Some(token) = stream.next() {
            words.push(token.text.clone());
        }
        words
    }

    /// Stems one lowercased surface word.
    pub fn stem(&mut self, word: &str) -> String {
        let mut stream = self.stemmer.token_stream(word);
        match stream.next() {
            Some(token) => token.text.clone(),
            None => word.to_string(),
        }
    }

    /// Normalizes free text into its sequence of stemmed tokens.
    pub fn normalize(&mut self, text: &str) -> Vec<String> {
        self.words(text).iter().map(|w| self.stem(w)).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_case_insensitive() {
        assert_eq!(parse_language("English").unwrap(), Language::English);
        assert_eq!(parse_language("FRENCH").unwrap(), Language::French);
        assert_eq!(parse_language("GeRmAn").unwrap(), Language::German);
    }

    #[test]
    fn parse_invalid_language() {
        let err = parse_language("klingon").unwrap_err();
        assert!(err.to_string().contains("klingon"));
    }

    #[test]
    fn words_lowercase_and_split_punctuation() {
        let mut analyzer = Analyzer::from_name("english").unwrap();
        assert_eq!(
            analyzer.words("Dark-Matter, HALOS!"),
            vec!["dark", "matter", "halos"]
        );
    }

    #[test]
    fn words_drop_long_tokens() {
        let mut analyzer = Analyzer::from_name("english").unwrap();
        let long_token = "a".repeat(50);
        let text = format!("short {long_token} word");
        assert_eq!(analyzer.words(&text), vec!["short", "word"]);
    }

    #[test]
    fn stem_english() {
        let mut analyzer = Analyzer::from_name("english").unwrap();
        assert_eq!(analyzer.stem("handling"), "handl");
        assert_eq!(analyzer.stem("running"), "run");
    }

    #[test]
    fn normalize_matches_plural_and_singular() {
        let mut analyzer = Analyzer::from_name("english").unwrap();
        assert_eq!(
            analyzer.normalize("Neutrino oscillations"),
            analyzer.normalize("neutrino oscillation")
        );
    }

    #[test]
    fn from_invalid_name() {
        let err = match Analyzer::from_name("invalid") {
            Err(e) => e,
            Ok(_) => panic!("expected error"),
        };
        assert!(err.to_string().contains("invalid"));
    }

    #[test]
    fn language_name_is_lowercased() {
        let analyzer = Analyzer::from_name("English").unwrap();
        assert_eq!(analyzer.language_name(), "english");
    }
}
