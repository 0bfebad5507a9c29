//! Controlled vocabulary for kea.
//!
//! An [`Ontology`] maps normalized surface forms (synonyms) to canonical
//! concepts and keeps an undirected concept graph used to measure topical
//! distance ("hops") between concepts. It is compiled from a JSON source with
//! the same [`Analyzer`] that normalizes documents, so synonym keys and
//! document tokens always agree.

#![warn(missing_docs)]

mod cache;
mod error;
mod source;

use std::collections::{BTreeSet, HashMap, VecDeque, hash_map::Entry};

use kea_document::Analyzer;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use cache::{CACHE_SUFFIX, CACHE_VERSION, cache_path, fingerprint, load_ontology};
pub use error::OntologyError;
pub use source::{RawConcept, RawOntology, parse_ontology_str, read_ontology_file};

/// Identifier of a concept, stable for one compiled ontology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConceptId(usize);

impl ConceptId {
    /// Position of the concept in the ontology's concept table.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One compiled concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    /// Canonical label, as written in the source.
    label: String,
    /// Normalized tokens of the canonical label.
    key: Vec<String>,
}

impl Concept {
    /// The canonical form of this concept.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Normalized tokens of the canonical label.
    pub fn key(&self) -> &[String] {
        &self.key
    }
}

/// Compiled ontology: synonym lookup plus concept graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ontology {
    /// Concept table, indexed by [`ConceptId`].
    concepts: Vec<Concept>,
    /// Normalized synonym key (tokens joined by a space) to concept.
    synonyms: HashMap<String, ConceptId>,
    /// Lowercased canonical label to concept.
    labels: HashMap<String, ConceptId>,
    /// Undirected adjacency lists, sorted and deduplicated.
    neighbors: Vec<Vec<ConceptId>>,
    /// Token length of the longest synonym.
    max_phrase_len: usize,
    /// Stemmer language the keys were normalized with.
    stemmer: String,
}

/// Joins normalized tokens into a lookup key.
fn join_key<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut key = String::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            key.push(' ');
        }
        key.push_str(token.as_ref());
    }
    key
}

impl Ontology {
    /// Compiles a raw ontology.
    ///
    /// Canonical labels are registered before synonyms, so a label always
    /// wins over another concept's synonym with the same key. Among
    /// synonyms the first concept in source order wins.
    pub fn build(raw: &RawOntology, analyzer: &mut Analyzer) -> Result<Self, OntologyError> {
        let mut concepts = Vec::with_capacity(raw.concepts.len());
        let mut labels = HashMap::with_capacity(raw.concepts.len());
        let mut synonyms = HashMap::new();

        for (i, rc) in raw.concepts.iter().enumerate() {
            let id = ConceptId(i);
            let lowered = rc.label.trim().to_lowercase();
            if labels.insert(lowered, id).is_some() {
                return Err(OntologyError::DuplicateLabel(rc.label.clone()));
            }

            let key = analyzer.normalize(&rc.label);
            if key.is_empty() {
                return Err(OntologyError::EmptyLabel(rc.label.clone()));
            }
            synonyms.entry(join_key(&key)).or_insert(id);
            concepts.push(Concept {
                label: rc.label.trim().to_string(),
                key,
            });
        }

        for (i, rc) in raw.concepts.iter().enumerate() {
            for synonym in &rc.synonyms {
                let tokens = analyzer.normalize(synonym);
                if tokens.is_empty() {
                    debug!(concept = %rc.label, synonym, "skipping synonym without words");
                    continue;
                }
                match synonyms.entry(join_key(&tokens)) {
                    Entry::Vacant(slot) => {
                        slot.insert(ConceptId(i));
                    }
                    Entry::Occupied(slot) if slot.get().0 != i => {
                        debug!(
                            concept = %rc.label,
                            synonym,
                            owner = %concepts[slot.get().0].label,
                            "synonym already claimed"
                        );
                    }
                    Entry::Occupied(_) => {}
                }
            }
        }

        let mut neighbors = vec![Vec::new(); concepts.len()];
        for (i, rc) in raw.concepts.iter().enumerate() {
            for target in rc.links() {
                let Some(&j) = labels.get(&target.trim().to_lowercase()) else {
                    return Err(OntologyError::UnknownConcept {
                        from: rc.label.clone(),
                        to: target.clone(),
                    });
                };
                if j.0 != i {
                    neighbors[i].push(j);
                    neighbors[j.0].push(ConceptId(i));
                }
            }
        }
        for adjacent in &mut neighbors {
            adjacent.sort_unstable();
            adjacent.dedup();
        }

        let max_phrase_len = synonyms
            .keys()
            .map(|k| k.split(' ').count())
            .max()
            .unwrap_or(0);

        debug!(
            concepts = concepts.len(),
            synonyms = synonyms.len(),
            max_phrase_len,
            "compiled ontology"
        );

        Ok(Self {
            concepts,
            synonyms,
            labels,
            neighbors,
            max_phrase_len,
            stemmer: analyzer.language_name().to_string(),
        })
    }

    /// Number of concepts.
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    /// Returns true if the ontology has no concepts.
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Token length of the longest synonym.
    pub fn max_phrase_len(&self) -> usize {
        self.max_phrase_len
    }

    /// Stemmer language used to compile the synonym keys.
    pub fn stemmer(&self) -> &str {
        &self.stemmer
    }

    /// Returns a concept by id.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this ontology.
    pub fn concept(&self, id: ConceptId) -> &Concept {
        &self.concepts[id.0]
    }

    /// The canonical form of a concept.
    pub fn canonical_form(&self, id: ConceptId) -> &str {
        &self.concepts[id.0].label
    }

    /// Iterates over all concepts with their ids.
    pub fn concepts(&self) -> impl Iterator<Item = (ConceptId, &Concept)> {
        self.concepts
            .iter()
            .enumerate()
            .map(|(i, c)| (ConceptId(i), c))
    }

    /// Looks up a sequence of normalized tokens.
    pub fn lookup<S: AsRef<str>>(&self, tokens: &[S]) -> Option<ConceptId> {
        if tokens.is_empty() || tokens.len() > self.max_phrase_len {
            return None;
        }
        self.synonyms.get(&join_key(tokens)).copied()
    }

    /// Resolves free text (typically a ground-truth answer) to a concept.
    ///
    /// An exact, case-insensitive canonical label match is tried first, then
    /// the normalized synonym lookup.
    pub fn resolve(&self, text: &str, analyzer: &mut Analyzer) -> Option<ConceptId> {
        if let Some(&id) = self.labels.get(&text.trim().to_lowercase()) {
            return Some(id);
        }
        self.lookup(&analyzer.normalize(text))
    }

    /// Concepts directly linked to `id`.
    pub fn neighbors(&self, id: ConceptId) -> &[ConceptId] {
        &self.neighbors[id.0]
    }

    /// Shortest-path distance between two concepts.
    ///
    /// The breadth-first search stops after `limit` levels; `None` means the
    /// target is unreachable within that bound.
    pub fn hops(&self, from: ConceptId, to: ConceptId, limit: usize) -> Option<usize> {
        if from == to {
            return Some(0);
        }

        let mut visited = vec![false; self.concepts.len()];
        let mut queue = VecDeque::new();
        visited[from.0] = true;
        queue.push_back((from, 0));

        while let Some((current, depth)) = queue.pop_front() {
            if depth == limit {
                continue;
            }
            for &next in &self.neighbors[current.0] {
                if next == to {
                    return Some(depth + 1);
                }
                if !visited[next.0] {
                    visited[next.0] = true;
                    queue.push_back((next, depth + 1));
                }
            }
        }
        None
    }

    /// Keeps only the answers this ontology can produce, mapped to their
    /// canonical forms.
    ///
    /// Answers that resolve to nothing could never be predicted and would
    /// only depress recall.
    pub fn retain_known(
        &self,
        answers: &BTreeSet<String>,
        analyzer: &mut Analyzer,
    ) -> BTreeSet<String> {
        answers
            .iter()
            .filter_map(|answer| {
                let resolved = self.resolve(answer, analyzer);
                if resolved.is_none() {
                    debug!(answer, "answer not in ontology");
                }
                resolved
            })
            .map(|id| self.canonical_form(id).to_string())
            .collect()
    }
}
