//! Train, test and extract drivers.
//!
//! Each driver runs the per-document stages (index, candidates, features) in
//! parallel with rayon and merges the results in document order before the
//! single batched model call.

use std::{
    collections::{BTreeSet, HashMap},
    path::Path,
    slice,
    time::{Duration, Instant},
};

use kea_document::{Document, load_corpus, read_answers};
use kea_features::{FEATURE_COLUMNS, KeywordCandidate, add_ground_truth};
use kea_index::InvertedIndex;
use kea_model::{FeatureMatrix, IdfTable, LearningModel, ModelError, TrainParams};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::{Context, Evaluation, PipelineError, evaluate, predicted_keywords};

/// Summary of a training run.
#[derive(Debug, Clone, Default)]
pub struct TrainReport {
    /// Documents in the training corpus.
    pub documents: usize,
    /// Feature rows the classifier was fitted on.
    pub rows: usize,
    /// Rows labeled as keywords.
    pub positives: usize,
    /// Synthetic candidates injected from ground truth.
    pub augmented: usize,
    /// Wall time of candidate generation.
    pub candidate_time: Duration,
    /// Wall time of feature extraction.
    pub feature_time: Duration,
    /// Wall time of scaling and classifier fitting.
    pub fit_time: Duration,
}

/// Summary of a test run.
#[derive(Debug, Clone, Default)]
pub struct TestReport {
    /// Scores against the ground truth.
    pub evaluation: Evaluation,
    /// Documents in the test corpus.
    pub documents: usize,
    /// Candidate rows scored.
    pub rows: usize,
    /// Wall time of candidate generation and feature extraction.
    pub feature_time: Duration,
    /// Wall time of the batched prediction.
    pub predict_time: Duration,
}

/// One candidate of an extracted document with its model output.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    /// Canonical form.
    pub canonical: String,
    /// Whether the model predicted it as a keyword.
    pub predicted: bool,
    /// Positive-class probability.
    pub probability: f64,
    /// Whether it is among the document's known answers.
    pub expected: bool,
    /// Raw feature values, in [`FEATURE_COLUMNS`] order.
    pub features: Vec<f64>,
}

/// Result of extracting keywords from one document.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Predicted keywords, sorted.
    pub keywords: BTreeSet<String>,
    /// Every candidate, in generation order.
    pub candidates: Vec<ScoredCandidate>,
    /// Ground-truth answers the ontology knows, if an answers file exists.
    pub answers: BTreeSet<String>,
}

/// Per-document output of the parallel stages.
struct DocumentRows {
    /// Candidates, one per matrix row.
    candidates: Vec<KeywordCandidate>,
    /// Feature rows.
    matrix: FeatureMatrix,
    /// Known ground-truth answers, as canonical forms.
    answers: BTreeSet<String>,
}

/// Reads a document's answers and maps them onto canonical forms.
fn known_answers(ctx: &Context, document: &Document) -> Result<BTreeSet<String>, PipelineError> {
    let answers = read_answers(&document.filepath)?;
    let mut analyzer = ctx.analyzer().clone();
    Ok(ctx.ontology().retain_known(&answers, &mut analyzer))
}

/// Loads a corpus, failing if it holds no documents.
fn load_documents(ctx: &Context, corpus: &Path) -> Result<Vec<Document>, PipelineError> {
    let documents = load_corpus(corpus, ctx.analyzer())?;
    if documents.is_empty() {
        return Err(PipelineError::EmptyCorpus {
            path: corpus.to_path_buf(),
        });
    }
    info!(path = %corpus.display(), documents = documents.len(), "loaded corpus");
    Ok(documents)
}

/// Concatenates per-document matrices in order.
fn merge(parts: impl IntoIterator<Item = FeatureMatrix>) -> Result<FeatureMatrix, ModelError> {
    let mut merged = FeatureMatrix::new(FEATURE_COLUMNS);
    for part in parts {
        merged.append(part)?;
    }
    Ok(merged)
}

/// Trains a model on every document of `corpus`.
///
/// Idf is fitted over the generated candidates of all documents before any
/// ground-truth augmentation, then frozen in the returned model.
pub fn train(
    ctx: &Context,
    corpus: &Path,
    params: TrainParams,
) -> Result<(LearningModel, TrainReport), PipelineError> {
    let documents = load_documents(ctx, corpus)?;
    let mut report = TrainReport {
        documents: documents.len(),
        ..TrainReport::default()
    };

    let start = Instant::now();
    let generator = ctx.generator();
    let mut generated: Vec<(Vec<KeywordCandidate>, BTreeSet<String>)> = documents
        .par_iter()
        .map(|doc| known_answers(ctx, doc).map(|answers| (generator.generate(doc), answers)))
        .collect::<Result<_, _>>()?;

    let idf = IdfTable::fit(
        generated
            .iter()
            .map(|(candidates, _)| candidates.iter().map(KeywordCandidate::canonical_form)),
    );

    report.augmented = generated
        .par_iter_mut()
        .map_init(
            || ctx.analyzer().clone(),
            |analyzer, (candidates, answers)| {
                add_ground_truth(candidates, answers, ctx.ontology(), analyzer)
            },
        )
        .sum();
    report.candidate_time = start.elapsed();

    let start = Instant::now();
    let extractor = ctx.extractor(&idf);
    let parts: Vec<(FeatureMatrix, Vec<u8>)> = documents
        .par_iter()
        .zip(generated.par_iter())
        .map(|(doc, (candidates, answers))| {
            let index = InvertedIndex::build(doc);
            let matrix = extractor.extract(doc, &index, candidates);
            let labels = candidates
                .iter()
                .map(|c| u8::from(answers.contains(c.canonical_form())))
                .collect();
            (matrix, labels)
        })
        .collect();

    let mut labels = Vec::new();
    let mut matrices = Vec::with_capacity(parts.len());
    for (matrix, y) in parts {
        labels.extend(y);
        matrices.push(matrix);
    }
    let x = merge(matrices)?;
    report.feature_time = start.elapsed();
    report.rows = x.n_rows();
    report.positives = labels.iter().filter(|&&l| l == 1).count();
    info!(
        rows = report.rows,
        positives = report.positives,
        augmented = report.augmented,
        "built training matrix"
    );

    let start = Instant::now();
    let mut model = LearningModel::new(idf, params);
    let scaled = model.fit_and_scale(&x)?;
    model.fit_classifier(&scaled, &labels)?;
    report.fit_time = start.elapsed();

    Ok((model, report))
}

/// Runs the per-document stages for inference.
fn score_documents(
    ctx: &Context,
    model: &LearningModel,
    documents: &[Document],
) -> Result<Vec<DocumentRows>, PipelineError> {
    let generator = ctx.generator();
    let extractor = ctx.extractor(model.idf());
    documents
        .par_iter()
        .map(|doc| -> Result<DocumentRows, PipelineError> {
            let index = InvertedIndex::build(doc);
            let candidates = generator.generate(doc);
            let matrix = extractor.extract(doc, &index, &candidates);
            let answers = known_answers(ctx, doc)?;
            debug!(doc_id = doc.doc_id, rows = matrix.n_rows(), "scored document");
            Ok(DocumentRows {
                candidates,
                matrix,
                answers,
            })
        })
        .collect()
}

/// Evaluates a trained model on every document of `corpus`.
///
/// Answers the ontology cannot resolve are dropped before scoring.
pub fn test(ctx: &Context, model: &LearningModel, corpus: &Path) -> Result<TestReport, PipelineError> {
    let documents = load_documents(ctx, corpus)?;

    let start = Instant::now();
    let scored = score_documents(ctx, model, &documents)?;
    let feature_time = start.elapsed();

    let mut keywords = Vec::new();
    let mut answers = HashMap::new();
    let mut matrices = Vec::with_capacity(scored.len());
    for (doc, rows) in documents.iter().zip(scored) {
        keywords.extend(
            rows.candidates
                .iter()
                .map(|c| (doc.doc_id, c.canonical_form().to_string())),
        );
        answers.insert(doc.doc_id, rows.answers);
        matrices.push(rows.matrix);
    }
    let x = merge(matrices)?;

    let start = Instant::now();
    let predictions = model.scale_and_predict(&x)?;
    let predict_time = start.elapsed();

    let evaluation = evaluate(&predictions, &keywords, &answers);
    info!(
        precision = evaluation.precision,
        recall = evaluation.recall,
        f1 = evaluation.f1,
        accuracy = evaluation.accuracy,
        "evaluated corpus"
    );

    Ok(TestReport {
        evaluation,
        documents: documents.len(),
        rows: x.n_rows(),
        feature_time,
        predict_time,
    })
}

/// Extracts keywords from a single document.
pub fn extract(ctx: &Context, model: &LearningModel, path: &Path) -> Result<Extraction, PipelineError> {
    let mut analyzer = ctx.analyzer().clone();
    let document = Document::from_file(0, path, &mut analyzer)?;
    let rows = score_documents(ctx, model, slice::from_ref(&document))?
        .pop()
        .unwrap_or(DocumentRows {
            candidates: Vec::new(),
            matrix: FeatureMatrix::new(FEATURE_COLUMNS),
            answers: BTreeSet::new(),
        });

    let predictions = model.scale_and_predict(&rows.matrix)?;
    let probabilities = model.scale_and_score(&rows.matrix)?;
    let keywords = predicted_keywords(&rows.candidates, &predictions);
    debug!(
        path = %path.display(),
        candidates = rows.candidates.len(),
        keywords = keywords.len(),
        "extracted keywords"
    );

    let candidates = rows
        .candidates
        .iter()
        .zip(rows.matrix.rows())
        .zip(predictions.iter().zip(&probabilities))
        .map(|((candidate, features), (&bit, &probability))| ScoredCandidate {
            canonical: candidate.canonical_form().to_string(),
            predicted: bit == 1,
            probability,
            expected: rows.answers.contains(candidate.canonical_form()),
            features: features.clone(),
        })
        .collect();

    Ok(Extraction {
        keywords,
        candidates,
        answers: rows.answers,
    })
}

#[cfg(test)]
mod test {
    use std::fs;

    use kea_document::Analyzer;
    use kea_features::{FeatureSettings, GeneratorSettings};
    use kea_ontology::{Ontology, RawConcept, RawOntology};
    use tempfile::TempDir;

    use super::*;

    fn context() -> Context {
        let mut analyzer = Analyzer::from_name("english").unwrap();
        let ontology = Ontology::build(
            &RawOntology::new(vec![
                RawConcept::new("Higgs boson").broader("boson"),
                RawConcept::new("boson"),
                RawConcept::new("dark matter").related("cosmology"),
                RawConcept::new("cosmology"),
                RawConcept::new("detector"),
                RawConcept::new("neutrino"),
            ]),
            &mut analyzer,
        )
        .unwrap();
        Context::new(
            ontology,
            analyzer,
            GeneratorSettings::default(),
            FeatureSettings::default(),
        )
    }

    fn write_doc(dir: &Path, name: &str, text: &str, answers: &str) {
        fs::write(dir.join(format!("{name}.txt")), text).unwrap();
        fs::write(dir.join(format!("{name}.key")), answers).unwrap();
    }

    fn corpus() -> TempDir {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        write_doc(
            dir,
            "a",
            "Higgs boson discovery\nThe Higgs boson was seen by the detector. The Higgs boson decays.",
            "Higgs boson\n",
        );
        write_doc(
            dir,
            "b",
            "Dark matter in cosmology\nDark matter shapes cosmology. A detector looked for dark matter.",
            "dark matter\ncosmology\n",
        );
        write_doc(
            dir,
            "c",
            "Neutrino detector design\nThe neutrino detector was calibrated. Each neutrino was counted.",
            "neutrino\nstring theory\n",
        );
        temp
    }

    #[test]
    fn train_reports_rows_and_labels() {
        let ctx = context();
        let temp = corpus();
        let (model, report) = train(&ctx, temp.path(), TrainParams::default()).unwrap();

        assert_eq!(report.documents, 3);
        assert_eq!(report.augmented, 0);
        assert_eq!(report.positives, 4);
        assert!(report.rows >= report.positives);
        assert!(model.is_fitted());
        assert_eq!(model.idf().documents(), 3);
        assert_eq!(model.idf().document_frequency("detector"), 3);
    }

    #[test]
    fn train_injects_missing_answers() {
        let ctx = context();
        let temp = TempDir::new().unwrap();
        write_doc(temp.path(), "a", "The Higgs boson decays", "Higgs boson\ndark matter\n");
        write_doc(temp.path(), "b", "A detector", "detector\n");

        let (model, report) = train(&ctx, temp.path(), TrainParams::default()).unwrap();
        assert_eq!(report.augmented, 1);
        assert_eq!(report.rows, 3);
        assert_eq!(report.positives, 3);
        // Synthetic candidates do not count towards idf.
        assert_eq!(model.idf().document_frequency("dark matter"), 0);
    }

    #[test]
    fn train_fails_when_gradient_descent_diverges() {
        let ctx = context();
        let temp = corpus();
        let params = TrainParams {
            learning_rate: 1e300,
            epochs: 5,
            ..TrainParams::default()
        };
        let err = train(&ctx, temp.path(), params).unwrap_err();
        assert!(matches!(err, PipelineError::Model(ModelError::Diverged { .. })), "{err}");
    }

    #[test]
    fn train_empty_corpus_errors() {
        let ctx = context();
        let temp = TempDir::new().unwrap();
        let err = train(&ctx, temp.path(), TrainParams::default()).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyCorpus { .. }));
    }

    #[test]
    fn test_scores_training_corpus() {
        let ctx = context();
        let temp = corpus();
        let (model, _) = train(&ctx, temp.path(), TrainParams::default()).unwrap();
        let report = test(&ctx, &model, temp.path()).unwrap();

        assert_eq!(report.documents, 3);
        let e = report.evaluation;
        for value in [e.precision, e.recall, e.f1, e.accuracy] {
            assert!((0.0..=1.0).contains(&value));
        }
        assert!(e.recall > 0.0);
    }

    #[test]
    fn extract_matches_model_predictions() {
        let ctx = context();
        let temp = corpus();
        let (model, _) = train(&ctx, temp.path(), TrainParams::default()).unwrap();

        let path = temp.path().join("a.txt");
        let extraction = extract(&ctx, &model, &path).unwrap();
        let predicted: BTreeSet<String> = extraction
            .candidates
            .iter()
            .filter(|c| c.predicted)
            .map(|c| c.canonical.clone())
            .collect();
        assert_eq!(extraction.keywords, predicted);
        assert_eq!(
            extraction.answers,
            BTreeSet::from(["Higgs boson".to_string()])
        );
        for c in &extraction.candidates {
            assert_eq!(c.features.len(), FEATURE_COLUMNS.len());
            assert_eq!(c.predicted, c.probability >= model.params().threshold);
        }
    }

    #[test]
    fn extract_empty_document() {
        let ctx = context();
        let temp = corpus();
        let (model, _) = train(&ctx, temp.path(), TrainParams::default()).unwrap();

        let empty = temp.path().join("empty.txt");
        fs::write(&empty, "").unwrap();
        let extraction = extract(&ctx, &model, &empty).unwrap();
        assert!(extraction.keywords.is_empty());
        assert!(extraction.candidates.is_empty());
    }
}
