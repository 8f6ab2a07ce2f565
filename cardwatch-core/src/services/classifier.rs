//! Fraud classifier - bagged decision-tree ensemble
//!
//! Training takes any table with numeric feature columns and a 0/1 label
//! column, holds out a seeded random slice for evaluation, and fits one
//! Gini decision tree per bootstrap sample. Inference selects the trained
//! feature columns from the upload by name, so column order in the file
//! does not matter; a missing column is a schema mismatch, not a panic.
//!
//! Everything downstream of the seed is deterministic: the same data and
//! options always produce the same trees, the same hold-out report and the
//! same predictions.

use std::path::Path;

use chrono::{DateTime, Utc};
use linfa::prelude::Predict;
use linfa::traits::Fit;
use linfa::Dataset;
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, Axis};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};
use crate::domain::{parse_numeric, TransactionTable};
use crate::services::evaluation::{classification_report, ClassificationReport};

/// Spreads consecutive tree indices into unrelated RNG streams.
const SEED_STREAM_MULTIPLIER: u64 = 0x9e37_79b9_7f4a_7c15;

/// Training knobs. The defaults match the shipped model.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    /// Ground-truth column, excluded from features
    pub label_column: String,
    /// Row-identifier column, excluded from features
    pub identifier_column: String,
    /// Number of bootstrap trees in the ensemble
    pub trees: usize,
    /// Master seed for the split and every bootstrap draw
    pub seed: u64,
    /// Fraction of rows held out for evaluation
    pub holdout: f64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            label_column: "IsFraud".to_string(),
            identifier_column: "TransactionID".to_string(),
            trees: 100,
            seed: 42,
            holdout: 0.2,
        }
    }
}

/// A trained ensemble plus its hold-out report
#[derive(Debug)]
pub struct TrainOutcome {
    pub classifier: FraudClassifier,
    pub report: ClassificationReport,
    pub train_rows: usize,
    pub holdout_rows: usize,
}

/// Serializable trained model artifact
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudClassifier {
    feature_columns: Vec<String>,
    trees: Vec<DecisionTree<f64, usize>>,
    seed: u64,
    trained_at: DateTime<Utc>,
}

impl FraudClassifier {
    /// Train an ensemble on a labelled table.
    pub fn train(table: &TransactionTable, options: &TrainOptions) -> Result<TrainOutcome> {
        Self::train_with_progress(table, options, |_, _| {})
    }

    /// Train, reporting `(trees_done, trees_total)` after each tree.
    pub fn train_with_progress<F>(
        table: &TransactionTable,
        options: &TrainOptions,
        mut on_tree: F,
    ) -> Result<TrainOutcome>
    where
        F: FnMut(usize, usize),
    {
        if options.trees == 0 {
            return Err(Error::validation("ensemble needs at least one tree"));
        }
        if !(options.holdout > 0.0 && options.holdout < 1.0) {
            return Err(Error::validation(format!(
                "hold-out fraction must be between 0 and 1, got {}",
                options.holdout
            )));
        }
        if table.len() < 2 {
            return Err(Error::validation(format!(
                "training needs at least 2 rows, got {}",
                table.len()
            )));
        }

        let labels = read_labels(table, &options.label_column)?;
        let features = feature_columns(table, options);
        if features.is_empty() {
            return Err(Error::validation(
                "no numeric feature columns besides the label and identifier",
            ));
        }
        let matrix = table.feature_matrix(&features)?;

        // Seeded shuffle, then the tail becomes the hold-out slice. At least
        // one row stays on each side regardless of the fraction.
        let rows = table.len();
        let mut indices: Vec<usize> = (0..rows).collect();
        let mut rng = Pcg64Mcg::seed_from_u64(options.seed);
        indices.shuffle(&mut rng);

        let holdout_rows = ((rows as f64 * options.holdout).ceil() as usize).clamp(1, rows - 1);
        let (train_idx, holdout_idx) = indices.split_at(rows - holdout_rows);
        log::info!(
            "training {} trees on {} rows ({} held out, features: {})",
            options.trees,
            train_idx.len(),
            holdout_rows,
            features.join(", ")
        );

        let x_train = matrix.select(Axis(0), train_idx);
        let y_train: Vec<usize> = train_idx.iter().map(|&i| labels[i]).collect();

        let mut trees = Vec::with_capacity(options.trees);
        for tree_index in 0..options.trees {
            let stream = options.seed ^ (tree_index as u64).wrapping_mul(SEED_STREAM_MULTIPLIER);
            let mut tree_rng = Pcg64Mcg::seed_from_u64(stream);

            let boot: Vec<usize> = (0..x_train.nrows())
                .map(|_| tree_rng.gen_range(0..x_train.nrows()))
                .collect();
            let x_boot = x_train.select(Axis(0), &boot);
            let y_boot: Array1<usize> = boot.iter().map(|&i| y_train[i]).collect();

            let tree = DecisionTree::params()
                .split_quality(SplitQuality::Gini)
                .fit(&Dataset::new(x_boot, y_boot))
                .map_err(|e| Error::model(e.to_string()))?;
            trees.push(tree);
            on_tree(tree_index + 1, options.trees);
        }

        let classifier = FraudClassifier {
            feature_columns: features,
            trees,
            seed: options.seed,
            trained_at: Utc::now(),
        };

        let x_holdout = matrix.select(Axis(0), holdout_idx);
        let predicted = classifier.vote(&x_holdout);
        let truth: Vec<usize> = holdout_idx.iter().map(|&i| labels[i]).collect();
        let report = classification_report(&truth, &predicted)?;
        log::info!(
            "hold-out accuracy {:.3} over {} rows",
            report.accuracy,
            holdout_rows
        );

        Ok(TrainOutcome {
            classifier,
            report,
            train_rows: train_idx.len(),
            holdout_rows,
        })
    }

    /// Predict a 0/1 label per row, selecting feature columns by name.
    pub fn predict(&self, table: &TransactionTable) -> Result<Vec<usize>> {
        let matrix = table.feature_matrix(&self.feature_columns)?;
        if matrix.nrows() == 0 {
            return Ok(Vec::new());
        }
        Ok(self.vote(&matrix))
    }

    /// Majority vote across the ensemble; exact ties fall to the
    /// not-fraud side.
    fn vote(&self, matrix: &ndarray::Array2<f64>) -> Vec<usize> {
        let mut fraud_votes = vec![0usize; matrix.nrows()];
        for tree in &self.trees {
            let votes = tree.predict(matrix);
            for (count, vote) in fraud_votes.iter_mut().zip(votes.iter()) {
                if *vote == 1 {
                    *count += 1;
                }
            }
        }
        fraud_votes
            .into_iter()
            .map(|count| usize::from(count * 2 > self.trees.len()))
            .collect()
    }

    /// Write the artifact as JSON, going through a temp file so a crash
    /// cannot truncate an existing model.
    pub fn save(&self, path: &Path) -> Result<()> {
        use std::io::Write;

        let dir = path
            .parent()
            .ok_or_else(|| Error::store(format!("{} has no parent directory", path.display())))?;
        std::fs::create_dir_all(dir)?;

        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        temp.write_all(serde_json::to_string(self)?.as_bytes())?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    /// Load an artifact. A missing file is `Error::NotFound` so callers can
    /// tell "never trained" apart from a broken file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::not_found(format!(
                "model file {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }
}

/// Labels must be exactly 0 or 1.
fn read_labels(table: &TransactionTable, column: &str) -> Result<Vec<usize>> {
    let idx = table
        .column_index(column)
        .ok_or_else(|| Error::validation(format!("label column '{column}' not found")))?;

    let mut labels = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let cell = &table.row(row)[idx];
        match parse_numeric(cell) {
            Some(v) if v == 0.0 => labels.push(0),
            Some(v) if v == 1.0 => labels.push(1),
            _ => {
                return Err(Error::validation(format!(
                    "label column '{column}' must be 0 or 1 (row {} has '{cell}')",
                    row + 1
                )))
            }
        }
    }
    Ok(labels)
}

/// Numeric columns minus the label and the row identifier, in header order.
fn feature_columns(table: &TransactionTable, options: &TrainOptions) -> Vec<String> {
    table
        .numeric_columns()
        .into_iter()
        .filter(|c| *c != options.label_column && *c != options.identifier_column)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// 60 rows, cleanly separable on amount: everything above 100 is fraud.
    fn separable_table() -> TransactionTable {
        let headers = vec![
            "TransactionID".to_string(),
            "amount".to_string(),
            "IsFraud".to_string(),
        ];
        let mut rows = Vec::new();
        for i in 0..30 {
            rows.push(vec![
                (i + 1).to_string(),
                format!("{}", 5 + i),
                "0".to_string(),
            ]);
        }
        for i in 0..30 {
            rows.push(vec![
                (i + 31).to_string(),
                format!("{}", 200 + 7 * i),
                "1".to_string(),
            ]);
        }
        TransactionTable::new(headers, rows).unwrap()
    }

    fn quick_options() -> TrainOptions {
        TrainOptions {
            trees: 9,
            ..TrainOptions::default()
        }
    }

    #[test]
    fn test_train_excludes_label_and_identifier() {
        let outcome = FraudClassifier::train(&separable_table(), &quick_options()).unwrap();
        assert_eq!(outcome.classifier.feature_columns(), &["amount"]);
        assert_eq!(outcome.classifier.tree_count(), 9);
        assert_eq!(outcome.holdout_rows, 12);
        assert_eq!(outcome.train_rows, 48);
    }

    #[test]
    fn test_separable_data_is_learned() {
        let table = separable_table();
        let outcome = FraudClassifier::train(&table, &quick_options()).unwrap();
        assert!(outcome.report.accuracy > 0.99);

        let predicted = outcome.classifier.predict(&table).unwrap();
        let expected: Vec<usize> = (0..60).map(|i| usize::from(i >= 30)).collect();
        assert_eq!(predicted, expected);
    }

    #[test]
    fn test_training_is_deterministic() {
        let table = separable_table();
        let first = FraudClassifier::train(&table, &quick_options()).unwrap();
        let second = FraudClassifier::train(&table, &quick_options()).unwrap();

        assert_eq!(
            first.classifier.predict(&table).unwrap(),
            second.classifier.predict(&table).unwrap()
        );
        assert_eq!(first.report.accuracy, second.report.accuracy);
    }

    #[test]
    fn test_progress_callback_counts_trees() {
        let mut seen = Vec::new();
        FraudClassifier::train_with_progress(&separable_table(), &quick_options(), |done, total| {
            seen.push((done, total))
        })
        .unwrap();
        assert_eq!(seen.len(), 9);
        assert_eq!(seen.first(), Some(&(1, 9)));
        assert_eq!(seen.last(), Some(&(9, 9)));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fraud_model.json");
        let table = separable_table();

        let outcome = FraudClassifier::train(&table, &quick_options()).unwrap();
        outcome.classifier.save(&path).unwrap();

        let loaded = FraudClassifier::load(&path).unwrap();
        assert_eq!(loaded.feature_columns(), outcome.classifier.feature_columns());
        assert_eq!(loaded.seed(), 42);
        assert_eq!(
            loaded.predict(&table).unwrap(),
            outcome.classifier.predict(&table).unwrap()
        );
    }

    #[test]
    fn test_missing_model_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = FraudClassifier::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_predict_rejects_missing_feature_columns() {
        let outcome = FraudClassifier::train(&separable_table(), &quick_options()).unwrap();

        let upload = TransactionTable::new(
            vec!["TransactionID".to_string(), "total".to_string()],
            vec![vec!["1".to_string(), "250".to_string()]],
        )
        .unwrap();
        let err = outcome.classifier.predict(&upload).unwrap_err();
        match err {
            Error::SchemaMismatch(missing) => assert_eq!(missing, vec!["amount"]),
            other => panic!("expected schema mismatch, got {other}"),
        }
    }

    #[test]
    fn test_predict_on_header_only_table_is_empty() {
        let outcome = FraudClassifier::train(&separable_table(), &quick_options()).unwrap();
        let empty = TransactionTable::new(vec!["amount".to_string()], Vec::new()).unwrap();
        assert!(outcome.classifier.predict(&empty).unwrap().is_empty());
    }

    #[test]
    fn test_bad_labels_are_rejected() {
        let table = TransactionTable::new(
            vec!["amount".to_string(), "IsFraud".to_string()],
            vec![
                vec!["10".to_string(), "0".to_string()],
                vec!["20".to_string(), "2".to_string()],
            ],
        )
        .unwrap();
        let err = FraudClassifier::train(&table, &TrainOptions::default()).unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn test_two_rows_still_split() {
        let table = TransactionTable::new(
            vec!["amount".to_string(), "IsFraud".to_string()],
            vec![
                vec!["10".to_string(), "0".to_string()],
                vec!["900".to_string(), "1".to_string()],
            ],
        )
        .unwrap();
        let outcome = FraudClassifier::train(&table, &quick_options()).unwrap();
        assert_eq!(outcome.train_rows, 1);
        assert_eq!(outcome.holdout_rows, 1);
    }
}
