//! Upload analysis pipeline
//!
//! One entry point serves both analysis branches. A table that carries the
//! ground-truth label is reported as-is; a table without it goes through
//! the trained classifier first. Either way the rows end up annotated with
//! a fraud type and the flagged subset is ready to export.
//!
//! Prediction errors (schema mismatch, unparseable feature cells) surface
//! as `Err` so the caller can report them and keep the session alive.

use crate::config::ColumnConventions;
use crate::domain::result::Result;
use crate::domain::{FraudType, TransactionTable};
use crate::services::annotator::annotate_fraud_types;
use crate::services::classifier::FraudClassifier;

/// Derived column appended on the prediction branch.
pub const PREDICTION_COLUMN: &str = "Prediction";

/// Which signal produced the flags in an [`AnalysisReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisBranch {
    /// The upload carried the ground-truth label column
    GroundTruth,
    /// Flags came from the trained classifier
    Prediction,
}

/// Everything the caller needs to render one analyzed upload.
#[derive(Debug)]
pub struct AnalysisReport {
    pub branch: AnalysisBranch,
    /// Full upload with `fraud_type` (and `Prediction` on that branch)
    pub table: TransactionTable,
    /// Head of the table as it looked before the prediction pass
    pub preview: TransactionTable,
    /// Indices of flagged rows, in upload order
    pub flagged: Vec<usize>,
    /// Fraud types over the flagged rows, largest share first
    pub distribution: Vec<(FraudType, usize)>,
}

impl AnalysisReport {
    pub fn has_fraud(&self) -> bool {
        !self.flagged.is_empty()
    }

    /// The flagged rows with every column, for display and export.
    pub fn flagged_table(&self) -> TransactionTable {
        self.table.select_rows(&self.flagged)
    }

    /// Suggested file name for the export of the flagged subset.
    pub fn default_export_name(&self) -> &'static str {
        match self.branch {
            AnalysisBranch::GroundTruth => "frauds_detected.csv",
            AnalysisBranch::Prediction => "fraud_predictions.csv",
        }
    }
}

/// Runs uploads through annotation and, when needed, the classifier.
pub struct PipelineService {
    classifier: FraudClassifier,
    columns: ColumnConventions,
}

impl PipelineService {
    pub fn new(classifier: FraudClassifier, columns: ColumnConventions) -> Self {
        Self {
            classifier,
            columns,
        }
    }

    pub fn classifier(&self) -> &FraudClassifier {
        &self.classifier
    }

    /// Analyze one upload. `preview_rows` caps the preview snapshot taken
    /// right after the ground-truth annotation pass.
    pub fn analyze(
        &self,
        mut table: TransactionTable,
        preview_rows: usize,
    ) -> Result<AnalysisReport> {
        let truth_flags = table.binary_flags(&self.columns.label);

        // First pass uses the label column when present; without it every
        // row starts out unflagged, exactly what the preview shows.
        let initial_flags = truth_flags
            .clone()
            .unwrap_or_else(|| vec![false; table.len()]);
        let mut types = annotate_fraud_types(&mut table, &initial_flags, &self.columns)?;
        let preview = table.head(preview_rows);

        let (branch, flags) = match truth_flags {
            Some(flags) => {
                log::debug!(
                    "{} rows carry the '{}' label, skipping the model",
                    table.len(),
                    self.columns.label
                );
                (AnalysisBranch::GroundTruth, flags)
            }
            None => {
                log::debug!(
                    "no '{}' label in upload, predicting {} rows",
                    self.columns.label,
                    table.len()
                );
                let predictions = self.classifier.predict(&table)?;
                table.push_column(
                    PREDICTION_COLUMN,
                    predictions.iter().map(|p| p.to_string()).collect(),
                )?;
                let flags: Vec<bool> = predictions.iter().map(|&p| p == 1).collect();
                types = annotate_fraud_types(&mut table, &flags, &self.columns)?;
                (AnalysisBranch::Prediction, flags)
            }
        };

        let flagged: Vec<usize> = flags
            .iter()
            .enumerate()
            .filter_map(|(i, &f)| f.then_some(i))
            .collect();

        Ok(AnalysisReport {
            branch,
            distribution: distribution(&types),
            table,
            preview,
            flagged,
        })
    }
}

/// Count each fraud type, drop empty ones, largest first. Ties keep the
/// rule-precedence order.
fn distribution(types: &[FraudType]) -> Vec<(FraudType, usize)> {
    let mut counts: Vec<(FraudType, usize)> = FraudType::ALL
        .iter()
        .filter(|t| t.is_fraud())
        .map(|&t| (t, types.iter().filter(|x| **x == t).count()))
        .filter(|(_, n)| *n > 0)
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
