//! Hold-out evaluation metrics
//!
//! Per-class precision/recall/F1 with support, plus accuracy and the
//! macro/weighted averages. Zero denominators score 0 rather than erroring.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::result::{Error, Result};

/// Metrics for a single class (or an average row)
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Full report over a labelled hold-out set
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationReport {
    /// Per-class rows, keyed by class label
    pub classes: BTreeMap<usize, ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
    pub total: usize,
}

/// Compare predictions against ground truth.
pub fn classification_report(truth: &[usize], predicted: &[usize]) -> Result<ClassificationReport> {
    if truth.len() != predicted.len() {
        return Err(Error::validation(format!(
            "{} labels against {} predictions",
            truth.len(),
            predicted.len()
        )));
    }

    let mut labels: Vec<usize> = truth.iter().chain(predicted.iter()).copied().collect();
    labels.sort_unstable();
    labels.dedup();

    let total = truth.len();
    let correct = truth
        .iter()
        .zip(predicted.iter())
        .filter(|(t, p)| t == p)
        .count();

    let mut classes = BTreeMap::new();
    for &label in &labels {
        let tp = truth
            .iter()
            .zip(predicted.iter())
            .filter(|(t, p)| **t == label && **p == label)
            .count();
        let predicted_as = predicted.iter().filter(|p| **p == label).count();
        let support = truth.iter().filter(|t| **t == label).count();

        let precision = ratio(tp, predicted_as);
        let recall = ratio(tp, support);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        classes.insert(
            label,
            ClassMetrics {
                precision,
                recall,
                f1,
                support,
            },
        );
    }

    let class_count = classes.len().max(1) as f64;
    let macro_avg = ClassMetrics {
        precision: classes.values().map(|m| m.precision).sum::<f64>() / class_count,
        recall: classes.values().map(|m| m.recall).sum::<f64>() / class_count,
        f1: classes.values().map(|m| m.f1).sum::<f64>() / class_count,
        support: total,
    };
    let weighted_avg = ClassMetrics {
        precision: weighted(&classes, total, |m| m.precision),
        recall: weighted(&classes, total, |m| m.recall),
        f1: weighted(&classes, total, |m| m.f1),
        support: total,
    };

    Ok(ClassificationReport {
        classes,
        accuracy: ratio(correct, total),
        macro_avg,
        weighted_avg,
        total,
    })
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn weighted<F>(classes: &BTreeMap<usize, ClassMetrics>, total: usize, field: F) -> f64
where
    F: Fn(&ClassMetrics) -> f64,
{
    if total == 0 {
        return 0.0;
    }
    classes
        .values()
        .map(|m| field(m) * m.support as f64)
        .sum::<f64>()
        / total as f64
}
