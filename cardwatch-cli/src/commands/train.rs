//! Train command - fit the fraud model from labelled data

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use cardwatch_core::services::import::read_table;
use cardwatch_core::services::{
    ClassMetrics, ClassificationReport, FraudClassifier, TrainOptions, TrainOutcome,
};

use super::get_context;
use crate::output;

#[derive(Serialize)]
struct TrainSummary<'a> {
    model: String,
    rows: usize,
    train_rows: usize,
    holdout_rows: usize,
    feature_columns: &'a [String],
    trees: usize,
    seed: u64,
    report: &'a ClassificationReport,
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    data: PathBuf,
    model: Option<PathBuf>,
    label: Option<String>,
    identifier: Option<String>,
    trees: usize,
    seed: u64,
    holdout: f64,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;

    let table = read_table(&data)
        .with_context(|| format!("Failed to read training data from {}", data.display()))?;

    let options = TrainOptions {
        label_column: label.unwrap_or_else(|| ctx.config.columns.label.clone()),
        identifier_column: identifier.unwrap_or_else(|| ctx.config.columns.identifier.clone()),
        trees,
        seed,
        holdout,
    };

    let progress = if json {
        None
    } else {
        let bar = ProgressBar::new(options.trees as u64);
        bar.set_style(ProgressStyle::with_template(
            "{bar:40.cyan/blue} {pos}/{len} trees",
        )?);
        Some(bar)
    };

    let outcome = FraudClassifier::train_with_progress(&table, &options, |done, _| {
        if let Some(bar) = &progress {
            bar.set_position(done as u64);
        }
    })?;
    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    let model_path = model.unwrap_or_else(|| ctx.model_path());
    outcome
        .classifier
        .save(&model_path)
        .with_context(|| format!("Failed to write model to {}", model_path.display()))?;

    if json {
        let summary = TrainSummary {
            model: model_path.display().to_string(),
            rows: table.len(),
            train_rows: outcome.train_rows,
            holdout_rows: outcome.holdout_rows,
            feature_columns: outcome.classifier.feature_columns(),
            trees: outcome.classifier.tree_count(),
            seed: outcome.classifier.seed(),
            report: &outcome.report,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    output::success("Model trained");
    println!(
        "  Rows: {} ({} train / {} hold-out)",
        table.len(),
        outcome.train_rows,
        outcome.holdout_rows
    );
    println!(
        "  Features: {}",
        outcome.classifier.feature_columns().join(", ")
    );
    println!(
        "  Trees: {} (seed {})",
        outcome.classifier.tree_count(),
        outcome.classifier.seed()
    );
    println!();

    println!("{}", "Hold-out Evaluation".bold());
    print_report(&outcome);

    output::success(&format!("Model written to {}", model_path.display()));
    Ok(())
}

fn print_report(outcome: &TrainOutcome) {
    let report = &outcome.report;

    let mut table = output::create_table();
    table.set_header(vec!["Class", "Precision", "Recall", "F1", "Support"]);
    for (label, metrics) in &report.classes {
        table.add_row(metric_row(&label.to_string(), metrics));
    }
    table.add_row(metric_row("macro avg", &report.macro_avg));
    table.add_row(metric_row("weighted avg", &report.weighted_avg));
    println!("{table}");
    println!(
        "  Accuracy: {:.2} on {} hold-out rows",
        report.accuracy, report.total
    );
    println!();
}

fn metric_row(label: &str, metrics: &ClassMetrics) -> Vec<String> {
    vec![
        label.to_string(),
        format!("{:.2}", metrics.precision),
        format!("{:.2}", metrics.recall),
        format!("{:.2}", metrics.f1),
        metrics.support.to_string(),
    ]
}
