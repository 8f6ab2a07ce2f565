//! Status command - data directory, users and model summary

use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use cardwatch_core::services::FraudClassifier;
use cardwatch_core::Error;

use super::get_context;
use crate::output;

#[derive(Serialize)]
struct StatusSummary {
    data_dir: String,
    registered_users: usize,
    model: Option<ModelSummary>,
}

#[derive(Serialize)]
struct ModelSummary {
    file: String,
    feature_columns: Vec<String>,
    trees: usize,
    seed: u64,
    trained_at: DateTime<Utc>,
}

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let registered_users = ctx.auth_service.user_count()?;

    let model = match FraudClassifier::load(&ctx.model_path()) {
        Ok(classifier) => Some(ModelSummary {
            file: ctx.model_path().display().to_string(),
            feature_columns: classifier.feature_columns().to_vec(),
            trees: classifier.tree_count(),
            seed: classifier.seed(),
            trained_at: classifier.trained_at(),
        }),
        Err(Error::NotFound(_)) => None,
        Err(e) => return Err(e.into()),
    };

    if json {
        let summary = StatusSummary {
            data_dir: ctx.data_dir().display().to_string(),
            registered_users,
            model,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", "Cardwatch Status".bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec![
        "Data directory".to_string(),
        ctx.data_dir().display().to_string(),
    ]);
    table.add_row(vec![
        "Registered users".to_string(),
        registered_users.to_string(),
    ]);
    match &model {
        Some(model) => {
            table.add_row(vec!["Model file".to_string(), model.file.clone()]);
            table.add_row(vec![
                "Features".to_string(),
                model.feature_columns.join(", "),
            ]);
            table.add_row(vec![
                "Trees".to_string(),
                format!("{} (seed {})", model.trees, model.seed),
            ]);
            table.add_row(vec![
                "Trained at".to_string(),
                model.trained_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            ]);
        }
        None => {
            table.add_row(vec![
                "Model".to_string(),
                "not trained yet".to_string(),
            ]);
        }
    }
    println!("{table}");

    if model.is_none() {
        println!();
        output::warning("No trained model found. Run 'cw train <data.csv>' to create one.");
    }

    Ok(())
}
