//! Dashboard command - interactive fraud-detection session
//!
//! Walks the welcome -> sign-in -> upload loop. The trained model is loaded
//! once, right after the welcome gate; analysis failures are reported and
//! the session keeps going.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::{Confirm, Input, Password, Select};

use cardwatch_core::services::import::{read_table, write_table};
use cardwatch_core::services::{AnalysisBranch, PipelineService, Session};
use cardwatch_core::{CardwatchContext, Error};

use super::get_context;
use crate::output;

/// Cap on rows rendered for the flagged table; exports carry everything.
const MAX_TABLE_ROWS: usize = 20;

pub fn run() -> Result<()> {
    if !atty::is(atty::Stream::Stdin) {
        anyhow::bail!("the dashboard is interactive; use 'cw train' and 'cw status' for scripting");
    }

    let ctx = get_context()?;
    let mut session = Session::new();

    print_welcome();
    if !Confirm::new()
        .with_prompt("Get started?")
        .default(true)
        .interact()?
    {
        return Ok(());
    }
    session.begin_auth()?;

    // One model serves the whole session.
    let pipeline = match ctx.load_pipeline() {
        Ok(pipeline) => pipeline,
        Err(Error::NotFound(_)) => {
            anyhow::bail!(
                "no trained model at {}; run 'cw train <data.csv>' first",
                ctx.model_path().display()
            );
        }
        Err(e) => return Err(e).context("Failed to load the fraud model"),
    };

    loop {
        println!();
        if let Some(username) = session.current_user().map(str::to_string) {
            let choice = Select::new()
                .with_prompt(format!("[{username}] Choose action"))
                .items(&["Upload transactions CSV", "Logout"])
                .default(0)
                .interact()?;
            match choice {
                0 => {
                    let path: String = Input::new()
                        .with_prompt("CSV file path")
                        .interact_text()?;
                    analyze_upload(&ctx, &pipeline, Path::new(&path))?;
                }
                _ => {
                    session.logout()?;
                    output::success("Logged out successfully!");
                }
            }
        } else {
            let choice = Select::new()
                .with_prompt("Choose action")
                .items(&["Login", "Sign Up", "Quit"])
                .default(0)
                .interact()?;
            match choice {
                0 => login(&ctx, &mut session)?,
                1 => sign_up(&ctx)?,
                _ => return Ok(()),
            }
        }
    }
}

fn print_welcome() {
    println!("{}", "Welcome to the Credit Card Fraud Detection System".bold());
    println!();
    println!("This tool uses machine learning to detect fraudulent transactions");
    println!("in uploaded credit card datasets.");
    println!();
    println!("  • Secure login system");
    println!("  • Intelligent fraud prediction");
    println!("  • Easy CSV upload and export");
    println!();
}

fn login(ctx: &CardwatchContext, session: &mut Session) -> Result<()> {
    let username: String = Input::new().with_prompt("Username").interact_text()?;
    let password = Password::new().with_prompt("Password").interact()?;

    if ctx.auth_service.authenticate(&username, &password)? {
        session.login(username.clone())?;
        output::success(&format!("Welcome, {username}!"));
    } else {
        output::error("Invalid username or password.");
    }
    Ok(())
}

fn sign_up(ctx: &CardwatchContext) -> Result<()> {
    let username: String = Input::new().with_prompt("New username").interact_text()?;
    let password = Password::new().with_prompt("New password").interact()?;
    let email: String = Input::new()
        .with_prompt("Email")
        .allow_empty(true)
        .interact_text()?;

    match ctx.auth_service.register(&username, &email, &password) {
        Ok(true) => output::success("Account created successfully! Please log in."),
        Ok(false) => output::warning("Username already exists. Try a different one."),
        Err(Error::Validation(msg)) => output::error(&msg),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Run one upload through the pipeline and render the results. Bad files
/// and incompatible schemas are reported without ending the session.
fn analyze_upload(
    ctx: &CardwatchContext,
    pipeline: &PipelineService,
    path: &Path,
) -> Result<()> {
    let table = match read_table(path) {
        Ok(table) => table,
        Err(e) => {
            output::error(&format!("Could not read {}: {}", path.display(), e));
            return Ok(());
        }
    };

    let report = match pipeline.analyze(table, ctx.config.preview_rows) {
        Ok(report) => report,
        Err(e) => {
            output::error(&format!("Error during prediction: {e}"));
            return Ok(());
        }
    };

    println!();
    println!("{}", "Preview of Uploaded Data".bold());
    println!("{}", output::transaction_table(&report.preview, report.preview.len()));

    if !report.has_fraud() {
        match report.branch {
            AnalysisBranch::GroundTruth => output::success("No fraud in uploaded data."),
            AnalysisBranch::Prediction => output::success("No fraud predicted."),
        }
        return Ok(());
    }

    println!();
    match report.branch {
        AnalysisBranch::GroundTruth => {
            println!("{}", "Actual Fraudulent Transactions Detected".red().bold())
        }
        AnalysisBranch::Prediction => {
            println!("{}", "Fraudulent Transactions Predicted!".yellow().bold())
        }
    }

    let flagged = report.flagged_table();
    println!("{}", output::transaction_table(&flagged, MAX_TABLE_ROWS));
    if flagged.len() > MAX_TABLE_ROWS {
        output::info(&format!(
            "... and {} more rows (the export has all of them)",
            flagged.len() - MAX_TABLE_ROWS
        ));
    }

    println!();
    match report.branch {
        AnalysisBranch::GroundTruth => println!("{}", "Fraud Types Distribution".bold()),
        AnalysisBranch::Prediction => {
            println!("{}", "Predicted Fraud Types Distribution".bold())
        }
    }
    output::distribution_chart(&report.distribution);

    println!();
    let prompt = match report.branch {
        AnalysisBranch::GroundTruth => "Download fraud transactions as CSV?",
        AnalysisBranch::Prediction => "Download predicted frauds as CSV?",
    };
    if Confirm::new().with_prompt(prompt).default(true).interact()? {
        let name: String = Input::new()
            .with_prompt("Save as")
            .default(report.default_export_name().to_string())
            .interact_text()?;
        match write_table(Path::new(&name), &flagged) {
            Ok(()) => output::success(&format!("Saved {} rows to {name}", flagged.len())),
            Err(e) => output::error(&format!("Could not write {name}: {e}")),
        }
    }

    Ok(())
}
