//! CLI command implementations

pub mod dashboard;
pub mod status;
pub mod train;

use std::path::PathBuf;

use anyhow::{Context, Result};
use cardwatch_core::CardwatchContext;

/// Get the cardwatch directory from environment or default
pub fn get_cardwatch_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CARDWATCH_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".cardwatch")
    }
}

/// Get or create cardwatch context
pub fn get_context() -> Result<CardwatchContext> {
    let cardwatch_dir = get_cardwatch_dir();
    log::debug!("using cardwatch directory {}", cardwatch_dir.display());

    std::fs::create_dir_all(&cardwatch_dir)
        .with_context(|| format!("Failed to create cardwatch directory: {:?}", cardwatch_dir))?;

    CardwatchContext::new(&cardwatch_dir).context("Failed to initialize cardwatch context")
}
