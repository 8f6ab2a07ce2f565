//! Configuration management
//!
//! Reads the optional settings.json in the cardwatch directory:
//! ```json
//! {
//!   "app": { "previewRows": 5, ... },
//!   "columns": { "label": "IsFraud", "identifier": "TransactionID", ... },
//!   "modelFile": "fraud_model.json"
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Raw settings.json structure, kept whole so saves round-trip
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    columns: ColumnConventions,
    #[serde(default)]
    model_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default = "default_preview_rows")]
    preview_rows: usize,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            preview_rows: default_preview_rows(),
            other: HashMap::new(),
        }
    }
}

fn default_preview_rows() -> usize {
    5
}

/// Cardwatch configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub columns: ColumnConventions,
    pub model_file: String,
    pub preview_rows: usize,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            columns: ColumnConventions::default(),
            model_file: "fraud_model.json".to_string(),
            preview_rows: default_preview_rows(),
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the cardwatch directory
    ///
    /// The model file name can be overridden via:
    /// 1. Settings file ("modelFile")
    /// 2. Environment variable CARDWATCH_MODEL_FILE (for CI/testing)
    pub fn load(cardwatch_dir: &Path) -> Result<Self> {
        let settings_path = cardwatch_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        // Check env var for model file override (for CI/testing)
        let model_file = match std::env::var("CARDWATCH_MODEL_FILE").ok() {
            Some(name) if !name.is_empty() => name,
            _ => raw
                .model_file
                .clone()
                .unwrap_or_else(|| "fraud_model.json".to_string()),
        };

        Ok(Self {
            columns: raw.columns.clone(),
            model_file,
            preview_rows: raw.app.preview_rows,
            _raw_settings: raw,
        })
    }

    /// Save config to the cardwatch directory
    /// Preserves other settings that the CLI doesn't manage
    pub fn save(&self, cardwatch_dir: &Path) -> Result<()> {
        let settings_path = cardwatch_dir.join("settings.json");

        // Load existing settings to preserve fields we don't manage
        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        // Update only the fields we manage
        settings.app.preview_rows = self.preview_rows;
        settings.columns = self.columns.clone();
        settings.model_file = Some(self.model_file.clone());

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }
}

/// Column names the annotator and trainer look for in uploads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnConventions {
    /// Ground-truth fraud label (0/1)
    pub label: String,
    /// Row identifier, excluded from model features
    pub identifier: String,
    /// Purchase channel ("online", "pos", ...)
    pub channel: String,
    /// Billing/shipping location mismatch flag
    pub location_mismatch: String,
}

impl Default for ColumnConventions {
    fn default() -> Self {
        Self {
            label: "IsFraud".to_string(),
            identifier: "TransactionID".to_string(),
            channel: "channel".to_string(),
            location_mismatch: "location_mismatch".to_string(),
        }
    }
}
