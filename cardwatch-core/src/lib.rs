//! Cardwatch Core - Business logic for credit-card fraud detection
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (TransactionTable, FraudType, etc.)
//! - **ports**: Trait definitions for external dependencies (CredentialStore)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (flat-file user store)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use adapters::FileCredentialStore;
use config::Config;
use services::{AuthService, FraudClassifier, PipelineService};

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{FraudType, TransactionTable, UserRecord};

/// File holding the registered users, inside the cardwatch directory.
pub const USERS_FILE: &str = "users.json";

/// Main context for cardwatch operations
///
/// This is the primary entry point for all business logic. It holds the
/// configuration, the credential store, and the services built on top.
pub struct CardwatchContext {
    pub config: Config,
    pub store: Arc<FileCredentialStore>,
    pub auth_service: AuthService,
    data_dir: PathBuf,
}

impl CardwatchContext {
    /// Create a new cardwatch context rooted at the given data directory.
    pub fn new(cardwatch_dir: &Path) -> Result<Self> {
        let config = Config::load(cardwatch_dir)?;

        let store = Arc::new(FileCredentialStore::new(cardwatch_dir.join(USERS_FILE)));
        let auth_service = AuthService::new(store.clone());

        Ok(Self {
            config,
            store,
            auth_service,
            data_dir: cardwatch_dir.to_path_buf(),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Where the trained model artifact lives for this configuration.
    pub fn model_path(&self) -> PathBuf {
        self.data_dir.join(&self.config.model_file)
    }

    /// Load the trained model and wire it into an analysis pipeline.
    ///
    /// `Error::NotFound` means nobody has run training yet; callers decide
    /// how fatal that is.
    pub fn load_pipeline(&self) -> domain::result::Result<PipelineService> {
        let classifier = FraudClassifier::load(&self.model_path())?;
        Ok(PipelineService::new(
            classifier,
            self.config.columns.clone(),
        ))
    }
}
