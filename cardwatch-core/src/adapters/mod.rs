//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - Flat JSON file for the CredentialStore port

pub mod users_file;

pub use users_file::FileCredentialStore;
