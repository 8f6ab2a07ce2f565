//! Authentication service - credential verification and registration
//!
//! Passwords are stored as salted Argon2id PHC strings, never in clear text.
//! Rejected logins and taken usernames are plain outcomes (`Ok(false)`),
//! not errors; only store access problems are errors.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::domain::result::{Error, Result};
use crate::domain::UserRecord;
use crate::ports::CredentialStore;

/// Authentication over a credential store
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Check a username/password pair against the store.
    ///
    /// Unknown users and wrong passwords both come back as `Ok(false)`;
    /// only store access problems are errors.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<bool> {
        let record = match self.store.find(username)? {
            Some(record) => record,
            None => return Ok(false),
        };

        let parsed = match PasswordHash::new(&record.password_hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::warn!("stored hash for '{username}' is not a valid PHC string: {e}");
                return Ok(false);
            }
        };

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Create an account with a freshly salted hash.
    ///
    /// Returns `Ok(false)` when the username is already taken.
    pub fn register(&self, username: &str, email: &str, password: &str) -> Result<bool> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(Error::validation("username and password are required"));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| Error::store(format!("failed to hash password: {e}")))?
            .to_string();

        self.store
            .insert_if_absent(username, UserRecord::new(hash, email.to_string()))
    }

    /// Number of registered users.
    pub fn user_count(&self) -> Result<usize> {
        Ok(self.store.load_all()?.len())
    }
}
