//! User domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered dashboard user, keyed by username in the credential store.
///
/// The password is stored as a salted Argon2id hash in PHC string format,
/// never in the clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub password_hash: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(password_hash: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            password_hash: password_hash.into(),
            email: email.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_record_creation() {
        let record = UserRecord::new("$argon2id$stub", "test@example.com");
        assert_eq!(record.password_hash, "$argon2id$stub");
        assert_eq!(record.email, "test@example.com");
    }

    #[test]
    fn test_user_record_json_shape() {
        let record = UserRecord::new("h", "a@x.com");
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("passwordHash").is_some());
        assert!(json.get("email").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
