//! Credential store port - user persistence abstraction

use std::collections::BTreeMap;

use crate::domain::result::Result;
use crate::domain::UserRecord;

/// User credential persistence abstraction
///
/// This trait defines all credential operations. Implementations (adapters)
/// provide the actual storage logic. Usernames key the records; the map is
/// ordered so listings and serialized output are stable.
pub trait CredentialStore: Send + Sync {
    /// Load every stored user. A store that does not exist yet is an empty
    /// map, not an error.
    fn load_all(&self) -> Result<BTreeMap<String, UserRecord>>;

    /// Replace the entire stored user set.
    fn save_all(&self, users: &BTreeMap<String, UserRecord>) -> Result<()>;

    /// Insert a user only if the username is free.
    ///
    /// Returns `Ok(false)` when the name is already taken, leaving the store
    /// untouched. The read-check-write must not interleave with another
    /// writer's.
    fn insert_if_absent(&self, username: &str, record: UserRecord) -> Result<bool>;

    /// Look up a single user by username.
    fn find(&self, username: &str) -> Result<Option<UserRecord>>;
}
