//! Core domain entities
//!
//! Pure data structures with validation logic - no I/O or external
//! dependencies beyond the numeric matrix type the classifier consumes.

mod fraud;
mod table;
mod user;
pub mod result;

pub use fraud::FraudType;
pub use table::{is_truthy, parse_numeric, TransactionTable};
pub use user::UserRecord;
