//! Fraud-type annotation
//!
//! One rule chain serves both the ground-truth path and the prediction
//! path; only the flag source differs. First matching rule wins:
//!
//! 1. flagged and channel is exactly "online"  -> Card Not Present
//! 2. flagged and the location mismatch is set -> Lost or Stolen
//! 3. flagged                                  -> Counterfeit
//! 4. otherwise                                -> None

use crate::config::ColumnConventions;
use crate::domain::result::{Error, Result};
use crate::domain::{FraudType, TransactionTable};

/// Derived column appended by [`annotate_fraud_types`].
pub const FRAUD_TYPE_COLUMN: &str = "fraud_type";

/// Channel value that marks a card-not-present purchase. Matched exactly,
/// including case.
const ONLINE_CHANNEL: &str = "online";

/// Classify a single row.
pub fn assign_fraud_type(
    channel: Option<&str>,
    location_mismatch: bool,
    flagged: bool,
) -> FraudType {
    if !flagged {
        return FraudType::None;
    }
    if channel == Some(ONLINE_CHANNEL) {
        FraudType::CardNotPresent
    } else if location_mismatch {
        FraudType::LostOrStolen
    } else {
        FraudType::Counterfeit
    }
}

/// Classify every row against the given per-row flags and append the
/// result as a `fraud_type` column. The flags may come from a ground-truth
/// label or from model predictions; the rules do not care.
///
/// A missing channel column means no row is card-not-present; a missing
/// location column means no row is lost-or-stolen.
pub fn annotate_fraud_types(
    table: &mut TransactionTable,
    flags: &[bool],
    columns: &ColumnConventions,
) -> Result<Vec<FraudType>> {
    if flags.len() != table.len() {
        return Err(Error::validation(format!(
            "{} flags for {} rows",
            flags.len(),
            table.len()
        )));
    }

    let channel_idx = table.column_index(&columns.channel);
    let mismatches = table.truthy_flags(&columns.location_mismatch);

    let types: Vec<FraudType> = (0..table.len())
        .map(|row| {
            let channel = channel_idx.map(|idx| table.row(row)[idx].as_str());
            assign_fraud_type(channel, mismatches[row], flags[row])
        })
        .collect();

    table.set_column(
        FRAUD_TYPE_COLUMN,
        types.iter().map(|t| t.as_str().to_string()).collect(),
    )?;
    Ok(types)
}
