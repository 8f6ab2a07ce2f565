//! Fraud sub-type classification
//!
//! Every analyzed row is labelled with exactly one of these categories.
//! The strings are part of the export format and must not change.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Rule-derived sub-category of a fraud-flagged transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FraudType {
    #[serde(rename = "Card Not Present")]
    CardNotPresent,
    #[serde(rename = "Lost or Stolen")]
    LostOrStolen,
    #[serde(rename = "Counterfeit")]
    Counterfeit,
    #[serde(rename = "None")]
    None,
}

impl FraudType {
    /// All categories, in report order. `None` last.
    pub const ALL: [FraudType; 4] = [
        FraudType::CardNotPresent,
        FraudType::LostOrStolen,
        FraudType::Counterfeit,
        FraudType::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FraudType::CardNotPresent => "Card Not Present",
            FraudType::LostOrStolen => "Lost or Stolen",
            FraudType::Counterfeit => "Counterfeit",
            FraudType::None => "None",
        }
    }

    /// True for every category except `None`.
    pub fn is_fraud(&self) -> bool {
        !matches!(self, FraudType::None)
    }
}

impl fmt::Display for FraudType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_export_strings() {
        assert_eq!(FraudType::CardNotPresent.to_string(), "Card Not Present");
        assert_eq!(FraudType::LostOrStolen.to_string(), "Lost or Stolen");
        assert_eq!(FraudType::Counterfeit.to_string(), "Counterfeit");
        assert_eq!(FraudType::None.to_string(), "None");
    }

    #[test]
    fn test_only_none_is_not_fraud() {
        for category in FraudType::ALL {
            assert_eq!(category.is_fraud(), category != FraudType::None);
        }
    }
}
