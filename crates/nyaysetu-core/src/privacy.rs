//! Visibility settings a citizen picks when filing a complaint

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Who may see a complaint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrivacyOption {
    #[default]
    LawyersOnly,
    PublicWithIdentity,
    PublicAnonymous,
}

impl PrivacyOption {
    pub const ALL: [PrivacyOption; 3] = [
        PrivacyOption::LawyersOnly,
        PrivacyOption::PublicWithIdentity,
        PrivacyOption::PublicAnonymous,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrivacyOption::LawyersOnly => "LAWYERS_ONLY",
            PrivacyOption::PublicWithIdentity => "PUBLIC_WITH_IDENTITY",
            PrivacyOption::PublicAnonymous => "PUBLIC_ANONYMOUS",
        }
    }

    /// Parse an optional client value, defaulting to `LawyersOnly` when absent.
    pub fn from_optional(value: Option<&str>) -> Result<Self, ValidationError> {
        match value {
            None => Ok(PrivacyOption::default()),
            Some(v) => v.parse(),
        }
    }
}

impl fmt::Display for PrivacyOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrivacyOption {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrivacyOption::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                ValidationError::new(
                    "privacy_option",
                    format!("\"{}\" is not a valid choice.", s),
                )
            })
    }
}
