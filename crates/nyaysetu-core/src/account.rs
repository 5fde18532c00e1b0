//! Account and city inputs

use serde::Deserialize;

use crate::validation::{optional_text, required_text, ValidationError};

/// Account registration payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountInput {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl AccountInput {
    pub fn validate(self) -> Result<NewAccount, ValidationError> {
        Ok(NewAccount {
            username: required_text("username", self.username, 150)?,
            first_name: optional_text("first_name", self.first_name, 150)?.unwrap_or_default(),
            last_name: optional_text("last_name", self.last_name, 150)?.unwrap_or_default(),
        })
    }
}

/// City create/update payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CityInput {
    pub name: Option<String>,
}

impl CityInput {
    pub fn validate(self) -> Result<String, ValidationError> {
        required_text("name", self.name, 100)
    }
}
