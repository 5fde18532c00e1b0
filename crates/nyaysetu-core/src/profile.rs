//! Lawyer profile writes

use serde::Deserialize;

use crate::specialization::Specialization;
use crate::validation::{
    normalize_service_city_ids, optional_text, required_text, validate_rating, ValidationError,
};

/// Kind of write a profile payload is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// New profile; required fields must be present
    Create,
    /// Full update (PUT); required fields must be present
    Replace,
    /// Partial update (PATCH); anything may be omitted
    Partial,
}

impl WriteMode {
    fn requires_all(&self) -> bool {
        matches!(self, WriteMode::Create | WriteMode::Replace)
    }
}

/// Profile fields as submitted
///
/// `total_cases` and `won_cases` are not accepted here; they only move
/// through the increment-cases action. For the nullable text fields an
/// absent key is `None` and an explicit `null` is `Some(None)`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LawyerProfileInput {
    pub specialization: Option<String>,
    pub experience_years: Option<i64>,
    pub license_number: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub bio: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub contact_number: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub address: Option<Option<String>>,
    pub rating: Option<f64>,
    pub service_city_ids: Option<Vec<i64>>,
}

/// Validated profile changes.
///
/// `None` leaves a column untouched. For the nullable text columns the inner
/// `None` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub specialization: Option<Specialization>,
    pub experience_years: Option<i64>,
    pub license_number: Option<String>,
    pub bio: Option<Option<String>>,
    pub contact_number: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub rating: Option<f64>,
    pub service_city_ids: Option<Vec<i64>>,
}

impl LawyerProfileInput {
    pub fn validate(self, mode: WriteMode) -> Result<ProfileChanges, ValidationError> {
        let license_number = match self.license_number {
            Some(v) => Some(required_text("license_number", Some(v), 100)?),
            None if mode.requires_all() => {
                return Err(ValidationError::required("license_number"))
            }
            None => None,
        };

        let experience_years = match self.experience_years {
            Some(years) if years < 0 => {
                return Err(ValidationError::new(
                    "experience_years",
                    "Ensure this value is greater than or equal to 0.",
                ))
            }
            other => other,
        };

        Ok(ProfileChanges {
            specialization: self
                .specialization
                .as_deref()
                .map(str::parse::<Specialization>)
                .transpose()?,
            experience_years,
            license_number,
            bio: nullable("bio", self.bio, usize::MAX)?,
            contact_number: nullable("contact_number", self.contact_number, 15)?,
            address: nullable("address", self.address, usize::MAX)?,
            rating: self.rating.map(validate_rating).transpose()?,
            service_city_ids: self
                .service_city_ids
                .as_deref()
                .map(normalize_service_city_ids)
                .transpose()?,
        })
    }
}

/// Blank text clears the column just like `null` does.
fn nullable(
    field: &str,
    value: Option<Option<String>>,
    max_len: usize,
) -> Result<Option<Option<String>>, ValidationError> {
    value
        .map(|v| optional_text(field, v, max_len))
        .transpose()
}
