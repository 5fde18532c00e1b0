//! Complaint intake: raw client input and its validated form
//!
//! Location records may either be created inline with the complaint or
//! linked by id. Nested field errors are reported with a dotted path such as
//! `incident_location.city`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::privacy::PrivacyOption;
use crate::validation::{optional_text, required_text, ValidationError};

/// Residential address as submitted
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResidentialInput {
    pub house_number: Option<String>,
    pub landmark: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
}

/// Validated residential address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResidential {
    pub house_number: String,
    pub landmark: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl ResidentialInput {
    pub fn validate(self) -> Result<NewResidential, ValidationError> {
        self.validate_at("")
    }

    fn validate_at(self, prefix: &str) -> Result<NewResidential, ValidationError> {
        let f = |name: &str| format!("{}{}", prefix, name);
        Ok(NewResidential {
            house_number: required_text(&f("house_number"), self.house_number, 50)?,
            landmark: optional_text(&f("landmark"), self.landmark, 150)?,
            city: required_text(&f("city"), self.city, 100)?,
            state: required_text(&f("state"), self.state, 100)?,
            pincode: required_text(&f("pincode"), self.pincode, 10)?,
        })
    }
}

/// Incident location as submitted
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncidentLocationInput {
    pub city: Option<String>,
    pub state: Option<String>,
    pub location: Option<String>,
    pub landmark: Option<String>,
}

/// Validated incident location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIncidentLocation {
    pub city: String,
    pub state: String,
    pub location: String,
    pub landmark: Option<String>,
}

impl IncidentLocationInput {
    pub fn validate(self) -> Result<NewIncidentLocation, ValidationError> {
        self.validate_at("")
    }

    fn validate_at(self, prefix: &str) -> Result<NewIncidentLocation, ValidationError> {
        let f = |name: &str| format!("{}{}", prefix, name);
        Ok(NewIncidentLocation {
            city: required_text(&f("city"), self.city, 100)?,
            state: required_text(&f("state"), self.state, 100)?,
            location: required_text(&f("location"), self.location, 150)?,
            landmark: optional_text(&f("landmark"), self.landmark, 150)?,
        })
    }
}

/// Where a complaint's location reference comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationLink<T> {
    None,
    Existing(i64),
    Create(T),
}

impl<T> LocationLink<T> {
    fn resolve<I>(
        field: &str,
        nested: Option<I>,
        id: Option<i64>,
        validate: impl FnOnce(I) -> Result<T, ValidationError>,
    ) -> Result<Self, ValidationError> {
        match (nested, id) {
            (Some(_), Some(_)) => Err(ValidationError::new(
                field,
                format!("Provide either {0} or {0}_id, not both.", field),
            )),
            (Some(input), None) => validate(input).map(LocationLink::Create),
            (None, Some(id)) => Ok(LocationLink::Existing(id)),
            (None, None) => Ok(LocationLink::None),
        }
    }
}

/// Complaint as submitted by a citizen
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComplaintInput {
    pub full_name: Option<String>,
    pub contact_number: Option<String>,
    pub govt_id: Option<String>,
    pub dob: Option<NaiveDate>,
    pub title: Option<String>,
    #[serde(alias = "crime_description")]
    pub description: Option<String>,
    pub incident_datetime: Option<DateTime<Utc>>,
    pub residential_address: Option<ResidentialInput>,
    pub residential_address_id: Option<i64>,
    pub incident_location: Option<IncidentLocationInput>,
    pub incident_location_id: Option<i64>,
    pub photo: Option<String>,
    pub file_of_complaint: Option<String>,
    pub witness_name: Option<String>,
    pub witness_contact: Option<String>,
    pub privacy_option: Option<String>,
}

/// Validated complaint, ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewComplaint {
    pub full_name: String,
    pub contact_number: String,
    pub govt_id: String,
    pub dob: NaiveDate,
    pub title: String,
    pub description: String,
    pub incident_datetime: DateTime<Utc>,
    pub residential_address: LocationLink<NewResidential>,
    pub incident_location: LocationLink<NewIncidentLocation>,
    pub photo: Option<String>,
    pub file_of_complaint: Option<String>,
    pub witness_name: Option<String>,
    pub witness_contact: Option<String>,
    pub privacy_option: PrivacyOption,
}

impl ComplaintInput {
    pub fn validate(self) -> Result<NewComplaint, ValidationError> {
        let full_name = required_text("full_name", self.full_name, 100)?;
        let contact_number = required_text("contact_number", self.contact_number, 15)?;
        let govt_id = required_text("govt_id", self.govt_id, 50)?;
        let dob = self.dob.ok_or_else(|| ValidationError::required("dob"))?;
        let title = required_text("title", self.title, 200)?;
        let description = required_text("description", self.description, usize::MAX)?;
        let incident_datetime = self
            .incident_datetime
            .ok_or_else(|| ValidationError::required("incident_datetime"))?;

        if dob > incident_datetime.date_naive() {
            return Err(ValidationError::new(
                "dob",
                "Date of birth cannot be after the incident.",
            ));
        }

        let residential_address = LocationLink::resolve(
            "residential_address",
            self.residential_address,
            self.residential_address_id,
            |r| r.validate_at("residential_address."),
        )?;
        let incident_location = LocationLink::resolve(
            "incident_location",
            self.incident_location,
            self.incident_location_id,
            |l| l.validate_at("incident_location."),
        )?;

        Ok(NewComplaint {
            full_name,
            contact_number,
            govt_id,
            dob,
            title,
            description,
            incident_datetime,
            residential_address,
            incident_location,
            photo: optional_text("photo", self.photo, 255)?,
            file_of_complaint: optional_text("file_of_complaint", self.file_of_complaint, 255)?,
            witness_name: optional_text("witness_name", self.witness_name, 100)?,
            witness_contact: optional_text("witness_contact", self.witness_contact, 15)?,
            privacy_option: PrivacyOption::from_optional(self.privacy_option.as_deref())?,
        })
    }
}
