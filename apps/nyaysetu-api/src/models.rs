//! Database rows and API response bodies

use chrono::{DateTime, NaiveDate, Utc};
use nyaysetu_core::{win_rate, PrivacyOption, Specialization};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::ApiError;

/// Account stored in database
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct City {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Residential {
    pub id: i64,
    pub house_number: String,
    pub landmark: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct IncidentLocation {
    pub id: i64,
    pub city: String,
    pub state: String,
    pub location: String,
    pub landmark: Option<String>,
}

/// Complaint stored in database
#[derive(Debug, Clone, FromRow)]
pub struct DbComplaint {
    pub id: i64,
    pub account_id: i64,
    pub full_name: String,
    pub contact_number: String,
    pub govt_id: String,
    pub dob: NaiveDate,
    pub title: String,
    pub description: String,
    pub incident_datetime: DateTime<Utc>,
    pub residential_address_id: Option<i64>,
    pub incident_location_id: Option<i64>,
    pub photo: Option<String>,
    pub file_of_complaint: Option<String>,
    pub witness_name: Option<String>,
    pub witness_contact: Option<String>,
    pub privacy_option: String,
    pub created_at: DateTime<Utc>,
}

pub const COMPLAINT_COLUMNS: &str = "id, account_id, full_name, contact_number, govt_id, dob, \
     title, description, incident_datetime, residential_address_id, incident_location_id, \
     photo, file_of_complaint, witness_name, witness_contact, privacy_option, created_at";

/// Full complaint, only ever returned to its submitter
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintResponse {
    pub id: i64,
    pub user: i64,
    pub full_name: String,
    pub contact_number: String,
    pub govt_id: String,
    pub dob: NaiveDate,
    pub title: String,
    pub description: String,
    pub incident_datetime: DateTime<Utc>,
    pub residential_address: Option<i64>,
    pub incident_location: Option<i64>,
    pub photo: Option<String>,
    pub file_of_complaint: Option<String>,
    pub witness_name: Option<String>,
    pub witness_contact: Option<String>,
    pub privacy_option: PrivacyOption,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbComplaint> for ComplaintResponse {
    type Error = ApiError;

    fn try_from(c: DbComplaint) -> Result<Self, Self::Error> {
        Ok(Self {
            privacy_option: parse_privacy(&c.privacy_option)?,
            id: c.id,
            user: c.account_id,
            full_name: c.full_name,
            contact_number: c.contact_number,
            govt_id: c.govt_id,
            dob: c.dob,
            title: c.title,
            description: c.description,
            incident_datetime: c.incident_datetime,
            residential_address: c.residential_address_id,
            incident_location: c.incident_location_id,
            photo: c.photo,
            file_of_complaint: c.file_of_complaint,
            witness_name: c.witness_name,
            witness_contact: c.witness_contact,
            created_at: c.created_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbComplaintBrief {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub privacy_option: String,
    pub incident_city: Option<String>,
    pub residential_city: Option<String>,
}

/// Complaint projection shown to lawyers; carries no identity or narrative
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintBrief {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub privacy_option: PrivacyOption,
    pub incident_city: Option<String>,
    pub residential_city: Option<String>,
}

impl TryFrom<DbComplaintBrief> for ComplaintBrief {
    type Error = ApiError;

    fn try_from(c: DbComplaintBrief) -> Result<Self, Self::Error> {
        Ok(Self {
            privacy_option: parse_privacy(&c.privacy_option)?,
            id: c.id,
            title: c.title,
            created_at: c.created_at,
            incident_city: c.incident_city,
            residential_city: c.residential_city,
        })
    }
}

/// Lawyer profile stored in database
#[derive(Debug, Clone, FromRow)]
pub struct DbLawyerProfile {
    pub id: i64,
    pub account_id: i64,
    pub specialization: String,
    pub experience_years: i64,
    pub license_number: String,
    pub bio: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub rating: f64,
    pub total_cases: i64,
    pub won_cases: i64,
}

pub const PROFILE_COLUMNS: &str = "p.id, p.account_id, p.specialization, p.experience_years, \
     p.license_number, p.bio, p.contact_number, p.address, p.rating, p.total_cases, p.won_cases";

/// Lawyer profile response for API
#[derive(Debug, Clone, Serialize)]
pub struct LawyerProfileResponse {
    pub id: i64,
    pub user: i64,
    pub specialization: Specialization,
    pub experience_years: i64,
    pub license_number: String,
    pub bio: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub rating: f64,
    pub total_cases: i64,
    pub won_cases: i64,
    pub service_cities: Vec<City>,
    pub win_rate: f64,
}

impl LawyerProfileResponse {
    pub fn from_db(p: DbLawyerProfile, service_cities: Vec<City>) -> Result<Self, ApiError> {
        let specialization: Specialization = p.specialization.parse().map_err(|e| {
            ApiError::Internal(anyhow::anyhow!("stored profile {} has {}", p.id, e))
        })?;
        Ok(Self {
            id: p.id,
            user: p.account_id,
            specialization,
            experience_years: p.experience_years,
            license_number: p.license_number,
            bio: p.bio,
            contact_number: p.contact_number,
            address: p.address,
            rating: p.rating,
            total_cases: p.total_cases,
            won_cases: p.won_cases,
            service_cities,
            win_rate: win_rate(p.won_cases, p.total_cases),
        })
    }
}

/// Contact request as stored and returned
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ContactRequest {
    pub id: i64,
    pub user: i64,
    pub lawyer: i64,
    pub message: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

pub const CONTACT_REQUEST_COLUMNS: &str =
    "id, account_id AS user, lawyer_id AS lawyer, message, status, created_at";

/// Body of add-city / remove-city
#[derive(Debug, Clone, Deserialize)]
pub struct CityActionRequest {
    pub city_id: Option<serde_json::Value>,
}

/// Response of add-city / remove-city
#[derive(Debug, Clone, Serialize)]
pub struct CityActionResponse {
    pub status: &'static str,
    pub city: City,
}

/// Body of increment-cases
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncrementCasesRequest {
    pub won: Option<serde_json::Value>,
}

/// Response of increment-cases
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CaseCounters {
    pub total_cases: i64,
    pub won_cases: i64,
}

/// Body of a contact request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactBody {
    pub message: Option<String>,
}

fn parse_privacy(raw: &str) -> Result<PrivacyOption, ApiError> {
    raw.parse()
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("stored complaint has {}", e)))
}
