//! Domain layer of the NyaySetu complaint and lawyer-directory backend
//!
//! Everything here is free of I/O:
//! - closed enumerations for specializations and complaint privacy
//! - validation of every client payload into typed write models
//! - directory and case-search query parsing
//! - derived lawyer metrics (win rate, case outcome flags)

pub mod account;
pub mod cases;
pub mod complaint;
pub mod directory;
pub mod metrics;
pub mod privacy;
pub mod profile;
pub mod specialization;
pub mod validation;

pub use account::{AccountInput, CityInput, NewAccount};
pub use cases::CityTokens;
pub use complaint::{
    ComplaintInput, IncidentLocationInput, LocationLink, NewComplaint, NewIncidentLocation,
    NewResidential, ResidentialInput,
};
pub use directory::{like_pattern, CityRef, DirectoryFilter, TOP_LAWYERS_LIMIT};
pub use metrics::{parse_won_flag, win_rate};
pub use privacy::PrivacyOption;
pub use profile::{LawyerProfileInput, ProfileChanges, WriteMode};
pub use specialization::{specialization_entries, Specialization, SpecializationEntry};
pub use validation::{parse_id, ValidationError, MAX_SERVICE_CITIES};
