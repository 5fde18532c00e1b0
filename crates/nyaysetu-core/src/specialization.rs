//! Closed taxonomy of legal practice areas
//!
//! Profiles store the snake_case key; the label is only used for display
//! through the specializations listing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Practice area a lawyer profile is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialization {
    Civil,
    Criminal,
    Family,
    Property,
    Corporate,
    Business,
    Contract,
    Banking,
    Competition,
    Insolvency,
    Administrative,
    Constitutional,
    HumanRights,
    Environmental,
    International,
    Immigration,
    IntellectualProperty,
    Cyber,
    Technology,
    Fintech,
    MediaEntertainment,
    LabourEmployment,
    Tax,
    ConsumerProtection,
    Insurance,
    Maritime,
    PersonalInjury,
    SpaceAir,
    DefenseMilitary,
    #[default]
    Other,
}

impl Specialization {
    /// Every specialization, in listing order
    pub const ALL: [Specialization; 30] = [
        Specialization::Civil,
        Specialization::Criminal,
        Specialization::Family,
        Specialization::Property,
        Specialization::Corporate,
        Specialization::Business,
        Specialization::Contract,
        Specialization::Banking,
        Specialization::Competition,
        Specialization::Insolvency,
        Specialization::Administrative,
        Specialization::Constitutional,
        Specialization::HumanRights,
        Specialization::Environmental,
        Specialization::International,
        Specialization::Immigration,
        Specialization::IntellectualProperty,
        Specialization::Cyber,
        Specialization::Technology,
        Specialization::Fintech,
        Specialization::MediaEntertainment,
        Specialization::LabourEmployment,
        Specialization::Tax,
        Specialization::ConsumerProtection,
        Specialization::Insurance,
        Specialization::Maritime,
        Specialization::PersonalInjury,
        Specialization::SpaceAir,
        Specialization::DefenseMilitary,
        Specialization::Other,
    ];

    /// Storage and wire key
    pub fn key(&self) -> &'static str {
        match self {
            Specialization::Civil => "civil",
            Specialization::Criminal => "criminal",
            Specialization::Family => "family",
            Specialization::Property => "property",
            Specialization::Corporate => "corporate",
            Specialization::Business => "business",
            Specialization::Contract => "contract",
            Specialization::Banking => "banking",
            Specialization::Competition => "competition",
            Specialization::Insolvency => "insolvency",
            Specialization::Administrative => "administrative",
            Specialization::Constitutional => "constitutional",
            Specialization::HumanRights => "human_rights",
            Specialization::Environmental => "environmental",
            Specialization::International => "international",
            Specialization::Immigration => "immigration",
            Specialization::IntellectualProperty => "intellectual_property",
            Specialization::Cyber => "cyber",
            Specialization::Technology => "technology",
            Specialization::Fintech => "fintech",
            Specialization::MediaEntertainment => "media_entertainment",
            Specialization::LabourEmployment => "labour_employment",
            Specialization::Tax => "tax",
            Specialization::ConsumerProtection => "consumer_protection",
            Specialization::Insurance => "insurance",
            Specialization::Maritime => "maritime",
            Specialization::PersonalInjury => "personal_injury",
            Specialization::SpaceAir => "space_air",
            Specialization::DefenseMilitary => "defense_military",
            Specialization::Other => "other",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Specialization::Civil => "Civil Law",
            Specialization::Criminal => "Criminal Law",
            Specialization::Family => "Family Law",
            Specialization::Property => "Property / Real Estate Law",
            Specialization::Corporate => "Corporate Law",
            Specialization::Business => "Commercial / Business Law",
            Specialization::Contract => "Contract Law",
            Specialization::Banking => "Banking & Finance Law",
            Specialization::Competition => "Competition Law",
            Specialization::Insolvency => "Insolvency / Bankruptcy Law",
            Specialization::Administrative => "Administrative Law",
            Specialization::Constitutional => "Constitutional Law",
            Specialization::HumanRights => "Human Rights / Public Interest Law",
            Specialization::Environmental => "Environmental Law",
            Specialization::International => "International Law / Trade Law",
            Specialization::Immigration => "Immigration Law",
            Specialization::IntellectualProperty => "Intellectual Property Rights (IPR)",
            Specialization::Cyber => "Cyber Law / Data Privacy",
            Specialization::Technology => "Technology / IT Law",
            Specialization::Fintech => "Fintech, Blockchain & Emerging Tech",
            Specialization::MediaEntertainment => "Media & Entertainment Law",
            Specialization::LabourEmployment => "Labour & Employment Law",
            Specialization::Tax => "Taxation Law",
            Specialization::ConsumerProtection => "Consumer Protection Law",
            Specialization::Insurance => "Insurance Law",
            Specialization::Maritime => "Maritime / Admiralty Law",
            Specialization::PersonalInjury => "Personal Injury / Tort Law",
            Specialization::SpaceAir => "Space & Air Law",
            Specialization::DefenseMilitary => "Military / Armed Forces / Defence Law",
            Specialization::Other => "Other",
        }
    }
}

impl fmt::Display for Specialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Specialization {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Specialization::ALL
            .iter()
            .copied()
            .find(|spec| spec.key() == s)
            .ok_or_else(|| {
                ValidationError::new(
                    "specialization",
                    format!("'{}' is not a valid specialization", s),
                )
            })
    }
}

/// Entry of the specializations listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecializationEntry {
    pub key: &'static str,
    pub label: &'static str,
}

/// Listing of every specialization as `{key, label}` pairs
pub fn specialization_entries() -> Vec<SpecializationEntry> {
    Specialization::ALL
        .iter()
        .map(|s| SpecializationEntry {
            key: s.key(),
            label: s.label(),
        })
        .collect()
}
