//! Lawyer directory search parameters
//!
//! Query parameters are parsed into a [`DirectoryFilter`] before any SQL is
//! built. Categories combine with AND; the free-text term matches any of
//! first name, last name, bio or license number.

use std::collections::HashMap;

use crate::specialization::Specialization;
use crate::validation::ValidationError;

/// Number of profiles returned by the "top" listing
pub const TOP_LAWYERS_LIMIT: i64 = 10;

/// How a city is referenced in a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CityRef {
    /// Exact city id
    Id(i64),
    /// City name, compared case-insensitively
    Name(String),
}

impl CityRef {
    /// All-digit tokens are ids, anything else is a name.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        if is_all_digits(token) {
            if let Ok(id) = token.parse() {
                return Some(CityRef::Id(id));
            }
        }
        Some(CityRef::Name(token.to_string()))
    }
}

/// Parsed directory query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryFilter {
    pub specialization: Option<Specialization>,
    pub city: Option<CityRef>,
    pub min_experience: Option<i64>,
    pub q: Option<String>,
}

impl DirectoryFilter {
    /// Build a filter from raw query parameters.
    ///
    /// Empty values are treated as absent. A non-numeric `min_experience`
    /// is ignored; an unknown `specialization` is rejected.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, ValidationError> {
        let get = |key: &str| {
            params
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let specialization = get("specialization")
            .map(str::parse::<Specialization>)
            .transpose()?;
        let city = get("city").and_then(CityRef::parse);
        let min_experience = get("min_experience")
            .filter(|v| is_all_digits(v))
            .and_then(|v| v.parse().ok());
        let q = get("q").map(str::to_string);

        Ok(Self {
            specialization,
            city,
            min_experience,
            q,
        })
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Escape a free-text term for `LIKE ... ESCAPE '\'` and wrap it in `%`.
///
/// Only ASCII letters are lower-cased, the same folding SQLite's `LOWER()`
/// applies to the column side.
pub fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.to_ascii_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
