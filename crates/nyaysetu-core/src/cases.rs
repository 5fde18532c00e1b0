//! City selection for lawyer case searches

use crate::directory::CityRef;

/// Comma-separated city ids and names, split by kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityTokens {
    pub ids: Vec<i64>,
    pub names: Vec<String>,
}

impl CityTokens {
    /// Split a `cities` parameter such as `Delhi,2, Pune`.
    ///
    /// Blank tokens are dropped.
    pub fn parse(raw: &str) -> Self {
        let mut tokens = CityTokens::default();
        for token in raw.split(',').filter_map(CityRef::parse) {
            match token {
                CityRef::Id(id) => tokens.ids.push(id),
                CityRef::Name(name) => tokens.names.push(name),
            }
        }
        tokens
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.names.is_empty()
    }

    /// Union of names resolved from ids with the literal name tokens.
    pub fn into_names(self, resolved: Vec<String>) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(resolved.len() + self.names.len());
        for name in resolved.into_iter().chain(self.names) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}
