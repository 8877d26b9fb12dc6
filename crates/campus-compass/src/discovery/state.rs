use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A named filter dimension. Each facet holds at most one selected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Country,
    Course,
    TuitionRange,
    Ranking,
    DegreeLevel,
    ScholarshipType,
    Amount,
}

impl Facet {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Country,
            Self::Course,
            Self::TuitionRange,
            Self::Ranking,
            Self::DegreeLevel,
            Self::ScholarshipType,
            Self::Amount,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Course => "course",
            Self::TuitionRange => "tuition_range",
            Self::Ranking => "ranking",
            Self::DegreeLevel => "degree_level",
            Self::ScholarshipType => "scholarship_type",
            Self::Amount => "amount",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Country => "Country",
            Self::Course => "Course",
            Self::TuitionRange => "Tuition Range",
            Self::Ranking => "Ranking",
            Self::DegreeLevel => "Degree Level",
            Self::ScholarshipType => "Type",
            Self::Amount => "Amount",
        }
    }

    /// Facets whose value is a `min-max` / `min+` token.
    pub const fn is_range(self) -> bool {
        matches!(self, Self::TuitionRange | Self::Ranking | Self::Amount)
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter facet '{0}'")]
pub struct UnknownFacet(pub String);

impl FromStr for Facet {
    type Err = UnknownFacet;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "country" => Ok(Self::Country),
            "course" => Ok(Self::Course),
            "tuitionrange" | "tuition" => Ok(Self::TuitionRange),
            "ranking" => Ok(Self::Ranking),
            "degreelevel" => Ok(Self::DegreeLevel),
            "scholarshiptype" | "type" => Ok(Self::ScholarshipType),
            "amount" => Ok(Self::Amount),
            _ => Err(UnknownFacet(raw.to_string())),
        }
    }
}

/// Current search text plus the selected value of every active facet.
///
/// An absent facet means "no filter applied"; empty values are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    query: String,
    filters: BTreeMap<Facet, String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.set_query(query);
        self
    }

    pub fn with_filter(mut self, facet: Facet, value: impl Into<String>) -> Self {
        self.set_filter(facet, value);
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn filter(&self, facet: Facet) -> Option<&str> {
        self.filters.get(&facet).map(String::as_str)
    }

    pub fn filters(&self) -> &BTreeMap<Facet, String> {
        &self.filters
    }

    /// Replace the value of one facet; an empty value clears it.
    pub fn set_filter(&mut self, facet: Facet, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.filters.remove(&facet);
        } else {
            self.filters.insert(facet, value);
        }
    }

    pub fn clear_all(&mut self) {
        self.query.clear();
        self.filters.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.filters.is_empty()
    }

    /// Active facets restricted to the ones a catalog understands, in facet order.
    pub fn active_filters(&self, applicable: &[Facet]) -> Vec<ActiveFilter> {
        self.filters
            .iter()
            .filter(|(facet, _)| applicable.contains(facet))
            .map(|(facet, value)| ActiveFilter {
                facet: *facet,
                label: facet.label(),
                value: value.clone(),
            })
            .collect()
    }
}

/// One applied filter, as rendered in the "Active filters" strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveFilter {
    pub facet: Facet,
    pub label: &'static str,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_filter_replaces_and_clears() {
        let mut state = FilterState::new();
        state.set_filter(Facet::Country, "usa");
        state.set_filter(Facet::Country, "uk");
        assert_eq!(state.filter(Facet::Country), Some("uk"));

        state.set_filter(Facet::Country, "");
        assert_eq!(state.filter(Facet::Country), None);
        assert!(state.is_empty());
    }

    #[test]
    fn clear_all_resets_query_and_facets() {
        let mut state = FilterState::new()
            .with_query("oxford")
            .with_filter(Facet::Course, "medicine")
            .with_filter(Facet::Amount, "0-25000");

        state.clear_all();

        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn facet_names_accept_original_spellings() {
        assert_eq!("tuitionRange".parse::<Facet>(), Ok(Facet::TuitionRange));
        assert_eq!("degree-level".parse::<Facet>(), Ok(Facet::DegreeLevel));
        assert_eq!("scholarship_type".parse::<Facet>(), Ok(Facet::ScholarshipType));
        assert!("color".parse::<Facet>().is_err());
    }

    #[test]
    fn active_filters_respect_catalog_facets() {
        let state = FilterState::new()
            .with_filter(Facet::Country, "canada")
            .with_filter(Facet::TuitionRange, "0-20000");

        let active = state.active_filters(&[Facet::Country, Facet::Amount]);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].facet, Facet::Country);
        assert_eq!(active[0].value, "canada");
    }
}
