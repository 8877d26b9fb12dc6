use super::range::{RangeToken, RangeTokenError};
use super::state::{Facet, FilterState};
use crate::catalog::{Scholarship, University};
use tracing::warn;

/// Field a record exposes for one facet.
#[derive(Debug, Clone, Copy)]
pub enum FacetValue<'a> {
    Text(&'a str),
    List(&'a [String]),
    Number(u32),
}

/// A catalog record that can be searched and filtered.
pub trait Discoverable {
    /// Facets this catalog understands. Other active facets are ignored.
    const FACETS: &'static [Facet];

    /// Fields matched by the free-text query.
    fn search_fields(&self) -> Vec<&str>;

    fn facet_value(&self, facet: Facet) -> Option<FacetValue<'_>>;
}

impl Discoverable for University {
    const FACETS: &'static [Facet] = &[
        Facet::Country,
        Facet::Course,
        Facet::TuitionRange,
        Facet::Ranking,
    ];

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            self.description.as_str(),
        ]
    }

    fn facet_value(&self, facet: Facet) -> Option<FacetValue<'_>> {
        match facet {
            Facet::Country => Some(FacetValue::Text(&self.country)),
            Facet::Course => Some(FacetValue::List(&self.courses)),
            Facet::TuitionRange => Some(FacetValue::Number(self.tuition_fee)),
            Facet::Ranking => Some(FacetValue::Number(self.ranking)),
            _ => None,
        }
    }
}

impl Discoverable for Scholarship {
    const FACETS: &'static [Facet] = &[
        Facet::Country,
        Facet::DegreeLevel,
        Facet::ScholarshipType,
        Facet::Amount,
    ];

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.description.as_str(),
            self.country.as_str(),
        ]
    }

    fn facet_value(&self, facet: Facet) -> Option<FacetValue<'_>> {
        match facet {
            Facet::Country => Some(FacetValue::Text(&self.country)),
            Facet::DegreeLevel => Some(FacetValue::Text(&self.degree_level)),
            Facet::ScholarshipType => Some(FacetValue::Text(&self.kind)),
            Facet::Amount => Some(FacetValue::Number(self.amount)),
            _ => None,
        }
    }
}

/// How a selected facet value is compared against a record field.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    /// Field equals the selected value exactly.
    Exact(String),
    /// Lower-cased selected value is a substring of the field (or any list entry).
    Contains(String),
    /// Case-insensitive equality.
    EqIgnoreCase(String),
    Range(RangeToken),
    /// Unparseable selection; nothing passes.
    Never,
}

impl Predicate {
    fn compile(facet: Facet, value: &str) -> Self {
        match facet {
            Facet::Country => Self::Exact(value.to_string()),
            Facet::Course | Facet::DegreeLevel => Self::Contains(value.to_lowercase()),
            Facet::ScholarshipType => Self::EqIgnoreCase(value.to_lowercase()),
            Facet::TuitionRange | Facet::Ranking | Facet::Amount => {
                match value.parse::<RangeToken>() {
                    Ok(range) => Self::Range(range),
                    Err(err) => {
                        warn!(
                            facet = %facet,
                            value,
                            error = %err,
                            "ignoring malformed range filter"
                        );
                        Self::Never
                    }
                }
            }
        }
    }

    fn matches(&self, field: FacetValue<'_>) -> bool {
        match (self, field) {
            (Self::Exact(expected), FacetValue::Text(actual)) => actual == expected.as_str(),
            (Self::Contains(needle), FacetValue::Text(actual)) => {
                actual.to_lowercase().contains(needle.as_str())
            }
            (Self::Contains(needle), FacetValue::List(entries)) => entries
                .iter()
                .any(|entry| entry.to_lowercase().contains(needle.as_str())),
            (Self::EqIgnoreCase(expected), FacetValue::Text(actual)) => {
                actual.to_lowercase() == *expected
            }
            (Self::Range(range), FacetValue::Number(actual)) => range.contains(actual),
            _ => false,
        }
    }
}

/// Filter state compiled for one catalog, reusable across records.
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    needle: Option<String>,
    predicates: Vec<(Facet, Predicate)>,
}

impl CompiledFilter {
    pub fn new<T: Discoverable>(state: &FilterState) -> Self {
        let needle = if state.query().is_empty() {
            None
        } else {
            Some(state.query().to_lowercase())
        };

        let predicates = state
            .filters()
            .iter()
            .filter(|(facet, _)| T::FACETS.contains(facet))
            .map(|(facet, value)| (*facet, Predicate::compile(*facet, value)))
            .collect();

        Self { needle, predicates }
    }

    pub fn matches<T: Discoverable>(&self, record: &T) -> bool {
        if let Some(needle) = &self.needle {
            let found = record
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(needle.as_str()));
            if !found {
                return false;
            }
        }

        self.predicates.iter().all(|(facet, predicate)| {
            record
                .facet_value(*facet)
                .is_some_and(|field| predicate.matches(field))
        })
    }
}

/// Records matching the query and every active facet, in catalog order.
pub fn filter_catalog<'a, T: Discoverable>(records: &'a [T], state: &FilterState) -> Vec<&'a T> {
    let compiled = CompiledFilter::new::<T>(state);
    records
        .iter()
        .filter(|record| compiled.matches(*record))
        .collect()
}

/// Same as [`filter_catalog`] over an existing view.
pub fn refine<'a, T: Discoverable>(records: &[&'a T], state: &FilterState) -> Vec<&'a T> {
    let compiled = CompiledFilter::new::<T>(state);
    records
        .iter()
        .copied()
        .filter(|record| compiled.matches(*record))
        .collect()
}

/// Active range facets of `T` whose values do not parse.
pub fn range_warnings<T: Discoverable>(state: &FilterState) -> Vec<(Facet, RangeTokenError)> {
    state
        .filters()
        .iter()
        .filter(|(facet, _)| facet.is_range() && T::FACETS.contains(facet))
        .filter_map(|(facet, value)| {
            value
                .parse::<RangeToken>()
                .err()
                .map(|err| (*facet, err))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn university(id: u32, name: &str, country: &str, tuition_fee: u32) -> University {
        University {
            id,
            name: name.to_string(),
            country: country.to_string(),
            city: "Springfield".to_string(),
            state: "Illinois".to_string(),
            description: "A public research university".to_string(),
            courses: vec!["Engineering".to_string(), "Business".to_string()],
            tuition_fee,
            ranking: id * 10,
            admission_rate: 50.0,
            student_count: None,
            established_year: None,
            image: None,
            logo: None,
        }
    }

    fn scholarship(id: u32, description: &str, degree_level: &str, kind: &str) -> Scholarship {
        Scholarship {
            id,
            name: format!("Scholarship {id}"),
            country: "uk".to_string(),
            description: description.to_string(),
            degree_level: degree_level.to_string(),
            kind: kind.to_string(),
            amount: 30_000,
            deadline: NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
            applicants: 100,
            awards: 10,
            benefits: Vec::new(),
            image: None,
        }
    }

    #[test]
    fn empty_state_keeps_everything_in_order() {
        let records = vec![
            university(1, "Alpha", "usa", 10_000),
            university(2, "Beta", "uk", 20_000),
        ];
        let view = filter_catalog(&records, &FilterState::new());
        let ids: Vec<u32> = view.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn empty_catalog_yields_empty_view() {
        let records: Vec<University> = Vec::new();
        let state = FilterState::new().with_query("anything");
        assert!(filter_catalog(&records, &state).is_empty());
    }

    #[test]
    fn query_matches_any_search_field_case_insensitively() {
        let records = vec![
            scholarship(1, "Engineering Excellence Award", "Graduate", "Full Funding"),
            scholarship(2, "Arts bursary", "Graduate", "Full Funding"),
        ];
        let state = FilterState::new().with_query("engineering");
        let view = filter_catalog(&records, &state);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id, 1);
    }

    #[test]
    fn tuition_range_is_inclusive_and_excludes_outside_values() {
        let records = vec![
            university(1, "Pricey", "usa", 45_000),
            university(2, "Moderate", "usa", 35_000),
            university(3, "Edge", "usa", 40_000),
        ];
        let state = FilterState::new().with_filter(Facet::TuitionRange, "20000-40000");
        let ids: Vec<u32> = filter_catalog(&records, &state)
            .iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn open_range_has_no_upper_bound() {
        let records = vec![
            university(1, "Pricey", "usa", 65_000),
            university(2, "Moderate", "usa", 35_000),
        ];
        let state = FilterState::new().with_filter(Facet::TuitionRange, "60000+");
        let view = filter_catalog(&records, &state);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id, 1);
    }

    #[test]
    fn malformed_range_matches_nothing() {
        let records = vec![university(1, "Alpha", "usa", 10_000)];
        let state = FilterState::new().with_filter(Facet::TuitionRange, "cheap");
        assert!(filter_catalog(&records, &state).is_empty());
        assert_eq!(range_warnings::<University>(&state).len(), 1);
        assert!(range_warnings::<Scholarship>(&state).is_empty());
    }

    #[test]
    fn course_matches_substring_of_any_offered_program() {
        let mut records = vec![
            university(1, "Alpha", "usa", 10_000),
            university(2, "Beta", "usa", 10_000),
        ];
        records[1].courses = vec!["Medicine".to_string()];
        let state = FilterState::new().with_filter(Facet::Course, "ENGINEER");
        let view = filter_catalog(&records, &state);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id, 1);
    }

    #[test]
    fn scholarship_facets_follow_their_match_rules() {
        let records = vec![
            scholarship(1, "A", "Graduate, PhD", "Full Funding"),
            scholarship(2, "B", "Undergraduate", "Partial Funding"),
            scholarship(3, "C", "PhD", "full funding"),
        ];

        let by_level = FilterState::new().with_filter(Facet::DegreeLevel, "phd");
        let ids: Vec<u32> = filter_catalog(&records, &by_level)
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);

        let by_type = FilterState::new().with_filter(Facet::ScholarshipType, "Full Funding");
        let ids: Vec<u32> = filter_catalog(&records, &by_type)
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);

        // "funding" is a substring of both types but type matching is exact
        let partial = FilterState::new().with_filter(Facet::ScholarshipType, "funding");
        assert!(filter_catalog(&records, &partial).is_empty());
    }

    #[test]
    fn facets_from_other_catalogs_are_ignored() {
        let records = vec![scholarship(1, "A", "Graduate", "Stipend")];
        let state = FilterState::new()
            .with_filter(Facet::Course, "medicine")
            .with_filter(Facet::TuitionRange, "0-1");
        assert_eq!(filter_catalog(&records, &state).len(), 1);
    }

    #[test]
    fn country_is_exact_match() {
        let records = vec![
            university(1, "Alpha", "usa", 10_000),
            university(2, "Beta", "USA", 10_000),
        ];
        let state = FilterState::new().with_filter(Facet::Country, "usa");
        let view = filter_catalog(&records, &state);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id, 1);
    }
}
