use super::filter::{filter_catalog, range_warnings, Discoverable};
use super::sort::{sort_records, SortKey, Sortable};
use super::state::{ActiveFilter, FilterState};
use serde::Serialize;

/// Recovery offered when nothing matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub title: String,
    pub message: &'static str,
    pub action: &'static str,
}

/// One rendered listing: the filtered and sorted view plus what produced it.
#[derive(Debug, Clone, Serialize)]
pub struct Listing<'a, T> {
    pub total: usize,
    pub sorted_by: &'static str,
    pub sort_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub active_filters: Vec<ActiveFilter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_state: Option<EmptyState>,
    pub items: Vec<&'a T>,
}

/// Filter then sort one catalog against a state snapshot.
pub fn build_listing<'a, T>(
    records: &'a [T],
    state: &FilterState,
    sort: T::Key,
    noun: &str,
) -> Listing<'a, T>
where
    T: Discoverable + Sortable,
{
    let filtered = filter_catalog(records, state);
    let items = sort_records(&filtered, sort);

    let warnings = range_warnings::<T>(state)
        .into_iter()
        .map(|(facet, err)| format!("{}: {err}", facet.label()))
        .collect();

    let empty_state = items.is_empty().then(|| EmptyState {
        title: format!("No {noun} found"),
        message: "Try adjusting your search criteria or filters.",
        action: "clear_filters",
    });

    Listing {
        total: items.len(),
        sorted_by: sort.key(),
        sort_label: sort.label(),
        query: (!state.query().is_empty()).then(|| state.query().to_string()),
        active_filters: state.active_filters(T::FACETS),
        warnings,
        empty_state,
        items,
    }
}
