//! Search, faceted filtering, and sorting over the catalogs, plus shared
//! per-session filter state.

pub mod filter;
pub mod listing;
pub mod range;
pub mod router;
pub mod service;
pub mod session;
pub mod sort;
pub mod state;

#[cfg(test)]
mod tests;

pub use filter::{filter_catalog, range_warnings, refine, CompiledFilter, Discoverable, FacetValue};
pub use listing::{build_listing, EmptyState, Listing};
pub use range::{RangeToken, RangeTokenError};
pub use router::{discovery_router, DiscoveryError};
pub use service::DiscoveryService;
pub use session::{
    FilterSession, FilterSnapshot, SessionError, SessionId, SessionRegistry,
    DEFAULT_SESSION_IDLE_TTL,
};
pub use sort::{
    sort_records, ScholarshipSort, SortDirection, SortKey, SortValue, Sortable, UniversitySort,
    UnknownSortKey,
};
pub use state::{ActiveFilter, Facet, FilterState, UnknownFacet};
