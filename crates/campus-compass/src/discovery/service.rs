use super::listing::{build_listing, Listing};
use super::session::{FilterSession, FilterSnapshot, SessionError, SessionId, SessionRegistry};
use super::sort::{ScholarshipSort, UniversitySort};
use super::state::FilterState;
use crate::catalog::{CatalogKind, CatalogStore, RecordSummary, Scholarship, University};
use tracing::debug;

/// Catalog browsing backed by the immutable store and the live browsing sessions.
#[derive(Debug, Clone)]
pub struct DiscoveryService {
    catalog: CatalogStore,
    sessions: SessionRegistry,
}

impl DiscoveryService {
    pub fn new(catalog: CatalogStore) -> Self {
        Self::with_sessions(catalog, SessionRegistry::default())
    }

    pub fn with_sessions(catalog: CatalogStore, sessions: SessionRegistry) -> Self {
        Self { catalog, sessions }
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Id and name of every record in one catalog, in catalog order.
    pub fn index(&self, kind: CatalogKind) -> Vec<RecordSummary<'_>> {
        self.catalog
            .records(kind)
            .iter()
            .map(|record| record.summary())
            .collect()
    }

    pub fn universities(
        &self,
        state: &FilterState,
        sort: UniversitySort,
    ) -> Listing<'_, University> {
        let listing = build_listing(self.catalog.universities(), state, sort, "universities");
        debug!(
            total = listing.total,
            sort = %sort,
            filters = state.filters().len(),
            "university listing built"
        );
        listing
    }

    pub fn scholarships(
        &self,
        state: &FilterState,
        sort: ScholarshipSort,
    ) -> Listing<'_, Scholarship> {
        let listing = build_listing(self.catalog.scholarships(), state, sort, "scholarships");
        debug!(
            total = listing.total,
            sort = %sort,
            filters = state.filters().len(),
            "scholarship listing built"
        );
        listing
    }

    pub fn open_session(&self) -> (SessionId, FilterSnapshot) {
        let (id, session) = self.sessions.open();
        (id, session.snapshot())
    }

    pub fn session(&self, id: &SessionId) -> Result<FilterSession, SessionError> {
        self.sessions.get(id)
    }

    pub fn close_session(&self, id: &SessionId) -> Result<(), SessionError> {
        self.sessions.close(id)
    }

    /// University listing for the session's latest filter state.
    pub fn session_universities(
        &self,
        id: &SessionId,
        sort: UniversitySort,
    ) -> Result<Listing<'_, University>, SessionError> {
        let snapshot = self.sessions.get(id)?.snapshot();
        Ok(self.universities(&snapshot.state, sort))
    }

    /// Scholarship listing for the session's latest filter state.
    pub fn session_scholarships(
        &self,
        id: &SessionId,
        sort: ScholarshipSort,
    ) -> Result<Listing<'_, Scholarship>, SessionError> {
        let snapshot = self.sessions.get(id)?.snapshot();
        Ok(self.scholarships(&snapshot.state, sort))
    }
}
