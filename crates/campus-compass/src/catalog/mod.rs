//! Static catalogs of universities, scholarships, course categories, and countries.

pub mod domain;
mod loader;
mod store;

pub use domain::{
    CatalogKind, CatalogRecord, Country, CourseCategory, CourseSubcategory, RecordSummary,
    Scholarship, University, UnknownCatalogKind,
};
pub use loader::{parse_scholarship_csv, parse_university_csv, CatalogLoadError};
pub use store::CatalogStore;
