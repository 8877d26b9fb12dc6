//! Catalog discovery and application intake for an international education
//! consultancy: universities, scholarships, courses, and countries, with
//! faceted search, sorting, shared filter sessions, and validated application
//! forms.

pub mod applications;
pub mod catalog;
pub mod config;
pub mod discovery;
pub mod error;
pub mod telemetry;

pub use error::AppError;
