use super::domain::{CatalogKind, CatalogRecord, Country, CourseCategory, Scholarship, University};
use super::loader::{self, CatalogLoadError};
use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

const BUNDLED_UNIVERSITIES: &str = include_str!("../../data/universities.json");
const BUNDLED_SCHOLARSHIPS: &str = include_str!("../../data/scholarships.json");
const BUNDLED_COURSES: &str = include_str!("../../data/courses.json");
const BUNDLED_COUNTRIES: &str = include_str!("../../data/countries.json");

/// Immutable, in-memory collections loaded once per process.
///
/// Cloning is cheap; every clone shares the same records.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    inner: Arc<Catalogs>,
}

#[derive(Debug, Default)]
struct Catalogs {
    universities: Vec<University>,
    scholarships: Vec<Scholarship>,
    courses: Vec<CourseCategory>,
    countries: Vec<Country>,
}

impl CatalogStore {
    pub fn new(
        universities: Vec<University>,
        scholarships: Vec<Scholarship>,
        courses: Vec<CourseCategory>,
        countries: Vec<Country>,
    ) -> Result<Self, CatalogLoadError> {
        ensure_unique(
            CatalogKind::Universities,
            universities.iter().map(|u| u.id.to_string()),
        )?;
        ensure_unique(
            CatalogKind::Scholarships,
            scholarships.iter().map(|s| s.id.to_string()),
        )?;
        ensure_unique(CatalogKind::Courses, courses.iter().map(|c| c.id.clone()))?;
        ensure_unique(CatalogKind::Countries, countries.iter().map(|c| c.id.clone()))?;

        let store = Self {
            inner: Arc::new(Catalogs {
                universities,
                scholarships,
                courses,
                countries,
            }),
        };

        debug!(
            universities = store.universities().len(),
            scholarships = store.scholarships().len(),
            courses = store.course_categories().len(),
            countries = store.countries().len(),
            "catalog store assembled"
        );

        Ok(store)
    }

    /// Catalog fixtures compiled into the crate.
    pub fn bundled() -> Result<Self, CatalogLoadError> {
        let universities = loader::parse_json(
            Cursor::new(BUNDLED_UNIVERSITIES),
            CatalogKind::Universities,
        )?;
        let scholarships = loader::parse_json(
            Cursor::new(BUNDLED_SCHOLARSHIPS),
            CatalogKind::Scholarships,
        )?;
        let courses = loader::parse_course_categories(Cursor::new(BUNDLED_COURSES))?;
        let countries =
            loader::parse_json(Cursor::new(BUNDLED_COUNTRIES), CatalogKind::Countries)?;

        Self::new(universities, scholarships, courses, countries)
    }

    /// Load the four JSON catalogs from a directory.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, CatalogLoadError> {
        let dir = dir.as_ref();
        let universities = loader::read_json_file(dir, CatalogKind::Universities)?;
        let scholarships = loader::read_json_file(dir, CatalogKind::Scholarships)?;
        let courses = loader::read_course_categories(dir)?;
        let countries = loader::read_countries(dir)?;

        let store = Self::new(universities, scholarships, courses, countries)?;
        info!(path = %dir.display(), "catalog loaded from directory");
        Ok(store)
    }

    /// Replace the university catalog with a CSV import, keeping the rest.
    pub fn with_university_import<R: std::io::Read>(
        &self,
        reader: R,
    ) -> Result<Self, CatalogLoadError> {
        let universities = loader::parse_university_csv(reader)?;
        Self::new(
            universities,
            self.inner.scholarships.clone(),
            self.inner.courses.clone(),
            self.inner.countries.clone(),
        )
    }

    /// Replace the scholarship catalog with a CSV import, keeping the rest.
    pub fn with_scholarship_import<R: std::io::Read>(
        &self,
        reader: R,
    ) -> Result<Self, CatalogLoadError> {
        let scholarships = loader::parse_scholarship_csv(reader)?;
        Self::new(
            self.inner.universities.clone(),
            scholarships,
            self.inner.courses.clone(),
            self.inner.countries.clone(),
        )
    }

    /// Replace the university catalog with a CSV export on disk.
    pub fn with_university_csv(&self, path: impl AsRef<Path>) -> Result<Self, CatalogLoadError> {
        let path = path.as_ref();
        let store =
            self.with_university_import(loader::open_csv(path, CatalogKind::Universities)?)?;
        info!(
            path = %path.display(),
            universities = store.universities().len(),
            "university catalog imported from csv"
        );
        Ok(store)
    }

    /// Replace the scholarship catalog with a CSV export on disk.
    pub fn with_scholarship_csv(&self, path: impl AsRef<Path>) -> Result<Self, CatalogLoadError> {
        let path = path.as_ref();
        let store =
            self.with_scholarship_import(loader::open_csv(path, CatalogKind::Scholarships)?)?;
        info!(
            path = %path.display(),
            scholarships = store.scholarships().len(),
            "scholarship catalog imported from csv"
        );
        Ok(store)
    }

    pub fn universities(&self) -> &[University] {
        &self.inner.universities
    }

    pub fn scholarships(&self) -> &[Scholarship] {
        &self.inner.scholarships
    }

    pub fn course_categories(&self) -> &[CourseCategory] {
        &self.inner.courses
    }

    pub fn countries(&self) -> &[Country] {
        &self.inner.countries
    }

    pub fn university(&self, id: u32) -> Option<&University> {
        self.inner.universities.iter().find(|u| u.id == id)
    }

    pub fn scholarship(&self, id: u32) -> Option<&Scholarship> {
        self.inner.scholarships.iter().find(|s| s.id == id)
    }

    pub fn country(&self, id: &str) -> Option<&Country> {
        self.inner.countries.iter().find(|c| c.id == id)
    }

    pub fn course_category(&self, id: &str) -> Option<&CourseCategory> {
        self.inner.courses.iter().find(|c| c.id == id)
    }

    /// Every record of one catalog, in catalog order.
    pub fn records(&self, kind: CatalogKind) -> Vec<CatalogRecord<'_>> {
        match kind {
            CatalogKind::Universities => self
                .universities()
                .iter()
                .map(CatalogRecord::University)
                .collect(),
            CatalogKind::Scholarships => self
                .scholarships()
                .iter()
                .map(CatalogRecord::Scholarship)
                .collect(),
            CatalogKind::Courses => self
                .course_categories()
                .iter()
                .map(CatalogRecord::CourseCategory)
                .collect(),
            CatalogKind::Countries => self
                .countries()
                .iter()
                .map(CatalogRecord::Country)
                .collect(),
        }
    }
}

fn ensure_unique<I>(kind: CatalogKind, ids: I) -> Result<(), CatalogLoadError>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id.clone()) {
            return Err(CatalogLoadError::DuplicateId {
                kind: kind.label(),
                id,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_catalogs_load() {
        let store = CatalogStore::bundled().expect("bundled fixtures parse");
        assert!(!store.universities().is_empty());
        assert!(!store.scholarships().is_empty());
        assert!(!store.course_categories().is_empty());
        assert!(!store.countries().is_empty());

        for university in store.universities() {
            assert!(
                store.country(&university.country).is_some(),
                "university {} references unknown country {}",
                university.name,
                university.country
            );
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let store = CatalogStore::bundled().expect("bundled fixtures parse");
        let mut universities = store.universities().to_vec();
        universities.push(universities[0].clone());

        let err = CatalogStore::new(
            universities,
            store.scholarships().to_vec(),
            store.course_categories().to_vec(),
            store.countries().to_vec(),
        )
        .expect_err("duplicate id rejected");

        assert!(matches!(err, CatalogLoadError::DuplicateId { kind: "universities", .. }));
    }

    #[test]
    fn lookups_resolve_by_id() {
        let store = CatalogStore::bundled().expect("bundled fixtures parse");
        let category = store
            .course_category("engineering")
            .expect("engineering category bundled");
        assert!(category.subcategory("computer-science").is_some());
        assert!(store.course_category("astrology").is_none());
        assert!(store.university(u32::MAX).is_none());

        let records = store.records(CatalogKind::Countries);
        assert_eq!(records.len(), store.countries().len());
        assert_eq!(records[0].kind(), CatalogKind::Countries);
    }

    #[test]
    fn missing_directory_reports_io_error() {
        let err = CatalogStore::from_dir("/definitely/not/a/catalog/dir")
            .expect_err("missing directory fails");
        assert!(matches!(err, CatalogLoadError::Io { kind: "universities", .. }));
    }
}
