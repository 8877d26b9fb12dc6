use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A university listed on the universities page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct University {
    pub id: u32,
    pub name: String,
    /// Country id, matching [`Country::id`].
    pub country: String,
    pub city: String,
    #[serde(default)]
    pub state: String,
    pub description: String,
    #[serde(default)]
    pub courses: Vec<String>,
    pub tuition_fee: u32,
    pub ranking: u32,
    /// Percentage of applicants admitted.
    pub admission_rate: f64,
    #[serde(default)]
    pub student_count: Option<u32>,
    #[serde(default)]
    pub established_year: Option<u16>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
}

/// A scholarship listed on the scholarships page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scholarship {
    pub id: u32,
    pub name: String,
    pub country: String,
    pub description: String,
    /// Free text such as "Graduate, PhD".
    pub degree_level: String,
    /// Funding type, e.g. "Full Funding".
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: u32,
    pub deadline: NaiveDate,
    pub applicants: u32,
    pub awards: u32,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Scholarship {
    /// Awards divided by applicants. `None` when nobody applied.
    pub fn success_rate(&self) -> Option<f64> {
        if self.applicants == 0 {
            None
        } else {
            Some(f64::from(self.awards) / f64::from(self.applicants))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseCategory {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub career_opportunities: Vec<String>,
    #[serde(default)]
    pub top_universities: Vec<String>,
    #[serde(default)]
    pub admission_process: Vec<String>,
    #[serde(default)]
    pub subcategories: Vec<CourseSubcategory>,
}

impl CourseCategory {
    pub fn subcategory(&self, id: &str) -> Option<&CourseSubcategory> {
        self.subcategories.iter().find(|sub| sub.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSubcategory {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub flag: Option<String>,
    pub description: String,
    #[serde(default)]
    pub university_count: Option<u32>,
    #[serde(default)]
    pub average_tuition: Option<String>,
    #[serde(default)]
    pub study_duration: Option<String>,
    #[serde(default)]
    pub popular_courses: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Borrowed view over a record of any catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CatalogRecord<'a> {
    University(&'a University),
    Scholarship(&'a Scholarship),
    CourseCategory(&'a CourseCategory),
    Country(&'a Country),
}

impl<'a> CatalogRecord<'a> {
    pub fn id(&self) -> String {
        match self {
            Self::University(record) => record.id.to_string(),
            Self::Scholarship(record) => record.id.to_string(),
            Self::CourseCategory(record) => record.id.clone(),
            Self::Country(record) => record.id.clone(),
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            Self::University(record) => &record.name,
            Self::Scholarship(record) => &record.name,
            Self::CourseCategory(record) => &record.name,
            Self::Country(record) => &record.name,
        }
    }

    pub const fn kind(&self) -> CatalogKind {
        match self {
            Self::University(_) => CatalogKind::Universities,
            Self::Scholarship(_) => CatalogKind::Scholarships,
            Self::CourseCategory(_) => CatalogKind::Courses,
            Self::Country(_) => CatalogKind::Countries,
        }
    }

    pub fn summary(&self) -> RecordSummary<'a> {
        RecordSummary {
            kind: self.kind(),
            id: self.id(),
            name: self.name(),
        }
    }
}

/// Index entry naming one record of a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSummary<'a> {
    pub kind: CatalogKind,
    pub id: String,
    pub name: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Universities,
    Scholarships,
    Courses,
    Countries,
}

impl CatalogKind {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Universities,
            Self::Scholarships,
            Self::Courses,
            Self::Countries,
        ]
    }

    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Universities => "universities.json",
            Self::Scholarships => "scholarships.json",
            Self::Courses => "courses.json",
            Self::Countries => "countries.json",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Universities => "universities",
            Self::Scholarships => "scholarships",
            Self::Courses => "course categories",
            Self::Countries => "countries",
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::Universities => "universities",
            Self::Scholarships => "scholarships",
            Self::Courses => "courses",
            Self::Countries => "countries",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown catalog '{0}'")]
pub struct UnknownCatalogKind(pub String);

impl FromStr for CatalogKind {
    type Err = UnknownCatalogKind;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|kind| kind.slug() == normalized)
            .ok_or_else(|| UnknownCatalogKind(raw.to_string()))
    }
}
