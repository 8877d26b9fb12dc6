use super::domain::{CatalogKind, Country, CourseCategory, Scholarship, University};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Failure while reading a catalog from disk or from an import.
#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("unable to read {kind} catalog at {path}: {source}")]
    Io {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed {kind} catalog: {source}")]
    Json {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed {kind} import: {source}")]
    Csv {
        kind: &'static str,
        #[source]
        source: csv::Error,
    },
    #[error("duplicate id '{id}' in {kind} catalog")]
    DuplicateId { kind: &'static str, id: String },
}

#[derive(Debug, Deserialize)]
struct CourseFile {
    categories: Vec<CourseCategory>,
}

pub(crate) fn read_json_file<T>(dir: &Path, kind: CatalogKind) -> Result<T, CatalogLoadError>
where
    T: DeserializeOwned,
{
    let path = dir.join(kind.file_name());
    let file = File::open(&path).map_err(|source| CatalogLoadError::Io {
        kind: kind.label(),
        path: path.clone(),
        source,
    })?;
    parse_json(BufReader::new(file), kind)
}

pub(crate) fn parse_json<T, R>(reader: R, kind: CatalogKind) -> Result<T, CatalogLoadError>
where
    T: DeserializeOwned,
    R: Read,
{
    serde_json::from_reader(reader).map_err(|source| CatalogLoadError::Json {
        kind: kind.label(),
        source,
    })
}

pub(crate) fn parse_course_categories<R: Read>(
    reader: R,
) -> Result<Vec<CourseCategory>, CatalogLoadError> {
    let file: CourseFile = parse_json(reader, CatalogKind::Courses)?;
    Ok(file.categories)
}

pub(crate) fn read_course_categories(dir: &Path) -> Result<Vec<CourseCategory>, CatalogLoadError> {
    let file: CourseFile = read_json_file(dir, CatalogKind::Courses)?;
    Ok(file.categories)
}

pub(crate) fn read_countries(dir: &Path) -> Result<Vec<Country>, CatalogLoadError> {
    read_json_file(dir, CatalogKind::Countries)
}

pub(crate) fn open_csv(path: &Path, kind: CatalogKind) -> Result<BufReader<File>, CatalogLoadError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| CatalogLoadError::Io {
            kind: kind.label(),
            path: path.to_path_buf(),
            source,
        })
}

/// Parse a spreadsheet export of universities. The `courses` column is `;`-separated.
pub fn parse_university_csv<R: Read>(reader: R) -> Result<Vec<University>, CatalogLoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut universities = Vec::new();

    for row in csv_reader.deserialize::<UniversityRow>() {
        let row = row.map_err(|source| CatalogLoadError::Csv {
            kind: CatalogKind::Universities.label(),
            source,
        })?;
        universities.push(row.into_university());
    }

    Ok(universities)
}

/// Parse a spreadsheet export of scholarships. The `benefits` column is `;`-separated.
pub fn parse_scholarship_csv<R: Read>(reader: R) -> Result<Vec<Scholarship>, CatalogLoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut scholarships = Vec::new();

    for row in csv_reader.deserialize::<ScholarshipRow>() {
        let row = row.map_err(|source| CatalogLoadError::Csv {
            kind: CatalogKind::Scholarships.label(),
            source,
        })?;
        scholarships.push(row.into_scholarship());
    }

    Ok(scholarships)
}

#[derive(Debug, Deserialize)]
struct UniversityRow {
    id: u32,
    name: String,
    country: String,
    city: String,
    #[serde(default)]
    state: String,
    description: String,
    #[serde(default)]
    courses: String,
    tuition_fee: u32,
    ranking: u32,
    admission_rate: f64,
    #[serde(default)]
    student_count: Option<u32>,
    #[serde(default)]
    established_year: Option<u16>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    image: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    logo: Option<String>,
}

impl UniversityRow {
    fn into_university(self) -> University {
        University {
            id: self.id,
            name: self.name,
            country: self.country,
            city: self.city,
            state: self.state,
            description: self.description,
            courses: split_list(&self.courses),
            tuition_fee: self.tuition_fee,
            ranking: self.ranking,
            admission_rate: self.admission_rate,
            student_count: self.student_count,
            established_year: self.established_year,
            image: self.image,
            logo: self.logo,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScholarshipRow {
    id: u32,
    name: String,
    country: String,
    description: String,
    degree_level: String,
    #[serde(rename = "type")]
    kind: String,
    amount: u32,
    deadline: NaiveDate,
    applicants: u32,
    awards: u32,
    #[serde(default)]
    benefits: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    image: Option<String>,
}

impl ScholarshipRow {
    fn into_scholarship(self) -> Scholarship {
        Scholarship {
            id: self.id,
            name: self.name,
            country: self.country,
            description: self.description,
            degree_level: self.degree_level,
            kind: self.kind,
            amount: self.amount,
            deadline: self.deadline,
            applicants: self.applicants,
            awards: self.awards,
            benefits: split_list(&self.benefits),
            image: self.image,
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn university_csv_splits_course_list() {
        let csv = "id,name,country,city,state,description,courses,tuition_fee,ranking,admission_rate,student_count,established_year,image,logo\n\
                   1,Harbor Tech,usa,Boston,MA,Research university,Engineering; Business ;,52000,12,7.5,,1861,,\n";
        let universities = parse_university_csv(Cursor::new(csv)).expect("csv parses");

        assert_eq!(universities.len(), 1);
        let university = &universities[0];
        assert_eq!(university.courses, vec!["Engineering", "Business"]);
        assert_eq!(university.student_count, None);
        assert_eq!(university.established_year, Some(1861));
        assert_eq!(university.image, None);
    }

    #[test]
    fn scholarship_csv_reports_bad_rows() {
        let csv = "id,name,country,description,degree_level,type,amount,deadline,applicants,awards,benefits,image\n\
                   1,Fulbright,usa,Exchange,Graduate,Full Funding,not-a-number,2025-10-01,10,1,,\n";
        let err = parse_scholarship_csv(Cursor::new(csv)).expect_err("amount is invalid");
        assert!(matches!(err, CatalogLoadError::Csv { kind: "scholarships", .. }));
    }

    #[test]
    fn course_file_reads_categories_array() {
        let raw = r#"{"categories": [{"id": "engineering", "name": "Engineering",
            "description": "Build things", "subcategories": [
            {"id": "civil", "name": "Civil Engineering", "description": "Bridges"}]}]}"#;
        let categories = parse_course_categories(Cursor::new(raw)).expect("courses parse");
        assert_eq!(categories.len(), 1);
        assert!(categories[0].subcategory("civil").is_some());
    }
}
