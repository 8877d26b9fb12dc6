use crate::infra::{
    load_catalog, parse_scholarship_sort, parse_university_sort, CatalogSourceArgs,
};
use campus_compass::applications::{
    ApplicationForm, ScholarshipApplication, UniversityApplication, ValidationErrorMap,
};
use campus_compass::catalog::{CatalogStore, CourseCategory, Scholarship, University};
use campus_compass::config::AppConfig;
use campus_compass::discovery::{
    DiscoveryService, Facet, FilterState, Listing, ScholarshipSort, UniversitySort,
};
use campus_compass::error::AppError;
use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct UniversityArgs {
    /// Free-text search over name, city, state, and description
    #[arg(short, long)]
    pub(crate) query: Option<String>,
    /// Country id, e.g. `uk` or `canada`
    #[arg(long)]
    pub(crate) country: Option<String>,
    /// Course name fragment, e.g. `engineering`
    #[arg(long)]
    pub(crate) course: Option<String>,
    /// Annual tuition range: `min-max`, `min+`, or `min`
    #[arg(long)]
    pub(crate) tuition_range: Option<String>,
    /// World ranking range: `min-max`, `min+`, or `min`
    #[arg(long)]
    pub(crate) ranking: Option<String>,
    /// Sort key
    #[arg(long, default_value = "ranking", value_parser = parse_university_sort)]
    pub(crate) sort: UniversitySort,
    #[command(flatten)]
    pub(crate) sources: CatalogSourceArgs,
    /// Print the listing as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

impl UniversityArgs {
    fn filter_state(&self) -> FilterState {
        let mut state = FilterState::new();
        state.set_query(self.query.clone().unwrap_or_default());
        for (facet, value) in [
            (Facet::Country, &self.country),
            (Facet::Course, &self.course),
            (Facet::TuitionRange, &self.tuition_range),
            (Facet::Ranking, &self.ranking),
        ] {
            if let Some(value) = value {
                state.set_filter(facet, value.clone());
            }
        }
        state
    }
}

#[derive(Args, Debug)]
pub(crate) struct ScholarshipArgs {
    /// Free-text search over name, description, and country
    #[arg(short, long)]
    pub(crate) query: Option<String>,
    /// Country id, e.g. `germany`
    #[arg(long)]
    pub(crate) country: Option<String>,
    /// Degree level fragment, e.g. `graduate` or `phd`
    #[arg(long)]
    pub(crate) degree_level: Option<String>,
    /// Scholarship type, e.g. `Full Funding`
    #[arg(long = "type")]
    pub(crate) scholarship_type: Option<String>,
    /// Award amount range: `min-max`, `min+`, or `min`
    #[arg(long)]
    pub(crate) amount: Option<String>,
    /// Sort key
    #[arg(long, default_value = "deadline", value_parser = parse_scholarship_sort)]
    pub(crate) sort: ScholarshipSort,
    #[command(flatten)]
    pub(crate) sources: CatalogSourceArgs,
    /// Print the listing as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

impl ScholarshipArgs {
    fn filter_state(&self) -> FilterState {
        let mut state = FilterState::new();
        state.set_query(self.query.clone().unwrap_or_default());
        for (facet, value) in [
            (Facet::Country, &self.country),
            (Facet::DegreeLevel, &self.degree_level),
            (Facet::ScholarshipType, &self.scholarship_type),
            (Facet::Amount, &self.amount),
        ] {
            if let Some(value) = value {
                state.set_filter(facet, value.clone());
            }
        }
        state
    }
}

#[derive(Args, Debug)]
pub(crate) struct CoursesArgs {
    /// Category id to show in detail, e.g. `engineering`
    pub(crate) category: Option<String>,
    /// Subcategory id within the category
    pub(crate) subcategory: Option<String>,
    #[command(flatten)]
    pub(crate) sources: CatalogSourceArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum FormKind {
    University,
    Scholarship,
}

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Which application form the file holds
    #[arg(value_enum)]
    pub(crate) form: FormKind,
    /// Path to the form as camelCase JSON
    pub(crate) path: PathBuf,
}

fn load_store(sources: CatalogSourceArgs) -> Result<CatalogStore, AppError> {
    let config = AppConfig::load()?;
    Ok(load_catalog(&config.catalog, sources)?)
}

pub(crate) fn run_universities(args: UniversityArgs) -> Result<(), AppError> {
    let state = args.filter_state();
    let service = DiscoveryService::new(load_store(args.sources.clone())?);
    let listing = service.universities(&state, args.sort);

    if args.json {
        println!("{}", to_json(&listing)?);
    } else {
        let heading = university_heading(service.catalog(), &state);
        print!("{}", render_university_listing(&heading, &listing));
    }
    Ok(())
}

pub(crate) fn run_scholarships(args: ScholarshipArgs) -> Result<(), AppError> {
    let state = args.filter_state();
    let service = DiscoveryService::new(load_store(args.sources.clone())?);
    let listing = service.scholarships(&state, args.sort);

    if args.json {
        println!("{}", to_json(&listing)?);
    } else {
        let today = Local::now().date_naive();
        print!("{}", render_scholarship_listing(&listing, today));
    }
    Ok(())
}

pub(crate) fn run_courses(args: CoursesArgs) -> Result<(), AppError> {
    let store = load_store(args.sources)?;

    let Some(category_id) = args.category else {
        print!("{}", render_course_index(store.course_categories()));
        return Ok(());
    };

    match store.course_category(&category_id) {
        Some(category) => print!(
            "{}",
            render_course_category(category, args.subcategory.as_deref())
        ),
        None => println!("Category Not Found: no course category with id '{category_id}'"),
    }
    Ok(())
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.path)?;
    let errors = match args.form {
        FormKind::University => validate_json::<UniversityApplication>(&raw)?,
        FormKind::Scholarship => validate_json::<ScholarshipApplication>(&raw)?,
    };
    print!("{}", render_validation(&errors));
    Ok(())
}

fn validate_json<F>(raw: &str) -> Result<ValidationErrorMap, std::io::Error>
where
    F: ApplicationForm + serde::de::DeserializeOwned,
{
    let form: F = serde_json::from_str(raw).map_err(std::io::Error::from)?;
    Ok(F::rules().validate(&form))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, std::io::Error> {
    serde_json::to_string_pretty(value).map_err(std::io::Error::from)
}

/// "Universities in United Kingdom" when a known country is selected.
fn university_heading(store: &CatalogStore, state: &FilterState) -> String {
    state
        .filter(Facet::Country)
        .and_then(|id| store.country(id))
        .map(|country| format!("Universities in {}", country.name))
        .unwrap_or_else(|| "Universities".to_string())
}

pub(crate) fn format_amount(amount: u32) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("${grouped}")
}

fn render_header<T>(heading: &str, listing: &Listing<'_, T>) -> String {
    let mut out = format!("{heading} ({} found)\n", listing.total);
    out.push_str(&format!("Sorted by: {}\n", listing.sort_label));
    if let Some(query) = &listing.query {
        out.push_str(&format!("Search: \"{query}\"\n"));
    }
    if !listing.active_filters.is_empty() {
        let filters: Vec<String> = listing
            .active_filters
            .iter()
            .map(|filter| format!("{}: {}", filter.label, filter.value))
            .collect();
        out.push_str(&format!("Active filters: {}\n", filters.join(", ")));
    }
    for warning in &listing.warnings {
        out.push_str(&format!("warning: {warning}\n"));
    }
    if let Some(empty) = &listing.empty_state {
        out.push_str(&format!(
            "\n{}\n{}\nClear all filters to start over.\n",
            empty.title, empty.message
        ));
    }
    out
}

pub(crate) fn render_university_listing(
    heading: &str,
    listing: &Listing<'_, University>,
) -> String {
    let mut out = render_header(heading, listing);
    for university in &listing.items {
        out.push_str(&format!(
            "\n#{} {}\n  {}, {} | tuition {}/yr | admission {:.1}%",
            university.ranking,
            university.name,
            university.city,
            university.state,
            format_amount(university.tuition_fee),
            university.admission_rate,
        ));
        if let Some(students) = university.student_count {
            out.push_str(&format!(" | {students} students"));
        }
        out.push('\n');
        if !university.courses.is_empty() {
            out.push_str(&format!("  courses: {}\n", university.courses.join(", ")));
        }
    }
    out
}

pub(crate) fn render_scholarship_listing(
    listing: &Listing<'_, Scholarship>,
    today: NaiveDate,
) -> String {
    let mut out = render_header("Scholarships", listing);
    for scholarship in &listing.items {
        let days_left = (scholarship.deadline - today).num_days();
        let deadline = if days_left < 0 {
            "closed".to_string()
        } else {
            format!("{days_left} days left")
        };
        let success = scholarship
            .success_rate()
            .map(|rate| format!("{:.1}% success", rate * 100.0))
            .unwrap_or_else(|| "no applicants yet".to_string());

        out.push_str(&format!(
            "\n{}\n  {} | {} | {} | {}\n  deadline {} ({deadline}) | {success}\n",
            scholarship.name,
            format_amount(scholarship.amount),
            scholarship.kind,
            scholarship.degree_level,
            scholarship.country,
            scholarship.deadline.format("%b %-d, %Y"),
        ));
    }
    out
}

pub(crate) fn render_course_index(categories: &[CourseCategory]) -> String {
    let mut out = format!("Course categories ({})\n", categories.len());
    for category in categories {
        out.push_str(&format!(
            "- {} [{}]: {} subcategories\n",
            category.name,
            category.id,
            category.subcategories.len()
        ));
    }
    out
}

pub(crate) fn render_course_category(
    category: &CourseCategory,
    subcategory: Option<&str>,
) -> String {
    if let Some(sub_id) = subcategory {
        return match category.subcategory(sub_id) {
            Some(sub) => format!("{} > {}\n{}\n", category.name, sub.name, sub.description),
            None => format!(
                "Category Not Found: '{}' has no subcategory '{sub_id}'\n",
                category.name
            ),
        };
    }

    let mut out = format!("{}\n{}\n", category.name, category.description);
    for sub in &category.subcategories {
        out.push_str(&format!("- {} [{}]\n", sub.name, sub.id));
    }
    if !category.career_opportunities.is_empty() {
        out.push_str(&format!(
            "Careers: {}\n",
            category.career_opportunities.join(", ")
        ));
    }
    out
}

pub(crate) fn render_validation(errors: &ValidationErrorMap) -> String {
    if errors.is_empty() {
        return "Form is valid.\n".to_string();
    }

    let mut out = format!("{} field(s) need attention:\n", errors.len());
    for (field, message) in errors {
        out.push_str(&format!("- {field}: {message}\n"));
    }
    out
}
