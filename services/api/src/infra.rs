use campus_compass::applications::SimulatedSubmission;
use campus_compass::catalog::{CatalogLoadError, CatalogStore};
use campus_compass::config::{CatalogConfig, SubmissionConfig};
use campus_compass::discovery::{ScholarshipSort, UniversitySort};
use clap::Args;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Catalog source flags shared by every subcommand. Each flag wins over its env var.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct CatalogSourceArgs {
    /// Load catalogs from this directory instead of APP_CATALOG_DIR
    #[arg(long)]
    pub(crate) catalog_dir: Option<PathBuf>,
    /// Replace the universities with this CSV export instead of APP_UNIVERSITIES_CSV
    #[arg(long)]
    pub(crate) universities_csv: Option<PathBuf>,
    /// Replace the scholarships with this CSV export instead of APP_SCHOLARSHIPS_CSV
    #[arg(long)]
    pub(crate) scholarships_csv: Option<PathBuf>,
}

impl CatalogSourceArgs {
    pub(crate) fn over(self, config: &CatalogConfig) -> CatalogConfig {
        CatalogConfig {
            dir: self.catalog_dir.or_else(|| config.dir.clone()),
            universities_csv: self
                .universities_csv
                .or_else(|| config.universities_csv.clone()),
            scholarships_csv: self
                .scholarships_csv
                .or_else(|| config.scholarships_csv.clone()),
        }
    }
}

pub(crate) fn load_catalog(
    config: &CatalogConfig,
    sources: CatalogSourceArgs,
) -> Result<CatalogStore, CatalogLoadError> {
    sources.over(config).load_store()
}

pub(crate) fn simulated_executor(config: &SubmissionConfig) -> Arc<SimulatedSubmission> {
    Arc::new(SimulatedSubmission::new(config.delay))
}

pub(crate) fn parse_university_sort(raw: &str) -> Result<UniversitySort, String> {
    raw.parse::<UniversitySort>().map_err(|err| {
        format!("{err}; expected one of ranking, name, tuition-low, tuition-high, admission-rate")
    })
}

pub(crate) fn parse_scholarship_sort(raw: &str) -> Result<ScholarshipSort, String> {
    raw.parse::<ScholarshipSort>().map_err(|err| {
        format!("{err}; expected one of deadline, name, amount-high, amount-low, success-rate")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn sort_parsers_explain_the_choices() {
        assert_eq!(
            parse_university_sort("tuition-high"),
            Ok(UniversitySort::TuitionHigh)
        );
        let error = parse_scholarship_sort("newest").expect_err("unknown key");
        assert!(error.contains("'newest'"));
        assert!(error.contains("success-rate"));
    }

    #[test]
    fn missing_override_uses_configured_source() {
        let store = load_catalog(&CatalogConfig::default(), CatalogSourceArgs::default())
            .expect("bundled catalogs");
        assert!(!store.scholarships().is_empty());
    }

    #[test]
    fn override_directory_must_exist() {
        let result = load_catalog(
            &CatalogConfig::default(),
            CatalogSourceArgs {
                catalog_dir: Some(PathBuf::from("/nonexistent/campus-compass-catalogs")),
                ..CatalogSourceArgs::default()
            },
        );
        assert!(matches!(result, Err(CatalogLoadError::Io { .. })));
    }

    #[test]
    fn flags_override_env_sources_one_by_one() {
        let configured = CatalogConfig {
            dir: Some(PathBuf::from("/srv/catalogs")),
            universities_csv: Some(PathBuf::from("/srv/universities.csv")),
            scholarships_csv: None,
        };
        let flags = CatalogSourceArgs {
            scholarships_csv: Some(PathBuf::from("awards.csv")),
            ..CatalogSourceArgs::default()
        };

        let merged = flags.over(&configured);

        assert_eq!(merged.dir, Some(PathBuf::from("/srv/catalogs")));
        assert_eq!(merged.universities_csv, Some(PathBuf::from("/srv/universities.csv")));
        assert_eq!(merged.scholarships_csv, Some(PathBuf::from("awards.csv")));
    }

    #[test]
    fn csv_flag_replaces_bundled_universities() {
        let path = std::env::temp_dir().join(format!("campus-compass-{}.csv", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "id,name,country,city,state,description,courses,tuition_fee,ranking,admission_rate,student_count,established_year,image,logo\n\
             90,Atlas Polytechnic,morocco,Rabat,,Applied sciences,Engineering,6000,410,55,,,,\n",
        )
        .expect("write csv export");

        let store = load_catalog(
            &CatalogConfig::default(),
            CatalogSourceArgs {
                universities_csv: Some(path.clone()),
                ..CatalogSourceArgs::default()
            },
        )
        .expect("csv import applies");

        assert_eq!(store.universities().len(), 1);
        assert_eq!(
            store.university(90).map(|u| u.name.as_str()),
            Some("Atlas Polytechnic")
        );
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn executor_uses_configured_delay() {
        let executor = simulated_executor(&SubmissionConfig {
            delay: Duration::from_millis(15),
        });
        assert_eq!(executor.delay(), Duration::from_millis(15));
    }
}
