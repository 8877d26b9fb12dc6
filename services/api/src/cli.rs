use crate::browse::{
    run_courses, run_scholarships, run_universities, run_validate, CoursesArgs, ScholarshipArgs,
    UniversityArgs, ValidateArgs,
};
use crate::infra::CatalogSourceArgs;
use crate::server;
use campus_compass::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Campus Compass",
    about = "Browse study-abroad catalogs, check application forms, or run the HTTP service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Search, filter, and sort the university catalog
    Universities(UniversityArgs),
    /// Search, filter, and sort the scholarship catalog
    Scholarships(ScholarshipArgs),
    /// List course categories, or show one category with its subcategories
    Courses(CoursesArgs),
    /// Validate an application form stored as JSON
    Validate(ValidateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) sources: CatalogSourceArgs,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Universities(args) => run_universities(args),
        Command::Scholarships(args) => run_scholarships(args),
        Command::Courses(args) => run_courses(args),
        Command::Validate(args) => run_validate(args),
    }
}
