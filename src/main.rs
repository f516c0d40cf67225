use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use course_advisor::config::AdvisorConfig;
use course_advisor::models::normalize_course_id;
use course_advisor::{
    db, ensure_eligible, missing_prerequisites, recommend_electives, recommend_required, report,
    summarize, StudentRecord,
};

#[derive(Parser)]
#[command(name = "course-advisor")]
#[command(about = "Course eligibility and next-semester suggestions", long_about = None)]
struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Replace the catalog and curriculum with seed data
    Seed,
    /// Remove all courses and curricula
    Destroy,
    /// Import or update courses from a CSV file
    ImportCourses {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Register a student record
    AddStudent {
        #[arg(long)]
        student_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Mark a course as completed
    Complete {
        #[arg(long)]
        student: String,
        #[arg(long)]
        course: String,
        /// Refuse unknown courses and courses whose prerequisites are unmet
        #[arg(long)]
        strict: bool,
    },
    /// Remove a course from the completed list
    Uncomplete {
        #[arg(long)]
        student: String,
        #[arg(long)]
        course: String,
    },
    /// Replace a student's interests
    Interests {
        #[arg(long)]
        student: String,
        interests: Vec<String>,
    },
    /// Check whether a student may take a course next
    Check {
        #[arg(long)]
        student: String,
        #[arg(long)]
        course: String,
    },
    /// Suggest required courses for next semester
    Suggest {
        #[arg(long)]
        student: String,
        #[arg(long)]
        json: bool,
    },
    /// Suggest electives matching the student's interests
    Electives {
        #[arg(long)]
        student: String,
        #[arg(long)]
        json: bool,
    },
    /// Show completion counts against the curriculum
    Progress {
        #[arg(long)]
        student: String,
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown advising report
    Report {
        #[arg(long)]
        student: String,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn print_ids(heading: &str, empty: &str, ids: &[String], json_key: Option<&str>) {
    if let Some(key) = json_key {
        let mut body = serde_json::Map::new();
        body.insert(key.to_string(), serde_json::json!(ids));
        println!("{}", serde_json::Value::Object(body));
        return;
    }

    if ids.is_empty() {
        println!("{empty}");
    } else {
        println!("{heading}");
        for id in ids {
            println!("- {id}");
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn connect(config: &AdvisorConfig) -> anyhow::Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set to a Postgres instance")?;

    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = AdvisorConfig::load()?;
    let pool = connect(&config).await?;

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Destroy => {
            db::destroy(&pool).await?;
            println!("Course data destroyed.");
        }
        Commands::ImportCourses { csv } => {
            let imported = db::import_courses_csv(&pool, &csv).await?;
            println!("Imported {imported} courses from {}.", csv.display());
        }
        Commands::AddStudent {
            student_id,
            name,
            email,
        } => {
            let student = StudentRecord::new(
                &student_id,
                &name,
                &email,
                Vec::<&str>::new(),
                Vec::<&str>::new(),
            );
            db::add_student(&pool, &student).await?;
            println!("Student {} added.", student.student_id);
        }
        Commands::Complete {
            student,
            course,
            strict,
        } => {
            let mut record = db::fetch_student(&pool, &student).await?;

            if strict {
                let catalog = db::load_catalog(&pool, &config.curriculum).await?;
                let id = normalize_course_id(&course);
                ensure_eligible(&catalog, &id, &record.completed_set())?;
            }

            let id = record.add_completed(&course)?;
            db::save_student(&pool, &record).await?;
            println!(
                "Added {id}. Completed: {}",
                record.completed_courses.join(", ")
            );
        }
        Commands::Uncomplete { student, course } => {
            let mut record = db::fetch_student(&pool, &student).await?;
            let id = record.remove_completed(&course)?;
            db::save_student(&pool, &record).await?;
            println!("Course {id} removed successfully.");
        }
        Commands::Interests { student, interests } => {
            let mut record = db::fetch_student(&pool, &student).await?;
            record.set_interests(&interests);
            db::save_student(&pool, &record).await?;
            println!("Interests: {}", record.interests.join(", "));
        }
        Commands::Check { student, course } => {
            let record = db::fetch_student(&pool, &student).await?;
            let catalog = db::load_catalog(&pool, &config.curriculum).await?;
            let id = normalize_course_id(&course);

            match missing_prerequisites(&catalog, &id, &record.completed_set()) {
                None => println!("{id} is not in the catalog; not eligible."),
                Some(missing) if missing.is_empty() => println!("{id} is eligible."),
                Some(missing) => {
                    println!("{id} is not eligible, missing: {}", missing.join(", "))
                }
            }
        }
        Commands::Suggest { student, json } => {
            let record = db::fetch_student(&pool, &student).await?;
            let catalog = db::load_catalog(&pool, &config.curriculum).await?;
            let suggestions = recommend_required(
                &catalog,
                &record.completed_set(),
                config.limits.max_required,
            );
            print_ids(
                "Suggested required courses:",
                "No required courses are currently available.",
                &suggestions,
                json.then_some("suggestions"),
            );
        }
        Commands::Electives { student, json } => {
            let record = db::fetch_student(&pool, &student).await?;
            let catalog = db::load_catalog(&pool, &config.curriculum).await?;
            let electives = recommend_electives(
                &catalog,
                &record.completed_set(),
                &record.interest_set(),
                config.limits.max_electives,
            );
            print_ids(
                "Recommended electives:",
                "No eligible electives match these interests.",
                &electives,
                json.then_some("recommendations"),
            );
        }
        Commands::Progress { student, json } => {
            let record = db::fetch_student(&pool, &student).await?;
            let curriculum = db::load_curriculum(&pool, &config.curriculum).await?;
            let summary = summarize(&record.completed_set(), &curriculum);

            if json {
                print_json(&summary)?;
            } else {
                println!(
                    "Required: {} of {} ({:.0}%), total completed: {}",
                    summary.completed_required_count,
                    summary.total_required_count,
                    summary.percent_required(),
                    summary.total_completed_count
                );
            }
        }
        Commands::Report { student, out } => {
            let record = db::fetch_student(&pool, &student).await?;
            let catalog = db::load_catalog(&pool, &config.curriculum).await?;
            let report =
                report::build_report(&record, &catalog, config.limits, Utc::now().date_naive());
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
