//! Course advising core: catalog lookup, prerequisite eligibility, next-course
//! recommendations and progress counts, plus the Postgres persistence layer and
//! markdown report the CLI is built on.
//!
//! The core functions are pure. Callers load the catalog and student record,
//! normalize them through the constructors in [`models`], and pass them in.

pub mod catalog;
pub mod config;
pub mod db;
pub mod eligibility;
pub mod error;
pub mod models;
pub mod progress;
pub mod recommend;
pub mod report;

pub use catalog::CatalogIndex;
pub use eligibility::{ensure_eligible, is_eligible, missing_prerequisites};
pub use error::AdvisorError;
pub use models::{Course, Curriculum, ProgressSummary, Recommendations, StudentRecord};
pub use progress::summarize;
pub use recommend::{recommend, recommend_electives, recommend_required, RecommendationLimits};
