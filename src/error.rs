use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Course data not available")]
    CatalogEmpty,

    #[error("Curriculum \"{0}\" not found")]
    CurriculumNotFound(String),

    #[error("Student {0} not found")]
    StudentNotFound(String),

    #[error("Missing required field: course id")]
    MissingCourseId,

    #[error("Course {0} already exists in completed list")]
    CourseAlreadyCompleted(String),

    #[error("Course {0} not found in completed list")]
    CourseNotCompleted(String),

    #[error("Course {0} is not in the catalog")]
    UnknownCourse(String),

    #[error("Prerequisites for {course} not met, missing: {}", missing.join(", "))]
    PrerequisitesNotMet { course: String, missing: Vec<String> },

    #[error("Invalid {key} value: {value}")]
    InvalidConfig { key: String, value: String },
}
