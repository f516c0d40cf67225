use std::collections::HashSet;

use tracing::warn;

use crate::catalog::CatalogIndex;
use crate::error::AdvisorError;

/// Direct prerequisites of `course_id` that are absent from `completed`, in
/// the order the course lists them. `None` when the course is not in the
/// catalog.
pub fn missing_prerequisites(
    catalog: &CatalogIndex,
    course_id: &str,
    completed: &HashSet<String>,
) -> Option<Vec<String>> {
    let Some(course) = catalog.find_course(course_id) else {
        warn!("course {course_id} not found in catalog, treating as ineligible");
        return None;
    };

    Some(
        course
            .prerequisites
            .iter()
            .filter(|prereq| !completed.contains(prereq.as_str()))
            .cloned()
            .collect(),
    )
}

/// Unknown courses fail closed. Only direct prerequisites are checked.
pub fn is_eligible(catalog: &CatalogIndex, course_id: &str, completed: &HashSet<String>) -> bool {
    missing_prerequisites(catalog, course_id, completed)
        .map(|missing| missing.is_empty())
        .unwrap_or(false)
}

/// Validation for adding a course to a completed list when the caller wants
/// catalog membership and prerequisites enforced.
pub fn ensure_eligible(
    catalog: &CatalogIndex,
    course_id: &str,
    completed: &HashSet<String>,
) -> Result<(), AdvisorError> {
    match missing_prerequisites(catalog, course_id, completed) {
        None => Err(AdvisorError::UnknownCourse(course_id.to_string())),
        Some(missing) if missing.is_empty() => Ok(()),
        Some(missing) => Err(AdvisorError::PrerequisitesNotMet {
            course: course_id.to_string(),
            missing,
        }),
    }
}
