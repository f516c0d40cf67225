use std::fmt::Write;

use chrono::NaiveDate;

use crate::catalog::CatalogIndex;
use crate::eligibility::missing_prerequisites;
use crate::models::StudentRecord;
use crate::progress::summarize;
use crate::recommend::{recommend, RecommendationLimits};

/// A remaining required course that cannot be taken yet. `missing` is `None`
/// when the course is absent from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedCourse {
    pub course_id: String,
    pub missing: Option<Vec<String>>,
}

pub fn blocked_required(catalog: &CatalogIndex, student: &StudentRecord) -> Vec<BlockedCourse> {
    let completed = student.completed_set();

    catalog
        .required_course_ids()
        .iter()
        .filter(|id| !completed.contains(id.as_str()))
        .filter_map(|id| match missing_prerequisites(catalog, id, &completed) {
            Some(missing) if missing.is_empty() => None,
            missing => Some(BlockedCourse {
                course_id: id.clone(),
                missing,
            }),
        })
        .collect()
}

fn course_label(catalog: &CatalogIndex, id: &str) -> String {
    match catalog.find_course(id) {
        Some(course) => format!("{} ({})", course.id, course.name),
        None => id.to_string(),
    }
}

pub fn build_report(
    student: &StudentRecord,
    catalog: &CatalogIndex,
    limits: RecommendationLimits,
    generated_on: NaiveDate,
) -> String {
    let completed = student.completed_set();
    let interests = student.interest_set();
    let summary = summarize(&completed, catalog.curriculum());
    let suggestions = recommend(catalog, &completed, &interests, limits);
    let blocked = blocked_required(catalog, student);

    let mut output = String::new();

    let _ = writeln!(output, "# Advising Report");
    let _ = writeln!(
        output,
        "Generated for {} ({}) on {} against {}",
        student.full_name,
        student.student_id,
        generated_on,
        catalog.curriculum().name
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Progress");
    let _ = writeln!(
        output,
        "- Required courses completed: {} of {} ({:.0}%)",
        summary.completed_required_count,
        summary.total_required_count,
        summary.percent_required()
    );
    let _ = writeln!(
        output,
        "- Total courses completed: {}",
        summary.total_completed_count
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Suggested Required Courses");

    if suggestions.required.is_empty() {
        let _ = writeln!(output, "No required courses are currently available.");
    } else {
        for id in suggestions.required.iter() {
            let _ = writeln!(output, "- {}", course_label(catalog, id));
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Elective Matches");

    if student.interests.is_empty() {
        let _ = writeln!(output, "No interests set; showing any eligible electives.");
    } else {
        let _ = writeln!(output, "Interests: {}", student.interests.join(", "));
    }

    if suggestions.electives.is_empty() {
        let _ = writeln!(output, "No eligible electives found.");
    } else {
        for id in suggestions.electives.iter() {
            let _ = writeln!(output, "- {}", course_label(catalog, id));
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Blocked Required Courses");

    if blocked.is_empty() {
        let _ = writeln!(output, "Nothing blocked.");
    } else {
        for course in blocked.iter() {
            match &course.missing {
                Some(missing) => {
                    let _ = writeln!(
                        output,
                        "- {}: needs {}",
                        course_label(catalog, &course.course_id),
                        missing.join(", ")
                    );
                }
                None => {
                    let _ = writeln!(output, "- {}: not in catalog", course.course_id);
                }
            }
        }
    }

    output
}
