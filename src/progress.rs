use std::collections::HashSet;

use crate::models::{Curriculum, ProgressSummary};

pub fn summarize(completed: &HashSet<String>, curriculum: &Curriculum) -> ProgressSummary {
    let completed_required_count = curriculum
        .required_courses
        .iter()
        .filter(|id| completed.contains(id.as_str()))
        .count();

    ProgressSummary {
        completed_required_count,
        total_required_count: curriculum.required_courses.len(),
        total_completed_count: completed.len(),
    }
}
