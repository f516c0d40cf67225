use std::collections::HashMap;

use crate::models::{Course, Curriculum};

/// Read-only view over the course catalog and the active curriculum.
///
/// Built once per request from materialized records and passed explicitly
/// into the eligibility and recommendation functions. When two courses share
/// an id the first one wins lookups; iteration still yields every record in
/// the order supplied.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    courses: Vec<Course>,
    by_id: HashMap<String, usize>,
    curriculum: Curriculum,
}

impl CatalogIndex {
    pub fn new(courses: Vec<Course>, curriculum: Curriculum) -> Self {
        let mut by_id = HashMap::with_capacity(courses.len());
        for (position, course) in courses.iter().enumerate() {
            by_id.entry(course.id.clone()).or_insert(position);
        }

        Self {
            courses,
            by_id,
            curriculum,
        }
    }

    pub fn find_course(&self, id: &str) -> Option<&Course> {
        self.by_id.get(id).map(|&position| &self.courses[position])
    }

    pub fn required_course_ids(&self) -> &[String] {
        &self.curriculum.required_courses
    }

    pub fn is_required(&self, id: &str) -> bool {
        self.curriculum
            .required_courses
            .iter()
            .any(|required| required == id)
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }
}
