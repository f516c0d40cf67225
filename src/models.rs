use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AdvisorError;

/// Upper-cases and trims a course identifier.
pub fn normalize_course_id(id: &str) -> String {
    id.trim().to_uppercase()
}

/// Lower-cases and trims a tag or interest keyword.
pub fn normalize_interest(keyword: &str) -> String {
    keyword.trim().to_lowercase()
}

fn normalize_ids<I, S>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ids.into_iter()
        .map(|id| normalize_course_id(id.as_ref()))
        .filter(|id| !id.is_empty())
        .collect()
}

fn normalize_keywords<I, S>(keywords: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keywords
        .into_iter()
        .map(|keyword| normalize_interest(keyword.as_ref()))
        .filter(|keyword| !keyword.is_empty())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub prerequisites: Vec<String>,
    pub tags: Vec<String>,
}

impl Course {
    pub fn new<P, T>(id: &str, name: &str, prerequisites: P, tags: T) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        Self {
            id: normalize_course_id(id),
            name: name.trim().to_string(),
            prerequisites: normalize_ids(prerequisites),
            tags: normalize_keywords(tags),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curriculum {
    pub name: String,
    pub required_courses: Vec<String>,
}

impl Curriculum {
    pub fn new<R>(name: &str, required_courses: R) -> Self
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
    {
        Self {
            name: name.trim().to_string(),
            required_courses: normalize_ids(required_courses),
        }
    }
}

/// A student's persisted record. The core only reads `completed_courses`
/// and `interests`; both keep insertion order for storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: Uuid,
    pub student_id: String,
    pub full_name: String,
    pub email: String,
    pub completed_courses: Vec<String>,
    pub interests: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl StudentRecord {
    pub fn new<C, I>(
        student_id: &str,
        full_name: &str,
        email: &str,
        completed_courses: C,
        interests: I,
    ) -> Self
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut completed = Vec::new();
        for id in normalize_ids(completed_courses) {
            if !completed.contains(&id) {
                completed.push(id);
            }
        }

        Self {
            id: Uuid::new_v4(),
            student_id: student_id.trim().to_string(),
            full_name: full_name.trim().to_string(),
            email: email.trim().to_lowercase(),
            completed_courses: completed,
            interests: normalize_keywords(interests),
            created_at: Utc::now(),
        }
    }

    pub fn completed_set(&self) -> HashSet<String> {
        self.completed_courses.iter().cloned().collect()
    }

    pub fn interest_set(&self) -> HashSet<String> {
        self.interests.iter().cloned().collect()
    }

    /// Appends a course to the completed list, returning its normalized id.
    pub fn add_completed(&mut self, course_id: &str) -> Result<String, AdvisorError> {
        let id = normalize_course_id(course_id);
        if id.is_empty() {
            return Err(AdvisorError::MissingCourseId);
        }
        if self.completed_courses.contains(&id) {
            return Err(AdvisorError::CourseAlreadyCompleted(id));
        }

        self.completed_courses.push(id.clone());
        Ok(id)
    }

    pub fn remove_completed(&mut self, course_id: &str) -> Result<String, AdvisorError> {
        let id = normalize_course_id(course_id);
        let before = self.completed_courses.len();
        self.completed_courses.retain(|completed| completed != &id);

        if self.completed_courses.len() == before {
            return Err(AdvisorError::CourseNotCompleted(id));
        }
        Ok(id)
    }

    pub fn set_interests<I>(&mut self, interests: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.interests = normalize_keywords(interests);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub completed_required_count: usize,
    pub total_required_count: usize,
    pub total_completed_count: usize,
}

impl ProgressSummary {
    pub fn percent_required(&self) -> f64 {
        if self.total_required_count == 0 {
            0.0
        } else {
            self.completed_required_count as f64 * 100.0 / self.total_required_count as f64
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    pub required: Vec<String>,
    pub electives: Vec<String>,
}
