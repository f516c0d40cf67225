use std::collections::HashSet;

use tracing::debug;

use crate::catalog::CatalogIndex;
use crate::eligibility::is_eligible;
use crate::models::{Course, Recommendations};

pub const MAX_REQUIRED_RECOMMENDATIONS: usize = 5;
pub const MAX_ELECTIVE_RECOMMENDATIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationLimits {
    pub max_required: usize,
    pub max_electives: usize,
}

impl Default for RecommendationLimits {
    fn default() -> Self {
        Self {
            max_required: MAX_REQUIRED_RECOMMENDATIONS,
            max_electives: MAX_ELECTIVE_RECOMMENDATIONS,
        }
    }
}

/// Remaining required courses whose prerequisites are met, in curriculum
/// order, at most `limit` of them.
pub fn recommend_required(
    catalog: &CatalogIndex,
    completed: &HashSet<String>,
    limit: usize,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let suggestions: Vec<String> = catalog
        .required_course_ids()
        .iter()
        .filter(|id| !completed.contains(id.as_str()))
        .filter(|id| is_eligible(catalog, id, completed))
        .filter(|id| seen.insert(*id))
        .take(limit)
        .cloned()
        .collect();

    debug!(count = suggestions.len(), "required course suggestions");
    suggestions
}

/// An empty interest set matches every course.
fn matches_interests(course: &Course, interests: &HashSet<String>) -> bool {
    if interests.is_empty() {
        return true;
    }

    course
        .tags
        .iter()
        .any(|tag| interests.contains(&tag.to_lowercase()))
}

/// Eligible, not-yet-completed courses outside the required list, in catalog
/// order, at most `limit` of them. A non-empty interest set keeps only
/// courses sharing at least one tag with it.
pub fn recommend_electives(
    catalog: &CatalogIndex,
    completed: &HashSet<String>,
    interests: &HashSet<String>,
    limit: usize,
) -> Vec<String> {
    let suggestions: Vec<String> = catalog
        .courses()
        .iter()
        .filter(|course| !catalog.is_required(&course.id))
        .filter(|course| !completed.contains(&course.id))
        .filter(|course| is_eligible(catalog, &course.id, completed))
        .filter(|course| matches_interests(course, interests))
        .take(limit)
        .map(|course| course.id.clone())
        .collect();

    debug!(count = suggestions.len(), "elective suggestions");
    suggestions
}

pub fn recommend(
    catalog: &CatalogIndex,
    completed: &HashSet<String>,
    interests: &HashSet<String>,
    limits: RecommendationLimits,
) -> Recommendations {
    Recommendations {
        required: recommend_required(catalog, completed, limits.max_required),
        electives: recommend_electives(catalog, completed, interests, limits.max_electives),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::tests::{completed, course, sample_catalog};
    use crate::models::Curriculum;

    const REQUIRED: usize = MAX_REQUIRED_RECOMMENDATIONS;
    const ELECTIVES: usize = MAX_ELECTIVE_RECOMMENDATIONS;

    fn interests(keywords: &[&str]) -> HashSet<String> {
        keywords.iter().map(|k| k.to_string()).collect()
    }

    fn catalog_with_electives(electives: Vec<Course>) -> CatalogIndex {
        let mut courses = vec![
            course("CS101", "Intro to Programming", &[], &["programming"]),
            course("CS201", "Data Structures", &["CS101"], &["programming"]),
        ];
        courses.extend(electives);
        let curriculum = Curriculum::new("Computer Science BS", ["CS101", "CS201"]);
        CatalogIndex::new(courses, curriculum)
    }

    #[test]
    fn empty_completed_suggests_entry_courses() {
        let catalog = sample_catalog();
        let suggestions = recommend_required(&catalog, &completed(&[]), REQUIRED);
        assert_eq!(suggestions, vec!["CS101", "MA101"]);
    }

    #[test]
    fn completing_intro_unlocks_data_structures() {
        let catalog = sample_catalog();
        let suggestions = recommend_required(&catalog, &completed(&["CS101"]), REQUIRED);
        assert_eq!(suggestions, vec!["MA101", "CS201"]);
    }

    #[test]
    fn final_required_course_unlocks_last() {
        let catalog = sample_catalog();
        let done = completed(&["CS101", "MA101", "CS201"]);
        let suggestions = recommend_required(&catalog, &done, REQUIRED);
        assert_eq!(suggestions, vec!["CS301"]);
    }

    #[test]
    fn nothing_remaining_suggests_nothing() {
        let catalog = sample_catalog();
        let done = completed(&["CS101", "MA101", "CS201", "CS301"]);
        assert!(recommend_required(&catalog, &done, REQUIRED).is_empty());
    }

    #[test]
    fn required_suggestions_are_truncated_in_curriculum_order() {
        let ids = ["R1", "R2", "R3", "R4", "R5", "R6", "R7"];
        let courses = ids.iter().map(|id| course(id, id, &[], &[])).collect();
        let catalog = CatalogIndex::new(courses, Curriculum::new("Program", ids));

        let suggestions = recommend_required(&catalog, &completed(&["R2"]), REQUIRED);
        assert_eq!(suggestions, vec!["R1", "R3", "R4", "R5", "R6"]);
    }

    #[test]
    fn duplicate_required_entries_appear_once() {
        let catalog = CatalogIndex::new(
            vec![
                course("CS101", "Intro", &[], &[]),
                course("MA101", "Calculus", &[], &[]),
            ],
            Curriculum::new("Program", ["CS101", "CS101", "MA101"]),
        );
        let suggestions = recommend_required(&catalog, &completed(&[]), REQUIRED);
        assert_eq!(suggestions, vec!["CS101", "MA101"]);
    }

    #[test]
    fn required_course_missing_from_catalog_is_skipped() {
        let catalog = CatalogIndex::new(
            vec![course("CS101", "Intro", &[], &[])],
            Curriculum::new("Program", ["HU300", "CS101"]),
        );
        let suggestions = recommend_required(&catalog, &completed(&[]), REQUIRED);
        assert_eq!(suggestions, vec!["CS101"]);
    }

    #[test]
    fn empty_inputs_suggest_nothing() {
        let none = completed(&[]);
        let no_interests = interests(&[]);

        let empty = CatalogIndex::new(Vec::new(), Curriculum::new("Program", &[] as &[&str]));
        assert!(recommend_required(&empty, &none, REQUIRED).is_empty());
        let electives = recommend_electives(&empty, &none, &no_interests, ELECTIVES);
        assert!(electives.is_empty());

        let no_courses = CatalogIndex::new(Vec::new(), Curriculum::new("Program", ["CS101"]));
        assert!(recommend_required(&no_courses, &none, REQUIRED).is_empty());
    }

    #[test]
    fn matching_interest_recommends_elective() {
        let catalog = sample_catalog();
        let done = completed(&["CS101", "CS201"]);
        let electives = recommend_electives(&catalog, &done, &interests(&["web"]), ELECTIVES);
        assert!(electives.contains(&"CS410".to_string()));
    }

    #[test]
    fn unmatched_interest_recommends_nothing() {
        let catalog = sample_catalog();
        let done = completed(&["CS101", "CS201"]);
        let electives = recommend_electives(&catalog, &done, &interests(&["music"]), ELECTIVES);
        assert!(electives.is_empty());
    }

    #[test]
    fn electives_exclude_ineligible_and_completed() {
        let catalog = sample_catalog();
        let web = interests(&["web"]);
        let intro_only = completed(&["CS101"]);
        let already_taken = completed(&["CS101", "CS201", "CS410"]);

        let ineligible = recommend_electives(&catalog, &intro_only, &web, ELECTIVES);
        assert!(ineligible.is_empty());

        let taken = recommend_electives(&catalog, &already_taken, &web, ELECTIVES);
        assert!(taken.is_empty());
    }

    #[test]
    fn empty_interests_fall_back_to_all_eligible() {
        let catalog = catalog_with_electives(vec![
            course("CS410", "Web Development", &["CS201"], &["web"]),
            course("HU210", "Philosophy", &[], &["humanities"]),
            course("CS420", "Databases", &["CS201"], &["database"]),
            course("CS430", "AI", &["CS301"], &["ai"]),
            course("MU100", "Music Theory", &[], &["music"]),
        ]);

        let done = completed(&["CS101", "CS201"]);
        let electives = recommend_electives(&catalog, &done, &interests(&[]), ELECTIVES);
        assert_eq!(electives, vec!["CS410", "HU210", "CS420"]);
    }

    #[test]
    fn tag_matching_ignores_tag_case() {
        let mut databases = course("CS420", "Databases", &[], &[]);
        databases.tags = vec!["SQL".to_string()];
        let catalog = catalog_with_electives(vec![databases]);

        let sql = interests(&["sql"]);
        let electives = recommend_electives(&catalog, &completed(&[]), &sql, ELECTIVES);
        assert_eq!(electives, vec!["CS420"]);
    }

    #[test]
    fn elective_order_follows_catalog_order() {
        let catalog = catalog_with_electives(vec![
            course("ZZ900", "Late", &[], &["data"]),
            course("AA100", "Early", &[], &["data"]),
        ]);

        let data = interests(&["data"]);
        let electives = recommend_electives(&catalog, &completed(&[]), &data, ELECTIVES);
        assert_eq!(electives, vec!["ZZ900", "AA100"]);
    }

    #[test]
    fn recommendations_are_deterministic() {
        let catalog = sample_catalog();
        let done = completed(&["CS101", "CS201"]);
        let wants = interests(&["web", "theory"]);
        let limits = RecommendationLimits::default();

        let first = recommend(&catalog, &done, &wants, limits);
        let second = recommend(&catalog, &done, &wants, limits);
        assert_eq!(first, second);
        assert_eq!(first.required, vec!["MA101"]);
        assert_eq!(first.electives, vec!["CS410"]);
    }

    #[test]
    fn custom_limits_are_respected() {
        let catalog = sample_catalog();
        let limits = RecommendationLimits {
            max_required: 1,
            max_electives: 0,
        };
        let result = recommend(&catalog, &completed(&[]), &interests(&[]), limits);
        assert_eq!(result.required, vec!["CS101"]);
        assert!(result.electives.is_empty());
    }
}
