use std::io::Read;
use std::path::Path;

use anyhow::Context;
use sqlx::{PgPool, Row};
use tracing::{info, warn};

use crate::catalog::CatalogIndex;
use crate::config::DEFAULT_CURRICULUM;
use crate::error::AdvisorError;
use crate::models::{Course, Curriculum, StudentRecord};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub fn seed_catalog() -> (Vec<Course>, Curriculum) {
    let none: [&str; 0] = [];
    let courses = vec![
        Course::new(
            "CS101",
            "Intro to Programming",
            none,
            ["programming", "foundations"],
        ),
        Course::new("MA101", "Calculus I", none, ["math", "calculus"]),
        Course::new(
            "EN101",
            "English Composition",
            none,
            ["writing", "humanities"],
        ),
        Course::new(
            "CS201",
            "Data Structures",
            ["CS101"],
            ["programming", "algorithms", "data structures"],
        ),
        Course::new(
            "CS250",
            "Computer Organization",
            ["CS101"],
            ["hardware", "systems"],
        ),
        Course::new(
            "CS301",
            "Algorithms",
            ["CS201", "MA101"],
            ["algorithms", "theory", "programming"],
        ),
        Course::new(
            "CS350",
            "Operating Systems",
            ["CS201", "CS250"],
            ["systems", "programming", "os"],
        ),
        Course::new("MA201", "Calculus II", ["MA101"], ["math", "calculus"]),
        Course::new(
            "ST210",
            "Intro to Statistics",
            ["MA101"],
            ["math", "statistics", "data"],
        ),
        Course::new(
            "CS410",
            "Web Development",
            ["CS201"],
            ["web", "programming", "development", "frontend", "backend"],
        ),
        Course::new(
            "CS420",
            "Database Systems",
            ["CS201"],
            ["database", "data", "sql", "nosql", "systems"],
        ),
        Course::new(
            "CS430",
            "Artificial Intelligence",
            ["CS301"],
            ["ai", "algorithms", "programming", "intelligence"],
        ),
        Course::new(
            "CS440",
            "Machine Learning",
            ["CS301", "ST210"],
            ["ai", "machine learning", "data", "statistics", "algorithms"],
        ),
        Course::new(
            "HU300",
            "Ethics in Technology",
            ["EN101"],
            ["humanities", "ethics", "technology", "society"],
        ),
    ];

    let required = [
        "CS101", "MA101", "EN101", "CS201", "CS250", "MA201", "ST210", "CS301", "CS350", "HU300",
    ];
    let curriculum = Curriculum::new(DEFAULT_CURRICULUM, required);

    (courses, curriculum)
}

fn seed_students() -> Vec<StudentRecord> {
    vec![
        StudentRecord::new(
            "S1001",
            "Avery Lee",
            "avery.lee@example.edu",
            ["CS101", "MA101", "EN101"],
            ["web", "programming"],
        ),
        StudentRecord::new(
            "S1002",
            "Jules Moreno",
            "jules.moreno@example.edu",
            ["CS101", "MA101", "CS201", "ST210"],
            Vec::<&str>::new(),
        ),
    ]
}

async fn upsert_course(pool: &PgPool, course: &Course) -> anyhow::Result<u64> {
    let result = sqlx::query(
        r#"
        INSERT INTO course_advisor.courses (id, name, prerequisites, tags)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (id) DO UPDATE
        SET name = EXCLUDED.name,
            prerequisites = EXCLUDED.prerequisites,
            tags = EXCLUDED.tags
        "#,
    )
    .bind(&course.id)
    .bind(&course.name)
    .bind(&course.prerequisites)
    .bind(&course.tags)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    destroy(pool).await?;

    let (courses, curriculum) = seed_catalog();
    import_courses(pool, &courses).await?;

    sqlx::query(
        r#"
        INSERT INTO course_advisor.curricula (name, required_courses)
        VALUES ($1, $2)
        "#,
    )
    .bind(&curriculum.name)
    .bind(&curriculum.required_courses)
    .execute(pool)
    .await?;
    info!(curriculum = %curriculum.name, "curriculum imported");

    for student in seed_students() {
        sqlx::query(
            r#"
            INSERT INTO course_advisor.students
            (id, student_id, full_name, email, completed_courses, interests, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (student_id) DO NOTHING
            "#,
        )
        .bind(student.id)
        .bind(&student.student_id)
        .bind(&student.full_name)
        .bind(&student.email)
        .bind(&student.completed_courses)
        .bind(&student.interests)
        .bind(student.created_at)
        .execute(pool)
        .await?;
    }

    Ok(())
}

pub async fn destroy(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM course_advisor.courses")
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM course_advisor.curricula")
        .execute(pool)
        .await?;
    info!("course and curriculum data cleared");
    Ok(())
}

/// Loads the named curriculum on its own, for callers that never consult
/// the course list.
pub async fn load_curriculum(pool: &PgPool, name: &str) -> anyhow::Result<Curriculum> {
    let row = sqlx::query(
        r#"
        SELECT name, required_courses
        FROM course_advisor.curricula
        WHERE name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        warn!("curriculum \"{name}\" not found in the database");
        let error = AdvisorError::CurriculumNotFound(name.to_string());
        return Err(error.into());
    };

    let required: Vec<String> = row.get("required_courses");
    let stored_name: String = row.get("name");
    Ok(Curriculum::new(&stored_name, required))
}

/// Loads the full catalog in insertion order along with the named
/// curriculum. Missing data is reported here so the core is never called
/// without its inputs.
pub async fn load_catalog(pool: &PgPool, curriculum_name: &str) -> anyhow::Result<CatalogIndex> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, prerequisites, tags
        FROM course_advisor.courses
        ORDER BY position
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut courses = Vec::with_capacity(rows.len());
    for row in rows {
        let id: String = row.get("id");
        let name: String = row.get("name");
        let prerequisites: Vec<String> = row.get("prerequisites");
        let tags: Vec<String> = row.get("tags");
        courses.push(Course::new(&id, &name, prerequisites, tags));
    }

    if courses.is_empty() {
        warn!("no courses found in the database");
        return Err(AdvisorError::CatalogEmpty.into());
    }

    let curriculum = load_curriculum(pool, curriculum_name).await?;
    Ok(CatalogIndex::new(courses, curriculum))
}

pub async fn add_student(pool: &PgPool, student: &StudentRecord) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO course_advisor.students
        (id, student_id, full_name, email, completed_courses, interests, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(student.id)
    .bind(&student.student_id)
    .bind(&student.full_name)
    .bind(&student.email)
    .bind(&student.completed_courses)
    .bind(&student.interests)
    .bind(student.created_at)
    .execute(pool)
    .await
    .with_context(|| format!("failed to insert student {}", student.student_id))?;

    info!(student = %student.student_id, "student added");
    Ok(())
}

pub async fn fetch_student(pool: &PgPool, student_id: &str) -> anyhow::Result<StudentRecord> {
    let row = sqlx::query(
        r#"
        SELECT id, student_id, full_name, email, completed_courses, interests, created_at
        FROM course_advisor.students
        WHERE student_id = $1
        "#,
    )
    .bind(student_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AdvisorError::StudentNotFound(student_id.to_string()))?;

    Ok(StudentRecord {
        id: row.get("id"),
        student_id: row.get("student_id"),
        full_name: row.get("full_name"),
        email: row.get("email"),
        completed_courses: row.get("completed_courses"),
        interests: row.get("interests"),
        created_at: row.get("created_at"),
    })
}

pub async fn save_student(pool: &PgPool, student: &StudentRecord) -> anyhow::Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE course_advisor.students
        SET completed_courses = $2, interests = $3
        WHERE student_id = $1
        "#,
    )
    .bind(&student.student_id)
    .bind(&student.completed_courses)
    .bind(&student.interests)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        let error = AdvisorError::StudentNotFound(student.student_id.clone());
        return Err(error.into());
    }
    Ok(())
}

fn parse_list(value: &str) -> Vec<&str> {
    value
        .split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

pub fn read_courses_csv<R: Read>(reader: R) -> anyhow::Result<Vec<Course>> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        id: String,
        name: String,
        #[serde(default)]
        prerequisites: String,
        #[serde(default)]
        tags: String,
    }

    let mut reader = csv::Reader::from_reader(reader);
    let mut courses = Vec::new();

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        if row.id.trim().is_empty() {
            warn!("skipping course row without an id");
            continue;
        }
        courses.push(Course::new(
            &row.id,
            &row.name,
            parse_list(&row.prerequisites),
            parse_list(&row.tags),
        ));
    }

    Ok(courses)
}

/// Upserts courses one by one. New ids are appended to the end of the
/// catalog; existing ids keep their original position.
pub async fn import_courses(pool: &PgPool, courses: &[Course]) -> anyhow::Result<usize> {
    let mut imported = 0usize;
    for course in courses {
        if upsert_course(pool, course).await? > 0 {
            imported += 1;
        }
    }

    info!(count = imported, "courses imported");
    Ok(imported)
}

pub async fn import_courses_csv(pool: &PgPool, csv_path: &Path) -> anyhow::Result<usize> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let courses = read_courses_csv(file)?;
    import_courses(pool, &courses).await
}
