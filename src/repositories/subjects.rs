use sqlx::{FromRow, PgPool};
use time::PrimitiveDateTime;

use crate::db::models::{StudentSubject, Subject};

const COLUMNS: &str = "\
    subject_id, subject_name, created_at, updated_at";

/// One enrolment row: the subject id plus the enrolled student.
#[derive(Debug, FromRow)]
pub(crate) struct SubjectStudentRow {
    pub(crate) subject_id: String,
    pub(crate) student_adm_no: String,
    pub(crate) students_name: String,
    pub(crate) kcse_entry: f64,
    pub(crate) class_id: String,
}

pub(crate) struct CreateSubject<'a> {
    pub(crate) subject_id: &'a str,
    pub(crate) subject_name: &'a str,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateSubject<'_>,
) -> Result<Subject, sqlx::Error> {
    sqlx::query_as::<_, Subject>(&format!(
        "INSERT INTO subjects (
            subject_id, subject_name, created_at, updated_at
         ) VALUES ($1,$2,$3,$4)
         RETURNING {COLUMNS}"
    ))
    .bind(params.subject_id)
    .bind(params.subject_name)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_all(pool: &PgPool) -> Result<Vec<Subject>, sqlx::Error> {
    sqlx::query_as::<_, Subject>(&format!(
        "SELECT {COLUMNS} FROM subjects ORDER BY created_at ASC"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: &str) -> Result<Option<Subject>, sqlx::Error> {
    sqlx::query_as::<_, Subject>(&format!(
        "DELETE FROM subjects WHERE subject_id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn assign(
    pool: &PgPool,
    student_adm_no: &str,
    subject_id: &str,
    now: PrimitiveDateTime,
) -> Result<StudentSubject, sqlx::Error> {
    sqlx::query_as::<_, StudentSubject>(
        "INSERT INTO student_subjects (student_adm_no, subject_id, created_at)
         VALUES ($1,$2,$3)
         RETURNING student_adm_no, subject_id, created_at",
    )
    .bind(student_adm_no)
    .bind(subject_id)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub(crate) async fn unassign(
    pool: &PgPool,
    student_adm_no: &str,
    subject_id: &str,
) -> Result<Option<StudentSubject>, sqlx::Error> {
    sqlx::query_as::<_, StudentSubject>(
        "DELETE FROM student_subjects
         WHERE student_adm_no = $1 AND subject_id = $2
         RETURNING student_adm_no, subject_id, created_at",
    )
    .bind(student_adm_no)
    .bind(subject_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_students_by_subject_ids(
    pool: &PgPool,
    subject_ids: &[String],
) -> Result<Vec<SubjectStudentRow>, sqlx::Error> {
    if subject_ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as::<_, SubjectStudentRow>(
        "SELECT ss.subject_id, s.student_adm_no, s.students_name, s.kcse_entry, s.class_id
         FROM student_subjects ss
         JOIN students s ON s.student_adm_no = ss.student_adm_no
         WHERE ss.subject_id = ANY($1)
         ORDER BY s.students_name ASC",
    )
    .bind(subject_ids)
    .fetch_all(pool)
    .await
}
