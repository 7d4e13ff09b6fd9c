use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::{ClassExamSubject, ExamResult};
use crate::db::types::ResultStatus;

const RESULT_COLUMNS: &str = "\
    result_id, student_adm_no, exam_id, subject_id, class_id, marks, percentage, grade, \
    created_at, updated_at";

const STATUS_COLUMNS: &str = "\
    class_id, exam_id, subject_id, status, version, created_at, updated_at";

pub(crate) struct UpsertResult<'a> {
    pub(crate) result_id: &'a str,
    pub(crate) student_adm_no: &'a str,
    pub(crate) exam_id: &'a str,
    pub(crate) subject_id: &'a str,
    pub(crate) class_id: &'a str,
    pub(crate) marks: Option<f64>,
    pub(crate) percentage: Option<f64>,
    pub(crate) now: PrimitiveDateTime,
}

pub(crate) async fn list_for_sheet(
    pool: &PgPool,
    class_id: &str,
    exam_id: &str,
    subject_id: &str,
) -> Result<Vec<ExamResult>, sqlx::Error> {
    sqlx::query_as::<_, ExamResult>(&format!(
        "SELECT {RESULT_COLUMNS} FROM exam_results
         WHERE class_id = $1 AND exam_id = $2 AND subject_id = $3"
    ))
    .bind(class_id)
    .bind(exam_id)
    .bind(subject_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn find_status(
    pool: &PgPool,
    class_id: &str,
    exam_id: &str,
    subject_id: &str,
) -> Result<Option<ClassExamSubject>, sqlx::Error> {
    sqlx::query_as::<_, ClassExamSubject>(&format!(
        "SELECT {STATUS_COLUMNS} FROM class_exam_subjects
         WHERE class_id = $1 AND exam_id = $2 AND subject_id = $3"
    ))
    .bind(class_id)
    .bind(exam_id)
    .bind(subject_id)
    .fetch_optional(pool)
    .await
}

/// One result row per (student, exam, subject); replays overwrite marks and
/// percentage in place. The stored class_id and grade of an existing row are
/// left untouched.
pub(crate) async fn upsert(
    executor: impl sqlx::PgExecutor<'_>,
    params: UpsertResult<'_>,
) -> Result<ExamResult, sqlx::Error> {
    sqlx::query_as::<_, ExamResult>(&format!(
        "INSERT INTO exam_results (
            result_id, student_adm_no, exam_id, subject_id, class_id,
            marks, percentage, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
         ON CONFLICT (student_adm_no, exam_id, subject_id)
         DO UPDATE SET marks = EXCLUDED.marks,
                       percentage = EXCLUDED.percentage,
                       updated_at = EXCLUDED.updated_at
         RETURNING {RESULT_COLUMNS}"
    ))
    .bind(params.result_id)
    .bind(params.student_adm_no)
    .bind(params.exam_id)
    .bind(params.subject_id)
    .bind(params.class_id)
    .bind(params.marks)
    .bind(params.percentage)
    .bind(params.now)
    .bind(params.now)
    .fetch_one(executor)
    .await
}

/// Row lock for the publish decision; concurrent publishes on the same sheet
/// serialize here.
pub(crate) async fn lock_status(
    executor: impl sqlx::PgExecutor<'_>,
    class_id: &str,
    exam_id: &str,
    subject_id: &str,
) -> Result<Option<ClassExamSubject>, sqlx::Error> {
    sqlx::query_as::<_, ClassExamSubject>(&format!(
        "SELECT {STATUS_COLUMNS} FROM class_exam_subjects
         WHERE class_id = $1 AND exam_id = $2 AND subject_id = $3
         FOR UPDATE"
    ))
    .bind(class_id)
    .bind(exam_id)
    .bind(subject_id)
    .fetch_optional(executor)
    .await
}

/// Creates the sheet row at its initial state. Returns None when another
/// writer inserted it first; callers re-lock in that case.
pub(crate) async fn insert_status(
    executor: impl sqlx::PgExecutor<'_>,
    class_id: &str,
    exam_id: &str,
    subject_id: &str,
    now: PrimitiveDateTime,
) -> Result<Option<ClassExamSubject>, sqlx::Error> {
    sqlx::query_as::<_, ClassExamSubject>(&format!(
        "INSERT INTO class_exam_subjects (
            class_id, exam_id, subject_id, status, version, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,0,$5,$6)
         ON CONFLICT (class_id, exam_id, subject_id) DO NOTHING
         RETURNING {STATUS_COLUMNS}"
    ))
    .bind(class_id)
    .bind(exam_id)
    .bind(subject_id)
    .bind(ResultStatus::Upload)
    .bind(now)
    .bind(now)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn set_status(
    executor: impl sqlx::PgExecutor<'_>,
    class_id: &str,
    exam_id: &str,
    subject_id: &str,
    status: ResultStatus,
    version: i32,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE class_exam_subjects
         SET status = $4, version = $5, updated_at = $6
         WHERE class_id = $1 AND exam_id = $2 AND subject_id = $3",
    )
    .bind(class_id)
    .bind(exam_id)
    .bind(subject_id)
    .bind(status)
    .bind(version)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}
