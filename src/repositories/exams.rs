use sqlx::{FromRow, PgPool};
use time::{Date, PrimitiveDateTime};

use crate::db::models::Exam;
use crate::db::types::ExamStatus;

const COLUMNS: &str = "\
    exam_id, name, date, term, year, status, created_at, updated_at";

/// Class joined through its exam link, for embedding target classes.
#[derive(Debug, FromRow)]
pub(crate) struct ExamClassRow {
    pub(crate) exam_id: String,
    pub(crate) class_id: String,
    pub(crate) class_level: i32,
    pub(crate) class_stream: String,
    pub(crate) school_id: Option<String>,
}

pub(crate) struct CreateExam<'a> {
    pub(crate) exam_id: &'a str,
    pub(crate) name: &'a str,
    pub(crate) date: Date,
    pub(crate) term: i32,
    pub(crate) year: i32,
    pub(crate) status: ExamStatus,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateExam<'_>,
) -> Result<Exam, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "INSERT INTO exams (
            exam_id, name, date, term, year, status, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
         RETURNING {COLUMNS}"
    ))
    .bind(params.exam_id)
    .bind(params.name)
    .bind(params.date)
    .bind(params.term)
    .bind(params.year)
    .bind(params.status)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(executor)
    .await
}

pub(crate) async fn link_class(
    executor: impl sqlx::PgExecutor<'_>,
    class_id: &str,
    exam_id: &str,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO class_exams (class_id, exam_id, created_at)
         VALUES ($1,$2,$3)
         ON CONFLICT (class_id, exam_id) DO NOTHING",
    )
    .bind(class_id)
    .bind(exam_id)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) async fn list_by_year(pool: &PgPool, year: i32) -> Result<Vec<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "SELECT {COLUMNS} FROM exams WHERE year = $1 ORDER BY date DESC"
    ))
    .bind(year)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_class_links(
    pool: &PgPool,
    exam_ids: &[String],
) -> Result<Vec<ExamClassRow>, sqlx::Error> {
    if exam_ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as::<_, ExamClassRow>(
        "SELECT ce.exam_id, c.class_id, c.class_level, c.class_stream, c.school_id
         FROM class_exams ce
         JOIN classes c ON c.class_id = ce.class_id
         WHERE ce.exam_id = ANY($1)
         ORDER BY c.class_level ASC, c.class_stream ASC",
    )
    .bind(exam_ids)
    .fetch_all(pool)
    .await
}

pub(crate) async fn delete_class_links(
    executor: impl sqlx::PgExecutor<'_>,
    exam_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM class_exams WHERE exam_id = $1")
        .bind(exam_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub(crate) async fn delete_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    exam_id: &str,
) -> Result<Option<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "DELETE FROM exams WHERE exam_id = $1 RETURNING {COLUMNS}"
    ))
    .bind(exam_id)
    .fetch_optional(executor)
    .await
}
