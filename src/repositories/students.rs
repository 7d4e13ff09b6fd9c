use sqlx::{FromRow, PgPool};
use time::PrimitiveDateTime;

use crate::db::models::Student;

const COLUMNS: &str = "\
    student_adm_no, students_name, kcse_entry, class_id, created_at, updated_at";

/// Student row joined with its class, for listings.
#[derive(Debug, FromRow)]
pub(crate) struct StudentWithClassRow {
    pub(crate) student_adm_no: String,
    pub(crate) students_name: String,
    pub(crate) kcse_entry: f64,
    pub(crate) class_id: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
    pub(crate) class_level: i32,
    pub(crate) class_stream: String,
    pub(crate) school_id: Option<String>,
}

pub(crate) struct CreateStudent<'a> {
    pub(crate) student_adm_no: &'a str,
    pub(crate) students_name: &'a str,
    pub(crate) kcse_entry: f64,
    pub(crate) class_id: &'a str,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateStudent<'_>,
) -> Result<Student, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "INSERT INTO students (
            student_adm_no, students_name, kcse_entry, class_id, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6)
         RETURNING {COLUMNS}"
    ))
    .bind(params.student_adm_no)
    .bind(params.students_name)
    .bind(params.kcse_entry)
    .bind(params.class_id)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_all_with_class(
    pool: &PgPool,
) -> Result<Vec<StudentWithClassRow>, sqlx::Error> {
    sqlx::query_as::<_, StudentWithClassRow>(
        "SELECT s.student_adm_no, s.students_name, s.kcse_entry, s.class_id,
                s.created_at, s.updated_at, c.class_level, c.class_stream, c.school_id
         FROM students s
         JOIN classes c ON c.class_id = s.class_id
         ORDER BY s.students_name ASC",
    )
    .fetch_all(pool)
    .await
}

/// Class roster in display order for the results sheet.
pub(crate) async fn list_by_class(
    pool: &PgPool,
    class_id: &str,
) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "SELECT {COLUMNS} FROM students WHERE class_id = $1 ORDER BY students_name ASC"
    ))
    .bind(class_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn delete_by_adm(
    pool: &PgPool,
    student_adm_no: &str,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "DELETE FROM students WHERE student_adm_no = $1 RETURNING {COLUMNS}"
    ))
    .bind(student_adm_no)
    .fetch_optional(pool)
    .await
}
