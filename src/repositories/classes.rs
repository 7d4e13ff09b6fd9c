use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Class;

const COLUMNS: &str = "\
    class_id, class_level, class_stream, school_id, created_at, updated_at";

pub(crate) struct CreateClass<'a> {
    pub(crate) class_id: &'a str,
    pub(crate) class_level: i32,
    pub(crate) class_stream: &'a str,
    pub(crate) school_id: Option<&'a str>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateClass<'_>) -> Result<Class, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!(
        "INSERT INTO classes (
            class_id, class_level, class_stream, school_id, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6)
         RETURNING {COLUMNS}"
    ))
    .bind(params.class_id)
    .bind(params.class_level)
    .bind(params.class_stream)
    .bind(params.school_id)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_all(pool: &PgPool) -> Result<Vec<Class>, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!(
        "SELECT {COLUMNS} FROM classes ORDER BY class_level ASC, class_stream ASC"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_school_ids(
    pool: &PgPool,
    school_ids: &[String],
) -> Result<Vec<Class>, sqlx::Error> {
    if school_ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as::<_, Class>(&format!(
        "SELECT {COLUMNS} FROM classes
         WHERE school_id = ANY($1)
         ORDER BY class_level ASC, class_stream ASC"
    ))
    .bind(school_ids)
    .fetch_all(pool)
    .await
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: &str) -> Result<Option<Class>, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!(
        "DELETE FROM classes WHERE class_id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}
