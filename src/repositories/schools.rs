use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::School;

const COLUMNS: &str = "\
    school_id, name, location, username, created_at, updated_at";

pub(crate) struct CreateSchool<'a> {
    pub(crate) school_id: &'a str,
    pub(crate) name: &'a str,
    pub(crate) location: Option<&'a str>,
    pub(crate) username: &'a str,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) struct UpdateSchool<'a> {
    pub(crate) school_id: &'a str,
    pub(crate) name: Option<&'a str>,
    pub(crate) location: Option<&'a str>,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateSchool<'_>) -> Result<School, sqlx::Error> {
    sqlx::query_as::<_, School>(&format!(
        "INSERT INTO schools (
            school_id, name, location, username, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6)
         RETURNING {COLUMNS}"
    ))
    .bind(params.school_id)
    .bind(params.name)
    .bind(params.location)
    .bind(params.username)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_all(pool: &PgPool) -> Result<Vec<School>, sqlx::Error> {
    sqlx::query_as::<_, School>(&format!("SELECT {COLUMNS} FROM schools ORDER BY created_at ASC"))
        .fetch_all(pool)
        .await
}

/// COALESCE keeps columns the caller left out.
pub(crate) async fn update(
    pool: &PgPool,
    params: UpdateSchool<'_>,
) -> Result<Option<School>, sqlx::Error> {
    sqlx::query_as::<_, School>(&format!(
        "UPDATE schools
         SET name = COALESCE($1, name),
             location = COALESCE($2, location),
             updated_at = $3
         WHERE school_id = $4
         RETURNING {COLUMNS}"
    ))
    .bind(params.name)
    .bind(params.location)
    .bind(params.updated_at)
    .bind(params.school_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: &str) -> Result<Option<School>, sqlx::Error> {
    sqlx::query_as::<_, School>(&format!(
        "DELETE FROM schools WHERE school_id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}
