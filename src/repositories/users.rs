use sqlx::{FromRow, PgPool};
use time::{Date, PrimitiveDateTime};

use crate::db::models::User;
use crate::db::types::UserRole;

const COLUMNS: &str = "\
    user_id, first_name, last_name, phone_number, email, dob, username, \
    hashed_password, role, school_id, created_at, updated_at";

/// User row joined with its school summary, for listings.
#[derive(Debug, FromRow)]
pub(crate) struct UserWithSchoolRow {
    pub(crate) user_id: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) phone_number: String,
    pub(crate) email: String,
    pub(crate) dob: Date,
    pub(crate) username: String,
    pub(crate) role: UserRole,
    pub(crate) school_id: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
    pub(crate) school_name: Option<String>,
    pub(crate) school_location: Option<String>,
    pub(crate) school_username: Option<String>,
}

pub(crate) struct CreateUser<'a> {
    pub(crate) user_id: &'a str,
    pub(crate) first_name: &'a str,
    pub(crate) last_name: &'a str,
    pub(crate) phone_number: &'a str,
    pub(crate) email: &'a str,
    pub(crate) dob: Date,
    pub(crate) username: &'a str,
    pub(crate) hashed_password: String,
    pub(crate) role: UserRole,
    pub(crate) school_id: Option<&'a str>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE user_id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE username = $1"))
        .bind(username)
        .fetch_optional(pool)
        .await
}

/// Login lookup: the submitted name may be either the username or the email.
pub(crate) async fn find_by_identifier(
    pool: &PgPool,
    identifier: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {COLUMNS} FROM users WHERE username = $1 OR email = $1 LIMIT 1"
    ))
    .bind(identifier)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn create(pool: &PgPool, params: CreateUser<'_>) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (
            user_id, first_name, last_name, phone_number, email, dob, username,
            hashed_password, role, school_id, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12)
        RETURNING {COLUMNS}"
    ))
    .bind(params.user_id)
    .bind(params.first_name)
    .bind(params.last_name)
    .bind(params.phone_number)
    .bind(params.email)
    .bind(params.dob)
    .bind(params.username)
    .bind(params.hashed_password)
    .bind(params.role)
    .bind(params.school_id)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_all_with_school(
    pool: &PgPool,
) -> Result<Vec<UserWithSchoolRow>, sqlx::Error> {
    sqlx::query_as::<_, UserWithSchoolRow>(
        "SELECT u.user_id, u.first_name, u.last_name, u.phone_number, u.email, u.dob,
                u.username, u.role, u.school_id, u.created_at, u.updated_at,
                s.name AS school_name, s.location AS school_location,
                s.username AS school_username
         FROM users u
         LEFT JOIN schools s ON s.school_id = u.school_id
         ORDER BY u.created_at ASC",
    )
    .fetch_all(pool)
    .await
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "DELETE FROM users WHERE user_id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}
