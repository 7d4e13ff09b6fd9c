use time::{Date, Month};
use uuid::Uuid;

use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories;

pub(crate) async fn ensure_superuser(state: &AppState) -> anyhow::Result<()> {
    let admin = state.settings().admin();
    if admin.first_superuser_password.is_empty() {
        tracing::warn!("FIRST_SUPERUSER_PASSWORD not configured; skipping superuser creation");
        return Ok(());
    }

    let username = &admin.first_superuser_username;
    let user = repositories::users::find_by_username(state.db(), username).await?;
    let now = primitive_now_utc();

    if let Some(user) = user {
        let mut needs_update = false;

        let verified =
            security::verify_password(&admin.first_superuser_password, &user.hashed_password)
                .unwrap_or(false);
        let hashed_password = if verified {
            user.hashed_password.clone()
        } else {
            needs_update = true;
            security::hash_password(&admin.first_superuser_password)?
        };

        let role = if user.role != UserRole::Admin {
            needs_update = true;
            UserRole::Admin
        } else {
            user.role
        };

        if needs_update {
            sqlx::query(
                "UPDATE users
                 SET hashed_password = $1,
                     role = $2,
                     updated_at = $3
                 WHERE user_id = $4",
            )
            .bind(hashed_password)
            .bind(role)
            .bind(now)
            .bind(user.user_id)
            .execute(state.db())
            .await?;

            tracing::info!("Updated default superuser {username}");
        } else {
            tracing::info!("Default superuser already up to date");
        }

        return Ok(());
    }

    let hashed_password = security::hash_password(&admin.first_superuser_password)?;
    // Synthetic account; the birth date is a placeholder.
    let dob = Date::from_calendar_date(1970, Month::January, 1)?;

    sqlx::query(
        "INSERT INTO users (
            user_id, first_name, last_name, phone_number, email, dob, username,
            hashed_password, role, school_id, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,NULL,$10,$11)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind("Super")
    .bind("Admin")
    .bind("")
    .bind(&admin.first_superuser_email)
    .bind(dob)
    .bind(username)
    .bind(hashed_password)
    .bind(UserRole::Admin)
    .bind(now)
    .bind(now)
    .execute(state.db())
    .await?;

    tracing::info!("Created default superuser {username}");
    Ok(())
}
