use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::errors::{is_unique_violation, ApiError};
use crate::api::guards::CurrentAdmin;
use crate::api::validation::trimmed;
use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::{parse_date_flexible, primitive_now_utc};
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::user::{UserCreate, UserResponse, UserWithSchoolResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/add-user", post(add_user))
        .route("/fetch-all-users", get(fetch_all_users))
        .route("/delete-user-by-id", delete(delete_user_by_id))
}

#[derive(Debug, Deserialize)]
struct DeleteUserQuery {
    #[serde(default)]
    #[serde(alias = "userId")]
    user_id: Option<String>,
}

async fn add_user(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<UserCreate>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let (first_name, last_name, phone_number, email, dob, username, password) = match (
        trimmed(&payload.first_name),
        trimmed(&payload.last_name),
        trimmed(&payload.phone_number),
        trimmed(&payload.email),
        trimmed(&payload.dob),
        trimmed(&payload.username),
        trimmed(&payload.password),
    ) {
        (Some(a), Some(b), Some(c), Some(d), Some(e), Some(f), Some(g)) => (a, b, c, d, e, f, g),
        _ => {
            return Err(ApiError::BadRequest(
                "All fields except role are required.".to_string(),
            ))
        }
    };

    let dob = parse_date_flexible(dob)
        .ok_or_else(|| ApiError::BadRequest("Invalid dob. Use YYYY-MM-DD.".to_string()))?;

    let hashed_password = security::hash_password(password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    let now = primitive_now_utc();
    let user = repositories::users::create(
        state.db(),
        repositories::users::CreateUser {
            user_id: &Uuid::new_v4().to_string(),
            first_name,
            last_name,
            phone_number,
            email,
            dob,
            username,
            hashed_password,
            role: payload.role.unwrap_or(UserRole::Admin),
            school_id: payload.school_id.as_deref(),
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::BadRequest("User with this email or username already exists.".to_string())
        } else {
            ApiError::internal(e, "Failed to create user")
        }
    })?;

    let response = serde_json::json!({
        "message": "User created successfully!",
        "user": UserResponse::from_db(user),
    });

    Ok((StatusCode::CREATED, Json(response)))
}

async fn fetch_all_users(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserWithSchoolResponse>>, ApiError> {
    let rows = repositories::users::list_all_with_school(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list users"))?;

    Ok(Json(rows.into_iter().map(UserWithSchoolResponse::from_row).collect()))
}

async fn delete_user_by_id(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Query(params): Query<DeleteUserQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(user_id) = trimmed(&params.user_id) else {
        return Err(ApiError::BadRequest("user_id is required.".to_string()));
    };

    let deleted = repositories::users::delete_by_id(state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete user"))?;

    let Some(user) = deleted else {
        return Err(ApiError::NotFound("User not found or already deleted.".to_string()));
    };

    Ok(Json(serde_json::json!({
        "message": "User deleted successfully!",
        "user": UserResponse::from_db(user),
    })))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::db::types::UserRole;
    use crate::test_support;

    #[tokio::test]
    async fn admin_can_create_list_and_delete_user() {
        let ctx = test_support::setup_test_context().await;

        let admin =
            test_support::insert_user(ctx.state.db(), "head", UserRole::Admin, "admin-pass").await;
        let token = test_support::bearer_token(&admin, ctx.state.settings());

        let create_payload = json!({
            "first_name": "Jane",
            "last_name": "Wanjiku",
            "phone_number": "0712345678",
            "email": "jane@school.example",
            "dob": "1990-04-12",
            "username": "jwanjiku",
            "password": "teacher-pass"
        });

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/admin/user/add-user",
                Some(&token),
                Some(create_payload),
            ))
            .await
            .expect("create user");

        let status = response.status();
        let created = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::CREATED, "response: {created}");
        assert_eq!(created["message"], "User created successfully!");
        assert_eq!(created["user"]["username"], "jwanjiku");
        assert_eq!(created["user"]["role"], "admin");
        assert_eq!(created["user"]["dob"], "1990-04-12");
        let user_id = created["user"]["user_id"].as_str().expect("user id").to_string();

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::GET,
                "/api/v1/admin/user/fetch-all-users",
                Some(&token),
                None,
            ))
            .await
            .expect("list users");

        let status = response.status();
        let listed = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {listed}");
        let usernames: Vec<_> = listed
            .as_array()
            .expect("user list")
            .iter()
            .map(|u| u["username"].as_str().unwrap_or_default().to_string())
            .collect();
        assert!(usernames.contains(&"jwanjiku".to_string()));

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::DELETE,
                &format!("/api/v1/admin/user/delete-user-by-id?user_id={user_id}"),
                Some(&token),
                None,
            ))
            .await
            .expect("delete user");

        let status = response.status();
        let deleted = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {deleted}");
        assert_eq!(deleted["message"], "User deleted successfully!");
        assert_eq!(deleted["user"]["user_id"], user_id.as_str());

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::DELETE,
                &format!("/api/v1/admin/user/delete-user-by-id?user_id={user_id}"),
                Some(&token),
                None,
            ))
            .await
            .expect("delete user again");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "response: {body}");
        assert_eq!(body["detail"], "User not found or already deleted.");
    }

    #[tokio::test]
    async fn add_user_requires_all_fields() {
        let ctx = test_support::setup_test_context().await;

        let admin =
            test_support::insert_user(ctx.state.db(), "head", UserRole::Admin, "admin-pass").await;
        let token = test_support::bearer_token(&admin, ctx.state.settings());

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/admin/user/add-user",
                Some(&token),
                Some(json!({
                    "first_name": "Jane",
                    "last_name": "Wanjiku",
                    "username": "jwanjiku",
                    "password": "teacher-pass"
                })),
            ))
            .await
            .expect("create user");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
        assert_eq!(body["detail"], "All fields except role are required.");
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let ctx = test_support::setup_test_context().await;

        let admin =
            test_support::insert_user(ctx.state.db(), "head", UserRole::Admin, "admin-pass").await;
        let token = test_support::bearer_token(&admin, ctx.state.settings());

        let payload = json!({
            "first_name": "Jane",
            "last_name": "Wanjiku",
            "phone_number": "0712345678",
            "email": "jane@school.example",
            "dob": "1990-04-12",
            "username": "jwanjiku",
            "password": "teacher-pass"
        });

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/admin/user/add-user",
                Some(&token),
                Some(payload.clone()),
            ))
            .await
            .expect("create user");
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/admin/user/add-user",
                Some(&token),
                Some(payload),
            ))
            .await
            .expect("create duplicate user");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
        assert_eq!(body["detail"], "User with this email or username already exists.");
    }

    #[tokio::test]
    async fn non_admin_cannot_manage_users() {
        let ctx = test_support::setup_test_context().await;

        let agent =
            test_support::insert_user(ctx.state.db(), "clerk", UserRole::Agent, "agent-pass").await;
        let token = test_support::bearer_token(&agent, ctx.state.settings());

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::GET,
                "/api/v1/admin/user/fetch-all-users",
                Some(&token),
                None,
            ))
            .await
            .expect("list users");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "response: {body}");
        assert_eq!(body["detail"], "Admin access required");
    }
}
