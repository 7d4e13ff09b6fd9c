use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::security;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::auth::{LoginRequest, LoginResponse};
use crate::schemas::user::UserResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/login", post(login)).route("/me", get(me))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let username = payload.username.as_deref().map(str::trim).unwrap_or_default();
    let password = payload.password.as_deref().unwrap_or_default();
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::BadRequest("Username and password are required".to_string()));
    }

    let user = repositories::users::find_by_identifier(state.db(), username)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let verified = security::verify_password(password, &user.hashed_password)
        .map_err(|e| ApiError::internal(e, "Failed to verify password"))?;

    if !verified {
        return Err(ApiError::Unauthorized("Invalid credentials"));
    }

    let token = security::create_access_token(&user, state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        user: UserResponse::from_db(user),
    }))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from_db(user))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::db::types::UserRole;
    use crate::test_support;

    #[tokio::test]
    async fn login_returns_token_usable_on_me() {
        let ctx = test_support::setup_test_context().await;
        test_support::insert_user(ctx.state.db(), "mwalimu", UserRole::Admin, "chalk-dust").await;

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({"username": "mwalimu", "password": "chalk-dust"})),
            ))
            .await
            .expect("login");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {body}");
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Login successful");
        assert_eq!(body["user"]["username"], "mwalimu");
        let token = body["token"].as_str().expect("token").to_string();

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::GET,
                "/api/v1/auth/me",
                Some(&token),
                None,
            ))
            .await
            .expect("me");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {body}");
        assert_eq!(body["username"], "mwalimu");
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let ctx = test_support::setup_test_context().await;
        test_support::insert_user(ctx.state.db(), "mwalimu", UserRole::Admin, "chalk-dust").await;

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({"username": "mwalimu", "password": "wrong"})),
            ))
            .await
            .expect("login");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "response: {body}");
        assert_eq!(body["detail"], "Invalid credentials");
    }

    #[tokio::test]
    async fn login_rejects_unknown_user_and_blank_fields() {
        let ctx = test_support::setup_test_context().await;

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({"username": "ghost", "password": "whatever"})),
            ))
            .await
            .expect("login");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "response: {body}");
        assert_eq!(body["detail"], "User not found");

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({"username": "  "})),
            ))
            .await
            .expect("login");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
        assert_eq!(body["detail"], "Username and password are required");
    }

    #[tokio::test]
    async fn me_requires_a_valid_token() {
        let ctx = test_support::setup_test_context().await;

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::GET,
                "/api/v1/auth/me",
                Some("not-a-jwt"),
                None,
            ))
            .await
            .expect("me");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "response: {body}");
        assert_eq!(body["detail"], "Invalid authentication credentials");
    }
}
