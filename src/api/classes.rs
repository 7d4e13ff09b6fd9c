use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::validation::trimmed;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::class::{ClassCreate, ClassResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/add-class", post(add_class))
        .route("/fetch-all-classes", get(fetch_all_classes))
        .route("/delete-class-by-id", delete(delete_class_by_id))
}

#[derive(Debug, Deserialize)]
struct DeleteClassQuery {
    #[serde(default)]
    id: Option<String>,
}

async fn add_class(
    State(state): State<AppState>,
    Json(payload): Json<ClassCreate>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let (Some(class_level), Some(class_stream)) =
        (payload.class_level, trimmed(&payload.class_stream))
    else {
        return Err(ApiError::BadRequest(
            "class_level must be a number and class_stream is required.".to_string(),
        ));
    };

    let now = primitive_now_utc();
    let class = repositories::classes::create(
        state.db(),
        repositories::classes::CreateClass {
            class_id: &Uuid::new_v4().to_string(),
            class_level,
            class_stream,
            school_id: payload.school_id.as_deref(),
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to add class"))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Class added successfully!",
            "class": ClassResponse::from_db(class),
        })),
    ))
}

async fn fetch_all_classes(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClassResponse>>, ApiError> {
    let classes = repositories::classes::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch classes"))?;

    Ok(Json(classes.into_iter().map(ClassResponse::from_db).collect()))
}

async fn delete_class_by_id(
    State(state): State<AppState>,
    Query(params): Query<DeleteClassQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(id) = trimmed(&params.id) else {
        return Err(ApiError::BadRequest("ID is required.".to_string()));
    };

    let deleted = repositories::classes::delete_by_id(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete class"))?;

    let Some(class) = deleted else {
        return Err(ApiError::NotFound("Class not found or already deleted.".to_string()));
    };

    Ok(Json(serde_json::json!({
        "message": "Class deleted successfully!",
        "class": ClassResponse::from_db(class),
    })))
}
