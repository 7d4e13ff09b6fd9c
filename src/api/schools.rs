use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::errors::{is_unique_violation, ApiError};
use crate::api::validation::trimmed;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::class::ClassResponse;
use crate::schemas::school::{
    SchoolCreate, SchoolResponse, SchoolUpdate, SchoolWithClassesResponse,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/add-school", post(add_school))
        .route("/fetch-all-schools", get(fetch_all_schools))
        .route("/delete-school-by-id", delete(delete_school_by_id))
        .route("/update-school", put(update_school))
}

#[derive(Debug, Deserialize)]
struct DeleteSchoolQuery {
    #[serde(default)]
    #[serde(alias = "schoolId")]
    school_id: Option<String>,
}

async fn add_school(
    State(state): State<AppState>,
    Json(payload): Json<SchoolCreate>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let (Some(name), Some(username)) =
        (trimmed(&payload.name), trimmed(&payload.school_username))
    else {
        return Err(ApiError::BadRequest("school_name and username are required.".to_string()));
    };

    let now = primitive_now_utc();
    let school = repositories::schools::create(
        state.db(),
        repositories::schools::CreateSchool {
            school_id: &Uuid::new_v4().to_string(),
            name,
            location: payload.location.as_deref(),
            username,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict("School with this username already exists.".to_string())
        } else {
            ApiError::internal(e, "Failed to add school")
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "School added successfully!",
            "school": SchoolResponse::from_db(school),
        })),
    ))
}

async fn fetch_all_schools(
    State(state): State<AppState>,
) -> Result<Json<Vec<SchoolWithClassesResponse>>, ApiError> {
    let schools = repositories::schools::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch schools"))?;

    let school_ids: Vec<String> = schools.iter().map(|s| s.school_id.clone()).collect();
    let classes = repositories::classes::list_by_school_ids(state.db(), &school_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch school classes"))?;

    let mut by_school: HashMap<String, Vec<ClassResponse>> = HashMap::new();
    for class in classes {
        if let Some(school_id) = class.school_id.clone() {
            by_school.entry(school_id).or_default().push(ClassResponse::from_db(class));
        }
    }

    let response = schools
        .into_iter()
        .map(|school| {
            let classes = by_school.remove(&school.school_id).unwrap_or_default();
            SchoolWithClassesResponse::from_db(school, classes)
        })
        .collect();

    Ok(Json(response))
}

async fn delete_school_by_id(
    State(state): State<AppState>,
    Query(params): Query<DeleteSchoolQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(school_id) = trimmed(&params.school_id) else {
        return Err(ApiError::BadRequest("school_id is required.".to_string()));
    };

    let deleted = repositories::schools::delete_by_id(state.db(), school_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete school"))?;

    let Some(school) = deleted else {
        return Err(ApiError::NotFound("School not found or already deleted.".to_string()));
    };

    Ok(Json(serde_json::json!({
        "message": "School deleted successfully!",
        "school": SchoolResponse::from_db(school),
    })))
}

async fn update_school(
    State(state): State<AppState>,
    Json(payload): Json<SchoolUpdate>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(school_id) = trimmed(&payload.school_id) else {
        return Err(ApiError::BadRequest("school_id is required.".to_string()));
    };

    let updated = repositories::schools::update(
        state.db(),
        repositories::schools::UpdateSchool {
            school_id,
            name: payload.name.as_deref(),
            location: payload.location.as_deref(),
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update school"))?;

    let Some(school) = updated else {
        return Err(ApiError::NotFound("School not found.".to_string()));
    };

    Ok(Json(serde_json::json!({
        "message": "School updated successfully!",
        "school": SchoolResponse::from_db(school),
    })))
}
