use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::{is_foreign_key_violation, ApiError};
use crate::api::validation::trimmed;
use crate::core::state::AppState;
use crate::core::time::{parse_date_flexible, primitive_now_utc};
use crate::repositories;
use crate::schemas::class::ClassSummary;
use crate::schemas::exam::{ExamCreate, ExamResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/add-exam", post(add_exam))
        .route("/fetch-all-exams", get(fetch_all_exams))
        .route("/delete-exam/:exam_id", delete(delete_exam))
}

#[derive(Debug, Deserialize)]
struct ListExamsQuery {
    #[serde(default)]
    year: Option<i32>,
}

async fn add_exam(
    State(state): State<AppState>,
    Json(payload): Json<ExamCreate>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let (Some(name), Some(date), Some(term), Some(year), Some(status), Some(class_ids)) = (
        trimmed(&payload.name),
        trimmed(&payload.date),
        payload.term,
        payload.year,
        payload.status,
        payload.class_ids.as_ref(),
    ) else {
        return Err(ApiError::BadRequest(
            "name, date, term, year, status, and class_ids (array) are required.".to_string(),
        ));
    };
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let date = parse_date_flexible(date)
        .ok_or_else(|| ApiError::BadRequest("Invalid date. Use YYYY-MM-DD.".to_string()))?;

    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    let now = primitive_now_utc();
    let exam = repositories::exams::create(
        &mut *tx,
        repositories::exams::CreateExam {
            exam_id: &Uuid::new_v4().to_string(),
            name,
            date,
            term,
            year,
            status,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to add exam"))?;

    for class_id in class_ids {
        repositories::exams::link_class(&mut *tx, class_id, &exam.exam_id, now).await.map_err(
            |e| {
                if is_foreign_key_violation(&e) {
                    ApiError::BadRequest("Invalid class_id. Class does not exist.".to_string())
                } else {
                    ApiError::internal(e, "Failed to link exam class")
                }
            },
        )?;
    }

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    let links = repositories::exams::list_class_links(state.db(), &[exam.exam_id.clone()])
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load exam classes"))?;
    let classes = links
        .into_iter()
        .map(|link| ClassSummary {
            class_id: link.class_id,
            class_level: link.class_level,
            class_stream: link.class_stream,
            school_id: link.school_id,
        })
        .collect();

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Exam added successfully!",
            "exam": ExamResponse::from_db(exam, classes),
        })),
    ))
}

async fn fetch_all_exams(
    State(state): State<AppState>,
    Query(params): Query<ListExamsQuery>,
) -> Result<Json<Vec<ExamResponse>>, ApiError> {
    let year = params.year.unwrap_or_else(|| OffsetDateTime::now_utc().year());

    let exams = repositories::exams::list_by_year(state.db(), year)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch exams"))?;

    let exam_ids: Vec<String> = exams.iter().map(|e| e.exam_id.clone()).collect();
    let links = repositories::exams::list_class_links(state.db(), &exam_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch exam classes"))?;

    let mut by_exam: HashMap<String, Vec<ClassSummary>> = HashMap::new();
    for link in links {
        by_exam.entry(link.exam_id).or_default().push(ClassSummary {
            class_id: link.class_id,
            class_level: link.class_level,
            class_stream: link.class_stream,
            school_id: link.school_id,
        });
    }

    let response = exams
        .into_iter()
        .map(|exam| {
            let classes = by_exam.remove(&exam.exam_id).unwrap_or_default();
            ExamResponse::from_db(exam, classes)
        })
        .collect();

    Ok(Json(response))
}

async fn delete_exam(
    State(state): State<AppState>,
    Path(exam_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    repositories::exams::delete_class_links(&mut *tx, &exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete exam classes"))?;

    let deleted = repositories::exams::delete_by_id(&mut *tx, &exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete exam"))?;

    let Some(exam) = deleted else {
        return Err(ApiError::NotFound("Exam not found or already deleted.".to_string()));
    };

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    Ok(Json(serde_json::json!({
        "message": "Exam deleted successfully!",
        "exam": ExamResponse::from_db(exam, Vec::new()),
    })))
}

#[cfg(test)]
mod tests;
