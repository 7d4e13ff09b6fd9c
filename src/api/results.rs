use axum::extract::{Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::errors::{is_foreign_key_violation, ApiError};
use crate::api::validation::trimmed;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::ResultStatus;
use crate::repositories;
use crate::repositories::results::UpsertResult;
use crate::schemas::results::{
    BulkUpdatePayload, BulkUpdateResponse, ExamResultResponse, ResultRow,
    ResultsForEditingResponse, ResultsQuery, SheetMetadata, StudentRef,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/results-for-editing", get(results_for_editing))
        .route("/bulk-update-results", put(bulk_update_results))
        .route("/bulk-update-results-edit", put(bulk_update_results_edit))
}

/// Converts raw marks to a percentage, rounded to two decimals. A missing or
/// non-positive denominator falls back to 100.
pub(crate) fn derive_percentage(marks: f64, out_of: Option<f64>) -> f64 {
    let denominator = match out_of {
        Some(value) if value > 0.0 => value,
        _ => 100.0,
    };
    (marks / denominator * 100.0 * 100.0).round() / 100.0
}

async fn results_for_editing(
    State(state): State<AppState>,
    Query(params): Query<ResultsQuery>,
) -> Result<Json<ResultsForEditingResponse>, ApiError> {
    let (Some(class_id), Some(subject_id), Some(exam_id)) = (
        trimmed(&params.class_id),
        trimmed(&params.subject_id),
        trimmed(&params.exam_id),
    ) else {
        return Err(ApiError::BadRequest(
            "class_id, subject_id, and exam_id are required.".to_string(),
        ));
    };

    let students = repositories::students::list_by_class(state.db(), class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load class students"))?;

    let results = repositories::results::list_for_sheet(state.db(), class_id, exam_id, subject_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load results"))?;

    // Every student in the class gets a row; stored marks attach where present.
    let rows = students
        .into_iter()
        .map(|student| {
            let result = results.iter().find(|r| r.student_adm_no == student.student_adm_no);
            ResultRow {
                result_id: result.map(|r| r.result_id.clone()),
                student_adm_no: student.student_adm_no.clone(),
                student: StudentRef {
                    student_adm_no: student.student_adm_no,
                    student_name: student.students_name,
                },
                marks: result.and_then(|r| r.marks),
                percentage: result.and_then(|r| r.percentage),
                grade: result.and_then(|r| r.grade.clone()),
            }
        })
        .collect();

    let sheet = repositories::results::find_status(state.db(), class_id, exam_id, subject_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load sheet status"))?;

    let metadata = SheetMetadata {
        class_exam_status: sheet.as_ref().map(|s| s.status).unwrap_or(ResultStatus::Upload),
        status_version: sheet.map(|s| s.version).unwrap_or(0),
    };

    Ok(Json(ResultsForEditingResponse { results: rows, metadata }))
}

/// Upload path: a publishing save moves the sheet to `publish`.
async fn bulk_update_results(
    State(state): State<AppState>,
    Json(payload): Json<BulkUpdatePayload>,
) -> Result<Json<BulkUpdateResponse>, ApiError> {
    apply_bulk_update(&state, payload, ResultStatus::Publish).await
}

/// Edit path: a publishing save moves the sheet to `analyse`.
async fn bulk_update_results_edit(
    State(state): State<AppState>,
    Json(payload): Json<BulkUpdatePayload>,
) -> Result<Json<BulkUpdateResponse>, ApiError> {
    apply_bulk_update(&state, payload, ResultStatus::Analyse).await
}

/// Saves a batch of marks and, when `publish` is set, advances the sheet
/// status, all inside one transaction. Any failure rolls back the whole batch.
async fn apply_bulk_update(
    state: &AppState,
    payload: BulkUpdatePayload,
    publish_target: ResultStatus,
) -> Result<Json<BulkUpdateResponse>, ApiError> {
    let (Some(exam_id), Some(subject_id), Some(class_id), Some(updates)) = (
        trimmed(&payload.exam_id),
        trimmed(&payload.subject_id),
        trimmed(&payload.class_id),
        payload.updates.as_deref(),
    ) else {
        return Err(ApiError::BadRequest(
            "exam_id, subject_id, class_id, and updates array are required.".to_string(),
        ));
    };

    let publish = payload.publish.unwrap_or(false);
    let now = primitive_now_utc();

    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    // Concurrent saves for the same sheet serialize on this row lock.
    let mut sheet = repositories::results::lock_status(&mut *tx, class_id, exam_id, subject_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to lock sheet status"))?;

    if sheet.is_none() && publish {
        sheet =
            repositories::results::insert_status(&mut *tx, class_id, exam_id, subject_id, now)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to create sheet status"))?;
        if sheet.is_none() {
            // Lost the insert race; the winner's row is now visible and lockable.
            sheet = repositories::results::lock_status(&mut *tx, class_id, exam_id, subject_id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to lock sheet status"))?;
        }
    }

    let current_status = sheet.as_ref().map(|s| s.status).unwrap_or(ResultStatus::Upload);
    let current_version = sheet.as_ref().map(|s| s.version).unwrap_or(0);

    if let Some(expected) = payload.status_version {
        if expected != current_version {
            return Err(ApiError::Conflict(
                "Results changed since they were loaded. Reload the sheet and try again."
                    .to_string(),
            ));
        }
    }

    if publish && !current_status.can_transition(publish_target) {
        return Err(ApiError::Conflict(format!(
            "Results cannot move from '{}' to '{}'.",
            current_status.as_str(),
            publish_target.as_str(),
        )));
    }

    let mut updated_results = Vec::with_capacity(updates.len());
    for entry in updates {
        let student_adm_no = entry.student_adm_no.trim();
        let percentage = entry
            .percentage
            .or_else(|| entry.marks.map(|marks| derive_percentage(marks, payload.out_of)));

        let result_id = Uuid::new_v4().to_string();
        let result = repositories::results::upsert(
            &mut *tx,
            UpsertResult {
                result_id: &result_id,
                student_adm_no,
                exam_id,
                subject_id,
                class_id,
                marks: entry.marks,
                percentage,
                now,
            },
        )
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                ApiError::NotFound(format!(
                    "Unknown student, class, exam, or subject for entry '{student_adm_no}'."
                ))
            } else {
                ApiError::internal(e, "Failed to save result")
            }
        })?;

        updated_results.push(ExamResultResponse::from_db(result));
    }

    if publish && publish_target != current_status {
        repositories::results::set_status(
            &mut *tx,
            class_id,
            exam_id,
            subject_id,
            publish_target,
            current_version + 1,
            now,
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update sheet status"))?;
    }

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    Ok(Json(BulkUpdateResponse {
        message: "Results updated successfully!".to_string(),
        updated_results,
    }))
}
