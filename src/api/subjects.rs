use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::errors::{is_foreign_key_violation, is_unique_violation, ApiError};
use crate::api::validation::trimmed;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::student::StudentSummary;
use crate::schemas::subject::{
    AssignSubject, AssignmentResponse, SubjectCreate, SubjectResponse, SubjectWithStudentsResponse,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/add-subject", post(add_subject))
        .route("/fetch-all-subjects", get(fetch_all_subjects))
        .route("/delete-subject-by-id", delete(delete_subject_by_id))
        .route("/assign-subject", post(assign_subject))
        .route("/unassign-subject", delete(unassign_subject))
}

#[derive(Debug, Deserialize)]
struct DeleteSubjectQuery {
    #[serde(default)]
    #[serde(alias = "subjectId")]
    subject_id: Option<String>,
}

async fn add_subject(
    State(state): State<AppState>,
    Json(payload): Json<SubjectCreate>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let Some(subject_name) = trimmed(&payload.subject_name) else {
        return Err(ApiError::BadRequest("subject_name is required.".to_string()));
    };

    let now = primitive_now_utc();
    let subject = repositories::subjects::create(
        state.db(),
        repositories::subjects::CreateSubject {
            subject_id: &Uuid::new_v4().to_string(),
            subject_name,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to add subject"))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Subject added successfully!",
            "subject": SubjectResponse::from_db(subject),
        })),
    ))
}

async fn fetch_all_subjects(
    State(state): State<AppState>,
) -> Result<Json<Vec<SubjectWithStudentsResponse>>, ApiError> {
    let subjects = repositories::subjects::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch subjects"))?;

    let subject_ids: Vec<String> = subjects.iter().map(|s| s.subject_id.clone()).collect();
    let enrolments = repositories::subjects::list_students_by_subject_ids(state.db(), &subject_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch subject students"))?;

    let mut by_subject: HashMap<String, Vec<StudentSummary>> = HashMap::new();
    for row in enrolments {
        by_subject.entry(row.subject_id).or_default().push(StudentSummary {
            student_adm_no: row.student_adm_no,
            students_name: row.students_name,
            kcse_entry: row.kcse_entry,
            class_id: row.class_id,
        });
    }

    let response = subjects
        .into_iter()
        .map(|subject| {
            let students = by_subject.remove(&subject.subject_id).unwrap_or_default();
            SubjectWithStudentsResponse::from_db(subject, students)
        })
        .collect();

    Ok(Json(response))
}

async fn delete_subject_by_id(
    State(state): State<AppState>,
    Query(params): Query<DeleteSubjectQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(subject_id) = trimmed(&params.subject_id) else {
        return Err(ApiError::BadRequest("subject_id is required.".to_string()));
    };

    let deleted = repositories::subjects::delete_by_id(state.db(), subject_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete subject"))?;

    let Some(subject) = deleted else {
        return Err(ApiError::NotFound("Subject not found or already deleted.".to_string()));
    };

    Ok(Json(serde_json::json!({
        "message": "Subject deleted successfully!",
        "subject": SubjectResponse::from_db(subject),
    })))
}

async fn assign_subject(
    State(state): State<AppState>,
    Json(payload): Json<AssignSubject>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let (Some(student_adm_no), Some(subject_id)) =
        (trimmed(&payload.student_adm_no), trimmed(&payload.subject_id))
    else {
        return Err(ApiError::BadRequest(
            "student_adm_no and subject_id are required.".to_string(),
        ));
    };

    let assignment = repositories::subjects::assign(
        state.db(),
        student_adm_no,
        subject_id,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| {
        if is_foreign_key_violation(&e) {
            ApiError::BadRequest("Invalid student_adm_no or subject_id.".to_string())
        } else if is_unique_violation(&e) {
            ApiError::BadRequest("Subject already assigned to this student.".to_string())
        } else {
            ApiError::internal(e, "Failed to assign subject")
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Subject assigned to student successfully!",
            "assignment": AssignmentResponse::from_db(assignment),
        })),
    ))
}

async fn unassign_subject(
    State(state): State<AppState>,
    Json(payload): Json<AssignSubject>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (Some(student_adm_no), Some(subject_id)) =
        (trimmed(&payload.student_adm_no), trimmed(&payload.subject_id))
    else {
        return Err(ApiError::BadRequest(
            "student_adm_no and subject_id are required.".to_string(),
        ));
    };

    let removed = repositories::subjects::unassign(state.db(), student_adm_no, subject_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to unassign subject"))?;

    let Some(assignment) = removed else {
        return Err(ApiError::NotFound("Assignment not found.".to_string()));
    };

    Ok(Json(serde_json::json!({
        "message": "Subject unassigned from student successfully!",
        "assignment": AssignmentResponse::from_db(assignment),
    })))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::test_support;

    #[tokio::test]
    async fn subject_assignment_round_trip() {
        let ctx = test_support::setup_test_context().await;
        let class = test_support::insert_class(ctx.state.db(), 1, "North").await;
        let student = test_support::insert_student(
            ctx.state.db(),
            "ADM-010",
            "Achieng Odhiambo",
            &class.class_id,
        )
        .await;

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/subjects/add-subject",
                None,
                Some(json!({"subject_name": "Chemistry"})),
            ))
            .await
            .expect("add subject");

        let status = response.status();
        let created = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::CREATED, "response: {created}");
        assert_eq!(created["message"], "Subject added successfully!");
        let subject_id = created["subject"]["subject_id"].as_str().expect("subject id").to_string();

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/subjects/assign-subject",
                None,
                Some(json!({
                    "student_adm_no": student.student_adm_no,
                    "subject_id": subject_id
                })),
            ))
            .await
            .expect("assign subject");

        let status = response.status();
        let assigned = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::CREATED, "response: {assigned}");
        assert_eq!(assigned["message"], "Subject assigned to student successfully!");

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::GET,
                "/api/v1/subjects/fetch-all-subjects",
                None,
                None,
            ))
            .await
            .expect("fetch subjects");

        let status = response.status();
        let listed = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {listed}");
        let subjects = listed.as_array().expect("subject list");
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0]["students"][0]["student_adm_no"], "ADM-010");

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::DELETE,
                "/api/v1/subjects/unassign-subject",
                None,
                Some(json!({
                    "student_adm_no": student.student_adm_no,
                    "subject_id": subject_id
                })),
            ))
            .await
            .expect("unassign subject");

        let status = response.status();
        let unassigned = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {unassigned}");
        assert_eq!(unassigned["message"], "Subject unassigned from student successfully!");

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::DELETE,
                "/api/v1/subjects/unassign-subject",
                None,
                Some(json!({
                    "student_adm_no": student.student_adm_no,
                    "subject_id": subject_id
                })),
            ))
            .await
            .expect("unassign subject again");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "response: {body}");
        assert_eq!(body["detail"], "Assignment not found.");
    }

    #[tokio::test]
    async fn assign_subject_rejects_duplicates() {
        let ctx = test_support::setup_test_context().await;
        let class = test_support::insert_class(ctx.state.db(), 1, "North").await;
        let student = test_support::insert_student(
            ctx.state.db(),
            "ADM-011",
            "Baraka Mwangi",
            &class.class_id,
        )
        .await;
        let subject = test_support::insert_subject(ctx.state.db(), "Physics").await;
        test_support::assign_subject(ctx.state.db(), &student.student_adm_no, &subject.subject_id)
            .await;

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/subjects/assign-subject",
                None,
                Some(json!({
                    "student_adm_no": student.student_adm_no,
                    "subject_id": subject.subject_id
                })),
            ))
            .await
            .expect("assign subject twice");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
        assert_eq!(body["detail"], "Subject already assigned to this student.");
    }

    #[tokio::test]
    async fn assign_subject_rejects_unknown_references() {
        let ctx = test_support::setup_test_context().await;

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/subjects/assign-subject",
                None,
                Some(json!({
                    "student_adm_no": "missing-student",
                    "subject_id": "missing-subject"
                })),
            ))
            .await
            .expect("assign subject");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
        assert_eq!(body["detail"], "Invalid student_adm_no or subject_id.");
    }
}
