use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::api::errors::{is_foreign_key_violation, ApiError};
use crate::api::validation::trimmed;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::student::{StudentCreate, StudentResponse, StudentWithClassResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/add-student", post(add_student))
        .route("/fetch-all-students", get(fetch_all_students))
        .route("/delete-student-by-adm", delete(delete_student_by_adm))
}

#[derive(Debug, Deserialize)]
struct DeleteStudentQuery {
    #[serde(default)]
    #[serde(alias = "studentAdmNo")]
    student_adm_no: Option<String>,
}

async fn add_student(
    State(state): State<AppState>,
    Json(payload): Json<StudentCreate>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let (Some(student_adm_no), Some(students_name), Some(kcse_entry), Some(class_id)) = (
        trimmed(&payload.student_adm_no),
        trimmed(&payload.students_name),
        payload.kcse_entry,
        trimmed(&payload.class_id),
    ) else {
        return Err(ApiError::BadRequest(
            "student_adm_no, students_name, class_id are required, kcse_entry must be a number."
                .to_string(),
        ));
    };

    let now = primitive_now_utc();
    let student = repositories::students::create(
        state.db(),
        repositories::students::CreateStudent {
            student_adm_no,
            students_name,
            kcse_entry,
            class_id,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| {
        if is_foreign_key_violation(&e) {
            ApiError::BadRequest("Invalid class_id. Class does not exist.".to_string())
        } else {
            ApiError::internal(e, "Failed to add student")
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Student added successfully!",
            "student": StudentResponse::from_db(student),
        })),
    ))
}

async fn fetch_all_students(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentWithClassResponse>>, ApiError> {
    let rows = repositories::students::list_all_with_class(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch students"))?;

    Ok(Json(rows.into_iter().map(StudentWithClassResponse::from_row).collect()))
}

async fn delete_student_by_adm(
    State(state): State<AppState>,
    Query(params): Query<DeleteStudentQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(student_adm_no) = trimmed(&params.student_adm_no) else {
        return Err(ApiError::BadRequest("student_adm_no is required.".to_string()));
    };

    let deleted = repositories::students::delete_by_adm(state.db(), student_adm_no)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete student"))?;

    let Some(student) = deleted else {
        return Err(ApiError::NotFound("Student not found or already deleted.".to_string()));
    };

    Ok(Json(serde_json::json!({
        "message": "Student deleted successfully!",
        "student": StudentResponse::from_db(student),
    })))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::test_support;

    #[tokio::test]
    async fn student_crud_round_trip() {
        let ctx = test_support::setup_test_context().await;
        let class = test_support::insert_class(ctx.state.db(), 2, "West").await;

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/students/add-student",
                None,
                Some(json!({
                    "student_adm_no": "ADM-001",
                    "students_name": "Brian Otieno",
                    "kcse_entry": 320.0,
                    "class_id": class.class_id
                })),
            ))
            .await
            .expect("add student");

        let status = response.status();
        let created = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::CREATED, "response: {created}");
        assert_eq!(created["message"], "Student added successfully!");
        assert_eq!(created["student"]["student_adm_no"], "ADM-001");

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::GET,
                "/api/v1/students/fetch-all-students",
                None,
                None,
            ))
            .await
            .expect("fetch students");

        let status = response.status();
        let listed = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {listed}");
        let students = listed.as_array().expect("student list");
        assert_eq!(students.len(), 1);
        assert_eq!(students[0]["class"]["class_stream"], "West");

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::DELETE,
                "/api/v1/students/delete-student-by-adm?student_adm_no=ADM-001",
                None,
                None,
            ))
            .await
            .expect("delete student");

        let status = response.status();
        let deleted = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {deleted}");
        assert_eq!(deleted["message"], "Student deleted successfully!");
    }

    #[tokio::test]
    async fn add_student_rejects_unknown_class() {
        let ctx = test_support::setup_test_context().await;

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/students/add-student",
                None,
                Some(json!({
                    "student_adm_no": "ADM-001",
                    "students_name": "Brian Otieno",
                    "kcse_entry": 320.0,
                    "class_id": "missing-class"
                })),
            ))
            .await
            .expect("add student");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
        assert_eq!(body["detail"], "Invalid class_id. Class does not exist.");
    }

    #[tokio::test]
    async fn add_student_requires_numeric_kcse_entry() {
        let ctx = test_support::setup_test_context().await;
        let class = test_support::insert_class(ctx.state.db(), 2, "West").await;

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/students/add-student",
                None,
                Some(json!({
                    "student_adm_no": "ADM-001",
                    "students_name": "Brian Otieno",
                    "class_id": class.class_id
                })),
            ))
            .await
            .expect("add student");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
        assert_eq!(
            body["detail"],
            "student_adm_no, students_name, class_id are required, kcse_entry must be a number."
        );
    }
}
