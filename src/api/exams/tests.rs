use axum::http::{Method, StatusCode};
use serde_json::json;
use time::OffsetDateTime;
use tower::ServiceExt;

use crate::test_support;

fn exam_payload(class_ids: Vec<String>) -> serde_json::Value {
    let year = OffsetDateTime::now_utc().year();
    json!({
        "name": "End Term Exam",
        "date": format!("{year}-03-14"),
        "term": 1,
        "year": year,
        "status": "upcoming",
        "class_ids": class_ids
    })
}

#[tokio::test]
async fn add_exam_links_classes_and_lists_by_year() {
    let ctx = test_support::setup_test_context().await;

    let form_two = test_support::insert_class(ctx.state.db(), 2, "East").await;
    let form_three = test_support::insert_class(ctx.state.db(), 3, "West").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/exams/add-exam",
            None,
            Some(exam_payload(vec![form_two.class_id.clone(), form_three.class_id.clone()])),
        ))
        .await
        .expect("add exam");

    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["message"], "Exam added successfully!");
    let exam_id = created["exam"]["exam_id"].as_str().expect("exam id").to_string();
    assert_eq!(created["exam"]["classes"].as_array().expect("classes").len(), 2);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/exams/fetch-all-exams",
            None,
            None,
        ))
        .await
        .expect("list exams for current year");

    let status = response.status();
    let listed = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {listed}");
    let exams = listed.as_array().expect("exam list");
    assert!(exams.iter().any(|exam| exam["exam_id"] == exam_id.as_str()));

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/exams/fetch-all-exams?year=1999",
            None,
            None,
        ))
        .await
        .expect("list exams for another year");

    let status = response.status();
    let listed = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {listed}");
    assert!(listed.as_array().expect("exam list").is_empty());
}

#[tokio::test]
async fn add_exam_rolls_back_on_unknown_class() {
    let ctx = test_support::setup_test_context().await;
    let class = test_support::insert_class(ctx.state.db(), 2, "East").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/exams/add-exam",
            None,
            Some(exam_payload(vec![class.class_id.clone(), "missing-class".to_string()])),
        ))
        .await
        .expect("add exam");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["detail"], "Invalid class_id. Class does not exist.");

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/exams/fetch-all-exams",
            None,
            None,
        ))
        .await
        .expect("list exams");

    let listed = test_support::read_json(response).await;
    assert!(listed.as_array().expect("exam list").is_empty(), "exam row must not survive");
}

#[tokio::test]
async fn add_exam_requires_all_fields() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/exams/add-exam",
            None,
            Some(json!({"name": "End Term Exam", "term": 1})),
        ))
        .await
        .expect("add exam");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["detail"], "name, date, term, year, status, and class_ids (array) are required.");
}

#[tokio::test]
async fn delete_exam_removes_exam_and_links() {
    let ctx = test_support::setup_test_context().await;
    let class = test_support::insert_class(ctx.state.db(), 4, "North").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/exams/add-exam",
            None,
            Some(exam_payload(vec![class.class_id.clone()])),
        ))
        .await
        .expect("add exam");
    let created = test_support::read_json(response).await;
    let exam_id = created["exam"]["exam_id"].as_str().expect("exam id").to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/exams/delete-exam/{exam_id}"),
            None,
            None,
        ))
        .await
        .expect("delete exam");

    let status = response.status();
    let deleted = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {deleted}");
    assert_eq!(deleted["message"], "Exam deleted successfully!");

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/exams/delete-exam/{exam_id}"),
            None,
            None,
        ))
        .await
        .expect("delete exam again");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "response: {body}");
    assert_eq!(body["detail"], "Exam not found or already deleted.");
}
