//! HTTP-level integration tests for document endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_document, delete, get, post_json};
use serde_json::json;

#[tokio::test]
async fn test_create_document_returns_root_version() {
    let test = common::build_test_app();
    let token = test.token(1, 10);

    let response = post_json(
        test.app(),
        "/api/v1/documents",
        &token,
        json!({"name": "Access Control Policy", "document_type": "policy", "subject_id": 4}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["document"]["name"], "Access Control Policy");
    assert_eq!(data["document"]["organization_id"], 10);
    assert_eq!(data["root_version"]["version_number"], 1);
    assert_eq!(data["root_version"]["status"], "draft");
    assert!(data["root_version"]["parent_id"].is_null());
    assert_eq!(data["root_version"]["content"], json!({}));
}

#[tokio::test]
async fn test_create_document_rejects_empty_name() {
    let test = common::build_test_app();
    let token = test.token(1, 10);

    let response = post_json(
        test.app(),
        "/api/v1/documents",
        &token,
        json!({"name": "", "document_type": "policy"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_document_rejects_non_object_content() {
    let test = common::build_test_app();
    let token = test.token(1, 10);

    let response = post_json(
        test.app(),
        "/api/v1/documents",
        &token,
        json!({"name": "Policy", "document_type": "policy", "content": [1, 2]}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_document() {
    let test = common::build_test_app();
    let token = test.token(1, 10);
    let (document_id, _) = create_document(&test, &token, "Incident Response Plan").await;

    let response = get(test.app(), &format!("/api/v1/documents/{document_id}"), &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["data"]["name"],
        "Incident Response Plan"
    );
}

#[tokio::test]
async fn test_document_of_other_organization_is_404() {
    let test = common::build_test_app();
    let owner = test.token(1, 10);
    let stranger = test.token(2, 11);
    let (document_id, _) = create_document(&test, &owner, "Incident Response Plan").await;

    let uri = format!("/api/v1/documents/{document_id}");
    assert_eq!(
        get(test.app(), &uri, &stranger).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        delete(test.app(), &uri, &stranger).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(get(test.app(), &uri, &owner).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_delete_document_removes_lineage() {
    let test = common::build_test_app();
    let token = test.token(1, 10);
    let (document_id, root_id) = create_document(&test, &token, "Asset Inventory").await;
    post_json(
        test.app(),
        &format!("/api/v1/versions/{root_id}/versions"),
        &token,
        json!({}),
    )
    .await;

    let response = delete(test.app(), &format!("/api/v1/documents/{document_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(test.store.version_count().unwrap(), 0);

    let response = get(test.app(), &format!("/api/v1/versions/{root_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_requests_without_token_are_401() {
    let test = common::build_test_app();

    let response = common::get_public(test.app(), "/api/v1/documents/1").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get(test.app(), "/api/v1/documents/1", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let test = common::build_test_app();
    let token = test.token(1, 10);
    let (_, root_id) = create_document(&test, &token, "Backup Policy").await;

    let response = common::post_raw(
        test.app(),
        "/api/v1/documents",
        &token,
        r#"{"name": "Backup Policy""#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let response = common::post_raw(
        test.app(),
        &format!("/api/v1/versions/{root_id}/restore"),
        &token,
        r#"{"currentVersionId": "two"}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
    assert_eq!(test.store.version_count().unwrap(), 1);
}
