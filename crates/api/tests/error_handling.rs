//! Tests for `AppError` to HTTP response mapping. No server needed: these
//! call `IntoResponse` directly.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use helpdesk_api::error::AppError;
use helpdesk_core::error::CoreError;
use helpdesk_core::lifecycle::LifecycleError;
use helpdesk_core::ticket::TicketStatus;
use http_body_util::BodyExt;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Ticket",
        id: 42,
    });
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Ticket with id 42 not found");
}

#[tokio::test]
async fn lifecycle_validation_lists_fields() {
    let err = AppError::Lifecycle(LifecycleError::Validation {
        fields: vec!["description".into(), "title".into()],
    });
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["fields"], serde_json::json!(["description", "title"]));
}

#[tokio::test]
async fn invalid_status_returns_400() {
    let err = AppError::Lifecycle(LifecycleError::InvalidStatus("archived".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_STATUS");
    assert!(json["error"].as_str().unwrap().contains("archived"));
    assert!(json.get("fields").is_none());
}

#[tokio::test]
async fn invalid_transition_returns_409() {
    let err = AppError::Lifecycle(LifecycleError::InvalidTransition {
        current: TicketStatus::Open,
        requested: TicketStatus::Closed,
    });
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn forbidden_returns_403() {
    let err = AppError::Core(CoreError::Forbidden("Admin role required".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "Admin role required");
}

#[tokio::test]
async fn internal_error_is_sanitized() {
    let err = AppError::InternalError("connection string leaked".into());
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, _json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stale_ticket_conflict_returns_409() {
    let err = AppError::Core(CoreError::Conflict(
        "Ticket was changed by another request; reload and try again".into(),
    ));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}
