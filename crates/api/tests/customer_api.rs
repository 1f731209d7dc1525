//! HTTP-level tests for the customer endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_customer, delete_auth, get_auth, post_json_auth, put_json_auth,
    token_with_role,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_and_fetch_customer(pool: PgPool) {
    let (_cs, token) = token_with_role(&pool, "cs").await;

    let app = common::build_test_app(pool.clone());
    let body = json!({
        "name": "Budi Santoso",
        "email": "budi@example.com",
        "phone": "0812000000",
        "city": "Bandung",
        "service_type": "fiber",
        "package_name": "Home 50",
        "monthly_fee": 350000,
    });
    let response = post_json_auth(app, "/api/v1/customers", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await["data"].clone();
    assert_eq!(created["status"], "pending");
    assert_eq!(created["monthly_fee"], 350000);

    let id = created["id"].as_i64().unwrap();
    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/customers/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "Budi Santoso");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_customer_input_is_400(pool: PgPool) {
    let (_cs, token) = token_with_role(&pool, "cs").await;

    let app = common::build_test_app(pool.clone());
    let body = json!({ "name": "", "email": "not-an-email" });
    let response = post_json_auth(app, "/api/v1/customers", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("email"));
    assert!(message.contains("name"));

    let app = common::build_test_app(pool);
    let body = json!({ "name": "Budi", "email": "budi@example.com", "status": "vip" });
    let response = post_json_auth(app, "/api/v1/customers", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_email_is_conflict(pool: PgPool) {
    let (_cs, token) = token_with_role(&pool, "cs").await;
    create_customer(&pool, "Budi", "budi@example.com").await;
    let app = common::build_test_app(pool);

    let body = json!({ "name": "Budi Lain", "email": "budi@example.com" });
    let response = post_json_auth(app, "/api/v1/customers", body, &token).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_customer_status(pool: PgPool) {
    let (_cs, token) = token_with_role(&pool, "cs").await;
    let id = create_customer(&pool, "Budi", "budi@example.com").await;
    let app = common::build_test_app(pool);

    let body = json!({ "status": "active" });
    let response = put_json_auth(app, &format!("/api/v1/customers/{id}"), body, &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "active");
    assert_eq!(json["data"]["name"], "Budi");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn noc_cannot_modify_customers(pool: PgPool) {
    let (_noc, token) = token_with_role(&pool, "noc").await;
    let id = create_customer(&pool, "Budi", "budi@example.com").await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/customers/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Reading stays open to every role.
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/customers", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn customer_with_tickets_cannot_be_deleted(pool: PgPool) {
    let (_cs, token) = token_with_role(&pool, "cs").await;
    let id = create_customer(&pool, "Budi", "budi@example.com").await;

    let app = common::build_test_app(pool.clone());
    let body = json!({
        "title": "Lambat",
        "description": "Kecepatan turun",
        "customer_id": id,
        "category": "speed",
    });
    let response = post_json_auth(app, "/api/v1/tickets", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/customers/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/customers/{id}/tickets"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let tickets = body_json(response).await["data"].clone();
    assert_eq!(tickets.as_array().unwrap().len(), 1);
    assert_eq!(tickets[0]["customer_name"], "Budi");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_customers_by_status(pool: PgPool) {
    let (_cs, token) = token_with_role(&pool, "cs").await;
    create_customer(&pool, "Budi", "budi@example.com").await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/customers?status=pending", &token).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/customers?status=active", &token).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 0);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/customers?status=vip", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
