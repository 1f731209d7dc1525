//! HTTP-level tests for admin user management.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json, post_json_auth, put_json_auth, token_with_role};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_creates_user_who_can_log_in(pool: PgPool) {
    let (_admin, token) = token_with_role(&pool, "admin").await;

    let app = common::build_test_app(pool.clone());
    let body = json!({
        "email": "sari@example.com",
        "name": "Sari",
        "password": "kata-sandi-1",
        "role": "noc",
    });
    let response = post_json_auth(app, "/api/v1/users", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await["data"].clone();
    assert_eq!(created["username"], "sari");
    assert_eq!(created["role"], "noc");

    let app = common::build_test_app(pool);
    let body = json!({ "username": "sari", "password": "kata-sandi-1" });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_user_validates_role_and_password(pool: PgPool) {
    let (_admin, token) = token_with_role(&pool, "admin").await;

    let app = common::build_test_app(pool.clone());
    let body = json!({ "email": "x@example.com", "name": "X", "password": "kata-sandi-1", "role": "root" });
    let response = post_json_auth(app, "/api/v1/users", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let body = json!({ "email": "x@example.com", "name": "X", "password": "pendek", "role": "cs" });
    let response = post_json_auth(app, "/api/v1/users", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cs_cannot_manage_users(pool: PgPool) {
    let (_cs, token) = token_with_role(&pool, "cs").await;
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/users", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_and_deactivate_user(pool: PgPool) {
    let (admin, admin_token) = token_with_role(&pool, "admin").await;
    let (cs, _cs_token) = token_with_role(&pool, "cs").await;
    let uri = format!("/api/v1/users/{}", cs.id);

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(app, &uri, json!({ "role": "noc" }), &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["role"], "noc");

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &uri, &admin_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &uri, &admin_token).await;
    assert_eq!(body_json(response).await["data"]["is_active"], false);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/users/{}", admin.id), &admin_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, "/api/v1/users/999999", &admin_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_users_filters_by_role(pool: PgPool) {
    let (_admin, token) = token_with_role(&pool, "admin").await;
    token_with_role(&pool, "cs").await;
    token_with_role(&pool, "noc").await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/users?role=cs", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data.as_array().unwrap().len(), 1);
    assert_eq!(data[0]["role"], "cs");
}
