/// In-process tests for the HTTP surface

mod common;

use axum::http::{Method, StatusCode};
use common::{id_of, TestContext};
use serde_json::json;
use tutorhub_shared::models::user::Role;
use uuid::Uuid;

#[tokio::test]
async fn test_health_is_public() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.send(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["pool"]["total_connections"], 1);
}

#[tokio::test]
async fn test_v1_requires_bearer_token() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.send(Method::GET, "/v1/businesses", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = ctx
        .send(Method::GET, "/v1/businesses", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_business_routes_require_admin() {
    let ctx = TestContext::new().await;

    for role in [Role::Business, Role::Teacher, Role::Student] {
        let token = ctx.token(role);
        let (status, body) = ctx
            .send(Method::GET, "/v1/businesses", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "forbidden");
    }
}

#[tokio::test]
async fn test_create_business_hides_password_hash() {
    let ctx = TestContext::new().await;

    let business = ctx.create_business("ABC Tutors!!", "abc@example.com").await;

    assert_eq!(business["slug"], "abc-tutors");
    assert_eq!(business["status"], 1);
    assert!(business.get("password_hash").is_none());

    let user_id = id_of(&business, "user_id");
    let (status, user) = ctx
        .admin(Method::GET, &format!("/v1/users/{}", user_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["role"], "business");
    assert_eq!(user["email"], "abc@example.com");
    assert!(user.get("password_hash").is_none());
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let ctx = TestContext::new().await;
    ctx.create_user("taken@example.com", "teacher").await;

    let (status, body) = ctx
        .admin(
            Method::POST,
            "/v1/businesses",
            Some(json!({
                "owner_name": "Owner",
                "name": "Fresh",
                "email": "taken@example.com",
                "password": "s3cret-password",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn test_request_validation_reports_fields() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx
        .admin(
            Method::POST,
            "/v1/businesses",
            Some(json!({
                "owner_name": "Owner",
                "name": "Bad",
                "email": "not-an-email",
                "password": "short",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "password"]);
}

#[tokio::test]
async fn test_update_business_and_clear_package() {
    let ctx = TestContext::new().await;
    let business = ctx.create_business("Mirror", "old@example.com").await;
    let id = id_of(&business, "id");

    let (status, package) = ctx
        .admin(
            Method::POST,
            "/v1/packages",
            Some(json!({ "name": "Gold", "price": 49.0, "validation_period_days": 30 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let package_id = id_of(&package, "id");

    let (status, updated) = ctx
        .admin(
            Method::PUT,
            &format!("/v1/businesses/{}", id),
            Some(json!({ "email": "new@example.com", "package_id": package_id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["email"], "new@example.com");
    assert_eq!(updated["package_id"], package_id.to_string());

    let (_, user) = ctx
        .admin(
            Method::GET,
            &format!("/v1/users/{}", id_of(&business, "user_id")),
            None,
        )
        .await;
    assert_eq!(user["email"], "new@example.com");

    let (status, cleared) = ctx
        .admin(
            Method::PUT,
            &format!("/v1/businesses/{}", id),
            Some(json!({ "package_id": null })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(cleared["package_id"].is_null());

    let (status, _) = ctx
        .admin(Method::PUT, &format!("/v1/businesses/{}", id), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_status_change_and_delete() {
    let ctx = TestContext::new().await;
    let business = ctx.create_business("Toggle", "toggle@example.com").await;
    let id = id_of(&business, "id");
    let user_uri = format!("/v1/users/{}", id_of(&business, "user_id"));

    let (status, updated) = ctx
        .admin(
            Method::PATCH,
            &format!("/v1/businesses/{}/status", id),
            Some(json!({ "status": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], 0);
    let (_, user) = ctx.admin(Method::GET, &user_uri, None).await;
    assert_eq!(user["status"], 0);

    let (status, _) = ctx
        .admin(Method::DELETE, &format!("/v1/businesses/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = ctx
        .admin(Method::GET, &format!("/v1/businesses/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = ctx.admin(Method::GET, &user_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bulk_status_is_all_or_nothing() {
    let ctx = TestContext::new().await;
    let a = id_of(&ctx.create_business("A", "a@example.com").await, "id");
    let b = id_of(&ctx.create_business("B", "b@example.com").await, "id");

    let (status, _) = ctx
        .admin(
            Method::POST,
            "/v1/businesses/bulk/status",
            Some(json!({ "ids": [a, Uuid::new_v4(), b], "status": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, still_active) = ctx
        .admin(Method::GET, &format!("/v1/businesses/{}", a), None)
        .await;
    assert_eq!(still_active["status"], 1);

    let (status, body) = ctx
        .admin(
            Method::POST,
            "/v1/businesses/bulk/status",
            Some(json!({ "ids": [a, b], "status": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 2);

    let (status, _) = ctx
        .admin(
            Method::POST,
            "/v1/businesses/bulk/status",
            Some(json!({ "ids": [], "status": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_package_assignment_routes() {
    let ctx = TestContext::new().await;
    let a = id_of(&ctx.create_business("A", "a@example.com").await, "id");
    let b = id_of(&ctx.create_business("B", "b@example.com").await, "id");
    let (_, package) = ctx
        .admin(
            Method::POST,
            "/v1/packages",
            Some(json!({ "name": "Gold", "price": 10.0, "validation_period_days": 30 })),
        )
        .await;
    let package_id = id_of(&package, "id");

    let (status, body) = ctx
        .admin(
            Method::POST,
            "/v1/businesses/bulk/package",
            Some(json!({ "ids": [a, b], "package_id": package_id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 2);

    let (status, _) = ctx
        .admin(Method::DELETE, &format!("/v1/packages/{}", package_id), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    for id in [a, b] {
        let (status, body) = ctx
            .admin(Method::DELETE, &format!("/v1/businesses/{}/package", id), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["package_id"].is_null());
    }

    let (status, _) = ctx
        .admin(Method::DELETE, &format!("/v1/packages/{}", package_id), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = ctx
        .admin(
            Method::PUT,
            &format!("/v1/businesses/{}/package", a),
            Some(json!({ "package_id": package_id })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_promotion_is_bounded_by_caller_role() {
    let ctx = TestContext::new().await;
    let student = ctx.create_user("s@example.com", "student").await;
    let uri = format!("/v1/users/{}/promote", id_of(&student, "id"));

    let teacher_token = ctx.token(Role::Teacher);
    let (status, _) = ctx
        .send(
            Method::POST,
            &uri,
            Some(&teacher_token),
            Some(json!({ "role": "business" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, promoted) = ctx
        .send(
            Method::POST,
            &uri,
            Some(&teacher_token),
            Some(json!({ "role": "teacher" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(promoted["role"], "teacher");

    let (status, _) = ctx
        .admin(Method::POST, &uri, Some(json!({ "role": "student" })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = ctx
        .admin(
            Method::POST,
            &format!("/v1/users/{}/promote", Uuid::new_v4()),
            Some(json!({ "role": "admin" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_business_role_manages_profiles() {
    let ctx = TestContext::new().await;
    let business_id = id_of(&ctx.create_business("School", "school@example.com").await, "id");
    let user_id = id_of(&ctx.create_user("t@example.com", "teacher").await, "id");
    let token = ctx.token(Role::Business);

    let teacher_body = json!({
        "user_id": user_id,
        "business_id": business_id,
        "subject": "Chemistry",
        "experience_years": 2,
        "salary": 900.0,
    });
    let (status, teacher) = ctx
        .send(Method::POST, "/v1/teachers", Some(&token), Some(teacher_body.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = ctx
        .send(Method::POST, "/v1/teachers", Some(&token), Some(teacher_body))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = ctx
        .send(
            Method::POST,
            "/v1/students",
            Some(&token),
            Some(json!({ "user_id": user_id, "business_id": business_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, list) = ctx
        .send(
            Method::GET,
            &format!("/v1/teachers?business_id={}", business_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 1);

    let (status, updated) = ctx
        .send(
            Method::PATCH,
            &format!("/v1/teachers/{}/status", id_of(&teacher, "id")),
            Some(&token),
            Some(json!({ "status": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], 0);

    let student_token = ctx.token(Role::Student);
    let (status, _) = ctx
        .send(Method::GET, "/v1/teachers", Some(&student_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_negative_salary_rejected() {
    let ctx = TestContext::new().await;
    let business_id = id_of(&ctx.create_business("School", "school@example.com").await, "id");
    let user_id = id_of(&ctx.create_user("t@example.com", "teacher").await, "id");

    let (status, body) = ctx
        .admin(
            Method::POST,
            "/v1/teachers",
            Some(json!({
                "user_id": user_id,
                "business_id": business_id,
                "subject": "Art",
                "salary": -5.0,
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "salary");
}
