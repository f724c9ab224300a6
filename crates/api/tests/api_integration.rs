//! API integration tests.
//!
//! These drive the full router over a migrated in-memory `SQLite` database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::net::SocketAddr;

use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use yellowshield_api::{AppState, BANNER, RateLimiterState, app};
use yellowshield_common::{Config, config::AdminSeedConfig};
use yellowshield_core::{AuthService, ComplaintService, RegisterInput};
use yellowshield_db::{
    repositories::{ComplaintRepository, UserRepository},
    test_utils::TestDatabase,
};

struct TestApp {
    router: Router,
    auth: AuthService,
    _db: TestDatabase,
}

impl TestApp {
    async fn new(enforce_admin: bool) -> Self {
        Self::with_limiter(enforce_admin, RateLimiterState::new()).await
    }

    async fn with_limiter(enforce_admin: bool, limiter: RateLimiterState) -> Self {
        let db = TestDatabase::in_memory().await.unwrap();
        let config = Config::default();

        let complaint_service =
            ComplaintService::new(ComplaintRepository::new(db.shared()), &config);
        let auth_service = AuthService::new(UserRepository::new(db.shared()));

        let state = AppState {
            complaint_service,
            auth_service: auth_service.clone(),
            enforce_admin,
        };

        Self {
            router: app(state, limiter),
            auth: auth_service,
            _db: db,
        }
    }

    async fn admin_token(&self) -> String {
        let seed = AdminSeedConfig {
            email: "admin@yellowshield.com".to_string(),
            password: "admin-password".to_string(),
            username: "admin".to_string(),
            full_name: "System Admin".to_string(),
            department: "IT".to_string(),
        };
        self.auth.ensure_admin(&seed).await.unwrap();
        self.auth
            .login("admin@yellowshield.com", "admin-password")
            .await
            .unwrap()
            .token
    }

    /// Register a student and return `(user_id, token)`.
    async fn student(&self, email: &str) -> (String, String) {
        let session = self
            .auth
            .register(RegisterInput {
                username: "student".to_string(),
                email: email.to_string(),
                password: "password123".to_string(),
                full_name: None,
                department: None,
                role: None,
            })
            .await
            .unwrap();
        (session.user.id, session.token)
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        (status, value)
    }
}

#[tokio::test]
async fn test_banner() {
    let app = TestApp::new(true).await;

    let (status, body) = app.send("GET", "/", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String(BANNER.to_string()));
}

#[tokio::test]
async fn test_file_respond_and_track() {
    let app = TestApp::new(true).await;
    let admin = app.admin_token().await;

    let (status, created) = app
        .send(
            "POST",
            "/api/complaints",
            None,
            Some(json!({"category": "Toilets", "description": "leak"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "Pending");
    assert_eq!(created["name"], "Anonymous");
    assert_eq!(created["id"], created["_id"]);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, responded) = app
        .send(
            "PATCH",
            &format!("/api/complaints/{id}/respond"),
            Some(&admin),
            Some(json!({"adminResponse": "fixed"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(responded["status"], "Closed");
    assert_eq!(responded["adminResponse"], "fixed");

    let (status, tracked) = app
        .send("GET", &format!("/api/complaints/public/status/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tracked["status"], "Closed");
    assert_eq!(tracked["adminResponse"], "fixed");
    assert_eq!(tracked["category"], "Toilets");

    let suffix = &id[id.len() - 8..];
    let (status, tracked) = app
        .send("GET", &format!("/api/complaints/public/status/{suffix}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tracked["id"], id.as_str());
}

#[tokio::test]
async fn test_status_lookup_before_response() {
    let app = TestApp::new(true).await;

    let (_, created) = app
        .send("POST", "/api/complaints", None, Some(json!({})))
        .await;
    let id = created["id"].as_str().unwrap();

    let (status, tracked) = app
        .send("GET", &format!("/api/complaints/public/status/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tracked["status"], "Pending");
    assert_eq!(tracked["adminResponse"], "No updates yet");
    assert_eq!(tracked["category"], "General");
}

#[tokio::test]
async fn test_status_lookup_not_found() {
    let app = TestApp::new(true).await;

    let (status, body) = app
        .send("GET", "/api/complaints/public/status/abc", None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "COMPLAINT_NOT_FOUND");
    assert_eq!(body["error"]["message"], "Complaint not found");
}

#[tokio::test]
async fn test_invalid_category_rejected() {
    let app = TestApp::new(false).await;

    let (status, body) = app
        .send(
            "POST",
            "/api/complaints",
            None,
            Some(json!({"category": "Fake Category"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, list) = app.send("GET", "/api/complaints", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_mistyped_body_is_a_bad_request() {
    let app = TestApp::new(false).await;

    let (status, body) = app
        .send(
            "POST",
            "/api/complaints",
            None,
            Some(json!({"isAnonymous": "yes"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert_eq!(body["error"]["message"], "Invalid field in request body");

    let request = Request::builder()
        .method("POST")
        .uri("/api/complaints")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method("POST")
        .uri("/api/complaints")
        .body(Body::from("{}"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (_, list) = app.send("GET", "/api/complaints", None, None).await;
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_mistyped_login_is_a_bad_request() {
    let app = TestApp::new(true).await;

    let (status, body) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": 42, "password": ["x"]})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_anonymous_complaint_hides_identity() {
    let app = TestApp::new(false).await;

    let (status, created) = app
        .send(
            "POST",
            "/api/complaints",
            None,
            Some(json!({
                "name": "Deepa",
                "role": "Staff",
                "isAnonymous": true,
                "category": "Classrooms"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Anonymous");
    assert!(created["role"].is_null());
    assert_eq!(created["isAnonymous"], true);
}

#[tokio::test]
async fn test_admin_routes_require_admin() {
    let app = TestApp::new(true).await;
    let (_, student) = app.student("s1@campus.edu").await;

    for (method, uri) in [
        ("GET", "/api/complaints"),
        ("GET", "/api/complaints/stats"),
        ("GET", "/api/complaints/export"),
        ("PATCH", "/api/complaints/x/close"),
        ("DELETE", "/api/complaints/x"),
    ] {
        let (status, body) = app.send(method, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");

        let (status, _) = app.send(method, uri, Some(&student), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
    }
}

#[tokio::test]
async fn test_unknown_token_is_anonymous() {
    let app = TestApp::new(true).await;

    let (status, _) = app
        .send("GET", "/api/complaints", Some("not-a-real-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_filters() {
    let app = TestApp::new(true).await;
    let admin = app.admin_token().await;

    for category in ["Toilets", "Toilets", "Infrastructure"] {
        app.send(
            "POST",
            "/api/complaints",
            None,
            Some(json!({"category": category})),
        )
        .await;
    }

    let (status, list) = app
        .send("GET", "/api/complaints?category=Toilets", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);

    let (status, list) = app
        .send("GET", "/api/complaints?status=Closed", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().unwrap().is_empty());

    let (status, body) = app
        .send("GET", "/api/complaints?status=Open", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_close_and_delete() {
    let app = TestApp::new(true).await;
    let admin = app.admin_token().await;

    let (_, created) = app
        .send("POST", "/api/complaints", None, Some(json!({"category": "Other"})))
        .await;
    let id = created["id"].as_str().unwrap();

    let (status, closed) = app
        .send("PATCH", &format!("/api/complaints/{id}/close"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(closed["status"], "Closed");
    assert!(closed["adminResponse"].is_null());

    let (status, body) = app
        .send("DELETE", &format!("/api/complaints/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Complaint deleted successfully");

    let (status, _) = app
        .send("DELETE", &format!("/api/complaints/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send("PATCH", &format!("/api/complaints/{id}/close"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_respond_requires_text() {
    let app = TestApp::new(true).await;
    let admin = app.admin_token().await;

    let (_, created) = app
        .send("POST", "/api/complaints", None, Some(json!({})))
        .await;
    let id = created["id"].as_str().unwrap();

    let (status, _) = app
        .send(
            "PATCH",
            &format!("/api/complaints/{id}/respond"),
            Some(&admin),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            "PATCH",
            &format!("/api/complaints/{id}/respond"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (_, status_body) = app
        .send(
            "GET",
            &format!("/api/complaints/public/status/{id}"),
            None,
            None,
        )
        .await;
    assert_eq!(status_body["status"], "Pending");
}

#[tokio::test]
async fn test_history_flow() {
    let app = TestApp::new(true).await;
    let (user_id, token) = app.student("s1@campus.edu").await;
    let (_, other_token) = app.student("s2@campus.edu").await;

    for _ in 0..2 {
        let (status, created) = app
            .send("POST", "/api/complaints", Some(&token), Some(json!({})))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["userId"], user_id.as_str());
    }
    app.send("POST", "/api/complaints", None, Some(json!({})))
        .await;

    let (status, body) = app
        .send("GET", "/api/complaints/my-history", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "User ID required");

    let uri = format!("/api/complaints/my-history?userId={user_id}");
    let (status, _) = app.send("GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send("GET", &uri, Some(&other_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, history) = app.send("GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 2);

    let (status, cleared) = app
        .send(
            "DELETE",
            "/api/complaints/my-history/clear",
            Some(&token),
            Some(json!({"userId": user_id})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["message"], "History cleared successfully");
    assert_eq!(cleared["deleted"], 2);

    let (_, history) = app.send("GET", &uri, Some(&token), None).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_clear_history_requires_user_id() {
    let app = TestApp::new(false).await;

    let (status, _) = app
        .send(
            "DELETE",
            "/api/complaints/my-history/clear",
            None,
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send("DELETE", "/api/complaints/my-history/clear", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "User ID required");
}

#[tokio::test]
async fn test_mutations_accept_uppercase_id() {
    let app = TestApp::new(true).await;
    let admin = app.admin_token().await;

    let (_, created) = app
        .send("POST", "/api/complaints", None, Some(json!({"category": "Other"})))
        .await;
    let id = created["id"].as_str().unwrap().to_uppercase();

    let (status, closed) = app
        .send("PATCH", &format!("/api/complaints/{id}/close"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(closed["id"], created["id"]);

    let (status, _) = app
        .send("DELETE", &format!("/api/complaints/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_stats_and_export() {
    let app = TestApp::new(true).await;
    let admin = app.admin_token().await;

    for category in ["Toilets", "Classrooms", "Classrooms"] {
        app.send(
            "POST",
            "/api/complaints",
            None,
            Some(json!({"category": category, "description": "needs, fixing"})),
        )
        .await;
    }

    let (status, stats) = app
        .send("GET", "/api/complaints/stats", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["pending"], 3);
    assert_eq!(stats["closed"], 0);
    assert_eq!(stats["byCategory"].as_array().unwrap().len(), 2);

    let request = Request::builder()
        .uri("/api/complaints/export")
        .header(header::AUTHORIZATION, format!("Bearer {admin}"))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(content_type.starts_with("text/csv"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(csv.starts_with("ID,Name,Role,Department,Category,Date,Status,Description"));
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.contains("\"needs, fixing\""));
}

#[tokio::test]
async fn test_categories() {
    let app = TestApp::new(true).await;

    let (status, categories) = app
        .send("GET", "/api/complaints/categories", None, None)
        .await;

    assert_eq!(status, StatusCode::OK);
    let categories = categories.as_array().unwrap();
    assert_eq!(categories.len(), 7);
    assert!(categories.contains(&json!("Other (Non-Moving)")));
}

#[tokio::test]
async fn test_auth_session_lifecycle() {
    let app = TestApp::new(true).await;

    let (status, registered) = app
        .send(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "username": "lena",
                "email": "lena@campus.edu",
                "password": "password123",
                "fullName": "Lena M",
                "department": "Physics",
                "role": "Student"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(registered["user"]["fullName"], "Lena M");
    assert!(registered["user"].get("password").is_none());
    let token = registered["token"].as_str().unwrap().to_string();

    let (status, me) = app.send("GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "lena@campus.edu");

    let (status, body) = app
        .send("POST", "/api/auth/logout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged out successfully");

    let (status, _) = app.send("GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, logged_in) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "lena@campus.edu", "password": "password123"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(logged_in["token"], token.as_str());
}

#[tokio::test]
async fn test_login_failures_are_generic() {
    let app = TestApp::new(true).await;
    app.student("known@campus.edu").await;

    let (status, unknown) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "nobody@campus.edu", "password": "password123"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, wrong) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "known@campus.edu", "password": "wrong-password"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, wrong);
    assert_eq!(wrong["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_register_rejects_admin_role_and_duplicates() {
    let app = TestApp::new(true).await;
    let body = json!({
        "username": "mallory",
        "email": "mallory@campus.edu",
        "password": "password123",
        "role": "admin"
    });

    let (status, _) = app
        .send("POST", "/api/auth/register", None, Some(body))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = json!({
        "username": "mallory",
        "email": "mallory@campus.edu",
        "password": "password123"
    });
    let (status, _) = app
        .send("POST", "/api/auth/register", None, Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, dup) = app
        .send("POST", "/api/auth/register", None, Some(body))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(dup["error"]["message"], "User already exists");
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new(true).await;
    let (_, token) = app.student("pw@campus.edu").await;

    let (status, _) = app
        .send(
            "POST",
            "/api/auth/change-password",
            Some(&token),
            Some(json!({"currentPassword": "wrong", "newPassword": "newpassword1"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, changed) = app
        .send(
            "POST",
            "/api/auth/change-password",
            Some(&token),
            Some(json!({"currentPassword": "password123", "newPassword": "newpassword1"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(changed["token"], token.as_str());

    let (status, _) = app.send("GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

fn lookup_from(peer: [u8; 4], forwarded_for: &str) -> Request<Body> {
    let mut request = Request::builder()
        .uri("/api/complaints/public/status/zzzzzzzz")
        .header("x-forwarded-for", forwarded_for)
        .body(Body::empty())
        .unwrap();
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from((peer, 40000))));
    request
}

#[tokio::test]
async fn test_status_lookup_ignores_rotating_forwarded_for() {
    let app = TestApp::new(true).await;

    let mut last = StatusCode::OK;
    for i in 0..31 {
        let request = lookup_from([192, 0, 2, 1], &format!("203.0.113.{i}"));
        last = app.router.clone().oneshot(request).await.unwrap().status();
    }
    assert_eq!(last, StatusCode::TOO_MANY_REQUESTS);

    let request = lookup_from([192, 0, 2, 2], "203.0.113.200");
    let status = app.router.clone().oneshot(request).await.unwrap().status();
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_lookup_trusts_forwarded_for_behind_proxy() {
    let limiter = RateLimiterState::new().with_trust_proxy(true);
    let app = TestApp::with_limiter(true, limiter).await;

    let mut last = StatusCode::OK;
    for _ in 0..31 {
        let request = lookup_from([10, 0, 0, 1], "203.0.113.9");
        last = app.router.clone().oneshot(request).await.unwrap().status();
    }
    assert_eq!(last, StatusCode::TOO_MANY_REQUESTS);

    let request = lookup_from([10, 0, 0, 1], "203.0.113.10");
    let status = app.router.clone().oneshot(request).await.unwrap().status();
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_open_mode_allows_anonymous_review() {
    let app = TestApp::new(false).await;

    let (_, created) = app
        .send("POST", "/api/complaints", None, Some(json!({"userId": "guest-7"})))
        .await;
    assert_eq!(created["userId"], "guest-7");
    let id = created["id"].as_str().unwrap();

    let (status, _) = app.send("GET", "/api/complaints/stats", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, history) = app
        .send("GET", "/api/complaints/my-history?userId=guest-7", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 1);

    let (status, _) = app
        .send("PATCH", &format!("/api/complaints/{id}/close"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = TestApp::new(true).await;

    let (status, _) = app.send("GET", "/api/nonexistent", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
