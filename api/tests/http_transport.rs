//! Integration tests for the reqwest transport and the services on top of it

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use serde_json::json;
use std::sync::Arc;
use studydesk_api::{
    ApiError, ClassQuery, Credentials, HttpTransport, Plan, Role, Services, SubscriptionQuery,
    Transport, User, UserQuery,
};
use studydesk_core::error_message;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Test Fixtures
// ============================================================================

fn ok(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(json!({ "code": 1000, "message": "", "result": result }))
}

fn user_json(id: &str, role: &str) -> serde_json::Value {
    json!({
        "id": id,
        "email": format!("{id}@studydesk.io"),
        "firstName": "Test",
        "lastName": "User",
        "role": role,
        "priceClass": 40.0,
        "studentCount": 9
    })
}

async fn setup() -> (MockServer, Arc<HttpTransport>, Services) {
    let server = MockServer::start().await;
    let transport = Arc::new(HttpTransport::new(Url::parse(&server.uri()).unwrap()));
    let services = Services::new(Arc::clone(&transport) as Arc<dyn Transport>);
    (server, transport, services)
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn login_stores_bearer_token_for_later_calls() {
    let (server, transport, services) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .and(body_json(json!({ "email": "t@studydesk.io", "password": "pw" })))
        .respond_with(ok(json!({ "token": "jwt-123", "authenticated": true })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/my-info"))
        .and(header("authorization", "Bearer jwt-123"))
        .respond_with(ok(user_json("t", "TEACHER")))
        .expect(1)
        .mount(&server)
        .await;

    let session = services
        .auth
        .login(&Credentials::new("t@studydesk.io", "pw"))
        .await
        .unwrap();
    assert_eq!(session.access_token, "jwt-123");
    assert_eq!(transport.token().as_deref(), Some("jwt-123"));

    let user = services.auth.my_profile().await.unwrap();
    assert!(matches!(
        user,
        User::Teacher {
            student_count: 9,
            ..
        }
    ));
}

#[tokio::test]
async fn google_login_sends_id_token() {
    let (server, _transport, services) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/outbound/authentication"))
        .and(body_json(json!({ "idToken": "google-token" })))
        .respond_with(ok(json!({ "token": "jwt-g" })))
        .expect(1)
        .mount(&server)
        .await;

    let session = services
        .auth
        .login_with_google(&studydesk_api::GoogleCredential {
            id_token: "google-token".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(session.access_token, "jwt-g");
}

#[tokio::test]
async fn users_listing_forwards_query() {
    let (server, _transport, services) = setup().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "2"))
        .and(query_param("size", "10"))
        .and(query_param("role", "STUDENT"))
        .respond_with(ok(json!({
            "content": [user_json("s1", "STUDENT"), user_json("s2", "STUDENT")],
            "totalElements": 12,
            "totalPages": 2,
            "size": 10,
            "number": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = services
        .users
        .list(&UserQuery::new(2, 10).with_role(Role::Student))
        .await
        .unwrap();

    assert_eq!(page.content().len(), 2);
    assert!(page.is_last());
    assert!(page.content().iter().all(|user| user.role() == Role::Student));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("page=2&size=10&role=STUDENT"));
}

#[tokio::test]
async fn logical_failure_rejects_with_envelope_message() {
    let (server, _transport, services) = setup().await;

    Mock::given(method("GET"))
        .and(path("/users/missing"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": 1005, "message": "User not existed" })),
        )
        .mount(&server)
        .await;

    let error = services.users.get("missing").await.unwrap_err();
    assert_eq!(error_message(&error, "Failed to fetch user"), "User not existed");
}

#[tokio::test]
async fn http_error_with_envelope_uses_its_message() {
    let (server, _transport, services) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "code": 1006, "message": "Unauthenticated" })),
        )
        .mount(&server)
        .await;

    let error = services
        .auth
        .login(&Credentials::new("x@studydesk.io", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(
        error,
        ApiError::Api {
            status: 401,
            message: "Unauthenticated".to_string()
        }
    );
    assert_eq!(services.auth.token(), None);
}

#[tokio::test]
async fn pinned_sign_in_after_session_end_installs_no_token() {
    let (server, transport, services) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(ok(json!({ "token": "jwt-late" })))
        .mount(&server)
        .await;

    let pinned = services.auth.pinned(services.auth.generation());
    assert_eq!(services.auth.end_session(), None);

    let error = pinned
        .login(&Credentials::new("t@studydesk.io", "pw"))
        .await
        .unwrap_err();

    assert!(matches!(error, ApiError::Unauthenticated(_)));
    assert_eq!(transport.token(), None);
    assert_eq!(services.auth.generation(), 1);
}

#[tokio::test]
async fn refresh_without_token_sends_nothing() {
    let (server, _transport, services) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ok(json!({ "token": "never" })))
        .expect(0)
        .mount(&server)
        .await;

    let error = services.auth.refresh().await.unwrap_err();
    assert_eq!(
        error,
        ApiError::Unauthenticated("no session to refresh".to_string())
    );
}

#[tokio::test]
async fn http_error_without_envelope_names_status() {
    let (server, _transport, services) = setup().await;

    Mock::given(method("GET"))
        .and(path("/subscriptions/summary"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let error = services.subscriptions.summary().await.unwrap_err();
    assert_eq!(error_message(&error, "Failed to fetch subscription summary"), "HTTP 503");
}

#[tokio::test]
async fn subscriptions_are_projected() {
    let (server, _transport, services) = setup().await;

    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .and(query_param("plan", "PREMIUM"))
        .respond_with(ok(json!({
            "content": [{
                "id": "sub-1",
                "userId": "u-1",
                "userEmail": "u1@studydesk.io",
                "plan": "PREMIUM",
                "status": "ACTIVE",
                "amount": 29.0,
                "startDate": "2024-09-01"
            }],
            "totalElements": 1,
            "totalPages": 1,
            "size": 10,
            "number": 0
        })))
        .mount(&server)
        .await;

    let page = services
        .subscriptions
        .list(&SubscriptionQuery::new(1, 10).with_plan(Plan::Premium))
        .await
        .unwrap();

    assert!(page.is_first() && page.is_last());
    assert_eq!(page.content()[0].plan, Plan::Premium);
}

#[tokio::test]
async fn weekly_revenue_totals_days() {
    let (server, _transport, services) = setup().await;

    Mock::given(method("GET"))
        .and(path("/subscriptions/revenue/weekly"))
        .respond_with(ok(json!([
            { "day": "MON", "revenue": 100.0 },
            { "day": "TUE", "revenue": 50.5 }
        ])))
        .mount(&server)
        .await;

    let revenue = services.subscriptions.weekly_revenue().await.unwrap();
    assert_eq!(revenue.points.len(), 2);
    assert!((revenue.total - 150.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn classes_listing_maps_rows() {
    let (server, _transport, services) = setup().await;

    Mock::given(method("GET"))
        .and(path("/classes"))
        .and(query_param("search", "ielts"))
        .respond_with(ok(json!({
            "content": [{
                "id": "c-1",
                "title": "IELTS Speaking",
                "subject": "English",
                "teacherName": "Test User",
                "price": 15.0,
                "enrolled": 20,
                "capacity": 20
            }],
            "totalElements": 1,
            "totalPages": 1,
            "size": 10,
            "number": 0
        })))
        .mount(&server)
        .await;

    let page = services
        .classes
        .list(&ClassQuery::new(1, 10).with_search("ielts"))
        .await
        .unwrap();
    assert!(page.content()[0].is_full());
}

#[tokio::test]
async fn logout_accepts_empty_result() {
    let (server, _transport, services) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .and(body_json(json!({ "token": "jwt-123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 1000 })))
        .expect(1)
        .mount(&server)
        .await;

    services.auth.logout("jwt-123").await.unwrap();
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let transport = HttpTransport::new(Url::parse("http://127.0.0.1:9").unwrap());
    let services = Services::new(Arc::new(transport));

    let error = services.classes.list(&ClassQuery::default()).await.unwrap_err();
    assert!(matches!(error, ApiError::Transport(_)));
}
