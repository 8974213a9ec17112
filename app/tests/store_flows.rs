//! Integration tests for the composed client store
//!
//! Every test runs the real slices inside a [`Store`](studydesk_runtime::Store)
//! against a scripted transport.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use studydesk_api::{
    ApiError, ClassQuery, Credentials, Method, Role, SubscriptionQuery, Transport, User, UserQuery,
};
use studydesk_app::account::AccountAction;
use studydesk_app::auth::AuthAction;
use studydesk_app::entity::ClassesAction;
use studydesk_app::subscription::SubscriptionAction;
use studydesk_app::{AppAction, AppEnvironment, AppState, AppStore, app_store};
use studydesk_core::Lifecycle;
use studydesk_runtime::StoreConfig;
use studydesk_testing::{MockTransport, fixtures, helpers};

// ============================================================================
// Test Fixtures
// ============================================================================

fn store(transport: &MockTransport) -> AppStore {
    helpers::init_test_tracing();
    app_store(
        AppEnvironment::new(Arc::new(transport.clone())),
        StoreConfig::default(),
    )
}

async fn run(store: &AppStore, action: AppAction) {
    let mut handle = store.send(action).await.unwrap();
    handle
        .wait_with_timeout(Duration::from_secs(2))
        .await
        .unwrap();
}

fn login() -> AppAction {
    AppAction::Auth(AuthAction::Login(Credentials::new(
        "teacher@studydesk.io",
        "secret",
    )))
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn teacher_login_projects_teacher() {
    let transport = MockTransport::new();
    transport.respond_ok(Method::Post, "/auth/token", fixtures::session_json("jwt-t"));
    transport.respond_ok(Method::Get, "/users/my-info", fixtures::user_json("t-1", "TEACHER"));

    let store = store(&transport);
    run(&store, login()).await;

    let (user, authenticated, loading) = store
        .state(|s| {
            (
                s.auth.current_user().cloned(),
                s.auth.is_authenticated,
                s.auth.is_loading(),
            )
        })
        .await;

    match user {
        Some(User::Teacher {
            profile,
            price_class,
            student_count,
        }) => {
            assert_eq!(profile.id, "t-1");
            assert!((price_class - 25.0).abs() < f64::EPSILON);
            assert_eq!(student_count, 12);
        },
        other => panic!("expected a teacher, got {other:?}"),
    }
    assert!(authenticated);
    assert!(!loading);
    assert_eq!(transport.token().as_deref(), Some("jwt-t"));

    // The profile request carried no credentials in its body
    let profile = transport.requests_to("/users/my-info");
    assert_eq!(profile.len(), 1);
    assert!(profile[0].body.is_none());
}

#[tokio::test]
async fn profile_rejection_fails_the_whole_login() {
    let transport = MockTransport::new();
    transport.respond_ok(Method::Post, "/auth/token", fixtures::session_json("jwt-t"));
    transport.fail(
        Method::Get,
        "/users/my-info",
        ApiError::Api {
            status: 504,
            message: "timeout".to_string(),
        },
    );

    let store = store(&transport);
    run(&store, login()).await;

    let (user, authenticated, error) = store
        .state(|s| {
            (
                s.auth.current_user().cloned(),
                s.auth.is_authenticated,
                s.auth.error().map(str::to_string),
            )
        })
        .await;

    assert_eq!(user, None);
    assert!(!authenticated);
    assert_eq!(error.as_deref(), Some("timeout"));
}

#[tokio::test]
async fn login_without_server_message_uses_fallback() {
    let transport = MockTransport::new();
    transport.fail(Method::Post, "/auth/token", ApiError::Transport(String::new()));

    let store = store(&transport);
    run(&store, login()).await;

    let error = store.state(|s| s.auth.error().map(str::to_string)).await;
    assert_eq!(error.as_deref(), Some("Login failed"));
    assert!(transport.requests_to("/users/my-info").is_empty());
}

#[tokio::test]
async fn observers_see_the_settled_login() {
    let transport = MockTransport::new();
    transport.respond_ok(Method::Post, "/auth/token", fixtures::session_json("jwt-s"));
    transport.respond_ok(Method::Get, "/users/my-info", fixtures::user_json("s-1", "STUDENT"));

    let store = store(&transport);
    let settled = store
        .send_and_wait_for(
            login(),
            |action| matches!(action, AppAction::Auth(AuthAction::UserSettled { .. })),
            Duration::from_secs(2),
        )
        .await
        .unwrap();

    match settled {
        AppAction::Auth(AuthAction::UserSettled {
            phase: Lifecycle::Fulfilled(user),
            ..
        }) => {
            assert_eq!(user.role(), Role::Student);
            assert_eq!(user.dashboard(), "/student/dashboard");
        },
        other => panic!("unexpected action {other:?}"),
    }
    assert!(store.state(|s| s.auth.is_authenticated).await);
}

#[tokio::test]
async fn refresh_reloads_profile_under_new_token() {
    let transport = MockTransport::new();
    transport.respond_ok(Method::Post, "/auth/token", fixtures::session_json("jwt-1"));
    transport.respond_ok(Method::Get, "/users/my-info", fixtures::user_json("s-1", "STUDENT"));
    transport.respond_ok(Method::Post, "/auth/refresh", fixtures::session_json("jwt-2"));
    transport.respond_ok(Method::Get, "/users/my-info", fixtures::user_json("s-1", "TEACHER"));

    let store = store(&transport);
    run(&store, login()).await;
    run(&store, AppAction::Auth(AuthAction::Refresh)).await;

    let (role, authenticated) = store
        .state(|s| (s.auth.current_user().map(User::role), s.auth.is_authenticated))
        .await;
    assert_eq!(role, Some(Role::Teacher));
    assert!(authenticated);
    assert_eq!(transport.token().as_deref(), Some("jwt-2"));
    assert_eq!(transport.requests_to("/users/my-info").len(), 2);
    assert!(transport.is_exhausted());
}

#[tokio::test]
async fn refresh_with_failing_profile_signs_out() {
    let transport = MockTransport::new();
    transport.respond_ok(Method::Post, "/auth/token", fixtures::session_json("jwt-1"));
    transport.respond_ok(Method::Get, "/users/my-info", fixtures::user_json("s-1", "STUDENT"));
    transport.respond_ok(Method::Post, "/auth/refresh", fixtures::session_json("jwt-2"));
    transport.respond(
        Method::Get,
        "/users/my-info",
        json!({ "code": 1006, "message": "Profile locked" }),
    );

    let store = store(&transport);
    run(&store, login()).await;
    run(&store, AppAction::Auth(AuthAction::Refresh)).await;

    let (authenticated, error) = store
        .state(|s| (s.auth.is_authenticated, s.auth.error().map(str::to_string)))
        .await;
    assert!(!authenticated);
    assert_eq!(error.as_deref(), Some("Profile locked"));
    assert_eq!(transport.token(), None);
}

#[tokio::test]
async fn logout_wins_over_late_login() {
    let transport = MockTransport::new();
    let session = transport.hold(Method::Post, "/auth/token");

    let store = store(&transport);
    let mut sign_in = store.send(login()).await.unwrap();
    run(&store, AppAction::Auth(AuthAction::Logout)).await;

    session.resolve_ok(fixtures::session_json("jwt-late"));
    sign_in
        .wait_with_timeout(Duration::from_secs(2))
        .await
        .unwrap();

    let auth = store.state(|s| s.auth.clone()).await;
    assert_eq!(auth, studydesk_app::auth::AuthState::default());
    assert_eq!(transport.token(), None);
    assert!(transport.requests_to("/users/my-info").is_empty());
}

// ============================================================================
// Listings
// ============================================================================

#[tokio::test]
async fn users_query_is_rendered_without_search() {
    let transport = MockTransport::new();
    transport.respond_ok(
        Method::Get,
        "/users",
        fixtures::page_json(
            vec![
                fixtures::user_json("s-1", "STUDENT"),
                fixtures::user_json("s-2", "STUDENT"),
            ],
            12,
            2,
            10,
            1,
        ),
    );

    let store = store(&transport);
    run(
        &store,
        AppAction::Account(AccountAction::FetchUsers {
            query: UserQuery::new(2, 10).with_role(Role::Student),
        }),
    )
    .await;

    let requests = transport.requests_to("/users");
    assert_eq!(requests[0].method, Method::Get);
    assert_eq!(requests[0].query.as_deref(), Some("page=2&size=10&role=STUDENT"));

    let (len, first, last) = store
        .state(|s| {
            let page = s.account.users.data().unwrap();
            (page.content().len(), page.is_first(), page.is_last())
        })
        .await;
    assert_eq!(len, 2);
    assert!(!first);
    assert!(last);
}

#[tokio::test]
async fn logical_failure_rejects_with_envelope_message() {
    let transport = MockTransport::new();
    transport.respond(
        Method::Get,
        "/subscriptions",
        json!({ "code": 1009, "message": "Subscription filter invalid" }),
    );
    transport.respond(Method::Get, "/classes", json!({ "code": 1010, "message": "" }));

    let store = store(&transport);
    run(
        &store,
        AppAction::Subscription(SubscriptionAction::FetchSubscriptions {
            query: SubscriptionQuery::default(),
        }),
    )
    .await;
    run(
        &store,
        AppAction::Classes(ClassesAction::Fetch(ClassQuery::default())),
    )
    .await;

    let (subscriptions, classes) = store
        .state(|s| {
            (
                s.subscription.subscriptions.error().map(str::to_string),
                s.classes.items.error().map(str::to_string),
            )
        })
        .await;
    assert_eq!(subscriptions.as_deref(), Some("Subscription filter invalid"));
    assert_eq!(classes.as_deref(), Some("Request failed"));
}

// ============================================================================
// Independence, cancellation, reset
// ============================================================================

#[tokio::test]
async fn sibling_operations_settle_independently() {
    let transport = MockTransport::new();
    let revenue = transport.hold(Method::Get, "/subscriptions/revenue/weekly");
    transport.fail(
        Method::Get,
        "/subscriptions/summary",
        ApiError::Api {
            status: 500,
            message: "Summary unavailable".to_string(),
        },
    );

    let store = store(&transport);
    let mut revenue_handle = store
        .send(AppAction::Subscription(SubscriptionAction::FetchWeeklyRevenue))
        .await
        .unwrap();
    run(&store, AppAction::Subscription(SubscriptionAction::FetchSummary)).await;

    let (revenue_loading, summary_error) = store
        .state(|s| {
            (
                s.subscription.weekly_revenue.is_loading(),
                s.subscription.summary.error().map(str::to_string),
            )
        })
        .await;
    assert!(revenue_loading);
    assert_eq!(summary_error.as_deref(), Some("Summary unavailable"));

    revenue.resolve_ok(json!([{ "day": "MON", "revenue": 40.5 }]));
    revenue_handle
        .wait_with_timeout(Duration::from_secs(2))
        .await
        .unwrap();

    let (total, summary_error) = store
        .state(|s| {
            (
                s.subscription.weekly_revenue.data().map(|r| r.total),
                s.subscription.summary.error().map(str::to_string),
            )
        })
        .await;
    assert_eq!(total, Some(40.5));
    assert_eq!(summary_error.as_deref(), Some("Summary unavailable"));
}

#[tokio::test]
async fn cancelled_dispatch_never_applies_late_result() {
    let transport = MockTransport::new();
    let classes = transport.hold(Method::Get, "/classes");

    let store = store(&transport);
    let mut handle = store
        .send(AppAction::Classes(ClassesAction::Fetch(ClassQuery::default())))
        .await
        .unwrap();
    assert!(store.state(|s| s.classes.items.is_loading()).await);

    handle.cancel();
    classes.resolve_ok(fixtures::page_json(
        vec![fixtures::class_json("c-1", "Algebra")],
        1,
        1,
        10,
        0,
    ));
    let _ = handle.wait_with_timeout(Duration::from_millis(200)).await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    let (data, loading) = store
        .state(|s| (s.classes.items.data().is_some(), s.classes.items.is_loading()))
        .await;
    assert!(!data);
    assert!(loading);
    assert!(handle.is_cancelled());

    // Consumers recover by resetting
    run(&store, AppAction::Classes(ClassesAction::Reset)).await;
    assert!(store.state(|s| s.classes.items.is_at_rest()).await);
}

#[tokio::test]
async fn reset_all_returns_to_rest_and_keeps_token() {
    let transport = MockTransport::new();
    transport.respond_ok(Method::Post, "/auth/token", fixtures::session_json("jwt-a"));
    transport.respond_ok(Method::Get, "/users/my-info", fixtures::user_json("a-1", "ADMIN"));
    transport.respond_ok(
        Method::Get,
        "/subscriptions/summary",
        json!({
            "totalSubscriptions": 10,
            "activeSubscriptions": 7,
            "totalRevenue": 900.0,
            "monthlyRevenue": 120.0
        }),
    );

    let store = store(&transport);
    run(&store, login()).await;
    run(&store, AppAction::Subscription(SubscriptionAction::FetchSummary)).await;
    assert!(store.state(|s| s.subscription.summary.data().is_some()).await);

    run(&store, AppAction::ResetAll).await;

    assert_eq!(store.state(Clone::clone).await, AppState::default());
    assert_eq!(transport.token().as_deref(), Some("jwt-a"));
}

#[tokio::test]
async fn logout_resets_auth_and_tells_server() {
    let transport = MockTransport::new();
    transport.respond_ok(Method::Post, "/auth/token", fixtures::session_json("jwt-l"));
    transport.respond_ok(Method::Get, "/users/my-info", fixtures::user_json("s-1", "STUDENT"));
    transport.respond(Method::Post, "/auth/logout", json!({ "code": 1000, "message": "" }));

    let store = store(&transport);
    run(&store, login()).await;
    run(&store, AppAction::Auth(AuthAction::Logout)).await;

    let auth = store.state(|s| s.auth.clone()).await;
    assert_eq!(auth, studydesk_app::auth::AuthState::default());
    assert_eq!(transport.token(), None);
    assert_eq!(transport.requests_to("/auth/logout").len(), 1);
    assert!(transport.is_exhausted());
}

#[tokio::test]
async fn shutdown_rejects_new_dispatches() {
    let transport = MockTransport::new();
    let store = store(&transport);

    store.shutdown(Duration::from_secs(1)).await.unwrap();

    let result = store.send(login()).await;
    assert!(result.is_err());
    assert!(transport.requests().is_empty());
}
