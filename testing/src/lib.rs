//! # StudyDesk Testing
//!
//! Testing utilities and helpers for StudyDesk slices.
//!
//! This crate provides:
//! - [`MockTransport`]: a scripted [`Transport`](studydesk_api::Transport)
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - Helpers to drive effects to completion without a store
//! - JSON fixtures and proptest strategies for backend payloads
//!
//! ## Example
//!
//! ```ignore
//! use studydesk_testing::{MockTransport, fixtures};
//!
//! #[tokio::test]
//! async fn test_fetch_users() {
//!     let transport = MockTransport::new();
//!     transport.respond_ok(Method::Get, "/users", fixtures::page_json(vec![], 0, 0, 10, 0));
//!
//!     let env = AppEnvironment::new(Arc::new(transport.clone()));
//!     let store = app_store(env, StoreConfig::default());
//!     let query = UserQuery::default();
//!     let action = AppAction::Account(AccountAction::FetchUsers { query });
//!     store.send(action).await.unwrap().wait().await;
//!
//!     assert_eq!(transport.requests()[0].query.as_deref(), Some("page=1&size=10"));
//! }
//! ```


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of backend collaborators
pub mod mocks {
    use futures::future::BoxFuture;
    use serde_json::{Value, json};
    use std::collections::{HashMap, VecDeque};
    use std::sync::{Arc, Mutex, PoisonError};
    use studydesk_api::{ApiError, Method, Request, Transport};
    use tokio::sync::oneshot;

    type Outcome = Result<Value, ApiError>;

    enum Scripted {
        Ready(Outcome),
        Held(oneshot::Receiver<Outcome>),
    }

    #[derive(Default)]
    struct Inner {
        scripts: Mutex<HashMap<(Method, String), VecDeque<Scripted>>>,
        requests: Mutex<Vec<Request>>,
        token: Mutex<Option<String>>,
    }

    /// Scripted transport
    ///
    /// Responses are queued per method and path (query excluded) and each
    /// is served once, in order. Every request is recorded. Clones share
    /// the same script, log, and token slot.
    ///
    /// # Example
    ///
    /// ```
    /// use serde_json::json;
    /// use studydesk_api::{Method, Request, Transport};
    /// use studydesk_testing::MockTransport;
    ///
    /// # tokio_test::block_on(async {
    /// let transport = MockTransport::new();
    /// let summary = json!({ "totalSubscriptions": 3 });
    /// transport.respond_ok(Method::Get, "/subscriptions/summary", summary);
    ///
    /// let body = transport.execute(Request::get("/subscriptions/summary")).await;
    /// assert_eq!(body.ok().map(|b| b["code"].clone()), Some(json!(1000)));
    /// assert_eq!(transport.requests().len(), 1);
    /// # });
    /// ```
    #[derive(Clone, Default)]
    pub struct MockTransport {
        inner: Arc<Inner>,
    }

    /// Releases a response queued with [`MockTransport::hold`]
    pub struct Responder(oneshot::Sender<Outcome>);

    impl Responder {
        /// Resolve with a successful envelope around `result`
        pub fn resolve_ok(self, result: Value) {
            let _ = self.0.send(Ok(envelope(result)));
        }

        /// Resolve with a raw response body
        pub fn resolve(self, body: Value) {
            let _ = self.0.send(Ok(body));
        }

        /// Reject with `error`
        pub fn reject(self, error: ApiError) {
            let _ = self.0.send(Err(error));
        }
    }

    /// Wrap `result` in a successful envelope
    #[must_use]
    pub fn envelope(result: Value) -> Value {
        json!({ "code": 1000, "message": "", "result": result })
    }

    impl MockTransport {
        /// Create a transport with an empty script
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        fn push(&self, method: Method, path: &str, scripted: Scripted) {
            self.inner
                .scripts
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entry((method, path.to_string()))
                .or_default()
                .push_back(scripted);
        }

        /// Queue a raw response body
        pub fn respond(&self, method: Method, path: &str, body: Value) {
            self.push(method, path, Scripted::Ready(Ok(body)));
        }

        /// Queue a successful envelope around `result`
        pub fn respond_ok(&self, method: Method, path: &str, result: Value) {
            self.respond(method, path, envelope(result));
        }

        /// Queue a rejection
        pub fn fail(&self, method: Method, path: &str, error: ApiError) {
            self.push(method, path, Scripted::Ready(Err(error)));
        }

        /// Queue a response that stays pending until the returned
        /// [`Responder`] is used
        #[must_use]
        pub fn hold(&self, method: Method, path: &str) -> Responder {
            let (tx, rx) = oneshot::channel();
            self.push(method, path, Scripted::Held(rx));
            Responder(tx)
        }

        /// Every request received so far, in order
        #[must_use]
        pub fn requests(&self) -> Vec<Request> {
            self.inner
                .requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Requests received for one path
        #[must_use]
        pub fn requests_to(&self, path: &str) -> Vec<Request> {
            self.requests()
                .into_iter()
                .filter(|request| request.path == path)
                .collect()
        }

        /// Whether every queued response has been served
        #[must_use]
        pub fn is_exhausted(&self) -> bool {
            self.inner
                .scripts
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .values()
                .all(VecDeque::is_empty)
        }
    }

    impl Transport for MockTransport {
        fn execute(&self, request: Request) -> BoxFuture<'_, Result<Value, ApiError>> {
            let key = (request.method, request.path.clone());
            let scripted = self
                .inner
                .scripts
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get_mut(&key)
                .and_then(VecDeque::pop_front);
            self.inner
                .requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(request);

            Box::pin(async move {
                match scripted {
                    Some(Scripted::Ready(outcome)) => outcome,
                    Some(Scripted::Held(rx)) => rx.await.unwrap_or_else(|_| {
                        Err(ApiError::Transport("responder dropped".to_string()))
                    }),
                    None => Err(ApiError::Transport(format!(
                        "no response scripted for {} {}",
                        key.0, key.1
                    ))),
                }
            })
        }

        fn set_token(&self, token: Option<String>) {
            *self
                .inner
                .token
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = token;
        }

        fn token(&self) -> Option<String> {
            self.inner
                .token
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }
}

/// Helpers for running effects and wiring test output
pub mod helpers {
    use futures::future::BoxFuture;
    use studydesk_core::effect::Effect;

    /// Run every effect to completion and collect the actions fed back
    ///
    /// Parallel effects are flattened; their actions come back in
    /// declaration order.
    pub fn settle<A: Send + 'static>(effects: Vec<Effect<A>>) -> BoxFuture<'static, Vec<A>> {
        Box::pin(async move {
            let mut actions = Vec::new();
            for effect in effects {
                match effect {
                    Effect::None => {},
                    Effect::Future(fut) => actions.extend(fut.await),
                    Effect::Parallel(effects) => actions.extend(settle(effects).await),
                }
            }
            actions
        })
    }

    /// Install a `tracing` subscriber that writes through the test harness
    ///
    /// Honors `RUST_LOG`; calling it more than once is harmless.
    pub fn init_test_tracing() {
        use tracing_subscriber::EnvFilter;

        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }
}

/// Backend payload fixtures in wire (camelCase) form
pub mod fixtures {
    use serde_json::{Value, json};

    /// An account payload with the given role
    #[must_use]
    pub fn user_json(id: &str, role: &str) -> Value {
        json!({
            "id": id,
            "email": format!("{id}@studydesk.io"),
            "firstName": "Test",
            "lastName": id,
            "role": role,
            "priceClass": 25.0,
            "studentCount": 12,
            "createdAt": "2024-09-01T08:00:00"
        })
    }

    /// A session payload
    #[must_use]
    pub fn session_json(token: &str) -> Value {
        json!({ "token": token, "authenticated": true })
    }

    /// A page payload around `content`
    #[must_use]
    pub fn page_json(
        content: Vec<Value>,
        total_elements: u64,
        total_pages: u32,
        size: u32,
        number: u32,
    ) -> Value {
        json!({
            "content": content,
            "totalElements": total_elements,
            "totalPages": total_pages,
            "size": size,
            "number": number
        })
    }

    /// A class listing row
    #[must_use]
    pub fn class_json(id: &str, title: &str) -> Value {
        json!({
            "id": id,
            "title": title,
            "subject": "Mathematics",
            "teacherName": "Test Teacher",
            "price": 20.0,
            "schedule": "Mon 18:00",
            "enrolled": 5,
            "capacity": 20
        })
    }
}

/// Property-based testing utilities using proptest
pub mod properties {
    use proptest::prelude::*;
    use serde_json::Value;

    /// Any role name the backend sends
    pub fn arb_role_name() -> impl Strategy<Value = &'static str> {
        prop_oneof![Just("STUDENT"), Just("TEACHER"), Just("ADMIN")]
    }

    /// Account payloads with arbitrary names and a valid role
    pub fn arb_user_json() -> impl Strategy<Value = Value> {
        ("[a-z0-9]{1,12}", arb_role_name())
            .prop_map(|(id, role)| crate::fixtures::user_json(&id, role))
    }

    /// `(number, total_pages)` with `number < total_pages`
    pub fn arb_page_position() -> impl Strategy<Value = (u32, u32)> {
        (1u32..200).prop_flat_map(|total_pages| (0..total_pages, Just(total_pages)))
    }
}

// Re-export commonly used items
pub use mocks::{MockTransport, Responder};
