//! Per-domain service functions
//!
//! Each call sends one fixed request, unwraps the envelope, and re-projects
//! the payload into a domain record. Services are cheap to clone; every
//! clone shares the same transport and therefore the same bearer token.

use crate::domain::{
    ClassSummary, Credentials, GoogleCredential, Page, Session, SubscriptionResponse,
    SubscriptionSummary, User, WeeklyRevenue,
};
use crate::dto::{
    ClassDto, DailyRevenueDto, GoogleLoginRequest, LoginRequest, PageDto, SessionDto,
    SubscriptionDto, SubscriptionSummaryDto, TokenRequest, UserDto,
};
use crate::envelope::{unwrap_result, unwrap_unit};
use crate::error::ApiError;
use crate::query::{ClassQuery, SubscriptionQuery, ToQuery, UserQuery};
use crate::transport::{Request, Transport};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn to_body<B: Serialize>(body: &B) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Transport(e.to_string()))
}

async fn fetch<T: DeserializeOwned>(
    transport: &dyn Transport,
    request: Request,
) -> Result<T, ApiError> {
    unwrap_result(transport.execute(request).await?)
}

/// Login, logout, token refresh, and the caller's own profile
///
/// Every clone shares one session generation, bumped whenever a session is
/// ended. A clone made with [`AuthService::pinned`] only installs tokens
/// while the generation it was pinned to is still current, so a sign-in
/// that was overtaken by a logout cannot authorize the transport again.
#[derive(Clone)]
pub struct AuthService {
    transport: Arc<dyn Transport>,
    generation: Arc<Mutex<u64>>,
    pinned: Option<u64>,
}

impl AuthService {
    /// Create the service over a shared transport
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            generation: Arc::new(Mutex::new(0)),
            pinned: None,
        }
    }

    /// Current session generation
    #[must_use]
    pub fn generation(&self) -> u64 {
        *self.lock_generation()
    }

    /// A clone whose sign-ins only take effect while `generation` is current
    #[must_use]
    pub fn pinned(&self, generation: u64) -> Self {
        Self {
            pinned: Some(generation),
            ..self.clone()
        }
    }

    /// Exchange email/password for a session and authorize the transport
    ///
    /// # Errors
    ///
    /// Any [`ApiError`]; the token slot is left untouched on failure.
    #[tracing::instrument(skip_all, fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        let body = to_body(&LoginRequest {
            email: &credentials.email,
            password: &credentials.password,
        })?;
        self.open_session(Request::post("/auth/token", body)).await
    }

    /// Exchange a Google ID token for a session and authorize the transport
    ///
    /// # Errors
    ///
    /// Any [`ApiError`]; the token slot is left untouched on failure.
    #[tracing::instrument(skip_all)]
    pub async fn login_with_google(
        &self,
        credential: &GoogleCredential,
    ) -> Result<Session, ApiError> {
        let body = to_body(&GoogleLoginRequest {
            id_token: &credential.id_token,
        })?;
        self.open_session(Request::post("/auth/outbound/authentication", body))
            .await
    }

    /// Trade the current token for a fresh session
    ///
    /// # Errors
    ///
    /// [`ApiError::Unauthenticated`] when no token is held, otherwise any
    /// [`ApiError`].
    #[tracing::instrument(skip_all)]
    pub async fn refresh(&self) -> Result<Session, ApiError> {
        let token = self
            .transport
            .token()
            .ok_or_else(|| ApiError::Unauthenticated("no session to refresh".to_string()))?;
        let body = to_body(&TokenRequest { token: &token })?;
        self.open_session(Request::post("/auth/refresh", body)).await
    }

    /// Invalidate a token on the server
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    #[tracing::instrument(skip_all)]
    pub async fn logout(&self, token: &str) -> Result<(), ApiError> {
        let body = to_body(&TokenRequest { token })?;
        unwrap_unit(self.transport.execute(Request::post("/auth/logout", body)).await?)
    }

    /// Profile of the authenticated account
    ///
    /// # Errors
    ///
    /// Any [`ApiError`]; an unknown role is [`ApiError::Mapping`].
    #[tracing::instrument(skip_all)]
    pub async fn my_profile(&self) -> Result<User, ApiError> {
        let dto: UserDto = fetch(self.transport.as_ref(), Request::get("/users/my-info")).await?;
        User::try_from(dto)
    }

    /// Current bearer token
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.transport.token()
    }

    /// Drop the bearer token
    ///
    /// A pinned clone whose generation is no longer current leaves the token
    /// alone, since it belongs to a later session.
    pub fn clear_token(&self) {
        let current = self.lock_generation();
        if self.pinned.is_none_or(|pinned| pinned == *current) {
            self.transport.set_token(None);
        }
    }

    /// End the session: bump the generation and take the bearer token
    pub fn end_session(&self) -> Option<String> {
        let mut current = self.lock_generation();
        *current += 1;
        let token = self.transport.token();
        self.transport.set_token(None);
        token
    }

    /// Bump the generation so sign-ins in flight no longer take effect
    ///
    /// The token held right now stays valid.
    pub fn invalidate_sign_ins(&self) {
        *self.lock_generation() += 1;
    }

    async fn open_session(&self, request: Request) -> Result<Session, ApiError> {
        let dto: SessionDto = fetch(self.transport.as_ref(), request).await?;
        let session = Session::from(dto);

        let current = self.lock_generation();
        if self.pinned.is_some_and(|pinned| pinned != *current) {
            tracing::debug!("Session ended while signing in, token discarded");
            return Err(ApiError::Unauthenticated(
                "session ended during sign-in".to_string(),
            ));
        }
        self.transport.set_token(Some(session.access_token.clone()));
        drop(current);

        tracing::debug!("Session opened");
        Ok(session)
    }

    fn lock_generation(&self) -> MutexGuard<'_, u64> {
        self.generation.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Account listings
#[derive(Clone)]
pub struct UserService {
    transport: Arc<dyn Transport>,
}

impl UserService {
    /// Create the service over a shared transport
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// One page of accounts
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, query: &UserQuery) -> Result<Page<User>, ApiError> {
        let request = Request::get("/users").with_query(query.to_query_string());
        let page: PageDto<UserDto> = fetch(self.transport.as_ref(), request).await?;
        page.try_into_page(User::try_from)
    }

    /// One account by id
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<User, ApiError> {
        let request = Request::get(format!("/users/{id}"));
        let dto: UserDto = fetch(self.transport.as_ref(), request).await?;
        User::try_from(dto)
    }
}

/// Subscription reporting for the admin dashboard
#[derive(Clone)]
pub struct SubscriptionService {
    transport: Arc<dyn Transport>,
}

impl SubscriptionService {
    /// Create the service over a shared transport
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Revenue of the current week
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    #[tracing::instrument(skip(self))]
    pub async fn weekly_revenue(&self) -> Result<WeeklyRevenue, ApiError> {
        let days: Vec<DailyRevenueDto> = fetch(
            self.transport.as_ref(),
            Request::get("/subscriptions/revenue/weekly"),
        )
        .await?;
        Ok(WeeklyRevenue::from(days))
    }

    /// Headline figures
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    #[tracing::instrument(skip(self))]
    pub async fn summary(&self) -> Result<SubscriptionSummary, ApiError> {
        let dto: SubscriptionSummaryDto =
            fetch(self.transport.as_ref(), Request::get("/subscriptions/summary")).await?;
        Ok(SubscriptionSummary::from(dto))
    }

    /// One page of subscriptions
    ///
    /// # Errors
    ///
    /// Any [`ApiError`]; unknown plans or statuses are [`ApiError::Mapping`].
    #[tracing::instrument(skip(self))]
    pub async fn list(
        &self,
        query: &SubscriptionQuery,
    ) -> Result<Page<SubscriptionResponse>, ApiError> {
        let request = Request::get("/subscriptions").with_query(query.to_query_string());
        let page: PageDto<SubscriptionDto> = fetch(self.transport.as_ref(), request).await?;
        page.try_into_page(SubscriptionResponse::try_from)
    }
}

/// Class discovery
#[derive(Clone)]
pub struct ClassService {
    transport: Arc<dyn Transport>,
}

impl ClassService {
    /// Create the service over a shared transport
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// One page of classes
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, query: &ClassQuery) -> Result<Page<ClassSummary>, ApiError> {
        let request = Request::get("/classes").with_query(query.to_query_string());
        let page: PageDto<ClassDto> = fetch(self.transport.as_ref(), request).await?;
        page.try_into_page(|dto| Ok(ClassSummary::from(dto)))
    }
}

/// Every service, sharing one transport
#[derive(Clone)]
pub struct Services {
    /// Authentication
    pub auth: AuthService,
    /// Accounts
    pub users: UserService,
    /// Subscriptions
    pub subscriptions: SubscriptionService,
    /// Classes
    pub classes: ClassService,
}

impl Services {
    /// Build all services over the given transport
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            auth: AuthService::new(Arc::clone(&transport)),
            users: UserService::new(Arc::clone(&transport)),
            subscriptions: SubscriptionService::new(Arc::clone(&transport)),
            classes: ClassService::new(transport),
        }
    }
}
