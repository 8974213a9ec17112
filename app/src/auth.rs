//! Authentication slice
//!
//! Sign-in is a compound operation: the session call, then the profile
//! fetch, then role-based projection into [`User`]. Any failing step rejects
//! the whole operation and drops the transport token.

use crate::env::AppEnvironment;
use studydesk_api::{ApiError, AuthService, Credentials, GoogleCredential, Session, User};
use studydesk_core::{
    AsyncState, Effect, Lifecycle, Reducer, SmallVec, async_effect, async_operation, smallvec,
};

/// Fallback of [`AuthAction::Login`]
pub const LOGIN_FAILED: &str = "Login failed";
/// Fallback of [`AuthAction::LoginWithGoogle`]
pub const GOOGLE_LOGIN_FAILED: &str = "Google login failed";
/// Fallback of [`AuthAction::Refresh`]
pub const REFRESH_FAILED: &str = "Session refresh failed";
/// Fallback of [`AuthAction::FetchProfile`]
pub const FETCH_PROFILE_FAILED: &str = "Failed to fetch profile";

/// Who is signed in
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    /// The signed-in account
    pub user: AsyncState<User>,
    /// Whether the last sign-in or profile fetch succeeded
    pub is_authenticated: bool,
}

impl AuthState {
    /// The signed-in account, if any
    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.user.data()
    }

    /// Whether an auth operation is in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.user.is_loading()
    }

    /// Message of the last failed auth operation
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.user.error()
    }
}

/// Actions of the authentication slice
#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    /// Sign in with email and password
    Login(Credentials),
    /// Sign in with a Google ID token
    LoginWithGoogle(GoogleCredential),
    /// Trade the current token for a fresh one and reload the profile
    Refresh,
    /// Reload the profile with the current token
    FetchProfile,
    /// Any of the above settled
    UserSettled {
        /// Session generation the operation was started in
        generation: u64,
        /// Outcome
        phase: Lifecycle<User>,
    },
    /// Drop the error message
    ClearError,
    /// Sign out: reset, forget the token, tell the server
    Logout,
    /// Return to the signed-out rest state
    Reset,
}

/// Reducer of the authentication slice
///
/// `Logout` and `Reset` end the session generation, so any auth operation
/// still in flight neither installs its token nor lands in state.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthReducer;

impl AuthReducer {
    /// Create the reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Run the profile step after `session` and drop the token if any step fails
async fn sign_in(
    auth: &AuthService,
    session: impl Future<Output = Result<Session, ApiError>>,
) -> Result<User, ApiError> {
    let outcome = match session.await {
        Ok(_) => auth.my_profile().await,
        Err(error) => Err(error),
    };
    if outcome.is_err() {
        auth.clear_token();
    }
    outcome
}

/// Settled action of an operation started in `generation`
fn settled(generation: u64) -> impl FnOnce(Lifecycle<User>) -> AuthAction + Send + 'static {
    move |phase| AuthAction::UserSettled { generation, phase }
}

impl Reducer for AuthReducer {
    type State = AuthState;
    type Action = AuthAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let generation = env.services.auth.generation();

        match action {
            AuthAction::Login(credentials) => {
                state.user.apply(Lifecycle::Pending);
                let auth = env.services.auth.pinned(generation);
                smallvec![async_operation(
                    async move { sign_in(&auth, auth.login(&credentials)).await },
                    LOGIN_FAILED,
                    settled(generation),
                )]
            },

            AuthAction::LoginWithGoogle(credential) => {
                state.user.apply(Lifecycle::Pending);
                let auth = env.services.auth.pinned(generation);
                smallvec![async_operation(
                    async move { sign_in(&auth, auth.login_with_google(&credential)).await },
                    GOOGLE_LOGIN_FAILED,
                    settled(generation),
                )]
            },

            AuthAction::Refresh => {
                state.user.apply(Lifecycle::Pending);
                let auth = env.services.auth.pinned(generation);
                smallvec![async_operation(
                    async move { sign_in(&auth, auth.refresh()).await },
                    REFRESH_FAILED,
                    settled(generation),
                )]
            },

            AuthAction::FetchProfile => {
                state.user.apply(Lifecycle::Pending);
                let auth = env.services.auth.clone();
                smallvec![async_operation(
                    async move { auth.my_profile().await },
                    FETCH_PROFILE_FAILED,
                    settled(generation),
                )]
            },

            AuthAction::UserSettled {
                generation: started,
                phase,
            } => {
                if started != generation {
                    tracing::debug!(started, generation, "Dropping result of an ended session");
                    return SmallVec::new();
                }
                match &phase {
                    Lifecycle::Fulfilled(user) => {
                        tracing::info!(role = %user.role(), "Signed in");
                        state.is_authenticated = true;
                    },
                    Lifecycle::Rejected(message) => {
                        tracing::debug!(%message, "Sign-in rejected");
                        state.is_authenticated = false;
                    },
                    Lifecycle::Pending => {},
                }
                state.user.apply(phase);
                SmallVec::new()
            },

            AuthAction::ClearError => {
                state.user.clear_error();
                SmallVec::new()
            },

            AuthAction::Logout => {
                *state = AuthState::default();

                let auth = env.services.auth.clone();
                let Some(token) = auth.end_session() else {
                    return SmallVec::new();
                };

                smallvec![async_effect! {
                    if let Err(error) = auth.logout(&token).await {
                        tracing::warn!(%error, "Server logout failed");
                    }
                    None
                }]
            },

            AuthAction::Reset => {
                *state = AuthState::default();
                env.services.auth.invalidate_sign_ins();
                SmallVec::new()
            },
        }
    }
}
