//! # StudyDesk App
//!
//! The client state of the StudyDesk education platform, built from four
//! slices composed into one [`Store`](studydesk_runtime::Store):
//!
//! - [`auth`]: sign-in, session refresh, profile, and sign-out
//! - [`account`]: the account listing and detail views
//! - [`subscription`]: revenue and subscription reporting for admins
//! - [`entity`]: generic paginated listings, instantiated for classes
//!
//! Every operation follows the same lifecycle: the command action moves the
//! operation's `AsyncState` into its pending phase, an effect runs the
//! service call, and the settled action records the payload or the error
//! message.
//!
//! ## Example
//!
//! ```no_run
//! use studydesk_api::{Credentials, UserQuery};
//! use studydesk_app::{AppAction, AppConfig, AppEnvironment, app_store};
//! use studydesk_app::account::AccountAction;
//! use studydesk_app::auth::AuthAction;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let store = app_store(AppEnvironment::http(config.api_url.clone()), config.store_config());
//!
//! let mut login = store
//!     .send(AppAction::Auth(AuthAction::Login(Credentials::new("admin@studydesk.io", "secret"))))
//!     .await?;
//! login.wait().await;
//!
//! store
//!     .send(AppAction::Account(AccountAction::FetchUsers { query: UserQuery::default() }))
//!     .await?
//!     .wait()
//!     .await;
//!
//! let total = store
//!     .state(|s| s.account.users.data().map(|page| page.total_elements()))
//!     .await;
//! println!("{total:?} accounts");
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod auth;
pub mod config;
pub mod entity;
pub mod env;
pub mod store;
pub mod subscription;

pub use config::{AppConfig, ConfigError};
pub use env::AppEnvironment;
pub use store::{AppAction, AppReducer, AppState, AppStore, app_store};
