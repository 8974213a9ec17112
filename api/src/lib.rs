//! # StudyDesk API
//!
//! Client for the StudyDesk REST backend: the transport, the response
//! envelope, the domain records, and one service per domain.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use studydesk_api::{Credentials, HttpTransport, Services, UserQuery, Role};
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = Arc::new(HttpTransport::new(Url::parse("http://localhost:8080")?));
//!     let services = Services::new(transport);
//!
//!     services.auth.login(&Credentials::new("admin@studydesk.io", "secret")).await?;
//!     let students = services.users.list(&UserQuery::new(1, 10).with_role(Role::Student)).await?;
//!
//!     println!("{} students", students.total_elements());
//!     Ok(())
//! }
//! ```
//!
//! Failures are [`ApiError`] values, which implement
//! [`Rejection`](studydesk_core::Rejection) so slices can normalize them into
//! a single message.

pub mod domain;
pub mod dto;
pub mod envelope;
pub mod error;
pub mod query;
pub mod services;
pub mod transport;

// Re-export main types for convenience
pub use domain::{
    ClassSummary, Credentials, GoogleCredential, Page, Plan, Profile, RevenuePoint, Role,
    Session, SubscriptionResponse, SubscriptionStatus, SubscriptionSummary, User, WeeklyRevenue,
};
pub use envelope::{Envelope, SUCCESS_CODE};
pub use error::ApiError;
pub use query::{ClassQuery, SubscriptionQuery, ToQuery, UserQuery};
pub use services::{AuthService, ClassService, Services, SubscriptionService, UserService};
pub use transport::{HttpTransport, Method, Request, Transport};
