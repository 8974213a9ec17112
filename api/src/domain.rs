//! Domain records exposed to state slices
//!
//! These are immutable values re-projected field by field from the wire
//! DTOs in [`crate::dto`]. Slices only ever see these types.

use crate::error::ApiError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Platform role of an account
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Learner enrolled in classes
    Student,
    /// Instructor running classes
    Teacher,
    /// Platform operator
    Admin,
}

impl Role {
    /// Wire form of the role
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "STUDENT",
            Self::Teacher => "TEACHER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STUDENT" => Ok(Self::Student),
            "TEACHER" => Ok(Self::Teacher),
            "ADMIN" => Ok(Self::Admin),
            other => Err(ApiError::Mapping(format!("unknown role `{other}`"))),
        }
    }
}

/// Fields every account carries regardless of role
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Profile {
    /// Account identifier
    pub id: String,
    /// Login email
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Avatar image URL
    pub avatar: Option<String>,
    /// Contact phone number
    pub phone: Option<String>,
    /// Registration time
    pub created_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// `first last`, trimmed
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// An account, discriminated by role
///
/// Role-specific fields live on their variant, so a teacher's pricing can
/// never be read off a student.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "role", rename_all = "UPPERCASE")]
pub enum User {
    /// Learner account
    Student(Profile),
    /// Instructor account
    Teacher {
        /// Shared profile fields
        profile: Profile,
        /// Price of one class session
        price_class: f64,
        /// Number of students currently taught
        student_count: u32,
    },
    /// Operator account
    Admin(Profile),
}

impl User {
    /// Role of this account
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Student(_) => Role::Student,
            Self::Teacher { .. } => Role::Teacher,
            Self::Admin(_) => Role::Admin,
        }
    }

    /// Shared profile fields
    #[must_use]
    pub const fn profile(&self) -> &Profile {
        match self {
            Self::Student(profile) | Self::Admin(profile) | Self::Teacher { profile, .. } => {
                profile
            },
        }
    }

    /// Landing route of the role's dashboard
    #[must_use]
    pub const fn dashboard(&self) -> &'static str {
        match self {
            Self::Student(_) => "/student/dashboard",
            Self::Teacher { .. } => "/teacher/dashboard",
            Self::Admin(_) => "/admin/dashboard",
        }
    }
}

/// One page of a paginated listing
///
/// `first` and `last` are always derived from `number` and `total_pages`;
/// they are never taken from the server.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Page<T> {
    content: Vec<T>,
    total_elements: u64,
    total_pages: u32,
    size: u32,
    number: u32,
    first: bool,
    last: bool,
}

impl<T> Page<T> {
    /// Build a page; `number` is zero-based
    ///
    /// # Example
    ///
    /// ```
    /// use studydesk_api::Page;
    ///
    /// let page = Page::new(vec!["a", "b"], 25, 3, 10, 0);
    /// assert!(page.is_first());
    /// assert!(!page.is_last());
    /// ```
    #[must_use]
    pub fn new(
        content: Vec<T>,
        total_elements: u64,
        total_pages: u32,
        size: u32,
        number: u32,
    ) -> Self {
        let first = number == 0;
        let last = total_pages == 0 || u64::from(number) + 1 == u64::from(total_pages);

        Self {
            content,
            total_elements,
            total_pages,
            size,
            number,
            first,
            last,
        }
    }

    /// An empty first page
    #[must_use]
    pub fn empty(size: u32) -> Self {
        Self::new(Vec::new(), 0, 0, size, 0)
    }

    /// Records on this page
    #[must_use]
    pub fn content(&self) -> &[T] {
        &self.content
    }

    /// Take the records, dropping the metadata
    #[must_use]
    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    /// Total number of records across all pages
    #[must_use]
    pub const fn total_elements(&self) -> u64 {
        self.total_elements
    }

    /// Number of pages
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Requested page size
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Zero-based page index
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Whether this is the first page
    #[must_use]
    pub const fn is_first(&self) -> bool {
        self.first
    }

    /// Whether this is the last page
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.last
    }

    /// Re-project the records, keeping the metadata
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            size: self.size,
            number: self.number,
            first: self.first,
            last: self.last,
        }
    }

    /// Re-project the records with a fallible mapping
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn try_map<U, E, F>(self, f: F) -> Result<Page<U>, E>
    where
        F: FnMut(T) -> Result<U, E>,
    {
        Ok(Page {
            content: self.content.into_iter().map(f).collect::<Result<_, _>>()?,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            size: self.size,
            number: self.number,
            first: self.first,
            last: self.last,
        })
    }
}

/// Revenue of one weekday
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RevenuePoint {
    /// Day label as reported by the server (e.g. `MON`)
    pub label: String,
    /// Revenue for the day
    pub amount: f64,
}

/// Revenue of the current week, one point per day
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct WeeklyRevenue {
    /// Points in server order
    pub points: Vec<RevenuePoint>,
    /// Sum of all points
    pub total: f64,
}

impl WeeklyRevenue {
    /// Build from points, computing the total
    #[must_use]
    pub fn new(points: Vec<RevenuePoint>) -> Self {
        let total = points.iter().map(|point| point.amount).sum();
        Self { points, total }
    }
}

/// Headline subscription figures for the admin dashboard
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SubscriptionSummary {
    /// All subscriptions ever created
    pub total_subscriptions: u64,
    /// Subscriptions currently active
    pub active_subscriptions: u64,
    /// Lifetime revenue
    pub total_revenue: f64,
    /// Revenue of the current month
    pub monthly_revenue: f64,
}

/// Subscription plan tier
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Plan {
    /// Entry tier
    Basic,
    /// Mid tier
    Premium,
    /// Organisation tier
    Enterprise,
}

impl Plan {
    /// Wire form of the plan
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "BASIC",
            Self::Premium => "PREMIUM",
            Self::Enterprise => "ENTERPRISE",
        }
    }
}

impl FromStr for Plan {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BASIC" => Ok(Self::Basic),
            "PREMIUM" => Ok(Self::Premium),
            "ENTERPRISE" => Ok(Self::Enterprise),
            other => Err(ApiError::Mapping(format!("unknown plan `{other}`"))),
        }
    }
}

/// Billing state of a subscription
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubscriptionStatus {
    /// Paid and running
    Active,
    /// Ran past its end date
    Expired,
    /// Stopped by the user or an admin
    Cancelled,
    /// Awaiting payment
    Pending,
}

impl SubscriptionStatus {
    /// Wire form of the status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Expired => "EXPIRED",
            Self::Cancelled => "CANCELLED",
            Self::Pending => "PENDING",
        }
    }
}

impl FromStr for SubscriptionStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "EXPIRED" => Ok(Self::Expired),
            "CANCELLED" => Ok(Self::Cancelled),
            "PENDING" => Ok(Self::Pending),
            other => Err(ApiError::Mapping(format!(
                "unknown subscription status `{other}`"
            ))),
        }
    }
}

/// One subscription row of the admin listing
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SubscriptionResponse {
    /// Subscription identifier
    pub id: String,
    /// Subscriber account
    pub user_id: String,
    /// Subscriber email
    pub user_email: String,
    /// Plan tier
    pub plan: Plan,
    /// Billing state
    pub status: SubscriptionStatus,
    /// Amount billed
    pub amount: f64,
    /// First day covered
    pub start_date: NaiveDate,
    /// Last day covered, open-ended if absent
    pub end_date: Option<NaiveDate>,
}

/// A class offered on the platform
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ClassSummary {
    /// Class identifier
    pub id: String,
    /// Title shown in listings
    pub title: String,
    /// Subject area
    pub subject: String,
    /// Display name of the teacher
    pub teacher_name: String,
    /// Price per session
    pub price: f64,
    /// Free-form schedule description
    pub schedule: Option<String>,
    /// Students enrolled
    pub enrolled: u32,
    /// Seats available in total
    pub capacity: u32,
}

impl ClassSummary {
    /// Whether no seat is left
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.enrolled >= self.capacity
    }
}

/// Email/password login input
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Login email
    pub email: String,
    /// Plain-text password
    pub password: String,
}

impl Credentials {
    /// Create credentials
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Google sign-in input
#[derive(Clone, PartialEq, Eq)]
pub struct GoogleCredential {
    /// ID token issued by Google
    pub id_token: String,
}

impl fmt::Debug for GoogleCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleCredential")
            .field("id_token", &"<redacted>")
            .finish()
    }
}

/// Tokens returned by a successful login or refresh
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Bearer token for subsequent requests
    pub access_token: String,
    /// Token for the refresh endpoint, when issued
    pub refresh_token: Option<String>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
