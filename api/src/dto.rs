//! Wire shapes of the backend and their projection into domain records

use crate::domain::{
    ClassSummary, Page, Plan, Profile, RevenuePoint, Role, Session, SubscriptionResponse,
    SubscriptionStatus, SubscriptionSummary, User, WeeklyRevenue,
};
use crate::error::ApiError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /auth/token`
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    /// Login email
    pub email: &'a str,
    /// Plain-text password
    pub password: &'a str,
}

/// Body of `POST /auth/outbound/authentication`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLoginRequest<'a> {
    /// ID token issued by Google
    pub id_token: &'a str,
}

/// Body of `POST /auth/refresh` and `POST /auth/logout`
#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    /// Current token
    pub token: &'a str,
}

/// Login/refresh payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    /// Bearer token
    #[serde(alias = "accessToken")]
    pub token: String,
    /// Refresh token, when the backend issues one
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl From<SessionDto> for Session {
    fn from(dto: SessionDto) -> Self {
        Self {
            access_token: dto.token,
            refresh_token: dto.refresh_token,
        }
    }
}

/// Account payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    /// Account identifier
    pub id: String,
    /// Login email
    pub email: String,
    /// Given name
    #[serde(default)]
    pub first_name: String,
    /// Family name
    #[serde(default)]
    pub last_name: String,
    /// Avatar image URL
    #[serde(default)]
    pub avatar: Option<String>,
    /// Contact phone number
    #[serde(default)]
    pub phone: Option<String>,
    /// Registration time
    #[serde(default)]
    pub created_at: Option<String>,
    /// Role name
    pub role: String,
    /// Teacher only: price of one class session
    #[serde(default)]
    pub price_class: Option<f64>,
    /// Teacher only: students currently taught
    #[serde(default)]
    pub student_count: Option<u32>,
}

impl TryFrom<UserDto> for User {
    type Error = ApiError;

    fn try_from(dto: UserDto) -> Result<Self, Self::Error> {
        let role: Role = dto.role.parse()?;
        let created_at = dto.created_at.as_deref().map(parse_timestamp).transpose()?;

        let profile = Profile {
            id: dto.id,
            email: dto.email,
            first_name: dto.first_name,
            last_name: dto.last_name,
            avatar: dto.avatar.filter(|avatar| !avatar.is_empty()),
            phone: dto.phone.filter(|phone| !phone.is_empty()),
            created_at,
        };

        Ok(match role {
            Role::Student => Self::Student(profile),
            Role::Teacher => {
                let price_class = dto
                    .price_class
                    .ok_or_else(|| missing_teacher_field(&profile.id, "priceClass"))?;
                let student_count = dto
                    .student_count
                    .ok_or_else(|| missing_teacher_field(&profile.id, "studentCount"))?;
                Self::Teacher {
                    profile,
                    price_class,
                    student_count,
                }
            },
            Role::Admin => Self::Admin(profile),
        })
    }
}

/// Paginated payload
///
/// The server's own `first`/`last` flags are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDto<T> {
    /// Records on this page
    pub content: Vec<T>,
    /// Total records
    pub total_elements: u64,
    /// Number of pages
    pub total_pages: u32,
    /// Page size
    pub size: u32,
    /// Zero-based page index
    pub number: u32,
}

impl<T> PageDto<T> {
    /// Re-project into a domain page, mapping every record
    ///
    /// # Errors
    ///
    /// Returns the first mapping error.
    pub fn try_into_page<U, F>(self, f: F) -> Result<Page<U>, ApiError>
    where
        F: FnMut(T) -> Result<U, ApiError>,
    {
        Page::new(
            self.content,
            self.total_elements,
            self.total_pages,
            self.size,
            self.number,
        )
        .try_map(f)
    }
}

/// Revenue of one weekday
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRevenueDto {
    /// Day label
    #[serde(alias = "label")]
    pub day: String,
    /// Revenue for the day
    #[serde(alias = "amount")]
    pub revenue: f64,
}

impl From<Vec<DailyRevenueDto>> for WeeklyRevenue {
    fn from(days: Vec<DailyRevenueDto>) -> Self {
        Self::new(
            days.into_iter()
                .map(|day| RevenuePoint {
                    label: day.day,
                    amount: day.revenue,
                })
                .collect(),
        )
    }
}

/// Subscription headline figures
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSummaryDto {
    /// All subscriptions
    pub total_subscriptions: u64,
    /// Active subscriptions
    pub active_subscriptions: u64,
    /// Lifetime revenue
    pub total_revenue: f64,
    /// Current month revenue
    #[serde(default)]
    pub monthly_revenue: f64,
}

impl From<SubscriptionSummaryDto> for SubscriptionSummary {
    fn from(dto: SubscriptionSummaryDto) -> Self {
        Self {
            total_subscriptions: dto.total_subscriptions,
            active_subscriptions: dto.active_subscriptions,
            total_revenue: dto.total_revenue,
            monthly_revenue: dto.monthly_revenue,
        }
    }
}

/// Subscription row
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDto {
    /// Subscription identifier
    pub id: String,
    /// Subscriber account
    pub user_id: String,
    /// Subscriber email
    #[serde(default)]
    pub user_email: String,
    /// Plan name
    pub plan: String,
    /// Status name
    pub status: String,
    /// Amount billed
    pub amount: f64,
    /// First day covered
    pub start_date: String,
    /// Last day covered
    #[serde(default)]
    pub end_date: Option<String>,
}

impl TryFrom<SubscriptionDto> for SubscriptionResponse {
    type Error = ApiError;

    fn try_from(dto: SubscriptionDto) -> Result<Self, Self::Error> {
        Ok(Self {
            id: dto.id,
            user_id: dto.user_id,
            user_email: dto.user_email,
            plan: dto.plan.parse::<Plan>()?,
            status: dto.status.parse::<SubscriptionStatus>()?,
            amount: dto.amount,
            start_date: parse_date(&dto.start_date)?,
            end_date: dto.end_date.as_deref().map(parse_date).transpose()?,
        })
    }
}

/// Class listing row
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDto {
    /// Class identifier
    pub id: String,
    /// Title
    pub title: String,
    /// Subject area
    #[serde(default)]
    pub subject: String,
    /// Teacher display name
    #[serde(default)]
    pub teacher_name: String,
    /// Price per session
    #[serde(default)]
    pub price: f64,
    /// Schedule description
    #[serde(default)]
    pub schedule: Option<String>,
    /// Enrolled students
    #[serde(default, alias = "enrolledCount")]
    pub enrolled: u32,
    /// Total seats
    #[serde(default)]
    pub capacity: u32,
}

impl From<ClassDto> for ClassSummary {
    fn from(dto: ClassDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
            subject: dto.subject,
            teacher_name: dto.teacher_name,
            price: dto.price,
            schedule: dto.schedule.filter(|schedule| !schedule.trim().is_empty()),
            enrolled: dto.enrolled,
            capacity: dto.capacity,
        }
    }
}

/// Parse an RFC 3339 timestamp or a zone-less `LocalDateTime`, read as UTC
fn missing_teacher_field(id: &str, field: &str) -> ApiError {
    ApiError::Mapping(format!("teacher `{id}` has no {field}"))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|naive| naive.and_utc())
        })
        .map_err(|_| ApiError::Mapping(format!("invalid timestamp `{raw}`")))
}

/// Parse a `YYYY-MM-DD` date, or the date part of a timestamp
fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| parse_timestamp(raw).map(|timestamp| timestamp.date_naive()))
        .map_err(|_| ApiError::Mapping(format!("invalid date `{raw}`")))
}
