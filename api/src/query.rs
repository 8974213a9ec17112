//! Pagination and filter query strings
//!
//! Keys are always emitted in the order `page`, `size`, `role`, `search`,
//! `plan`, `status`. Optional filters are dropped when absent or blank.

use crate::domain::{Plan, Role, SubscriptionStatus};
use url::form_urlencoded;

/// Default page requested when the caller does not pick one
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size
pub const DEFAULT_SIZE: u32 = 10;

/// A listing query that renders into URL parameters
pub trait ToQuery {
    /// Key/value pairs in emission order, blanks already removed
    fn query_pairs(&self) -> Vec<(&'static str, String)>;

    /// Form-URL-encoded `key=value&…` string
    ///
    /// ```
    /// use studydesk_api::{Role, ToQuery, UserQuery};
    ///
    /// let query = UserQuery::new(2, 10).with_role(Role::Student);
    /// assert_eq!(query.to_query_string(), "page=2&size=10&role=STUDENT");
    /// ```
    fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.query_pairs() {
            serializer.append_pair(key, &value);
        }
        serializer.finish()
    }
}

/// Collects pairs in insertion order, skipping blank optionals
struct Pairs(Vec<(&'static str, String)>);

impl Pairs {
    fn paged(page: u32, size: u32) -> Self {
        Self(vec![("page", page.to_string()), ("size", size.to_string())])
    }

    fn optional(mut self, key: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) {
            self.0.push((key, value.to_string()));
        }
        self
    }
}

/// Query of `GET /users`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserQuery {
    /// Page number as the caller counts it, forwarded as-is
    pub page: u32,
    /// Page size
    pub size: u32,
    /// Restrict to one role
    pub role: Option<Role>,
    /// Free-text search
    pub search: Option<String>,
}

impl UserQuery {
    /// Unfiltered query for one page
    #[must_use]
    pub const fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            role: None,
            search: None,
        }
    }

    /// Restrict to one role
    #[must_use]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Add a free-text search
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

impl Default for UserQuery {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_SIZE)
    }
}

impl ToQuery for UserQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        Pairs::paged(self.page, self.size)
            .optional("role", self.role.map(Role::as_str))
            .optional("search", self.search.as_deref())
            .0
    }
}

/// Query of `GET /subscriptions`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriptionQuery {
    /// Page number as the caller counts it
    pub page: u32,
    /// Page size
    pub size: u32,
    /// Restrict to one plan
    pub plan: Option<Plan>,
    /// Restrict to one status
    pub status: Option<SubscriptionStatus>,
    /// Free-text search
    pub search: Option<String>,
}

impl SubscriptionQuery {
    /// Unfiltered query for one page
    #[must_use]
    pub const fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            plan: None,
            status: None,
            search: None,
        }
    }

    /// Restrict to one plan
    #[must_use]
    pub const fn with_plan(mut self, plan: Plan) -> Self {
        self.plan = Some(plan);
        self
    }

    /// Restrict to one status
    #[must_use]
    pub const fn with_status(mut self, status: SubscriptionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Add a free-text search
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

impl Default for SubscriptionQuery {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_SIZE)
    }
}

impl ToQuery for SubscriptionQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        Pairs::paged(self.page, self.size)
            .optional("search", self.search.as_deref())
            .optional("plan", self.plan.map(Plan::as_str))
            .optional("status", self.status.map(SubscriptionStatus::as_str))
            .0
    }
}

/// Query of `GET /classes`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassQuery {
    /// Page number as the caller counts it
    pub page: u32,
    /// Page size
    pub size: u32,
    /// Free-text search over title and subject
    pub search: Option<String>,
}

impl ClassQuery {
    /// Unfiltered query for one page
    #[must_use]
    pub const fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            search: None,
        }
    }

    /// Add a free-text search
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

impl Default for ClassQuery {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_SIZE)
    }
}

impl ToQuery for ClassQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        Pairs::paged(self.page, self.size)
            .optional("search", self.search.as_deref())
            .0
    }
}
