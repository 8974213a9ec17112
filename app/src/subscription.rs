//! Subscription slice for the admin dashboard
//!
//! Three independent operations: weekly revenue, the headline summary, and
//! the paginated subscription listing. Each owns its own [`AsyncState`], so
//! a failure in one never touches the others.

use crate::env::AppEnvironment;
use studydesk_api::{
    Page, SubscriptionQuery, SubscriptionResponse, SubscriptionSummary, WeeklyRevenue,
};
use studydesk_core::{AsyncState, Effect, Lifecycle, Reducer, SmallVec, async_operation, smallvec};

/// Fallback of [`SubscriptionAction::FetchWeeklyRevenue`]
pub const FETCH_WEEKLY_REVENUE_FAILED: &str = "Failed to fetch weekly revenue";
/// Fallback of [`SubscriptionAction::FetchSummary`]
pub const FETCH_SUMMARY_FAILED: &str = "Failed to fetch subscription summary";
/// Fallback of [`SubscriptionAction::FetchSubscriptions`]
pub const FETCH_SUBSCRIPTIONS_FAILED: &str = "Failed to fetch subscriptions";

/// Operations of the subscription slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionOperation {
    /// Revenue of the current week
    WeeklyRevenue,
    /// Headline figures
    Summary,
    /// Paginated listing
    Subscriptions,
}

/// Subscription reporting state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscriptionState {
    /// Revenue of the current week
    pub weekly_revenue: AsyncState<WeeklyRevenue>,
    /// Headline figures
    pub summary: AsyncState<SubscriptionSummary>,
    /// Current page of the listing
    pub subscriptions: AsyncState<Page<SubscriptionResponse>>,
}

impl SubscriptionState {
    /// Whether any of the three operations is in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.weekly_revenue.is_loading()
            || self.summary.is_loading()
            || self.subscriptions.is_loading()
    }
}

/// Actions of the subscription slice
#[derive(Debug, Clone, PartialEq)]
pub enum SubscriptionAction {
    /// Load the weekly revenue
    FetchWeeklyRevenue,
    /// Weekly revenue settled
    WeeklyRevenueSettled(Lifecycle<WeeklyRevenue>),
    /// Load the summary
    FetchSummary,
    /// Summary settled
    SummarySettled(Lifecycle<SubscriptionSummary>),
    /// Load one page of subscriptions
    FetchSubscriptions {
        /// Page and filters
        query: SubscriptionQuery,
    },
    /// Listing settled
    SubscriptionsSettled(Lifecycle<Page<SubscriptionResponse>>),
    /// Drop the error of one operation
    ClearError(SubscriptionOperation),
    /// Return all three operations to rest
    Reset,
}

/// Reducer of the subscription slice
#[derive(Debug, Clone, Copy, Default)]
pub struct SubscriptionReducer;

impl Reducer for SubscriptionReducer {
    type State = SubscriptionState;
    type Action = SubscriptionAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let service = || env.services.subscriptions.clone();

        match action {
            SubscriptionAction::FetchWeeklyRevenue => {
                state.weekly_revenue.apply(Lifecycle::Pending);
                let subscriptions = service();
                smallvec![async_operation(
                    async move { subscriptions.weekly_revenue().await },
                    FETCH_WEEKLY_REVENUE_FAILED,
                    SubscriptionAction::WeeklyRevenueSettled,
                )]
            },
            SubscriptionAction::WeeklyRevenueSettled(phase) => {
                state.weekly_revenue.apply(phase);
                SmallVec::new()
            },

            SubscriptionAction::FetchSummary => {
                state.summary.apply(Lifecycle::Pending);
                let subscriptions = service();
                smallvec![async_operation(
                    async move { subscriptions.summary().await },
                    FETCH_SUMMARY_FAILED,
                    SubscriptionAction::SummarySettled,
                )]
            },
            SubscriptionAction::SummarySettled(phase) => {
                state.summary.apply(phase);
                SmallVec::new()
            },

            SubscriptionAction::FetchSubscriptions { query } => {
                state.subscriptions.apply(Lifecycle::Pending);
                let subscriptions = service();
                smallvec![async_operation(
                    async move { subscriptions.list(&query).await },
                    FETCH_SUBSCRIPTIONS_FAILED,
                    SubscriptionAction::SubscriptionsSettled,
                )]
            },
            SubscriptionAction::SubscriptionsSettled(phase) => {
                state.subscriptions.apply(phase);
                SmallVec::new()
            },

            SubscriptionAction::ClearError(operation) => {
                match operation {
                    SubscriptionOperation::WeeklyRevenue => state.weekly_revenue.clear_error(),
                    SubscriptionOperation::Summary => state.summary.clear_error(),
                    SubscriptionOperation::Subscriptions => state.subscriptions.clear_error(),
                }
                SmallVec::new()
            },

            SubscriptionAction::Reset => {
                *state = SubscriptionState::default();
                SmallVec::new()
            },
        }
    }
}
