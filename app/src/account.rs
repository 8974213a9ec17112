//! Account slice: the user listing and a single user's detail

use crate::env::AppEnvironment;
use studydesk_api::{Page, User, UserQuery};
use studydesk_core::{AsyncState, Effect, Lifecycle, Reducer, SmallVec, async_operation, smallvec};

/// Fallback of [`AccountAction::FetchUsers`]
pub const FETCH_USERS_FAILED: &str = "Failed to fetch users";
/// Fallback of [`AccountAction::FetchUser`]
pub const FETCH_USER_FAILED: &str = "Failed to fetch user";

/// Operations of the account slice, for [`AccountAction::ClearError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountOperation {
    /// The paginated listing
    Users,
    /// The single-user detail
    User,
}

/// Account listing state; the two operations are independent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountState {
    /// Current page of the listing
    pub users: AsyncState<Page<User>>,
    /// The user opened in the detail view
    pub selected: AsyncState<User>,
}

/// Actions of the account slice
#[derive(Debug, Clone, PartialEq)]
pub enum AccountAction {
    /// Load one page of accounts
    FetchUsers {
        /// Page and filters
        query: UserQuery,
    },
    /// The listing settled
    UsersSettled(Lifecycle<Page<User>>),
    /// Load one account
    FetchUser {
        /// Account identifier
        id: String,
    },
    /// The detail settled
    UserSettled(Lifecycle<User>),
    /// Drop the error of one operation
    ClearError(AccountOperation),
    /// Return both operations to rest
    Reset,
}

/// Reducer of the account slice
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountReducer;

impl Reducer for AccountReducer {
    type State = AccountState;
    type Action = AccountAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AccountAction::FetchUsers { query } => {
                state.users.apply(Lifecycle::Pending);
                let users = env.services.users.clone();
                smallvec![async_operation(
                    async move { users.list(&query).await },
                    FETCH_USERS_FAILED,
                    AccountAction::UsersSettled,
                )]
            },
            AccountAction::UsersSettled(phase) => {
                state.users.apply(phase);
                SmallVec::new()
            },
            AccountAction::FetchUser { id } => {
                state.selected.apply(Lifecycle::Pending);
                let users = env.services.users.clone();
                smallvec![async_operation(
                    async move { users.get(&id).await },
                    FETCH_USER_FAILED,
                    AccountAction::UserSettled,
                )]
            },
            AccountAction::UserSettled(phase) => {
                state.selected.apply(phase);
                SmallVec::new()
            },
            AccountAction::ClearError(AccountOperation::Users) => {
                state.users.clear_error();
                SmallVec::new()
            },
            AccountAction::ClearError(AccountOperation::User) => {
                state.selected.clear_error();
                SmallVec::new()
            },
            AccountAction::Reset => {
                *state = AccountState::default();
                SmallVec::new()
            },
        }
    }
}
