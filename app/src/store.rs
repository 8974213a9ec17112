//! Application state: every slice composed under one store

use crate::account::{AccountAction, AccountReducer, AccountState};
use crate::auth::{AuthAction, AuthReducer, AuthState};
use crate::entity::{ClassesAction, ClassesSlice, ClassesState};
use crate::env::AppEnvironment;
use crate::subscription::{SubscriptionAction, SubscriptionReducer, SubscriptionState};
use studydesk_core::composition::{CombinedReducer, combine_reducers, scope_reducer};
use studydesk_core::{Effect, Reducer, SmallVec};
use studydesk_runtime::{Store, StoreConfig};

/// State of the whole client
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Who is signed in
    pub auth: AuthState,
    /// Account listing and detail
    pub account: AccountState,
    /// Subscription reporting
    pub subscription: SubscriptionState,
    /// Class discovery
    pub classes: ClassesState,
}

/// Actions of the whole client
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Addressed to the auth slice
    Auth(AuthAction),
    /// Addressed to the account slice
    Account(AccountAction),
    /// Addressed to the subscription slice
    Subscription(SubscriptionAction),
    /// Addressed to the class listing
    Classes(ClassesAction),
    /// Reset every slice; the transport token is left alone
    ResetAll,
}

fn auth_state(state: &mut AppState) -> &mut AuthState {
    &mut state.auth
}

fn account_state(state: &mut AppState) -> &mut AccountState {
    &mut state.account
}

fn subscription_state(state: &mut AppState) -> &mut SubscriptionState {
    &mut state.subscription
}

fn classes_state(state: &mut AppState) -> &mut ClassesState {
    &mut state.classes
}

fn auth_action(action: AppAction) -> Option<AuthAction> {
    match action {
        AppAction::Auth(action) => Some(action),
        AppAction::ResetAll => Some(AuthAction::Reset),
        AppAction::Account(_) | AppAction::Subscription(_) | AppAction::Classes(_) => None,
    }
}

fn account_action(action: AppAction) -> Option<AccountAction> {
    match action {
        AppAction::Account(action) => Some(action),
        AppAction::ResetAll => Some(AccountAction::Reset),
        AppAction::Auth(_) | AppAction::Subscription(_) | AppAction::Classes(_) => None,
    }
}

fn subscription_action(action: AppAction) -> Option<SubscriptionAction> {
    match action {
        AppAction::Subscription(action) => Some(action),
        AppAction::ResetAll => Some(SubscriptionAction::Reset),
        AppAction::Auth(_) | AppAction::Account(_) | AppAction::Classes(_) => None,
    }
}

fn classes_action(action: AppAction) -> Option<ClassesAction> {
    match action {
        AppAction::Classes(action) => Some(action),
        AppAction::ResetAll => Some(ClassesAction::Reset),
        AppAction::Auth(_) | AppAction::Account(_) | AppAction::Subscription(_) => None,
    }
}

/// Routes each [`AppAction`] to the slice it addresses
///
/// Effects of a slice come back wrapped in that slice's [`AppAction`]
/// variant, so settled actions find their way home.
pub struct AppReducer {
    slices: CombinedReducer<AppState, AppAction, AppEnvironment>,
}

impl AppReducer {
    /// Compose the four slices
    #[must_use]
    pub fn new() -> Self {
        Self {
            slices: combine_reducers(vec![
                Box::new(scope_reducer(AuthReducer, auth_state, auth_action, AppAction::Auth)),
                Box::new(scope_reducer(
                    AccountReducer,
                    account_state,
                    account_action,
                    AppAction::Account,
                )),
                Box::new(scope_reducer(
                    SubscriptionReducer,
                    subscription_state,
                    subscription_action,
                    AppAction::Subscription,
                )),
                Box::new(scope_reducer(
                    ClassesSlice::new(),
                    classes_state,
                    classes_action,
                    AppAction::Classes,
                )),
            ]),
        }
    }
}

impl Default for AppReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        if matches!(action, AppAction::ResetAll) {
            tracing::info!("Resetting all slices");
        }
        self.slices.reduce(state, action, env)
    }
}

/// The store that runs the client
pub type AppStore = Store<AppState, AppAction, AppEnvironment, AppReducer>;

/// Build a store at rest over `env`
#[must_use]
pub fn app_store(env: AppEnvironment, config: StoreConfig) -> AppStore {
    Store::with_config(AppState::default(), AppReducer::new(), env, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;
    use studydesk_api::{ClassQuery, UserQuery};
    use studydesk_core::Lifecycle;
    use studydesk_testing::{MockTransport, ReducerTest, assertions};

    fn env() -> AppEnvironment {
        AppEnvironment::new(Arc::new(MockTransport::new()))
    }

    #[test]
    fn slice_action_touches_only_its_slice() {
        ReducerTest::new(AppReducer::new())
            .with_env(env())
            .given_state(AppState::default())
            .when_action(AppAction::Account(AccountAction::FetchUsers {
                query: UserQuery::default(),
            }))
            .then_state(|state| {
                assertions::assert_pending(&state.account.users);
                assert_eq!(state.auth, AuthState::default());
                assert_eq!(state.subscription, SubscriptionState::default());
                assert_eq!(state.classes, ClassesState::default());
            })
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .run();
    }

    #[tokio::test]
    async fn effects_come_back_wrapped() {
        let mut state = AppState::default();
        let environment = env();
        let effects = AppReducer::new().reduce(
            &mut state,
            AppAction::Classes(ClassesAction::Fetch(ClassQuery::default())),
            &environment,
        );

        let settled = studydesk_testing::helpers::settle(effects.into_vec()).await;
        assert!(matches!(
            settled.as_slice(),
            [AppAction::Classes(ClassesAction::Settled(Lifecycle::Rejected(_)))]
        ));
    }

    #[test]
    fn reset_all_returns_every_slice_to_rest() {
        let mut given = AppState::default();
        given.auth.is_authenticated = true;
        given.account.users.apply(Lifecycle::Pending);
        given.subscription.summary.apply(Lifecycle::Rejected("x".to_string()));
        given.classes.items.apply(Lifecycle::Pending);

        ReducerTest::new(AppReducer::new())
            .with_env(env())
            .given_state(given)
            .when_action(AppAction::ResetAll)
            .then_state(|state| assert_eq!(*state, AppState::default()))
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    fn settled_action() -> impl Strategy<Value = AppAction> {
        let message = "[A-Za-z ]{1,12}";
        prop_oneof![
            message.prop_map(|m| {
                AppAction::Auth(AuthAction::UserSettled {
                    generation: 0,
                    phase: Lifecycle::Rejected(m),
                })
            }),
            message.prop_map(|m| {
                AppAction::Account(AccountAction::UsersSettled(Lifecycle::Rejected(m)))
            }),
            message.prop_map(|m| {
                AppAction::Account(AccountAction::UserSettled(Lifecycle::Rejected(m)))
            }),
            message.prop_map(|m| {
                AppAction::Subscription(SubscriptionAction::SummarySettled(Lifecycle::Rejected(m)))
            }),
            message.prop_map(|m| {
                AppAction::Classes(ClassesAction::Settled(Lifecycle::Rejected(m)))
            }),
            Just(AppAction::Subscription(SubscriptionAction::WeeklyRevenueSettled(
                Lifecycle::Pending
            ))),
        ]
    }

    proptest! {
        #[test]
        fn reset_all_after_any_history_is_rest(
            actions in proptest::collection::vec(settled_action(), 0..24),
        ) {
            let reducer = AppReducer::new();
            let environment = env();
            let mut state = AppState::default();
            for action in actions {
                let effects = reducer.reduce(&mut state, action, &environment);
                prop_assert!(effects.is_empty());
            }

            let _ = reducer.reduce(&mut state, AppAction::ResetAll, &environment);

            prop_assert_eq!(state, AppState::default());
        }

        #[test]
        fn account_failure_never_leaks_into_other_slices(message in "[A-Za-z ]{1,12}") {
            let reducer = AppReducer::new();
            let environment = env();
            let mut state = AppState::default();

            let failure = AccountAction::UsersSettled(Lifecycle::Rejected(message.clone()));
            let _ = reducer.reduce(&mut state, AppAction::Account(failure), &environment);

            prop_assert_eq!(state.account.users.error(), Some(message.as_str()));
            prop_assert!(state.account.selected.is_at_rest());
            prop_assert_eq!(&state.auth, &AuthState::default());
            prop_assert_eq!(&state.subscription, &SubscriptionState::default());
            prop_assert_eq!(&state.classes, &ClassesState::default());
        }
    }
}
