//! # StudyDesk Core
//!
//! Core traits and types for StudyDesk state slices.
//!
//! Every piece of client state that mirrors a REST call is modelled the same
//! way: a reducer owns one or more [`AsyncState`] records, a command action
//! moves the record into its pending phase synchronously, and an
//! [`Effect::Future`](effect::Effect::Future) runs the service call and feeds a
//! settled action back into the reducer.
//!
//! ## Core Concepts
//!
//! - **State**: the records a slice owns (`AsyncState<T>` plus slice flags)
//! - **Action**: closed enum of commands, settled outcomes, and `ClearError`/`Reset`
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: description of the service call to run (not its execution)
//! - **Lifecycle**: `Pending | Fulfilled(T) | Rejected(String)`
//!
//! ## Example
//!
//! ```ignore
//! use studydesk_core::*;
//!
//! impl Reducer for AccountReducer {
//!     type State = AccountState;
//!     type Action = AccountAction;
//!     type Environment = ApiEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut AccountState,
//!         action: AccountAction,
//!         env: &ApiEnvironment,
//!     ) -> SmallVec<[Effect<AccountAction>; 4]> {
//!         match action {
//!             AccountAction::FetchUsers { query } => {
//!                 state.users.apply(Lifecycle::Pending);
//!                 let users = env.users.clone();
//!                 smallvec![async_operation(
//!                     async move { users.list(&query).await },
//!                     "Failed to fetch users",
//!                     AccountAction::UsersSettled,
//!                 )]
//!             }
//!             AccountAction::UsersSettled(phase) => {
//!                 state.users.apply(phase);
//!                 SmallVec::new()
//!             }
//!         }
//!     }
//! }
//! ```

// Re-export commonly used types
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Per-operation `{data, loading, error}` record
pub mod async_state;

/// Reducer composition utilities
pub mod composition;

/// Rejection normalization
pub mod error;

/// Declarative macros for building effects
pub mod effect_macros;

/// The three-phase async operation lifecycle
pub mod lifecycle;

pub use async_state::AsyncState;
pub use effect::Effect;
pub use reducer::Reducer;
pub use error::{Rejection, error_message};
pub use lifecycle::{Lifecycle, async_operation};

/// Reducer module - The core trait for slice logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all state transitions and are deterministic and testable.
pub mod reducer {
    use super::SmallVec;
    use super::effect::Effect;

    /// The Reducer trait - core abstraction for slice logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The slice state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Updates state in place
        /// 2. Returns effect descriptions to be executed
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// The effects to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and can be mapped into a parent action type.
pub mod effect {
    use futures::future::BoxFuture;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(BoxFuture<'static, Option<Action>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Whether this effect does nothing when executed
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) => effects.iter().all(Effect::is_none),
                Effect::Future(_) => false,
            }
        }
    }

    impl<Action: Send + 'static> Effect<Action> {
        /// Lift an effect into a parent action type
        ///
        /// Used when a slice reducer is scoped into the application reducer:
        /// whatever action the child effect feeds back is wrapped with `f`.
        #[must_use]
        pub fn map<B, F>(self, f: F) -> Effect<B>
        where
            F: Fn(Action) -> B + Clone + Send + 'static,
            B: Send + 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Parallel(effects) => Effect::Parallel(
                    effects.into_iter().map(|effect| effect.map(f.clone())).collect(),
                ),
                Effect::Future(fut) => Effect::Future(Box::pin(async move { fut.await.map(f) })),
            }
        }
    }
}
