//! Generic single-operation paginated slice
//!
//! Most listing screens need the same thing: one fetch keyed by a query,
//! returning a [`Page`] of records. An [`EntitySource`] names the record and
//! query types, the fallback message, and how to fetch; [`EntityReducer`]
//! supplies the lifecycle.
//!
//! # Example
//!
//! ```
//! use studydesk_app::entity::{Classes, EntityAction, EntityState};
//! use studydesk_api::ClassQuery;
//!
//! let action: EntityAction<Classes> = EntityAction::Fetch(ClassQuery::default());
//! let state = EntityState::<Classes>::default();
//! assert!(state.items.is_at_rest());
//! # let _ = action;
//! ```

use crate::env::AppEnvironment;
use futures::future::BoxFuture;
use std::fmt::Debug;
use std::marker::PhantomData;
use studydesk_api::{ApiError, ClassQuery, ClassSummary, Page};
use studydesk_core::{AsyncState, Effect, Lifecycle, Reducer, SmallVec, async_operation, smallvec};

/// Describes one paginated backend collection
///
/// Implementors are zero-sized markers.
pub trait EntitySource:
    Clone + Debug + Default + PartialEq + Send + Sync + 'static
{
    /// One row of the collection
    type Record: Clone + Debug + PartialEq + Send + Sync + 'static;
    /// Page and filters of one fetch
    type Query: Clone + Debug + PartialEq + Send + Sync + 'static;

    /// Rejection message when the backend gives none
    const FALLBACK: &'static str;

    /// Start fetching one page
    fn fetch(
        env: &AppEnvironment,
        query: Self::Query,
    ) -> BoxFuture<'static, Result<Page<Self::Record>, ApiError>>;
}

/// State of an entity slice
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState<S: EntitySource> {
    /// Current page
    pub items: AsyncState<Page<S::Record>>,
    /// Query of the most recent fetch
    pub last_query: Option<S::Query>,
}

impl<S: EntitySource> Default for EntityState<S> {
    fn default() -> Self {
        Self {
            items: AsyncState::new(),
            last_query: None,
        }
    }
}

/// Actions of an entity slice
#[derive(Debug, Clone, PartialEq)]
pub enum EntityAction<S: EntitySource> {
    /// Load one page
    Fetch(S::Query),
    /// The page settled
    Settled(Lifecycle<Page<S::Record>>),
    /// Drop the error message
    ClearError,
    /// Return to rest
    Reset,
}

/// Reducer of an entity slice
#[derive(Debug, Clone, Copy)]
pub struct EntityReducer<S>(PhantomData<fn() -> S>);

impl<S> EntityReducer<S> {
    /// Create the reducer
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<S> Default for EntityReducer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EntitySource> Reducer for EntityReducer<S> {
    type State = EntityState<S>;
    type Action = EntityAction<S>;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            EntityAction::Fetch(query) => {
                state.items.apply(Lifecycle::Pending);
                state.last_query = Some(query.clone());
                smallvec![async_operation(
                    S::fetch(env, query),
                    S::FALLBACK,
                    EntityAction::Settled,
                )]
            },
            EntityAction::Settled(phase) => {
                state.items.apply(phase);
                SmallVec::new()
            },
            EntityAction::ClearError => {
                state.items.clear_error();
                SmallVec::new()
            },
            EntityAction::Reset => {
                *state = EntityState::default();
                SmallVec::new()
            },
        }
    }
}

/// Class discovery listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classes;

impl EntitySource for Classes {
    type Record = ClassSummary;
    type Query = ClassQuery;

    const FALLBACK: &'static str = "Failed to fetch classes";

    fn fetch(
        env: &AppEnvironment,
        query: ClassQuery,
    ) -> BoxFuture<'static, Result<Page<ClassSummary>, ApiError>> {
        let classes = env.services.classes.clone();
        Box::pin(async move { classes.list(&query).await })
    }
}

/// Reducer of the class listing
pub type ClassesSlice = EntityReducer<Classes>;
/// State of the class listing
pub type ClassesState = EntityState<Classes>;
/// Actions of the class listing
pub type ClassesAction = EntityAction<Classes>;
