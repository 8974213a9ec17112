//! The three-phase async operation lifecycle.
//!
//! A slice reducer drives one operation like this:
//!
//! 1. On the command action it applies [`Lifecycle::Pending`] to the owning
//!    [`AsyncState`](crate::AsyncState) before returning, so the pending phase
//!    is visible before the producer can settle.
//! 2. It returns [`async_operation`], which awaits the producer and yields a
//!    settled action carrying [`Lifecycle::Fulfilled`] or
//!    [`Lifecycle::Rejected`].
//! 3. On the settled action it applies the carried phase.
//!
//! There is no retry, timeout, or de-duplication. Two overlapping dispatches
//! of the same operation both run and the one that settles last wins.

use crate::effect::Effect;
use crate::error::{Rejection, error_message};
use std::future::Future;

/// One phase transition of an async operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lifecycle<T> {
    /// The operation was dispatched and has not settled
    Pending,
    /// The producer resolved with a payload
    Fulfilled(T),
    /// The producer rejected; carries the normalized message
    Rejected(String),
}

impl<T> Lifecycle<T> {
    /// Settle a producer result, normalizing the rejection
    pub fn settle<E>(result: Result<T, E>, fallback: &str) -> Self
    where
        E: Rejection,
    {
        match result {
            Ok(payload) => Self::Fulfilled(payload),
            Err(rejection) => Self::Rejected(error_message(&rejection, fallback)),
        }
    }

    /// Transform the fulfilled payload
    pub fn map<U, F>(self, f: F) -> Lifecycle<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Pending => Lifecycle::Pending,
            Self::Fulfilled(payload) => Lifecycle::Fulfilled(f(payload)),
            Self::Rejected(message) => Lifecycle::Rejected(message),
        }
    }

    /// Whether this phase ends the operation
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Wrap a producer into an effect that feeds back its settled phase
///
/// `on_settled` embeds the phase into the slice's settled action. The
/// effect always produces exactly one action.
pub fn async_operation<T, E, A, Fut, F>(
    producer: Fut,
    fallback: &'static str,
    on_settled: F,
) -> Effect<A>
where
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Rejection + Send + 'static,
    A: 'static,
    F: FnOnce(Lifecycle<T>) -> A + Send + 'static,
{
    Effect::Future(Box::pin(async move {
        let phase = Lifecycle::settle(producer.await, fallback);
        Some(on_settled(phase))
    }))
}
