//! The `{data, loading, error}` record that tracks one fetch operation.
//!
//! An [`AsyncState`] is created at rest, moves through the phases of its
//! owning operation via [`AsyncState::apply`], and can be returned to rest
//! with [`AsyncState::reset`]. Fields are read-only from the outside; the only
//! mutators are the phase transition, [`AsyncState::clear_error`], and
//! [`AsyncState::reset`].

use crate::lifecycle::Lifecycle;
use serde::{Deserialize, Serialize};

/// Lifecycle record of a single asynchronous operation
///
/// | phase | `loading` | `data` | `error` |
/// |---|---|---|---|
/// | rest | `false` | `None` | `None` |
/// | pending | `true` | previous | `None` |
/// | fulfilled | `false` | `Some(payload)` | `None` |
/// | rejected | `false` | previous | `Some(message)` |
///
/// Data from an earlier success survives both a later pending phase and a
/// later rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsyncState<T> {
    data: Option<T>,
    loading: bool,
    error: Option<String>,
}

impl<T> AsyncState<T> {
    /// The rest state: no data, not loading, no error
    #[must_use]
    pub const fn new() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }

    /// Apply one phase transition of the owning operation
    pub fn apply(&mut self, phase: Lifecycle<T>) {
        match phase {
            Lifecycle::Pending => {
                self.loading = true;
                self.error = None;
            },
            Lifecycle::Fulfilled(payload) => {
                self.loading = false;
                self.data = Some(payload);
                self.error = None;
            },
            Lifecycle::Rejected(message) => {
                self.loading = false;
                self.error = Some(message);
            },
        }
    }

    /// Drop the error message, leaving `data` and `loading` as they are
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Return to the rest state
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Payload of the most recent success, if any
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Whether the operation is between dispatch and settlement
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the most recent failure, if not cleared since
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether every field is at its initial value
    #[must_use]
    pub const fn is_at_rest(&self) -> bool {
        self.data.is_none() && !self.loading && self.error.is_none()
    }
}

impl<T> Default for AsyncState<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn starts_at_rest() {
        let state: AsyncState<u32> = AsyncState::default();
        assert!(state.is_at_rest());
        assert_eq!(state.data(), None);
        assert!(!state.is_loading());
        assert_eq!(state.error(), None);
    }

    #[test]
    fn pending_clears_previous_error() {
        let mut state = AsyncState::<u32>::new();
        state.apply(Lifecycle::Rejected("boom".to_string()));

        state.apply(Lifecycle::Pending);

        assert!(state.is_loading());
        assert_eq!(state.error(), None);
    }

    #[test]
    fn fulfilled_stores_payload() {
        let mut state = AsyncState::new();
        state.apply(Lifecycle::Pending);
        state.apply(Lifecycle::Fulfilled(42));

        assert!(!state.is_loading());
        assert_eq!(state.data(), Some(&42));
        assert_eq!(state.error(), None);
    }

    #[test]
    fn rejection_keeps_stale_data() {
        let mut state = AsyncState::new();
        state.apply(Lifecycle::Fulfilled(1));
        state.apply(Lifecycle::Pending);
        assert_eq!(state.data(), Some(&1));

        state.apply(Lifecycle::Rejected("Failed to fetch".to_string()));

        assert!(!state.is_loading());
        assert_eq!(state.data(), Some(&1));
        assert_eq!(state.error(), Some("Failed to fetch"));
    }

    #[test]
    fn clear_error_touches_only_error() {
        let mut state = AsyncState::new();
        state.apply(Lifecycle::Fulfilled("cached"));
        state.apply(Lifecycle::Pending);
        state.apply(Lifecycle::Rejected("nope".to_string()));
        state.apply(Lifecycle::Pending);
        state.apply(Lifecycle::Rejected("again".to_string()));

        state.clear_error();

        assert_eq!(state.error(), None);
        assert_eq!(state.data(), Some(&"cached"));
        assert!(!state.is_loading());
    }

    fn phase() -> impl Strategy<Value = Lifecycle<u8>> {
        prop_oneof![
            Just(Lifecycle::Pending),
            any::<u8>().prop_map(Lifecycle::Fulfilled),
            "[a-z]{1,8}".prop_map(Lifecycle::Rejected),
        ]
    }

    proptest! {
        #[test]
        fn reset_always_returns_to_rest(phases in proptest::collection::vec(phase(), 0..16)) {
            let mut state = AsyncState::new();
            for phase in phases {
                state.apply(phase);
            }

            state.reset();

            prop_assert!(state.is_at_rest());
        }

        #[test]
        fn settled_state_is_never_loading(phases in proptest::collection::vec(phase(), 1..16)) {
            let mut state = AsyncState::new();
            for phase in phases {
                state.apply(phase);
            }

            state.apply(Lifecycle::Fulfilled(0));
            prop_assert!(!state.is_loading());
            prop_assert_eq!(state.error(), None);
        }
    }
}
