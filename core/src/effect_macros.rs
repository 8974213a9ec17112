//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when a reducer hands a service call to
//! the runtime.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use studydesk_core::async_effect;
///
/// async_effect! {
///     if let Err(error) = auth.logout(&token).await {
///         tracing::warn!(%error, "Server logout failed");
///     }
///     None
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create the settling effect of an async operation
///
/// Expands to [`async_operation`](crate::lifecycle::async_operation); the
/// keyword form keeps the fallback literal next to the call it belongs to.
///
/// # Example
///
/// ```rust,ignore
/// use studydesk_core::fetch;
///
/// fetch! {
///     call: async move { users.list(&query).await },
///     fallback: "Failed to fetch users",
///     on_settled: AccountAction::UsersSettled
/// }
/// ```
#[macro_export]
macro_rules! fetch {
    (
        call: $call:expr,
        fallback: $fallback:expr,
        on_settled: $on_settled:expr
    ) => {
        $crate::lifecycle::async_operation($call, $fallback, $on_settled)
    };
}
