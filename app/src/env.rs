//! Injected dependencies of every slice

use std::sync::Arc;
use studydesk_api::{HttpTransport, Services, Transport};
use url::Url;

/// Environment shared by all slice reducers
///
/// Holds the services, which all share one transport and therefore one
/// bearer token. Reducers clone the service they need into their effects.
#[derive(Clone)]
pub struct AppEnvironment {
    /// Backend services
    pub services: Services,
}

impl AppEnvironment {
    /// Build the environment over any transport
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            services: Services::new(transport),
        }
    }

    /// Build the environment over the `reqwest` transport
    #[must_use]
    pub fn http(base_url: Url) -> Self {
        Self::new(Arc::new(HttpTransport::new(base_url)))
    }
}
