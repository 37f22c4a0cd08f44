pub mod auth;
pub mod events_api;

pub use auth::{AuthError, AuthTokenProvider, Token, TokenSource};
pub use events_api::{ClientError, EventApiClient, EventsApi};

use std::sync::Arc;

use crate::storage::config::{Config, Credential};

/// Wires the token provider and the events client onto one HTTP client.
pub fn connect(config: &Config, credential: Credential) -> Result<Arc<dyn EventsApi>, ClientError> {
    let client = EventApiClient::http_client(config)?;
    let tokens = AuthTokenProvider::from_config(config, credential, client.clone());
    tracing::debug!("Events API root: {}", config.api.api_root());

    Ok(Arc::new(EventApiClient::from_config(config, Arc::new(tokens), client)))
}
