use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;

use crate::calendar::{CalendarEvent, CalendarEventList};
use crate::storage::config::Config;
use crate::sync::auth::{AuthError, Token, TokenSource};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Authorization failed: {0}")]
    Auth(AuthError),
    #[error("Events API returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Unexpected response shape: {0}")]
    Protocol(String),
    #[error("HTTP request failed: {0}")]
    Transport(String),
}

/// Network failures reach callers as `Transport` whichever endpoint they hit.
impl From<AuthError> for ClientError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Transport(message) => ClientError::Transport(message),
            other => ClientError::Auth(other),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventsApi: Send + Sync {
    async fn list(&self) -> Result<CalendarEventList, ClientError>;

    async fn create(&self, event: &CalendarEvent) -> Result<CalendarEvent, ClientError>;
}

/// Authorized access to the `{api_root}/api/Events` endpoint.
///
/// A 401 is answered with one token refresh and one retry; nothing else is
/// retried.
pub struct EventApiClient {
    events_url: String,
    tokens: Arc<dyn TokenSource>,
    client: reqwest::Client,
}

impl EventApiClient {
    pub fn new(api_root: &str, tokens: Arc<dyn TokenSource>, client: reqwest::Client) -> Self {
        Self {
            events_url: format!("{}/api/Events", api_root.trim_end_matches('/')),
            tokens,
            client,
        }
    }

    pub fn from_config(config: &Config, tokens: Arc<dyn TokenSource>, client: reqwest::Client) -> Self {
        Self::new(&config.api.api_root(), tokens, client)
    }

    /// Shared HTTP client carrying the configured request timeout.
    pub fn http_client(config: &Config) -> Result<reqwest::Client, ClientError> {
        reqwest::Client::builder()
            .timeout(config.api.timeout())
            .build()
            .map_err(ClientError::from)
    }

    async fn send_authorized<F>(&self, build: F) -> Result<Response, ClientError>
    where
        F: Fn(&Token) -> RequestBuilder + Send + Sync,
    {
        let token = self.tokens.get_token().await?;
        let response = build(&token).send().await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::warn!("Events request unauthorized, refreshing token and retrying once");
        self.tokens.invalidate(&token).await;
        let token = self.tokens.get_token().await?;
        let response = build(&token).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!("Could not read body of repeated 401: {}", e);
                    String::new()
                }
            };
            tracing::error!("Events request unauthorized after token refresh");
            return Err(AuthError::Unauthorized { body }.into());
        }

        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!("Events request failed. Status: {}, Body: {}", status, body);
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Protocol(e.to_string()))
    }
}

#[async_trait]
impl EventsApi for EventApiClient {
    async fn list(&self) -> Result<CalendarEventList, ClientError> {
        tracing::info!("Fetching events from {}", self.events_url);

        let response = self
            .send_authorized(|token| {
                self.client
                    .get(&self.events_url)
                    .bearer_auth(&token.access_token)
                    .header(reqwest::header::ACCEPT, "application/json")
            })
            .await?;
        tracing::info!("Fetch events response status: {}", response.status());

        let list: CalendarEventList = Self::read_json(response).await?;
        tracing::info!("Fetched {} of {} events", list.items.len(), list.total);
        Ok(list)
    }

    async fn create(&self, event: &CalendarEvent) -> Result<CalendarEvent, ClientError> {
        tracing::info!("Creating event {}: {}", event.id, event.title);

        let response = self
            .send_authorized(|token| {
                self.client
                    .post(&self.events_url)
                    .bearer_auth(&token.access_token)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .json(event)
            })
            .await?;
        tracing::info!("Create event response status: {}", response.status());

        let confirmed: CalendarEvent = Self::read_json(response).await?;
        tracing::info!("Event confirmed with ID: {}", confirmed.id);
        Ok(confirmed)
    }
}
