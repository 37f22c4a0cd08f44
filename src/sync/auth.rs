use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::storage::config::{Config, Credential};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthError {
    #[error("Auth endpoint rejected credentials (status {status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("Malformed auth response: {0}")]
    MalformedResponse(String),
    #[error("Auth request failed: {0}")]
    Transport(String),
    #[error("Events endpoint rejected a freshly issued token: {body}")]
    Unauthorized { body: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Token {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

/// Source of bearer tokens for authorized calls.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn get_token(&self) -> Result<Token, AuthError>;

    /// Forget `rejected` so the next `get_token` performs a fresh exchange.
    async fn invalidate(&self, rejected: &Token);
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    access_token: Option<String>,
    #[serde(default, alias = "expiresIn")]
    expires_in: Option<Value>,
}

/// Seconds from a numeric or numeric-string `expires_in`. Fractions are dropped.
fn expires_in_secs(value: &Value) -> Option<u64> {
    let secs = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    secs.is_finite().then(|| secs.max(0.0) as u64)
}

type InFlight = Shared<BoxFuture<'static, Result<Token, AuthError>>>;

#[derive(Default)]
struct TokenState {
    cached: Option<Token>,
    in_flight: Option<InFlight>,
}

#[derive(Clone)]
struct Exchange {
    client: reqwest::Client,
    auth_url: String,
    credential: Credential,
    default_lifetime: Duration,
    refresh_margin: Duration,
}

impl Exchange {
    async fn run(self) -> Result<Token, AuthError> {
        tracing::info!("Requesting access token from {}", self.auth_url);

        let body = AuthRequest {
            client_id: &self.credential.client_id,
            client_secret: &self.credential.client_secret,
        };

        let response = self.client
            .post(&self.auth_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        tracing::info!("Auth response status: {}", status);

        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::error!("Token exchange failed. Status: {}", status);
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: AuthResponse = serde_json::from_str(&text)
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

        let access_token = parsed
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::MalformedResponse("missing access_token".to_string()))?;

        let lifetime = match parsed.expires_in.as_ref() {
            None => self.default_lifetime,
            Some(raw) => match expires_in_secs(raw) {
                Some(secs) => Duration::from_secs(secs),
                None => {
                    tracing::warn!("Ignoring unusable expires_in {}, using default lifetime", raw);
                    self.default_lifetime
                }
            },
        };
        let usable = lifetime.saturating_sub(self.refresh_margin);
        let expires_at = Utc::now()
            + chrono::Duration::from_std(usable).unwrap_or_else(|_| chrono::Duration::zero());

        tracing::info!("Access token issued, valid until {}", expires_at);
        Ok(Token {
            access_token,
            expires_at,
        })
    }
}

/// Exchanges the configured credential for bearer tokens and caches them.
///
/// Callers arriving while no valid token is cached attach to one shared
/// in-flight exchange, so a burst of requests costs a single round-trip.
pub struct AuthTokenProvider {
    exchange: Exchange,
    state: Mutex<TokenState>,
}

impl AuthTokenProvider {
    pub fn new(api_root: &str, credential: Credential) -> Self {
        Self::with_client(api_root, credential, reqwest::Client::new())
    }

    pub fn with_client(api_root: &str, credential: Credential, client: reqwest::Client) -> Self {
        let defaults = Config::default().auth;
        Self {
            exchange: Exchange {
                client,
                auth_url: format!("{}/api/Auth", api_root.trim_end_matches('/')),
                credential,
                default_lifetime: defaults.default_token_lifetime(),
                refresh_margin: defaults.refresh_margin(),
            },
            state: Mutex::new(TokenState::default()),
        }
    }

    pub fn from_config(config: &Config, credential: Credential, client: reqwest::Client) -> Self {
        Self::with_client(&config.api.api_root(), credential, client)
            .with_lifetimes(
                config.auth.default_token_lifetime(),
                config.auth.refresh_margin(),
            )
    }

    pub fn with_lifetimes(mut self, default_lifetime: Duration, refresh_margin: Duration) -> Self {
        self.exchange.default_lifetime = default_lifetime;
        self.exchange.refresh_margin = refresh_margin;
        self
    }

    pub async fn cached_token(&self) -> Option<Token> {
        self.state.lock().await.cached.clone()
    }
}

#[async_trait]
impl TokenSource for AuthTokenProvider {
    async fn get_token(&self) -> Result<Token, AuthError> {
        let flight = {
            let mut state = self.state.lock().await;

            if let Some(token) = state.cached.as_ref().filter(|t| t.is_valid()) {
                tracing::debug!("Using cached access token");
                return Ok(token.clone());
            }

            if let Some(flight) = state.in_flight.clone() {
                tracing::debug!("Joining in-flight token exchange");
                flight
            } else {
                let flight = self.exchange.clone().run().boxed().shared();
                state.in_flight = Some(flight.clone());
                flight
            }
        };

        let result = flight.await;

        let mut state = self.state.lock().await;
        let finished = state
            .in_flight
            .as_ref()
            .and_then(|flight| flight.peek().cloned());
        if let Some(outcome) = finished {
            state.in_flight = None;
            if let Ok(token) = outcome {
                state.cached = Some(token);
            }
        }

        result
    }

    async fn invalidate(&self, rejected: &Token) {
        let mut state = self.state.lock().await;
        if state.cached.as_ref().is_some_and(|t| t.access_token == rejected.access_token) {
            tracing::info!("Discarding rejected access token");
            state.cached = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_credential() -> Credential {
        Credential::new("client-1", "secret-1")
    }

    fn provider_for(server: &MockServer) -> AuthTokenProvider {
        AuthTokenProvider::new(&format!("{}/tenant", server.uri()), test_credential())
            .with_lifetimes(Duration::from_secs(300), Duration::from_secs(0))
    }

    async fn mount_auth(server: &MockServer, response: ResponseTemplate, times: u64) {
        Mock::given(method("POST"))
            .and(path("/tenant/api/Auth"))
            .respond_with(response)
            .expect(times)
            .mount(server)
            .await;
    }

    #[test]
    fn token_is_invalid_at_its_expiry() {
        let now = Utc::now();
        let token = Token {
            access_token: "t".to_string(),
            expires_at: now,
        };

        assert!(!token.is_valid_at(now));
        assert!(token.is_valid_at(now - chrono::Duration::seconds(1)));
    }

    #[tokio::test]
    async fn exchange_posts_credentials_as_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tenant/api/Auth"))
            .and(body_json(json!({"clientId": "client-1", "clientSecret": "secret-1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "abc"})))
            .expect(1)
            .mount(&server)
            .await;

        let token = provider_for(&server).get_token().await.unwrap();

        assert_eq!(token.access_token, "abc");
    }

    #[tokio::test]
    async fn cached_token_is_reused_without_network_call() {
        let server = MockServer::start().await;
        mount_auth(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "abc", "expires_in": 3600})),
            1,
        )
        .await;
        let provider = provider_for(&server);

        let first = provider.get_token().await.unwrap();
        let second = provider.get_token().await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn missing_lifetime_uses_default() {
        let server = MockServer::start().await;
        mount_auth(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "abc"})),
            1,
        )
        .await;

        let before = Utc::now();
        let token = provider_for(&server).get_token().await.unwrap();

        let lifetime = token.expires_at - before;
        assert!(lifetime <= chrono::Duration::seconds(301));
        assert!(lifetime >= chrono::Duration::seconds(295));
    }

    async fn lifetime_for(expires_in: Value) -> chrono::Duration {
        let server = MockServer::start().await;
        mount_auth(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "abc", "expires_in": expires_in})),
            1,
        )
        .await;

        let before = Utc::now();
        let token = provider_for(&server).get_token().await.unwrap();
        token.expires_at - before
    }

    #[tokio::test]
    async fn numeric_string_lifetime_is_accepted() {
        let lifetime = lifetime_for(json!("3600")).await;

        assert!(lifetime > chrono::Duration::seconds(3590));
        assert!(lifetime <= chrono::Duration::seconds(3601));
    }

    #[tokio::test]
    async fn fractional_lifetime_is_truncated() {
        let lifetime = lifetime_for(json!(3599.5)).await;

        assert!(lifetime > chrono::Duration::seconds(3590));
        assert!(lifetime <= chrono::Duration::seconds(3600));
    }

    #[tokio::test]
    async fn unusable_lifetime_falls_back_to_default() {
        let lifetime = lifetime_for(json!("soon")).await;

        assert!(lifetime <= chrono::Duration::seconds(301));
        assert!(lifetime >= chrono::Duration::seconds(295));
    }

    #[test]
    fn expires_in_parsing_rejects_non_numbers() {
        assert_eq!(expires_in_secs(&json!(120)), Some(120));
        assert_eq!(expires_in_secs(&json!(" 45 ")), Some(45));
        assert_eq!(expires_in_secs(&json!(-5)), Some(0));
        assert_eq!(expires_in_secs(&json!(true)), None);
        assert_eq!(expires_in_secs(&json!({"secs": 5})), None);
    }

    #[tokio::test]
    async fn refresh_margin_shortens_lifetime() {
        let server = MockServer::start().await;
        mount_auth(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "abc", "expires_in": 60})),
            1,
        )
        .await;
        let provider = provider_for(&server)
            .with_lifetimes(Duration::from_secs(300), Duration::from_secs(30));

        let before = Utc::now();
        let token = provider.get_token().await.unwrap();

        assert!(token.expires_at - before <= chrono::Duration::seconds(31));
    }

    #[tokio::test]
    async fn expired_token_triggers_fresh_exchange() {
        let server = MockServer::start().await;
        mount_auth(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "short", "expires_in": 0})),
            2,
        )
        .await;
        let provider = provider_for(&server);

        provider.get_token().await.unwrap();
        provider.get_token().await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_exchange() {
        let server = MockServer::start().await;
        mount_auth(
            &server,
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "shared", "expires_in": 3600}))
                .set_delay(std::time::Duration::from_millis(200)),
            1,
        )
        .await;
        let provider = Arc::new(provider_for(&server));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let provider = Arc::clone(&provider);
                tokio::spawn(async move { provider.get_token().await })
            })
            .collect();

        for handle in handles {
            let token = handle.await.unwrap().unwrap();
            assert_eq!(token.access_token, "shared");
        }
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_failure() {
        let server = MockServer::start().await;
        mount_auth(
            &server,
            ResponseTemplate::new(500)
                .set_body_string("down")
                .set_delay(std::time::Duration::from_millis(200)),
            1,
        )
        .await;
        let provider = Arc::new(provider_for(&server));

        let (a, b) = tokio::join!(provider.get_token(), provider.get_token());

        assert_eq!(a, Err(AuthError::Rejected { status: 500, body: "down".to_string() }));
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn failed_exchange_is_not_cached() {
        let server = MockServer::start().await;
        mount_auth(&server, ResponseTemplate::new(401).set_body_string("bad secret"), 2).await;
        let provider = provider_for(&server);

        assert!(provider.get_token().await.is_err());
        assert!(provider.get_token().await.is_err());
        assert!(provider.cached_token().await.is_none());
    }

    #[tokio::test]
    async fn missing_access_token_is_malformed() {
        let server = MockServer::start().await;
        mount_auth(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"token_type": "Bearer"})),
            1,
        )
        .await;

        let result = provider_for(&server).get_token().await;

        assert!(matches!(result, Err(AuthError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let server = MockServer::start().await;
        mount_auth(&server, ResponseTemplate::new(200).set_body_string("<html>"), 1).await;

        let result = provider_for(&server).get_token().await;

        assert!(matches!(result, Err(AuthError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let provider = AuthTokenProvider::new("http://127.0.0.1:9", test_credential());

        let result = provider.get_token().await;

        assert!(matches!(result, Err(AuthError::Transport(_))));
    }

    #[tokio::test]
    async fn invalidate_ignores_tokens_other_than_cached_one() {
        let server = MockServer::start().await;
        mount_auth(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "current", "expires_in": 3600})),
            1,
        )
        .await;
        let provider = provider_for(&server);
        let current = provider.get_token().await.unwrap();

        let stale = Token {
            access_token: "stale".to_string(),
            expires_at: Utc::now(),
        };
        provider.invalidate(&stale).await;
        assert_eq!(provider.cached_token().await, Some(current.clone()));

        provider.invalidate(&current).await;
        assert!(provider.cached_token().await.is_none());
    }
}
