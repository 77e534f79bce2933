//! Session manager — owns the access-token lifecycle and issues every
//! authenticated call to the advertising API.
//!
//! The token is the only mutable state shared across the engine. Reads are
//! lock-free clones; acquisition is serialized behind `refresh` so that
//! concurrent callers who all observe an expired token wait on a single
//! re-acquisition instead of each hitting the auth endpoint.

use campaign_core::config::DspApiConfig;
use campaign_core::error::{DspError, DspResult};
use parking_lot::RwLock;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const CLIENT_ID_HEADER: &str = "Amazon-Advertising-API-ClientId";
pub const SCOPE_HEADER: &str = "Amazon-Advertising-API-Scope";

/// OAuth client credentials plus the long-lived refresh token.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Bearer token plus a generation counter. The generation lets a caller
/// tell whether the token it was rejected with has already been replaced.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    generation: u64,
}

impl AccessToken {
    pub fn secret(&self) -> &str {
        &self.value
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// A request to the advertising API, relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Advertiser profile sent as the scope header.
    pub scope: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            scope: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(Method::PUT, path).with_body(body)
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_scope(mut self, scope: Option<String>) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }
}

/// Result of a single attempt, before retry policy is applied.
#[derive(Debug)]
enum AttemptOutcome {
    Success(String),
    Unauthorized(String),
    Rejected { status: StatusCode, body: String },
}

/// Token-holding gateway to the advertising API.
pub struct SessionManager {
    http: Client,
    credentials: Credentials,
    auth_url: String,
    api_base_url: String,
    token: RwLock<Option<AccessToken>>,
    refresh: Mutex<()>,
}

impl SessionManager {
    pub fn new(config: &DspApiConfig, credentials: Credentials) -> DspResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| DspError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            credentials,
            auth_url: config.auth_url.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
            refresh: Mutex::new(()),
        })
    }

    pub fn client_id(&self) -> &str {
        &self.credentials.client_id
    }

    /// Current token, if one has been acquired.
    pub fn cached_token(&self) -> Option<AccessToken> {
        self.token.read().clone()
    }

    /// Exchange the refresh token for a fresh access token, replacing the
    /// one currently held.
    pub async fn acquire_token(&self) -> DspResult<AccessToken> {
        let _guard = self.refresh.lock().await;
        self.fetch_token().await
    }

    /// Issue an authenticated call and decode the JSON response.
    pub async fn authorized_call<T: DeserializeOwned>(&self, request: &ApiRequest) -> DspResult<T> {
        let body = self.execute(request).await?;
        decode_body(&body)
    }

    /// Issue an authenticated call and return the raw response body.
    ///
    /// A 401 triggers exactly one token re-acquisition and one retry. Any
    /// failure on the retry, including a second 401, is final.
    pub async fn execute(&self, request: &ApiRequest) -> DspResult<String> {
        let mut token = self.current_token().await?;
        let mut retried = false;

        loop {
            match self.send_once(request, &token).await? {
                AttemptOutcome::Success(body) => return Ok(body),
                AttemptOutcome::Unauthorized(_) if !retried => {
                    warn!(
                        method = %request.method,
                        path = %request.path,
                        generation = token.generation,
                        "Access token rejected, re-acquiring"
                    );
                    metrics::counter!("dsp.unauthorized_retries").increment(1);
                    token = self.reacquire(&token).await?;
                    retried = true;
                }
                AttemptOutcome::Unauthorized(body) => {
                    return Err(DspError::Api {
                        status: StatusCode::UNAUTHORIZED.as_u16(),
                        body,
                    });
                }
                AttemptOutcome::Rejected { status, body } => {
                    return Err(DspError::Api {
                        status: status.as_u16(),
                        body,
                    });
                }
            }
        }
    }

    async fn current_token(&self) -> DspResult<AccessToken> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        let _guard = self.refresh.lock().await;
        // Another caller may have finished acquiring while we waited.
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }
        self.fetch_token().await
    }

    async fn reacquire(&self, stale: &AccessToken) -> DspResult<AccessToken> {
        let _guard = self.refresh.lock().await;
        if let Some(current) = self.cached_token() {
            if current.generation != stale.generation {
                debug!(generation = current.generation, "Token already refreshed by another caller");
                return Ok(current);
            }
        }
        self.fetch_token().await
    }

    /// Caller must hold `refresh`.
    async fn fetch_token(&self) -> DspResult<AccessToken> {
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", self.credentials.refresh_token.as_str()),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
        ];

        metrics::counter!("dsp.token_acquisitions").increment(1);

        let response = self
            .http
            .post(&self.auth_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| DspError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Token acquisition rejected");
            return Err(DspError::Auth {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| DspError::Transport(e.to_string()))?;
        let parsed: TokenResponse = serde_json::from_str(&body)?;

        let token = {
            let mut slot = self.token.write();
            let generation = slot.as_ref().map_or(1, |t| t.generation + 1);
            let token = AccessToken {
                value: parsed.access_token,
                generation,
            };
            *slot = Some(token.clone());
            token
        };

        info!(generation = token.generation, "Access token acquired");
        Ok(token)
    }

    async fn send_once(&self, request: &ApiRequest, token: &AccessToken) -> DspResult<AttemptOutcome> {
        let url = format!("{}{}", self.api_base_url, request.path);

        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .bearer_auth(&token.value)
            .header(CLIENT_ID_HEADER, &self.credentials.client_id)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if let Some(scope) = &request.scope {
            builder = builder.header(SCOPE_HEADER, scope);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        metrics::counter!("dsp.api_requests").increment(1);
        debug!(method = %request.method, path = %request.path, "Sending API request");

        let response = builder
            .send()
            .await
            .map_err(|e| DspError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DspError::Transport(e.to_string()))?;

        Ok(if status.is_success() {
            AttemptOutcome::Success(body)
        } else if status == StatusCode::UNAUTHORIZED {
            AttemptOutcome::Unauthorized(body)
        } else {
            AttemptOutcome::Rejected { status, body }
        })
    }
}

/// Decode a response body. Empty bodies decode as JSON `null`.
fn decode_body<T: DeserializeOwned>(body: &str) -> DspResult<T> {
    let body = body.trim();
    let body = if body.is_empty() { "null" } else { body };
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_secrets() {
        let creds = Credentials::new("amzn1.app", "s3cr3t", "Atzr|refresh");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("amzn1.app"));
        assert!(!printed.contains("s3cr3t"));
        assert!(!printed.contains("Atzr|refresh"));
    }

    #[test]
    fn test_empty_body_decodes_as_null() {
        let value: serde_json::Value = decode_body("  ").unwrap();
        assert!(value.is_null());
        let unit: Option<u32> = decode_body("").unwrap();
        assert_eq!(unit, None);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = DspApiConfig {
            api_base_url: "http://localhost:3000/advertising-api/".into(),
            ..Default::default()
        };
        let session = SessionManager::new(&config, Credentials::new("id", "secret", "refresh")).unwrap();
        assert_eq!(session.api_base_url, "http://localhost:3000/advertising-api");
        assert!(session.cached_token().is_none());
    }
}
