use crate::client::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT};
use crate::error::{CrmaError, CrmaResult};
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OAuth token endpoint for production and developer orgs
pub const TOKEN_URL: &str = "https://login.salesforce.com/services/oauth2/token";

fn default_token_type() -> String {
    "Bearer".to_string()
}

fn default_grant_type() -> String {
    "password".to_string()
}

/// Info for making API requests to a Salesforce instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    pub instance_url: String,
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

/// Credentials for the OAuth username-password flow
#[derive(Clone, Serialize, Deserialize)]
pub struct PasswordCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    #[serde(default = "default_grant_type")]
    pub grant_type: String,
}

impl PasswordCredentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            username: username.into(),
            password: password.into(),
            grant_type: default_grant_type(),
        }
    }
}

impl std::fmt::Debug for PasswordCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordCredentials")
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("grant_type", &self.grant_type)
            .finish_non_exhaustive()
    }
}

impl ConnectionInfo {
    pub fn new(instance_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            instance_url: instance_url.into(),
            access_token: access_token.into(),
            token_type: default_token_type(),
        }
    }

    /// Authorization header value
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }

    /// Apply the authorization header
    pub fn apply_auth(&self, headers: &mut HeaderMap) -> CrmaResult<()> {
        let mut value = HeaderValue::from_str(&self.authorization())
            .map_err(|e| CrmaError::auth_error(format!("Invalid auth header: {}", e)))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
        Ok(())
    }

    /// Exchange credentials for an access token at the default token endpoint
    ///
    /// Uses the same request and connect timeouts as the default client.
    pub async fn generate(credentials: &PasswordCredentials) -> CrmaResult<Self> {
        let client = token_client(DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)?;
        Self::generate_at(&client, TOKEN_URL, credentials).await
    }

    /// Exchange credentials for an access token at `token_url`
    ///
    /// Single attempt; failures are never retried.
    pub async fn generate_at(
        client: &reqwest::Client,
        token_url: &str,
        credentials: &PasswordCredentials,
    ) -> CrmaResult<Self> {
        info!("Generating access token for user: {}", credentials.username);
        let response = client.post(token_url).form(credentials).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("Token request completed status_code={}", status.as_u16());

        if !status.is_success() {
            return Err(CrmaError::auth_error(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| CrmaError::auth_error(format!("unexpected token response: {}", e)))
    }
}

fn token_client(timeout: Duration, connect_timeout: Duration) -> CrmaResult<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .connect_timeout(connect_timeout)
        .build()?)
}
