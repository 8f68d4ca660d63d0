use crate::{
    apis::{DatasetApi, QueryApi},
    auth::ConnectionInfo,
    encoder::{to_json_vec, Encodable},
    error::{CrmaError, CrmaResult},
    retry::RetryPolicy,
};
use bytes::Bytes;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::time::Duration;
use url::Url;

/// Default CRM Analytics REST API version
pub const DEFAULT_API_VERSION: &str = "v54.0";

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub(crate) const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client settings supplied by the caller
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API version path segment, e.g. `v54.0`
    pub api_version: String,
    /// Timeout for a single request attempt
    pub timeout: Duration,
    /// Timeout for establishing a connection
    pub connect_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

/// Successful response with its body read into memory
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    body: Bytes,
}

impl RawResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Decode the body into a resource model
    pub fn json<T: DeserializeOwned>(&self) -> CrmaResult<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// CRM Analytics REST API client
#[derive(Debug, Clone)]
pub struct CrmaClient {
    client: Client,
    base_url: Url,
    headers: HeaderMap,
    timeout: Duration,
    retry: RetryPolicy,
}

impl CrmaClient {
    /// Create a client with the default configuration
    pub fn new(conn: ConnectionInfo) -> CrmaResult<Self> {
        Self::with_config(conn, ClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(conn: ConnectionInfo, config: ClientConfig) -> CrmaResult<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(config.connect_timeout)
            .build()?;

        Self::with_client(client, conn, config)
    }

    /// Create a client with a custom reqwest client
    ///
    /// The connect timeout of `config` is not applied; it belongs to `client`.
    pub fn with_client(
        client: Client,
        conn: ConnectionInfo,
        config: ClientConfig,
    ) -> CrmaResult<Self> {
        let base_url = Url::parse(&format!(
            "{}/services/data/{}",
            conn.instance_url.trim_end_matches('/'),
            config.api_version
        ))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        conn.apply_auth(&mut headers)?;

        Ok(Self {
            client,
            base_url,
            headers,
            timeout: config.timeout,
            retry: config.retry,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get Dataset API
    pub fn datasets(&self) -> DatasetApi<'_> {
        DatasetApi::new(self)
    }

    /// Get Query API
    pub fn queries(&self) -> QueryApi<'_> {
        QueryApi::new(self)
    }

    /// Send a JSON request to the service
    ///
    /// `path` is appended to the base URL with exactly one leading slash.
    /// The body goes through the common encoder. 502 responses are retried
    /// according to the configured [`RetryPolicy`]; any other non-2xx
    /// status fails with [`CrmaError::Status`].
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Encodable>,
        params: Option<&[(&str, &str)]>,
    ) -> CrmaResult<RawResponse> {
        let path = normalize_path(path);
        let url = self.url_for(&path)?;
        let body = body.map(to_json_vec).transpose()?.map(Bytes::from);

        self.retry
            .execute(|_| self.send_once(method.clone(), &path, url.clone(), body.clone(), params))
            .await
    }

    async fn send_once(
        &self,
        method: Method,
        path: &str,
        url: Url,
        body: Option<Bytes>,
        params: Option<&[(&str, &str)]>,
    ) -> CrmaResult<RawResponse> {
        debug!("Service request starting path={} method={}", path, method);
        let mut req = self
            .client
            .request(method, url)
            .headers(self.headers.clone())
            .timeout(self.timeout);

        if let Some(params) = params {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.body(body);
        }

        let response = req.send().await?;
        let status = response.status();
        debug!("Service request completed status_code={}", status.as_u16());

        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(CrmaError::status_error(
                status.as_u16(),
                String::from_utf8_lossy(&body),
            ));
        }

        Ok(RawResponse { status, body })
    }

    fn url_for(&self, path: &str) -> CrmaResult<Url> {
        Ok(Url::parse(&format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            path
        ))?)
    }
}

fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim_matches('/'))
}
