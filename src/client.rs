//! DefectDojo API client.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Every resource method funnels through [`DojoClient::dispatch`], which
//! maps the raw HTTP outcome onto a [`DojoResponse`] envelope.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, LOCATION};
use reqwest::multipart::Form;
use reqwest::{Client, Identity, Method, Proxy, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{DojoError, Result};
use crate::response::DojoResponse;

const DEFAULT_API_VERSION: &str = "v2";

/// API version tag that selects the legacy `ApiKey` authentication scheme.
const LEGACY_API_VERSION: &str = "v1";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(4000);
const USER_AGENT: &str = concat!("dojoapi/", env!("CARGO_PKG_VERSION"));

/// Low-level DefectDojo API client.
///
/// Handles authentication and HTTP requests. Resource-specific operations
/// are implemented in the `resources` modules as inherent methods; all of
/// them call [`dispatch`](Self::dispatch) exactly once and return its
/// envelope.
///
/// The configuration is immutable after construction, so the client is
/// cheaply cloneable and safe for concurrent use; clones reference the
/// same underlying connection pool.
///
/// # Example
///
/// ```no_run
/// use dojoapi::DojoClient;
///
/// # fn example() -> dojoapi::Result<()> {
/// // Create from environment variables
/// let client = DojoClient::from_env()?;
///
/// // Or configure manually
/// let client = DojoClient::builder("https://defectdojo.example.com", "token", "admin")
///     .verify_ssl(false)
///     .debug(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DojoClient {
    http: Client,
    base_url: Arc<Url>,
    user: String,
    token: String,
    api_version: String,
    timeout: Duration,
    debug: bool,
}

impl std::fmt::Debug for DojoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DojoClient")
            .field("base_url", &self.base_url.as_str())
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl DojoClient {
    /// Create a client from environment variables.
    ///
    /// Uses `DOJO_HOST` for the server address, `DOJO_API_TOKEN` for
    /// authentication and optionally `DOJO_USER` for the principal tied to
    /// the token (only required for the legacy v1 scheme).
    ///
    /// # Errors
    ///
    /// Returns an error if `DOJO_HOST` or `DOJO_API_TOKEN` is not set.
    pub fn from_env() -> Result<Self> {
        let host = env::var("DOJO_HOST").map_err(|_| {
            DojoError::ConfigMissing("DOJO_HOST environment variable not set".to_string())
        })?;
        let token = env::var("DOJO_API_TOKEN").map_err(|_| {
            DojoError::ConfigMissing("DOJO_API_TOKEN environment variable not set".to_string())
        })?;
        let user = env::var("DOJO_USER").unwrap_or_default();

        Self::new(&host, &token, &user)
    }

    /// Create a new client with default network policy.
    ///
    /// # Arguments
    ///
    /// * `host` - Server address (e.g., `https://defectdojo.example.com`)
    /// * `api_token` - API token generated on the API key page
    /// * `user` - User associated with the API key
    ///
    /// # Errors
    ///
    /// Returns an error if the host is empty or not a valid URL.
    pub fn new(host: &str, api_token: &str, user: &str) -> Result<Self> {
        Self::builder(host, api_token, user).build()
    }

    /// Start building a client with custom network policy.
    pub fn builder(host: &str, api_token: &str, user: &str) -> DojoClientBuilder {
        DojoClientBuilder {
            host: host.to_string(),
            token: api_token.to_string(),
            user: user.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            verify_ssl: true,
            timeout: DEFAULT_TIMEOUT,
            proxies: Vec::new(),
            identity_pem: None,
            user_agent: None,
            debug: false,
        }
    }

    /// The base URL every endpoint path is appended to
    /// (`{host}/api/{version}/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The configured API version tag.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Authentication header value, selected by the API version tag.
    fn authorization(&self) -> String {
        if self.api_version == LEGACY_API_VERSION {
            format!("ApiKey {}:{}", self.user, self.token)
        } else {
            format!("Token {}", self.token)
        }
    }

    /// Issue one HTTP request and normalize its outcome.
    ///
    /// `path` is concatenated verbatim onto the base URL. `query` and
    /// `body` are JSON objects of string keys to values; `body` is sent as
    /// a JSON document unless `files` is supplied, in which case the
    /// multipart form wins and the JSON `Accept`/`Content-Type` headers
    /// are omitted so the transport can set the multipart boundary.
    ///
    /// Never fails: network, protocol and decoding errors are all captured
    /// in the returned envelope.
    pub async fn dispatch(
        &self,
        method: Method,
        path: &str,
        query: Option<Value>,
        body: Option<Value>,
        files: Option<Form>,
    ) -> DojoResponse {
        let url = format!("{}{}", self.base_url, path);
        let multipart = files.is_some();

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(AUTHORIZATION, self.authorization());

        if let Some(params) = &query {
            request = request.query(&query_pairs(params));
        }

        match files {
            Some(form) => request = request.multipart(form),
            None => {
                request = request
                    .header(ACCEPT, "application/json")
                    .header(CONTENT_TYPE, "application/json");
                if let Some(body) = &body {
                    request = request.body(body.to_string());
                }
            }
        }

        if self.debug {
            debug!(%method, %url, params = ?query, body = ?body, multipart, "request");
        }

        match request.send().await {
            Ok(response) => self.finish(response).await,
            Err(error) => self.transport_failure(&error),
        }
    }

    /// Map a received HTTP response onto the envelope.
    async fn finish(&self, response: Response) -> DojoResponse {
        let status = i32::from(response.status().as_u16());
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let text = match response.text().await {
            Ok(text) => text,
            // A status line arrived but the body stream died; the real
            // status is kept, only the payload is lost.
            Err(error) => {
                if self.debug {
                    debug!(status, %error, "response body read failed");
                }
                return DojoResponse::failed(
                    status,
                    "There was an error while handling the request.",
                    None,
                );
            }
        };

        if self.debug {
            debug!(status, body = %text, "response");
        }

        match status {
            201 => {
                if let Some(id) = location.as_deref().and_then(id_from_location) {
                    return DojoResponse::ok(201, "Upload complete", Some(Value::from(id)));
                }
                match serde_json::from_str(&text) {
                    Ok(data) => DojoResponse::ok(201, "Upload complete", Some(data)),
                    Err(_) => decode_failure(201, text),
                }
            }
            204 => DojoResponse::ok(204, "Object updated.", None),
            400 => DojoResponse::failed(400, "Error occurred in API.", Some(Value::String(text))),
            401 => DojoResponse::failed(401, "Unauthorized.", Some(Value::String(text))),
            404 => DojoResponse::failed(
                404,
                "Object id does not exist.",
                Some(Value::String(text)),
            ),
            414 => DojoResponse::failed(414, "Request-URI Too Large.", None),
            500 => DojoResponse::failed(
                500,
                "An error 500 occurred in the API.",
                Some(Value::String(text)),
            ),
            504 => DojoResponse::failed(
                504,
                "An error 504 occurred in the API.",
                Some(Value::String(text)),
            ),
            _ => match serde_json::from_str(&text) {
                Ok(data) => DojoResponse::ok(status, "Success", Some(data)),
                Err(_) => decode_failure(status, text),
            },
        }
    }

    /// Map a transport-level failure (no response received) onto the
    /// envelope. The status code is unavailable here, so the sentinel is
    /// recorded instead.
    fn transport_failure(&self, error: &reqwest::Error) -> DojoResponse {
        let message = if error.is_timeout() {
            format!(
                "The request timed out after {} seconds.",
                self.timeout.as_secs()
            )
        } else if is_tls_failure(error) {
            "An SSL error occurred.".to_string()
        } else if error.is_connect() {
            "A connection error occurred.".to_string()
        } else {
            "There was an error while handling the request.".to_string()
        };

        if self.debug {
            debug!(%error, "transport failure");
        }

        DojoResponse::transport(message)
    }
}

/// Builder for a [`DojoClient`] with custom network policy.
#[derive(Debug)]
pub struct DojoClientBuilder {
    host: String,
    token: String,
    user: String,
    api_version: String,
    verify_ssl: bool,
    timeout: Duration,
    proxies: Vec<Proxy>,
    identity_pem: Option<Vec<u8>>,
    user_agent: Option<String>,
    debug: bool,
}

impl DojoClientBuilder {
    /// Select the API version segment and authentication scheme
    /// (default `v2`; `v1` switches to the legacy `ApiKey` header).
    pub fn api_version(mut self, api_version: &str) -> Self {
        self.api_version = api_version.to_string();
        self
    }

    /// Verify the server's TLS certificate (default true).
    pub fn verify_ssl(mut self, verify_ssl: bool) -> Self {
        self.verify_ssl = verify_ssl;
        self
    }

    /// Per-request timeout (default 4000 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Route requests through a proxy. May be called multiple times.
    pub fn proxy(mut self, proxy: Proxy) -> Self {
        self.proxies.push(proxy);
        self
    }

    /// Present a client certificate, as a PEM bundle containing both the
    /// certificate and its private key.
    pub fn identity_pem(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.identity_pem = Some(pem.into());
        self
    }

    /// Override the `User-Agent` header (default `dojoapi/{version}`).
    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = Some(user_agent.to_string());
        self
    }

    /// Echo every request and response to the tracing sink at debug
    /// level. Never alters what is returned.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is empty or invalid, the client
    /// certificate cannot be parsed, or the HTTP client cannot be
    /// constructed.
    pub fn build(self) -> Result<DojoClient> {
        if self.host.trim().is_empty() {
            return Err(DojoError::ConfigMissing("host must not be empty".to_string()));
        }

        let base = format!(
            "{}/api/{}/",
            self.host.trim_end_matches('/'),
            self.api_version
        );
        let base_url = Url::parse(&base)?;

        let mut http = Client::builder()
            .user_agent(self.user_agent.unwrap_or_else(|| USER_AGENT.to_string()))
            .use_rustls_tls()
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .danger_accept_invalid_certs(!self.verify_ssl)
            .timeout(self.timeout);

        for proxy in self.proxies {
            http = http.proxy(proxy);
        }

        if let Some(pem) = self.identity_pem {
            http = http.identity(Identity::from_pem(&pem)?);
        }

        Ok(DojoClient {
            http: http.build().map_err(DojoError::HttpError)?,
            base_url: Arc::new(base_url),
            user: self.user,
            token: self.token,
            api_version: self.api_version,
            timeout: self.timeout,
            debug: self.debug,
        })
    }
}

/// Serialize a parameter struct into the outgoing field mapping. Optional
/// fields marked `skip_serializing_if` drop out here, which is the single
/// field-inclusion rule every resource method relies on.
pub(crate) fn fields<T: Serialize>(params: &T) -> Option<Value> {
    serde_json::to_value(params).ok()
}

/// Render a JSON object as URL query pairs. Non-string scalars keep their
/// JSON rendering (`true`, `20000`).
fn query_pairs(params: &Value) -> Vec<(String, String)> {
    let Value::Object(map) = params else {
        return Vec::new();
    };
    map.iter()
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            (key.clone(), rendered)
        })
        .collect()
}

/// Parse the object id out of a `Location` header shaped like
/// `.../{id}/` (second-to-last path segment).
fn id_from_location(location: &str) -> Option<u64> {
    location.rsplit('/').nth(1)?.parse().ok()
}

fn decode_failure(status: i32, text: String) -> DojoResponse {
    DojoResponse::failed(
        status,
        "JSON response could not be decoded.",
        Some(Value::String(text)),
    )
}

/// TLS negotiation failures surface as connect errors in reqwest; the
/// cause chain is scanned so they can be reported distinctly.
fn is_tls_failure(error: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        let text = cause.to_string().to_ascii_lowercase();
        if text.contains("certificate") || text.contains("tls") || text.contains("ssl") {
            return true;
        }
        source = cause.source();
    }
    false
}
