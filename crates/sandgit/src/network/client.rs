//! reqwest-backed HTTP transport.
//!
//! - Response bodies are capped at `max_response_bytes` (streamed check)
//! - Connect timeout 10s, request timeout 30s
//! - Redirects are not followed; the proxy path must stay in control
//! - Automatic decompression is disabled; pack data is already compressed

use async_trait::async_trait;
use reqwest::Client;
use std::sync::OnceLock;
use std::time::Duration;

use crate::engine::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::error::{Error, Result};

/// Default maximum response body size (256 MB). Packfiles are large.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 256 * 1024 * 1024;

/// Default request timeout (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connect timeout (10 seconds)
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

static CRYPTO_PROVIDER: OnceLock<()> = OnceLock::new();

/// reqwest is built with `rustls-no-provider`; install `ring` once.
fn ensure_crypto_provider() {
    CRYPTO_PROVIDER.get_or_init(|| {
        // Err means another provider is already installed, which is fine
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// HTTP transport for proxied smart-HTTP requests.
pub struct ProxyHttpClient {
    client: Client,
    /// Origin prepended to relative URLs such as `/api/git-proxy/...`
    base_origin: Option<String>,
    max_response_bytes: usize,
}

impl HttpMethod {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

impl ProxyHttpClient {
    /// Create a client with default timeouts and response limit.
    pub fn new(user_agent: &str) -> Result<Self> {
        Self::with_config(
            user_agent,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            DEFAULT_MAX_RESPONSE_BYTES,
        )
    }

    /// Create a client with full configuration.
    pub fn with_config(
        user_agent: &str,
        timeout: Duration,
        max_response_bytes: usize,
    ) -> Result<Self> {
        ensure_crypto_provider();
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::none())
            .no_gzip()
            .no_brotli()
            .no_deflate()
            .build()
            .map_err(|e| Error::Network(format!("failed to create client: {}", e)))?;

        Ok(Self {
            client,
            base_origin: None,
            max_response_bytes,
        })
    }

    /// Resolve relative (same-origin) URLs against `origin`,
    /// e.g. `http://localhost:3000`.
    pub fn with_base_origin(mut self, origin: impl Into<String>) -> Self {
        self.base_origin = Some(origin.into().trim_end_matches('/').to_string());
        self
    }

    pub fn max_response_bytes(&self) -> usize {
        self.max_response_bytes
    }

    fn resolve(&self, url: &str) -> Result<String> {
        if url.starts_with("https://") || url.starts_with("http://") {
            return Ok(url.to_string());
        }
        match (&self.base_origin, url.starts_with('/')) {
            (Some(origin), true) => Ok(format!("{}{}", origin, url)),
            _ => Err(Error::Network(
                "relative URL requires a base origin".to_string(),
            )),
        }
    }

    /// Read response body with size limit enforcement.
    async fn read_body_with_limit(&self, response: reqwest::Response) -> Result<Vec<u8>> {
        use futures_util::StreamExt;

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result
                .map_err(|e| Error::Network(format!("failed to read response chunk: {}", e)))?;

            if body.len() + chunk.len() > self.max_response_bytes {
                return Err(Error::Network(format!(
                    "response too large: exceeded {} bytes limit",
                    self.max_response_bytes
                )));
            }

            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }
}

#[async_trait]
impl HttpTransport for ProxyHttpClient {
    async fn request(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = self.resolve(&request.url)?;
        let mut builder = self.client.request(request.method.as_reqwest(), &url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        // reqwest errors can echo the URL; keep them generic
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Network("operation timed out".to_string())
            } else if e.is_connect() {
                Error::Network("connection failed".to_string())
            } else {
                Error::Network("request failed".to_string())
            }
        })?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        if let Some(content_length) = response.content_length() {
            if content_length as usize > self.max_response_bytes {
                return Err(Error::Network(format!(
                    "response too large: {} bytes (max: {} bytes)",
                    content_length, self.max_response_bytes
                )));
            }
        }

        let body = self.read_body_with_limit(response).await?;

        Ok(HttpResponse {
            url: request.url,
            status,
            headers,
            body,
        })
    }
}
