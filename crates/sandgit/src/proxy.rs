//! CORS-proxy routing.
//!
//! Browsers cannot speak smart-HTTP to arbitrary git hosts because of CORS.
//! Requests are relayed through a proxy that takes the target URL, minus
//! its scheme, as its path: `<proxy>/<host>/<path>`.

use async_trait::async_trait;

use crate::engine::{HttpRequest, HttpResponse, HttpTransport};
use crate::error::Result;
use crate::logging_impl::LogConfig;

/// Same-origin proxy path used for clone and pull.
pub const DEFAULT_CORS_PROXY: &str = "/api/git-proxy";

/// Public cross-origin proxy used for push.
pub const DEFAULT_PUSH_PROXY: &str = "https://cors.isomorphic-git.org";

/// A CORS proxy endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsProxy {
    endpoint: String,
}

impl CorsProxy {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Rewrite `url` to go through this proxy.
    ///
    /// URLs already addressed to the proxy are returned unchanged.
    pub fn route(&self, url: &str) -> String {
        if self.endpoint.is_empty() || url.starts_with(&format!("{}/", self.endpoint)) {
            return url.to_string();
        }
        let target = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .unwrap_or(url);
        format!("{}/{}", self.endpoint, target)
    }
}

/// Transport wrapper that routes every request through a [`CorsProxy`].
pub struct ProxiedTransport<'a> {
    inner: &'a dyn HttpTransport,
    proxy: &'a CorsProxy,
    log: &'a LogConfig,
}

impl<'a> ProxiedTransport<'a> {
    pub fn new(inner: &'a dyn HttpTransport, proxy: &'a CorsProxy, log: &'a LogConfig) -> Self {
        Self { inner, proxy, log }
    }
}

#[async_trait]
impl HttpTransport for ProxiedTransport<'_> {
    async fn request(&self, mut request: HttpRequest) -> Result<HttpResponse> {
        request.url = self.proxy.route(&request.url);
        tracing::debug!(
            method = request.method.as_str(),
            url = %self.log.redact_url(&request.url),
            headers = %self.log.format_headers(&request.headers),
            "proxied request"
        );
        let response = self.inner.request(request).await?;
        tracing::debug!(status = response.status, "proxy response");
        Ok(response)
    }
}
