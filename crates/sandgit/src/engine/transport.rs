//! HTTP transport the engine speaks git smart-HTTP over.

use async_trait::async_trait;

use crate::error::Result;

/// HTTP request method. Smart-HTTP only needs GET and POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// Outgoing request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    /// Header name/value pairs, in order
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First header value matching `name`, case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Response as the engine consumes it.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Final URL the response came from
    pub url: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Check if the response was successful (2xx status)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 401/403: the engine should start or continue auth negotiation.
    pub fn is_auth_challenge(&self) -> bool {
        matches!(self.status, 401 | 403)
    }
}

/// Sends HTTP requests on the engine's behalf.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn request(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_value_case_insensitive() {
        let req = HttpRequest::get("https://example.com/info/refs")
            .header("Authorization", "Basic abc");
        assert_eq!(req.header_value("authorization"), Some("Basic abc"));
        assert_eq!(req.header_value("user-agent"), None);
        assert_eq!(req.method.as_str(), "GET");
    }

    #[test]
    fn test_response_status_helpers() {
        let resp = HttpResponse {
            url: String::new(),
            status: 401,
            headers: vec![],
            body: vec![],
        };
        assert!(!resp.is_success());
        assert!(resp.is_auth_challenge());
    }
}
