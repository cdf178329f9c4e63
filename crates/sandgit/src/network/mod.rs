//! Network transport for Sandgit
//!
//! [`ProxyHttpClient`] implements [`HttpTransport`](crate::engine::HttpTransport)
//! with reqwest. Embedders running inside a browser provide their own
//! transport instead.

#[cfg(feature = "http_client")]
mod client;

#[cfg(feature = "http_client")]
pub use client::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_RESPONSE_BYTES, DEFAULT_TIMEOUT_SECS,
    ProxyHttpClient,
};
