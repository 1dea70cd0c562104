use crate::auth::Token;
use crate::{Error, ErrorContext, Result};
use bytes::Bytes;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONNECTION, CONTENT_TYPE};
use reqwest::{Certificate, Identity, Proxy};
use std::env;
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }

    fn to_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        }
    }
}

/// Everything needed to put one request on the wire.
#[derive(Debug, Clone, Copy)]
pub struct OutboundRequest<'a> {
    pub method: Method,
    pub url: &'a Url,
    pub token: &'a Token,
    /// JSON body; sent with `Content-Type` and `Accept: application/json`.
    pub body: Option<&'a [u8]>,
}

/// Status and body of a response, read in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// The seam between the client and the network. Implementations must be
/// safe to share between threads; each call is independent.
pub trait HttpSend: Send + Sync {
    fn send(&self, request: OutboundRequest<'_>) -> std::result::Result<RawResponse, TransportError>;
}

/// Connection settings. Proxy and TLS material are passed through to the
/// HTTP stack untouched.
pub struct TransportConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub proxy: Option<Proxy>,
    pub root_certificates: Vec<Certificate>,
    pub identity: Option<Identity>,
    pub user_agent: String,
}

impl TransportConfig {
    /// Defaults, overridable through `NOTIFY_HTTP_TIMEOUT_SECS`,
    /// `NOTIFY_CONNECT_TIMEOUT_SECS` and `NOTIFY_PROXY_URL`.
    pub fn from_env() -> Result<Self> {
        let timeout_secs = env::var("NOTIFY_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);
        let connect_timeout_secs = env::var("NOTIFY_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(10);

        let proxy = match env::var("NOTIFY_PROXY_URL") {
            Ok(proxy_url) if !proxy_url.trim().is_empty() => {
                Some(Proxy::all(proxy_url.trim()).map_err(|e| {
                    Error::configuration_with_context(
                        format!("invalid proxy URL: {}", e),
                        ErrorContext::new()
                            .with_field_path("NOTIFY_PROXY_URL")
                            .with_source("transport"),
                    )
                })?)
            }
            _ => None,
        };

        Ok(Self {
            timeout: Duration::from_secs(timeout_secs),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            proxy,
            root_certificates: Vec::new(),
            identity: None,
            user_agent: default_user_agent(),
        })
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            proxy: None,
            root_certificates: Vec::new(),
            identity: None,
            user_agent: default_user_agent(),
        }
    }
}

pub(crate) fn default_user_agent() -> String {
    format!("NOTIFY-API-RUST-CLIENT/{}", env!("CARGO_PKG_VERSION"))
}

/// `reqwest` blocking transport.
///
/// Idle pooling is disabled, so the connection behind each call is closed
/// once the response body has been read or the response is dropped.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: TransportConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(0)
            .user_agent(config.user_agent);

        if let Some(proxy) = config.proxy {
            builder = builder.proxy(proxy);
        }
        for cert in config.root_certificates {
            builder = builder.add_root_certificate(cert);
        }
        if let Some(identity) = config.identity {
            builder = builder.identity(identity);
        }

        let client = builder.build().map_err(|e| {
            Error::configuration_with_context(
                format!("failed to create HTTP client: {}", e),
                ErrorContext::new().with_source("transport"),
            )
        })?;

        Ok(Self { client })
    }
}

impl HttpSend for HttpTransport {
    fn send(&self, request: OutboundRequest<'_>) -> std::result::Result<RawResponse, TransportError> {
        let mut req = self
            .client
            .request(request.method.to_reqwest(), request.url.clone())
            .bearer_auth(request.token.as_str())
            .header(CONNECTION, "close");

        if let Some(body) = request.body {
            req = req
                .header(CONTENT_TYPE, "application/json")
                .header(ACCEPT, "application/json")
                .body(body.to_vec());
        }

        debug!(method = request.method.as_str(), url = %request.url, "sending request");

        // The response owns the connection; it is released when this scope ends.
        let response = req.send().map_err(TransportError::from_reqwest)?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(TransportError::from_reqwest)?;
        Ok(RawResponse { status, body })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout(e.to_string())
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Http(e)
        }
    }
}
