use crate::auth::Credential;
use crate::client::core::NotifyClient;
use crate::codec::{Codec, CodecConfig, LetterAddressPolicy};
use crate::telemetry::LogSink;
use crate::transport::{HttpSend, HttpTransport, TransportConfig};
use crate::{Error, ErrorContext, Result};
use keyring::Entry;
use reqwest::{Certificate, Identity, Proxy};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.notifications.service.gov.uk";

const KEYRING_SERVICE: &str = "notify-client";
const KEYRING_USER: &str = "api_key";

/// Builder for [`NotifyClient`].
///
/// Anything left unset is resolved from the environment at [`build`](Self::build):
/// - `NOTIFY_API_KEY` (after the OS keyring, service `notify-client`, user `api_key`)
/// - `NOTIFY_BASE_URL`
/// - `NOTIFY_HTTP_TIMEOUT_SECS`, `NOTIFY_CONNECT_TIMEOUT_SECS`, `NOTIFY_PROXY_URL`
/// - `NOTIFY_STRICT_UNKNOWN_FIELDS=1`
pub struct NotifyClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    proxy: Option<Proxy>,
    root_certificates: Vec<Certificate>,
    identity: Option<Identity>,
    strict_unknown_fields: bool,
    letter_address: LetterAddressPolicy,
    sink: Arc<dyn LogSink>,
    transport: Option<Arc<dyn HttpSend>>,
}

impl NotifyClientBuilder {
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: None,
            timeout: None,
            connect_timeout: None,
            proxy: None,
            root_certificates: Vec::new(),
            identity: None,
            strict_unknown_fields: false,
            letter_address: LetterAddressPolicy::default(),
            sink: crate::telemetry::tracing_sink(),
            transport: None,
        }
    }

    /// Combined key `<name>-<service_id>-<secret>`.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Service root, e.g. a mock server in tests.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn proxy(mut self, proxy: Proxy) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn add_root_certificate(mut self, cert: Certificate) -> Self {
        self.root_certificates.push(cert);
        self
    }

    /// Client certificate for mutual TLS.
    pub fn identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Fail on response fields the models do not declare.
    pub fn strict_unknown_fields(mut self, enable: bool) -> Self {
        self.strict_unknown_fields = enable;
        self
    }

    pub fn letter_address_policy(mut self, policy: LetterAddressPolicy) -> Self {
        self.letter_address = policy;
        self
    }

    /// Inject a log sink. Default forwards to `tracing`.
    pub fn log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replace the HTTP stack. Timeout, proxy and TLS settings are then
    /// ignored.
    pub fn transport(mut self, transport: Arc<dyn HttpSend>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<NotifyClient> {
        let api_key = self.api_key.or_else(Self::api_key_from_env).ok_or_else(|| {
            Error::configuration_with_context(
                "no API key: set one on the builder, in the keyring or in NOTIFY_API_KEY",
                ErrorContext::new()
                    .with_field_path("api_key")
                    .with_source("builder"),
            )
        })?;
        let credential = Credential::from_api_key(&api_key)?;

        let base_url = self
            .base_url
            .or_else(|| non_empty_env("NOTIFY_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = parse_base_url(&base_url)?;

        let strict_unknown_fields = self.strict_unknown_fields
            || env::var("NOTIFY_STRICT_UNKNOWN_FIELDS").ok().as_deref() == Some("1");

        let transport: Arc<dyn HttpSend> = match self.transport {
            Some(transport) => transport,
            None => {
                let mut config = TransportConfig::from_env()?;
                if let Some(timeout) = self.timeout {
                    config.timeout = timeout;
                }
                if let Some(timeout) = self.connect_timeout {
                    config.connect_timeout = timeout;
                }
                if self.proxy.is_some() {
                    config.proxy = self.proxy;
                }
                config.root_certificates = self.root_certificates;
                config.identity = self.identity;
                Arc::new(HttpTransport::new(config)?)
            }
        };

        let codec = Codec::new(CodecConfig {
            strict_unknown_fields,
            letter_address: self.letter_address,
        })
        .with_sink(self.sink.clone());

        Ok(NotifyClient {
            credential,
            base_url,
            transport,
            codec,
            sink: self.sink,
        })
    }

    fn api_key_from_env() -> Option<String> {
        // 1. Try Keyring
        if let Ok(entry) = Entry::new(KEYRING_SERVICE, KEYRING_USER) {
            if let Ok(key) = entry.get_password() {
                return Some(key);
            }
        }

        // 2. Try Environment Variable
        non_empty_env("NOTIFY_API_KEY")
    }
}

impl Default for NotifyClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let context = || {
        ErrorContext::new()
            .with_field_path("base_url")
            .with_source("builder")
    };
    let url = Url::parse(raw).map_err(|e| {
        Error::configuration_with_context(format!("invalid base URL '{}': {}", raw, e), context())
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(Error::configuration_with_context(
            format!("base URL must be an http(s) URL, got '{}'", raw),
            context(),
        ));
    }
    Ok(url)
}
