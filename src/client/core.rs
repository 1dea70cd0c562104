use crate::auth::{Credential, TokenIssuer};
use crate::client::error_classification::classify;
use crate::client::pagination::Pages;
use crate::codec::rules::Validate;
use crate::codec::Codec;
use crate::telemetry::{ClientEvent, LogSink};
use crate::transport::{HttpSend, Method, OutboundRequest};
use crate::types::{
    EmailRequest, LetterRequest, Notification, NotificationFilter, NotificationList,
    PrecompiledLetterRequest, PrecompiledLetterResponse, ReceivedTextMessage,
    ReceivedTextMessageList, SendEmailResponse, SendLetterResponse, SendSmsResponse, SmsRequest,
    Template, TemplateList, TemplatePreview, TemplatePreviewRequest, TemplateType,
};
use crate::{Error, ErrorContext, Result};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use url::Url;
use uuid::Uuid;

const CREATED: u16 = 201;
const OK: u16 = 200;

/// Blocking client for the notification service.
///
/// Configuration is fixed at build time. The client holds no per-call
/// state: every call mints its own token and opens its own connection, so a
/// single instance can be shared between threads.
pub struct NotifyClient {
    pub(crate) credential: Credential,
    pub(crate) base_url: Url,
    pub(crate) transport: Arc<dyn HttpSend>,
    pub(crate) codec: Codec,
    pub(crate) sink: Arc<dyn LogSink>,
}

impl fmt::Debug for NotifyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyClient")
            .field("service_id", &self.credential.service_id())
            .field("base_url", &self.base_url.as_str())
            .field("codec", &self.codec.config())
            .finish()
    }
}

impl NotifyClient {
    pub fn builder() -> crate::client::NotifyClientBuilder {
        crate::client::NotifyClientBuilder::new()
    }

    pub fn service_id(&self) -> &str {
        self.credential.service_id()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ---- sending ----

    pub fn send_email(&self, request: &EmailRequest) -> Result<SendEmailResponse> {
        self.post("/v2/notifications/email", request, CREATED)
    }

    pub fn send_sms(&self, request: &SmsRequest) -> Result<SendSmsResponse> {
        self.post("/v2/notifications/sms", request, CREATED)
    }

    /// Send a template-based letter. Address lines are checked according to
    /// the configured [`LetterAddressPolicy`](crate::codec::LetterAddressPolicy).
    pub fn send_letter(&self, request: &LetterRequest) -> Result<SendLetterResponse> {
        self.post("/v2/notifications/letter", request, CREATED)
    }

    pub fn send_precompiled_letter(
        &self,
        request: &PrecompiledLetterRequest,
    ) -> Result<PrecompiledLetterResponse> {
        self.post("/v2/notifications/letter", request, CREATED)
    }

    // ---- notifications ----

    pub fn get_notification_by_id(&self, id: Uuid) -> Result<Notification> {
        self.get(&format!("/v2/notifications/{}", id), &[])
    }

    /// Raw PDF of a letter.
    ///
    /// Until the document is rendered the service answers with an error
    /// classified as [`ErrorClass::PdfNotReady`](crate::error_code::ErrorClass::PdfNotReady);
    /// callers that poll should back off and retry on [`Error::is_pdf_not_ready`].
    pub fn get_pdf_for_letter(&self, id: Uuid) -> Result<Bytes> {
        self.execute(
            Method::Get,
            &format!("/v2/notifications/{}/pdf", id),
            &[],
            None,
            OK,
        )
    }

    /// One page of notifications, newest first.
    pub fn get_notifications(&self, filter: &NotificationFilter) -> Result<NotificationList> {
        self.get("/v2/notifications", &filter.query_pairs())
    }

    /// Every notification matching `filter`, fetching pages on demand.
    pub fn notifications_iter(&self, filter: NotificationFilter) -> Pages<'_, NotificationList> {
        let first = filter.older_than;
        Pages::new(first, move |older_than| {
            let mut filter = filter.clone();
            filter.older_than = older_than;
            self.get_notifications(&filter)
        })
    }

    // ---- templates ----

    pub fn get_template_by_id(&self, id: Uuid) -> Result<Template> {
        self.get(&format!("/v2/template/{}", id), &[])
    }

    pub fn get_template_version(&self, id: Uuid, version: i64) -> Result<Template> {
        if version < 1 {
            return Err(Error::configuration_with_context(
                format!("template version must be >= 1, got {}", version),
                ErrorContext::new()
                    .with_field_path("version")
                    .with_source("client"),
            ));
        }
        self.get(&format!("/v2/template/{}/version/{}", id, version), &[])
    }

    /// Latest version of every template, optionally of one type.
    pub fn get_all_templates(&self, template_type: Option<TemplateType>) -> Result<TemplateList> {
        let query: Vec<(&str, String)> = template_type
            .map(|t| vec![("type", t.to_string())])
            .unwrap_or_default();
        self.get("/v2/templates", &query)
    }

    pub fn generate_template_preview(
        &self,
        request: &TemplatePreviewRequest,
    ) -> Result<TemplatePreview> {
        self.post(
            &format!("/v2/template/{}/preview", request.template_id),
            request,
            OK,
        )
    }

    // ---- received text messages ----

    pub fn get_received_text_messages(
        &self,
        older_than: Option<Uuid>,
    ) -> Result<ReceivedTextMessageList> {
        let query: Vec<(&str, String)> = older_than
            .map(|id| vec![("older_than", id.to_string())])
            .unwrap_or_default();
        self.get("/v2/received-text-messages", &query)
    }

    pub fn received_text_messages_iter(&self) -> Pages<'_, ReceivedTextMessageList> {
        Pages::new(None, move |older_than| {
            self.get_received_text_messages(older_than)
        })
    }

    /// Drain [`received_text_messages_iter`](Self::received_text_messages_iter).
    pub fn all_received_text_messages(&self) -> Result<Vec<ReceivedTextMessage>> {
        self.received_text_messages_iter().collect()
    }

    // ---- plumbing ----

    fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned + Serialize + Validate,
    {
        let body = self.execute(Method::Get, path, query, None, OK)?;
        self.codec.deserialize(&body)
    }

    fn post<Req, T>(&self, path: &str, request: &Req, expected: u16) -> Result<T>
    where
        Req: Serialize + Validate,
        T: DeserializeOwned + Serialize + Validate,
    {
        let payload = self.codec.serialize(request)?;
        let body = self.execute(Method::Post, path, &[], Some(&payload), expected)?;
        self.codec.deserialize(&body)
    }

    /// Mint a token, send, and classify. Returns the body of an `expected`
    /// response.
    fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&[u8]>,
        expected: u16,
    ) -> Result<Bytes> {
        let url = self.url(path, query)?;
        let token = TokenIssuer::create(self.credential.service_id(), self.credential.secret(), None)?;

        self.sink.record(&ClientEvent::RequestStarted {
            method: method.as_str(),
            path: path.to_string(),
        });
        let started = Instant::now();

        let response = match self.transport.send(OutboundRequest {
            method,
            url: &url,
            token: &token,
            body,
        }) {
            Ok(response) => response,
            Err(e) => {
                self.sink.record(&ClientEvent::RequestFailed {
                    method: method.as_str(),
                    path: path.to_string(),
                    status: None,
                    message: e.to_string(),
                });
                return Err(e.into());
            }
        };

        let status = response.status;
        match classify(expected, response) {
            Ok(bytes) => {
                self.sink.record(&ClientEvent::RequestCompleted {
                    method: method.as_str(),
                    path: path.to_string(),
                    status,
                    elapsed_ms: started.elapsed().as_millis() as u64,
                });
                Ok(bytes)
            }
            Err(e) => {
                self.sink.record(&ClientEvent::RequestFailed {
                    method: method.as_str(),
                    path: path.to_string(),
                    status: Some(status),
                    message: e.message.clone(),
                });
                Err(e.into())
            }
        }
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let joined = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        let mut url = Url::parse(&joined).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid request URL '{}': {}", joined, e),
                ErrorContext::new().with_source("client"),
            )
        })?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }
}
