//! Outgoing request envelopes.

use super::common::{Personalisation, Postage, TemplateType};
use crate::codec::rules::{Rules, Validate, EMAIL_ADDRESS, PHONE_NUMBER};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `POST /v2/notifications/email`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailRequest {
    pub email_address: String,
    pub template_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personalisation: Option<Personalisation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Reply-to address configured on the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_reply_to_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_click_unsubscribe_url: Option<String>,
}

impl EmailRequest {
    pub fn new(template_id: Uuid, email_address: impl Into<String>) -> Self {
        Self {
            email_address: email_address.into(),
            template_id,
            personalisation: None,
            reference: None,
            email_reply_to_id: None,
            one_click_unsubscribe_url: None,
        }
    }

    pub fn with_personalisation(mut self, personalisation: Personalisation) -> Self {
        self.personalisation = Some(personalisation);
        self
    }

    pub fn with_personalisation_value(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.personalisation
            .get_or_insert_with(Personalisation::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_reply_to(mut self, email_reply_to_id: Uuid) -> Self {
        self.email_reply_to_id = Some(email_reply_to_id);
        self
    }

    pub fn with_unsubscribe_url(mut self, url: impl Into<String>) -> Self {
        self.one_click_unsubscribe_url = Some(url.into());
        self
    }
}

impl Validate for EmailRequest {
    fn validate(&self, rules: &mut Rules) {
        rules.matches(
            "email_address",
            &self.email_address,
            &EMAIL_ADDRESS,
            "is not an email address",
        );
        rules.check("template_id", !self.template_id.is_nil(), "must not be the nil UUID");
        rules.non_empty_if_present("reference", self.reference.as_deref());
        if let Some(u) = &self.one_click_unsubscribe_url {
            rules.check(
                "one_click_unsubscribe_url",
                url::Url::parse(u).is_ok(),
                "is not an absolute URL",
            );
        }
    }
}

/// `POST /v2/notifications/sms`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmsRequest {
    pub phone_number: String,
    pub template_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personalisation: Option<Personalisation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_sender_id: Option<Uuid>,
}

impl SmsRequest {
    pub fn new(template_id: Uuid, phone_number: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            template_id,
            personalisation: None,
            reference: None,
            sms_sender_id: None,
        }
    }

    pub fn with_personalisation(mut self, personalisation: Personalisation) -> Self {
        self.personalisation = Some(personalisation);
        self
    }

    pub fn with_personalisation_value(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.personalisation
            .get_or_insert_with(Personalisation::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_sender(mut self, sms_sender_id: Uuid) -> Self {
        self.sms_sender_id = Some(sms_sender_id);
        self
    }
}

impl Validate for SmsRequest {
    fn validate(&self, rules: &mut Rules) {
        rules.matches(
            "phone_number",
            &self.phone_number,
            &PHONE_NUMBER,
            "must contain only digits, '+', '(' and ')'",
        );
        rules.check("template_id", !self.template_id.is_nil(), "must not be the nil UUID");
        rules.non_empty_if_present("reference", self.reference.as_deref());
    }
}

/// `POST /v2/notifications/letter` from a template. The address comes from
/// the `address_line_*` personalisation keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterRequest {
    pub template_id: Uuid,
    pub personalisation: Personalisation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl LetterRequest {
    pub fn new(template_id: Uuid) -> Self {
        Self {
            template_id,
            personalisation: Personalisation::new(),
            reference: None,
        }
    }

    pub fn with_personalisation(mut self, personalisation: Personalisation) -> Self {
        self.personalisation = personalisation;
        self
    }

    pub fn with_personalisation_value(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.personalisation.insert(key.into(), value.into());
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

impl Validate for LetterRequest {
    fn validate(&self, rules: &mut Rules) {
        rules.check("template_id", !self.template_id.is_nil(), "must not be the nil UUID");
        rules.address_lines("personalisation", &self.personalisation);
        rules.non_empty_if_present("reference", self.reference.as_deref());
    }
}

/// `POST /v2/notifications/letter` with a ready-rendered document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecompiledLetterRequest {
    pub reference: String,
    /// Base64 (standard alphabet) encoded PDF.
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postage: Option<Postage>,
}

impl PrecompiledLetterRequest {
    pub fn new(reference: impl Into<String>, base64_content: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            content: base64_content.into(),
            postage: None,
        }
    }

    /// Encode raw document bytes.
    pub fn from_pdf(reference: impl Into<String>, pdf: &[u8]) -> Self {
        Self::new(
            reference,
            base64::engine::general_purpose::STANDARD.encode(pdf),
        )
    }

    pub fn with_postage(mut self, postage: Postage) -> Self {
        self.postage = Some(postage);
        self
    }
}

impl Validate for PrecompiledLetterRequest {
    fn validate(&self, rules: &mut Rules) {
        rules.non_empty("reference", &self.reference);
        if self.content.is_empty() {
            rules.check("content", false, "must not be empty");
        } else {
            rules.check(
                "content",
                base64::engine::general_purpose::STANDARD
                    .decode(&self.content)
                    .is_ok(),
                "must be base64 encoded",
            );
        }
        if let Some(p) = &self.postage {
            rules.known("postage", p);
        }
    }
}

/// `POST /v2/template/{id}/preview`. The id travels in the path only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplatePreviewRequest {
    #[serde(skip)]
    pub template_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personalisation: Option<Personalisation>,
}

impl TemplatePreviewRequest {
    pub fn new(template_id: Uuid) -> Self {
        Self {
            template_id,
            personalisation: None,
        }
    }

    pub fn with_personalisation(mut self, personalisation: Personalisation) -> Self {
        self.personalisation = Some(personalisation);
        self
    }

    pub fn with_personalisation_value(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.personalisation
            .get_or_insert_with(Personalisation::new)
            .insert(key.into(), value.into());
        self
    }
}

impl Validate for TemplatePreviewRequest {
    fn validate(&self, rules: &mut Rules) {
        rules.check("template_id", !self.template_id.is_nil(), "must not be the nil UUID");
    }
}

/// Query of `GET /v2/notifications`. Absent values are left out of the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationFilter {
    pub status: Option<String>,
    pub template_type: Option<TemplateType>,
    pub reference: Option<String>,
    /// Only notifications older than this one (exclusive).
    pub older_than: Option<Uuid>,
    pub include_jobs: Option<bool>,
}

impl NotificationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn template_type(mut self, template_type: TemplateType) -> Self {
        self.template_type = Some(template_type);
        self
    }

    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn older_than(mut self, id: Uuid) -> Self {
        self.older_than = Some(id);
        self
    }

    pub fn include_jobs(mut self, include: bool) -> Self {
        self.include_jobs = Some(include);
        self
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(s) = &self.status {
            pairs.push(("status", s.clone()));
        }
        if let Some(t) = &self.template_type {
            pairs.push(("template_type", t.to_string()));
        }
        if let Some(r) = &self.reference {
            pairs.push(("reference", r.clone()));
        }
        if let Some(id) = &self.older_than {
            pairs.push(("older_than", id.to_string()));
        }
        if let Some(jobs) = self.include_jobs {
            pairs.push(("include_jobs", jobs.to_string()));
        }
        pairs
    }
}
