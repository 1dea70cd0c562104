//! Responses to the send endpoints (`201 Created`).

use super::common::{Postage, TemplateRef, Timestamp};
use crate::codec::rules::{Rules, Validate, EMAIL_ADDRESS};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailContent {
    pub body: String,
    pub subject: String,
    pub from_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_click_unsubscribe_url: Option<String>,
}

impl Validate for EmailContent {
    fn validate(&self, rules: &mut Rules) {
        rules.matches(
            "from_email",
            &self.from_email,
            &EMAIL_ADDRESS,
            "is not an email address",
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendEmailResponse {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub content: EmailContent,
    pub template: TemplateRef,
    pub uri: String,
}

impl Validate for SendEmailResponse {
    fn validate(&self, rules: &mut Rules) {
        rules.nested("content", &self.content);
        rules.nested("template", &self.template);
        rules.non_empty("uri", &self.uri);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsContent {
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendSmsResponse {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub content: SmsContent,
    pub template: TemplateRef,
    pub uri: String,
}

impl Validate for SendSmsResponse {
    fn validate(&self, rules: &mut Rules) {
        rules.non_empty_if_present("content.from_number", self.content.from_number.as_deref());
        rules.nested("template", &self.template);
        rules.non_empty("uri", &self.uri);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterContent {
    pub body: String,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendLetterResponse {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub content: LetterContent,
    pub template: TemplateRef,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<Timestamp>,
}

impl Validate for SendLetterResponse {
    fn validate(&self, rules: &mut Rules) {
        rules.nested("template", &self.template);
        rules.non_empty("uri", &self.uri);
        rules.timestamp_if_present("scheduled_for", self.scheduled_for.as_ref());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecompiledLetterResponse {
    pub id: Uuid,
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postage: Option<Postage>,
}

impl Validate for PrecompiledLetterResponse {
    fn validate(&self, rules: &mut Rules) {
        rules.non_empty("reference", &self.reference);
        if let Some(p) = &self.postage {
            rules.known("postage", p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Codec, CodecConfig};
    use serde_json::json;

    #[test]
    fn precompiled_response_requires_reference() {
        let body = json!({"id": "740e5834-3a29-46b4-9a6f-16142fde533a", "reference": ""});
        let err = Codec::new(CodecConfig::default())
            .deserialize::<PrecompiledLetterResponse>(&serde_json::to_vec(&body).unwrap())
            .unwrap_err();
        assert_eq!(err.violations().unwrap().paths(), vec!["reference"]);
    }

    #[test]
    fn precompiled_response_missing_reference_is_a_shape_error() {
        let body = json!({"id": "740e5834-3a29-46b4-9a6f-16142fde533a", "reference": null});
        let err = Codec::new(CodecConfig::default())
            .deserialize::<PrecompiledLetterResponse>(&serde_json::to_vec(&body).unwrap())
            .unwrap_err();
        assert!(matches!(err, crate::Error::Serialization { .. }));
    }

    #[test]
    fn letter_response_keeps_optional_schedule_absent() {
        let body = json!({
            "id": "740e5834-3a29-46b4-9a6f-16142fde533a",
            "content": {"body": "Dear Ada", "subject": "Your licence"},
            "template": {"id": "5e427b42-4e98-46f3-a047-32c4a87d26bb", "version": 1, "uri": "u"},
            "uri": "https://api.example/v2/notifications/740e5834-3a29-46b4-9a6f-16142fde533a",
            "scheduled_for": null
        });
        let r: SendLetterResponse = serde_json::from_value(body).unwrap();
        assert!(r.scheduled_for.is_none());
        assert!(r.reference.is_none());
    }
}
