//! Templates and rendered previews.

use super::common::{Postage, TemplateType, Timestamp};
use crate::codec::rules::{Rules, Validate};
use crate::codec::tagged::{decode_variant, VariantDecoder};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateBase {
    pub id: Uuid,
    pub name: String,
    pub version: i64,
    pub body: String,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    pub created_by: String,
}

impl Validate for TemplateBase {
    fn validate(&self, rules: &mut Rules) {
        rules.non_empty("name", &self.name);
        rules.check("version", self.version >= 1, "must be >= 1");
        rules.timestamp("created_at", &self.created_at);
        rules.timestamp_if_present("updated_at", self.updated_at.as_ref());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsTemplate {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterTemplate {
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_contact_block: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postage: Option<Postage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TemplateKind {
    Email(EmailTemplate),
    Sms(SmsTemplate),
    Letter(LetterTemplate),
}

fn decode_email(v: &Value) -> serde_json::Result<TemplateKind> {
    EmailTemplate::deserialize(v).map(TemplateKind::Email)
}

fn decode_sms(v: &Value) -> serde_json::Result<TemplateKind> {
    SmsTemplate::deserialize(v).map(TemplateKind::Sms)
}

fn decode_letter(v: &Value) -> serde_json::Result<TemplateKind> {
    LetterTemplate::deserialize(v).map(TemplateKind::Letter)
}

const TEMPLATE_VARIANTS: &[(&str, VariantDecoder<TemplateKind>)] = &[
    ("email", decode_email),
    ("sms", decode_sms),
    ("letter", decode_letter),
];

impl Validate for TemplateKind {
    fn validate(&self, rules: &mut Rules) {
        match self {
            Self::Email(t) => rules.non_empty("subject", &t.subject),
            Self::Sms(_) => {}
            Self::Letter(t) => {
                rules.non_empty("subject", &t.subject);
                if let Some(p) = &t.postage {
                    rules.known("postage", p);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Template {
    #[serde(flatten)]
    pub base: TemplateBase,
    #[serde(flatten)]
    pub kind: TemplateKind,
}

impl Template {
    pub fn template_type(&self) -> TemplateType {
        match self.kind {
            TemplateKind::Email(_) => TemplateType::Email,
            TemplateKind::Sms(_) => TemplateType::Sms,
            TemplateKind::Letter(_) => TemplateType::Letter,
        }
    }

    /// Subject line; SMS templates have none.
    pub fn subject(&self) -> Option<&str> {
        match &self.kind {
            TemplateKind::Email(t) => Some(&t.subject),
            TemplateKind::Sms(_) => None,
            TemplateKind::Letter(t) => Some(&t.subject),
        }
    }
}

impl<'de> Deserialize<'de> for Template {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let kind =
            decode_variant(&value, "template", TEMPLATE_VARIANTS).map_err(D::Error::custom)?;
        let base = TemplateBase::deserialize(&value).map_err(D::Error::custom)?;
        Ok(Self { base, kind })
    }
}

impl Validate for Template {
    fn validate(&self, rules: &mut Rules) {
        self.base.validate(rules);
        self.kind.validate(rules);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateList {
    pub templates: Vec<Template>,
}

impl Validate for TemplateList {
    fn validate(&self, rules: &mut Rules) {
        rules.nested("templates", &self.templates);
    }
}

/// Rendered template from `POST /v2/template/{id}/preview`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePreview {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    pub version: i64,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postage: Option<Postage>,
}

impl Validate for TemplatePreview {
    fn validate(&self, rules: &mut Rules) {
        rules.known("type", &self.template_type);
        rules.check("version", self.version >= 1, "must be >= 1");
        if let Some(p) = &self.postage {
            rules.known("postage", p);
        }
    }
}
