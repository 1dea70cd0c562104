//! Notification status responses.
//!
//! A notification is a shared [`NotificationBase`] plus one channel-specific
//! payload chosen by the `type` field.

use super::common::{string_enum, Links, Postage, TemplateRef, TemplateType, Timestamp};
use crate::codec::rules::{Rules, Validate, EMAIL_ADDRESS, PHONE_NUMBER};
use crate::codec::tagged::{decode_variant, VariantDecoder};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

string_enum! {
    pub enum EmailStatus {
        Created => "created",
        Sending => "sending",
        Delivered => "delivered",
        PermanentFailure => "permanent-failure",
        TemporaryFailure => "temporary-failure",
        TechnicalFailure => "technical-failure",
    }
}

string_enum! {
    pub enum SmsStatus {
        Created => "created",
        Sending => "sending",
        Pending => "pending",
        Sent => "sent",
        Delivered => "delivered",
        PermanentFailure => "permanent-failure",
        TemporaryFailure => "temporary-failure",
        TechnicalFailure => "technical-failure",
    }
}

string_enum! {
    pub enum LetterStatus {
        Accepted => "accepted",
        Received => "received",
        Cancelled => "cancelled",
        PendingVirusCheck => "pending-virus-check",
        VirusScanFailed => "virus-scan-failed",
        ValidationFailed => "validation-failed",
        TechnicalFailure => "technical-failure",
        PermanentFailure => "permanent-failure",
    }
}

/// Fields every notification carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationBase {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub template: TemplateRef,
    pub body: String,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<Timestamp>,
    #[serde(rename = "is_cost_data_ready")]
    pub cost_ready: bool,
    pub cost_in_pounds: f64,
}

impl Validate for NotificationBase {
    fn validate(&self, rules: &mut Rules) {
        rules.non_empty_if_present("reference", self.reference.as_deref());
        rules.nested("template", &self.template);
        rules.timestamp("created_at", &self.created_at);
        rules.timestamp_if_present("sent_at", self.sent_at.as_ref());
        rules.timestamp_if_present("completed_at", self.completed_at.as_ref());
        rules.timestamp_if_present("estimated_delivery", self.estimated_delivery.as_ref());
        rules.non_negative_f64("cost_in_pounds", self.cost_in_pounds);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailDetails {
    pub email_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub status: EmailStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_click_unsubscribe_url: Option<String>,
    /// Usually `{}` for email. Whatever keys arrive are kept as sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_details: Option<serde_json::Map<String, Value>>,
}

impl Validate for EmailDetails {
    fn validate(&self, rules: &mut Rules) {
        rules.matches(
            "email_address",
            &self.email_address,
            &EMAIL_ADDRESS,
            "is not an email address",
        );
        rules.known("status", &self.status);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmsCostDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billable_sms_fragments: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub international_rate_multiplier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_rate: Option<f64>,
}

impl Validate for SmsCostDetails {
    fn validate(&self, rules: &mut Rules) {
        if let Some(n) = self.billable_sms_fragments {
            rules.non_negative("billable_sms_fragments", n);
        }
        if let Some(m) = self.international_rate_multiplier {
            rules.non_negative_f64("international_rate_multiplier", m);
        }
        if let Some(r) = self.sms_rate {
            rules.non_negative_f64("sms_rate", r);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmsDetails {
    pub phone_number: String,
    pub status: SmsStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_details: Option<SmsCostDetails>,
}

impl Validate for SmsDetails {
    fn validate(&self, rules: &mut Rules) {
        rules.matches(
            "phone_number",
            &self.phone_number,
            &PHONE_NUMBER,
            "must contain only digits, '+', '(' and ')'",
        );
        rules.known("status", &self.status);
        rules.nested_if_present("cost_details", self.cost_details.as_ref());
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterCostDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billable_sheets_of_paper: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postage: Option<Postage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postage_rate: Option<f64>,
}

impl Validate for LetterCostDetails {
    fn validate(&self, rules: &mut Rules) {
        if let Some(n) = self.billable_sheets_of_paper {
            rules.non_negative("billable_sheets_of_paper", n);
        }
        if let Some(p) = &self.postage {
            rules.known("postage", p);
        }
        if let Some(r) = self.postage_rate {
            rules.non_negative_f64("postage_rate", r);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_4: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_5: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_6: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_7: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postage: Option<Postage>,
    pub status: LetterStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_details: Option<LetterCostDetails>,
}

impl LetterDetails {
    /// Present address lines, in order.
    pub fn address_lines(&self) -> Vec<&str> {
        [
            &self.line_1,
            &self.line_2,
            &self.line_3,
            &self.line_4,
            &self.line_5,
            &self.line_6,
            &self.line_7,
        ]
        .into_iter()
        .filter_map(|l| l.as_deref())
        .collect()
    }
}

impl Validate for LetterDetails {
    fn validate(&self, rules: &mut Rules) {
        if let Some(p) = &self.postage {
            rules.known("postage", p);
        }
        rules.known("status", &self.status);
        rules.nested_if_present("cost_details", self.cost_details.as_ref());
    }
}

/// Channel-specific payload, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NotificationKind {
    Email(EmailDetails),
    Sms(SmsDetails),
    Letter(LetterDetails),
}

fn decode_email(v: &Value) -> serde_json::Result<NotificationKind> {
    EmailDetails::deserialize(v).map(NotificationKind::Email)
}

fn decode_sms(v: &Value) -> serde_json::Result<NotificationKind> {
    SmsDetails::deserialize(v).map(NotificationKind::Sms)
}

fn decode_letter(v: &Value) -> serde_json::Result<NotificationKind> {
    LetterDetails::deserialize(v).map(NotificationKind::Letter)
}

const NOTIFICATION_VARIANTS: &[(&str, VariantDecoder<NotificationKind>)] = &[
    ("email", decode_email),
    ("sms", decode_sms),
    ("letter", decode_letter),
];

impl Validate for NotificationKind {
    fn validate(&self, rules: &mut Rules) {
        match self {
            Self::Email(d) => d.validate(rules),
            Self::Sms(d) => d.validate(rules),
            Self::Letter(d) => d.validate(rules),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    #[serde(flatten)]
    pub base: NotificationBase,
    #[serde(flatten)]
    pub kind: NotificationKind,
}

impl Notification {
    pub fn id(&self) -> Uuid {
        self.base.id
    }

    pub fn notification_type(&self) -> TemplateType {
        match self.kind {
            NotificationKind::Email(_) => TemplateType::Email,
            NotificationKind::Sms(_) => TemplateType::Sms,
            NotificationKind::Letter(_) => TemplateType::Letter,
        }
    }

    /// Wire status string, whatever the channel.
    pub fn status(&self) -> &str {
        match &self.kind {
            NotificationKind::Email(d) => d.status.as_str(),
            NotificationKind::Sms(d) => d.status.as_str(),
            NotificationKind::Letter(d) => d.status.as_str(),
        }
    }

    pub fn as_email(&self) -> Option<&EmailDetails> {
        match &self.kind {
            NotificationKind::Email(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_sms(&self) -> Option<&SmsDetails> {
        match &self.kind {
            NotificationKind::Sms(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_letter(&self) -> Option<&LetterDetails> {
        match &self.kind {
            NotificationKind::Letter(d) => Some(d),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Notification {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let kind = decode_variant(&value, "notification", NOTIFICATION_VARIANTS)
            .map_err(D::Error::custom)?;
        let base = NotificationBase::deserialize(&value).map_err(D::Error::custom)?;
        Ok(Self { base, kind })
    }
}

impl Validate for Notification {
    fn validate(&self, rules: &mut Rules) {
        self.base.validate(rules);
        self.kind.validate(rules);
    }
}

/// One page of `GET /v2/notifications`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationList {
    pub notifications: Vec<Notification>,
    pub links: Links,
}

impl Validate for NotificationList {
    fn validate(&self, rules: &mut Rules) {
        rules.nested("notifications", &self.notifications);
        rules.nested("links", &self.links);
    }
}
