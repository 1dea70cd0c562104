//! # Types Module
//!
//! Request envelopes and response models exchanged with the service.
//!
//! Every model is an immutable value built once per call. Optional wire
//! fields are `Option`s: an absent or `null` key is `None`, never an empty
//! string or zero.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`EmailRequest`], [`SmsRequest`], [`LetterRequest`] | Template-based sends |
//! | [`PrecompiledLetterRequest`] | Ready-rendered PDF letter |
//! | [`TemplatePreviewRequest`] | Render a template with personalisation |
//! | [`Notification`] | Tagged union over email, sms and letter notifications |
//! | [`Template`] | Tagged union over email, sms and letter templates |
//! | [`ReceivedTextMessage`] | Inbound SMS |
//!
//! ## Example
//!
//! ```rust
//! use notify_client::types::EmailRequest;
//! use uuid::Uuid;
//!
//! let request = EmailRequest::new(Uuid::new_v4(), "someone@example.com")
//!     .with_personalisation_value("name", "Ada")
//!     .with_reference("order-42");
//! assert_eq!(request.reference.as_deref(), Some("order-42"));
//! ```

pub mod common;
pub mod notification;
pub mod received;
pub mod request;
pub mod response;
pub mod template;

pub use common::{Links, Personalisation, Postage, TemplateRef, TemplateType, Timestamp};
pub use notification::{
    EmailDetails, EmailStatus, LetterCostDetails, LetterDetails, LetterStatus, Notification,
    NotificationBase, NotificationKind, NotificationList, SmsCostDetails, SmsDetails, SmsStatus,
};
pub use received::{ReceivedTextMessage, ReceivedTextMessageList};
pub use request::{
    EmailRequest, LetterRequest, NotificationFilter, PrecompiledLetterRequest, SmsRequest,
    TemplatePreviewRequest,
};
pub use response::{
    EmailContent, LetterContent, PrecompiledLetterResponse, SendEmailResponse,
    SendLetterResponse, SendSmsResponse, SmsContent,
};
pub use template::{
    EmailTemplate, LetterTemplate, SmsTemplate, Template, TemplateBase, TemplateKind,
    TemplateList, TemplatePreview,
};
