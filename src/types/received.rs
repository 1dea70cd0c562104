//! Inbound text messages.

use super::common::{Links, Timestamp};
use crate::codec::rules::{Rules, Validate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedTextMessage {
    pub id: Uuid,
    /// Sender's number.
    pub user_number: String,
    /// The service number the message was sent to.
    pub notify_number: String,
    pub created_at: Timestamp,
    pub service_id: Uuid,
    pub content: String,
}

impl Validate for ReceivedTextMessage {
    fn validate(&self, rules: &mut Rules) {
        rules.non_empty("user_number", &self.user_number);
        rules.non_empty("notify_number", &self.notify_number);
        rules.timestamp("created_at", &self.created_at);
    }
}

/// One page of `GET /v2/received-text-messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedTextMessageList {
    pub received_text_messages: Vec<ReceivedTextMessage>,
    pub links: Links,
}

impl Validate for ReceivedTextMessageList {
    fn validate(&self, rules: &mut Rules) {
        rules.nested("received_text_messages", &self.received_text_messages);
        rules.nested("links", &self.links);
    }
}
