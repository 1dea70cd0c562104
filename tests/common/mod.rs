//! Mock HTTP server setup for integration tests

#![allow(dead_code)]

use mockito::{Server, ServerGuard};
use notify_client::telemetry::MemorySink;
use notify_client::{NotifyClient, NotifyClientBuilder};
use serde_json::{json, Value};
use std::sync::Arc;

pub const SERVICE_ID: &str = "26785a09-ab16-4eb0-8407-a37497a57506";
pub const SECRET: &str = "3d844edf-8d35-48ac-975b-e847b4f122b0";
pub const API_KEY: &str =
    "My_Key_1-26785a09-ab16-4eb0-8407-a37497a57506-3d844edf-8d35-48ac-975b-e847b4f122b0";

pub const NOTIFICATION_ID: &str = "740e5834-3a29-46b4-9a6f-16142fde533a";
pub const TEMPLATE_ID: &str = "5e427b42-4e98-46f3-a047-32c4a87d26bb";

/// `Authorization: Bearer <header>.<claims>.<signature>`
pub const BEARER_JWT: &str = r"^Bearer [A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+$";

/// Test fixture that manages a mock server
pub struct MockNotify {
    pub server: ServerGuard,
    pub sink: Arc<MemorySink>,
}

impl MockNotify {
    pub fn new() -> Self {
        init_tracing();
        Self {
            server: Server::new(),
            sink: Arc::new(MemorySink::new()),
        }
    }

    /// Builder pointed at the mock server, logging into `self.sink`.
    pub fn builder(&self) -> NotifyClientBuilder {
        NotifyClient::builder()
            .api_key(API_KEY)
            .base_url(self.server.url())
            .log_sink(self.sink.clone())
    }

    pub fn client(&self) -> NotifyClient {
        self.builder().build().expect("client builds")
    }
}

/// Install a `tracing` subscriber once; `RUST_LOG` controls the output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn template_ref() -> Value {
    json!({
        "id": TEMPLATE_ID,
        "version": 3,
        "uri": format!("https://api.example/v2/template/{}/version/3", TEMPLATE_ID)
    })
}

pub fn sms_notification(id: &str) -> Value {
    json!({
        "id": id,
        "reference": "order-42",
        "phone_number": "+447900900123",
        "type": "sms",
        "status": "delivered",
        "template": template_ref(),
        "body": "Your code is 123456",
        "created_at": "2024-01-02T03:04:05.000000Z",
        "created_by_name": null,
        "sent_at": "2024-01-02T03:04:06.000000Z",
        "completed_at": "2024-01-02T03:04:09.000000Z",
        "is_cost_data_ready": true,
        "cost_in_pounds": 0.0227,
        "cost_details": {
            "billable_sms_fragments": 1,
            "international_rate_multiplier": 1.0,
            "sms_rate": 0.0227
        }
    })
}

pub fn email_notification(id: &str) -> Value {
    json!({
        "id": id,
        "email_address": "someone@example.com",
        "type": "email",
        "status": "sending",
        "template": template_ref(),
        "body": "Hello Ada",
        "subject": "Welcome",
        "created_at": "2024-01-02T03:04:05.000000Z",
        "is_cost_data_ready": false,
        "cost_in_pounds": 0.0,
        "cost_details": {}
    })
}

pub fn letter_notification(id: &str) -> Value {
    json!({
        "id": id,
        "type": "letter",
        "status": "received",
        "line_1": "The Occupier",
        "line_2": "1 High Street",
        "line_3": "Exampletown",
        "postcode": "SW1A 1AA",
        "postage": "second",
        "template": template_ref(),
        "body": "Dear resident",
        "subject": "Council tax",
        "created_at": "2024-01-02T03:04:05.000000Z",
        "estimated_delivery": "2024-01-05T15:00:00.000000Z",
        "is_cost_data_ready": true,
        "cost_in_pounds": 0.85,
        "cost_details": {
            "billable_sheets_of_paper": 2,
            "postage": "second",
            "postage_rate": 0.85
        }
    })
}

pub fn page(key: &str, items: Vec<Value>, next: Option<&str>) -> String {
    let mut links = json!({"current": "https://api.example/v2/current"});
    if let Some(next) = next {
        links["next"] = json!(next);
    }
    json!({ key: items, "links": links }).to_string()
}

pub fn error_body(status: u16, errors: &[(&str, &str)]) -> String {
    let errors: Vec<Value> = errors
        .iter()
        .map(|(error, message)| json!({"error": error, "message": message}))
        .collect();
    json!({"status_code": status, "errors": errors}).to_string()
}
