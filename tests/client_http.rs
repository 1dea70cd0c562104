//! End-to-end calls through the real blocking transport against a mock server.

mod common;

use common::*;
use mockito::Matcher;
use notify_client::telemetry::ClientEvent;
use notify_client::types::{
    EmailRequest, LetterRequest, NotificationFilter, PrecompiledLetterRequest, SmsRequest,
    TemplatePreviewRequest, TemplateType,
};
use notify_client::transport::TransportError;
use notify_client::{Error, ErrorClass, LetterAddressPolicy};
use std::io::Write;
use std::time::Duration;
use serde_json::json;
use uuid::Uuid;

fn template_id() -> Uuid {
    Uuid::parse_str(TEMPLATE_ID).unwrap()
}

fn notification_id() -> Uuid {
    Uuid::parse_str(NOTIFICATION_ID).unwrap()
}

#[test]
fn send_email_posts_signed_json() {
    let mut mock = MockNotify::new();
    let m = mock
        .server
        .mock("POST", "/v2/notifications/email")
        .match_header("authorization", Matcher::Regex(BEARER_JWT.into()))
        .match_header("content-type", "application/json")
        .match_header("user-agent", Matcher::Regex("^NOTIFY-API-RUST-CLIENT/".into()))
        .match_body(Matcher::Json(json!({
            "email_address": "someone@example.com",
            "template_id": TEMPLATE_ID,
            "personalisation": {"name": "Ada"},
            "reference": "order-42"
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": NOTIFICATION_ID,
                "reference": "order-42",
                "content": {
                    "body": "Hello Ada",
                    "subject": "Welcome",
                    "from_email": "service@notifications.example"
                },
                "template": template_ref(),
                "uri": format!("https://api.example/v2/notifications/{}", NOTIFICATION_ID)
            })
            .to_string(),
        )
        .create();

    let client = mock.client();
    let request = EmailRequest::new(template_id(), "someone@example.com")
        .with_personalisation_value("name", "Ada")
        .with_reference("order-42");
    let response = client.send_email(&request).unwrap();

    m.assert();
    assert_eq!(response.id, notification_id());
    assert_eq!(response.content.subject, "Welcome");
    assert_eq!(response.template.version, 3);

    let events = mock.sink.events();
    assert!(matches!(
        &events[..],
        [
            ClientEvent::RequestStarted { method: "POST", .. },
            ClientEvent::RequestCompleted { status: 201, .. }
        ]
    ));
}

#[test]
fn send_sms_missing_personalisation_is_a_bad_request() {
    let mut mock = MockNotify::new();
    let m = mock
        .server
        .mock("POST", "/v2/notifications/sms")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(error_body(
            400,
            &[("BadRequestError", "Missing personalisation: name")],
        ))
        .create();

    let err = mock
        .client()
        .send_sms(&SmsRequest::new(template_id(), "+447900900123"))
        .unwrap_err();

    m.assert();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.class(), Some(ErrorClass::BadRequest));
    match err {
        Error::Http(http) => {
            assert_eq!(http.message, "BadRequestError: Missing personalisation: name");
            assert_eq!(http.errors[0].error, "BadRequestError");
        }
        other => panic!("expected HTTP error, got {:?}", other),
    }
}

#[test]
fn invalid_request_never_reaches_the_server() {
    let mut mock = MockNotify::new();
    let m = mock
        .server
        .mock("POST", "/v2/notifications/letter")
        .expect(0)
        .create();

    let request = LetterRequest::new(template_id())
        .with_personalisation_value("address_line_1", "The Occupier")
        .with_personalisation_value("address_line_3", "SW1A 1AA");
    let err = mock.client().send_letter(&request).unwrap_err();

    m.assert();
    let violations = err.violations().expect("validation error");
    assert!(violations.contains_path("personalisation.address_line_2"));
    assert!(mock.sink.events().is_empty());
}

#[test]
fn warn_policy_lets_short_letters_through() {
    let mut mock = MockNotify::new();
    let m = mock
        .server
        .mock("POST", "/v2/notifications/letter")
        .with_status(201)
        .with_body(
            json!({
                "id": NOTIFICATION_ID,
                "reference": null,
                "content": {"body": "Dear resident", "subject": "Council tax"},
                "template": template_ref(),
                "uri": format!("https://api.example/v2/notifications/{}", NOTIFICATION_ID),
                "scheduled_for": null
            })
            .to_string(),
        )
        .create();

    let client = mock
        .builder()
        .letter_address_policy(LetterAddressPolicy::Warn)
        .build()
        .unwrap();
    let request = LetterRequest::new(template_id())
        .with_personalisation_value("address_line_1", "The Occupier")
        .with_personalisation_value("address_line_2", "SW1A 1AA");
    let response = client.send_letter(&request).unwrap();

    m.assert();
    assert_eq!(response.content.subject, "Council tax");
    assert!(mock.sink.events().iter().any(|e| matches!(
        e,
        ClientEvent::ValidationWarning { path, .. } if path == "personalisation.address_line_3"
    )));
}

#[test]
fn precompiled_letter_sends_base64_content() {
    let mut mock = MockNotify::new();
    let m = mock
        .server
        .mock("POST", "/v2/notifications/letter")
        .match_body(Matcher::Json(json!({
            "reference": "invoice-7",
            "content": "JVBERi0xLjQ=",
            "postage": "first"
        })))
        .with_status(201)
        .with_body(
            json!({"id": NOTIFICATION_ID, "reference": "invoice-7", "postage": "first"})
                .to_string(),
        )
        .create();

    let request = PrecompiledLetterRequest::from_pdf("invoice-7", b"%PDF-1.4")
        .with_postage(notify_client::types::Postage::First);
    let response = mock.client().send_precompiled_letter(&request).unwrap();

    m.assert();
    assert_eq!(response.reference, "invoice-7");
}

#[test]
fn fetched_sms_exposes_only_sms_fields() {
    let mut mock = MockNotify::new();
    let m = mock
        .server
        .mock("GET", format!("/v2/notifications/{}", NOTIFICATION_ID).as_str())
        .match_header("authorization", Matcher::Regex(BEARER_JWT.into()))
        .with_status(200)
        .with_body(sms_notification(NOTIFICATION_ID).to_string())
        .create();

    let notification = mock.client().get_notification_by_id(notification_id()).unwrap();

    m.assert();
    assert_eq!(notification.notification_type(), TemplateType::Sms);
    assert_eq!(notification.status(), "delivered");
    let sms = notification.as_sms().expect("sms details");
    assert_eq!(sms.phone_number, "+447900900123");
    assert_eq!(
        sms.cost_details.as_ref().and_then(|c| c.billable_sms_fragments),
        Some(1)
    );
    assert!(notification.as_email().is_none());
    assert!(notification.as_letter().is_none());
}

#[test]
fn fetched_letter_keeps_address_lines() {
    let mut mock = MockNotify::new();
    let _m = mock
        .server
        .mock("GET", format!("/v2/notifications/{}", NOTIFICATION_ID).as_str())
        .with_status(200)
        .with_body(letter_notification(NOTIFICATION_ID).to_string())
        .create();

    let notification = mock.client().get_notification_by_id(notification_id()).unwrap();
    let letter = notification.as_letter().expect("letter details");
    assert_eq!(
        letter.address_lines(),
        vec!["The Occupier", "1 High Street", "Exampletown"]
    );
    assert!(notification.base.estimated_delivery.is_some());
}

#[test]
fn unknown_notification_type_is_a_serialization_error() {
    let mut mock = MockNotify::new();
    let mut body = sms_notification(NOTIFICATION_ID);
    body["type"] = json!("fax");
    let _m = mock
        .server
        .mock("GET", format!("/v2/notifications/{}", NOTIFICATION_ID).as_str())
        .with_status(200)
        .with_body(body.to_string())
        .create();

    let err = mock
        .client()
        .get_notification_by_id(notification_id())
        .unwrap_err();
    assert!(matches!(err, Error::Serialization { .. }));
    assert!(err.to_string().contains("fax"), "{}", err);
}

#[test]
fn strict_mode_rejects_undeclared_fields() {
    let mut mock = MockNotify::new();
    let mut body = sms_notification(NOTIFICATION_ID);
    body["postage"] = json!("first");
    let _m = mock
        .server
        .mock("GET", format!("/v2/notifications/{}", NOTIFICATION_ID).as_str())
        .with_status(200)
        .with_body(body.to_string())
        .expect(2)
        .create();

    assert!(mock
        .client()
        .get_notification_by_id(notification_id())
        .is_ok());

    let strict = mock.builder().strict_unknown_fields(true).build().unwrap();
    let err = strict.get_notification_by_id(notification_id()).unwrap_err();
    assert!(err.to_string().contains("postage"), "{}", err);
}

#[test]
fn list_filter_becomes_query_string() {
    let mut mock = MockNotify::new();
    let m = mock
        .server
        .mock("GET", "/v2/notifications")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("status".into(), "delivered".into()),
            Matcher::UrlEncoded("template_type".into(), "email".into()),
            Matcher::UrlEncoded("reference".into(), "order 42".into()),
        ]))
        .with_status(200)
        .with_body(page(
            "notifications",
            vec![email_notification(NOTIFICATION_ID)],
            None,
        ))
        .create();

    let filter = NotificationFilter::new()
        .status("delivered")
        .template_type(TemplateType::Email)
        .reference("order 42");
    let list = mock.client().get_notifications(&filter).unwrap();

    m.assert();
    assert_eq!(list.notifications.len(), 1);
    assert_eq!(
        list.notifications[0].as_email().unwrap().subject.as_deref(),
        Some("Welcome")
    );
    assert!(!list.links.has_next());
}

#[test]
fn notifications_iter_follows_older_than() {
    let first = "11111111-1111-4111-8111-111111111111";
    let second = "22222222-2222-4222-8222-222222222222";
    let third = "33333333-3333-4333-8333-333333333333";

    let mut mock = MockNotify::new();
    let page_one = mock
        .server
        .mock("GET", "/v2/notifications")
        .match_query(Matcher::Missing)
        .with_status(200)
        .with_body(page(
            "notifications",
            vec![sms_notification(first), email_notification(second)],
            Some("https://api.example/v2/notifications?older_than=2"),
        ))
        .create();
    let page_two = mock
        .server
        .mock("GET", "/v2/notifications")
        .match_query(Matcher::UrlEncoded("older_than".into(), second.into()))
        .with_status(200)
        .with_body(page(
            "notifications",
            vec![letter_notification(third)],
            None,
        ))
        .create();

    let client = mock.client();
    let ids: Vec<String> = client
        .notifications_iter(NotificationFilter::new())
        .map(|n| n.unwrap().id().to_string())
        .collect();

    page_one.assert();
    page_two.assert();
    assert_eq!(ids, vec![first, second, third]);
}

#[test]
fn received_text_messages_iter_yields_error_once() {
    let mut mock = MockNotify::new();
    let _page = mock
        .server
        .mock("GET", "/v2/received-text-messages")
        .match_query(Matcher::Missing)
        .with_status(200)
        .with_body(page(
            "received_text_messages",
            vec![json!({
                "id": NOTIFICATION_ID,
                "user_number": "447700900111",
                "notify_number": "07700900000",
                "created_at": "2024-03-01T12:00:00.000000Z",
                "service_id": SERVICE_ID,
                "content": "STOP"
            })],
            Some("https://api.example/v2/received-text-messages?older_than=x"),
        ))
        .create();
    let _fail = mock
        .server
        .mock("GET", "/v2/received-text-messages")
        .match_query(Matcher::UrlEncoded("older_than".into(), NOTIFICATION_ID.into()))
        .with_status(500)
        .with_body(error_body(500, &[("Exception", "Internal server error")]))
        .create();

    let client = mock.client();
    let results: Vec<_> = client.received_text_messages_iter().collect();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_ref().unwrap().content, "STOP");
    let err = results[1].as_ref().unwrap_err();
    assert_eq!(err.class(), Some(ErrorClass::ServerError));
}

#[test]
fn letter_pdf_is_returned_raw() {
    let mut mock = MockNotify::new();
    let _m = mock
        .server
        .mock("GET", format!("/v2/notifications/{}/pdf", NOTIFICATION_ID).as_str())
        .with_status(200)
        .with_header("content-type", "application/pdf")
        .with_body(b"%PDF-1.4 fake")
        .create();

    let pdf = mock.client().get_pdf_for_letter(notification_id()).unwrap();
    assert_eq!(&pdf[..], b"%PDF-1.4 fake");
}

#[test]
fn letter_pdf_not_ready_is_distinguishable() {
    let mut mock = MockNotify::new();
    let _m = mock
        .server
        .mock("GET", format!("/v2/notifications/{}/pdf", NOTIFICATION_ID).as_str())
        .with_status(400)
        .with_body(error_body(
            400,
            &[("PDFNotReadyError", "PDF not available yet, try again later")],
        ))
        .create();

    let err = mock.client().get_pdf_for_letter(notification_id()).unwrap_err();
    assert!(err.is_pdf_not_ready());
    assert_eq!(err.status(), Some(400));
}

#[test]
fn auth_failure_is_classified() {
    let mut mock = MockNotify::new();
    let _m = mock
        .server
        .mock("GET", format!("/v2/template/{}", TEMPLATE_ID).as_str())
        .with_status(403)
        .with_body(error_body(
            403,
            &[("AuthError", "Invalid token: API key not found")],
        ))
        .create();

    let err = mock.client().get_template_by_id(template_id()).unwrap_err();
    assert_eq!(err.class(), Some(ErrorClass::Auth));
    assert_eq!(
        err.to_string(),
        "HTTP 403 (auth): AuthError: Invalid token: API key not found"
    );
}

#[test]
fn templates_by_type_and_version() {
    let mut mock = MockNotify::new();
    let template = json!({
        "id": TEMPLATE_ID,
        "name": "Council tax",
        "type": "letter",
        "version": 2,
        "body": "Dear ((name))",
        "created_at": "2023-11-01T10:00:00.000000Z",
        "updated_at": "2023-12-01T10:00:00.000000Z",
        "created_by": "ada@example.com",
        "subject": "Council tax",
        "letter_contact_block": "Ministry of Examples",
        "postage": "second"
    });
    let all = mock
        .server
        .mock("GET", "/v2/templates")
        .match_query(Matcher::UrlEncoded("type".into(), "letter".into()))
        .with_status(200)
        .with_body(json!({ "templates": [template.clone()] }).to_string())
        .create();
    let version = mock
        .server
        .mock("GET", format!("/v2/template/{}/version/2", TEMPLATE_ID).as_str())
        .with_status(200)
        .with_body(template.to_string())
        .create();

    let client = mock.client();
    let list = client.get_all_templates(Some(TemplateType::Letter)).unwrap();
    let one = client.get_template_version(template_id(), 2).unwrap();

    all.assert();
    version.assert();
    assert_eq!(list.templates.len(), 1);
    assert_eq!(one.template_type(), TemplateType::Letter);
    assert_eq!(one.subject(), Some("Council tax"));
    assert_eq!(one.base.version, 2);
}

#[test]
fn template_preview_posts_personalisation() {
    let mut mock = MockNotify::new();
    let m = mock
        .server
        .mock("POST", format!("/v2/template/{}/preview", TEMPLATE_ID).as_str())
        .match_body(Matcher::Json(json!({"personalisation": {"name": "Ada"}})))
        .with_status(200)
        .with_body(
            json!({
                "id": TEMPLATE_ID,
                "type": "email",
                "version": 3,
                "body": "Hello Ada",
                "subject": "Welcome",
                "html": "<p>Hello Ada</p>"
            })
            .to_string(),
        )
        .create();

    let preview = mock
        .client()
        .generate_template_preview(
            &TemplatePreviewRequest::new(template_id()).with_personalisation_value("name", "Ada"),
        )
        .unwrap();

    m.assert();
    assert_eq!(preview.template_type, TemplateType::Email);
    assert_eq!(preview.body, "Hello Ada");
}

#[test]
fn unreachable_server_is_a_transport_error() {
    let client = notify_client::NotifyClient::builder()
        .api_key(API_KEY)
        .base_url("http://127.0.0.1:1")
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    let err = client.get_template_by_id(template_id()).unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "{:?}", err);
    assert_eq!(err.status(), None);
}

#[test]
fn slow_response_is_a_timeout() {
    let mut mock = MockNotify::new();
    let _m = mock
        .server
        .mock("GET", format!("/v2/template/{}", TEMPLATE_ID).as_str())
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_millis(1500));
            w.write_all(b"{}")
        })
        .create();

    let client = mock
        .builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let err = client.get_template_by_id(template_id()).unwrap_err();
    assert!(
        matches!(err, Error::Transport(TransportError::Timeout(_))),
        "{:?}",
        err
    );
    assert!(mock.sink.events().iter().any(|e| matches!(
        e,
        ClientEvent::RequestFailed { status: None, .. }
    )));
}

#[test]
fn strict_client_accepts_real_email_bodies() {
    let mut mock = MockNotify::new();
    let _m = mock
        .server
        .mock("GET", format!("/v2/notifications/{}", NOTIFICATION_ID).as_str())
        .with_status(200)
        .with_body(email_notification(NOTIFICATION_ID).to_string())
        .create();

    let client = mock.builder().strict_unknown_fields(true).build().unwrap();
    let notification = client.get_notification_by_id(notification_id()).unwrap();
    assert!(notification.as_email().unwrap().cost_details.is_some());
}
