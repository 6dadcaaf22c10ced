use std::time::Duration;

use serde_json::{json, Value};
use wiremock::{
    matchers::{any, body_partial_json, method, path},
    Mock, ResponseTemplate,
};

use crate::helper::{spawn_app, spawn_app_with, BUSINESS_EMAIL};

const VALID_BODY: &str =
    r#"{"name": "A", "email": "a@b.com", "phone": "07700900000", "message": "hi"}"#;

async fn accept_all_emails(app: &crate::helper::TestApp) {
    Mock::given(path("/emails"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.email_server)
        .await;
}

#[tokio::test]
async fn contact_returns_200_for_valid_form_data() {
    let app = spawn_app().await;

    Mock::given(path("/emails"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.email_server)
        .await;

    let response = app.post_contact(VALID_BODY).await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({"success": true, "message": "Form submitted successfully"})
    );
}

#[tokio::test]
async fn contact_notifies_the_business_then_the_submitter() {
    let app = spawn_app().await;
    accept_all_emails(&app).await;

    let body = r#"{
        "serviceType": "Repair Service",
        "name": "Ada",
        "email": "ada@example.com",
        "phone": "07700 900000",
        "company": "Engines Ltd",
        "message": "Line one\nLine two"
    }"#;
    app.post_contact_from("203.0.113.7", body).await;

    let emails = app.sent_emails().await;
    assert_eq!(emails.len(), 2);

    let notification = &emails[0];
    assert_eq!(notification["to"], BUSINESS_EMAIL);
    assert_eq!(
        notification["subject"],
        "New Contact Form Submission - Repair Service"
    );
    let html = notification["html"].as_str().unwrap();
    assert!(html.contains("Engines Ltd"));
    assert!(html.contains("Line one<br>Line two"));
    assert!(html.contains("IP Address: 203.0.113.7"));

    let auto_reply = &emails[1];
    assert_eq!(auto_reply["to"], "ada@example.com");
    assert_eq!(auto_reply["subject"], "Thank you for contacting SolvePrint");
    assert_eq!(notification["from"], auto_reply["from"]);
}

#[tokio::test]
async fn contact_returns_a_400_when_data_is_missing() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let test_cases = [
        (
            r#"{"email": "a@b.com", "phone": "07700900000", "message": "hi"}"#,
            "missing the name",
        ),
        (
            r#"{"name": "A", "phone": "07700900000", "message": "hi"}"#,
            "missing the email",
        ),
        (
            r#"{"name": "A", "email": "a@b.com", "message": "hi"}"#,
            "missing the phone",
        ),
        (
            r#"{"name": "A", "email": "a@b.com", "phone": "07700900000"}"#,
            "missing the message",
        ),
        (
            r#"{"name": "  ", "email": "a@b.com", "phone": "07700900000", "message": "hi"}"#,
            "a blank name",
        ),
    ];

    // Distinct client identities keep the rate limit out of the way.
    for (i, (invalid_body, error_message)) in test_cases.into_iter().enumerate() {
        let response = app
            .post_contact_from(&format!("192.0.2.{}", i), invalid_body)
            .await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 when the payload was {}",
            error_message
        );
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({"error": "Missing required fields"}));
    }
}

#[tokio::test]
async fn contact_returns_a_400_for_a_malformed_email() {
    let app = spawn_app().await;

    let test_cases = ["plainaddress", "a@b", "a b@c.com", "@b.com", "a@@b.com"];

    for (i, email) in test_cases.into_iter().enumerate() {
        let body = json!({"name": "A", "email": email, "phone": "07700900000", "message": "hi"});
        let response = app
            .post_contact_from(&format!("192.0.2.{}", i), &body.to_string())
            .await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not reject {}",
            email
        );
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({"error": "Invalid email format"}));
    }
}

#[tokio::test]
async fn contact_accepts_500_characters_and_rejects_501() {
    let app = spawn_app().await;
    accept_all_emails(&app).await;

    let at_limit = json!({"name": "A", "email": "a@b.com", "phone": "07700900000", "message": "x".repeat(500)});
    let response = app
        .post_contact_from("192.0.2.1", &at_limit.to_string())
        .await;
    assert_eq!(200, response.status().as_u16());

    let over_limit = json!({"name": "A", "email": "a@b.com", "phone": "07700900000", "message": "x".repeat(501)});
    let response = app
        .post_contact_from("192.0.2.2", &over_limit.to_string())
        .await;
    assert_eq!(400, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Message too long"}));
}

#[tokio::test]
async fn the_fourth_request_within_a_minute_is_rejected() {
    let app = spawn_app().await;
    accept_all_emails(&app).await;

    for _ in 0..3 {
        let response = app.post_contact_from("203.0.113.7", VALID_BODY).await;
        assert_eq!(200, response.status().as_u16());
    }

    let response = app.post_contact_from("203.0.113.7", VALID_BODY).await;
    assert_eq!(429, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({"error": "Too many requests. Please try again later."})
    );

    // Someone else is unaffected.
    let response = app.post_contact_from("203.0.113.8", VALID_BODY).await;
    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn the_count_resets_once_the_window_has_passed() {
    let app = spawn_app_with(|config| config.rate_limit.window_milliseconds = 300).await;
    accept_all_emails(&app).await;

    for _ in 0..3 {
        app.post_contact_from("203.0.113.7", VALID_BODY).await;
    }
    let response = app.post_contact_from("203.0.113.7", VALID_BODY).await;
    assert_eq!(429, response.status().as_u16());

    tokio::time::sleep(Duration::from_millis(400)).await;

    let response = app.post_contact_from("203.0.113.7", VALID_BODY).await;
    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn rejected_submissions_still_count_towards_the_limit() {
    let app = spawn_app().await;
    accept_all_emails(&app).await;

    for _ in 0..3 {
        let response = app.post_contact_from("203.0.113.7", "{}").await;
        assert_eq!(400, response.status().as_u16());
    }

    let response = app.post_contact_from("203.0.113.7", VALID_BODY).await;
    assert_eq!(429, response.status().as_u16());
}

#[tokio::test]
async fn requests_without_proxy_headers_share_one_identity() {
    let app = spawn_app().await;
    accept_all_emails(&app).await;

    for _ in 0..3 {
        let response = app.post_contact_with_headers(&[], VALID_BODY).await;
        assert_eq!(200, response.status().as_u16());
    }
    let response = app.post_contact_with_headers(&[], VALID_BODY).await;
    assert_eq!(429, response.status().as_u16());
}

#[tokio::test]
async fn real_ip_identifies_the_client_when_forwarded_for_is_absent() {
    let app = spawn_app().await;
    accept_all_emails(&app).await;

    for _ in 0..3 {
        let response = app
            .post_contact_with_headers(&[("X-Real-IP", "10.0.0.1")], VALID_BODY)
            .await;
        assert_eq!(200, response.status().as_u16());
    }

    let response = app
        .post_contact_with_headers(&[("X-Real-IP", "10.0.0.1")], VALID_BODY)
        .await;
    assert_eq!(429, response.status().as_u16());

    let response = app
        .post_contact_with_headers(&[("X-Real-IP", "10.0.0.2")], VALID_BODY)
        .await;
    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn contact_returns_500_when_the_email_credential_is_missing() {
    let app = spawn_app_with(|config| config.email_client.authorization_token = None).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    for _ in 0..3 {
        let response = app.post_contact_from("203.0.113.7", VALID_BODY).await;
        assert_eq!(500, response.status().as_u16());
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({"error": "Email service not configured"}));
    }

    // The limiter ran before the credential check, so the slots are used up.
    let response = app.post_contact_from("203.0.113.7", VALID_BODY).await;
    assert_eq!(429, response.status().as_u16());
}

#[tokio::test]
async fn delivery_failures_do_not_change_the_outcome() {
    let app = spawn_app().await;

    Mock::given(path("/emails"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&app.email_server)
        .await;

    let response = app.post_contact(VALID_BODY).await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn a_failed_business_notification_does_not_stop_the_auto_reply() {
    let app = spawn_app().await;

    Mock::given(path("/emails"))
        .and(body_partial_json(json!({"to": BUSINESS_EMAIL})))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.email_server)
        .await;

    Mock::given(path("/emails"))
        .and(body_partial_json(json!({"to": "a@b.com"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app.post_contact(VALID_BODY).await;
    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn submitted_markup_is_escaped_in_outgoing_emails() {
    let app = spawn_app().await;
    accept_all_emails(&app).await;

    let body = json!({
        "name": "<script>alert('x')</script>",
        "email": "a@b.com",
        "phone": "07700900000",
        "company": "<b>Bold</b>",
        "message": "<img src=x onerror=alert(1)>"
    });
    let response = app.post_contact(&body.to_string()).await;
    assert_eq!(200, response.status().as_u16());

    for email in app.sent_emails().await {
        let html = email["html"].as_str().unwrap();
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>Bold</b>"));
        assert!(!html.contains("<img src=x"));
    }
}

#[tokio::test]
async fn an_unparseable_body_is_an_internal_error() {
    let app = spawn_app().await;

    let response = app.post_contact_with_headers(&[], "{not json").await;

    assert_eq!(500, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Internal server error"}));
}

#[tokio::test]
async fn a_body_without_a_content_type_is_still_accepted() {
    let app = spawn_app().await;

    Mock::given(path("/emails"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.email_server)
        .await;

    let response = app.post_contact_raw(&[], VALID_BODY).await;

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn a_plain_text_content_type_is_still_accepted() {
    let app = spawn_app().await;
    accept_all_emails(&app).await;

    let response = app
        .post_contact_raw(&[("Content-Type", "text/plain")], VALID_BODY)
        .await;

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn preflight_allows_any_origin() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .request(
            reqwest::Method::OPTIONS,
            format!("{}/api/contact", app.addr),
        )
        .send()
        .await
        .unwrap();

    assert_eq!(200, response.status().as_u16());
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
}
