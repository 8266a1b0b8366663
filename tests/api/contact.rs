use crate::helpers::{spawn_app, spawn_app_with_failing_mailer, ALLOWED_ORIGIN};
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, ResponseTemplate};

fn valid_body() -> String {
    serde_json::json!({
        "name": "Jo",
        "email": "jo@example.com",
        "message": "Hi",
        "g-recaptcha-response": "tok"
    })
    .to_string()
}

fn captcha_success() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": true }))
}

fn captcha_failure() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "success": false,
        "error-codes": ["invalid-input-response"]
    }))
}

#[tokio::test]
async fn contact_returns_200_for_a_valid_submission() {
    let app = spawn_app().await;

    Mock::given(method("POST"))
        .and(path("/siteverify"))
        .respond_with(captcha_success())
        .expect(1)
        .mount(&app.captcha_server)
        .await;

    let response = app.post_contact(valid_body()).await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        Some(ALLOWED_ORIGIN),
        response
            .headers()
            .get("Access-Control-Allow-Origin")
            .and_then(|value| value.to_str().ok())
    );
    assert_eq!("Message sent successfully!", response.text().await.unwrap());

    let sent = app.sent_mail().await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("New Portfolio Message: Jo"));
}

#[tokio::test]
async fn contact_rejects_a_disallowed_origin() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(captcha_success())
        .expect(0)
        .mount(&app.captcha_server)
        .await;

    let response = reqwest::Client::new()
        .post(&format!("{}/api/contact", &app.address))
        .header("Content-Type", "application/json")
        .header("Origin", "https://evil.example.com")
        .body(valid_body())
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(403, response.status().as_u16());
    assert!(response
        .headers()
        .get("Access-Control-Allow-Origin")
        .is_none());
    assert_eq!("CORS policy violation", response.text().await.unwrap());
    assert!(app.sent_mail().await.is_empty());
}

#[tokio::test]
async fn contact_rejects_requests_without_an_origin() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .post(&format!("{}/api/contact", &app.address))
        .header("Content-Type", "application/json")
        .body(valid_body())
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(403, response.status().as_u16());
}

#[tokio::test]
async fn contact_returns_413_for_an_oversized_payload() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(captcha_success())
        .expect(0)
        .mount(&app.captcha_server)
        .await;

    let body = serde_json::json!({
        "name": "Jo",
        "email": "jo@example.com",
        "message": "x".repeat(11 * 1024),
        "g-recaptcha-response": "tok"
    })
    .to_string();

    let response = app.post_contact(body).await;

    assert_eq!(413, response.status().as_u16());
    assert_eq!(
        Some(ALLOWED_ORIGIN),
        response
            .headers()
            .get("Access-Control-Allow-Origin")
            .and_then(|value| value.to_str().ok())
    );
    assert_eq!("Payload too large", response.text().await.unwrap());
    assert!(app.sent_mail().await.is_empty());
}

#[tokio::test]
async fn contact_returns_413_even_beyond_the_body_buffer_limit() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(captcha_success())
        .expect(0)
        .mount(&app.captcha_server)
        .await;

    let body = serde_json::json!({
        "name": "Jo",
        "email": "jo@example.com",
        "message": "x".repeat(64 * 1024),
        "g-recaptcha-response": "tok"
    })
    .to_string();

    let response = app.post_contact(body).await;

    assert_eq!(413, response.status().as_u16());
    assert!(app.sent_mail().await.is_empty());
}

#[tokio::test]
async fn contact_returns_400_for_malformed_json() {
    let app = spawn_app().await;

    let response = app.post_contact("{not json".to_string()).await;

    assert_eq!(400, response.status().as_u16());
    assert_eq!("Invalid JSON format", response.text().await.unwrap());
}

#[tokio::test]
async fn contact_returns_400_when_the_captcha_token_is_missing() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(captcha_success())
        .expect(0)
        .mount(&app.captcha_server)
        .await;

    let test_cases = vec![
        (
            serde_json::json!({
                "name": "Jo",
                "email": "jo@example.com",
                "message": "Hi"
            }),
            "absent token",
        ),
        (
            serde_json::json!({
                "name": "Jo",
                "email": "jo@example.com",
                "message": "Hi",
                "g-recaptcha-response": "  "
            }),
            "blank token",
        ),
    ];

    for (body, description) in test_cases {
        let response = app.post_contact(body.to_string()).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload had {}.",
            description
        );
        assert_eq!("Missing reCAPTCHA token", response.text().await.unwrap());
    }

    assert!(app.sent_mail().await.is_empty());
}

#[tokio::test]
async fn contact_returns_400_when_captcha_verification_fails() {
    let app = spawn_app().await;

    Mock::given(method("POST"))
        .and(path("/siteverify"))
        .respond_with(captcha_failure())
        .expect(1)
        .mount(&app.captcha_server)
        .await;

    let response = app.post_contact(valid_body()).await;

    assert_eq!(400, response.status().as_u16());
    assert_eq!(
        "reCAPTCHA verification failed",
        response.text().await.unwrap()
    );
    assert!(app.sent_mail().await.is_empty());
}

#[tokio::test]
async fn contact_returns_500_when_the_captcha_service_errors() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.captcha_server)
        .await;

    let response = app.post_contact(valid_body()).await;

    assert_eq!(500, response.status().as_u16());
    assert!(app.sent_mail().await.is_empty());
}

#[tokio::test]
async fn contact_returns_500_when_the_captcha_response_is_malformed() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&app.captcha_server)
        .await;

    let response = app.post_contact(valid_body()).await;

    assert_eq!(500, response.status().as_u16());
    assert!(app.sent_mail().await.is_empty());
}

#[tokio::test]
async fn contact_returns_400_when_fields_are_missing_or_blank() {
    let app = spawn_app().await;

    Mock::given(method("POST"))
        .and(path("/siteverify"))
        .respond_with(captcha_success())
        .mount(&app.captcha_server)
        .await;

    let test_cases = vec![
        (
            serde_json::json!({
                "email": "jo@example.com",
                "message": "Hi",
                "g-recaptcha-response": "tok"
            }),
            "missing name",
        ),
        (
            serde_json::json!({
                "name": "Jo",
                "email": "  ",
                "message": "Hi",
                "g-recaptcha-response": "tok"
            }),
            "blank email",
        ),
        (
            serde_json::json!({
                "name": "Jo",
                "email": "jo@example.com",
                "message": "\n",
                "g-recaptcha-response": "tok"
            }),
            "whitespace message",
        ),
    ];

    for (body, description) in test_cases {
        let response = app.post_contact(body.to_string()).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload had a {}.",
            description
        );
        assert_eq!("All fields are required", response.text().await.unwrap());
    }

    assert!(app.sent_mail().await.is_empty());
}

#[tokio::test]
async fn contact_returns_400_for_an_invalid_email() {
    let app = spawn_app().await;

    Mock::given(method("POST"))
        .and(path("/siteverify"))
        .respond_with(captcha_success())
        .mount(&app.captcha_server)
        .await;

    let test_cases = vec![
        ("not-an-email", "missing @"),
        ("jo@localhost", "dotless domain"),
    ];

    for (email, description) in test_cases {
        let body = serde_json::json!({
            "name": "Jo",
            "email": email,
            "message": "Hi",
            "g-recaptcha-response": "tok"
        })
        .to_string();

        let response = app.post_contact(body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the email had a {}.",
            description
        );
        assert_eq!("Invalid email format", response.text().await.unwrap());
    }

    assert!(app.sent_mail().await.is_empty());
}

#[tokio::test]
async fn contact_returns_500_when_the_email_relay_fails() {
    let app = spawn_app_with_failing_mailer().await;

    Mock::given(method("POST"))
        .and(path("/siteverify"))
        .respond_with(captcha_success())
        .expect(1)
        .mount(&app.captcha_server)
        .await;

    let response = app.post_contact(valid_body()).await;

    assert_eq!(500, response.status().as_u16());
    assert_eq!("Failed to send message", response.text().await.unwrap());
}

#[tokio::test]
async fn contact_preflight_answers_with_cors_headers() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .request(
            reqwest::Method::OPTIONS,
            &format!("{}/api/contact", &app.address),
        )
        .header("Origin", ALLOWED_ORIGIN)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        Some(ALLOWED_ORIGIN),
        response
            .headers()
            .get("Access-Control-Allow-Origin")
            .and_then(|value| value.to_str().ok())
    );
    assert_eq!(
        Some("POST, OPTIONS"),
        response
            .headers()
            .get("Access-Control-Allow-Methods")
            .and_then(|value| value.to_str().ok())
    );
}

#[tokio::test]
async fn contact_preflight_does_not_echo_a_disallowed_origin() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .request(
            reqwest::Method::OPTIONS,
            &format!("{}/api/contact", &app.address),
        )
        .header("Origin", "https://evil.example.com")
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
    assert!(response
        .headers()
        .get("Access-Control-Allow-Origin")
        .is_none());
}

#[tokio::test]
async fn unknown_paths_return_404() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .post(&format!("{}/api/other", &app.address))
        .header("Origin", ALLOWED_ORIGIN)
        .body(valid_body())
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(404, response.status().as_u16());
}
