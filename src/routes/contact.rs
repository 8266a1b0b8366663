use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpRequest, HttpResponse};
use std::fmt::Formatter;

use crate::captcha::CaptchaVerifier;
use crate::configuration::AllowedOrigins;
use crate::domain::{ContactEmail, ContactMessage, ContactName, NewContact};
use crate::email_client::{EmailClient, EmailClientError};

/// Submissions above this size are rejected before JSON parsing.
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024;

#[derive(serde::Deserialize)]
pub struct ContactRequest {
    name: Option<String>,
    email: Option<String>,
    message: Option<String>,
    #[serde(rename = "g-recaptcha-response")]
    captcha_token: Option<String>,
}

impl TryFrom<ContactRequest> for NewContact {
    type Error = String;

    fn try_from(request: ContactRequest) -> Result<Self, Self::Error> {
        let name = request.name.unwrap_or_default();
        let email = request.email.unwrap_or_default();
        let message = request.message.unwrap_or_default();

        if name.trim().is_empty() || email.trim().is_empty() || message.trim().is_empty() {
            return Err("All fields are required".to_string());
        }

        let email = ContactEmail::parse(email).map_err(|_| "Invalid email format".to_string())?;
        let name = ContactName::parse(name)?;
        let message = ContactMessage::parse(message)?;
        Ok(NewContact {
            name,
            email,
            message,
        })
    }
}

#[derive(thiserror::Error)]
pub enum ContactError {
    #[error("CORS policy violation")]
    OriginRejected,
    #[error("Payload too large")]
    PayloadTooLarge,
    #[error("Invalid JSON format")]
    InvalidJson(#[source] serde_json::Error),
    #[error("Missing reCAPTCHA token")]
    MissingCaptchaToken,
    #[error("reCAPTCHA verification failed")]
    CaptchaRejected,
    #[error("{0}")]
    Validation(String),
    #[error("Captcha service unavailable")]
    CaptchaUnavailable(#[source] reqwest::Error),
    #[error("Failed to send message")]
    SendFailure(#[source] EmailClientError),
}

impl std::fmt::Debug for ContactError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ContactError {
    fn status_code(&self) -> StatusCode {
        match self {
            ContactError::OriginRejected => StatusCode::FORBIDDEN,
            ContactError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ContactError::InvalidJson(_)
            | ContactError::MissingCaptchaToken
            | ContactError::CaptchaRejected
            | ContactError::Validation(_) => StatusCode::BAD_REQUEST,
            ContactError::CaptchaUnavailable(_) | ContactError::SendFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

pub async fn contact(
    request: HttpRequest,
    body: web::Bytes,
    captcha_verifier: web::Data<CaptchaVerifier>,
    email_client: web::Data<EmailClient>,
    allowed_origins: web::Data<AllowedOrigins>,
) -> HttpResponse {
    let origin = request_origin(&request);
    let cors_origin = origin
        .as_deref()
        .filter(|origin| allowed_origins.allows(Some(origin)));

    let outcome = handle_submission(
        origin.as_deref(),
        &body,
        &captcha_verifier,
        &email_client,
        &allowed_origins,
    )
    .await;

    match outcome {
        Ok(()) => respond(
            StatusCode::OK,
            "Message sent successfully!".to_string(),
            cors_origin,
        ),
        Err(error) => {
            if error.status_code().is_server_error() {
                tracing::error!(
                    error.cause_chain = ?error,
                    "Failed to process contact submission"
                );
            } else {
                tracing::warn!(
                    error.cause_chain = ?error,
                    "Rejected contact submission"
                );
            }
            respond(error.status_code(), error.to_string(), cors_origin)
        }
    }
}

/// CORS preflight for the contact endpoint.
pub async fn contact_preflight(
    request: HttpRequest,
    allowed_origins: web::Data<AllowedOrigins>,
) -> HttpResponse {
    let origin = request_origin(&request);
    let cors_origin = origin
        .as_deref()
        .filter(|origin| allowed_origins.allows(Some(origin)));
    respond(StatusCode::OK, String::new(), cors_origin)
}

#[tracing::instrument(
    name = "Handling contact submission",
    skip(body, captcha_verifier, email_client, allowed_origins)
)]
async fn handle_submission(
    origin: Option<&str>,
    body: &web::Bytes,
    captcha_verifier: &CaptchaVerifier,
    email_client: &EmailClient,
    allowed_origins: &AllowedOrigins,
) -> Result<(), ContactError> {
    if allowed_origins.is_enforced() && !allowed_origins.allows(origin) {
        return Err(ContactError::OriginRejected);
    }

    if body.len() > MAX_CONTENT_LENGTH {
        return Err(ContactError::PayloadTooLarge);
    }

    let request: ContactRequest =
        serde_json::from_slice(body).map_err(ContactError::InvalidJson)?;

    let token = request
        .captcha_token
        .as_deref()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(ContactError::MissingCaptchaToken)?
        .to_owned();

    let verdict = captcha_verifier
        .verify(&token)
        .await
        .map_err(ContactError::CaptchaUnavailable)?;
    if !verdict.success {
        tracing::warn!(
            error_codes = ?verdict.error_codes,
            "Captcha service declined the token"
        );
        return Err(ContactError::CaptchaRejected);
    }

    let contact: NewContact = request.try_into().map_err(ContactError::Validation)?;

    email_client
        .send(&contact)
        .await
        .map_err(ContactError::SendFailure)?;

    tracing::info!(contact_email = %contact.email, "Contact message relayed");
    Ok(())
}

fn request_origin(request: &HttpRequest) -> Option<String> {
    request
        .headers()
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

fn respond(status: StatusCode, body: String, origin: Option<&str>) -> HttpResponse {
    let mut builder = HttpResponse::build(status);
    builder.content_type("text/plain");
    if let Some(origin) = origin {
        builder.insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, origin));
        builder.insert_header((header::VARY, "Origin"));
    }
    if status == StatusCode::OK {
        builder.insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"));
        builder.insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"));
    }
    builder.body(body)
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
