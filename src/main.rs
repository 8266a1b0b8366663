use anyhow::Context;
use contact_api::captcha::CaptchaVerifier;
use contact_api::configuration::get_configuration;
use contact_api::email_client::EmailClient;
use contact_api::startup::run;
use contact_api::telemetry::{get_subscriber, init_subscriber};
use std::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber(
        "contact-api".into(),
        "info".into(),
        std::io::stdout,
    );
    init_subscriber(subscriber);

    let config = get_configuration()
        .context("Failed to read config file")?;
    let address = format!(
        "{address}:{port}",
        address = config.application.host,
        port = config.application.port
    );
    let listener = TcpListener::bind(address)?;

    let captcha_verifier = CaptchaVerifier::new(
        config.captcha.base_url.clone(),
        config.captcha.secret.clone(),
        config.captcha.timeout(),
    );
    let email_client = EmailClient::smtp(
        &config.email.smtp_host,
        config.email.smtp_port,
        config.email.sender.clone(),
        config.email.recipient.clone(),
        config.email.password.clone(),
        config.email.timeout(),
    )
    .context("Failed to configure SMTP transport")?;

    run(
        listener,
        captcha_verifier,
        email_client,
        config.application.allowed_origins,
    )?
    .await?;
    Ok(())
}
