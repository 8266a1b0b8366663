use chrono::Utc;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::stub::AsyncStubTransport;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::{ExposeSecret, Secret};

use crate::domain::NewContact;

/// Relays validated contact submissions to the configured inbox.
pub struct EmailClient {
    transport: MailTransport,
    sender: Mailbox,
    recipient: Mailbox,
}

enum MailTransport {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    Stub(AsyncStubTransport),
}

#[derive(Debug, thiserror::Error)]
pub enum EmailClientError {
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build email message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    SmtpTransport(#[from] lettre::transport::smtp::Error),

    #[error("Stub transport error: {0}")]
    StubTransport(#[from] lettre::transport::stub::Error),
}

impl EmailClient {
    /// SMTP over implicit TLS. The sender address doubles as the login
    /// username.
    pub fn smtp(
        host: &str,
        port: u16,
        sender: String,
        recipient: String,
        password: Secret<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, EmailClientError> {
        let credentials = Credentials::new(sender.clone(), password.expose_secret().to_owned());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
            .port(port)
            .credentials(credentials)
            .timeout(Some(timeout))
            .build();
        Ok(Self {
            transport: MailTransport::Smtp(transport),
            sender: sender.parse()?,
            recipient: recipient.parse()?,
        })
    }

    /// In-memory transport that records messages instead of sending them.
    pub fn stub(
        transport: AsyncStubTransport,
        sender: String,
        recipient: String,
    ) -> Result<Self, EmailClientError> {
        Ok(Self {
            transport: MailTransport::Stub(transport),
            sender: sender.parse()?,
            recipient: recipient.parse()?,
        })
    }

    #[tracing::instrument(name = "Relaying contact submission", skip(self, contact))]
    pub async fn send(&self, contact: &NewContact) -> Result<(), EmailClientError> {
        let message = self.compose(contact)?;
        match &self.transport {
            MailTransport::Smtp(transport) => {
                transport.send(message).await?;
            }
            MailTransport::Stub(transport) => {
                transport.send(message).await?;
            }
        }
        Ok(())
    }

    fn compose(&self, contact: &NewContact) -> Result<Message, EmailClientError> {
        let reply_to = Mailbox::new(
            Some(contact.name.as_ref().to_owned()),
            contact.email.as_ref().parse()?,
        );
        let received_at = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();

        let message = Message::builder()
            .from(self.sender.clone())
            .to(self.recipient.clone())
            .reply_to(reply_to)
            .subject(format!(
                "New Portfolio Message: {name}",
                name = contact.name.as_ref()
            ))
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(plain_text_body(contact, &received_at)),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body(contact, &received_at)),
                    ),
            )?;
        Ok(message)
    }
}

fn plain_text_body(contact: &NewContact, received_at: &str) -> String {
    format!(
        "New message from your portfolio site\n\
        \n\
        Received at: {received_at}\n\
        \n\
        Contact details:\n\
        - Name: {name}\n\
        - Email: {email}\n\
        \n\
        Message:\n\
        {message}\n\
        \n\
        ---\n\
        Automated notification - do not reply directly to this email.\n",
        received_at = received_at,
        name = contact.name.as_ref(),
        email = contact.email.as_ref(),
        message = contact.message.as_ref(),
    )
}

fn html_body(contact: &NewContact, received_at: &str) -> String {
    let name = htmlescape::encode_minimal(contact.name.as_ref());
    let email = htmlescape::encode_minimal(contact.email.as_ref());
    let email_href = htmlescape::encode_attribute(contact.email.as_ref());
    let message = htmlescape::encode_minimal(contact.message.as_ref()).replace('\n', "<br>");

    format!(
        "<html>\n\
          <body>\n\
            <div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\n\
              <h2>New message from your portfolio site</h2>\n\
              <p><strong>Received at:</strong> {received_at}</p>\n\
              <h3>Contact details</h3>\n\
              <ul>\n\
                <li><strong>Name:</strong> {name}</li>\n\
                <li><strong>Email:</strong> <a href=\"mailto:{email_href}\">{email}</a></li>\n\
              </ul>\n\
              <h3>Message</h3>\n\
              <div style=\"white-space: pre-wrap;\">{message}</div>\n\
              <hr>\n\
              <p>Automated notification - do not reply directly to this email.</p>\n\
            </div>\n\
          </body>\n\
        </html>\n",
        received_at = received_at,
        name = name,
        email = email,
        email_href = email_href,
        message = message,
    )
}
