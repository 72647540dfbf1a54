//! Outbound relay of contact messages.
//!
//! The site does not speak SMTP. [`HttpMailer`] hands the composed message to
//! an HTTP mail relay; [`LogMailer`] is used when no relay is configured.

use async_trait::async_trait;
use folio_store::ContactMessage;
use folio_ui::render::escape_html;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::MailError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl OutgoingMail {
    /// Composes the notification for a stored, already sanitized, message.
    pub fn contact_notification(
        message: &ContactMessage,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        let email = escape_html(&message.email);
        Self {
            from: from.into(),
            to: to.into(),
            subject: format!("New message from {} via your portfolio", message.name),
            text: format!(
                "Name: {}\nEmail: {}\n\nMessage:\n{}",
                message.name, message.email, message.message
            ),
            html: format!(
                "<p><strong>Name:</strong> {}</p>\n<p><strong>Email:</strong> {}</p>\n<p><strong>Message:</strong></p>\n<p>{}</p>",
                message.name,
                email,
                message.message.replace('\n', "<br>")
            ),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

pub struct HttpMailer {
    endpoint: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpMailer {
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token,
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let mut request = self.client.post(&self.endpoint).json(mail);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|error| MailError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(to = %mail.to, status = status.as_u16(), "mail relay accepted message");
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        info!(
            to = %mail.to,
            subject = %mail.subject,
            "no mail relay configured; contact message logged only"
        );
        Ok(())
    }
}
