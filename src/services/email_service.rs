//! Outgoing email delivery

use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{info, warn};

use crate::{
    config::{EmailBackend, EmailConfig},
    constants::CONFIRMATION_EMAIL_SUBJECT,
    error::{AppError, AppResult},
};

/// Delivery failure, reported back to the client instead of failing the request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct MailError(pub String);

/// Plain-text mail transport
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError>;
}

/// Build the sender selected by configuration
pub fn build(config: &EmailConfig) -> AppResult<Arc<dyn EmailSender>> {
    match config.backend {
        EmailBackend::Console => Ok(Arc::new(ConsoleEmailSender::new(&config.from))),
        EmailBackend::Smtp => Ok(Arc::new(SmtpEmailSender::new(config)?)),
    }
}

/// SMTP relay via lettre
pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_email: String,
}

impl SmtpEmailSender {
    pub fn new(config: &EmailConfig) -> AppResult<Self> {
        let host = config
            .smtp_host
            .as_deref()
            .ok_or_else(|| AppError::Configuration("SMTP_HOST is not set".to_string()))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| AppError::Configuration(format!("Invalid SMTP relay: {}", e)))?
            .port(config.smtp_port);

        if let (Some(user), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from_email: config.from.clone(),
        })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let email = Message::builder()
            .from(
                self.from_email
                    .parse()
                    .map_err(|e| MailError(format!("Invalid sender address: {}", e)))?,
            )
            .to(to
                .parse()
                .map_err(|e| MailError(format!("Invalid recipient address: {}", e)))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| MailError(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map(|_| ())
            .map_err(|e| MailError(e.to_string()))
    }
}

/// Development sender that writes messages to the log
pub struct ConsoleEmailSender {
    from_email: String,
}

impl ConsoleEmailSender {
    pub fn new(from_email: &str) -> Self {
        Self {
            from_email: from_email.to_string(),
        }
    }
}

#[async_trait]
impl EmailSender for ConsoleEmailSender {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        info!(from = %self.from_email, to = %to, subject = %subject, body = %body, "Email (console backend)");
        Ok(())
    }
}

/// Email service for confirmation messages
pub struct EmailService;

impl EmailService {
    /// Body of the confirmation message
    pub fn confirmation_body(code: &str) -> String {
        format!("confirmation_code: {}", code)
    }

    /// Mail a confirmation code. Failures are logged and handed back, never retried.
    pub async fn send_confirmation_code(
        sender: &dyn EmailSender,
        code: &str,
        recipient: &str,
    ) -> Result<(), MailError> {
        let result = sender
            .send_email(recipient, CONFIRMATION_EMAIL_SUBJECT, &Self::confirmation_body(code))
            .await;

        if let Err(e) = &result {
            warn!(recipient = %recipient, error = %e, "Failed to send confirmation email");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_confirmation_email_contents() {
        let mut sender = MockEmailSender::new();
        sender
            .expect_send_email()
            .with(
                eq("reader@example.com"),
                eq(CONFIRMATION_EMAIL_SUBJECT),
                eq("confirmation_code: 654321"),
            )
            .times(1)
            .returning(|_, _, _| Ok(()));

        let result =
            EmailService::send_confirmation_code(&sender, "654321", "reader@example.com").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delivery_failure_is_returned() {
        let mut sender = MockEmailSender::new();
        sender
            .expect_send_email()
            .returning(|_, _, _| Err(MailError("connection refused".to_string())));

        let result = EmailService::send_confirmation_code(&sender, "1", "x@example.com").await;
        assert_eq!(result, Err(MailError("connection refused".to_string())));
    }

    #[tokio::test]
    async fn test_console_sender_always_succeeds() {
        let sender = ConsoleEmailSender::new("noreply@example.com");
        assert!(sender.send_email("a@b.c", "s", "b").await.is_ok());
    }

    #[tokio::test]
    async fn test_smtp_sender_rejects_bad_recipient() {
        let config = EmailConfig {
            backend: EmailBackend::Smtp,
            from: "noreply@example.com".to_string(),
            smtp_host: Some("smtp.example.com".to_string()),
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
        };
        let sender = SmtpEmailSender::new(&config).unwrap();

        let result = sender.send_email("not-an-email", "s", "b").await;
        assert!(result.unwrap_err().0.contains("Invalid recipient"));
    }
}
