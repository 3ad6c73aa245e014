//! SMTP delivery of password-reset emails.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::MailConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid mail address: {0}")]
    Address(String),

    #[error("Failed to build message: {0}")]
    Message(String),

    #[error("Mail transport error: {0}")]
    Transport(String),
}

pub struct MailerService {
    /// None when mail is disabled; reset links are logged instead.
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from_address: String,
    public_url: String,
}

impl MailerService {
    pub fn new(config: &MailConfig, public_url: &str) -> anyhow::Result<Self> {
        let transport = if config.enabled {
            let mut builder =
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                    .port(config.smtp_port);

            if !config.username.is_empty() {
                builder = builder.credentials(Credentials::new(
                    config.username.clone(),
                    config.password.clone(),
                ));
            }

            Some(builder.build())
        } else {
            None
        };

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
            public_url: public_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn reset_link(&self, token: &str) -> String {
        format!("{}/reset_password/{}", self.public_url, token)
    }

    pub async fn send_reset_email(&self, to: &str, token: &str) -> Result<(), MailError> {
        let link = self.reset_link(token);

        let Some(transport) = &self.transport else {
            warn!(recipient = %to, link = %link, "Mail disabled; logging reset link instead of sending");
            return Ok(());
        };

        let body = format!(
            "To reset your password, visit the following link:\n{link}\n\n\
             If you did not make this request then simply ignore this email \
             and no changes will be made"
        );

        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|e| MailError::Address(format!("{e}")))?,
            )
            .to(to.parse().map_err(|e| MailError::Address(format!("{e}")))?)
            .subject("Password Reset Request")
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| MailError::Message(e.to_string()))?;

        transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        info!(recipient = %to, "Password reset email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_link_strips_trailing_slash() {
        let mailer =
            MailerService::new(&MailConfig::default(), "http://localhost:5000/").unwrap();

        assert_eq!(
            mailer.reset_link("abc"),
            "http://localhost:5000/reset_password/abc"
        );
    }

    #[tokio::test]
    async fn test_disabled_mailer_logs_instead_of_sending() {
        let mailer = MailerService::new(&MailConfig::default(), "http://localhost:5000").unwrap();

        let result = mailer.send_reset_email("user@example.com", "token").await;
        assert!(result.is_ok());
    }
}
