// src/services/mail.rs

//! Digest delivery.

use async_trait::async_trait;

use crate::error::Result;

/// Sends a rendered HTML digest.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver `html` to every recipient.
    ///
    /// Failures are reported as [`crate::error::AppError::Delivery`] with
    /// a human-readable reason.
    async fn send(&self, subject: &str, html: &str, recipients: &[String]) -> Result<()>;
}

#[cfg(feature = "mail")]
pub use smtp::SmtpMailer;

#[cfg(feature = "mail")]
mod smtp {
    use async_trait::async_trait;
    use lettre::message::{Mailbox, header::ContentType};
    use lettre::transport::smtp::authentication::Credentials;
    use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

    use super::Mailer;
    use crate::error::{AppError, Result};
    use crate::models::MailConfig;

    /// SMTP relay over implicit TLS, authenticated as the sender.
    pub struct SmtpMailer {
        sender: Mailbox,
        transport: AsyncSmtpTransport<Tokio1Executor>,
    }

    impl SmtpMailer {
        /// Build a mailer; the password is read from `config.password_env`.
        pub fn from_config(config: &MailConfig) -> Result<Self> {
            config.validate()?;
            let password = std::env::var(&config.password_env).map_err(|_| {
                AppError::config(format!("{} is not set", config.password_env))
            })?;
            let sender: Mailbox = config
                .sender
                .parse()
                .map_err(|e| AppError::validation(format!("mail.sender: {e}")))?;

            let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
                .map_err(AppError::delivery)?
                .credentials(Credentials::new(config.sender.clone(), password))
                .build();

            Ok(Self { sender, transport })
        }
    }

    #[async_trait]
    impl Mailer for SmtpMailer {
        async fn send(&self, subject: &str, html: &str, recipients: &[String]) -> Result<()> {
            let mut builder = Message::builder()
                .from(self.sender.clone())
                .subject(subject)
                .header(ContentType::TEXT_HTML);
            for recipient in recipients {
                let mailbox: Mailbox = recipient
                    .parse()
                    .map_err(|e| AppError::delivery(format!("invalid recipient {recipient}: {e}")))?;
                builder = builder.to(mailbox);
            }
            let message = builder.body(html.to_string()).map_err(AppError::delivery)?;

            self.transport
                .send(message)
                .await
                .map_err(AppError::delivery)?;
            log::info!("Digest sent to {} recipient(s)", recipients.len());
            Ok(())
        }
    }
}
