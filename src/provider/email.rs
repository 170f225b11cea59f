//! Outbound email seam for the in-memory provider.

use anyhow::Result;
use tracing::info;

#[derive(Clone, Debug)]
pub struct EmailMessage {
    pub to_email: String,
    pub subject: String,
    pub body: String,
}

pub trait EmailSender: Send + Sync {
    /// Deliver one message.
    ///
    /// # Errors
    /// Returns an error when the message cannot be handed off.
    fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Development sender: logs the message instead of delivering it, so the
/// code is readable from the service logs.
#[derive(Clone, Debug)]
pub struct LogEmailSender;

impl EmailSender for LogEmailSender {
    fn send(&self, message: &EmailMessage) -> Result<()> {
        info!(
            to_email = %message.to_email,
            subject = %message.subject,
            body = %message.body,
            "email send stub"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_sender_accepts_messages() {
        let sender = LogEmailSender;
        let message = EmailMessage {
            to_email: "user@example.com".to_string(),
            subject: "Your sign-in code".to_string(),
            body: "Your sign-in code is 123456.".to_string(),
        };
        assert!(sender.send(&message).is_ok());
    }
}
