//! Outbound Mail Relay
//!
//! Hands messages to an HTTP mail relay (`POST {endpoint}` with a JSON body).
//! Delivery guarantees beyond "accepted by the relay" belong to the relay.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

const RELAY_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Mail delivery errors
#[derive(Debug, Error)]
pub enum MailError {
    /// The HTTP client could not be built or the request failed in transit
    #[error("Mail relay transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The relay answered with a non-success status
    #[error("Mail relay rejected message with status {0}")]
    Rejected(u16),
}

/// A message as accepted by the relay
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMail {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// Transport capable of delivering an [`OutgoingMail`]
#[trait_variant::make(MailTransport: Send)]
pub trait LocalMailTransport {
    async fn deliver(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

/// reqwest-backed relay client
#[derive(Debug, Clone)]
pub struct MailRelay {
    client: reqwest::Client,
    endpoint: String,
}

impl MailRelay {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, MailError> {
        let client = reqwest::Client::builder()
            .user_agent(RELAY_USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl MailTransport for MailRelay {
    async fn deliver(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let response = self
            .client
            .post(self.endpoint.as_str())
            .json(mail)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                recipients = mail.recipients.len(),
                "Mail relay rejected message"
            );
            return Err(MailError::Rejected(status.as_u16()));
        }

        tracing::debug!(recipients = mail.recipients.len(), "Mail accepted by relay");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outgoing_mail_wire_format() {
        let mail = OutgoingMail {
            recipients: vec!["user@example.com".to_string()],
            subject: "Email confirmation".to_string(),
            body: "Your confirmation code: 123456".to_string(),
        };
        let json = serde_json::to_value(&mail).unwrap();
        assert_eq!(json["recipients"][0], "user@example.com");
        assert_eq!(json["subject"], "Email confirmation");
        assert_eq!(json["body"], "Your confirmation code: 123456");
    }

    #[test]
    fn test_relay_builds() {
        let relay = MailRelay::new("http://localhost:8025/send", Duration::from_secs(5)).unwrap();
        assert_eq!(relay.endpoint(), "http://localhost:8025/send");
    }
}
