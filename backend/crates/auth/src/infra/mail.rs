//! Mail Senders
//!
//! Delivery is fire-and-forget: the request never waits for the relay and a
//! failed delivery is only logged.

use std::sync::Arc;

use platform::mail::{MailTransport, OutgoingMail};

use crate::domain::services::{MailMessage, MailSender};

/// Hands each message to a [`MailTransport`] on a spawned task
pub struct RelayMailSender<T> {
    transport: Arc<T>,
}

impl<T> RelayMailSender<T>
where
    T: MailTransport + Sync + 'static,
{
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }
}

impl<T> MailSender for RelayMailSender<T>
where
    T: MailTransport + Sync + 'static,
{
    fn send(&self, message: MailMessage) {
        let transport = self.transport.clone();
        let mail = OutgoingMail {
            recipients: message.recipients,
            subject: message.subject,
            body: message.body,
        };

        tokio::spawn(async move {
            if let Err(e) = transport.deliver(&mail).await {
                tracing::warn!(
                    error = %e,
                    subject = %mail.subject,
                    "Mail delivery failed"
                );
            }
        });
    }
}

/// Development sender: logs the message instead of delivering it
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMailSender;

impl MailSender for TracingMailSender {
    fn send(&self, message: MailMessage) {
        tracing::info!(
            recipients = ?message.recipients,
            subject = %message.subject,
            body = %message.body,
            "Mail not delivered (no relay configured)"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::mail::MailError;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct CapturingTransport {
        delivered: Mutex<Vec<OutgoingMail>>,
        notify: Notify,
    }

    impl MailTransport for CapturingTransport {
        async fn deliver(&self, mail: &OutgoingMail) -> Result<(), MailError> {
            self.delivered.lock().unwrap().push(mail.clone());
            self.notify.notify_one();
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_relay_sender_delivers_in_background() {
        let sender = RelayMailSender::new(CapturingTransport::default());
        let transport = sender.transport.clone();

        sender.send(MailMessage {
            recipients: vec!["alice@example.com".to_string()],
            subject: "Email confirmation".to_string(),
            body: "Your confirmation code: 123456".to_string(),
        });

        transport.notify.notified().await;
        let delivered = transport.delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].recipients, vec!["alice@example.com"]);
        assert_eq!(delivered[0].body, "Your confirmation code: 123456");
    }
}
