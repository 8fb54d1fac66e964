use tracing::info;

use crate::form::SubmissionPayload;

use super::channel::{DeliveryChannel, DeliveryResult, EmailChannelConfig};
use super::templates::{self, RenderedEmail};

/// A composed notification ready for the mail-client handoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedEmail {
    pub recipient_name: String,
    pub recipient_email: String,
    pub subject: String,
    pub body: String,
    pub is_html: bool,
}

impl ComposedEmail {
    /// `mailto:` URI for plain-text bodies. HTML bodies are handed to the
    /// gateway as a renderable document instead.
    pub fn mailto_uri(&self) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            self.recipient_email,
            urlencoding::encode(&self.subject),
            urlencoding::encode(&self.body)
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MailHandoffError {
    #[error("mail handoff failed: {0}")]
    Handoff(String),
}

/// Seam for the OS/browser-level "open a composed email" mechanism.
/// Success means the handoff was invoked without error, never that an
/// email was delivered or even sent.
pub trait MailGateway: Send + Sync {
    fn open_compose(&self, email: &ComposedEmail) -> Result<(), MailHandoffError>;
}

/// Server-side gateway: surfaces the compose link through the log stream
/// so an operator (or a UI tailing it) can open it.
#[derive(Debug, Default, Clone)]
pub struct TracingMailGateway;

impl MailGateway for TracingMailGateway {
    fn open_compose(&self, email: &ComposedEmail) -> Result<(), MailHandoffError> {
        if email.is_html {
            info!(
                recipient = %email.recipient_email,
                subject = %email.subject,
                bytes = email.body.len(),
                "rendered HTML notification ready"
            );
        } else {
            info!(
                recipient = %email.recipient_email,
                mailto = %email.mailto_uri(),
                "mailto notification ready"
            );
        }
        Ok(())
    }
}

pub(crate) fn send_email_notification(
    gateway: &dyn MailGateway,
    channel: &DeliveryChannel,
    config: &EmailChannelConfig,
    payload: &SubmissionPayload,
) -> DeliveryResult {
    let RenderedEmail {
        subject,
        body,
        is_html,
    } = templates::render(payload, config.use_html_template);

    let email = ComposedEmail {
        recipient_name: config.recipient_name.clone(),
        recipient_email: config.recipient_email.clone(),
        subject,
        body,
        is_html,
    };

    match gateway.open_compose(&email) {
        Ok(()) => DeliveryResult::success(channel, None),
        Err(err) => DeliveryResult::failure(channel, None, err.to_string()),
    }
}
