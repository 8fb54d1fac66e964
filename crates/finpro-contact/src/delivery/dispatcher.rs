use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::form::SubmissionPayload;

use super::channel::{ChannelKind, DeliveryChannel, DeliveryResult};
use super::email::{send_email_notification, MailGateway};
use super::webhook::{send_to_webhook, WebhookTransport};

/// Fan-out of one payload to every enabled channel.
///
/// Channels fire concurrently and independently; one failure never aborts
/// or delays another. Results come back in the order of the input channel
/// list even though completion order is nondeterministic, and a failure is
/// always a value in the result list, never an `Err` out of `dispatch`.
pub struct DeliveryDispatcher {
    transport: Arc<dyn WebhookTransport>,
    mail: Arc<dyn MailGateway>,
}

impl DeliveryDispatcher {
    pub fn new(transport: Arc<dyn WebhookTransport>, mail: Arc<dyn MailGateway>) -> Self {
        Self { transport, mail }
    }

    pub async fn dispatch(
        &self,
        payload: &SubmissionPayload,
        channels: &[DeliveryChannel],
    ) -> Vec<DeliveryResult> {
        let enabled: Vec<&DeliveryChannel> =
            channels.iter().filter(|channel| channel.enabled).collect();

        if enabled.is_empty() {
            debug!("no enabled delivery channels, skipping fan-out");
            return Vec::new();
        }

        let results = join_all(
            enabled
                .iter()
                .map(|channel| self.deliver_one(channel, payload)),
        )
        .await;

        for result in &results {
            if result.success {
                debug!(channel = %result.channel_id, "delivery succeeded");
            } else {
                warn!(
                    channel = %result.channel_id,
                    error = result.error.as_deref().unwrap_or("unknown"),
                    "delivery failed"
                );
            }
        }

        results
    }

    async fn deliver_one(
        &self,
        channel: &DeliveryChannel,
        payload: &SubmissionPayload,
    ) -> DeliveryResult {
        match &channel.kind {
            ChannelKind::Webhook(config) => {
                send_to_webhook(self.transport.as_ref(), channel, config, payload).await
            }
            ChannelKind::Email(config) => {
                send_email_notification(self.mail.as_ref(), channel, config, payload)
            }
        }
    }
}
