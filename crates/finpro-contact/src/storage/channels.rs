use std::sync::Arc;
use std::sync::OnceLock;

use regex::Regex;

use crate::delivery::{ChannelId, ChannelKind, DeliveryChannel};

use super::kv::{get_or_default, set_value, KvStore, StorageError};

const CHANNELS_KEY: &str = "delivery-channels";

/// Rejected channel configuration. Caught at configuration-entry time so a
/// malformed channel never reaches the dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum ChannelConfigError {
    #[error("webhook URL must start with http:// or https:// (got '{0}')")]
    InvalidUrl(String),
    #[error("recipient email '{0}' is not a valid address")]
    InvalidRecipient(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Persisted channel configurations, edited by the settings surface and
/// read by the dispatcher at submit time.
pub struct ChannelStore {
    kv: Arc<dyn KvStore>,
}

impl ChannelStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub fn all(&self) -> Result<Vec<DeliveryChannel>, StorageError> {
        get_or_default(self.kv.as_ref(), CHANNELS_KEY)
    }

    /// Insert or replace a channel after validating its configuration.
    pub fn upsert(&self, channel: DeliveryChannel) -> Result<(), ChannelConfigError> {
        validate_channel(&channel)?;

        let mut channels = self.all()?;
        match channels.iter_mut().find(|c| c.id == channel.id) {
            Some(existing) => *existing = channel,
            None => channels.push(channel),
        }
        set_value(self.kv.as_ref(), CHANNELS_KEY, &channels)?;
        Ok(())
    }

    /// Remove a channel; returns whether it existed.
    pub fn remove(&self, id: &ChannelId) -> Result<bool, StorageError> {
        let mut channels = self.all()?;
        let before = channels.len();
        channels.retain(|c| &c.id != id);
        let removed = channels.len() != before;
        if removed {
            set_value(self.kv.as_ref(), CHANNELS_KEY, &channels)?;
        }
        Ok(removed)
    }
}

fn recipient_shape() -> &'static Regex {
    static RECIPIENT: OnceLock<Regex> = OnceLock::new();
    RECIPIENT.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static recipient pattern")
    })
}

fn validate_channel(channel: &DeliveryChannel) -> Result<(), ChannelConfigError> {
    match &channel.kind {
        ChannelKind::Webhook(config) => {
            let url = config.url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ChannelConfigError::InvalidUrl(config.url.clone()));
            }
        }
        ChannelKind::Email(config) => {
            if !recipient_shape().is_match(config.recipient_email.trim()) {
                return Err(ChannelConfigError::InvalidRecipient(
                    config.recipient_email.clone(),
                ));
            }
        }
    }
    Ok(())
}
