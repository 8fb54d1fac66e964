use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for configured delivery channels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub String);

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A configured notification target. Created and edited through the
/// settings surface, read by the dispatcher at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryChannel {
    pub id: ChannelId,
    pub name: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: ChannelKind,
}

/// Channel variants behind one dispatch call: an HTTP webhook POST or a
/// mailto-based email handoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChannelKind {
    Webhook(WebhookChannelConfig),
    Email(EmailChannelConfig),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookChannelConfig {
    pub url: String,
    /// Merged over the default `Content-Type: application/json`.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailChannelConfig {
    pub recipient_name: String,
    pub recipient_email: String,
    #[serde(default)]
    pub use_html_template: bool,
}

/// Outcome of one channel for one submission attempt. A failure here is
/// advisory: it is logged and surfaced but never fails the submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryResult {
    pub channel_id: ChannelId,
    pub channel_name: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl DeliveryResult {
    pub fn success(channel: &DeliveryChannel, status_code: Option<u16>) -> Self {
        Self {
            channel_id: channel.id.clone(),
            channel_name: channel.name.clone(),
            success: true,
            status_code,
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn failure(
        channel: &DeliveryChannel,
        status_code: Option<u16>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            channel_id: channel.id.clone(),
            channel_name: channel.name.clone(),
            success: false,
            status_code,
            error: Some(error.into()),
            timestamp: Utc::now(),
        }
    }
}
