//! Fan-out delivery of accepted submissions to configured notification
//! channels, with isolated per-channel failure reporting.

pub mod channel;
pub mod dispatcher;
pub mod email;
pub mod templates;
pub mod webhook;

pub use channel::{
    ChannelId, ChannelKind, DeliveryChannel, DeliveryResult, EmailChannelConfig,
    WebhookChannelConfig,
};
pub use dispatcher::DeliveryDispatcher;
pub use email::{ComposedEmail, MailGateway, MailHandoffError, TracingMailGateway};
pub use templates::{render as render_email, RenderedEmail, TemplateKind};
pub use webhook::{
    is_loopback_url, ReqwestTransport, TransportError, WebhookTransport, WEBHOOK_TIMEOUT,
};
