//! Local key-value persistence: submission history, channel configuration,
//! and the bounded delivery log.

pub mod channels;
pub mod delivery_log;
pub mod kv;
pub mod submissions;

pub use channels::{ChannelConfigError, ChannelStore};
pub use delivery_log::{DeliveryLogStore, DELIVERY_LOG_CAP};
pub use kv::{InMemoryKv, JsonFileKv, KvStore, StorageError};
pub use submissions::SubmissionStore;
