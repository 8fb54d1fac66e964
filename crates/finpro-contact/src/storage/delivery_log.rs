use std::sync::Arc;

use crate::delivery::DeliveryResult;

use super::kv::{get_or_default, set_value, KvStore, StorageError};

const DELIVERY_LOG_KEY: &str = "delivery-logs";

/// Most-recent entries kept in the delivery log; older ones are dropped.
pub const DELIVERY_LOG_CAP: usize = 100;

/// Bounded log of per-channel delivery outcomes, appended after every
/// dispatch and read by the settings/inspection surfaces.
pub struct DeliveryLogStore {
    kv: Arc<dyn KvStore>,
}

impl DeliveryLogStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Append a dispatch's results, trimming to the most recent
    /// [`DELIVERY_LOG_CAP`] entries, oldest dropped first.
    pub fn append(&self, results: &[DeliveryResult]) -> Result<(), StorageError> {
        if results.is_empty() {
            return Ok(());
        }

        let mut log: Vec<DeliveryResult> = get_or_default(self.kv.as_ref(), DELIVERY_LOG_KEY)?;
        log.extend_from_slice(results);
        if log.len() > DELIVERY_LOG_CAP {
            log.drain(..log.len() - DELIVERY_LOG_CAP);
        }
        set_value(self.kv.as_ref(), DELIVERY_LOG_KEY, &log)
    }

    /// Entries in append order, oldest first.
    pub fn recent(&self) -> Result<Vec<DeliveryResult>, StorageError> {
        get_or_default(self.kv.as_ref(), DELIVERY_LOG_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::{ChannelId, DeliveryResult};
    use crate::storage::kv::InMemoryKv;
    use chrono::Utc;

    fn result(tag: usize) -> DeliveryResult {
        DeliveryResult {
            channel_id: ChannelId(format!("ch-{tag}")),
            channel_name: format!("channel {tag}"),
            success: tag % 2 == 0,
            status_code: None,
            error: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn log_never_exceeds_the_cap_and_drops_oldest_first() {
        let store = DeliveryLogStore::new(Arc::new(InMemoryKv::new()));

        // 40 dispatches x 3 channels = 120 entries
        for dispatch in 0..40 {
            let batch: Vec<DeliveryResult> =
                (0..3).map(|i| result(dispatch * 3 + i)).collect();
            store.append(&batch).expect("append");
        }

        let log = store.recent().expect("recent");
        assert_eq!(log.len(), DELIVERY_LOG_CAP);
        assert_eq!(log.first().expect("first").channel_id.0, "ch-20");
        assert_eq!(log.last().expect("last").channel_id.0, "ch-119");
    }

    #[test]
    fn empty_batches_do_not_touch_the_log() {
        let store = DeliveryLogStore::new(Arc::new(InMemoryKv::new()));
        store.append(&[]).expect("append");
        assert!(store.recent().expect("recent").is_empty());
    }
}
