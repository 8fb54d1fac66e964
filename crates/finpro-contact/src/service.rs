use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::delivery::{DeliveryChannel, DeliveryDispatcher, DeliveryResult, MailGateway, WebhookTransport};
use crate::export::{submissions_to_csv, submissions_to_html, ExportError};
use crate::form::{
    validate_all, validate_interest_consistency, ContactFormData, StoredSubmission, SubmissionId,
    ValidationErrors,
};
use crate::storage::{
    ChannelConfigError, ChannelStore, DeliveryLogStore, KvStore, StorageError, SubmissionStore,
};

/// First id to hand out: one past the highest `sub-{n}` already in the
/// store, so a restart over a persistent store never reissues an id.
fn sequence_start(submissions: &SubmissionStore) -> u64 {
    match submissions.all() {
        Ok(all) => all
            .iter()
            .filter_map(|s| s.id.0.strip_prefix("sub-"))
            .filter_map(|n| n.parse::<u64>().ok())
            .max()
            .map_or(1, |max| max + 1),
        Err(err) => {
            warn!(error = %err, "could not read submission history, id sequence starts at 1");
            1
        }
    }
}

/// Error raised by the intake service. Only validation and the initial
/// persistence write can fail a submission; delivery-channel failures are
/// advisory and live in the outcome's result list.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("submission failed validation")]
    Invalid(ValidationErrors),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("submission '{0}' not found")]
    NotFound(SubmissionId),
}

/// What the caller gets back from a successful submission: the persisted
/// record and every channel's outcome, in channel-list order.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub submission: StoredSubmission,
    pub delivery: Vec<DeliveryResult>,
}

/// Service composing validation, the submission store, the channel
/// configuration, and the delivery fan-out.
pub struct ContactIntakeService {
    submissions: SubmissionStore,
    channels: ChannelStore,
    delivery_log: DeliveryLogStore,
    dispatcher: DeliveryDispatcher,
    sequence: AtomicU64,
}

impl ContactIntakeService {
    pub fn new(
        kv: Arc<dyn KvStore>,
        transport: Arc<dyn WebhookTransport>,
        mail: Arc<dyn MailGateway>,
    ) -> Self {
        let submissions = SubmissionStore::new(kv.clone());
        let sequence = AtomicU64::new(sequence_start(&submissions));
        Self {
            submissions,
            channels: ChannelStore::new(kv.clone()),
            delivery_log: DeliveryLogStore::new(kv),
            dispatcher: DeliveryDispatcher::new(transport, mail),
            sequence,
        }
    }

    fn next_submission_id(&self) -> SubmissionId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        SubmissionId(format!("sub-{id:06}"))
    }

    /// Accept a completed form: validate every step, persist the snapshot,
    /// then fan out to the configured channels.
    ///
    /// The persistence write is sequenced strictly before the fan-out, and
    /// the submission's success depends only on that write.
    pub async fn submit(&self, form: ContactFormData) -> Result<SubmissionOutcome, IntakeError> {
        let mut errors = validate_all(&form);
        errors.extend(validate_interest_consistency(&form));
        if !errors.is_empty() {
            return Err(IntakeError::Invalid(errors));
        }

        let submission = StoredSubmission {
            id: self.next_submission_id(),
            form_data: form.snapshot(),
            submitted_at: Utc::now(),
            attachment_count: form.attachments.len(),
        };

        self.submissions.append(&submission)?;
        info!(id = %submission.id, "submission persisted");

        let delivery = self.fan_out(&submission).await;

        Ok(SubmissionOutcome {
            submission,
            delivery,
        })
    }

    /// Re-run the fan-out for an already stored submission.
    pub async fn redispatch(&self, id: &SubmissionId) -> Result<Vec<DeliveryResult>, IntakeError> {
        let submission = self
            .submissions
            .find(id)?
            .ok_or_else(|| IntakeError::NotFound(id.clone()))?;
        Ok(self.fan_out(&submission).await)
    }

    async fn fan_out(&self, submission: &StoredSubmission) -> Vec<DeliveryResult> {
        // A failed channel read only suppresses notifications; the
        // submission already stands on its own.
        let channels = match self.channels.all() {
            Ok(channels) => channels,
            Err(err) => {
                warn!(error = %err, "channel configuration unavailable, skipping fan-out");
                return Vec::new();
            }
        };

        let payload = submission.payload();
        let results = self.dispatcher.dispatch(&payload, &channels).await;

        if let Err(err) = self.delivery_log.append(&results) {
            warn!(error = %err, "failed to append delivery log");
        }

        results
    }

    pub fn history(&self) -> Result<Vec<StoredSubmission>, StorageError> {
        self.submissions.all()
    }

    pub fn export_csv(&self) -> Result<String, IntakeError> {
        let submissions = self.submissions.all()?;
        Ok(submissions_to_csv(&submissions)?)
    }

    pub fn export_html(&self) -> Result<String, IntakeError> {
        let submissions = self.submissions.all()?;
        Ok(submissions_to_html(&submissions))
    }

    pub fn recent_deliveries(&self) -> Result<Vec<DeliveryResult>, StorageError> {
        self.delivery_log.recent()
    }

    pub fn list_channels(&self) -> Result<Vec<DeliveryChannel>, StorageError> {
        self.channels.all()
    }

    pub fn upsert_channel(&self, channel: DeliveryChannel) -> Result<(), ChannelConfigError> {
        self.channels.upsert(channel)
    }

    pub fn remove_channel(
        &self,
        id: &crate::delivery::ChannelId,
    ) -> Result<bool, StorageError> {
        self.channels.remove(id)
    }
}
