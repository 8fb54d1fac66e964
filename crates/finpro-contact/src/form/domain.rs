use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of attachments a single submission may carry.
pub const MAX_ATTACHMENTS: usize = 5;
/// Maximum size of a single attachment in bytes (10 MB).
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;
/// Minimum trimmed message length when a message is provided.
pub const MESSAGE_MIN_CHARS: usize = 10;
/// Maximum trimmed message length.
pub const MESSAGE_MAX_CHARS: usize = 1000;

/// Interest categories offered by the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Interest {
    Consulting,
    Formation,
}

impl Interest {
    pub const fn label(self) -> &'static str {
        match self {
            Interest::Consulting => "Consulting",
            Interest::Formation => "Formation",
        }
    }
}

/// Metadata for an attached file. Raw bytes never enter the pipeline;
/// the form layer uploads them separately and only the descriptor is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentDescriptor {
    pub file_name: String,
    pub size_bytes: u64,
}

/// The single mutable record built across the wizard steps.
///
/// Optional text fields use the empty string as "not provided", mirroring
/// what the form controls emit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactFormData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub interests: BTreeSet<Interest>,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub modules: Vec<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub attachments: Vec<AttachmentDescriptor>,
}

impl ContactFormData {
    /// Snapshot for persistence and delivery: every field except the
    /// attachment descriptors themselves.
    pub fn snapshot(&self) -> ContactFormSnapshot {
        ContactFormSnapshot {
            name: self.name.clone(),
            email: self.email.clone(),
            country_code: self.country_code.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            interests: self.interests.iter().copied().collect(),
            services: self.services.clone(),
            modules: self.modules.clone(),
            message: self.message.clone(),
        }
    }
}

/// Immutable copy of the form fields carried by payloads and stored records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFormSnapshot {
    pub name: String,
    pub email: String,
    pub country_code: String,
    pub phone: String,
    pub address: String,
    pub interests: Vec<Interest>,
    pub services: Vec<String>,
    pub modules: Vec<String>,
    pub message: String,
}

/// Identifier wrapper for stored submissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

impl std::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wire shape handed to every delivery channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub form_data: ContactFormSnapshot,
    pub submitted_at: DateTime<Utc>,
    pub attachment_count: usize,
}

/// Append-only record of a completed submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSubmission {
    pub id: SubmissionId,
    pub form_data: ContactFormSnapshot,
    pub submitted_at: DateTime<Utc>,
    pub attachment_count: usize,
}

impl StoredSubmission {
    pub fn payload(&self) -> SubmissionPayload {
        SubmissionPayload {
            form_data: self.form_data.clone(),
            submitted_at: self.submitted_at,
            attachment_count: self.attachment_count,
        }
    }
}
