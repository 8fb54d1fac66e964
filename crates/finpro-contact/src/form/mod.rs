//! Multi-step contact form: domain records, per-step validation, and the
//! step navigator state machine.

pub mod countries;
pub mod domain;
pub mod stepper;
pub mod validation;

pub use countries::{lookup as lookup_country, CountryDialingCode, COUNTRY_DIALING_CODES};
pub use domain::{
    AttachmentDescriptor, ContactFormData, ContactFormSnapshot, Interest, StoredSubmission,
    SubmissionId, SubmissionPayload, MAX_ATTACHMENTS, MAX_ATTACHMENT_BYTES, MESSAGE_MAX_CHARS,
    MESSAGE_MIN_CHARS,
};
pub use stepper::StepNavigator;
pub use validation::{
    validate_all, validate_interest_consistency, validate_step, FormStep, ValidationErrors,
    TOTAL_STEPS,
};
