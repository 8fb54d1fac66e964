//! Contact intake pipeline for the FinancePro marketing site.
//!
//! The crate validates multi-step contact forms, persists accepted
//! submissions, and fans each one out to the configured delivery
//! channels (webhooks and email hand-off). The HTTP surface in
//! [`router`] exposes the whole pipeline to the frontend.

pub mod config;
pub mod delivery;
pub mod error;
pub mod export;
pub mod form;
pub mod router;
pub mod service;
pub mod storage;
pub mod telemetry;

pub use error::AppError;
pub use router::contact_router;
pub use service::{ContactIntakeService, IntakeError, SubmissionOutcome};
