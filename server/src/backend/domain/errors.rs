//! Error classification for the notification sweep and its input boundary.

use thiserror::Error;

/// Failures the sweep distinguishes between.
///
/// `DeliveryFailed` is never fatal to a sweep: the affected birthday keeps
/// `notified = false` and is retried on the next run. `StorageUnavailable`
/// aborts the sweep before any flags are committed.
#[derive(Debug, Error)]
pub enum SweepError {
    /// A birthdate that is not a valid calendar date reached the core.
    #[error("invalid calendar date: {0}")]
    InvalidDate(String),

    /// Sending mail to a recipient failed; the birthday stays due.
    #[error("delivery to {recipient} failed: {reason}")]
    DeliveryFailed { recipient: String, reason: String },

    /// The persistence gateway could not be read from or written to.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[source] anyhow::Error),
}
