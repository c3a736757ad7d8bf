//! Error types for the onboarding engine.

use crate::upload::UploadPurpose;

/// Top-level error type for the engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Submission error: {0}")]
    Submit(#[from] SubmitError),
}

/// Local draft persistence errors.
///
/// These never fail the triggering mutation: writes are logged and dropped,
/// reads fall back to a default record.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to open draft store: {0}")]
    Open(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),
}

/// Backend transport errors underneath uploads and submission.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },
}

/// Media upload errors, tagged with the upload that failed.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The upload-slot request did not yield a usable pre-signed URL
    /// (non-200 response or missing `fileUrl`).
    #[error("Upload slot request for {purpose} failed: {reason}")]
    Slot {
        purpose: UploadPurpose,
        reason: String,
    },

    /// Reading the local file or transferring its bytes failed. The remote
    /// object is never referenced on this path.
    #[error("Upload of {purpose} failed: {reason}")]
    Transfer {
        purpose: UploadPurpose,
        reason: String,
    },
}

impl UploadError {
    /// Which upload failed.
    pub fn purpose(&self) -> UploadPurpose {
        match self {
            Self::Slot { purpose, .. } | Self::Transfer { purpose, .. } => *purpose,
        }
    }
}

/// Submission errors. The draft is preserved on every variant so the worker
/// can retry without re-entering data.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("{0}")]
    Upload(#[from] UploadError),

    /// The backend rejected the completion payload. `message` carries the
    /// backend's own message when the response body had one.
    #[error("Profile submission rejected: {message}")]
    Rejected { message: String },

    #[error("Profile submission failed: {0}")]
    Api(#[from] ApiError),
}

/// Result type alias for the engine.
pub type Result<T> = std::result::Result<T, Error>;
