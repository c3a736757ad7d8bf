//! Backend API — wire types and the `ProfileApi` seam.
//!
//! The trait keeps the engine testable: the submission and upload paths are
//! exercised against stub implementations, while [`http::HttpProfileApi`]
//! talks to the real backend.

pub mod http;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::record::Location;
use crate::upload::UploadPurpose;

pub use http::HttpProfileApi;

/// Body of an upload-slot request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSlotRequest {
    pub filename: String,
    pub content_type: String,
}

/// A pre-signed upload slot issued by the backend.
///
/// `file_url` is the time-limited write URL; `public_url` is where the
/// object resolves once written. Fields default to empty so a malformed
/// response surfaces as a slot failure rather than a decode panic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSlot {
    #[serde(default)]
    pub file_key: String,
    #[serde(default)]
    pub file_url: String,
    #[serde(default)]
    pub public_url: String,
}

/// The aggregated profile committed at the end of onboarding. Media fields
/// are omitted from the wire payload when nothing was uploaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSubmission {
    pub bio: String,
    pub phone: String,
    pub location: Location,
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_card: Option<String>,
}

/// Response of the profile-completion endpoint. Success is signaled by the
/// HTTP status; the body is advisory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// The committed worker profile returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerProfile {
    pub id: Uuid,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub id_card: Option<String>,
    #[serde(default)]
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Backend operations the engine depends on.
#[async_trait]
pub trait ProfileApi: Send + Sync {
    /// Request a pre-signed upload slot for the given purpose.
    async fn request_upload_slot(
        &self,
        purpose: UploadPurpose,
        request: &UploadSlotRequest,
    ) -> Result<UploadSlot, ApiError>;

    /// Raw binary PUT of file bytes to a pre-signed URL.
    async fn put_object(
        &self,
        url: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<(), ApiError>;

    /// Commit the aggregated profile.
    async fn complete_profile(
        &self,
        submission: &ProfileSubmission,
    ) -> Result<CompletionResponse, ApiError>;

    /// Fetch the caller's committed profile.
    async fn fetch_profile(&self) -> Result<WorkerProfile, ApiError>;
}
