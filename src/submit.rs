//! Submission coordination — uploads, commit, profile refresh, draft clear.
//!
//! One submission is a short pipeline over the current record: push pending
//! media (sequenced, so a failure names exactly one upload), commit the
//! aggregated profile, refresh the cached worker identity, then clear the
//! draft. Any failure leaves the draft intact for retry.

use std::sync::Arc;

use crate::actions::IdCardPatch;
use crate::api::{CompletionResponse, ProfileApi, ProfileSubmission};
use crate::engine::OnboardingEngine;
use crate::error::{ApiError, SubmitError};
use crate::record::MediaFile;
use crate::upload::{MediaUploader, UploadPurpose};

/// Phases of one submission request. Request-scoped only: never persisted,
/// surfaced through tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Uploading,
    Submitting,
    Done,
    Failed,
}

impl SubmitPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl std::fmt::Display for SubmitPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Uploading => "uploading",
            Self::Submitting => "submitting",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Drives the terminal submission of an onboarding record.
pub struct SubmissionCoordinator {
    engine: Arc<OnboardingEngine>,
    api: Arc<dyn ProfileApi>,
    uploader: MediaUploader,
}

impl SubmissionCoordinator {
    pub fn new(engine: Arc<OnboardingEngine>, api: Arc<dyn ProfileApi>) -> Self {
        let uploader = MediaUploader::new(Arc::clone(&api));
        Self {
            engine,
            api,
            uploader,
        }
    }

    /// Submit the current record.
    ///
    /// On success the draft is cleared and the record reset; on any failure
    /// the submitting flag resets and the draft survives so the worker can
    /// retry without re-entering data.
    pub async fn submit(&self) -> Result<CompletionResponse, SubmitError> {
        self.engine.set_submitting(true).await;
        match self.run().await {
            Ok(response) => {
                self.engine.clear_progress().await;
                tracing::info!(phase = %SubmitPhase::Done, "Profile submitted");
                Ok(response)
            }
            Err(e) => {
                self.engine.set_submitting(false).await;
                tracing::warn!(phase = %SubmitPhase::Failed, "Submission failed: {e}");
                Err(e)
            }
        }
    }

    async fn run(&self) -> Result<CompletionResponse, SubmitError> {
        let record = self.engine.snapshot().await;

        // Explicit ordered upload plan: profile photo, then the identity
        // document, short-circuiting on the first failure.
        let mut plan: Vec<(UploadPurpose, MediaFile)> = Vec::new();
        if !record.profile_image.is_empty() {
            plan.push((UploadPurpose::Profile, record.profile_image.clone()));
        }
        if !record.id_card.file.is_empty() {
            plan.push((UploadPurpose::IdCard, record.id_card.file.clone()));
        }

        let mut profile_image_url = None;
        let mut id_card_url = None;
        if !plan.is_empty() {
            tracing::debug!(phase = %SubmitPhase::Uploading, count = plan.len(), "Uploading media");
        }
        for (purpose, file) in &plan {
            let url = self.uploader.upload(file, *purpose).await?;
            match purpose {
                UploadPurpose::Profile => profile_image_url = Some(url),
                UploadPurpose::IdCard => {
                    // The uploaded page becomes the document's front URL.
                    self.engine
                        .update_id_card(IdCardPatch {
                            front: Some(url.clone()),
                            ..Default::default()
                        })
                        .await;
                    id_card_url = Some(url);
                }
            }
        }

        let submission = ProfileSubmission {
            bio: record.bio.clone(),
            phone: record.phone.clone(),
            location: record.location.clone(),
            skills: record.skills.clone(),
            profile_image: profile_image_url,
            id_card: id_card_url,
        };
        tracing::debug!(phase = %SubmitPhase::Submitting, "Committing profile");
        let response = self
            .api
            .complete_profile(&submission)
            .await
            .map_err(into_submit_error)?;

        // Refresh the cached identity. The commit already succeeded, so a
        // failed fetch is logged rather than failing the submission.
        match self.api.fetch_profile().await {
            Ok(profile) => self.engine.set_active_profile(profile).await,
            Err(e) => tracing::warn!("Failed to refresh worker profile: {e}"),
        }

        Ok(response)
    }
}

/// Map a commit failure to a user-surfaceable rejection, preferring the
/// backend's own message when the response body carries one.
fn into_submit_error(error: ApiError) -> SubmitError {
    match &error {
        ApiError::Status { body, .. } => {
            let message = serde_json::from_str::<serde_json::Value>(body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                .unwrap_or_else(|| {
                    "Could not complete your profile. Please try again.".to_string()
                });
            SubmitError::Rejected { message }
        }
        _ => SubmitError::Api(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_terminal() {
        assert!(SubmitPhase::Done.is_terminal());
        assert!(SubmitPhase::Failed.is_terminal());
        assert!(!SubmitPhase::Idle.is_terminal());
        assert!(!SubmitPhase::Uploading.is_terminal());
        assert!(!SubmitPhase::Submitting.is_terminal());
    }

    #[test]
    fn rejection_uses_backend_message() {
        let error = ApiError::Status {
            url: "https://api.taskerapp.example/workers/me/profile".to_string(),
            status: 422,
            body: r#"{"message":"Phone number already registered"}"#.to_string(),
        };
        match into_submit_error(error) {
            SubmitError::Rejected { message } => {
                assert_eq!(message, "Phone number already registered");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn rejection_falls_back_to_generic_message() {
        let error = ApiError::Status {
            url: "https://api.taskerapp.example/workers/me/profile".to_string(),
            status: 500,
            body: "<html>Internal Server Error</html>".to_string(),
        };
        match into_submit_error(error) {
            SubmitError::Rejected { message } => {
                assert!(message.contains("try again"));
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn transport_failures_stay_api_errors() {
        let error = ApiError::Request {
            url: "https://api.taskerapp.example/workers/me/profile".to_string(),
            reason: "connection refused".to_string(),
        };
        assert!(matches!(into_submit_error(error), SubmitError::Api(_)));
    }
}
