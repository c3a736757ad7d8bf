//! reqwest-backed `ProfileApi` implementation.

use async_trait::async_trait;
use secrecy::ExposeSecret;

use crate::api::{
    CompletionResponse, ProfileApi, ProfileSubmission, UploadSlot, UploadSlotRequest,
    WorkerProfile,
};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::upload::UploadPurpose;

const PROFILE_PHOTO_SLOT_PATH: &str = "/uploads/profile-photo";
const ID_CARD_SLOT_PATH: &str = "/uploads/id-card";
const PROFILE_PATH: &str = "/workers/me/profile";
const ME_PATH: &str = "/workers/me";

/// HTTP client for the marketplace backend.
///
/// Bearer-authenticated with the worker's session token, except for the raw
/// object-storage PUT: pre-signed URLs carry their own authorization.
pub struct HttpProfileApi {
    config: ApiConfig,
    client: reqwest::Client,
}

impl HttpProfileApi {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    fn slot_path(purpose: UploadPurpose) -> &'static str {
        match purpose {
            UploadPurpose::Profile => PROFILE_PHOTO_SLOT_PATH,
            UploadPurpose::IdCard => ID_CARD_SLOT_PATH,
        }
    }
}

#[async_trait]
impl ProfileApi for HttpProfileApi {
    async fn request_upload_slot(
        &self,
        purpose: UploadPurpose,
        request: &UploadSlotRequest,
    ) -> Result<UploadSlot, ApiError> {
        let url = self.endpoint(Self::slot_path(purpose));
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.auth_token.expose_secret())
            .timeout(self.config.request_timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Request {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                url,
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<UploadSlot>()
            .await
            .map_err(|e| ApiError::InvalidResponse {
                url,
                reason: e.to_string(),
            })
    }

    async fn put_object(
        &self,
        url: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .timeout(self.config.request_timeout)
            .body(body)
            .send()
            .await
            .map_err(|e| ApiError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    async fn complete_profile(
        &self,
        submission: &ProfileSubmission,
    ) -> Result<CompletionResponse, ApiError> {
        let url = self.endpoint(PROFILE_PATH);

        let location = serde_json::to_string(&submission.location).map_err(|e| {
            ApiError::Request {
                url: url.clone(),
                reason: format!("serialize location: {e}"),
            }
        })?;
        let skills =
            serde_json::to_string(&submission.skills).map_err(|e| ApiError::Request {
                url: url.clone(),
                reason: format!("serialize skills: {e}"),
            })?;

        let mut form = reqwest::multipart::Form::new()
            .text("bio", submission.bio.clone())
            .text("phone", submission.phone.clone())
            .text("location", location)
            .text("skills", skills);
        if let Some(profile_image) = &submission.profile_image {
            form = form.text("profileImage", profile_image.clone());
        }
        if let Some(id_card) = &submission.id_card {
            form = form.text("idCard", id_card.clone());
        }

        let response = self
            .client
            .put(&url)
            .bearer_auth(self.config.auth_token.expose_secret())
            .timeout(self.config.request_timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Request {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                url,
                status: status.as_u16(),
                body,
            });
        }

        // Success is the 200; the body is advisory and may be empty.
        let body = response.text().await.unwrap_or_default();
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    async fn fetch_profile(&self) -> Result<WorkerProfile, ApiError> {
        let url = self.endpoint(ME_PATH);
        let response = self
            .client
            .get(&url)
            .bearer_auth(self.config.auth_token.expose_secret())
            .timeout(self.config.request_timeout)
            .send()
            .await
            .map_err(|e| ApiError::Request {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                url,
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<WorkerProfile>()
            .await
            .map_err(|e| ApiError::InvalidResponse {
                url,
                reason: e.to_string(),
            })
    }
}
