//! Media upload orchestration — pre-signed slot request + binary push.
//!
//! An upload is two backend round-trips: ask for a slot, then PUT the file
//! bytes to the returned pre-signed URL. Failure at either stage aborts the
//! caller's flow with the purpose attached, and never leaves state pointing
//! at a remote object that was not written.

use std::sync::Arc;

use crate::api::{ProfileApi, UploadSlotRequest};
use crate::error::UploadError;
use crate::record::MediaFile;

/// What a media upload is for. Selects the slot endpoint and the filename /
/// MIME defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPurpose {
    Profile,
    IdCard,
}

impl UploadPurpose {
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Self::Profile => "profile.jpg",
            Self::IdCard => "id-card.jpg",
        }
    }

    pub fn default_mime_type(&self) -> &'static str {
        "image/jpeg"
    }
}

impl std::fmt::Display for UploadPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Profile => "profile photo",
            Self::IdCard => "identity document",
        };
        write!(f, "{s}")
    }
}

/// Pushes local media files to object storage through pre-signed slots.
pub struct MediaUploader {
    api: Arc<dyn ProfileApi>,
}

impl MediaUploader {
    pub fn new(api: Arc<dyn ProfileApi>) -> Self {
        Self { api }
    }

    /// Upload a local file for `purpose`, returning its publicly resolvable
    /// URL.
    pub async fn upload(
        &self,
        file: &MediaFile,
        purpose: UploadPurpose,
    ) -> Result<String, UploadError> {
        let filename = if file.file_name.is_empty() {
            purpose.default_file_name().to_string()
        } else {
            file.file_name.clone()
        };
        let content_type = if file.mime_type.is_empty() {
            purpose.default_mime_type().to_string()
        } else {
            file.mime_type.clone()
        };

        let request = UploadSlotRequest {
            filename,
            content_type: content_type.clone(),
        };
        let slot = self
            .api
            .request_upload_slot(purpose, &request)
            .await
            .map_err(|e| UploadError::Slot {
                purpose,
                reason: e.to_string(),
            })?;
        if slot.file_url.is_empty() {
            return Err(UploadError::Slot {
                purpose,
                reason: "response missing fileUrl".to_string(),
            });
        }

        let bytes = tokio::fs::read(local_path(&file.uri))
            .await
            .map_err(|e| UploadError::Transfer {
                purpose,
                reason: format!("read {}: {e}", file.uri),
            })?;

        tracing::debug!(%purpose, url = %slot.file_url, size = bytes.len(), "Pushing media");
        self.api
            .put_object(&slot.file_url, &content_type, bytes)
            .await
            .map_err(|e| UploadError::Transfer {
                purpose,
                reason: e.to_string(),
            })?;

        Ok(slot.public_url)
    }
}

/// Strip a `file://` scheme so the descriptor's URI can be read as a path.
fn local_path(uri: &str) -> &str {
    uri.strip_prefix("file://").unwrap_or(uri)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::api::{CompletionResponse, ProfileSubmission, UploadSlot, WorkerProfile};
    use crate::error::ApiError;

    /// Stub backend that records slot requests and pushed objects.
    #[derive(Default)]
    struct StubApi {
        slot_status: Option<u16>,
        omit_file_url: bool,
        slot_requests: Mutex<Vec<(UploadPurpose, UploadSlotRequest)>>,
        put_objects: Mutex<Vec<(String, String, Vec<u8>)>>,
    }

    #[async_trait]
    impl ProfileApi for StubApi {
        async fn request_upload_slot(
            &self,
            purpose: UploadPurpose,
            request: &UploadSlotRequest,
        ) -> Result<UploadSlot, ApiError> {
            self.slot_requests
                .lock()
                .unwrap()
                .push((purpose, request.clone()));
            if let Some(status) = self.slot_status {
                return Err(ApiError::Status {
                    url: "stub".to_string(),
                    status,
                    body: "upstream unavailable".to_string(),
                });
            }
            Ok(UploadSlot {
                file_key: "uploads/abc".to_string(),
                file_url: if self.omit_file_url {
                    String::new()
                } else {
                    "https://bucket.example/abc?signature=xyz".to_string()
                },
                public_url: "https://cdn.example/abc".to_string(),
            })
        }

        async fn put_object(
            &self,
            url: &str,
            content_type: &str,
            body: Vec<u8>,
        ) -> Result<(), ApiError> {
            self.put_objects
                .lock()
                .unwrap()
                .push((url.to_string(), content_type.to_string(), body));
            Ok(())
        }

        async fn complete_profile(
            &self,
            _submission: &ProfileSubmission,
        ) -> Result<CompletionResponse, ApiError> {
            unimplemented!("not used by upload tests")
        }

        async fn fetch_profile(&self) -> Result<WorkerProfile, ApiError> {
            unimplemented!("not used by upload tests")
        }
    }

    fn media_file(path: &std::path::Path) -> MediaFile {
        MediaFile {
            uri: path.to_string_lossy().into_owned(),
            mime_type: "image/png".to_string(),
            file_name: "me.png".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn upload_pushes_bytes_and_returns_public_url() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"jpeg bytes").unwrap();

        let api = Arc::new(StubApi::default());
        let uploader = MediaUploader::new(api.clone());

        let url = uploader
            .upload(&media_file(tmp.path()), UploadPurpose::Profile)
            .await
            .unwrap();
        assert_eq!(url, "https://cdn.example/abc");

        let puts = api.put_objects.lock().unwrap();
        assert_eq!(puts.len(), 1);
        let (put_url, content_type, body) = &puts[0];
        assert_eq!(put_url, "https://bucket.example/abc?signature=xyz");
        assert_eq!(content_type, "image/png");
        assert_eq!(body, b"jpeg bytes");
    }

    #[tokio::test]
    async fn upload_defaults_name_and_mime_by_purpose() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"x").unwrap();

        let api = Arc::new(StubApi::default());
        let uploader = MediaUploader::new(api.clone());

        let file = MediaFile {
            uri: tmp.path().to_string_lossy().into_owned(),
            ..Default::default()
        };
        uploader.upload(&file, UploadPurpose::IdCard).await.unwrap();

        let slots = api.slot_requests.lock().unwrap();
        let (purpose, request) = &slots[0];
        assert_eq!(*purpose, UploadPurpose::IdCard);
        assert_eq!(request.filename, "id-card.jpg");
        assert_eq!(request.content_type, "image/jpeg");
    }

    #[tokio::test]
    async fn slot_failure_maps_to_slot_error_and_skips_put() {
        let api = Arc::new(StubApi {
            slot_status: Some(500),
            ..Default::default()
        });
        let uploader = MediaUploader::new(api.clone());

        let err = uploader
            .upload(
                &MediaFile {
                    uri: "/nonexistent.jpg".to_string(),
                    ..Default::default()
                },
                UploadPurpose::IdCard,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Slot { .. }));
        assert_eq!(err.purpose(), UploadPurpose::IdCard);
        assert!(api.put_objects.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_file_url_is_a_slot_error() {
        let api = Arc::new(StubApi {
            omit_file_url: true,
            ..Default::default()
        });
        let uploader = MediaUploader::new(api);

        let err = uploader
            .upload(
                &MediaFile {
                    uri: "/nonexistent.jpg".to_string(),
                    ..Default::default()
                },
                UploadPurpose::Profile,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Slot { .. }));
    }

    #[tokio::test]
    async fn unreadable_local_file_is_a_transfer_error() {
        let api = Arc::new(StubApi::default());
        let uploader = MediaUploader::new(api.clone());

        let err = uploader
            .upload(
                &MediaFile {
                    uri: "file:///definitely/not/here.jpg".to_string(),
                    ..Default::default()
                },
                UploadPurpose::Profile,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Transfer { .. }));
        assert!(api.put_objects.lock().unwrap().is_empty());
    }

    #[test]
    fn local_path_strips_file_scheme() {
        assert_eq!(local_path("file:///tmp/a.jpg"), "/tmp/a.jpg");
        assert_eq!(local_path("/tmp/a.jpg"), "/tmp/a.jpg");
    }
}
