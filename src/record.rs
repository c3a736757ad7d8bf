//! Onboarding record — the canonical in-progress worker profile.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Total number of onboarding steps (five data steps + review).
pub const TOTAL_STEPS: u8 = 6;

/// The onboarding steps, in display order.
///
/// Progresses linearly: BasicInfo → Location → Skills → ProfilePhoto →
/// IdentityDocument → Review. Steps are numbered 1-based for display and
/// for the persisted step pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    BasicInfo,
    Location,
    Skills,
    ProfilePhoto,
    IdentityDocument,
    Review,
}

impl Step {
    /// 1-based step number, as displayed and persisted.
    pub fn number(&self) -> u8 {
        match self {
            Self::BasicInfo => 1,
            Self::Location => 2,
            Self::Skills => 3,
            Self::ProfilePhoto => 4,
            Self::IdentityDocument => 5,
            Self::Review => 6,
        }
    }

    /// Parse a 1-based step number. `None` outside `1..=TOTAL_STEPS`.
    pub fn from_number(n: u8) -> Option<Step> {
        match n {
            1 => Some(Self::BasicInfo),
            2 => Some(Self::Location),
            3 => Some(Self::Skills),
            4 => Some(Self::ProfilePhoto),
            5 => Some(Self::IdentityDocument),
            6 => Some(Self::Review),
            _ => None,
        }
    }

    /// Get the next step in the linear progression, if any.
    pub fn next(&self) -> Option<Step> {
        Self::from_number(self.number() + 1)
    }

    /// Get the previous step, if any.
    pub fn previous(&self) -> Option<Step> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    /// Whether this is the terminal review step.
    pub fn is_review(&self) -> bool {
        matches!(self, Self::Review)
    }
}

impl Default for Step {
    fn default() -> Self {
        Self::BasicInfo
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::BasicInfo => "basic_info",
            Self::Location => "location",
            Self::Skills => "skills",
            Self::ProfilePhoto => "profile_photo",
            Self::IdentityDocument => "identity_document",
            Self::Review => "review",
        };
        write!(f, "{s}")
    }
}

/// Worker location, collected in step 2. `town` and `street` are optional
/// and stay empty when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub town: String,
    #[serde(default)]
    pub street: String,
}

/// A locally picked media file.
///
/// Either fully empty (`uri` empty) or a non-empty `uri` with a non-empty
/// `mime_type` and `file_name` — normalization applies purpose defaults
/// before the descriptor lands in the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl MediaFile {
    /// Whether no file has been picked.
    pub fn is_empty(&self) -> bool {
        self.uri.is_empty()
    }

    /// Fill missing `mime_type`/`file_name` with defaults. Empty descriptors
    /// stay empty.
    pub(crate) fn normalized(mut self, default_mime: &str, default_name: &str) -> Self {
        if self.uri.is_empty() {
            return Self::default();
        }
        if self.mime_type.is_empty() {
            self.mime_type = default_mime.to_string();
        }
        if self.file_name.is_empty() {
            self.file_name = default_name.to_string();
        }
        self
    }
}

/// Identity document descriptor. `front` and `back` hold the uploaded page
/// URLs once the document has been pushed to object storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdCardFile {
    #[serde(flatten)]
    pub file: MediaFile,
    #[serde(default)]
    pub front: String,
    #[serde(default)]
    pub back: String,
}

/// The single source of truth for an in-progress onboarding.
///
/// Serialization covers only the durable draft payload: `current_step` is
/// persisted under its own key (see [`draft_keys`]), and `is_submitting` /
/// `errors` are transient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnboardingRecord {
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: Location,
    /// Insertion order is meaningful for display; duplicates are rejected
    /// on update.
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub profile_image: MediaFile,
    #[serde(default)]
    pub id_card: IdCardFile,
    #[serde(skip)]
    pub current_step: Step,
    #[serde(skip)]
    pub is_submitting: bool,
    #[serde(skip)]
    pub errors: BTreeMap<String, String>,
}

/// Draft store keys. The payload and the step pointer are persisted as two
/// independent entries (legacy layout) and every write path writes both.
pub mod draft_keys {
    /// JSON-serialized draft payload, step excluded.
    pub const DRAFT_DATA: &str = "onboarding_draft_data";
    /// Stringified 1-based step number.
    pub const DRAFT_STEP: &str = "onboarding_draft_step";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_numbers_are_dense() {
        for n in 1..=TOTAL_STEPS {
            let step = Step::from_number(n).unwrap();
            assert_eq!(step.number(), n);
        }
        assert!(Step::from_number(0).is_none());
        assert!(Step::from_number(TOTAL_STEPS + 1).is_none());
    }

    #[test]
    fn step_walks_forward_and_back() {
        let mut step = Step::BasicInfo;
        let mut visited = vec![step];
        while let Some(next) = step.next() {
            step = next;
            visited.push(step);
        }
        assert_eq!(visited.len(), TOTAL_STEPS as usize);
        assert!(step.is_review());
        assert!(step.next().is_none());

        while let Some(prev) = step.previous() {
            step = prev;
        }
        assert_eq!(step, Step::BasicInfo);
        assert!(step.previous().is_none());
    }

    #[test]
    fn step_display_matches_serde() {
        for n in 1..=TOTAL_STEPS {
            let step = Step::from_number(n).unwrap();
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(json, format!("\"{step}\""));
        }
    }

    #[test]
    fn media_normalization_fills_defaults() {
        let file = MediaFile {
            uri: "file:///tmp/photo-1.jpg".to_string(),
            ..Default::default()
        };
        let normalized = file.normalized("image/jpeg", "profile.jpg");
        assert_eq!(normalized.mime_type, "image/jpeg");
        assert_eq!(normalized.file_name, "profile.jpg");
    }

    #[test]
    fn media_normalization_keeps_explicit_fields() {
        let file = MediaFile {
            uri: "file:///tmp/photo-1.png".to_string(),
            mime_type: "image/png".to_string(),
            file_name: "me.png".to_string(),
            width: Some(640),
            height: Some(480),
        };
        let normalized = file.clone().normalized("image/jpeg", "profile.jpg");
        assert_eq!(normalized, file);
    }

    #[test]
    fn empty_media_stays_empty_after_normalization() {
        let normalized = MediaFile::default().normalized("image/jpeg", "profile.jpg");
        assert!(normalized.is_empty());
        assert!(normalized.mime_type.is_empty());
        assert!(normalized.file_name.is_empty());
    }

    #[test]
    fn draft_payload_excludes_transient_fields() {
        let mut record = OnboardingRecord {
            bio: "Experienced plumber".to_string(),
            ..Default::default()
        };
        record.current_step = Step::Skills;
        record.is_submitting = true;
        record.errors.insert("bio".to_string(), "Too short".to_string());

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("current_step").is_none());
        assert!(json.get("is_submitting").is_none());
        assert!(json.get("errors").is_none());
        assert_eq!(json["bio"], "Experienced plumber");
    }

    #[test]
    fn draft_payload_roundtrip() {
        let record = OnboardingRecord {
            bio: "Painter and decorator, ten years".to_string(),
            phone: "0551234567".to_string(),
            location: Location {
                region: "Greater Accra".to_string(),
                city: "Accra".to_string(),
                town: "Osu".to_string(),
                street: String::new(),
            },
            skills: vec!["Painting".to_string(), "Plastering".to_string()],
            ..Default::default()
        };

        let json = serde_json::to_string(&record).unwrap();
        let parsed: OnboardingRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn id_card_serializes_flat() {
        let id_card = IdCardFile {
            file: MediaFile {
                uri: "file:///tmp/id.jpg".to_string(),
                mime_type: "image/jpeg".to_string(),
                file_name: "id-card.jpg".to_string(),
                width: None,
                height: None,
            },
            front: "https://cdn.example/id-front.jpg".to_string(),
            back: String::new(),
        };
        let json = serde_json::to_value(&id_card).unwrap();
        assert_eq!(json["uri"], "file:///tmp/id.jpg");
        assert_eq!(json["front"], "https://cdn.example/id-front.jpg");
    }

    #[test]
    fn empty_payload_parses_to_defaults() {
        let parsed: OnboardingRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, OnboardingRecord::default());
        assert_eq!(parsed.current_step, Step::BasicInfo);
    }
}
