//! Tagged mutation actions and the pure transition function.
//!
//! Every mutation of the onboarding record is a variant of [`Action`],
//! applied by [`apply`] — a pure `(record, action) → record` function with
//! no I/O. The whole state machine is testable without a store or a
//! backend; the engine layers persistence on top.

use std::collections::BTreeMap;

use crate::record::{MediaFile, OnboardingRecord, Step};
use crate::validate;

/// Defaults applied when a profile photo descriptor omits them.
pub(crate) const PROFILE_IMAGE_MIME: &str = "image/jpeg";
pub(crate) const PROFILE_IMAGE_NAME: &str = "profile.jpg";

/// Defaults for the identity document descriptor.
pub(crate) const ID_CARD_MIME: &str = "image/jpeg";
pub(crate) const ID_CARD_NAME: &str = "id-card.jpg";

/// Partial location update; unset fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct LocationPatch {
    pub region: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub street: Option<String>,
}

/// Partial identity-document update; unset fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct IdCardPatch {
    pub uri: Option<String>,
    pub mime_type: Option<String>,
    pub file_name: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub front: Option<String>,
    pub back: Option<String>,
}

/// A mutation of the onboarding record.
#[derive(Debug, Clone)]
pub enum Action {
    /// Merge the supplied basic-info fields, clearing their errors.
    UpdateBasicInfo {
        bio: Option<String>,
        phone: Option<String>,
    },

    /// Shallow-merge into the location, clearing location errors.
    UpdateLocation(LocationPatch),

    /// Replace the skill list wholesale (deduplicated, insertion order
    /// preserved), clearing the skills error.
    UpdateSkills(Vec<String>),

    /// Replace the profile photo with a normalized descriptor.
    UpdateProfileImage(MediaFile),

    /// Merge into the identity document and normalize defaults.
    UpdateIdCard(IdCardPatch),

    /// Advance one step. Validation-gated: rule failures land in `errors`
    /// and the step does not change.
    NextStep,

    /// Go back one step, clearing errors. No-op on the first step.
    PreviousStep,

    /// Jump to a 1-based step number, clearing errors. No-op out of range.
    GoToStep(u8),

    /// Replace the error map wholesale (not merged).
    SetErrors(BTreeMap<String, String>),

    /// Empty the error map.
    ClearErrors,

    /// Restore every field to its default.
    Reset,
}

/// Apply `action` to a snapshot of the record, returning the new record.
pub fn apply(record: &OnboardingRecord, action: Action) -> OnboardingRecord {
    let mut next = record.clone();

    match action {
        Action::UpdateBasicInfo { bio, phone } => {
            if let Some(bio) = bio {
                next.bio = bio;
                next.errors.remove("bio");
            }
            if let Some(phone) = phone {
                next.phone = phone;
                next.errors.remove("phone");
            }
        }
        Action::UpdateLocation(patch) => {
            if let Some(region) = patch.region {
                next.location.region = region;
            }
            if let Some(city) = patch.city {
                next.location.city = city;
            }
            if let Some(town) = patch.town {
                next.location.town = town;
            }
            if let Some(street) = patch.street {
                next.location.street = street;
            }
            next.errors.remove("region");
            next.errors.remove("city");
        }
        Action::UpdateSkills(skills) => {
            next.skills = dedupe(skills);
            next.errors.remove("skills");
        }
        Action::UpdateProfileImage(file) => {
            next.profile_image = file.normalized(PROFILE_IMAGE_MIME, PROFILE_IMAGE_NAME);
        }
        Action::UpdateIdCard(patch) => {
            if let Some(uri) = patch.uri {
                next.id_card.file.uri = uri;
            }
            if let Some(mime_type) = patch.mime_type {
                next.id_card.file.mime_type = mime_type;
            }
            if let Some(file_name) = patch.file_name {
                next.id_card.file.file_name = file_name;
            }
            if patch.width.is_some() {
                next.id_card.file.width = patch.width;
            }
            if patch.height.is_some() {
                next.id_card.file.height = patch.height;
            }
            if let Some(front) = patch.front {
                next.id_card.front = front;
            }
            if let Some(back) = patch.back {
                next.id_card.back = back;
            }
            next.id_card.file = next
                .id_card
                .file
                .clone()
                .normalized(ID_CARD_MIME, ID_CARD_NAME);
            next.errors.remove("id_card");
        }
        Action::NextStep => {
            let step = next.current_step;
            if let Some(target) = step.next() {
                let errors = validate::validate(step, &next);
                if errors.is_empty() {
                    next.errors.clear();
                    next.current_step = target;
                } else {
                    next.errors = errors;
                }
            }
        }
        Action::PreviousStep => {
            if let Some(target) = next.current_step.previous() {
                next.errors.clear();
                next.current_step = target;
            }
        }
        Action::GoToStep(n) => {
            if let Some(target) = Step::from_number(n) {
                next.errors.clear();
                next.current_step = target;
            }
        }
        Action::SetErrors(errors) => {
            next.errors = errors;
        }
        Action::ClearErrors => {
            next.errors.clear();
        }
        Action::Reset => {
            next = OnboardingRecord::default();
        }
    }

    next
}

/// Drop duplicate skills, keeping the first occurrence of each.
fn dedupe(skills: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    skills
        .into_iter()
        .filter(|skill| seen.insert(skill.clone()))
        .collect()
}
