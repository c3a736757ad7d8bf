//! Per-step field validation.
//!
//! Pure functions: nothing here touches the engine or performs I/O, so the
//! rules are unit-testable in isolation. Validation results are returned as
//! a field → message map, never thrown.

use std::collections::BTreeMap;

use crate::record::{OnboardingRecord, Step};

/// Bio length bounds, in trimmed characters.
const BIO_MIN_CHARS: usize = 10;
const BIO_MAX_CHARS: usize = 500;

/// Phone digit-count bounds after stripping non-digits.
const PHONE_MIN_DIGITS: usize = 10;
const PHONE_MAX_DIGITS: usize = 12;

/// Validate `record` against the rules of `step`.
///
/// Returns an empty map when every applicable rule passes. The photo and
/// review steps have no rules.
pub fn validate(step: Step, record: &OnboardingRecord) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();

    match step {
        Step::BasicInfo => {
            let bio = record.bio.trim();
            if bio.is_empty() {
                errors.insert("bio".to_string(), "Bio is required".to_string());
            } else if bio.chars().count() < BIO_MIN_CHARS {
                errors.insert(
                    "bio".to_string(),
                    format!("Bio must be at least {BIO_MIN_CHARS} characters"),
                );
            } else if bio.chars().count() > BIO_MAX_CHARS {
                errors.insert(
                    "bio".to_string(),
                    format!("Bio must be {BIO_MAX_CHARS} characters or fewer"),
                );
            }

            if record.phone.trim().is_empty() {
                errors.insert("phone".to_string(), "Phone number is required".to_string());
            } else {
                let digits = digit_count(&record.phone);
                if !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits) {
                    errors.insert(
                        "phone".to_string(),
                        "Enter a valid phone number".to_string(),
                    );
                }
            }
        }
        Step::Location => {
            if record.location.region.trim().is_empty() {
                errors.insert("region".to_string(), "Region is required".to_string());
            }
            if record.location.city.trim().is_empty() {
                errors.insert("city".to_string(), "City is required".to_string());
            }
        }
        Step::Skills => {
            if record.skills.is_empty() {
                errors.insert("skills".to_string(), "Add at least one skill".to_string());
            }
        }
        Step::ProfilePhoto => {}
        Step::IdentityDocument => {
            if record.id_card.file.uri.is_empty() {
                errors.insert(
                    "id_card".to_string(),
                    "Identity document is required".to_string(),
                );
            }
        }
        Step::Review => {}
    }

    errors
}

fn digit_count(phone: &str) -> usize {
    phone.chars().filter(|c| c.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{IdCardFile, Location, MediaFile};

    fn record() -> OnboardingRecord {
        OnboardingRecord::default()
    }

    #[test]
    fn basic_info_empty_fields_both_flagged() {
        let errors = validate(Step::BasicInfo, &record());
        assert_eq!(errors.len(), 2);
        assert!(errors.contains_key("bio"));
        assert!(errors.contains_key("phone"));
    }

    #[test]
    fn basic_info_valid_passes() {
        let mut r = record();
        r.bio = "A".repeat(10);
        r.phone = "0551234567".to_string();
        assert!(validate(Step::BasicInfo, &r).is_empty());
    }

    #[test]
    fn bio_bounds() {
        let mut r = record();
        r.phone = "0551234567".to_string();

        r.bio = "Too short".to_string(); // 9 chars
        assert!(validate(Step::BasicInfo, &r).contains_key("bio"));

        r.bio = "A".repeat(500);
        assert!(validate(Step::BasicInfo, &r).is_empty());

        r.bio = "A".repeat(501);
        assert!(validate(Step::BasicInfo, &r).contains_key("bio"));
    }

    #[test]
    fn bio_is_trimmed_before_length_check() {
        let mut r = record();
        r.phone = "0551234567".to_string();
        r.bio = format!("   {}   ", "A".repeat(9));
        assert!(validate(Step::BasicInfo, &r).contains_key("bio"));
    }

    #[test]
    fn phone_strips_formatting_before_counting() {
        let mut r = record();
        r.bio = "Experienced plumber with 5 years".to_string();

        r.phone = "+233 55 123 4567".to_string(); // 12 digits
        assert!(validate(Step::BasicInfo, &r).is_empty());

        r.phone = "055-123".to_string(); // 6 digits
        assert!(validate(Step::BasicInfo, &r).contains_key("phone"));

        r.phone = "0".repeat(13); // too many
        assert!(validate(Step::BasicInfo, &r).contains_key("phone"));
    }

    #[test]
    fn location_requires_region_and_city() {
        let errors = validate(Step::Location, &record());
        assert!(errors.contains_key("region"));
        assert!(errors.contains_key("city"));

        let mut r = record();
        r.location = Location {
            region: "Greater Accra".to_string(),
            city: "Accra".to_string(),
            ..Default::default()
        };
        assert!(validate(Step::Location, &r).is_empty());
    }

    #[test]
    fn location_whitespace_only_is_rejected() {
        let mut r = record();
        r.location.region = "   ".to_string();
        r.location.city = "Accra".to_string();
        let errors = validate(Step::Location, &r);
        assert!(errors.contains_key("region"));
        assert!(!errors.contains_key("city"));
    }

    #[test]
    fn skills_requires_at_least_one() {
        assert!(validate(Step::Skills, &record()).contains_key("skills"));

        let mut r = record();
        r.skills = vec!["Plumbing".to_string()];
        assert!(validate(Step::Skills, &r).is_empty());
    }

    #[test]
    fn profile_photo_is_optional() {
        assert!(validate(Step::ProfilePhoto, &record()).is_empty());
    }

    #[test]
    fn identity_document_requires_file() {
        assert!(validate(Step::IdentityDocument, &record()).contains_key("id_card"));

        let mut r = record();
        r.id_card = IdCardFile {
            file: MediaFile {
                uri: "file:///tmp/id.jpg".to_string(),
                mime_type: "image/jpeg".to_string(),
                file_name: "id-card.jpg".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate(Step::IdentityDocument, &r).is_empty());
    }

    #[test]
    fn review_has_no_rules() {
        assert!(validate(Step::Review, &record()).is_empty());
    }
}
