//! Tutor listing records and discovery filtering.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::availability::AvailabilityTemplate;

/// Opaque backend identifier of a tutor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TutorId(pub String);

impl fmt::Display for TutorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TutorId {
    fn from(s: &str) -> Self {
        TutorId(s.to_string())
    }
}

/// One entry of the tutor listing, as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tutor {
    pub id: TutorId,
    pub full_name: String,
    pub subject: String,
    #[serde(default)]
    pub university: String,
    #[serde(default)]
    pub experience: String,
    pub hourly_rate: f64,
    #[serde(default)]
    pub study_level: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    #[serde(default)]
    pub availability: AvailabilityTemplate,
}

/// Criteria for narrowing the tutor listing on the discovery page.
///
/// Unset fields match everything. Text comparisons ignore case.
#[derive(Debug, Clone, Default)]
pub struct TutorFilter {
    pub subject: Option<String>,
    pub study_level: Option<String>,
    pub max_hourly_rate: Option<f64>,
    /// Free text matched against name, subject, university and description.
    pub query: Option<String>,
}

impl TutorFilter {
    pub fn matches(&self, tutor: &Tutor) -> bool {
        let subject_ok = self
            .subject
            .as_deref()
            .is_none_or(|s| tutor.subject.eq_ignore_ascii_case(s.trim()));
        let level_ok = self
            .study_level
            .as_deref()
            .is_none_or(|l| tutor.study_level.eq_ignore_ascii_case(l.trim()));
        let rate_ok = self
            .max_hourly_rate
            .is_none_or(|max| tutor.hourly_rate <= max);
        let query_ok = self.query.as_deref().is_none_or(|q| {
            let needle = q.trim().to_lowercase();
            [
                &tutor.full_name,
                &tutor.subject,
                &tutor.university,
                &tutor.description,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
        });
        subject_ok && level_ok && rate_ok && query_ok
    }

    /// Keep the tutors that match, preserving listing order.
    pub fn apply<'a>(&self, tutors: &'a [Tutor]) -> Vec<&'a Tutor> {
        tutors.iter().filter(|t| self.matches(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Vec<Tutor> {
        serde_json::from_str(
            r#"[
                {
                    "id": "t-1",
                    "fullName": "Ada Byron",
                    "subject": "Mathematics",
                    "university": "Cambridge",
                    "experience": "6 years",
                    "hourlyRate": 40.0,
                    "studyLevel": "Undergraduate",
                    "description": "Algebra and calculus",
                    "profilePictureUrl": "https://cdn.example/ada.png",
                    "availability": { "friday": ["14:00-15:00", "15:00-16:00"] }
                },
                {
                    "id": "t-2",
                    "fullName": "Mary Shelley",
                    "subject": "English",
                    "hourlyRate": 25.5,
                    "studyLevel": "A-Level"
                }
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_decode_listing_with_optional_fields() {
        let tutors = listing();
        assert_eq!(tutors[0].id, TutorId::from("t-1"));
        assert!(tutors[0].availability.offers_day(crate::DayOfWeek::Friday));
        assert_eq!(tutors[1].profile_picture_url, None);
        assert!(tutors[1].availability.is_empty());
    }

    #[test]
    fn test_default_filter_matches_all() {
        let tutors = listing();
        assert_eq!(TutorFilter::default().apply(&tutors).len(), 2);
    }

    #[test]
    fn test_filter_by_subject_ignores_case() {
        let tutors = listing();
        let filter = TutorFilter {
            subject: Some("mathematics".into()),
            ..Default::default()
        };
        let hits = filter.apply(&tutors);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].full_name, "Ada Byron");
    }

    #[test]
    fn test_filter_by_rate_and_query() {
        let tutors = listing();
        let filter = TutorFilter {
            max_hourly_rate: Some(30.0),
            query: Some("shelley".into()),
            ..Default::default()
        };
        let hits = filter.apply(&tutors);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.0, "t-2");

        let none = TutorFilter {
            max_hourly_rate: Some(30.0),
            query: Some("calculus".into()),
            ..Default::default()
        };
        assert!(none.apply(&tutors).is_empty());
    }
}
