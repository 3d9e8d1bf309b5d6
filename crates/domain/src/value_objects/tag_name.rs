//! CRM tag vocabulary

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A label from the fixed CRM vocabulary describing a guest attribute
///
/// The serialized form is the CRM wire label, which is also the exact
/// string the external classifier is instructed to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TagName {
    #[serde(rename = "VIP")]
    Vip,
    #[serde(rename = "Celeb")]
    Celeb,
    #[serde(rename = "frequent visitors")]
    FrequentVisitors,
    #[serde(rename = "Birthday")]
    Birthday,
    #[serde(rename = "Anniversary")]
    Anniversary,
    #[serde(rename = "No shows")]
    NoShows,
    #[serde(rename = "Dietary restrictions")]
    DietaryRestrictions,
    #[serde(rename = "allergies")]
    Allergies,
}

impl TagName {
    /// Every tag, in vocabulary order
    pub const ALL: [Self; 8] = [
        Self::Vip,
        Self::Celeb,
        Self::FrequentVisitors,
        Self::Birthday,
        Self::Anniversary,
        Self::NoShows,
        Self::DietaryRestrictions,
        Self::Allergies,
    ];

    /// CRM wire label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Vip => "VIP",
            Self::Celeb => "Celeb",
            Self::FrequentVisitors => "frequent visitors",
            Self::Birthday => "Birthday",
            Self::Anniversary => "Anniversary",
            Self::NoShows => "No shows",
            Self::DietaryRestrictions => "Dietary restrictions",
            Self::Allergies => "allergies",
        }
    }

    /// Look up a tag by its exact wire label
    ///
    /// Returns `None` for anything outside the vocabulary; values are never
    /// coerced (no case folding, no fuzzy matching).
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.label() == label)
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TagName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| DomainError::UnknownTag(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for tag in TagName::ALL {
            assert_eq!(TagName::from_label(tag.label()), Some(tag));
        }
    }

    #[test]
    fn unknown_label_rejected() {
        assert_eq!(TagName::from_label("Regular"), None);
        assert!("Regular".parse::<TagName>().is_err());
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(TagName::from_label("vip"), None);
        assert_eq!(TagName::from_label("Allergies"), None);
        assert_eq!(TagName::from_label("allergies"), Some(TagName::Allergies));
    }

    #[test]
    fn serializes_to_wire_label() {
        let json = serde_json::to_string(&TagName::FrequentVisitors).unwrap();
        assert_eq!(json, "\"frequent visitors\"");
        let tag: TagName = serde_json::from_str("\"No shows\"").unwrap();
        assert_eq!(tag, TagName::NoShows);
    }

    #[test]
    fn deserializing_unknown_label_fails() {
        assert!(serde_json::from_str::<TagName>("\"Regular\"").is_err());
    }

    #[test]
    fn display_uses_label() {
        assert_eq!(TagName::DietaryRestrictions.to_string(), "Dietary restrictions");
    }
}
