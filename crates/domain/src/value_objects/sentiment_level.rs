//! Sentiment levels

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Coarse classification of guest-text tone
///
/// `Urgent` is terminal: [`SentimentLevel::escalate`] can raise a level to
/// `Urgent` but nothing lowers it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SentimentLevel {
    Positive,
    #[default]
    Neutral,
    Negative,
    /// Medical / allergy emergency requiring staff notification
    Urgent,
}

impl SentimentLevel {
    /// Wire label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
            Self::Urgent => "Urgent",
        }
    }

    /// Parse an exact wire label
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Positive" => Some(Self::Positive),
            "Neutral" => Some(Self::Neutral),
            "Negative" => Some(Self::Negative),
            "Urgent" => Some(Self::Urgent),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_urgent(&self) -> bool {
        matches!(self, Self::Urgent)
    }

    /// Raise to `Urgent` when `urgent` is set; an `Urgent` level is kept as is
    #[must_use]
    pub const fn escalate(self, urgent: bool) -> Self {
        if urgent { Self::Urgent } else { self }
    }
}

impl fmt::Display for SentimentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SentimentLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| DomainError::UnknownSentiment(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_neutral() {
        assert_eq!(SentimentLevel::default(), SentimentLevel::Neutral);
    }

    #[test]
    fn escalate_raises_to_urgent() {
        assert_eq!(SentimentLevel::Positive.escalate(true), SentimentLevel::Urgent);
        assert_eq!(SentimentLevel::Negative.escalate(false), SentimentLevel::Negative);
    }

    #[test]
    fn urgent_is_never_downgraded() {
        assert_eq!(SentimentLevel::Urgent.escalate(false), SentimentLevel::Urgent);
        assert_eq!(SentimentLevel::Urgent.escalate(true), SentimentLevel::Urgent);
    }

    #[test]
    fn parse_labels() {
        assert_eq!("Urgent".parse::<SentimentLevel>().unwrap(), SentimentLevel::Urgent);
        assert_eq!(SentimentLevel::from_label("urgent"), None);
        assert!("Happy".parse::<SentimentLevel>().is_err());
    }

    #[test]
    fn serialization_uses_labels() {
        let json = serde_json::to_string(&SentimentLevel::Negative).unwrap();
        assert_eq!(json, "\"Negative\"");
    }
}
