//! Urgency detector
//!
//! Scans guest text for medical or allergy emergency keywords. This is the
//! safety floor beneath every classifier: whatever it finds is urgent.

use domain::{MAX_URGENT_REASON_CHARS, truncate_chars};

use super::tag_patterns::URGENCY_PATTERNS;

/// Return a reason for the first urgency pattern that matches `text`
///
/// Patterns are tried in priority order; the reason embeds the literal
/// matched substring.
///
/// # Examples
///
/// ```
/// use application::detect_urgency;
///
/// assert_eq!(
///     detect_urgency("Carries an EpiPen").as_deref(),
///     Some("Detected urgent keyword: 'EpiPen'")
/// );
/// assert_eq!(detect_urgency("window seat please"), None);
/// ```
#[must_use]
pub fn detect_urgency(text: &str) -> Option<String> {
    URGENCY_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find(text))
        .map(|m| {
            truncate_chars(
                &format!("Detected urgent keyword: '{}'", m.as_str()),
                MAX_URGENT_REASON_CHARS,
            )
        })
}
