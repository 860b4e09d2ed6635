//! # Certificate Module
//!
//! Generation and display formatting of certificate identifiers.
//!
//! Identifier layout (upper-cased):
//!
//! ```text
//! CERT-<issued_at_millis in base 36>-<last 4 of learner id>-<last 4 of course id>
//! ```
//!
//! Uniqueness is per (learner suffix, course suffix, millisecond). Two
//! certificates issued within the same millisecond for ids sharing both
//! suffixes collide; callers that persist identifiers own collision checks.

use crate::{LecternError, Result};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Literal tag at the start of every identifier.
pub const CERTIFICATE_TAG: &str = "CERT";

/// Separator between identifier parts and between display groups.
pub const SEPARATOR: char = '-';

/// Number of trailing characters taken from each id.
pub const ID_SUFFIX_LEN: usize = 4;

/// Identifiers longer than this are grouped for display.
pub const DISPLAY_GROUPING_THRESHOLD: usize = 12;

/// Characters per display group.
pub const DISPLAY_GROUP_LEN: usize = 4;

/// Placeholder shown for an absent or empty identifier.
pub const NOT_AVAILABLE: &str = "N/A";

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

// =============================================================================
// CLOCK
// =============================================================================

/// Source of the issue timestamp, in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Clock frozen at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        self.0
    }
}

// =============================================================================
// CERTIFICATE ID
// =============================================================================

/// An opaque certificate identifier.
///
/// Immutable once generated. Formatting for display never alters it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CertificateId(String);

impl CertificateId {
    /// Wrap an identifier obtained from storage.
    #[must_use]
    pub fn from_stored(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Presentation form, see [`format_for_display`].
    #[must_use]
    pub fn display(&self) -> String {
        format_for_display(Some(&self.0))
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for CertificateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CertificateId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// GENERATION
// =============================================================================

/// Generate an identifier for a completion issued at `issued_at_millis`.
///
/// Empty or whitespace-only ids are rejected. Ids shorter than four
/// characters are used whole.
pub fn generate(learner_id: &str, course_id: &str, issued_at_millis: u64) -> Result<CertificateId> {
    let learner = require_id("learner_id", learner_id)?;
    let course = require_id("course_id", course_id)?;

    let raw = format!(
        "{tag}{sep}{time}{sep}{learner}{sep}{course}",
        tag = CERTIFICATE_TAG,
        sep = SEPARATOR,
        time = to_base36(issued_at_millis),
        learner = trailing_chars(learner, ID_SUFFIX_LEN),
        course = trailing_chars(course, ID_SUFFIX_LEN),
    );

    Ok(CertificateId(raw.to_uppercase()))
}

/// Generate an identifier stamped with the given clock's current time.
pub fn generate_with_clock<C: Clock + ?Sized>(
    learner_id: &str,
    course_id: &str,
    clock: &C,
) -> Result<CertificateId> {
    generate(learner_id, course_id, clock.now_millis())
}

/// Lower-case base-36 rendering of an unsigned integer.
#[must_use]
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return String::from("0");
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();

    digits.into_iter().map(char::from).collect()
}

fn require_id<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(LecternError::InvalidArgument(format!(
            "{} must not be empty",
            name
        )));
    }
    Ok(value)
}

/// Last `n` characters of `s` (whole string when shorter).
fn trailing_chars(s: &str, n: usize) -> &str {
    let count = s.chars().count();
    if count <= n {
        return s;
    }
    match s.char_indices().nth(count - n) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

// =============================================================================
// DISPLAY
// =============================================================================

/// Presentation form of an identifier.
///
/// `None` and the empty string render as `"N/A"`. Otherwise the id is
/// upper-cased and, when the upper-cased form is longer than 12 characters,
/// split into hyphen-joined groups of four.
#[must_use]
pub fn format_for_display(certificate_id: Option<&str>) -> String {
    let Some(id) = certificate_id.filter(|id| !id.is_empty()) else {
        return String::from(NOT_AVAILABLE);
    };

    let chars: Vec<char> = id.to_uppercase().chars().collect();
    if chars.len() <= DISPLAY_GROUPING_THRESHOLD {
        return chars.into_iter().collect();
    }

    let mut out = String::with_capacity(chars.len() + chars.len() / DISPLAY_GROUP_LEN);
    for (i, group) in chars.chunks(DISPLAY_GROUP_LEN).enumerate() {
        if i > 0 {
            out.push(SEPARATOR);
        }
        out.extend(group);
    }
    out
}

/// Presentation form of a loosely typed value; any non-string is `"N/A"`.
#[must_use]
pub fn format_value_for_display(value: &serde_json::Value) -> String {
    format_for_display(value.as_str())
}

// =============================================================================
// TESTS
// =============================================================================
