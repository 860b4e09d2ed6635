//! # Course Module
//!
//! Data model for course structures and learner progress records.
//!
//! Sections and lectures are addressed by zero-based position only. A
//! `ProgressRecord` is meaningful against the exact `Course` snapshot it was
//! recorded for; reordering sections or lectures silently shifts what its
//! markers point at.

use serde::{Deserialize, Serialize};

// =============================================================================
// COURSE STRUCTURE
// =============================================================================

/// The smallest unit of course content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecture {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Lecture {
    /// Create a lecture with a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
        }
    }
}

/// An ordered group of lectures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub lectures: Vec<Lecture>,
}

impl Section {
    /// Create an untitled section with `count` untitled lectures.
    #[must_use]
    pub fn with_lecture_count(count: usize) -> Self {
        Self {
            title: None,
            lectures: vec![Lecture::default(); count],
        }
    }

    /// Number of lectures in this section.
    #[must_use]
    pub fn lecture_count(&self) -> usize {
        self.lectures.len()
    }
}

/// A course: an ordered sequence of sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Course {
    /// Create an empty course.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a course from per-section lecture counts.
    ///
    /// `Course::from_lecture_counts(&[2, 2])` is two sections of two lectures.
    #[must_use]
    pub fn from_lecture_counts(counts: &[usize]) -> Self {
        Self {
            id: None,
            title: None,
            sections: counts
                .iter()
                .map(|&count| Section::with_lecture_count(count))
                .collect(),
        }
    }

    /// Whether a lecture exists at the given position.
    #[must_use]
    pub fn contains(&self, position: LecturePosition) -> bool {
        self.sections
            .get(position.section_index)
            .is_some_and(|section| position.lecture_index < section.lectures.len())
    }

    /// All lecture positions in structural order (section, then lecture).
    pub fn positions(&self) -> impl Iterator<Item = LecturePosition> + '_ {
        self.sections
            .iter()
            .enumerate()
            .flat_map(|(section_index, section)| {
                (0..section.lectures.len())
                    .map(move |lecture_index| LecturePosition::new(section_index, lecture_index))
            })
    }
}

// =============================================================================
// PROGRESS RECORD
// =============================================================================

/// Position of a lecture within a course snapshot.
///
/// Ordering is structural: by section first, then by lecture.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct LecturePosition {
    pub section_index: usize,
    pub lecture_index: usize,
}

impl LecturePosition {
    #[must_use]
    pub const fn new(section_index: usize, lecture_index: usize) -> Self {
        Self {
            section_index,
            lecture_index,
        }
    }
}

impl std::fmt::Display for LecturePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.section_index, self.lecture_index)
    }
}

/// Completed-lesson markers for one (learner, course) pair.
///
/// Markers carry no ordering and may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    #[serde(default)]
    pub completed_lessons: Vec<LecturePosition>,
    /// Entries of the source marker list that did not decode to a position.
    ///
    /// Only raw counting looks at these.
    #[serde(skip)]
    pub unreadable_markers: usize,
}

impl ProgressRecord {
    /// Create an empty progress record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record from `(section, lecture)` pairs.
    #[must_use]
    pub fn from_pairs(pairs: &[(usize, usize)]) -> Self {
        Self {
            learner_id: None,
            course_id: None,
            completed_lessons: pairs
                .iter()
                .map(|&(section, lecture)| LecturePosition::new(section, lecture))
                .collect(),
            unreadable_markers: 0,
        }
    }

    /// Length of the marker list as received, unreadable entries included.
    #[must_use]
    pub fn raw_marker_count(&self) -> usize {
        self.completed_lessons
            .len()
            .saturating_add(self.unreadable_markers)
    }

    /// Append a completed-lesson marker.
    pub fn mark_completed(&mut self, position: LecturePosition) {
        self.completed_lessons.push(position);
    }

    /// Whether any marker addresses the given position.
    #[must_use]
    pub fn is_marked(&self, position: LecturePosition) -> bool {
        self.completed_lessons.contains(&position)
    }
}

// =============================================================================
// TESTS
// =============================================================================
