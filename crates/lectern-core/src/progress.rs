//! # Progress Module
//!
//! Derives completion facts from a course snapshot and a progress record.
//!
//! Design constraints:
//! - Absent inputs (`None`) are the empty case, never an error
//! - Integer-only percentage arithmetic (round half up)
//! - Deterministic scan order: section ascending, then lecture ascending

use crate::course::{Course, LecturePosition, ProgressRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// COUNTING MODE
// =============================================================================

/// How completed lessons are counted against the lecture total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountingMode {
    /// Distinct markers that address a lecture in the course snapshot.
    #[default]
    Distinct,
    /// Raw marker-list length: duplicates, stale and unreadable markers included.
    Raw,
}

impl std::str::FromStr for CountingMode {
    type Err = crate::LecternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "distinct" => Ok(Self::Distinct),
            "raw" => Ok(Self::Raw),
            other => Err(crate::LecternError::InvalidArgument(format!(
                "unknown counting mode '{}': expected 'distinct' or 'raw'",
                other
            ))),
        }
    }
}

// =============================================================================
// SECTION PROGRESS
// =============================================================================

/// Completion breakdown for a single section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionProgress {
    pub section_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub completed: usize,
    pub total: usize,
    pub percentage: u8,
}

impl SectionProgress {
    /// Whether every lecture in this section is complete.
    ///
    /// Empty sections are never complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed >= self.total
    }
}

// =============================================================================
// CALCULATOR
// =============================================================================

/// Progress calculator parameterised by counting mode.
///
/// The calculator is a plain value and holds no state between calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressCalculator {
    mode: CountingMode,
}

impl ProgressCalculator {
    /// Calculator with the default (distinct) counting mode.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: CountingMode::Distinct,
        }
    }

    /// Calculator with an explicit counting mode.
    #[must_use]
    pub const fn with_mode(mode: CountingMode) -> Self {
        Self { mode }
    }

    #[must_use]
    pub fn mode(&self) -> CountingMode {
        self.mode
    }

    /// Sum of lecture counts over all sections; `0` for an absent course.
    #[must_use]
    pub fn total_lecture_count(&self, course: Option<&Course>) -> usize {
        course
            .map(|c| c.sections.iter().map(|s| s.lectures.len()).sum())
            .unwrap_or(0)
    }

    /// Number of completed lessons as counted under this calculator's mode.
    #[must_use]
    pub fn completed_count(
        &self,
        course: Option<&Course>,
        progress: Option<&ProgressRecord>,
    ) -> usize {
        let (Some(course), Some(progress)) = (course, progress) else {
            return 0;
        };

        match self.mode {
            CountingMode::Distinct => distinct_completed(course, progress).len(),
            CountingMode::Raw => progress.raw_marker_count(),
        }
    }

    /// Whether the learner has completed the course.
    ///
    /// A course with zero lectures is never completed.
    #[must_use]
    pub fn is_completed(&self, course: Option<&Course>, progress: Option<&ProgressRecord>) -> bool {
        let total = self.total_lecture_count(course);
        total > 0 && self.completed_count(course, progress) >= total
    }

    /// Completion percentage in `[0, 100]`.
    ///
    /// Rounds half up. `100` is reserved for completed records: a ratio that
    /// would round up to 100 without completion is reported as 99.
    #[must_use]
    pub fn progress_percentage(
        &self,
        course: Option<&Course>,
        progress: Option<&ProgressRecord>,
    ) -> u8 {
        let total = self.total_lecture_count(course);
        if total == 0 {
            return 0;
        }

        let completed = self.completed_count(course, progress);
        if completed >= total {
            return 100;
        }

        let rounded = rounded_percentage(completed, total);
        rounded.min(99)
    }

    /// First lecture, in structural order, without a completion marker.
    ///
    /// Always checks distinct coordinates, whatever the counting mode.
    #[must_use]
    pub fn next_incomplete_lecture(
        &self,
        course: Option<&Course>,
        progress: Option<&ProgressRecord>,
    ) -> Option<LecturePosition> {
        let course = course?;
        let completed: BTreeSet<LecturePosition> = progress
            .map(|p| p.completed_lessons.iter().copied().collect())
            .unwrap_or_default();

        course
            .positions()
            .find(|position| !completed.contains(position))
    }

    /// Per-section breakdown using distinct, in-range markers.
    #[must_use]
    pub fn section_progress(
        &self,
        course: Option<&Course>,
        progress: Option<&ProgressRecord>,
    ) -> Vec<SectionProgress> {
        let Some(course) = course else {
            return Vec::new();
        };
        let completed = progress
            .map(|p| distinct_completed(course, p))
            .unwrap_or_default();

        course
            .sections
            .iter()
            .enumerate()
            .map(|(section_index, section)| {
                let total = section.lectures.len();
                let done = completed
                    .iter()
                    .filter(|pos| pos.section_index == section_index)
                    .count();
                let percentage = if total == 0 {
                    0
                } else if done >= total {
                    100
                } else {
                    rounded_percentage(done, total).min(99)
                };
                SectionProgress {
                    section_index,
                    title: section.title.clone(),
                    completed: done,
                    total,
                    percentage,
                }
            })
            .collect()
    }
}

/// Markers that address a lecture present in the course, deduplicated.
fn distinct_completed(course: &Course, progress: &ProgressRecord) -> BTreeSet<LecturePosition> {
    progress
        .completed_lessons
        .iter()
        .copied()
        .filter(|pos| course.contains(*pos))
        .collect()
}

/// `round(100 * completed / total)` with half-up rounding, in integers.
///
/// Caller guarantees `total > 0`. Saturates at 100.
fn rounded_percentage(completed: usize, total: usize) -> u8 {
    let completed = completed as u128;
    let total = total as u128;
    let value = (completed * 200 + total) / (total * 2);
    value.min(100) as u8
}

// =============================================================================
// FREE FUNCTIONS (default calculator)
// =============================================================================

/// Total lecture count of a course; `0` when absent.
#[must_use]
pub fn total_lecture_count(course: Option<&Course>) -> usize {
    ProgressCalculator::new().total_lecture_count(course)
}

/// Completion predicate with distinct counting.
#[must_use]
pub fn is_completed(course: Option<&Course>, progress: Option<&ProgressRecord>) -> bool {
    ProgressCalculator::new().is_completed(course, progress)
}

/// Completion percentage with distinct counting.
#[must_use]
pub fn progress_percentage(course: Option<&Course>, progress: Option<&ProgressRecord>) -> u8 {
    ProgressCalculator::new().progress_percentage(course, progress)
}

/// First lecture without a completion marker.
#[must_use]
pub fn next_incomplete_lecture(
    course: Option<&Course>,
    progress: Option<&ProgressRecord>,
) -> Option<LecturePosition> {
    ProgressCalculator::new().next_incomplete_lecture(course, progress)
}

/// Per-section completion breakdown.
#[must_use]
pub fn section_progress(
    course: Option<&Course>,
    progress: Option<&ProgressRecord>,
) -> Vec<SectionProgress> {
    ProgressCalculator::new().section_progress(course, progress)
}

// =============================================================================
// TESTS
// =============================================================================
