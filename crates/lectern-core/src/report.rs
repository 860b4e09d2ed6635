//! # Report Module
//!
//! Every derived completion fact for one (course, progress) pair, gathered
//! into a single serializable value with a plain-text rendering.

use crate::course::{Course, LecturePosition, ProgressRecord};
use crate::progress::{CountingMode, ProgressCalculator, SectionProgress};
use serde::{Deserialize, Serialize};

/// Snapshot of a learner's progress through one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_title: Option<String>,
    pub counting_mode: CountingMode,
    pub total_lectures: usize,
    pub completed_lectures: usize,
    pub percentage: u8,
    pub completed: bool,
    pub next_lecture: Option<LecturePosition>,
    pub sections: Vec<SectionProgress>,
}

impl ProgressReport {
    /// Build a report with the given calculator.
    #[must_use]
    pub fn build(
        course: Option<&Course>,
        progress: Option<&ProgressRecord>,
        calculator: &ProgressCalculator,
    ) -> Self {
        Self {
            course_title: course.and_then(|c| c.title.clone()),
            counting_mode: calculator.mode(),
            total_lectures: calculator.total_lecture_count(course),
            completed_lectures: calculator.completed_count(course, progress),
            percentage: calculator.progress_percentage(course, progress),
            completed: calculator.is_completed(course, progress),
            next_lecture: calculator.next_incomplete_lecture(course, progress),
            sections: calculator.section_progress(course, progress),
        }
    }

    /// Title of the next lecture, when the course names it.
    #[must_use]
    pub fn next_lecture_title<'a>(&self, course: &'a Course) -> Option<&'a str> {
        let next = self.next_lecture?;
        course
            .sections
            .get(next.section_index)?
            .lectures
            .get(next.lecture_index)?
            .title
            .as_deref()
    }

    /// Format as plain text.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str("┌─────────────────────────────────────┐\n");
        match &self.course_title {
            Some(title) => output.push_str(&format!("│ COURSE: {}\n", title)),
            None => output.push_str("│ COURSE: (untitled)\n"),
        }
        output.push_str("├─────────────────────────────────────┤\n");
        output.push_str(&format!(
            "│ Progress: {}% ({}/{} lectures)\n",
            self.percentage, self.completed_lectures, self.total_lectures
        ));
        output.push_str(&format!(
            "│ Status:   {}\n",
            if self.completed {
                "completed"
            } else {
                "in progress"
            }
        ));
        match self.next_lecture {
            Some(next) => output.push_str(&format!(
                "│ Next:     section {}, lecture {}\n",
                next.section_index, next.lecture_index
            )),
            None => output.push_str("│ Next:     (none)\n"),
        }

        output.push_str("├─────────────────────────────────────┤\n");
        output.push_str("│ SECTIONS                            │\n");

        if self.sections.is_empty() {
            output.push_str("│ - (none)                            │\n");
        } else {
            for section in &self.sections {
                let label = section
                    .title
                    .clone()
                    .unwrap_or_else(|| format!("Section {}", section.section_index));
                output.push_str(&format!(
                    "│ - {}: {}/{} [{}%]\n",
                    label, section.completed, section.total, section.percentage
                ));
            }
        }

        output.push_str("└─────────────────────────────────────┘\n");

        output
    }
}

// =============================================================================
// TESTS
// =============================================================================
