//! # Formats Module
//!
//! Lenient conversion from loosely shaped JSON into the data model.
//!
//! Course and progress payloads usually arrive from a remote service while a
//! page is still loading, so partial and wrongly shaped values are normal.
//! These functions never fail:
//! - missing or non-array `sections` / `lectures` / `completedLessons` are empty
//! - every element of `lectures` counts as one lecture, whatever its shape
//! - markers without non-negative whole-number indices are skipped, but still
//!   counted in the record's raw marker count
//!
//! File I/O stays in the app layer; this module only transforms values.

use crate::course::{Course, Lecture, LecturePosition, ProgressRecord, Section};
use serde_json::Value;

/// Decode a course, treating any malformed part as empty.
#[must_use]
pub fn course_from_value(value: &Value) -> Course {
    let sections = array_field(value, "sections")
        .map(|items| items.iter().map(section_from_value).collect())
        .unwrap_or_default();

    Course {
        id: id_field(value, "id").or_else(|| id_field(value, "_id")),
        title: string_field(value, "title"),
        sections,
    }
}

/// Decode a progress record, skipping unusable markers.
#[must_use]
pub fn progress_from_value(value: &Value) -> ProgressRecord {
    let items = array_field(value, "completedLessons")
        .map(Vec::as_slice)
        .unwrap_or_default();
    let completed_lessons: Vec<LecturePosition> =
        items.iter().filter_map(position_from_value).collect();

    ProgressRecord {
        learner_id: id_field(value, "learnerId").or_else(|| id_field(value, "userId")),
        course_id: id_field(value, "courseId"),
        unreadable_markers: items.len() - completed_lessons.len(),
        completed_lessons,
    }
}

/// `None` for JSON `null`, otherwise a leniently decoded course.
#[must_use]
pub fn optional_course(value: &Value) -> Option<Course> {
    (!value.is_null()).then(|| course_from_value(value))
}

/// `None` for JSON `null`, otherwise a leniently decoded progress record.
#[must_use]
pub fn optional_progress(value: &Value) -> Option<ProgressRecord> {
    (!value.is_null()).then(|| progress_from_value(value))
}

fn section_from_value(value: &Value) -> Section {
    let lectures = array_field(value, "lectures")
        .map(|items| items.iter().map(lecture_from_value).collect())
        .unwrap_or_default();

    Section {
        title: string_field(value, "title"),
        lectures,
    }
}

fn lecture_from_value(value: &Value) -> Lecture {
    Lecture {
        title: string_field(value, "title"),
    }
}

fn position_from_value(value: &Value) -> Option<LecturePosition> {
    let section = index_field(value, "sectionIndex")?;
    let lecture = index_field(value, "lectureIndex")?;
    Some(LecturePosition::new(section, lecture))
}

fn array_field<'a>(value: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    value.get(key).and_then(Value::as_array)
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_owned)
}

/// Ids may be strings or numbers upstream.
fn id_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Non-negative whole number; `1.0` is accepted as `1`.
fn index_field(value: &Value, key: &str) -> Option<usize> {
    let number = value.get(key)?.as_number()?;
    let index = match number.as_u64() {
        Some(n) => n,
        None => {
            let f = number.as_f64()?;
            if !f.is_finite() || f < 0.0 || f.fract() != 0.0 || f >= u64::MAX as f64 {
                return None;
            }
            f as u64
        }
    };
    usize::try_from(index).ok()
}

// =============================================================================
// TESTS
// =============================================================================
