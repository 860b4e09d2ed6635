//! # CLI Module
//!
//! Command implementations for the `lectern` binary.
//!
//! Each command reads JSON snapshots from disk, hands them to
//! `lectern_core`, and returns the rendered output. Printing is left to
//! `main.rs` so that commands stay testable.

use lectern_core::{
    Clock, Course, CountingMode, LecternError, ProgressCalculator, ProgressRecord, ProgressReport,
    format_for_display, generate, optional_course, optional_progress,
};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading an input file failed.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file is not valid JSON.
    #[error("invalid JSON in {}: {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Rendering output failed.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The core rejected an argument.
    #[error(transparent)]
    Core(#[from] LecternError),
}

pub type CliResult<T> = Result<T, CliError>;

// =============================================================================
// LOADING
// =============================================================================

/// Read and parse a JSON file.
///
/// Only syntax errors fail; shape problems are handled by lenient decoding.
pub fn load_json(path: &Path) -> CliResult<Value> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CliError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a course snapshot. A JSON `null` file is an absent course.
pub fn load_course(path: &Path) -> CliResult<Option<Course>> {
    let value = load_json(path)?;
    let course = optional_course(&value);
    tracing::debug!(
        path = %path.display(),
        sections = course.as_ref().map(|c| c.sections.len()).unwrap_or(0),
        "loaded course"
    );
    Ok(course)
}

/// Load a progress record. A JSON `null` file is an absent record.
pub fn load_progress(path: &Path) -> CliResult<Option<ProgressRecord>> {
    let value = load_json(path)?;
    let progress = optional_progress(&value);
    tracing::debug!(
        path = %path.display(),
        markers = progress.as_ref().map(|p| p.completed_lessons.len()).unwrap_or(0),
        "loaded progress record"
    );
    Ok(progress)
}

// =============================================================================
// COMMANDS
// =============================================================================

/// Full progress report.
pub fn cmd_report(
    course_path: &Path,
    progress_path: &Path,
    json: bool,
    mode: CountingMode,
) -> CliResult<String> {
    let course = load_course(course_path)?;
    let progress = load_progress(progress_path)?;

    let calculator = ProgressCalculator::with_mode(mode);
    let report = ProgressReport::build(course.as_ref(), progress.as_ref(), &calculator);

    tracing::info!(
        percentage = report.percentage,
        completed = report.completed,
        mode = ?mode,
        "computed progress report"
    );

    if json {
        Ok(serde_json::to_string_pretty(&report)?)
    } else {
        Ok(report.to_text())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NextLectureOutput<'a> {
    next: Option<lectern_core::LecturePosition>,
    title: Option<&'a str>,
}

/// The next lecture to take, if any.
pub fn cmd_next(course_path: &Path, progress_path: &Path, json: bool) -> CliResult<String> {
    let course = load_course(course_path)?;
    let progress = load_progress(progress_path)?;

    let calculator = ProgressCalculator::new();
    let report = ProgressReport::build(course.as_ref(), progress.as_ref(), &calculator);
    let title = course.as_ref().and_then(|c| report.next_lecture_title(c));

    if json {
        let output = NextLectureOutput {
            next: report.next_lecture,
            title,
        };
        return Ok(serde_json::to_string_pretty(&output)?);
    }

    Ok(match (report.next_lecture, title) {
        (Some(next), Some(title)) => format!(
            "Next lecture: section {}, lecture {} ({})",
            next.section_index, next.lecture_index, title
        ),
        (Some(next), None) => format!(
            "Next lecture: section {}, lecture {}",
            next.section_index, next.lecture_index
        ),
        (None, _) if report.completed => String::from("All lectures completed."),
        (None, _) => String::from("No lectures to take."),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CertificateOutput {
    certificate_id: String,
    display: String,
    issued_at: u64,
}

/// Generate a certificate identifier.
///
/// `issued_at` overrides the clock, in milliseconds since the Unix epoch.
pub fn cmd_certificate_generate(
    learner_id: &str,
    course_id: &str,
    issued_at: Option<u64>,
    json: bool,
    clock: &dyn Clock,
) -> CliResult<String> {
    let issued_at = issued_at.unwrap_or_else(|| clock.now_millis());
    let id = generate(learner_id, course_id, issued_at)?;

    tracing::info!(certificate = %id, issued_at, "generated certificate id");

    if json {
        let output = CertificateOutput {
            display: id.display(),
            certificate_id: id.into_inner(),
            issued_at,
        };
        return Ok(serde_json::to_string_pretty(&output)?);
    }

    Ok(id.into_inner())
}

/// Display form of a stored identifier.
pub fn cmd_certificate_format(certificate_id: &str) -> String {
    format_for_display(Some(certificate_id))
}
