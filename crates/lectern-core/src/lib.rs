//! # Lectern Core
//!
//! The deterministic Course Progress Model.
//!
//! Every operation in this crate is a pure function over immutable snapshots:
//! - No I/O, no async, no shared mutable state
//! - No floating-point arithmetic (percentages use integer rounding)
//! - Structural input never fails; absent or malformed data is the empty case
//!
//! ```text
//! ┌──────────────┐   ┌────────────────┐
//! │ Course       │   │ ProgressRecord │
//! └──────┬───────┘   └───────┬────────┘
//!        └─────────┬─────────┘
//!                  ▼
//!        ┌───────────────────┐        ┌──────────────────┐
//!        │ ProgressCalculator│        │ Certificate codec│
//!        └─────────┬─────────┘        └──────────────────┘
//!                  ▼
//!        ┌───────────────────┐
//!        │ ProgressReport    │
//!        └───────────────────┘
//! ```

pub mod certificate;
pub mod course;
pub mod formats;
pub mod progress;
pub mod report;

pub use certificate::{
    CertificateId, Clock, FixedClock, SystemClock, format_for_display, format_value_for_display,
    generate, generate_with_clock, to_base36,
};
pub use course::{Course, Lecture, LecturePosition, ProgressRecord, Section};
pub use formats::{course_from_value, optional_course, optional_progress, progress_from_value};
pub use progress::{
    CountingMode, ProgressCalculator, SectionProgress, is_completed, next_incomplete_lecture,
    progress_percentage, section_progress, total_lecture_count,
};
pub use report::ProgressReport;

use thiserror::Error;

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Errors raised by the core.
///
/// Only identifier input can fail. Course and progress structures are never
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LecternError {
    /// An argument was empty or otherwise unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, LecternError>;
