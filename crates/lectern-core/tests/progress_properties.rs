//! Property tests for the progress calculator and certificate codec.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use lectern_core::{
    Course, CountingMode, LecturePosition, ProgressCalculator, ProgressRecord,
    course_from_value, format_for_display, generate, is_completed, next_incomplete_lecture,
    progress_from_value, progress_percentage, total_lecture_count,
};
use proptest::prelude::*;

// =============================================================================
// STRATEGIES
// =============================================================================

fn course_strategy() -> impl Strategy<Value = Course> {
    prop::collection::vec(0usize..6, 0..6).prop_map(|counts| Course::from_lecture_counts(&counts))
}

/// Markers drawn slightly beyond the course bounds so stale ones show up.
fn progress_strategy() -> impl Strategy<Value = ProgressRecord> {
    prop::collection::vec((0usize..7, 0usize..7), 0..40)
        .prop_map(|pairs| ProgressRecord::from_pairs(&pairs))
}

fn json_strategy() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::from),
        any::<i64>().prop_map(serde_json::Value::from),
        "[a-z]{0,6}".prop_map(serde_json::Value::from),
    ];
    leaf.prop_recursive(4, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(serde_json::Value::Array),
            prop::collection::btree_map(
                prop_oneof![
                    Just("sections".to_string()),
                    Just("lectures".to_string()),
                    Just("completedLessons".to_string()),
                    Just("sectionIndex".to_string()),
                    Just("lectureIndex".to_string()),
                    "[a-z]{1,4}",
                ],
                inner,
                0..5
            )
            .prop_map(|map| serde_json::Value::Object(map.into_iter().collect())),
        ]
    })
}

fn all_positions(course: &Course) -> ProgressRecord {
    ProgressRecord {
        completed_lessons: course.positions().collect(),
        ..ProgressRecord::default()
    }
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn empty_courses_are_never_completed(
        sections in 0usize..5,
        progress in progress_strategy(),
    ) {
        let course = Course::from_lecture_counts(&vec![0; sections]);
        prop_assert!(!is_completed(Some(&course), Some(&progress)));
        prop_assert!(!ProgressCalculator::with_mode(CountingMode::Raw)
            .is_completed(Some(&course), Some(&progress)));
    }

    #[test]
    fn percentage_in_range_and_hundred_iff_completed(
        course in course_strategy(),
        progress in progress_strategy(),
        raw in any::<bool>(),
    ) {
        let mode = if raw { CountingMode::Raw } else { CountingMode::Distinct };
        let calc = ProgressCalculator::with_mode(mode);
        let pct = calc.progress_percentage(Some(&course), Some(&progress));
        prop_assert!(pct <= 100);
        if total_lecture_count(Some(&course)) > 0 {
            prop_assert_eq!(pct == 100, calc.is_completed(Some(&course), Some(&progress)));
        }
    }

    #[test]
    fn completed_count_at_least_total_means_completed(
        course in course_strategy(),
        progress in progress_strategy(),
    ) {
        let calc = ProgressCalculator::new();
        let total = calc.total_lecture_count(Some(&course));
        let done = calc.completed_count(Some(&course), Some(&progress));
        if total > 0 && done >= total {
            prop_assert!(calc.is_completed(Some(&course), Some(&progress)));
        }
    }

    #[test]
    fn next_incomplete_is_deterministic(
        course in course_strategy(),
        progress in progress_strategy(),
    ) {
        let first = next_incomplete_lecture(Some(&course), Some(&progress));
        let second = next_incomplete_lecture(Some(&course), Some(&progress));
        prop_assert_eq!(first, second);

        if let Some(next) = first {
            prop_assert!(course.contains(next));
            prop_assert!(!progress.is_marked(next));
            // Nothing earlier is missing.
            for earlier in course.positions().take_while(|p| *p < next) {
                prop_assert!(progress.is_marked(earlier));
            }
        }
    }

    #[test]
    fn marking_everything_leaves_nothing_next(course in course_strategy()) {
        let progress = all_positions(&course);
        prop_assert_eq!(next_incomplete_lecture(Some(&course), Some(&progress)), None);
        if total_lecture_count(Some(&course)) > 0 {
            prop_assert!(is_completed(Some(&course), Some(&progress)));
            prop_assert_eq!(progress_percentage(Some(&course), Some(&progress)), 100);
        }
    }

    #[test]
    fn distinct_completion_agrees_with_next_lecture(
        course in course_strategy(),
        progress in progress_strategy(),
    ) {
        if total_lecture_count(Some(&course)) > 0 {
            prop_assert_eq!(
                is_completed(Some(&course), Some(&progress)),
                next_incomplete_lecture(Some(&course), Some(&progress)).is_none()
            );
        }
    }

    #[test]
    fn duplicates_never_change_distinct_results(
        course in course_strategy(),
        progress in progress_strategy(),
    ) {
        let mut doubled = progress.clone();
        doubled.completed_lessons.extend(progress.completed_lessons.iter().copied());

        prop_assert_eq!(
            progress_percentage(Some(&course), Some(&progress)),
            progress_percentage(Some(&course), Some(&doubled))
        );
        prop_assert_eq!(
            is_completed(Some(&course), Some(&progress)),
            is_completed(Some(&course), Some(&doubled))
        );
    }

    #[test]
    fn lenient_decoding_never_fails(value in json_strategy()) {
        let course = course_from_value(&value);
        let progress = progress_from_value(&value);
        let pct = progress_percentage(Some(&course), Some(&progress));
        prop_assert!(pct <= 100);
    }

    #[test]
    fn distinct_milliseconds_give_distinct_ids(
        t1 in any::<u64>(),
        t2 in any::<u64>(),
        learner in "[a-z0-9]{1,12}",
        course in "[a-z0-9]{1,12}",
    ) {
        prop_assume!(t1 != t2);
        let a = generate(&learner, &course, t1).unwrap();
        let b = generate(&learner, &course, t2).unwrap();
        prop_assert_ne!(a, b);
    }

    #[test]
    fn display_is_uppercase_and_grouped(id in "[a-z0-9]{1,40}") {
        let shown = format_for_display(Some(&id));
        if id.len() <= 12 {
            prop_assert_eq!(shown, id.to_uppercase());
        } else {
            prop_assert_eq!(shown.replace('-', ""), id.to_uppercase());
            for group in shown.split('-') {
                prop_assert!(!group.is_empty() && group.len() <= 4);
            }
        }
    }
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[test]
fn half_completed_scenario() {
    let course = Course::from_lecture_counts(&[2, 2]);
    let progress = ProgressRecord::from_pairs(&[(0, 0), (0, 1)]);

    assert_eq!(progress_percentage(Some(&course), Some(&progress)), 50);
    assert_eq!(
        next_incomplete_lecture(Some(&course), Some(&progress)),
        Some(LecturePosition::new(1, 0))
    );
    assert!(!is_completed(Some(&course), Some(&progress)));
}

#[test]
fn fully_completed_scenario() {
    let course = Course::from_lecture_counts(&[2, 2]);
    let progress = ProgressRecord::from_pairs(&[(0, 0), (0, 1), (1, 0), (1, 1)]);

    assert_eq!(progress_percentage(Some(&course), Some(&progress)), 100);
    assert!(is_completed(Some(&course), Some(&progress)));
    assert_eq!(next_incomplete_lecture(Some(&course), Some(&progress)), None);
}

#[test]
fn display_examples() {
    assert_eq!(format_for_display(None), "N/A");
    assert_eq!(format_for_display(Some("")), "N/A");
    assert_eq!(format_for_display(Some("abc")), "ABC");
    assert_eq!(
        format_for_display(Some("abcdefghijklmnop")),
        "ABCD-EFGH-IJKL-MNOP"
    );
}
