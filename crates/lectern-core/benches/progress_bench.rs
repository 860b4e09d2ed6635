//! Benchmarks for the progress calculator.

use criterion::{Criterion, criterion_group, criterion_main};
use lectern_core::{Course, ProgressCalculator, ProgressRecord, ProgressReport};
use std::hint::black_box;

fn large_course() -> (Course, ProgressRecord) {
    let course = Course::from_lecture_counts(&[50; 40]);
    // Every other lecture complete, with a duplicate for each marker.
    let pairs: Vec<_> = (0..40)
        .flat_map(|s| (0..50).step_by(2).map(move |l| (s, l)))
        .flat_map(|pair| [pair, pair])
        .collect();
    (course, ProgressRecord::from_pairs(&pairs))
}

fn bench_progress(c: &mut Criterion) {
    let (course, progress) = large_course();
    let calc = ProgressCalculator::new();

    c.bench_function("progress_percentage_2000_lectures", |b| {
        b.iter(|| calc.progress_percentage(black_box(Some(&course)), black_box(Some(&progress))));
    });

    c.bench_function("next_incomplete_lecture_2000_lectures", |b| {
        b.iter(|| {
            calc.next_incomplete_lecture(black_box(Some(&course)), black_box(Some(&progress)))
        });
    });

    c.bench_function("progress_report_2000_lectures", |b| {
        b.iter(|| ProgressReport::build(black_box(Some(&course)), black_box(Some(&progress)), &calc));
    });
}

criterion_group!(benches, bench_progress);
criterion_main!(benches);
