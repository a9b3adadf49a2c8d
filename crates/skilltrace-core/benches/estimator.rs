use criterion::{black_box, criterion_group, criterion_main, Criterion};

use skilltrace_core::estimator::{estimate, GridSearch};
use skilltrace_core::model::Observation;
use skilltrace_core::tracker::RatingTracker;

fn make_session(n: usize) -> Vec<Observation> {
    (0..n)
        .map(|i| Observation::new(i % 3 != 0, (i * 37 % 101) as f64, (i % 13) as f64 * 5.0))
        .collect()
}

fn bench_single_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_step");
    let grid = GridSearch::default();

    group.bench_function("correct_b25_t30", |b| {
        let obs = Observation::new(true, 25.0, 30.0);
        b.iter(|| estimate(black_box(&grid), black_box(25.0), 2.0, black_box(&obs)))
    });

    group.bench_function("incorrect_b80_t0", |b| {
        let obs = Observation::new(false, 80.0, 0.0);
        b.iter(|| estimate(black_box(&grid), black_box(60.0), 2.0, black_box(&obs)))
    });

    let fine = GridSearch::new(0.0, 100.0, 0.01).unwrap();
    group.bench_function("fine_grid", |b| {
        let obs = Observation::new(true, 25.0, 30.0);
        b.iter(|| estimate(black_box(&fine), black_box(25.0), 2.0, black_box(&obs)))
    });

    group.finish();
}

fn bench_trace(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace");
    let tracker = RatingTracker::default();

    for n in [10, 100, 1000] {
        let session = make_session(n);
        group.bench_function(format!("{n}_attempts"), |b| {
            b.iter(|| tracker.run(black_box(&session)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_step, bench_trace);
criterion_main!(benches);
