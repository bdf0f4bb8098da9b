use criterion::{black_box, criterion_group, criterion_main, Criterion};

use wd_time::calendars::china::china;
use wd_time::{classify, find_next_rest_day, Date};

fn criterion_benchmark(c: &mut Criterion) {
    let ds = china().unwrap();
    let workday = Date::from_ymd(2026, 2, 25).unwrap();
    let golden_week_eve = Date::from_ymd(2026, 9, 21).unwrap();

    c.bench_function("classify normal workday", |b| {
        b.iter(|| classify(black_box(workday), &ds))
    });
    c.bench_function("next rest day across makeup saturday", |b| {
        b.iter(|| find_next_rest_day(black_box(workday), &ds))
    });
    c.bench_function("next rest day before golden week", |b| {
        b.iter(|| find_next_rest_day(black_box(golden_week_eve), &ds))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
