use criterion::{criterion_group, criterion_main, Criterion};
use trailcost::{box_filter, Analysis, GeodeticPoint};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// A 20 km ridge walk with two noise scales on the elevation.
fn synthetic_track() -> Vec<GeodeticPoint> {
    (0..4000)
        .map(|k| {
            let s = k as f64 * 5.0;
            GeodeticPoint::new(
                34.1 + k as f64 * 4.5e-5,
                -117.5,
                1200.0 + 40.0 * (s / 900.0).sin() + 3.0 * (s / 23.0).sin(),
            )
        })
        .collect()
}

fn track_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("Track Analysis");

    let track = synthetic_track();
    group.bench_with_input("4k points", &track, |b, t| {
        b.iter(|| Analysis::builder().build(t).unwrap())
    });

    let signal: Vec<f64> = (0..4096).map(|i| (i as f64 / 17.0).sin()).collect();
    group.bench_with_input("box filter 4096", &signal, |b, s| {
        b.iter(|| box_filter(s, 64))
    });
}

criterion_group!(benches, track_analysis);
criterion_main!(benches);
