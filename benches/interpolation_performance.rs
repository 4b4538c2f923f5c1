use criterion::{Criterion, black_box, criterion_group, criterion_main};
use lapscope::playback::{FrameResult, frame_at, frame_at_index};
use lapscope::trace::{Sample, TelemetryTrace};
use std::time::Duration;

// Roughly a full qualifying lap sampled at 60Hz
const TRACE_LEN: usize = 6000;

fn build_lap_trace() -> TelemetryTrace {
    let samples = (0..TRACE_LEN)
        .map(|i| {
            let time_s = i as f64 / 60.;
            Sample {
                time_s,
                distance_m: time_s * 55.,
                x: (time_s * 0.1).cos() * 800.,
                y: (time_s * 0.1).sin() * 500.,
                speed_kmh: 180. + (time_s * 0.5).sin() * 120.,
                throttle_pct: 50. + (time_s * 0.7).cos() * 50.,
                brake: if i % 90 < 10 { 1. } else { 0. },
            }
        })
        .collect();
    TelemetryTrace::new(samples, vec![]).unwrap()
}

fn bench_frame_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpolation");
    let trace = build_lap_trace();
    let lap_time_s = trace.samples().last().unwrap().time_s;

    // worst case: cold hint, query near the end of the lap
    group.bench_function("frame_at_cold_scan", |b| {
        b.iter(|| black_box(frame_at(&trace, black_box(lap_time_s - 0.01), 0)));
    });

    // the per-tick path: sweep the lap carrying the cursor hint forward
    group.bench_function("frame_at_sequential_sweep", |b| {
        b.iter(|| {
            let mut hint = 0;
            let mut virtual_time_s = 0.;
            while virtual_time_s < lap_time_s {
                if let FrameResult::Frame(frame) = frame_at(&trace, virtual_time_s, hint) {
                    hint = frame.cursor;
                }
                virtual_time_s += 1. / 120.;
            }
            black_box(hint)
        });
    });

    group.bench_function("frame_at_index_scrub", |b| {
        b.iter(|| black_box(frame_at_index(&trace, black_box(TRACE_LEN / 2))));
    });

    group.finish();
}

fn bench_trace_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace_geometry");
    group.measurement_time(Duration::from_secs(8));

    group.bench_function("build_trace_with_geometry", |b| {
        b.iter(|| black_box(build_lap_trace()));
    });

    group.finish();
}

criterion_group!(benches, bench_frame_scan, bench_trace_load);
criterion_main!(benches);
