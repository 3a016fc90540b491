use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use core_sim::{DisturbanceGenerator, SimulationConfig, SimulationOptions};
use runtime::{logging::InMemoryRunLogWriter, RunMode, SimEngine};

const BENCH_TICKS: u64 = 10_000;

fn bench_engine_throughput(c: &mut Criterion) {
    let config = SimulationConfig::new(SimulationOptions {
        terminal_tick: BENCH_TICKS,
        ..SimulationOptions::default()
    })
    .expect("bench config should validate");

    let mut group = c.benchmark_group("engine_throughput");
    group.throughput(Throughput::Elements(BENCH_TICKS));

    group.bench_function(BenchmarkId::new("step_once_both", BENCH_TICKS), |b| {
        b.iter(|| {
            let mut engine = SimEngine::new(RunMode::Both, config, DisturbanceGenerator::new(7));
            let mut log = InMemoryRunLogWriter::new();
            while let Some(report) = engine.step_once(&mut log) {
                black_box(report);
            }
            black_box(engine.metrics().copied());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_engine_throughput);
criterion_main!(benches);
