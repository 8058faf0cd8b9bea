//! # Integration Hot Path Benchmark
//!
//! Measures one frame of emission plus integration under sustained pointer
//! motion, and slot acquisition under both pool policies.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;
use glimmer_core::{
    AcquirePolicy, EffectPools, EffectRng, EffectsConfig, EmissionController, Integrator, Viewport,
};

fn setup(config: &EffectsConfig) -> (EffectPools, EmissionController) {
    let mut rng = EffectRng::from_seed(1);
    let pools = EffectPools::new(config, &mut rng);
    let controller = EmissionController::with_rng(config, Viewport::new(1920, 1080), rng);
    (pools, controller)
}

// =============================================================================
// FRAME BENCHMARKS
// =============================================================================

fn bench_frame_with_motion(c: &mut Criterion) {
    let config = EffectsConfig::default();
    let (mut pools, mut controller) = setup(&config);
    let integrator = Integrator::from_config(&config);

    let mut t = 0.0_f32;
    c.bench_function("frame_move_and_integrate", |b| {
        b.iter(|| {
            t += 0.05;
            let position = Vec2::new(960.0 + t.cos() * 400.0, 540.0 + t.sin() * 300.0);
            controller.emit_on_move(&mut pools.targets(), position, Vec2::new(5.0, 3.0));
            integrator.step(&mut pools);
            black_box(pools.canvas_count())
        });
    });
}

fn bench_burst_storm(c: &mut Criterion) {
    let config = EffectsConfig::default();
    let (mut pools, mut controller) = setup(&config);
    let integrator = Integrator::from_config(&config);

    c.bench_function("frame_burst_and_integrate", |b| {
        b.iter(|| {
            controller.emit_on_down(&mut pools.targets(), Vec2::new(960.0, 540.0));
            integrator.step(&mut pools);
            black_box(pools.gpu_sparkles().live_count())
        });
    });
}

// =============================================================================
// POOL POLICY BENCHMARKS
// =============================================================================

fn bench_slot_acquire(c: &mut Criterion) {
    let mut group = c.benchmark_group("slot_acquire");

    for capacity in [50_usize, 1_000, 10_000] {
        for policy in [AcquirePolicy::LinearScan, AcquirePolicy::FreeList] {
            let config = EffectsConfig {
                max_sparkles: capacity,
                slot_acquire: policy,
                ..EffectsConfig::default()
            };
            let (mut pools, mut controller) = setup(&config);
            let integrator = Integrator::from_config(&config);

            group.bench_with_input(
                BenchmarkId::new(format!("{policy:?}"), capacity),
                &capacity,
                |b, _| {
                    b.iter(|| {
                        controller.emit_sparkle(&mut pools.targets(), Vec2::new(100.0, 100.0));
                        integrator.step(&mut pools);
                        black_box(pools.gpu_sparkles().live_count())
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_frame_with_motion, bench_burst_storm, bench_slot_acquire);
criterion_main!(benches);
