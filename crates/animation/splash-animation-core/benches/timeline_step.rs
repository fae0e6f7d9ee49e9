use criterion::{black_box, criterion_group, criterion_main, Criterion};
use splash_animation_core::{
    build_loading_timeline, ElementId, OverlayElements, RandomParameterGenerator, Schedule,
    SequenceConfig, TimelineScheduler,
};

fn overlay(particles: usize) -> (SequenceConfig, OverlayElements) {
    let cfg = SequenceConfig::default();
    let elements = OverlayElements {
        container: Some(ElementId::new()),
        logo: Some(ElementId::new()),
        progress_bar: Some(ElementId::new()),
        dots: (0..3).map(|_| ElementId::new()).collect(),
        particles: (0..particles).map(|_| ElementId::new()).collect(),
    };
    (cfg, elements)
}

fn bench_full_run(c: &mut Criterion) {
    let (cfg, elements) = overlay(12);
    let params = RandomParameterGenerator::seeded(9).particles(&cfg.particles, 12);
    c.bench_function("loading_run_60fps", |b| {
        b.iter(|| {
            let tl = build_loading_timeline(&cfg, &elements, &params).unwrap();
            let mut sched = TimelineScheduler::new();
            sched.start(tl).unwrap();
            while sched.is_running() {
                black_box(sched.step(1.0 / 60.0).unwrap());
            }
        })
    });
}

fn bench_sample(c: &mut Criterion) {
    let (cfg, elements) = overlay(256);
    let params = RandomParameterGenerator::seeded(9).particles(&cfg.particles, 256);
    let tl = build_loading_timeline(&cfg, &elements, &params).unwrap();
    let schedule = Schedule::from_timeline(&tl);
    c.bench_function("schedule_sample_256_particles", |b| {
        b.iter(|| black_box(schedule.sample(black_box(1.3))))
    });
}

criterion_group!(benches, bench_full_run, bench_sample);
criterion_main!(benches);
