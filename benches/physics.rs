//! Benchmarks for wobble world stepping.

use criterion::{criterion_group, criterion_main, Criterion};
use wobble::*;

fn pile(count: usize) -> World<f32> {
    let mut world = World::new(WorldConfig::new());
    let floor = Body::new(&ClosedShape::rectangle(36.0, 2.0), f32::INFINITY, Vec2::new(0.0, -18.0), 0.0, 1.0, false)
        .unwrap();
    world.add_body(floor).unwrap();

    let shape = ClosedShape::circle(0.5, 12);
    for i in 0..count {
        let x = (i % 10) as f32 * 1.2 - 6.0;
        let y = (i / 10) as f32 * 1.2 - 15.0;
        let mut body = Body::new(&shape, 1.0, Vec2::new(x, y), 0.0, 1.0, false).unwrap();
        body.add_component(&SpringComponentCreator::new());
        body.add_component(&GravityComponentCreator::default());
        world.add_body(body).unwrap();
    }
    world
}

fn bench_falling_pile(c: &mut Criterion) {
    c.bench_function("pile_50_bodies_60_steps", |b| {
        b.iter(|| {
            let mut world = pile(50);
            for _ in 0..60 {
                world.update(1.0 / 60.0, &mut NoOpCollisionObserver);
            }
            world.body_count()
        });
    });
}

fn bench_pressure_bodies(c: &mut Criterion) {
    c.bench_function("pressure_20_balloons_60_steps", |b| {
        b.iter(|| {
            let mut world: World<f32> = World::new(WorldConfig::new());
            let shape = ClosedShape::circle(0.8, 24);
            for i in 0..20 {
                let position = Vec2::new((i % 5) as f32 * 2.0 - 4.0, (i / 5) as f32 * 2.0);
                let mut body = Body::new(&shape, 1.0, position, 0.0, 1.0, false).unwrap();
                body.add_component(&SpringComponentCreator::new().without_shape_matching());
                body.add_component(&PressureComponentCreator::new(20.0));
                world.add_body(body).unwrap();
            }
            for _ in 0..60 {
                world.update(1.0 / 60.0, &mut NoOpCollisionObserver);
            }
            world.body_count()
        });
    });
}

fn bench_queries(c: &mut Criterion) {
    let world = pile(100);
    c.bench_function("ray_cast_100_bodies", |b| {
        b.iter(|| world.ray_cast(Vec2::new(-19.0, -14.5), Vec2::new(19.0, -14.5), u32::MAX, &[]));
    });
}

criterion_group!(benches, bench_falling_pile, bench_pressure_bodies, bench_queries);
criterion_main!(benches);
