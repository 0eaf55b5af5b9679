use wobble::{
    Body, ClosedShape, GravityComponentCreator, NoOpCollisionObserver, SpringComponentCreator, Vec2, World,
    WorldConfig,
};

fn simulate() -> Vec<Vec2<f32>> {
    let mut world: World<f32> = World::new(WorldConfig::new());
    let floor = Body::new(&ClosedShape::rectangle(30.0, 2.0), f32::INFINITY, Vec2::new(0.0, -5.0), 0.0, 1.0, false)
        .unwrap();
    world.add_body(floor).unwrap();

    for i in 0..4 {
        let shape = ClosedShape::circle(0.8, 10);
        let mut body = Body::new(&shape, 1.0, Vec2::new(i as f32 * 1.2 - 2.0, i as f32 * 1.5), 0.2 * i as f32, 1.0, false)
            .unwrap();
        body.add_component(&SpringComponentCreator::new());
        body.add_component(&GravityComponentCreator::default());
        world.add_body(body).unwrap();
    }

    for _ in 0..240 {
        world.update(1.0 / 60.0, &mut NoOpCollisionObserver);
    }

    world
        .bodies()
        .flat_map(|(_, body)| body.point_masses().iter().map(|pm| pm.position))
        .collect()
}

#[test]
fn pile_is_deterministic() {
    let first = simulate();
    for _ in 0..3 {
        assert_eq!(first, simulate());
    }
}
