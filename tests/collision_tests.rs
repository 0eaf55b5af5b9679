use approx::assert_relative_eq;
use wobble::collision::detect;
use wobble::{
    Body, BodyCollisionInformation, BodyHandle, BodyJoint, ClosedShape, CollisionObserver, JointLink,
    NoOpCollisionObserver, Vec2, World, WorldConfig,
};
use wobble::Vec as _;

#[derive(Default)]
struct Recorder {
    collisions: usize,
    batches: usize,
    last_batch: usize,
    exceeded: usize,
}

impl CollisionObserver<f64> for Recorder {
    fn on_collision(&mut self, _info: &BodyCollisionInformation<f64>) {
        self.collisions += 1;
    }

    fn on_collisions(&mut self, infos: &[BodyCollisionInformation<f64>]) {
        self.batches += 1;
        self.last_batch = infos.len();
    }

    fn on_penetration_exceeded(&mut self, _info: &BodyCollisionInformation<f64>) {
        self.exceeded += 1;
    }
}

fn polygon(points: &[Vec2<f64>]) -> Body<f64> {
    let shape = ClosedShape::from_points_uncentered(points);
    Body::new(&shape, 1.0, Vec2::zero(), 0.0, 1.0, false).unwrap()
}

fn tip() -> Body<f64> {
    polygon(&[Vec2::new(1.0, 1.9), Vec2::new(2.0, 3.0), Vec2::new(0.0, 3.0)])
}

fn small_box() -> Body<f64> {
    polygon(&[Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0), Vec2::new(2.0, 2.0), Vec2::new(0.0, 2.0)])
}

fn scene(config: WorldConfig<f64>) -> (World<f64>, BodyHandle, BodyHandle) {
    let mut world = World::new(config);
    let a = world.add_body(tip()).unwrap();
    let b = world.add_body(small_box()).unwrap();
    (world, a, b)
}

#[test]
fn tie_break_switches_with_threshold() {
    let mut world = World::new(WorldConfig::new());
    let a = world
        .add_body(polygon(&[Vec2::new(2.0, 0.2), Vec2::new(3.0, 5.0), Vec2::new(1.0, 5.0)]))
        .unwrap();
    let b = world
        .add_body(polygon(&[Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(4.0, 4.0), Vec2::new(0.0, 4.0)]))
        .unwrap();
    let (body_a, body_b) = (world.body(a).unwrap(), world.body(b).unwrap());

    let mut shallow = Vec::new();
    detect(body_a, a, body_b, b, 0.5, &mut shallow);
    assert_eq!(shallow.len(), 1);
    assert_eq!((shallow[0].b_point1, shallow[0].b_point2), (0, 1));
    assert_eq!(shallow[0].normal, Vec2::new(0.0, -1.0));
    assert_relative_eq!(shallow[0].penetration, 0.2, epsilon = 1e-9);

    let mut deep = Vec::new();
    detect(body_a, a, body_b, b, 5.0, &mut deep);
    assert_eq!(deep.len(), 1);
    assert_eq!((deep[0].b_point1, deep[0].b_point2), (1, 2));
    assert_eq!(deep[0].normal, Vec2::new(1.0, 0.0));
    assert_relative_eq!(deep[0].penetration, 2.0, epsilon = 1e-9);
}

#[test]
fn overlapping_bodies_are_pushed_apart() {
    let (mut world, a, b) = scene(WorldConfig::new());
    let mut recorder = Recorder::default();
    world.update(0.1, &mut recorder);

    assert_eq!(recorder.collisions, 1);
    assert_eq!(recorder.batches, 1);
    assert_eq!(recorder.last_batch, 1);
    assert_eq!(recorder.exceeded, 0);

    let tip = world.body(a).unwrap();
    let square = world.body(b).unwrap();
    assert_relative_eq!(tip.point_mass(0).position.y, 1.9 + 0.1 * 2.0 / 3.0, epsilon = 1e-9);
    assert_relative_eq!(tip.point_mass(0).position.x, 1.0, epsilon = 1e-12);
    assert_relative_eq!(square.point_mass(2).position.y, 2.0 - 1.0 / 60.0, epsilon = 1e-9);
    assert_relative_eq!(square.point_mass(3).position.y, 2.0 - 1.0 / 60.0, epsilon = 1e-9);
    for body in [tip, square] {
        assert!(body.point_masses().iter().all(|pm| !pm.position.has_nan() && !pm.velocity.has_nan()));
    }
}

#[test]
fn overlapping_circles_separate_symmetrically() {
    let mut world = World::new(WorldConfig::new());
    let shape = ClosedShape::circle(1.0, 16);
    let left = world.add_body(Body::new(&shape, 1.0, Vec2::new(-0.9, 0.0), 0.0, 1.0, false).unwrap()).unwrap();
    let right = world.add_body(Body::new(&shape, 1.0, Vec2::new(0.9, 0.0), 0.0, 1.0, false).unwrap()).unwrap();

    let mut recorder = Recorder::default();
    world.update(1.0 / 60.0, &mut recorder);
    assert!(recorder.collisions > 0);
    assert_eq!(recorder.exceeded, 0);

    let (l, r) = (world.body(left).unwrap(), world.body(right).unwrap());
    for body in [l, r] {
        assert!(body.point_masses().iter().all(|pm| !pm.position.has_nan() && !pm.velocity.has_nan()));
    }
    let centroid = |body: &Body<f64>| {
        let n = body.point_count() as f64;
        body.point_masses().iter().fold(Vec2::zero(), |acc, pm| acc + pm.position).scale(1.0 / n)
    };
    let (cl, cr) = (centroid(l), centroid(r));
    assert!(cl.x < -0.9);
    assert!(cr.x > 0.9);
    assert_relative_eq!(cl.x, -cr.x, epsilon = 1e-9);
}

#[test]
fn deep_penetration_is_reported_and_skipped() {
    let (mut world, a, b) = scene(WorldConfig::new().with_penetration_threshold(0.05));
    let before: Vec<Vec2<f64>> = world.body(b).unwrap().point_masses().iter().map(|pm| pm.position).collect();
    let mut recorder = Recorder::default();
    world.update(0.1, &mut recorder);

    assert_eq!(recorder.collisions, 1);
    assert_eq!(recorder.exceeded, 1);
    assert_eq!(world.body(a).unwrap().point_mass(0).position, Vec2::new(1.0, 1.9));
    let after: Vec<Vec2<f64>> = world.body(b).unwrap().point_masses().iter().map(|pm| pm.position).collect();
    assert_eq!(before, after);
    for handle in [a, b] {
        let body = world.body(handle).unwrap();
        assert!(body.point_masses().iter().all(|pm| pm.velocity == Vec2::zero()));
    }
}

#[test]
fn joint_can_exempt_pair_from_collision() {
    let (mut world, a, b) = scene(WorldConfig::new());
    let joint = BodyJoint::spring(JointLink::Body(a), JointLink::Body(b), 0.0, 0.0).with_allow_collisions(true);
    world.add_joint(joint).unwrap();

    let mut recorder = Recorder::default();
    world.update(0.1, &mut recorder);
    assert_eq!(recorder.collisions, 0);
    assert_eq!(recorder.last_batch, 0);
    assert_eq!(world.body(a).unwrap().point_mass(0).position, Vec2::new(1.0, 1.9));
}

#[test]
fn material_pair_can_disable_collision() {
    let mut world = World::new(WorldConfig::new());
    let ghost = world.add_material();
    world.add_body(tip()).unwrap();
    world.add_body(small_box().with_material(ghost)).unwrap();
    world.set_material_pair_collide(0, ghost, false).unwrap();

    let mut recorder = Recorder::default();
    world.update(0.1, &mut recorder);
    assert_eq!(recorder.collisions, 0);
}

#[test]
fn bodies_outside_world_limits_never_collide() {
    let config = WorldConfig::new().with_world_limits(Vec2::new(50.0, 50.0), Vec2::new(60.0, 60.0));
    let (mut world, a, _) = scene(config);
    let mut recorder = Recorder::default();
    world.update(0.1, &mut recorder);
    assert_eq!(recorder.collisions, 0);
    assert_eq!(world.body(a).unwrap().bitmask_x(), 0);
    assert_eq!(world.body(a).unwrap().bitmask_y(), 0);
}

#[test]
fn falling_box_comes_to_rest_on_static_floor() {
    let mut world = World::new(WorldConfig::new());
    let floor = Body::new(&ClosedShape::rectangle(20.0, 2.0), f64::INFINITY, Vec2::new(0.0, -1.0), 0.0, 1.0, false)
        .unwrap();
    let floor = world.add_body(floor).unwrap();

    let mut crate_body = Body::new(&ClosedShape::rectangle(1.0, 1.0), 1.0, Vec2::new(0.0, 1.0), 0.0, 1.0, false).unwrap();
    crate_body.add_component(&wobble::SpringComponentCreator::new());
    crate_body.add_component(&wobble::GravityComponentCreator::default());
    let crate_body = world.add_body(crate_body).unwrap();

    for _ in 0..300 {
        world.update(1.0 / 120.0, &mut NoOpCollisionObserver);
    }

    let resting = world.body(crate_body).unwrap().derived_position();
    assert!(resting.y > 0.0 && resting.y < 1.0, "crate settled at {:?}", resting);
    let floor = world.body(floor).unwrap();
    assert_eq!(floor.point_mass(0).position, Vec2::new(-10.0, -2.0));
}
