//! The three-stage course. Y is up; players tee off toward -Z.

use glam::{Quat, Vec3};
use golf_engine::{ColliderShape, GolfResult, Obstacle, Stage, StageCatalog};

/// Start slots per stage; the roster may not exceed this.
pub const MAX_PLAYERS: usize = 4;

const GROUND_COLOR: u32 = 0x228822;
const RAIL_COLOR: u32 = 0x5c3a1e;
const BLOCK_COLOR: u32 = 0x8b5a2b;

/// Half-size of the square ground.
const COURSE_HALF: f32 = 25.0;
const RAIL_HALF_HEIGHT: f32 = 1.0;
const RAIL_HALF_WIDTH: f32 = 0.5;

fn block(half_extents: Vec3, position: Vec3) -> Obstacle {
    Obstacle::new(ColliderShape::Box { half_extents }, position).with_color(BLOCK_COLOR)
}

/// Ground plus the four rails fencing it in.
fn enclosure() -> Vec<Obstacle> {
    let long = Vec3::new(COURSE_HALF, RAIL_HALF_HEIGHT, RAIL_HALF_WIDTH);
    let side = Vec3::new(RAIL_HALF_WIDTH, RAIL_HALF_HEIGHT, COURSE_HALF);
    let rail = |half_extents, position| {
        Obstacle::new(ColliderShape::Box { half_extents }, position).with_color(RAIL_COLOR)
    };
    vec![
        Obstacle::new(ColliderShape::Plane, Vec3::ZERO).with_color(GROUND_COLOR),
        rail(long, Vec3::new(0.0, RAIL_HALF_HEIGHT, -COURSE_HALF)),
        rail(long, Vec3::new(0.0, RAIL_HALF_HEIGHT, COURSE_HALF)),
        rail(side, Vec3::new(-COURSE_HALF, RAIL_HALF_HEIGHT, 0.0)),
        rail(side, Vec3::new(COURSE_HALF, RAIL_HALF_HEIGHT, 0.0)),
    ]
}

/// Tee line: balls sit on the ground, three units apart, centred on `x`.
fn tee(x: f32, z: f32) -> Vec<Vec3> {
    let first = x - 1.5 * (MAX_PLAYERS as f32 - 1.0);
    (0..MAX_PLAYERS)
        .map(|i| Vec3::new(first + 3.0 * i as f32, 1.0, z))
        .collect()
}

pub fn stages() -> Vec<Stage> {
    let straight = Stage {
        index: 0,
        cup_position: Vec3::new(12.0, 0.0, -6.0),
        obstacles: [enclosure(), vec![block(Vec3::new(1.0, 0.5, 2.0), Vec3::new(6.0, 0.5, -2.0))]].concat(),
        player_starts: tee(0.0, 10.0),
    };

    let dogleg = Stage {
        index: 1,
        cup_position: Vec3::new(-12.0, 0.0, -14.0),
        obstacles: [
            enclosure(),
            vec![
                block(Vec3::new(8.0, 1.0, 0.5), Vec3::new(4.0, 1.0, -4.0)),
                block(Vec3::new(0.5, 1.0, 6.0), Vec3::new(-6.0, 1.0, -12.0)),
            ],
        ]
        .concat(),
        player_starts: tee(4.0, 14.0),
    };

    let gate = Stage {
        index: 2,
        cup_position: Vec3::new(0.0, 0.0, -18.0),
        obstacles: [
            enclosure(),
            vec![
                block(Vec3::new(6.0, 1.0, 0.5), Vec3::new(-8.0, 1.0, -8.0)),
                block(Vec3::new(6.0, 1.0, 0.5), Vec3::new(8.0, 1.0, -8.0)),
                block(Vec3::new(1.5, 0.75, 1.5), Vec3::new(0.0, 0.75, -13.0))
                    .with_orientation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_4)),
            ],
        ]
        .concat(),
        player_starts: tee(0.0, 16.0),
    };

    vec![straight, dogleg, gate]
}

pub fn catalog() -> GolfResult<StageCatalog> {
    StageCatalog::new(stages())
}
