use glam::Vec3;

use crate::api::types::GameEvent;
use crate::core::physics::RapierPhysics;
use crate::error::GolfResult;
use crate::input::queue::InputQueue;
use crate::renderer::mesh_buffer::MeshBuffer;
use crate::session::scoreboard::Scoreboard;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Maximum fixed steps run for one frame (default: 10).
    pub max_steps_per_frame: u32,
    /// World gravity, Y up (default: Earth).
    pub gravity: Vec3,
    /// Initial mesh buffer capacity (default: 64).
    pub max_meshes: usize,
    /// Maximum number of game events kept per frame (default: 32).
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_steps_per_frame: 10,
            gravity: Vec3::new(0.0, -9.82, 0.0),
            max_meshes: 64,
            max_events: 32,
        }
    }
}

/// The contract a game fulfils for the runner.
///
/// `update` runs once per fixed step with that step's input. Errors returned
/// from either method are fatal; the runner halts the game loop.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Build the course, bodies and meshes.
    fn init(&mut self, ctx: &mut EngineContext) -> GolfResult<()>;

    /// One fixed step: consume input, advance the simulation, score.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) -> GolfResult<()>;
}

/// Everything a game mutates, owned by the runner.
pub struct EngineContext {
    pub physics: RapierPhysics,
    pub meshes: MeshBuffer,
    pub scoreboard: Scoreboard,
    pub events: Vec<GameEvent>,
    fixed_dt: f32,
    max_events: usize,
}

impl EngineContext {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            physics: RapierPhysics::new(config.gravity),
            meshes: MeshBuffer::new(config.max_meshes),
            scoreboard: Scoreboard::new(),
            events: Vec::with_capacity(config.max_events),
            fixed_dt: config.fixed_dt,
            max_events: config.max_events,
        }
    }

    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Emit a game event to be forwarded to the host. Events past the
    /// per-frame limit are dropped.
    pub fn emit_event(&mut self, event: GameEvent) {
        if self.events.len() >= self.max_events {
            log::warn!("event buffer full, dropping kind {}", event.kind);
            return;
        }
        self.events.push(event);
    }

    /// Clear per-frame transient data.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::bindings::PhysicsBinding;
    use crate::api::config::MatchConfig;
    use crate::api::types::{PlayerId, ScreenPoint};
    use crate::session::player::PlayerSpec;
    use crate::session::stage::{ColliderShape, Obstacle, Stage, StageCatalog};
    use crate::session::MatchSession;
    use crate::testing::catalog;

    #[test]
    fn events_capped_per_frame() {
        let mut ctx = EngineContext::new(&GameConfig {
            max_events: 2,
            ..GameConfig::default()
        });
        for i in 0..4 {
            ctx.emit_event(GameEvent { kind: i as f32, ..GameEvent::default() });
        }
        assert_eq!(ctx.events.len(), 2);
        ctx.clear_frame_data();
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn session_drives_rapier_world() {
        let mut ctx = EngineContext::default();
        let mut session = MatchSession::start(
            catalog(2, 2),
            &[PlayerSpec::new("Ada"), PlayerSpec::new("Bo")],
            &MatchConfig::default(),
            &mut ctx.physics,
            &mut ctx.meshes,
        )
        .unwrap();
        // 2 balls + plane + box + cup marker
        assert_eq!(ctx.meshes.mesh_count(), 5);

        session
            .attempt_shot(
                &mut ctx.physics,
                PlayerId(0),
                ScreenPoint::new(100.0, 100.0),
                ScreenPoint::new(50.0, 140.0),
            )
            .unwrap();
        let dt = ctx.fixed_dt();
        for _ in 0..30 {
            session
                .tick(dt, &mut ctx.physics, &mut ctx.meshes, &mut ctx.scoreboard)
                .unwrap();
        }

        let ada = session.state().player(PlayerId(0)).unwrap();
        let pos = ctx.physics.transform(ada.body).unwrap().position;
        assert!(pos.x > 0.05, "ball should travel +X: {:?}", pos);
        assert!(pos.z < 10.0, "ball should travel -Z: {:?}", pos);

        // Mesh mirrors the body.
        let mesh = ctx.meshes.get(ada.mesh).unwrap();
        assert!((mesh.position() - pos).length() < 1e-5);

        // Untouched ball stays put on the ground.
        let bo = session.state().player(PlayerId(1)).unwrap();
        let bo_pos = ctx.physics.transform(bo.body).unwrap().position;
        assert!((bo_pos.x - 3.0).abs() < 0.05 && (bo_pos.z - 10.0).abs() < 0.05);

        assert_eq!(ctx.scoreboard.lines()[0].shot_count, 1);
        assert_eq!(ctx.scoreboard.stage().unwrap().current, 1);
    }

    #[test]
    fn fast_ball_holed_in_passing_stays_in_the_cup() {
        let mut ctx = EngineContext::default();
        let stage = Stage {
            index: 0,
            cup_position: Vec3::new(5.0, 0.0, 0.0),
            obstacles: vec![Obstacle::new(ColliderShape::Plane, Vec3::ZERO)],
            player_starts: vec![Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 8.0)],
        };
        let mut session = MatchSession::start(
            StageCatalog::new(vec![stage]).unwrap(),
            &[PlayerSpec::new("Ada"), PlayerSpec::new("Bo")],
            &MatchConfig::default(),
            &mut ctx.physics,
            &mut ctx.meshes,
        )
        .unwrap();

        // Hard shot along +X: fast enough to roll straight over the cup.
        session
            .attempt_shot(
                &mut ctx.physics,
                PlayerId(0),
                ScreenPoint::new(1000.0, 0.0),
                ScreenPoint::new(0.0, 0.0),
            )
            .unwrap();
        let body = session.state().player(PlayerId(0)).unwrap().body;
        let dt = ctx.fixed_dt();

        let mut holed_at = None;
        for _ in 0..240 {
            let report = session
                .tick(dt, &mut ctx.physics, &mut ctx.meshes, &mut ctx.scoreboard)
                .unwrap();
            if report.newly_holed.contains(&PlayerId(0)) {
                holed_at = Some(ctx.physics.transform(body).unwrap().position);
                break;
            }
        }
        let holed_at = holed_at.expect("ball should pass through the cup");

        for _ in 0..600 {
            session
                .tick(dt, &mut ctx.physics, &mut ctx.meshes, &mut ctx.scoreboard)
                .unwrap();
        }
        let pos = ctx.physics.transform(body).unwrap().position;
        assert!((pos - holed_at).length() < 1e-4, "holed ball moved: {:?} -> {:?}", holed_at, pos);
        assert_eq!(ctx.physics.linear_velocity(body).unwrap(), Vec3::ZERO);
        assert!(session.state().player(PlayerId(0)).unwrap().holed);
        assert!(!ctx.scoreboard.lines()[0].moving);
    }
}
