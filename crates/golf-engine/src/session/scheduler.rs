//! Stage setup, stage transitions and match completion.
//!
//! ```text
//! Playing ──(all holed, more stages)──► next stage, still Playing
//!    │
//!    └────(all holed, last stage)─────► MatchComplete (terminal)
//! ```
//! A transition happens in the same pass as goal detection.

use glam::{Quat, Vec3};

use crate::api::bindings::{PhysicsBinding, RenderingBinding};
use crate::api::config::MatchConfig;
use crate::api::types::{ColliderHandle, Material, MeshHandle, PlayerId, Pose};
use crate::error::{GolfError, GolfResult, PhysicsError};
use crate::session::player::{PlayerSession, PlayerSpec};
use crate::session::stage::{ColliderShape, Stage, StageCatalog};
use crate::session::state::{MatchState, MatchStatus};

const CUP_COLOR: u32 = 0x111111;

/// Outcome of one scheduling pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Someone is still playing (or the match is already over).
    Stay,
    /// Moved on to the stage at this index.
    NextStage(usize),
    MatchComplete,
}

/// Geometry currently loaded for the active stage.
#[derive(Debug, Default)]
struct StageLayout {
    stage: Option<usize>,
    colliders: Vec<ColliderHandle>,
}

#[derive(Debug)]
pub struct RoundScheduler {
    layout: StageLayout,
    /// Obstacle and cup meshes per stage, created on first load and shown or
    /// hidden after that.
    stage_meshes: Vec<Option<Vec<MeshHandle>>>,
    hole_radius: f32,
}

impl RoundScheduler {
    /// Create bodies and meshes for every player, load stage 0 and return the
    /// initial match state (stage 0, nobody holed, empty histories).
    pub fn start_match<P, R>(
        stages: StageCatalog,
        roster: &[PlayerSpec],
        config: &MatchConfig,
        physics: &mut P,
        render: &mut R,
    ) -> GolfResult<(MatchState, Self)>
    where
        P: PhysicsBinding + ?Sized,
        R: RenderingBinding + ?Sized,
    {
        if roster.is_empty() {
            return Err(GolfError::EmptyRoster);
        }
        stages.check_roster(roster.len())?;

        let mut scheduler = Self {
            layout: StageLayout::default(),
            stage_meshes: vec![None; stages.len()],
            hole_radius: config.hole_radius,
        };

        let first = stages.stage_at(0)?;
        let ball = ColliderShape::Sphere {
            radius: config.ball_radius,
        };
        let mut players = Vec::with_capacity(roster.len());
        for (slot, spec) in roster.iter().enumerate() {
            let id = PlayerId(slot as u32);
            let start = first
                .start_for(id)
                .ok_or(GolfError::MissingStart { stage: 0, player: id })?;
            let body = physics.add_dynamic_body(&ball, config.ball_mass, Pose::at(start), config.damping());
            let mesh = render.create_mesh(&ball, Material::solid(spec.color_for(id)));
            render.set_mesh_transform(mesh, start, Quat::IDENTITY);
            players.push(PlayerSession::new(id, spec, body, mesh));
        }
        scheduler.load_stage(first, physics, render);

        log::info!(
            "match started: {} players, {} stages",
            players.len(),
            stages.len()
        );
        Ok((MatchState::new(stages, players), scheduler))
    }

    /// Advance the match if every player has holed out. Idempotent while
    /// anyone is still playing; a no-op once the match is complete.
    pub fn maybe_advance<P, R>(
        &mut self,
        state: &mut MatchState,
        physics: &mut P,
        render: &mut R,
    ) -> GolfResult<Advance>
    where
        P: PhysicsBinding + ?Sized,
        R: RenderingBinding + ?Sized,
    {
        if state.status == MatchStatus::MatchComplete || !state.all_holed() {
            return Ok(Advance::Stay);
        }

        if state.current_stage_index >= state.stages.last_index() {
            state.status = MatchStatus::MatchComplete;
            for player in &state.players {
                log::info!(
                    "final: {} total {} ({:?})",
                    player.display_name,
                    player.total(),
                    player.score_history
                );
            }
            log::info!("match complete");
            return Ok(Advance::MatchComplete);
        }

        let next = state.current_stage_index + 1;
        self.enter_stage(state, next, physics, render)?;
        for player in &mut state.players {
            player.reset_for_stage();
        }
        log::info!("stage {} of {}", next + 1, state.stages.len());
        Ok(Advance::NextStage(next))
    }

    /// Rebuild the initial match state in place: stage 0, zero shots, empty
    /// histories, balls back at their stage-0 starts.
    pub fn reset_match<P, R>(
        &mut self,
        state: &mut MatchState,
        physics: &mut P,
        render: &mut R,
    ) -> GolfResult<()>
    where
        P: PhysicsBinding + ?Sized,
        R: RenderingBinding + ?Sized,
    {
        self.enter_stage(state, 0, physics, render)?;
        for player in &mut state.players {
            player.reset_for_match();
        }
        state.status = MatchStatus::Playing;
        log::info!("match reset");
        Ok(())
    }

    /// Swap the loaded geometry for stage `index` and move every ball to its
    /// start with zero velocity. Start positions, body handles and the loaded
    /// colliders are all checked before anything is touched, so a failure
    /// leaves the world and the state as they were.
    fn enter_stage<P, R>(
        &mut self,
        state: &mut MatchState,
        index: usize,
        physics: &mut P,
        render: &mut R,
    ) -> GolfResult<()>
    where
        P: PhysicsBinding + ?Sized,
        R: RenderingBinding + ?Sized,
    {
        let stage = state.stages.stage_at(index)?;
        let starts = state
            .players
            .iter()
            .map(|p| {
                stage
                    .start_for(p.id)
                    .map(|start| (p, start))
                    .ok_or(GolfError::MissingStart { stage: index, player: p.id })
            })
            .collect::<GolfResult<Vec<(&PlayerSession, Vec3)>>>()?;
        for (player, _) in &starts {
            physics.transform(player.body)?;
        }
        if let Some(stale) = self
            .layout
            .colliders
            .iter()
            .find(|c| !physics.contains_collider(**c))
        {
            return Err(PhysicsError::StaleCollider(*stale).into());
        }

        self.unload_stage(physics, render)?;
        self.load_stage(stage, physics, render);

        for (player, start) in starts {
            physics.set_body_position(player.body, start)?;
            physics.zero_velocity(player.body)?;
            render.set_mesh_transform(player.mesh, start, Quat::IDENTITY);
        }
        state.current_stage_index = index;
        Ok(())
    }

    fn load_stage<P, R>(&mut self, stage: &Stage, physics: &mut P, render: &mut R)
    where
        P: PhysicsBinding + ?Sized,
        R: RenderingBinding + ?Sized,
    {
        for obstacle in &stage.obstacles {
            self.layout
                .colliders
                .push(physics.add_static_collider(&obstacle.shape, obstacle.pose()));
        }
        self.layout.stage = Some(stage.index);

        if self.stage_meshes.len() <= stage.index {
            self.stage_meshes.resize(stage.index + 1, None);
        }
        let meshes = match self.stage_meshes[stage.index].take() {
            Some(meshes) => {
                for mesh in &meshes {
                    render.set_visible(*mesh, true);
                }
                meshes
            }
            None => self.create_stage_meshes(stage, render),
        };
        self.stage_meshes[stage.index] = Some(meshes);

        log::debug!(
            "stage {} loaded: {} obstacles, cup at {:?}",
            stage.index + 1,
            stage.obstacles.len(),
            stage.cup_position
        );
    }

    fn create_stage_meshes<R>(&self, stage: &Stage, render: &mut R) -> Vec<MeshHandle>
    where
        R: RenderingBinding + ?Sized,
    {
        let mut meshes = Vec::with_capacity(stage.obstacles.len() + 1);
        for obstacle in &stage.obstacles {
            let mesh = render.create_mesh(&obstacle.shape, Material::solid(obstacle.color));
            render.set_mesh_transform(mesh, obstacle.position, obstacle.orientation);
            meshes.push(mesh);
        }

        // Cup marker: render only, the ball rolls over it.
        let cup = ColliderShape::Box {
            half_extents: Vec3::new(self.hole_radius, 0.01, self.hole_radius),
        };
        let mesh = render.create_mesh(&cup, Material::solid(CUP_COLOR));
        render.set_mesh_transform(mesh, stage.cup_position, Quat::IDENTITY);
        meshes.push(mesh);
        meshes
    }

    fn unload_stage<P, R>(&mut self, physics: &mut P, render: &mut R) -> GolfResult<()>
    where
        P: PhysicsBinding + ?Sized,
        R: RenderingBinding + ?Sized,
    {
        if let Some(Some(meshes)) = self
            .layout
            .stage
            .take()
            .and_then(|index| self.stage_meshes.get(index))
        {
            for mesh in meshes {
                render.set_visible(*mesh, false);
            }
        }
        for collider in self.layout.colliders.drain(..) {
            physics.remove_static_collider(collider)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{catalog, FakePhysics, RecordingRender};

    struct Fixture {
        state: MatchState,
        scheduler: RoundScheduler,
        physics: FakePhysics,
        render: RecordingRender,
    }

    fn fixture(stages: usize, players: usize) -> Fixture {
        let mut physics = FakePhysics::new();
        let mut render = RecordingRender::default();
        let roster: Vec<PlayerSpec> = (0..players).map(|i| PlayerSpec::new(format!("p{}", i))).collect();
        let (state, scheduler) = RoundScheduler::start_match(
            catalog(stages, players),
            &roster,
            &MatchConfig::default(),
            &mut physics,
            &mut render,
        )
        .unwrap();
        Fixture { state, scheduler, physics, render }
    }

    fn hole(f: &mut Fixture, id: u32, shots: u32) {
        let p = f.state.player_mut(PlayerId(id)).unwrap();
        p.shot_count = shots;
        p.hole_out();
    }

    fn advance(f: &mut Fixture) -> Advance {
        f.scheduler
            .maybe_advance(&mut f.state, &mut f.physics, &mut f.render)
            .unwrap()
    }

    #[test]
    fn start_match_initial_state() {
        let f = fixture(3, 3);
        assert_eq!(f.state.current_stage_index(), 0);
        assert_eq!(f.state.status(), MatchStatus::Playing);
        assert_eq!(f.state.players().len(), 3);
        for p in f.state.players() {
            assert_eq!(p.shot_count, 0);
            assert!(!p.holed);
            assert!(p.score_history.is_empty());
        }
        // Stage 0 obstacles in the physics world; balls at their starts.
        assert_eq!(f.physics.live_colliders(), 2);
        let p1 = f.state.player(PlayerId(1)).unwrap();
        assert_eq!(f.physics.position(p1.body), Vec3::new(3.0, 1.0, 10.0));
    }

    #[test]
    fn empty_roster_rejected() {
        let mut physics = FakePhysics::new();
        let mut render = RecordingRender::default();
        let result = RoundScheduler::start_match(
            catalog(3, 2),
            &[],
            &MatchConfig::default(),
            &mut physics,
            &mut render,
        );
        assert!(matches!(result, Err(GolfError::EmptyRoster)));
    }

    #[test]
    fn roster_larger_than_starts_rejected() {
        let mut physics = FakePhysics::new();
        let mut render = RecordingRender::default();
        let roster = vec![PlayerSpec::new("a"), PlayerSpec::new("b"), PlayerSpec::new("c")];
        let result = RoundScheduler::start_match(
            catalog(3, 2),
            &roster,
            &MatchConfig::default(),
            &mut physics,
            &mut render,
        );
        assert!(matches!(result, Err(GolfError::MissingStart { .. })));
        assert!(physics.bodies.is_empty());
    }

    #[test]
    fn one_unholed_player_blocks_advance() {
        let mut f = fixture(3, 3);
        hole(&mut f, 0, 2);
        hole(&mut f, 1, 4);
        for _ in 0..10 {
            assert_eq!(advance(&mut f), Advance::Stay);
        }
        assert_eq!(f.state.current_stage_index(), 0);
        assert_eq!(f.state.status(), MatchStatus::Playing);
    }

    #[test]
    fn all_holed_moves_to_next_stage() {
        let mut f = fixture(3, 2);
        let body = f.state.player(PlayerId(0)).unwrap().body;
        f.physics.place(body, Vec3::new(12.0, 0.3, -6.0));
        f.physics.bodies[body.0 as usize].velocity = Vec3::new(1.0, 0.0, 1.0);
        hole(&mut f, 0, 2);
        hole(&mut f, 1, 5);

        assert_eq!(advance(&mut f), Advance::NextStage(1));
        assert_eq!(f.state.current_stage_index(), 1);
        for p in f.state.players() {
            assert_eq!(p.shot_count, 0);
            assert!(!p.holed);
            assert_eq!(p.score_history.len(), 1);
        }
        assert_eq!(f.state.player(PlayerId(1)).unwrap().score_history, vec![5]);
        // Ball repositioned to the stage-1 start and stopped.
        assert_eq!(f.physics.position(body), Vec3::new(0.0, 1.0, 11.0));
        assert_eq!(f.physics.bodies[body.0 as usize].velocity, Vec3::ZERO);
        // Old obstacles removed, new ones loaded.
        assert_eq!(f.physics.live_colliders(), 2);
        assert_eq!(f.physics.colliders.len(), 4);
    }

    #[test]
    fn previous_stage_meshes_hidden() {
        let mut f = fixture(2, 1);
        // 1 ball + 2 obstacles + cup
        assert_eq!(f.render.visible_count(), 4);
        hole(&mut f, 0, 1);
        advance(&mut f);
        assert_eq!(f.render.meshes.len(), 7);
        assert_eq!(f.render.visible_count(), 4);
    }

    #[test]
    fn last_stage_completes_match() {
        let mut f = fixture(3, 3);
        let scores = [[2, 3, 4], [1, 5, 2], [3, 3, 3]];
        for (stage, row) in scores.iter().enumerate() {
            for (id, shots) in row.iter().enumerate() {
                hole(&mut f, id as u32, *shots);
            }
            let expected = if stage == 2 { Advance::MatchComplete } else { Advance::NextStage(stage + 1) };
            assert_eq!(advance(&mut f), expected);
            for p in f.state.players() {
                assert_eq!(p.score_history.len(), stage + 1);
            }
        }

        assert!(f.state.is_complete());
        assert_eq!(f.state.current_stage_index(), 2);
        assert_eq!(
            f.state.totals(),
            vec![(PlayerId(0), 6), (PlayerId(1), 11), (PlayerId(2), 9)]
        );

        // Terminal: nothing more happens, no further stage setup.
        let colliders = f.physics.colliders.len();
        assert_eq!(advance(&mut f), Advance::Stay);
        assert_eq!(f.physics.colliders.len(), colliders);
        assert_eq!(f.state.current_stage_index(), 2);
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let mut f = fixture(2, 2);
        hole(&mut f, 0, 2);
        hole(&mut f, 1, 3);
        advance(&mut f);
        hole(&mut f, 0, 1);
        hole(&mut f, 1, 1);
        assert_eq!(advance(&mut f), Advance::MatchComplete);

        f.scheduler
            .reset_match(&mut f.state, &mut f.physics, &mut f.render)
            .unwrap();
        assert_eq!(f.state.status(), MatchStatus::Playing);
        assert_eq!(f.state.current_stage_index(), 0);
        for p in f.state.players() {
            assert!(p.score_history.is_empty());
            assert_eq!(p.shot_count, 0);
            assert!(!p.holed);
        }
        let body = f.state.player(PlayerId(1)).unwrap().body;
        assert_eq!(f.physics.position(body), Vec3::new(3.0, 1.0, 10.0));
        assert_eq!(f.physics.live_colliders(), 2);
    }

    /// What a failed transition must leave untouched.
    fn world_snapshot(f: &Fixture) -> (usize, Vec<Option<ColliderShape>>, Vec3, usize, usize) {
        let p0 = f.state.player(PlayerId(0)).unwrap().body;
        (
            f.state.current_stage_index(),
            f.physics.colliders.clone(),
            f.physics.position(p0),
            f.render.meshes.len(),
            f.render.visible_count(),
        )
    }

    #[test]
    fn stale_body_during_transition_is_fatal() {
        let mut f = fixture(2, 2);
        let body = f.state.player(PlayerId(1)).unwrap().body;
        hole(&mut f, 0, 1);
        hole(&mut f, 1, 1);
        f.physics.kill(body);
        let before = world_snapshot(&f);

        let err = f
            .scheduler
            .maybe_advance(&mut f.state, &mut f.physics, &mut f.render)
            .unwrap_err();
        assert!(matches!(err, GolfError::PhysicsBindingFailure(PhysicsError::StaleBody(_))));
        assert_eq!(world_snapshot(&f), before);
        assert_eq!(f.state.player(PlayerId(0)).unwrap().score_history, vec![1]);
    }

    #[test]
    fn stale_collider_during_transition_changes_nothing() {
        let mut f = fixture(2, 2);
        hole(&mut f, 0, 1);
        hole(&mut f, 1, 1);
        f.physics.colliders[1] = None;
        let before = world_snapshot(&f);

        let err = f
            .scheduler
            .maybe_advance(&mut f.state, &mut f.physics, &mut f.render)
            .unwrap_err();
        assert!(matches!(
            err,
            GolfError::PhysicsBindingFailure(PhysicsError::StaleCollider(ColliderHandle(1)))
        ));
        assert_eq!(world_snapshot(&f), before);
        assert!(f.state.players().iter().all(|p| p.holed));
    }

    #[test]
    fn revisited_stage_reuses_its_meshes() {
        let mut f = fixture(2, 1);
        hole(&mut f, 0, 1);
        advance(&mut f);
        let meshes = f.render.meshes.len();

        for _ in 0..5 {
            f.scheduler
                .reset_match(&mut f.state, &mut f.physics, &mut f.render)
                .unwrap();
            hole(&mut f, 0, 1);
            assert_eq!(advance(&mut f), Advance::NextStage(1));
        }
        assert_eq!(f.render.meshes.len(), meshes);
        assert_eq!(f.render.visible_count(), 4);
        assert_eq!(f.physics.live_colliders(), 2);
    }
}
