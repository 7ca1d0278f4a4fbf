//! The match/session state machine.
//!
//! Per tick: physics step → holed balls held in place → mesh sync → goal
//! detection → scheduling → scoreboard. Shots arrive out of band from input
//! release and are applied synchronously between ticks.

pub mod goal;
pub mod player;
pub mod scheduler;
pub mod scoreboard;
pub mod shot;
pub mod stage;
pub mod state;

use crate::api::bindings::{PhysicsBinding, RenderingBinding, ScoreboardSink};
use crate::api::config::MatchConfig;
use crate::api::types::{PlayerId, ScreenPoint};
use crate::error::GolfResult;

use goal::GoalDetector;
use player::PlayerSpec;
use scheduler::{Advance, RoundScheduler};
use shot::{ShotApplied, ShotController};
use stage::StageCatalog;
use state::MatchState;

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub newly_holed: Vec<PlayerId>,
    pub advance: Advance,
}

/// One match with its controllers wired together.
#[derive(Debug)]
pub struct MatchSession {
    state: MatchState,
    scheduler: RoundScheduler,
    shots: ShotController,
    goals: GoalDetector,
}

impl MatchSession {
    pub fn start<P, R>(
        stages: StageCatalog,
        roster: &[PlayerSpec],
        config: &MatchConfig,
        physics: &mut P,
        render: &mut R,
    ) -> GolfResult<Self>
    where
        P: PhysicsBinding + ?Sized,
        R: RenderingBinding + ?Sized,
    {
        config.validate()?;
        let (state, scheduler) = RoundScheduler::start_match(stages, roster, config, physics, render)?;
        Ok(Self {
            state,
            scheduler,
            shots: ShotController::new(config.shot_scale),
            goals: GoalDetector::new(config.hole_radius, config.rest_height),
        })
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn shots(&self) -> &ShotController {
        &self.shots
    }

    pub fn attempt_shot<P>(
        &mut self,
        physics: &mut P,
        player: PlayerId,
        drag_start: ScreenPoint,
        drag_end: ScreenPoint,
    ) -> GolfResult<ShotApplied>
    where
        P: PhysicsBinding + ?Sized,
    {
        self.shots
            .attempt_shot(&mut self.state, physics, player, drag_start, drag_end)
    }

    pub fn tick<P, R, S>(
        &mut self,
        fixed_dt: f32,
        physics: &mut P,
        render: &mut R,
        scoreboard: &mut S,
    ) -> GolfResult<TickReport>
    where
        P: PhysicsBinding + ?Sized,
        R: RenderingBinding + ?Sized,
        S: ScoreboardSink + ?Sized,
    {
        physics.step(fixed_dt);
        self.state.hold_parked(physics)?;
        self.state.sync_meshes(&*physics, render)?;
        let newly_holed = self.goals.evaluate(&mut self.state, physics)?;
        let advance = self.scheduler.maybe_advance(&mut self.state, physics, render)?;
        scoreboard::render_to(&self.state, &*physics, scoreboard)?;
        Ok(TickReport {
            newly_holed,
            advance,
        })
    }

    pub fn reset<P, R>(&mut self, physics: &mut P, render: &mut R) -> GolfResult<()>
    where
        P: PhysicsBinding + ?Sized,
        R: RenderingBinding + ?Sized,
    {
        self.scheduler.reset_match(&mut self.state, physics, render)
    }
}
