use crate::api::bindings::{PhysicsBinding, RenderingBinding};
use crate::api::types::PlayerId;
use crate::error::GolfResult;
use crate::session::player::PlayerSession;
use crate::session::stage::{Stage, StageCatalog};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Playing,
    /// Terminal. A new match needs an explicit reset.
    MatchComplete,
}

/// The whole mutable state of one match. Explicitly owned by the caller and
/// mutated in place by the shot controller, goal detector and scheduler.
#[derive(Debug, Clone)]
pub struct MatchState {
    pub(crate) current_stage_index: usize,
    pub(crate) stages: StageCatalog,
    pub(crate) players: Vec<PlayerSession>,
    pub(crate) status: MatchStatus,
}

impl MatchState {
    /// `players` must be ordered by id (slot 0, 1, ...).
    pub(crate) fn new(stages: StageCatalog, players: Vec<PlayerSession>) -> Self {
        Self {
            current_stage_index: 0,
            stages,
            players,
            status: MatchStatus::Playing,
        }
    }

    pub fn current_stage_index(&self) -> usize {
        self.current_stage_index
    }

    pub fn current_stage(&self) -> GolfResult<&Stage> {
        self.stages.stage_at(self.current_stage_index)
    }

    pub fn stages(&self) -> &StageCatalog {
        &self.stages
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn is_complete(&self) -> bool {
        self.status == MatchStatus::MatchComplete
    }

    pub fn players(&self) -> &[PlayerSession] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerSession> {
        self.players.iter().find(|p| p.id == id)
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Option<&mut PlayerSession> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn all_holed(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(|p| p.holed)
    }

    /// Final (or running) total per player: the sum of their score history.
    pub fn totals(&self) -> Vec<(PlayerId, u32)> {
        self.players.iter().map(|p| (p.id, p.total())).collect()
    }

    /// Put holed balls back where they dropped, at rest. Run after every
    /// physics step so contacts cannot carry them off.
    pub fn hold_parked<P>(&self, physics: &mut P) -> GolfResult<()>
    where
        P: PhysicsBinding + ?Sized,
    {
        for player in &self.players {
            if let Some(at) = player.parked_at {
                physics.set_body_position(player.body, at)?;
                physics.zero_velocity(player.body)?;
            }
        }
        Ok(())
    }

    /// Copy each ball's current transform onto its mesh.
    pub fn sync_meshes<P, R>(&self, physics: &P, render: &mut R) -> GolfResult<()>
    where
        P: PhysicsBinding + ?Sized,
        R: RenderingBinding + ?Sized,
    {
        for player in &self.players {
            let pose = physics.transform(player.body)?;
            render.set_mesh_transform(player.mesh, pose.position, pose.orientation);
        }
        Ok(())
    }
}
