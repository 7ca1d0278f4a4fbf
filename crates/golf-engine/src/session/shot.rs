//! Drag gesture → planar impulse → physics binding.

use glam::Vec3;

use crate::api::bindings::PhysicsBinding;
use crate::api::types::{PlayerId, ScreenPoint};
use crate::error::{GolfResult, ShotRejection};
use crate::session::state::MatchState;

/// An accepted shot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotApplied {
    pub player: PlayerId,
    pub impulse: Vec3,
    /// Shot count after this shot.
    pub shot_count: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct ShotController {
    scale: f32,
}

impl ShotController {
    pub fn new(scale: f32) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Pull-back impulse: the ball travels opposite to the drag. Screen Y maps
    /// to world Z; the vertical component is always zero.
    pub fn impulse_for(&self, drag_start: ScreenPoint, drag_end: ScreenPoint) -> Vec3 {
        let dx = drag_start.x - drag_end.x;
        let dz = drag_start.y - drag_end.y;
        Vec3::new(dx * self.scale, 0.0, dz * self.scale)
    }

    /// Validate and apply one shot. Either the impulse lands and the shot is
    /// counted, or nothing changes.
    pub fn attempt_shot<P>(
        &self,
        state: &mut MatchState,
        physics: &mut P,
        player: PlayerId,
        drag_start: ScreenPoint,
        drag_end: ScreenPoint,
    ) -> GolfResult<ShotApplied>
    where
        P: PhysicsBinding + ?Sized,
    {
        if state.is_complete() {
            return Err(ShotRejection::MatchComplete.into());
        }
        let session = state
            .player_mut(player)
            .ok_or(ShotRejection::UnknownPlayer(player))?;
        if session.holed {
            return Err(ShotRejection::AlreadyHoled(player).into());
        }

        let impulse = self.impulse_for(drag_start, drag_end);
        let at = physics.transform(session.body)?.position;
        physics.apply_impulse(session.body, impulse, at)?;
        session.record_shot();

        log::debug!(
            "{} shot #{} impulse=({:.2}, {:.2}, {:.2})",
            session.display_name,
            session.shot_count,
            impulse.x,
            impulse.y,
            impulse.z
        );

        Ok(ShotApplied {
            player,
            impulse,
            shot_count: session.shot_count,
        })
    }
}
