use glam::Vec3;

use crate::api::bindings::PhysicsBinding;
use crate::api::types::PlayerId;
use crate::error::GolfResult;
use crate::session::state::MatchState;

/// Per-tick scan marking players holed once their ball rests in the cup.
#[derive(Debug, Clone, Copy)]
pub struct GoalDetector {
    hole_radius: f32,
    rest_height: f32,
}

impl GoalDetector {
    pub fn new(hole_radius: f32, rest_height: f32) -> Self {
        Self {
            hole_radius,
            rest_height,
        }
    }

    /// Planar distance (XZ) under the hole radius, and low enough that the
    /// ball is not still flying over the cup.
    pub fn in_cup(&self, cup: Vec3, ball: Vec3) -> bool {
        let dx = ball.x - cup.x;
        let dz = ball.z - cup.z;
        let d = (dx * dx + dz * dz).sqrt();
        d < self.hole_radius && ball.y < self.rest_height
    }

    /// Mark newly holed players, appending their shot count to history, and
    /// stop their balls where they dropped. Players already holed are
    /// skipped, so repeated ticks never append twice.
    pub fn evaluate<P>(&self, state: &mut MatchState, physics: &mut P) -> GolfResult<Vec<PlayerId>>
    where
        P: PhysicsBinding + ?Sized,
    {
        let cup = state.current_stage()?.cup_position;
        let stage = state.current_stage_index;
        let mut newly_holed = Vec::new();

        for player in state.players.iter_mut().filter(|p| !p.holed) {
            let position = physics.transform(player.body)?.position;
            if !self.in_cup(cup, position) {
                continue;
            }
            physics.zero_velocity(player.body)?;
            physics.set_body_position(player.body, position)?;
            player.parked_at = Some(position);
            if player.hole_out() {
                log::info!(
                    "{} holed out on stage {} in {} shots",
                    player.display_name,
                    stage + 1,
                    player.shot_count
                );
                newly_holed.push(player.id);
            }
        }
        Ok(newly_holed)
    }
}
