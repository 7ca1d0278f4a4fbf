use glam::Vec3;

use crate::api::types::{BodyHandle, MeshHandle, PlayerId};

/// Roster entry supplied by the caller at match start.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSpec {
    pub name: String,
    /// 0xRRGGBB; `None` picks a colour from the player's id.
    pub color: Option<u32>,
}

impl PlayerSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn color_for(&self, id: PlayerId) -> u32 {
        self.color.unwrap_or_else(|| color_from_id(id.0))
    }
}

/// Per-player mutable record. Position and velocity live in the physics
/// binding; the session only holds the body handle.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSession {
    pub id: PlayerId,
    pub display_name: String,
    pub color: u32,
    pub body: BodyHandle,
    pub mesh: MeshHandle,
    pub shot_count: u32,
    pub holed: bool,
    /// One entry per completed stage: the shot count on holing out.
    pub score_history: Vec<u32>,
    /// Where the ball was stopped on holing out. Held there every tick until
    /// the next stage starts.
    pub parked_at: Option<Vec3>,
}

impl PlayerSession {
    pub fn new(id: PlayerId, spec: &PlayerSpec, body: BodyHandle, mesh: MeshHandle) -> Self {
        Self {
            id,
            display_name: spec.name.clone(),
            color: spec.color_for(id),
            body,
            mesh,
            shot_count: 0,
            holed: false,
            score_history: Vec::new(),
            parked_at: None,
        }
    }

    pub(crate) fn record_shot(&mut self) {
        debug_assert!(!self.holed, "shot recorded for holed player");
        self.shot_count += 1;
    }

    /// Transition to holed, appending the current shot count. Returns false
    /// if the player was already holed (history untouched).
    pub(crate) fn hole_out(&mut self) -> bool {
        if self.holed {
            return false;
        }
        self.holed = true;
        self.score_history.push(self.shot_count);
        true
    }

    /// Per-stage reset; history accumulates across stages.
    pub(crate) fn reset_for_stage(&mut self) {
        self.shot_count = 0;
        self.holed = false;
        self.parked_at = None;
    }

    pub(crate) fn reset_for_match(&mut self) {
        self.reset_for_stage();
        self.score_history.clear();
    }

    pub fn total(&self) -> u32 {
        self.score_history.iter().sum()
    }
}

/// Spread player colours around the hue wheel by the golden angle.
pub fn color_from_id(id: u32) -> u32 {
    let hue = (id.wrapping_add(1).wrapping_mul(137)) % 360;
    hsv_to_rgb(hue as f32, 0.6, 0.95)
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> u32 {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h as u32 {
        0..=59 => (c, x, 0.0),
        60..=119 => (x, c, 0.0),
        120..=179 => (0.0, c, x),
        180..=239 => (0.0, x, c),
        240..=299 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let channel = |f: f32| ((f + m) * 255.0).round() as u32;
    (channel(r) << 16) | (channel(g) << 8) | channel(b)
}
