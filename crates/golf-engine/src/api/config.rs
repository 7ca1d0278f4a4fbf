use serde::{Deserialize, Serialize};

use crate::api::types::Damping;
use crate::error::{GolfError, GolfResult};

/// Tunables for a match. Every field has a default, so a partial JSON
/// object (or `{}`) is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Drag pixels → impulse units.
    pub shot_scale: f32,
    /// Planar distance from the cup centre under which a ball counts as holed.
    pub hole_radius: f32,
    /// Ball centre must be below this height to count (excludes airborne balls).
    pub rest_height: f32,
    pub ball_radius: f32,
    pub ball_mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// Bounding-sphere radius used when picking a ball under the pointer.
    pub pick_radius: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            shot_scale: 0.02,
            hole_radius: 1.2,
            rest_height: 1.2,
            ball_radius: 1.0,
            ball_mass: 1.0,
            linear_damping: 0.5,
            angular_damping: 0.5,
            pick_radius: 1.5,
        }
    }
}

impl MatchConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> GolfResult<Self> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> GolfResult<()> {
        let positive = [
            ("shot_scale", self.shot_scale),
            ("hole_radius", self.hole_radius),
            ("ball_radius", self.ball_radius),
            ("ball_mass", self.ball_mass),
            ("pick_radius", self.pick_radius),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(GolfError::Config(format!("{} must be > 0, got {}", name, value)));
            }
        }
        if self.linear_damping < 0.0 || self.angular_damping < 0.0 {
            return Err(GolfError::Config("damping must be >= 0".to_string()));
        }
        Ok(())
    }

    pub fn damping(&self) -> Damping {
        Damping {
            linear: self.linear_damping,
            angular: self.angular_damping,
        }
    }
}
