use std::fmt::Write as _;

use serde::Serialize;

use crate::api::bindings::{PhysicsBinding, ScoreboardSink};
use crate::error::GolfResult;
use crate::session::state::MatchState;

/// Speed above which a ball counts as still rolling.
pub const MOVING_SPEED: f32 = 0.05;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreLine {
    pub name: String,
    pub color: u32,
    pub shot_count: u32,
    pub holed: bool,
    /// Ball still rolling. Always false once holed.
    pub moving: bool,
    pub score_history: Vec<u32>,
    pub total: u32,
}

/// `current` is 1-based for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageInfo {
    pub current: usize,
    pub total: usize,
    pub complete: bool,
}

/// Per-player lines and stage info for the current state.
pub fn snapshot<P>(state: &MatchState, physics: &P) -> GolfResult<(Vec<ScoreLine>, StageInfo)>
where
    P: PhysicsBinding + ?Sized,
{
    let mut lines = Vec::with_capacity(state.players().len());
    for p in state.players() {
        let moving = !p.holed && physics.linear_velocity(p.body)?.length() > MOVING_SPEED;
        lines.push(ScoreLine {
            name: p.display_name.clone(),
            color: p.color,
            shot_count: p.shot_count,
            holed: p.holed,
            moving,
            score_history: p.score_history.clone(),
            total: p.total(),
        });
    }
    let info = StageInfo {
        current: state.current_stage_index() + 1,
        total: state.stages().len(),
        complete: state.is_complete(),
    };
    Ok((lines, info))
}

pub fn render_to<P, S>(state: &MatchState, physics: &P, sink: &mut S) -> GolfResult<()>
where
    P: PhysicsBinding + ?Sized,
    S: ScoreboardSink + ?Sized,
{
    let (lines, info) = snapshot(state, physics)?;
    sink.render(&lines, info);
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
struct Snapshot<'a> {
    players: &'a [ScoreLine],
    stage: StageInfo,
}

/// Keeps the most recent frame for the host to read, as JSON or text.
#[derive(Debug, Default)]
pub struct Scoreboard {
    lines: Vec<ScoreLine>,
    stage: Option<StageInfo>,
    /// Bumped on every render so the host can skip unchanged frames.
    revision: u64,
    json: String,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[ScoreLine] {
        &self.lines
    }

    pub fn stage(&self) -> Option<StageInfo> {
        self.stage
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Latest frame serialised as `{ "players": [...], "stage": {...} }`.
    pub fn json(&self) -> &str {
        &self.json
    }

    pub fn text(&self) -> String {
        let Some(stage) = self.stage else {
            return String::new();
        };
        let mut out = String::new();
        if stage.complete {
            let _ = writeln!(out, "Match complete ({} stages)", stage.total);
        } else {
            let _ = writeln!(out, "Stage {} / {}", stage.current, stage.total);
        }
        for line in &self.lines {
            let _ = write!(out, "{}: {} shots", line.name, line.shot_count);
            if line.holed {
                out.push_str(" (in)");
            } else if line.moving {
                out.push_str(" (rolling)");
            }
            out.push('\n');
            for (i, shots) in line.score_history.iter().enumerate() {
                let _ = writeln!(out, "  stage {}: {} shots", i + 1, shots);
            }
            if stage.complete {
                let _ = writeln!(out, "  total: {}", line.total);
            }
        }
        out
    }
}

impl ScoreboardSink for Scoreboard {
    fn render(&mut self, players: &[ScoreLine], stage: StageInfo) {
        let changed = self.stage != Some(stage) || self.lines != players;
        if !changed {
            return;
        }
        self.lines = players.to_vec();
        self.stage = Some(stage);
        self.revision += 1;
        self.json = match serde_json::to_string(&Snapshot { players, stage }) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("scoreboard snapshot not serialisable: {}", err);
                String::new()
            }
        };
    }
}
