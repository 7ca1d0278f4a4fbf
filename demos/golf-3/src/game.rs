//! Concurrent mini-golf: every player drags their own ball, all at once.
//! A stage ends when the last ball drops; the match ends after stage 3.

use golf_engine::{
    pick_player, Advance, DragTracker, EngineContext, Game, GameConfig, GameEvent, GolfResult,
    InputEvent, InputQueue, MatchConfig, MatchSession, PhysicsBinding, PickRay, PlayerId,
    PlayerSpec, ScreenPoint, ShotIntent, CUSTOM_RESET,
};

use crate::course::{self, MAX_PLAYERS};

/// Game event kinds to the page
mod game_events {
    /// a = player, b = shots, c = stage (1-based)
    pub const HOLED: f32 = 1.0;
    /// a = stage now in play (1-based), b = stage count
    pub const STAGE: f32 = 2.0;
    /// a = winning player, b = winning total
    pub const COMPLETE: f32 = 3.0;
    /// a = player, b/c = pull-back in pixels
    pub const AIM: f32 = 4.0;
    /// a = player, b = shot count on this stage
    pub const SHOT: f32 = 5.0;
    /// a = player whose shot was refused
    pub const REJECTED: f32 = 6.0;
}

pub struct MinigolfGame {
    roster: Vec<PlayerSpec>,
    rules: MatchConfig,
    session: Option<MatchSession>,
    drag: DragTracker,
}

impl MinigolfGame {
    pub fn new() -> Self {
        Self::with_roster(vec![
            PlayerSpec::new("Player 1").with_color(0xffffff),
            PlayerSpec::new("Player 2"),
        ])
    }

    pub fn with_roster(roster: Vec<PlayerSpec>) -> Self {
        Self {
            roster,
            rules: MatchConfig::default(),
            session: None,
            drag: DragTracker::new(),
        }
    }

    pub fn session(&self) -> Option<&MatchSession> {
        self.session.as_ref()
    }

    /// Nearest unholed ball under the pointer ray.
    fn pick(&self, ctx: &EngineContext, ray: &PickRay) -> GolfResult<Option<PlayerId>> {
        let Some(session) = &self.session else {
            return Ok(None);
        };
        let mut balls = Vec::with_capacity(session.state().players().len());
        for player in session.state().players().iter().filter(|p| !p.holed) {
            balls.push((player.id, ctx.physics.transform(player.body)?.position));
        }
        Ok(pick_player(ray, balls, self.rules.pick_radius))
    }

    fn shoot(&mut self, ctx: &mut EngineContext, intent: ShotIntent) -> GolfResult<()> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        match session.attempt_shot(&mut ctx.physics, intent.player, intent.start, intent.end) {
            Ok(applied) => {
                ctx.emit_event(GameEvent {
                    kind: game_events::SHOT,
                    a: applied.player.0 as f32,
                    b: applied.shot_count as f32,
                    c: 0.0,
                });
                Ok(())
            }
            Err(err) if !err.is_fatal() => {
                log::warn!("shot ignored: {}", err);
                ctx.emit_event(GameEvent {
                    kind: game_events::REJECTED,
                    a: intent.player.0 as f32,
                    b: 0.0,
                    c: 0.0,
                });
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn reset(&mut self, ctx: &mut EngineContext) -> GolfResult<()> {
        self.drag.cancel();
        if let Some(session) = self.session.as_mut() {
            session.reset(&mut ctx.physics, &mut ctx.meshes)?;
        }
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut EngineContext, input: &InputQueue) -> GolfResult<()> {
        for event in input.iter() {
            match *event {
                InputEvent::Custom { kind, .. } if kind == CUSTOM_RESET => {
                    self.reset(ctx)?;
                }
                InputEvent::PointerDown { x, y, ray } => {
                    if let Some(player) = self.pick(ctx, &ray)? {
                        self.drag.begin(player, ScreenPoint::new(x, y));
                    }
                }
                InputEvent::PointerMove { x, y } => {
                    self.drag.update(ScreenPoint::new(x, y));
                }
                InputEvent::PointerUp { x, y } => {
                    if let Some(intent) = self.drag.release(ScreenPoint::new(x, y)) {
                        self.shoot(ctx, intent)?;
                    }
                }
                InputEvent::Custom { .. } => {}
            }
        }
        Ok(())
    }
}

impl Default for MinigolfGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for MinigolfGame {
    fn config(&self) -> GameConfig {
        GameConfig {
            max_meshes: 128,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) -> GolfResult<()> {
        if self.roster.len() > MAX_PLAYERS {
            log::warn!("roster of {} exceeds {} tee slots", self.roster.len(), MAX_PLAYERS);
        }
        let session = MatchSession::start(
            course::catalog()?,
            &self.roster,
            &self.rules,
            &mut ctx.physics,
            &mut ctx.meshes,
        )?;
        self.session = Some(session);
        Ok(())
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) -> GolfResult<()> {
        self.handle_input(ctx, input)?;

        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        let dt = ctx.fixed_dt();
        let report = session.tick(dt, &mut ctx.physics, &mut ctx.meshes, &mut ctx.scoreboard)?;

        let state = session.state();
        for id in &report.newly_holed {
            if let Some(player) = state.player(*id) {
                let stage = player.score_history.len();
                let shots = player.score_history.last().copied().unwrap_or(0);
                ctx.emit_event(GameEvent {
                    kind: game_events::HOLED,
                    a: id.0 as f32,
                    b: shots as f32,
                    c: stage as f32,
                });
            }
        }
        match report.advance {
            Advance::Stay => {}
            Advance::NextStage(index) => {
                self.drag.cancel();
                ctx.emit_event(GameEvent {
                    kind: game_events::STAGE,
                    a: (index + 1) as f32,
                    b: state.stages().len() as f32,
                    c: 0.0,
                });
            }
            Advance::MatchComplete => {
                self.drag.cancel();
                let winner = state.totals().into_iter().min_by_key(|&(id, total)| (total, id));
                if let Some((id, total)) = winner {
                    log::info!("{} wins with {}", id, total);
                    ctx.emit_event(GameEvent {
                        kind: game_events::COMPLETE,
                        a: id.0 as f32,
                        b: total as f32,
                        c: 0.0,
                    });
                }
            }
        }

        if let (Some(player), Some((dx, dy))) = (self.drag.player(), self.drag.pull()) {
            ctx.emit_event(GameEvent {
                kind: game_events::AIM,
                a: player.0 as f32,
                b: dx,
                c: dy,
            });
        }
        Ok(())
    }
}
