use golf_engine::{
    EngineContext, FixedTimestep, Game, GameConfig, GolfError, InputEvent, InputQueue, MeshInstance,
};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    /// Handed to the extra fixed steps of a frame so input is seen once.
    no_input: InputQueue,
    timestep: FixedTimestep,
    config: GameConfig,
    initialized: bool,
    /// Set by the first fatal error; the loop stops ticking after that.
    halted: Option<String>,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::new(config.fixed_dt).with_max_steps(config.max_steps_per_frame);

        Self {
            game,
            ctx: EngineContext::new(&config),
            input: InputQueue::new(),
            no_input: InputQueue::new(),
            timestep,
            config,
            initialized: false,
            halted: None,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        match self.game.init(&mut self.ctx) {
            Ok(()) => self.initialized = true,
            Err(err) => self.halt(err),
        }
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: as many fixed updates as the elapsed time allows.
    /// Input is delivered to the first of them and then dropped; a frame
    /// with no fixed step keeps it for the next frame.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized || self.halted.is_some() {
            return;
        }

        self.ctx.clear_frame_data();

        let steps = self.timestep.accumulate(dt);
        for step in 0..steps {
            let input = if step == 0 { &self.input } else { &self.no_input };
            if let Err(err) = self.game.update(&mut self.ctx, input) {
                self.halt(err);
                break;
            }
        }

        if steps > 0 {
            self.input.drain();
        }
    }

    fn halt(&mut self, err: GolfError) {
        log::error!("game halted: {}", err);
        self.halted = Some(err.to_string());
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn ctx(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    pub fn halt_reason(&self) -> Option<&str> {
        self.halted.as_deref()
    }

    pub fn ticks(&self) -> u64 {
        self.timestep.ticks()
    }

    pub fn fixed_dt(&self) -> f32 {
        self.config.fixed_dt
    }

    /// Fraction of a fixed step left in the accumulator, for the host to
    /// interpolate mesh transforms between ticks.
    pub fn alpha(&self) -> f32 {
        self.timestep.alpha()
    }

    // ---- Pointer accessors for host-side reads ----

    pub fn meshes_ptr(&self) -> *const f32 {
        self.ctx.meshes.instances_ptr()
    }

    pub fn mesh_count(&self) -> u32 {
        self.ctx.meshes.mesh_count()
    }

    pub fn mesh_floats(&self) -> u32 {
        MeshInstance::FLOATS as u32
    }

    /// Mesh data as a flat slice, `mesh_floats()` per mesh.
    pub fn mesh_data(&self) -> &[f32] {
        self.ctx.meshes.as_floats()
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    pub fn max_events(&self) -> u32 {
        self.config.max_events as u32
    }

    // ---- Scoreboard ----

    pub fn scoreboard_json(&self) -> String {
        self.ctx.scoreboard.json().to_string()
    }

    pub fn scoreboard_text(&self) -> String {
        self.ctx.scoreboard.text()
    }

    pub fn scoreboard_revision(&self) -> u32 {
        self.ctx.scoreboard.revision() as u32
    }
}
