//! One mounted game
//!
//! A [`Session`] owns everything that lives as long as the modal is open:
//! simulation state, the persisted high score and its store, the frame clock
//! and the input debouncer. The host drives it with presses and frame
//! timestamps and reads back state for display.

use crate::highscores::HighScore;
use crate::platform::input::InputDebounce;
use crate::platform::storage::KeyValueStore;
use crate::platform::time::FrameClock;
use crate::sim::{FrameInput, GameEvent, GamePhase, GameState, tick};
use crate::tuning::Tuning;

pub struct Session<S: KeyValueStore> {
    state: GameState,
    high_score: HighScore,
    store: S,
    clock: FrameClock,
    debounce: InputDebounce,
    /// Input latched until the next frame
    pending: FrameInput,
    /// Whether the last session end set a new record
    new_record: bool,
    /// Autopilot flew at some point during the current run
    autopilot_used: bool,
}

impl<S: KeyValueStore> Session<S> {
    /// Mount a fresh game, reading tuning and high score from `store`
    pub fn new(store: S, seed: u64) -> Self {
        let tuning = Tuning::load(&store);
        let high_score = HighScore::load(&store);
        log::info!("Session mounted with seed {}", seed);
        Self {
            state: GameState::with_tuning(seed, tuning),
            high_score,
            store,
            clock: FrameClock::new(),
            debounce: InputDebounce::default(),
            pending: FrameInput::default(),
            new_record: false,
            autopilot_used: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score.best()
    }

    pub fn is_new_record(&self) -> bool {
        self.new_record
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn autopilot(&self) -> bool {
        self.pending.autopilot
    }

    /// A press (click, tap, key) at `now_ms`. Returns true if it was accepted.
    ///
    /// Presses during GameOver are ignored; restarting is explicit.
    pub fn press(&mut self, now_ms: f64) -> bool {
        if self.state.phase == GamePhase::GameOver {
            return false;
        }
        if !self.debounce.accept(now_ms) {
            log::debug!("Press at {:.0}ms debounced", now_ms);
            return false;
        }
        self.pending.flap = true;
        true
    }

    /// Ask to leave GameOver on the next frame
    pub fn request_restart(&mut self) {
        if self.state.phase == GamePhase::GameOver {
            self.pending.restart = true;
        }
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.pending.autopilot = on;
        log::info!("Autopilot: {}", on);
    }

    /// Whether the host should keep requesting animation frames
    pub fn wants_frames(&self) -> bool {
        match self.state.phase {
            GamePhase::Playing => true,
            GamePhase::Idle => self.pending.flap || self.pending.autopilot,
            GamePhase::GameOver => self.pending.restart,
        }
    }

    /// Run one frame for the display-refresh callback at `timestamp_ms`
    pub fn frame(&mut self, timestamp_ms: f64) -> &[GameEvent] {
        let elapsed = self.clock.elapsed(timestamp_ms);
        // One-shot inputs are consumed, the autopilot toggle stays latched
        let input = self.pending.clone();
        self.pending = FrameInput {
            autopilot: input.autopilot,
            ..Default::default()
        };

        let before = self.state.phase;
        tick(&mut self.state, &input, elapsed);
        let after = self.state.phase;

        if before == GamePhase::Playing && input.autopilot {
            self.autopilot_used = true;
        }
        if before != after {
            self.on_phase_change(after, &input);
        }
        &self.state.events
    }

    /// The frame loop stopped; the next frame must not simulate the gap
    pub fn suspend(&mut self) {
        self.clock.reset();
    }

    fn on_phase_change(&mut self, phase: GamePhase, input: &FrameInput) {
        match phase {
            GamePhase::GameOver if self.autopilot_used => {
                self.new_record = false;
                log::info!("Autopilot run over, score {} not recorded", self.state.score);
            }
            GamePhase::GameOver => {
                let score = self.state.score;
                self.new_record = self.high_score.record(score);
                if self.new_record {
                    self.high_score.save(&mut self.store);
                    log::info!("New high score: {}", score);
                }
            }
            GamePhase::Playing => {
                self.new_record = false;
                self.autopilot_used = input.autopilot;
            }
            GamePhase::Idle => {
                self.new_record = false;
            }
        }
    }
}
