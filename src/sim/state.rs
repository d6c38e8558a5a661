//! Game state and core simulation types
//!
//! Everything a frame reads or writes lives here, so a [`GameState`] can be
//! cloned, serialized and replayed from its seed.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::clamp_rotation;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first press, nothing moves
    Idle,
    /// Active gameplay
    Playing,
    /// Run ended, frozen until an explicit restart
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrashCause {
    /// Bird reached the top of the field
    Ceiling,
    /// Bird reached the bottom of the field
    Ground,
    /// Bird hit the pipe with this id
    Pipe { id: u32 },
}

/// Things that happened during a frame, for the view and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    Flapped,
    PipeSpawned { id: u32 },
    Scored { score: u32 },
    Crashed(CrashCause),
    Restarted,
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bird {
    /// Top edge of the sprite (pixels from field top)
    pub y: f32,
    /// Vertical velocity (pixels per reference frame, positive is down)
    pub vy: f32,
    /// Display angle in degrees, derived from velocity
    pub rotation: f32,
}

impl Bird {
    /// A bird resting in the middle of the field
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            y: tuning.field_height / 2.0,
            vy: 0.0,
            rotation: 0.0,
        }
    }

    /// Replace the current velocity with the upward impulse
    pub fn flap(&mut self, impulse: f32) {
        self.vy = impulse;
        self.rotation = clamp_rotation(self.vy);
    }

    /// Apply gravity then move (semi-implicit Euler)
    pub fn fall(&mut self, gravity: f32, multiplier: f32) {
        self.vy += gravity * multiplier;
        self.rotation = clamp_rotation(self.vy);
    }

    /// Advance position by the current velocity
    pub fn advance(&mut self, multiplier: f32) {
        self.y += self.vy * multiplier;
    }

    /// Bottom edge of the sprite
    pub fn bottom(&self, tuning: &Tuning) -> f32 {
        self.y + tuning.bird_size
    }
}

/// An upper/lower pipe pair sharing one x position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipe {
    pub id: u32,
    /// Left edge
    pub x: f32,
    /// Bottom of the upper pipe
    pub gap_top: f32,
    /// Set once the bird has passed this pair
    pub scored: bool,
}

impl Pipe {
    pub fn new(id: u32, x: f32, gap_top: f32) -> Self {
        Self {
            id,
            x,
            gap_top,
            scored: false,
        }
    }

    /// Trailing (right) edge
    pub fn right(&self, tuning: &Tuning) -> f32 {
        self.x + tuning.pipe_width
    }

    /// Top of the lower pipe
    pub fn gap_bottom(&self, tuning: &Tuning) -> f32 {
        self.gap_top + tuning.pipe_gap
    }

    /// Whether any part of the pair is still inside the field
    pub fn on_screen(&self, tuning: &Tuning) -> bool {
        self.right(tuning) > 0.0
    }
}

/// A background cloud (decoration, never collides)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    /// Fraction of pipe speed (parallax)
    pub speed: f32,
}

impl Cloud {
    pub fn on_screen(&self, tuning: &Tuning) -> bool {
        self.x + tuning.cloud_width > 0.0
    }
}

/// A repeating timer driven by simulation time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalTimer {
    pub period_ms: f64,
    pub elapsed_ms: f64,
}

impl IntervalTimer {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            elapsed_ms: 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0.0;
    }

    /// Advance by `dt_ms`. Fires at most once per call; backlog beyond one
    /// period is dropped.
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        self.elapsed_ms += dt_ms.max(0.0);
        if self.elapsed_ms < self.period_ms {
            return false;
        }
        self.elapsed_ms -= self.period_ms;
        if self.elapsed_ms >= self.period_ms {
            self.elapsed_ms %= self.period_ms;
        }
        true
    }
}

/// RNG state wrapper for serialization
///
/// Each draw seeds a fresh generator from the run seed and a draw counter, so
/// the state round-trips through serde without the generator itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub draws: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, draws: 0 }
    }

    /// Generator for the next draw
    pub fn next_rng(&mut self) -> Pcg32 {
        let seed = self
            .seed
            .wrapping_add(self.draws.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.draws += 1;
        Pcg32::seed_from_u64(seed)
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG state
    pub rng_state: RngState,
    /// Balance values for this run
    pub tuning: Tuning,
    /// Current phase
    pub phase: GamePhase,
    /// Pipes passed this session
    pub score: u32,
    /// The player
    pub bird: Bird,
    /// Active pipes, oldest (leftmost) first
    pub pipes: Vec<Pipe>,
    /// Active clouds
    pub clouds: Vec<Cloud>,
    /// Simulated time spent playing this session (ms)
    pub time_ms: f64,
    /// Frames simulated this session
    pub frames: u64,
    /// Pipe generator
    pub pipe_timer: IntervalTimer,
    /// Cloud generator
    pub cloud_timer: IntervalTimer,
    /// Events from the most recent frame
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next pipe ID
    next_id: u32,
}

impl GameState {
    /// Create an idle game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create an idle game
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng_state: RngState::new(seed),
            phase: GamePhase::Idle,
            score: 0,
            bird: Bird::new(&tuning),
            pipes: Vec::new(),
            clouds: Vec::new(),
            time_ms: 0.0,
            frames: 0,
            pipe_timer: IntervalTimer::new(tuning.pipe_interval_ms),
            cloud_timer: IntervalTimer::new(tuning.cloud_interval_ms),
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new pipe ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Clear everything a session accumulates, keeping seed, RNG and tuning
    pub fn reset_session(&mut self) {
        self.score = 0;
        self.bird = Bird::new(&self.tuning);
        self.pipes.clear();
        self.clouds.clear();
        self.time_ms = 0.0;
        self.frames = 0;
        self.pipe_timer.reset();
        self.cloud_timer.reset();
    }
}
