//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Elapsed time and input are the only things a frame reads from outside
//! - Seeded RNG only
//! - Stable iteration order (pipes stay in creation order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, bird_hitbox, lower_pipe_rect, upper_pipe_rect};
pub use spawn::{spawn_cloud, spawn_pipe};
pub use state::{Bird, Cloud, CrashCause, GameEvent, GamePhase, GameState, Pipe};
pub use tick::{FrameInput, advance, tick};
