//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (requestAnimationFrame timestamps to frame deltas)
//! - Input events (press debouncing, overlay close gating)
//! - Storage (LocalStorage on web, in-memory elsewhere)

pub mod input;
pub mod storage;
pub mod time;

pub use input::{InputDebounce, OverlayGate, TapAction};
pub use storage::{KeyValueStore, MemoryStore};
pub use time::FrameClock;
