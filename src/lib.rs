//! Flappy Modal - a Flappy Bird style arcade game that lives inside a modal
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bird physics, pipes, collisions, scoring)
//! - `session`: One mounted game: simulation state plus high score, clock and input
//! - `platform`: Browser/native platform abstraction (time, input, storage)
//! - `highscores`: Persisted best score
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod platform;
pub mod session;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use session::Session;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Reference frame duration the physics constants are expressed against (60 Hz)
    pub const REFERENCE_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Maximum frame multiplier, keeps a resumed tab from teleporting the bird
    pub const MAX_FRAME_MULTIPLIER: f32 = 2.0;

    /// Field dimensions (pixels)
    pub const FIELD_WIDTH: f32 = 390.0;
    pub const FIELD_HEIGHT: f32 = 400.0;

    /// Bird defaults
    pub const BIRD_SIZE: f32 = 20.0;
    pub const BIRD_X: f32 = 70.0;
    /// Hitbox is the sprite square shrunk by this much on every side
    pub const BIRD_HITBOX_INSET: f32 = 2.0;

    /// Downward acceleration (px per reference frame, squared)
    pub const GRAVITY: f32 = 0.1;
    /// Velocity set on flap (negative is up)
    pub const FLAP_IMPULSE: f32 = -3.0;

    /// Rotation clamps (degrees)
    pub const ROTATION_UP_LIMIT: f32 = -20.0;
    pub const ROTATION_DOWN_LIMIT: f32 = 45.0;
    pub const ROTATION_UP_FACTOR: f32 = 7.0;
    pub const ROTATION_DOWN_FACTOR: f32 = 9.0;

    /// Pipe defaults
    pub const PIPE_WIDTH: f32 = 50.0;
    pub const PIPE_GAP: f32 = 100.0;
    pub const PIPE_SPEED: f32 = 1.0;
    pub const PIPE_INTERVAL_MS: f64 = 1200.0;
    pub const PIPE_MIN_HEIGHT: u32 = 50;
    /// Pipe rectangles are shortened by this much at the gap to forgive near misses
    pub const PIPE_TRIM: f32 = 2.0;

    /// Background clouds (decoration only)
    pub const CLOUD_INTERVAL_MS: f64 = 2500.0;
    pub const CLOUD_WIDTH: f32 = 60.0;
    pub const CLOUD_MIN_SPACING: f32 = 40.0;
    pub const CLOUD_PLACEMENT_ATTEMPTS: u32 = 5;

    /// Minimum spacing between accepted presses (ms)
    pub const INPUT_DEBOUNCE_MS: f64 = 50.0;
    /// Overlay clicks are ignored for this long after the modal opens (ms)
    pub const OVERLAY_CLOSE_DELAY_MS: f64 = 350.0;
}

/// Linear clamp used for cosmetic rotation
#[inline]
pub fn clamp_rotation(velocity: f32) -> f32 {
    use consts::*;
    if velocity < 0.0 {
        (velocity * ROTATION_UP_FACTOR).max(ROTATION_UP_LIMIT)
    } else {
        (velocity * ROTATION_DOWN_FACTOR).min(ROTATION_DOWN_LIMIT)
    }
}

/// Speed multiplier for a frame that took `elapsed_ms`
#[inline]
pub fn frame_multiplier(elapsed_ms: f64) -> f32 {
    let m = (elapsed_ms / consts::REFERENCE_FRAME_MS) as f32;
    if m.is_nan() {
        return 0.0;
    }
    m.clamp(0.0, consts::MAX_FRAME_MULTIPLIER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_multiplier_caps() {
        assert!((frame_multiplier(consts::REFERENCE_FRAME_MS) - 1.0).abs() < 1e-5);
        assert!((frame_multiplier(consts::REFERENCE_FRAME_MS / 2.0) - 0.5).abs() < 1e-5);
        assert_eq!(frame_multiplier(10_000.0), 2.0);
        assert_eq!(frame_multiplier(-5.0), 0.0);
        assert_eq!(frame_multiplier(f64::NAN), 0.0);
    }

    #[test]
    fn test_rotation_clamps() {
        assert_eq!(clamp_rotation(-3.0), -20.0);
        assert!((clamp_rotation(-1.0) - -7.0).abs() < 1e-5);
        assert_eq!(clamp_rotation(0.0), 0.0);
        assert!((clamp_rotation(2.0) - 18.0).abs() < 1e-5);
        assert_eq!(clamp_rotation(10.0), 45.0);
    }
}
