//! Game balance values
//!
//! Defaults come from [`crate::consts`]. A JSON override can be stored under
//! [`Tuning::STORAGE_KEY`]; anything that fails to parse or would produce an
//! unplayable field falls back to the defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::platform::storage::KeyValueStore;

/// Every gameplay constant the simulation reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Bird ===
    pub bird_size: f32,
    pub bird_x: f32,
    pub hitbox_inset: f32,
    pub gravity: f32,
    pub flap_impulse: f32,

    // === Pipes ===
    pub pipe_width: f32,
    pub pipe_gap: f32,
    pub pipe_speed: f32,
    pub pipe_interval_ms: f64,
    pub pipe_min_height: u32,
    pub pipe_trim: f32,

    // === Clouds ===
    pub cloud_interval_ms: f64,
    pub cloud_width: f32,
    pub cloud_min_spacing: f32,
    pub cloud_placement_attempts: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            bird_size: BIRD_SIZE,
            bird_x: BIRD_X,
            hitbox_inset: BIRD_HITBOX_INSET,
            gravity: GRAVITY,
            flap_impulse: FLAP_IMPULSE,

            pipe_width: PIPE_WIDTH,
            pipe_gap: PIPE_GAP,
            pipe_speed: PIPE_SPEED,
            pipe_interval_ms: PIPE_INTERVAL_MS,
            pipe_min_height: PIPE_MIN_HEIGHT,
            pipe_trim: PIPE_TRIM,

            cloud_interval_ms: CLOUD_INTERVAL_MS,
            cloud_width: CLOUD_WIDTH,
            cloud_min_spacing: CLOUD_MIN_SPACING,
            cloud_placement_attempts: CLOUD_PLACEMENT_ATTEMPTS,
        }
    }
}

impl Tuning {
    /// Storage key for the optional override
    pub const STORAGE_KEY: &'static str = "flappyTuning";

    /// Lowest gap-top height a pipe may be generated with
    pub fn min_gap_top(&self) -> u32 {
        self.pipe_min_height
    }

    /// Highest gap-top height a pipe may be generated with
    pub fn max_gap_top(&self) -> u32 {
        ((self.field_height - self.pipe_gap).max(0.0) as u32).saturating_sub(self.pipe_min_height)
    }

    /// Lowest y a cloud may be placed at
    pub fn cloud_min_y(&self) -> f32 {
        self.field_height * 0.05
    }

    /// Highest y a cloud may be placed at (upper half of the sky)
    pub fn cloud_max_y(&self) -> f32 {
        self.field_height * 0.5
    }

    /// Whether these values describe a playable field
    pub fn is_valid(&self) -> bool {
        let finite = [
            self.field_width,
            self.field_height,
            self.bird_size,
            self.bird_x,
            self.hitbox_inset,
            self.gravity,
            self.flap_impulse,
            self.pipe_width,
            self.pipe_gap,
            self.pipe_speed,
            self.pipe_trim,
            self.cloud_width,
            self.cloud_min_spacing,
        ]
        .iter()
        .all(|v| v.is_finite());

        finite
            && self.field_width > 0.0
            && self.field_height > self.bird_size
            && self.bird_size > 0.0
            && self.hitbox_inset >= 0.0
            && self.hitbox_inset * 2.0 < self.bird_size
            && self.bird_x >= 0.0
            && self.bird_x + self.bird_size <= self.field_width
            && self.flap_impulse < 0.0
            && self.gravity >= 0.0
            && self.pipe_width > 0.0
            && self.pipe_gap > self.bird_size
            && self.pipe_speed > 0.0
            && self.pipe_trim >= 0.0
            && self.pipe_interval_ms.is_finite()
            && self.pipe_interval_ms > 0.0
            && self.cloud_interval_ms.is_finite()
            && self.cloud_interval_ms > 0.0
            && (self.pipe_min_height as f32) * 2.0 + self.pipe_gap <= self.field_height
    }

    /// Parse an override, falling back to defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Tuning>(json) {
            Ok(tuning) if tuning.is_valid() => tuning,
            Ok(_) => {
                log::warn!("Tuning override is unplayable, using defaults");
                Self::default()
            }
            Err(e) => {
                log::warn!("Tuning override did not parse ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Load the override from storage, or defaults when none is stored
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Some(json) => {
                log::info!("Loaded tuning override");
                Self::from_json(&json)
            }
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::storage::MemoryStore;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.is_valid());
        assert_eq!(tuning.min_gap_top(), 50);
        assert_eq!(tuning.max_gap_top(), 250);
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.2, "pipe_gap": 120 }"#);
        assert_eq!(tuning.gravity, 0.2);
        assert_eq!(tuning.pipe_gap, 120.0);
        assert_eq!(tuning.field_height, FIELD_HEIGHT);
    }

    #[test]
    fn test_unplayable_override_falls_back() {
        // Gap taller than the field
        let tuning = Tuning::from_json(r#"{ "pipe_gap": 900 }"#);
        assert_eq!(tuning, Tuning::default());

        let tuning = Tuning::from_json(r#"{ "flap_impulse": 3.0 }"#);
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_garbage_override_falls_back() {
        assert_eq!(Tuning::from_json("not json"), Tuning::default());
    }

    #[test]
    fn test_load_from_store() {
        let mut store = MemoryStore::default();
        assert_eq!(Tuning::load(&store), Tuning::default());

        store.set(Tuning::STORAGE_KEY, r#"{ "pipe_speed": 1.5 }"#);
        assert_eq!(Tuning::load(&store).pipe_speed, 1.5);
    }
}
