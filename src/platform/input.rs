//! Input event filtering
//!
//! Click and touchstart both fire for a single tap on most mobile browsers,
//! so presses closer together than [`INPUT_DEBOUNCE_MS`] collapse into one.

use crate::consts::{INPUT_DEBOUNCE_MS, OVERLAY_CLOSE_DELAY_MS};

/// Drops presses that arrive too soon after the last accepted one
#[derive(Debug, Clone)]
pub struct InputDebounce {
    min_spacing_ms: f64,
    last_accepted_ms: Option<f64>,
}

impl Default for InputDebounce {
    fn default() -> Self {
        Self::new(INPUT_DEBOUNCE_MS)
    }
}

impl InputDebounce {
    pub fn new(min_spacing_ms: f64) -> Self {
        Self {
            min_spacing_ms,
            last_accepted_ms: None,
        }
    }

    /// Returns true if a press at `now_ms` should be acted on
    pub fn accept(&mut self, now_ms: f64) -> bool {
        if let Some(last) = self.last_accepted_ms {
            if now_ms - last < self.min_spacing_ms {
                return false;
            }
        }
        self.last_accepted_ms = Some(now_ms);
        true
    }
}

pub const RESTART_BUTTON_ID: &str = "flappy-restart";
pub const EXIT_BUTTON_ID: &str = "flappy-exit";

/// What a click or tap inside the game area does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapAction {
    Flap,
    Restart,
    Exit,
}

impl TapAction {
    /// Route by the id of the element that was hit
    pub fn for_target(target_id: &str) -> Self {
        match target_id {
            RESTART_BUTTON_ID => TapAction::Restart,
            EXIT_BUTTON_ID => TapAction::Exit,
            _ => TapAction::Flap,
        }
    }
}

/// Guards the modal overlay against the click that opened it
#[derive(Debug, Clone, Default)]
pub struct OverlayGate {
    opened_at_ms: Option<f64>,
}

impl OverlayGate {
    pub fn open(&mut self, now_ms: f64) {
        self.opened_at_ms = Some(now_ms);
    }

    pub fn close(&mut self) {
        self.opened_at_ms = None;
    }

    pub fn is_open(&self) -> bool {
        self.opened_at_ms.is_some()
    }

    /// Whether a click on the overlay at `now_ms` may close the modal
    pub fn allows_close(&self, now_ms: f64) -> bool {
        self.opened_at_ms
            .map(|opened| now_ms - opened >= OVERLAY_CLOSE_DELAY_MS)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rapid_presses_collapse() {
        let mut debounce = InputDebounce::default();
        assert!(debounce.accept(1000.0));
        assert!(!debounce.accept(1010.0));
        assert!(!debounce.accept(1049.9));
        assert!(debounce.accept(1050.0));
    }

    #[test]
    fn test_rejected_press_does_not_extend_window() {
        let mut debounce = InputDebounce::new(50.0);
        assert!(debounce.accept(0.0));
        assert!(!debounce.accept(40.0));
        // Measured from the accepted press at 0, not the rejected one at 40
        assert!(debounce.accept(55.0));
    }

    #[test]
    fn test_taps_on_buttons_do_not_flap() {
        assert_eq!(TapAction::for_target(RESTART_BUTTON_ID), TapAction::Restart);
        assert_eq!(TapAction::for_target(EXIT_BUTTON_ID), TapAction::Exit);
        assert_eq!(TapAction::for_target("flappy-game"), TapAction::Flap);
        assert_eq!(TapAction::for_target(""), TapAction::Flap);
    }

    #[test]
    fn test_overlay_gate() {
        let mut gate = OverlayGate::default();
        assert!(!gate.allows_close(0.0));

        gate.open(1000.0);
        assert!(gate.is_open());
        assert!(!gate.allows_close(1100.0));
        assert!(gate.allows_close(1350.0));

        gate.close();
        assert!(!gate.allows_close(5000.0));
    }
}
