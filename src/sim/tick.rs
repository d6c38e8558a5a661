//! Per-frame simulation step
//!
//! Motion is scaled by the frame multiplier (elapsed time over one 60 Hz
//! reference frame, capped at 2x). Generator timers run on raw elapsed time.

use super::collision::{first_pipe_hit, out_of_bounds};
use super::spawn::{spawn_cloud, spawn_pipe};
use super::state::{CrashCause, GameEvent, GamePhase, GameState};
use crate::frame_multiplier;

/// Input latched since the previous frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Flap (click/tap/space). Starts the game from Idle.
    pub flap: bool,
    /// Leave GameOver for Idle
    pub restart: bool,
    /// Idle/demo mode - the simulation flaps on its own
    pub autopilot: bool,
}

/// Advance the game state by one frame that took `elapsed_ms`
pub fn tick(state: &mut GameState, input: &FrameInput, elapsed_ms: f64) {
    state.events.clear();

    match state.phase {
        GamePhase::GameOver => {
            if input.restart {
                restart(state);
            }
            return;
        }
        GamePhase::Idle => {
            if !(input.flap || input.autopilot) {
                return;
            }
            start(state);
        }
        GamePhase::Playing => {
            let flap = input.flap || (input.autopilot && autopilot_wants_flap(state));
            if flap {
                state.bird.flap(state.tuning.flap_impulse);
                state.events.push(GameEvent::Flapped);
            }
            step_playing(state, elapsed_ms, flap);
            return;
        }
    }

    // First frame of a run: the starting press is the first flap
    step_playing(state, elapsed_ms, true);
}

/// Pure form of [`tick`]: consumes a state and returns the next one
pub fn advance(mut state: GameState, elapsed_ms: f64, input: &FrameInput) -> GameState {
    tick(&mut state, input, elapsed_ms);
    state
}

/// Idle -> Playing
fn start(state: &mut GameState) {
    state.reset_session();
    state.phase = GamePhase::Playing;
    state.events.push(GameEvent::Started);
    log::info!("Run started");

    state.bird.flap(state.tuning.flap_impulse);
    state.events.push(GameEvent::Flapped);

    // The generator fires once on entering Playing
    spawn_pipe(state);
}

/// GameOver -> Idle
fn restart(state: &mut GameState) {
    state.reset_session();
    state.phase = GamePhase::Idle;
    state.events.push(GameEvent::Restarted);
    log::info!("Restarted, waiting for first press");
}

/// Playing -> GameOver
fn crash(state: &mut GameState, cause: CrashCause) {
    state.phase = GamePhase::GameOver;
    state.events.push(GameEvent::Crashed(cause));
    log::info!("Crashed ({:?}) with score {}", cause, state.score);
}

fn step_playing(state: &mut GameState, elapsed_ms: f64, flapped: bool) {
    let m = frame_multiplier(elapsed_ms);
    state.time_ms += elapsed_ms.max(0.0);
    state.frames += 1;

    // Bird: a flap frame keeps the impulse exactly, otherwise gravity applies
    if !flapped {
        state.bird.fall(state.tuning.gravity, m);
    }
    state.bird.advance(m);

    if let Some(cause) = out_of_bounds(&state.bird, &state.tuning) {
        crash(state, cause);
        return;
    }

    // Generators
    if state.pipe_timer.advance(elapsed_ms) {
        spawn_pipe(state);
    }
    if state.cloud_timer.advance(elapsed_ms) {
        spawn_cloud(state);
    }

    // Move pipes, remembering where each trailing edge started
    let bird_x = state.tuning.bird_x;
    let dx = state.tuning.pipe_speed * m;
    let pipe_width = state.tuning.pipe_width;
    let mut crossed = Vec::new();
    for (i, pipe) in state.pipes.iter_mut().enumerate() {
        let old_right = pipe.x + pipe_width;
        pipe.x -= dx;
        let new_right = pipe.x + pipe_width;
        if !pipe.scored && old_right >= bird_x && new_right < bird_x {
            crossed.push(i);
        }
    }

    let cloud_dx = state.tuning.pipe_speed * m;
    for cloud in state.clouds.iter_mut() {
        cloud.x -= cloud_dx * cloud.speed;
    }

    if let Some(id) = first_pipe_hit(&state.bird, &state.pipes, &state.tuning) {
        crash(state, CrashCause::Pipe { id });
        return;
    }

    for i in crossed {
        state.pipes[i].scored = true;
        state.score += 1;
        state.events.push(GameEvent::Scored { score: state.score });
        log::debug!("Passed pipe {}, score {}", state.pipes[i].id, state.score);
    }

    // Drop what has left the field; retain keeps creation order
    let tuning = &state.tuning;
    state.pipes.retain(|p| p.on_screen(tuning));
    state.clouds.retain(|c| c.on_screen(tuning));
}

/// Flap when the bird sinks below the middle of the next gap
fn autopilot_wants_flap(state: &GameState) -> bool {
    let tuning = &state.tuning;
    let bird_x = tuning.bird_x;
    let target = state
        .pipes
        .iter()
        .find(|p| p.right(tuning) >= bird_x)
        .map(|p| p.gap_top + tuning.pipe_gap * 0.65)
        .unwrap_or(tuning.field_height / 2.0);

    let bottom = state.bird.bottom(tuning);
    bottom > target && state.bird.vy > 0.0
}
