//! Pipe and cloud generation

use rand::Rng;

use super::state::{Cloud, GameEvent, GameState, Pipe};

/// Append a pipe pair at the right edge with a random gap height
pub fn spawn_pipe(state: &mut GameState) -> u32 {
    let min = state.tuning.min_gap_top();
    let max = state.tuning.max_gap_top().max(min);
    let gap_top = state.rng_state.next_rng().random_range(min..=max) as f32;

    let id = state.next_entity_id();
    state
        .pipes
        .push(Pipe::new(id, state.tuning.field_width, gap_top));
    state.events.push(GameEvent::PipeSpawned { id });
    log::debug!("Pipe {} spawned, gap top {}", id, gap_top);
    id
}

/// Try to place a cloud at the right edge away from every visible cloud.
///
/// Gives up after `cloud_placement_attempts` tries; the cycle is then skipped.
pub fn spawn_cloud(state: &mut GameState) -> bool {
    let tuning = &state.tuning;
    let (min_y, max_y) = (tuning.cloud_min_y(), tuning.cloud_max_y());
    let attempts = tuning.cloud_placement_attempts;
    let spacing = tuning.cloud_min_spacing;
    let x = tuning.field_width;

    let mut rng = state.rng_state.next_rng();
    for _ in 0..attempts {
        let y = rng.random_range(min_y..=max_y);
        if state.clouds.iter().all(|c| (c.y - y).abs() >= spacing) {
            let speed = rng.random_range(0.3..=0.6);
            state.clouds.push(Cloud { x, y, speed });
            return true;
        }
    }

    log::debug!("No room for a cloud this cycle");
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_pipes_spawn_at_right_edge_within_bounds() {
        let mut state = GameState::new(42);
        for _ in 0..200 {
            spawn_pipe(&mut state);
        }
        let tuning = &state.tuning;
        for pipe in &state.pipes {
            assert_eq!(pipe.x, tuning.field_width);
            assert!(pipe.gap_top >= 50.0 && pipe.gap_top <= 250.0);
            assert_eq!(pipe.gap_top.fract(), 0.0);
            assert!(!pipe.scored);
        }
        // IDs follow creation order
        assert!(state.pipes.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn test_same_seed_same_pipes() {
        let mut a = GameState::new(9);
        let mut b = GameState::new(9);
        for _ in 0..10 {
            spawn_pipe(&mut a);
            spawn_pipe(&mut b);
        }
        let ha: Vec<f32> = a.pipes.iter().map(|p| p.gap_top).collect();
        let hb: Vec<f32> = b.pipes.iter().map(|p| p.gap_top).collect();
        assert_eq!(ha, hb);
    }

    #[test]
    fn test_cloud_skipped_when_sky_is_full() {
        let tuning = Tuning::default();
        let mut state = GameState::new(5);
        // Clouds every 20px across the whole band leave no 40px slot
        let mut y = tuning.cloud_min_y();
        while y <= tuning.cloud_max_y() + 20.0 {
            state.clouds.push(Cloud { x: 100.0, y, speed: 0.5 });
            y += 20.0;
        }
        let before = state.clouds.len();
        assert!(!spawn_cloud(&mut state));
        assert_eq!(state.clouds.len(), before);
    }

    #[test]
    fn test_clouds_keep_their_spacing() {
        let mut state = GameState::new(11);
        for _ in 0..50 {
            spawn_cloud(&mut state);
        }
        assert!(!state.clouds.is_empty());
        let spacing = state.tuning.cloud_min_spacing;
        for (i, a) in state.clouds.iter().enumerate() {
            for b in &state.clouds[i + 1..] {
                assert!((a.y - b.y).abs() >= spacing);
            }
        }
    }
}
