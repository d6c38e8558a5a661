//! Collision detection
//!
//! Everything is an axis-aligned box in field coordinates (y grows
//! downward). Overlap is strict: boxes that only touch do not collide.

use glam::Vec2;

use super::state::{Bird, CrashCause, Pipe};
use crate::tuning::Tuning;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(x + w, y + h))
    }

    /// Shrink by `inset` on every side
    pub fn inset(&self, inset: f32) -> Self {
        Self::new(self.min + Vec2::splat(inset), self.max - Vec2::splat(inset))
    }

    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    /// Strict overlap test
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// The bird's collision box (sprite square, inset on every side)
pub fn bird_hitbox(bird: &Bird, tuning: &Tuning) -> Rect {
    Rect::from_xywh(tuning.bird_x, bird.y, tuning.bird_size, tuning.bird_size)
        .inset(tuning.hitbox_inset)
}

/// Upper pipe box: field top down to the gap, trimmed at the gap
pub fn upper_pipe_rect(pipe: &Pipe, tuning: &Tuning) -> Rect {
    Rect::new(
        Vec2::new(pipe.x, 0.0),
        Vec2::new(pipe.right(tuning), pipe.gap_top - tuning.pipe_trim),
    )
}

/// Lower pipe box: gap bottom to field bottom, trimmed at the gap
pub fn lower_pipe_rect(pipe: &Pipe, tuning: &Tuning) -> Rect {
    Rect::new(
        Vec2::new(pipe.x, pipe.gap_bottom(tuning) + tuning.pipe_trim),
        Vec2::new(pipe.right(tuning), tuning.field_height),
    )
}

/// Whether the hitbox touches either half of the pair
pub fn hits_pipe(hitbox: &Rect, pipe: &Pipe, tuning: &Tuning) -> bool {
    hitbox.overlaps(&upper_pipe_rect(pipe, tuning)) || hitbox.overlaps(&lower_pipe_rect(pipe, tuning))
}

/// Check the sprite against the top and bottom of the field
pub fn out_of_bounds(bird: &Bird, tuning: &Tuning) -> Option<CrashCause> {
    if bird.y <= 0.0 {
        Some(CrashCause::Ceiling)
    } else if bird.y >= tuning.field_height - tuning.bird_size {
        Some(CrashCause::Ground)
    } else {
        None
    }
}

/// First pipe the bird is touching, in creation order
pub fn first_pipe_hit(bird: &Bird, pipes: &[Pipe], tuning: &Tuning) -> Option<u32> {
    let hitbox = bird_hitbox(bird, tuning);
    pipes
        .iter()
        .find(|pipe| hits_pipe(&hitbox, pipe, tuning))
        .map(|pipe| pipe.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bird_at(y: f32) -> Bird {
        Bird {
            y,
            vy: 0.0,
            rotation: 0.0,
        }
    }

    #[test]
    fn test_rect_overlap_is_strict() {
        let a = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_xywh(10.0, 0.0, 10.0, 10.0);
        let c = Rect::from_xywh(9.0, 9.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn test_empty_rect_never_overlaps() {
        let a = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        let degenerate = Rect::new(Vec2::new(2.0, 5.0), Vec2::new(8.0, 3.0));
        assert!(!a.overlaps(&degenerate));
    }

    #[test]
    fn test_pipe_rects_span_the_gap() {
        let tuning = Tuning {
            pipe_trim: 0.0,
            ..Tuning::default()
        };
        let pipe = Pipe::new(1, 100.0, 150.0);

        let upper = upper_pipe_rect(&pipe, &tuning);
        assert_eq!(upper.min, Vec2::new(100.0, 0.0));
        assert_eq!(upper.max, Vec2::new(150.0, 150.0));

        let lower = lower_pipe_rect(&pipe, &tuning);
        assert_eq!(lower.min.y, 250.0);
        assert_eq!(lower.max.y, 400.0);
    }

    #[test]
    fn test_bird_inside_gap_is_safe() {
        let tuning = Tuning::default();
        let trim = tuning.pipe_trim;
        // Pipe overlapping the bird horizontally
        let pipe = Pipe::new(1, tuning.bird_x - 10.0, 150.0);

        // Sprite top at the trimmed gap top, sprite bottom at the trimmed gap bottom
        let highest = bird_at(150.0 + trim);
        let lowest = bird_at(250.0 - trim - tuning.bird_size);
        for bird in [highest, lowest] {
            assert!(!hits_pipe(&bird_hitbox(&bird, &tuning), &pipe, &tuning));
        }
    }

    #[test]
    fn test_bird_in_pipe_collides() {
        let tuning = Tuning::default();
        let pipe = Pipe::new(1, tuning.bird_x - 10.0, 150.0);

        assert!(hits_pipe(&bird_hitbox(&bird_at(100.0), &tuning), &pipe, &tuning));
        assert!(hits_pipe(&bird_hitbox(&bird_at(260.0), &tuning), &pipe, &tuning));
    }

    #[test]
    fn test_inset_forgives_a_graze() {
        let tuning = Tuning::default();
        let pipe = Pipe::new(1, tuning.bird_x - 10.0, 150.0);
        // Sprite pokes 3px into the upper pipe, hitbox inset 2 + trim 2 absorb it
        let bird = bird_at(147.0);
        assert!(!hits_pipe(&bird_hitbox(&bird, &tuning), &pipe, &tuning));
    }

    #[test]
    fn test_pipe_out_of_reach_horizontally() {
        let tuning = Tuning::default();
        let pipe = Pipe::new(1, 300.0, 150.0);
        assert!(!hits_pipe(&bird_hitbox(&bird_at(10.0), &tuning), &pipe, &tuning));
    }

    #[test]
    fn test_out_of_bounds() {
        let tuning = Tuning::default();
        assert_eq!(out_of_bounds(&bird_at(0.0), &tuning), Some(CrashCause::Ceiling));
        assert_eq!(out_of_bounds(&bird_at(-4.0), &tuning), Some(CrashCause::Ceiling));
        assert_eq!(out_of_bounds(&bird_at(380.0), &tuning), Some(CrashCause::Ground));
        assert_eq!(out_of_bounds(&bird_at(379.9), &tuning), None);
        assert_eq!(out_of_bounds(&bird_at(0.1), &tuning), None);
    }

    #[test]
    fn test_first_pipe_hit_reports_id() {
        let tuning = Tuning::default();
        let pipes = vec![
            Pipe::new(4, tuning.bird_x - 10.0, 250.0),
            Pipe::new(5, 300.0, 50.0),
        ];
        assert_eq!(first_pipe_hit(&bird_at(100.0), &pipes, &tuning), Some(4));
        assert_eq!(first_pipe_hit(&bird_at(290.0), &pipes, &tuning), None);
    }
}
