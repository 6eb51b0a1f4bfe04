//! Dense-28-Ego: the 5x5 ring and food bits in the snake's own frame.
//!
//! Ring cells are scanned with `ey` from -2 (front) to 2 (back) as the
//! outer loop and `ex` from -2 (left) to 2 (right) inside it. Each offset is
//! mapped to world coordinates before the bounds and occupancy test, so the
//! vector is invariant under rotating the whole board with the snake.
//!
//! The last four entries are `[ahead, behind, left, right]` for the food.

use super::ring_offsets;
use crate::snapshot::Snapshot;

/// Vector length.
pub const LEN: usize = 28;

/// Encode a snapshot.
pub fn encode(s: &Snapshot) -> Vec<f32> {
    let head = s.head();
    let mut v = Vec::with_capacity(LEN);
    v.extend(ring_offsets().map(|(ex, ey)| {
        let (wx, wy) = s.ego_to_world(ex, ey);
        f32::from(s.blocked(head.offset(wx, wy)))
    }));

    let food = s.food();
    let (fx, fy) = s.world_to_ego(food.x.saturating_sub(head.x), food.y.saturating_sub(head.y));
    v.extend([
        f32::from(fy < 0),
        f32::from(fy > 0),
        f32::from(fx < 0),
        f32::from(fx > 0),
    ]);
    v
}
