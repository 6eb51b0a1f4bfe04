//! Raycasts-19: eight compass rays plus food features.
//!
//! Rays are cast from the head in the order N, NE, E, SE, S, SW, W, NW.
//! Each contributes two fractions:
//!
//! - steps to the wall: the number of in-bounds cells walked before leaving
//!   the board, over the longest possible walk in that direction
//!   (`rows - 1` vertically, `cols - 1` horizontally, the smaller of the two
//!   diagonally);
//! - steps to the body: the walk length at the first occupied cell, or the
//!   wall fraction when the ray hits nothing.
//!
//! A zero normaliser yields 0. The food features are the head-to-food
//! offset over `max(1, cols - 1)` and `max(1, rows - 1)`, and the Chebyshev
//! distance over the longer side.

use crate::snapshot::{Snapshot, distance_i32, ratio};

/// Vector length.
pub const LEN: usize = 19;

/// Ray directions, clockwise from north.
pub const RAYS: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Walk lengths of one ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ray {
    to_wall: i32,
    to_body: i32,
}

fn cast(s: &Snapshot, dx: i32, dy: i32) -> Ray {
    let mut p = s.head();
    let mut to_wall = 0_i32;
    let mut to_body = None;
    loop {
        p = p.offset(dx, dy);
        if !s.in_bounds(p) {
            break;
        }
        to_wall = to_wall.saturating_add(1);
        if to_body.is_none() && s.occupied(p) {
            to_body = Some(to_wall);
        }
    }
    Ray {
        to_wall,
        to_body: to_body.unwrap_or(to_wall),
    }
}

/// Longest possible walk along `(dx, dy)` on this board.
fn max_walk(s: &Snapshot, dx: i32, dy: i32) -> i32 {
    let horizontal = s.cols().saturating_sub(1).max(0);
    let vertical = s.rows().saturating_sub(1).max(0);
    match (dx, dy) {
        (0, 0) => 1,
        (_, 0) => horizontal,
        (0, _) => vertical,
        _ => horizontal.min(vertical),
    }
}

/// Encode a snapshot.
pub fn encode(s: &Snapshot) -> Vec<f32> {
    let mut v = Vec::with_capacity(LEN);
    for (dx, dy) in RAYS {
        let ray = cast(s, dx, dy);
        let norm = max_walk(s, dx, dy);
        v.push(ratio(ray.to_wall, norm));
        v.push(ratio(ray.to_body, norm));
    }

    let head = s.head();
    let food = s.food();
    v.push(ratio(
        food.x.saturating_sub(head.x),
        s.cols().saturating_sub(1).max(1),
    ));
    v.push(ratio(
        food.y.saturating_sub(head.y),
        s.rows().saturating_sub(1).max(1),
    ));
    v.push(ratio(
        distance_i32(Snapshot::chebyshev(head, food)),
        s.cols().max(s.rows()),
    ));
    v
}
