//! Dense-32: world-aligned 5x5 ring, heading one-hot and food bits.
//!
//! The 24 ring cells are scanned with `dy` from -2 to 2 as the outer loop
//! and `dx` from -2 to 2 inside it, skipping the head. A cell reads 1 when
//! it is off the board or occupied.

use super::{food_bits, heading_one_hot, ring_offsets};
use crate::snapshot::Snapshot;

/// Vector length.
pub const LEN: usize = 32;

/// Encode a snapshot.
pub fn encode(s: &Snapshot) -> Vec<f32> {
    let head = s.head();
    let mut v = Vec::with_capacity(LEN);
    v.extend(ring_offsets().map(|(dx, dy)| f32::from(s.blocked(head.offset(dx, dy)))));
    v.extend(heading_one_hot(s.direction()));
    v.extend(food_bits(head, s.food()));
    v
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use snake_types::{Direction, Point};

    use super::*;

    #[test]
    fn ring_marks_body_cells_in_scan_order() {
        let s = Snapshot::new(
            10,
            10,
            Point::new(5, 5),
            Direction::Right,
            Point::new(5, 1),
            vec![Point::new(4, 5), Point::new(3, 5)],
        );
        let v = encode(&s);
        assert_eq!(v.len(), LEN);
        let ring = &v[..24];
        // Row dy=0 occupies indices 10..14: (-2,0), (-1,0), (1,0), (2,0).
        assert_eq!(&ring[10..14], &[1.0, 1.0, 0.0, 0.0]);
        assert_eq!(ring.iter().filter(|c| **c > 0.5).count(), 2);
        assert_eq!(&v[24..28], &[0.0, 1.0, 0.0, 0.0]);
        assert_eq!(&v[28..], &[0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn off_board_cells_read_blocked_in_a_corner() {
        let s = Snapshot::new(
            10,
            10,
            Point::new(0, 0),
            Direction::Left,
            Point::new(9, 9),
            vec![Point::new(1, 0), Point::new(2, 0)],
        );
        let v = encode(&s);
        // Only (1,1),(2,1),(1,2),(2,2) and (0,1),(0,2) are on the board and
        // free, plus the two body cells which are blocked.
        let free = v[..24].iter().filter(|c| **c < 0.5).count();
        assert_eq!(free, 6);
        assert_eq!(&v[24..28], &[1.0, 0.0, 0.0, 0.0]);
    }
}
