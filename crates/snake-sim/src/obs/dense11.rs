//! Dense-11: danger flags, heading one-hot and food bits.
//!
//! Layout: `[danger straight, danger right, danger left, L, R, U, D,
//! food left, food right, food above, food below]`.

use super::{food_bits, heading_one_hot};
use crate::snapshot::Snapshot;

/// Vector length.
pub const LEN: usize = 11;

/// Encode a snapshot.
pub fn encode(s: &Snapshot) -> Vec<f32> {
    let head = s.head();
    let dir = s.direction();
    let danger = |d| f32::from(s.blocked(head.step(d)));

    let mut v = Vec::with_capacity(LEN);
    v.extend([
        danger(dir),
        danger(dir.rotate_right()),
        danger(dir.rotate_left()),
    ]);
    v.extend(heading_one_hot(dir));
    v.extend(food_bits(head, s.food()));
    v
}

#[cfg(test)]
mod tests {
    use snake_types::{Direction, Point};

    use super::*;

    #[test]
    fn open_board_has_no_danger() {
        let s = Snapshot::new(
            10,
            10,
            Point::new(5, 5),
            Direction::Right,
            Point::new(8, 2),
            vec![Point::new(4, 5), Point::new(3, 5)],
        );
        assert_eq!(
            encode(&s),
            vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0]
        );
    }

    #[test]
    fn walls_and_body_are_dangerous() {
        // Heading up along the left wall with the body curling to the right.
        let s = Snapshot::new(
            10,
            10,
            Point::new(0, 5),
            Direction::Up,
            Point::new(0, 5),
            vec![Point::new(0, 6), Point::new(1, 6), Point::new(1, 5)],
        );
        let v = encode(&s);
        assert_eq!(v.len(), LEN);
        // Straight (0,4) is free, right (1,5) is body, left (-1,5) is wall.
        assert_eq!(v.get(..3), Some(&[0.0, 1.0, 1.0][..]));
        assert_eq!(v.get(3..7), Some(&[0.0, 0.0, 1.0, 0.0][..]));
        // Food on the head sets no food bits.
        assert_eq!(v.get(7..), Some(&[0.0; 4][..]));
    }

    #[test]
    fn length_is_fixed_on_a_one_row_board() {
        let s = Snapshot::new(
            4,
            1,
            Point::new(2, 0),
            Direction::Right,
            Point::new(3, 0),
            vec![Point::new(1, 0), Point::new(0, 0)],
        );
        let v = encode(&s);
        assert_eq!(v.len(), LEN);
        assert_eq!(v.get(..3), Some(&[0.0, 1.0, 1.0][..]));
    }
}
