//! Observation encoders.
//!
//! Every encoder is a pure function of a [`Snapshot`]: the same snapshot
//! always yields the same output, bit for bit. Dense encoders produce a
//! fixed-length `Vec<f32>` whatever the board size or snake state.
//!
//! | Encoder | Length |
//! |---|---|
//! | [`dense11`] | 11 |
//! | [`dense32`] | 32 |
//! | [`dense28_ego`] | 28 |
//! | [`raycasts19`] | 19 |
//! | [`raw_state`] | structured |

pub mod dense11;
pub mod dense28_ego;
pub mod dense32;
pub mod raw_state;
pub mod raycasts19;

use snake_types::{Direction, ObsType, Observation, Point};

use crate::snapshot::Snapshot;

/// Encode `snapshot` with the encoder selected by `obs_type`.
///
/// `steps` is only used by [`ObsType::RawState`], which reports the step
/// counter alongside the geometry.
pub fn encode(obs_type: ObsType, snapshot: &Snapshot, steps: u32) -> Observation {
    let data = match obs_type {
        ObsType::RawState => return Observation::Raw(raw_state::encode(snapshot, steps)),
        ObsType::Dense11 => dense11::encode(snapshot),
        ObsType::Dense32 => dense32::encode(snapshot),
        ObsType::Dense28Ego => dense28_ego::encode(snapshot),
        ObsType::Raycasts19 => raycasts19::encode(snapshot),
    };
    Observation::Dense { obs_type, data }
}

/// Heading one-hot in `[LEFT, RIGHT, UP, DOWN]` order.
pub(crate) fn heading_one_hot(dir: Direction) -> [f32; 4] {
    [
        f32::from(dir == Direction::Left),
        f32::from(dir == Direction::Right),
        f32::from(dir == Direction::Up),
        f32::from(dir == Direction::Down),
    ]
}

/// World-frame food bits: `[food left, food right, food above, food below]`
/// of the head.
pub(crate) fn food_bits(head: Point, food: Point) -> [f32; 4] {
    [
        f32::from(food.x < head.x),
        f32::from(food.x > head.x),
        f32::from(food.y < head.y),
        f32::from(food.y > head.y),
    ]
}

/// Offsets of the 5x5 ring around a centre, row by row, centre skipped.
pub(crate) fn ring_offsets() -> impl Iterator<Item = (i32, i32)> {
    (-2..=2)
        .flat_map(|outer| (-2..=2).map(move |inner| (inner, outer)))
        .filter(|&(inner, outer)| inner != 0 || outer != 0)
}
