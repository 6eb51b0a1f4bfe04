//! Raw-State: unnormalized geometry for rendering.

use snake_types::RawState;

use crate::snapshot::Snapshot;

/// Copy a snapshot into a [`RawState`] stamped with `step`.
pub fn encode(s: &Snapshot, step: u32) -> RawState {
    RawState {
        cols: s.cols(),
        rows: s.rows(),
        step,
        head: s.head(),
        dir: s.direction(),
        body: s.body().to_vec(),
        food: s.food(),
    }
}
