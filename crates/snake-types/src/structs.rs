//! Core value structs shared by the engine, the pool and the adapter.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{DeathCause, Direction, ObsType};
use crate::ids::SessionId;

/// Number of entries in the per-step signal vector.
pub const SIGNAL_COUNT: usize = 6;

/// Names of the signal vector entries, in order.
pub const SIGNAL_NAMES: [&str; SIGNAL_COUNT] = [
    "eat_food",
    "death",
    "step_cost",
    "toward_food",
    "turning",
    "timeout",
];

/// Per-step signal vector: ate food, died, alive-step cost, progress toward
/// food, turned this step, timed out.
pub type Signals = [f32; SIGNAL_COUNT];

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Integer board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Point {
    /// Column, growing to the right.
    pub x: i32,
    /// Row, growing downward.
    pub y: i32,
}

impl Point {
    /// Create a point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The point shifted by `(dx, dy)`.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// The neighbouring cell one step along `dir`.
    pub const fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.vector();
        self.offset(dx, dy)
    }

    /// Chebyshev distance: the larger of the per-axis absolute differences.
    pub const fn chebyshev(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        if dx > dy { dx } else { dy }
    }
}

// ---------------------------------------------------------------------------
// Observations
// ---------------------------------------------------------------------------

/// Unnormalized board geometry.
///
/// Used as the `RawState` observation and as the optional render frame
/// attached to responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RawState {
    /// Board width.
    pub cols: i32,
    /// Board height.
    pub rows: i32,
    /// Steps taken in the current episode.
    pub step: u32,
    /// Head cell.
    pub head: Point,
    /// Current heading.
    pub dir: Direction,
    /// Body cells from neck to tail, excluding the head.
    pub body: Vec<Point>,
    /// Food cell.
    pub food: Point,
}

/// An encoded observation: either a dense float vector or raw geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Observation {
    /// Fixed-length feature vector from one of the dense encoders.
    Dense {
        /// Encoder that produced the vector.
        obs_type: ObsType,
        /// Feature values.
        data: Vec<f32>,
    },
    /// Raw board geometry.
    Raw(RawState),
}

impl Observation {
    /// Observation type that produced this value.
    pub const fn obs_type(&self) -> ObsType {
        match self {
            Self::Dense { obs_type, .. } => *obs_type,
            Self::Raw(_) => ObsType::RawState,
        }
    }

    /// Dense feature vector, if this is a dense observation.
    pub fn dense(&self) -> Option<&[f32]> {
        match self {
            Self::Dense { data, .. } => Some(data.as_slice()),
            Self::Raw(_) => None,
        }
    }

    /// Raw geometry, if this is a raw observation.
    pub const fn raw(&self) -> Option<&RawState> {
        match self {
            Self::Dense { .. } => None,
            Self::Raw(raw) => Some(raw),
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Result of a reset or step, as seen by an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StepResponse {
    /// Observation of the board after the call.
    pub obs: Observation,
    /// Signal vector, see [`SIGNAL_NAMES`].
    pub signals: Signals,
    /// Whether the episode has ended.
    pub done: bool,
    /// Food eaten this episode.
    pub score: u32,
    /// Snake length including the head.
    pub length: u32,
    /// Terminal condition, empty while alive.
    pub death: DeathCause,
    /// Steps taken this episode.
    pub steps: u32,
    /// Raw frame for rendering, present when the caller asked for one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_for_render: Option<RawState>,
}

/// Responses for every slot of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ManyResponse {
    /// Session the responses belong to.
    pub session: SessionId,
    /// One response per slot, in slot order.
    pub envs: Vec<StepResponse>,
}

/// Static description of the environment served by an adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EnvSpec {
    /// Default board width.
    pub cols: i32,
    /// Default board height.
    pub rows: i32,
    /// Default timeout multiplier.
    pub timeout_mult: u32,
    /// Observation types accepted by reset calls.
    pub supported_obs: Vec<ObsType>,
    /// Names of the signal vector entries.
    pub reward_signals: Vec<String>,
}

impl EnvSpec {
    /// Describe a board with every observation type supported.
    pub fn for_board(cols: i32, rows: i32, timeout_mult: u32) -> Self {
        Self {
            cols,
            rows,
            timeout_mult,
            supported_obs: ObsType::ALL.to_vec(),
            reward_signals: SIGNAL_NAMES.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chebyshev_takes_the_larger_axis() {
        let a = Point::new(1, 1);
        assert_eq!(a.chebyshev(Point::new(4, 2)), 3);
        assert_eq!(a.chebyshev(Point::new(0, -5)), 6);
        assert_eq!(a.chebyshev(a), 0);
    }

    #[test]
    fn step_follows_direction_vector() {
        let p = Point::new(5, 5);
        assert_eq!(p.step(Direction::Right), Point::new(6, 5));
        assert_eq!(p.step(Direction::Up), Point::new(5, 4));
        assert_eq!(p.step(Direction::Down), Point::new(5, 6));
        assert_eq!(p.step(Direction::Left), Point::new(4, 5));
    }

    #[test]
    fn observation_is_tagged_on_the_wire() {
        let obs = Observation::Dense {
            obs_type: ObsType::Dense11,
            data: vec![0.0; 11],
        };
        let json = serde_json::to_value(&obs).ok();
        let kind = json.as_ref().and_then(|v| v.get("kind")).and_then(|v| v.as_str());
        assert_eq!(kind, Some("dense"));
        let ty = json.as_ref().and_then(|v| v.get("obs_type")).and_then(|v| v.as_str());
        assert_eq!(ty, Some("Dense11"));
    }

    #[test]
    fn render_frame_is_omitted_when_absent() {
        let response = StepResponse {
            obs: Observation::Dense {
                obs_type: ObsType::Dense11,
                data: Vec::new(),
            },
            signals: [0.0; SIGNAL_COUNT],
            done: false,
            score: 0,
            length: 3,
            death: DeathCause::None,
            steps: 0,
            raw_for_render: None,
        };
        let json = serde_json::to_value(&response).ok();
        assert!(json.as_ref().is_some_and(|v| v.get("raw_for_render").is_none()));
        assert!(json.as_ref().is_some_and(|v| v.get("death").is_some()));
    }

    #[test]
    fn spec_lists_every_observation_type() {
        let spec = EnvSpec::for_board(40, 30, 150);
        assert_eq!(spec.supported_obs.len(), 5);
        assert_eq!(spec.reward_signals.first().map(String::as_str), Some("eat_food"));
    }
}
