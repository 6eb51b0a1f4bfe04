//! Enumeration types for the Snake environment.
//!
//! [`Direction`] is the load-bearing one: its integer mapping is pinned
//! here and nowhere else, and the turn arithmetic, the movement vectors and
//! the egocentric transforms all derive from [`Direction::index`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Heading of the snake in screen coordinates (+x right, +y down).
///
/// The discriminants form the cycle `Right -> Down -> Left -> Up`, so a
/// right turn is `(d + 1) mod 4` and a left turn is `(d + 3) mod 4`.
/// Reordering the variants breaks turning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export, export_to = "bindings/")]
pub enum Direction {
    /// Moving toward +x.
    Right = 0,
    /// Moving toward +y.
    Down = 1,
    /// Moving toward -x.
    Left = 2,
    /// Moving toward -y.
    Up = 3,
}

impl Direction {
    /// All directions in cyclic (clockwise) order.
    pub const ALL: [Self; 4] = [Self::Right, Self::Down, Self::Left, Self::Up];

    /// Integer value of the direction (0..=3).
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Direction for an integer value, taken modulo 4.
    pub const fn from_index(index: u8) -> Self {
        match index & 3 {
            0 => Self::Right,
            1 => Self::Down,
            2 => Self::Left,
            _ => Self::Up,
        }
    }

    /// Heading after a 90 degree clockwise turn.
    pub const fn rotate_right(self) -> Self {
        Self::from_index(self.index().wrapping_add(1))
    }

    /// Heading after a 90 degree counter-clockwise turn.
    pub const fn rotate_left(self) -> Self {
        Self::from_index(self.index().wrapping_add(3))
    }

    /// Unit movement vector `(dx, dy)` for this heading.
    pub const fn vector(self) -> (i32, i32) {
        match self {
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Up => (0, -1),
        }
    }

    /// Upper-case label used in raw board state.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Right => "RIGHT",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Up => "UP",
        }
    }

    /// Map an egocentric offset to a world offset.
    ///
    /// In the ego frame "forward" is `-y` and the snake's right is `+x`,
    /// whatever the world heading.
    pub const fn ego_to_world(self, ex: i32, ey: i32) -> (i32, i32) {
        match self {
            Self::Up => (ex, ey),
            Self::Right => (ey.saturating_neg(), ex),
            Self::Down => (ex.saturating_neg(), ey.saturating_neg()),
            Self::Left => (ey, ex.saturating_neg()),
        }
    }

    /// Map a world offset into the egocentric frame. Inverse of
    /// [`Direction::ego_to_world`].
    pub const fn world_to_ego(self, dx: i32, dy: i32) -> (i32, i32) {
        match self {
            Self::Up => (dx, dy),
            Self::Right => (dy, dx.saturating_neg()),
            Self::Down => (dx.saturating_neg(), dy.saturating_neg()),
            Self::Left => (dy.saturating_neg(), dx),
        }
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// Relative steering command applied on one tick.
///
/// The boundary encoding is the integer `0`/`1`/`2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Action {
    /// Keep the current heading.
    #[default]
    Straight = 0,
    /// Turn 90 degrees clockwise, then move.
    TurnRight = 1,
    /// Turn 90 degrees counter-clockwise, then move.
    TurnLeft = 2,
}

impl Action {
    /// Decode a boundary action code.
    ///
    /// Codes outside `0..=2` are coerced to [`Action::Straight`] rather
    /// than rejected.
    pub const fn from_code(code: i64) -> Self {
        match code {
            1 => Self::TurnRight,
            2 => Self::TurnLeft,
            _ => Self::Straight,
        }
    }

    /// Whether this action changes the heading.
    pub const fn is_turn(self) -> bool {
        !matches!(self, Self::Straight)
    }

    /// Heading that results from applying this action to `dir`.
    pub const fn apply(self, dir: Direction) -> Direction {
        match self {
            Self::Straight => dir,
            Self::TurnRight => dir.rotate_right(),
            Self::TurnLeft => dir.rotate_left(),
        }
    }
}

// ---------------------------------------------------------------------------
// Death cause
// ---------------------------------------------------------------------------

/// Terminal condition that ended an episode.
///
/// Serialized as the labels `""`, `"wall"`, `"self"` and `"timeout"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum DeathCause {
    /// Episode still running.
    #[default]
    #[serde(rename = "")]
    None,
    /// The head left the board.
    #[serde(rename = "wall")]
    Wall,
    /// The head ran into the snake's own body.
    #[serde(rename = "self")]
    SelfCollision,
    /// Too many steps without growing.
    #[serde(rename = "timeout")]
    Timeout,
}

impl DeathCause {
    /// Wire label for this cause.
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Wall => "wall",
            Self::SelfCollision => "self",
            Self::Timeout => "timeout",
        }
    }
}

// ---------------------------------------------------------------------------
// Observation type
// ---------------------------------------------------------------------------

/// Selector for one of the five observation encoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ObsType {
    /// Unnormalized board geometry, for rendering.
    RawState,
    /// 24 world-aligned ring cells, heading one-hot, food bits.
    Dense32,
    /// Danger flags, heading one-hot, food bits.
    Dense11,
    /// 24 egocentric ring cells and egocentric food bits.
    Dense28Ego,
    /// Eight compass rays plus food features.
    Raycasts19,
}

impl ObsType {
    /// Every supported observation type, in advertised order.
    pub const ALL: [Self; 5] = [
        Self::RawState,
        Self::Dense32,
        Self::Dense11,
        Self::Dense28Ego,
        Self::Raycasts19,
    ];

    /// Type used when a caller names an unknown observation type.
    pub const DEFAULT: Self = Self::Dense32;

    /// Canonical name of the observation type.
    pub const fn name(self) -> &'static str {
        match self {
            Self::RawState => "RawState",
            Self::Dense32 => "Dense32",
            Self::Dense11 => "Dense11",
            Self::Dense28Ego => "Dense28Ego",
            Self::Raycasts19 => "Raycasts19",
        }
    }

    /// Fixed vector length of a dense encoder, `None` for [`ObsType::RawState`].
    pub const fn dense_len(self) -> Option<usize> {
        match self {
            Self::RawState => None,
            Self::Dense32 => Some(32),
            Self::Dense11 => Some(11),
            Self::Dense28Ego => Some(28),
            Self::Raycasts19 => Some(19),
        }
    }

    /// Parse a name case-insensitively, ignoring `_`, `-` and spaces.
    pub fn parse(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(&normalized))
    }

    /// Parse a name, falling back to [`ObsType::DEFAULT`] when unknown.
    pub fn parse_or_default(name: &str) -> Self {
        Self::parse(name).unwrap_or(Self::DEFAULT)
    }
}

impl core::fmt::Display for ObsType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_turns_cycle_with_period_four() {
        for start in Direction::ALL {
            let mut d = start;
            for _ in 0..4 {
                d = d.rotate_right();
            }
            assert_eq!(d, start);
        }
        assert_eq!(Direction::Right.rotate_right(), Direction::Down);
        assert_eq!(Direction::Up.rotate_right(), Direction::Right);
    }

    #[test]
    fn left_turn_undoes_right_turn() {
        for d in Direction::ALL {
            assert_eq!(d.rotate_right().rotate_left(), d);
            assert_eq!(d.rotate_left(), d.rotate_right().rotate_right().rotate_right());
        }
        assert_eq!(Direction::Right.rotate_left(), Direction::Up);
    }

    #[test]
    fn turning_right_matches_rotating_the_vector_clockwise() {
        // In screen coordinates a clockwise turn maps (dx, dy) -> (-dy, dx).
        for d in Direction::ALL {
            let (dx, dy) = d.vector();
            assert_eq!(d.rotate_right().vector(), (-dy, dx));
        }
    }

    #[test]
    fn ego_forward_is_the_heading() {
        for d in Direction::ALL {
            assert_eq!(d.ego_to_world(0, -1), d.vector());
            assert_eq!(d.ego_to_world(1, 0), d.rotate_right().vector());
            assert_eq!(d.ego_to_world(-1, 0), d.rotate_left().vector());
        }
    }

    #[test]
    fn ego_transforms_are_inverse() {
        for d in Direction::ALL {
            for ex in -2..=2 {
                for ey in -2..=2 {
                    let (wx, wy) = d.ego_to_world(ex, ey);
                    assert_eq!(d.world_to_ego(wx, wy), (ex, ey));
                }
            }
        }
    }

    #[test]
    fn out_of_range_actions_are_straight() {
        assert_eq!(Action::from_code(0), Action::Straight);
        assert_eq!(Action::from_code(1), Action::TurnRight);
        assert_eq!(Action::from_code(2), Action::TurnLeft);
        assert_eq!(Action::from_code(3), Action::Straight);
        assert_eq!(Action::from_code(-1), Action::Straight);
        assert!(!Action::Straight.is_turn());
        assert!(Action::TurnLeft.is_turn());
    }

    #[test]
    fn obs_type_parses_case_insensitively() {
        assert_eq!(ObsType::parse("Dense11"), Some(ObsType::Dense11));
        assert_eq!(ObsType::parse("dense11"), Some(ObsType::Dense11));
        assert_eq!(ObsType::parse("DENSE_28_EGO"), Some(ObsType::Dense28Ego));
        assert_eq!(ObsType::parse("raw-state"), Some(ObsType::RawState));
        assert_eq!(ObsType::parse("raycasts19"), Some(ObsType::Raycasts19));
        assert_eq!(ObsType::parse("pixels"), None);
        assert_eq!(ObsType::parse_or_default("pixels"), ObsType::DEFAULT);
    }

    #[test]
    fn death_cause_labels_serialize() {
        let json = serde_json::to_string(&DeathCause::SelfCollision).ok();
        assert_eq!(json.as_deref(), Some("\"self\""));
        let json = serde_json::to_string(&DeathCause::None).ok();
        assert_eq!(json.as_deref(), Some("\"\""));
        assert_eq!(DeathCause::Timeout.label(), "timeout");
    }

    #[test]
    fn direction_serializes_upper_case() {
        let json = serde_json::to_string(&Direction::Left).ok();
        assert_eq!(json.as_deref(), Some("\"LEFT\""));
        assert_eq!(Direction::Left.label(), "LEFT");
    }
}
