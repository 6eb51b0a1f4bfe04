//! Error types for the `snake-sim` crate.
//!
//! The engine never fails during play; every failure is a terminal step.
//! Only construction can be rejected.

/// Errors raised when a board cannot be created.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    /// The board cannot hold the three-segment starting snake.
    #[error("board {cols}x{rows} is too small (need at least {min_cols} columns and 1 row)")]
    BoardTooSmall {
        /// Requested width.
        cols: i32,
        /// Requested height.
        rows: i32,
        /// Minimum width.
        min_cols: i32,
    },

    /// The cell count does not fit in memory indexing.
    #[error("board {cols}x{rows} is too large")]
    BoardTooLarge {
        /// Requested width.
        cols: i32,
        /// Requested height.
        rows: i32,
    },
}
