//! Immutable board view consumed by the observation encoders.
//!
//! A [`Snapshot`] copies the geometry out of a [`SnakeEnv`](crate::SnakeEnv)
//! and derives a boolean occupancy grid once, so every `occupied` query the
//! ray encoder makes is O(1) instead of a scan over the body.

use snake_types::{Direction, Point};

/// Read-only copy of board geometry at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Board width.
    cols: i32,
    /// Board height.
    rows: i32,
    /// Head cell.
    head: Point,
    /// Current heading.
    dir: Direction,
    /// Food cell.
    food: Point,
    /// Body from neck to tail, excluding the head.
    body: Vec<Point>,
    /// Row-major occupancy of head and body cells.
    grid: Vec<bool>,
}

impl Snapshot {
    /// Build a snapshot from raw geometry.
    ///
    /// Cells of `head` or `body` that fall outside the board are ignored
    /// by the occupancy grid.
    pub fn new(
        cols: i32,
        rows: i32,
        head: Point,
        dir: Direction,
        food: Point,
        body: Vec<Point>,
    ) -> Self {
        let cells = usize::try_from(cols.max(0))
            .unwrap_or(0)
            .saturating_mul(usize::try_from(rows.max(0)).unwrap_or(0));
        let mut grid = vec![false; cells];
        for p in core::iter::once(head).chain(body.iter().copied()) {
            if let Some(cell) = cell_index(cols, rows, p).and_then(|i| grid.get_mut(i)) {
                *cell = true;
            }
        }
        Self {
            cols,
            rows,
            head,
            dir,
            food,
            body,
            grid,
        }
    }

    /// Board width.
    pub const fn cols(&self) -> i32 {
        self.cols
    }

    /// Board height.
    pub const fn rows(&self) -> i32 {
        self.rows
    }

    /// Head cell.
    pub const fn head(&self) -> Point {
        self.head
    }

    /// Current heading.
    pub const fn direction(&self) -> Direction {
        self.dir
    }

    /// Food cell.
    pub const fn food(&self) -> Point {
        self.food
    }

    /// Body cells from neck to tail, excluding the head.
    pub fn body(&self) -> &[Point] {
        &self.body
    }

    /// Whether `p` lies on the board.
    pub const fn in_bounds(&self, p: Point) -> bool {
        in_bounds(self.cols, self.rows, p)
    }

    /// Whether `p` is the head or part of the body.
    pub fn occupied(&self, p: Point) -> bool {
        cell_index(self.cols, self.rows, p)
            .and_then(|i| self.grid.get(i))
            .copied()
            .unwrap_or(false)
    }

    /// Whether moving onto `p` would end the episode: off the board or
    /// occupied.
    pub fn blocked(&self, p: Point) -> bool {
        !self.in_bounds(p) || self.occupied(p)
    }

    /// Chebyshev distance between two cells.
    pub const fn chebyshev(a: Point, b: Point) -> u32 {
        a.chebyshev(b)
    }

    /// Map an egocentric offset to a world offset under the current heading.
    pub const fn ego_to_world(&self, ex: i32, ey: i32) -> (i32, i32) {
        self.dir.ego_to_world(ex, ey)
    }

    /// Map a world offset into the egocentric frame of the current heading.
    pub const fn world_to_ego(&self, dx: i32, dy: i32) -> (i32, i32) {
        self.dir.world_to_ego(dx, dy)
    }
}

/// Whether `p` lies on a `cols` x `rows` board.
pub(crate) const fn in_bounds(cols: i32, rows: i32, p: Point) -> bool {
    p.x >= 0 && p.x < cols && p.y >= 0 && p.y < rows
}

/// Row-major index of `p`, or `None` when it is off the board.
pub(crate) fn cell_index(cols: i32, rows: i32, p: Point) -> Option<usize> {
    if !in_bounds(cols, rows, p) {
        return None;
    }
    let index = p.y.checked_mul(cols)?.checked_add(p.x)?;
    usize::try_from(index).ok()
}

/// `num / den` as a float, or 0 when the denominator is not positive.
///
/// Board coordinates are tiny, so both values are exactly representable
/// as `f32`.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn ratio(num: i32, den: i32) -> f32 {
    if den <= 0 {
        return 0.0;
    }
    num as f32 / den as f32
}

/// Saturating conversion of a distance to `i32`.
pub(crate) fn distance_i32(d: u32) -> i32 {
    i32::try_from(d).unwrap_or(i32::MAX)
}
