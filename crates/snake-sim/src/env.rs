//! The steppable Snake board.
//!
//! [`SnakeEnv`] owns one board: geometry, counters, the snake, the food,
//! an occupancy grid and a seeded random source used only for food
//! placement. [`SnakeEnv::step`] advances it by exactly one tick.
//!
//! # Tick order
//!
//! 1. Apply the turn (if any) and compute the candidate head cell.
//! 2. Measure the Chebyshev distance from head to food.
//! 3. Count the step, then test timeout, then walls, then the body. The
//!    first hit is the death cause and nothing moves.
//! 4. Otherwise advance: the old head becomes the neck, and the tail is
//!    dropped unless the food was eaten.
//! 5. Report progress toward the food as the distance change over the
//!    longer board side.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use snake_types::{Action, DeathCause, Direction, Point, RawState, Signals};
use tracing::{debug, trace};

use crate::error::SimError;
use crate::snapshot::{Snapshot, cell_index, distance_i32, in_bounds, ratio};

/// Narrowest board that can hold the starting snake.
pub const MIN_COLS: i32 = 4;

/// Seed used when none (or zero) is supplied.
pub const DEFAULT_SEED: u64 = 1;

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// `[ate, died, step_cost, progress, turned, timed_out]`.
    pub signals: Signals,
    /// Whether the episode ended on this tick.
    pub done: bool,
    /// Food eaten this episode.
    pub score: u32,
    /// Snake length including the head.
    pub length: u32,
    /// Terminal condition, [`DeathCause::None`] while alive.
    pub death: DeathCause,
    /// Steps taken this episode, including this one.
    pub steps: u32,
}

/// One Snake board and its owned random source.
#[derive(Debug, Clone)]
pub struct SnakeEnv {
    /// Board width.
    cols: i32,
    /// Board height.
    rows: i32,
    /// Steps allowed per unit of length before a timeout.
    timeout_mult: u32,
    /// Row-major occupancy: true iff the cell is the head or in the body.
    occupancy: Vec<bool>,
    /// Food placement generator.
    rng: StdRng,
    /// Head cell.
    head: Point,
    /// Food cell.
    food: Point,
    /// Body from neck (front) to tail (back), excluding the head.
    body: VecDeque<Point>,
    /// Current heading.
    dir: Direction,
    /// Steps taken this episode.
    steps: u32,
    /// Food eaten this episode.
    score: u32,
}

impl SnakeEnv {
    /// Create a board, seeded with [`DEFAULT_SEED`] and already reset.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::BoardTooSmall`] when the starting snake does not
    /// fit, or [`SimError::BoardTooLarge`] when the cell count overflows.
    pub fn new(cols: i32, rows: i32, timeout_mult: u32) -> Result<Self, SimError> {
        if cols < MIN_COLS || rows < 1 {
            return Err(SimError::BoardTooSmall {
                cols,
                rows,
                min_cols: MIN_COLS,
            });
        }
        let cells = cols
            .checked_mul(rows)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or(SimError::BoardTooLarge { cols, rows })?;

        let mut env = Self {
            cols,
            rows,
            timeout_mult,
            occupancy: vec![false; cells],
            rng: StdRng::seed_from_u64(DEFAULT_SEED),
            head: Point::default(),
            food: Point::default(),
            body: VecDeque::new(),
            dir: Direction::Right,
            steps: 0,
            score: 0,
        };
        env.reset();
        Ok(env)
    }

    /// Replace the random source. Zero is coerced to [`DEFAULT_SEED`].
    ///
    /// The board itself is untouched; call [`SnakeEnv::reset`] to start a
    /// new episode from this seed.
    pub fn seed(&mut self, seed: u64) {
        let seed = if seed == 0 { DEFAULT_SEED } else { seed };
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Start a new episode: snake of length 3 heading right from the board
    /// centre, counters zeroed, food placed.
    pub fn reset(&mut self) {
        self.occupancy.fill(false);
        self.steps = 0;
        self.score = 0;
        self.dir = Direction::Right;
        self.head = Point::new(self.cols / 2, self.rows / 2);
        self.body.clear();
        self.body.push_back(self.head.offset(-1, 0));
        self.body.push_back(self.head.offset(-2, 0));

        self.set_occupied(self.head, true);
        let body: Vec<Point> = self.body.iter().copied().collect();
        for p in body {
            self.set_occupied(p, true);
        }
        self.place_food();
    }

    /// Advance the board by one tick.
    ///
    /// Never fails: walls, self-collision and timeouts come back as a
    /// terminal [`StepOutcome`].
    pub fn step(&mut self, action: Action) -> StepOutcome {
        let turned = action.is_turn();
        self.dir = action.apply(self.dir);

        let before = self.head.chebyshev(self.food);
        let next = self.head.step(self.dir);

        self.steps = self.steps.saturating_add(1);
        let limit = u64::from(self.timeout_mult).saturating_mul(u64::from(self.len().max(1)));

        let death = if u64::from(self.steps) > limit {
            DeathCause::Timeout
        } else if !in_bounds(self.cols, self.rows, next) {
            DeathCause::Wall
        } else if self.is_occupied(next) {
            DeathCause::SelfCollision
        } else {
            DeathCause::None
        };

        if death != DeathCause::None {
            debug!(
                cause = death.label(),
                score = self.score,
                steps = self.steps,
                "Episode ended"
            );
            return self.terminal(death, turned);
        }

        self.body.push_front(self.head);
        self.set_occupied(self.head, true);
        self.head = next;

        let ate = self.head == self.food;
        if ate {
            self.score = self.score.saturating_add(1);
            self.set_occupied(self.head, true);
            self.place_food();
        } else {
            if let Some(tail) = self.body.pop_back() {
                self.set_occupied(tail, false);
            }
            self.set_occupied(self.head, true);
        }

        let after = self.head.chebyshev(self.food);
        let delta = distance_i32(before).saturating_sub(distance_i32(after));
        let progress = ratio(delta, self.cols.max(self.rows));

        trace!(
            head_x = self.head.x,
            head_y = self.head.y,
            ate,
            steps = self.steps,
            "Tick"
        );

        StepOutcome {
            signals: [ate.into(), 0.0, 1.0, progress, turned.into(), 0.0],
            done: false,
            score: self.score,
            length: self.len(),
            death: DeathCause::None,
            steps: self.steps,
        }
    }

    /// Copy the current geometry into an immutable [`Snapshot`].
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(
            self.cols,
            self.rows,
            self.head,
            self.dir,
            self.food,
            self.body.iter().copied().collect(),
        )
    }

    /// Current geometry as unnormalized raw state.
    pub fn raw_state(&self) -> RawState {
        RawState {
            cols: self.cols,
            rows: self.rows,
            step: self.steps,
            head: self.head,
            dir: self.dir,
            body: self.body.iter().copied().collect(),
            food: self.food,
        }
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    /// Board width.
    pub const fn cols(&self) -> i32 {
        self.cols
    }

    /// Board height.
    pub const fn rows(&self) -> i32 {
        self.rows
    }

    /// Steps allowed per unit of length before a timeout.
    pub const fn timeout_mult(&self) -> u32 {
        self.timeout_mult
    }

    /// Steps taken this episode.
    pub const fn steps(&self) -> u32 {
        self.steps
    }

    /// Food eaten this episode.
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Current heading.
    pub const fn direction(&self) -> Direction {
        self.dir
    }

    /// Head cell.
    pub const fn head(&self) -> Point {
        self.head
    }

    /// Food cell.
    pub const fn food(&self) -> Point {
        self.food
    }

    /// Body cells from neck to tail, excluding the head.
    pub fn body(&self) -> impl ExactSizeIterator<Item = Point> + '_ {
        self.body.iter().copied()
    }

    /// Snake length including the head.
    pub fn len(&self) -> u32 {
        u32::try_from(self.body.len())
            .unwrap_or(u32::MAX)
            .saturating_add(1)
    }

    /// Whether `p` is the head or part of the body.
    pub fn is_occupied(&self, p: Point) -> bool {
        cell_index(self.cols, self.rows, p)
            .and_then(|i| self.occupancy.get(i))
            .copied()
            .unwrap_or(false)
    }

    // -------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------

    fn set_occupied(&mut self, p: Point, value: bool) {
        if let Some(cell) =
            cell_index(self.cols, self.rows, p).and_then(|i| self.occupancy.get_mut(i))
        {
            *cell = value;
        }
    }

    /// Terminal outcome; the board is left exactly as it was.
    fn terminal(&self, death: DeathCause, turned: bool) -> StepOutcome {
        StepOutcome {
            signals: [
                0.0,
                1.0,
                1.0,
                0.0,
                turned.into(),
                (death == DeathCause::Timeout).into(),
            ],
            done: true,
            score: self.score,
            length: self.len(),
            death,
            steps: self.steps,
        }
    }

    /// Uniform rejection sampling over the whole board until a free cell
    /// that is not the head comes up.
    fn place_food(&mut self) {
        // The head is always occupied here, so any free cell qualifies.
        if self.occupancy.iter().all(|occupied| *occupied) {
            return;
        }
        loop {
            let x = self.rng.random_range(0..self.cols);
            let y = self.rng.random_range(0..self.rows);
            let candidate = Point::new(x, y);
            if !self.is_occupied(candidate) && candidate != self.head {
                self.food = candidate;
                return;
            }
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::float_cmp
)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn make_env(cols: i32, rows: i32, timeout_mult: u32, seed: u64) -> SnakeEnv {
        let mut env = SnakeEnv::new(cols, rows, timeout_mult).unwrap();
        env.seed(seed);
        env.reset();
        env
    }

    /// Overwrite the snake and food, rebuilding the occupancy grid.
    fn arrange(env: &mut SnakeEnv, head: Point, dir: Direction, body: &[Point], food: Point) {
        env.occupancy.fill(false);
        env.head = head;
        env.dir = dir;
        env.body = body.iter().copied().collect();
        env.food = food;
        env.set_occupied(head, true);
        for p in body {
            env.set_occupied(*p, true);
        }
    }

    fn occupied_cells(env: &SnakeEnv) -> BTreeSet<Point> {
        let mut cells = BTreeSet::new();
        for y in 0..env.rows() {
            for x in 0..env.cols() {
                let p = Point::new(x, y);
                if env.is_occupied(p) {
                    cells.insert(p);
                }
            }
        }
        cells
    }

    fn snake_cells(env: &SnakeEnv) -> BTreeSet<Point> {
        core::iter::once(env.head()).chain(env.body()).collect()
    }

    #[test]
    fn rejects_boards_that_cannot_hold_the_snake() {
        assert!(matches!(
            SnakeEnv::new(3, 10, 150),
            Err(SimError::BoardTooSmall { .. })
        ));
        assert!(matches!(
            SnakeEnv::new(10, 0, 150),
            Err(SimError::BoardTooSmall { .. })
        ));
        assert!(SnakeEnv::new(4, 1, 150).is_ok());
    }

    #[test]
    fn reset_places_snake_in_the_centre() {
        let env = make_env(10, 10, 150, 1);
        assert_eq!(env.head(), Point::new(5, 5));
        assert_eq!(
            env.body().collect::<Vec<_>>(),
            vec![Point::new(4, 5), Point::new(3, 5)]
        );
        assert_eq!(env.direction(), Direction::Right);
        assert_eq!(env.score(), 0);
        assert_eq!(env.steps(), 0);
        assert_eq!(env.len(), 3);
        assert!(!env.is_occupied(env.food()));
        assert_ne!(env.food(), env.head());
        assert_eq!(occupied_cells(&env), snake_cells(&env));
    }

    #[test]
    fn reset_is_valid_on_many_board_sizes() {
        for cols in 4..12 {
            for rows in 1..9 {
                for seed in 0..4 {
                    let env = make_env(cols, rows, 150, seed);
                    let cells = snake_cells(&env);
                    assert_eq!(cells.len(), 3, "distinct segments on {cols}x{rows}");
                    assert!(cells.iter().all(|p| in_bounds(cols, rows, *p)));
                    assert!(!cells.contains(&env.food()));
                    assert!(in_bounds(cols, rows, env.food()));
                }
            }
        }
    }

    #[test]
    fn straight_step_from_reset() {
        let mut env = make_env(10, 10, 150, 1);
        let food = env.food();
        let out = env.step(Action::Straight);

        assert_eq!(env.head(), Point::new(6, 5));
        assert_eq!(env.direction(), Direction::Right);
        assert!(!out.done);
        assert_eq!(out.death, DeathCause::None);
        assert_eq!(out.steps, 1);
        if food == Point::new(6, 5) {
            assert_eq!(out.score, 1);
            assert_eq!(out.length, 4);
        } else {
            assert_eq!(out.score, 0);
            assert_eq!(out.length, 3);
            assert!(!env.is_occupied(Point::new(3, 5)));
            assert!(out.signals[0].abs() < f32::EPSILON);
        }
        assert!(out.signals[1].abs() < f32::EPSILON);
        assert!((out.signals[2] - 1.0).abs() < f32::EPSILON);
        assert!(out.signals[4].abs() < f32::EPSILON);
        assert!(out.signals[5].abs() < f32::EPSILON);
    }

    #[test]
    fn progress_is_distance_change_over_longest_side() {
        let mut env = make_env(10, 8, 150, 1);
        arrange(
            &mut env,
            Point::new(5, 5),
            Direction::Right,
            &[Point::new(4, 5), Point::new(3, 5)],
            Point::new(8, 5),
        );
        let out = env.step(Action::Straight);
        assert!((out.signals[3] - 0.1).abs() < 1e-6);

        // Heading up from (6,5) to (6,4) keeps the food 2 cells away.
        let out = env.step(Action::TurnLeft);
        assert!(out.signals[3].abs() < 1e-6);
        assert!((out.signals[4] - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn eating_grows_the_snake_and_replaces_food() {
        let mut env = make_env(10, 10, 150, 7);
        arrange(
            &mut env,
            Point::new(5, 5),
            Direction::Right,
            &[Point::new(4, 5), Point::new(3, 5)],
            Point::new(6, 5),
        );
        let out = env.step(Action::Straight);
        assert!(!out.done);
        assert_eq!(out.score, 1);
        assert_eq!(out.length, 4);
        assert!((out.signals[0] - 1.0).abs() < f32::EPSILON);
        assert!(env.is_occupied(Point::new(3, 5)));
        assert!(!snake_cells(&env).contains(&env.food()));
        assert_eq!(occupied_cells(&env), snake_cells(&env));
    }

    #[test]
    fn four_right_turns_restore_the_heading() {
        let mut env = make_env(20, 20, 150, 3);
        for _ in 0..4 {
            env.step(Action::TurnRight);
        }
        assert_eq!(env.direction(), Direction::Right);

        let mut env = make_env(20, 20, 150, 3);
        for _ in 0..4 {
            env.step(Action::TurnLeft);
        }
        assert_eq!(env.direction(), Direction::Right);
    }

    #[test]
    fn wall_death_leaves_board_untouched() {
        let mut env = make_env(10, 10, 150, 1);
        arrange(
            &mut env,
            Point::new(9, 5),
            Direction::Right,
            &[Point::new(8, 5), Point::new(7, 5)],
            Point::new(0, 0),
        );
        let out = env.step(Action::Straight);
        assert!(out.done);
        assert_eq!(out.death, DeathCause::Wall);
        assert_eq!(out.signals, [0.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(env.head(), Point::new(9, 5));
        assert_eq!(out.length, 3);
        assert_eq!(out.steps, 1);
    }

    #[test]
    fn running_into_the_body_is_self_collision() {
        let mut env = make_env(10, 10, 150, 1);
        // A hook: turning right from (5,5) heading up lands on (6,5).
        arrange(
            &mut env,
            Point::new(5, 5),
            Direction::Up,
            &[
                Point::new(5, 6),
                Point::new(6, 6),
                Point::new(6, 5),
                Point::new(6, 4),
            ],
            Point::new(0, 0),
        );
        let out = env.step(Action::TurnRight);
        assert!(out.done);
        assert_eq!(out.death, DeathCause::SelfCollision);
        assert!((out.signals[4] - 1.0).abs() < f32::EPSILON);
        assert_eq!(env.direction(), Direction::Right);
        assert_eq!(env.head(), Point::new(5, 5));
    }

    #[test]
    fn moving_into_the_current_tail_is_a_collision() {
        let mut env = make_env(10, 10, 150, 1);
        arrange(
            &mut env,
            Point::new(5, 5),
            Direction::Up,
            &[Point::new(5, 6), Point::new(6, 6), Point::new(6, 5)],
            Point::new(0, 0),
        );
        let out = env.step(Action::TurnRight);
        assert_eq!(out.death, DeathCause::SelfCollision);
    }

    #[test]
    fn timeout_wins_over_wall() {
        let mut env = make_env(10, 10, 0, 1);
        arrange(
            &mut env,
            Point::new(9, 5),
            Direction::Right,
            &[Point::new(8, 5), Point::new(7, 5)],
            Point::new(0, 0),
        );
        let out = env.step(Action::Straight);
        assert!(out.done);
        assert_eq!(out.death, DeathCause::Timeout);
        assert_eq!(out.signals, [0.0, 1.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn timeout_scales_with_length() {
        let mut env = make_env(30, 30, 1, 1);
        arrange(
            &mut env,
            Point::new(5, 5),
            Direction::Right,
            &[Point::new(4, 5), Point::new(3, 5)],
            Point::new(0, 29),
        );
        // Limit is 1 * 3 steps.
        for _ in 0..3 {
            assert!(!env.step(Action::Straight).done);
        }
        let out = env.step(Action::Straight);
        assert_eq!(out.death, DeathCause::Timeout);
        assert_eq!(out.steps, 4);
    }

    #[test]
    fn full_board_keeps_food_in_place() {
        // On a 4x1 board the only free cell is right of the head.
        let mut env = make_env(4, 1, 150, 1);
        assert_eq!(env.food(), Point::new(3, 0));
        let out = env.step(Action::Straight);
        assert!(!out.done);
        assert_eq!(out.score, 1);
        assert_eq!(out.length, 4);
        let out = env.step(Action::Straight);
        assert_eq!(out.death, DeathCause::Wall);
    }

    #[test]
    fn occupancy_tracks_snake_through_play() {
        let mut env = make_env(12, 9, 150, 11);
        let actions = [0, 0, 1, 0, 2, 2, 0, 1, 0, 0, 1, 1, 0, 2, 0, 0, 0, 1];
        for code in actions {
            let length_before = env.len();
            let out = env.step(Action::from_code(code));
            if out.done {
                break;
            }
            assert_eq!(occupied_cells(&env), snake_cells(&env));
            let grown = out.signals[0] > 0.5;
            assert_eq!(out.length, if grown { length_before + 1 } else { length_before });
            assert!(!env.is_occupied(env.food()));
        }
    }

    #[test]
    fn zero_seed_behaves_like_default_seed() {
        let a = make_env(15, 15, 150, 0);
        let b = make_env(15, 15, 150, DEFAULT_SEED);
        assert_eq!(a.food(), b.food());
    }

    #[test]
    fn raw_state_mirrors_accessors() {
        let mut env = make_env(10, 10, 150, 5);
        env.step(Action::Straight);
        let raw = env.raw_state();
        assert_eq!(raw.cols, 10);
        assert_eq!(raw.step, env.steps());
        assert_eq!(raw.head, env.head());
        assert_eq!(raw.dir, env.direction());
        assert_eq!(raw.body, env.body().collect::<Vec<_>>());
        assert_eq!(raw.food, env.food());
    }
}
