//! Building [`StepResponse`] values from engine state.
//!
//! Shared by the pool and the single environment so both surfaces encode
//! observations and attach render frames the same way.

use snake_sim::obs::encode;
use snake_sim::{SnakeEnv, StepOutcome};
use snake_types::{DeathCause, ObsType, SIGNAL_COUNT, StepResponse};

/// Response for a freshly reset board: zero signals, not done.
pub fn initial(env: &SnakeEnv, obs_type: ObsType, with_raw: bool) -> StepResponse {
    StepResponse {
        obs: encode(obs_type, &env.snapshot(), env.steps()),
        signals: [0.0; SIGNAL_COUNT],
        done: false,
        score: env.score(),
        length: env.len(),
        death: DeathCause::None,
        steps: env.steps(),
        raw_for_render: with_raw.then(|| env.raw_state()),
    }
}

/// Response for the tick that produced `outcome`.
pub fn stepped(
    env: &SnakeEnv,
    obs_type: ObsType,
    outcome: &StepOutcome,
    with_raw: bool,
) -> StepResponse {
    StepResponse {
        obs: encode(obs_type, &env.snapshot(), env.steps()),
        signals: outcome.signals,
        done: outcome.done,
        score: outcome.score,
        length: outcome.length,
        death: outcome.death,
        steps: outcome.steps,
        raw_for_render: with_raw.then(|| env.raw_state()),
    }
}

/// Echo of a cached terminal response: the same observation and game
/// fields with all signals zeroed.
///
/// The render frame is taken fresh from `env`; a frozen board never moves,
/// so it shows the terminal position.
pub fn echo(terminal: &StepResponse, env: &SnakeEnv, with_raw: bool) -> StepResponse {
    StepResponse {
        obs: terminal.obs.clone(),
        signals: [0.0; SIGNAL_COUNT],
        done: true,
        score: terminal.score,
        length: terminal.length,
        death: terminal.death,
        steps: terminal.steps,
        raw_for_render: with_raw.then(|| env.raw_state()),
    }
}
