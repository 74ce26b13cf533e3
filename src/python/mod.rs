//! Python bindings for the zero-targets engine.
//!
//! Lets a Python training loop build unroll-window targets from episodes
//! recorded by self-play.
//!
//! # Quick Start
//!
//! ```python
//! import zero_targets as zt
//!
//! config = zt.TargetConfig(action_space_size=9, discount=1.0)
//! episode = zt.Episode(actions=[4, 0, 8], rewards=[0.0, 0.0, 0.0],
//!                      policy_targets=[[1 / 9] * 9] * 3, td_steps=3)
//!
//! values, rewards, policies = zt.make_targets_numpy(episode, config,
//!                                                   state_index=0,
//!                                                   num_unroll_steps=5)
//! ```

use pyo3::prelude::*;

mod py_nn;
mod py_training;

pub use py_nn::*;
pub use py_training::*;

/// zero_targets: MuZero-style training target construction.
///
/// This module provides:
/// - Episode records and target configuration
/// - Unroll-window target construction (lists, numpy arrays, or batches)
/// - Replay re-analysis with a Python initial-inference callback
#[pymodule]
fn zero_targets(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTargetConfig>()?;
    m.add_class::<PyEpisode>()?;
    m.add_class::<PyTarget>()?;
    m.add_class::<PyInitialInference>()?;

    m.add_function(wrap_pyfunction!(make_targets, m)?)?;
    m.add_function(wrap_pyfunction!(make_targets_numpy, m)?)?;
    m.add_function(wrap_pyfunction!(make_targets_batch, m)?)?;
    m.add_function(wrap_pyfunction!(reanalyse_tictactoe, m)?)?;

    Ok(())
}
