//! Episode and target bindings for Python.

use numpy::{PyArray1, PyArray2, PyArrayMethods};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::{PlayerMode, TargetConfig, TargetError, TargetRng};
use crate::training::{make_batch_targets, Episode, Target, TargetBuilder, TargetMode};

pub(crate) fn to_py_err(err: TargetError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Python wrapper for TargetConfig.
#[pyclass(name = "TargetConfig")]
#[derive(Clone)]
pub struct PyTargetConfig(pub TargetConfig);

#[pymethods]
impl PyTargetConfig {
    /// Create a target configuration.
    ///
    /// # Arguments
    /// - action_space_size: Length of every policy vector
    /// - discount: Per-ply discount in (0, 1] (default: 1.0)
    /// - two_players: Alternate value signs every ply (default: True)
    /// - off_policy_correction: Sample hybrid horizons by importance ratio (default: False)
    /// - off_policy_ratio_limit: Cap for the episode ratio normalizer (default: 10.0)
    /// - reward_head: The network predicts rewards (default: False)
    /// - td_step0_policy_training: Keep policy labels at depth 0 in hybrid mode (default: False)
    #[new]
    #[pyo3(signature = (
        action_space_size,
        discount = 1.0,
        two_players = true,
        off_policy_correction = false,
        off_policy_ratio_limit = 10.0,
        reward_head = false,
        td_step0_policy_training = false
    ))]
    fn new(
        action_space_size: usize,
        discount: f64,
        two_players: bool,
        off_policy_correction: bool,
        off_policy_ratio_limit: f64,
        reward_head: bool,
        td_step0_policy_training: bool,
    ) -> PyResult<Self> {
        if !(discount > 0.0 && discount <= 1.0) {
            return Err(PyValueError::new_err("discount must be in (0, 1]"));
        }
        let mode = if two_players {
            PlayerMode::TwoPlayers
        } else {
            PlayerMode::SinglePlayer
        };
        Ok(Self(
            TargetConfig::new(action_space_size)
                .with_discount(discount)
                .with_player_mode(mode)
                .with_off_policy_correction(off_policy_correction)
                .with_off_policy_ratio_limit(off_policy_ratio_limit)
                .with_reward_head(reward_head)
                .with_td_step0_policy_training(td_step0_policy_training),
        ))
    }

    #[getter]
    fn action_space_size(&self) -> usize {
        self.0.action_space_size
    }

    #[getter]
    fn discount(&self) -> f64 {
        self.0.discount
    }

    fn __repr__(&self) -> String {
        format!(
            "TargetConfig(actions={}, discount={}, off_policy={})",
            self.0.action_space_size, self.0.discount, self.0.off_policy_correction
        )
    }
}

/// Python wrapper for Episode.
#[pyclass(name = "Episode")]
#[derive(Clone)]
pub struct PyEpisode(pub Episode);

#[pymethods]
impl PyEpisode {
    /// Create an episode from recorded self-play data.
    #[new]
    #[pyo3(signature = (
        actions,
        rewards,
        policy_targets,
        td_steps = 0,
        playout_policy = Vec::new(),
        root_value_targets = Vec::new(),
        root_values_from_initial_inference = Vec::new(),
        t_hybrid = None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        actions: Vec<usize>,
        rewards: Vec<f32>,
        policy_targets: Vec<Vec<f32>>,
        td_steps: usize,
        playout_policy: Vec<Vec<f32>>,
        root_value_targets: Vec<f32>,
        root_values_from_initial_inference: Vec<f32>,
        t_hybrid: Option<usize>,
    ) -> Self {
        let mut episode = Episode::new(td_steps)
            .with_actions(actions)
            .with_rewards(rewards)
            .with_policy_targets(policy_targets)
            .with_playout_policy(playout_policy)
            .with_root_value_targets(root_value_targets)
            .with_initial_inference_values(root_values_from_initial_inference);
        if let Some(t) = t_hybrid {
            episode = episode.with_hybrid(t);
        }
        Self(episode)
    }

    /// Deserialize an episode from replay-store bytes.
    #[staticmethod]
    fn decode(bytes: &[u8]) -> PyResult<Self> {
        Episode::decode(bytes).map(Self).map_err(to_py_err)
    }

    /// Serialize the episode to bytes.
    fn encode(&self) -> PyResult<Vec<u8>> {
        self.0.encode().map_err(to_py_err)
    }

    #[getter]
    fn actions(&self) -> Vec<usize> {
        self.0.actions.iter().copied().collect()
    }

    #[getter]
    fn rewards(&self) -> Vec<f32> {
        self.0.rewards.iter().copied().collect()
    }

    #[getter]
    fn root_values_from_initial_inference(&self) -> Vec<f32> {
        self.0.root_values_from_initial_inference.iter().copied().collect()
    }

    #[getter]
    fn hybrid(&self) -> bool {
        self.0.hybrid
    }

    /// Episode-level importance-ratio normalizer.
    fn p_ratio_max(&self) -> f64 {
        self.0.p_ratio_max()
    }

    /// Copy keeping the first `plies` plies.
    fn truncated(&self, plies: usize) -> Self {
        Self(self.0.truncated(plies))
    }

    /// Sum of squared differences of inferred root values.
    fn squared_value_drift(&self, other: &PyEpisode) -> f64 {
        self.0.squared_value_drift(&other.0)
    }

    fn __len__(&self) -> usize {
        self.0.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "Episode(plies={}, td_steps={}, hybrid={})",
            self.0.len(),
            self.0.td_steps,
            self.0.hybrid
        )
    }
}

/// Python wrapper for Target.
#[pyclass(name = "Target")]
#[derive(Clone)]
pub struct PyTarget(pub Target);

#[pymethods]
impl PyTarget {
    #[getter]
    fn value(&self) -> f32 {
        self.0.value
    }

    #[getter]
    fn reward(&self) -> f32 {
        self.0.reward
    }

    #[getter]
    fn policy(&self) -> Vec<f32> {
        self.0.policy.clone()
    }

    /// Get policy as numpy array.
    fn policy_numpy<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f32>> {
        PyArray1::from_slice_bound(py, &self.0.policy)
    }

    fn __repr__(&self) -> String {
        format!(
            "Target(value={:.3}, reward={:.3}, has_policy={})",
            self.0.value,
            self.0.reward,
            self.0.has_policy()
        )
    }
}

fn target_mode(reanalyse: bool) -> TargetMode {
    if reanalyse {
        TargetMode::Reanalyse
    } else {
        TargetMode::Fresh
    }
}

fn build_targets(
    episode: &PyEpisode,
    config: &PyTargetConfig,
    state_index: usize,
    num_unroll_steps: usize,
    reanalyse: bool,
    seed: u64,
) -> PyResult<Vec<Target>> {
    let mode = target_mode(reanalyse);
    let mut rng = TargetRng::new(seed);
    let builder = TargetBuilder::new(&episode.0, &config.0).map_err(to_py_err)?;
    builder
        .make_targets(state_index, num_unroll_steps, mode, &mut rng)
        .map_err(to_py_err)
}

/// Build targets for plies `state_index ..= state_index + num_unroll_steps`.
///
/// Raises ValueError for inconsistent episodes or when no off-policy
/// horizon is accepted; the caller should sample another episode.
#[pyfunction]
#[pyo3(signature = (episode, config, state_index, num_unroll_steps, reanalyse = false, seed = 0))]
pub fn make_targets(
    episode: &PyEpisode,
    config: &PyTargetConfig,
    state_index: usize,
    num_unroll_steps: usize,
    reanalyse: bool,
    seed: u64,
) -> PyResult<Vec<PyTarget>> {
    let targets = build_targets(episode, config, state_index, num_unroll_steps, reanalyse, seed)?;
    Ok(targets.into_iter().map(PyTarget).collect())
}

/// Build targets as numpy arrays for direct stacking into a batch.
///
/// Returns (values, rewards, policies):
/// - values: [K] float32
/// - rewards: [K] float32
/// - policies: [K, action_space_size] float32
/// where K = num_unroll_steps + 1.
#[pyfunction]
#[pyo3(signature = (episode, config, state_index, num_unroll_steps, reanalyse = false, seed = 0))]
#[allow(clippy::type_complexity)]
pub fn make_targets_numpy<'py>(
    py: Python<'py>,
    episode: &PyEpisode,
    config: &PyTargetConfig,
    state_index: usize,
    num_unroll_steps: usize,
    reanalyse: bool,
    seed: u64,
) -> PyResult<(
    Bound<'py, PyArray1<f32>>,
    Bound<'py, PyArray1<f32>>,
    Bound<'py, PyArray2<f32>>,
)> {
    let targets = build_targets(episode, config, state_index, num_unroll_steps, reanalyse, seed)?;

    let k = targets.len();
    let action_dim = config.0.action_space_size;
    let mut values = Vec::with_capacity(k);
    let mut rewards = Vec::with_capacity(k);
    let mut policies = Vec::with_capacity(k * action_dim);

    for (i, target) in targets.iter().enumerate() {
        if target.policy.len() != action_dim {
            return Err(PyValueError::new_err(format!(
                "policy at unroll step {} has length {}, expected {}",
                i,
                target.policy.len(),
                action_dim
            )));
        }
        values.push(target.value);
        rewards.push(target.reward);
        policies.extend_from_slice(&target.policy);
    }

    let policies = PyArray1::from_vec_bound(py, policies)
        .reshape([k, action_dim])
        .map_err(|e| PyValueError::new_err(format!("{}", e)))?;

    Ok((
        PyArray1::from_vec_bound(py, values),
        PyArray1::from_vec_bound(py, rewards),
        policies,
    ))
}

/// Build one target window per `(episodes[i], state_indices[i])` sample.
///
/// Each sample draws from its own stream forked from `seed`. A sample whose
/// episode is rejected comes back as None so the batch can skip it.
#[pyfunction]
#[pyo3(signature = (
    episodes,
    config,
    state_indices,
    num_unroll_steps,
    reanalyse = false,
    seed = 0
))]
pub fn make_targets_batch(
    episodes: Vec<PyEpisode>,
    config: &PyTargetConfig,
    state_indices: Vec<usize>,
    num_unroll_steps: usize,
    reanalyse: bool,
    seed: u64,
) -> PyResult<Vec<Option<Vec<PyTarget>>>> {
    if episodes.len() != state_indices.len() {
        return Err(PyValueError::new_err(format!(
            "{} episodes but {} state indices",
            episodes.len(),
            state_indices.len()
        )));
    }

    let samples: Vec<(&Episode, usize)> = episodes
        .iter()
        .zip(state_indices)
        .map(|(episode, state_index)| (&episode.0, state_index))
        .collect();
    let mut rng = TargetRng::new(seed);
    let batch = make_batch_targets(
        &samples,
        &config.0,
        num_unroll_steps,
        target_mode(reanalyse),
        &mut rng,
    );

    Ok(batch
        .into_iter()
        .enumerate()
        .map(|(i, result)| match result {
            Ok(targets) => Some(targets.into_iter().map(PyTarget).collect()),
            Err(e) => {
                log::warn!("dropping batch sample {}: {}", i, e);
                None
            }
        })
        .collect())
}
