//! Network-side interfaces used by replay re-analysis.
//!
//! The network itself lives outside this crate. Re-analysis only needs the
//! initial-inference root value for each replayed position.

use std::fmt;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Encoded game position as a flat tensor for network input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodedState {
    /// Flattened tensor data (row-major order).
    pub tensor: Vec<f32>,

    /// Shape of the tensor (e.g., [planes, height, width]).
    pub shape: Vec<usize>,
}

impl EncodedState {
    /// Create a new encoded state.
    pub fn new(tensor: Vec<f32>, shape: Vec<usize>) -> Self {
        debug_assert_eq!(
            tensor.len(),
            shape.iter().product::<usize>(),
            "Tensor length must match shape product"
        );
        Self { tensor, shape }
    }

    /// Create a zero-filled encoded state with the given shape.
    pub fn zeros(shape: Vec<usize>) -> Self {
        let size = shape.iter().product();
        Self {
            tensor: vec![0.0; size],
            shape,
        }
    }

    /// Get element at a flat index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.tensor.get(index).copied()
    }
}

/// Initial inference: representation plus prediction at a root position.
///
/// Values are from the perspective of the player to move.
pub trait InitialInference: Send + Sync {
    /// Root value for one observation.
    fn root_value(&self, observation: &EncodedState) -> f32;
}

/// Network stand-in that returns the same value everywhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConstantValue(pub f32);

impl InitialInference for ConstantValue {
    fn root_value(&self, _observation: &EncodedState) -> f32 {
        self.0
    }
}

impl<F> InitialInference for F
where
    F: Fn(&EncodedState) -> f32 + Send + Sync,
{
    fn root_value(&self, observation: &EncodedState) -> f32 {
        self(observation)
    }
}

/// Initial inference that can fail, e.g. a callback into another runtime.
pub trait FallibleInference: Send + Sync {
    type Error: fmt::Display + Send;

    /// Root value for one observation, or the network's error.
    fn try_root_value(&self, observation: &EncodedState) -> Result<f32, Self::Error>;
}

/// Presents a [`FallibleInference`] as [`InitialInference`] for one replay.
///
/// A failed position yields 0 and the first error is kept. Build a fresh
/// capture per replay and check [`ErrorCapture::into_error`] afterwards, so
/// a failure is never attributed to a later replay.
pub struct ErrorCapture<'a, N: FallibleInference + ?Sized> {
    network: &'a N,
    first_error: Mutex<Option<N::Error>>,
}

impl<'a, N: FallibleInference + ?Sized> ErrorCapture<'a, N> {
    pub fn new(network: &'a N) -> Self {
        Self {
            network,
            first_error: Mutex::new(None),
        }
    }

    /// The first error raised during this replay, if any.
    pub fn into_error(self) -> Option<N::Error> {
        self.first_error.into_inner().ok().flatten()
    }
}

impl<N: FallibleInference + ?Sized> InitialInference for ErrorCapture<'_, N> {
    fn root_value(&self, observation: &EncodedState) -> f32 {
        match self.network.try_root_value(observation) {
            Ok(value) => value,
            Err(e) => {
                log::error!("initial inference failed: {}", e);
                if let Ok(mut slot) = self.first_error.lock() {
                    slot.get_or_insert(e);
                }
                0.0
            }
        }
    }
}
