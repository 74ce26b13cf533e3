//! Initial-inference bindings for Python.

use pyo3::prelude::*;

use crate::games::tictactoe::TicTacToe;
use crate::nn::{EncodedState, ErrorCapture, FallibleInference};
use crate::training::reanalyse_with_initial_inference;

use super::py_training::{to_py_err, PyEpisode};

/// Wraps a Python callable `f(tensor: List[float], shape: List[int]) -> float`
/// as an initial-inference network.
#[pyclass(name = "InitialInference")]
pub struct PyInitialInference {
    callback: PyObject,
}

#[pymethods]
impl PyInitialInference {
    #[new]
    fn new(callback: PyObject) -> Self {
        Self { callback }
    }
}

impl FallibleInference for PyInitialInference {
    type Error = PyErr;

    fn try_root_value(&self, observation: &EncodedState) -> PyResult<f32> {
        Python::with_gil(|py| {
            self.callback
                .call1(py, (observation.tensor.clone(), observation.shape.clone()))?
                .extract::<f32>(py)
        })
    }
}

/// Replay a tic-tac-toe episode and refresh its network root values.
///
/// Raises the first callback error of this replay if there was one, ahead of
/// any replay error it may have caused.
#[pyfunction]
pub fn reanalyse_tictactoe(
    episode: &PyEpisode,
    network: &PyInitialInference,
) -> PyResult<PyEpisode> {
    let capture = ErrorCapture::new(network);
    let replay = reanalyse_with_initial_inference(&episode.0, TicTacToe::new(), &capture);
    if let Some(err) = capture.into_error() {
        return Err(err);
    }
    replay.map(PyEpisode).map_err(to_py_err)
}
