//! Network boundary.
//!
//! - **EncodedState**: flat tensor handed to the network
//! - **InitialInference**: root-value prediction used by re-analysis
//! - **ConstantValue**: baseline for tests
//! - **FallibleInference** / **ErrorCapture**: networks that can fail, with
//!   the first error kept per replay
//!
//! ```rust
//! use zero_targets::nn::{ConstantValue, EncodedState, InitialInference};
//!
//! let network = ConstantValue(0.5);
//! let value = network.root_value(&EncodedState::zeros(vec![3, 3, 3]));
//! assert_eq!(value, 0.5);
//! ```

pub mod traits;

pub use traits::{ConstantValue, EncodedState, ErrorCapture, FallibleInference, InitialInference};
