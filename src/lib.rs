//! Exact and approximate inference on discrete Bayesian networks.
//!
//! A `Network` is loaded from an XMLBIF document (`xmlbif::load_file`) or assembled with a
//! `NetworkBuilder`, then queried for ```P(Q | E = e)``` through a `ConditionalInferenceEngine`:
//! either the exact `EnumerationEngine` or the sampling `RejectionSamplingEngine`.

pub mod util;
pub mod variable;
pub mod factor;
pub mod init;
pub mod model;
pub mod samplers;
pub mod inference;
pub mod distribution;
pub mod xmlbif;

pub use crate::util::{Result, InferenceError};
pub use crate::variable::{Assignment, Evidence, Variable};
pub use crate::factor::Cpt;
pub use crate::init::Initialization;
pub use crate::model::{Instantiation, Network, NetworkBuilder};
pub use crate::samplers::{ForwardSampler, Sampler};
pub use crate::inference::{ConditionalInferenceEngine, EnumerationEngine, RejectionSamplingEngine};
pub use crate::distribution::Distribution;
