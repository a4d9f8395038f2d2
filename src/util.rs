//! Defines the `InferenceError` type for the bnquery library, along with small numeric helpers
//! shared by the inference engines.

use std::io;
use std::path::PathBuf;
use std::result;

use thiserror::Error;

pub type Result<T> = result::Result<T, InferenceError>;

/// Tolerance used when checking that a row of a conditional probability table sums to one.
pub const ROW_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Error)]
pub enum InferenceError {

    /// A variable name that is not declared in the network
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    /// An outcome label that is not declared for its variable
    #[error("unknown outcome '{outcome}' for variable '{variable}'")]
    UnknownOutcome { variable: String, outcome: String },

    /// The network violates one of its structural invariants (CPT shape, row sums, references)
    #[error("malformed network: {0}")]
    MalformedNetwork(String),

    /// The parent graph contains a cycle. Holds the variables that could not be ordered.
    #[error("cyclic network: no topological order exists over {0:?}")]
    CyclicNetwork(Vec<String>),

    /// A CPT lookup was attempted without a value for one of the variable's parents. Topological
    /// iteration should make this impossible, so seeing it indicates a bug.
    #[error("missing assignment to parent '{parent}' of variable '{variable}'")]
    MissingParentAssignment { variable: String, parent: String },

    /// The evidence has probability zero under the network (or every sample was rejected)
    #[error("the evidence has zero probability under the network")]
    ZeroProbabilityEvidence,

    /// A caller-supplied argument is outside its domain
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An evidence token that is not of the form `variable=outcome`
    #[error("malformed evidence '{0}', expected variable=outcome")]
    MalformedEvidence(String),

    /// The network file could not be read
    #[error("unable to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The network document is not well-formed XML
    #[error("unable to parse network document: {0}")]
    Parse(String),
}


/// Normalize a vector of non-negative weights so that it sums to one.
///
/// # Args
/// * `weights`: the unnormalized weights
///
/// # Returns
/// the weights divided by their sum
///
/// # Errors
/// * `InferenceError::ZeroProbabilityEvidence` if the weights sum to zero. Callers that can reach
///   an all-zero vector must branch on this rather than divide by zero.
pub fn normalize(weights: &[f64]) -> Result<Vec<f64>> {
    let z: f64 = weights.iter().sum();

    if z <= 0.0 || !z.is_finite() {
        return Err(InferenceError::ZeroProbabilityEvidence);
    }

    Ok(weights.iter().map(|w| w / z).collect())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_sums_to_one() {
        let p = normalize(&[1.0, 3.0]).unwrap();
        assert_eq!(p, vec![0.25, 0.75]);
    }

    #[test]
    fn normalize_tiny_weights() {
        // underflow-adjacent products are still normalized rather than treated as errors
        let p = normalize(&[1e-300, 3e-300]).unwrap();
        assert!((p[0] - 0.25).abs() < 1e-12);
        assert!((p[1] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn normalize_zero() {
        match normalize(&[0.0, 0.0]) {
            Err(InferenceError::ZeroProbabilityEvidence) => (),
            other => panic!("expected ZeroProbabilityEvidence, got {:?}", other)
        }
    }

    #[test]
    fn messages() {
        let e = InferenceError::UnknownOutcome {
            variable: String::from("A"),
            outcome: String::from("maybe")
        };
        assert_eq!(e.to_string(), "unknown outcome 'maybe' for variable 'A'");
        assert_eq!(
            InferenceError::UnknownVariable(String::from("Z")).to_string(),
            "unknown variable 'Z'"
        );
    }
}
