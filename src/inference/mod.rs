//! Defines the interface to inference engines

use crate::distribution::Distribution;
use crate::variable::Assignment;
use crate::util::Result;

mod enumeration;
mod rejection;

pub use self::enumeration::EnumerationEngine;
pub use self::rejection::RejectionSamplingEngine;


/// A `ConditionalInferenceEngine` is capable of answering Conditional Probability Queries of the
/// form:
///     ```P(Q | E = e)```
/// for a single query variable `Q`.
pub trait ConditionalInferenceEngine {

    /// Infer the distribution ```P(query | evidence)``` over the outcomes of `query`
    ///
    /// # Errors
    /// * `InferenceError::UnknownVariable` if `query` or an evidence variable is not in the model
    /// * `InferenceError::UnknownOutcome` if an evidence value is not an outcome of its variable
    /// * `InferenceError::ZeroProbabilityEvidence` if the evidence is impossible under the model
    fn infer(&mut self, query: &str, evidence: &Assignment) -> Result<Distribution>;

}
