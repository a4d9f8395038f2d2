//! Defines a `ConditionalInferenceEngine` for approximate inference by rejection sampling.
//!
//! Samples are drawn from the prior of the network with a `ForwardSampler`; samples that disagree
//! with the evidence are discarded and the query's outcomes are counted over the rest.

use crate::distribution::Distribution;
use crate::model::{Instantiation, Network};
use crate::samplers::ForwardSampler;
use crate::util::{normalize, InferenceError, Result};
use crate::variable::Assignment;
use super::ConditionalInferenceEngine;

use log::{debug, info};
use rand::Rng;
use rand_chacha::ChaCha8Rng;


/// An approximate `ConditionalInferenceEngine` for a `Network`, using rejection sampling.
///
/// The engine owns its random source. A freshly constructed engine with a given seed and sample
/// count answers a given query identically every time; successive queries on one engine continue
/// the same random stream.
pub struct RejectionSamplingEngine<'a, R: Rng = ChaCha8Rng> {

    /// The prior sampler, which also determines the model
    sampler: ForwardSampler<'a, R>,

    /// The number of samples to draw per query
    samples: usize

}


impl<'a> RejectionSamplingEngine<'a, ChaCha8Rng> {

    /// Construct an engine that draws `samples` samples per query from a `ChaCha8Rng` seeded with
    /// `seed`.
    ///
    /// # Errors
    /// * `InferenceError::InvalidArgument` if `samples` is zero
    pub fn new(model: &'a Network, samples: usize, seed: u64) -> Result<Self> {
        info!("rejection sampling with seed {}", seed);
        RejectionSamplingEngine::with_sampler(ForwardSampler::seeded(model, seed), samples)
    }

}

impl<'a, R: Rng> RejectionSamplingEngine<'a, R> {

    /// Construct an engine around an existing sampler. Queries are answered over the sampler's
    /// `Network`.
    ///
    /// # Errors
    /// * `InferenceError::InvalidArgument` if `samples` is zero
    pub fn with_sampler(sampler: ForwardSampler<'a, R>, samples: usize) -> Result<Self> {
        if samples == 0 {
            return Err(InferenceError::InvalidArgument(
                String::from("the number of samples must be positive")
            ));
        }

        Ok(RejectionSamplingEngine { sampler, samples })
    }

    /// The number of samples drawn per query
    pub fn samples(&self) -> usize {
        self.samples
    }
}


impl<'a, R: Rng> ConditionalInferenceEngine for RejectionSamplingEngine<'a, R> {

    fn infer(&mut self, query: &str, evidence: &Assignment) -> Result<Distribution> {
        let model = self.sampler.model();
        let q = model.index_of(query)?;
        let observed = model.resolve(evidence)?;
        let var = model.node(q).variable();

        info!(
            "rejection sampling query P({} | {}) with {} samples",
            query, evidence, self.samples
        );

        let mut counts = vec![0usize; var.cardinality()];
        let mut sample = Instantiation::empty(model.len());

        for _ in 0..self.samples {
            self.sampler.sample_into(&mut sample)?;

            if sample.agrees_with(&observed) {
                // the sample is complete, so the query always has a value
                if let Some(v) = sample.get(q) {
                    counts[v] += 1;
                }
            }
        }

        let accepted: usize = counts.iter().sum();
        debug!("accepted {} of {} samples: {:?}", accepted, self.samples, counts);

        if accepted == 0 {
            return Err(InferenceError::ZeroProbabilityEvidence);
        }

        let weights: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
        Ok(Distribution::new(var, normalize(&weights)?))
    }

}
