//! Defines a simple forward (prior) sampler for a `Network`
//!
//! Implementation of Koller & Friedman Algorithm 12.1 (pp 489)

use crate::model::{Instantiation, Network};
use crate::util::Result;
use super::Sampler;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A `Sampler` that draws full assignments from the prior of a `Network`, visiting the variables in
/// topological order and sampling each from the CPT row selected by its already-sampled parents.
///
/// The sampler owns its random source, so two samplers built from the same seed over the same
/// network produce the same sequence of samples.
pub struct ForwardSampler<'a, R: Rng = ChaCha8Rng> {

    /// The `Network` to sample
    model: &'a Network,

    /// The source of uniform variates
    rng: R

}


impl<'a> ForwardSampler<'a, ChaCha8Rng> {

    /// Construct a `ForwardSampler` driven by a `ChaCha8Rng` seeded with `seed`. The stream for a
    /// given seed is fixed by the ChaCha algorithm, not by the version of `rand`.
    pub fn seeded(model: &'a Network, seed: u64) -> Self {
        ForwardSampler::with_rng(model, ChaCha8Rng::seed_from_u64(seed))
    }

}

impl<'a, R: Rng> ForwardSampler<'a, R> {

    pub fn with_rng(model: &'a Network, rng: R) -> Self {
        ForwardSampler { model, rng }
    }

    /// The `Network` this sampler draws from
    pub fn model(&self) -> &'a Network {
        self.model
    }

    /// Draw a sample into an existing `Instantiation`, overwriting every value.
    pub fn sample_into(&mut self, a: &mut Instantiation) -> Result<()> {
        for &var in self.model.order().iter() {
            // this cannot fail, because we iterate in topological order so every parent of var
            // has already been given a value in this pass
            let row = self.model.row(var, a)?;
            let u: f64 = self.rng.gen();

            let outcome = self.model.node(var).cpt().sample(row, u);
            a.set(var, outcome);
        }

        Ok(())
    }
}

impl<'a, R: Rng> Sampler for ForwardSampler<'a, R> {

    fn sample(&mut self) -> Result<Instantiation> {
        let mut a = Instantiation::empty(self.model.len());
        self.sample_into(&mut a)?;
        Ok(a)
    }

}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::init::Initialization;
    use crate::model::NetworkBuilder;

    /// Example taken from Koller & Friedman Section 3.1.2, declared child-first
    fn student() -> Network {
        NetworkBuilder::new()
            .with_variable("S", &["low", "high"], &["I"], Initialization::Table(vec![0.95, 0.05, 0.2, 0.8]))
            .with_variable("I", &["low", "high"], &[], Initialization::Multinomial(&[0.7, 0.3]))
            .build()
            .unwrap()
    }

    #[test]
    fn sample() {
        let model = student();
        let mut sampler = ForwardSampler::seeded(&model, 11);

        for _ in 0..100 {
            let a = sampler.sample().unwrap();

            assert!(a.get(0).is_some());
            assert!(a.get(0).unwrap() <= 1);
            assert!(a.get(1).is_some());
            assert!(a.get(1).unwrap() <= 1);
        }
    }

    #[test]
    fn seeded_is_reproducible() {
        let model = student();
        let mut s1 = ForwardSampler::seeded(&model, 3);
        let mut s2 = ForwardSampler::seeded(&model, 3);

        for _ in 0..50 {
            assert_eq!(s1.sample().unwrap(), s2.sample().unwrap());
        }
    }

    #[test]
    /// Seeding goes through ChaCha8, whose stream is fixed for a given seed
    fn seeded_is_chacha8() {
        let model = student();
        let mut seeded = ForwardSampler::seeded(&model, 9);
        let mut explicit = ForwardSampler::with_rng(&model, ChaCha8Rng::seed_from_u64(9));

        assert!(std::ptr::eq(&model, seeded.model()));
        for _ in 0..50 {
            assert_eq!(seeded.sample().unwrap(), explicit.sample().unwrap());
        }
    }

    #[test]
    /// The child must be drawn from the row of its sampled parent, not a marginal
    fn conditional_rows() {
        let model = NetworkBuilder::new()
            .with_variable("A", &["t", "f"], &[], Initialization::Binomial(0.5))
            .with_variable("B", &["t", "f"], &["A"], Initialization::Table(vec![1.0, 0.0, 0.0, 1.0]))
            .build()
            .unwrap();

        let mut sampler = ForwardSampler::seeded(&model, 5);
        let mut buf = Instantiation::empty(model.len());
        let mut seen = [0; 2];
        for _ in 0..200 {
            sampler.sample_into(&mut buf).unwrap();
            assert_eq!(buf.get(0), buf.get(1));
            seen[buf.get(0).unwrap()] += 1;
        }

        // both branches of the root were visited
        assert!(seen[0] > 0 && seen[1] > 0);
    }

    #[test]
    fn frequencies() {
        let model = student();
        let mut sampler = ForwardSampler::seeded(&model, 1234);

        let n = 20_000;
        let mut high_i = 0;
        let mut high_s = 0;
        for _ in 0..n {
            let a = sampler.sample().unwrap();
            if a.get(1) == Some(1) { high_i += 1; }
            if a.get(0) == Some(1) { high_s += 1; }
        }

        // P(I = high) = 0.3, P(S = high) = 0.7 * 0.05 + 0.3 * 0.8 = 0.275
        assert!((high_i as f64 / n as f64 - 0.3).abs() < 0.02);
        assert!((high_s as f64 / n as f64 - 0.275).abs() < 0.02);
    }
}
