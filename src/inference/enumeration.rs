//! Defines a `ConditionalInferenceEngine` that answers conditional queries exactly, by summing the
//! joint distribution over every assignment to the hidden variables.
//!
//! Implementation of Enumeration-Ask, Russell & Norvig Figure 14.9

use crate::distribution::Distribution;
use crate::model::{Instantiation, Network};
use crate::util::{normalize, Result};
use crate::variable::Assignment;
use super::ConditionalInferenceEngine;

use log::{debug, info};


/// An exact `ConditionalInferenceEngine` for a `Network`.
///
/// The cost of a query is exponential in the number of hidden (non-query, non-evidence)
/// variables. Repeated queries against the same engine give bit-identical answers.
pub struct EnumerationEngine<'a> {

    /// The `Network` over which to perform inference
    model: &'a Network

}


impl<'a> EnumerationEngine<'a> {

    pub fn new(model: &'a Network) -> Self {
        EnumerationEngine { model }
    }


    /// Sum the product of conditionals over all extensions of `a` to the variables in `vars`.
    ///
    /// `vars` must be a suffix of an ancestrally closed set of variables listed in topological
    /// order, and `a` must assign every variable of that set that precedes it. Under that invariant
    /// the parents of the head of `vars` are always assigned when its CPT row is looked up.
    ///
    /// `a` is extended in place while a hidden variable is being summed out, and restored before
    /// returning, so each branch sees the same base assignment.
    fn enumerate_all(&self, vars: &[usize], a: &mut Instantiation) -> Result<f64> {
        let (y, rest) = match vars.split_first() {
            Some((&y, rest)) => (y, rest),
            None => return Ok(1.0)
        };

        let row = self.model.row(y, a)?;
        let cpt = self.model.node(y).cpt();

        if let Some(v) = a.get(y) {
            let p = cpt.value(row, v)?;
            // zero-probability branches contribute nothing
            if p == 0.0 {
                return Ok(0.0);
            }
            return Ok(p * self.enumerate_all(rest, a)?);
        }

        let mut sum = 0.0;
        for v in 0..cpt.cardinality() {
            let p = cpt.value(row, v)?;
            if p == 0.0 {
                continue;
            }

            a.set(y, v);
            let tail = self.enumerate_all(rest, a);
            a.unset(y);

            sum += p * tail?;
        }

        Ok(sum)
    }
}


impl<'a> ConditionalInferenceEngine for EnumerationEngine<'a> {

    fn infer(&mut self, query: &str, evidence: &Assignment) -> Result<Distribution> {
        let q = self.model.index_of(query)?;
        let mut working = self.model.resolve(evidence)?;

        info!("enumeration query P({} | {}) over {} variables", query, evidence, self.model.len());

        let node = self.model.node(q);
        let var = node.variable();
        let observed = working.get(q);

        // only the ancestral closure of the query and the evidence affects the answer
        let mut seeds = vec![q];
        seeds.extend(working.iter().map(|(i, _)| i));
        let keep = self.model.ancestral_closure(&seeds);
        let vars: Vec<usize> = self.model.order().iter().cloned().filter(|&i| keep[i]).collect();

        debug!("enumerating {} of {} variables", vars.len(), self.model.len());

        // a root with no relevant evidence: the posterior is its prior
        if vars.len() == 1 && observed.is_none() {
            return Ok(Distribution::new(var, node.cpt().row(0).to_vec()));
        }

        // P(Q = q, e) for each outcome q
        let mut joint = vec![0.0; var.cardinality()];
        for (v, slot) in joint.iter_mut().enumerate() {
            // if the query itself is observed, every other outcome is inconsistent with the evidence
            if observed.map_or(false, |o| o != v) {
                continue;
            }

            working.set(q, v);
            *slot = self.enumerate_all(&vars, &mut working)?;
        }

        debug!("unnormalized joint for {}: {:?}", query, joint);

        Ok(Distribution::new(var, normalize(&joint)?))
    }

}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::Initialization;
    use crate::model::NetworkBuilder;
    use crate::util::InferenceError;

    #[test]
    /// The query's outcome being observed gives a point mass
    fn observed_query() {
        let model = NetworkBuilder::new()
            .with_variable("A", &["t", "f"], &[], Initialization::Binomial(0.3))
            .build()
            .unwrap();

        let evidence = Assignment::parse(&["A=f"]).unwrap();
        let d = EnumerationEngine::new(&model).infer("A", &evidence).unwrap();
        assert_eq!(Some(0.0), d.get("t"));
        assert_eq!(Some(1.0), d.get("f"));
    }

    #[test]
    /// Summing out a hidden child leaves the prior of its parent
    fn hidden_child() {
        let model = NetworkBuilder::new()
            .with_variable("A", &["x", "y", "z"], &[], Initialization::Multinomial(&[0.2, 0.5, 0.3]))
            .with_variable("B", &["t", "f"], &["A"], Initialization::Random(99))
            .build()
            .unwrap();

        let d = EnumerationEngine::new(&model).infer("A", &Assignment::new()).unwrap();
        assert_eq!(vec![0.2, 0.5, 0.3], d.values());
    }

    #[test]
    /// Descendants that are neither queried nor observed do not perturb the answer, even when
    /// their rows only sum to one within tolerance
    fn barren_descendants() {
        let model = NetworkBuilder::new()
            .with_variable("A", &["t", "f"], &[], Initialization::Binomial(0.3))
            .with_variable("B", &["t", "f"], &["A"], Initialization::Table(vec![0.5, 0.5000005, 0.5, 0.5]))
            .with_variable("C", &["t", "f"], &["A"], Initialization::Table(vec![0.9, 0.1, 0.2, 0.8]))
            .build()
            .unwrap();
        let mut engine = EnumerationEngine::new(&model);

        let d = engine.infer("A", &Assignment::new()).unwrap();
        assert_eq!(Some(0.3), d.get("t"));
        assert_eq!(Some(0.7), d.get("f"));

        // B stays barren when C is observed
        let d = engine.infer("A", &Assignment::parse(&["C=t"]).unwrap()).unwrap();
        assert!((d.get("t").unwrap() - 0.27 / 0.41).abs() < 1e-12);
    }

    #[test]
    fn unknown_names() {
        let model = NetworkBuilder::new()
            .with_variable("A", &["t", "f"], &[], Initialization::Uniform)
            .build()
            .unwrap();
        let mut engine = EnumerationEngine::new(&model);

        match engine.infer("Q", &Assignment::new()) {
            Err(InferenceError::UnknownVariable(n)) => assert_eq!("Q", n),
            other => panic!("wrong result {:?}", other)
        }

        let evidence = Assignment::parse(&["B=t"]).unwrap();
        match engine.infer("A", &evidence) {
            Err(InferenceError::UnknownVariable(n)) => assert_eq!("B", n),
            other => panic!("wrong result {:?}", other)
        }

        let evidence = Assignment::parse(&["A=maybe"]).unwrap();
        match engine.infer("A", &evidence) {
            Err(InferenceError::UnknownOutcome { .. }) => (),
            other => panic!("wrong result {:?}", other)
        }
    }
}
