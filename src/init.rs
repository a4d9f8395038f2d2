//! Module containing initialization routines for the conditional probability tables of a network.

use crate::factor::{Cpt, Table};
use crate::util::{InferenceError, Result};

use ndarray::prelude as nd;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Defines possible ways to initialize a `Variable`s CPT.
#[derive(Clone, Debug)]
pub enum Initialization<'a> {
    /// A uniform distribution over the outcomes, in every row
    Uniform,

    /// Randomly initialize the rows of the CPT from the given seed.
    Random(u64),

    /// Initialize the CPT as a Binomial distribution with parameter ```p``` for the first outcome.
    /// Note that this `Initialization` is valid only for a binary `Variable` with no parents.
    Binomial(f64),

    /// Initialize the CPT as a Multinomial distribution with parameters ```p_0, p_1...```.
    /// Note that this `Initialization` is valid only for a `Variable` with no parents.
    Multinomial(&'a [f64]),

    /// User defined CPT, given as a flat row-major list of values (see `Cpt::new`)
    Table(Vec<f64>)
}


impl<'a> Initialization<'a> {

    /// Construct a CPT, initialized based on ```self```
    ///
    /// # Args
    /// * `cardinality`: the number of outcomes of the variable
    /// * `parent_shape`: the number of outcomes of each parent, in parent order
    ///
    /// # Returns
    /// a `Cpt` of shape ```prod(parent_shape) x cardinality```
    ///
    /// # Errors
    /// * `InferenceError::InvalidArgument` if a Binomial/Multinomial initialization is applied to a
    ///   variable with parents or of the wrong cardinality
    /// * `InferenceError::MalformedNetwork` if the resulting table is not a valid CPT
    pub fn build_cpt(self, cardinality: usize, parent_shape: &[usize]) -> Result<Cpt> {
        ///////////////////////////////////////////////////////////////////////////////
        // Check for errors
        match self {
            // A binomial distribution on a non-binary variable, or on a conditional one
            Initialization::Binomial(_) if cardinality != 2 || !parent_shape.is_empty() => {
                return Err(InferenceError::InvalidArgument(
                    String::from("a binomial initialization requires a binary root variable")
                ));
            },

            // A multinomial distribution with an incorrect number of parameters
            Initialization::Multinomial(ps) if ps.len() != cardinality || !parent_shape.is_empty() => {
                return Err(InferenceError::InvalidArgument(
                    format!(
                        "a multinomial initialization requires a root variable and {} parameters",
                        cardinality
                    )
                ));
            },

            _ => ()
        }

        ///////////////////////////////////////////////////////////////////////////////
        // now, build CPT
        let rows: usize = parent_shape.iter().product();

        match self {
            Initialization::Uniform => {
                let val = 1. / (cardinality as f64);
                Cpt::from_table(parent_shape, Table::from_elem((rows, cardinality), val))
            },
            Initialization::Random(seed) => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let tbl = Table::random_using((rows, cardinality), Uniform::new(1.0, 100.0), &mut rng);
                let z = tbl.sum_axis(nd::Axis(1)).insert_axis(nd::Axis(1));
                Cpt::from_table(parent_shape, &tbl / &z)
            },
            Initialization::Binomial(p) => {
                Cpt::new(cardinality, parent_shape, vec![p, 1.0 - p])
            },
            Initialization::Multinomial(ps) => {
                Cpt::new(cardinality, parent_shape, ps.to_vec())
            },
            Initialization::Table(values) => {
                Cpt::new(cardinality, parent_shape, values)
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_init() {
        let cpt = Initialization::Uniform.build_cpt(4, &[2, 3]).unwrap();
        assert_eq!(6, cpt.num_rows());

        for &v in cpt.table().iter() {
            assert!((v - 0.25).abs() < std::f64::EPSILON);
        }
    }

    #[test]
    fn random_init() {
        let cpt = Initialization::Random(7).build_cpt(3, &[2, 2]).unwrap();
        assert_eq!(4, cpt.num_rows());

        for row in cpt.table().outer_iter() {
            assert!((1.0 - row.sum()).abs() < 1e-9);
            assert!(row.iter().all(|&p| p > 0.0));
        }

        // the same seed gives the same table
        let again = Initialization::Random(7).build_cpt(3, &[2, 2]).unwrap();
        assert_eq!(cpt, again);
    }

    #[test]
    fn binomial_init() {
        let cpt = Initialization::Binomial(0.25).build_cpt(2, &[]).unwrap();
        assert_eq!(0.25, cpt.value(0, 0).unwrap());
        assert_eq!(0.75, cpt.value(0, 1).unwrap());

        assert!(Initialization::Binomial(0.25).build_cpt(3, &[]).is_err());
        assert!(Initialization::Binomial(0.25).build_cpt(2, &[2]).is_err());
    }

    #[test]
    fn multinomial_init() {
        let cpt = Initialization::Multinomial(&[0.2, 0.3, 0.5]).build_cpt(3, &[]).unwrap();
        assert_eq!(0.5, cpt.value(0, 2).unwrap());

        assert!(Initialization::Multinomial(&[0.5, 0.5]).build_cpt(3, &[]).is_err());
        assert!(Initialization::Multinomial(&[0.2, 0.3, 0.4]).build_cpt(3, &[]).is_err());
    }

    #[test]
    fn table_init() {
        let cpt = Initialization::Table(vec![0.9, 0.1, 0.2, 0.8]).build_cpt(2, &[2]).unwrap();
        assert_eq!(0.2, cpt.value(1, 0).unwrap());

        assert!(Initialization::Table(vec![0.9, 0.1]).build_cpt(2, &[2]).is_err());
    }
}
