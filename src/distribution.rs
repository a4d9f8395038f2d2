//! Defines the `Distribution` returned by the inference engines: a normalized distribution over the
//! outcomes of a single query `Variable`, kept in the variable's declared outcome order.

use crate::variable::Variable;

use indexmap::IndexMap;

use std::fmt;


#[derive(Clone, Debug, PartialEq)]
pub struct Distribution {

    /// The name of the query variable
    variable: String,

    /// Outcome label to probability, in declared outcome order
    probabilities: IndexMap<String, f64>

}


impl Distribution {

    /// Pair the outcomes of `variable` with `probabilities`, position by position.
    ///
    /// The caller is responsible for normalization.
    pub fn new(variable: &Variable, probabilities: Vec<f64>) -> Self {
        debug_assert_eq!(variable.cardinality(), probabilities.len());

        Distribution {
            variable: String::from(variable.name()),
            probabilities: variable.outcomes().iter().cloned().zip(probabilities).collect()
        }
    }

    /// The name of the query variable
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// The probability of `outcome`, if it is an outcome of the query variable
    pub fn get(&self, outcome: &str) -> Option<f64> {
        self.probabilities.get(outcome).cloned()
    }

    /// Iterate over `(outcome, probability)` pairs in declared outcome order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.probabilities.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// The probabilities alone, in declared outcome order
    pub fn values(&self) -> Vec<f64> {
        self.probabilities.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// The most probable outcome. Ties go to the outcome declared first.
    pub fn most_probable(&self) -> Option<(&str, f64)> {
        self.iter().fold(None, |best, (o, p)| match best {
            Some((_, bp)) if bp >= p => best,
            _ => Some((o, p))
        })
    }

    /// The largest absolute difference between two distributions over the same outcomes.
    ///
    /// Outcomes missing from `other` are compared against zero.
    pub fn max_abs_diff(&self, other: &Distribution) -> f64 {
        self.iter()
            .map(|(o, p)| (p - other.get(o).unwrap_or(0.0)).abs())
            .fold(0.0, f64::max)
    }
}


/// Format `p` with enough decimals to show at least `digits` significant digits.
fn significant(p: f64, digits: usize) -> String {
    let decimals = if p > 0.0 && p < 1.0 {
        let magnitude = (-p.log10().floor()) as usize;
        digits + magnitude - 1
    } else {
        digits
    };

    format!("{:.*}", decimals, p)
}

impl fmt::Display for Distribution {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Probability distribution of '{}' given the evidence:", self.variable)?;
        for (o, p) in self.iter() {
            writeln!(f, "{}: {}", o, significant(p, 6))?;
        }
        Ok(())
    }

}


#[cfg(test)]
mod tests {
    use super::*;

    fn weather() -> Variable {
        Variable::new("Weather", &["sun", "rain", "snow"]).unwrap()
    }

    #[test]
    fn accessors() {
        let d = Distribution::new(&weather(), vec![0.5, 0.3, 0.2]);
        assert_eq!("Weather", d.variable());
        assert_eq!(3, d.len());
        assert_eq!(Some(0.3), d.get("rain"));
        assert_eq!(None, d.get("hail"));
        assert_eq!(vec!["sun", "rain", "snow"], d.iter().map(|(o, _)| o).collect::<Vec<_>>());
        assert_eq!(vec![0.5, 0.3, 0.2], d.values());
    }

    #[test]
    fn most_probable() {
        let d = Distribution::new(&weather(), vec![0.2, 0.5, 0.3]);
        assert_eq!(Some(("rain", 0.5)), d.most_probable());

        let tie = Distribution::new(&weather(), vec![0.4, 0.4, 0.2]);
        assert_eq!(Some(("sun", 0.4)), tie.most_probable());
    }

    #[test]
    fn diff() {
        let a = Distribution::new(&weather(), vec![0.5, 0.3, 0.2]);
        let b = Distribution::new(&weather(), vec![0.45, 0.35, 0.2]);
        assert!((a.max_abs_diff(&b) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn significant_digits() {
        assert_eq!("0.300000", significant(0.3, 6));
        assert_eq!("0.000123000", significant(0.000123, 6));
        assert_eq!("1.000000", significant(1.0, 6));
        assert_eq!("0.000000", significant(0.0, 6));
    }

    #[test]
    fn display() {
        let v = Variable::new("A", &["t", "f"]).unwrap();
        let d = Distribution::new(&v, vec![0.27 / 0.41, 0.14 / 0.41]);
        let expected = "Probability distribution of 'A' given the evidence:\n\
                        t: 0.658537\n\
                        f: 0.341463\n";
        assert_eq!(expected, d.to_string());
    }
}
