//! Definition of the variable module
//!
//! A `Variable` represents a discrete random variable in a Bayesian network, and an `Assignment`
//! represents a (possibly partial) assignment of outcome labels to `Variable`s. Evidence for a
//! query is simply a partial `Assignment`.

use crate::util::{InferenceError, Result};

use indexmap::IndexMap;

use std::fmt;


/// A named, discrete random variable with an ordered set of outcome labels.
///
/// The order of the outcomes is significant: it indexes the columns of the variable's CPT and
/// the digits of any parent-assignment row index in which the variable participates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variable {
    /// The name of the `Variable`, unique within a network
    name: String,

    /// The outcome labels, in declared order
    outcomes: Vec<String>
}

impl Variable {

    /// Construct a new `Variable`
    ///
    /// # Errors
    /// * `InferenceError::MalformedNetwork` if there are no outcomes or an outcome is repeated
    pub fn new<S: AsRef<str>>(name: &str, outcomes: &[S]) -> Result<Self> {
        let outcomes: Vec<String> = outcomes.iter().map(|o| String::from(o.as_ref())).collect();

        if outcomes.is_empty() {
            return Err(InferenceError::MalformedNetwork(
                format!("variable '{}' declares no outcomes", name)
            ));
        }

        for (i, o) in outcomes.iter().enumerate() {
            if outcomes[..i].contains(o) {
                return Err(InferenceError::MalformedNetwork(
                    format!("variable '{}' declares outcome '{}' twice", name, o)
                ));
            }
        }

        Ok(Variable { name: String::from(name), outcomes })
    }

    /// Get the name of the `Variable`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the outcome labels of the `Variable`, in declared order
    pub fn outcomes(&self) -> &[String] {
        &self.outcomes
    }

    /// Get the number of outcomes of the `Variable`
    pub fn cardinality(&self) -> usize {
        self.outcomes.len()
    }

    /// Get the label of the outcome at `idx`
    pub fn outcome(&self, idx: usize) -> Option<&str> {
        self.outcomes.get(idx).map(|o| o.as_str())
    }

    /// Find the position of an outcome label in the declared order
    ///
    /// # Errors
    /// * `InferenceError::UnknownOutcome` if `outcome` is not declared for this `Variable`
    pub fn index_of(&self, outcome: &str) -> Result<usize> {
        self.outcomes.iter().position(|o| o == outcome).ok_or_else(|| {
            InferenceError::UnknownOutcome {
                variable: self.name.clone(),
                outcome: String::from(outcome)
            }
        })
    }
}

impl fmt::Display for Variable {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {{{}}}", self.name, self.outcomes.join(", "))
    }

}


/// A partial assignment of outcome labels to variable names.
///
/// Entries are kept in insertion order, which is only used for display; every consumer treats an
/// `Assignment` as an unordered map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assignment {
    values: IndexMap<String, String>
}

/// Evidence for a conditional query.
pub type Evidence = Assignment;

impl Assignment {

    /// Construct an empty `Assignment`
    pub fn new() -> Self {
        Assignment { values: IndexMap::new() }
    }

    /// Assign `outcome` to `variable`, replacing any previous value
    pub fn set(&mut self, variable: &str, outcome: &str) {
        self.values.insert(String::from(variable), String::from(outcome));
    }

    /// Remove the value for `variable`, if any
    pub fn unset(&mut self, variable: &str) {
        self.values.shift_remove(variable);
    }

    /// Get the outcome assigned to `variable`
    pub fn get(&self, variable: &str) -> Option<&str> {
        self.values.get(variable).map(|o| o.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the `(variable, outcome)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse evidence from command-line style `variable=outcome` tokens.
    ///
    /// The names are not checked against any network here; that happens when the evidence is
    /// resolved by the `Network`.
    ///
    /// # Errors
    /// * `InferenceError::MalformedEvidence` if a token is not exactly `name=value` with both
    ///   sides non-empty
    /// * `InferenceError::InvalidArgument` if the same variable is given two different values
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        let mut evidence = Assignment::new();

        for token in tokens {
            let token = token.as_ref();
            let mut parts = token.split('=');

            let (name, value) = match (parts.next(), parts.next(), parts.next()) {
                (Some(n), Some(v), None) if !n.trim().is_empty() && !v.trim().is_empty() => {
                    (n.trim(), v.trim())
                },
                _ => return Err(InferenceError::MalformedEvidence(String::from(token)))
            };

            if let Some(prev) = evidence.get(name) {
                if prev != value {
                    return Err(InferenceError::InvalidArgument(
                        format!("conflicting evidence for '{}': '{}' and '{}'", name, prev, value)
                    ));
                }
            }

            evidence.set(name, value);
        }

        Ok(evidence)
    }
}

impl<'a> ::std::iter::FromIterator<(&'a str, &'a str)> for Assignment {

    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut a = Assignment::new();
        for (k, v) in iter {
            a.set(k, v);
        }
        a
    }

}

impl fmt::Display for Assignment {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }

}
