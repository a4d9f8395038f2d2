//! Defines the `Network`, an immutable Bayesian network over discrete `Variable`s, along with the
//! `NetworkBuilder` used to assemble one and the topological ordering used by the engines.

use crate::factor::Cpt;
use crate::util::{InferenceError, Result};
use crate::variable::{Assignment, Variable};

use indexmap::IndexMap;

mod builder;
mod order;

pub use self::builder::NetworkBuilder;
pub use self::order::topological_order;


/// A `Variable` in a `Network`, with its parents and its CPT.
#[derive(Clone, Debug)]
pub struct Node {

    /// The random variable
    variable: Variable,

    /// The positions of the parents in the owning `Network`, in CPT order
    parents: Vec<usize>,

    /// ```P(variable | parents)```
    cpt: Cpt

}

impl Node {

    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    /// The positions of this node's parents in the owning `Network`, in CPT order
    pub fn parents(&self) -> &[usize] {
        &self.parents
    }

    pub fn cpt(&self) -> &Cpt {
        &self.cpt
    }
}


/// Represents a Bayesian Network - a Directed Probabilistic Graphical Model over discrete
/// `Variable`s.
///
/// # Representation
/// The DAG is not held as a separate graph structure; the parent list of each `Node` implicitly
/// defines its edges. Nodes are kept in declaration order and addressed by position, and a
/// topological order over those positions is computed once at build time.
///
/// A `Network` exposes no mutation after construction, so it may be shared freely between engines.
#[derive(Clone, Debug)]
pub struct Network {

    /// An optional name for the network
    name: Option<String>,

    /// The nodes, keyed by variable name
    nodes: IndexMap<String, Node>,

    /// Node positions, parents before children, ties broken by name
    order: Vec<usize>

}


impl Network {

    /// Get the name of the `Network`, if it has one
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().map(|n| n.as_str())
    }

    /// Lookup a `Variable` in the `Network` by name
    ///
    /// # Errors
    /// * `InferenceError::UnknownVariable` if there is no such variable
    pub fn get(&self, name: &str) -> Result<&Variable> {
        self.nodes.get(name)
                  .map(|n| &n.variable)
                  .ok_or_else(|| InferenceError::UnknownVariable(String::from(name)))
    }

    /// Get the names of all `Variable`s in the `Network`, in declaration order
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|k| k.as_str())
    }

    /// Get the number of `Variable`s in the `Network`
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the names of the parents of a `Variable`, in CPT order
    pub fn parents(&self, name: &str) -> Result<Vec<&str>> {
        let node = self.node(self.index_of(name)?);
        Ok(node.parents.iter().map(|&p| self.node(p).variable.name()).collect())
    }

    /// Get the CPT of a `Variable`
    pub fn cpt(&self, name: &str) -> Result<&Cpt> {
        Ok(&self.node(self.index_of(name)?).cpt)
    }

    /// Get the names of all `Variable`s so that every variable follows its parents. Ties are
    /// broken by name, so the order is fully determined by the network's content.
    pub fn topological_order(&self) -> Vec<&str> {
        self.order.iter().map(|&i| self.node(i).variable.name()).collect()
    }


    /// Compute ```P(name = outcome | Pa(name))``` where the parent values are taken from
    /// `assignment`.
    ///
    /// # Args
    /// * `name`: the variable
    /// * `outcome`: the outcome of `name` whose probability is wanted
    /// * `assignment`: any assignment that includes a value for every parent of `name`. Values for
    ///   other variables are ignored.
    ///
    /// # Errors
    /// * `InferenceError::UnknownVariable` if `name` is not in the network
    /// * `InferenceError::UnknownOutcome` if `outcome` or a parent's value is not declared
    /// * `InferenceError::MissingParentAssignment` if a parent has no value in `assignment`
    pub fn conditional_probability(&self, name: &str, outcome: &str, assignment: &Assignment) -> Result<f64> {
        let node = self.node(self.index_of(name)?);
        let o = node.variable.index_of(outcome)?;

        let row = node.cpt.row_index_by(|i| {
            let parent = &self.node(node.parents[i]).variable;
            let label = assignment.get(parent.name()).ok_or_else(|| {
                InferenceError::MissingParentAssignment {
                    variable: String::from(name),
                    parent: String::from(parent.name())
                }
            })?;
            parent.index_of(label)
        })?;

        node.cpt.value(row, o)
    }


    /// Determine the probability of a full `Assignment` to the `Variable`s in the `Network`, by the
    /// chain rule.
    ///
    /// # Errors
    /// * `InferenceError::InvalidArgument` if `assignment` is not a full assignment
    /// * any error from `resolve`
    pub fn joint_probability(&self, assignment: &Assignment) -> Result<f64> {
        let inst = self.resolve(assignment)?;

        let missing: Vec<&str> = (0..self.len())
            .filter(|&i| inst.get(i).is_none())
            .map(|i| self.node(i).variable.name())
            .collect();
        if !missing.is_empty() {
            return Err(InferenceError::InvalidArgument(
                format!("joint probability needs a full assignment, missing {:?}", missing)
            ));
        }

        (0..self.len()).try_fold(1.0, |acc, i| -> Result<f64> {
            // complete, so every value is present
            let outcome = inst.get(i).unwrap_or_default();
            Ok(acc * self.probability(i, outcome, &inst)?)
        })
    }


    /// Validate an assignment against the network and convert it to positional form.
    ///
    /// # Errors
    /// * `InferenceError::UnknownVariable` if a key is not a variable of the network
    /// * `InferenceError::UnknownOutcome` if a value is not an outcome of its variable
    pub fn resolve(&self, assignment: &Assignment) -> Result<Instantiation> {
        let mut inst = Instantiation::empty(self.len());

        for (name, outcome) in assignment.iter() {
            let idx = self.index_of(name)?;
            let o = self.node(idx).variable.index_of(outcome)?;
            inst.set(idx, o);
        }

        Ok(inst)
    }


    /// Convert a positional `Instantiation` back to labels.
    pub fn to_assignment(&self, inst: &Instantiation) -> Assignment {
        self.order.iter()
                  .filter_map(|&i| {
                      let var = &self.node(i).variable;
                      inst.get(i).and_then(|o| var.outcome(o)).map(|o| (var.name(), o))
                  })
                  .collect()
    }


    /// Get the position of a `Variable` in the `Network`
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.nodes.get_index_of(name).ok_or_else(|| InferenceError::UnknownVariable(String::from(name)))
    }

    /// Get the `Node` at a position
    ///
    /// # Panics
    /// if `idx` is out of range
    pub fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    /// Node positions in topological order
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Mark the nodes at `idxs` together with all of their ancestors.
    ///
    /// # Returns
    /// a flag per node position, `true` for the marked nodes
    pub fn ancestral_closure(&self, idxs: &[usize]) -> Vec<bool> {
        let mut marked = vec![false; self.len()];
        let mut stack: Vec<usize> = idxs.to_vec();

        while let Some(i) = stack.pop() {
            if marked[i] {
                continue;
            }
            marked[i] = true;
            stack.extend(self.node(i).parents.iter().filter(|&&p| !marked[p]));
        }

        marked
    }


    /// Find the CPT row of the node at `idx` selected by the parent values in `inst`.
    ///
    /// # Errors
    /// * `InferenceError::MissingParentAssignment` if a parent has no value in `inst`
    pub fn row(&self, idx: usize, inst: &Instantiation) -> Result<usize> {
        let node = self.node(idx);

        node.cpt.row_index_by(|i| {
            let p = node.parents[i];
            inst.get(p).ok_or_else(|| InferenceError::MissingParentAssignment {
                variable: String::from(node.variable.name()),
                parent: String::from(self.node(p).variable.name())
            })
        })
    }

    /// Positional form of `conditional_probability`
    pub fn probability(&self, idx: usize, outcome: usize, inst: &Instantiation) -> Result<f64> {
        let row = self.row(idx, inst)?;
        self.node(idx).cpt.value(row, outcome)
    }

}


/// A partial assignment of outcome positions to node positions of a particular `Network`.
///
/// This is the working representation the engines use while enumerating or sampling; it is
/// produced by `Network::resolve` and is only meaningful for the `Network` that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instantiation {
    values: Vec<Option<usize>>
}

impl Instantiation {

    /// An `Instantiation` over `n` nodes with no values set
    pub fn empty(n: usize) -> Self {
        Instantiation { values: vec![None; n] }
    }

    pub fn get(&self, idx: usize) -> Option<usize> {
        self.values.get(idx).cloned().unwrap_or(None)
    }

    pub fn set(&mut self, idx: usize, outcome: usize) {
        self.values[idx] = Some(outcome);
    }

    pub fn unset(&mut self, idx: usize) {
        self.values[idx] = None;
    }

    /// Iterate over the positions that have a value, with that value
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.values.iter().enumerate().filter_map(|(i, v)| v.map(|o| (i, o)))
    }

    /// Check that `self` has the same value as `other` wherever `other` has a value
    pub fn agrees_with(&self, other: &Instantiation) -> bool {
        other.iter().all(|(i, o)| self.get(i) == Some(o))
    }
}
