//! An implementation of the [builder pattern] for creating a `Network`.
//!
//! [builder pattern]: https://en.wikipedia.org/wiki/Builder_pattern

use super::{topological_order, Network, Node};
use crate::init::Initialization;
use crate::util::{InferenceError, Result};
use crate::variable::Variable;

use indexmap::IndexMap;
use log::debug;


/// A variable declared to the builder, not yet checked against the rest of the network
struct Declaration<'a> {
    variable: Variable,
    parents: Vec<String>,
    init: Initialization<'a>
}


/// Assembles a `Network` from variable declarations.
///
/// Unlike a model assembled by hand, declarations may arrive in any order: a variable may name a
/// parent that is declared later. Every structural check that needs the whole network (missing
/// parents, CPT shapes, cycles) runs in `build`.
pub struct NetworkBuilder<'a> {

    /// The name of the network
    name: Option<String>,

    /// The declared variables, in declaration order
    decls: IndexMap<String, Declaration<'a>>,

    /// The error state of the builder
    err: Option<InferenceError>

}


impl<'a> NetworkBuilder<'a> {

    /// Construct a new `NetworkBuilder` representing an empty `Network`
    pub fn new() -> Self {
        NetworkBuilder {
            name: None,
            decls: IndexMap::new(),
            err: None
        }
    }


    /// Name the `Network`
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(String::from(name));
        self
    }


    /// Add a named `Variable` to the `Network`.
    ///
    /// # Args
    /// * `name`: the name for the variable
    /// * `outcomes`: the outcome labels of the variable, in the order used to index its CPT
    /// * `parents`: the names of the parent variables, in the order used to index the CPT rows
    /// * `init`: the initialization mechanism for the CPT of the variable
    pub fn with_variable(
        mut self,
        name: &str,
        outcomes: &[&str],
        parents: &[&str],
        init: Initialization<'a>,
    ) -> Self {
        ///////////////////////////////////////////////////////////////////////
        // 1) if we are in an error state, do nothing
        if self.err.is_some() {
            return self;
        }

        ///////////////////////////////////////////////////////////////////////
        // 2) Check for error conditions local to this declaration
        if self.decls.contains_key(name) {
            self.err = Some(InferenceError::MalformedNetwork(
                format!("variable '{}' is declared twice", name)
            ));
            return self;
        }

        let variable = match Variable::new(name, outcomes) {
            Ok(v) => v,
            Err(e) => {
                self.err = Some(e);
                return self;
            }
        };

        for (i, p) in parents.iter().enumerate() {
            if *p == name || parents[..i].contains(p) {
                self.err = Some(InferenceError::MalformedNetwork(
                    format!("variable '{}' lists '{}' as a parent more than once or of itself", name, p)
                ));
                return self;
            }
        }

        ///////////////////////////////////////////////////////////////////////
        // 3) Record the declaration
        let parents = parents.iter().map(|p| String::from(*p)).collect();
        self.decls.insert(String::from(name), Declaration { variable, parents, init });

        self
    }


    /// Complete building the network.
    ///
    /// # Returns
    /// the `Network`, or the first error generated during the building process
    ///
    /// # Errors
    /// * `InferenceError::MalformedNetwork` if a parent is not declared or a CPT is invalid
    /// * `InferenceError::CyclicNetwork` if the parent graph has a cycle
    ///
    /// # Postcondition
    /// This call consumes the `NetworkBuilder`
    pub fn build(self) -> Result<Network> {
        if let Some(e) = self.err {
            return Err(e);
        }

        ///////////////////////////////////////////////////////////////////////
        // 1) Resolve parent names to positions
        let mut parent_idxs: Vec<Vec<usize>> = Vec::with_capacity(self.decls.len());
        for (name, decl) in self.decls.iter() {
            let idxs = decl.parents.iter().map(|p| {
                self.decls.get_index_of(p.as_str()).ok_or_else(|| {
                    InferenceError::MalformedNetwork(
                        format!("variable '{}' has undeclared parent '{}'", name, p)
                    )
                })
            }).collect::<Result<Vec<usize>>>()?;

            parent_idxs.push(idxs);
        }

        ///////////////////////////////////////////////////////////////////////
        // 2) Order the graph, which also rejects cycles
        let names: Vec<&str> = self.decls.keys().map(|k| k.as_str()).collect();
        let order = topological_order(&names, &parent_idxs)?;

        debug!(
            "topological order: {:?}",
            order.iter().map(|&i| names[i]).collect::<Vec<_>>()
        );

        ///////////////////////////////////////////////////////////////////////
        // 3) Build the CPTs based on the initializations
        let cards: Vec<usize> = self.decls.values().map(|d| d.variable.cardinality()).collect();

        let mut nodes = IndexMap::with_capacity(self.decls.len());
        for ((name, decl), parents) in self.decls.into_iter().zip(parent_idxs.into_iter()) {
            let shape: Vec<usize> = parents.iter().map(|&p| cards[p]).collect();

            let cpt = decl.init.build_cpt(decl.variable.cardinality(), &shape).map_err(|e| {
                match e {
                    InferenceError::MalformedNetwork(msg) | InferenceError::InvalidArgument(msg) => {
                        InferenceError::MalformedNetwork(format!("CPT of '{}': {}", name, msg))
                    },
                    e => e
                }
            })?;

            nodes.insert(name, Node { variable: decl.variable, parents, cpt });
        }

        Ok(Network { name: self.name, nodes, order })
    }
}

impl<'a> Default for NetworkBuilder<'a> {

    fn default() -> Self {
        NetworkBuilder::new()
    }

}
