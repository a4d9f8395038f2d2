//! Topological ordering of a parent graph, by Kahn's algorithm.

use crate::util::{InferenceError, Result};

use std::collections::BTreeSet;


/// Compute an order over the nodes of a directed graph such that each node comes after all of its
/// parents. Whenever several nodes are ready at once, the lexically smallest name goes first, so
/// the order depends only on the graph and the names.
///
/// # Args
/// * `names`: the name of each node
/// * `parents`: the parent positions of each node, indexed like `names`
///
/// # Returns
/// the node positions in topological order
///
/// # Errors
/// * `InferenceError::CyclicNetwork` if no such order exists. The error lists, sorted, the names
///   of the nodes that are on or downstream of a cycle.
pub fn topological_order<S: AsRef<str>>(names: &[S], parents: &[Vec<usize>]) -> Result<Vec<usize>> {
    let n = names.len();

    // number of unplaced parents of each node, and the reverse edges
    let mut indegree: Vec<usize> = parents.iter().map(|ps| ps.len()).collect();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (child, ps) in parents.iter().enumerate() {
        for &p in ps {
            children[p].push(child);
        }
    }

    let mut ready: BTreeSet<(&str, usize)> = (0..n)
        .filter(|&i| indegree[i] == 0)
        .map(|i| (names[i].as_ref(), i))
        .collect();

    let mut order = Vec::with_capacity(n);
    while let Some(next) = ready.iter().next().cloned() {
        ready.remove(&next);
        let (_, v) = next;
        order.push(v);

        for &c in children[v].iter() {
            indegree[c] -= 1;
            if indegree[c] == 0 {
                ready.insert((names[c].as_ref(), c));
            }
        }
    }

    if order.len() != n {
        let mut stuck: Vec<String> = (0..n)
            .filter(|&i| indegree[i] > 0)
            .map(|i| String::from(names[i].as_ref()))
            .collect();
        stuck.sort();
        return Err(InferenceError::CyclicNetwork(stuck));
    }

    Ok(order)
}
