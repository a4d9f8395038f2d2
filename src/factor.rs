//! Definition of the factor module
//!
//! A `Cpt` is the conditional probability table of a single variable given its parents.

use crate::util::{InferenceError, Result, ROW_SUM_TOLERANCE};

use ndarray::prelude as nd;

/// Alias f64 ndarray::Array2 as Table. Rows are parent assignments, columns are outcomes.
pub type Table = nd::Array2<f64>;


/// A Conditional Probability Table, `P(V | Pa(V))`.
///
/// # Representation
/// The table is held as a dense two-dimensional array. Each row is the distribution of `V` for one
/// assignment to its parents. Rows are ordered by treating the parent assignment
/// ```(p_1, ..., p_k)``` as a mixed-radix number where ```p_1``` is the most significant digit and
/// each ```p_i``` ranges over the outcome indices of the i'th parent. This is the same order in
/// which XMLBIF lists the values of a `<TABLE>`, so a flat list of values can be loaded directly.
///
/// A root variable has a single row.
#[derive(Clone, Debug, PartialEq)]
pub struct Cpt {

    /// The cardinality of each parent, in parent order
    parent_shape: Vec<usize>,

    /// The values of the table
    table: Table

}


impl Cpt {

    /// Construct a `Cpt` from a flat, row-major list of values.
    ///
    /// # Args
    /// * `cardinality`: the number of outcomes of the child variable
    /// * `parent_shape`: the number of outcomes of each parent, in parent order
    /// * `values`: ```cardinality * prod(parent_shape)``` probabilities
    ///
    /// # Errors
    /// * `InferenceError::MalformedNetwork` if the number of values is wrong, a value is negative or
    ///   not finite, or a row does not sum to one
    pub fn new(cardinality: usize, parent_shape: &[usize], values: Vec<f64>) -> Result<Self> {
        let rows: usize = parent_shape.iter().product();

        if cardinality == 0 || rows == 0 {
            return Err(InferenceError::MalformedNetwork(
                String::from("a table needs at least one row and one column")
            ));
        }

        if values.len() != rows * cardinality {
            return Err(InferenceError::MalformedNetwork(
                format!(
                    "expected {} table values ({} rows of {}), found {}",
                    rows * cardinality, rows, cardinality, values.len()
                )
            ));
        }

        let table = Table::from_shape_vec((rows, cardinality), values).map_err(|e| {
            InferenceError::MalformedNetwork(e.to_string())
        })?;

        Cpt::from_table(parent_shape, table)
    }


    /// Construct a `Cpt` from an already shaped table.
    ///
    /// A row whose sum is within `ROW_SUM_TOLERANCE` of one, but not exactly one, is divided by
    /// its sum.
    ///
    /// # Errors
    /// * `InferenceError::MalformedNetwork` if the table's row count does not match
    ///   `parent_shape`, or the rows are not valid distributions
    pub fn from_table(parent_shape: &[usize], mut table: Table) -> Result<Self> {
        let rows: usize = parent_shape.iter().product();

        if table.nrows() != rows || table.ncols() == 0 {
            return Err(InferenceError::MalformedNetwork(
                format!("expected a table with {} rows, found {}x{}", rows, table.nrows(), table.ncols())
            ));
        }

        // probabilities may not be negative
        if table.iter().any(|&v| v < 0.0 || !v.is_finite()) {
            return Err(InferenceError::MalformedNetwork(
                String::from("table values must be finite and non-negative")
            ));
        }

        // verify each row is a distribution, and rescale the ones within tolerance of 1
        for (r, mut row) in table.outer_iter_mut().enumerate() {
            let z = row.sum();
            if (z - 1.0).abs() > ROW_SUM_TOLERANCE {
                return Err(InferenceError::MalformedNetwork(
                    format!("row {} sums to {}, not 1", r, z)
                ));
            }
            if z != 1.0 {
                row /= z;
            }
        }

        Ok(Cpt { parent_shape: parent_shape.to_vec(), table })
    }


    /// The number of outcomes of the child variable
    pub fn cardinality(&self) -> usize {
        self.table.ncols()
    }

    /// The number of rows, one per parent assignment
    pub fn num_rows(&self) -> usize {
        self.table.nrows()
    }

    /// The cardinality of each parent, in parent order
    pub fn parent_shape(&self) -> &[usize] {
        &self.parent_shape
    }

    /// The underlying table
    pub fn table(&self) -> &Table {
        &self.table
    }


    /// Serialize a parent assignment into a row index.
    ///
    /// # Args
    /// * `parents`: the outcome index of each parent, in parent order
    ///
    /// # Returns
    /// the mixed-radix value of `parents`, first parent most significant
    ///
    /// # Errors
    /// * `InferenceError::InvalidArgument` if the number of parent values is wrong or a value is
    ///   out of range for its parent
    pub fn row_index(&self, parents: &[usize]) -> Result<usize> {
        if parents.len() != self.parent_shape.len() {
            return Err(InferenceError::InvalidArgument(
                format!("expected {} parent values, found {}", self.parent_shape.len(), parents.len())
            ));
        }

        self.row_index_by(|i| Ok(parents[i]))
    }


    /// Serialize a parent assignment into a row index, pulling the value of the i'th parent from
    /// `parent_value(i)`. Any error from `parent_value` is passed through.
    pub fn row_index_by<F>(&self, mut parent_value: F) -> Result<usize>
        where F: FnMut(usize) -> Result<usize>
    {
        let mut idx = 0;
        for (i, &radix) in self.parent_shape.iter().enumerate() {
            let p = parent_value(i)?;
            if p >= radix {
                return Err(InferenceError::InvalidArgument(
                    format!("parent value {} out of range for cardinality {}", p, radix)
                ));
            }
            idx = idx * radix + p;
        }

        Ok(idx)
    }


    /// Get the distribution of the child for row `r`
    pub fn row(&self, r: usize) -> nd::ArrayView1<f64> {
        self.table.row(r)
    }


    /// Get ```P(V = outcome | Pa(V) = row r)```
    ///
    /// # Errors
    /// * `InferenceError::InvalidArgument` if `r` or `outcome` is out of range
    pub fn value(&self, r: usize, outcome: usize) -> Result<f64> {
        self.table.get((r, outcome)).cloned().ok_or_else(|| {
            InferenceError::InvalidArgument(
                format!("cell ({}, {}) out of range for a {}x{} table",
                        r, outcome, self.num_rows(), self.cardinality())
            )
        })
    }


    /// Draw an outcome from row `r` using a uniform variate `u` in `[0, 1)`.
    ///
    /// Outcomes are walked in declared order, accumulating their probabilities, and the first
    /// outcome whose cumulative probability exceeds `u` is chosen. If rounding leaves `u` at or
    /// above the accumulated total, the last outcome with non-zero probability is chosen rather
    /// than the last outcome outright, so an outcome of probability zero is never drawn.
    pub fn sample(&self, r: usize, u: f64) -> usize {
        let mut acc = 0.0;
        let mut last = 0;
        for (i, &p) in self.table.row(r).iter().enumerate() {
            acc += p;
            if p > 0.0 {
                if u < acc {
                    return i;
                }
                last = i;
            }
        }

        last
    }

}
