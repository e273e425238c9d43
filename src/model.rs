use std::fmt;

use itertools::{iproduct, Itertools};
use tracing::debug;

use crate::puzzle::PuzzleSpec;

/// Flat variable index of the cell in row `y`, column `x`. Row-major; the
/// decoder uses the same mapping.
pub fn cell_index(width: usize, y: usize, x: usize) -> usize {
  width * y + x
}

/// A minimization problem over integer coefficients, in dense row form.
/// Every row is an equality `matrix[i] . x == rhs[i]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IpModel {
  pub objective: Vec<i64>,
  /// One row per constraint, one column per variable.
  pub matrix: Vec<Vec<i64>>,
  pub rhs: Vec<i64>,
  pub lower_bounds: Vec<i64>,
  pub upper_bounds: Vec<i64>,
  /// Indices of variables restricted to integer values.
  pub integers: Vec<usize>,
  /// Row names, used when printing the model.
  pub row_names: Vec<String>,
  /// Variable names, used when printing the model.
  pub var_names: Vec<String>,
}

impl IpModel {
  pub fn num_vars(&self) -> usize {
    self.objective.len()
  }

  pub fn num_constraints(&self) -> usize {
    self.matrix.len()
  }

  pub fn is_integer(&self, var: usize) -> bool {
    self.integers.contains(&var)
  }

  /// Whether `values` satisfies every row and bound.
  pub fn is_feasible(&self, values: &[i64]) -> bool {
    values.len() == self.num_vars()
      && values
        .iter()
        .zip(self.lower_bounds.iter().zip(self.upper_bounds.iter()))
        .all(|(v, (lo, hi))| (lo..=hi).contains(&v))
      && self
        .matrix
        .iter()
        .zip(self.rhs.iter())
        .all(|(row, rhs)| dot(row, values) == *rhs)
  }

  pub fn objective_value(&self, values: &[i64]) -> i64 {
    dot(&self.objective, values)
  }

  fn fmt_terms(&self, f: &mut fmt::Formatter<'_>, coefficients: &[i64]) -> fmt::Result {
    let mut terms = coefficients
      .iter()
      .zip(self.var_names.iter())
      .filter(|(c, _)| **c != 0)
      .peekable();
    if terms.peek().is_none() {
      return write!(f, "+0");
    }
    write!(
      f,
      "{}",
      terms.format_with(" ", |(c, name), g| g(&format_args!("{:+} {}", c, name)))
    )
  }
}

/// CPLEX LP format.
impl fmt::Display for IpModel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Minimize\n obj: ")?;
    self.fmt_terms(f, &self.objective)?;
    writeln!(f)?;

    writeln!(f, "Subject To")?;
    self
      .row_names
      .iter()
      .zip(self.matrix.iter().zip(self.rhs.iter()))
      .try_for_each(|(name, (row, rhs))| {
        write!(f, " {}: ", name)?;
        self.fmt_terms(f, row)?;
        writeln!(f, " = {}", rhs)
      })?;

    writeln!(f, "Bounds")?;
    self
      .var_names
      .iter()
      .zip(self.lower_bounds.iter().zip(self.upper_bounds.iter()))
      .try_for_each(|(name, (lo, hi))| writeln!(f, " {} <= {} <= {}", lo, name, hi))?;

    if !self.integers.is_empty() {
      writeln!(f, "General")?;
      writeln!(
        f,
        " {}",
        self.integers.iter().map(|&var| &self.var_names[var]).format(" ")
      )?;
    }
    writeln!(f, "End")
  }
}

fn dot(coefficients: &[i64], values: &[i64]) -> i64 {
  coefficients.iter().zip(values).map(|(c, v)| c * v).sum()
}

/// Encodes the puzzle as a 0/1 feasibility program: one binary variable per
/// cell, one equality per known clue. Row clues come first, then column clues.
pub fn build_model(spec: &PuzzleSpec) -> IpModel {
  let (width, height) = (spec.width(), spec.height());
  let num_vars = width * height;

  let mut var_names = vec![String::new(); num_vars];
  for (y, x) in iproduct!(0..height, 0..width) {
    var_names[cell_index(width, y, x)] = format!("c_{}_{}", y, x);
  }

  let rows = spec
    .horizontal()
    .iter()
    .enumerate()
    .filter_map(|(y, clue)| clue.map(|sum| (y, sum)))
    .map(|(y, sum)| {
      let mut row = vec![0; num_vars];
      for x in 0..width {
        row[cell_index(width, y, x)] = x as i64 + 1;
      }
      (format!("row_{}", y), row, sum)
    });
  let columns = spec
    .vertical()
    .iter()
    .enumerate()
    .filter_map(|(x, clue)| clue.map(|sum| (x, sum)))
    .map(|(x, sum)| {
      let mut row = vec![0; num_vars];
      for y in 0..height {
        row[cell_index(width, y, x)] = y as i64 + 1;
      }
      (format!("col_{}", x), row, sum)
    });

  let (row_names, matrix, rhs): (Vec<_>, Vec<_>, Vec<_>) = rows
    .chain(columns)
    .map(|(name, row, sum)| (name, row, i64::from(sum)))
    .multiunzip();

  let model = IpModel {
    objective: vec![1; num_vars],
    matrix,
    rhs,
    lower_bounds: vec![0; num_vars],
    upper_bounds: vec![1; num_vars],
    integers: (0..num_vars).collect(),
    row_names,
    var_names,
  };
  debug!(
    vars = model.num_vars(),
    constraints = model.num_constraints(),
    "built integer program"
  );
  model
}
