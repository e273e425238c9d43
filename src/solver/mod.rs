use clap::ValueEnum;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
  error::KakurasuError,
  grid::Grid,
  model::{build_model, IpModel},
  puzzle::PuzzleSpec,
};

mod exhaustive;
mod microlp;

pub use exhaustive::Exhaustive;
pub use microlp::MicroLp;

/// Failures inside a solver backend. Infeasibility is not one of them.
#[derive(Debug, Error)]
pub enum SolverError {
  #[error("search space of {points} assignments is too large to enumerate")]
  TooLarge { points: u64 },

  #[error("{0}")]
  Unsupported(&'static str),

  #[error("backend error: {0}")]
  Backend(String),

  #[error("expected {expected} values, solver returned {found}")]
  WrongLength { expected: usize, found: usize },

  #[error("solver answer violates the puzzle clues")]
  InvalidSolution,
}

/// A mixed-integer program solver.
pub trait MilpSolver {
  fn name(&self) -> &str;

  /// Minimizes `model`. Returns `Ok(None)` (or an empty vector) when the model
  /// is infeasible, otherwise one value per variable.
  fn solve(&self, model: &IpModel) -> Result<Option<Vec<f64>>, SolverError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SolverKind {
  /// Branch and bound through good_lp's microlp backend.
  #[default]
  Microlp,
  /// Brute-force enumeration, only for small grids.
  Exhaustive,
}

impl SolverKind {
  pub fn backend(self) -> Box<dyn MilpSolver> {
    match self {
      SolverKind::Microlp => Box::new(MicroLp),
      SolverKind::Exhaustive => Box::new(Exhaustive::default()),
    }
  }
}

/// Runs `solver` once on `model` and rounds the answer to one boolean per
/// variable.
pub fn solve_model(solver: &dyn MilpSolver, model: &IpModel) -> Result<Vec<bool>, KakurasuError> {
  debug!(
    solver = solver.name(),
    vars = model.num_vars(),
    constraints = model.num_constraints(),
    "invoking solver"
  );
  let values = match solver.solve(model)? {
    Some(values) if !values.is_empty() => values,
    _ => return Err(KakurasuError::NoSolution),
  };
  if values.len() != model.num_vars() {
    return Err(
      SolverError::WrongLength {
        expected: model.num_vars(),
        found: values.len(),
      }
      .into(),
    );
  }
  Ok(values.into_iter().map(|v| v > 0.5).collect())
}

/// Compiles, solves and decodes one puzzle.
pub fn solve_puzzle(spec: &PuzzleSpec, solver: &dyn MilpSolver) -> Result<Grid, KakurasuError> {
  let model = build_model(spec);
  let assignment = solve_model(solver, &model)?;
  let grid = Grid::from_assignment(spec.width(), spec.height(), &assignment);
  if !grid.satisfies(spec) {
    warn!(solver = solver.name(), "rejecting answer that violates the clues");
    return Err(SolverError::InvalidSolution.into());
  }
  info!(
    solver = solver.name(),
    on_cells = grid.count_on(),
    "solved puzzle"
  );
  Ok(grid)
}
