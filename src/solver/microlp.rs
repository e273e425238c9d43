use good_lp::{
  constraint, microlp, variable, Constraint, Expression, ProblemVariables, ResolutionError,
  Solution, SolverModel, Variable,
};
use tracing::debug;

use super::{MilpSolver, SolverError};
use crate::model::IpModel;

/// Pure-Rust branch and bound, reached through `good_lp`.
pub struct MicroLp;

fn linear(coefficients: &[i64], vars: &[Variable]) -> Expression {
  coefficients
    .iter()
    .zip(vars)
    .filter(|(c, _)| **c != 0)
    .map(|(&c, &var)| c as f64 * var)
    .sum()
}

impl MilpSolver for MicroLp {
  fn name(&self) -> &str {
    "microlp"
  }

  fn solve(&self, model: &IpModel) -> Result<Option<Vec<f64>>, SolverError> {
    let mut problem_vars = ProblemVariables::new();
    let vars = (0..model.num_vars())
      .map(|var| {
        let definition = variable()
          .min(model.lower_bounds[var] as f64)
          .max(model.upper_bounds[var] as f64);
        problem_vars.add(if model.is_integer(var) {
          definition.integer()
        } else {
          definition
        })
      })
      .collect::<Vec<_>>();

    let constraints = model
      .matrix
      .iter()
      .zip(model.rhs.iter())
      .map(|(row, &rhs)| {
        let lhs = linear(row, &vars);
        let rhs = rhs as f64;
        constraint!(lhs == rhs)
      })
      .collect::<Vec<Constraint>>();

    debug!(
      vars = vars.len(),
      constraints = constraints.len(),
      "handing model to microlp"
    );
    let result = constraints.into_iter().fold(
      problem_vars
        .minimise(linear(&model.objective, &vars))
        .using(microlp),
      |problem, c| problem.with(c),
    );

    match result.solve() {
      Ok(solution) => Ok(Some(vars.iter().map(|&var| solution.value(var)).collect())),
      Err(ResolutionError::Infeasible) => Ok(None),
      Err(err) => Err(SolverError::Backend(err.to_string())),
    }
  }
}
