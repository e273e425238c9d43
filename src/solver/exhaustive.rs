use std::iter::{once, repeat};

use itertools::{FoldWhile, Itertools};
use tracing::debug;

use super::{MilpSolver, SolverError};
use crate::model::IpModel;

/// Tries every integer point inside the variable bounds and keeps the first
/// one with the lowest objective. Only usable on small models.
pub struct Exhaustive {
  max_points: u64,
}

impl Exhaustive {
  pub fn with_limit(max_points: u64) -> Self {
    Self { max_points }
  }

  /// Number of points inside the bounds, or `None` if it overflows `u64`.
  fn search_space(model: &IpModel) -> Option<u64> {
    model
      .lower_bounds
      .iter()
      .zip(model.upper_bounds.iter())
      .try_fold(1u64, |points, (lo, hi)| {
        let span = u64::try_from(hi - lo + 1).unwrap_or(0);
        points.checked_mul(span)
      })
  }
}

impl Default for Exhaustive {
  fn default() -> Self {
    Self::with_limit(1 << 24)
  }
}

/// Counts through every assignment like an odometer, lowest variable first.
fn assignments(model: &IpModel) -> impl Iterator<Item = Vec<i64>> + '_ {
  let first = model.lower_bounds.clone();
  once(first.clone()).chain(repeat(()).scan(first, move |digits, _| {
    if digits
      .iter_mut()
      .zip(model.lower_bounds.iter().zip(model.upper_bounds.iter()))
      .fold_while((), |_, (digit, (lo, hi))| {
        if *digit < *hi {
          *digit += 1;
          FoldWhile::Done(())
        } else {
          *digit = *lo;
          FoldWhile::Continue(())
        }
      })
      .is_done()
    {
      Some(digits.clone())
    } else {
      None
    }
  }))
}

impl MilpSolver for Exhaustive {
  fn name(&self) -> &str {
    "exhaustive"
  }

  fn solve(&self, model: &IpModel) -> Result<Option<Vec<f64>>, SolverError> {
    if (0..model.num_vars()).any(|var| !model.is_integer(var)) {
      return Err(SolverError::Unsupported(
        "exhaustive search needs every variable to be integer",
      ));
    }
    let points = Self::search_space(model).unwrap_or(u64::MAX);
    if points > self.max_points {
      return Err(SolverError::TooLarge { points });
    }
    if points == 0 {
      return Ok(None);
    }
    debug!(points, "enumerating assignments");

    Ok(
      assignments(model)
        .filter(|values| model.is_feasible(values))
        .min_by_key(|values| model.objective_value(values))
        .map(|values| values.into_iter().map(|v| v as f64).collect()),
    )
  }
}
