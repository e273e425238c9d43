use std::io;

use thiserror::Error;

use crate::solver::SolverError;

/// Everything that can end a single puzzle run.
#[derive(Debug, Error)]
pub enum KakurasuError {
  #[error("failed to read puzzle: {0}")]
  Io(#[from] io::Error),

  #[error("first line must be `<width>*<height>` with positive integers, got `{0}`")]
  MalformedDimensions(String),

  #[error("line {line}: expected a non-negative integer or `?`, got `{text}`")]
  MalformedClue { line: usize, text: String },

  #[error("input ended early, expected {0}")]
  UnexpectedEndOfInput(&'static str),

  #[error("missing `Vert:` prefix on the column clue line")]
  MissingVerticalHeader,

  #[error("`Vert:` line has {found} clues, expected {expected}")]
  VerticalCountMismatch { expected: usize, found: usize },

  #[error("got {found} {axis} clues, expected {expected}")]
  ClueCountMismatch {
    axis: &'static str,
    expected: usize,
    found: usize,
  },

  #[error("unknown clues on both rows and columns cannot be solved")]
  ConflictingUnknowns,

  #[error("no solution exists for this puzzle")]
  NoSolution,

  #[error("solver failed: {0}")]
  Solver(#[from] SolverError),
}

impl KakurasuError {
  /// Process exit status reported for this failure.
  pub fn exit_code(&self) -> u8 {
    match self {
      KakurasuError::Io(_) => 2,
      KakurasuError::MalformedDimensions(_) => 3,
      KakurasuError::MalformedClue { .. } | KakurasuError::UnexpectedEndOfInput(_) => 4,
      KakurasuError::MissingVerticalHeader => 5,
      KakurasuError::VerticalCountMismatch { .. } => 6,
      KakurasuError::ConflictingUnknowns => 7,
      KakurasuError::NoSolution => 8,
      KakurasuError::Solver(_) => 9,
      KakurasuError::ClueCountMismatch { .. } => 10,
    }
  }
}
