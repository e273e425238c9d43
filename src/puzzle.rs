use std::{fmt, fs, path::Path};

use itertools::Itertools;
use tracing::debug;

use crate::{error::KakurasuError, tokens::ClueTokens};

/// A row or column target; `None` when the puzzle leaves it as `?`.
pub type Clue = Option<u32>;

/// A parsed puzzle. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PuzzleSpec {
  width: usize,
  height: usize,
  horizontal: Vec<Clue>,
  vertical: Vec<Clue>,
}

impl PuzzleSpec {
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, KakurasuError> {
    let text = fs::read_to_string(path)?;
    text.parse()
  }

  pub fn width(&self) -> usize {
    self.width
  }

  pub fn height(&self) -> usize {
    self.height
  }

  /// One clue per row, top to bottom.
  pub fn horizontal(&self) -> &[Clue] {
    &self.horizontal
  }

  /// One clue per column, left to right.
  pub fn vertical(&self) -> &[Clue] {
    &self.vertical
  }

  pub fn num_known_horizontal(&self) -> usize {
    self.horizontal.iter().flatten().count()
  }

  pub fn num_known_vertical(&self) -> usize {
    self.vertical.iter().flatten().count()
  }
}

/// Accumulates clues before producing a [`PuzzleSpec`]. Missing clues stay
/// unknown.
pub struct PuzzleBuilder {
  width: usize,
  height: usize,
  horizontal: Vec<Clue>,
  vertical: Vec<Clue>,
}

impl PuzzleBuilder {
  pub fn new(width: usize, height: usize) -> Self {
    Self {
      width,
      height,
      horizontal: vec![None; height],
      vertical: vec![None; width],
    }
  }

  /// Sets the clue of row `y`. A row past the height is kept and rejected by
  /// [`PuzzleBuilder::build`].
  pub fn row(mut self, y: usize, clue: Clue) -> Self {
    set_clue(&mut self.horizontal, y, clue);
    self
  }

  /// Sets the clue of column `x`. A column past the width is kept and
  /// rejected by [`PuzzleBuilder::build`].
  pub fn column(mut self, x: usize, clue: Clue) -> Self {
    set_clue(&mut self.vertical, x, clue);
    self
  }

  pub fn rows<I: IntoIterator<Item = Clue>>(self, clues: I) -> Self {
    clues
      .into_iter()
      .enumerate()
      .fold(self, |builder, (y, clue)| builder.row(y, clue))
  }

  pub fn columns<I: IntoIterator<Item = Clue>>(self, clues: I) -> Self {
    clues
      .into_iter()
      .enumerate()
      .fold(self, |builder, (x, clue)| builder.column(x, clue))
  }

  pub fn build(self) -> Result<PuzzleSpec, KakurasuError> {
    if self.width == 0 || self.height == 0 {
      return Err(KakurasuError::MalformedDimensions(format!(
        "{}*{}",
        self.width, self.height
      )));
    }
    if self.horizontal.len() != self.height {
      return Err(KakurasuError::ClueCountMismatch {
        axis: "row",
        expected: self.height,
        found: self.horizontal.len(),
      });
    }
    if self.vertical.len() != self.width {
      return Err(KakurasuError::ClueCountMismatch {
        axis: "column",
        expected: self.width,
        found: self.vertical.len(),
      });
    }
    // Unknowns on both axes leave too few equations to pin every cell.
    if self.horizontal.contains(&None) && self.vertical.contains(&None) {
      return Err(KakurasuError::ConflictingUnknowns);
    }
    Ok(PuzzleSpec {
      width: self.width,
      height: self.height,
      horizontal: self.horizontal,
      vertical: self.vertical,
    })
  }
}

fn set_clue(clues: &mut Vec<Clue>, idx: usize, clue: Clue) {
  if idx >= clues.len() {
    clues.resize(idx + 1, None);
  }
  clues[idx] = clue;
}

fn parse_dimensions(line: &str) -> Option<(usize, usize)> {
  let (width, rest) = line.split_once('*')?;
  let height_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
  if width.is_empty() || !width.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  let width = width.parse::<usize>().ok()?;
  let height = rest[..height_len].parse::<usize>().ok()?;
  (width > 0 && height > 0).then_some((width, height))
}

fn parse_clue(token: &str) -> Option<Clue> {
  match token {
    "?" => Some(None),
    _ if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) => {
      token.parse::<u32>().ok().map(Some)
    }
    _ => None,
  }
}

impl std::str::FromStr for PuzzleSpec {
  type Err = KakurasuError;

  fn from_str(text: &str) -> Result<Self, Self::Err> {
    let mut lines = text.lines().enumerate();

    let dims = lines
      .next()
      .map(|(_, line)| line)
      .ok_or_else(|| KakurasuError::MalformedDimensions(String::new()))?;
    let (width, height) = parse_dimensions(dims)
      .ok_or_else(|| KakurasuError::MalformedDimensions(dims.to_string()))?;
    debug!(width, height, "parsed puzzle dimensions");

    let horizontal = (0..height)
      .map(|_| {
        let (idx, line) = lines
          .next()
          .ok_or(KakurasuError::UnexpectedEndOfInput("a row clue"))?;
        parse_clue(line.trim()).ok_or_else(|| KakurasuError::MalformedClue {
          line: idx + 1,
          text: line.to_string(),
        })
      })
      .collect::<Result<Vec<_>, _>>()?;

    let (vert_idx, vert) = lines
      .next()
      .and_then(|(idx, line)| Some((idx, line.strip_prefix("Vert:")?)))
      .ok_or(KakurasuError::MissingVerticalHeader)?;
    let tokens = vert.clue_tokens().collect::<Vec<_>>();
    if tokens.len() != width {
      return Err(KakurasuError::VerticalCountMismatch {
        expected: width,
        found: tokens.len(),
      });
    }
    let vertical = tokens
      .into_iter()
      .map(|token| {
        parse_clue(token).ok_or_else(|| KakurasuError::MalformedClue {
          line: vert_idx + 1,
          text: token.to_string(),
        })
      })
      .collect::<Result<Vec<_>, _>>()?;

    let spec = PuzzleBuilder::new(width, height)
      .rows(horizontal)
      .columns(vertical)
      .build()?;
    debug!(
      known_rows = spec.num_known_horizontal(),
      known_columns = spec.num_known_vertical(),
      "parsed puzzle clues"
    );
    Ok(spec)
  }
}

impl fmt::Display for PuzzleSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fn clue_str(clue: &Clue) -> String {
      match clue {
        Some(sum) => sum.to_string(),
        None => "?".to_string(),
      }
    }

    writeln!(f, "{}*{}", self.width, self.height)?;
    self
      .horizontal
      .iter()
      .try_for_each(|clue| writeln!(f, "{}", clue_str(clue)))?;
    writeln!(
      f,
      "Vert: {}",
      self.vertical.iter().map(clue_str).join(" ")
    )
  }
}

#[cfg(test)]
mod test {
  use super::{PuzzleBuilder, PuzzleSpec};
  use crate::error::KakurasuError;

  fn parse(text: &str) -> Result<PuzzleSpec, KakurasuError> {
    text.parse::<PuzzleSpec>()
  }

  #[test]
  fn test_parse_fully_known() {
    let spec = parse("2*2\n1\n2\nVert: 1 2\n").unwrap();
    assert_eq!(spec.width(), 2);
    assert_eq!(spec.height(), 2);
    assert_eq!(spec.horizontal(), &[Some(1), Some(2)]);
    assert_eq!(spec.vertical(), &[Some(1), Some(2)]);
    assert_eq!(spec.num_known_horizontal(), 2);
    assert_eq!(spec.num_known_vertical(), 2);
  }

  #[test]
  fn test_parse_crlf_and_unknown_rows() {
    let spec = parse("3*2\r\n?\r\n5\r\nVert:2,2,  0\r\n").unwrap();
    assert_eq!(spec.horizontal(), &[None, Some(5)]);
    assert_eq!(spec.vertical(), &[Some(2), Some(2), Some(0)]);
    assert_eq!(spec.num_known_horizontal(), 1);
  }

  #[test]
  fn test_parse_unknown_columns() {
    let spec = parse("2*2\n3\n1\nVert: ? 4\n").unwrap();
    assert_eq!(spec.vertical(), &[None, Some(4)]);
    assert_eq!(spec.num_known_vertical(), 1);
  }

  #[test]
  fn test_dimension_line_trailing_text_ignored() {
    let spec = parse("2*1 puzzle 7\n3\nVert: 1 1\n").unwrap();
    assert_eq!((spec.width(), spec.height()), (2, 1));
  }

  #[test]
  fn test_malformed_dimensions() {
    for text in ["abc\n", "", "2x2\n", "*2\n", "2*\n", "0*3\n", "3*0\n", " 2*2\n"] {
      assert!(
        matches!(parse(text), Err(KakurasuError::MalformedDimensions(_))),
        "{text:?}"
      );
    }
  }

  #[test]
  fn test_malformed_row_clue() {
    assert!(matches!(
      parse("2*2\n1\nx\nVert: 1 2\n"),
      Err(KakurasuError::MalformedClue { line: 3, .. })
    ));
    assert!(matches!(
      parse("2*2\n-1\n1\nVert: 1 2\n"),
      Err(KakurasuError::MalformedClue { line: 2, .. })
    ));
  }

  #[test]
  fn test_row_clues_cut_short() {
    assert!(matches!(
      parse("2*3\n1\n2\n"),
      Err(KakurasuError::UnexpectedEndOfInput(_))
    ));
  }

  #[test]
  fn test_missing_vertical_header() {
    assert!(matches!(
      parse("2*2\n1\n2\nHoriz: 1 2\n"),
      Err(KakurasuError::MissingVerticalHeader)
    ));
    assert!(matches!(
      parse("2*2\n1\n2\n"),
      Err(KakurasuError::MissingVerticalHeader)
    ));
  }

  #[test]
  fn test_vertical_count_mismatch() {
    assert!(matches!(
      parse("2*2\n1\n2\nVert: 1\n"),
      Err(KakurasuError::VerticalCountMismatch {
        expected: 2,
        found: 1
      })
    ));
    // One clue per column, not per row.
    assert!(matches!(
      parse("3*2\n1\n2\nVert: 1 2\n"),
      Err(KakurasuError::VerticalCountMismatch {
        expected: 3,
        found: 2
      })
    ));
  }

  #[test]
  fn test_vertical_clue_overflow() {
    assert!(matches!(
      parse("2*2\n1\n2\nVert: 1 99999999999\n"),
      Err(KakurasuError::MalformedClue { line: 4, .. })
    ));
  }

  #[test]
  fn test_conflicting_unknowns_either_order() {
    assert!(matches!(
      parse("2*2\n?\n2\nVert: 1 ?\n"),
      Err(KakurasuError::ConflictingUnknowns)
    ));
    assert!(matches!(
      PuzzleBuilder::new(2, 2).row(0, Some(1)).column(0, Some(1)).build(),
      Err(KakurasuError::ConflictingUnknowns)
    ));
  }

  #[test]
  fn test_builder_rejects_surplus_clues() {
    assert!(matches!(
      PuzzleBuilder::new(2, 2)
        .rows([Some(1), Some(2), Some(3)])
        .columns([Some(1), Some(2)])
        .build(),
      Err(KakurasuError::ClueCountMismatch {
        axis: "row",
        expected: 2,
        found: 3
      })
    ));
    assert!(matches!(
      PuzzleBuilder::new(2, 2)
        .rows([Some(1), Some(2)])
        .columns([Some(1), Some(2), Some(3)])
        .build(),
      Err(KakurasuError::ClueCountMismatch {
        axis: "column",
        expected: 2,
        found: 3
      })
    ));
    assert!(matches!(
      PuzzleBuilder::new(3, 1).row(0, Some(1)).column(5, Some(1)).build(),
      Err(KakurasuError::ClueCountMismatch { found: 6, .. })
    ));
  }

  #[test]
  fn test_builder_matches_parser() {
    let built = PuzzleBuilder::new(3, 2)
      .rows([Some(4), None])
      .columns([Some(1), Some(2), Some(2)])
      .build()
      .unwrap();
    assert_eq!(built, parse("3*2\n4\n?\nVert: 1 2 2\n").unwrap());
  }

  #[test]
  fn test_display_reparses() {
    let spec = parse("3*2\n?\n5\nVert: 2 2 0\n").unwrap();
    assert_eq!(spec.to_string(), "3*2\n?\n5\nVert: 2 2 0\n");
    assert_eq!(parse(&spec.to_string()).unwrap(), spec);
  }
}
