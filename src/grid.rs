use std::fmt;

use termion::color;

use crate::{model::cell_index, puzzle::PuzzleSpec};

/// A solved board, `height` rows of `width` cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
  width: usize,
  height: usize,
  cells: Vec<bool>,
}

impl Grid {
  /// Wraps a flat assignment indexed by [`cell_index`].
  pub fn from_assignment(width: usize, height: usize, assignment: &[bool]) -> Self {
    debug_assert_eq!(assignment.len(), width * height);
    Self {
      width,
      height,
      cells: assignment.to_vec(),
    }
  }

  pub fn width(&self) -> usize {
    self.width
  }

  pub fn height(&self) -> usize {
    self.height
  }

  pub fn is_on(&self, y: usize, x: usize) -> bool {
    self.cells[cell_index(self.width, y, x)]
  }

  pub fn count_on(&self) -> usize {
    self.cells.iter().filter(|&&on| on).count()
  }

  /// Sum of `x+1` over the on-cells of each row.
  pub fn row_sums(&self) -> Vec<u32> {
    (0..self.height())
      .map(|y| {
        (0..self.width())
          .filter(|&x| self.is_on(y, x))
          .map(|x| x as u32 + 1)
          .sum()
      })
      .collect()
  }

  /// Sum of `y+1` over the on-cells of each column.
  pub fn column_sums(&self) -> Vec<u32> {
    (0..self.width())
      .map(|x| {
        (0..self.height())
          .filter(|&y| self.is_on(y, x))
          .map(|y| y as u32 + 1)
          .sum()
      })
      .collect()
  }

  /// Whether every known clue of `spec` matches this grid.
  pub fn satisfies(&self, spec: &PuzzleSpec) -> bool {
    fn matches(clues: &[Option<u32>], sums: &[u32]) -> bool {
      clues.len() == sums.len()
        && clues
          .iter()
          .zip(sums)
          .all(|(clue, sum)| clue.map_or(true, |clue| clue == *sum))
    }

    self.width() == spec.width()
      && self.height() == spec.height()
      && matches(spec.horizontal(), &self.row_sums())
      && matches(spec.vertical(), &self.column_sums())
  }

  pub fn display(&self, glyphs: Glyphs, colored: bool) -> GridDisplay<'_> {
    GridDisplay {
      grid: self,
      glyphs,
      colored,
    }
  }

  pub fn render(&self, glyphs: &Glyphs) -> String {
    self.display(*glyphs, false).to_string()
  }
}

/// The characters drawn for on and off cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyphs {
  pub on: char,
  pub off: char,
}

impl Glyphs {
  pub const UNICODE: Glyphs = Glyphs { on: '█', off: '⨯' };
  pub const ASCII: Glyphs = Glyphs { on: '#', off: '.' };
}

pub struct GridDisplay<'a> {
  grid: &'a Grid,
  glyphs: Glyphs,
  colored: bool,
}

impl fmt::Display for GridDisplay<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    (0..self.grid.height()).try_for_each(|y| {
      (0..self.grid.width()).try_for_each(|x| {
        if !self.grid.is_on(y, x) {
          write!(f, "{}", self.glyphs.off)
        } else if self.colored {
          write!(
            f,
            "{}{}{}",
            color::Fg(color::Green),
            self.glyphs.on,
            color::Fg(color::Reset)
          )
        } else {
          write!(f, "{}", self.glyphs.on)
        }
      })?;
      writeln!(f)
    })
  }
}
