use itertools::{FoldWhile, Itertools};

/// Yields every clue token in a line: a maximal run of ASCII digits or a
/// single `?`. Anything else separates tokens.
pub struct ClueTokensIter<'a> {
  inner: &'a str,
}

enum Scan {
  Searching,
  Digits { start: usize },
  Found { start: usize, end: usize },
}

impl<'a> Iterator for ClueTokensIter<'a> {
  type Item = &'a str;

  fn next(&mut self) -> Option<Self::Item> {
    let scan = self
      .inner
      .char_indices()
      .fold_while(Scan::Searching, |scan, (idx, c)| match scan {
        Scan::Searching if c == '?' => FoldWhile::Done(Scan::Found {
          start: idx,
          end: idx + 1,
        }),
        Scan::Searching if c.is_ascii_digit() => FoldWhile::Continue(Scan::Digits { start: idx }),
        Scan::Digits { start } if !c.is_ascii_digit() => {
          FoldWhile::Done(Scan::Found { start, end: idx })
        }
        scan => FoldWhile::Continue(scan),
      })
      .into_inner();

    let tmp = self.inner;
    match scan {
      Scan::Found { start, end } => {
        self.inner = &self.inner[end..];
        Some(&tmp[start..end])
      }
      Scan::Digits { start } => {
        self.inner = &self.inner[self.inner.len()..];
        Some(&tmp[start..])
      }
      Scan::Searching => {
        self.inner = &self.inner[self.inner.len()..];
        None
      }
    }
  }
}

pub trait ClueTokens<'a>: Into<&'a str> {
  fn clue_tokens(self) -> ClueTokensIter<'a> {
    ClueTokensIter { inner: self.into() }
  }
}

impl<'a, T> ClueTokens<'a> for T where T: Into<&'a str> {}

#[cfg(test)]
mod test {
  use super::ClueTokens;

  #[test]
  fn test_space_separated() {
    assert_eq!("1 2 10".clue_tokens().collect::<Vec<_>>(), vec!["1", "2", "10"]);
  }

  #[test]
  fn test_unknowns_and_odd_separators() {
    assert_eq!(
      "?,12;?  3\t".clue_tokens().collect::<Vec<_>>(),
      vec!["?", "12", "?", "3"]
    );
  }

  #[test]
  fn test_adjacent_question_marks_are_separate() {
    assert_eq!("??7?".clue_tokens().collect::<Vec<_>>(), vec!["?", "?", "7", "?"]);
  }

  #[test]
  fn test_no_tokens() {
    assert_eq!("".clue_tokens().count(), 0);
    assert_eq!("  , - ".clue_tokens().count(), 0);
  }
}
