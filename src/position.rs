/*!

  Line and column tracking for emitted tokens. Both are 1-based; a line
  feed resets the column and bumps the line.

*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
  pub line: u32,
  pub col: u32,
}

impl Position {
  pub fn new() -> Position {
    Position { line: 1, col: 1 }
  }

  /// Moves the position past `byte`.
  pub fn advance(&mut self, byte: u8) {
    if byte == b'\n' {
      self.line += 1;
      self.col = 1;
    } else {
      self.col += 1;
    }
  }
}

impl Default for Position {
  fn default() -> Position {
    Position::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn newline_resets_the_column() {
    let mut position = Position::new();
    position.advance(b'a');
    position.advance(b'b');
    assert_eq!(position, Position { line: 1, col: 3 });
    position.advance(b'\n');
    assert_eq!(position, Position { line: 2, col: 1 });
    position.advance(b'x');
    assert_eq!(position, Position { line: 2, col: 2 });
  }
}
