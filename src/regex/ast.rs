/*!

  The regex syntax tree. Children are owned boxes; the whole tree lives
  only long enough to drive the NFA construction.

*/

use std::fmt::{Display, Formatter};

use crate::chars::{escape_byte, ByteSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
  Char(u8),
  /// A nonempty byte set acting as a single edge label.
  Class(ByteSet),
  Concat(Box<Ast>, Box<Ast>),
  Union(Box<Ast>, Box<Ast>),
  Star(Box<Ast>),
  Plus(Box<Ast>),
  Question(Box<Ast>),
}

impl Ast {
  fn dump(&self, f: &mut Formatter<'_>, depth: usize) -> std::fmt::Result {
    let indent = "  ".repeat(depth);
    match self {
      Ast::Char(byte) => writeln!(f, "{}CHAR: {}", indent, escape_byte(*byte)),
      Ast::Class(set) => writeln!(f, "{}CLASS: {}", indent, set),
      Ast::Concat(left, right) => {
        writeln!(f, "{}CONCAT", indent)?;
        left.dump(f, depth + 1)?;
        right.dump(f, depth + 1)
      }
      Ast::Union(left, right) => {
        writeln!(f, "{}UNION", indent)?;
        left.dump(f, depth + 1)?;
        right.dump(f, depth + 1)
      }
      Ast::Star(inner) => {
        writeln!(f, "{}STAR", indent)?;
        inner.dump(f, depth + 1)
      }
      Ast::Plus(inner) => {
        writeln!(f, "{}PLUS", indent)?;
        inner.dump(f, depth + 1)
      }
      Ast::Question(inner) => {
        writeln!(f, "{}QUESTION", indent)?;
        inner.dump(f, depth + 1)
      }
    }
  }
}

impl Display for Ast {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    self.dump(f, 0)
  }
}
