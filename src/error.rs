/*!

  Error taxonomy for table construction and artifact loading.

  Pattern-level errors carry the byte offset into the offending pattern
  string, which the driver turns into a labeled diagnostic. Scanning
  itself never fails: bytes no pattern covers come back as `UNKNOWN`
  tokens instead.

*/

use std::error::Error;
use std::fmt::{Display, Formatter};

use codespan::Span;
use codespan_reporting::diagnostic::{Diagnostic, Label};

use crate::Index32;

/// A syntax error inside a single regular expression.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RegexError {
  UnterminatedClass(Index32), //< `[...` with no closing `]`
  UnterminatedQuote(Index32), //< `"...` with no closing `"`
  EmptyClass(Index32),        //< class denotes no byte, e.g. `[]` or a full complement
  InvalidClassRange(Index32), //< descending range, e.g. `[z-a]`
  NonAscii(Index32),          //< pattern byte outside the 7-bit domain
  MismatchedParens(Index32),  //< unmatched `(` or `)`
  DanglingQuantifier(Index32), //< `*`, `+` or `?` with nothing to repeat
  StackedQuantifier(Index32), //< quantifier applied directly to a quantifier, e.g. `a**`
  EmptyExpression(Index32),   //< pattern or group denotes nothing at all
  UnexpectedToken(Index32),
}

impl RegexError {
  /// The byte offset into the pattern at which the error occurred.
  pub fn idx(&self) -> Index32 {
    *match self {
      | RegexError::UnterminatedClass(loc)
      | RegexError::UnterminatedQuote(loc)
      | RegexError::EmptyClass(loc)
      | RegexError::InvalidClassRange(loc)
      | RegexError::NonAscii(loc)
      | RegexError::MismatchedParens(loc)
      | RegexError::DanglingQuantifier(loc)
      | RegexError::StackedQuantifier(loc)
      | RegexError::EmptyExpression(loc)
      | RegexError::UnexpectedToken(loc) => loc,
    }
  }

  fn description(&self) -> &'static str {
    match self {
      RegexError::UnterminatedClass(_) => "Unterminated Character Class",
      RegexError::UnterminatedQuote(_) => "Unterminated Quotation",
      RegexError::EmptyClass(_) => "Empty Character Class",
      RegexError::InvalidClassRange(_) => "Invalid Class Range",
      RegexError::NonAscii(_) => "Byte Outside ASCII",
      RegexError::MismatchedParens(_) => "Mismatched Parens",
      RegexError::DanglingQuantifier(_) => "Dangling Quantifier",
      RegexError::StackedQuantifier(_) => "Stacked Quantifier",
      RegexError::EmptyExpression(_) => "Empty Expression",
      RegexError::UnexpectedToken(_) => "Unexpected Token",
    }
  }

  /// One-byte span at the error offset.
  pub fn span(&self) -> Span {
    Span::new(self.idx(), self.idx() + 1)
  }

  /// Renders the error against the pattern registered under `file`.
  pub fn to_diagnostic<FileId: Copy>(&self, file: FileId) -> Diagnostic<FileId> {
    let label = Label::primary(file, self.span()).with_message("here");
    Diagnostic::error().with_message(self.to_string()).with_labels(vec![label])
  }
}

impl Display for RegexError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} at byte {}", self.description(), self.idx())
  }
}

impl Error for RegexError {}

/// A failure to turn a pattern list into a transition table.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum BuildError {
  /// A pattern failed to parse. Carries the position of the pattern in
  /// the input list and its source text for reporting.
  Pattern {
    index: usize,
    source: String,
    error: RegexError,
  },
  /// The combined machine cannot accept anything: no patterns, no
  /// accepting state, or no byte can ever advance from the start.
  EmptyMachine,
}

impl Display for BuildError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      BuildError::Pattern { index, source, error } => {
        write!(f, "pattern #{} `{}`: {}", index, source, error)
      }
      BuildError::EmptyMachine => write!(f, "the combined machine accepts nothing"),
    }
  }
}

impl Error for BuildError {}

/// A failure to reload an emitted table artifact.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum LoadError {
  /// A declared section never appeared.
  MissingSection(&'static str),
  /// A line did not parse; carries the 1-based line number.
  Malformed { line: usize, reason: String },
}

impl Display for LoadError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      LoadError::MissingSection(section) => {
        write!(f, "table artifact is missing its {} section", section)
      }
      LoadError::Malformed { line, reason } => {
        write!(f, "table artifact line {}: {}", line, reason)
      }
    }
  }
}

impl Error for LoadError {}
