/*!

  The pattern tokenizer. Consumes a pattern byte by byte and produces a
  flat token sequence terminated by `End`, expanding escapes and
  character classes along the way so that later stages never look at
  backslashes again.

*/

use crate::chars::{ByteSet, Class};
use crate::error::RegexError;
use crate::Index32;

/// One token of the regex surface language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexToken {
  Char(u8),
  /// A character class, already expanded to the concrete byte set.
  Class(ByteSet),
  LParen,
  RParen,
  Star,
  Plus,
  Question,
  Pipe,
  Dot,
  End,
}

impl RegexToken {
  pub fn is_quantifier(&self) -> bool {
    matches!(self, RegexToken::Star | RegexToken::Plus | RegexToken::Question)
  }

  /// True for tokens that can begin an atom.
  pub fn starts_atom(&self) -> bool {
    matches!(
      self,
      RegexToken::Char(_) | RegexToken::Class(_) | RegexToken::Dot | RegexToken::LParen
    )
  }
}

/// A token plus the byte offset of its first byte in the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
  pub token: RegexToken,
  pub idx: Index32,
}

pub struct RegexLexer<'a> {
  pattern: &'a [u8], //< Pattern string as bytes
  idx: Index32,      //< Cursor into `self.pattern`
}

impl<'a> RegexLexer<'a> {
  pub fn new(pattern: &'a str) -> RegexLexer<'a> {
    RegexLexer { pattern: pattern.as_bytes(), idx: 0 }
  }

  // region Inlined cursor methods

  /// Returns the byte at index `idx` of the pattern, NUL when past the end.
  fn at(&self, idx: Index32) -> u8 {
    if idx >= self.pattern.len() as Index32 {
      return 0;
    }
    self.pattern[idx as usize]
  }

  /// Same as `at()` but assumes `idx = self.idx`.
  fn c(&self) -> u8 {
    self.at(self.idx)
  }

  /// Same as `c()` but post-increments `self.idx`.
  fn ci(&mut self) -> u8 {
    self.idx += 1;
    self.at(self.idx - 1)
  }

  fn at_end(&self) -> bool {
    self.idx >= self.pattern.len() as Index32
  }

  // endregion

  pub fn tokenize(mut self) -> Result<Vec<SpannedToken>, RegexError> {
    let mut tokens = Vec::new();

    while !self.at_end() {
      let start = self.idx;
      let byte = self.ci();
      if byte >= 0x80 {
        return Err(RegexError::NonAscii(start));
      }

      let token = match byte {
        b'(' => RegexToken::LParen,
        b')' => RegexToken::RParen,
        b'*' => RegexToken::Star,
        b'+' => RegexToken::Plus,
        b'?' => RegexToken::Question,
        b'|' => RegexToken::Pipe,
        b'.' => RegexToken::Dot,
        b'[' => RegexToken::Class(self.lex_class(start)?),
        b'"' => {
          self.lex_quoted(start, &mut tokens)?;
          continue;
        }
        b'\\' => {
          if self.at_end() {
            return Err(RegexError::UnexpectedToken(start));
          }
          let escaped_at = self.idx;
          let escaped = self.ci();
          if escaped >= 0x80 {
            return Err(RegexError::NonAscii(escaped_at));
          }
          match class_escape(escaped) {
            Some(set) => RegexToken::Class(set),
            None => RegexToken::Char(expand_escape(escaped)),
          }
        }
        _ => RegexToken::Char(byte),
      };
      tokens.push(SpannedToken { token, idx: start });
    }

    tokens.push(SpannedToken { token: RegexToken::End, idx: self.pattern.len() as Index32 });
    Ok(tokens)
  }

  /**
    Lexes a character class. Entered with the cursor just past `[`;
    `start` is the offset of the bracket itself, used for error
    reporting when the class never closes.
  */
  fn lex_class(&mut self, start: Index32) -> Result<ByteSet, RegexError> {
    let mut set = ByteSet::new();
    let mut negated = false;

    if self.c() == b'^' {
      negated = true;
      self.idx += 1;
    }

    loop {
      if self.at_end() {
        return Err(RegexError::UnterminatedClass(start));
      }
      if self.c() == b']' {
        self.idx += 1;
        break;
      }

      let lo = match self.class_byte(start)? {
        ClassItem::Byte(byte) => byte,
        ClassItem::Set(escape_set) => {
          set |= escape_set;
          continue;
        }
      };

      // A `-` forms a range unless it sits directly before the closing
      // bracket, where it is a plain member.
      if self.c() == b'-' && self.at(self.idx + 1) != b']' && (self.idx + 1) < self.pattern.len() as Index32 {
        let dash_at = self.idx;
        self.idx += 1;
        let hi = match self.class_byte(start)? {
          ClassItem::Byte(byte) => byte,
          ClassItem::Set(_) => return Err(RegexError::InvalidClassRange(dash_at)),
        };
        if lo > hi {
          return Err(RegexError::InvalidClassRange(dash_at));
        }
        set.insert_range(lo, hi);
      } else {
        set.insert(lo);
      }
    }

    if negated {
      set.flip();
    }
    if set.is_empty() {
      return Err(RegexError::EmptyClass(start));
    }
    Ok(set)
  }

  /// One member of a class body: a literal byte, an escape-expanded
  /// byte, or an injected escape class like `\d`.
  fn class_byte(&mut self, class_start: Index32) -> Result<ClassItem, RegexError> {
    let offset = self.idx;
    let byte = self.ci();
    if byte >= 0x80 {
      return Err(RegexError::NonAscii(offset));
    }
    if byte != b'\\' {
      return Ok(ClassItem::Byte(byte));
    }

    if self.at_end() {
      return Err(RegexError::UnterminatedClass(class_start));
    }
    let escaped_at = self.idx;
    let escaped = self.ci();
    if escaped >= 0x80 {
      return Err(RegexError::NonAscii(escaped_at));
    }
    match class_escape(escaped) {
      Some(set) => Ok(ClassItem::Set(set)),
      None => Ok(ClassItem::Byte(expand_escape(escaped))),
    }
  }

  /**
    Lexes a quoted literal run. Every byte up to the closing quote comes
    out as a plain `Char` token; metacharacters have no special meaning
    here, and escapes expand to the byte they name.
  */
  fn lex_quoted(
    &mut self,
    start: Index32,
    tokens: &mut Vec<SpannedToken>,
  ) -> Result<(), RegexError> {
    loop {
      if self.at_end() {
        return Err(RegexError::UnterminatedQuote(start));
      }
      let offset = self.idx;
      let byte = self.ci();
      if byte >= 0x80 {
        return Err(RegexError::NonAscii(offset));
      }
      match byte {
        b'"' => return Ok(()),
        b'\\' => {
          if self.at_end() {
            return Err(RegexError::UnterminatedQuote(start));
          }
          let escaped_at = self.idx;
          let escaped = self.ci();
          if escaped >= 0x80 {
            return Err(RegexError::NonAscii(escaped_at));
          }
          tokens.push(SpannedToken { token: RegexToken::Char(expand_escape(escaped)), idx: offset });
        }
        _ => {
          tokens.push(SpannedToken { token: RegexToken::Char(byte), idx: offset });
        }
      }
    }
  }
}

enum ClassItem {
  Byte(u8),
  Set(ByteSet),
}

/// `\d \w \s` and their negations expand to concrete byte sets.
fn class_escape(byte: u8) -> Option<ByteSet> {
  match byte {
    b'd' => Some(Class::Digit),
    b'w' => Some(Class::Word),
    b's' => Some(Class::Space),
    b'D' => Some(!Class::Digit),
    b'W' => Some(!Class::Word),
    b'S' => Some(!Class::Space),
    _ => None,
  }
}

/// Converts the escaped byte (without the backslash) into the byte it
/// names; anything unrecognized stands for itself.
fn expand_escape(byte: u8) -> u8 {
  match byte {
    b'n' => b'\n',
    b't' => b'\t',
    b'r' => b'\r',
    b'f' => 0x0C,
    b'v' => 0x0B,
    b'0' => 0,
    _ => byte,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn tokens_of(pattern: &str) -> Vec<RegexToken> {
    RegexLexer::new(pattern)
      .tokenize()
      .unwrap()
      .into_iter()
      .map(|spanned| spanned.token)
      .collect()
  }

  fn error_of(pattern: &str) -> RegexError {
    RegexLexer::new(pattern).tokenize().unwrap_err()
  }

  #[test]
  fn punctuation_and_literals() {
    assert_eq!(
      tokens_of("a(b)*"),
      vec![
        RegexToken::Char(b'a'),
        RegexToken::LParen,
        RegexToken::Char(b'b'),
        RegexToken::RParen,
        RegexToken::Star,
        RegexToken::End,
      ]
    );
  }

  #[test]
  fn dot_stays_distinct() {
    assert_eq!(tokens_of("."), vec![RegexToken::Dot, RegexToken::End]);
  }

  #[test]
  fn escapes_expand() {
    assert_eq!(
      tokens_of(r"\n\t\0\+"),
      vec![
        RegexToken::Char(b'\n'),
        RegexToken::Char(b'\t'),
        RegexToken::Char(0),
        RegexToken::Char(b'+'),
        RegexToken::End,
      ]
    );
  }

  #[test]
  fn predefined_classes() {
    assert_eq!(tokens_of(r"\d"), vec![RegexToken::Class(Class::Digit), RegexToken::End]);
    assert_eq!(tokens_of(r"\D"), vec![RegexToken::Class(!Class::Digit), RegexToken::End]);
    assert_eq!(tokens_of(r"\s"), vec![RegexToken::Class(Class::Space), RegexToken::End]);
    assert_eq!(tokens_of(r"\W"), vec![RegexToken::Class(!Class::Word), RegexToken::End]);
  }

  #[test]
  fn class_with_ranges() {
    let tokens = tokens_of("[a-cx]");
    let mut expected = ByteSet::new();
    expected.insert_range(b'a', b'c');
    expected.insert(b'x');
    assert_eq!(tokens, vec![RegexToken::Class(expected), RegexToken::End]);
  }

  #[test]
  fn negated_class() {
    let tokens = tokens_of("[^0-9]");
    assert_eq!(tokens, vec![RegexToken::Class(!Class::Digit), RegexToken::End]);
  }

  #[test]
  fn class_escape_injection() {
    let tokens = tokens_of(r"[\d_]");
    let mut expected = Class::Digit;
    expected.insert(b'_');
    assert_eq!(tokens, vec![RegexToken::Class(expected), RegexToken::End]);
  }

  #[test]
  fn dash_before_closing_bracket_is_literal() {
    let tokens = tokens_of("[a-]");
    let mut expected = ByteSet::new();
    expected.insert(b'a');
    expected.insert(b'-');
    assert_eq!(tokens, vec![RegexToken::Class(expected), RegexToken::End]);
  }

  #[test]
  fn quoted_run_disarms_metacharacters() {
    assert_eq!(
      tokens_of(r#""a*|""#),
      vec![
        RegexToken::Char(b'a'),
        RegexToken::Char(b'*'),
        RegexToken::Char(b'|'),
        RegexToken::End,
      ]
    );
  }

  #[test]
  fn quoted_run_expands_escapes() {
    assert_eq!(
      tokens_of(r#""\n\"""#),
      vec![RegexToken::Char(b'\n'), RegexToken::Char(b'"'), RegexToken::End]
    );
  }

  #[test]
  fn unterminated_class_reports_the_bracket() {
    assert_eq!(error_of("ab[cd"), RegexError::UnterminatedClass(2));
  }

  #[test]
  fn unterminated_quote_reports_the_quote() {
    assert_eq!(error_of(r#"x"yz"#), RegexError::UnterminatedQuote(1));
  }

  #[test]
  fn empty_class_is_rejected() {
    assert_eq!(error_of("[]"), RegexError::EmptyClass(0));
  }

  #[test]
  fn full_negated_class_is_rejected() {
    assert_eq!(error_of(r"[^\D\d]"), RegexError::EmptyClass(0));
  }

  #[test]
  fn descending_range_is_rejected() {
    assert_eq!(error_of("[z-a]"), RegexError::InvalidClassRange(2));
  }

  #[test]
  fn non_ascii_byte_is_rejected() {
    assert_eq!(error_of("a\u{00e9}"), RegexError::NonAscii(1));
  }
}
