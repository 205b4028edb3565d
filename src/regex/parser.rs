/*!

  Predictive parser for the tokenized pattern, with the usual precedence
  ladder: alternation binds loosest, then juxtaposed concatenation, then
  the postfix quantifiers. Allocation is linear in the token count.

  An alternative may be empty (`a|` and `(|a)` both mean "optionally
  `a`"), which comes out as a `Question` wrapper rather than a dedicated
  empty node. A pattern or group that denotes nothing at all is an
  error, as is a quantifier with no atom or stacked directly on another
  quantifier.

*/

use crate::chars::DOT_CLASS;
use crate::error::RegexError;
use crate::regex::ast::Ast;
use crate::regex::lexer::{RegexToken, SpannedToken};

pub struct RegexParser<'a> {
  tokens: &'a [SpannedToken],
  pos: usize,
}

impl<'a> RegexParser<'a> {
  pub fn new(tokens: &'a [SpannedToken]) -> RegexParser<'a> {
    RegexParser { tokens, pos: 0 }
  }

  fn peek(&self) -> &SpannedToken {
    // The token stream always ends with `End`, so peeking is total.
    &self.tokens[self.pos.min(self.tokens.len() - 1)]
  }

  fn advance(&mut self) -> &SpannedToken {
    let token = &self.tokens[self.pos.min(self.tokens.len() - 1)];
    if self.pos < self.tokens.len() - 1 {
      self.pos += 1;
    }
    token
  }

  pub fn parse(mut self) -> Result<Ast, RegexError> {
    let ast = self.parse_union()?;

    let trailing = self.peek();
    match trailing.token {
      RegexToken::End => {}
      RegexToken::RParen => return Err(RegexError::MismatchedParens(trailing.idx)),
      _ => return Err(RegexError::UnexpectedToken(trailing.idx)),
    }

    ast.ok_or(RegexError::EmptyExpression(0))
  }

  /// `union → concat ('|' concat)*`. `None` means every alternative was
  /// empty; a mix of empty and nonempty alternatives makes the union
  /// optional.
  fn parse_union(&mut self) -> Result<Option<Ast>, RegexError> {
    let mut folded = self.parse_concat()?;
    let mut saw_empty = folded.is_none();

    while self.peek().token == RegexToken::Pipe {
      self.advance();
      match self.parse_concat()? {
        Some(right) => {
          folded = Some(match folded {
            Some(left) => Ast::Union(Box::new(left), Box::new(right)),
            None => right,
          });
        }
        None => saw_empty = true,
      }
    }

    match (folded, saw_empty) {
      (Some(ast), true) => Ok(Some(Ast::Question(Box::new(ast)))),
      (result, _) => Ok(result),
    }
  }

  /// `concat → closure+`, recognized by juxtaposition. `None` when no
  /// atom starts here.
  fn parse_concat(&mut self) -> Result<Option<Ast>, RegexError> {
    let mut node: Option<Ast> = None;

    loop {
      let next = self.peek();
      if next.token.is_quantifier() {
        // A quantifier directly after an atom is consumed by
        // `parse_closure`, so reaching one here means it repeats nothing.
        return Err(RegexError::DanglingQuantifier(next.idx));
      }
      if !next.token.starts_atom() {
        break;
      }
      let right = self.parse_closure()?;
      node = Some(match node {
        Some(left) => Ast::Concat(Box::new(left), Box::new(right)),
        None => right,
      });
    }

    Ok(node)
  }

  /// `closure → atom quantifier?`. A second quantifier in a row is an
  /// error; repetition of a repetition needs a group.
  fn parse_closure(&mut self) -> Result<Ast, RegexError> {
    let mut node = self.parse_atom()?;

    if self.peek().token.is_quantifier() {
      let quantifier = self.advance();
      node = match quantifier.token {
        RegexToken::Star => Ast::Star(Box::new(node)),
        RegexToken::Plus => Ast::Plus(Box::new(node)),
        RegexToken::Question => Ast::Question(Box::new(node)),
        _ => unreachable!(),
      };

      let next = self.peek();
      if next.token.is_quantifier() {
        return Err(RegexError::StackedQuantifier(next.idx));
      }
    }

    Ok(node)
  }

  /// `atom → char | class | dot | '(' union ')'`.
  fn parse_atom(&mut self) -> Result<Ast, RegexError> {
    let spanned = self.advance();
    let open_idx = spanned.idx;
    let token = spanned.token.clone();
    match token {
      RegexToken::Char(byte) => Ok(Ast::Char(byte)),
      RegexToken::Class(set) => Ok(Ast::Class(set)),
      // The dot materializes here as "any byte but newline".
      RegexToken::Dot => Ok(Ast::Class(DOT_CLASS)),
      RegexToken::LParen => {
        let inner = self.parse_union()?;
        let close = self.advance();
        if close.token != RegexToken::RParen {
          return Err(RegexError::MismatchedParens(open_idx));
        }
        inner.ok_or(RegexError::EmptyExpression(open_idx))
      }
      _ => Err(RegexError::UnexpectedToken(open_idx)),
    }
  }
}
