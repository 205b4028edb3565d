/*!

  The regular-expression surface language: a tokenizer that expands
  escapes and character classes, and a predictive parser producing the
  syntax tree the Thompson construction consumes.

*/

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::Ast;
pub use lexer::{RegexLexer, RegexToken, SpannedToken};
pub use parser::RegexParser;

use crate::error::RegexError;

/// Tokenizes and parses one pattern string.
pub fn parse_pattern(pattern: &str) -> Result<Ast, RegexError> {
  let tokens = RegexLexer::new(pattern).tokenize()?;
  RegexParser::new(&tokens).parse()
}
