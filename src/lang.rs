/*!

  The built-in pattern list the driver lexes source files with. Keywords
  and operators are written as quoted literal runs so no metacharacter
  needs escaping; they outrank the identifier pattern so that an exact
  keyword wins the tie at equal length, while anything longer (`iffy`,
  `trueish`) falls through to `IDENTIFIER` by maximal munch.

*/

use crate::pattern::PatternSpec;

const KEYWORD_PRIORITY: u32 = 10;
const LITERAL_PRIORITY: u32 = 20;
const IDENTIFIER_PRIORITY: u32 = 30;
const TRIVIA_PRIORITY: u32 = 40;

/// Categories the driver drops from the symbol table unless asked to
/// keep them.
pub const TRIVIA_CATEGORIES: [&str; 2] = ["WHITESPACE", "COMMENT"];

pub fn builtin_patterns() -> Vec<PatternSpec> {
  let mut patterns = Vec::new();

  // Trivia.
  patterns.push(PatternSpec::with_priority(r"\s+", "WHITESPACE", TRIVIA_PRIORITY));
  patterns.push(PatternSpec::with_priority(r"#[^\n]*", "COMMENT", TRIVIA_PRIORITY));

  // Keywords.
  for (keyword, category) in [
    ("if", "IF_TOK"),
    ("elif", "ELIF_TOK"),
    ("else", "ELSE_TOK"),
    ("while", "WHILE_TOK"),
    ("for", "FOR_TOK"),
    ("in", "IN_TOK"),
    ("func", "FUNC_TOK"),
    ("return", "RETURN_TOK"),
    ("var", "VAR_TOK"),
    ("break", "BREAK_TOK"),
    ("continue", "CONTINUE_TOK"),
    ("and", "AND"),
    ("or", "OR"),
    ("not", "NOT"),
    ("print", "PRINT_TOK"),
    ("input", "INPUT_TOK"),
    ("import", "IMPORT_TOK"),
    ("from", "FROM_TOK"),
    ("int", "INT_TOK"),
    ("float", "FLOAT_TOK"),
    ("bool", "BOOL_TOK"),
    ("string", "STRING_TOK"),
    ("void", "VOID_TOK"),
  ]
  .iter()
  {
    patterns.push(PatternSpec::with_priority(
      &format!("\"{}\"", keyword),
      category,
      KEYWORD_PRIORITY,
    ));
  }

  // Literals. The float pattern precedes the int pattern in the list,
  // though maximal munch already keeps `12.34` whole.
  patterns.push(PatternSpec::with_priority(
    "\"true\"|\"false\"",
    "BOOL_LITERAL",
    KEYWORD_PRIORITY,
  ));
  patterns.push(PatternSpec::with_priority(r"\d+\.\d+", "FLOAT_LITERAL", LITERAL_PRIORITY));
  patterns.push(PatternSpec::with_priority(r"\d+", "INT_LITERAL", LITERAL_PRIORITY));
  patterns.push(PatternSpec::with_priority(
    r#"\"\"\"[\s\S]*\"\"\""#,
    "MULTILINE_STRING",
    LITERAL_PRIORITY,
  ));
  patterns.push(PatternSpec::with_priority(
    r#"\"[^\"\n]*\""#,
    "STRING_LITERAL",
    LITERAL_PRIORITY,
  ));
  patterns.push(PatternSpec::with_priority(r"'[^'\n]'", "CHAR_LITERAL", LITERAL_PRIORITY));

  // Identifiers.
  patterns.push(PatternSpec::with_priority(
    "[a-zA-Z_][a-zA-Z0-9_]*",
    "IDENTIFIER",
    IDENTIFIER_PRIORITY,
  ));

  // Operators, two-byte before one-byte for readability only; length
  // decides at scan time.
  for (operator, category) in [
    ("**", "DOUBLE_ASTERISK"),
    ("//", "DOUBLE_SLASH"),
    ("==", "EQUAL"),
    ("!=", "NOT_EQUAL"),
    ("<=", "LESS_EQUAL"),
    (">=", "GREATER_EQUAL"),
    ("*", "ASTERISK"),
    ("/", "SLASH"),
    ("+", "PLUS"),
    ("-", "MINUS"),
    ("%", "MODULO"),
    ("<", "LESS_THAN"),
    (">", "GREATER_THAN"),
    ("=", "ASSIGN"),
    ("(", "LEFT_PARENTHESIS"),
    (")", "RIGHT_PARENTHESIS"),
    ("[", "LEFT_SQUARE_BRACKET"),
    ("]", "RIGHT_SQUARE_BRACKET"),
    ("{", "LEFT_CURLY_BRACE"),
    ("}", "RIGHT_CURLY_BRACE"),
    (",", "COMMA"),
    (":", "COLON"),
    (";", "SEMI_COLON"),
    (".", "DOT_TOK"),
  ]
  .iter()
  {
    patterns.push(PatternSpec::with_priority(
      &format!("\"{}\"", operator),
      category,
      KEYWORD_PRIORITY,
    ));
  }

  patterns
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::compiler::Compiler;
  use crate::scanner::Scanner;

  fn lex(src: &[u8]) -> Vec<(String, String)> {
    let table = Compiler::new(builtin_patterns()).compile().unwrap();
    Scanner::new(&table)
      .scan(src)
      .iter()
      .map(|token| {
        (table.category_name(token.category).to_string(), token.lexeme_str().to_string())
      })
      .collect()
  }

  #[test]
  fn the_builtin_language_compiles() {
    let table = Compiler::new(builtin_patterns()).compile().unwrap();
    assert!(table.state_count() > 0);
  }

  #[test]
  fn keywords_beat_identifiers_and_lose_to_longer_ones() {
    let tokens = lex(b"if iffy");
    assert_eq!(tokens[0], ("IF_TOK".to_string(), "if".to_string()));
    assert_eq!(tokens[2], ("IDENTIFIER".to_string(), "iffy".to_string()));
  }

  #[test]
  fn a_small_program_tokenizes_cleanly() {
    let tokens = lex(b"var x = 12.5 ** 2 # power\n");
    let kinds: Vec<&str> = tokens.iter().map(|(kind, _)| kind.as_str()).collect();
    assert_eq!(
      kinds,
      vec![
        "VAR_TOK",
        "WHITESPACE",
        "IDENTIFIER",
        "WHITESPACE",
        "ASSIGN",
        "WHITESPACE",
        "FLOAT_LITERAL",
        "WHITESPACE",
        "DOUBLE_ASTERISK",
        "WHITESPACE",
        "INT_LITERAL",
        "WHITESPACE",
        "COMMENT",
        "WHITESPACE",
      ]
    );
  }

  #[test]
  fn strings_and_numbers() {
    let tokens = lex(b"\"hi\" 'c' 3.14 42 true");
    let kinds: Vec<&str> =
      tokens.iter().filter(|(kind, _)| kind != "WHITESPACE").map(|(kind, _)| kind.as_str()).collect();
    assert_eq!(
      kinds,
      vec!["STRING_LITERAL", "CHAR_LITERAL", "FLOAT_LITERAL", "INT_LITERAL", "BOOL_LITERAL"]
    );
  }
}
