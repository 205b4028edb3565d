//! End-to-end checks through the public pipeline: pattern strings in,
//! token streams out.

use scandium::compiler::Compiler;
use scandium::pattern::PatternSpec;
use scandium::scanner::Scanner;
use scandium::table::TransitionTable;

fn build(patterns: &[(&str, &str)]) -> TransitionTable {
  let specs = patterns
    .iter()
    .map(|(pattern, category)| PatternSpec::new(pattern, category))
    .collect();
  Compiler::new(specs).compile().unwrap()
}

fn lex(table: &TransitionTable, src: &str) -> Vec<(String, String)> {
  Scanner::new(table)
    .scan(src.as_bytes())
    .iter()
    .map(|token| {
      (table.category_name(token.category).to_string(), token.lexeme_str().to_string())
    })
    .collect()
}

#[test]
fn keywords_identifiers_and_whitespace() {
  let table = build(&[
    ("\"if\"", "KW_IF"),
    ("[a-zA-Z_][a-zA-Z0-9_]*", "IDENT"),
    (r"\s+", "WS"),
  ]);
  let tokens = lex(&table, "if iffy");
  assert_eq!(
    tokens,
    vec![
      ("KW_IF".to_string(), "if".to_string()),
      ("WS".to_string(), " ".to_string()),
      ("IDENT".to_string(), "iffy".to_string()),
    ]
  );
}

#[test]
fn floats_beat_ints_by_length_not_priority() {
  let table = build(&[(r"\d+", "INT"), (r"\d+\.\d+", "FLOAT"), (r"\s+", "WS")]);
  let tokens = lex(&table, "12.34 56");
  assert_eq!(
    tokens,
    vec![
      ("FLOAT".to_string(), "12.34".to_string()),
      ("WS".to_string(), " ".to_string()),
      ("INT".to_string(), "56".to_string()),
    ]
  );
}

#[test]
fn greedy_operator_munching() {
  let table = build(&[("\"==\"", "EQEQ"), ("=", "EQ")]);
  assert_eq!(
    lex(&table, "==="),
    vec![("EQEQ".to_string(), "==".to_string()), ("EQ".to_string(), "=".to_string())]
  );
}

#[test]
fn unmatched_bytes_surface_as_unknown() {
  let table = build(&[(r#"\"[^\"\n]*\""#, "STR"), ("[a-zA-Z_][a-zA-Z0-9_]*", "IDENT")]);
  assert_eq!(
    lex(&table, "\"ab\"cd\""),
    vec![
      ("STR".to_string(), "\"ab\"".to_string()),
      ("IDENT".to_string(), "cd".to_string()),
      ("UNKNOWN".to_string(), "\"".to_string()),
    ]
  );
}

#[test]
fn comments_and_whitespace_spanning_newlines() {
  let table = build(&[
    (r"#[^\n]*", "CMT"),
    (r"\s+", "WS"),
    ("[a-zA-Z_][a-zA-Z0-9_]*", "IDENT"),
  ]);
  assert_eq!(
    lex(&table, "# hi\n x"),
    vec![
      ("CMT".to_string(), "# hi".to_string()),
      ("WS".to_string(), "\n ".to_string()),
      ("IDENT".to_string(), "x".to_string()),
    ]
  );
}

#[test]
fn longest_match_subsumes_alternated_keywords() {
  let table = build(&[("\"true\"|\"false\"", "BOOL"), ("[a-zA-Z_][a-zA-Z0-9_]*", "IDENT")]);
  assert_eq!(lex(&table, "trueish"), vec![("IDENT".to_string(), "trueish".to_string())]);
}

#[test]
fn every_input_byte_is_consumed_exactly_once() {
  let table = build(&[("ab", "AB"), (r"\d+", "INT")]);
  let inputs: [&[u8]; 7] = [b"", b"ababab", b"ab1ab", b"??", b"a", b"1a2b3", b"ab\xC2\xA0ab"];
  for src in inputs.iter() {
    let stream = Scanner::new(&table).scan(src);
    let total: usize = stream.iter().map(|token| token.lexeme().len()).sum();
    assert_eq!(total, src.len(), "input {:?}", String::from_utf8_lossy(src));
  }
}

#[test]
fn equal_priority_falls_back_to_list_order() {
  let specs = vec![
    PatternSpec::with_priority("ab", "FIRST", 7),
    PatternSpec::with_priority("ab", "SECOND", 7),
  ];
  let table = Compiler::new(specs).compile().unwrap();
  assert_eq!(lex(&table, "ab"), vec![("FIRST".to_string(), "ab".to_string())]);
}

#[test]
fn explicit_priority_overrides_list_order() {
  let specs = vec![
    PatternSpec::with_priority("ab", "WEAK", 9),
    PatternSpec::with_priority("ab", "STRONG", 1),
  ];
  let table = Compiler::new(specs).compile().unwrap();
  assert_eq!(lex(&table, "ab"), vec![("STRONG".to_string(), "ab".to_string())]);
}
