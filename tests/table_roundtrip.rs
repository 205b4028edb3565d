//! The emitted table artifact must reload into a table identical to the
//! one that was built, and a scanner running from the reloaded table
//! must behave identically.

use scandium::compiler::Compiler;
use scandium::emit::{read_table, write_table};
use scandium::lang::builtin_patterns;
use scandium::scanner::Scanner;

#[test]
fn emit_then_reload_preserves_every_field() {
  let table = Compiler::new(builtin_patterns()).compile().unwrap();

  let mut buffer = Vec::new();
  write_table(&table, &mut buffer).unwrap();
  let reloaded = read_table(std::str::from_utf8(&buffer).unwrap()).unwrap();

  assert_eq!(table.alphabet, reloaded.alphabet);
  assert_eq!(table.symbol_to_id, reloaded.symbol_to_id);
  assert_eq!(table.rows, reloaded.rows);
  assert_eq!(table.start_state, reloaded.start_state);
  assert_eq!(table.accept, reloaded.accept);
  assert_eq!(table.state_category, reloaded.state_category);
  assert_eq!(table.categories, reloaded.categories);
}

#[test]
fn a_reloaded_table_scans_identically() {
  let built = Compiler::new(builtin_patterns()).compile().unwrap();
  let mut buffer = Vec::new();
  write_table(&built, &mut buffer).unwrap();
  let reloaded = read_table(std::str::from_utf8(&buffer).unwrap()).unwrap();

  let source = b"func fib(n) {\n  if n <= 1 { return n }\n  return fib(n - 1) + fib(n - 2)\n}\n# done\n";
  let from_built = Scanner::new(&built).scan(source);
  let from_reloaded = Scanner::new(&reloaded).scan(source);
  assert_eq!(from_built, from_reloaded);
}

#[test]
fn emitting_twice_is_deterministic() {
  let table = Compiler::new(builtin_patterns()).compile().unwrap();
  let mut first = Vec::new();
  let mut second = Vec::new();
  write_table(&table, &mut first).unwrap();
  write_table(&table, &mut second).unwrap();
  assert_eq!(first, second);
}
