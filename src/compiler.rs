/*!

  Pipeline orchestration: pattern strings in, transition table out.

  Each stage owns its output and hands it to the next; nothing survives
  compilation except the table. Construction failures abort the whole
  pipeline and carry the index and source of the offending pattern, so
  nothing half-built ever reaches a scanner. Per-phase wall-clock times
  are recorded for the driver's verbose report.

*/

use std::time::Duration;

use quanta::Clock;

use crate::dfa::{determinize, Dfa};
use crate::error::BuildError;
use crate::nfa::{combine, Nfa, PatternAst};
use crate::pattern::PatternSpec;
use crate::regex::parse_pattern;
use crate::table::{CategorySet, TransitionTable};

/// Every intermediate product of one compilation, for callers that want
/// to inspect or dump the automata.
pub struct Compilation {
  pub nfa: Nfa,
  pub dfa: Dfa,
  pub table: TransitionTable,
}

pub struct Compiler {
  patterns: Vec<PatternSpec>,

  // Phase timings, filled in by `compile_all`.
  pub parse_time: Duration,
  pub nfa_time: Duration,
  pub dfa_time: Duration,
  pub table_time: Duration,
}

impl Compiler {
  pub fn new(patterns: Vec<PatternSpec>) -> Compiler {
    Compiler {
      patterns,
      parse_time: Duration::default(),
      nfa_time: Duration::default(),
      dfa_time: Duration::default(),
      table_time: Duration::default(),
    }
  }

  /// Runs the whole pipeline and returns just the table.
  pub fn compile(&mut self) -> Result<TransitionTable, BuildError> {
    Ok(self.compile_all()?.table)
  }

  /// Runs the whole pipeline, keeping the intermediate automata.
  pub fn compile_all(&mut self) -> Result<Compilation, BuildError> {
    if self.patterns.is_empty() {
      return Err(BuildError::EmptyMachine);
    }

    let timer: Clock = Clock::new();

    debug_logln!("BEGIN compile: {} patterns", self.patterns.len());

    let parse_start = timer.raw();
    let mut categories = CategorySet::new();
    let mut parsed = Vec::with_capacity(self.patterns.len());
    for (index, pattern) in self.patterns.iter().enumerate() {
      debug_logln!("parsing pattern {}: {}", index, pattern.source);
      let ast = parse_pattern(&pattern.source).map_err(|error| BuildError::Pattern {
        index,
        source: pattern.source.clone(),
        error,
      })?;
      parsed.push(PatternAst {
        ast,
        category: categories.intern(&pattern.category),
        priority: pattern.priority,
      });
    }
    self.parse_time = timer.delta(parse_start, timer.raw());

    let nfa_start = timer.raw();
    let nfa = combine(&parsed);
    self.nfa_time = timer.delta(nfa_start, timer.raw());
    debug_logln!("combined NFA has {} states", nfa.state_count());

    let dfa_start = timer.raw();
    let dfa = determinize(&nfa)?;
    self.dfa_time = timer.delta(dfa_start, timer.raw());
    debug_logln!("DFA has {} states", dfa.states.len());

    let table_start = timer.raw();
    let table = TransitionTable::from_dfa(&dfa, categories.into_names());
    self.table_time = timer.delta(table_start, timer.raw());

    debug_logln!("END compile");
    Ok(Compilation { nfa, dfa, table })
  }

  /// Per-phase wall-clock summary for verbose output.
  pub fn timing_report(&self) -> String {
    format!(
      "parse: {}us\nnfa: {}us\ndfa: {}us\ntable: {}us",
      self.parse_time.as_micros(),
      self.nfa_time.as_micros(),
      self.dfa_time.as_micros(),
      self.table_time.as_micros()
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::RegexError;

  #[test]
  fn compiles_a_small_language() {
    let mut compiler = Compiler::new(vec![
      PatternSpec::new(r"\d+", "INT"),
      PatternSpec::new("[a-z]+", "WORD"),
    ]);
    let table = compiler.compile().unwrap();
    assert!(table.matches(b"123").matched);
    assert!(table.matches(b"abc").matched);
    assert_eq!(table.categories, vec!["INT".to_string(), "WORD".to_string()]);
  }

  #[test]
  fn pattern_errors_carry_their_index() {
    let mut compiler = Compiler::new(vec![
      PatternSpec::new("ok", "OK"),
      PatternSpec::new("[broken", "BAD"),
    ]);
    match compiler.compile() {
      Err(BuildError::Pattern { index, source, error }) => {
        assert_eq!(index, 1);
        assert_eq!(source, "[broken");
        assert_eq!(error, RegexError::UnterminatedClass(0));
      }
      other => panic!("expected a pattern error, got {:?}", other.map(|_| ())),
    }
  }

  #[test]
  fn an_empty_pattern_list_is_an_empty_machine() {
    let mut compiler = Compiler::new(Vec::new());
    assert!(matches!(compiler.compile(), Err(BuildError::EmptyMachine)));
  }

  #[test]
  fn construction_is_idempotent() {
    let patterns = vec![
      PatternSpec::new(r"\d+", "INT"),
      PatternSpec::new(r"\d+\.\d+", "FLOAT"),
      PatternSpec::new("[a-zA-Z_][a-zA-Z0-9_]*", "IDENT"),
      PatternSpec::new(r"\s+", "WS"),
    ];
    let first = Compiler::new(patterns.clone()).compile().unwrap();
    let second = Compiler::new(patterns).compile().unwrap();
    assert_eq!(first, second);
  }
}
