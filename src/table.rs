/*!

  Compaction of the DFA into dense arrays: a `state_count × symbol_count`
  next-state matrix over the machine's alphabet, a 256-entry byte-to-
  column map, and per-state accept/category vectors. The table is
  immutable once built and is the only structure the scanner needs.

  Token category names are interned here into dense ids. Names are
  sanitized into identifier form on the way in, so the emitted artifact
  and the in-memory table always agree on spelling.

*/

use std::collections::{BTreeSet, HashMap};

use crate::dfa::{Dfa, MatchOutcome};
use crate::{CategoryId, StateId32, UNKNOWN_CATEGORY};

/// The printable name reserved for the sentinel category.
pub const UNKNOWN_NAME: &str = "UNKNOWN";

/// Interns raw category names into dense ids with identifier-safe,
/// collision-free printable names.
#[derive(Debug, Clone, Default)]
pub struct CategorySet {
  names: Vec<String>,
  by_raw: HashMap<String, CategoryId>,
}

impl CategorySet {
  pub fn new() -> CategorySet {
    CategorySet::default()
  }

  /// Returns the id for `raw`, interning it on first sight. Identical
  /// raw names share an id even when sanitization would collide.
  pub fn intern(&mut self, raw: &str) -> CategoryId {
    if let Some(&id) = self.by_raw.get(raw) {
      return id;
    }

    let mut name = sanitize(raw);
    if name == UNKNOWN_NAME || self.names.iter().any(|existing| *existing == name) {
      let stem = name.clone();
      let mut suffix = 2usize;
      loop {
        name = format!("{}_{}", stem, suffix);
        if name != UNKNOWN_NAME && !self.names.iter().any(|existing| *existing == name) {
          break;
        }
        suffix += 1;
      }
    }

    let id = self.names.len() as CategoryId;
    self.names.push(name);
    self.by_raw.insert(raw.to_string(), id);
    id
  }

  pub fn name(&self, id: CategoryId) -> &str {
    &self.names[id as usize]
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }

  pub fn into_names(self) -> Vec<String> {
    self.names
  }
}

/// Forces `raw` into identifier shape: leading alphabetic, then
/// alphanumerics and underscores.
fn sanitize(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());
  for (index, ch) in raw.chars().enumerate() {
    let keep = if index == 0 { ch.is_ascii_alphabetic() } else { ch.is_ascii_alphanumeric() || ch == '_' };
    out.push(if keep { ch } else { '_' });
  }
  if out.is_empty() || !out.starts_with(|ch: char| ch.is_ascii_alphabetic()) {
    out = format!("T{}", out);
  }
  out
}

/// The dense transition table. Immutable after `from_dfa`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
  pub alphabet: Vec<u8>,        //< Bytes appearing on any DFA edge, ascending
  pub symbol_to_id: Vec<i32>,   //< 256 entries, column index or -1
  pub rows: Vec<Vec<i32>>,      //< state_count rows of symbol_count cells, next id or -1
  pub start_state: StateId32,
  pub accept: Vec<bool>,        //< One flag per state
  pub state_category: Vec<i32>, //< Category id per state, -1 when none
  pub categories: Vec<String>,  //< Printable name per category id
}

impl TransitionTable {
  pub fn from_dfa(dfa: &Dfa, categories: Vec<String>) -> TransitionTable {
    let alphabet_set: BTreeSet<u8> =
      dfa.transitions.iter().map(|transition| transition.symbol).collect();
    let alphabet: Vec<u8> = alphabet_set.into_iter().collect();

    let mut symbol_to_id = vec![-1i32; 256];
    for (column, &byte) in alphabet.iter().enumerate() {
      symbol_to_id[byte as usize] = column as i32;
    }

    let state_count = dfa.states.len();
    let mut rows = vec![vec![-1i32; alphabet.len()]; state_count];
    for transition in &dfa.transitions {
      let column = symbol_to_id[transition.symbol as usize];
      debug_assert!(column >= 0);
      rows[transition.from as usize][column as usize] = transition.to as i32;
    }

    let mut accept = vec![false; state_count];
    let mut state_category = vec![-1i32; state_count];
    for state in &dfa.states {
      accept[state.id as usize] = state.is_accept;
      if let Some(category) = state.category {
        state_category[state.id as usize] = category as i32;
      }
    }

    let table = TransitionTable {
      alphabet,
      symbol_to_id,
      rows,
      start_state: dfa.start,
      accept,
      state_category,
      categories,
    };
    table.check();
    table
  }

  pub fn state_count(&self) -> usize {
    self.rows.len()
  }

  pub fn symbol_count(&self) -> usize {
    self.alphabet.len()
  }

  /// Next state id on `byte`, or -1 when `byte` is out of the alphabet
  /// or the cell is dead.
  pub fn next_state(&self, state: StateId32, byte: u8) -> i32 {
    let column = self.symbol_to_id[byte as usize];
    if column < 0 {
      return -1;
    }
    self.rows[state as usize][column as usize]
  }

  /// Printable name of a category id, including the sentinel.
  pub fn category_name(&self, id: CategoryId) -> &str {
    if id == UNKNOWN_CATEGORY {
      UNKNOWN_NAME
    } else {
      &self.categories[id as usize]
    }
  }

  /// Whole-string acceptance, for tests and offline checks.
  pub fn matches(&self, input: &[u8]) -> MatchOutcome {
    let mut current = self.start_state;

    for &byte in input {
      let next = self.next_state(current, byte);
      if next < 0 {
        return MatchOutcome { matched: false, category: None };
      }
      current = next as StateId32;
    }

    let index = current as usize;
    if !self.accept[index] {
      return MatchOutcome { matched: false, category: None };
    }
    let category = self.state_category[index];
    MatchOutcome {
      matched: true,
      category: if category >= 0 { Some(category as CategoryId) } else { None },
    }
  }

  /// Structural soundness; violations are bugs, not inputs.
  fn check(&self) {
    let state_count = self.rows.len() as i32;
    assert!((self.start_state as i32) < state_count, "start state out of range");
    assert_eq!(self.symbol_to_id.len(), 256);
    assert_eq!(self.accept.len(), self.rows.len());
    assert_eq!(self.state_category.len(), self.rows.len());
    for row in &self.rows {
      assert_eq!(row.len(), self.alphabet.len());
      for &cell in row {
        assert!(cell >= -1 && cell < state_count, "table cell out of range");
      }
    }
    for &category in &self.state_category {
      assert!(
        category >= -1 && (category as i64) < self.categories.len() as i64,
        "state category out of range"
      );
    }
  }
}
