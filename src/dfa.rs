/*!

  Subset construction. The working unit is a set of NFA state ids;
  canonicalized (sorted) subsets key the map that guarantees each
  reachable subset becomes exactly one DFA state and is processed
  exactly once.

  Token categories are resolved here, once: every accepting DFA state
  records the category of the accepting NFA state that minimizes the
  pair (priority, pattern order). The scanner never sees patterns or
  priorities again.

*/

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::fmt::{Display, Formatter};

use smallvec::SmallVec;

use crate::chars::escape_byte;
use crate::error::BuildError;
use crate::nfa::Nfa;
use crate::{CategoryId, StateId32};

/// A canonical (ascending) set of NFA ids. Small machines stay on the
/// stack.
pub type Subset = SmallVec<[StateId32; 8]>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaState {
  pub id: StateId32,
  pub subset: Subset, //< The NFA states this state stands for
  pub is_accept: bool,
  pub category: Option<CategoryId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DfaTransition {
  pub from: StateId32,
  pub to: StateId32,
  pub symbol: u8,
}

/// Whole-string acceptance, with the winning category when accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOutcome {
  pub matched: bool,
  pub category: Option<CategoryId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
  pub states: Vec<DfaState>,
  pub transitions: Vec<DfaTransition>,
  pub start: StateId32,
  pub accept_states: BTreeSet<StateId32>,
}

impl Dfa {
  fn create_state(&mut self, subset: Subset, nfa: &Nfa) -> StateId32 {
    let id = self.states.len() as StateId32;

    // Accept iff any member accepts; the category is the accepting
    // member minimizing (priority, pattern order).
    let mut is_accept = false;
    let mut best: Option<(u32, u32, CategoryId)> = None;
    for &nfa_id in &subset {
      let state = nfa.state(nfa_id);
      if !state.is_accept {
        continue;
      }
      is_accept = true;
      if let Some(category) = state.category {
        let candidate = (state.priority, state.pattern_order, category);
        if best.map_or(true, |current| (candidate.0, candidate.1) < (current.0, current.1)) {
          best = Some(candidate);
        }
      }
    }

    if is_accept {
      self.accept_states.insert(id);
    }
    self.states.push(DfaState {
      id,
      subset,
      is_accept,
      category: best.map(|(_, _, category)| category),
    });
    id
  }

  /// Linear lookup, fine off the hot path; the scanner goes through the
  /// compacted table instead.
  pub fn next_state(&self, from: StateId32, symbol: u8) -> Option<StateId32> {
    self
      .transitions
      .iter()
      .find(|transition| transition.from == from && transition.symbol == symbol)
      .map(|transition| transition.to)
  }

  /// Runs the whole input through the machine.
  pub fn matches(&self, input: &[u8]) -> MatchOutcome {
    let mut current = self.start;

    for &byte in input {
      match self.next_state(current, byte) {
        Some(next) => current = next,
        None => return MatchOutcome { matched: false, category: None },
      }
    }

    let state = &self.states[current as usize];
    MatchOutcome {
      matched: state.is_accept,
      category: if state.is_accept { state.category } else { None },
    }
  }
}

impl Display for Dfa {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    writeln!(f, "DFA states: {}", self.states.len())?;
    writeln!(f, "Start state: {}", self.start)?;
    writeln!(f, "Transitions:")?;
    for transition in &self.transitions {
      writeln!(
        f,
        "  state {} -> state {} ['{}']",
        transition.from,
        transition.to,
        escape_byte(transition.symbol)
      )?;
    }
    for state in &self.states {
      if state.is_accept {
        writeln!(f, "  state {} accepts (category {:?})", state.id, state.category)?;
      }
    }
    Ok(())
  }
}

fn canonical(set: &BTreeSet<StateId32>) -> Subset {
  // BTreeSet iteration is already ascending.
  set.iter().copied().collect()
}

/**
  Powerset construction over the NFA's byte alphabet.

  Worst case this is exponential in the NFA size; in practice it is
  bounded by the number of reachable subsets, and the subset map keeps
  any subset from being expanded twice.
*/
pub fn determinize(nfa: &Nfa) -> Result<Dfa, BuildError> {
  if nfa.state_count() == 0 {
    return Err(BuildError::EmptyMachine);
  }
  if !nfa.states().iter().any(|state| state.is_accept) {
    return Err(BuildError::EmptyMachine);
  }
  let alphabet = nfa.alphabet();
  if alphabet.is_empty() {
    // Nothing can ever advance from the start state.
    return Err(BuildError::EmptyMachine);
  }

  debug_logln!("determinizing over {} alphabet bytes", alphabet.len());

  let mut dfa = Dfa {
    states: Vec::new(),
    transitions: Vec::new(),
    start: 0,
    accept_states: BTreeSet::new(),
  };

  let mut start_set = BTreeSet::new();
  start_set.insert(nfa.start);
  let start_closure = nfa.epsilon_closure(&start_set);

  let mut subset_ids: HashMap<Subset, StateId32> = HashMap::new();
  let mut queue: VecDeque<(StateId32, BTreeSet<StateId32>)> = VecDeque::new();

  let start_id = dfa.create_state(canonical(&start_closure), nfa);
  dfa.start = start_id;
  subset_ids.insert(canonical(&start_closure), start_id);
  queue.push_back((start_id, start_closure));

  while let Some((current_id, current_set)) = queue.pop_front() {
    for byte in alphabet.iter() {
      let next_set = nfa.epsilon_closure(&nfa.move_on(&current_set, byte));
      if next_set.is_empty() {
        continue;
      }

      let key = canonical(&next_set);
      let next_id = match subset_ids.get(&key) {
        Some(&existing) => existing,
        None => {
          let created = dfa.create_state(key.clone(), nfa);
          subset_ids.insert(key, created);
          queue.push_back((created, next_set));
          created
        }
      };

      dfa.transitions.push(DfaTransition { from: current_id, to: next_id, symbol: byte });
    }
  }

  debug_logln!("DFA construction complete with {} states", dfa.states.len());
  Ok(dfa)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::nfa::{combine, PatternAst};
  use crate::regex::parse_pattern;

  fn dfa_of(patterns: &[(&str, u32)]) -> Dfa {
    let parsed: Vec<PatternAst> = patterns
      .iter()
      .enumerate()
      .map(|(index, (pattern, priority))| PatternAst {
        ast: parse_pattern(pattern).unwrap(),
        category: index as CategoryId,
        priority: *priority,
      })
      .collect();
    determinize(&combine(&parsed)).unwrap()
  }

  #[test]
  fn accepts_what_the_nfa_accepts() {
    let dfa = dfa_of(&[("(ab|cd)+", 0)]);
    assert!(dfa.matches(b"ab").matched);
    assert!(dfa.matches(b"abcd").matched);
    assert!(!dfa.matches(b"a").matched);
    assert!(!dfa.matches(b"").matched);
  }

  #[test]
  fn transitions_are_deterministic() {
    let dfa = dfa_of(&[("a*b", 0), ("[ab]+", 0)]);
    let mut seen = std::collections::HashSet::new();
    for transition in &dfa.transitions {
      assert!(
        seen.insert((transition.from, transition.symbol)),
        "two edges from state {} on {:?}",
        transition.from,
        transition.symbol as char
      );
    }
  }

  #[test]
  fn lower_priority_value_wins_ties() {
    // Both accept exactly "ab"; the second pattern has the stronger
    // priority.
    let dfa = dfa_of(&[("ab", 5), ("ab", 1)]);
    let outcome = dfa.matches(b"ab");
    assert!(outcome.matched);
    assert_eq!(outcome.category, Some(1));
  }

  #[test]
  fn list_order_breaks_equal_priorities() {
    let dfa = dfa_of(&[("ab", 3), ("ab", 3)]);
    assert_eq!(dfa.matches(b"ab").category, Some(0));
  }

  #[test]
  fn class_members_materialize_as_byte_edges() {
    let dfa = dfa_of(&[("[0-2]", 0)]);
    assert!(dfa.matches(b"0").matched);
    assert!(dfa.matches(b"2").matched);
    assert!(!dfa.matches(b"3").matched);
    // One DFA edge per member byte.
    assert_eq!(dfa.transitions.len(), 3);
  }

  #[test]
  fn machine_without_accepts_is_rejected() {
    let nfa = Nfa::new();
    assert_eq!(determinize(&nfa), Err(BuildError::EmptyMachine));
  }

  #[test]
  fn epsilon_only_machine_is_rejected() {
    // A machine accepting only the empty string has no byte alphabet;
    // no scanner could ever advance through it.
    let mut nfa = Nfa::new();
    let start = nfa.create_state();
    nfa.start = start;
    let accept = nfa.create_state();
    nfa.add_transition(start, accept, crate::nfa::NfaLabel::Epsilon);
    nfa.state_mut(accept).is_accept = true;
    assert_eq!(determinize(&nfa), Err(BuildError::EmptyMachine));
  }
}
