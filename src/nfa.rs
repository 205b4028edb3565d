/*!

  The ε-NFA and its two producers: Thompson construction over a single
  regex tree, and the combiner that unions one fragment per pattern
  under a fresh global start.

  States live in an arena owned by the `Nfa`; everything refers to them
  by dense integer id, which keeps the cyclic transition graph free of
  ownership knots and makes subsets cheap to copy around during
  determinization. ε is a dedicated label variant rather than a reserved
  byte, so NUL is an ordinary literal.

*/

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use defaultmap::DefaultHashMap;

use crate::chars::{escape_byte, ByteSet};
use crate::regex::Ast;
use crate::{CategoryId, StateId32};

/// An edge label: consume nothing, one exact byte, or any byte of a set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NfaLabel {
  Epsilon,
  Byte(u8),
  Class(ByteSet),
}

impl NfaLabel {
  /// Whether the edge consumes `byte`. ε never consumes.
  pub fn matches(&self, byte: u8) -> bool {
    match self {
      NfaLabel::Epsilon => false,
      NfaLabel::Byte(symbol) => *symbol == byte,
      NfaLabel::Class(set) => set.contains(byte),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfaTransition {
  pub from: StateId32,
  pub to: StateId32,
  pub label: NfaLabel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfaState {
  pub id: StateId32,
  pub is_accept: bool,
  pub category: Option<CategoryId>,
  pub priority: u32,      //< Lower value = higher priority; MAX until promoted
  pub pattern_order: u32, //< Position of the owning pattern, tiebreaker at equal priority
}

/// Transient handle produced by the Thompson construction: the entry and
/// exit states of one sub-machine. Neither is marked accepting until the
/// combiner promotes the exit of a whole pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
  pub start: StateId32,
  pub accept: StateId32,
}

#[derive(Debug, Clone)]
pub struct Nfa {
  states: Vec<NfaState>,
  transitions: Vec<NfaTransition>,
  outgoing: DefaultHashMap<StateId32, Vec<usize>>, //< Transition indices by source state
  pub start: StateId32,
}

impl Nfa {
  pub fn new() -> Nfa {
    Nfa {
      states: Vec::new(),
      transitions: Vec::new(),
      outgoing: DefaultHashMap::new(Vec::new()),
      start: 0,
    }
  }

  pub fn create_state(&mut self) -> StateId32 {
    let id = self.states.len() as StateId32;
    self.states.push(NfaState {
      id,
      is_accept: false,
      category: None,
      priority: u32::MAX,
      pattern_order: u32::MAX,
    });
    id
  }

  pub fn state(&self, id: StateId32) -> &NfaState {
    &self.states[id as usize]
  }

  pub(crate) fn state_mut(&mut self, id: StateId32) -> &mut NfaState {
    &mut self.states[id as usize]
  }

  pub fn state_count(&self) -> usize {
    self.states.len()
  }

  pub fn states(&self) -> &[NfaState] {
    &self.states
  }

  pub fn transitions(&self) -> &[NfaTransition] {
    &self.transitions
  }

  pub fn add_transition(&mut self, from: StateId32, to: StateId32, label: NfaLabel) {
    assert!(
      (from as usize) < self.states.len() && (to as usize) < self.states.len(),
      "transition endpoints must be live states"
    );
    let index = self.transitions.len();
    self.transitions.push(NfaTransition { from, to, label });
    self.outgoing.get_mut(from).push(index);
  }

  /// Least fixed point of `set` under ε edges.
  pub fn epsilon_closure(&self, set: &BTreeSet<StateId32>) -> BTreeSet<StateId32> {
    let mut closure = set.clone();
    let mut stack: Vec<StateId32> = set.iter().copied().collect();

    while let Some(id) = stack.pop() {
      for &index in self.outgoing[id].iter() {
        let transition = &self.transitions[index];
        if transition.label == NfaLabel::Epsilon && closure.insert(transition.to) {
          stack.push(transition.to);
        }
      }
    }

    closure
  }

  /// Every state reachable from `set` by consuming exactly `byte`.
  pub fn move_on(&self, set: &BTreeSet<StateId32>, byte: u8) -> BTreeSet<StateId32> {
    let mut result = BTreeSet::new();

    for &id in set {
      for &index in self.outgoing[id].iter() {
        let transition = &self.transitions[index];
        if transition.label.matches(byte) {
          result.insert(transition.to);
        }
      }
    }

    result
  }

  /// The union of all consuming edge labels; ε contributes nothing.
  pub fn alphabet(&self) -> ByteSet {
    let mut alphabet = ByteSet::new();
    for transition in &self.transitions {
      match &transition.label {
        NfaLabel::Epsilon => {}
        NfaLabel::Byte(byte) => {
          alphabet.insert(*byte);
        }
        NfaLabel::Class(set) => alphabet |= *set,
      }
    }
    alphabet
  }

  /// Direct simulation, for tests and debugging. The table-driven
  /// scanner never touches this.
  pub fn matches(&self, input: &[u8]) -> bool {
    let mut current: BTreeSet<StateId32> = BTreeSet::new();
    current.insert(self.start);
    current = self.epsilon_closure(&current);

    for &byte in input {
      current = self.epsilon_closure(&self.move_on(&current, byte));
      if current.is_empty() {
        return false;
      }
    }

    current.iter().any(|&id| self.state(id).is_accept)
  }
}

impl Display for Nfa {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    writeln!(f, "NFA states: {}", self.states.len())?;
    writeln!(f, "Start state: {}", self.start)?;
    writeln!(f, "Transitions:")?;
    for transition in &self.transitions {
      write!(f, "  state {} -> state {}", transition.from, transition.to)?;
      match &transition.label {
        NfaLabel::Epsilon => writeln!(f, " [epsilon]")?,
        NfaLabel::Byte(byte) => writeln!(f, " ['{}']", escape_byte(*byte))?,
        NfaLabel::Class(set) => writeln!(f, " {}", set)?,
      }
    }
    for state in &self.states {
      if state.is_accept {
        writeln!(f, "  state {} accepts (priority {})", state.id, state.priority)?;
      }
    }
    Ok(())
  }
}

/**
  Thompson construction. Every syntax tree node becomes a fragment with
  exactly one entry and one exit, wired internally by ε edges and
  single-byte or single-class edges. No inner state is ever marked
  accepting.
*/
pub struct Thompson<'a> {
  nfa: &'a mut Nfa,
}

impl<'a> Thompson<'a> {
  pub fn new(nfa: &'a mut Nfa) -> Thompson<'a> {
    Thompson { nfa }
  }

  pub fn build(&mut self, ast: &Ast) -> Fragment {
    match ast {
      Ast::Char(byte) => self.build_byte(*byte),
      Ast::Class(set) => self.build_class(*set),
      Ast::Concat(left, right) => {
        let left = self.build(left);
        let right = self.build(right);
        self.build_concat(left, right)
      }
      Ast::Union(left, right) => {
        let left = self.build(left);
        let right = self.build(right);
        self.build_union(left, right)
      }
      Ast::Star(inner) => {
        let inner = self.build(inner);
        self.build_star(inner)
      }
      Ast::Plus(inner) => {
        let inner = self.build(inner);
        self.build_plus(inner)
      }
      Ast::Question(inner) => {
        let inner = self.build(inner);
        self.build_question(inner)
      }
    }
  }

  fn build_byte(&mut self, byte: u8) -> Fragment {
    let start = self.nfa.create_state();
    let accept = self.nfa.create_state();
    self.nfa.add_transition(start, accept, NfaLabel::Byte(byte));
    Fragment { start, accept }
  }

  fn build_class(&mut self, set: ByteSet) -> Fragment {
    debug_assert!(!set.is_empty(), "class edges carry nonempty sets");
    let start = self.nfa.create_state();
    let accept = self.nfa.create_state();
    self.nfa.add_transition(start, accept, NfaLabel::Class(set));
    Fragment { start, accept }
  }

  fn build_concat(&mut self, left: Fragment, right: Fragment) -> Fragment {
    self.nfa.add_transition(left.accept, right.start, NfaLabel::Epsilon);
    Fragment { start: left.start, accept: right.accept }
  }

  fn build_union(&mut self, left: Fragment, right: Fragment) -> Fragment {
    let start = self.nfa.create_state();
    let accept = self.nfa.create_state();

    self.nfa.add_transition(start, left.start, NfaLabel::Epsilon);
    self.nfa.add_transition(start, right.start, NfaLabel::Epsilon);

    self.nfa.add_transition(left.accept, accept, NfaLabel::Epsilon);
    self.nfa.add_transition(right.accept, accept, NfaLabel::Epsilon);

    Fragment { start, accept }
  }

  fn build_star(&mut self, inner: Fragment) -> Fragment {
    let start = self.nfa.create_state();
    let accept = self.nfa.create_state();

    self.nfa.add_transition(start, inner.start, NfaLabel::Epsilon);
    self.nfa.add_transition(start, accept, NfaLabel::Epsilon);

    self.nfa.add_transition(inner.accept, inner.start, NfaLabel::Epsilon);
    self.nfa.add_transition(inner.accept, accept, NfaLabel::Epsilon);

    Fragment { start, accept }
  }

  fn build_plus(&mut self, inner: Fragment) -> Fragment {
    let start = self.nfa.create_state();
    let accept = self.nfa.create_state();

    self.nfa.add_transition(start, inner.start, NfaLabel::Epsilon);

    self.nfa.add_transition(inner.accept, inner.start, NfaLabel::Epsilon);
    self.nfa.add_transition(inner.accept, accept, NfaLabel::Epsilon);

    Fragment { start, accept }
  }

  fn build_question(&mut self, inner: Fragment) -> Fragment {
    let start = self.nfa.create_state();
    let accept = self.nfa.create_state();

    self.nfa.add_transition(start, inner.start, NfaLabel::Epsilon);
    self.nfa.add_transition(start, accept, NfaLabel::Epsilon);

    self.nfa.add_transition(inner.accept, accept, NfaLabel::Epsilon);

    Fragment { start, accept }
  }
}

/// One parsed pattern, ready for combination.
#[derive(Debug, Clone)]
pub struct PatternAst {
  pub ast: Ast,
  pub category: CategoryId,
  pub priority: u32,
}

/**
  Unions one fragment per pattern under a fresh global start and
  promotes each fragment's exit to an accepting state tagged with the
  pattern's category, priority, and list position. There is no global
  accept; accept information lives on the per-pattern exits.
*/
pub fn combine(patterns: &[PatternAst]) -> Nfa {
  let mut nfa = Nfa::new();
  let start = nfa.create_state();
  nfa.start = start;

  for (order, pattern) in patterns.iter().enumerate() {
    let fragment = Thompson::new(&mut nfa).build(&pattern.ast);
    nfa.add_transition(start, fragment.start, NfaLabel::Epsilon);

    let accept = nfa.state_mut(fragment.accept);
    accept.is_accept = true;
    accept.category = Some(pattern.category);
    accept.priority = pattern.priority;
    accept.pattern_order = order as u32;

    debug_log!("pattern {} accepts in state {}\n", order, fragment.accept);
  }

  nfa
}
