/*!

scandium compiles a prioritized list of regular expressions into a dense
deterministic transition table and scans byte buffers with it.

The pipeline runs in one direction: each pattern is tokenized
([`regex::lexer`]) and parsed ([`regex::parser`]), the resulting syntax
trees are lowered into one combined ε-NFA by Thompson construction
([`nfa`]), the NFA is determinized by subset construction ([`dfa`]), and
the DFA is compacted into a [`table::TransitionTable`]. The table is the
only artifact the [`scanner`] needs; it can also be serialized to a text
artifact and reloaded ([`emit`]) without rebuilding anything.

*/

#[macro_use]
pub mod debug;

pub mod chars;
pub mod compiler;
pub mod dfa;
pub mod emit;
pub mod error;
pub mod lang;
pub mod nfa;
pub mod options;
pub mod pattern;
pub mod position;
pub mod regex;
pub mod scanner;
pub mod table;
pub mod token;

// We alias types to document intent at use sites.
pub type Index32    = u32; //< An index into a pattern string
pub type StateId32  = u32; //< An NFA or DFA state id
pub type CategoryId = u32; //< An interned token category id

/// The sentinel category attached to bytes no pattern matches. Distinct
/// from every real category id, which are dense from zero.
pub const UNKNOWN_CATEGORY: CategoryId = CategoryId::MAX;
