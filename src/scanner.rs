/*!

  The table-driven scanner: maximal munch with priority tie-breaking.

  From each position it walks the table as far as any transition leads,
  remembering the last accepting state it passed through; the lexeme is
  the longest accepted prefix, and the token's category was already
  resolved per state when the DFA was built. When not even one byte can
  be accepted, the scanner emits a single-byte `UNKNOWN` token and moves
  on, so every byte of the input lands in exactly one token and the
  scan always terminates.

  The scanner borrows the table immutably and keeps all cursor state
  local, so any number of scanners can share one table.

*/

use crate::position::Position;
use crate::table::TransitionTable;
use crate::token::{Token, TokenStream};
use crate::{CategoryId, StateId32, UNKNOWN_CATEGORY};

pub struct Scanner<'t> {
  table: &'t TransitionTable,
}

impl<'t> Scanner<'t> {
  pub fn new(table: &'t TransitionTable) -> Scanner<'t> {
    Scanner { table }
  }

  /// Partitions `src` into a stream of categorized lexemes. Trivia is
  /// not filtered here; that is the caller's policy.
  pub fn scan(&self, src: &[u8]) -> TokenStream {
    let mut stream = TokenStream::new();
    let mut pos = 0usize;
    let mut position = Position::new(); //< line/col of the next unconsumed byte

    while pos < src.len() {
      let mut state = self.table.start_state;
      let mut last_accept: Option<StateId32> = None;
      let mut last_pos = 0usize; //< only meaningful once last_accept is set

      let lexeme_position = position;
      let mut cursor = position;          //< tracks the walk byte by byte
      let mut accept_position = position; //< cursor snapshot at the last accept

      let mut p = pos;
      while p < src.len() {
        let next = self.table.next_state(state, src[p]);
        if next < 0 {
          break;
        }
        debug_assert!((next as usize) < self.table.state_count(), "table cell out of range");
        state = next as StateId32;
        cursor.advance(src[p]);

        if self.table.accept[state as usize] {
          last_accept = Some(state);
          last_pos = p;
          accept_position = cursor;
        }
        p += 1;
      }

      match last_accept {
        Some(accept_state) => {
          // -1 (an accepting state with no category) casts onto the
          // sentinel, though the combiner never produces one.
          let category = self.table.state_category[accept_state as usize] as CategoryId;
          stream.push(Token::new(
            category,
            &src[pos..=last_pos],
            lexeme_position.line,
            lexeme_position.col,
          ));
          pos = last_pos + 1;
          position = accept_position;
        }
        None => {
          stream.push(Token::new(
            UNKNOWN_CATEGORY,
            &src[pos..pos + 1],
            position.line,
            position.col,
          ));
          position.advance(src[pos]);
          pos += 1;
        }
      }
    }

    stream
  }
}
