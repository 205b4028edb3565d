/*!

  Serialization of a built `TransitionTable` to a line-oriented text
  artifact, and the loader that reads one back. The two directions
  round-trip: reloading an emitted artifact yields a table equal to the
  original on every field, so a scanner can run entirely from a file
  produced by an earlier build.

  The writer takes any output sink; opening and closing files is the
  caller's business. Bytes in the alphabet line are quoted and escaped
  so the artifact survives editors and diffs.

*/

use std::io::Write;

use crate::error::LoadError;
use crate::table::{TransitionTable, UNKNOWN_NAME};
use crate::{StateId32, UNKNOWN_CATEGORY};

const HEADER_COMMENT: &str = "# scandium transition table";

// region Writer

/// Emits `table` onto `out`, flushing before returning on the success
/// path; errors propagate to the caller, who owns the sink.
pub fn write_table<W: Write>(table: &TransitionTable, out: &mut W) -> std::io::Result<()> {
  writeln!(out, "{}", HEADER_COMMENT)?;
  writeln!(out, "STATE_COUNT {}", table.state_count())?;
  writeln!(out, "SYMBOL_COUNT {}", table.symbol_count())?;
  writeln!(out, "START_STATE_ID {}", table.start_state)?;

  write!(out, "ALPHABET")?;
  for &byte in &table.alphabet {
    write!(out, " '{}'", quote_byte(byte))?;
  }
  writeln!(out)?;

  write!(out, "SYMBOL_TO_ID")?;
  for &column in &table.symbol_to_id {
    write!(out, " {}", column)?;
  }
  writeln!(out)?;

  writeln!(out, "TRANSITION_TABLE")?;
  for row in &table.rows {
    let mut first = true;
    for &cell in row {
      if first {
        write!(out, "{}", cell)?;
        first = false;
      } else {
        write!(out, " {}", cell)?;
      }
    }
    writeln!(out)?;
  }

  write!(out, "ACCEPT_STATE_IDS")?;
  for &flag in &table.accept {
    write!(out, " {}", flag as u8)?;
  }
  writeln!(out)?;

  writeln!(out, "CATEGORIES {}", table.categories.len())?;
  for (id, name) in table.categories.iter().enumerate() {
    writeln!(out, "{} {}", name, id)?;
  }
  writeln!(out, "{} {}", UNKNOWN_NAME, UNKNOWN_CATEGORY)?;

  write!(out, "STATE_TOKEN_TYPE")?;
  for &category in &table.state_category {
    write!(out, " {}", category)?;
  }
  writeln!(out)?;

  out.flush()
}

/// Like `chars::escape_byte` but with no bare space, so alphabet
/// entries never split under whitespace tokenization.
fn quote_byte(byte: u8) -> String {
  match byte {
    b'\n' => "\\n".to_string(),
    b'\r' => "\\r".to_string(),
    b'\t' => "\\t".to_string(),
    b'\\' => "\\\\".to_string(),
    b'\'' => "\\'".to_string(),
    b'"' => "\\\"".to_string(),
    _ => {
      if byte.is_ascii_graphic() {
        (byte as char).to_string()
      } else {
        format!("\\x{:02X}", byte)
      }
    }
  }
}

// endregion

// region Reader

struct ArtifactReader<'a> {
  lines: Vec<(usize, &'a str)>, //< (1-based line number, trimmed content)
  pos: usize,
}

impl<'a> ArtifactReader<'a> {
  fn new(text: &'a str) -> ArtifactReader<'a> {
    let lines = text
      .lines()
      .enumerate()
      .map(|(index, line)| (index + 1, line.trim()))
      .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
      .collect();
    ArtifactReader { lines, pos: 0 }
  }

  fn peek(&self) -> Option<(usize, &'a str)> {
    self.lines.get(self.pos).copied()
  }

  fn next_line(&mut self, section: &'static str) -> Result<(usize, &'a str), LoadError> {
    let line = self.peek().ok_or(LoadError::MissingSection(section))?;
    self.pos += 1;
    Ok(line)
  }

  /// Consumes a line of the form `KEYWORD rest...` and returns the rest.
  fn keyword_line(&mut self, keyword: &'static str) -> Result<(usize, &'a str), LoadError> {
    let (number, line) = self.next_line(keyword)?;
    if line == keyword {
      return Ok((number, ""));
    }
    match line.strip_prefix(keyword) {
      Some(rest) if rest.starts_with(' ') => Ok((number, rest.trim_start())),
      _ => Err(LoadError::Malformed {
        line: number,
        reason: format!("expected the {} section", keyword),
      }),
    }
  }
}

fn parse_ints(line: &str, number: usize, what: &str) -> Result<Vec<i32>, LoadError> {
  line
    .split_whitespace()
    .map(|field| {
      field.parse::<i32>().map_err(|_| LoadError::Malformed {
        line: number,
        reason: format!("bad {} value `{}`", what, field),
      })
    })
    .collect()
}

fn unquote_byte(field: &str, number: usize) -> Result<u8, LoadError> {
  let malformed = || LoadError::Malformed {
    line: number,
    reason: format!("bad alphabet entry `{}`", field),
  };

  let inner = field
    .strip_prefix('\'')
    .and_then(|rest| rest.strip_suffix('\''))
    .ok_or_else(malformed)?;

  let bytes = inner.as_bytes();
  match bytes {
    [single] if *single != b'\\' => Ok(*single),
    [b'\\', escaped] => Ok(match escaped {
      b'n' => b'\n',
      b'r' => b'\r',
      b't' => b'\t',
      b'\\' => b'\\',
      b'\'' => b'\'',
      b'"' => b'"',
      _ => return Err(malformed()),
    }),
    [b'\\', b'x', high, low] => {
      let hex = std::str::from_utf8(&[*high, *low]).ok().and_then(|digits| u8::from_str_radix(digits, 16).ok());
      hex.ok_or_else(malformed)
    }
    _ => Err(malformed()),
  }
}

/// Reconstructs a table from the text `write_table` produced.
pub fn read_table(text: &str) -> Result<TransitionTable, LoadError> {
  let mut reader = ArtifactReader::new(text);

  let (number, rest) = reader.keyword_line("STATE_COUNT")?;
  let state_count: usize = rest.parse().map_err(|_| LoadError::Malformed {
    line: number,
    reason: format!("bad state count `{}`", rest),
  })?;

  let (number, rest) = reader.keyword_line("SYMBOL_COUNT")?;
  let symbol_count: usize = rest.parse().map_err(|_| LoadError::Malformed {
    line: number,
    reason: format!("bad symbol count `{}`", rest),
  })?;

  let (number, rest) = reader.keyword_line("START_STATE_ID")?;
  let start_state: StateId32 = rest.parse().map_err(|_| LoadError::Malformed {
    line: number,
    reason: format!("bad start state `{}`", rest),
  })?;

  let (number, rest) = reader.keyword_line("ALPHABET")?;
  let mut alphabet = Vec::with_capacity(symbol_count);
  for field in rest.split_whitespace() {
    alphabet.push(unquote_byte(field, number)?);
  }
  if alphabet.len() != symbol_count {
    return Err(LoadError::Malformed {
      line: number,
      reason: format!("expected {} alphabet entries, found {}", symbol_count, alphabet.len()),
    });
  }
  if alphabet.windows(2).any(|pair| pair[0] >= pair[1]) {
    return Err(LoadError::Malformed {
      line: number,
      reason: "alphabet bytes must ascend".to_string(),
    });
  }

  let (number, rest) = reader.keyword_line("SYMBOL_TO_ID")?;
  let symbol_to_id = parse_ints(rest, number, "symbol map")?;
  if symbol_to_id.len() != 256 {
    return Err(LoadError::Malformed {
      line: number,
      reason: format!("expected 256 symbol map entries, found {}", symbol_to_id.len()),
    });
  }

  reader.keyword_line("TRANSITION_TABLE")?;
  let mut rows = Vec::with_capacity(state_count);
  for _ in 0..state_count {
    let (number, line) = reader.next_line("TRANSITION_TABLE")?;
    let row = parse_ints(line, number, "transition")?;
    if row.len() != symbol_count {
      return Err(LoadError::Malformed {
        line: number,
        reason: format!("expected {} cells, found {}", symbol_count, row.len()),
      });
    }
    if row.iter().any(|&cell| cell < -1 || cell >= state_count as i32) {
      return Err(LoadError::Malformed {
        line: number,
        reason: "transition target out of range".to_string(),
      });
    }
    rows.push(row);
  }

  let (number, rest) = reader.keyword_line("ACCEPT_STATE_IDS")?;
  let accept_flags = parse_ints(rest, number, "accept flag")?;
  if accept_flags.len() != state_count || accept_flags.iter().any(|&flag| flag != 0 && flag != 1) {
    return Err(LoadError::Malformed {
      line: number,
      reason: "accept flags must be one 0/1 per state".to_string(),
    });
  }
  let accept: Vec<bool> = accept_flags.iter().map(|&flag| flag == 1).collect();

  let (number, rest) = reader.keyword_line("CATEGORIES")?;
  let category_count: usize = rest.parse().map_err(|_| LoadError::Malformed {
    line: number,
    reason: format!("bad category count `{}`", rest),
  })?;

  let mut categories = Vec::with_capacity(category_count);
  // One line per real category in id order, then the sentinel line.
  for expected in 0..=category_count {
    let (number, line) = reader.next_line("CATEGORIES")?;
    let mut fields = line.split_whitespace();
    let name = fields.next();
    let id = fields.next().and_then(|field| field.parse::<u64>().ok());
    match (name, id, fields.next()) {
      (Some(name), Some(id), None) => {
        if expected == category_count {
          if id != UNKNOWN_CATEGORY as u64 || name != UNKNOWN_NAME {
            return Err(LoadError::Malformed {
              line: number,
              reason: format!("expected the {} sentinel", UNKNOWN_NAME),
            });
          }
        } else if id == expected as u64 {
          categories.push(name.to_string());
        } else {
          return Err(LoadError::Malformed {
            line: number,
            reason: format!("category ids must be dense, got {}", id),
          });
        }
      }
      _ => {
        return Err(LoadError::Malformed {
          line: number,
          reason: "category lines are `name id`".to_string(),
        });
      }
    }
  }

  let (number, rest) = reader.keyword_line("STATE_TOKEN_TYPE")?;
  let state_category = parse_ints(rest, number, "state category")?;
  if state_category.len() != state_count {
    return Err(LoadError::Malformed {
      line: number,
      reason: format!("expected {} state categories, found {}", state_count, state_category.len()),
    });
  }
  if state_category
    .iter()
    .any(|&category| category < -1 || category as i64 >= categories.len() as i64)
  {
    return Err(LoadError::Malformed {
      line: number,
      reason: "state category out of range".to_string(),
    });
  }

  if (start_state as usize) >= state_count {
    return Err(LoadError::Malformed {
      line: number,
      reason: "start state out of range".to_string(),
    });
  }

  Ok(TransitionTable {
    alphabet,
    symbol_to_id,
    rows,
    start_state,
    accept,
    state_category,
    categories,
  })
}

// endregion

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dfa::determinize;
  use crate::nfa::{combine, PatternAst};
  use crate::regex::parse_pattern;
  use crate::table::CategorySet;

  fn sample_table() -> TransitionTable {
    let mut categories = CategorySet::new();
    let specs = [
      (r"[ \t\n]+", "WHITESPACE"),
      (r"[a-zA-Z_][a-zA-Z0-9_]*", "IDENTIFIER"),
      (r"\d+", "INT"),
      ("\"==\"", "EQEQ"),
      ("=", "ASSIGN"),
    ];
    let parsed: Vec<PatternAst> = specs
      .iter()
      .map(|(pattern, category)| PatternAst {
        ast: parse_pattern(pattern).unwrap(),
        category: categories.intern(category),
        priority: 0,
      })
      .collect();
    let dfa = determinize(&combine(&parsed)).unwrap();
    TransitionTable::from_dfa(&dfa, categories.into_names())
  }

  #[test]
  fn round_trip_is_identical() {
    let table = sample_table();
    let mut buffer = Vec::new();
    write_table(&table, &mut buffer).unwrap();
    let reloaded = read_table(std::str::from_utf8(&buffer).unwrap()).unwrap();
    assert_eq!(table, reloaded);
  }

  #[test]
  fn artifact_declares_all_sections() {
    let table = sample_table();
    let mut buffer = Vec::new();
    write_table(&table, &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    for section in [
      "STATE_COUNT",
      "SYMBOL_COUNT",
      "START_STATE_ID",
      "ALPHABET",
      "SYMBOL_TO_ID",
      "TRANSITION_TABLE",
      "ACCEPT_STATE_IDS",
      "CATEGORIES",
      "STATE_TOKEN_TYPE",
    ]
    .iter()
    {
      assert!(text.contains(section), "missing {}", section);
    }
    assert!(text.contains("UNKNOWN 4294967295"));
  }

  #[test]
  fn nonprintable_bytes_are_escaped() {
    let table = sample_table();
    let mut buffer = Vec::new();
    write_table(&table, &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    assert!(text.contains("'\\t'"));
    assert!(text.contains("'\\n'"));
    // The space byte is escaped so alphabet entries survive whitespace
    // tokenization.
    assert!(text.contains("'\\x20'"));
  }

  #[test]
  fn unquote_round_trips_every_alphabet_byte() {
    for byte in 0u8..128 {
      let quoted = format!("'{}'", quote_byte(byte));
      assert_eq!(unquote_byte(&quoted, 1).unwrap(), byte, "byte {}", byte);
    }
  }

  #[test]
  fn truncated_artifacts_are_rejected() {
    let table = sample_table();
    let mut buffer = Vec::new();
    write_table(&table, &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    let truncated: String = text.lines().take(4).collect::<Vec<_>>().join("\n");
    assert!(matches!(read_table(&truncated), Err(LoadError::MissingSection(_))));
  }

  #[test]
  fn garbage_is_rejected_with_a_line_number() {
    let error = read_table("STATE_COUNT five").unwrap_err();
    assert!(matches!(error, LoadError::Malformed { line: 1, .. }));
  }
}
