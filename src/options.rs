use std::path::PathBuf;

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "scandium", about = "A table-driven lexer generator.")]
pub struct Options {
  /// Source file to tokenize
  #[structopt(parse(from_os_str))]
  pub file: PathBuf,

  #[structopt(short = "o", long, parse(from_os_str))]
  /// Write the symbol table to FILE instead of stdout
  pub output: Option<PathBuf>,

  #[structopt(long, parse(from_os_str))]
  /// Emit the compiled transition tables to FILE
  pub tables: Option<PathBuf>,

  #[structopt(long)]
  /// Keep whitespace and comment tokens in the symbol table
  pub keep_trivia: bool,

  #[structopt(long)]
  /// Require the source file to carry this extension
  pub extension: Option<String>,

  #[structopt(long)]
  /// Print the combined NFA before determinization
  pub dump_nfa: bool,

  #[structopt(long)]
  /// Print the DFA before table compaction
  pub dump_dfa: bool,

  #[structopt(short, long)]
  /// Report phase timings
  pub verbose: bool,
}
