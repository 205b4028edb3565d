use std::fs;
use std::io::{self, Write};
use std::process::exit;

use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use structopt::StructOpt;

use scandium::compiler::Compiler;
use scandium::emit::write_table;
use scandium::error::BuildError;
use scandium::lang;
use scandium::options::Options;
use scandium::scanner::Scanner;
use scandium::table::TransitionTable;
use scandium::token::TokenStream;

fn main() {
  exit(run(Options::from_args()));
}

fn run(options: Options) -> i32 {
  if let Some(extension) = &options.extension {
    let actual = options.file.extension().and_then(|ext| ext.to_str());
    if actual != Some(extension.as_str()) {
      eprintln!(
        "error: {} must have the .{} extension",
        options.file.display(),
        extension
      );
      return 2;
    }
  }

  let source = match fs::read(&options.file) {
    Ok(source) => source,
    Err(error) => {
      eprintln!("error: cannot read {}: {}", options.file.display(), error);
      return 1;
    }
  };

  let mut compiler = Compiler::new(lang::builtin_patterns());
  let compilation = match compiler.compile_all() {
    Ok(compilation) => compilation,
    Err(error) => {
      report_build_error(&error);
      return 1;
    }
  };

  if options.dump_nfa {
    eprintln!("{}", compilation.nfa);
  }
  if options.dump_dfa {
    eprintln!("{}", compilation.dfa);
  }
  if options.verbose {
    eprintln!("{}", compiler.timing_report());
  }

  if let Some(path) = &options.tables {
    // The file closes when it drops, on the error path included.
    let written = fs::File::create(path).and_then(|mut file| write_table(&compilation.table, &mut file));
    if let Err(error) = written {
      eprintln!("error: cannot write tables to {}: {}", path.display(), error);
      return 1;
    }
  }

  let stream = Scanner::new(&compilation.table).scan(&source);

  let printed = match &options.output {
    Some(path) => fs::File::create(path).and_then(|mut file| {
      print_symbol_table(&mut file, &compilation.table, &stream, options.keep_trivia)
    }),
    None => {
      let stdout = io::stdout();
      let mut handle = stdout.lock();
      print_symbol_table(&mut handle, &compilation.table, &stream, options.keep_trivia)
    }
  };
  if let Err(error) = printed {
    eprintln!("error: cannot write the symbol table: {}", error);
    return 1;
  }

  0
}

fn print_symbol_table<W: Write>(
  out: &mut W,
  table: &TransitionTable,
  stream: &TokenStream,
  keep_trivia: bool,
) -> io::Result<()> {
  for token in stream {
    let name = table.category_name(token.category);
    if !keep_trivia && lang::TRIVIA_CATEGORIES.contains(&name) {
      continue;
    }
    writeln!(
      out,
      "{:<30} {:<30} Line: {:<5} Col: {:<5}",
      name,
      token.lexeme_str(),
      token.line,
      token.col
    )?;
  }
  out.flush()
}

fn report_build_error(error: &BuildError) {
  match error {
    BuildError::Pattern { index, source, error: regex_error } => {
      let mut files = SimpleFiles::new();
      let file = files.add(format!("pattern #{}", index), source.clone());
      let diagnostic = regex_error.to_diagnostic(file);
      let writer = StandardStream::stderr(ColorChoice::Auto);
      let config = term::Config::default();
      if term::emit(&mut writer.lock(), &config, &files, &diagnostic).is_err() {
        eprintln!("error: {}", error);
      }
    }
    BuildError::EmptyMachine => {
      eprintln!("error: {}", error);
    }
  }
}
