//! The script-driven test harness (§6 "Script format", "CLI surface").
//!
//! Parses a line-oriented allocation script (`a`/`r`/`f`/`v` tokens) and
//! drives one [`segalloc::Heap`] instance over a heap-size backing buffer
//! this binary owns. The allocator itself never touches the OS or a file;
//! this binary is the external harness that drives it from a script.

use std::collections::HashMap;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{error, info};

use segalloc::{Heap, Mode};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
  Explicit,
  Implicit,
}

impl From<ModeArg> for Mode {
  fn from(value: ModeArg) -> Self {
    match value {
      ModeArg::Explicit => Mode::Explicit,
      ModeArg::Implicit => Mode::Implicit,
    }
  }
}

/// Drives a `segalloc` heap from an `a`/`r`/`f`/`v` allocation script.
#[derive(Parser, Debug)]
#[command(name = "segalloc-harness", about, version)]
struct Args {
  /// Path to a script file. Reads stdin when omitted.
  #[arg(long)]
  script: Option<PathBuf>,

  /// Size in bytes of the backing segment carved for this run.
  #[arg(long, default_value_t = 65536)]
  heap_size: usize,

  /// Engine variant to drive.
  #[arg(long, value_enum, default_value_t = ModeArg::Explicit)]
  mode: ModeArg,

  /// Run `validate_heap` after every line, not only on explicit `v` lines.
  #[arg(long)]
  validate_every_line: bool,

  /// Raise tracing verbosity; repeatable (-v, -vv).
  #[arg(short, action = clap::ArgAction::Count)]
  verbose: u8,
}

/// Exit code for a script line that references an unbound id or does not
/// parse (§6 "Exit codes").
const EXIT_BAD_SCRIPT: u8 = 1;
/// Exit code for a reported `ConsistencyFault` (§6 "Exit codes").
const EXIT_CONSISTENCY_FAULT: u8 = 2;

fn main() -> ExitCode {
  let args = Args::parse();
  init_tracing(args.verbose);

  let script = match read_script(args.script.as_deref()) {
    Ok(text) => text,
    Err(err) => {
      error!(%err, "could not read script");
      return ExitCode::from(EXIT_BAD_SCRIPT);
    }
  };

  let mut backing = vec![0u8; args.heap_size].into_boxed_slice();
  let heap = match unsafe { Heap::init(backing.as_mut_ptr(), backing.len(), args.mode.into()) } {
    Ok(heap) => heap,
    Err(err) => {
      error!(%err, "heap init refused");
      return ExitCode::from(EXIT_BAD_SCRIPT);
    }
  };

  let mut runner = Runner { heap, bindings: HashMap::new(), validate_every_line: args.validate_every_line };

  for (lineno, raw_line) in script.lines().enumerate() {
    let lineno = lineno + 1;
    let line = raw_line.trim();
    if line.is_empty() || line.starts_with('#') {
      continue;
    }

    match runner.run_line(line) {
      Ok(LineOutcome::Ran) => {}
      Ok(LineOutcome::ConsistencyFault(fault)) => {
        error!(line = lineno, ?fault, "consistency fault");
        return ExitCode::from(EXIT_CONSISTENCY_FAULT);
      }
      Err(err) => {
        error!(line = lineno, text = line, %err, "malformed script line");
        return ExitCode::from(EXIT_BAD_SCRIPT);
      }
    }
  }

  info!(lines = script.lines().count(), "script completed");
  ExitCode::SUCCESS
}

enum LineOutcome {
  Ran,
  ConsistencyFault(segalloc::ConsistencyFault),
}

#[derive(Debug, thiserror::Error)]
enum ScriptError {
  #[error("empty line")]
  Empty,
  #[error("unknown command {0:?}")]
  UnknownCommand(String),
  #[error("expected an integer id or size, got {0:?}")]
  NotAnInteger(String),
  #[error("id {0} is not bound to a live allocation")]
  UnboundId(i64),
  #[error("allocator reported {0}")]
  Allocator(#[from] segalloc::AllocatorError),
}

struct Runner {
  heap: Heap,
  bindings: HashMap<i64, *mut u8>,
  validate_every_line: bool,
}

impl Runner {
  fn run_line(&mut self, line: &str) -> Result<LineOutcome, ScriptError> {
    let mut tokens = line.split_whitespace();
    let command = tokens.next().ok_or(ScriptError::Empty)?;

    match command {
      "a" => {
        let id = next_int(&mut tokens)?;
        let size = next_int(&mut tokens)? as usize;
        let ptr = self.heap.allocate(size)?;
        self.bindings.insert(id, ptr);
        info!(id, size, ptr = ?ptr, "allocate");
      }
      "r" => {
        let id = next_int(&mut tokens)?;
        let size = next_int(&mut tokens)? as usize;
        let old_ptr = *self.bindings.get(&id).ok_or(ScriptError::UnboundId(id))?;
        let new_ptr = self.heap.reallocate(old_ptr, size)?;
        self.bindings.insert(id, new_ptr);
        info!(id, size, ptr = ?new_ptr, "reallocate");
      }
      "f" => {
        let id = next_int(&mut tokens)?;
        let ptr = self.bindings.remove(&id).ok_or(ScriptError::UnboundId(id))?;
        self.heap.free(ptr);
        info!(id, "free");
      }
      "v" => {
        if let Err(fault) = self.heap.validate() {
          return Ok(LineOutcome::ConsistencyFault(fault));
        }
        info!("validate: ok");
      }
      other => return Err(ScriptError::UnknownCommand(other.to_string())),
    }

    if self.validate_every_line {
      if let Err(fault) = self.heap.validate() {
        return Ok(LineOutcome::ConsistencyFault(fault));
      }
    }

    Ok(LineOutcome::Ran)
  }
}

fn next_int<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<i64, ScriptError> {
  let token = tokens.next().ok_or(ScriptError::Empty)?;
  token.parse().map_err(|_| ScriptError::NotAnInteger(token.to_string()))
}

fn read_script(path: Option<&std::path::Path>) -> io::Result<String> {
  match path {
    Some(path) => std::fs::read_to_string(path),
    None => {
      let mut buf = String::new();
      io::stdin().lock().read_to_string(&mut buf)?;
      Ok(buf)
    }
  }
}

fn init_tracing(verbosity: u8) {
  use tracing_subscriber::EnvFilter;

  let default_level = match verbosity {
    0 => "warn",
    1 => "info",
    _ => "trace",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
