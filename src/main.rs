use std::{
  io::{self, Write},
  path::PathBuf,
  process::ExitCode,
};

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{
  error::KakurasuError,
  grid::Glyphs,
  model::build_model,
  puzzle::PuzzleSpec,
  solver::{solve_puzzle, SolverKind},
};

mod error;
mod grid;
mod model;
mod puzzle;
mod solver;
mod tokens;

/// Solve a Kakurasu puzzle by compiling it to a 0/1 integer program.
#[derive(Parser, Debug)]
#[command(name = "kakurasu", version)]
struct Args {
  /// Puzzle file: `<width>*<height>`, one row clue per line, then `Vert: ...`.
  input: PathBuf,

  /// Integer program backend.
  #[arg(long, value_enum, default_value_t = SolverKind::default())]
  solver: SolverKind,

  /// Draw cells with `#` and `.` instead of Unicode blocks.
  #[arg(long)]
  ascii: bool,

  /// Color on-cells when stdout is a terminal.
  #[arg(long)]
  color: bool,

  /// Print the integer program in LP format instead of solving it.
  #[arg(long)]
  emit_lp: bool,

  /// More log output on stderr; repeat for more. `RUST_LOG` overrides.
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,
}

fn init_logging(verbose: u8) {
  let fallback = match verbose {
    0 => "warn",
    1 => "info",
    _ => "debug",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .with_writer(io::stderr)
    .init();
}

fn run(args: &Args) -> Result<String, KakurasuError> {
  let spec = PuzzleSpec::from_file(&args.input)?;
  debug!("puzzle:\n{spec}");

  if args.emit_lp {
    return Ok(build_model(&spec).to_string());
  }

  let backend = args.solver.backend();
  info!(solver = backend.name(), "solving {}", args.input.display());
  let grid = solve_puzzle(&spec, backend.as_ref())?;

  let glyphs = if args.ascii {
    Glyphs::ASCII
  } else {
    Glyphs::UNICODE
  };
  let colored = args.color && termion::is_tty(&io::stdout());
  Ok(if colored {
    grid.display(glyphs, true).to_string()
  } else {
    grid.render(&glyphs)
  })
}

fn main() -> ExitCode {
  let args = Args::parse();
  init_logging(args.verbose);

  match run(&args) {
    Ok(output) => {
      let mut stdout = io::stdout().lock();
      if let Err(err) = stdout.write_all(output.as_bytes()).and_then(|_| stdout.flush()) {
        eprintln!("kakurasu: failed to write output: {err}");
        return ExitCode::from(KakurasuError::Io(err).exit_code());
      }
      ExitCode::SUCCESS
    }
    Err(err) => {
      debug!(?err, "run failed");
      eprintln!("kakurasu: {err}");
      ExitCode::from(err.exit_code())
    }
  }
}

#[cfg(test)]
mod test {
  use std::{env, fs, path::PathBuf, process};

  use clap::Parser;

  use super::{run, Args};
  use crate::{error::KakurasuError, solver::SolverKind};

  fn puzzle_file(name: &str, text: &str) -> PathBuf {
    let path = env::temp_dir().join(format!("kakurasu-{}-{}.txt", process::id(), name));
    fs::write(&path, text).unwrap();
    path
  }

  fn args(path: &PathBuf, extra: &[&str]) -> Args {
    let path = path.to_str().unwrap();
    Args::try_parse_from(["kakurasu", path].iter().chain(extra).copied()).unwrap()
  }

  #[test]
  fn test_defaults() {
    let args = Args::try_parse_from(["kakurasu", "puzzle.txt"]).unwrap();
    assert_eq!(args.solver, SolverKind::Microlp);
    assert!(!args.ascii && !args.color && !args.emit_lp);
    assert_eq!(args.verbose, 0);
  }

  #[test]
  fn test_missing_input_is_usage_error() {
    assert!(Args::try_parse_from(["kakurasu"]).is_err());
    assert!(Args::try_parse_from(["kakurasu", "p.txt", "--solver", "cplex"]).is_err());
  }

  #[test]
  fn test_run_renders_grid() {
    let path = puzzle_file("render", "2*2\n1\n2\nVert: 1 2\n");
    let output = run(&args(&path, &["--ascii", "--solver", "exhaustive"])).unwrap();
    assert_eq!(output, "#.\n.#\n");
    let output = run(&args(&path, &["--solver", "exhaustive"])).unwrap();
    assert_eq!(output, "█⨯\n⨯█\n");
  }

  #[test]
  fn test_run_emits_lp() {
    let path = puzzle_file("lp", "2*2\n1\n2\nVert: 1 2\n");
    let output = run(&args(&path, &["--emit-lp"])).unwrap();
    assert!(output.starts_with("Minimize\n"));
    assert!(output.contains(" row_1: +1 c_1_0 +2 c_1_1 = 2\n"));
    assert!(output.ends_with("End\n"));
  }

  #[test]
  fn test_run_failures() {
    let missing = env::temp_dir().join("kakurasu-does-not-exist.txt");
    assert!(matches!(run(&args(&missing, &[])), Err(KakurasuError::Io(_))));

    let path = puzzle_file("infeasible", "2*2\n4\n1\nVert: 1 1\n");
    let err = run(&args(&path, &["--solver", "exhaustive"])).unwrap_err();
    assert!(matches!(err, KakurasuError::NoSolution));
    assert_eq!(err.exit_code(), 8);
  }
}
