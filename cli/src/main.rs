use std::env;
use std::io;
use std::io::Write;
use std::process;

use pcky::chart::Span;
use pcky::syntree::reconstruct_tree;
use pcky::{Err, Grammar};
use tracing_subscriber::EnvFilter;

fn usage(prog_name: &str) -> String {
  format!(
    r"Usage: {} FILE [options]

Options:
  -h, --help          Print this message
  -v, --verify        Only check that the grammar is a valid PCFG in CNF
  -c, --chart         Print the backpointer chart (defaults to not printing)
  -p, --probs         Print the probability table (defaults to not printing)
  -s, --start SYMBOL  Parse from SYMBOL instead of the declared start symbol",
    prog_name
  )
}

fn parse(g: &Grammar, sentence: &str, opts: &Args) {
  let tokens = sentence.split_whitespace().collect::<Vec<_>>();
  if tokens.is_empty() {
    return;
  }

  if !g.is_in_language(&tokens) {
    println!("No parse\n");
    return;
  }

  let (chart, probs) = g.parse_with_backpointers(&tokens);

  if opts.print_chart {
    println!("chart:\n{}", chart);
  }
  if opts.print_probs {
    println!("probs:\n{}", probs);
  }

  let root = Span::new(0, tokens.len());
  let tree = reconstruct_tree(&chart, root, &g.start);
  println!("{}", tree);
  if let Some(prob) = probs.get(root, &g.start) {
    println!("log probability: {}", prob);
  }
  println!();
}

struct Args {
  filename: String,
  verify_only: bool,
  print_chart: bool,
  print_probs: bool,
  start: Option<String>,
}

impl Args {
  fn make_error_message(msg: &str, prog_name: impl AsRef<str>) -> String {
    format!("argument error: {}.\n\n{}", msg, usage(prog_name.as_ref()))
  }

  fn parse(v: Vec<String>) -> Result<Self, String> {
    let mut iter = v.into_iter();
    let Some(prog_name) = iter.next() else {
      return Err(Self::make_error_message("bad argument vector", "pcky"));
    };

    let mut filename: Option<String> = None;
    let mut verify_only = false;
    let mut print_chart = false;
    let mut print_probs = false;
    let mut start: Option<String> = None;

    while let Some(o) = iter.next() {
      if o == "-h" || o == "--help" {
        println!("{}", usage(&prog_name));
        process::exit(0);
      } else if o == "-v" || o == "--verify" {
        verify_only = true;
      } else if o == "-c" || o == "--chart" {
        print_chart = true;
      } else if o == "-p" || o == "--probs" {
        print_probs = true;
      } else if o == "-s" || o == "--start" {
        match iter.next() {
          Some(symbol) => start = Some(symbol),
          None => return Err(Self::make_error_message("--start needs a symbol", prog_name)),
        }
      } else if filename.is_none() {
        filename = Some(o);
      } else {
        return Err(Self::make_error_message("invalid arguments", prog_name));
      }
    }

    if let Some(filename) = filename {
      Ok(Self {
        filename,
        verify_only,
        print_chart,
        print_probs,
        start,
      })
    } else {
      Err(Self::make_error_message("missing filename", prog_name))
    }
  }
}

fn main() -> Result<(), Err> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(io::stderr)
    .init();

  let opts = match Args::parse(env::args().collect()) {
    Ok(opts) => opts,
    Err(msg) => {
      eprintln!("{}", msg);
      process::exit(255);
    }
  };

  let mut g = Grammar::read_from_file(&opts.filename)?;
  if let Some(start) = &opts.start {
    g = Grammar::new(start.clone(), g.rules().iter().map(|r| (**r).clone()).collect());
  }

  if let Err(m) = g.check() {
    println!("The grammar is not a valid PCFG in CNF: {}", m);
    process::exit(1);
  }
  if opts.verify_only {
    println!("The grammar is a valid PCFG in CNF.");
    return Ok(());
  }
  tracing::info!(start = %g.start, rules = g.rules().len(), "loaded {}", opts.filename);

  let mut input = String::new();
  loop {
    print!("> ");
    io::stdout().flush()?;

    match io::stdin().read_line(&mut input) {
      Ok(0) => {
        // ctrl+d
        return Ok(());
      }
      Ok(_) => {
        parse(&g, input.trim(), &opts);
        input.clear();
      }
      Err(error) => return Err(error.into()),
    }
  }
}
