//! Line-oriented parsing of `.pcfg` grammar files

use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::grammar::Grammar;
use crate::rules::Rule;
use crate::Err;

/// helper macro for initializing a regex with lazy_static!
macro_rules! regex_static {
  ($name:ident, $pattern:expr) => {
    lazy_static! {
      static ref $name: Regex = Regex::new($pattern).unwrap();
    }
  };
}

/// One meaningful line of a grammar file
#[derive(Debug, PartialEq)]
enum Line {
  Rule(Rule),
  Start(String),
}

fn parse_prob(s: &str) -> Result<f64, Err> {
  s.trim()
    .parse::<f64>()
    .map_err(|e| format!("bad probability {:?}: {}", s.trim(), e).into())
}

/// `LHS -> SYM SYM ... ; PROB`. The right-hand side is kept as written, even
/// if it isn't CNF, so that validation can see it.
fn parse_rule(s: &str) -> Result<Rule, Err> {
  regex_static!(RULE, r"^(\S+)\s*->(.*);([^;]*)$");

  let caps = RULE
    .captures(s)
    .ok_or_else(|| -> Err { format!("malformed rule: {}", s).into() })?;

  let productions = caps[2].split_whitespace().map(str::to_string).collect();
  let prob = parse_prob(&caps[3])?;

  Ok(Rule::new(&caps[1], productions, prob))
}

/// `SYMBOL ; PROB`. The probability must parse, but is otherwise unused.
fn parse_start(s: &str) -> Result<String, Err> {
  regex_static!(START, r"^(\S+)\s*;([^;]*)$");

  let caps = START
    .captures(s)
    .ok_or_else(|| -> Err { format!("malformed start symbol declaration: {}", s).into() })?;
  parse_prob(&caps[2])?;

  Ok(caps[1].to_string())
}

/// None for blank and comment lines
fn parse_line(line: &str) -> Result<Option<Line>, Err> {
  let line = line.trim();
  if line.is_empty() || line.starts_with('#') {
    Ok(None)
  } else if line.contains("->") {
    parse_rule(line).map(|r| Some(Line::Rule(r)))
  } else {
    parse_start(line).map(|s| Some(Line::Start(s)))
  }
}

fn parse_lines(s: &str) -> Result<(Option<String>, Vec<Rule>), Err> {
  let mut start = None;
  let mut rules = Vec::new();

  for (idx, line) in s.lines().enumerate() {
    let parsed = parse_line(line).map_err(|e| -> Err { format!("line {}: {}", idx + 1, e).into() })?;
    match parsed {
      Some(Line::Rule(rule)) => rules.push(rule),
      Some(Line::Start(symbol)) => {
        if let Some(prev) = &start {
          return Err(format!("line {}: start symbol already declared as {}", idx + 1, prev).into());
        }
        start = Some(symbol);
      }
      None => {}
    }
  }

  Ok((start, rules))
}

impl FromStr for Grammar {
  type Err = Err;

  /// Parses a grammar from a string. If there's no start symbol declaration,
  /// assumes the first rule's symbol is the start symbol.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (start, rules) = parse_lines(s)?;

    if rules.is_empty() {
      return Err("empty ruleset".into());
    }

    let start = start.unwrap_or_else(|| rules[0].symbol.clone());
    Ok(Self::new(start, rules))
  }
}

impl Grammar {
  pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Err> {
    let path = path.as_ref();
    let src = fs::read_to_string(path).map_err(|e| -> Err { format!("{}: {}", path.display(), e).into() })?;
    tracing::debug!(path = %path.display(), "loading grammar");
    src.parse()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_rule() {
    assert_eq!(
      parse_rule("S -> NP VP ; 0.75").unwrap(),
      Rule::binary("S", "NP", "VP", 0.75)
    );
    assert_eq!(
      parse_rule("NP->dog;1").unwrap(),
      Rule::lexical("NP", "dog", 1.0)
    );
    assert_eq!(
      parse_rule("X -> ; 1.0").unwrap(),
      Rule::new("X", Vec::new(), 1.0)
    );
    assert!(parse_rule("S -> NP VP").is_err());
    assert!(parse_rule("S -> NP VP ; likely").is_err());
  }

  #[test]
  fn test_parse_line() {
    assert_eq!(parse_line("   ").unwrap(), None);
    assert_eq!(parse_line("# S -> A B ; 1.0").unwrap(), None);
    assert_eq!(
      parse_line(" TOP ; 1.0 ").unwrap(),
      Some(Line::Start("TOP".to_string()))
    );
    assert!(parse_line("TOP").is_err());
  }

  #[test]
  fn test_grammar_from_str() {
    let g: Grammar = r#"
      # a tiny grammar
      S ; 1.0
      S -> NP VP ; 1.0
      NP -> dog ; 1.0

      VP -> barks ; 1.0
    "#
    .parse()
    .unwrap();

    assert_eq!(g.start, "S");
    assert_eq!(g.rules().len(), 3);
    assert!(g.validate());
  }

  #[test]
  fn test_implicit_start() {
    let g: Grammar = "VP -> V NP ; 1.0\nV -> saw ; 1.0\nNP -> her ; 1.0".parse().unwrap();
    assert_eq!(g.start, "VP");
  }

  #[test]
  fn test_load_errors() {
    assert!("# nothing here\n".parse::<Grammar>().is_err());
    assert!("S ; 1.0\nT ; 1.0\nS -> a ; 1.0".parse::<Grammar>().is_err());

    let err = "S ; 1.0\nS -> a ; one".parse::<Grammar>().unwrap_err();
    assert!(err.to_string().starts_with("line 2:"), "{}", err);
  }

  #[test]
  fn test_display_round_trips() {
    let src = "S ; 1.0\nS -> NP VP ; 1\nNP -> dog ; 1\nVP -> barks ; 1\n";
    let g: Grammar = src.parse().unwrap();
    let again: Grammar = g.to_string().parse().unwrap();
    assert_eq!(again.start, g.start);
    assert_eq!(again.rules(), g.rules());
  }
}
