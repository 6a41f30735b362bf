use std::collections::{BTreeSet, HashMap};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::rules::Rule;
use crate::utils::{fsum, is_close};

/// Relative tolerance for a nonterminal's probability mass to count as 1
pub const MASS_TOLERANCE: f64 = 1e-9;

/// A probabilistic context-free grammar, indexed by left-hand side and by
/// right-hand side. Immutable once built, and cheap to share between threads.
#[derive(Debug, Clone)]
pub struct Grammar {
  pub start: String,
  rules: Vec<Arc<Rule>>,
  by_lhs: HashMap<String, Vec<Arc<Rule>>>,
  lexical: HashMap<String, Vec<Arc<Rule>>>,
  // first child -> second child -> rules
  binary: HashMap<String, HashMap<String, Vec<Arc<Rule>>>>,
  nonterminals: BTreeSet<String>,
  terminals: BTreeSet<String>,
}

/// The first invariant a grammar was found to break
#[derive(Debug, Clone, PartialEq)]
pub enum Malformation {
  /// A nonterminal's rule probabilities don't sum to 1
  ProbabilityMass { symbol: String, total: f64 },
  /// A rule probability outside of (0, 1]
  BadProbability(Rule),
  EmptyProduction(Rule),
  TooManyProductions(Rule),
  /// A binary rule with a terminal child
  TerminalInBinary { rule: Rule, terminal: String },
  /// `A -> B` where B is a nonterminal
  UnitProduction(Rule),
}

impl fmt::Display for Malformation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::ProbabilityMass { symbol, total } => {
        write!(f, "probabilities of {} sum to {}, not 1", symbol, total)
      }
      Self::BadProbability(r) => write!(f, "probability not in (0, 1]: {}", r),
      Self::EmptyProduction(r) => write!(f, "empty right-hand side: {}", r),
      Self::TooManyProductions(r) => write!(f, "more than two productions: {}", r),
      Self::TerminalInBinary { rule, terminal } => {
        write!(f, "terminal {} in binary rule: {}", terminal, rule)
      }
      Self::UnitProduction(r) => write!(f, "unit production: {}", r),
    }
  }
}

impl Error for Malformation {}

impl Grammar {
  pub fn new(start: impl Into<String>, rules: Vec<Rule>) -> Self {
    let start = start.into();
    let rules = rules.into_iter().map(Arc::new).collect::<Vec<_>>();

    let mut by_lhs: HashMap<String, Vec<Arc<Rule>>> = HashMap::new();
    let mut lexical: HashMap<String, Vec<Arc<Rule>>> = HashMap::new();
    let mut binary: HashMap<String, HashMap<String, Vec<Arc<Rule>>>> = HashMap::new();

    for rule in rules.iter() {
      by_lhs
        .entry(rule.symbol.clone())
        .or_default()
        .push(rule.clone());

      match rule.productions.as_slice() {
        [word] => lexical.entry(word.clone()).or_default().push(rule.clone()),
        [left, right] => binary
          .entry(left.clone())
          .or_default()
          .entry(right.clone())
          .or_default()
          .push(rule.clone()),
        // only reachable through rules_by_lhs, check() will reject these
        _ => {}
      }
    }

    let nonterminals = by_lhs.keys().cloned().collect::<BTreeSet<_>>();
    let terminals = rules
      .iter()
      .flat_map(|r| r.productions.iter())
      .filter(|p| !nonterminals.contains(*p))
      .cloned()
      .collect::<BTreeSet<_>>();

    tracing::debug!(
      start = %start,
      rules = rules.len(),
      nonterminals = nonterminals.len(),
      terminals = terminals.len(),
      "built grammar"
    );

    Self {
      start,
      rules,
      by_lhs,
      lexical,
      binary,
      nonterminals,
      terminals,
    }
  }

  /// All rules, in the order they were loaded
  pub fn rules(&self) -> &[Arc<Rule>] {
    &self.rules
  }

  pub fn binary_rules(&self) -> impl Iterator<Item = &Arc<Rule>> {
    self.rules.iter().filter(|r| r.is_binary())
  }

  pub fn nonterminals(&self) -> &BTreeSet<String> {
    &self.nonterminals
  }

  pub fn terminals(&self) -> &BTreeSet<String> {
    &self.terminals
  }

  pub fn is_nonterminal(&self, s: &str) -> bool {
    self.nonterminals.contains(s)
  }

  /// Rules whose right-hand side is exactly `symbols`. Only unary and binary
  /// right-hand sides are indexed; any other length finds nothing.
  pub fn rules_by_rhs(&self, symbols: &[&str]) -> &[Arc<Rule>] {
    let found = match symbols {
      [word] => self.lexical.get(*word),
      [left, right] => self.binary.get(*left).and_then(|m| m.get(*right)),
      _ => None,
    };
    found.map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn rules_by_lhs(&self, symbol: &str) -> &[Arc<Rule>] {
    self.by_lhs.get(symbol).map(Vec::as_slice).unwrap_or(&[])
  }

  /// Checks that this is a PCFG in strict CNF: every nonterminal's rule
  /// probabilities sum to 1, and every right-hand side is either one terminal
  /// or two nonterminals.
  pub fn check(&self) -> Result<(), Malformation> {
    for symbol in self.nonterminals.iter() {
      let rules = self.rules_by_lhs(symbol);

      let total = fsum(rules.iter().map(|r| r.prob));
      if !is_close(total, 1.0, MASS_TOLERANCE) {
        return Err(Malformation::ProbabilityMass {
          symbol: symbol.clone(),
          total,
        });
      }

      for rule in rules {
        if !(rule.prob > 0.0 && rule.prob <= 1.0) {
          return Err(Malformation::BadProbability((**rule).clone()));
        }

        match rule.productions.as_slice() {
          [] => return Err(Malformation::EmptyProduction((**rule).clone())),
          [only] => {
            if self.is_nonterminal(only) {
              return Err(Malformation::UnitProduction((**rule).clone()));
            }
          }
          [left, right] => {
            if let Some(terminal) = [left, right].into_iter().find(|s| !self.is_nonterminal(s)) {
              return Err(Malformation::TerminalInBinary {
                rule: (**rule).clone(),
                terminal: terminal.clone(),
              });
            }
          }
          _ => return Err(Malformation::TooManyProductions((**rule).clone())),
        }
      }
    }

    Ok(())
  }

  /// True if the grammar is a valid PCFG in CNF. See [`Grammar::check`] for
  /// the reason a grammar was rejected.
  pub fn validate(&self) -> bool {
    match self.check() {
      Ok(()) => true,
      Err(m) => {
        tracing::debug!("grammar rejected: {}", m);
        false
      }
    }
  }
}

impl fmt::Display for Grammar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{} ; 1.0", self.start)?;
    for rule in self.rules.iter() {
      writeln!(f, "{}", rule)?;
    }
    Ok(())
  }
}
