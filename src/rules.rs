use std::fmt;

/// A weighted rewrite rule `symbol -> productions ; prob`.
///
/// The productions are kept exactly as they were loaded. Whether each one is a
/// terminal or a nonterminal is a property of the whole grammar (anything that
/// never appears on a left-hand side is a terminal), so classification is left
/// to [`Grammar`](crate::grammar::Grammar).
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
  pub symbol: String,
  pub productions: Vec<String>,
  pub prob: f64,
}

impl Rule {
  pub fn new(symbol: impl Into<String>, productions: Vec<String>, prob: f64) -> Self {
    Self {
      symbol: symbol.into(),
      productions,
      prob,
    }
  }

  /// Shorthand for `A -> w ; p`
  pub fn lexical(symbol: &str, word: &str, prob: f64) -> Self {
    Self::new(symbol, vec![word.to_string()], prob)
  }

  /// Shorthand for `A -> B C ; p`
  pub fn binary(symbol: &str, left: &str, right: &str, prob: f64) -> Self {
    Self::new(symbol, vec![left.to_string(), right.to_string()], prob)
  }

  pub fn len(&self) -> usize {
    self.productions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn is_binary(&self) -> bool {
    self.len() == 2
  }

  pub fn log_prob(&self) -> f64 {
    self.prob.ln()
  }
}

impl fmt::Display for Rule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ->", self.symbol)?;
    for p in self.productions.iter() {
      write!(f, " {}", p)?;
    }
    write!(f, " ; {}", self.prob)
  }
}
