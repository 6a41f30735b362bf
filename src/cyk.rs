use std::collections::HashSet;

use crate::grammar::Grammar;

/// Boolean CYK recognition table: `cell(i, j)` holds every symbol that can
/// derive `tokens[i..j]`.
#[derive(Debug)]
pub struct Recognizer<'g> {
  n: usize,
  table: Vec<Vec<HashSet<&'g str>>>,
}

impl<'g> Recognizer<'g> {
  pub fn new(g: &'g Grammar, tokens: &[&str]) -> Self {
    let n = tokens.len();
    let mut table = vec![vec![HashSet::new(); n + 1]; n + 1];

    for (i, word) in tokens.iter().enumerate() {
      for rule in g.rules_by_rhs(&[*word]) {
        table[i][i + 1].insert(rule.symbol.as_str());
      }
    }

    let binary = g.binary_rules().collect::<Vec<_>>();

    for length in 2..=n {
      for i in 0..=(n - length) {
        let j = i + length;
        for k in (i + 1)..j {
          for rule in binary.iter() {
            let (b, c) = (rule.productions[0].as_str(), rule.productions[1].as_str());
            if table[i][k].contains(b) && table[k][j].contains(c) {
              table[i][j].insert(rule.symbol.as_str());
            }
          }
        }
        tracing::trace!(i, j, found = table[i][j].len(), "recognized span");
      }
    }

    Self { n, table }
  }

  /// Symbols deriving `tokens[i..j]`
  pub fn cell(&self, i: usize, j: usize) -> &HashSet<&'g str> {
    &self.table[i][j]
  }

  pub fn accepts(&self, symbol: &str) -> bool {
    self.n > 0 && self.table[0][self.n].contains(symbol)
  }
}

/// True if some derivation of the grammar's start symbol covers all of `tokens`
pub fn is_in_language(g: &Grammar, tokens: &[&str]) -> bool {
  Recognizer::new(g, tokens).accepts(&g.start)
}
