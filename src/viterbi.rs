use std::collections::BTreeMap;

use crate::chart::{Backpointer, Chart, Entry, ProbTable, Span};
use crate::grammar::Grammar;

/// Viterbi CKY. Fills a chart with, for every span and symbol, the single most
/// probable way to derive that span from that symbol, alongside a table of
/// those derivations' log-probabilities.
///
/// Spans are filled in order of increasing length, since every derivation of
/// length L only depends on shorter spans. Within a span, split points are
/// visited left to right and child symbols in lexicographic order, and an
/// entry is only replaced by a strictly more probable one. Among equally
/// probable derivations the one with the lowest split point, then the
/// smallest (left, right) pair of child symbols, is kept.
///
/// If the start symbol is missing at `0..n`, the input has no parse.
pub fn parse_with_backpointers(g: &Grammar, tokens: &[&str]) -> (Chart, ProbTable) {
  let n = tokens.len();
  let mut chart = Chart::new();
  let mut probs = ProbTable::new();

  for (i, word) in tokens.iter().enumerate() {
    let span = Span::new(i, i + 1);
    // validate() allows several lexical rules for the same (symbol, word), the last one loaded wins
    for rule in g.rules_by_rhs(&[*word]) {
      chart.insert(span, rule.symbol.as_str(), Entry::Leaf(word.to_string()));
      probs.insert(span, rule.symbol.as_str(), rule.log_prob());
    }
  }

  for length in 2..=n {
    for i in 0..=(n - length) {
      let span = Span::new(i, i + length);
      let mut entries: BTreeMap<String, Entry> = BTreeMap::new();
      let mut best: BTreeMap<String, f64> = BTreeMap::new();

      for k in (i + 1)..span.end {
        let (left, right) = span.split(k);
        let (Some(left_cell), Some(right_cell)) = (probs.cell(left), probs.cell(right)) else {
          continue;
        };

        for (b, left_prob) in left_cell.iter() {
          for (c, right_prob) in right_cell.iter() {
            for rule in g.rules_by_rhs(&[b.as_str(), c.as_str()]) {
              let candidate = rule.log_prob() + left_prob + right_prob;
              if best.get(&rule.symbol).is_none_or(|p| candidate > *p) {
                best.insert(rule.symbol.clone(), candidate);
                entries.insert(
                  rule.symbol.clone(),
                  Entry::Binary(Backpointer::new(b, left), Backpointer::new(c, right)),
                );
              }
            }
          }
        }
      }

      tracing::trace!(%span, found = best.len(), "filled span");
      chart.insert_cell(span, entries);
      probs.insert_cell(span, best);
    }
  }

  (chart, probs)
}
