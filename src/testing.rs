//! Small grammars and exhaustive search, used as an oracle by the parser tests

use crate::grammar::Grammar;
use crate::rules::Rule;

/// `S -> NP VP`, `NP -> dog`, `VP -> barks`
pub fn toy_grammar() -> Grammar {
  Grammar::new(
    "S",
    vec![
      Rule::binary("S", "NP", "VP", 1.0),
      Rule::lexical("NP", "dog", 1.0),
      Rule::lexical("VP", "barks", 1.0),
    ],
  )
}

/// Every sentence over `alphabet` of length 1 to `max_len`
pub fn all_sentences(alphabet: &[&str], max_len: usize) -> Vec<Vec<String>> {
  let mut out: Vec<Vec<String>> = Vec::new();
  let mut frontier: Vec<Vec<String>> = vec![Vec::new()];
  for _ in 0..max_len {
    frontier = frontier
      .into_iter()
      .flat_map(|prefix| {
        alphabet.iter().map(move |w| {
          let mut next = prefix.clone();
          next.push(w.to_string());
          next
        })
      })
      .collect();
    out.extend(frontier.iter().cloned());
  }
  out
}

/// Log-probabilities of every derivation of `symbol` that yields exactly
/// `tokens`, found by trying every rule at every split without any chart.
pub fn brute_force_derivations(g: &Grammar, symbol: &str, tokens: &[&str]) -> Vec<f64> {
  let mut out = Vec::new();

  for rule in g.rules_by_lhs(symbol) {
    match rule.productions.as_slice() {
      [word] => {
        if tokens.len() == 1 && word.as_str() == tokens[0] {
          out.push(rule.log_prob());
        }
      }
      [left, right] => {
        for k in 1..tokens.len() {
          let lefts = brute_force_derivations(g, left, &tokens[..k]);
          if lefts.is_empty() {
            continue;
          }
          let rights = brute_force_derivations(g, right, &tokens[k..]);
          for l in lefts.iter() {
            for r in rights.iter() {
              out.push(rule.log_prob() + l + r);
            }
          }
        }
      }
      _ => {}
    }
  }

  out
}

pub fn brute_force_derives(g: &Grammar, symbol: &str, tokens: &[&str]) -> bool {
  !brute_force_derivations(g, symbol, tokens).is_empty()
}
