#[macro_use]
extern crate lazy_static;

pub mod chart;
pub mod cyk;
pub mod grammar;
pub mod parse_grammar;
pub mod rules;
pub mod schema;
pub mod syntree;
pub mod utils;
pub mod viterbi;

#[cfg(test)]
mod testing;

use crate::chart::{Chart, ProbTable, Span};
pub use crate::grammar::{Grammar, Malformation};
pub use crate::rules::Rule;
use crate::syntree::{try_reconstruct_tree, SynTree};
pub use crate::utils::Err;

impl Grammar {
  /// True if some derivation of the start symbol covers all of `input`
  pub fn is_in_language(&self, input: &[&str]) -> bool {
    cyk::is_in_language(self, input)
  }

  pub fn parse_with_backpointers(&self, input: &[&str]) -> (Chart, ProbTable) {
    viterbi::parse_with_backpointers(self, input)
  }

  /// The most probable parse of `input` and its log-probability, or None if
  /// the grammar doesn't generate it.
  pub fn best_parse(&self, input: &[&str]) -> Option<(SynTree<String, String>, f64)> {
    let (chart, probs) = self.parse_with_backpointers(input);
    let root = Span::new(0, input.len());

    let prob = *probs.get(root, &self.start)?;
    let tree = try_reconstruct_tree(&chart, root, &self.start)?;
    Some((tree, prob))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::syntree::reconstruct_tree;

  const TOY: &str = r#"
    S ; 1.0
    S -> NP VP ; 1.0
    NP -> dog ; 1.0
    VP -> barks ; 1.0
  "#;

  #[test]
  fn test_dog_barks() {
    let g: Grammar = TOY.parse().unwrap();
    assert!(g.validate());
    assert!(g.is_in_language(&["dog", "barks"]));

    let (chart, _) = g.parse_with_backpointers(&["dog", "barks"]);
    let tree = reconstruct_tree(&chart, Span::new(0, 2), "S");
    assert_eq!(tree.to_string(), "(S (NP dog) (VP barks))");
  }

  #[test]
  fn test_barks_dog() {
    let g: Grammar = TOY.parse().unwrap();
    assert!(!g.is_in_language(&["barks", "dog"]));

    let (chart, probs) = g.parse_with_backpointers(&["barks", "dog"]);
    assert!(!chart.contains(Span::new(0, 2), "S"));
    assert!(!probs.contains(Span::new(0, 2), "S"));
    assert!(g.best_parse(&["barks", "dog"]).is_none());
  }

  #[test]
  fn test_short_mass() {
    let g: Grammar = r#"
      S ; 1.0
      S -> NP VP ; 0.9
      NP -> dog ; 1.0
      VP -> barks ; 1.0
    "#
    .parse()
    .unwrap();
    assert!(!g.validate());
  }

  #[test]
  fn test_best_parse() {
    let g: Grammar = r#"
      TOP ; 1.0
      TOP -> NP VP ; 1.0
      NP -> NP PP ; 0.2
      NP -> D N ; 0.5
      NP -> flights ; 0.3
      VP -> V NP ; 0.6
      VP -> VP PP ; 0.4
      PP -> P NP ; 1.0
      D -> the ; 1.0
      N -> man ; 0.5
      N -> telescope ; 0.5
      V -> saw ; 1.0
      P -> with ; 1.0
    "#
    .parse()
    .unwrap();
    assert!(g.validate());

    let input = "flights saw the man with the telescope".split(' ').collect::<Vec<_>>();
    let (tree, prob) = g.best_parse(&input).unwrap();

    // attaching the PP to the VP (0.4 * 0.6) beats attaching it to the NP (0.6 * 0.2)
    assert_eq!(
      tree.to_string(),
      "(TOP (NP flights) (VP (VP (V saw) (NP (D the) (N man))) (PP (P with) (NP (D the) (N telescope)))))"
    );
    assert!(prob < 0.0);
    assert_eq!(tree.leaves().into_iter().map(String::as_str).collect::<Vec<_>>(), input);
  }

  #[test]
  fn test_flights_grammar() {
    let g: Grammar = include_str!("../benches/flights.pcfg").parse().unwrap();
    assert_eq!(g.start, "TOP");
    assert!(g.validate());

    let input = "flights from miami to cleveland .".split(' ').collect::<Vec<_>>();
    assert!(g.is_in_language(&input));
    let (tree, _) = g.best_parse(&input).unwrap();
    assert_eq!(tree.symbol(), "TOP");
    assert_eq!(tree.leaves().len(), input.len());

    assert!(!g.is_in_language(&["from", "miami", "flights"]));
  }
}
