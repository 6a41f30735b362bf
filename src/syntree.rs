use std::fmt;

use crate::chart::{Chart, Entry, Span};

#[derive(Debug, PartialEq, Clone)]
pub struct Constituent<T> {
  pub value: T,
  pub span: Span,
}

impl<T> fmt::Display for Constituent<T>
where
  T: fmt::Display,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.span, self.value)
  }
}

/// A binary derivation tree. Leaves are preterminals: a symbol together with
/// the token it produced.
#[derive(Debug, PartialEq, Clone)]
pub enum SynTree<T, U> {
  Branch(Constituent<T>, Box<SynTree<T, U>>, Box<SynTree<T, U>>),
  Leaf(Constituent<T>, U),
}

impl<T, U> SynTree<T, U> {
  pub fn leaf(symbol: T, span: Span, word: U) -> Self {
    Self::Leaf(Constituent { value: symbol, span }, word)
  }

  pub fn branch(symbol: T, span: Span, left: Self, right: Self) -> Self {
    Self::Branch(
      Constituent { value: symbol, span },
      Box::new(left),
      Box::new(right),
    )
  }

  pub fn is_leaf(&self) -> bool {
    matches!(self, Self::Leaf(..))
  }

  pub fn is_branch(&self) -> bool {
    matches!(self, Self::Branch(..))
  }

  pub fn constituent(&self) -> &Constituent<T> {
    match self {
      Self::Branch(c, _, _) | Self::Leaf(c, _) => c,
    }
  }

  pub fn symbol(&self) -> &T {
    &self.constituent().value
  }

  pub fn span(&self) -> Span {
    self.constituent().span
  }

  pub fn children(&self) -> Option<(&Self, &Self)> {
    match self {
      Self::Branch(_, l, r) => Some((&**l, &**r)),
      _ => None,
    }
  }

  /// Tokens at the leaves, left to right
  pub fn leaves(&self) -> Vec<&U> {
    let mut out = Vec::new();
    let mut stack = vec![self];
    while let Some(node) = stack.pop() {
      match node {
        Self::Leaf(_, w) => out.push(w),
        Self::Branch(_, l, r) => {
          stack.push(&**r);
          stack.push(&**l);
        }
      }
    }
    out
  }

  /// Number of nodes on the longest path from the root to a leaf
  pub fn depth(&self) -> usize {
    match self {
      Self::Leaf(..) => 1,
      Self::Branch(_, l, r) => 1 + l.depth().max(r.depth()),
    }
  }
}

/// Bracketed form, `(S (NP dog) (VP barks))`
impl<T, U> fmt::Display for SynTree<T, U>
where
  T: fmt::Display,
  U: fmt::Display,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Leaf(c, w) => write!(f, "({} {})", c.value, w),
      Self::Branch(c, l, r) => write!(f, "({} {} {})", c.value, l, r),
    }
  }
}

/// Rebuilds the best derivation of `symbol` over `span` from the chart's
/// backpointers.
///
/// Panics if `symbol` has no entry at `span`, or if a backpointer leads to a
/// missing entry. Use [`try_reconstruct_tree`] when the root may be absent.
pub fn reconstruct_tree(chart: &Chart, span: Span, symbol: &str) -> SynTree<String, String> {
  try_reconstruct_tree(chart, span, symbol)
    .unwrap_or_else(|| panic!("no derivation of {} over {} in chart", symbol, span))
}

/// Like [`reconstruct_tree`], but None if the root entry is missing.
pub fn try_reconstruct_tree(chart: &Chart, span: Span, symbol: &str) -> Option<SynTree<String, String>> {
  let entry = chart.get(span, symbol)?;

  let tree = match entry {
    Entry::Leaf(word) => SynTree::leaf(symbol.to_string(), span, word.clone()),
    Entry::Binary(left, right) => {
      // each child must be strictly inside the span for the recursion to terminate
      let k = left.span.end;
      assert!(
        left.span.start == span.start
          && right.span.start == k
          && right.span.end == span.end
          && span.start < k
          && k < span.end,
        "backpointers of {} over {} don't split it: {} {}",
        symbol,
        span,
        left,
        right
      );
      SynTree::branch(
        symbol.to_string(),
        span,
        reconstruct_tree(chart, left.span, &left.symbol),
        reconstruct_tree(chart, right.span, &right.symbol),
      )
    }
  };

  Some(tree)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::chart::Backpointer;
  use crate::grammar::Grammar;
  use crate::testing::toy_grammar;
  use crate::viterbi::parse_with_backpointers;

  #[test]
  fn test_dog_barks() {
    let g = toy_grammar();
    let (chart, _) = parse_with_backpointers(&g, &["dog", "barks"]);
    let tree = reconstruct_tree(&chart, Span::new(0, 2), "S");

    assert_eq!(
      tree,
      SynTree::branch(
        "S".to_string(),
        Span::new(0, 2),
        SynTree::leaf("NP".to_string(), Span::new(0, 1), "dog".to_string()),
        SynTree::leaf("VP".to_string(), Span::new(1, 2), "barks".to_string()),
      )
    );
    assert_eq!(tree.to_string(), "(S (NP dog) (VP barks))");
    assert!(tree.is_branch());
    assert_eq!(tree.constituent().to_string(), "0..2: S");

    let (np, vp) = tree.children().unwrap();
    assert!(np.is_leaf() && vp.is_leaf());
    assert_eq!(vp.constituent().to_string(), "1..2: VP");
  }

  #[test]
  #[should_panic(expected = "backpointers of S over 0..2 don't split it")]
  fn test_split_outside_span_panics() {
    // S 0..2 points back at itself through an empty left child
    let chart: Chart = vec![
      (Span::new(0, 0), "A".to_string(), Entry::Leaf("a".to_string())),
      (
        Span::new(0, 2),
        "S".to_string(),
        Entry::Binary(
          Backpointer::new("A", Span::new(0, 0)),
          Backpointer::new("S", Span::new(0, 2)),
        ),
      ),
    ]
    .into_iter()
    .collect();

    try_reconstruct_tree(&chart, Span::new(0, 2), "S");
  }

  #[test]
  fn test_missing_root() {
    let g = toy_grammar();
    let (chart, _) = parse_with_backpointers(&g, &["barks", "dog"]);
    assert!(try_reconstruct_tree(&chart, Span::new(0, 2), "S").is_none());
  }

  #[test]
  #[should_panic(expected = "no derivation of S over 0..2")]
  fn test_missing_root_panics() {
    let g = toy_grammar();
    let (chart, _) = parse_with_backpointers(&g, &["barks", "dog"]);
    reconstruct_tree(&chart, Span::new(0, 2), "S");
  }

  #[test]
  fn test_leaves_are_input() {
    let g: Grammar = r#"
      S -> S S ; 0.4
      S -> x ; 0.3
      S -> y ; 0.3
    "#
    .parse()
    .unwrap();

    let tokens = ["x", "y", "y", "x", "x", "y", "x"];
    let (chart, _) = parse_with_backpointers(&g, &tokens);
    let tree = reconstruct_tree(&chart, Span::new(0, tokens.len()), "S");

    let leaves = tree.leaves().into_iter().map(String::as_str).collect::<Vec<_>>();
    assert_eq!(leaves, tokens);
    assert_eq!(tree.span(), Span::new(0, 7));
    assert!(tree.depth() <= tokens.len());
  }

  #[test]
  fn test_deep_left_branching() {
    // L -> L X forces a fully left-branching tree
    let g: Grammar = r#"
      L -> L X ; 0.5
      L -> x ; 0.5
      X -> x ; 1.0
    "#
    .parse()
    .unwrap();

    let tokens = vec!["x"; 40];
    let (chart, _) = parse_with_backpointers(&g, &tokens);
    let tree = reconstruct_tree(&chart, Span::new(0, 40), "L");
    assert_eq!(tree.depth(), 40);
    assert_eq!(tree.leaves().len(), 40);
    assert_eq!(tree.children().unwrap().1.symbol(), "X");
  }
}
