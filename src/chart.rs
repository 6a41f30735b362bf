use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

/// Half-open interval of token positions, `tokens[start..end]`
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
  pub start: usize,
  pub end: usize,
}

impl Span {
  pub fn new(start: usize, end: usize) -> Self {
    Self { start, end }
  }

  pub fn len(&self) -> usize {
    self.end.saturating_sub(self.start)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Splits at `k`, giving `(start..k, k..end)`
  pub fn split(&self, k: usize) -> (Span, Span) {
    (Span::new(self.start, k), Span::new(k, self.end))
  }
}

impl From<(usize, usize)> for Span {
  fn from((start, end): (usize, usize)) -> Self {
    Self::new(start, end)
  }
}

impl fmt::Display for Span {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}", self.start, self.end)
  }
}

/// Points at the child constituent `symbol` over `span`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backpointer {
  pub symbol: String,
  pub span: Span,
}

impl Backpointer {
  pub fn new(symbol: impl Into<String>, span: Span) -> Self {
    Self {
      symbol: symbol.into(),
      span,
    }
  }
}

impl fmt::Display for Backpointer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.span, self.symbol)
  }
}

/// How the best derivation of a chart cell was built
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
  /// Directly from the token at this position
  Leaf(String),
  /// From two adjacent children
  Binary(Backpointer, Backpointer),
}

impl fmt::Display for Entry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Leaf(w) => write!(f, "{:?}", w),
      Self::Binary(l, r) => write!(f, "({}) ({})", l, r),
    }
  }
}

/// Sparse table from span to symbol to value. Only spans with at least one
/// symbol are stored. Ordered, so iteration (and therefore anything derived
/// from it) is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<V>(BTreeMap<Span, BTreeMap<String, V>>);

/// Backpointers of the best derivation for every span and symbol
pub type Chart = Table<Entry>;

/// Natural-log probability of the best derivation for every span and symbol
pub type ProbTable = Table<f64>;

impl<V> Table<V> {
  pub fn new() -> Self {
    Self(BTreeMap::new())
  }

  /// Number of non-empty spans
  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn cell(&self, span: Span) -> Option<&BTreeMap<String, V>> {
    self.0.get(&span)
  }

  pub fn get(&self, span: Span, symbol: &str) -> Option<&V> {
    self.0.get(&span).and_then(|cell| cell.get(symbol))
  }

  pub fn contains(&self, span: Span, symbol: &str) -> bool {
    self.get(span, symbol).is_some()
  }

  /// Symbols present over `span`, in order
  pub fn symbols(&self, span: Span) -> impl Iterator<Item = &str> {
    self.0.get(&span).into_iter().flat_map(|cell| cell.keys().map(String::as_str))
  }

  pub fn insert(&mut self, span: Span, symbol: impl Into<String>, value: V) -> Option<V> {
    self.0.entry(span).or_default().insert(symbol.into(), value)
  }

  /// Adds a whole cell at once. Empty cells are dropped to keep the table sparse.
  pub fn insert_cell(&mut self, span: Span, cell: BTreeMap<String, V>) {
    if !cell.is_empty() {
      self.0.insert(span, cell);
    }
  }

  pub fn spans(&self) -> impl Iterator<Item = Span> + '_ {
    self.0.keys().copied()
  }

  pub fn iter(&self) -> btree_map::Iter<'_, Span, BTreeMap<String, V>> {
    self.0.iter()
  }
}

impl<V> Default for Table<V> {
  fn default() -> Self {
    Self::new()
  }
}

impl<'a, V> IntoIterator for &'a Table<V> {
  type Item = (&'a Span, &'a BTreeMap<String, V>);
  type IntoIter = btree_map::Iter<'a, Span, BTreeMap<String, V>>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl<V> FromIterator<(Span, String, V)> for Table<V> {
  fn from_iter<I: IntoIterator<Item = (Span, String, V)>>(iter: I) -> Self {
    let mut table = Self::new();
    for (span, symbol, value) in iter {
      table.insert(span, symbol, value);
    }
    table
  }
}

impl<V> fmt::Display for Table<V>
where
  V: fmt::Display,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (span, cell) in self.0.iter() {
      writeln!(f, "Span {}:", span)?;
      for (symbol, value) in cell.iter() {
        writeln!(f, "  {}: {}", symbol, value)?;
      }
    }
    Ok(())
  }
}
