//! Structural checks for hand-built charts and probability tables, for
//! test fixtures and debugging snapshots. The parser never needs these.

use std::error::Error;
use std::fmt;

use crate::chart::{Backpointer, Chart, Entry, ProbTable, Span, Table};

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaViolation {
  /// A span whose end isn't after its start
  EmptySpan(Span),
  EmptySymbol(Span),
  /// A leaf entry over more than one token
  WideLeaf { span: Span, symbol: String },
  /// A binary entry over a single token
  NarrowBinary { span: Span, symbol: String },
  /// Backpointers that don't split the span into two adjacent, non-empty parts
  BadSplit {
    span: Span,
    symbol: String,
    left: Backpointer,
    right: Backpointer,
  },
  /// A backpointer to a (span, symbol) with no entry
  Dangling { span: Span, symbol: String, target: Backpointer },
  PositiveLogProb { span: Span, symbol: String, prob: f64 },
  NotANumber { span: Span, symbol: String },
  /// A (span, symbol) in one table but not the other
  KeyMismatch { span: Span, symbol: String },
}

impl fmt::Display for SchemaViolation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::EmptySpan(span) => write!(f, "span {} is empty", span),
      Self::EmptySymbol(span) => write!(f, "span {} has an entry with an empty symbol", span),
      Self::WideLeaf { span, symbol } => {
        write!(f, "{} over {} is a leaf, but spans more than one token", symbol, span)
      }
      Self::NarrowBinary { span, symbol } => {
        write!(f, "{} over {} has backpointers, but spans a single token", symbol, span)
      }
      Self::BadSplit {
        span,
        symbol,
        left,
        right,
      } => write!(
        f,
        "backpointers ({}) ({}) of {} don't split {}",
        left, right, symbol, span
      ),
      Self::Dangling { span, symbol, target } => {
        write!(f, "{} over {} points at missing entry ({})", symbol, span, target)
      }
      Self::PositiveLogProb { span, symbol, prob } => {
        write!(f, "log probability of {} over {} is positive: {}", symbol, span, prob)
      }
      Self::NotANumber { span, symbol } => {
        write!(f, "log probability of {} over {} is NaN", symbol, span)
      }
      Self::KeyMismatch { span, symbol } => {
        write!(f, "{} over {} is only present in one table", symbol, span)
      }
    }
  }
}

impl Error for SchemaViolation {}

fn check_keys<V>(table: &Table<V>) -> Result<(), SchemaViolation> {
  for (span, cell) in table.iter() {
    if span.is_empty() {
      return Err(SchemaViolation::EmptySpan(*span));
    }
    if cell.keys().any(String::is_empty) {
      return Err(SchemaViolation::EmptySymbol(*span));
    }
  }
  Ok(())
}

fn check_split(span: Span, symbol: &str, left: &Backpointer, right: &Backpointer) -> Result<(), SchemaViolation> {
  let k = left.span.end;
  if left.span.start != span.start || right.span.start != k || right.span.end != span.end || k <= span.start || k >= span.end {
    return Err(SchemaViolation::BadSplit {
      span,
      symbol: symbol.to_string(),
      left: left.clone(),
      right: right.clone(),
    });
  }
  Ok(())
}

/// Checks that leaves only cover single tokens, and every backpointer pair
/// splits its span and points at entries that exist.
pub fn check_chart(chart: &Chart) -> Result<(), SchemaViolation> {
  check_keys(chart)?;

  for (span, cell) in chart.iter() {
    let span = *span;
    for (symbol, entry) in cell.iter() {
      match entry {
        Entry::Leaf(_) if span.len() != 1 => {
          return Err(SchemaViolation::WideLeaf {
            span,
            symbol: symbol.clone(),
          });
        }
        Entry::Leaf(_) => {}
        Entry::Binary(..) if span.len() == 1 => {
          return Err(SchemaViolation::NarrowBinary {
            span,
            symbol: symbol.clone(),
          });
        }
        Entry::Binary(left, right) => {
          check_split(span, symbol, left, right)?;
          for target in [left, right] {
            if !chart.contains(target.span, &target.symbol) {
              return Err(SchemaViolation::Dangling {
                span,
                symbol: symbol.clone(),
                target: target.clone(),
              });
            }
          }
        }
      }
    }
  }

  Ok(())
}

/// Checks that every log probability is a number no greater than 0
pub fn check_probs(probs: &ProbTable) -> Result<(), SchemaViolation> {
  check_keys(probs)?;

  for (span, cell) in probs.iter() {
    for (symbol, prob) in cell.iter() {
      if prob.is_nan() {
        return Err(SchemaViolation::NotANumber {
          span: *span,
          symbol: symbol.clone(),
        });
      }
      if *prob > 0.0 {
        return Err(SchemaViolation::PositiveLogProb {
          span: *span,
          symbol: symbol.clone(),
          prob: *prob,
        });
      }
    }
  }

  Ok(())
}

/// First (span, symbol) of `a` that `b` has no entry for
fn first_missing<A, B>(a: &Table<A>, b: &Table<B>) -> Option<SchemaViolation> {
  a.iter()
    .flat_map(|(span, cell)| cell.keys().map(move |symbol| (*span, symbol)))
    .find(|(span, symbol)| !b.contains(*span, symbol))
    .map(|(span, symbol)| SchemaViolation::KeyMismatch {
      span,
      symbol: symbol.clone(),
    })
}

/// Checks both tables, and that they have exactly the same keys
pub fn check_tables(chart: &Chart, probs: &ProbTable) -> Result<(), SchemaViolation> {
  check_chart(chart)?;
  check_probs(probs)?;

  if let Some(v) = first_missing(chart, probs).or_else(|| first_missing(probs, chart)) {
    return Err(v);
  }

  Ok(())
}

/// [`check_chart`], logging the violation and returning false
pub fn is_well_formed_chart(chart: &Chart) -> bool {
  report("chart", check_chart(chart))
}

/// [`check_probs`], logging the violation and returning false
pub fn is_well_formed_probs(probs: &ProbTable) -> bool {
  report("probability table", check_probs(probs))
}

fn report(what: &str, result: Result<(), SchemaViolation>) -> bool {
  match result {
    Ok(()) => true,
    Err(v) => {
      tracing::warn!("malformed {}: {}", what, v);
      false
    }
  }
}
