use std::error::Error;

/// Boxed static error type
pub type Err = Box<dyn Error + 'static>;

/// Correctly rounded sum of a sequence of floats. Keeps a list of
/// non-overlapping partial sums (Shewchuk's algorithm) and rounds them to a
/// single float at the end, breaking half-way ties to even.
///
/// ```
/// let v = vec![0.1; 10];
///
/// assert_ne!(v.iter().sum::<f64>(), 1.0);
/// assert_eq!(pcky::utils::fsum(v), 1.0);
/// ```
pub fn fsum<I>(values: I) -> f64
where
  I: IntoIterator<Item = f64>,
{
  let mut partials: Vec<f64> = Vec::new();

  for mut x in values {
    let mut kept = 0;
    for idx in 0..partials.len() {
      let mut y = partials[idx];
      if x.abs() < y.abs() {
        std::mem::swap(&mut x, &mut y);
      }
      let hi = x + y;
      let lo = y - (hi - x);
      if lo != 0.0 {
        partials[kept] = lo;
        kept += 1;
      }
      x = hi;
    }
    partials.truncate(kept);
    partials.push(x);
  }

  // partials are non-overlapping and ascending in magnitude, add them from the top
  // until the sum stops being exact
  let Some(mut hi) = partials.pop() else {
    return 0.0;
  };
  let mut lo = 0.0;
  while let Some(y) = partials.pop() {
    let x = hi;
    hi = x + y;
    lo = y - (hi - x);
    if lo != 0.0 {
      break;
    }
  }

  // hi + lo sits exactly half-way between two floats, and the next partial
  // pushes it the same way lo does, so round away from hi
  if let Some(&next) = partials.last() {
    if (lo < 0.0 && next < 0.0) || (lo > 0.0 && next > 0.0) {
      let y = lo * 2.0;
      let x = hi + y;
      if y == x - hi {
        hi = x;
      }
    }
  }

  hi
}

/// Relative float comparison, true if `a` and `b` differ by at most
/// `rel_tol` of the larger magnitude.
pub fn is_close(a: f64, b: f64, rel_tol: f64) -> bool {
  if a == b {
    return true;
  }
  if !a.is_finite() || !b.is_finite() {
    return false;
  }
  (a - b).abs() <= rel_tol * a.abs().max(b.abs())
}
