//! Crossover and crossunder predicates with a look-back offset.
//!
//! Evaluated at `i = index - offset`. The comparison is strict at `i` and
//! non-strict at `i-1`, so a flat touch followed by a move still counts.
//! Returns `false` when `i < 1`, when `offset > index`, or when `i` is past
//! the end of either series.

fn window(a: &[f64], b: &[f64], index: usize, offset: usize) -> Option<(f64, f64, f64, f64)> {
    let i = index.checked_sub(offset)?;
    if i < 1 || i >= a.len() || i >= b.len() {
        return None;
    }
    Some((a[i], b[i], a[i - 1], b[i - 1]))
}

/// `a` moved from at-or-below `b` to strictly above it.
pub fn crossover(a: &[f64], b: &[f64], index: usize, offset: usize) -> bool {
    match window(a, b, index, offset) {
        Some((a_curr, b_curr, a_prev, b_prev)) => a_curr > b_curr && a_prev <= b_prev,
        None => false,
    }
}

/// `a` moved from at-or-above `b` to strictly below it.
pub fn crossunder(a: &[f64], b: &[f64], index: usize, offset: usize) -> bool {
    match window(a, b, index, offset) {
        Some((a_curr, b_curr, a_prev, b_prev)) => a_curr < b_curr && a_prev >= b_prev,
        None => false,
    }
}

/// A crossover at any offset in `0..=max_offset`.
pub fn crossover_within(a: &[f64], b: &[f64], index: usize, max_offset: usize) -> bool {
    (0..=max_offset).any(|offset| crossover(a, b, index, offset))
}

/// A crossunder at any offset in `0..=max_offset`.
pub fn crossunder_within(a: &[f64], b: &[f64], index: usize, max_offset: usize) -> bool {
    (0..=max_offset).any(|offset| crossunder(a, b, index, offset))
}
