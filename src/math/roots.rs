//! Root bracketing for scalar functions.
//!
//! `bracket_roots` scans a window on a uniform grid, and every sign change
//! between neighbouring samples is refined by bisection. Non-finite samples
//! break the bracket chain instead of producing spurious roots.

/// Maximum bisection iterations per bracket.
const MAX_BISECT_ITERS: usize = 200;

/// Relative width at which a bracket counts as converged.
const X_REL_TOL: f64 = 1e-13;

/// Find all roots of `f` on `[lo, hi]` visible at `steps` scan intervals.
///
/// Roots are returned in increasing order. Two roots closer than one scan
/// interval may be missed (no sign change between samples).
pub fn bracket_roots<F>(f: F, lo: f64, hi: f64, steps: usize) -> Vec<f64>
where
    F: Fn(f64) -> f64,
{
    let steps = steps.max(1);
    let width = (hi - lo) / steps as f64;

    let mut roots = Vec::new();
    let mut prev: Option<(f64, f64)> = None;

    for k in 0..=steps {
        let x = if k == steps { hi } else { lo + width * k as f64 };
        let fx = f(x);
        if !fx.is_finite() {
            prev = None;
            continue;
        }
        if fx == 0.0 {
            roots.push(x);
        } else if let Some((x_prev, f_prev)) = prev {
            if f_prev != 0.0 && f_prev.signum() != fx.signum() {
                roots.push(bisect(&f, x_prev, x, f_prev));
            }
        }
        prev = Some((x, fx));
    }

    roots
}

/// Bisection on a bracket `[left, right]` where `f(left) = f_left` has the
/// opposite sign of `f(right)`.
pub fn bisect<F>(f: &F, mut left: f64, mut right: f64, mut f_left: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    for _ in 0..MAX_BISECT_ITERS {
        let mid = 0.5 * (left + right);
        if (right - left).abs() <= X_REL_TOL * (1.0 + mid.abs()) {
            return mid;
        }
        let f_mid = f(mid);
        if f_mid == 0.0 || !f_mid.is_finite() {
            return mid;
        }
        if f_mid.signum() == f_left.signum() {
            left = mid;
            f_left = f_mid;
        } else {
            right = mid;
        }
    }
    0.5 * (left + right)
}
