//! Not-a-knot cubic spline.
//!
//! The spline is stored through its second derivatives `M_i` at the knots.
//! On segment `[x_i, x_{i+1}]` with `h = x_{i+1} - x_i`:
//!
//! ```text
//! S(x) = M_i (x_{i+1} - x)^3 / 6h + M_{i+1} (x - x_i)^3 / 6h
//!      + (y_i / h - M_i h / 6) (x_{i+1} - x)
//!      + (y_{i+1} / h - M_{i+1} h / 6) (x - x_i)
//! ```
//!
//! Interior knots carry the usual C2 continuity equations. The two end
//! equations are "not-a-knot": the third derivative is continuous across the
//! second and the penultimate knot, so the first two and the last two segments
//! are each a single cubic. Queries outside the knot range continue the end
//! cubics (polynomial extrapolation), so data sampled from any cubic is
//! reproduced exactly everywhere.
//!
//! The `n x n` system is small (one row per surviving grid point) and solved
//! with a dense LU decomposition.

use nalgebra::{DMatrix, DVector};

/// A cubic needs four points; with fewer the not-a-knot system is singular.
pub const MIN_SPLINE_POINTS: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub enum SplineError {
    TooFewPoints { available: usize },
    LengthMismatch { x: usize, y: usize },
    NonIncreasing,
    NonFinite,
    Singular,
}

impl std::fmt::Display for SplineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SplineError::TooFewPoints { available } => write!(
                f,
                "{available} knots, need at least {MIN_SPLINE_POINTS}"
            ),
            SplineError::LengthMismatch { x, y } => write!(f, "x has {x} values but y has {y}"),
            SplineError::NonIncreasing => write!(f, "knots must be strictly increasing"),
            SplineError::NonFinite => write!(f, "knots and values must be finite"),
            SplineError::Singular => write!(f, "spline system is singular"),
        }
    }
}

impl std::error::Error for SplineError {}

#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    /// Second derivatives at the knots.
    m: Vec<f64>,
}

impl CubicSpline {
    /// Fit a not-a-knot spline through `(x[i], y[i])`.
    pub fn not_a_knot(x: &[f64], y: &[f64]) -> Result<Self, SplineError> {
        if x.len() != y.len() {
            return Err(SplineError::LengthMismatch { x: x.len(), y: y.len() });
        }
        let n = x.len();
        if n < MIN_SPLINE_POINTS {
            return Err(SplineError::TooFewPoints { available: n });
        }
        if x.iter().chain(y).any(|v| !v.is_finite()) {
            return Err(SplineError::NonFinite);
        }
        if x.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SplineError::NonIncreasing);
        }

        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        let slope: Vec<f64> = (0..n - 1).map(|i| (y[i + 1] - y[i]) / h[i]).collect();

        let mut a = DMatrix::<f64>::zeros(n, n);
        let mut rhs = DVector::<f64>::zeros(n);

        // M'''(x_1^-) = M'''(x_1^+)
        a[(0, 0)] = h[1];
        a[(0, 1)] = -(h[0] + h[1]);
        a[(0, 2)] = h[0];

        for i in 1..n - 1 {
            a[(i, i - 1)] = h[i - 1];
            a[(i, i)] = 2.0 * (h[i - 1] + h[i]);
            a[(i, i + 1)] = h[i];
            rhs[i] = 6.0 * (slope[i] - slope[i - 1]);
        }

        // M'''(x_{n-2}^-) = M'''(x_{n-2}^+)
        a[(n - 1, n - 3)] = h[n - 2];
        a[(n - 1, n - 2)] = -(h[n - 3] + h[n - 2]);
        a[(n - 1, n - 1)] = h[n - 3];

        let m = a.lu().solve(&rhs).ok_or(SplineError::Singular)?;
        if m.iter().any(|v| !v.is_finite()) {
            return Err(SplineError::Singular);
        }

        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            m: m.iter().copied().collect(),
        })
    }

    /// Evaluate the spline (or its end-piece extrapolation) at `xq`.
    pub fn value(&self, xq: f64) -> f64 {
        let i = self.segment(xq);
        let (x0, x1) = (self.x[i], self.x[i + 1]);
        let (y0, y1) = (self.y[i], self.y[i + 1]);
        let (m0, m1) = (self.m[i], self.m[i + 1]);
        let h = x1 - x0;

        let left = x1 - xq;
        let right = xq - x0;

        m0 * left.powi(3) / (6.0 * h)
            + m1 * right.powi(3) / (6.0 * h)
            + (y0 / h - m0 * h / 6.0) * left
            + (y1 / h - m1 * h / 6.0) * right
    }

    /// Segment whose cubic applies at `xq`; end segments cover the outside.
    fn segment(&self, xq: f64) -> usize {
        let last = self.x.len() - 2;
        let idx = self.x.partition_point(|v| *v <= xq);
        idx.saturating_sub(1).min(last)
    }
}
