//! Solving `F(x1, x2) = ln(value)` for `x2` as a function of `x1`.
//!
//! Only two equation shapes occur, so there is no symbolic solver. Instead the
//! model's terms are grouped by their power of `x2`:
//!
//! ```text
//! F(x1, x2) - ln(v) = A(x1)·x2² + B(x1)·x2 + C(x1) + mu2(x2)·(...)
//! ```
//!
//! - no `mu2` terms: closed form (quadratic or linear in `x2`)
//! - `mu2` terms present (LAR): transcendental in `x2`, so each `x1` is solved
//!   numerically by scanning the root window and bisecting sign changes
//!
//! Branches are evaluated lazily; a point outside a branch's real domain
//! evaluates to NaN and is dropped later by the gap filter.

use crate::domain::RootSearch;
use crate::error::LevelError;
use crate::math::bracket_roots;
use crate::models::ModelExpression;

/// Which solution a branch follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    /// The only solution of an equation linear in `x2`.
    Linear,
    /// Smaller root (negative arc).
    Lower,
    /// Larger root (positive arc).
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    ClosedForm,
    Bracketed,
}

/// The equation `F(x1, x2) - ln(target) = 0` plus how to solve it.
#[derive(Debug, Clone)]
pub struct LevelEquation {
    expression: ModelExpression,
    log_target: f64,
    method: Method,
    search: RootSearch,
}

impl LevelEquation {
    /// Left-hand side of the equation at `(x1, x2)`.
    pub fn residual(&self, x1: f64, x2: f64) -> f64 {
        self.expression.eval(x1, x2) - self.log_target
    }

    fn closed_form(&self, kind: BranchKind, x1: f64) -> f64 {
        let [c0, c1, c2] = self.expression.x2_polynomial(x1);
        let c0 = c0 - self.log_target;
        match kind {
            BranchKind::Linear => {
                if c1 == 0.0 {
                    f64::NAN
                } else {
                    -c0 / c1
                }
            }
            BranchKind::Lower => quadratic_roots(c2, c1, c0).map_or(f64::NAN, |(lo, _)| lo),
            BranchKind::Upper => quadratic_roots(c2, c1, c0).map_or(f64::NAN, |(_, hi)| hi),
        }
    }

    fn bracketed(&self, kind: BranchKind, x1: f64) -> f64 {
        let roots = bracket_roots(
            |x2| self.residual(x1, x2),
            self.search.lo,
            self.search.hi,
            self.search.steps,
        );
        if roots.len() < 2 {
            return f64::NAN;
        }
        match kind {
            BranchKind::Lower => roots[0],
            BranchKind::Upper => roots[roots.len() - 1],
            BranchKind::Linear => f64::NAN,
        }
    }
}

/// Real roots of `a·x² + b·x + c` in increasing order.
///
/// Uses `q = -(b + sign(b)·sqrt(D)) / 2`, roots `q/a` and `c/q`, which avoids
/// cancellation when `b² >> 4ac`. Returns `None` for `a = 0` or `D < 0`.
pub fn quadratic_roots(a: f64, b: f64, c: f64) -> Option<(f64, f64)> {
    if a == 0.0 {
        return None;
    }
    let disc = b * b - 4.0 * a * c;
    if !(disc >= 0.0) {
        return None;
    }
    let q = -0.5 * (b + disc.sqrt().copysign(b));
    if q == 0.0 {
        // b = 0 and D = 0, hence c = 0: double root at the origin.
        return Some((0.0, 0.0));
    }
    let r1 = q / a;
    let r2 = c / q;
    Some((r1.min(r2), r1.max(r2)))
}

/// One solution `x2 = f(x1)`.
#[derive(Debug, Clone, Copy)]
pub struct Branch<'a> {
    equation: &'a LevelEquation,
    kind: BranchKind,
}

impl Branch<'_> {
    pub fn kind(&self) -> BranchKind {
        self.kind
    }

    /// Evaluate the branch; NaN where it has no real value.
    pub fn eval(&self, x1: f64) -> f64 {
        match self.equation.method {
            Method::ClosedForm => self.equation.closed_form(self.kind, x1),
            Method::Bracketed => self.equation.bracketed(self.kind, x1),
        }
    }
}

/// Zero, one or two solution branches of one level equation.
#[derive(Debug, Clone)]
pub struct SolutionBranches {
    equation: LevelEquation,
    kinds: Vec<BranchKind>,
}

impl SolutionBranches {
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn equation(&self) -> &LevelEquation {
        &self.equation
    }

    /// How branches are evaluated, for diagnostics.
    pub fn method_name(&self) -> &'static str {
        match self.equation.method {
            Method::ClosedForm => "closed form",
            Method::Bracketed => "bracketed roots",
        }
    }

    pub fn branch(&self, index: usize) -> Option<Branch<'_>> {
        self.kinds.get(index).map(|&kind| Branch {
            equation: &self.equation,
            kind,
        })
    }

    /// `(negative, positive)` when the equation has two branches.
    pub fn pair(&self) -> Option<(Branch<'_>, Branch<'_>)> {
        match self.kinds.as_slice() {
            [_, _] => Some((self.branch(0)?, self.branch(1)?)),
            _ => None,
        }
    }
}

/// Solve with the default root window.
pub fn solve(expression: &ModelExpression, target: f64) -> Result<SolutionBranches, LevelError> {
    solve_with(expression, target, RootSearch::default())
}

/// Solve `expression = ln(target)` for `x2`.
///
/// Zero or one branches are valid outcomes; callers needing a band check
/// `SolutionBranches::pair`.
pub fn solve_with(
    expression: &ModelExpression,
    target: f64,
    search: RootSearch,
) -> Result<SolutionBranches, LevelError> {
    if !(target.is_finite() && target > 0.0) {
        return Err(LevelError::InvalidTargetValue(target));
    }
    search.validate()?;

    let (method, kinds) = if expression.has_membership_in_x2() {
        (Method::Bracketed, vec![BranchKind::Lower, BranchKind::Upper])
    } else {
        match expression.x2_degree() {
            2 => (Method::ClosedForm, vec![BranchKind::Lower, BranchKind::Upper]),
            1 => (Method::ClosedForm, vec![BranchKind::Linear]),
            _ => (Method::ClosedForm, Vec::new()),
        }
    };

    Ok(SolutionBranches {
        equation: LevelEquation {
            expression: expression.clone(),
            log_target: target.ln(),
            method,
            search,
        },
        kinds,
    })
}
