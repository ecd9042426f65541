//! Model expressions for LAR / L2.
//!
//! A model is a linear combination of fixed basis terms in the two unknowns:
//!
//! ```text
//! F(x1, x2) = Σ θ_i · b_i(x1, x2)
//! ```
//!
//! Every basis term has the shape `x1^p · x2^q · factor`, where `factor` is `1`,
//! `mu1 = mu(x1)` or `mu2 = mu(x2)`. Keeping that shape explicit lets the solver
//! group terms by their power of `x2` instead of doing symbolic algebra.

use std::fmt;

use crate::domain::{Membership, ModelKind, ModelSpec};
use crate::error::LevelError;
use crate::math::membership;

/// Non-polynomial factor of a basis term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Factor {
    One,
    /// `mu(x1)`
    Mu1,
    /// `mu(x2)`
    Mu2,
}

/// `x1^x1_pow · x2^x2_pow · factor`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasisTerm {
    pub x1_pow: i32,
    pub x2_pow: i32,
    pub factor: Factor,
}

const fn term(x1_pow: i32, x2_pow: i32, factor: Factor) -> BasisTerm {
    BasisTerm {
        x1_pow,
        x2_pow,
        factor,
    }
}

/// `[1, x1, x2, x1², x1·x2, x2²]`
pub const L2_BASIS: [BasisTerm; 6] = [
    term(0, 0, Factor::One),
    term(1, 0, Factor::One),
    term(0, 1, Factor::One),
    term(2, 0, Factor::One),
    term(1, 1, Factor::One),
    term(0, 2, Factor::One),
];

/// The L2 basis, then the same six monomials times `mu1`, then times `mu2`.
pub const LAR_BASIS: [BasisTerm; 18] = [
    term(0, 0, Factor::One),
    term(1, 0, Factor::One),
    term(0, 1, Factor::One),
    term(2, 0, Factor::One),
    term(1, 1, Factor::One),
    term(0, 2, Factor::One),
    term(0, 0, Factor::Mu1),
    term(1, 0, Factor::Mu1),
    term(0, 1, Factor::Mu1),
    term(2, 0, Factor::Mu1),
    term(1, 1, Factor::Mu1),
    term(0, 2, Factor::Mu1),
    term(0, 0, Factor::Mu2),
    term(1, 0, Factor::Mu2),
    term(0, 1, Factor::Mu2),
    term(2, 0, Factor::Mu2),
    term(1, 1, Factor::Mu2),
    term(0, 2, Factor::Mu2),
];

/// Ordered basis for a model kind.
pub fn basis(kind: ModelKind) -> &'static [BasisTerm] {
    match kind {
        ModelKind::Lar => &LAR_BASIS,
        ModelKind::L2 => &L2_BASIS,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    pub coefficient: f64,
    pub basis: BasisTerm,
}

/// A built model `F(x1, x2)`; read-only after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelExpression {
    kind: ModelKind,
    terms: Vec<Term>,
    membership: Option<Membership>,
}

/// Build the model expression for `spec`.
///
/// The coefficient list must match the basis length exactly.
pub fn build(spec: &ModelSpec) -> Result<ModelExpression, LevelError> {
    let basis = basis(spec.kind);
    if spec.coefficients.len() != basis.len() {
        return Err(LevelError::ModelConfiguration(format!(
            "{} expects {} coefficients, got {}.",
            spec.kind,
            basis.len(),
            spec.coefficients.len()
        )));
    }
    if let Some(i) = spec.coefficients.iter().position(|c| !c.is_finite()) {
        return Err(LevelError::ModelConfiguration(format!(
            "coefficient #{i} is not finite ({}).",
            spec.coefficients[i]
        )));
    }

    let membership = match spec.kind {
        ModelKind::L2 => None,
        ModelKind::Lar => {
            let m = spec.membership.ok_or_else(|| {
                LevelError::ModelConfiguration("LAR requires delta and xmu.".to_string())
            })?;
            if !(m.delta.is_finite() && m.xmu.is_finite()) {
                return Err(LevelError::ModelConfiguration(format!(
                    "delta and xmu must be finite (delta={}, xmu={}).",
                    m.delta, m.xmu
                )));
            }
            Some(m)
        }
    };

    let terms = spec
        .coefficients
        .iter()
        .zip(basis)
        .map(|(&coefficient, &basis)| Term { coefficient, basis })
        .collect();

    Ok(ModelExpression {
        kind: spec.kind,
        terms,
        membership,
    })
}

impl ModelExpression {
    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn membership(&self) -> Option<Membership> {
        self.membership
    }

    /// `mu(x)` for this model; L2 has no membership terms, so it is never consulted there.
    fn mu(&self, x: f64) -> f64 {
        match self.membership {
            Some(m) => membership(x, m.delta, m.xmu),
            None => 1.0,
        }
    }

    /// Evaluate `F(x1, x2)`.
    pub fn eval(&self, x1: f64, x2: f64) -> f64 {
        let mu1 = self.mu(x1);
        let mu2 = self.mu(x2);
        self.terms
            .iter()
            .map(|t| {
                let factor = match t.basis.factor {
                    Factor::One => 1.0,
                    Factor::Mu1 => mu1,
                    Factor::Mu2 => mu2,
                };
                t.coefficient * x1.powi(t.basis.x1_pow) * x2.powi(t.basis.x2_pow) * factor
            })
            .sum()
    }

    /// Whether any non-zero term depends on `x2` through `mu2`.
    ///
    /// Such models are transcendental in `x2` and have no closed-form solve.
    pub fn has_membership_in_x2(&self) -> bool {
        self.terms
            .iter()
            .any(|t| t.basis.factor == Factor::Mu2 && t.coefficient != 0.0)
    }

    /// Highest power of `x2` with a non-zero coefficient among the polynomial-in-`x2` terms.
    pub fn x2_degree(&self) -> i32 {
        self.terms
            .iter()
            .filter(|t| t.basis.factor != Factor::Mu2 && t.coefficient != 0.0)
            .map(|t| t.basis.x2_pow)
            .max()
            .unwrap_or(0)
    }

    /// Coefficients `[c0, c1, c2]` of `c0 + c1·x2 + c2·x2²` for the terms that
    /// are polynomial in `x2`, evaluated at `x1`.
    pub fn x2_polynomial(&self, x1: f64) -> [f64; 3] {
        let mu1 = self.mu(x1);
        let mut out = [0.0; 3];
        for t in &self.terms {
            let factor = match t.basis.factor {
                Factor::One => 1.0,
                Factor::Mu1 => mu1,
                Factor::Mu2 => continue,
            };
            out[t.basis.x2_pow as usize] += t.coefficient * x1.powi(t.basis.x1_pow) * factor;
        }
        out
    }
}

impl fmt::Display for ModelExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote = false;
        for t in &self.terms {
            if t.coefficient == 0.0 {
                continue;
            }
            let monomial = format_basis(&t.basis);
            let magnitude = t.coefficient.abs();
            if wrote {
                f.write_str(if t.coefficient < 0.0 { " - " } else { " + " })?;
            } else if t.coefficient < 0.0 {
                f.write_str("-")?;
            }
            if monomial.is_empty() {
                write!(f, "{magnitude}")?;
            } else {
                write!(f, "{magnitude}·{monomial}")?;
            }
            wrote = true;
        }
        if !wrote {
            f.write_str("0")?;
        }
        Ok(())
    }
}

fn format_basis(basis: &BasisTerm) -> String {
    let mut parts = Vec::new();
    match basis.factor {
        Factor::One => {}
        Factor::Mu1 => parts.push("mu1".to_string()),
        Factor::Mu2 => parts.push("mu2".to_string()),
    }
    for (name, pow) in [("x1", basis.x1_pow), ("x2", basis.x2_pow)] {
        match pow {
            0 => {}
            1 => parts.push(name.to_string()),
            2 => parts.push(format!("{name}²")),
            p => parts.push(format!("{name}^{p}")),
        }
    }
    parts.join("·")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l2(coefficients: Vec<f64>) -> ModelSpec {
        ModelSpec {
            kind: ModelKind::L2,
            coefficients,
            membership: None,
        }
    }

    fn lar(coefficients: Vec<f64>) -> ModelSpec {
        ModelSpec {
            kind: ModelKind::Lar,
            coefficients,
            membership: Some(Membership { delta: 3.0, xmu: 0.1 }),
        }
    }

    #[test]
    fn l2_evaluates_dot_product_with_basis() {
        let expr = build(&l2(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])).unwrap();
        let (x1, x2) = (0.5_f64, -1.5_f64);
        let expected = 1.0 + 2.0 * x1 + 3.0 * x2 + 4.0 * x1 * x1 + 5.0 * x1 * x2 + 6.0 * x2 * x2;
        assert!((expr.eval(x1, x2) - expected).abs() < 1e-12);
    }

    #[test]
    fn lar_membership_terms_follow_basis_order() {
        // Only the `x2·mu1` and `mu2·x1²` terms are switched on.
        let mut coefficients = vec![0.0; 18];
        coefficients[8] = 2.0;
        coefficients[15] = -1.0;
        let expr = build(&lar(coefficients)).unwrap();

        let (x1, x2) = (0.4_f64, -0.7_f64);
        let mu1 = membership(x1, 3.0, 0.1);
        let mu2 = membership(x2, 3.0, 0.1);
        let expected = 2.0 * x2 * mu1 - mu2 * x1 * x1;
        assert!((expr.eval(x1, x2) - expected).abs() < 1e-12);
        assert!(expr.has_membership_in_x2());
        assert_eq!(expr.x2_degree(), 1);
    }

    #[test]
    fn coefficient_count_mismatch_is_rejected() {
        for n in [5, 7] {
            let err = build(&l2(vec![1.0; n])).unwrap_err();
            assert!(matches!(err, LevelError::ModelConfiguration(_)), "n={n}");
        }
        for n in [17, 19] {
            let err = build(&lar(vec![1.0; n])).unwrap_err();
            assert!(matches!(err, LevelError::ModelConfiguration(_)), "n={n}");
        }
    }

    #[test]
    fn lar_requires_membership_parameters() {
        let mut spec = lar(vec![0.0; 18]);
        spec.membership = None;
        assert!(matches!(build(&spec), Err(LevelError::ModelConfiguration(_))));

        spec.membership = Some(Membership { delta: f64::NAN, xmu: 0.0 });
        assert!(matches!(build(&spec), Err(LevelError::ModelConfiguration(_))));
    }

    #[test]
    fn x2_polynomial_groups_terms() {
        let expr = build(&l2(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])).unwrap();
        let [c0, c1, c2] = expr.x2_polynomial(2.0);
        assert_eq!(c0, 1.0 + 2.0 * 2.0 + 4.0 * 4.0);
        assert_eq!(c1, 3.0 + 5.0 * 2.0);
        assert_eq!(c2, 6.0);
        assert!(!expr.has_membership_in_x2());
        assert_eq!(expr.x2_degree(), 2);
    }

    #[test]
    fn display_skips_zero_terms() {
        let expr = build(&l2(vec![8.0, 0.0, -0.5, -2.0, 0.0, -2.0])).unwrap();
        assert_eq!(expr.to_string(), "8 - 0.5·x2 - 2·x1² - 2·x2²");

        let zero = build(&l2(vec![0.0; 6])).unwrap();
        assert_eq!(zero.to_string(), "0");
    }
}
