//! Equality-constrained quadratic programs via the KKT block system.
//!
//! Purpose
//! - Solve `min 0.5 uᵀAu  s.t.  Bu = g` in closed form by assembling the
//!   augmented KKT system and solving it as one linear system.
//! - Return everything the figures annotate: minimizer, multipliers,
//!   objective value, objective gradient, constraint gradient.
//!
//! Why dynamic matrices
//! - The lecture instances are tiny but not all the same size (n + m varies
//!   per figure), so the assembled system is a `DMatrix` rather than a fixed
//!   `Matrix2`.
//!
//! Numerics
//! - Positive definiteness is decided by Cholesky; conditioning of the
//!   assembled system by its singular values against `NumCfg::eps_rank`.
//!   A near-singular system is an error, never a pseudo-solution.

use nalgebra::{Cholesky, DMatrix, DVector};

use crate::error::CoreError;

/// Numeric configuration (tolerances).
#[derive(Clone, Copy, Debug)]
pub struct NumCfg {
    /// Relative singular-value cutoff for the KKT conditioning check.
    pub eps_rank: f64,
    /// Elementwise tolerance for the symmetry check on `A`.
    pub eps_sym: f64,
}

impl Default for NumCfg {
    fn default() -> Self {
        Self {
            eps_rank: 1e-12,
            eps_sym: 1e-9,
        }
    }
}

/// Objective `f(u) = 0.5 uᵀAu` for a symmetric positive-definite `A`.
///
/// The SPD invariant is validated inside [`solve_equality_qp`], not at
/// construction, so callers can build forms from literals without threading
/// a `Result`.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadraticForm {
    pub a: DMatrix<f64>,
}

impl QuadraticForm {
    pub fn new(a: DMatrix<f64>) -> Self {
        Self { a }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.a.nrows()
    }

    /// Objective value `0.5 uᵀAu`.
    #[inline]
    pub fn eval(&self, u: &DVector<f64>) -> f64 {
        0.5 * u.dot(&(&self.a * u))
    }

    /// Gradient `Au` (for symmetric `A`).
    #[inline]
    pub fn grad(&self, u: &DVector<f64>) -> DVector<f64> {
        &self.a * u
    }

    /// Symmetric within `eps_sym` and Cholesky-factorizable.
    fn check_spd(&self, cfg: NumCfg) -> Result<(), CoreError> {
        let n = self.a.nrows();
        for i in 0..n {
            for j in (i + 1)..n {
                if (self.a[(i, j)] - self.a[(j, i)]).abs() > cfg.eps_sym {
                    return Err(CoreError::NonPositiveDefinite);
                }
            }
        }
        match Cholesky::new(self.a.clone()) {
            Some(_) => Ok(()),
            None => Err(CoreError::NonPositiveDefinite),
        }
    }
}

/// Linear equality constraint `Bu = g` with `B` of shape m×n, m < n.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearConstraint {
    pub b: DMatrix<f64>,
    pub g: DVector<f64>,
}

impl LinearConstraint {
    pub fn new(b: DMatrix<f64>, g: DVector<f64>) -> Self {
        Self { b, g }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.b.nrows()
    }

    /// Constraint residual `Bu - g`.
    #[inline]
    pub fn residual(&self, u: &DVector<f64>) -> DVector<f64> {
        &self.b * u - &self.g
    }
}

/// Solution of the KKT system: minimizer, multipliers, and the gradients the
/// figures annotate. Derived data, recomputed per call, never cached.
#[derive(Clone, Debug, PartialEq)]
pub struct KktSolution {
    pub u_star: DVector<f64>,
    pub lambda_star: DVector<f64>,
    pub f_star: f64,
    /// `∇f(u*) = A u*`.
    pub grad_f: DVector<f64>,
    /// `∇φ = B` (constant for a linear constraint), one row per multiplier.
    pub grad_phi: DMatrix<f64>,
}

/// Solve `min 0.5 uᵀAu  s.t.  Bu = g` through the augmented system
///
/// ```text
/// [ A  -Bᵀ ] [u]   [  0 ]
/// [ -B   0 ] [λ] = [ -g ]
/// ```
///
/// Stationarity `Au = Bᵀλ` plus primal feasibility in one solve. With `A`
/// positive-definite and `B` full row rank the solution is unique; any
/// degeneracy surfaces as [`CoreError::SingularSystem`].
pub fn solve_equality_qp(
    form: &QuadraticForm,
    constraint: &LinearConstraint,
    cfg: NumCfg,
) -> Result<KktSolution, CoreError> {
    let n = form.dim();
    let m = constraint.rows();
    if form.a.ncols() != n {
        return Err(CoreError::dims(format!(
            "A must be square, got {}x{}",
            form.a.nrows(),
            form.a.ncols()
        )));
    }
    if constraint.b.ncols() != n {
        return Err(CoreError::dims(format!(
            "B has {} columns but A is {n}x{n}",
            constraint.b.ncols()
        )));
    }
    if constraint.g.len() != m {
        return Err(CoreError::dims(format!(
            "target has length {} but B has {m} rows",
            constraint.g.len()
        )));
    }
    if m == 0 || m >= n {
        return Err(CoreError::dims(format!(
            "need 0 < m < n constraint rows, got m={m}, n={n}"
        )));
    }
    form.check_spd(cfg)?;

    // Assemble the (n+m)x(n+m) block system.
    let size = n + m;
    let mut k = DMatrix::<f64>::zeros(size, size);
    k.view_mut((0, 0), (n, n)).copy_from(&form.a);
    k.view_mut((0, n), (n, m))
        .copy_from(&(-constraint.b.transpose()));
    k.view_mut((n, 0), (m, n)).copy_from(&(-&constraint.b));
    let mut rhs = DVector::<f64>::zeros(size);
    rhs.rows_mut(n, m).copy_from(&(-&constraint.g));

    // Conditioning gate before committing to the solve. Catches rank-deficient
    // B (e.g. a zero row) and row-space/null-space degeneracies alike.
    let sv = k.singular_values();
    let sigma_max = sv.max();
    let sigma_min = sv.min();
    if !sigma_min.is_finite() || sigma_min <= cfg.eps_rank * sigma_max.max(1.0) {
        return Err(CoreError::SingularSystem { sigma_min });
    }

    let sol = k
        .lu()
        .solve(&rhs)
        .ok_or(CoreError::SingularSystem { sigma_min })?;
    let u_star: DVector<f64> = sol.rows(0, n).into_owned();
    let lambda_star: DVector<f64> = sol.rows(n, m).into_owned();
    let f_star = form.eval(&u_star);
    let grad_f = form.grad(&u_star);

    Ok(KktSolution {
        u_star,
        lambda_star,
        f_star,
        grad_f,
        grad_phi: constraint.b.clone(),
    })
}
