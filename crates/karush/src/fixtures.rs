//! Named lecture instances with their expected closed-form answers.
//!
//! Purpose
//! - Replace per-figure literals scattered through rendering code with one
//!   catalogue of records, each pairing the mathematical instance with the
//!   reference answer a direct linear-algebra computation gives. Regression
//!   tests and the figure driver both read from here.
//!
//! Reference values
//! - For the equality QP `A=[[3,1],[1,2]]`, `B=[1,-1]`, `g=[1/2]` the KKT
//!   system gives exactly `u* = (3/14, -2/7)`, `λ* = 5/14`,
//!   `f* = 5/56`. The reduction fixture walks the same feasible line and its
//!   exact minimizing parameter is `t* = -2/7`, landing on the same `u*`.

use nalgebra::{dmatrix, dvector, vector, DVector};

use crate::cone::{Cone, Sign};
use crate::kkt::{LinearConstraint, QuadraticForm};
use crate::line::FeasibleLine;

/// Equality-constrained QP instance plus its reference solution.
#[derive(Clone, Debug)]
pub struct QpFixture {
    pub name: &'static str,
    pub form: QuadraticForm,
    pub constraint: LinearConstraint,
    pub u_star: DVector<f64>,
    pub lambda_star: DVector<f64>,
    pub f_star: f64,
}

/// Feasible-line instance for the scalar reduction figure.
#[derive(Clone, Debug)]
pub struct LineFixture {
    pub name: &'static str,
    pub form: QuadraticForm,
    pub line: FeasibleLine,
    pub t_min: f64,
    pub t_max: f64,
    pub samples: usize,
    /// Exact minimizing parameter (oracle for the grid scan).
    pub t_star: f64,
}

/// Cone instance plus its expected polar.
#[derive(Clone, Copy, Debug)]
pub struct ConeFixture {
    pub name: &'static str,
    pub cone: Cone,
    pub polar: Cone,
}

/// The equality-constraint figure: minimize `0.5 uᵀAu` on the line
/// `u₁ - u₂ = 1/2`.
pub fn equality_qp() -> QpFixture {
    QpFixture {
        name: "equality_qp",
        form: QuadraticForm::new(dmatrix![3.0, 1.0; 1.0, 2.0]),
        constraint: LinearConstraint::new(dmatrix![1.0, -1.0], dvector![0.5]),
        u_star: dvector![3.0 / 14.0, -2.0 / 7.0],
        lambda_star: dvector![5.0 / 14.0],
        f_star: 5.0 / 56.0,
    }
}

/// The scalar-reduction figure: same instance as [`equality_qp`], restricted
/// to the feasible line through `u0 = (1/2, 0)` along `d = (1, 1)` (which
/// spans the null space of `B`). Grid matches the rendered curve: 401 samples
/// on `[-2, 2]`.
pub fn reduction_line() -> LineFixture {
    let qp = equality_qp();
    LineFixture {
        name: "reduction_line",
        form: qp.form,
        line: FeasibleLine::new(dvector![0.5, 0.0], dvector![1.0, 1.0]),
        t_min: -2.0,
        t_max: 2.0,
        samples: 401,
        t_star: -2.0 / 7.0,
    }
}

/// Single active constraint with gradient `c = (0.7, 0.35)`: tangent cone is
/// the halfspace `⟨c, d⟩ ≥ 0`, polar is the ray along `-c`.
pub fn single_constraint_cone() -> ConeFixture {
    let c = vector![0.7, 0.35];
    ConeFixture {
        name: "single_constraint_cone",
        cone: Cone::Halfspace { normal: c },
        polar: Cone::Ray { dir: -c },
    }
}

/// Two axis constraints `d₁ ≥ 0, d₂ ≥ 0`: tangent cone is the nonnegative
/// quadrant, polar the nonpositive one.
pub fn quadrant_cone() -> ConeFixture {
    ConeFixture {
        name: "quadrant_cone",
        cone: Cone::Quadrant {
            sx: Sign::NonNeg,
            sy: Sign::NonNeg,
        },
        polar: Cone::Quadrant {
            sx: Sign::NonPos,
            sy: Sign::NonPos,
        },
    }
}

/// Ray cone along `e₁`: polar is the halfspace `v₁ ≤ 0`.
pub fn ray_cone() -> ConeFixture {
    ConeFixture {
        name: "ray_cone",
        cone: Cone::Ray {
            dir: vector![1.0, 0.0],
        },
        polar: Cone::Halfspace {
            normal: vector![-1.0, 0.0],
        },
    }
}

/// All cone fixtures, in figure order.
pub fn cone_fixtures() -> [ConeFixture; 3] {
    [single_constraint_cone(), quadrant_cone(), ray_cone()]
}