//! Scalar reduction of the objective along a feasible line.
//!
//! Purpose
//! - Restrict `f(u) = 0.5 uᵀAu` to `u(t) = u0 + t d` and locate the
//!   minimizing parameter by dense grid search. The sampled curve *is* the
//!   figure, so the scan returns every value, not just the arg-min.
//!
//! Approximation, by construction
//! - `t_star` is the best grid sample, not the exact minimizer; the error is
//!   bounded by the grid step `range / (len - 1)`. Callers that need the
//!   exact value use [`closed_form_t_star`], which is also the test oracle
//!   for the grid bound.
//!
//! The direction's tangency (`Bd = 0`) is the caller's contract; this module
//! only evaluates the induced scalar function. [`FeasibleLine::is_tangent_to`]
//! is provided for callers that want to assert it.

use nalgebra::DVector;

use crate::error::CoreError;
use crate::kkt::{LinearConstraint, QuadraticForm};

/// Feasible base point plus a direction in the constraint's null space.
#[derive(Clone, Debug, PartialEq)]
pub struct FeasibleLine {
    pub u0: DVector<f64>,
    pub d: DVector<f64>,
}

impl FeasibleLine {
    pub fn new(u0: DVector<f64>, d: DVector<f64>) -> Self {
        Self { u0, d }
    }

    /// Point `u0 + t d`.
    #[inline]
    pub fn point(&self, t: f64) -> DVector<f64> {
        &self.u0 + &self.d * t
    }

    /// Checks `Bu0 = g` and `Bd = 0` within `eps` (for callers/tests; the
    /// reduction itself does not re-validate).
    pub fn is_tangent_to(&self, constraint: &LinearConstraint, eps: f64) -> bool {
        constraint.residual(&self.u0).amax() <= eps && (&constraint.b * &self.d).amax() <= eps
    }
}

/// Sampled restriction of the objective to a line, with the arg-min sample.
#[derive(Clone, Debug, PartialEq)]
pub struct LineScan {
    pub t: Vec<f64>,
    pub values: Vec<f64>,
    /// Index of the minimizing sample.
    pub k_star: usize,
    pub t_star: f64,
    pub f_star: f64,
}

/// Evaluate `f(u0 + t d)` over `t_samples` and pick the minimizing sample.
///
/// Ties keep the first (lowest-index) sample, so identical inputs give
/// identical output.
pub fn reduce_along_direction(
    form: &QuadraticForm,
    line: &FeasibleLine,
    t_samples: &[f64],
) -> Result<LineScan, CoreError> {
    if t_samples.is_empty() {
        return Err(CoreError::EmptySampleSet);
    }
    let n = form.dim();
    if line.u0.len() != n || line.d.len() != n {
        return Err(CoreError::dims(format!(
            "line has u0 len {} and d len {} but A is {n}x{n}",
            line.u0.len(),
            line.d.len()
        )));
    }

    let mut values = Vec::with_capacity(t_samples.len());
    let mut best: Option<(usize, f64)> = None;
    for (k, &t) in t_samples.iter().enumerate() {
        let val = form.eval(&line.point(t));
        if best.as_ref().is_none_or(|&(_, v)| val < v) {
            best = Some((k, val));
        }
        values.push(val);
    }
    // best is Some: t_samples is non-empty and the first value always wins
    // against None.
    let (k_star, f_star) = best.ok_or(CoreError::EmptySampleSet)?;

    Ok(LineScan {
        t: t_samples.to_vec(),
        values,
        k_star,
        t_star: t_samples[k_star],
        f_star,
    })
}

/// Exact minimizer of `t ↦ 0.5 (u0 + t d)ᵀ A (u0 + t d)`:
/// `t* = -(dᵀA u0) / (dᵀA d)`. `None` when the curvature `dᵀAd` is not
/// strictly positive (zero direction, or a form that is not PD along `d`).
pub fn closed_form_t_star(form: &QuadraticForm, line: &FeasibleLine) -> Option<f64> {
    if line.u0.len() != form.dim() || line.d.len() != form.dim() {
        return None;
    }
    let ad = &form.a * &line.d;
    let curvature = line.d.dot(&ad);
    if !curvature.is_finite() || curvature <= 0.0 {
        return None;
    }
    Some(-line.d.dot(&(&form.a * &line.u0)) / curvature)
}

/// `n` equally spaced samples covering `[t_min, t_max]` (endpoints included).
pub fn uniform_grid(t_min: f64, t_max: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![t_min],
        _ => {
            let step = (t_max - t_min) / (n - 1) as f64;
            (0..n).map(|k| t_min + step * k as f64).collect()
        }
    }
}
