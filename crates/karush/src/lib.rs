//! Numeric core behind the constrained-quadratic lecture figures.
//!
//! Purpose
//! - Compute the numbers the figure renderer draws: KKT solutions of small
//!   equality-constrained quadratic programs (`kkt`), the scalar reduction of
//!   the objective along a feasible line (`line`), and tangent/polar cones
//!   for the canonical inequality-constraint pictures (`cone`).
//! - Everything is a pure function of fixed numeric inputs; rendering, image
//!   output, and figure sequencing live in external callers.
//!
//! Why this split
//! - The three modules are independent leaves: no module calls another, and
//!   each returns plain value objects a renderer can map to pixels.
//! - Hard-coded per-figure instances live in `fixtures` as named records
//!   paired with their expected closed-form answers, so regression tests and
//!   the driver share one catalogue.

pub mod cone;
pub mod error;
pub mod fixtures;
pub mod kkt;
pub mod line;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cone::{Cone, Sign};
    pub use crate::error::CoreError;
    pub use crate::kkt::{solve_equality_qp, KktSolution, LinearConstraint, NumCfg, QuadraticForm};
    pub use crate::line::{
        closed_form_t_star, reduce_along_direction, uniform_grid, FeasibleLine, LineScan,
    };
    pub use nalgebra::{DMatrix, DVector, Vector2 as Vec2};
}

#[cfg(test)]
mod tests;
