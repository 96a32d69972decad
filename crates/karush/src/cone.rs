//! Tangent cones and polar cones for the inequality-constraint figures.
//!
//! Purpose
//! - Model the three canonical 2-D shapes the figures use — halfspace cone,
//!   ray cone, quadrant cone — and the polar of each in closed form.
//!
//! Why a tagged enum instead of one generic polar algorithm
//! - Each case has a distinct closed-form polar (ray ↔ halfspace, quadrant ↔
//!   opposite quadrant), and the polar of each variant lands back in the
//!   enum, so the duality law `(K°)° = K` holds *exactly* and is testable as
//!   plain equality. A generic cone-polar routine would buy nothing for
//!   three fixed low-dimensional shapes.

use nalgebra::Vector2;

use crate::error::CoreError;

/// Per-axis sign restriction of a quadrant cone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sign {
    NonNeg,
    NonPos,
}

impl Sign {
    #[inline]
    pub fn flip(self) -> Sign {
        match self {
            Sign::NonNeg => Sign::NonPos,
            Sign::NonPos => Sign::NonNeg,
        }
    }

    #[inline]
    fn admits(self, x: f64, eps: f64) -> bool {
        match self {
            Sign::NonNeg => x >= -eps,
            Sign::NonPos => x <= eps,
        }
    }
}

/// A canonical 2-D cone through the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cone {
    /// `{d : ⟨normal, d⟩ ≥ 0}` — one active linear constraint.
    Halfspace { normal: Vector2<f64> },
    /// `{t·dir : t ≥ 0}`.
    Ray { dir: Vector2<f64> },
    /// `{v : sx·v₁ ≥ 0, sy·v₂ ≥ 0}` — two axis-aligned constraints.
    Quadrant { sx: Sign, sy: Sign },
}

impl Cone {
    /// Halfspace cone of a single constraint gradient.
    pub fn halfspace(normal: Vector2<f64>) -> Result<Cone, CoreError> {
        check_nonzero(normal, "halfspace normal")?;
        Ok(Cone::Halfspace { normal })
    }

    /// Ray cone along `dir`.
    pub fn ray(dir: Vector2<f64>) -> Result<Cone, CoreError> {
        check_nonzero(dir, "ray direction")?;
        Ok(Cone::Ray { dir })
    }

    /// Tangent cone `{d : ⟨cᵢ, d⟩ ≥ 0 ∀i}` from one or two constraint
    /// gradients.
    ///
    /// One generator gives a halfspace cone. Two generators must be
    /// axis-aligned, one per axis (the quadrant configuration the figures
    /// use); anything else is out of this module's scope and rejected.
    pub fn from_normals(normals: &[Vector2<f64>]) -> Result<Cone, CoreError> {
        match normals {
            [c] => Cone::halfspace(*c),
            [c0, c1] => {
                check_nonzero(*c0, "first generator")?;
                check_nonzero(*c1, "second generator")?;
                let sx = axis_sign(*c0, 0).or_else(|| axis_sign(*c1, 0));
                let sy = axis_sign(*c0, 1).or_else(|| axis_sign(*c1, 1));
                match (sx, sy) {
                    (Some(sx), Some(sy)) => Ok(Cone::Quadrant { sx, sy }),
                    _ => Err(CoreError::dims(
                        "two generators must be axis-aligned, one per axis",
                    )),
                }
            }
            _ => Err(CoreError::dims(format!(
                "expected 1 or 2 cone generators, got {}",
                normals.len()
            ))),
        }
    }

    /// Polar cone `{v : ⟨v, d⟩ ≤ 0 ∀d ∈ K}`, in closed form per variant:
    /// halfspace ↦ opposite ray, ray ↦ opposite halfspace, quadrant ↦
    /// opposite quadrant. Applying `polar` twice returns the original cone.
    pub fn polar(&self) -> Cone {
        match *self {
            Cone::Halfspace { normal } => Cone::Ray { dir: -normal },
            Cone::Ray { dir } => Cone::Halfspace { normal: -dir },
            Cone::Quadrant { sx, sy } => Cone::Quadrant {
                sx: sx.flip(),
                sy: sy.flip(),
            },
        }
    }

    /// Eps-aware membership. `eps` is an absolute slack, suited to the O(1)
    /// magnitudes of the figure data.
    pub fn contains_eps(&self, v: Vector2<f64>, eps: f64) -> bool {
        match *self {
            Cone::Halfspace { normal } => normal.dot(&v) >= -eps,
            Cone::Ray { dir } => {
                // On the ray: collinear with dir and pointing the same way.
                let cross = dir.x * v.y - dir.y * v.x;
                cross.abs() <= eps && dir.dot(&v) >= -eps
            }
            Cone::Quadrant { sx, sy } => sx.admits(v.x, eps) && sy.admits(v.y, eps),
        }
    }
}

fn check_nonzero(v: Vector2<f64>, what: &str) -> Result<(), CoreError> {
    if !(v.x.is_finite() && v.y.is_finite()) || (v.x == 0.0 && v.y == 0.0) {
        return Err(CoreError::dims(format!("{what} must be finite and nonzero")));
    }
    Ok(())
}

/// Sign restriction induced on `axis` by an axis-aligned generator, `None`
/// if the generator does not lie on that axis.
fn axis_sign(c: Vector2<f64>, axis: usize) -> Option<Sign> {
    let (on, off) = if axis == 0 { (c.x, c.y) } else { (c.y, c.x) };
    if off != 0.0 || on == 0.0 {
        return None;
    }
    Some(if on > 0.0 { Sign::NonNeg } else { Sign::NonPos })
}
