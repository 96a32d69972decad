use nalgebra::{dmatrix, dvector, vector};

use crate::cone::{Cone, Sign};
use crate::error::CoreError;
use crate::fixtures;
use crate::kkt::{solve_equality_qp, LinearConstraint, NumCfg, QuadraticForm};
use crate::line::{closed_form_t_star, reduce_along_direction, uniform_grid, FeasibleLine};

#[test]
fn kkt_lecture_fixture_matches_reference() {
    let fx = fixtures::equality_qp();
    let sol = solve_equality_qp(&fx.form, &fx.constraint, NumCfg::default()).unwrap();
    assert!((sol.u_star - &fx.u_star).norm() < 1e-12);
    assert!((sol.lambda_star - &fx.lambda_star).norm() < 1e-12);
    assert!((sol.f_star - fx.f_star).abs() < 1e-12);
    // grad_f = A u*, grad_phi = B verbatim.
    assert!((&sol.grad_f - fx.form.grad(&fx.u_star)).norm() < 1e-12);
    assert_eq!(sol.grad_phi, fx.constraint.b);
}

#[test]
fn kkt_feasibility_and_stationarity() {
    // 3D instance with two constraints, away from the fixtures.
    let form = QuadraticForm::new(dmatrix![
        4.0, 1.0, 0.0;
        1.0, 3.0, 0.5;
        0.0, 0.5, 2.0
    ]);
    let constraint = LinearConstraint::new(
        dmatrix![1.0, 0.0, -1.0; 0.0, 1.0, 1.0],
        dvector![1.0, -0.5],
    );
    let sol = solve_equality_qp(&form, &constraint, NumCfg::default()).unwrap();
    assert!(constraint.residual(&sol.u_star).amax() < 1e-10, "Bu* = g");
    let stat = form.grad(&sol.u_star) - constraint.b.transpose() * &sol.lambda_star;
    assert!(stat.amax() < 1e-10, "Au* = Bᵀλ*");
}

#[test]
fn kkt_is_bit_identical_across_calls() {
    let fx = fixtures::equality_qp();
    let a = solve_equality_qp(&fx.form, &fx.constraint, NumCfg::default()).unwrap();
    let b = solve_equality_qp(&fx.form, &fx.constraint, NumCfg::default()).unwrap();
    let bits = |v: &nalgebra::DVector<f64>| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&a.u_star), bits(&b.u_star));
    assert_eq!(bits(&a.lambda_star), bits(&b.lambda_star));
    assert_eq!(a.f_star.to_bits(), b.f_star.to_bits());
}

#[test]
fn kkt_rejects_zero_constraint_row() {
    let form = QuadraticForm::new(dmatrix![3.0, 1.0, 0.0; 1.0, 2.0, 0.0; 0.0, 0.0, 1.0]);
    let constraint = LinearConstraint::new(dmatrix![1.0, -1.0, 0.0; 0.0, 0.0, 0.0], dvector![0.5, 0.0]);
    match solve_equality_qp(&form, &constraint, NumCfg::default()) {
        Err(CoreError::SingularSystem { .. }) => {}
        other => panic!("expected SingularSystem, got {other:?}"),
    }
}

#[test]
fn kkt_rejects_non_pd_and_asymmetric_forms() {
    let constraint = LinearConstraint::new(dmatrix![1.0, -1.0], dvector![0.5]);
    // Indefinite.
    let indefinite = QuadraticForm::new(dmatrix![1.0, 0.0; 0.0, -1.0]);
    assert!(matches!(
        solve_equality_qp(&indefinite, &constraint, NumCfg::default()),
        Err(CoreError::NonPositiveDefinite)
    ));
    // Asymmetric.
    let asym = QuadraticForm::new(dmatrix![2.0, 1.0; 0.0, 2.0]);
    assert!(matches!(
        solve_equality_qp(&asym, &constraint, NumCfg::default()),
        Err(CoreError::NonPositiveDefinite)
    ));
}

#[test]
fn kkt_rejects_shape_mismatches() {
    let form = QuadraticForm::new(dmatrix![3.0, 1.0; 1.0, 2.0]);
    // B has the wrong column count.
    let wrong_cols = LinearConstraint::new(dmatrix![1.0, -1.0, 0.0], dvector![0.5]);
    assert!(matches!(
        solve_equality_qp(&form, &wrong_cols, NumCfg::default()),
        Err(CoreError::InvalidDimensions { .. })
    ));
    // m == n: the constraint pins u completely, outside this solver's scope.
    let square = LinearConstraint::new(dmatrix![1.0, 0.0; 0.0, 1.0], dvector![1.0, 1.0]);
    assert!(matches!(
        solve_equality_qp(&form, &square, NumCfg::default()),
        Err(CoreError::InvalidDimensions { .. })
    ));
    // Target length disagrees with the row count.
    let wrong_g = LinearConstraint::new(dmatrix![1.0, -1.0], dvector![0.5, 0.5]);
    assert!(matches!(
        solve_equality_qp(&form, &wrong_g, NumCfg::default()),
        Err(CoreError::InvalidDimensions { .. })
    ));
}

#[test]
fn reduction_scan_tracks_closed_form() {
    let fx = fixtures::reduction_line();
    let grid = uniform_grid(fx.t_min, fx.t_max, fx.samples);
    let scan = reduce_along_direction(&fx.form, &fx.line, &grid).unwrap();
    assert_eq!(scan.values.len(), fx.samples);
    assert_eq!(scan.t.len(), fx.samples);

    let exact = closed_form_t_star(&fx.form, &fx.line).unwrap();
    assert!((exact - fx.t_star).abs() < 1e-12);
    let step = (fx.t_max - fx.t_min) / (fx.samples - 1) as f64;
    assert!(
        (scan.t_star - exact).abs() <= step,
        "grid arg-min within one step of the exact minimizer"
    );
    // The scan's minimizer lands on the KKT minimizer of the same instance.
    let qp = fixtures::equality_qp();
    assert!((fx.line.point(exact) - qp.u_star).norm() < 1e-12);
}

#[test]
fn reduction_line_is_tangent_to_the_constraint() {
    let fx = fixtures::reduction_line();
    let qp = fixtures::equality_qp();
    assert!(fx.line.is_tangent_to(&qp.constraint, 1e-12));
    // A sideways direction is not.
    let off = FeasibleLine::new(fx.line.u0.clone(), dvector![1.0, 0.0]);
    assert!(!off.is_tangent_to(&qp.constraint, 1e-12));
}

#[test]
fn reduction_rejects_empty_grid_and_bad_shapes() {
    let fx = fixtures::reduction_line();
    assert!(matches!(
        reduce_along_direction(&fx.form, &fx.line, &[]),
        Err(CoreError::EmptySampleSet)
    ));
    let bad = FeasibleLine::new(dvector![0.0, 0.0, 0.0], dvector![1.0, 1.0, 0.0]);
    assert!(matches!(
        reduce_along_direction(&fx.form, &bad, &[0.0]),
        Err(CoreError::InvalidDimensions { .. })
    ));
}

#[test]
fn reduction_ties_keep_first_sample() {
    // Symmetric grid around t* = 0 for u0 = 0: f(-1) == f(1).
    let form = QuadraticForm::new(dmatrix![2.0, 0.0; 0.0, 2.0]);
    let line = FeasibleLine::new(dvector![0.0, 0.0], dvector![1.0, 1.0]);
    let scan = reduce_along_direction(&form, &line, &[-1.0, 1.0]).unwrap();
    assert_eq!(scan.k_star, 0);
}

#[test]
fn uniform_grid_endpoints_and_degenerate_counts() {
    let g = uniform_grid(-2.0, 2.0, 401);
    assert_eq!(g.len(), 401);
    assert!((g[0] + 2.0).abs() < 1e-15 && (g[400] - 2.0).abs() < 1e-15);
    assert!((g[200]).abs() < 1e-12);
    assert!(uniform_grid(0.0, 1.0, 0).is_empty());
    assert_eq!(uniform_grid(0.5, 1.0, 1), vec![0.5]);
}

#[test]
fn polar_of_single_constraint_is_opposite_ray() {
    let cone = Cone::from_normals(&[vector![0.7, 0.35]]).unwrap();
    match cone.polar() {
        Cone::Ray { dir } => {
            assert!((dir - vector![-0.7, -0.35]).norm() < 1e-15);
        }
        other => panic!("expected a ray, got {other:?}"),
    }
}

#[test]
fn quadrant_from_axis_normals_and_its_polar() {
    let cone = Cone::from_normals(&[vector![1.0, 0.0], vector![0.0, 1.0]]).unwrap();
    assert_eq!(
        cone,
        Cone::Quadrant {
            sx: Sign::NonNeg,
            sy: Sign::NonNeg
        }
    );
    assert_eq!(
        cone.polar(),
        Cone::Quadrant {
            sx: Sign::NonPos,
            sy: Sign::NonPos
        }
    );
    // Generator order does not matter.
    let swapped = Cone::from_normals(&[vector![0.0, 1.0], vector![1.0, 0.0]]).unwrap();
    assert_eq!(cone, swapped);
}

#[test]
fn ray_cone_polar_is_halfspace() {
    let cone = Cone::ray(vector![1.0, 0.0]).unwrap();
    assert_eq!(
        cone.polar(),
        Cone::Halfspace {
            normal: vector![-1.0, 0.0]
        }
    );
    // v1 <= 0 membership.
    assert!(cone.polar().contains_eps(vector![-3.0, 2.0], 1e-12));
    assert!(!cone.polar().contains_eps(vector![0.1, 0.0], 1e-12));
}

#[test]
fn polar_polar_returns_the_original_cone() {
    for fx in fixtures::cone_fixtures() {
        assert_eq!(fx.cone.polar(), fx.polar, "{}", fx.name);
        assert_eq!(fx.cone.polar().polar(), fx.cone, "{}", fx.name);
    }
}

#[test]
fn cone_membership_predicates() {
    let half = Cone::halfspace(vector![0.7, 0.35]).unwrap();
    assert!(half.contains_eps(vector![1.0, 0.0], 1e-12));
    assert!(half.contains_eps(vector![-1.0, 2.0], 1e-12)); // boundary point
    assert!(!half.contains_eps(vector![-1.0, 0.0], 1e-12));

    let ray = half.polar();
    assert!(ray.contains_eps(vector![-0.7, -0.35], 1e-12));
    assert!(ray.contains_eps(vector![-1.4, -0.7], 1e-12));
    assert!(!ray.contains_eps(vector![0.7, 0.35], 1e-12)); // wrong orientation
    assert!(!ray.contains_eps(vector![-0.7, 0.35], 1e-12)); // off the line
}

#[test]
fn cone_rejects_out_of_scope_generators() {
    assert!(matches!(
        Cone::from_normals(&[]),
        Err(CoreError::InvalidDimensions { .. })
    ));
    assert!(matches!(
        Cone::from_normals(&[vector![0.0, 0.0]]),
        Err(CoreError::InvalidDimensions { .. })
    ));
    // Two generators on the same axis.
    assert!(matches!(
        Cone::from_normals(&[vector![1.0, 0.0], vector![-1.0, 0.0]]),
        Err(CoreError::InvalidDimensions { .. })
    ));
    // Non-axis-aligned pair.
    assert!(matches!(
        Cone::from_normals(&[vector![1.0, 1.0], vector![0.0, 1.0]]),
        Err(CoreError::InvalidDimensions { .. })
    ));
    assert!(matches!(
        Cone::from_normals(&[vector![1.0, 0.0], vector![0.0, 1.0], vector![1.0, 1.0]]),
        Err(CoreError::InvalidDimensions { .. })
    ));
}
