//! Figure-data driver: evaluates the lecture fixture catalogue and writes
//! one JSON artifact per figure for the external renderer.
//!
//! The renderer consumes points/arrays and scalar annotations; everything
//! here is numbers, no pixels. A failing figure is logged and skipped so one
//! bad instance never kills the batch.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing_subscriber::fmt::SubscriberBuilder;

use karush::cone::{Cone, Sign};
use karush::fixtures;
use karush::kkt::{solve_equality_qp, NumCfg};
use karush::line::{closed_form_t_star, reduce_along_direction, uniform_grid};
use karush::prelude::{DMatrix, DVector};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Figure-data driver for the karush numeric core")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Evaluate every fixture and write one JSON artifact per figure
    Figures {
        #[arg(long)]
        out: String,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Figures { out } => {
            figures(Path::new(&out))?;
            Ok(())
        }
        Action::Report => report(),
    }
}

/// Write all figure artifacts under `out`; returns the written paths.
/// Per-figure failures are logged and skipped.
fn figures(out: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out)
        .with_context(|| format!("creating output dir {}", out.display()))?;

    let jobs: Vec<(&'static str, fn() -> Result<Value>)> = vec![
        ("equality_qp", equality_qp_artifact),
        ("reduction_line", reduction_line_artifact),
        ("tangent_cones", cone_artifacts),
    ];

    let mut written = Vec::new();
    for (name, job) in jobs {
        match job() {
            Ok(doc) => {
                let path = out.join(format!("{name}.json"));
                std::fs::write(&path, serde_json::to_vec_pretty(&doc)?)
                    .with_context(|| format!("writing {}", path.display()))?;
                tracing::info!(figure = name, path = %path.display(), "figure_written");
                written.push(path);
            }
            Err(err) => {
                tracing::warn!(figure = name, error = %err, "figure_failed");
            }
        }
    }

    // Provenance next to the artifacts.
    let rev = option_env!("GIT_COMMIT").unwrap_or("unknown");
    let provenance = json!({
        "code_rev": rev,
        "params": { "figures": written.len() },
        "outputs": written.iter().map(|p| p.to_string_lossy()).collect::<Vec<_>>()
    });
    std::fs::write(
        out.join("provenance.json"),
        serde_json::to_vec_pretty(&provenance)?,
    )?;

    Ok(written)
}

fn equality_qp_artifact() -> Result<Value> {
    let fx = fixtures::equality_qp();
    let sol = solve_equality_qp(&fx.form, &fx.constraint, NumCfg::default())?;
    Ok(json!({
        "figure": fx.name,
        "u_star": vecf(&sol.u_star),
        "lambda_star": vecf(&sol.lambda_star),
        "f_star": sol.f_star,
        "grad_f": vecf(&sol.grad_f),
        "grad_phi": rowsf(&sol.grad_phi),
    }))
}

fn reduction_line_artifact() -> Result<Value> {
    let fx = fixtures::reduction_line();
    let grid = uniform_grid(fx.t_min, fx.t_max, fx.samples);
    let scan = reduce_along_direction(&fx.form, &fx.line, &grid)?;
    Ok(json!({
        "figure": fx.name,
        "u0": vecf(&fx.line.u0),
        "d": vecf(&fx.line.d),
        "t": scan.t,
        "values": scan.values,
        "t_star": scan.t_star,
        "f_star": scan.f_star,
        "t_star_closed_form": closed_form_t_star(&fx.form, &fx.line),
    }))
}

fn cone_artifacts() -> Result<Value> {
    let entries: Vec<Value> = fixtures::cone_fixtures()
        .iter()
        .map(|fx| {
            json!({
                "name": fx.name,
                "cone": cone_json(fx.cone),
                "polar": cone_json(fx.cone.polar()),
            })
        })
        .collect();
    Ok(json!({ "figure": "tangent_cones", "cones": entries }))
}

fn cone_json(cone: Cone) -> Value {
    match cone {
        Cone::Halfspace { normal } => json!({
            "kind": "halfspace",
            "normal": [normal.x, normal.y],
        }),
        Cone::Ray { dir } => json!({
            "kind": "ray",
            "dir": [dir.x, dir.y],
        }),
        Cone::Quadrant { sx, sy } => json!({
            "kind": "quadrant",
            "signs": [sign_str(sx), sign_str(sy)],
        }),
    }
}

fn sign_str(s: Sign) -> &'static str {
    match s {
        Sign::NonNeg => ">=0",
        Sign::NonPos => "<=0",
    }
}

fn vecf(v: &DVector<f64>) -> Vec<f64> {
    v.iter().copied().collect()
}

fn rowsf(m: &DMatrix<f64>) -> Vec<Vec<f64>> {
    (0..m.nrows())
        .map(|i| m.row(i).iter().copied().collect())
        .collect()
}

fn report() -> Result<()> {
    let rev = option_env!("GIT_COMMIT").unwrap_or("unknown");
    let obj = json!({
        "code_rev": rev,
        "version": karush::VERSION,
        "figures": ["equality_qp", "reduction_line", "tangent_cones"],
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
