//! Command-line solver: reads a JSON model, prints JSON displacements
//!
//! Usage: frame-solve [--axial] [--shear] [--solver cholesky|lu|skyline] [--summary] <model.json|->

use std::io::Read;

use anyhow::{bail, Context};

use frame_solver::prelude::*;

const USAGE: &str =
    "usage: frame-solve [--axial] [--shear] [--solver cholesky|lu|skyline] [--summary] <model.json|->";

struct Args {
    input: String,
    options: SolveOptions,
    summary: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut options = SolveOptions::default();
    let mut summary = false;
    let mut input = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--axial" => options.fidelity = Fidelity::Axial,
            "--shear" => options.shear_deformation = true,
            "--summary" => summary = true,
            "--sequential" => options.parallel = false,
            "--solver" => {
                let name = args.next().context("--solver needs a value")?;
                options.solver = match name.as_str() {
                    "cholesky" => SolverKind::Cholesky,
                    "lu" => SolverKind::Lu,
                    "skyline" => SolverKind::Skyline,
                    other => bail!("unknown solver '{}'", other),
                };
            }
            flag if flag.starts_with("--") => bail!("unknown option '{}'", flag),
            path => {
                if input.replace(path.to_string()).is_some() {
                    bail!("only one model file may be given");
                }
            }
        }
    }

    Ok(Args {
        input: input.context(USAGE)?,
        options,
        summary,
    })
}

fn read_model(input: &str) -> anyhow::Result<Model> {
    let json = if input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read model from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input))?
    };
    Model::from_json(&json).with_context(|| format!("failed to parse model {}", input))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = parse_args()?;
    let model = read_model(&args.input)?;
    let result = frame_solver::solve_with(&model, &args.options).context("solve failed")?;

    let output = if args.summary {
        let summary = result.summary();
        serde_json::to_string_pretty(&serde_json::json!({
            "displacements": &result.displacements,
            "summary": summary,
        }))?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{}", output);
    Ok(())
}
