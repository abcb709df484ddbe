//! Linear static solve: validate, number DOFs, assemble, factor, map back

use std::sync::atomic::{AtomicBool, Ordering};

use super::SolveOptions;
use crate::assembly::assemble;
use crate::dof::DofMap;
use crate::error::{FrameError, FrameResult};
use crate::math::{solve_system, SolveFailure};
use crate::model::Model;
use crate::results::SolveResult;

/// Solve `model` for the displacements of its active DOFs
///
/// The model is only read. Any reference, geometry or conditioning problem
/// aborts the solve without a partial result.
pub fn solve_with(model: &Model, options: &SolveOptions) -> FrameResult<SolveResult> {
    solve_cancellable(model, options, &AtomicBool::new(false))
}

/// [`solve_with`] that gives up once `cancel` is set
///
/// The flag is checked between stages, so a factorization already under
/// way runs to completion before the solve returns [`FrameError::Cancelled`].
pub fn solve_cancellable(
    model: &Model,
    options: &SolveOptions,
    cancel: &AtomicBool,
) -> FrameResult<SolveResult> {
    let checkpoint = |stage: &'static str| {
        if cancel.load(Ordering::Relaxed) {
            log::debug!("solve cancelled before {}", stage);
            Err(FrameError::Cancelled)
        } else {
            Ok(())
        }
    };

    model.validate()?;
    let dof_map = DofMap::build(model)?;

    if dof_map.is_empty() {
        log::warn!("model has no active DOFs; nothing to solve");
        return Ok(SolveResult::from_solution(
            &[],
            std::iter::empty(),
            model.nodes.len(),
            model.members.len(),
        ));
    }

    checkpoint("assembly")?;
    let system = assemble(model, &dof_map, options)?;
    checkpoint("factorization")?;
    let solution = solve_system(&system, options).map_err(|failure| match failure {
        SolveFailure::Singular { equation } => FrameError::SingularMatrix {
            dof: dof_map.label(equation),
        },
        SolveFailure::IllConditioned { equation, ratio } => FrameError::IllConditioned {
            dof: dof_map.label(equation),
            ratio,
        },
    })?;

    let result = SolveResult::from_solution(
        dof_map.dofs(),
        solution.iter(),
        model.nodes.len(),
        model.members.len(),
    );
    log::info!(
        "solved {} active DOFs over {} nodes and {} members",
        dof_map.len(),
        model.nodes.len(),
        model.members.len()
    );
    Ok(result)
}
