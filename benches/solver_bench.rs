//! Benchmarks for the frame solver

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use frame_solver::prelude::*;

/// Space frame: `stories` levels over a `bays` x `bays` grid, fixed at the base
fn create_space_frame(stories: usize, bays: usize) -> Model {
    let mut model = Model::new();

    model.add_material("Steel", Material::steel()).unwrap();
    model
        .add_section("Column", Shape::R { h: 0.3, b: 0.3, t: 0.012, r: 0.024 })
        .unwrap();
    model
        .add_section("Beam", Shape::I { h: 0.45, b: 0.19, tw: 0.0094, tf: 0.0146 })
        .unwrap();

    let story_height = 3.5;
    let bay_width = 6.0;
    let name = |level: usize, i: usize, j: usize| format!("N{}_{}_{}", level, i, j);

    for level in 0..=stories {
        for i in 0..=bays {
            for j in 0..=bays {
                let node = Node::new(
                    i as f64 * bay_width,
                    j as f64 * bay_width,
                    level as f64 * story_height,
                );
                model.add_node(&name(level, i, j), node).unwrap();
            }
        }
    }

    for level in 0..stories {
        for i in 0..=bays {
            for j in 0..=bays {
                let (lower, upper) = (name(level, i, j), name(level + 1, i, j));
                let member = Member::frame(&lower, &upper, "Column", "Steel");
                model.add_member(&format!("C{}_{}_{}", level, i, j), member).unwrap();
            }
        }
    }

    for level in 1..=stories {
        for i in 0..=bays {
            for j in 0..=bays {
                if i < bays {
                    let next = name(level, i + 1, j);
                    let member = Member::frame(&name(level, i, j), &next, "Beam", "Steel");
                    model.add_member(&format!("BX{}_{}_{}", level, i, j), member).unwrap();
                }
                if j < bays {
                    let next = name(level, i, j + 1);
                    let member = Member::frame(&name(level, i, j), &next, "Beam", "Steel")
                        .with_theta(std::f64::consts::FRAC_PI_2);
                    model.add_member(&format!("BY{}_{}_{}", level, i, j), member).unwrap();
                }
                let load = NodeLoad::force(&name(level, i, j), 5e3, 0.0, -50e3);
                model.add_node_load(&format!("L{}_{}_{}", level, i, j), load).unwrap();
            }
        }
    }

    for i in 0..=bays {
        for j in 0..=bays {
            let node = name(0, i, j);
            model.add_boundary(&node, Boundary::fixed(&node)).unwrap();
        }
    }

    model
}

fn benchmark_small_frame(c: &mut Criterion) {
    let model = create_space_frame(3, 2);
    c.bench_function("frame_3story_2x2bay", |b| {
        b.iter(|| black_box(frame_solver::solve(black_box(&model)).unwrap()))
    });
}

fn benchmark_solvers(c: &mut Criterion) {
    let model = create_space_frame(8, 3);
    let mut group = c.benchmark_group("frame_8story_3x3bay");
    for solver in [SolverKind::Cholesky, SolverKind::Lu, SolverKind::Skyline] {
        let options = SolveOptions::default().with_solver(solver);
        let id = BenchmarkId::from_parameter(format!("{:?}", solver));
        group.bench_with_input(id, &options, |b, options| {
            b.iter(|| black_box(frame_solver::solve_with(&model, options).unwrap()))
        });
    }
    group.finish();
}

fn benchmark_assembly(c: &mut Criterion) {
    let model = create_space_frame(10, 4);
    let dof_map = DofMap::build(&model).unwrap();
    let mut group = c.benchmark_group("assembly_10story_4x4bay");
    for (label, options) in [
        ("parallel", SolveOptions::default()),
        ("sequential", SolveOptions::default().sequential()),
    ] {
        group.bench_function(label, |b| {
            b.iter(|| {
                black_box(frame_solver::assembly::assemble(&model, &dof_map, &options).unwrap())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_small_frame, benchmark_solvers, benchmark_assembly);
criterion_main!(benches);
