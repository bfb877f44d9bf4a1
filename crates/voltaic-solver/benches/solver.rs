//! Benchmarks for the dense solvers and the transient engine.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use nalgebra::{DMatrix, DVector};

use voltaic_core::NodeId;
use voltaic_devices::{Capacitor, Circuit, Resistor, TranParams, VoltageSource};
use voltaic_solver::{run_tran, solve_dense};

fn bench_solve_dense(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_dense");
    for size in [10usize, 50, 100] {
        let a = DMatrix::from_fn(size, size, |i, j| {
            if i == j {
                size as f64 + 1.0
            } else {
                1.0 / ((i as f64 - j as f64).abs() + 1.0)
            }
        });
        let b = DVector::from_fn(size, |i, _| (i + 1) as f64);
        group.bench_function(format!("{size}x{size}"), |bench| {
            bench.iter(|| solve_dense(&a, &b).unwrap());
        });
    }
    group.finish();
}

fn rc_ladder(sections: usize) -> Circuit {
    let mut circuit = Circuit::new();
    let mut prev = circuit.nodes.get_or_create("in");
    circuit
        .vsources
        .push(VoltageSource::new("V1", prev, NodeId::GROUND, 5.0));
    for k in 0..sections {
        let next = circuit.nodes.get_or_create(&format!("n{k}"));
        circuit
            .resistors
            .push(Resistor::new(format!("R{k}"), prev, next, 1e3));
        circuit
            .capacitors
            .push(Capacitor::new(format!("C{k}"), next, NodeId::GROUND, 1e-9));
        prev = next;
    }
    circuit.tran = Some(TranParams {
        tstep: 1e-7,
        tstop: 1e-4,
    });
    circuit.finalize();
    circuit
}

fn bench_transient_rc_ladder(c: &mut Criterion) {
    let mut group = c.benchmark_group("transient");
    for sections in [4usize, 16] {
        let template = rc_ladder(sections);
        group.bench_function(format!("rc_ladder_{sections}"), |bench| {
            bench.iter_batched(
                || template.clone(),
                |mut circuit| run_tran(&mut circuit).unwrap(),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_solve_dense, bench_transient_rc_ladder);
criterion_main!(benches);
