//! Benchmarks for circuit construction
//!
//! Run with: cargo bench -p qsat-ir

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qsat_ir::{Circuit, QubitId};

/// Layer of three-qubit phase ladders followed by a mixer, repeated `rounds` times.
fn ladder_circuit(num_qubits: u32, rounds: usize) -> Circuit {
    let mut circuit = Circuit::with_size("bench", num_qubits);
    for q in 0..num_qubits {
        circuit.h(QubitId(q)).unwrap();
    }
    circuit.barrier_all().unwrap();
    for _ in 0..rounds {
        for i in 0..num_qubits.saturating_sub(2) {
            let (a, b, c) = (QubitId(i), QubitId(i + 1), QubitId(i + 2));
            circuit
                .cx(a, b)
                .unwrap()
                .cx(b, c)
                .unwrap()
                .rz(0.3, c)
                .unwrap()
                .cx(b, c)
                .unwrap()
                .cx(a, b)
                .unwrap();
        }
        for q in 0..num_qubits {
            circuit.rx(0.7, QubitId(q)).unwrap();
        }
    }
    circuit
}

/// Benchmark adding gates to a circuit
fn bench_gate_addition(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_addition");

    group.bench_function("h_gate", |b| {
        let mut circuit = Circuit::with_size("bench", 10);
        b.iter(|| {
            circuit.h(black_box(QubitId(0))).unwrap();
        });
    });

    group.bench_function("cx_gate", |b| {
        let mut circuit = Circuit::with_size("bench", 10);
        b.iter(|| {
            circuit
                .cx(black_box(QubitId(0)), black_box(QubitId(1)))
                .unwrap();
        });
    });

    group.finish();
}

/// Benchmark building full ansatz-shaped circuits
fn bench_ladder_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("ladder_build");

    for rounds in &[1usize, 4, 16] {
        group.bench_with_input(BenchmarkId::new("rounds", rounds), rounds, |b, &p| {
            b.iter(|| ladder_circuit(black_box(10), black_box(p)));
        });
    }

    group.finish();
}

/// Benchmark depth calculation
fn bench_depth(c: &mut Criterion) {
    let circuit = ladder_circuit(12, 8);
    c.bench_function("depth_12q_8r", |b| {
        b.iter(|| black_box(&circuit).depth());
    });
}

criterion_group!(benches, bench_gate_addition, bench_ladder_build, bench_depth);
criterion_main!(benches);
