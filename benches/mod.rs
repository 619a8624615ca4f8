use criterion::{criterion_group, criterion_main};


criterion_group!(
    benches,
    solver_benchmarks::register_pricing_benchmarks,
    solver_benchmarks::register_solver_benchmarks,
    solver_benchmarks::register_chain_benchmarks,
);
criterion_main!(benches);
