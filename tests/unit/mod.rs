mod chain_tests;
mod pricing_tests;
mod solver_tests;
