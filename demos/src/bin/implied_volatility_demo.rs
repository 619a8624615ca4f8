//! Implied volatility of AAPL options at a spot of 153.96.
//!
//! Solves each quote of a small call/put table independently and logs the
//! closed-form seed next to the refined estimate.
//!
//! # Run
//! ```bash
//! LOGLEVEL=debug cargo run --bin implied_volatility_demo
//! ```

use impliedvol_rs::prelude::*;
use tracing::info;

const SPOT: f64 = 153.96;
const RATE: f64 = -0.005;
const TIME_TO_EXPIRY: f64 = 37.0 / 252.0;

fn main() {
    setup_logger();
    info!("=== Implied Volatility Demo ===");

    let quotes = [
        (14.00, 140.0, OptionType::Call),
        (9.30, 145.0, OptionType::Call),
        (5.31, 150.0, OptionType::Call),
        (2.55, 155.0, OptionType::Call),
        (1.06, 160.0, OptionType::Call),
        (0.43, 165.0, OptionType::Call),
        (1.80, 150.0, OptionType::Put),
        (4.05, 155.0, OptionType::Put),
        (7.75, 160.0, OptionType::Put),
        (11.56, 165.0, OptionType::Put),
    ];

    for (price, strike, option_type) in quotes {
        let contract = OptionContract::new(price, SPOT, strike, RATE, TIME_TO_EXPIRY, option_type);
        info!("{:?} k={} price={}", option_type, strike, price);
        info!("  closed-form seed: {:.6}", closed_form_seed(&contract));

        match solve_implied_volatility(&contract) {
            Ok(estimate) => info!(
                "  implied volatility: {:.15} ({:?}, {} iterations)",
                estimate.sigma, estimate.method, estimate.iterations
            ),
            Err(e) => info!("  failed: {}", e),
        }
    }

    demo_fallback_policies();

    info!("=== Demo Complete ===");
}

/// A call quoted above the spot has no implied volatility; shows what each
/// policy does with it.
fn demo_fallback_policies() {
    info!("--- Fallback policies on an unreachable price ---");
    let contract = OptionContract::call(170.0, SPOT, 150.0, RATE, TIME_TO_EXPIRY);

    for policy in [
        FallbackPolicy::Surface,
        FallbackPolicy::LastResort,
        FallbackPolicy::ManualOnly,
    ] {
        let solver = ImpliedVolatilitySolver::new(SolverConfig::default().with_fallback(policy));
        match solver.solve(&contract) {
            Ok(estimate) => info!(
                "  {:?}: sigma={:.6} method={:?} converged={}",
                policy, estimate.sigma, estimate.method, estimate.converged
            ),
            Err(e) => info!("  {:?}: {}", policy, e),
        }
    }
}
