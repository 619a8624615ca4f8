//! Volatility smile of an option chain, printed as JSON.
//!
//! The JSON output (`{"calls": [{"strike": .., "sigma": ..}], "puts": [..]}`)
//! is what a chart renderer would consume.
//!
//! # Run
//! ```bash
//! cargo run --bin volatility_smile
//! ```

use impliedvol_rs::prelude::*;
use serde::Serialize;
use tracing::{error, info};

#[derive(Serialize)]
struct SmileReport<'a> {
    underlying: &'a str,
    spot: f64,
    time_to_expiry: f64,
    failures: usize,
    smile: VolatilitySmile,
}

fn main() {
    setup_logger();

    let chain = OptionChain::new(153.96, 0.0, 37.0 / 252.0)
        .with_call(140.0, 14.00)
        .with_call(145.0, 9.30)
        .with_call(150.0, 5.31)
        .with_call(155.0, 2.55)
        .with_call(160.0, 1.06)
        .with_call(165.0, 0.43)
        .with_put(150.0, 1.80)
        .with_put(155.0, 4.05)
        .with_put(160.0, 7.75)
        .with_put(165.0, 11.56);

    let estimates = chain.solve(&ImpliedVolatilitySolver::default());
    info!(
        "solved {} quotes, {} failures",
        chain.len(),
        estimates.failures()
    );

    let report = SmileReport {
        underlying: "AAPL",
        spot: chain.spot,
        time_to_expiry: chain.time_to_expiry,
        failures: estimates.failures(),
        smile: estimates.volatility_smile(),
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => error!("failed to serialize smile: {}", e),
    }
}
