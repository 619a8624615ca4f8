//! # impliedvol-rs
//!
//! Implied volatility estimation for European options under the
//! Black-Scholes model.
//!
//! The observed price of an option and the volatility that the pricing model
//! needs to reproduce it are the same information in different units. This
//! crate converts one into the other:
//!
//! - [`BlackScholes`]: closed-form call/put prices, `d1`/`d2` and vega.
//! - [`ImpliedVolatilitySolver`]: a closed-form seed refined by Brent's
//!   method, with a Newton-Raphson fallback and an optional last-resort
//!   damped Newton loop.
//! - [`OptionChain`]: solves a set of quotes sharing one expiry and extracts
//!   the volatility smile, isolating failures per quote.
//!
//! Every solve is a pure computation over one [`OptionContract`]; contracts
//! can be solved in any order or in parallel with no coordination.
//!
//! ## Example
//!
//! ```
//! use impliedvol_rs::prelude::*;
//!
//! let contract = OptionContract::call(5.31, 153.96, 150.0, -0.005, 37.0 / 252.0);
//! let estimate = solve_implied_volatility(&contract)?;
//!
//! assert!(estimate.converged);
//! assert!((estimate.sigma - 0.1291).abs() < 1e-3);
//! # Ok::<(), VolatilityError>(())
//! ```
//!
//! ## Logging
//!
//! The library emits `tracing` events (per-iteration detail at `trace`, phase
//! changes at `debug`, absorbed failures at `warn`) and never installs a
//! subscriber itself. Binaries can call [`utils::setup_logger`], which honours
//! the `LOGLEVEL` environment variable.

pub mod utils;
pub mod volatility;

pub use volatility::{
    BlackScholes, ChainEntry, ChainEstimates, FailureReason, FallbackPolicy,
    ImpliedVolatilitySolver, OptionChain, OptionContract, OptionType, SmilePoint, SolveMethod,
    SolverConfig, VolatilityError, VolatilityEstimate, VolatilitySmile, solve_implied_volatility,
};

/// Commonly used types, for glob import.
pub mod prelude {
    pub use crate::utils::setup_logger;
    pub use crate::volatility::{
        BlackScholes, ChainEstimates, FallbackPolicy, ImpliedVolatilitySolver, OptionChain,
        OptionContract, OptionType, SmilePoint, SolveMethod, SolverConfig, VolatilityError,
        VolatilityEstimate, VolatilitySmile, closed_form_seed, solve_bracketed,
        solve_damped_newton, solve_implied_volatility, solve_newton,
    };
}
