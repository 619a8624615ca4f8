//! Implied volatility estimation for European options.
//!
//! This module inverts the Black-Scholes model: given an observed option
//! price, it finds the volatility that reproduces it.
//!
//! # Solver chain
//!
//! 1. A closed-form seed, `σ₀ = √(2π/T) · price / S`, accurate near the money.
//! 2. Brent's method on the bracket `[-5, 5]`. Preferred because it needs no
//!    derivative and cannot diverge once a sign change is found.
//! 3. Newton-Raphson with analytic vega, started from the seed, when no sign
//!    change exists on the bracket.
//! 4. Optionally, a manual damped Newton loop that always returns a positive
//!    sigma (see [`FallbackPolicy`]).
//!
//! The result is tagged with the [`SolveMethod`] that produced it.
//!
//! # Example
//!
//! ```
//! use impliedvol_rs::volatility::{OptionContract, solve_implied_volatility};
//!
//! let contract = OptionContract::put(1.80, 153.96, 150.0, -0.005, 37.0 / 252.0);
//! let estimate = solve_implied_volatility(&contract).unwrap();
//! println!("IV: {:.2}% via {:?}", estimate.sigma_percent(), estimate.method);
//! ```

mod black_scholes;
mod chain;
mod error;
mod solver;
mod types;

pub use black_scholes::BlackScholes;
pub use chain::{ChainEntry, ChainEstimates, OptionChain, SmilePoint, VolatilitySmile};
pub use error::{FailureReason, VolatilityError};
pub use solver::{
    FallbackPolicy, ImpliedVolatilitySolver, SolverConfig, closed_form_estimate, closed_form_seed,
    solve_bracketed, solve_damped_newton, solve_implied_volatility, solve_newton,
};
pub use types::{OptionContract, OptionType, SolveMethod, VolatilityEstimate};
