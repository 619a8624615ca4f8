//! Root-finding layer for implied volatility.
//!
//! Each phase is a free function over the same residual,
//! `price(σ) - observed_price`:
//!
//! 1. [`closed_form_seed`]: at-the-money approximation, always computed.
//! 2. [`solve_bracketed`]: Brent's method on a fixed bracket.
//! 3. [`solve_newton`]: Newton iteration with analytic vega from the seed.
//! 4. [`solve_damped_newton`]: manual Newton loop that never fails numerically.
//!
//! [`ImpliedVolatilitySolver`] chains them according to its
//! [`FallbackPolicy`].

use super::black_scholes::BlackScholes;
use super::error::{FailureReason, VolatilityError};
use super::types::{OptionContract, SolveMethod, VolatilityEstimate};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, trace, warn};

/// What the solver does once both refinement phases have failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallbackPolicy {
    /// Report the Newton phase failure to the caller.
    #[default]
    Surface,
    /// Run the damped Newton loop from the closed-form seed and return
    /// whatever it settles on, flagged `converged = false` if it stopped early.
    LastResort,
    /// Skip the bracketed and Newton phases and only run the damped loop.
    ManualOnly,
}

/// Configuration for the implied volatility solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum iterations for each iterative phase.
    pub max_iterations: u32,
    /// Absolute tolerance on sigma (bracket width, Newton step) and on the
    /// price residual.
    pub tolerance: f64,
    /// Volatility interval searched by the bracketed phase.
    pub bracket: (f64, f64),
    /// Vega below which a Newton step is not trusted.
    pub min_vega: f64,
    /// Behaviour after both refinement phases fail.
    pub fallback: FallbackPolicy,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-8,
            bracket: (-5.0, 5.0),
            min_vega: 1e-4,
            fallback: FallbackPolicy::Surface,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the bracket searched by Brent's method.
    #[must_use]
    pub fn with_bracket(mut self, lower: f64, upper: f64) -> Self {
        self.bracket = (lower, upper);
        self
    }

    /// Sets the vega floor for Newton steps.
    #[must_use]
    pub fn with_min_vega(mut self, min_vega: f64) -> Self {
        self.min_vega = min_vega;
        self
    }

    /// Sets the fallback policy.
    #[must_use]
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }
}

fn residual(contract: &OptionContract, sigma: f64) -> f64 {
    BlackScholes::price(contract, sigma) - contract.observed_price
}

fn validate_seed(seed: f64) -> Result<(), VolatilityError> {
    if !seed.is_finite() || seed <= 0.0 {
        return Err(VolatilityError::InvalidContract {
            message: format!("initial volatility must be positive and finite, got {seed}"),
        });
    }
    Ok(())
}

/// Closed-form implied volatility approximation.
///
/// σ₀ = √(2π / T) · price / S
///
/// Only accurate near the money; used as the starting point for the Newton
/// phases. Assumes a validated contract, for which the result is positive.
#[must_use]
pub fn closed_form_seed(contract: &OptionContract) -> f64 {
    (2.0 * PI / contract.time_to_expiry).sqrt() * contract.observed_price / contract.spot
}

/// Wraps [`closed_form_seed`] as an unrefined estimate.
pub fn closed_form_estimate(
    contract: &OptionContract,
) -> Result<VolatilityEstimate, VolatilityError> {
    contract.validate()?;
    Ok(VolatilityEstimate::new(
        closed_form_seed(contract),
        SolveMethod::ClosedForm,
        false,
        0,
    ))
}

/// Brent's method: bisection combined with secant and inverse quadratic
/// interpolation steps.
///
/// Returns the root and the number of iterations used. `tolerance` bounds the
/// final bracket width.
fn brent<F>(
    f: F,
    lower: f64,
    upper: f64,
    tolerance: f64,
    max_iterations: u32,
) -> Result<(f64, u32), VolatilityError>
where
    F: Fn(f64) -> f64,
{
    let mut a = lower;
    let mut b = upper;
    let mut fa = f(a);
    let mut fb = f(b);

    let same_sign = fa.signum() == fb.signum() && fa != 0.0 && fb != 0.0;
    if !fa.is_finite() || !fb.is_finite() || same_sign {
        return Err(VolatilityError::BracketingFailure {
            lower,
            upper,
            residual_lower: fa,
            residual_upper: fb,
        });
    }
    if fa == 0.0 {
        return Ok((a, 0));
    }
    if fb == 0.0 {
        return Ok((b, 0));
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for iteration in 1..=max_iterations {
        // Keep the root between b and c.
        if (fb > 0.0 && fc > 0.0) || (fb < 0.0 && fc < 0.0) {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }

        // b is always the best estimate so far.
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * tolerance;
        let m = 0.5 * (c - b);

        if m.abs() <= tol || fb == 0.0 {
            return Ok((b, iteration));
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                // Secant
                (2.0 * m * s, 1.0 - s)
            } else {
                // Inverse quadratic interpolation
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * m * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();

            let min1 = 3.0 * m * q - (tol * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = m;
                e = d;
            }
        } else {
            d = m;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(m) };
        fb = f(b);
        trace!("brent iteration {}: sigma={:.10}, residual={:.3e}", iteration, b, fb);
    }

    Err(VolatilityError::SolverFailure {
        method: SolveMethod::Bracketed,
        iterations: max_iterations,
        last_sigma: b,
        reason: FailureReason::MaxIterations,
    })
}

/// Solves for implied volatility with Brent's method on `config.bracket`.
///
/// The bracket may extend below zero; there the residual uses the
/// zero-volatility price, so the pricing formulas only ever see a positive
/// sigma and the residual stays monotone over the whole interval.
///
/// # Errors
/// - `BracketingFailure` if the residual does not change sign on the bracket
///   (observed price outside the range the model can reach), or if the only
///   root is not a positive volatility.
/// - `SolverFailure` if Brent's method exhausts `max_iterations`.
pub fn solve_bracketed(
    contract: &OptionContract,
    config: &SolverConfig,
) -> Result<VolatilityEstimate, VolatilityError> {
    contract.validate()?;

    let (lower, upper) = config.bracket;
    let f = |sigma: f64| residual(contract, sigma);
    let (sigma, iterations) = brent(&f, lower, upper, config.tolerance, config.max_iterations)?;

    if sigma <= 0.0 {
        return Err(VolatilityError::BracketingFailure {
            lower,
            upper,
            residual_lower: f(lower),
            residual_upper: f(upper),
        });
    }

    debug!(
        "bracketed solve converged: sigma={:.8} after {} iterations",
        sigma, iterations
    );
    Ok(VolatilityEstimate::new(
        sigma,
        SolveMethod::Bracketed,
        true,
        iterations,
    ))
}

/// Solves for implied volatility using Newton-Raphson from `seed`.
///
/// σ_{n+1} = σ_n - (BS(σ_n) - price) / vega(σ_n)
///
/// A step that would leave sigma non-positive halves sigma instead.
///
/// # Errors
/// `SolverFailure` on a vega below `config.min_vega`, a non-finite iterate,
/// or when `max_iterations` is exhausted.
pub fn solve_newton(
    contract: &OptionContract,
    seed: f64,
    config: &SolverConfig,
) -> Result<VolatilityEstimate, VolatilityError> {
    contract.validate()?;
    validate_seed(seed)?;

    let failure = |iterations: u32, last_sigma: f64, reason: FailureReason| {
        VolatilityError::SolverFailure {
            method: SolveMethod::NewtonRaphson,
            iterations,
            last_sigma,
            reason,
        }
    };

    let mut sigma = seed;
    for iteration in 0..config.max_iterations {
        let diff = residual(contract, sigma);
        if !diff.is_finite() {
            return Err(failure(iteration, sigma, FailureReason::NonFinite));
        }
        if diff.abs() < config.tolerance {
            return Ok(VolatilityEstimate::new(
                sigma,
                SolveMethod::NewtonRaphson,
                true,
                iteration,
            ));
        }

        let vega = BlackScholes::vega(contract, sigma);
        if vega.abs() < config.min_vega {
            return Err(failure(
                iteration,
                sigma,
                FailureReason::DegenerateVega { vega },
            ));
        }

        let step = diff / vega;
        let next = sigma - step;
        sigma = if next > 0.0 { next } else { sigma / 2.0 };
        trace!("newton iteration {}: sigma={:.10}, step={:.3e}", iteration, sigma, step);

        if !sigma.is_finite() {
            return Err(failure(iteration + 1, sigma, FailureReason::NonFinite));
        }
        if step.abs() < config.tolerance {
            return Ok(VolatilityEstimate::new(
                sigma,
                SolveMethod::NewtonRaphson,
                true,
                iteration + 1,
            ));
        }
    }

    Err(failure(
        config.max_iterations,
        sigma,
        FailureReason::MaxIterations,
    ))
}

/// Manual Newton loop used as a last resort.
///
/// Stops early, keeping the current sigma and `converged = false`, when vega
/// drops below `config.min_vega` or when a step would make sigma
/// non-positive. Numerical trouble never turns into an error; only an invalid
/// contract or seed does.
pub fn solve_damped_newton(
    contract: &OptionContract,
    seed: f64,
    config: &SolverConfig,
) -> Result<VolatilityEstimate, VolatilityError> {
    contract.validate()?;
    validate_seed(seed)?;

    let mut sigma = seed;
    for iteration in 0..config.max_iterations {
        let vega = BlackScholes::vega(contract, sigma);
        if vega.abs() < config.min_vega {
            debug!(
                "damped newton stopped: vega {:.3e} below floor at sigma={:.8}",
                vega, sigma
            );
            return Ok(VolatilityEstimate::new(
                sigma,
                SolveMethod::IterativeFallback,
                false,
                iteration,
            ));
        }

        let delta = residual(contract, sigma) / vega;
        let next = sigma - delta;
        if next.is_nan() || next <= 0.0 {
            debug!(
                "damped newton stopped: step {:.3e} would leave sigma={:.8} non-positive",
                delta, sigma
            );
            return Ok(VolatilityEstimate::new(
                sigma,
                SolveMethod::IterativeFallback,
                false,
                iteration,
            ));
        }

        sigma = next;
        trace!("damped newton iteration {}: sigma={:.10}", iteration, sigma);

        if delta.abs() < config.tolerance {
            return Ok(VolatilityEstimate::new(
                sigma,
                SolveMethod::IterativeFallback,
                true,
                iteration + 1,
            ));
        }
    }

    Ok(VolatilityEstimate::new(
        sigma,
        SolveMethod::IterativeFallback,
        false,
        config.max_iterations,
    ))
}

/// Implied volatility solver chaining the phases under one configuration.
///
/// Holds no state besides its configuration; one instance can solve any
/// number of contracts, each independently.
#[derive(Debug, Clone, Default)]
pub struct ImpliedVolatilitySolver {
    config: SolverConfig,
}

impl ImpliedVolatilitySolver {
    /// Creates a solver with the given configuration.
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Returns the solver configuration.
    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves one contract.
    ///
    /// Tries the bracketed phase, then Newton from the closed-form seed, then
    /// applies the configured [`FallbackPolicy`]. A damped-Newton result that
    /// never moved off the seed is tagged [`SolveMethod::ClosedForm`].
    ///
    /// # Errors
    /// - `InvalidContract` before any computation.
    /// - `SolverFailure` from the Newton phase under [`FallbackPolicy::Surface`].
    pub fn solve(&self, contract: &OptionContract) -> Result<VolatilityEstimate, VolatilityError> {
        contract.validate()?;

        let seed = closed_form_seed(contract);
        trace!(
            "solving {:?} strike={} price={}: seed sigma={:.8}",
            contract.option_type, contract.strike, contract.observed_price, seed
        );

        if self.config.fallback == FallbackPolicy::ManualOnly {
            return solve_damped_newton(contract, seed, &self.config).map(Self::tag_unrefined);
        }

        match solve_bracketed(contract, &self.config) {
            Ok(estimate) => return Ok(estimate),
            Err(err) => debug!("bracketed phase failed, trying newton: {}", err),
        }

        let failure = match solve_newton(contract, seed, &self.config) {
            Ok(estimate) => return Ok(estimate),
            Err(err) => err,
        };

        match self.config.fallback {
            FallbackPolicy::Surface => {
                warn!(
                    "implied volatility not found for {:?} strike={}: {}",
                    contract.option_type, contract.strike, failure
                );
                Err(failure)
            }
            FallbackPolicy::LastResort | FallbackPolicy::ManualOnly => {
                warn!(
                    "newton phase failed for {:?} strike={}, running damped fallback: {}",
                    contract.option_type, contract.strike, failure
                );
                solve_damped_newton(contract, seed, &self.config).map(Self::tag_unrefined)
            }
        }
    }

    fn tag_unrefined(estimate: VolatilityEstimate) -> VolatilityEstimate {
        if estimate.iterations == 0 {
            VolatilityEstimate {
                method: SolveMethod::ClosedForm,
                ..estimate
            }
        } else {
            estimate
        }
    }
}

/// Solves for implied volatility with the default configuration.
///
/// # Example
/// ```
/// use impliedvol_rs::prelude::*;
///
/// let contract = OptionContract::call(5.31, 153.96, 150.0, -0.005, 37.0 / 252.0);
/// let estimate = solve_implied_volatility(&contract)?;
/// assert_eq!(estimate.method, SolveMethod::Bracketed);
/// assert!((BlackScholes::price(&contract, estimate.sigma) - 5.31).abs() < 1e-4);
/// # Ok::<(), VolatilityError>(())
/// ```
pub fn solve_implied_volatility(
    contract: &OptionContract,
) -> Result<VolatilityEstimate, VolatilityError> {
    ImpliedVolatilitySolver::default().solve(contract)
}
