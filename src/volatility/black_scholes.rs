//! Black-Scholes pricing model and vega.
//!
//! Pure functions of an [`OptionContract`] and a trial volatility. The
//! solver evaluates these repeatedly as its residual; nothing here keeps
//! state or calls back into the solver.

use super::types::{OptionContract, OptionType};
use statrs::function::erf::erfc;
use std::f64::consts::{PI, SQRT_2};

/// Black-Scholes pricing model implementation.
pub struct BlackScholes;

impl BlackScholes {
    /// Standard normal cumulative distribution function (CDF).
    ///
    /// Calculates P(Z ≤ x) as `erfc(-x/√2) / 2`, which keeps full relative
    /// precision in the lower tail.
    #[must_use]
    pub fn norm_cdf(x: f64) -> f64 {
        0.5 * erfc(-x / SQRT_2)
    }

    /// Standard normal probability density function (PDF).
    #[must_use]
    pub fn norm_pdf(x: f64) -> f64 {
        (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
    }

    /// Calculates the d1 parameter of the Black-Scholes formula.
    ///
    /// d1 = [ln(S/K) + (r + σ²/2)T] / (σ√T)
    ///
    /// `sigma` must be strictly positive.
    #[must_use]
    pub fn d1(contract: &OptionContract, sigma: f64) -> f64 {
        let sqrt_time = contract.time_to_expiry.sqrt();
        ((contract.spot / contract.strike).ln()
            + (contract.risk_free_rate + 0.5 * sigma * sigma) * contract.time_to_expiry)
            / (sigma * sqrt_time)
    }

    /// Calculates the d2 parameter of the Black-Scholes formula.
    ///
    /// d2 = d1 - σ√T
    #[must_use]
    pub fn d2(contract: &OptionContract, sigma: f64) -> f64 {
        Self::d1(contract, sigma) - sigma * contract.time_to_expiry.sqrt()
    }

    /// Call price: C = S·N(d1) - K·e^(-rT)·N(d2)
    ///
    /// The option type stored on `contract` is ignored. `sigma` must be
    /// strictly positive.
    #[must_use]
    pub fn call_price(contract: &OptionContract, sigma: f64) -> f64 {
        let d1 = Self::d1(contract, sigma);
        let d2 = d1 - sigma * contract.time_to_expiry.sqrt();
        contract.spot * Self::norm_cdf(d1)
            - contract.strike * contract.discount_factor() * Self::norm_cdf(d2)
    }

    /// Put price: P = K·e^(-rT)·N(-d2) - S·N(-d1)
    ///
    /// The option type stored on `contract` is ignored. `sigma` must be
    /// strictly positive.
    #[must_use]
    pub fn put_price(contract: &OptionContract, sigma: f64) -> f64 {
        let d1 = Self::d1(contract, sigma);
        let d2 = d1 - sigma * contract.time_to_expiry.sqrt();
        contract.strike * contract.discount_factor() * Self::norm_cdf(-d2)
            - contract.spot * Self::norm_cdf(-d1)
    }

    /// Theoretical price of the contract's option type at `sigma`.
    ///
    /// For `sigma <= 0` this returns the zero-volatility limit instead of
    /// evaluating the formula, which is what lets the bracketed solver search
    /// an interval that extends below zero.
    #[must_use]
    pub fn price(contract: &OptionContract, sigma: f64) -> f64 {
        if sigma <= 0.0 {
            return contract.zero_volatility_value();
        }

        match contract.option_type {
            OptionType::Call => Self::call_price(contract, sigma),
            OptionType::Put => Self::put_price(contract, sigma),
        }
    }

    /// Calculates vega (∂price/∂σ) - sensitivity to volatility.
    ///
    /// Vega = S · √T · N'(d1)
    ///
    /// Identical for calls and puts, and strictly positive for valid inputs
    /// (though it underflows towards zero far from the money).
    #[must_use]
    pub fn vega(contract: &OptionContract, sigma: f64) -> f64 {
        if sigma <= 0.0 {
            return 0.0;
        }

        let d1 = Self::d1(contract, sigma);
        contract.spot * contract.time_to_expiry.sqrt() * Self::norm_pdf(d1)
    }
}
