//! Types for implied volatility estimation.

use super::error::VolatilityError;
use serde::{Deserialize, Serialize};

/// Option type of a European contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    /// Call option (right to buy the underlying at strike price).
    Call,
    /// Put option (right to sell the underlying at strike price).
    Put,
}

/// Phase of the solver that produced a [`VolatilityEstimate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveMethod {
    /// Closed-form at-the-money approximation, no refinement applied.
    ClosedForm,
    /// Brent's method on a fixed volatility bracket.
    Bracketed,
    /// Newton iteration driven by analytic vega.
    NewtonRaphson,
    /// Manual damped Newton loop used as a last resort.
    IterativeFallback,
}

/// A European option quote to be inverted for its implied volatility.
///
/// Values are taken as given; call [`OptionContract::validate`] (the solver
/// does so itself) before pricing with them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    /// Observed market price of the option (last trade or ask).
    pub observed_price: f64,
    /// Underlying spot price.
    pub spot: f64,
    /// Option strike price.
    pub strike: f64,
    /// Continuously-compounded risk-free rate, may be negative.
    pub risk_free_rate: f64,
    /// Time to expiration in years (e.g., 37 trading days = 37.0 / 252.0).
    pub time_to_expiry: f64,
    /// Call or Put.
    pub option_type: OptionType,
}

impl OptionContract {
    /// Creates a new contract.
    ///
    /// # Arguments
    /// - `observed_price`: Market price of the option
    /// - `spot`: Underlying spot price
    /// - `strike`: Option strike price
    /// - `risk_free_rate`: Continuously-compounded risk-free rate
    /// - `time_to_expiry`: Time to expiration in years
    /// - `option_type`: Call or Put
    #[must_use]
    pub fn new(
        observed_price: f64,
        spot: f64,
        strike: f64,
        risk_free_rate: f64,
        time_to_expiry: f64,
        option_type: OptionType,
    ) -> Self {
        Self {
            observed_price,
            spot,
            strike,
            risk_free_rate,
            time_to_expiry,
            option_type,
        }
    }

    /// Creates a call contract.
    #[must_use]
    pub fn call(
        observed_price: f64,
        spot: f64,
        strike: f64,
        risk_free_rate: f64,
        time_to_expiry: f64,
    ) -> Self {
        Self::new(
            observed_price,
            spot,
            strike,
            risk_free_rate,
            time_to_expiry,
            OptionType::Call,
        )
    }

    /// Creates a put contract.
    #[must_use]
    pub fn put(
        observed_price: f64,
        spot: f64,
        strike: f64,
        risk_free_rate: f64,
        time_to_expiry: f64,
    ) -> Self {
        Self::new(
            observed_price,
            spot,
            strike,
            risk_free_rate,
            time_to_expiry,
            OptionType::Put,
        )
    }

    /// Returns a copy of this contract quoted at a different price.
    #[must_use]
    pub fn with_observed_price(self, observed_price: f64) -> Self {
        Self {
            observed_price,
            ..self
        }
    }

    /// Checks that the contract can be priced.
    ///
    /// Spot, strike, time to expiry and observed price must be strictly
    /// positive and every field finite; otherwise `d1`/`d2` are undefined.
    pub fn validate(&self) -> Result<(), VolatilityError> {
        let fields = [
            ("observed price", self.observed_price),
            ("spot price", self.spot),
            ("strike price", self.strike),
            ("time to expiry", self.time_to_expiry),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(VolatilityError::InvalidContract {
                    message: format!("{name} must be positive and finite, got {value}"),
                });
            }
        }

        if !self.risk_free_rate.is_finite() {
            return Err(VolatilityError::InvalidContract {
                message: format!(
                    "risk-free rate must be finite, got {}",
                    self.risk_free_rate
                ),
            });
        }

        Ok(())
    }

    /// Discount factor `e^(-r·t)`.
    #[must_use]
    pub fn discount_factor(&self) -> f64 {
        (-self.risk_free_rate * self.time_to_expiry).exp()
    }

    /// Calculates the intrinsic value of the option.
    ///
    /// For calls: max(0, spot - strike)
    /// For puts: max(0, strike - spot)
    #[must_use]
    pub fn intrinsic_value(&self) -> f64 {
        match self.option_type {
            OptionType::Call => (self.spot - self.strike).max(0.0),
            OptionType::Put => (self.strike - self.spot).max(0.0),
        }
    }

    /// Price of the option in the limit of zero volatility.
    ///
    /// This is the lower edge of the no-arbitrage band: no positive volatility
    /// reproduces an observed price at or below it.
    #[must_use]
    pub fn zero_volatility_value(&self) -> f64 {
        let discounted_strike = self.strike * self.discount_factor();
        match self.option_type {
            OptionType::Call => (self.spot - discounted_strike).max(0.0),
            OptionType::Put => (discounted_strike - self.spot).max(0.0),
        }
    }
}

/// Result of an implied volatility solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityEstimate {
    /// Estimated volatility (e.g., 0.25 = 25%). Always strictly positive.
    pub sigma: f64,
    /// Solver phase that produced the estimate.
    pub method: SolveMethod,
    /// Whether the producing phase met its convergence criterion.
    pub converged: bool,
    /// Refinement iterations used by the producing phase.
    pub iterations: u32,
}

impl VolatilityEstimate {
    /// Creates a new estimate.
    #[must_use]
    pub fn new(sigma: f64, method: SolveMethod, converged: bool, iterations: u32) -> Self {
        Self {
            sigma,
            method,
            converged,
            iterations,
        }
    }

    /// Returns sigma as a percentage (e.g., 25.0 for 25%).
    #[must_use]
    pub fn sigma_percent(&self) -> f64 {
        self.sigma * 100.0
    }
}
