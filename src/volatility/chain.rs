//! Option chain solving and volatility smile extraction.
//!
//! An [`OptionChain`] groups quotes that share an underlying price, a rate and
//! an expiry. Every contract is solved on its own: a failed solve is kept as
//! an error entry and never stops the rest of the chain.

use super::error::VolatilityError;
use super::solver::ImpliedVolatilitySolver;
use super::types::{OptionContract, OptionType, VolatilityEstimate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Quotes for one underlying and one expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionChain {
    /// Underlying spot price shared by every contract.
    pub spot: f64,
    /// Continuously-compounded risk-free rate.
    pub risk_free_rate: f64,
    /// Time to expiration in years.
    pub time_to_expiry: f64,
    contracts: Vec<OptionContract>,
}

impl OptionChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new(spot: f64, risk_free_rate: f64, time_to_expiry: f64) -> Self {
        Self {
            spot,
            risk_free_rate,
            time_to_expiry,
            contracts: Vec::new(),
        }
    }

    /// Adds a quote of the given type.
    #[must_use]
    pub fn with_quote(mut self, option_type: OptionType, strike: f64, price: f64) -> Self {
        self.push_quote(option_type, strike, price);
        self
    }

    /// Adds a call quote.
    #[must_use]
    pub fn with_call(self, strike: f64, price: f64) -> Self {
        self.with_quote(OptionType::Call, strike, price)
    }

    /// Adds a put quote.
    #[must_use]
    pub fn with_put(self, strike: f64, price: f64) -> Self {
        self.with_quote(OptionType::Put, strike, price)
    }

    /// Adds a quote in place.
    pub fn push_quote(&mut self, option_type: OptionType, strike: f64, price: f64) {
        self.contracts.push(OptionContract::new(
            price,
            self.spot,
            strike,
            self.risk_free_rate,
            self.time_to_expiry,
            option_type,
        ));
    }

    /// Contracts in insertion order.
    #[must_use]
    pub fn contracts(&self) -> &[OptionContract] {
        &self.contracts
    }

    /// Returns the number of quotes in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// Returns true if the chain holds no quotes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Solves every contract independently.
    pub fn solve(&self, solver: &ImpliedVolatilitySolver) -> ChainEstimates {
        let entries: Vec<ChainEntry> = self
            .contracts
            .iter()
            .map(|contract| {
                let result = solver.solve(contract);
                if let Err(err) = &result {
                    warn!(
                        "skipping {:?} strike={} in chain: {}",
                        contract.option_type, contract.strike, err
                    );
                }
                ChainEntry {
                    contract: *contract,
                    result,
                }
            })
            .collect();

        let estimates = ChainEstimates { entries };
        debug!(
            "solved chain: {} estimates, {} failures",
            estimates.entries.len() - estimates.failures(),
            estimates.failures()
        );
        estimates
    }
}

/// One contract of a chain together with the outcome of its solve.
#[derive(Debug, Clone)]
pub struct ChainEntry {
    /// Contract that was solved.
    pub contract: OptionContract,
    /// Estimate, or the error that stopped this contract alone.
    pub result: Result<VolatilityEstimate, VolatilityError>,
}

/// Outcome of [`OptionChain::solve`].
#[derive(Debug, Clone)]
pub struct ChainEstimates {
    entries: Vec<ChainEntry>,
}

impl ChainEstimates {
    /// Entries in the chain's insertion order.
    #[must_use]
    pub fn entries(&self) -> &[ChainEntry] {
        &self.entries
    }

    /// Number of contracts that failed to solve.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_err()).count()
    }

    /// `(strike, sigma)` points for one option type, sorted by strike.
    ///
    /// Failed solves are left out.
    #[must_use]
    pub fn smile(&self, option_type: OptionType) -> Vec<SmilePoint> {
        let mut points: Vec<SmilePoint> = self
            .entries
            .iter()
            .filter(|e| e.contract.option_type == option_type)
            .filter_map(|e| {
                e.result.as_ref().ok().map(|estimate| SmilePoint {
                    strike: e.contract.strike,
                    sigma: estimate.sigma,
                })
            })
            .collect();
        points.sort_by(|a, b| a.strike.total_cmp(&b.strike));
        points
    }

    /// Call and put smiles together.
    #[must_use]
    pub fn volatility_smile(&self) -> VolatilitySmile {
        VolatilitySmile {
            calls: self.smile(OptionType::Call),
            puts: self.smile(OptionType::Put),
        }
    }
}

/// A single point of a volatility smile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmilePoint {
    /// Option strike price.
    pub strike: f64,
    /// Implied volatility at that strike.
    pub sigma: f64,
}

/// Smile series for both option types, ready to hand to a chart renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilitySmile {
    /// Call smile, sorted by strike.
    pub calls: Vec<SmilePoint>,
    /// Put smile, sorted by strike.
    pub puts: Vec<SmilePoint>,
}
