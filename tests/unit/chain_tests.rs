use impliedvol_rs::prelude::*;

/// AAPL quotes at 153.96 with 37 trading days to expiry.
fn aapl_chain() -> OptionChain {
    let calls = [
        (140.0, 14.00),
        (145.0, 9.30),
        (150.0, 5.31),
        (155.0, 2.55),
        (160.0, 1.06),
        (165.0, 0.43),
    ];
    let puts = [(150.0, 1.80), (155.0, 4.05), (160.0, 7.75), (165.0, 11.56)];

    let mut chain = OptionChain::new(153.96, -0.005, 37.0 / 252.0);
    for (strike, price) in calls {
        chain.push_quote(OptionType::Call, strike, price);
    }
    for (strike, price) in puts {
        chain.push_quote(OptionType::Put, strike, price);
    }
    chain
}

#[test]
fn test_aapl_chain_solves_completely() {
    let estimates = aapl_chain().solve(&ImpliedVolatilitySolver::default());
    assert_eq!(estimates.failures(), 0);

    let smile = estimates.volatility_smile();
    assert_eq!(smile.calls.len(), 6);
    assert_eq!(smile.puts.len(), 4);

    for point in smile.calls.iter().chain(smile.puts.iter()) {
        assert!(point.sigma > 0.10 && point.sigma < 0.20, "{:?}", point);
    }
}

#[test]
fn test_chain_failures_are_isolated() {
    let mut chain = aapl_chain();
    chain.push_quote(OptionType::Put, 150.0, 0.0);
    chain.push_quote(OptionType::Call, 150.0, 400.0);

    let estimates = chain.solve(&ImpliedVolatilitySolver::default());
    assert_eq!(estimates.entries().len(), 12);
    assert_eq!(estimates.failures(), 2);
    assert!(matches!(
        estimates.entries()[10].result,
        Err(VolatilityError::InvalidContract { .. })
    ));
    assert_eq!(estimates.smile(OptionType::Call).len(), 6);
    assert_eq!(estimates.smile(OptionType::Put).len(), 4);
}

#[test]
fn test_chain_with_last_resort_policy_has_no_failures() {
    let mut chain = aapl_chain();
    chain.push_quote(OptionType::Call, 150.0, 400.0);

    let solver =
        ImpliedVolatilitySolver::new(SolverConfig::default().with_fallback(FallbackPolicy::LastResort));
    let estimates = chain.solve(&solver);
    assert_eq!(estimates.failures(), 0);

    let last = estimates.entries().last().unwrap().result.as_ref().unwrap();
    assert!(!last.converged);
    assert!(last.sigma > 0.0);
}
