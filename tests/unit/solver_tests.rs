use impliedvol_rs::prelude::*;

fn scenario() -> OptionContract {
    OptionContract::call(5.31, 153.96, 150.0, -0.005, 37.0 / 252.0)
}

#[test]
fn test_round_trip_recovers_sigma() {
    for option_type in [OptionType::Call, OptionType::Put] {
        for strike in [85.0, 95.0, 100.0, 105.0, 115.0] {
            for sigma_true in [0.1, 0.2, 0.35, 0.6, 1.0, 2.0] {
                let contract = OptionContract::new(1.0, 100.0, strike, 0.01, 0.5, option_type);
                let price = BlackScholes::price(&contract, sigma_true);
                let contract = contract.with_observed_price(price);

                let estimate = solve_implied_volatility(&contract).unwrap();
                assert!(
                    (estimate.sigma - sigma_true).abs() < 1e-6,
                    "{:?} K={} sigma={} recovered {}",
                    option_type,
                    strike,
                    sigma_true,
                    estimate.sigma
                );
                assert_eq!(estimate.method, SolveMethod::Bracketed);
            }
        }
    }
}

#[test]
fn test_near_the_money_scenario() {
    let contract = scenario();

    let seed = closed_form_seed(&contract);
    assert!((seed - 0.2256).abs() < 1e-4);

    let estimate = solve_implied_volatility(&contract).unwrap();
    assert_eq!(estimate.method, SolveMethod::Bracketed);
    assert!(estimate.converged);
    assert!((estimate.sigma - 0.129_117_12).abs() < 1e-6);

    let repriced = BlackScholes::call_price(&contract, estimate.sigma);
    assert!((repriced - 5.31).abs() < 1e-4);
}

#[test]
fn test_newton_agrees_with_bracketed_on_scenario() {
    let contract = scenario();
    let config = SolverConfig::default();

    let bracketed = solve_bracketed(&contract, &config).unwrap();
    let newton = solve_newton(&contract, closed_form_seed(&contract), &config).unwrap();
    let damped = solve_damped_newton(&contract, closed_form_seed(&contract), &config).unwrap();

    assert!((bracketed.sigma - newton.sigma).abs() < 1e-7);
    assert!((bracketed.sigma - damped.sigma).abs() < 1e-7);
    assert!(damped.converged);
}

#[test]
fn test_bracketing_failure_falls_back_without_non_positive_sigma() {
    // Above the spot: no volatility prices a call this high.
    let contract = scenario().with_observed_price(170.0);
    let config = SolverConfig::default();

    assert!(matches!(
        solve_bracketed(&contract, &config),
        Err(VolatilityError::BracketingFailure { .. })
    ));

    match solve_implied_volatility(&contract) {
        Ok(estimate) => assert!(estimate.sigma > 0.0),
        Err(err) => assert!(matches!(err, VolatilityError::SolverFailure { .. })),
    }

    let solver = ImpliedVolatilitySolver::new(config.with_fallback(FallbackPolicy::LastResort));
    let estimate = solver.solve(&contract).unwrap();
    assert!(estimate.sigma > 0.0);
    assert!(!estimate.converged);
}

#[test]
fn test_bracket_restricted_to_positive_range() {
    // The observed price needs a volatility above the upper bound, so the
    // chain must move on to Newton, which finds it.
    let contract = OptionContract::call(1.0, 100.0, 100.0, 0.0, 1.0);
    let contract = contract.with_observed_price(BlackScholes::price(&contract, 0.8));
    let solver = ImpliedVolatilitySolver::new(SolverConfig::default().with_bracket(0.01, 0.5));

    let estimate = solver.solve(&contract).unwrap();
    assert_eq!(estimate.method, SolveMethod::NewtonRaphson);
    assert!((estimate.sigma - 0.8).abs() < 1e-6);
}

#[test]
fn test_degenerate_vega_terminates_immediately() {
    let contract = OptionContract::put(1e-3, 300.0, 100.0, 0.0, 0.1);
    let seed = 0.01;
    assert!(BlackScholes::vega(&contract, seed) < 1e-4);

    let estimate = solve_damped_newton(&contract, seed, &SolverConfig::default()).unwrap();
    assert!(!estimate.converged);
    assert_eq!(estimate.iterations, 0);
    assert_eq!(estimate.sigma, seed);
}

#[test]
fn test_invalid_contract_rejected_before_solving() {
    let contract = OptionContract::put(1.0, 100.0, 100.0, 0.0, -0.5);
    for policy in [
        FallbackPolicy::Surface,
        FallbackPolicy::LastResort,
        FallbackPolicy::ManualOnly,
    ] {
        let solver = ImpliedVolatilitySolver::new(SolverConfig::default().with_fallback(policy));
        assert!(matches!(
            solver.solve(&contract),
            Err(VolatilityError::InvalidContract { .. })
        ));
    }
}

#[test]
fn test_no_policy_returns_non_positive_sigma() {
    let quotes = [
        scenario(),
        scenario().with_observed_price(170.0),
        scenario().with_observed_price(1.0),
        OptionContract::put(0.02, 153.96, 120.0, -0.005, 37.0 / 252.0),
        OptionContract::put(40.0, 153.96, 190.0, 0.02, 0.5),
    ];
    for policy in [
        FallbackPolicy::Surface,
        FallbackPolicy::LastResort,
        FallbackPolicy::ManualOnly,
    ] {
        let solver = ImpliedVolatilitySolver::new(SolverConfig::default().with_fallback(policy));
        for contract in &quotes {
            if let Ok(estimate) = solver.solve(contract) {
                assert!(estimate.sigma > 0.0, "{:?} gave {:?}", policy, estimate);
            }
        }
    }
}

#[test]
fn test_solver_reusable_across_contracts() {
    let solver = ImpliedVolatilitySolver::default();
    let first = solver.solve(&scenario()).unwrap();
    let _ = solver.solve(&scenario().with_observed_price(170.0));
    let again = solver.solve(&scenario()).unwrap();
    assert_eq!(first, again);
}
