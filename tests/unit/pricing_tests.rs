use impliedvol_rs::prelude::*;

fn sigma_grid() -> impl Iterator<Item = f64> {
    (1..=100).map(|i| i as f64 * 0.05)
}

#[test]
fn test_prices_strictly_increase_in_sigma() {
    let cases = [
        (100.0, 100.0, 0.01, 0.5),
        (100.0, 90.0, 0.03, 1.0),
        (100.0, 115.0, -0.005, 0.25),
        (153.96, 150.0, -0.005, 37.0 / 252.0),
    ];

    for (spot, strike, rate, time) in cases {
        for contract in [
            OptionContract::call(1.0, spot, strike, rate, time),
            OptionContract::put(1.0, spot, strike, rate, time),
        ] {
            let mut previous = BlackScholes::price(&contract, 0.05);
            for sigma in sigma_grid().skip(1) {
                let price = BlackScholes::price(&contract, sigma);
                assert!(
                    price > previous,
                    "{:?} K={} not increasing at sigma={}",
                    contract.option_type,
                    strike,
                    sigma
                );
                previous = price;
            }
        }
    }
}

#[test]
fn test_vega_positive_over_grid() {
    for strike in [80.0, 95.0, 100.0, 105.0, 120.0] {
        for time in [0.05, 0.25, 1.0, 3.0] {
            let contract = OptionContract::call(1.0, 100.0, strike, 0.02, time);
            for sigma in sigma_grid() {
                assert!(
                    BlackScholes::vega(&contract, sigma) > 0.0,
                    "vega not positive at K={} T={} sigma={}",
                    strike,
                    time,
                    sigma
                );
            }
        }
    }
}

#[test]
fn test_put_call_parity_over_grid() {
    for rate in [-0.01, -0.005, 0.0, 0.05] {
        for strike in [90.0, 100.0, 110.0] {
            let time = 0.75;
            let call = OptionContract::call(1.0, 100.0, strike, rate, time);
            let put = OptionContract::put(1.0, 100.0, strike, rate, time);
            let forward_gap = 100.0 - strike * (-rate * time).exp();

            for sigma in [0.05, 0.2, 0.6, 1.5, 4.0] {
                let diff = BlackScholes::call_price(&call, sigma) - BlackScholes::put_price(&put, sigma);
                assert!(
                    (diff - forward_gap).abs() < 1e-9,
                    "parity broken at r={} K={} sigma={}",
                    rate,
                    strike,
                    sigma
                );
            }
        }
    }
}

#[test]
fn test_d2_is_d1_shifted() {
    let contract = OptionContract::put(1.0, 120.0, 100.0, 0.01, 2.0);
    let sigma = 0.35;
    let shift = BlackScholes::d1(&contract, sigma) - BlackScholes::d2(&contract, sigma);
    assert!((shift - sigma * 2.0f64.sqrt()).abs() < 1e-12);
}
