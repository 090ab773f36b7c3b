use pretty_assertions::assert_eq;
use rent_vs_buy_core::simulation::params::SimulationParameters;
use rent_vs_buy_core::{build_schedule, simulate, RentBuyError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn close(a: Decimal, b: Decimal, tol: Decimal) -> bool {
    (a - b).abs() <= tol
}

// ===========================================================================
// Reference scenario
// ===========================================================================

#[test]
fn test_reference_baseline() {
    let out = simulate(&SimulationParameters::default()).unwrap();
    let baseline = &out.result.baseline;

    assert_eq!(baseline.down_payment, dec!(130000));
    assert_eq!(baseline.loan_principal, dec!(520000));
    assert_eq!(baseline.annual_rent, dec!(28800));
    // 12 * 750 + 1000 + 2000 = 12,000 recurring on top of the mortgage
    assert_eq!(
        baseline.annual_house_expense,
        baseline.annual_mortgage_payment + dec!(12000)
    );
    assert!(close(baseline.investment_delta, dec!(9834.63), dec!(0.01)));
}

#[test]
fn test_reference_run_has_nineteen_years_per_scenario() {
    let out = simulate(&SimulationParameters::default()).unwrap();
    assert_eq!(
        out.result.drawdowns(),
        vec![dec!(0), dec!(5), dec!(10), dec!(20), dec!(30)]
    );
    for scenario in &out.result.scenarios {
        assert_eq!(scenario.years.len(), 19);
        let indices: Vec<u32> = scenario.years.iter().map(|y| y.year_index).collect();
        assert_eq!(indices, (1..=19).collect::<Vec<_>>());
    }
}

#[test]
fn test_starting_home_value_haircut() {
    let out = simulate(&SimulationParameters::default()).unwrap();
    let values: Vec<Decimal> = out
        .result
        .scenarios
        .iter()
        .map(|s| s.starting_home_value)
        .collect();
    assert_eq!(
        values,
        vec![dec!(650000), dec!(617500), dec!(585000), dec!(520000), dec!(455000)]
    );
}

// ===========================================================================
// Drawdown independence
// ===========================================================================

#[test]
fn test_investment_path_identical_across_drawdowns() {
    let out = simulate(&SimulationParameters::default()).unwrap();
    let reference = &out.result.scenarios[0].years;
    for scenario in &out.result.scenarios[1..] {
        for (a, b) in reference.iter().zip(&scenario.years) {
            assert_eq!(a.investment_net_equity, b.investment_net_equity);
            assert_eq!(a.remaining_balance, b.remaining_balance);
            assert_eq!(a.cumulative_interest_paid, b.cumulative_interest_paid);
        }
    }
}

#[test]
fn test_home_equity_gap_is_net_of_commission() {
    // With no growth the equity gap between two drawdowns is the price gap
    // less the commission on that gap, every year.
    let out = simulate(&SimulationParameters::default()).unwrap();
    let zero = out.result.scenario(dec!(0)).unwrap();
    let thirty = out.result.scenario(dec!(30)).unwrap();
    for (a, b) in zero.years.iter().zip(&thirty.years) {
        let gap = a.home_net_equity - b.home_net_equity;
        assert!(close(gap, dec!(183300), dec!(0.000001)), "gap {gap}");
    }
}

#[test]
fn test_single_drawdown_matches_sweep() {
    let full = simulate(&SimulationParameters::default()).unwrap();
    let mut params = SimulationParameters::default();
    params.drawdown_percentages = vec![dec!(20)];
    let single = simulate(&params).unwrap();
    assert_eq!(
        single.result.scenario(dec!(20)),
        full.result.scenario(dec!(20))
    );
}

// ===========================================================================
// Determinism and edge cases
// ===========================================================================

#[test]
fn test_simulation_is_idempotent() {
    let mut params = SimulationParameters::default();
    params.annual_home_growth_rate_percent = dec!(3);
    params.annual_rent_increase_percent = dec!(2.5);
    let a = simulate(&params).unwrap();
    let b = simulate(&params).unwrap();
    assert_eq!(a.result, b.result);
    assert_eq!(
        serde_json::to_string(&a.result).unwrap(),
        serde_json::to_string(&b.result).unwrap()
    );
}

#[test]
fn test_one_year_run_is_empty_but_valid() {
    let mut params = SimulationParameters::default();
    params.years_to_run = 1;
    let out = simulate(&params).unwrap();
    assert_eq!(out.result.scenarios.len(), 5);
    for scenario in &out.result.scenarios {
        assert!(scenario.years.is_empty());
        assert!(scenario.summary.is_none());
    }
    assert!(out.warnings.iter().any(|w| w.contains("years_to_run is 1")));
}

#[test]
fn test_zero_mortgage_rate_straight_line() {
    let mut params = SimulationParameters::default();
    params.mortgage_rate_annual_percent = Decimal::ZERO;
    let out = simulate(&params).unwrap();
    assert_eq!(out.result.baseline.annual_mortgage_payment, dec!(20800));
    let year_5 = &out.result.scenario(dec!(0)).unwrap().years[4];
    assert_eq!(year_5.remaining_balance, dec!(416000));
    assert_eq!(year_5.cumulative_interest_paid, Decimal::ZERO);
}

#[test]
fn test_full_down_payment() {
    let mut params = SimulationParameters::default();
    params.down_payment_percent = dec!(100);
    let out = simulate(&params).unwrap();
    assert_eq!(out.result.baseline.loan_principal, Decimal::ZERO);
    assert_eq!(out.result.baseline.annual_mortgage_payment, Decimal::ZERO);
    let years = &out.result.scenario(dec!(0)).unwrap().years;
    assert!(years.iter().all(|y| y.remaining_balance.is_zero()));
    // House costs only the recurring 12,000 and rent is 28,800
    assert_eq!(years[0].investment_delta, dec!(-16800));
}

#[test]
fn test_rejects_invalid_parameters() {
    let mut params = SimulationParameters::default();
    params.drawdown_percentages = vec![dec!(120)];
    match simulate(&params) {
        Err(RentBuyError::InvalidParameter { field, .. }) => {
            assert_eq!(field, "drawdown_percentages")
        }
        other => panic!("expected InvalidParameter, got {other:?}"),
    }
}

#[test]
fn test_home_wins_when_growth_is_strong() {
    let mut params = SimulationParameters::default();
    params.annual_home_growth_rate_percent = dec!(6);
    params.investment_return_percent = dec!(2);
    let out = simulate(&params).unwrap();
    let summary = out.result.scenario(dec!(0)).unwrap().summary.clone().unwrap();
    assert!(summary.ownership_advantage > Decimal::ZERO);
    assert!(summary.crossover_year.is_some());
}

// ===========================================================================
// Schedule
// ===========================================================================

#[test]
fn test_schedule_agrees_with_simulation() {
    let params = SimulationParameters::default();
    let schedule = build_schedule(&params).unwrap().result;
    let sim = simulate(&params).unwrap().result;
    let years = &sim.scenario(dec!(0)).unwrap().years;

    assert_eq!(schedule.annual_payment, sim.baseline.annual_mortgage_payment);
    assert_eq!(schedule.rows.len(), 25);
    for (row, year) in schedule.rows.iter().zip(years) {
        assert_eq!(row.closing_balance, year.remaining_balance);
        assert_eq!(row.interest, year.current_year_interest_paid);
    }
}

#[test]
fn test_parameters_from_partial_json() {
    let params: SimulationParameters =
        serde_json::from_str(r#"{"purchase_price": 800000, "drawdown_percentages": ["0", 15]}"#)
            .unwrap();
    assert_eq!(params.purchase_price, dec!(800000));
    assert_eq!(params.drawdown_percentages, vec![dec!(0), dec!(15)]);
    assert_eq!(params.years_to_run, 20);
    let out = simulate(&params).unwrap();
    assert_eq!(out.result.scenarios.len(), 2);
}

// ===========================================================================
// Overflow reporting
// ===========================================================================

#[test]
fn test_huge_price_behaves_the_same_at_zero_rate() {
    let mut params = SimulationParameters::default();
    params.purchase_price = dec!(5000000000000000000000000000);
    assert!(simulate(&params).is_ok());

    params.mortgage_rate_annual_percent = Decimal::ZERO;
    assert!(simulate(&params).is_ok());
}

#[test]
fn test_oversized_strata_fees_report_overflow() {
    let mut params = SimulationParameters::default();
    params.monthly_strata_fees = dec!(5000000000000000000000000000);
    match simulate(&params) {
        Err(RentBuyError::Overflow { .. }) => {}
        other => panic!("expected Overflow, got {other:?}"),
    }
}

#[test]
fn test_baseline_reports_rent_before_and_after_increase() {
    let mut params = SimulationParameters::default();
    params.annual_rent_increase_percent = dec!(3);
    let baseline = simulate(&params).unwrap().result.baseline;
    assert_eq!(baseline.base_annual_rent, dec!(28800));
    assert_eq!(baseline.annual_rent, dec!(29664));
}
