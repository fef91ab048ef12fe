use chrono::NaiveDate;
use lazy_static::lazy_static;
use rand::{rngs::StdRng, SeedableRng};

use crate::machines::{
    fallback::sample_machines,
    models::{Machine, RiskLevel},
};

use super::{
    chart_projection, chart_seasonal_factor,
    error::Error,
    local_forecast,
    models::ForecastFactors,
    CHART_DAYS,
};

lazy_static! {
    static ref TEST_START: NaiveDate = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
}

fn test_machine(current_cash: f64, capacity: f64, daily: f64) -> Machine {
    let mut machine = sample_machines().remove(0);
    machine.current_cash = current_cash;
    machine.capacity = capacity;
    machine.daily_withdrawals = [daily; 7];
    machine
}

#[test]
fn test_forecast_follows_cumulative_formula() -> anyhow::Result<()> {
    let machine = test_machine(100000.0, 200000.0, 10000.0);
    let factors = ForecastFactors { seasonal: 1.5, event: 2.0 };

    let days = local_forecast(&machine, 5, factors, *TEST_START)?;

    assert_eq!(5, days.len());
    for (i, day) in days.iter().enumerate() {
        let i = (i + 1) as f64;
        assert_eq!((100000.0 - i * 10000.0 * 1.5 * 2.0_f64).max(0.0), day.predicted_cash);
        assert_eq!(30000.0, day.daily_withdrawal);
    }
    assert_eq!(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(), days[0].date);
    assert_eq!(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(), days[4].date);
    Ok(())
}

#[test]
fn test_forecast_never_goes_negative() -> anyhow::Result<()> {
    let machine = test_machine(25000.0, 100000.0, 10000.0);

    let days = local_forecast(&machine, 4, ForecastFactors::default(), *TEST_START)?;

    assert_eq!(
        vec![15000.0, 5000.0, 0.0, 0.0],
        days.iter().map(|d| d.predicted_cash).collect::<Vec<_>>()
    );
    Ok(())
}

#[test]
fn test_forecast_risk_thresholds() -> anyhow::Result<()> {
    // 50%, 40%, 30%, 20%, 10% of capacity
    let machine = test_machine(60000.0, 100000.0, 10000.0);

    let days = local_forecast(&machine, 5, ForecastFactors::default(), *TEST_START)?;

    assert_eq!(
        vec![RiskLevel::Low, RiskLevel::Low, RiskLevel::Medium, RiskLevel::Medium, RiskLevel::High],
        days.iter().map(|d| d.risk_level).collect::<Vec<_>>()
    );
    assert_eq!(10.0, days[4].cash_percentage);
    Ok(())
}

#[test]
fn test_forecast_with_zero_capacity_is_high_risk() -> anyhow::Result<()> {
    let machine = test_machine(0.0, 0.0, 100.0);

    let days = local_forecast(&machine, 1, ForecastFactors::default(), *TEST_START)?;

    assert_eq!(0.0, days[0].cash_percentage);
    assert_eq!(RiskLevel::High, days[0].risk_level);
    Ok(())
}

#[test]
fn test_forecast_rejects_bad_factors_and_horizon() {
    let machine = test_machine(1000.0, 2000.0, 10.0);

    let negative = ForecastFactors { seasonal: -1.0, event: 1.0 };
    let infinite = ForecastFactors { seasonal: 1.0, event: f64::INFINITY };

    assert!(matches!(local_forecast(&machine, 3, negative, *TEST_START), Err(Error::InvalidFactor("seasonal", _))));
    assert!(matches!(local_forecast(&machine, 3, infinite, *TEST_START), Err(Error::InvalidFactor("event", _))));
    assert!(matches!(local_forecast(&machine, 0, ForecastFactors::default(), *TEST_START), Err(Error::InvalidHorizon)));
}

#[test]
fn test_seasonal_factor_shape() {
    assert_eq!(1.0, chart_seasonal_factor(0));
    assert!(chart_seasonal_factor(3) > chart_seasonal_factor(1));
    assert!(chart_seasonal_factor(4) <= 1.2);
}

#[test]
fn test_chart_projection_stays_within_jitter_bounds() {
    let machines = sample_machines();
    let mut rng = StdRng::seed_from_u64(7);

    let chart = chart_projection(&machines, *TEST_START, &mut rng);

    assert_eq!(CHART_DAYS as usize, chart.len());
    assert_eq!(*TEST_START, chart[0].date);
    for (i, day) in chart.iter().enumerate() {
        assert_eq!(machines.len(), day.machines.len());
        let seasonal = chart_seasonal_factor(i as u32);
        for (machine, point) in machines.iter().zip(&day.machines) {
            assert_eq!(machine.id, point.atm_id);
            let drawn = |jitter: f64| {
                (machine.current_cash - machine.average_daily_withdrawal() * seasonal * jitter * (i + 1) as f64)
                    .max(0.0)
            };
            assert!(point.predicted_cash >= drawn(1.1).round() - 1.0);
            assert!(point.predicted_cash <= drawn(0.9).round() + 1.0);
            assert_eq!(point.predicted_cash, point.predicted_cash.round());
        }
    }
}
