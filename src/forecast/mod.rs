pub mod error;
pub mod models;

use std::f64::consts::PI;

use chrono::{Days, NaiveDate};
use rand::Rng;

use crate::machines::models::{Machine, RiskLevel};

use {error::*, models::*};

#[cfg(test)]
mod test;

pub const CHART_DAYS: u32 = 7;

fn check_factor(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidFactor(name, value));
    }
    Ok(())
}

///
/// Offline stand-in for the backend forecast. The machine's average daily
/// withdrawal is scaled by both factors and drawn down from current cash,
/// never below zero. Day `i` lands on `start_date + i`.
///
pub fn local_forecast(
    machine: &Machine,
    days: u32,
    factors: ForecastFactors,
    start_date: NaiveDate,
) -> Result<Vec<ForecastDay>> {
    if days == 0 {
        return Err(Error::InvalidHorizon);
    }
    check_factor("seasonal", factors.seasonal)?;
    check_factor("event", factors.event)?;

    let adjusted = machine.average_daily_withdrawal() * factors.seasonal * factors.event;

    Ok((1..=days)
        .map(|day| {
            let predicted_cash = (machine.current_cash - day as f64 * adjusted).max(0.0);
            let cash_percentage = if machine.capacity > 0.0 {
                predicted_cash / machine.capacity * 100.0
            } else {
                0.0
            };
            ForecastDay {
                day,
                date: start_date + Days::new(day as u64),
                predicted_cash,
                cash_percentage,
                risk_level: RiskLevel::from_cash_percentage(cash_percentage),
                daily_withdrawal: adjusted,
            }
        })
        .collect())
}

/// Seasonal swing for chart day `i`, peaking mid-week.
pub fn chart_seasonal_factor(day_index: u32) -> f64 {
    1.0 + (day_index as f64 / CHART_DAYS as f64 * PI).sin() * 0.2
}

///
/// Week-ahead projection for every machine, as drawn on the dashboard chart.
/// Each machine gets its own random jitter in `[0.9, 1.1)` per day.
///
pub fn chart_projection<R: Rng>(
    machines: &[Machine],
    start_date: NaiveDate,
    rng: &mut R,
) -> Vec<ChartDay> {
    (0..CHART_DAYS)
        .map(|i| {
            let seasonal = chart_seasonal_factor(i);
            let machines = machines
                .iter()
                .map(|machine| {
                    let random: f64 = rng.random_range(0.9..1.1);
                    let adjusted = machine.average_daily_withdrawal() * seasonal * random;
                    MachineProjection {
                        atm_id: machine.id.clone(),
                        predicted_cash: (machine.current_cash - adjusted * (i + 1) as f64).max(0.0).round(),
                    }
                })
                .collect();
            ChartDay { date: start_date + Days::new(i as u64), machines }
        })
        .collect()
}
