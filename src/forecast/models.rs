use chrono::NaiveDate;
use serde::Serialize;

use crate::machines::models::RiskLevel;

/// Multipliers applied to a machine's historical daily average.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastFactors {
    pub seasonal: f64,
    pub event: f64,
}

impl Default for ForecastFactors {
    fn default() -> Self {
        Self { seasonal: 1.0, event: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub day: u32,
    pub date: NaiveDate,
    pub predicted_cash: f64,
    pub cash_percentage: f64,
    pub risk_level: RiskLevel,
    pub daily_withdrawal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineProjection {
    pub atm_id: String,
    pub predicted_cash: f64,
}

/// One point on the network projection chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDay {
    pub date: NaiveDate,
    pub machines: Vec<MachineProjection>,
}
