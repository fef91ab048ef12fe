use std::fmt::Display;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const WITHDRAWAL_HISTORY_DAYS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel { Low, Medium, High, }

impl RiskLevel {
    ///
    /// Classifies a cash-to-capacity percentage:
    /// below 20 is high risk, below 40 is medium, anything else is low.
    ///
    pub fn from_cash_percentage(percentage: f64) -> Self {
        if percentage < 20.0 {
            Self::High
        } else if percentage < 40.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineStatus { Online, Offline, Maintenance, }

impl MachineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Maintenance => "maintenance",
        }
    }
}

impl Display for MachineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

///
/// Tracked state of a single cash machine, as owned by the backend.
/// Risk and status are labels assigned upstream, never derived here.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub id: String,
    pub location: String,
    pub current_cash: f64,
    pub capacity: f64,
    /// Oldest day first
    pub daily_withdrawals: [f64; WITHDRAWAL_HISTORY_DAYS],
    pub last_refill: NaiveDate,
    pub predicted_depletion: NaiveDate,
    pub risk_level: RiskLevel,
    pub status: MachineStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl Machine {
    /// `current_cash / capacity`, unclamped. Zero when capacity is not positive.
    pub fn cash_fraction(&self) -> f64 {
        if self.capacity > 0.0 { self.current_cash / self.capacity } else { 0.0 }
    }

    pub fn cash_percentage(&self) -> f64 {
        self.cash_fraction() * 100.0
    }

    pub fn weekly_withdrawals(&self) -> f64 {
        self.daily_withdrawals.iter().sum()
    }

    pub fn average_daily_withdrawal(&self) -> f64 {
        self.weekly_withdrawals() / WITHDRAWAL_HISTORY_DAYS as f64
    }

    pub fn peak_day_withdrawal(&self) -> f64 {
        self.daily_withdrawals.iter().copied().fold(f64::MIN, f64::max)
    }

    pub fn low_day_withdrawal(&self) -> f64 {
        self.daily_withdrawals.iter().copied().fold(f64::MAX, f64::min)
    }

    pub fn satisfies_capacity_invariant(&self) -> bool {
        0.0 <= self.current_cash && self.current_cash <= self.capacity
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMachine {
    pub location: String,
    pub current_cash: f64,
    pub capacity: f64,
    pub daily_withdrawals: [f64; WITHDRAWAL_HISTORY_DAYS],
    pub last_refill: NaiveDate,
    pub predicted_depletion: NaiveDate,
    pub risk_level: RiskLevel,
    pub status: MachineStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl NewMachine {
    /// Default withdrawal history given to machines added from the dashboard
    pub const SEED_WITHDRAWALS: [f64; WITHDRAWAL_HISTORY_DAYS] =
        [10000.0, 12000.0, 11000.0, 13000.0, 14000.0, 16000.0, 15000.0];

    ///
    /// A freshly installed machine: seeded history, refilled today,
    /// depletion expected a week out, low risk and online.
    ///
    pub fn install(
        location: &str,
        current_cash: f64,
        capacity: f64,
        coordinates: Option<Coordinates>,
        today: NaiveDate,
    ) -> Self {
        Self {
            location: location.to_string(),
            current_cash,
            capacity,
            daily_withdrawals: Self::SEED_WITHDRAWALS,
            last_refill: today,
            predicted_depletion: today + chrono::Days::new(7),
            risk_level: RiskLevel::Low,
            status: MachineStatus::Online,
            coordinates,
        }
    }
}

///
/// Partial update. Only fields that are `Some` are sent.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_cash: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_refill: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MachineStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Live,
    /// Built-in sample records served while the backend is unreachable
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MachineListing {
    pub machines: Vec<Machine>,
    pub source: DataSource,
}
