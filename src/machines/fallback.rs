use chrono::NaiveDate;

use super::models::{Coordinates, Machine, MachineStatus, RiskLevel};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

///
/// Fixed sample network served by `list_machines` when the backend
/// cannot be reached, so the dashboard stays usable while disconnected.
///
pub fn sample_machines() -> Vec<Machine> {
    vec![
        Machine {
            id: String::from("ATM001"),
            location: String::from("Downtown Financial District"),
            current_cash: 45000.0,
            capacity: 100000.0,
            daily_withdrawals: [12000.0, 15000.0, 18000.0, 14000.0, 16000.0, 22000.0, 19000.0],
            last_refill: date(2024, 1, 28),
            predicted_depletion: date(2024, 2, 2),
            risk_level: RiskLevel::Medium,
            status: MachineStatus::Online,
            coordinates: Some(Coordinates { lat: 40.7128, lng: -74.006 }),
        },
        Machine {
            id: String::from("ATM002"),
            location: String::from("Westfield Shopping Center"),
            current_cash: 15000.0,
            capacity: 80000.0,
            daily_withdrawals: [25000.0, 28000.0, 32000.0, 29000.0, 31000.0, 35000.0, 33000.0],
            last_refill: date(2024, 1, 26),
            predicted_depletion: date(2024, 1, 31),
            risk_level: RiskLevel::High,
            status: MachineStatus::Online,
            coordinates: Some(Coordinates { lat: 40.7589, lng: -73.9851 }),
        },
        Machine {
            id: String::from("ATM003"),
            location: String::from("State University Campus"),
            current_cash: 72000.0,
            capacity: 100000.0,
            daily_withdrawals: [8000.0, 9000.0, 12000.0, 11000.0, 10000.0, 15000.0, 13000.0],
            last_refill: date(2024, 1, 29),
            predicted_depletion: date(2024, 2, 5),
            risk_level: RiskLevel::Low,
            status: MachineStatus::Online,
            coordinates: Some(Coordinates { lat: 40.6892, lng: -74.0445 }),
        },
        Machine {
            id: String::from("ATM004"),
            location: String::from("International Airport Terminal"),
            current_cash: 8000.0,
            capacity: 120000.0,
            daily_withdrawals: [35000.0, 38000.0, 42000.0, 39000.0, 41000.0, 45000.0, 43000.0],
            last_refill: date(2024, 1, 25),
            predicted_depletion: date(2024, 1, 30),
            risk_level: RiskLevel::High,
            status: MachineStatus::Online,
            coordinates: Some(Coordinates { lat: 40.6413, lng: -73.7781 }),
        },
    ]
}
