use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::{
    forecast::models::ForecastDay,
    machines::models::{Machine, MachineStatus, RiskLevel},
    prediction_model::models::DailyPrediction,
    refill_requests::models::RefillRequest,
};

use super::{error::*, Record};

const NOT_AVAILABLE: &str = "N/A";

fn record<const N: usize>(fields: [(&str, Value); N]) -> Record {
    fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn export_stamp(now: DateTime<Utc>) -> Value {
    json!(now.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn percentage_text(pct: f64) -> String {
    format!("{:.2}%", pct)
}

/// `$` followed by the amount with thousands grouping, cents only when present.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let (whole, frac) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    if frac == 0 {
        format!("{}${}", sign, grouped)
    } else {
        format!("{}${}.{:02}", sign, grouped, frac)
    }
}

/// Date part of a backend timestamp, or the raw text if it is not one.
fn date_part(timestamp: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return dt.date_naive().to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.date().to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(timestamp, "%Y-%m-%d") {
        return date.to_string();
    }
    timestamp.to_string()
}

pub fn machine_report(machines: &[Machine], now: DateTime<Utc>) -> Result<Vec<Record>> {
    if machines.is_empty() {
        return Err(Error::NoData);
    }

    Ok(machines
        .iter()
        .map(|m| {
            let coordinates = m.coordinates
                .map(|c| format!("{}, {}", c.lat, c.lng))
                .unwrap_or(NOT_AVAILABLE.to_string());
            record([
                ("ATM_ID", json!(m.id)),
                ("Location", json!(m.location)),
                ("Current_Cash", json!(m.current_cash)),
                ("Capacity", json!(m.capacity)),
                ("Cash_Percentage", json!(percentage_text(m.cash_percentage()))),
                ("Risk_Level", json!(m.risk_level.as_str())),
                ("Status", json!(m.status.as_str())),
                ("Last_Refill", json!(m.last_refill.to_string())),
                ("Predicted_Depletion", json!(m.predicted_depletion.to_string())),
                ("Weekly_Total_Withdrawals", json!(m.weekly_withdrawals())),
                ("Daily_Average_Withdrawal", json!(m.average_daily_withdrawal().round())),
                ("Peak_Day_Withdrawal", json!(m.peak_day_withdrawal())),
                ("Low_Day_Withdrawal", json!(m.low_day_withdrawal())),
                ("Coordinates", json!(coordinates)),
                ("Export_Date", export_stamp(now)),
            ])
        })
        .collect())
}

///
/// Network-wide Metric/Value/Category rows.
///
pub fn network_summary_report(machines: &[Machine], now: DateTime<Utc>) -> Result<Vec<Record>> {
    if machines.is_empty() {
        return Err(Error::NoData);
    }

    let total_cash: f64 = machines.iter().map(|m| m.current_cash).sum();
    let total_capacity: f64 = machines.iter().map(|m| m.capacity).sum();
    let utilization = if total_capacity > 0.0 { total_cash / total_capacity * 100.0 } else { 0.0 };
    let risk_count = |level: RiskLevel| machines.iter().filter(|m| m.risk_level == level).count();
    let status_count = |status: MachineStatus| machines.iter().filter(|m| m.status == status).count();
    let average_daily = machines.iter().map(Machine::average_daily_withdrawal).sum::<f64>()
        / machines.len() as f64;

    let row = |metric: &str, value: Value, category: &str| {
        record([("Metric", json!(metric)), ("Value", value), ("Category", json!(category))])
    };

    Ok(vec![
        row("Total ATMs", json!(machines.len()), "Network Overview"),
        row("Total Cash Available", json!(format_currency(total_cash)), "Financial"),
        row("Total Network Capacity", json!(format_currency(total_capacity)), "Financial"),
        row("Network Utilization", json!(percentage_text(utilization)), "Financial"),
        row("High Risk ATMs", json!(risk_count(RiskLevel::High)), "Risk Assessment"),
        row("Medium Risk ATMs", json!(risk_count(RiskLevel::Medium)), "Risk Assessment"),
        row("Low Risk ATMs", json!(risk_count(RiskLevel::Low)), "Risk Assessment"),
        row("Online ATMs", json!(status_count(MachineStatus::Online)), "Status"),
        row("Offline ATMs", json!(status_count(MachineStatus::Offline)), "Status"),
        row("Maintenance ATMs", json!(status_count(MachineStatus::Maintenance)), "Status"),
        row("Average Daily Withdrawal", json!(format_currency(average_daily.round())), "Performance"),
        row("Report Generated", json!(now.format("%Y-%m-%d %H:%M:%S").to_string()), "Metadata"),
    ])
}

/// Prediction rows from the offline forecast.
pub fn forecast_report(days: &[ForecastDay], now: DateTime<Utc>) -> Result<Vec<Record>> {
    if days.is_empty() {
        return Err(Error::NoData);
    }

    Ok(days
        .iter()
        .map(|d| {
            record([
                ("Day_Number", json!(d.day)),
                ("Date", json!(d.date.to_string())),
                ("Predicted_Cash", json!(d.predicted_cash)),
                ("Cash_Percentage", json!(percentage_text(d.cash_percentage))),
                ("Risk_Level", json!(d.risk_level.as_str())),
                ("Daily_Withdrawal", json!(d.daily_withdrawal)),
                ("Running_Total", json!(NOT_AVAILABLE)),
                ("Export_Date", export_stamp(now)),
            ])
        })
        .collect())
}

///
/// Prediction rows from the backend model. It forecasts withdrawals rather
/// than balances, so the withdrawal figure fills the cash column and the
/// balance-derived columns are not available.
///
pub fn backend_prediction_report(predictions: &[DailyPrediction], now: DateTime<Utc>) -> Result<Vec<Record>> {
    if predictions.is_empty() {
        return Err(Error::NoData);
    }

    Ok(predictions
        .iter()
        .map(|p| {
            record([
                ("Day_Number", json!(p.day_number)),
                ("Date", json!(p.date)),
                ("Predicted_Cash", json!(p.predicted_withdrawal)),
                ("Cash_Percentage", json!(NOT_AVAILABLE)),
                ("Risk_Level", json!(NOT_AVAILABLE)),
                ("Daily_Withdrawal", json!(p.predicted_withdrawal)),
                ("Running_Total", json!(p.running_total)),
                ("Export_Date", export_stamp(now)),
            ])
        })
        .collect())
}

pub fn refill_request_report(requests: &[RefillRequest], now: DateTime<Utc>) -> Result<Vec<Record>> {
    if requests.is_empty() {
        return Err(Error::NoData);
    }

    Ok(requests
        .iter()
        .map(|r| {
            let latest = r.latest_approval();
            record([
                ("Request_ID", json!(r.request_id)),
                ("ATM_ID", json!(r.atm_id)),
                ("Requested_Amount", json!(r.requested_amount)),
                ("Requestor", json!(r.requestor)),
                ("Status", json!(r.status.as_str())),
                ("Created_Date", json!(date_part(&r.created_at))),
                ("Updated_Date", json!(date_part(&r.updated_at))),
                ("Comment", json!(r.comment_text().unwrap_or(NOT_AVAILABLE))),
                ("Approval_Count", json!(r.approval_history.len())),
                ("Latest_Approver", json!(latest.map(|a| a.approver.as_str()).unwrap_or(NOT_AVAILABLE))),
                ("Latest_Action", json!(latest.map(|a| a.action.as_str()).unwrap_or(NOT_AVAILABLE))),
                ("Export_Date", export_stamp(now)),
            ])
        })
        .collect())
}
