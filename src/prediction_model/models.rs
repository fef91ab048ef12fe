use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct PredictionRequestModel {
    pub current_date: NaiveDate,
    pub days: u32,
}

///
/// Network-wide withdrawal forecast produced by the backend model
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub total_predicted_amount: f64,
    pub message: String,
    pub daily_predictions: Vec<DailyPrediction>,
    pub prediction_date: String,
    pub days_requested: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPrediction {
    pub day_number: u32,
    pub date: String,
    pub predicted_withdrawal: f64,
    pub running_total: f64,
}
