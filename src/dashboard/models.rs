use std::fmt::Display;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NetworkSummary {
    pub machine_count: usize,
    pub total_cash: f64,
    pub high_risk_count: usize,
    /// Mean of each machine's own daily average
    pub average_daily_withdrawal: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CashBand { Red, Amber, Green, }

impl CashBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Amber => "amber",
            Self::Green => "green",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind { Success, Failure, }

///
/// Transient outcome message shown after a user action.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn success(title: &str, description: impl Into<String>) -> Self {
        Self { title: title.to_string(), description: description.into(), kind: NoticeKind::Success }
    }

    pub fn failure(title: &str, description: impl Into<String>) -> Self {
        Self { title: title.to_string(), description: description.into(), kind: NoticeKind::Failure }
    }

    pub fn from_error<E: Display + ?Sized>(title: &str, e: &E) -> Self {
        Self::failure(title, e.to_string())
    }

    pub fn is_failure(&self) -> bool {
        self.kind == NoticeKind::Failure
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let marker = match self.kind {
            NoticeKind::Success => "ok",
            NoticeKind::Failure => "error",
        };
        write!(f, "[{}] {}: {}", marker, self.title, self.description)
    }
}
