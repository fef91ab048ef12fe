use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use super::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefillStatus { Pending, Approved, Rejected, Completed, }

impl RefillStatus {
    ///
    /// Status only moves forward: pending to approved or rejected,
    /// approved to completed. Rejected and completed are terminal.
    ///
    pub fn can_transition_to(&self, next: RefillStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved)
                | (Self::Pending, Self::Rejected)
                | (Self::Approved, Self::Completed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Completed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }
}

impl Display for RefillStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RefillStatus {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "completed" => Ok(Self::Completed),
            _ => Err(Error::CouldNotParseStatus(s.to_string())),
        }
    }
}

/// One entry of a request's append-only approval log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    pub approver: String,
    pub role: String,
    pub action: String,
    pub timestamp: String,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefillRequest {
    pub request_id: String,
    pub atm_id: String,
    pub requested_amount: f64,
    pub requestor: String,
    pub status: RefillStatus,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub approval_history: Vec<ApprovalRecord>,
}

impl RefillRequest {
    pub fn latest_approval(&self) -> Option<&ApprovalRecord> {
        self.approval_history.last()
    }

    /// The comment, treating an empty string as absent
    pub fn comment_text(&self) -> Option<&str> {
        self.comment.as_deref().filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefillAction { Approve, Reject, }

#[derive(Debug, Serialize)]
pub struct CreateRefillRequestModel {
    pub atm_id: String,
    pub requested_amount: f64,
    pub comment: String,
}

#[derive(Debug, Serialize)]
pub struct RefillActionModel {
    pub action: RefillAction,
    pub comment: String,
}
