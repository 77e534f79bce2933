//! Asynchronous report jobs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle of a remote report job.
///
/// `Pending` is the only non-terminal state; once a job reaches
/// `Completed` or `Failed` it never moves again.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Pending,
    Completed,
    Failed,
}

impl ReportStatus {
    /// Map the platform's status string. Anything that is not a terminal
    /// status (IN_PROGRESS, QUEUED, ...) counts as pending.
    pub fn from_remote(status: &str) -> Self {
        match status.trim().to_ascii_uppercase().as_str() {
            "COMPLETED" | "SUCCESS" => ReportStatus::Completed,
            "FAILED" | "FAILURE" => ReportStatus::Failed,
            _ => ReportStatus::Pending,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReportStatus::Pending)
    }
}

/// Poll-side view of a report job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportJob {
    pub report_id: String,
    pub status: ReportStatus,
    pub attempts: u32,
}

impl ReportJob {
    pub fn new(report_id: impl Into<String>) -> Self {
        Self {
            report_id: report_id.into(),
            status: ReportStatus::Pending,
            attempts: 0,
        }
    }

    /// Record one status check. Terminal states are sticky.
    pub fn observe(&mut self, status: ReportStatus) -> ReportStatus {
        self.attempts += 1;
        if !self.status.is_terminal() {
            self.status = status;
        }
        self.status
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportType {
    Campaign,
    LineItem,
    Inventory,
}

/// Report job submission body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub report_type: ReportType,
    pub format: String,
    pub date_range: DateRange,
    pub dimensions: Vec<String>,
    pub metrics: Vec<String>,
    #[schema(value_type = Object)]
    pub filters: serde_json::Value,
}

impl ReportRequest {
    /// Standard daily delivery report for one campaign.
    pub fn campaign_performance(campaign_id: &str, date_range: DateRange) -> Self {
        Self {
            report_type: ReportType::Campaign,
            format: "JSON".to_string(),
            date_range,
            dimensions: vec!["date".into(), "campaign".into()],
            metrics: vec![
                "impressions".into(),
                "clicks".into(),
                "spend".into(),
                "conversions".into(),
            ],
            filters: serde_json::json!({ "campaignId": [campaign_id] }),
        }
    }
}
