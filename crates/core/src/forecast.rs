//! Forecast result types.
//!
//! Results from the remote forecasting service and from the local synthetic
//! generator share one shape; [`ForecastProvenance`] records which path
//! produced them so callers never mistake synthetic numbers for real ones.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ForecastProvenance {
    Remote,
    Synthetic,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyProjection {
    pub date: NaiveDate,
    pub impressions: u64,
    pub reach: u64,
    pub frequency: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub total_reach: u64,
    pub total_impressions: u64,
    pub average_frequency: f64,
    #[serde(rename = "estimatedCPM")]
    pub estimated_cpm: f64,
    pub daily_projections: Vec<DailyProjection>,
    pub provenance: ForecastProvenance,
}

impl ForecastResult {
    pub fn is_synthetic(&self) -> bool {
        self.provenance == ForecastProvenance::Synthetic
    }
}
