//! Campaign draft — the operator-authored configuration that the planner,
//! submission client and forecast engine all consume.
//!
//! A draft is an immutable snapshot: every submission or forecast attempt
//! works from its own copy and nothing in the engine mutates it.

use crate::error::{DspError, DspResult};
use crate::inventory::InventorySelection;
use crate::targeting::Platform;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Campaign goal as understood by the advertising platform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Objective {
    Reach,
    Awareness,
    Consideration,
    Conversion,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetType {
    Lifetime,
    Daily,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Budget {
    /// Amount in account currency (USD).
    pub amount: f64,
    #[serde(rename = "type", default = "default_budget_type")]
    pub budget_type: BudgetType,
}

fn default_budget_type() -> BudgetType {
    BudgetType::Lifetime
}

/// Longest flight the engine accepts, in days.
pub const MAX_FLIGHT_DAYS: u32 = 1_830;

/// Flight dates. Both ends are calendar days.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Schedule {
    /// Whole days in the flight, rounded up. Never negative.
    pub fn flight_days(&self) -> u32 {
        let days = (self.end_date - self.start_date).num_days();
        days.max(0) as u32
    }
}

/// Raw, free-form geographic input exactly as the operator typed it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeoInput {
    /// Comma-separated postal codes.
    #[serde(default)]
    pub postal_codes: String,
    /// Comma-separated designated market areas.
    #[serde(default)]
    pub dmas: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Targeting {
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_platform")]
    pub platform: Platform,
    #[serde(default)]
    pub geo_input: GeoInput,
    /// Emit one publisher line item per geo target instead of one per publisher.
    #[serde(default)]
    pub split_per_geo: bool,
}

fn default_country() -> String {
    "US".to_string()
}

fn default_platform() -> Platform {
    Platform::ConnectedTv
}

impl Default for Targeting {
    fn default() -> Self {
        Self {
            country: default_country(),
            platform: default_platform(),
            geo_input: GeoInput::default(),
            split_per_geo: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDraft {
    /// Advertiser profile the campaign belongs to; sent as the API scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advertiser_id: Option<String>,
    pub name: String,
    pub objective: Objective,
    pub budget: Budget,
    pub schedule: Schedule,
    #[serde(default)]
    pub targeting: Targeting,
    #[serde(default)]
    pub inventory: InventorySelection,
}

impl CampaignDraft {
    /// Reject drafts whose flight is longer than [`MAX_FLIGHT_DAYS`].
    pub fn validate(&self) -> DspResult<()> {
        let days = self.schedule.flight_days();
        if days > MAX_FLIGHT_DAYS {
            return Err(DspError::InvalidDraft(format!(
                "flight of {} days exceeds the {}-day limit",
                days, MAX_FLIGHT_DAYS
            )));
        }
        Ok(())
    }
}
