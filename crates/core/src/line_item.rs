use crate::inventory::InventorySource;
use crate::targeting::{DeviceType, GeoTarget, Platform};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Targeting scope attached to a single line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItemTargeting {
    pub geographic: Vec<GeoTarget>,
    pub platform: Platform,
    pub device_types: Vec<DeviceType>,
}

/// A planned line item. Produced once by the planner and submitted as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItemSpec {
    pub name: String,
    pub inventory_source: InventorySource,
    /// Catalog id of the inventory entry this item was planned from.
    pub inventory_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contextual_id: Option<String>,
    pub targeting: LineItemTargeting,
}

/// A line item the platform accepted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedLineItem {
    /// Identifier assigned by the platform, when it returned one.
    pub line_item_id: Option<String>,
    pub spec: LineItemSpec,
}

/// Outcome of a fully successful campaign submission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub campaign_id: String,
    pub line_items: Vec<SubmittedLineItem>,
}
