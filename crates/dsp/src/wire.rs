//! Request and response payloads exchanged with the advertising API.
//!
//! Domain types stay free of platform quirks; everything here exists only
//! to match the remote contract (camelCase, trimmed geo objects, flattened
//! inventory lists, remote forecast field names).

use campaign_core::campaign::{Budget, CampaignDraft, Objective, Schedule, Targeting};
use campaign_core::forecast::{DailyProjection, ForecastProvenance, ForecastResult};
use campaign_core::inventory::{InventorySelection, InventorySource};
use campaign_core::line_item::LineItemSpec;
use campaign_core::targeting::{DeviceType, GeoKind, GeoTarget, Platform};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const PROFILES_PATH: &str = "/v2/profiles";
pub const CAMPAIGNS_PATH: &str = "/dsp/campaigns/v1/campaigns";
pub const LINE_ITEMS_PATH: &str = "/dsp/campaigns/v1/lineItems";
pub const FORECAST_PATH: &str = "/dsp/forecasting/v1/forecast";
pub const INVENTORY_SEARCH_PATH: &str = "/dsp/inventory/v1/search";
pub const REPORTS_PATH: &str = "/dsp/reports/v3/reports";

pub fn campaign_path(campaign_id: &str) -> String {
    format!("{}/{}", CAMPAIGNS_PATH, campaign_id)
}

pub fn report_path(report_id: &str) -> String {
    format!("{}/{}", REPORTS_PATH, report_id)
}

pub fn report_download_path(report_id: &str) -> String {
    format!("{}/{}/download", REPORTS_PATH, report_id)
}

// ─── Targeting ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GeoPayload {
    #[serde(rename = "type")]
    pub kind: GeoKind,
    pub value: String,
}

impl From<&GeoTarget> for GeoPayload {
    fn from(target: &GeoTarget) -> Self {
        Self {
            kind: target.kind,
            value: target.value.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TargetingPayload {
    pub geographic: Vec<GeoPayload>,
    pub platform: Platform,
    pub device_types: Vec<DeviceType>,
}

impl TargetingPayload {
    pub fn new(geographic: &[GeoTarget], platform: Platform) -> Self {
        Self {
            geographic: geographic.iter().map(GeoPayload::from).collect(),
            platform,
            device_types: platform.device_types(),
        }
    }

    pub fn for_campaign(targeting: &Targeting, geographic: &[GeoTarget]) -> Self {
        Self::new(geographic, targeting.platform)
    }
}

// ─── Campaigns & line items ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignBody<'a> {
    pub name: &'a str,
    pub objective: Objective,
    pub budget: &'a Budget,
    pub schedule: &'a Schedule,
    pub status: &'static str,
}

impl<'a> CreateCampaignBody<'a> {
    pub fn from_draft(draft: &'a CampaignDraft) -> Self {
        Self {
            name: &draft.name,
            objective: draft.objective,
            budget: &draft.budget,
            schedule: &draft.schedule,
            status: "ACTIVE",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Bidding {
    pub strategy: &'static str,
    #[serde(rename = "type")]
    pub bid_type: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLineItemBody<'a> {
    pub campaign_id: &'a str,
    pub name: &'a str,
    pub inventory_source: InventorySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contextual_id: Option<&'a str>,
    pub targeting: TargetingPayload,
    pub bidding: Bidding,
    pub status: &'static str,
}

impl<'a> CreateLineItemBody<'a> {
    pub fn new(campaign_id: &'a str, spec: &'a LineItemSpec) -> Self {
        Self {
            campaign_id,
            name: &spec.name,
            inventory_source: spec.inventory_source,
            deal_id: spec.deal_id.as_deref(),
            contextual_id: spec.contextual_id.as_deref(),
            targeting: TargetingPayload::new(&spec.targeting.geographic, spec.targeting.platform),
            bidding: Bidding {
                strategy: "AUTOMATIC",
                bid_type: "CPM",
            },
            status: "ACTIVE",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignCreated {
    #[serde(alias = "id")]
    pub campaign_id: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemCreated {
    #[serde(default, alias = "id")]
    pub line_item_id: Option<serde_json::Value>,
}

/// Line-item id from a creation response, if the body carries one.
pub fn created_line_item_id(body: &str) -> Option<String> {
    serde_json::from_str::<LineItemCreated>(body)
        .ok()
        .and_then(|created| created.line_item_id)
        .map(|id| id_to_string(&id))
}

/// Render an opaque identifier the way the platform echoes it.
pub fn id_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ─── Forecast ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ForecastInventoryType {
    ThirdPartyDeal,
    Contextual,
    AmazonOo,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastInventory {
    #[serde(rename = "type")]
    pub inventory_type: ForecastInventoryType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contextual_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

/// Flatten a selection into the forecast service's inventory list.
pub fn forecast_inventory(selection: &InventorySelection) -> Vec<ForecastInventory> {
    let publishers = selection.publisher_deals.iter().map(|p| ForecastInventory {
        inventory_type: ForecastInventoryType::ThirdPartyDeal,
        deal_id: p.deal_id.clone(),
        contextual_id: None,
        platform: p.platform.clone(),
    });
    let contextual = selection.contextual_segments.iter().map(|c| ForecastInventory {
        inventory_type: ForecastInventoryType::Contextual,
        deal_id: None,
        contextual_id: c.contextual_id.clone(),
        platform: None,
    });
    let owned = selection.owned_inventory.iter().map(|o| ForecastInventory {
        inventory_type: ForecastInventoryType::AmazonOo,
        deal_id: o.deal_id.clone(),
        contextual_id: None,
        platform: None,
    });
    publishers.chain(contextual).chain(owned).collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advertiser_id: Option<String>,
    pub budget: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub targeting: TargetingPayload,
    pub inventory: Vec<ForecastInventory>,
}

impl ForecastRequestBody {
    pub fn from_draft(draft: &CampaignDraft, geographic: &[GeoTarget]) -> Self {
        Self {
            advertiser_id: draft.advertiser_id.clone(),
            budget: draft.budget.amount,
            start_date: draft.schedule.start_date,
            end_date: draft.schedule.end_date,
            targeting: TargetingPayload::for_campaign(&draft.targeting, geographic),
            inventory: forecast_inventory(&draft.inventory),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteDailyBreakdown {
    pub date: NaiveDate,
    #[serde(default)]
    pub impressions: f64,
    #[serde(default)]
    pub reach: f64,
    #[serde(default)]
    pub frequency: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteForecast {
    pub projected_reach: f64,
    pub projected_impressions: f64,
    pub projected_frequency: f64,
    #[serde(rename = "estimatedCPM")]
    pub estimated_cpm: f64,
    #[serde(default)]
    pub daily_breakdown: Option<Vec<RemoteDailyBreakdown>>,
}

impl From<RemoteForecast> for ForecastResult {
    fn from(remote: RemoteForecast) -> Self {
        Self {
            total_reach: remote.projected_reach.max(0.0) as u64,
            total_impressions: remote.projected_impressions.max(0.0) as u64,
            average_frequency: remote.projected_frequency,
            estimated_cpm: remote.estimated_cpm,
            daily_projections: remote
                .daily_breakdown
                .unwrap_or_default()
                .into_iter()
                .map(|day| DailyProjection {
                    date: day.date,
                    impressions: day.impressions.max(0.0) as u64,
                    reach: day.reach.max(0.0) as u64,
                    frequency: day.frequency,
                })
                .collect(),
            provenance: ForecastProvenance::Remote,
        }
    }
}

// ─── Reports ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSubmitted {
    #[serde(alias = "id")]
    pub report_id: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportStatusBody {
    #[serde(default)]
    pub status: String,
}
