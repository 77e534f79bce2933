//! Submission client — creates a campaign and its planned line items, and
//! maintains existing campaigns.
//!
//! Line items are sent strictly one at a time in planner order. The first
//! failure stops the run; already-created resources are left in place and
//! the error reports how far the run got.

use crate::planner;
use crate::session::{ApiRequest, SessionManager};
use crate::wire::{self, CampaignCreated, CreateCampaignBody, CreateLineItemBody};
use campaign_core::campaign::CampaignDraft;
use campaign_core::error::{DspError, DspResult};
use campaign_core::line_item::{SubmissionReceipt, SubmittedLineItem};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Campaign states accepted by the status update call.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    Active,
    Paused,
    Archived,
}

pub struct SubmissionClient {
    session: Arc<SessionManager>,
}

impl SubmissionClient {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    /// Create the campaign, then every planned line item in order.
    pub async fn submit(&self, draft: &CampaignDraft) -> DspResult<SubmissionReceipt> {
        draft.validate()?;
        let scope = draft.advertiser_id.clone();
        let planned = planner::plan(draft);

        let body = serde_json::to_value(CreateCampaignBody::from_draft(draft))?;
        let created: CampaignCreated = self
            .session
            .authorized_call(&ApiRequest::post(wire::CAMPAIGNS_PATH, body).with_scope(scope.clone()))
            .await
            .map_err(|e| {
                error!(campaign = %draft.name, error = %e, "Campaign creation failed");
                e
            })?;
        let campaign_id = wire::id_to_string(&created.campaign_id);

        info!(
            campaign_id = %campaign_id,
            planned = planned.len(),
            "Campaign created, submitting line items"
        );

        let total = planned.len();
        let mut line_items = Vec::with_capacity(total);

        for spec in planned {
            let body = serde_json::to_value(CreateLineItemBody::new(&campaign_id, &spec))?;
            let request = ApiRequest::post(wire::LINE_ITEMS_PATH, body).with_scope(scope.clone());

            // Any success status means the item exists remotely, whatever the body says.
            match self.session.execute(&request).await {
                Ok(body) => {
                    metrics::counter!("dsp.line_items_created").increment(1);
                    line_items.push(SubmittedLineItem {
                        line_item_id: wire::created_line_item_id(&body),
                        spec,
                    });
                }
                Err(cause) => {
                    warn!(
                        campaign_id = %campaign_id,
                        line_item = %spec.name,
                        created = line_items.len(),
                        planned = total,
                        error = %cause,
                        "Line item submission failed, aborting remaining items"
                    );
                    return Err(DspError::Submission {
                        campaign_id,
                        created: line_items.len(),
                        planned: total,
                        cause: Box::new(cause),
                    });
                }
            }
        }

        info!(campaign_id = %campaign_id, line_items = line_items.len(), "Campaign submitted");

        Ok(SubmissionReceipt {
            campaign_id,
            line_items,
        })
    }

    pub async fn update_campaign(
        &self,
        campaign_id: &str,
        updates: serde_json::Value,
        scope: Option<String>,
    ) -> DspResult<serde_json::Value> {
        let request = ApiRequest::put(wire::campaign_path(campaign_id), updates).with_scope(scope);
        self.session.authorized_call(&request).await
    }

    pub async fn update_campaign_status(
        &self,
        campaign_id: &str,
        status: CampaignStatus,
        scope: Option<String>,
    ) -> DspResult<serde_json::Value> {
        self.update_campaign(campaign_id, serde_json::json!({ "status": status }), scope)
            .await
    }

    pub async fn get_campaign(&self, campaign_id: &str, scope: Option<String>) -> DspResult<serde_json::Value> {
        let request = ApiRequest::get(wire::campaign_path(campaign_id)).with_scope(scope);
        self.session.authorized_call(&request).await
    }

    pub async fn list_campaigns(
        &self,
        filters: Vec<(String, String)>,
        scope: Option<String>,
    ) -> DspResult<serde_json::Value> {
        let request = ApiRequest::get(wire::CAMPAIGNS_PATH)
            .with_query(filters)
            .with_scope(scope);
        self.session.authorized_call(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::json!({ "status": CampaignStatus::Paused }),
            serde_json::json!({ "status": "PAUSED" })
        );
    }
}
