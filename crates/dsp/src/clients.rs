//! DSP client facade.
//! Bundles the session with the engine components so callers hold a single
//! handle per set of credentials.

use crate::forecast::ForecastEngine;
use crate::inventory::InventoryBrowser;
use crate::planner;
use crate::reports::ReportPoller;
use crate::session::{ApiRequest, Credentials, SessionManager};
use crate::submission::{CampaignStatus, SubmissionClient};
use crate::wire;
use campaign_core::account::{Advertiser, Entity, Profile};
use campaign_core::campaign::{CampaignDraft, Targeting};
use campaign_core::config::AppConfig;
use campaign_core::error::DspResult;
use campaign_core::forecast::ForecastResult;
use campaign_core::inventory::InventoryCatalog;
use campaign_core::line_item::{LineItemSpec, SubmissionReceipt};
use campaign_core::report::{DateRange, ReportRequest};
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

pub struct DspClient {
    session: Arc<SessionManager>,
    submission: SubmissionClient,
    forecasts: ForecastEngine,
    reports: ReportPoller,
    inventory: InventoryBrowser,
}

impl DspClient {
    pub fn from_config(config: &AppConfig, credentials: Credentials) -> DspResult<Self> {
        let session = Arc::new(SessionManager::new(&config.dsp, credentials)?);
        Ok(Self {
            submission: SubmissionClient::new(session.clone()),
            forecasts: ForecastEngine::new(session.clone()),
            reports: ReportPoller::new(session.clone(), &config.reports),
            inventory: InventoryBrowser::new(session.clone()),
            session,
        })
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    // ─── Account directory ──────────────────────────────────────────────────

    /// True when the credentials yield a token and the profile listing
    /// succeeds with it.
    pub async fn validate_credentials(&self) -> bool {
        if let Err(e) = self.session.acquire_token().await {
            warn!(client_id = %self.session.client_id(), error = %e, "Credential validation failed");
            return false;
        }
        match self.profiles().await {
            Ok(profiles) => {
                info!(profiles = profiles.len(), "Credentials validated");
                true
            }
            Err(e) => {
                warn!(error = %e, "Profile lookup failed during credential validation");
                false
            }
        }
    }

    pub async fn profiles(&self) -> DspResult<Vec<Profile>> {
        let profiles: Option<Vec<Profile>> = self
            .session
            .authorized_call(&ApiRequest::get(wire::PROFILES_PATH))
            .await?;
        Ok(profiles.unwrap_or_default())
    }

    pub async fn list_entities(&self) -> DspResult<Vec<Entity>> {
        Ok(self.profiles().await?.iter().map(Entity::from).collect())
    }

    pub async fn list_advertisers(&self) -> DspResult<Vec<Advertiser>> {
        Ok(self.profiles().await?.iter().map(Advertiser::from).collect())
    }

    // ─── Campaigns ──────────────────────────────────────────────────────────

    /// Line items `submit_campaign` would create, without calling the API.
    pub fn plan(&self, draft: &CampaignDraft) -> Vec<LineItemSpec> {
        planner::plan(draft)
    }

    pub async fn submit_campaign(&self, draft: &CampaignDraft) -> DspResult<SubmissionReceipt> {
        self.submission.submit(draft).await
    }

    pub async fn update_campaign(
        &self,
        campaign_id: &str,
        updates: serde_json::Value,
        scope: Option<String>,
    ) -> DspResult<serde_json::Value> {
        self.submission.update_campaign(campaign_id, updates, scope).await
    }

    pub async fn update_campaign_status(
        &self,
        campaign_id: &str,
        status: CampaignStatus,
        scope: Option<String>,
    ) -> DspResult<serde_json::Value> {
        self.submission
            .update_campaign_status(campaign_id, status, scope)
            .await
    }

    pub async fn get_campaign(&self, campaign_id: &str, scope: Option<String>) -> DspResult<serde_json::Value> {
        self.submission.get_campaign(campaign_id, scope).await
    }

    pub async fn list_campaigns(
        &self,
        filters: Vec<(String, String)>,
        scope: Option<String>,
    ) -> DspResult<serde_json::Value> {
        self.submission.list_campaigns(filters, scope).await
    }

    // ─── Forecasts & inventory ──────────────────────────────────────────────

    pub async fn forecast(&self, draft: &CampaignDraft) -> ForecastResult {
        self.forecasts.forecast(draft).await
    }

    pub async fn available_inventory(&self, targeting: &Targeting, scope: Option<String>) -> InventoryCatalog {
        self.inventory.available_inventory(targeting, scope).await
    }

    // ─── Reports ────────────────────────────────────────────────────────────

    pub async fn await_report<C>(
        &self,
        report_id: &str,
        scope: Option<String>,
        cancel: C,
    ) -> DspResult<serde_json::Value>
    where
        C: Future<Output = ()>,
    {
        self.reports.await_report(report_id, scope, cancel).await
    }

    /// Daily campaign metrics over `date_range`.
    pub async fn campaign_performance<C>(
        &self,
        campaign_id: &str,
        date_range: DateRange,
        scope: Option<String>,
        cancel: C,
    ) -> DspResult<serde_json::Value>
    where
        C: Future<Output = ()>,
    {
        let request = ReportRequest::campaign_performance(campaign_id, date_range);
        self.reports.run_report(&request, scope, cancel).await
    }
}
