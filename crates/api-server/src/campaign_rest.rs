//! Campaign launcher REST endpoints.

use crate::rest::{api_error, ApiResult, AppState, ErrorResponse};
use axum::extract::{Path, Query, State};
use axum::Json;
use campaign_core::account::{Advertiser, Entity};
use campaign_core::campaign::{CampaignDraft, Targeting};
use campaign_core::forecast::ForecastResult;
use campaign_core::inventory::InventoryCatalog;
use campaign_core::line_item::{LineItemSpec, SubmissionReceipt};
use campaign_core::report::DateRange;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

// ─── Accounts ───────────────────────────────────────────────────────────────

/// POST /v1/credentials/validate — Check the configured credentials.
#[utoipa::path(
    post,
    path = "/v1/credentials/validate",
    tag = "Accounts",
    responses((status = 200, description = "Validation outcome", body = ValidateResponse))
)]
pub async fn handle_validate(State(state): State<AppState>) -> Json<ValidateResponse> {
    Json(ValidateResponse {
        valid: state.client.validate_credentials().await,
    })
}

/// GET /v1/entities — Profiles visible to the credentials.
#[utoipa::path(
    get,
    path = "/v1/entities",
    tag = "Accounts",
    responses(
        (status = 200, description = "Entities", body = Vec<Entity>),
        (status = 502, description = "Advertising API error", body = ErrorResponse),
    )
)]
pub async fn handle_entities(State(state): State<AppState>) -> ApiResult<Vec<Entity>> {
    state.client.list_entities().await.map(Json).map_err(api_error)
}

/// GET /v1/advertisers — Advertiser view of the profiles.
#[utoipa::path(
    get,
    path = "/v1/advertisers",
    tag = "Accounts",
    responses(
        (status = 200, description = "Advertisers", body = Vec<Advertiser>),
        (status = 502, description = "Advertising API error", body = ErrorResponse),
    )
)]
pub async fn handle_advertisers(State(state): State<AppState>) -> ApiResult<Vec<Advertiser>> {
    state.client.list_advertisers().await.map(Json).map_err(api_error)
}

// ─── Campaigns ──────────────────────────────────────────────────────────────

/// POST /v1/campaigns/plan — Dry run: the line items a submission would create.
#[utoipa::path(
    post,
    path = "/v1/campaigns/plan",
    tag = "Campaigns",
    request_body = CampaignDraft,
    responses(
        (status = 200, description = "Planned line items", body = PlanResponse),
        (status = 400, description = "Draft rejected", body = ErrorResponse),
    )
)]
pub async fn handle_plan(State(state): State<AppState>, Json(draft): Json<CampaignDraft>) -> ApiResult<PlanResponse> {
    draft.validate().map_err(api_error)?;
    let line_items = state.client.plan(&draft);
    Ok(Json(PlanResponse {
        count: line_items.len(),
        line_items,
    }))
}

/// POST /v1/campaigns — Create the campaign and all planned line items.
#[utoipa::path(
    post,
    path = "/v1/campaigns",
    tag = "Campaigns",
    request_body = CampaignDraft,
    responses(
        (status = 200, description = "Campaign and line items created", body = SubmissionReceipt),
        (status = 400, description = "Draft rejected", body = ErrorResponse),
        (status = 502, description = "Submission failed or stopped early", body = ErrorResponse),
    )
)]
pub async fn handle_submit(
    State(state): State<AppState>,
    Json(draft): Json<CampaignDraft>,
) -> ApiResult<SubmissionReceipt> {
    let receipt = state.client.submit_campaign(&draft).await.map_err(api_error)?;
    info!(
        campaign_id = %receipt.campaign_id,
        line_items = receipt.line_items.len(),
        "Campaign submitted via REST"
    );
    Ok(Json(receipt))
}

/// POST /v1/forecast — Performance forecast for a draft.
#[utoipa::path(
    post,
    path = "/v1/forecast",
    tag = "Campaigns",
    request_body = CampaignDraft,
    responses(
        (status = 200, description = "Remote or synthetic forecast", body = ForecastResult),
        (status = 400, description = "Draft rejected", body = ErrorResponse),
    )
)]
pub async fn handle_forecast(
    State(state): State<AppState>,
    Json(draft): Json<CampaignDraft>,
) -> ApiResult<ForecastResult> {
    draft.validate().map_err(api_error)?;
    Ok(Json(state.client.forecast(&draft).await))
}

// ─── Reports ────────────────────────────────────────────────────────────────

/// GET /v1/reports/{id} — Wait for a report job and return its payload.
#[utoipa::path(
    get,
    path = "/v1/reports/{id}",
    tag = "Reports",
    params(("id" = String, Path, description = "Report job id"), ScopeQuery),
    responses(
        (status = 200, description = "Report payload", body = serde_json::Value),
        (status = 502, description = "Report failed", body = ErrorResponse),
        (status = 504, description = "Report still pending", body = ErrorResponse),
    )
)]
pub async fn handle_report(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
    Query(scope): Query<ScopeQuery>,
) -> ApiResult<serde_json::Value> {
    state
        .client
        .await_report(&report_id, scope.advertiser_id, tokio::time::sleep(state.report_timeout))
        .await
        .map(Json)
        .map_err(api_error)
}

/// POST /v1/campaigns/{id}/performance — Daily delivery metrics for a campaign.
#[utoipa::path(
    post,
    path = "/v1/campaigns/{id}/performance",
    tag = "Reports",
    params(("id" = String, Path, description = "Campaign id")),
    request_body = PerformanceRequest,
    responses(
        (status = 200, description = "Report payload", body = serde_json::Value),
        (status = 502, description = "Report failed", body = ErrorResponse),
        (status = 504, description = "Report still pending", body = ErrorResponse),
    )
)]
pub async fn handle_performance(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
    Json(request): Json<PerformanceRequest>,
) -> ApiResult<serde_json::Value> {
    state
        .client
        .campaign_performance(
            &campaign_id,
            request.date_range,
            request.advertiser_id,
            tokio::time::sleep(state.report_timeout),
        )
        .await
        .map(Json)
        .map_err(api_error)
}

// ─── Inventory ──────────────────────────────────────────────────────────────

/// POST /v1/inventory/search — Inventory available for the targeting.
#[utoipa::path(
    post,
    path = "/v1/inventory/search",
    tag = "Inventory",
    request_body = InventorySearchRequest,
    responses((status = 200, description = "Remote catalog, or the reference catalog on failure", body = InventoryCatalog))
)]
pub async fn handle_inventory(
    State(state): State<AppState>,
    Json(request): Json<InventorySearchRequest>,
) -> Json<InventoryCatalog> {
    Json(
        state
            .client
            .available_inventory(&request.targeting, request.advertiser_id)
            .await,
    )
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ValidateResponse {
    pub valid: bool,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub count: usize,
    pub line_items: Vec<LineItemSpec>,
}

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ScopeQuery {
    /// Advertiser profile to scope the call to.
    pub advertiser_id: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRequest {
    #[serde(default)]
    pub advertiser_id: Option<String>,
    pub date_range: DateRange,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventorySearchRequest {
    #[serde(default)]
    pub advertiser_id: Option<String>,
    #[serde(default)]
    pub targeting: Targeting,
}
