//! OpenAPI specification and Swagger UI configuration.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "DSP Campaign Launcher API",
        version = "0.1.0",
        description = "Plans, forecasts and launches connected-TV campaigns on a demand-side platform.\n\nCovers credential checks, account listing, line-item planning, submission, forecasting and report retrieval.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Accounts", description = "Credential validation, entities and advertisers"),
        (name = "Campaigns", description = "Line-item planning, submission and forecasts"),
        (name = "Reports", description = "Report jobs and campaign performance"),
        (name = "Inventory", description = "Publisher deals, contextual segments and owned inventory"),
        (name = "Operations", description = "Health, readiness, and liveness probes"),
    ),
    paths(
        // Accounts
        crate::campaign_rest::handle_validate,
        crate::campaign_rest::handle_entities,
        crate::campaign_rest::handle_advertisers,
        // Campaigns
        crate::campaign_rest::handle_plan,
        crate::campaign_rest::handle_submit,
        crate::campaign_rest::handle_forecast,
        // Reports
        crate::campaign_rest::handle_report,
        crate::campaign_rest::handle_performance,
        // Inventory
        crate::campaign_rest::handle_inventory,
        // Operations
        crate::rest::health_check,
        crate::rest::readiness,
        crate::rest::liveness,
    ),
    components(schemas(
        // Campaign types
        campaign_core::campaign::CampaignDraft,
        campaign_core::campaign::Objective,
        campaign_core::campaign::Budget,
        campaign_core::campaign::BudgetType,
        campaign_core::campaign::Schedule,
        campaign_core::campaign::Targeting,
        campaign_core::campaign::GeoInput,
        campaign_core::targeting::Platform,
        campaign_core::targeting::DeviceType,
        campaign_core::targeting::GeoKind,
        campaign_core::targeting::GeoTarget,
        // Inventory types
        campaign_core::inventory::InventorySource,
        campaign_core::inventory::InventoryEntry,
        campaign_core::inventory::InventorySelection,
        campaign_core::inventory::InventoryCatalog,
        // Line items
        campaign_core::line_item::LineItemTargeting,
        campaign_core::line_item::LineItemSpec,
        campaign_core::line_item::SubmittedLineItem,
        campaign_core::line_item::SubmissionReceipt,
        // Forecasts & reports
        campaign_core::forecast::ForecastProvenance,
        campaign_core::forecast::DailyProjection,
        campaign_core::forecast::ForecastResult,
        campaign_core::report::DateRange,
        // Accounts
        campaign_core::account::Entity,
        campaign_core::account::Advertiser,
        // REST request/response types
        crate::campaign_rest::ValidateResponse,
        crate::campaign_rest::PlanResponse,
        crate::campaign_rest::PerformanceRequest,
        crate::campaign_rest::InventorySearchRequest,
        crate::rest::ErrorResponse,
        crate::rest::HealthResponse,
    ))
)]
pub struct ApiDoc;
