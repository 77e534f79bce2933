//! API server — REST endpoints plus the Prometheus metrics exporter.

use crate::campaign_rest;
use crate::rest::{self, AppState};
use crate::swagger::ApiDoc;
use axum::routing::{get, post};
use axum::Router;
use campaign_core::config::AppConfig;
use campaign_dsp::DspClient;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub struct ApiServer {
    config: AppConfig,
    client: Arc<DspClient>,
}

impl ApiServer {
    pub fn new(config: AppConfig, client: Arc<DspClient>) -> Self {
        Self { config, client }
    }

    pub fn state(&self) -> AppState {
        AppState {
            client: self.client.clone(),
            node_id: format!("dsp-launcher-{}", std::process::id()),
            start_time: Instant::now(),
            report_timeout: Duration::from_secs(self.config.reports.request_timeout_secs),
        }
    }

    /// Start the HTTP REST server.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let app = router(self.state());

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the metrics server on a separate port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
        let handle = builder
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install_recorder()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");

        // Keep the handle alive
        std::mem::forget(handle);
        Ok(())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        // Accounts
        .route("/v1/credentials/validate", post(campaign_rest::handle_validate))
        .route("/v1/entities", get(campaign_rest::handle_entities))
        .route("/v1/advertisers", get(campaign_rest::handle_advertisers))
        // Campaigns
        .route("/v1/campaigns", post(campaign_rest::handle_submit))
        .route("/v1/campaigns/plan", post(campaign_rest::handle_plan))
        .route("/v1/campaigns/:id/performance", post(campaign_rest::handle_performance))
        .route("/v1/forecast", post(campaign_rest::handle_forecast))
        // Reports & inventory
        .route("/v1/reports/:id", get(campaign_rest::handle_report))
        .route("/v1/inventory/search", post(campaign_rest::handle_inventory))
        // Operational endpoints
        .route("/health", get(rest::health_check))
        .route("/ready", get(rest::readiness))
        .route("/live", get(rest::liveness))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
