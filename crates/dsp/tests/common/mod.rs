//! Shared fixtures for the HTTP-level tests.

#![allow(dead_code)]

use campaign_core::campaign::{Budget, BudgetType, CampaignDraft, GeoInput, Objective, Schedule, Targeting};
use campaign_core::config::{AppConfig, DspApiConfig, ReportPollConfig};
use campaign_core::inventory::InventoryCatalog;
use campaign_dsp::{Credentials, DspClient, SessionManager};
use chrono::NaiveDate;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN_PATH: &str = "/auth/o2/token";
pub const CLIENT_ID: &str = "amzn1.application-oa2-client.test";

pub fn credentials() -> Credentials {
    Credentials::new(CLIENT_ID, "client-secret", "Atzr|refresh-token")
}

pub fn api_config(server: &MockServer) -> DspApiConfig {
    DspApiConfig {
        auth_url: format!("{}{}", server.uri(), TOKEN_PATH),
        api_base_url: server.uri(),
        request_timeout_ms: 5_000,
    }
}

pub fn app_config(server: &MockServer) -> AppConfig {
    AppConfig {
        dsp: api_config(server),
        reports: ReportPollConfig {
            poll_interval_ms: 1,
            max_attempts: 30,
            request_timeout_secs: 5,
        },
        ..Default::default()
    }
}

pub fn session(server: &MockServer) -> Arc<SessionManager> {
    Arc::new(SessionManager::new(&api_config(server), credentials()).unwrap())
}

pub fn client(server: &MockServer) -> DspClient {
    DspClient::from_config(&app_config(server), credentials()).unwrap()
}

/// Token endpoint that always issues `token`, expected `times` times.
pub async fn mount_token(server: &MockServer, token: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token,
            "token_type": "bearer",
            "expires_in": 3600
        })))
        .expect(times)
        .mount(server)
        .await;
}

/// Three publishers, one contextual segment and the owned inventory, over
/// two postal codes.
pub fn draft(split_per_geo: bool) -> CampaignDraft {
    let catalog = InventoryCatalog::reference();
    CampaignDraft {
        advertiser_id: Some("adv-42".into()),
        name: "Spring CTV".into(),
        objective: Objective::Awareness,
        budget: Budget {
            amount: 15_000.0,
            budget_type: BudgetType::Lifetime,
        },
        schedule: Schedule {
            start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 11).unwrap(),
        },
        targeting: Targeting {
            geo_input: GeoInput {
                postal_codes: "90210, 10001".into(),
                dmas: String::new(),
            },
            split_per_geo,
            ..Default::default()
        },
        inventory: catalog.select(&["disney-ctv", "hulu-ctv", "max-ctv"], &["sports"], &["pva-ctv"]),
    }
}
