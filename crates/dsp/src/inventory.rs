//! Inventory lookup with a reference-catalog fallback.

use crate::geo;
use crate::session::{ApiRequest, SessionManager};
use crate::wire::{self, TargetingPayload};
use campaign_core::campaign::Targeting;
use campaign_core::inventory::InventoryCatalog;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InventorySearchBody {
    targeting: TargetingPayload,
    inventory_types: [&'static str; 3],
}

pub struct InventoryBrowser {
    session: Arc<SessionManager>,
}

impl InventoryBrowser {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    /// Search remote inventory for the given targeting. Falls back to the
    /// built-in catalog when the search call fails.
    pub async fn available_inventory(&self, targeting: &Targeting, scope: Option<String>) -> InventoryCatalog {
        let geographic = geo::expand(targeting);
        let body = InventorySearchBody {
            targeting: TargetingPayload::for_campaign(targeting, &geographic),
            inventory_types: ["THIRD_PARTY", "CONTEXTUAL", "AMAZON_OO"],
        };

        let request = match serde_json::to_value(&body) {
            Ok(body) => ApiRequest::post(wire::INVENTORY_SEARCH_PATH, body).with_scope(scope),
            Err(e) => {
                warn!(error = %e, "Failed to encode inventory search, using reference catalog");
                return InventoryCatalog::reference();
            }
        };

        match self.session.authorized_call::<InventoryCatalog>(&request).await {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(error = %e, "Inventory search unavailable, using reference catalog");
                InventoryCatalog::reference()
            }
        }
    }
}
