//! Line-item planner — turns a campaign draft into the exact, ordered set of
//! line items to submit.
//!
//! Output order is part of the contract: publisher deals first (selection
//! order, then geo order within a publisher when splitting), then contextual
//! segments, then owned inventory. Submission and partial-failure accounting
//! both rely on it.

use crate::geo;
use campaign_core::campaign::{CampaignDraft, Targeting};
use campaign_core::inventory::{InventoryEntry, InventorySource};
use campaign_core::line_item::{LineItemSpec, LineItemTargeting};
use campaign_core::targeting::GeoTarget;

pub fn plan(draft: &CampaignDraft) -> Vec<LineItemSpec> {
    let geo_targets = geo::expand(&draft.targeting);
    plan_with_targets(draft, &geo_targets)
}

/// Plan against an already-expanded geo target set.
pub fn plan_with_targets(draft: &CampaignDraft, geo_targets: &[GeoTarget]) -> Vec<LineItemSpec> {
    let inventory = &draft.inventory;
    let targeting = &draft.targeting;
    let split = targeting.split_per_geo && geo_targets.len() > 1;

    let mut items = Vec::with_capacity(planned_count(draft, geo_targets.len()));

    for publisher in &inventory.publisher_deals {
        if split {
            for target in geo_targets {
                items.push(line_item(
                    format!("{} - {}", publisher.name, target.display_name),
                    InventorySource::ThirdParty,
                    publisher,
                    targeting,
                    std::slice::from_ref(target),
                ));
            }
        } else {
            items.push(line_item(
                format!("{} - All Targets", publisher.name),
                InventorySource::ThirdParty,
                publisher,
                targeting,
                geo_targets,
            ));
        }
    }

    for segment in &inventory.contextual_segments {
        items.push(line_item(
            format!("Contextual - {}", segment.name),
            InventorySource::Contextual,
            segment,
            targeting,
            geo_targets,
        ));
    }

    for owned in &inventory.owned_inventory {
        items.push(line_item(
            format!("Amazon O&O - {}", owned.name),
            InventorySource::AmazonOo,
            owned,
            targeting,
            geo_targets,
        ));
    }

    items
}

/// Number of line items `plan` will produce for `geo_count` targets.
pub fn planned_count(draft: &CampaignDraft, geo_count: usize) -> usize {
    let inventory = &draft.inventory;
    let per_publisher = if draft.targeting.split_per_geo && geo_count > 1 {
        geo_count
    } else {
        1
    };
    inventory.publisher_deals.len() * per_publisher
        + inventory.contextual_segments.len()
        + inventory.owned_inventory.len()
}

fn line_item(
    name: String,
    source: InventorySource,
    entry: &InventoryEntry,
    targeting: &Targeting,
    geographic: &[GeoTarget],
) -> LineItemSpec {
    let (deal_id, contextual_id) = match source {
        InventorySource::Contextual => (None, entry.contextual_id.clone()),
        InventorySource::ThirdParty | InventorySource::AmazonOo => (entry.deal_id.clone(), None),
    };

    LineItemSpec {
        name,
        inventory_source: source,
        inventory_id: entry.id.clone(),
        deal_id,
        contextual_id,
        targeting: LineItemTargeting {
            geographic: geographic.to_vec(),
            platform: targeting.platform,
            device_types: targeting.platform.device_types(),
        },
    }
}
