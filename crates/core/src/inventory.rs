//! Inventory reference data and the operator's selection from it.
//!
//! Inventory records come from an external catalog and are never modified
//! by the engine. [`InventoryCatalog::reference`] carries the built-in
//! catalog, which also serves as the fallback when remote inventory search
//! is unavailable.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Where a line item's impressions come from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InventorySource {
    /// Third-party publisher deal.
    ThirdParty,
    /// Contextual content segment.
    Contextual,
    /// Platform-owned-and-operated placement.
    #[serde(rename = "AMAZON_OO")]
    AmazonOo,
}

/// One catalog record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntry {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contextual_id: Option<String>,
    /// Supply platform (e.g. MAGNITE, FREEWHEEL) for publisher deals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl InventoryEntry {
    fn deal(id: &str, name: &str, deal_id: &str, platform: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            deal_id: Some(deal_id.to_string()),
            contextual_id: None,
            platform: platform.map(str::to_string),
        }
    }

    fn contextual(id: &str, name: &str, contextual_id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            deal_id: None,
            contextual_id: Some(contextual_id.to_string()),
            platform: None,
        }
    }
}

/// The operator's picks, one list per inventory source.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventorySelection {
    #[serde(default)]
    pub publisher_deals: Vec<InventoryEntry>,
    #[serde(default)]
    pub contextual_segments: Vec<InventoryEntry>,
    #[serde(default)]
    pub owned_inventory: Vec<InventoryEntry>,
}

/// Full set of inventory an operator can choose from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryCatalog {
    #[serde(default)]
    pub third_party: Vec<InventoryEntry>,
    #[serde(default)]
    pub contextual: Vec<InventoryEntry>,
    #[serde(default, rename = "amazonOO")]
    pub owned: Vec<InventoryEntry>,
}

impl InventoryCatalog {
    /// Built-in CTV catalog.
    pub fn reference() -> Self {
        Self {
            third_party: vec![
                InventoryEntry::deal(
                    "disney-ctv",
                    "Disney",
                    "Magnite Streaming Web Video:Disney-DSE-IOA-Amazon-FY25",
                    Some("MAGNITE"),
                ),
                InventoryEntry::deal(
                    "hulu-ctv",
                    "Hulu",
                    "Magnite Streaming Web Video:Disney-ENT-IOA-Amazon-2024",
                    Some("MAGNITE"),
                ),
                InventoryEntry::deal(
                    "max-ctv",
                    "Max",
                    "Magnite Streaming Web Video:IOA-AA-MAX-OTT-187125",
                    Some("MAGNITE"),
                ),
                InventoryEntry::deal(
                    "peacock-ctv",
                    "Peacock",
                    "FreeWheel:NBC-DSP-00004",
                    Some("FREEWHEEL"),
                ),
                InventoryEntry::deal(
                    "roku-ctv",
                    "Roku",
                    "Magnite Streaming Web Video:604ea400-aa35-4719-9c16-113c2c6c69f0",
                    Some("MAGNITE"),
                ),
            ],
            contextual: vec![
                InventoryEntry::contextual("family-friendly", "Family Friendly", "618512476282000766"),
                InventoryEntry::contextual("sports", "Sports", "601140589569333667"),
                InventoryEntry::contextual("spanish-language", "Spanish Language", "641983497392560407"),
                InventoryEntry::contextual("comedy", "Comedy", "622624460583885731"),
                InventoryEntry::contextual("news", "News", "588676739747242257"),
            ],
            owned: vec![InventoryEntry::deal(
                "pva-ctv",
                "Prime Video Ads",
                "Prime Video ads:EXT8Z36T18A2M0G",
                None,
            )],
        }
    }

    /// Look up catalog entries by id, preserving the order of `ids`.
    /// Unknown ids are skipped.
    pub fn select(&self, publishers: &[&str], contextual: &[&str], owned: &[&str]) -> InventorySelection {
        fn pick(pool: &[InventoryEntry], ids: &[&str]) -> Vec<InventoryEntry> {
            ids.iter()
                .filter_map(|id| pool.iter().find(|e| e.id == *id).cloned())
                .collect()
        }

        InventorySelection {
            publisher_deals: pick(&self.third_party, publishers),
            contextual_segments: pick(&self.contextual, contextual),
            owned_inventory: pick(&self.owned, owned),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_catalog_shape() {
        let catalog = InventoryCatalog::reference();
        assert_eq!(catalog.third_party.len(), 5);
        assert_eq!(catalog.contextual.len(), 5);
        assert_eq!(catalog.owned.len(), 1);
        assert!(catalog.third_party.iter().all(|e| e.deal_id.is_some()));
        assert!(catalog.contextual.iter().all(|e| e.contextual_id.is_some()));
    }

    #[test]
    fn test_select_preserves_requested_order() {
        let catalog = InventoryCatalog::reference();
        let selection = catalog.select(&["roku-ctv", "disney-ctv", "missing"], &["news"], &[]);
        let names: Vec<_> = selection.publisher_deals.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Roku", "Disney"]);
        assert_eq!(selection.contextual_segments[0].contextual_id.as_deref(), Some("588676739747242257"));
        assert!(selection.owned_inventory.is_empty());
    }

    #[test]
    fn test_source_wire_names() {
        assert_eq!(serde_json::to_value(InventorySource::AmazonOo).unwrap(), "AMAZON_OO");
        assert_eq!(serde_json::to_value(InventorySource::ThirdParty).unwrap(), "THIRD_PARTY");
    }
}
