//! Targeting primitives shared by the planner and the wire payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Delivery platform selected for the whole campaign.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    ConnectedTv,
    Mobile,
    Desktop,
}

impl Platform {
    /// Device types a line item on this platform is allowed to serve on.
    pub fn device_types(&self) -> Vec<DeviceType> {
        match self {
            Platform::ConnectedTv => vec![DeviceType::ConnectedTv],
            Platform::Mobile | Platform::Desktop => {
                vec![DeviceType::Desktop, DeviceType::Mobile, DeviceType::Tablet]
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    ConnectedTv,
    Desktop,
    Mobile,
    Tablet,
}

/// Kind of an atomic geo-targeting unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
pub enum GeoKind {
    #[serde(rename = "ZIP_CODE")]
    PostalCode,
    #[serde(rename = "DMA")]
    Dma,
    #[serde(rename = "COUNTRY")]
    Country,
}

/// A single geographic targeting unit. Duplicates are allowed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeoTarget {
    #[serde(rename = "type")]
    pub kind: GeoKind,
    pub value: String,
    pub display_name: String,
}

impl GeoTarget {
    pub fn postal_code(code: &str) -> Self {
        Self {
            kind: GeoKind::PostalCode,
            value: code.to_string(),
            display_name: format!("ZIP {}", code),
        }
    }

    pub fn dma(dma: &str) -> Self {
        Self {
            kind: GeoKind::Dma,
            value: dma.to_string(),
            display_name: dma.to_string(),
        }
    }

    pub fn country(country: &str) -> Self {
        Self {
            kind: GeoKind::Country,
            value: country.to_string(),
            display_name: country.to_string(),
        }
    }
}
