//! Advertising account profiles and the entity/advertiser views derived
//! from them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub account_type: Option<String>,
}

/// One entry of `GET /v2/profiles`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Numeric on the platform today, but treated as opaque.
    pub profile_id: serde_json::Value,
    #[serde(default)]
    pub account_info: Option<AccountInfo>,
}

impl Profile {
    pub fn id(&self) -> String {
        match &self.profile_id {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    fn account_name(&self) -> Option<&str> {
        self.account_info.as_ref().and_then(|a| a.name.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub entity_id: String,
    pub entity_name: String,
    pub entity_type: String,
}

impl From<&Profile> for Entity {
    fn from(profile: &Profile) -> Self {
        let id = profile.id();
        Self {
            entity_name: profile
                .account_name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("Profile {}", id)),
            entity_type: profile
                .account_info
                .as_ref()
                .and_then(|a| a.account_type.clone())
                .unwrap_or_else(|| "ADVERTISER".to_string()),
            entity_id: id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Advertiser {
    pub advertiser_id: String,
    pub advertiser_name: String,
    pub entity_id: String,
}

impl From<&Profile> for Advertiser {
    fn from(profile: &Profile) -> Self {
        let id = profile.id();
        Self {
            advertiser_name: profile
                .account_name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("Advertiser {}", id)),
            entity_id: id.clone(),
            advertiser_id: id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_views_with_defaults() {
        let profiles: Vec<Profile> = serde_json::from_str(
            r#"[
                {"profileId": 3001, "accountInfo": {"name": "Acme", "type": "AGENCY"}},
                {"profileId": "3002"}
            ]"#,
        )
        .unwrap();

        let entities: Vec<Entity> = profiles.iter().map(Entity::from).collect();
        assert_eq!(entities[0].entity_id, "3001");
        assert_eq!(entities[0].entity_name, "Acme");
        assert_eq!(entities[0].entity_type, "AGENCY");
        assert_eq!(entities[1].entity_name, "Profile 3002");
        assert_eq!(entities[1].entity_type, "ADVERTISER");

        let advertiser = Advertiser::from(&profiles[1]);
        assert_eq!(advertiser.advertiser_name, "Advertiser 3002");
        assert_eq!(advertiser.entity_id, "3002");
    }
}
