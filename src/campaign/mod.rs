use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::product::ProductId;
use crate::typedid::{TypedId, TypedIdMarker};
use crate::user::UserId;

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type CampaignId = TypedId<Campaign>;

/// Structured creative direction produced by the first generation call.
pub type CreativePersona = serde_json::Map<String, serde_json::Value>;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Campaign {
    #[serde(rename = "_id")]
    pub id: CampaignId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub objective: String,
    pub platform: String,
    pub duration_seconds: i32,
    pub brand_tone: Option<String>,
    pub cta_style: Option<String>,
    pub product_intent: BTreeMap<String, String>,
    pub status: CampaignStatus,
    pub creative_persona: Option<CreativePersona>,
    pub generated_prompt: Option<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub modified_at: DateTime<Utc>,
}

impl TypedIdMarker for Campaign {
    fn tag() -> &'static str {
        "CPN"
    }
}

// pending/processing -> completed | failed; generating again starts over
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    /// Any other stored value, kept verbatim so such campaigns stay readable.
    #[serde(untagged)]
    Other(String),
}

/// The client-chosen parameters of a campaign.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CampaignSettings {
    pub objective: String,
    pub platform: String,
    pub duration_seconds: i32,
    pub brand_tone: Option<String>,
    pub cta_style: Option<String>,
    pub product_intent: BTreeMap<String, String>,
}

impl Default for CampaignSettings {
    fn default() -> CampaignSettings {
        CampaignSettings {
            objective: "awareness".to_string(),
            platform: "instagram".to_string(),
            duration_seconds: 15,
            brand_tone: None,
            cta_style: None,
            product_intent: BTreeMap::new(),
        }
    }
}
