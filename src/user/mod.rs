use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::typedid::{TypedId, TypedIdMarker};

pub mod attributes;
pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

use self::attributes::{Demographics, Lifestyle, MediaPreferences, Psychographics};

pub type UserId = TypedId<UserProfile>;

// attribute sets are embedded, so a profile carries at most one of each and
// they go wherever the profile goes
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub modified_at: DateTime<Utc>,
    pub demographics: Option<Demographics>,
    pub psychographics: Option<Psychographics>,
    pub lifestyle: Option<Lifestyle>,
    pub media_preferences: Option<MediaPreferences>,
}

impl UserProfile {
    pub fn new(name: String) -> UserProfile {
        let now = Utc::now();
        UserProfile {
            id: UserId::new(),
            name,
            created_at: now,
            modified_at: now,
            demographics: None,
            psychographics: None,
            lifestyle: None,
            media_preferences: None,
        }
    }
}

impl TypedIdMarker for UserProfile {
    fn tag() -> &'static str {
        "USR"
    }
}
