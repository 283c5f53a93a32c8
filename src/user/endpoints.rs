use actix_web::web::{Data, Json, Path};
use actix_web::{get, patch, post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;

use super::attributes::{
    AttributePatches, Demographics, Lifestyle, MediaPreferences, Psychographics,
};
use super::{manager, UserId, UserProfile};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateUserBody {
    pub name: String,
    #[serde(flatten)]
    pub attributes: AttributePatches,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateUserBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub attributes: AttributePatches,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserBody {
    pub id: UserId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub demographics: Option<Demographics>,
    pub psychographics: Option<Psychographics>,
    pub lifestyle: Option<Lifestyle>,
    pub media_preferences: Option<MediaPreferences>,
}

impl UserBody {
    pub fn render(user: UserProfile) -> UserBody {
        UserBody {
            id: user.id,
            name: user.name,
            created_at: user.created_at,
            modified_at: user.modified_at,
            demographics: user.demographics,
            psychographics: user.psychographics,
            lifestyle: user.lifestyle,
            media_preferences: user.media_preferences,
        }
    }
}

#[post("/users")]
#[tracing::instrument(skip(db))]
pub async fn create_user(
    db: Data<Box<dyn Database>>,
    body: Json<CreateUserBody>,
) -> Result<Json<UserBody>, Error> {
    let body = body.into_inner();

    let user = manager::create_user(&***db, body.name, body.attributes).await?;

    Ok(Json(UserBody::render(user)))
}

#[get("/users")]
#[tracing::instrument(skip(db))]
pub async fn get_users(db: Data<Box<dyn Database>>) -> Result<Json<Vec<UserBody>>, Error> {
    let users = manager::get_users(&***db).await?;

    let body = users.into_iter().map(UserBody::render).collect();

    Ok(Json(body))
}

#[get("/users/{user_id}")]
#[tracing::instrument(skip(db))]
pub async fn get_user_by_id(
    db: Data<Box<dyn Database>>,
    params: Path<UserId>,
) -> Result<Json<UserBody>, Error> {
    let user_id = params.into_inner();

    let user = manager::get_user_by_id(&***db, user_id).await?;

    Ok(Json(UserBody::render(user)))
}

#[patch("/users/{user_id}")]
#[tracing::instrument(skip(db))]
pub async fn update_user(
    db: Data<Box<dyn Database>>,
    params: Path<UserId>,
    body: Json<UpdateUserBody>,
) -> Result<Json<UserBody>, Error> {
    let user_id = params.into_inner();
    let body = body.into_inner();

    let user = manager::update_user(&***db, user_id, body.name, body.attributes).await?;

    Ok(Json(UserBody::render(user)))
}
