use crate::database::Database;
use crate::error::Error;

use super::attributes::AttributePatches;
use super::{UserId, UserProfile};

#[tracing::instrument(skip(db))]
pub async fn create_user(
    db: &dyn Database,
    name: String,
    attributes: AttributePatches,
) -> Result<UserProfile, Error> {
    let mut user = UserProfile::new(name);
    attributes.apply_to(&mut user)?;

    db.users().insert_user(&user).await?;

    Ok(user)
}

#[tracing::instrument(skip(db))]
pub async fn get_users(db: &dyn Database) -> Result<Vec<UserProfile>, Error> {
    let users = db.users().fetch_users().await?;

    Ok(users)
}

#[tracing::instrument(skip(db))]
pub async fn get_user_by_id(db: &dyn Database, user_id: UserId) -> Result<UserProfile, Error> {
    let user = db
        .users()
        .fetch_user_by_id(user_id)
        .await?
        .ok_or(Error::UserNotFound { user_id })?;

    Ok(user)
}

#[tracing::instrument(skip(db))]
pub async fn update_user(
    db: &dyn Database,
    user_id: UserId,
    name: Option<String>,
    attributes: AttributePatches,
) -> Result<UserProfile, Error> {
    let mut user = get_user_by_id(db, user_id).await?;

    if let Some(name) = name {
        user.name = name;
    }
    attributes.apply_to(&mut user)?;

    db.users().update_user(user).await
}
