use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::{bson, Database};

use crate::database::MongoUserStore;
use crate::error::Error;

use super::{UserId, UserProfile};

const USERS: &str = "users";

pub async fn initialize(db: &Database) -> Result<(), Error> {
    db.run_command(
        bson::doc! {
            "createIndexes": USERS,
            "indexes": [
                { "key": { "created_at": 1 }, "name": "by_created_at" },
            ]
        },
        None,
    )
    .await?;

    Ok(())
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: &UserProfile) -> Result<(), Error>;

    async fn fetch_users(&self) -> Result<Vec<UserProfile>, Error>;

    async fn fetch_user_by_id(&self, user_id: UserId) -> Result<Option<UserProfile>, Error>;

    /// Replaces the stored profile, provided it hasn't been modified since
    /// `user` was fetched.
    async fn update_user(&self, user: UserProfile) -> Result<UserProfile, Error>;
}

#[async_trait]
impl UserStore for MongoUserStore {
    #[tracing::instrument(skip(self))]
    async fn insert_user(&self, user: &UserProfile) -> Result<(), Error> {
        self.insert_one(user, None).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_users(&self) -> Result<Vec<UserProfile>, Error> {
        let options = FindOptions::builder()
            .sort(bson::doc! { "created_at": 1 })
            .build();

        let users: Vec<UserProfile> = self
            .find(bson::doc! {}, options)
            .await?
            .try_collect()
            .await?;

        Ok(users)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_user_by_id(&self, user_id: UserId) -> Result<Option<UserProfile>, Error> {
        let user: Option<UserProfile> = self.find_one(bson::doc! { "_id": user_id }, None).await?;

        Ok(user)
    }

    #[tracing::instrument(skip(self))]
    async fn update_user(&self, mut user: UserProfile) -> Result<UserProfile, Error> {
        let now = Utc::now();
        let old_modified_at = bson::DateTime::from_chrono(user.modified_at);
        user.modified_at = now;

        let result = self
            .replace_one(
                bson::doc! { "_id": user.id, "modified_at": old_modified_at },
                &user,
                None,
            )
            .await?;

        if result.matched_count == 0 {
            return Err(Error::ConcurrentModificationDetected);
        }

        Ok(user)
    }
}
