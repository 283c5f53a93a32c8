use mongodb::Collection;

use crate::campaign::db::CampaignStore;
use crate::campaign::Campaign;
use crate::error::Error;
use crate::product::db::ProductStore;
use crate::product::Product;
use crate::user::db::UserStore;
use crate::user::UserProfile;

pub type MongoUserStore = Collection<UserProfile>;
pub type MongoProductStore = Collection<Product>;
pub type MongoCampaignStore = Collection<Campaign>;

pub trait Database: Send + Sync {
    fn users(&self) -> &dyn UserStore;
    fn products(&self) -> &dyn ProductStore;
    fn campaigns(&self) -> &dyn CampaignStore;
}

#[derive(Debug, Clone)]
pub struct MongoDatabase {
    users: MongoUserStore,
    products: MongoProductStore,
    campaigns: MongoCampaignStore,
}

impl MongoDatabase {
    pub fn new(db: mongodb::Database) -> MongoDatabase {
        MongoDatabase {
            users: db.collection("users"),
            products: db.collection("products"),
            campaigns: db.collection("campaigns"),
        }
    }

    pub async fn initialize(db: &mongodb::Database) -> Result<(), Error> {
        crate::user::db::initialize(db).await?;
        crate::product::db::initialize(db).await?;
        crate::campaign::db::initialize(db).await?;

        Ok(())
    }
}

impl Database for MongoDatabase {
    fn users(&self) -> &dyn UserStore {
        &self.users
    }

    fn products(&self) -> &dyn ProductStore {
        &self.products
    }

    fn campaigns(&self) -> &dyn CampaignStore {
        &self.campaigns
    }
}
