use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::{bson, Database};

use crate::database::MongoProductStore;
use crate::error::Error;

use super::{Product, ProductId};

const PRODUCTS: &str = "products";

pub async fn initialize(db: &Database) -> Result<(), Error> {
    db.run_command(
        bson::doc! {
            "createIndexes": PRODUCTS,
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
pub trait ProductStore: Send + Sync {
    async fn insert_product(&self, product: &Product) -> Result<(), Error>;

    async fn fetch_products(&self) -> Result<Vec<Product>, Error>;

    async fn fetch_product_by_id(&self, product_id: ProductId) -> Result<Option<Product>, Error>;
}

#[async_trait]
impl ProductStore for MongoProductStore {
    #[tracing::instrument(skip(self))]
    async fn insert_product(&self, product: &Product) -> Result<(), Error> {
        self.insert_one(product, None).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_products(&self) -> Result<Vec<Product>, Error> {
        let options = FindOptions::builder()
            .sort(bson::doc! { "created_at": 1 })
            .build();

        let products: Vec<Product> = self
            .find(bson::doc! {}, options)
            .await?
            .try_collect()
            .await?;

        Ok(products)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_product_by_id(&self, product_id: ProductId) -> Result<Option<Product>, Error> {
        let product: Option<Product> = self
            .find_one(bson::doc! { "_id": product_id }, None)
            .await?;

        Ok(product)
    }
}
