use chrono::Utc;

use crate::database::Database;
use crate::error::Error;

use super::{Product, ProductId};

#[tracing::instrument(skip(db))]
pub async fn create_product(
    db: &dyn Database,
    name: String,
    description: String,
    image_url: Option<String>,
    features: Vec<String>,
) -> Result<Product, Error> {
    let product = Product {
        id: ProductId::new(),
        name,
        description,
        image_url,
        features,
        created_at: Utc::now(),
    };

    db.products().insert_product(&product).await?;

    Ok(product)
}

#[tracing::instrument(skip(db))]
pub async fn get_products(db: &dyn Database) -> Result<Vec<Product>, Error> {
    let products = db.products().fetch_products().await?;

    Ok(products)
}

#[tracing::instrument(skip(db))]
pub async fn get_product_by_id(db: &dyn Database, product_id: ProductId) -> Result<Product, Error> {
    let product = db
        .products()
        .fetch_product_by_id(product_id)
        .await?
        .ok_or(Error::ProductNotFound { product_id })?;

    Ok(product)
}
