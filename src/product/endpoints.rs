use actix_web::web::{Data, Json, Path};
use actix_web::{get, post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;

use super::{manager, Product, ProductId};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateProductBody {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProductBody {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ProductBody {
    pub fn render(product: Product) -> ProductBody {
        ProductBody {
            id: product.id,
            name: product.name,
            description: product.description,
            image_url: product.image_url,
            features: product.features,
            created_at: product.created_at,
        }
    }
}

#[post("/products")]
#[tracing::instrument(skip(db))]
pub async fn create_product(
    db: Data<Box<dyn Database>>,
    body: Json<CreateProductBody>,
) -> Result<Json<ProductBody>, Error> {
    let body = body.into_inner();

    let product = manager::create_product(
        &***db,
        body.name,
        body.description,
        body.image_url,
        body.features,
    )
    .await?;

    Ok(Json(ProductBody::render(product)))
}

#[get("/products")]
#[tracing::instrument(skip(db))]
pub async fn get_products(db: Data<Box<dyn Database>>) -> Result<Json<Vec<ProductBody>>, Error> {
    let products = manager::get_products(&***db).await?;

    let body = products.into_iter().map(ProductBody::render).collect();

    Ok(Json(body))
}

#[get("/products/{product_id}")]
#[tracing::instrument(skip(db))]
pub async fn get_product_by_id(
    db: Data<Box<dyn Database>>,
    params: Path<ProductId>,
) -> Result<Json<ProductBody>, Error> {
    let product_id = params.into_inner();

    let product = manager::get_product_by_id(&***db, product_id).await?;

    Ok(Json(ProductBody::render(product)))
}
