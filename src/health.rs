use actix_web::get;
use actix_web::web::{Data, Json};
use serde::{Deserialize, Serialize};

use crate::generation::GenerationService;

/// Reports how the server is configured, not whether its backends respond.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthBody {
    pub status: String,
    pub db: String,
    pub openai: bool,
}

#[get("/health")]
#[tracing::instrument(skip(generation))]
pub async fn health(generation: Data<GenerationService>) -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok".to_string(),
        db: "configured".to_string(),
        openai: generation.completions_enabled(),
    })
}
