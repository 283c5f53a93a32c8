use std::collections::BTreeMap;

use actix_web::web::{Data, Json, Path};
use actix_web::{get, post};
use chrono::{DateTime, Utc};
use futures::{stream, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;
use crate::generation::{self, GenerationService};
use crate::product::{ProductBody, ProductId};
use crate::user::{UserBody, UserId};

use super::{manager, Campaign, CampaignId, CampaignSettings, CampaignStatus, CreativePersona};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateCampaignBody {
    pub user_id: UserId,
    pub product_id: ProductId,
    #[serde(flatten)]
    pub settings: CampaignSettings,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CampaignBody {
    pub id: CampaignId,
    pub user: UserBody,
    pub product: ProductBody,
    pub objective: String,
    pub platform: String,
    pub duration_seconds: i32,
    pub brand_tone: Option<String>,
    pub cta_style: Option<String>,
    pub product_intent: BTreeMap<String, String>,
    pub status: CampaignStatus,
    pub creative_persona: Option<CreativePersona>,
    pub generated_prompt: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl CampaignBody {
    pub async fn render(db: &dyn Database, campaign: Campaign) -> Result<CampaignBody, Error> {
        let user = db
            .users()
            .fetch_user_by_id(campaign.user_id)
            .await?
            .ok_or_else(|| {
                Error::ExistentialState(format!(
                    "campaign {} references missing user {}",
                    campaign.id, campaign.user_id
                ))
            })?;
        let product = db
            .products()
            .fetch_product_by_id(campaign.product_id)
            .await?
            .ok_or_else(|| {
                Error::ExistentialState(format!(
                    "campaign {} references missing product {}",
                    campaign.id, campaign.product_id
                ))
            })?;

        Ok(CampaignBody {
            id: campaign.id,
            user: UserBody::render(user),
            product: ProductBody::render(product),
            objective: campaign.objective,
            platform: campaign.platform,
            duration_seconds: campaign.duration_seconds,
            brand_tone: campaign.brand_tone,
            cta_style: campaign.cta_style,
            product_intent: campaign.product_intent,
            status: campaign.status,
            creative_persona: campaign.creative_persona,
            generated_prompt: campaign.generated_prompt,
            created_at: campaign.created_at,
            modified_at: campaign.modified_at,
        })
    }
}

#[post("/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn create_campaign(
    db: Data<Box<dyn Database>>,
    body: Json<CreateCampaignBody>,
) -> Result<Json<CampaignBody>, Error> {
    let body = body.into_inner();

    let campaign =
        manager::create_campaign(&***db, body.user_id, body.product_id, body.settings).await?;

    Ok(Json(CampaignBody::render(&***db, campaign).await?))
}

#[get("/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn get_campaigns(db: Data<Box<dyn Database>>) -> Result<Json<Vec<CampaignBody>>, Error> {
    let campaigns = manager::get_campaigns(&***db).await?;

    let body = stream::iter(campaigns)
        .then(|campaign| CampaignBody::render(&***db, campaign))
        .try_collect()
        .await?;

    Ok(Json(body))
}

#[get("/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
) -> Result<Json<CampaignBody>, Error> {
    let campaign_id = params.into_inner();

    let campaign = manager::get_campaign_by_id(&***db, campaign_id).await?;

    Ok(Json(CampaignBody::render(&***db, campaign).await?))
}

#[post("/campaigns/{campaign_id}/generate")]
#[tracing::instrument(skip(db, generation))]
pub async fn generate_campaign(
    db: Data<Box<dyn Database>>,
    generation: Data<GenerationService>,
    params: Path<CampaignId>,
) -> Result<Json<CampaignBody>, Error> {
    let campaign_id = params.into_inner();

    let campaign =
        generation::manager::generate_campaign_creative(&***db, &generation, campaign_id).await?;

    Ok(Json(CampaignBody::render(&***db, campaign).await?))
}
