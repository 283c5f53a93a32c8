use tracing::{error, info, warn};

use crate::campaign::{Campaign, CampaignId, CampaignStatus};
use crate::database::Database;
use crate::error::Error;
use crate::product::Product;
use crate::user::UserProfile;

use super::{prompts, CompletionRequest, GenerationService, TextGenerator};

/// Runs both generation calls for a campaign and stores what they produce.
///
/// The campaign is `processing` while the calls run and ends up either
/// `completed` or `failed`. A persona stored before a later failure is kept.
#[tracing::instrument(skip(db, generation))]
pub async fn generate_campaign_creative(
    db: &dyn Database,
    generation: &GenerationService,
    campaign_id: CampaignId,
) -> Result<Campaign, Error> {
    let campaign = db
        .campaigns()
        .fetch_campaign_by_id(campaign_id)
        .await?
        .ok_or(Error::CampaignNotFound { campaign_id })?;

    let generator = generation.generator()?;

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

    let mut campaign = db
        .campaigns()
        .update_campaign_status(campaign, CampaignStatus::Processing)
        .await?;

    let result = run_generation(
        db,
        generator,
        generation.model(),
        &user,
        &product,
        &mut campaign,
    )
    .await;

    match result {
        Ok(()) => {
            info!(campaign_id = %campaign.id, "campaign creative generated");
            Ok(campaign)
        }
        Err(err) => {
            warn!(campaign_id = %campaign.id, error = %err, "campaign generation failed");

            if let Err(status_err) = db
                .campaigns()
                .update_campaign_status(campaign, CampaignStatus::Failed)
                .await
            {
                error!(campaign_id = %campaign_id, error = %status_err, "could not mark campaign as failed");
            }

            Err(err)
        }
    }
}

async fn run_generation(
    db: &dyn Database,
    generator: &dyn TextGenerator,
    model: &str,
    user: &UserProfile,
    product: &Product,
    campaign: &mut Campaign,
) -> Result<(), Error> {
    let persona_request = CompletionRequest {
        model: model.to_string(),
        system: prompts::PERSONA_SYSTEM_PROMPT.to_string(),
        user: prompts::persona_brief(user, product, campaign),
        structured: true,
    };
    let persona = generator.complete(&persona_request).await?.into_persona()?;

    *campaign = db
        .campaigns()
        .update_campaign_persona(campaign.clone(), persona)
        .await?;

    let persona = campaign.creative_persona.as_ref().ok_or_else(|| {
        Error::ExistentialState(format!("campaign {} lost its persona", campaign.id))
    })?;
    let scene_request = CompletionRequest {
        model: model.to_string(),
        system: prompts::SCENE_SYSTEM_PROMPT.to_string(),
        user: prompts::scene_request(persona, campaign.duration_seconds),
        structured: false,
    };
    let prompt = generator.complete(&scene_request).await?.into_text();

    *campaign = db
        .campaigns()
        .update_campaign_prompt_and_status(campaign.clone(), prompt, CampaignStatus::Completed)
        .await?;

    Ok(())
}
