use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::{bson, Database};

use crate::database::MongoCampaignStore;
use crate::error::Error;

use super::{Campaign, CampaignId, CampaignStatus, CreativePersona};

const CAMPAIGNS: &str = "campaigns";

pub async fn initialize(db: &Database) -> Result<(), Error> {
    db.run_command(
        bson::doc! {
            "createIndexes": CAMPAIGNS,
            "indexes": [
                { "key": { "created_at": 1 }, "name": "by_created_at" },
                { "key": { "user_id": 1 }, "name": "by_user_id" },
                { "key": { "product_id": 1 }, "name": "by_product_id" },
            ]
        },
        None,
    )
    .await?;

    Ok(())
}

#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn insert_campaign(&self, campaign: &Campaign) -> Result<(), Error>;

    async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error>;

    async fn fetch_campaign_by_id(&self, campaign_id: CampaignId)
        -> Result<Option<Campaign>, Error>;

    async fn update_campaign_status(
        &self,
        campaign: Campaign,
        status: CampaignStatus,
    ) -> Result<Campaign, Error>;

    async fn update_campaign_persona(
        &self,
        campaign: Campaign,
        persona: CreativePersona,
    ) -> Result<Campaign, Error>;

    async fn update_campaign_prompt_and_status(
        &self,
        campaign: Campaign,
        prompt: String,
        status: CampaignStatus,
    ) -> Result<Campaign, Error>;
}

// applies `changes` only if the stored campaign is still at the version the
// caller holds
async fn update_if_unmodified(
    store: &MongoCampaignStore,
    campaign: &Campaign,
    mut changes: bson::Document,
) -> Result<DateTime<Utc>, Error> {
    let now = Utc::now();
    let old_modified_at = bson::DateTime::from_chrono(campaign.modified_at);
    changes.insert("modified_at", bson::DateTime::from_chrono(now));

    let result = store
        .update_one(
            bson::doc! { "_id": campaign.id, "modified_at": old_modified_at },
            bson::doc! { "$set": changes },
            None,
        )
        .await?;

    if result.matched_count == 0 {
        return Err(Error::ConcurrentModificationDetected);
    }

    Ok(now)
}

#[async_trait]
impl CampaignStore for MongoCampaignStore {
    #[tracing::instrument(skip(self))]
    async fn insert_campaign(&self, campaign: &Campaign) -> Result<(), Error> {
        self.insert_one(campaign, None).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error> {
        let options = FindOptions::builder()
            .sort(bson::doc! { "created_at": 1 })
            .build();

        let campaigns: Vec<Campaign> = self
            .find(bson::doc! {}, options)
            .await?
            .try_collect()
            .await?;

        Ok(campaigns)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error> {
        let campaign: Option<Campaign> = self
            .find_one(bson::doc! { "_id": campaign_id }, None)
            .await?;

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn update_campaign_status(
        &self,
        mut campaign: Campaign,
        status: CampaignStatus,
    ) -> Result<Campaign, Error> {
        let new_status = bson::to_bson(&status)?;

        let now =
            update_if_unmodified(self, &campaign, bson::doc! { "status": new_status }).await?;

        campaign.modified_at = now;
        campaign.status = status;

        Ok(campaign)
    }

    #[tracing::instrument(skip(self, persona))]
    async fn update_campaign_persona(
        &self,
        mut campaign: Campaign,
        persona: CreativePersona,
    ) -> Result<Campaign, Error> {
        let new_persona = bson::to_bson(&persona)?;

        let now = update_if_unmodified(
            self,
            &campaign,
            bson::doc! { "creative_persona": new_persona },
        )
        .await?;

        campaign.modified_at = now;
        campaign.creative_persona = Some(persona);

        Ok(campaign)
    }

    #[tracing::instrument(skip(self, prompt))]
    async fn update_campaign_prompt_and_status(
        &self,
        mut campaign: Campaign,
        prompt: String,
        status: CampaignStatus,
    ) -> Result<Campaign, Error> {
        let new_status = bson::to_bson(&status)?;

        let now = update_if_unmodified(
            self,
            &campaign,
            bson::doc! { "generated_prompt": prompt.as_str(), "status": new_status },
        )
        .await?;

        campaign.modified_at = now;
        campaign.generated_prompt = Some(prompt);
        campaign.status = status;

        Ok(campaign)
    }
}
