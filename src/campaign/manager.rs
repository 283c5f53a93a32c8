use chrono::Utc;

use crate::database::Database;
use crate::error::Error;
use crate::product::ProductId;
use crate::user::UserId;

use super::{Campaign, CampaignId, CampaignSettings, CampaignStatus};

#[tracing::instrument(skip(db))]
pub async fn create_campaign(
    db: &dyn Database,
    user_id: UserId,
    product_id: ProductId,
    settings: CampaignSettings,
) -> Result<Campaign, Error> {
    db.users()
        .fetch_user_by_id(user_id)
        .await?
        .ok_or(Error::UserNotFound { user_id })?;
    db.products()
        .fetch_product_by_id(product_id)
        .await?
        .ok_or(Error::ProductNotFound { product_id })?;

    let now = Utc::now();
    let campaign = Campaign {
        id: CampaignId::new(),
        user_id,
        product_id,
        objective: settings.objective,
        platform: settings.platform,
        duration_seconds: settings.duration_seconds,
        brand_tone: settings.brand_tone,
        cta_style: settings.cta_style,
        product_intent: settings.product_intent,
        status: CampaignStatus::Pending,
        creative_persona: None,
        generated_prompt: None,
        created_at: now,
        modified_at: now,
    };

    db.campaigns().insert_campaign(&campaign).await?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaigns(db: &dyn Database) -> Result<Vec<Campaign>, Error> {
    let campaigns = db.campaigns().fetch_campaigns().await?;

    Ok(campaigns)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: &dyn Database,
    campaign_id: CampaignId,
) -> Result<Campaign, Error> {
    let campaign = db
        .campaigns()
        .fetch_campaign_by_id(campaign_id)
        .await?
        .ok_or(Error::CampaignNotFound { campaign_id })?;

    Ok(campaign)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test::MockDatabase;
    use crate::product::Product;
    use crate::user::UserProfile;
    use std::sync::{Arc, Mutex};

    fn test_product(product_id: ProductId) -> Product {
        Product {
            id: product_id,
            name: "EcoSmart Water Bottle".into(),
            description: "A self-cleaning bottle.".into(),
            image_url: None,
            features: vec![],
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn can_create_campaign() {
        let mut db = MockDatabase::new();
        let test_user_id = UserId::new();
        let test_product_id = ProductId::new();
        db.users.on_fetch_user_by_id = Box::new(|user_id| {
            let mut user = UserProfile::new("Jane Doe".into());
            user.id = user_id;
            Ok(Some(user))
        });
        db.products.on_fetch_product_by_id =
            Box::new(|product_id| Ok(Some(test_product(product_id))));
        let called_insert = Arc::new(Mutex::new(false));
        let called_insert_clone = Arc::clone(&called_insert);
        db.campaigns.on_insert_campaign = Box::new(move |campaign| {
            *called_insert_clone.lock().unwrap() = true;
            assert_eq!(campaign.user_id, test_user_id);
            assert_eq!(campaign.product_id, test_product_id);
            assert_eq!(campaign.created_at, campaign.modified_at);
            Ok(())
        });

        let campaign = create_campaign(
            &db,
            test_user_id,
            test_product_id,
            CampaignSettings::default(),
        )
        .await
        .unwrap();

        assert_eq!(campaign.status, CampaignStatus::Pending);
        assert_eq!(campaign.objective, "awareness");
        assert_eq!(campaign.platform, "instagram");
        assert_eq!(campaign.duration_seconds, 15);
        assert_eq!(campaign.creative_persona, None);
        assert!(
            *called_insert.lock().unwrap(),
            "db.insert_campaign was not called"
        );
    }

    #[tokio::test]
    async fn create_campaign_with_unknown_user_inserts_nothing() {
        // insert_campaign panics if called
        let mut db = MockDatabase::new();
        db.users.on_fetch_user_by_id = Box::new(|_| Ok(None));
        db.products.on_fetch_product_by_id =
            Box::new(|product_id| Ok(Some(test_product(product_id))));

        let test_user_id = UserId::new();
        let result = create_campaign(
            &db,
            test_user_id,
            ProductId::new(),
            CampaignSettings::default(),
        )
        .await;

        assert_eq!(
            result.unwrap_err(),
            Error::UserNotFound {
                user_id: test_user_id
            }
        );
    }

    #[tokio::test]
    async fn create_campaign_with_unknown_product_inserts_nothing() {
        let mut db = MockDatabase::new();
        db.users.on_fetch_user_by_id = Box::new(|user_id| {
            let mut user = UserProfile::new("Jane Doe".into());
            user.id = user_id;
            Ok(Some(user))
        });
        db.products.on_fetch_product_by_id = Box::new(|_| Ok(None));

        let test_product_id = ProductId::new();
        let result = create_campaign(
            &db,
            UserId::new(),
            test_product_id,
            CampaignSettings::default(),
        )
        .await;

        assert_eq!(
            result.unwrap_err(),
            Error::ProductNotFound {
                product_id: test_product_id
            }
        );
    }

    #[tokio::test]
    async fn get_campaign_by_id_returns_error_if_doesnt_exist() {
        let mut db = MockDatabase::new();
        let test_campaign_id = CampaignId::new();
        let called_get_by_id = Arc::new(Mutex::new(false));
        let called_get_by_id_clone = Arc::clone(&called_get_by_id);
        db.campaigns.on_fetch_campaign_by_id = Box::new(move |campaign_id| {
            *called_get_by_id_clone.lock().unwrap() = true;
            assert_eq!(campaign_id, test_campaign_id);
            Ok(None)
        });

        let campaign_result = get_campaign_by_id(&db, test_campaign_id).await;

        assert_eq!(
            campaign_result.unwrap_err(),
            Error::CampaignNotFound {
                campaign_id: test_campaign_id
            }
        );
        assert!(
            *called_get_by_id.lock().unwrap(),
            "db.fetch_campaign_by_id was not called"
        );
    }
}
