// File: freedrink-core/src/repositories/memory/campaigns.rs

use async_trait::async_trait;
use uuid::Uuid;

use freedrink_common::error::Error;
use freedrink_common::models::campaign::Campaign;
use freedrink_common::traits::repository_traits::CampaignRepository;

use super::MemoryStore;

#[derive(Clone)]
pub struct MemoryCampaignRepository {
    store: MemoryStore,
}

impl MemoryCampaignRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CampaignRepository for MemoryCampaignRepository {
    async fn create_campaign(&self, campaign: &Campaign) -> Result<(), Error> {
        self.store
            .campaigns
            .insert(campaign.campaign_id, campaign.clone());
        Ok(())
    }

    async fn get_campaign(&self, campaign_id: Uuid) -> Result<Option<Campaign>, Error> {
        Ok(self
            .store
            .campaigns
            .get(&campaign_id)
            .map(|entry| entry.value().clone()))
    }

    async fn list_campaigns(&self) -> Result<Vec<Campaign>, Error> {
        let mut list: Vec<Campaign> = self
            .store
            .campaigns
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        list.sort_by_key(|c| c.created_at);
        Ok(list)
    }
}
