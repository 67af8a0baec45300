// File: freedrink-core/src/repositories/memory/claims.rs

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use freedrink_common::error::Error;
use freedrink_common::models::claim::Claim;
use freedrink_common::models::redemption::Redemption;
use freedrink_common::traits::repository_traits::ClaimRepository;

use super::MemoryStore;

#[derive(Clone)]
pub struct MemoryClaimRepository {
    store: MemoryStore,
}

impl MemoryClaimRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    fn claim_by_id(&self, claim_id: Uuid) -> Option<Claim> {
        self.store
            .claims
            .get(&claim_id)
            .map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl ClaimRepository for MemoryClaimRepository {
    async fn insert_claim(&self, claim: &Claim) -> Result<(), Error> {
        // Claiming the (phone, day) slot up front makes the dedup check and
        // the insert one step even when two submissions race.
        match self
            .store
            .day_index
            .entry((claim.phone.clone(), claim.claim_day))
        {
            Entry::Occupied(_) => return Err(Error::DuplicateToday),
            Entry::Vacant(slot) => {
                slot.insert(claim.claim_id);
            }
        }

        match self.store.code_index.entry(claim.short_code.to_uppercase()) {
            Entry::Occupied(_) => {
                self.store
                    .day_index
                    .remove(&(claim.phone.clone(), claim.claim_day));
                return Err(Error::Validation("short code already in use".to_string()));
            }
            Entry::Vacant(slot) => {
                slot.insert(claim.claim_id);
            }
        }

        self.store.claims.insert(claim.claim_id, claim.clone());
        self.store
            .token_index
            .insert(claim.token.clone(), claim.claim_id);
        Ok(())
    }

    async fn get_claim_by_token(&self, token: &str) -> Result<Option<Claim>, Error> {
        let claim_id = match self.store.token_index.get(token) {
            Some(entry) => *entry.value(),
            None => return Ok(None),
        };
        Ok(self.claim_by_id(claim_id))
    }

    async fn get_claim_by_short_code(&self, short_code: &str) -> Result<Option<Claim>, Error> {
        let claim_id = match self.store.code_index.get(&short_code.to_uppercase()) {
            Some(entry) => *entry.value(),
            None => return Ok(None),
        };
        Ok(self.claim_by_id(claim_id))
    }

    async fn find_claim_for_phone_on_day(
        &self,
        phone: &str,
        day: NaiveDate,
    ) -> Result<Option<Claim>, Error> {
        let claim_id = match self.store.day_index.get(&(phone.to_string(), day)) {
            Some(entry) => *entry.value(),
            None => return Ok(None),
        };
        Ok(self.claim_by_id(claim_id))
    }

    async fn list_short_codes(&self) -> Result<HashSet<String>, Error> {
        Ok(self
            .store
            .code_index
            .iter()
            .map(|entry| entry.key().clone())
            .collect())
    }

    async fn redeem_claim(
        &self,
        claim_id: Uuid,
        staff_id: &str,
        redeemed_at: DateTime<Utc>,
        device_lat: Option<f64>,
        device_lng: Option<f64>,
    ) -> Result<Option<Claim>, Error> {
        // The get_mut guard is exclusive for this claim, so the redeemed
        // check and the mutation below are indivisible: of any number of
        // racing attempts exactly one observes an unredeemed claim.
        let claim = match self.store.claims.get_mut(&claim_id) {
            Some(mut entry) => {
                if entry.redeemed_at.is_some() {
                    return Ok(None);
                }
                entry.redeemed_at = Some(redeemed_at);
                entry.redeemed_by = Some(staff_id.to_string());
                entry.value().clone()
            }
            None => return Ok(None),
        };

        let redemption = Redemption {
            redemption_id: Uuid::new_v4(),
            claim_id,
            staff_id: staff_id.to_string(),
            redeemed_at,
            device_lat,
            device_lng,
        };
        self.store
            .redemptions
            .insert(redemption.redemption_id, redemption);

        Ok(Some(claim))
    }

    async fn list_claims_in_window(
        &self,
        campaign_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Claim>, Error> {
        let mut list: Vec<Claim> = self
            .store
            .claims
            .iter()
            .filter(|entry| {
                let c = entry.value();
                c.campaign_id == campaign_id && c.created_at >= start && c.created_at <= end
            })
            .map(|entry| entry.value().clone())
            .collect();
        list.sort_by_key(|c| c.created_at);
        Ok(list)
    }

    async fn recent_claims(
        &self,
        campaign_id: Uuid,
        start: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Claim>, Error> {
        let mut list: Vec<Claim> = self
            .store
            .claims
            .iter()
            .filter(|entry| {
                let c = entry.value();
                c.campaign_id == campaign_id && c.created_at >= start
            })
            .map(|entry| entry.value().clone())
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list.truncate(limit.max(0) as usize);
        Ok(list)
    }

    async fn list_redemptions_in_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Redemption>, Error> {
        let mut list: Vec<Redemption> = self
            .store
            .redemptions
            .iter()
            .filter(|entry| {
                let r = entry.value();
                r.redeemed_at >= start && r.redeemed_at <= end
            })
            .map(|entry| entry.value().clone())
            .collect();
        list.sort_by_key(|r| r.redeemed_at);
        Ok(list)
    }

    async fn get_redemption_for_claim(&self, claim_id: Uuid) -> Result<Option<Redemption>, Error> {
        Ok(self
            .store
            .redemptions
            .iter()
            .find(|entry| entry.value().claim_id == claim_id)
            .map(|entry| entry.value().clone()))
    }
}
