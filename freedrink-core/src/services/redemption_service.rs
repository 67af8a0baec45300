// File: freedrink-core/src/services/redemption_service.rs

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use freedrink_common::models::claim::{Claim, ClaimPreview, RedeemReceipt};
use freedrink_common::traits::repository_traits::{CampaignRepository, ClaimRepository};

use crate::Error;

/// Guards the issued→redeemed transition and serves the staff preview.
pub struct RedemptionService {
    claim_repo: Arc<dyn ClaimRepository + Send + Sync>,
    campaign_repo: Arc<dyn CampaignRepository + Send + Sync>,
}

impl RedemptionService {
    pub fn new(
        claim_repo: Arc<dyn ClaimRepository + Send + Sync>,
        campaign_repo: Arc<dyn CampaignRepository + Send + Sync>,
    ) -> Self {
        Self {
            claim_repo,
            campaign_repo,
        }
    }

    /// Look a claim up by its long token, falling back to the short code.
    async fn resolve(&self, token_or_code: &str) -> Result<Claim, Error> {
        let needle = token_or_code.trim();
        if needle.is_empty() {
            return Err(Error::Validation("token is required".to_string()));
        }
        if let Some(claim) = self.claim_repo.get_claim_by_token(needle).await? {
            return Ok(claim);
        }
        if let Some(claim) = self.claim_repo.get_claim_by_short_code(needle).await? {
            return Ok(claim);
        }
        Err(Error::NotFound)
    }

    /// Redeem a claim exactly once. Of any number of concurrent attempts on
    /// the same claim, one succeeds and the rest see `AlreadyRedeemed`.
    pub async fn redeem(
        &self,
        token_or_code: &str,
        staff_id: &str,
        device_lat: Option<f64>,
        device_lng: Option<f64>,
    ) -> Result<RedeemReceipt, Error> {
        let claim = self.resolve(token_or_code).await?;

        if claim.redeemed_at.is_some() {
            return Err(Error::AlreadyRedeemed);
        }

        let now = Utc::now();
        if now > claim.token_expires {
            return Err(Error::Expired);
        }

        let redeemed = self
            .claim_repo
            .redeem_claim(claim.claim_id, staff_id, now, device_lat, device_lng)
            .await?;

        match redeemed {
            Some(claim) => {
                info!(claim_id = %claim.claim_id, staff_id = %staff_id, "claim redeemed");
                Ok(RedeemReceipt {
                    name: claim.name,
                    redeemed_at: now,
                })
            }
            None => {
                // Lost the race to a concurrent scan.
                warn!(claim_id = %claim.claim_id, staff_id = %staff_id, "redeem attempt lost race");
                Err(Error::AlreadyRedeemed)
            }
        }
    }

    /// Staff confirmation screen: who signed up, for which campaign, and
    /// whether the claim is still live.
    pub async fn preview(&self, token_or_code: &str) -> Result<ClaimPreview, Error> {
        let claim = self.resolve(token_or_code).await?;

        let campaign_name = match self.campaign_repo.get_campaign(claim.campaign_id).await? {
            Some(campaign) => campaign.name,
            None => claim.campaign_id.to_string(),
        };

        Ok(ClaimPreview {
            name: claim.name,
            phone: claim.phone,
            campaign_name,
            token_expires: claim.token_expires,
            redeemed_at: claim.redeemed_at,
            created_at: claim.created_at,
        })
    }
}
