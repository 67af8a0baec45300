// File: freedrink-core/src/services/claim_service.rs

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use freedrink_common::models::claim::{Claim, ClaimRequest, IssuedClaim};
use freedrink_common::traits::repository_traits::ClaimRepository;

use crate::crypto;
use crate::services::eligibility;
use crate::utils::time::local_day;
use crate::Error;

pub const DEFAULT_TOKEN_VALIDITY_HOURS: i64 = 6;

/// Issues claims: field validation, eligibility, identifier minting, insert.
pub struct ClaimService {
    claim_repo: Arc<dyn ClaimRepository + Send + Sync>,
    legal_age: i64,
    token_validity: Duration,
}

impl ClaimService {
    pub fn new(claim_repo: Arc<dyn ClaimRepository + Send + Sync>) -> Self {
        Self {
            claim_repo,
            legal_age: eligibility::DEFAULT_LEGAL_AGE,
            token_validity: Duration::hours(DEFAULT_TOKEN_VALIDITY_HOURS),
        }
    }

    pub fn with_legal_age(mut self, legal_age: i64) -> Self {
        self.legal_age = legal_age;
        self
    }

    pub fn with_token_validity(mut self, validity: Duration) -> Self {
        self.token_validity = validity;
        self
    }

    pub async fn issue(&self, req: &ClaimRequest) -> Result<IssuedClaim, Error> {
        let name = req.name.trim();
        let phone = req.phone.trim();
        if name.is_empty() {
            return Err(Error::Validation("name is required".to_string()));
        }
        if phone.is_empty() {
            return Err(Error::Validation("phone is required".to_string()));
        }
        if req.dob.trim().is_empty() {
            return Err(Error::Validation("dob is required".to_string()));
        }

        let now = Utc::now();
        let dob = eligibility::verify_age(&req.dob, self.legal_age, now)?;

        // Friendly pre-check; the store's (phone, claim_day) constraint is
        // the authoritative answer when two submissions race.
        let day = local_day(now);
        if self
            .claim_repo
            .find_claim_for_phone_on_day(phone, day)
            .await?
            .is_some()
        {
            return Err(Error::DuplicateToday);
        }

        let token = crypto::mint_token()?;
        let existing_codes = self.claim_repo.list_short_codes().await?;
        let short_code = crypto::mint_short_code(&existing_codes)?;

        let claim = Claim {
            claim_id: Uuid::new_v4(),
            campaign_id: req.campaign_id,
            name: name.to_string(),
            phone: phone.to_string(),
            dob,
            instagram_handle: req.instagram_handle.clone(),
            age_verified: true,
            token: token.clone(),
            short_code: short_code.clone(),
            token_expires: now + self.token_validity,
            created_at: now,
            claim_day: day,
            redeemed_at: None,
            redeemed_by: None,
            source: req.source.clone(),
        };
        self.claim_repo.insert_claim(&claim).await?;

        info!(
            claim_id = %claim.claim_id,
            campaign_id = %claim.campaign_id,
            source = %claim.source,
            "issued claim"
        );

        Ok(IssuedClaim {
            redeem_reference: format!("/staff.html?token={token}"),
            token,
            short_code,
        })
    }
}
