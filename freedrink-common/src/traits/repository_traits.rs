// File: freedrink-common/src/traits/repository_traits.rs

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::Error;
use crate::models::campaign::Campaign;
use crate::models::claim::Claim;
use crate::models::redemption::Redemption;
use crate::models::scan::ScanEvent;

#[async_trait]
pub trait CampaignRepository: Send + Sync {
    async fn create_campaign(&self, campaign: &Campaign) -> Result<(), Error>;
    async fn get_campaign(&self, campaign_id: Uuid) -> Result<Option<Campaign>, Error>;
    async fn list_campaigns(&self) -> Result<Vec<Campaign>, Error>;
}

/// Claims and their redemption records live behind one repository so the
/// issued→redeemed transition can commit both sides as a single unit of work.
#[async_trait]
pub trait ClaimRepository: Send + Sync {
    /// Insert a freshly issued claim. The store enforces token, short-code
    /// and (phone, claim_day) uniqueness; a same-day duplicate surfaces as
    /// `Error::DuplicateToday` even when two submissions race.
    async fn insert_claim(&self, claim: &Claim) -> Result<(), Error>;

    async fn get_claim_by_token(&self, token: &str) -> Result<Option<Claim>, Error>;

    /// Short codes match case-insensitively.
    async fn get_claim_by_short_code(&self, short_code: &str) -> Result<Option<Claim>, Error>;

    async fn find_claim_for_phone_on_day(
        &self,
        phone: &str,
        day: NaiveDate,
    ) -> Result<Option<Claim>, Error>;

    /// Uniqueness set handed to short-code minting.
    async fn list_short_codes(&self) -> Result<HashSet<String>, Error>;

    /// Atomic issued→redeemed transition. Sets `redeemed_at`/`redeemed_by`
    /// only if the claim is still unredeemed, and appends the matching
    /// `Redemption` in the same unit of work. Returns the updated claim, or
    /// `None` when another attempt already won the race.
    async fn redeem_claim(
        &self,
        claim_id: Uuid,
        staff_id: &str,
        redeemed_at: DateTime<Utc>,
        device_lat: Option<f64>,
        device_lng: Option<f64>,
    ) -> Result<Option<Claim>, Error>;

    async fn list_claims_in_window(
        &self,
        campaign_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Claim>, Error>;

    /// Newest claims first, capped at `limit`.
    async fn recent_claims(
        &self,
        campaign_id: Uuid,
        start: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Claim>, Error>;

    /// Redemptions are windowed by their own timestamp, not the claim's.
    async fn list_redemptions_in_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Redemption>, Error>;

    async fn get_redemption_for_claim(&self, claim_id: Uuid) -> Result<Option<Redemption>, Error>;
}

#[async_trait]
pub trait ScanRepository: Send + Sync {
    async fn insert_scan(&self, scan: &ScanEvent) -> Result<(), Error>;

    async fn list_scans_in_window(
        &self,
        campaign_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ScanEvent>, Error>;
}
