// File: freedrink-core/src/test_utils/helpers.rs

use std::sync::Arc;

use chrono::{Duration, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use freedrink_common::models::campaign::Campaign;

use crate::repositories::memory::{
    MemoryCampaignRepository, MemoryClaimRepository, MemoryScanRepository, MemoryStore,
};
use crate::services::{ClaimService, RedemptionService, StatsService};
use crate::Error;

/// Everything a test needs: the shared store, direct repository handles for
/// seeding awkward states (expired tokens, yesterday's claims), and the
/// services wired on top.
pub struct MemoryStack {
    pub store: MemoryStore,
    pub campaign_repo: Arc<MemoryCampaignRepository>,
    pub claim_repo: Arc<MemoryClaimRepository>,
    pub scan_repo: Arc<MemoryScanRepository>,
    pub claims: ClaimService,
    pub redemptions: RedemptionService,
    pub stats: StatsService,
}

pub fn memory_stack() -> MemoryStack {
    let store = MemoryStore::new();
    let campaign_repo = Arc::new(MemoryCampaignRepository::new(store.clone()));
    let claim_repo = Arc::new(MemoryClaimRepository::new(store.clone()));
    let scan_repo = Arc::new(MemoryScanRepository::new(store.clone()));

    MemoryStack {
        claims: ClaimService::new(claim_repo.clone()),
        redemptions: RedemptionService::new(claim_repo.clone(), campaign_repo.clone()),
        stats: StatsService::new(claim_repo.clone(), scan_repo.clone(), campaign_repo.clone()),
        store,
        campaign_repo,
        claim_repo,
        scan_repo,
    }
}

pub fn sample_campaign() -> Campaign {
    let now = Utc::now();
    Campaign {
        campaign_id: Uuid::new_v4(),
        name: "Student Night".to_string(),
        free_item: "Free Shot".to_string(),
        start_time: now - Duration::hours(1),
        end_time: now + Duration::hours(6),
        created_at: now,
    }
}

/// Pool against a live test database; only the `#[ignore]`d Postgres tests
/// use this.
pub async fn create_test_db_pool() -> Result<Pool<Postgres>, Error> {
    let url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| "postgres://freedrink@localhost/freedrink_test".to_string());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await?;

    Ok(pool)
}
