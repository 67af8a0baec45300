// File: freedrink-core/src/repositories/memory/mod.rs

use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use uuid::Uuid;

use freedrink_common::models::campaign::Campaign;
use freedrink_common::models::claim::Claim;
use freedrink_common::models::redemption::Redemption;
use freedrink_common::models::scan::ScanEvent;

pub mod campaigns;
pub mod claims;
pub mod scans;

pub use campaigns::MemoryCampaignRepository;
pub use claims::MemoryClaimRepository;
pub use scans::MemoryScanRepository;

/// Process-local store backing the memory repositories. Cloning shares the
/// underlying maps, so every repository handed a clone sees the same data.
///
/// The shard locks of the maps carry the concurrency guarantees: a claim's
/// `get_mut` guard spans the redeemed check and the mutation, and the
/// `day_index` entry API makes the per-phone-per-day check atomic with the
/// insert.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub(crate) campaigns: Arc<DashMap<Uuid, Campaign>>,
    pub(crate) claims: Arc<DashMap<Uuid, Claim>>,
    pub(crate) redemptions: Arc<DashMap<Uuid, Redemption>>,
    pub(crate) scans: Arc<DashMap<Uuid, ScanEvent>>,
    /// token -> claim id
    pub(crate) token_index: Arc<DashMap<String, Uuid>>,
    /// uppercase short code -> claim id
    pub(crate) code_index: Arc<DashMap<String, Uuid>>,
    /// (phone, local calendar day) -> claim id
    pub(crate) day_index: Arc<DashMap<(String, NaiveDate), Uuid>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}
