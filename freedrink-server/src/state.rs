// File: freedrink-server/src/state.rs

use std::sync::Arc;

use uuid::Uuid;

use freedrink_core::services::{ClaimService, RedemptionService, StatsService};

/// Shared handler state: the three services plus the campaign requests fall
/// back to when they don't name one.
#[derive(Clone)]
pub struct AppState {
    pub claims: Arc<ClaimService>,
    pub redemptions: Arc<RedemptionService>,
    pub stats: Arc<StatsService>,
    pub default_campaign_id: Uuid,
}
