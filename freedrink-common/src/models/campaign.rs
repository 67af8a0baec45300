// File: freedrink-common/src/models/campaign.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A promotional run at a single venue, e.g. "Student Night" handing out a
/// free shot. Created once at setup and treated as immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Campaign {
    pub campaign_id: Uuid,
    pub name: String,
    pub free_item: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
