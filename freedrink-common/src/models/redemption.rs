// File: freedrink-common/src/models/redemption.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The recorded act of a staff member fulfilling a claim. Append-only;
/// exactly one row exists per redeemed claim.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Redemption {
    pub redemption_id: Uuid,
    pub claim_id: Uuid,
    pub staff_id: String,
    pub redeemed_at: DateTime<Utc>,
    pub device_lat: Option<f64>,
    pub device_lng: Option<f64>,
}
