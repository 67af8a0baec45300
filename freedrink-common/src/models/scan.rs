// File: freedrink-common/src/models/scan.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Append-only telemetry: a guest opened the signup page from some source
/// (poster QR, table sticker, ...).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScanEvent {
    pub scan_id: Uuid,
    pub campaign_id: Uuid,
    pub source: String,
    pub scanned_at: DateTime<Utc>,
}
