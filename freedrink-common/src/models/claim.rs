// File: freedrink-common/src/models/claim.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A guest's single-use redemption right, created at signup.
///
/// `claim_day` is the local calendar day of creation and backs the
/// one-claim-per-phone-per-day constraint. `redeemed_at`/`redeemed_by` start
/// out unset and are written exactly once by the redemption transition.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Claim {
    pub claim_id: Uuid,
    pub campaign_id: Uuid,
    pub name: String,
    pub phone: String,
    pub dob: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram_handle: Option<String>,
    pub age_verified: bool,
    pub token: String,
    pub short_code: String,
    pub token_expires: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub claim_day: NaiveDate,
    pub redeemed_at: Option<DateTime<Utc>>,
    pub redeemed_by: Option<String>,
    pub source: String,
}

impl Claim {
    pub fn status(&self) -> ClaimStatus {
        if self.redeemed_at.is_some() {
            ClaimStatus::Redeemed
        } else {
            ClaimStatus::Unredeemed
        }
    }
}

/// Derived from `redeemed_at`; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimStatus {
    Redeemed,
    Unredeemed,
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClaimStatus::Redeemed => write!(f, "Redeemed"),
            ClaimStatus::Unredeemed => write!(f, "Unredeemed"),
        }
    }
}

/// Guest submission as it arrives from the signup form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimRequest {
    pub campaign_id: Uuid,
    pub name: String,
    pub phone: String,
    /// Date of birth as typed by the guest, `YYYY-MM-DD`. Parsed during the
    /// age check; anything unparseable fails closed.
    pub dob: String,
    pub instagram_handle: Option<String>,
    pub source: String,
}

/// What the guest gets back after a successful signup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedClaim {
    pub token: String,
    pub short_code: String,
    /// Relative staff redemption reference; the transport layer turns this
    /// into a full URL.
    pub redeem_reference: String,
}

/// Staff confirmation screen data, looked up by token or short code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimPreview {
    pub name: String,
    pub phone: String,
    pub campaign_name: String,
    pub token_expires: DateTime<Utc>,
    pub redeemed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Returned to staff after a successful redemption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemReceipt {
    pub name: String,
    pub redeemed_at: DateTime<Utc>,
}
