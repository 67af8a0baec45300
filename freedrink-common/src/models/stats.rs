// File: freedrink-common/src/models/stats.rs

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::claim::ClaimStatus;

/// Dashboard time window. `Week` and `Month` are rolling windows ending now;
/// `Today` starts at local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatsRange {
    Today,
    Week,
    Month,
}

impl std::str::FromStr for StatsRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(StatsRange::Today),
            "7d" => Ok(StatsRange::Week),
            "30d" => Ok(StatsRange::Month),
            other => Err(Error::Parse(format!("unknown stats range '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsTotals {
    pub scans: u64,
    pub signups: u64,
    pub redemptions: u64,
    /// round(redemptions / signups * 100); 0 when there are no signups.
    pub conversion: u64,
}

/// One hour-of-day bucket ("0:00" .. "23:00"). Events from different days in
/// a multi-day window land in the same bucket; the series has at most 24
/// entries regardless of range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsBucket {
    pub t: String,
    pub scans: u64,
    pub signups: u64,
    pub redemptions: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsReport {
    pub totals: StatsTotals,
    pub series: Vec<StatsBucket>,
}

/// A row of the dashboard's recent-activity table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentClaim {
    pub time: String,
    pub name: String,
    pub phone: String,
    pub status: ClaimStatus,
    pub campaign_name: String,
}
