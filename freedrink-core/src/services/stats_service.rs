// File: freedrink-core/src/services/stats_service.rs

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use freedrink_common::models::scan::ScanEvent;
use freedrink_common::models::stats::{
    RecentClaim, StatsBucket, StatsRange, StatsReport, StatsTotals,
};
use freedrink_common::traits::repository_traits::{
    CampaignRepository, ClaimRepository, ScanRepository,
};

use crate::utils::time::{bucket_hour, bucket_label, format_local, window_start};
use crate::Error;

pub const RECENT_LIMIT: i64 = 50;

/// Scan telemetry plus windowed dashboard aggregates.
pub struct StatsService {
    claim_repo: Arc<dyn ClaimRepository + Send + Sync>,
    scan_repo: Arc<dyn ScanRepository + Send + Sync>,
    campaign_repo: Arc<dyn CampaignRepository + Send + Sync>,
}

#[derive(Default)]
struct BucketCounts {
    scans: u64,
    signups: u64,
    redemptions: u64,
}

impl StatsService {
    pub fn new(
        claim_repo: Arc<dyn ClaimRepository + Send + Sync>,
        scan_repo: Arc<dyn ScanRepository + Send + Sync>,
        campaign_repo: Arc<dyn CampaignRepository + Send + Sync>,
    ) -> Self {
        Self {
            claim_repo,
            scan_repo,
            campaign_repo,
        }
    }

    pub async fn record_scan(&self, campaign_id: Uuid, source: &str) -> Result<(), Error> {
        let scan = ScanEvent {
            scan_id: Uuid::new_v4(),
            campaign_id,
            source: source.to_string(),
            scanned_at: Utc::now(),
        };
        self.scan_repo.insert_scan(&scan).await?;
        debug!(campaign_id = %campaign_id, source = %source, "scan recorded");
        Ok(())
    }

    /// Totals and an hour-of-day series for the window. Buckets key on local
    /// hour only, so a 7d/30d window folds events from different days into
    /// the same 24 slots; the range loses date resolution by design of the
    /// dashboard and is kept that way.
    pub async fn stats(&self, campaign_id: Uuid, range: StatsRange) -> Result<StatsReport, Error> {
        let now = Utc::now();
        let start = window_start(range, now);

        let scans = self
            .scan_repo
            .list_scans_in_window(campaign_id, start, now)
            .await?;
        let claims = self
            .claim_repo
            .list_claims_in_window(campaign_id, start, now)
            .await?;
        let redemptions = self
            .claim_repo
            .list_redemptions_in_window(start, now)
            .await?;

        let mut buckets: BTreeMap<u32, BucketCounts> = BTreeMap::new();
        for scan in &scans {
            buckets.entry(bucket_hour(scan.scanned_at)).or_default().scans += 1;
        }
        for claim in &claims {
            buckets.entry(bucket_hour(claim.created_at)).or_default().signups += 1;
        }
        for redemption in &redemptions {
            buckets
                .entry(bucket_hour(redemption.redeemed_at))
                .or_default()
                .redemptions += 1;
        }

        let series = buckets
            .into_iter()
            .map(|(hour, counts)| StatsBucket {
                t: bucket_label(hour),
                scans: counts.scans,
                signups: counts.signups,
                redemptions: counts.redemptions,
            })
            .collect();

        let signups = claims.len() as u64;
        let redeemed = redemptions.len() as u64;
        let conversion = if signups == 0 {
            0
        } else {
            ((redeemed as f64 / signups as f64) * 100.0).round() as u64
        };

        Ok(StatsReport {
            totals: StatsTotals {
                scans: scans.len() as u64,
                signups,
                redemptions: redeemed,
                conversion,
            },
            series,
        })
    }

    /// Latest claims in the window, newest first, capped at 50, annotated
    /// with their derived status and campaign name.
    pub async fn recent(
        &self,
        campaign_id: Uuid,
        range: StatsRange,
    ) -> Result<Vec<RecentClaim>, Error> {
        let now = Utc::now();
        let start = window_start(range, now);

        let claims = self
            .claim_repo
            .recent_claims(campaign_id, start, RECENT_LIMIT)
            .await?;

        let campaign_name = match self.campaign_repo.get_campaign(campaign_id).await? {
            Some(campaign) => campaign.name,
            None => campaign_id.to_string(),
        };

        Ok(claims
            .into_iter()
            .map(|claim| RecentClaim {
                time: format_local(claim.created_at),
                status: claim.status(),
                name: claim.name,
                phone: claim.phone,
                campaign_name: campaign_name.clone(),
            })
            .collect())
    }
}
