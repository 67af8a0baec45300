// File: freedrink-core/src/repositories/postgres/scans.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use freedrink_common::error::Error;
use freedrink_common::models::scan::ScanEvent;
use freedrink_common::traits::repository_traits::ScanRepository;

#[derive(Clone)]
pub struct PostgresScanRepository {
    pool: Pool<Postgres>,
}

impl PostgresScanRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScanRepository for PostgresScanRepository {
    async fn insert_scan(&self, scan: &ScanEvent) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO scans (scan_id, campaign_id, source, scanned_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
            .bind(scan.scan_id)
            .bind(scan.campaign_id)
            .bind(&scan.source)
            .bind(scan.scanned_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_scans_in_window(
        &self,
        campaign_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ScanEvent>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT scan_id, campaign_id, source, scanned_at
            FROM scans
            WHERE campaign_id = $1
              AND scanned_at >= $2
              AND scanned_at <= $3
            ORDER BY scanned_at ASC
            "#,
        )
            .bind(campaign_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        let mut list = Vec::with_capacity(rows.len());
        for row in rows {
            list.push(ScanEvent {
                scan_id: row.try_get("scan_id")?,
                campaign_id: row.try_get("campaign_id")?,
                source: row.try_get("source")?,
                scanned_at: row.try_get("scanned_at")?,
            });
        }
        Ok(list)
    }
}
