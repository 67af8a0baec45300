// File: freedrink-core/src/repositories/postgres/campaigns.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use freedrink_common::error::Error;
use freedrink_common::models::campaign::Campaign;
use freedrink_common::traits::repository_traits::CampaignRepository;

#[derive(Clone)]
pub struct PostgresCampaignRepository {
    pool: Pool<Postgres>,
}

impl PostgresCampaignRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn campaign_from_row(row: &sqlx::postgres::PgRow) -> Result<Campaign, Error> {
    Ok(Campaign {
        campaign_id: row.try_get("campaign_id")?,
        name: row.try_get("name")?,
        free_item: row.try_get("free_item")?,
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl CampaignRepository for PostgresCampaignRepository {
    async fn create_campaign(&self, campaign: &Campaign) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO campaigns (
                campaign_id, name, free_item,
                start_time, end_time, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
            .bind(campaign.campaign_id)
            .bind(&campaign.name)
            .bind(&campaign.free_item)
            .bind(campaign.start_time)
            .bind(campaign.end_time)
            .bind(campaign.created_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_campaign(&self, campaign_id: Uuid) -> Result<Option<Campaign>, Error> {
        let row_opt = sqlx::query(
            r#"
            SELECT campaign_id, name, free_item,
                   start_time, end_time, created_at
            FROM campaigns
            WHERE campaign_id = $1
            "#,
        )
            .bind(campaign_id)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(row) = row_opt {
            Ok(Some(campaign_from_row(&row)?))
        } else {
            Ok(None)
        }
    }

    async fn list_campaigns(&self) -> Result<Vec<Campaign>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT campaign_id, name, free_item,
                   start_time, end_time, created_at
            FROM campaigns
            ORDER BY created_at ASC
            "#,
        )
            .fetch_all(&self.pool)
            .await?;

        let mut list = Vec::with_capacity(rows.len());
        for row in rows {
            list.push(campaign_from_row(&row)?);
        }
        Ok(list)
    }
}
