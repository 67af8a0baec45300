// File: freedrink-core/src/repositories/postgres/claims.rs

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use freedrink_common::error::Error;
use freedrink_common::models::claim::Claim;
use freedrink_common::models::redemption::Redemption;
use freedrink_common::traits::repository_traits::ClaimRepository;

const CLAIM_COLUMNS: &str = r#"
    claim_id, campaign_id, name, phone, dob,
    instagram_handle, age_verified, token, short_code,
    token_expires, created_at, claim_day,
    redeemed_at, redeemed_by, source
"#;

#[derive(Clone)]
pub struct PostgresClaimRepository {
    pool: Pool<Postgres>,
}

impl PostgresClaimRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn claim_from_row(row: &sqlx::postgres::PgRow) -> Result<Claim, Error> {
    Ok(Claim {
        claim_id: row.try_get("claim_id")?,
        campaign_id: row.try_get("campaign_id")?,
        name: row.try_get("name")?,
        phone: row.try_get("phone")?,
        dob: row.try_get("dob")?,
        instagram_handle: row.try_get("instagram_handle")?,
        age_verified: row.try_get("age_verified")?,
        token: row.try_get("token")?,
        short_code: row.try_get("short_code")?,
        token_expires: row.try_get("token_expires")?,
        created_at: row.try_get("created_at")?,
        claim_day: row.try_get("claim_day")?,
        redeemed_at: row.try_get("redeemed_at")?,
        redeemed_by: row.try_get("redeemed_by")?,
        source: row.try_get("source")?,
    })
}

fn redemption_from_row(row: &sqlx::postgres::PgRow) -> Result<Redemption, Error> {
    Ok(Redemption {
        redemption_id: row.try_get("redemption_id")?,
        claim_id: row.try_get("claim_id")?,
        staff_id: row.try_get("staff_id")?,
        redeemed_at: row.try_get("redeemed_at")?,
        device_lat: row.try_get("device_lat")?,
        device_lng: row.try_get("device_lng")?,
    })
}

#[async_trait]
impl ClaimRepository for PostgresClaimRepository {
    async fn insert_claim(&self, claim: &Claim) -> Result<(), Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO claims (
                claim_id, campaign_id, name, phone, dob,
                instagram_handle, age_verified, token, short_code,
                token_expires, created_at, claim_day,
                redeemed_at, redeemed_by, source
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15)
            "#,
        )
            .bind(claim.claim_id)
            .bind(claim.campaign_id)
            .bind(&claim.name)
            .bind(&claim.phone)
            .bind(claim.dob)
            .bind(&claim.instagram_handle)
            .bind(claim.age_verified)
            .bind(&claim.token)
            .bind(&claim.short_code)
            .bind(claim.token_expires)
            .bind(claim.created_at)
            .bind(claim.claim_day)
            .bind(claim.redeemed_at)
            .bind(&claim.redeemed_by)
            .bind(&claim.source)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                // 23505 = unique_violation; the (phone, claim_day) constraint
                // is the dedup backstop when two submissions race.
                // 23503 = foreign_key_violation on the campaign reference.
                if let Some(db_err) = e.as_database_error() {
                    match db_err.code().as_deref() {
                        Some("23505")
                            if db_err.constraint() == Some("claims_phone_claim_day_key") =>
                        {
                            return Err(Error::DuplicateToday);
                        }
                        Some("23503") => {
                            return Err(Error::Validation("unknown campaign".to_string()));
                        }
                        _ => {}
                    }
                }
                Err(Error::Database(e))
            }
        }
    }

    async fn get_claim_by_token(&self, token: &str) -> Result<Option<Claim>, Error> {
        let row_opt = sqlx::query(&format!(
            "SELECT {CLAIM_COLUMNS} FROM claims WHERE token = $1"
        ))
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(row) = row_opt {
            Ok(Some(claim_from_row(&row)?))
        } else {
            Ok(None)
        }
    }

    async fn get_claim_by_short_code(&self, short_code: &str) -> Result<Option<Claim>, Error> {
        let row_opt = sqlx::query(&format!(
            "SELECT {CLAIM_COLUMNS} FROM claims WHERE short_code = UPPER($1)"
        ))
            .bind(short_code)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(row) = row_opt {
            Ok(Some(claim_from_row(&row)?))
        } else {
            Ok(None)
        }
    }

    async fn find_claim_for_phone_on_day(
        &self,
        phone: &str,
        day: NaiveDate,
    ) -> Result<Option<Claim>, Error> {
        let row_opt = sqlx::query(&format!(
            "SELECT {CLAIM_COLUMNS} FROM claims WHERE phone = $1 AND claim_day = $2"
        ))
            .bind(phone)
            .bind(day)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(row) = row_opt {
            Ok(Some(claim_from_row(&row)?))
        } else {
            Ok(None)
        }
    }

    async fn list_short_codes(&self) -> Result<HashSet<String>, Error> {
        let rows = sqlx::query("SELECT short_code FROM claims")
            .fetch_all(&self.pool)
            .await?;

        let mut codes = HashSet::with_capacity(rows.len());
        for row in rows {
            codes.insert(row.try_get("short_code")?);
        }
        Ok(codes)
    }

    async fn redeem_claim(
        &self,
        claim_id: Uuid,
        staff_id: &str,
        redeemed_at: DateTime<Utc>,
        device_lat: Option<f64>,
        device_lng: Option<f64>,
    ) -> Result<Option<Claim>, Error> {
        let mut tx = self.pool.begin().await?;

        // Conditional update: only an unredeemed row transitions, so of any
        // number of racing attempts exactly one gets the row back.
        let row_opt = sqlx::query(&format!(
            r#"
            UPDATE claims
            SET redeemed_at = $1,
                redeemed_by = $2
            WHERE claim_id = $3
              AND redeemed_at IS NULL
            RETURNING {CLAIM_COLUMNS}
            "#
        ))
            .bind(redeemed_at)
            .bind(staff_id)
            .bind(claim_id)
            .fetch_optional(&mut *tx)
            .await?;

        let claim = if let Some(row) = row_opt {
            claim_from_row(&row)?
        } else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query(
            r#"
            INSERT INTO redemptions (
                redemption_id, claim_id, staff_id,
                redeemed_at, device_lat, device_lng
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
            .bind(Uuid::new_v4())
            .bind(claim_id)
            .bind(staff_id)
            .bind(redeemed_at)
            .bind(device_lat)
            .bind(device_lng)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(claim))
    }

    async fn list_claims_in_window(
        &self,
        campaign_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Claim>, Error> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {CLAIM_COLUMNS}
            FROM claims
            WHERE campaign_id = $1
              AND created_at >= $2
              AND created_at <= $3
            ORDER BY created_at ASC
            "#
        ))
            .bind(campaign_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        let mut list = Vec::with_capacity(rows.len());
        for row in rows {
            list.push(claim_from_row(&row)?);
        }
        Ok(list)
    }

    async fn recent_claims(
        &self,
        campaign_id: Uuid,
        start: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Claim>, Error> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {CLAIM_COLUMNS}
            FROM claims
            WHERE campaign_id = $1
              AND created_at >= $2
            ORDER BY created_at DESC
            LIMIT $3
            "#
        ))
            .bind(campaign_id)
            .bind(start)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let mut list = Vec::with_capacity(rows.len());
        for row in rows {
            list.push(claim_from_row(&row)?);
        }
        Ok(list)
    }

    async fn list_redemptions_in_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Redemption>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT redemption_id, claim_id, staff_id,
                   redeemed_at, device_lat, device_lng
            FROM redemptions
            WHERE redeemed_at >= $1
              AND redeemed_at <= $2
            ORDER BY redeemed_at ASC
            "#,
        )
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        let mut list = Vec::with_capacity(rows.len());
        for row in rows {
            list.push(redemption_from_row(&row)?);
        }
        Ok(list)
    }

    async fn get_redemption_for_claim(&self, claim_id: Uuid) -> Result<Option<Redemption>, Error> {
        let row_opt = sqlx::query(
            r#"
            SELECT redemption_id, claim_id, staff_id,
                   redeemed_at, device_lat, device_lng
            FROM redemptions
            WHERE claim_id = $1
            "#,
        )
            .bind(claim_id)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(row) = row_opt {
            Ok(Some(redemption_from_row(&row)?))
        } else {
            Ok(None)
        }
    }
}
