// tests/service_tests.rs

use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use freedrink_common::error::Error;
use freedrink_common::models::claim::{Claim, ClaimRequest, ClaimStatus};
use freedrink_common::models::stats::StatsRange;
use freedrink_common::traits::repository_traits::{CampaignRepository, ClaimRepository};
use freedrink_core::crypto;
use freedrink_core::test_utils::helpers::{memory_stack, sample_campaign};
use freedrink_core::utils::time::local_day;

fn claim_request(campaign_id: Uuid, name: &str, phone: &str) -> ClaimRequest {
    ClaimRequest {
        campaign_id,
        name: name.to_string(),
        phone: phone.to_string(),
        dob: "1999-04-01".to_string(),
        instagram_handle: None,
        source: "poster".to_string(),
    }
}

/// Build a claim directly, bypassing the service, so tests can seed awkward
/// states (stale expiry, prior-day creation).
fn manual_claim(
    campaign_id: Uuid,
    phone: &str,
    created_at: DateTime<Utc>,
    token_expires: DateTime<Utc>,
) -> Claim {
    Claim {
        claim_id: Uuid::new_v4(),
        campaign_id,
        name: "Alex".to_string(),
        phone: phone.to_string(),
        dob: NaiveDate::from_ymd_opt(1999, 4, 1).unwrap(),
        instagram_handle: None,
        age_verified: true,
        token: crypto::mint_token().unwrap(),
        short_code: crypto::mint_short_code(&HashSet::new()).unwrap(),
        token_expires,
        created_at,
        claim_day: local_day(created_at),
        redeemed_at: None,
        redeemed_by: None,
        source: "poster".to_string(),
    }
}

#[tokio::test]
async fn issue_returns_token_code_and_reference() -> Result<(), Error> {
    let stack = memory_stack();
    let campaign = sample_campaign();
    stack.campaign_repo.create_campaign(&campaign).await?;

    let issued = stack
        .claims
        .issue(&claim_request(campaign.campaign_id, "Sam", "555-0100"))
        .await?;

    assert_eq!(issued.token.len(), 48);
    assert!(issued.token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    assert!(issued.short_code.starts_with("FD-"));
    assert_eq!(issued.short_code.len(), 10);
    assert!(issued.redeem_reference.contains(&issued.token));
    Ok(())
}

#[tokio::test]
async fn preview_by_token_and_short_code_match() -> Result<(), Error> {
    let stack = memory_stack();
    let campaign = sample_campaign();
    stack.campaign_repo.create_campaign(&campaign).await?;

    let issued = stack
        .claims
        .issue(&claim_request(campaign.campaign_id, "Sam", "555-0100"))
        .await?;

    let by_token = stack.redemptions.preview(&issued.token).await?;
    let by_code = stack.redemptions.preview(&issued.short_code).await?;
    // Short codes are matched case-insensitively.
    let by_lower = stack
        .redemptions
        .preview(&issued.short_code.to_lowercase())
        .await?;

    for preview in [&by_code, &by_lower] {
        assert_eq!(by_token.name, preview.name);
        assert_eq!(by_token.phone, preview.phone);
        assert_eq!(by_token.campaign_name, preview.campaign_name);
        assert_eq!(by_token.token_expires, preview.token_expires);
        assert_eq!(by_token.redeemed_at, preview.redeemed_at);
        assert_eq!(by_token.created_at, preview.created_at);
    }
    assert_eq!(by_token.campaign_name, "Student Night");
    assert!(by_token.redeemed_at.is_none());
    Ok(())
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let stack = memory_stack();
    let campaign_id = Uuid::new_v4();

    let mut no_name = claim_request(campaign_id, "", "555-0100");
    no_name.name = "  ".to_string();
    assert!(matches!(
        stack.claims.issue(&no_name).await,
        Err(Error::Validation(_))
    ));

    let no_phone = claim_request(campaign_id, "Sam", "");
    assert!(matches!(
        stack.claims.issue(&no_phone).await,
        Err(Error::Validation(_))
    ));

    let mut no_dob = claim_request(campaign_id, "Sam", "555-0100");
    no_dob.dob = String::new();
    assert!(matches!(
        stack.claims.issue(&no_dob).await,
        Err(Error::Validation(_))
    ));
}

#[tokio::test]
async fn underage_guest_is_rejected() {
    let stack = memory_stack();
    let mut req = claim_request(Uuid::new_v4(), "Kid", "555-0199");
    req.dob = (Utc::now() - Duration::days(16 * 365))
        .date_naive()
        .format("%Y-%m-%d")
        .to_string();

    assert!(matches!(
        stack.claims.issue(&req).await,
        Err(Error::Underage)
    ));
}

#[tokio::test]
async fn legal_age_threshold_is_configurable() {
    use freedrink_core::services::ClaimService;

    let stack = memory_stack();
    let strict = ClaimService::new(stack.claim_repo.clone()).with_legal_age(21);

    let mut req = claim_request(Uuid::new_v4(), "Nineteen", "555-0198");
    req.dob = (Utc::now() - Duration::days(19 * 366))
        .date_naive()
        .format("%Y-%m-%d")
        .to_string();

    assert!(matches!(strict.issue(&req).await, Err(Error::Underage)));
    assert!(stack.claims.issue(&req).await.is_ok());
}

#[tokio::test]
async fn same_day_duplicate_rejected_prior_day_allowed() -> Result<(), Error> {
    let stack = memory_stack();
    let campaign = sample_campaign();
    stack.campaign_repo.create_campaign(&campaign).await?;

    stack
        .claims
        .issue(&claim_request(campaign.campaign_id, "Sam", "555-0100"))
        .await?;
    assert!(matches!(
        stack
            .claims
            .issue(&claim_request(campaign.campaign_id, "Sam Again", "555-0100"))
            .await,
        Err(Error::DuplicateToday)
    ));

    // A claim from yesterday does not block a fresh one today.
    let yesterday = Utc::now() - Duration::days(1);
    let old = manual_claim(
        campaign.campaign_id,
        "555-0222",
        yesterday,
        yesterday + Duration::hours(6),
    );
    stack.claim_repo.insert_claim(&old).await?;

    let issued = stack
        .claims
        .issue(&claim_request(campaign.campaign_id, "Sam", "555-0222"))
        .await;
    assert!(issued.is_ok());
    Ok(())
}

#[tokio::test]
async fn redeem_succeeds_once_then_reports_already_redeemed() -> Result<(), Error> {
    let stack = memory_stack();
    let campaign = sample_campaign();
    stack.campaign_repo.create_campaign(&campaign).await?;

    let issued = stack
        .claims
        .issue(&claim_request(campaign.campaign_id, "Sam", "555-0100"))
        .await?;

    let receipt = stack
        .redemptions
        .redeem(&issued.token, "staff-7", None, None)
        .await?;
    assert_eq!(receipt.name, "Sam");

    assert!(matches!(
        stack
            .redemptions
            .redeem(&issued.token, "staff-8", None, None)
            .await,
        Err(Error::AlreadyRedeemed)
    ));
    // The short code resolves to the same claim and reports the same state.
    assert!(matches!(
        stack
            .redemptions
            .redeem(&issued.short_code, "staff-8", None, None)
            .await,
        Err(Error::AlreadyRedeemed)
    ));

    let claim = stack
        .claim_repo
        .get_claim_by_token(&issued.token)
        .await?
        .expect("claim should exist");
    assert_eq!(claim.redeemed_by.as_deref(), Some("staff-7"));
    let redemption = stack
        .claim_repo
        .get_redemption_for_claim(claim.claim_id)
        .await?
        .expect("redemption should exist");
    assert_eq!(redemption.staff_id, "staff-7");
    Ok(())
}

#[tokio::test]
async fn unknown_token_is_not_found() {
    let stack = memory_stack();
    assert!(matches!(
        stack.redemptions.redeem("deadbeef", "staff", None, None).await,
        Err(Error::NotFound)
    ));
    assert!(matches!(
        stack.redemptions.preview("FD-ZZZZZZZ").await,
        Err(Error::NotFound)
    ));
}

#[tokio::test]
async fn expired_claim_always_reports_expired() -> Result<(), Error> {
    let stack = memory_stack();
    let campaign = sample_campaign();
    stack.campaign_repo.create_campaign(&campaign).await?;

    let now = Utc::now();
    let stale = manual_claim(
        campaign.campaign_id,
        "555-0111",
        now - Duration::hours(7),
        now - Duration::minutes(5),
    );
    stack.claim_repo.insert_claim(&stale).await?;

    for attempt in [&stale.token, &stale.short_code, &stale.token] {
        assert!(matches!(
            stack.redemptions.redeem(attempt, "staff", None, None).await,
            Err(Error::Expired)
        ));
    }

    // Never transitioned; no redemption row appeared.
    let claim = stack
        .claim_repo
        .get_claim_by_token(&stale.token)
        .await?
        .expect("claim should exist");
    assert!(claim.redeemed_at.is_none());
    assert!(stack
        .claim_repo
        .get_redemption_for_claim(claim.claim_id)
        .await?
        .is_none());
    Ok(())
}

#[tokio::test]
async fn stats_totals_and_conversion() -> Result<(), Error> {
    let stack = memory_stack();
    let campaign = sample_campaign();
    stack.campaign_repo.create_campaign(&campaign).await?;

    for _ in 0..3 {
        stack.stats.record_scan(campaign.campaign_id, "poster").await?;
    }
    let first = stack
        .claims
        .issue(&claim_request(campaign.campaign_id, "Sam", "555-0100"))
        .await?;
    stack
        .claims
        .issue(&claim_request(campaign.campaign_id, "Kim", "555-0101"))
        .await?;
    stack
        .redemptions
        .redeem(&first.token, "staff", None, None)
        .await?;

    let report = stack.stats.stats(campaign.campaign_id, StatsRange::Today).await?;
    assert_eq!(report.totals.scans, 3);
    assert_eq!(report.totals.signups, 2);
    assert_eq!(report.totals.redemptions, 1);
    assert_eq!(report.totals.conversion, 50);

    let scans: u64 = report.series.iter().map(|b| b.scans).sum();
    let signups: u64 = report.series.iter().map(|b| b.signups).sum();
    let redemptions: u64 = report.series.iter().map(|b| b.redemptions).sum();
    assert_eq!((scans, signups, redemptions), (3, 2, 1));
    assert!(report.series.len() <= 24);
    for bucket in &report.series {
        assert!(bucket.t.ends_with(":00"));
    }
    Ok(())
}

#[tokio::test]
async fn stats_with_no_signups_has_zero_conversion() -> Result<(), Error> {
    let stack = memory_stack();
    let campaign = sample_campaign();
    stack.campaign_repo.create_campaign(&campaign).await?;
    stack.stats.record_scan(campaign.campaign_id, "poster").await?;

    let report = stack.stats.stats(campaign.campaign_id, StatsRange::Today).await?;
    assert_eq!(report.totals.scans, 1);
    assert_eq!(report.totals.signups, 0);
    assert_eq!(report.totals.conversion, 0);
    Ok(())
}

#[tokio::test]
async fn recent_is_newest_first_with_status_and_campaign_name() -> Result<(), Error> {
    let stack = memory_stack();
    let campaign = sample_campaign();
    stack.campaign_repo.create_campaign(&campaign).await?;

    stack
        .claims
        .issue(&claim_request(campaign.campaign_id, "First", "555-0100"))
        .await?;
    let second = stack
        .claims
        .issue(&claim_request(campaign.campaign_id, "Second", "555-0101"))
        .await?;
    stack
        .claims
        .issue(&claim_request(campaign.campaign_id, "Third", "555-0102"))
        .await?;
    stack
        .redemptions
        .redeem(&second.token, "staff", None, None)
        .await?;

    let rows = stack.stats.recent(campaign.campaign_id, StatsRange::Today).await?;
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].name, "Third");
    assert_eq!(rows[1].name, "Second");
    assert_eq!(rows[2].name, "First");
    assert_eq!(rows[1].status, ClaimStatus::Redeemed);
    assert_eq!(rows[0].status, ClaimStatus::Unredeemed);
    for row in &rows {
        assert_eq!(row.campaign_name, "Student Night");
    }
    Ok(())
}

#[tokio::test]
async fn recent_respects_the_window() -> Result<(), Error> {
    let stack = memory_stack();
    let campaign = sample_campaign();
    stack.campaign_repo.create_campaign(&campaign).await?;

    let two_days_ago = Utc::now() - Duration::days(2);
    let old = manual_claim(
        campaign.campaign_id,
        "555-0333",
        two_days_ago,
        two_days_ago + Duration::hours(6),
    );
    stack.claim_repo.insert_claim(&old).await?;
    stack
        .claims
        .issue(&claim_request(campaign.campaign_id, "Fresh", "555-0334"))
        .await?;

    let today = stack.stats.recent(campaign.campaign_id, StatsRange::Today).await?;
    assert_eq!(today.len(), 1);
    assert_eq!(today[0].name, "Fresh");

    let week = stack.stats.recent(campaign.campaign_id, StatsRange::Week).await?;
    assert_eq!(week.len(), 2);
    Ok(())
}

#[test]
fn stats_range_parses_wire_names() {
    assert_eq!("today".parse::<StatsRange>().unwrap(), StatsRange::Today);
    assert_eq!("7d".parse::<StatsRange>().unwrap(), StatsRange::Week);
    assert_eq!("30d".parse::<StatsRange>().unwrap(), StatsRange::Month);
    assert!("fortnight".parse::<StatsRange>().is_err());
}
