// tests/concurrency_tests.rs

use std::sync::Arc;

use chrono::{Duration, Utc};

use freedrink_common::error::Error;
use freedrink_common::models::claim::ClaimRequest;
use freedrink_common::traits::repository_traits::{CampaignRepository, ClaimRepository};
use freedrink_core::test_utils::helpers::{memory_stack, sample_campaign};

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_redeems_succeed_exactly_once() -> Result<(), Error> {
    let stack = memory_stack();
    let campaign = sample_campaign();
    stack.campaign_repo.create_campaign(&campaign).await?;

    let issued = stack
        .claims
        .issue(&ClaimRequest {
            campaign_id: campaign.campaign_id,
            name: "Sam".to_string(),
            phone: "555-0100".to_string(),
            dob: "1999-04-01".to_string(),
            instagram_handle: None,
            source: "poster".to_string(),
        })
        .await?;

    let redemptions = Arc::new(stack.redemptions);
    let mut handles = Vec::new();
    for i in 0..16 {
        let redemptions = redemptions.clone();
        let token = issued.token.clone();
        handles.push(tokio::spawn(async move {
            redemptions
                .redeem(&token, &format!("staff-{i}"), None, None)
                .await
        }));
    }

    let mut successes = 0u32;
    let mut already_redeemed = 0u32;
    for handle in handles {
        match handle.await.expect("task should not panic") {
            Ok(_) => successes += 1,
            Err(Error::AlreadyRedeemed) => already_redeemed += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(already_redeemed, 15);

    // Exactly one redemption record made it to the store.
    let now = Utc::now();
    let window = stack
        .claim_repo
        .list_redemptions_in_window(now - Duration::hours(1), now + Duration::hours(1))
        .await?;
    assert_eq!(window.len(), 1);

    let claim = stack
        .claim_repo
        .get_claim_by_token(&issued.token)
        .await?
        .expect("claim should exist");
    assert!(claim.redeemed_at.is_some());
    assert_eq!(window[0].claim_id, claim.claim_id);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_signups_same_phone_insert_once() -> Result<(), Error> {
    let stack = memory_stack();
    let campaign = sample_campaign();
    stack.campaign_repo.create_campaign(&campaign).await?;

    let claims = Arc::new(stack.claims);
    let mut handles = Vec::new();
    for i in 0..8 {
        let claims = claims.clone();
        let campaign_id = campaign.campaign_id;
        handles.push(tokio::spawn(async move {
            claims
                .issue(&ClaimRequest {
                    campaign_id,
                    name: format!("Guest {i}"),
                    phone: "555-0100".to_string(),
                    dob: "1999-04-01".to_string(),
                    instagram_handle: None,
                    source: "poster".to_string(),
                })
                .await
        }));
    }

    let mut successes = 0u32;
    let mut duplicates = 0u32;
    for handle in handles {
        match handle.await.expect("task should not panic") {
            Ok(_) => successes += 1,
            Err(Error::DuplicateToday) => duplicates += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(duplicates, 7);
    Ok(())
}
