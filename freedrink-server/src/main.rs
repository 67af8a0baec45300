// File: freedrink-server/src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{Duration, Utc};
use clap::Parser;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

use freedrink_common::models::campaign::Campaign;
use freedrink_common::traits::repository_traits::{
    CampaignRepository, ClaimRepository, ScanRepository,
};
use freedrink_core::repositories::memory::{
    MemoryCampaignRepository, MemoryClaimRepository, MemoryScanRepository, MemoryStore,
};
use freedrink_core::repositories::postgres::{
    PostgresCampaignRepository, PostgresClaimRepository, PostgresScanRepository,
};
use freedrink_core::services::{ClaimService, RedemptionService, StatsService};
use freedrink_core::{Database, Error};

mod routes;
mod state;

use state::AppState;

#[derive(Parser, Debug, Clone)]
#[command(name = "freedrink")]
#[command(author, version, about = "Single-use free drink claim & redemption service")]
struct Args {
    /// Address the HTTP server binds
    #[arg(long, default_value = "0.0.0.0:3000")]
    server_addr: String,

    /// Postgres connection URL
    #[arg(long, default_value = "postgres://freedrink@localhost:5432/freedrink")]
    db_url: String,

    /// Run against the in-process store instead of Postgres
    #[arg(long, default_value = "false")]
    memory: bool,
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("freedrink=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub)
        .expect("Failed to set global subscriber");
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv().ok();
    init_tracing();
    let args = Args::parse();

    let (campaign_repo, claim_repo, scan_repo): (
        Arc<dyn CampaignRepository + Send + Sync>,
        Arc<dyn ClaimRepository + Send + Sync>,
        Arc<dyn ScanRepository + Send + Sync>,
    ) = if args.memory {
        info!("Using in-process memory store");
        let store = MemoryStore::new();
        (
            Arc::new(MemoryCampaignRepository::new(store.clone())),
            Arc::new(MemoryClaimRepository::new(store.clone())),
            Arc::new(MemoryScanRepository::new(store)),
        )
    } else {
        let db = Database::new(&args.db_url).await?;
        db.migrate().await?;
        let pool = db.pool().clone();
        (
            Arc::new(PostgresCampaignRepository::new(pool.clone())),
            Arc::new(PostgresClaimRepository::new(pool.clone())),
            Arc::new(PostgresScanRepository::new(pool)),
        )
    };

    let default_campaign_id = seed_default_campaign(campaign_repo.clone()).await?;

    let state = AppState {
        claims: Arc::new(ClaimService::new(claim_repo.clone())),
        redemptions: Arc::new(RedemptionService::new(
            claim_repo.clone(),
            campaign_repo.clone(),
        )),
        stats: Arc::new(StatsService::new(claim_repo, scan_repo, campaign_repo)),
        default_campaign_id,
    };

    let app = routes::router(state);

    let addr: SocketAddr = args.server_addr.parse()?;
    info!("freedrink listening on http://{}", addr);

    axum_server::Server::bind(addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

/// First boot on an empty store gets a default campaign so posters work out
/// of the box; afterwards the earliest campaign is the fallback for requests
/// that don't name one.
async fn seed_default_campaign(
    campaign_repo: Arc<dyn CampaignRepository + Send + Sync>,
) -> Result<Uuid, Error> {
    let existing = campaign_repo.list_campaigns().await?;
    if let Some(first) = existing.first() {
        return Ok(first.campaign_id);
    }

    let now = Utc::now();
    let campaign = Campaign {
        campaign_id: Uuid::new_v4(),
        name: "Student Night".to_string(),
        free_item: "Free Shot".to_string(),
        start_time: now - Duration::hours(1),
        end_time: now + Duration::hours(6),
        created_at: now,
    };
    campaign_repo.create_campaign(&campaign).await?;
    info!(campaign_id = %campaign.campaign_id, "seeded default campaign");
    Ok(campaign.campaign_id)
}
