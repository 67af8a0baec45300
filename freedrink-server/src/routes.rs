// File: freedrink-server/src/routes.rs

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::error;
use uuid::Uuid;

use freedrink_common::models::claim::ClaimRequest;
use freedrink_common::models::stats::StatsRange;
use freedrink_common::Error;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/track/scan", post(track_scan))
        .route("/api/claim", post(create_claim))
        .route("/api/staff/preview", get(preview_claim))
        .route("/api/redeem", post(redeem_claim))
        .route("/api/admin/stats", get(get_stats))
        .route("/api/admin/recent", get(get_recent))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

const DEFAULT_SOURCE: &str = "poster";
const DEFAULT_STAFF_ID: &str = "staff";

fn error_response(err: Error) -> Response {
    let status = match &err {
        Error::NotFound => StatusCode::NOT_FOUND,
        Error::Validation(_)
        | Error::Underage
        | Error::DuplicateToday
        | Error::AlreadyRedeemed
        | Error::Expired
        | Error::Parse(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("request failed: {}", err);
        (status, Json(json!({ "error": "internal error" }))).into_response()
    } else {
        (status, Json(json!({ "error": err.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct ScanBody {
    source: Option<String>,
    campaign_id: Option<Uuid>,
}

async fn track_scan(
    State(state): State<AppState>,
    Json(body): Json<ScanBody>,
) -> Response {
    let campaign_id = body.campaign_id.unwrap_or(state.default_campaign_id);
    let source = body.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string());

    match state.stats.record_scan(campaign_id, &source).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "ok": true }))).into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
struct ClaimBody {
    campaign_id: Option<Uuid>,
    name: Option<String>,
    phone: Option<String>,
    dob: Option<String>,
    instagram_handle: Option<String>,
    source: Option<String>,
}

async fn create_claim(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ClaimBody>,
) -> Response {
    let req = ClaimRequest {
        campaign_id: body.campaign_id.unwrap_or(state.default_campaign_id),
        name: body.name.unwrap_or_default(),
        phone: body.phone.unwrap_or_default(),
        dob: body.dob.unwrap_or_default(),
        instagram_handle: body.instagram_handle,
        source: body.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
    };

    match state.claims.issue(&req).await {
        Ok(issued) => {
            let host = headers
                .get(header::HOST)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("localhost:3000");
            let redeem_url = format!("http://{}{}", host, issued.redeem_reference);
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "token": issued.token,
                    "short_code": issued.short_code,
                    "redeem_url": redeem_url,
                })),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
struct PreviewQuery {
    token: Option<String>,
}

async fn preview_claim(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Response {
    let token = match query.token {
        Some(t) if !t.trim().is_empty() => t,
        _ => return error_response(Error::Validation("token is required".to_string())),
    };

    match state.redemptions.preview(&token).await {
        Ok(preview) => (StatusCode::OK, Json(preview)).into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
struct RedeemBody {
    token: Option<String>,
    staff_id: Option<String>,
    device_lat: Option<f64>,
    device_lng: Option<f64>,
}

async fn redeem_claim(
    State(state): State<AppState>,
    Json(body): Json<RedeemBody>,
) -> Response {
    let token = match body.token {
        Some(t) if !t.trim().is_empty() => t,
        _ => return error_response(Error::Validation("token is required".to_string())),
    };
    let staff_id = body.staff_id.unwrap_or_else(|| DEFAULT_STAFF_ID.to_string());

    match state
        .redemptions
        .redeem(&token, &staff_id, body.device_lat, body.device_lng)
        .await
    {
        Ok(receipt) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "name": receipt.name,
                "redeemed_at": receipt.redeemed_at,
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
struct DashboardQuery {
    campaign_id: Option<Uuid>,
    range: Option<String>,
}

async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let campaign_id = query.campaign_id.unwrap_or(state.default_campaign_id);
    let range = match query.range.as_deref().unwrap_or("today").parse::<StatsRange>() {
        Ok(r) => r,
        Err(e) => return error_response(e),
    };

    match state.stats.stats(campaign_id, range).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_recent(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let campaign_id = query.campaign_id.unwrap_or(state.default_campaign_id);
    let range = match query.range.as_deref().unwrap_or("today").parse::<StatsRange>() {
        Ok(r) => r,
        Err(e) => return error_response(e),
    };

    match state.stats.recent(campaign_id, range).await {
        Ok(items) => (StatusCode::OK, Json(json!({ "items": items }))).into_response(),
        Err(e) => error_response(e),
    }
}
