//! JSON endpoints in front of the action layer and the offer queries.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use axum::{
    Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::actions::{
    self, Actions, DEFAULT_RECENT_LINKS_LIMIT, FetchRecentLinksResult, GenerateLinkResult,
};
use crate::client::ApiTransport;
use crate::config::PublicProfile;
use crate::error::{ApiError, ApiErrorKind};
use crate::schema::{ProductOffersQuery, ShopeeOffersQuery};
use crate::shopee;
use crate::types::{PageInfo, ShopeeOffer, ShopeeProduct};

/// State shared by every handler.
pub struct AppState<T> {
    actions: Arc<Actions<T>>,
    profile: Arc<PublicProfile>,
    metrics: Arc<Metrics>,
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            actions: Arc::clone(&self.actions),
            profile: Arc::clone(&self.profile),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

struct Metrics {
    total_requests: AtomicU64,
    requests_in_flight: AtomicU64,
    start_time: Instant,
}

impl Metrics {
    fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            requests_in_flight: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Count a request as started; it stops being in flight when the guard drops.
    fn track(&self) -> RequestGuard<'_> {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.requests_in_flight.fetch_add(1, Ordering::Relaxed);
        RequestGuard(&self.requests_in_flight)
    }
}

/// RAII guard for tracking in-flight requests
struct RequestGuard<'a>(&'a AtomicU64);

impl Drop for RequestGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Build the router with its middleware.
pub fn build_app<T>(actions: Actions<T>, profile: PublicProfile) -> Router
where
    T: ApiTransport + 'static,
{
    let state = AppState {
        actions: Arc::new(actions),
        profile: Arc::new(profile),
        metrics: Arc::new(Metrics::new()),
    };

    Router::new()
        .route("/health", get(health_check))
        .route("/api/affiliate-link", post(generate_affiliate_link::<T>))
        .route("/api/recent-links", get(recent_links::<T>))
        .route("/api/offers/products", post(product_offers::<T>))
        .route("/api/offers/campaigns", post(campaign_offers::<T>))
        .route("/api/site-info", get(site_info::<T>))
        .route("/api/metrics", get(get_metrics::<T>))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AffiliateLinkRequest {
    #[serde(default)]
    origin_url: String,
}

async fn generate_affiliate_link<T: ApiTransport>(
    State(state): State<AppState<T>>,
    payload: Result<Json<AffiliateLinkRequest>, JsonRejection>,
) -> Result<Json<GenerateLinkResult>, HttpError> {
    let _guard = state.metrics.track();
    let Json(request) = payload?;

    let link = actions::check_shopee_link(&request.origin_url)
        .map_err(|e| HttpError::BadRequest(e.to_string()))?;

    tracing::info!("Generating affiliate link for {}", link);

    Ok(Json(state.actions.generate_link(link).await))
}

#[derive(Deserialize)]
struct RecentLinksQuery {
    limit: Option<u32>,
}

async fn recent_links<T: ApiTransport>(
    State(state): State<AppState<T>>,
    query: Result<Query<RecentLinksQuery>, QueryRejection>,
) -> Result<Json<FetchRecentLinksResult>, HttpError> {
    let _guard = state.metrics.track();
    let Query(query) = query?;

    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LINKS_LIMIT);
    Ok(Json(state.actions.fetch_recent_links(limit).await))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductOffersResponse {
    success: bool,
    products: Vec<ShopeeProduct>,
    page_info: PageInfo,
}

async fn product_offers<T: ApiTransport>(
    State(state): State<AppState<T>>,
    payload: Result<Json<ProductOffersQuery>, JsonRejection>,
) -> Result<Json<ProductOffersResponse>, HttpError> {
    let _guard = state.metrics.track();
    let Json(query) = payload?;

    let response = state.actions.shopee().get_product_offers(query).await?;

    Ok(Json(ProductOffersResponse {
        success: shopee::is_success_response(&response),
        products: shopee::extract_products(&response).to_vec(),
        page_info: shopee::extract_page_info(&response),
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CampaignOffersResponse {
    success: bool,
    offers: Vec<ShopeeOffer>,
    page_info: PageInfo,
}

async fn campaign_offers<T: ApiTransport>(
    State(state): State<AppState<T>>,
    payload: Result<Json<ShopeeOffersQuery>, JsonRejection>,
) -> Result<Json<CampaignOffersResponse>, HttpError> {
    let _guard = state.metrics.track();
    let Json(query) = payload?;

    let response = state.actions.shopee().get_shopee_offers(query).await?;

    Ok(Json(CampaignOffersResponse {
        success: shopee::is_success_response(&response),
        offers: shopee::extract_offers(&response).to_vec(),
        page_info: shopee::extract_page_info(&response),
    }))
}

async fn site_info<T: ApiTransport>(State(state): State<AppState<T>>) -> Json<PublicProfile> {
    Json(state.profile.as_ref().clone())
}

async fn get_metrics<T: ApiTransport>(State(state): State<AppState<T>>) -> Json<MetricsResponse> {
    Json(MetricsResponse {
        total_requests: state.metrics.total_requests.load(Ordering::Relaxed),
        requests_in_flight: state.metrics.requests_in_flight.load(Ordering::Relaxed),
        uptime_seconds: state.metrics.start_time.elapsed().as_secs(),
    })
}

#[derive(Serialize)]
struct MetricsResponse {
    total_requests: u64,
    requests_in_flight: u64,
    uptime_seconds: u64,
}

/// Error answered as `{"success": false, "error": message}`.
#[derive(Debug)]
enum HttpError {
    BadRequest(String),
    BadGateway(String),
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err.kind {
            ApiErrorKind::Validation => HttpError::BadRequest(err.message),
            ApiErrorKind::Upstream | ApiErrorKind::Unexpected => HttpError::BadGateway(err.message),
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        HttpError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        HttpError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            HttpError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        let body = Json(serde_json::json!({
            "success": false,
            "error": message
        }));

        (status, body).into_response()
    }
}
