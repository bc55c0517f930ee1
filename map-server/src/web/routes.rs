//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::analysis::{self, bucket_distances};
use crate::domain::{BoundingBox, PlanUri, Station, StationId};
use crate::sparql::SparqlError;
use crate::view::{AnalysisMode, LayerId, SidebarSection};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Minimum search term length; shorter input short-circuits before any
/// query is built.
const MIN_SEARCH_LEN: usize = 3;

/// Default and maximum size of the longest-distances listing.
const DEFAULT_LONGEST_LIMIT: usize = 50;
const MAX_LONGEST_LIMIT: usize = 200;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/about", get(about_page))
        .route("/api/stations", get(list_stations))
        .route("/api/stations/search", get(search_stations))
        .route("/api/stations/:id/short-distances", get(short_distances))
        .route("/api/view", get(current_view))
        .route("/api/view/section/:name", post(set_section))
        .route("/api/view/zoom/:action", post(zoom))
        .route("/api/view/center", post(center))
        .route("/api/view/reset-drilldown", post(reset_drilldown))
        .route("/api/view/analysis/:mode", post(set_analysis))
        .route("/api/analysis/heatmap", get(heatmap))
        .route("/api/analysis/longest", get(longest))
        .route("/api/analysis/histogram", get(histogram))
        .route("/api/analysis/zoning-plans", get(zoning_plans))
        .route("/api/analysis/zoning-plans/stats", get(zoning_plan_stats))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// The map page.
async fn index_page() -> impl IntoResponse {
    Html(
        IndexTemplate
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}

/// About page.
async fn about_page() -> impl IntoResponse {
    Html(
        AboutTemplate
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}

/// Check if the request prefers an HTML fragment over JSON.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// All stations for the cluster layer.
async fn list_stations(State(state): State<AppState>) -> Result<Json<StationsResponse>, AppError> {
    let stations = state.stations.all().await;
    let active = state.sparql.active_station_ids().await?;

    {
        let mut view = state.view.write().await;
        for s in stations.iter() {
            view.register_marker(s.id.clone(), LayerId::Cluster);
        }
    }

    let markers: Vec<StationMarkerDto> = stations
        .iter()
        .map(|s| StationMarkerDto {
            id: s.id.to_string(),
            name: s.name.clone(),
            lat: s.pos.lat,
            lng: s.pos.lng,
            has_short_distances: active.contains(&s.id),
        })
        .collect();

    Ok(Json(StationsResponse {
        count: markers.len(),
        markers,
    }))
}

/// Search stations by name.
///
/// Terms shorter than three characters are answered locally with the
/// inline hint; no query is issued.
async fn search_stations(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(req): Query<SearchRequest>,
) -> Result<Response, AppError> {
    let terms = req.q.trim();

    if terms.chars().count() < MIN_SEARCH_LEN {
        let message = "Please enter at least 3 characters".to_string();
        return Ok(search_response(&headers, Vec::new(), Some(message))?);
    }

    let stations = state.sparql.search_stations(terms).await?;

    {
        let mut view = state.view.write().await;
        for s in &stations {
            view.register_marker(s.id.clone(), LayerId::SearchResults);
        }
    }

    let message = stations
        .is_empty()
        .then(|| "No stations found".to_string());

    Ok(search_response(&headers, stations, message)?)
}

/// Build the search response as an HTML fragment or JSON.
fn search_response(
    headers: &HeaderMap,
    stations: Vec<Station>,
    message: Option<String>,
) -> Result<Response, AppError> {
    if accepts_html(headers) {
        let template = SearchResultsTemplate {
            count: stations.len(),
            message,
            items: stations
                .iter()
                .map(|s| SearchItemView {
                    id: s.id.to_string(),
                    name: s.name.clone(),
                })
                .collect(),
        };
        let html = template.render().map_err(|e| AppError::Internal {
            message: format!("Template error: {}", e),
        })?;
        Ok(Html(html).into_response())
    } else {
        let fly_to = BoundingBox::from_points(stations.iter().map(|s| s.pos)).map(Into::into);
        let markers: Vec<MarkerDto> = stations.iter().map(MarkerDto::from_station).collect();
        Ok(Json(SearchResponse {
            count: markers.len(),
            message,
            markers,
            fly_to,
        })
        .into_response())
    }
}

/// Drill down into the short distances of one station.
async fn short_distances(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DrilldownResponse>, AppError> {
    let id = StationId::parse(&id).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    let origin = state
        .stations
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound {
            message: format!("unknown station: {id}"),
        })?;

    // Coalesced per station ID: overlapping clicks share one fetch.
    let relations = state.sparql.short_distances(&id).await?;

    let arrival_ids: Vec<StationId> = relations.iter().map(|r| r.arrival.id.clone()).collect();
    let transition = {
        let mut view = state.view.write().await;
        view.begin_drilldown(id.clone(), &arrival_ids)
    };

    let destinations: Vec<DrilldownEntryDto> = relations
        .iter()
        .map(|r| DrilldownEntryDto {
            id: r.arrival.id.to_string(),
            name: r.arrival.name.clone(),
            lat: r.arrival.pos.lat,
            lng: r.arrival.pos.lng,
            distance_m: r.distance_m,
        })
        .collect();

    let lines: Vec<LineDto> = relations
        .iter()
        .map(|r| LineDto {
            from: [origin.pos.lat, origin.pos.lng],
            to: [r.arrival.pos.lat, r.arrival.pos.lng],
            distance_m: r.distance_m,
        })
        .collect();

    // Bounds cover all destinations plus the origin; with no results the
    // fly-to is skipped and the message shown instead.
    let (message, fly_to) = if relations.is_empty() {
        (Some("This station has no short distances".to_string()), None)
    } else {
        let points = relations
            .iter()
            .map(|r| r.arrival.pos)
            .chain(std::iter::once(origin.pos));
        (None, BoundingBox::from_points(points).map(Into::into))
    };

    Ok(Json(DrilldownResponse {
        origin: MarkerDto::from_station(&origin),
        count: destinations.len(),
        message,
        destinations,
        lines,
        restored: id_strings(&transition.restored),
        displaced: id_strings(&transition.displaced),
        fly_to,
    }))
}

/// Current view-state snapshot.
async fn current_view(State(state): State<AppState>) -> Json<ViewResponse> {
    let view = state.view.read().await;
    Json(ViewResponse {
        view: ViewDto::from_state(&view),
        restored: Vec::new(),
        fly_to: None,
    })
}

/// Switch the sidebar section.
async fn set_section(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ViewResponse>, AppError> {
    let section = SidebarSection::parse(&name).ok_or_else(|| AppError::BadRequest {
        message: format!("unknown sidebar section: {name}"),
    })?;

    let mut view = state.view.write().await;
    let transition = view.enter_section(section);
    Ok(Json(ViewResponse {
        view: ViewDto::from_state(&view),
        restored: id_strings(&transition.restored),
        fly_to: None,
    }))
}

/// A zoom request: one step in or out, or an absolute level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ZoomAction {
    In,
    Out,
    Level(u8),
}

impl ZoomAction {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "in" => Some(Self::In),
            "out" => Some(Self::Out),
            _ => s.parse().ok().map(Self::Level),
        }
    }
}

/// Zoom in, out, or to an absolute level, clamped to the tile layer range.
async fn zoom(
    State(state): State<AppState>,
    Path(action): Path<String>,
) -> Result<Json<ViewResponse>, AppError> {
    let action = ZoomAction::parse(&action).ok_or_else(|| AppError::BadRequest {
        message: format!("unknown zoom action: {action}"),
    })?;

    let mut view = state.view.write().await;
    match action {
        ZoomAction::In => view.zoom_in(),
        ZoomAction::Out => view.zoom_out(),
        ZoomAction::Level(level) => view.set_zoom(level),
    };

    Ok(Json(ViewResponse {
        view: ViewDto::from_state(&view),
        restored: Vec::new(),
        fly_to: None,
    }))
}

/// Recenter to the Switzerland-wide view.
async fn center(State(state): State<AppState>) -> Json<ViewResponse> {
    let view = state.view.read().await;
    Json(ViewResponse {
        view: ViewDto::from_state(&view),
        restored: Vec::new(),
        fly_to: Some(view.center().into()),
    })
}

/// Clear the drill-down (map click outside a marker).
async fn reset_drilldown(State(state): State<AppState>) -> Json<ViewResponse> {
    let mut view = state.view.write().await;
    let restored = view.reset_drilldown();
    Json(ViewResponse {
        view: ViewDto::from_state(&view),
        restored: id_strings(&restored),
        fly_to: None,
    })
}

/// Select the analysis display for the Distance section.
async fn set_analysis(
    State(state): State<AppState>,
    Path(mode): Path<String>,
) -> Result<Json<ViewResponse>, AppError> {
    let mode = AnalysisMode::parse(&mode).ok_or_else(|| AppError::BadRequest {
        message: format!("unknown analysis mode: {mode}"),
    })?;

    let mut view = state.view.write().await;
    view.set_analysis(mode);
    Ok(Json(ViewResponse {
        view: ViewDto::from_state(&view),
        restored: Vec::new(),
        fly_to: None,
    }))
}

/// Short-distance-count heatmap data.
async fn heatmap(State(state): State<AppState>) -> Result<Json<HeatmapResponse>, AppError> {
    let activity = state.sparql.station_activity().await?;
    let data = analysis::heatmap(activity.as_ref().clone());
    Ok(Json(HeatmapResponse::from_data(&data)))
}

/// The N longest short distances.
async fn longest(
    State(state): State<AppState>,
    Query(req): Query<LongestRequest>,
) -> Result<Json<LongestResponse>, AppError> {
    let limit = req
        .limit
        .unwrap_or(DEFAULT_LONGEST_LIMIT)
        .clamp(1, MAX_LONGEST_LIMIT);

    let pairs = state.sparql.longest_short_distances(limit).await?;

    let points = pairs
        .iter()
        .flat_map(|p| [p.departure.pos, p.arrival.pos]);
    let fly_to = BoundingBox::from_points(points).map(Into::into);

    Ok(Json(LongestResponse {
        count: pairs.len(),
        pairs: pairs.iter().map(PairDto::from_pair).collect(),
        fly_to,
    }))
}

/// Distance histogram over all relations, or one zoning plan's.
async fn histogram(
    State(state): State<AppState>,
    Query(req): Query<HistogramRequest>,
) -> Result<Json<HistogramResponse>, AppError> {
    let plan = req
        .plan
        .as_deref()
        .map(parse_plan_uri)
        .transpose()?;

    let distances = state.sparql.distances(plan.as_ref()).await?;
    let histogram = bucket_distances(&distances, &state.buckets);
    Ok(Json(HistogramResponse::from_histogram(&histogram)))
}

/// All zoning plans.
async fn zoning_plans(
    State(state): State<AppState>,
) -> Result<Json<ZoningPlansResponse>, AppError> {
    let plans = state.sparql.zoning_plans().await?;
    Ok(Json(ZoningPlansResponse {
        plans: plans.iter().map(PlanDto::from_plan).collect(),
    }))
}

/// Stations and distance distribution of one zoning plan.
async fn zoning_plan_stats(
    State(state): State<AppState>,
    Query(req): Query<PlanRequest>,
) -> Result<Json<PlanStatsResponse>, AppError> {
    let plan = parse_plan_uri(&req.plan)?;

    let (stations, distances) = futures::future::try_join(
        state.sparql.zoning_plan_stations(&plan),
        state.sparql.distances(Some(&plan)),
    )
    .await?;

    let histogram = bucket_distances(&distances, &state.buckets);
    let fly_to = BoundingBox::from_points(stations.iter().map(|s| s.pos)).map(Into::into);

    Ok(Json(PlanStatsResponse {
        plan: plan.to_string(),
        station_count: stations.len(),
        markers: stations.iter().map(MarkerDto::from_station).collect(),
        histogram: HistogramResponse::from_histogram(&histogram),
        fly_to,
    }))
}

fn parse_plan_uri(raw: &str) -> Result<PlanUri, AppError> {
    PlanUri::parse(raw).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })
}

fn id_strings(ids: &[StationId]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    /// The SPARQL endpoint failed; the panel shows a retry hint.
    Upstream { message: String },
    Internal { message: String },
}

impl From<SparqlError> for AppError {
    fn from(e: SparqlError) -> Self {
        tracing::warn!("SPARQL request failed: {e}");
        AppError::Upstream {
            message: "Could not load data from the query endpoint, please retry".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message.clone()),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message.clone()),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
        };

        tracing::error!("[{status}] {message}");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
