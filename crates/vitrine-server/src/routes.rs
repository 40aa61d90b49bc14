// File: src/routes.rs
// Purpose: Section admin API, public homepage and lazy fragment endpoints

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vitrine::section::validate_new_section;
use vitrine::{
    html, Composition, LazyMode, ReorderItem, Section, SectionData, SectionFilter,
    SectionPayload, Viewport,
};

/// `?mobile=1` forces the mobile viewport
#[derive(Debug, Default, Deserialize)]
pub struct ViewportQuery {
    pub mobile: Option<String>,
}

impl ViewportQuery {
    fn viewport(&self, headers: &HeaderMap) -> Viewport {
        let user_agent = headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok());
        Viewport::detect(self.mobile.as_deref(), user_agent)
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ReorderRequest {
    pub order: Vec<ReorderItem>,
}

#[derive(Debug, Serialize)]
pub struct ReorderResponse {
    pub updated: u64,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub cleared: bool,
}

// ============================================================================
// SECTION CRUD
// ============================================================================

/// GET /sections?type=&isActive=&isPublished=
pub async fn list_sections(
    State(state): State<AppState>,
    Query(filter): Query<SectionFilter>,
) -> ApiResult<Json<Vec<Section>>> {
    Ok(Json(state.store().list_sections(&filter).await?))
}

/// POST /sections
pub async fn create_section(
    State(state): State<AppState>,
    Json(payload): Json<SectionPayload>,
) -> ApiResult<(StatusCode, Json<Section>)> {
    let new = validate_new_section(payload)?;
    let section = state.store().create_section(new).await?;
    info!(id = %section.id, kind = %section.section_type(), "section created");
    Ok((StatusCode::CREATED, Json(section)))
}

/// GET /sections/:id
pub async fn get_section(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Section>> {
    Ok(Json(state.store().get_section(&id).await?))
}

/// PUT /sections/:id, only fields present in the body change
pub async fn update_section(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<SectionPayload>,
) -> ApiResult<Json<Section>> {
    let section = state.store().update_section(&id, payload).await?;
    info!(id = %section.id, "section updated");
    Ok(Json(section))
}

/// DELETE /sections/:id
pub async fn delete_section(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<DeleteResponse>> {
    if !state.store().delete_section(&id).await? {
        return Err(vitrine::Error::not_found(format!("section {}", id)).into());
    }
    info!(%id, "section deleted");
    Ok(Json(DeleteResponse { deleted: true }))
}

/// PATCH /sections/reorder, best effort: unknown ids are skipped
pub async fn reorder_sections(
    State(state): State<AppState>,
    Json(request): Json<ReorderRequest>,
) -> ApiResult<Json<ReorderResponse>> {
    let updated = state.store().reorder(&request.order).await?;
    info!(requested = request.order.len(), updated, "sections reordered");
    Ok(Json(ReorderResponse { updated }))
}

// ============================================================================
// SECTION DATA
// ============================================================================

/// GET /sections/:id/data
pub async fn section_data(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ViewportQuery>,
    headers: HeaderMap,
) -> ApiResult<Json<SectionData>> {
    let section = state.store().get_section(&id).await?;
    let data = state
        .composer
        .resolver()
        .resolve(&section, query.viewport(&headers))
        .await?;
    Ok(Json(data))
}

async fn public_section(state: &AppState, id: &str) -> ApiResult<Section> {
    let section = state.store().get_section(id).await?;
    if !section.is_visible() {
        return Err(ApiError::forbidden(format!("section {} is not published", id)));
    }
    Ok(section)
}

/// GET /sections/:id/data/public, 403 unless active and published
pub async fn public_section_data(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ViewportQuery>,
    headers: HeaderMap,
) -> ApiResult<Json<SectionData>> {
    let section = public_section(&state, &id).await?;
    let data = state
        .composer
        .resolver()
        .resolve(&section, query.viewport(&headers))
        .await?;
    Ok(Json(data))
}

/// GET /sections/:id/fragment, the markup a lazy placeholder swaps in.
/// An empty body removes the placeholder.
pub async fn section_fragment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ViewportQuery>,
    headers: HeaderMap,
) -> ApiResult<Html<String>> {
    let section = public_section(&state, &id).await?;
    let slot = state
        .composer
        .render_section(&section, query.viewport(&headers))
        .await;

    debug!(%id, rendered = slot.is_some(), "lazy fragment served");
    Ok(Html(
        slot.map(|s| html::slot(&s, LazyMode::Client).into_string())
            .unwrap_or_default(),
    ))
}

// ============================================================================
// HOMEPAGE
// ============================================================================

async fn composition(state: &AppState, viewport: Viewport) -> Composition {
    match state.config.homepage.lazy_mode {
        LazyMode::Client => state.composer.compose(viewport).await,
        LazyMode::Inline => state.composer.compose_all(viewport, &state.scheduler()).await,
    }
}

/// GET /
pub async fn homepage(
    State(state): State<AppState>,
    Query(query): Query<ViewportQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let composition = composition(&state, query.viewport(&headers)).await;
    Html(html::composition(&composition, state.config.homepage.lazy_mode).into_string())
}

/// GET /homepage, the composed document as JSON
pub async fn homepage_json(
    State(state): State<AppState>,
    Query(query): Query<ViewportQuery>,
    headers: HeaderMap,
) -> Json<Composition> {
    Json(composition(&state, query.viewport(&headers)).await)
}

/// POST /cache/clear
pub async fn clear_cache(State(state): State<AppState>) -> ApiResult<Json<ClearResponse>> {
    state.cache.clear().await?;
    info!("response cache cleared");
    Ok(Json(ClearResponse { cleared: true }))
}
