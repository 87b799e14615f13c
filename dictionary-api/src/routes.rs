//! HTTP routes over the dictionary.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderValue,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use dictionary::{Dictionary, LevelPage, LevelSelection, PageRequest, Word};
use serde::Deserialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::{ListingConfig, ServerConfig};
use crate::error::{ApiError, ApiResult};
use crate::utilities::{parse_date, parse_limit, parse_positive};

#[derive(Clone)]
pub struct AppState {
    pub dictionary: Arc<Dictionary>,
    pub listing: ListingConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct WordOfTheDayQuery {
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LevelQuery {
    pub level: Option<String>,
    pub page: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LevelsQuery {
    pub levels: Option<String>,
    pub limit: Option<String>,
}

pub fn router(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/wordInfo/:word", get(word_info))
        .route("/recommendations/:word", get(recommendations))
        .route("/random", get(random_word))
        .route("/wordOftheDay", get(word_of_the_day))
        .route("/cefr", get(words_by_level))
        .route("/cefr-words", get(words_by_levels))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&server.cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> &'static str {
    "Dictionary API"
}

async fn word_info(State(state): State<AppState>, Path(word): Path<String>) -> ApiResult<Json<Word>> {
    Ok(Json(state.dictionary.word_info(&word).await?))
}

async fn recommendations(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.dictionary.recommendations(&word).await?))
}

async fn random_word(State(state): State<AppState>) -> ApiResult<Json<Word>> {
    Ok(Json(state.dictionary.random_word().await?))
}

async fn word_of_the_day(
    State(state): State<AppState>,
    Query(query): Query<WordOfTheDayQuery>,
) -> ApiResult<Json<Word>> {
    let date = parse_date(query.date.as_deref(), Utc::now().date_naive())?;
    Ok(Json(state.dictionary.word_of_the_day(date).await?))
}

async fn words_by_level(
    State(state): State<AppState>,
    Query(query): Query<LevelQuery>,
) -> ApiResult<Json<LevelPage>> {
    let level = query.level.unwrap_or_default();
    let page = parse_positive("page", query.page.as_deref(), 1)?;
    let page_size = parse_positive(
        "pageSize",
        query.page_size.as_deref(),
        state.listing.default_page_size,
    )?;
    if page_size > state.listing.max_page_size {
        return Err(ApiError::invalid_param(
            "pageSize",
            format!("must not exceed {}", state.listing.max_page_size),
        ));
    }
    let listing = state
        .dictionary
        .words_by_level(&level, PageRequest::new(page, page_size))
        .await?;
    Ok(Json(listing))
}

async fn words_by_levels(
    State(state): State<AppState>,
    Query(query): Query<LevelsQuery>,
) -> ApiResult<Json<LevelSelection>> {
    let levels = query.levels.unwrap_or_default();
    let limit = parse_limit(query.limit.as_deref());
    Ok(Json(state.dictionary.words_by_levels(&levels, limit).await?))
}
