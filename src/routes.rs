use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    AppState, auth, enrichment,
    error::{AppError, AppResult},
    models::{Movie, MovieInput, MovieList, MovieQuery, RatingAggregate, RatingSubmission},
    ratings,
    store::UpsertOutcome,
};

pub async fn healthz(State(state): State<Arc<AppState>>) -> Response {
    match state.store.ping().await {
        Ok(()) => Json(json!({ "status": "ok" })).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "message": "Database ping failed" })),
            )
                .into_response()
        },
    }
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    body: Result<Json<MovieInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    let Json(input) = body.map_err(bad_json)?;
    let movie = enrichment::create_movie(&state.store, &state.boxoffice, input).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MovieQuery>, QueryRejection>,
) -> AppResult<Json<MovieList>> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let items = state.store.list_movies(&query).await?;
    Ok(Json(MovieList { items }))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Movie>> {
    let movie = state.store.get_movie(&id).await?.ok_or_else(AppError::movie_not_found)?;
    Ok(Json(movie))
}

pub async fn submit_rating(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
    headers: HeaderMap,
    body: Result<Json<RatingSubmission>, JsonRejection>,
) -> AppResult<Response> {
    let body = body.map(|Json(submission)| submission).map_err(bad_json);
    let (outcome, result) =
        ratings::submit_rating(&state.store, &title, auth::rater_id(&headers), body).await?;

    let status = match outcome {
        UpsertOutcome::Created => StatusCode::CREATED,
        UpsertOutcome::Updated => StatusCode::OK,
    };
    Ok((status, Json(result)).into_response())
}

pub async fn rating_aggregate(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
) -> AppResult<Json<RatingAggregate>> {
    Ok(Json(ratings::rating_aggregate(&state.store, &title).await?))
}

/// Maps any JSON body rejection to a 400 carrying axum's message.
fn bad_json(rejection: JsonRejection) -> AppError {
    AppError::BadRequest(rejection.body_text())
}
