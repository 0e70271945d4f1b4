//! Movie search endpoint backed by OMDB.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use omdb_search::SearchResultItem;

use crate::error::{AppError, Result};
use crate::AppState;

const MAX_TITLE_LEN: usize = 200;

/// Query parameters for movie search.
#[derive(Debug, Deserialize)]
pub struct MovieSearchParams {
    /// Title to search for (required).
    pub title: Option<String>,
    /// Only return movies tagged with this genre.
    pub genre: Option<String>,
}

/// GET /api/movies
///
/// Searches OMDB by title, optionally filtered by genre.
pub async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<MovieSearchParams>,
) -> Result<Json<Vec<SearchResultItem>>> {
    let title = params.title.as_deref().unwrap_or_default();
    if title.trim().chars().count() > MAX_TITLE_LEN {
        return Err(AppError::BadRequest(format!(
            "'title' too long (max {} characters)",
            MAX_TITLE_LEN
        )));
    }

    let movies = state
        .search()
        .search(title, params.genre.as_deref())
        .await?;

    tracing::debug!(
        title = %title,
        genre = ?params.genre,
        results = movies.len(),
        "Movie search"
    );

    Ok(Json(movies))
}
