//! Movie search aggregation.
//!
//! A search collects every result page for a title, enriches each movie with
//! its genres, caches the combined list per title and finally applies the
//! optional genre filter.

use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{self, ResultCache};
use crate::client::RemoteSearchClient;
use crate::error::{RemoteError, Result};
use crate::models::{filter_by_genre, page_count, SearchQuery, SearchResultItem};

type RemoteResult<T> = std::result::Result<T, RemoteError>;

const DEFAULT_CACHE_TTL_SECS: u64 = 60 * 60;
const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 10;

/// Tunables for [`MovieSearchAggregator`].
#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// How long an aggregated result stays cached.
    pub cache_ttl: Duration,
    /// Upper bound on in-flight remote requests per fan-out step.
    pub max_concurrent_requests: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
        }
    }
}

/// Searches the remote movie database by title and enriches results with genres.
pub struct MovieSearchAggregator {
    client: Arc<dyn RemoteSearchClient>,
    cache: Arc<dyn ResultCache>,
    settings: SearchSettings,
}

impl MovieSearchAggregator {
    /// Create an aggregator with default settings.
    pub fn new(client: Arc<dyn RemoteSearchClient>, cache: Arc<dyn ResultCache>) -> Self {
        Self {
            client,
            cache,
            settings: SearchSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: SearchSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Return every movie matching `title`, each tagged with its genres.
    ///
    /// When `genre` is given only movies carrying that exact genre are kept.
    /// Results are cached per title, so different genre filters share one
    /// remote aggregation.
    pub async fn search(
        &self,
        title: &str,
        genre: Option<&str>,
    ) -> Result<Vec<SearchResultItem>> {
        let query = SearchQuery::new(title, genre)?;
        let key = query.cache_key();

        let movies = cache::get_or_set(self.cache.as_ref(), &key, self.settings.cache_ttl, || {
            self.aggregate(&query.title)
        })
        .await?;

        let movies = match query.genre.as_deref() {
            Some(genre) => filter_by_genre(movies, genre),
            None => movies,
        };

        tracing::debug!(
            title = %query.title,
            genre = ?query.genre,
            results = movies.len(),
            "OMDB movie search"
        );

        Ok(movies)
    }

    /// Collect all pages for `title` and enrich every movie with its genres.
    async fn aggregate(&self, title: &str) -> RemoteResult<Vec<SearchResultItem>> {
        let movies = self.fetch_all_pages(title).await?;
        let movies = self.add_genres(movies).await?;

        tracing::info!(title = %title, movies = movies.len(), "Aggregated OMDB search");
        Ok(movies)
    }

    fn parallelism(&self) -> usize {
        self.settings.max_concurrent_requests.max(1)
    }

    /// Fetch page 1, then the remaining pages concurrently, concatenated in page order.
    async fn fetch_all_pages(&self, title: &str) -> RemoteResult<Vec<SearchResultItem>> {
        let first = self.client.search_by_title(title, 1).await?;
        let pages = page_count(first.total_results);
        let mut movies = first.items;

        if pages > 1 {
            tracing::debug!(title = %title, pages, "Fetching remaining OMDB pages");

            // `buffered` yields in input order, whatever order the requests finish in
            let rest: Vec<_> = stream::iter(2..=pages)
                .map(|page| self.client.search_by_title(title, page))
                .buffered(self.parallelism())
                .try_collect()
                .await?;

            for page in rest {
                movies.extend(page.items);
            }
        }

        Ok(movies)
    }

    /// Look up every movie's details concurrently and attach the parsed genres.
    async fn add_genres(
        &self,
        mut movies: Vec<SearchResultItem>,
    ) -> RemoteResult<Vec<SearchResultItem>> {
        // Owned ids keep the lookup futures `Send` for any caller
        let ids: Vec<String> = movies.iter().map(|m| m.external_id.clone()).collect();

        let genres: Vec<Vec<String>> = stream::iter(ids)
            .map(|id| async move {
                self.client
                    .lookup_by_id(&id)
                    .await
                    .map(|details| details.genres())
            })
            .buffered(self.parallelism())
            .try_collect()
            .await?;

        for (movie, genres) in movies.iter_mut().zip(genres) {
            movie.genres = genres;
        }

        Ok(movies)
    }
}
