//! OMDB movie search.
//!
//! Title search against the Open Movie Database that collects every result
//! page, enriches each movie with its genres and caches the combined result.
//! The remote client and the cache are injected behind traits so the process
//! owns their lifecycle.

pub mod aggregator;
pub mod cache;
pub mod client;
pub mod error;
pub mod models;

pub use aggregator::{MovieSearchAggregator, SearchSettings};
pub use cache::{CacheEntry, MemoryCache, ResultCache};
pub use client::{build_http_client, OmdbClient, RemoteSearchClient};
pub use error::{CacheError, RemoteError, Result, SearchError};
pub use models::{MovieDetails, SearchPage, SearchQuery, SearchResultItem};
