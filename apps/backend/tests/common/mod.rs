//! Test infrastructure for movie search backend integration tests.
//!
//! Provides a `TestApp` wrapper around `axum_test::TestServer` backed by a
//! scripted OMDB stand-in, so no network access is needed.

use async_trait::async_trait;
use axum_test::TestServer;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use omdb_backend::{config::Config, router, AppState};
use omdb_search::{
    MemoryCache, MovieDetails, MovieSearchAggregator, RemoteError, RemoteSearchClient,
    SearchPage, SearchResultItem,
};

/// Scripted OMDB stand-in that counts calls.
#[derive(Default)]
pub struct StubOmdb {
    pages: HashMap<(String, u32), SearchPage>,
    genres: HashMap<String, String>,
    unavailable: bool,
    search_calls: AtomicUsize,
    lookup_calls: AtomicUsize,
}

impl StubOmdb {
    /// Two "Banana Boy" movies for `test_title`, genres `Short` and `Short, Drama`.
    pub fn banana_boy() -> Self {
        let mut stub = StubOmdb::default();
        stub.pages.insert(
            ("test_title".to_string(), 1),
            SearchPage {
                items: vec![
                    movie("Banana Boy", "2003", "tt0431644", "N/A"),
                    movie(
                        "Banana Boy",
                        "2016",
                        "tt5252614",
                        "https://m.media-amazon.com/images/M/MV5BMTkwMzU0MDE1OF5BMl5BanBnXkFtZTgwMjU3NTU1NzE@._V1_SX300.jpg",
                    ),
                ],
                total_results: 2,
            },
        );
        stub.genres.insert("tt0431644".to_string(), "Short".to_string());
        stub.genres
            .insert("tt5252614".to_string(), "Short, Drama".to_string());
        stub
    }

    /// Every remote call fails as if OMDB were down.
    pub fn unavailable() -> Self {
        StubOmdb {
            unavailable: true,
            ..Default::default()
        }
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn lookup_calls(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }

    fn down(endpoint: String) -> RemoteError {
        RemoteError::transport(
            endpoint,
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
        )
    }
}

fn movie(title: &str, year: &str, id: &str, poster: &str) -> SearchResultItem {
    SearchResultItem {
        title: title.to_string(),
        year: year.to_string(),
        external_id: id.to_string(),
        media_type: "movie".to_string(),
        poster_url: poster.to_string(),
        genres: Vec::new(),
    }
}

#[async_trait]
impl RemoteSearchClient for StubOmdb {
    async fn search_by_title(&self, title: &str, page: u32) -> Result<SearchPage, RemoteError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(Self::down(format!("search page {}", page)));
        }
        Ok(self
            .pages
            .get(&(title.to_string(), page))
            .cloned()
            .unwrap_or_default())
    }

    async fn lookup_by_id(&self, external_id: &str) -> Result<MovieDetails, RemoteError> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(Self::down(format!("lookup {}", external_id)));
        }
        let genre = self
            .genres
            .get(external_id)
            .cloned()
            .ok_or_else(|| RemoteError::Rejected("Incorrect IMDb ID.".to_string()))?;
        Ok(MovieDetails {
            title: "Banana Boy".to_string(),
            genre,
        })
    }
}

/// Test application wrapper around axum_test::TestServer.
pub struct TestApp {
    server: TestServer,
    omdb: Arc<StubOmdb>,
}

impl TestApp {
    /// Create a test application serving the "Banana Boy" fixture.
    pub async fn new() -> Self {
        Self::with_omdb(StubOmdb::banana_boy()).await
    }

    /// Create a test application on top of the given OMDB stand-in.
    ///
    /// Uses default configuration and a fresh in-memory cache.
    pub async fn with_omdb(omdb: StubOmdb) -> Self {
        let config = Config {
            server: omdb_backend::config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            omdb: Default::default(),
            cache: Default::default(),
            search: Default::default(),
        };

        let omdb = Arc::new(omdb);
        let search = MovieSearchAggregator::new(omdb.clone(), Arc::new(MemoryCache::new(100)))
            .with_settings(config.search_settings());

        let app = router(AppState::new(search));
        let server = TestServer::new(app).expect("Failed to create test server");

        Self { server, omdb }
    }

    pub fn server(&self) -> &TestServer {
        &self.server
    }

    pub fn omdb(&self) -> &StubOmdb {
        &self.omdb
    }
}
