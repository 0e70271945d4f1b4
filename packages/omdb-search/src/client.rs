//! OMDB (Open Movie Database) client.
//!
//! Provides paged title search and per-id detail lookups against the OMDB API.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use std::time::Duration;

use crate::error::{RemoteError, SearchError};
use crate::models::{MovieDetails, SearchPage, SearchResultItem};

pub const OMDB_BASE_URL: &str = "https://www.omdbapi.com/";

/// Error text OMDB returns with `"Response": "False"` when a search has no matches.
const NO_MATCHES_ERROR: &str = "Movie not found!";

/// Remote movie database used by the aggregator.
#[async_trait]
pub trait RemoteSearchClient: Send + Sync {
    /// Fetch one page (1-based) of a title search.
    async fn search_by_title(&self, title: &str, page: u32) -> Result<SearchPage, RemoteError>;

    /// Fetch details for a single movie by its external id.
    async fn lookup_by_id(&self, external_id: &str) -> Result<MovieDetails, RemoteError>;
}

/// Build the HTTP session shared by every OMDB request.
pub fn build_http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// OMDB API client.
///
/// Does not own its HTTP session; the process builds one `reqwest::Client`
/// and hands clones of it out.
pub struct OmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for OmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OmdbClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl OmdbClient {
    /// Create a new OMDB client on top of a shared HTTP session.
    ///
    /// Returns an error if the API key is empty.
    pub fn new(client: Client, api_key: impl Into<String>) -> Result<Self, SearchError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(SearchError::InvalidArgument(
                "OMDB API key cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            client,
            api_key,
            base_url: OMDB_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different OMDB-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform a GET with query parameters and decode the JSON body.
    async fn get_with_params<T>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, RemoteError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client
            .get(&self.base_url)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| RemoteError::transport(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                endpoint: endpoint.to_string(),
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RemoteError::transport(endpoint, e))?;

        serde_json::from_slice(&body).map_err(|source| RemoteError::Malformed {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

#[async_trait]
impl RemoteSearchClient for OmdbClient {
    async fn search_by_title(&self, title: &str, page: u32) -> Result<SearchPage, RemoteError> {
        tracing::debug!(title = %title, page, "Searching OMDB");

        let page_param = page.to_string();
        let mut params = vec![("s", title)];
        if page > 1 {
            params.push(("page", page_param.as_str()));
        }

        let endpoint = format!("search page {}", page);
        let response: OmdbSearchResponse = self.get_with_params(&endpoint, &params).await?;

        if !response.is_ok() {
            let message = response.error.unwrap_or_default();
            if message == NO_MATCHES_ERROR {
                return Ok(SearchPage::empty());
            }
            return Err(RemoteError::Rejected(message));
        }

        Ok(SearchPage {
            items: response.search.into_iter().map(Into::into).collect(),
            total_results: response.total_results,
        })
    }

    async fn lookup_by_id(&self, external_id: &str) -> Result<MovieDetails, RemoteError> {
        tracing::debug!(external_id = %external_id, "Fetching OMDB movie details");

        let endpoint = format!("lookup {}", external_id);
        let response: OmdbDetailsResponse = self
            .get_with_params(&endpoint, &[("i", external_id)])
            .await?;

        if response.response != "True" {
            return Err(RemoteError::Rejected(response.error.unwrap_or_default()));
        }

        match response.genre {
            Some(genre) => Ok(MovieDetails {
                title: response.title.unwrap_or_default(),
                genre,
            }),
            None => Err(RemoteError::Rejected(format!(
                "no genre in details for {}",
                external_id
            ))),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Search response envelope from OMDB.
#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchEntry>,
    /// Sent as a string (`"716"`).
    #[serde(rename = "totalResults", default, deserialize_with = "total_results")]
    total_results: u32,
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl OmdbSearchResponse {
    fn is_ok(&self) -> bool {
        self.response == "True"
    }
}

/// Single entry of an OMDB search page.
#[derive(Debug, Deserialize)]
struct OmdbSearchEntry {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Type")]
    media_type: String,
    #[serde(rename = "Poster")]
    poster: String,
}

impl From<OmdbSearchEntry> for SearchResultItem {
    fn from(entry: OmdbSearchEntry) -> Self {
        Self {
            title: entry.title,
            year: entry.year,
            external_id: entry.imdb_id,
            media_type: entry.media_type,
            poster_url: entry.poster,
            genres: Vec::new(),
        }
    }
}

/// Detail lookup response from OMDB; all other fields are ignored.
#[derive(Debug, Deserialize)]
struct OmdbDetailsResponse {
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Genre")]
    genre: Option<String>,
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

fn total_results<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        Number(u32),
        String(String),
    }

    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Number(n) => Ok(n),
        StringOrNumber::String(s) => s.trim().parse().map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_api_key_rejected() {
        let result = OmdbClient::new(Client::new(), "");
        assert!(result.is_err());
    }

    #[test]
    fn test_whitespace_api_key_rejected() {
        let result = OmdbClient::new(Client::new(), "   ");
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let client = OmdbClient::new(Client::new(), "daa2c3c6").unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("daa2c3c6"));
        assert!(debug.contains(OMDB_BASE_URL));
    }

    #[test]
    fn test_search_response_total_as_string() {
        let body = r#"{"Search":[{"Title":"Banana Boy","Year":"2003","imdbID":"tt0431644","Type":"movie","Poster":"N/A"}],"totalResults":"716","Response":"True"}"#;
        let response: OmdbSearchResponse = serde_json::from_str(body).unwrap();
        assert!(response.is_ok());
        assert_eq!(response.total_results, 716);

        let item: SearchResultItem = response.search.into_iter().next().unwrap().into();
        assert_eq!(item.external_id, "tt0431644");
        assert_eq!(item.poster_url, "N/A");
        assert!(item.genres.is_empty());
    }

    #[test]
    fn test_search_response_total_as_number() {
        let body = r#"{"Search":[],"totalResults":12,"Response":"True"}"#;
        let response: OmdbSearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.total_results, 12);
    }

    #[test]
    fn test_search_response_not_found() {
        let body = r#"{"Response":"False","Error":"Movie not found!"}"#;
        let response: OmdbSearchResponse = serde_json::from_str(body).unwrap();
        assert!(!response.is_ok());
        assert_eq!(response.total_results, 0);
        assert_eq!(response.error.as_deref(), Some(NO_MATCHES_ERROR));
    }

    #[test]
    fn test_search_response_bad_total_rejected() {
        let body = r#"{"Search":[],"totalResults":"many","Response":"True"}"#;
        assert!(serde_json::from_str::<OmdbSearchResponse>(body).is_err());
    }
}
