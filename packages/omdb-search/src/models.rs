//! Domain types shared by the aggregator, the remote client and the cache.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};

/// Fixed page size of the remote search endpoint.
pub const PAGE_SIZE: u32 = 10;

/// Sentinel the remote uses for missing fields (e.g. posters).
pub const NOT_AVAILABLE: &str = "N/A";

/// One movie returned by a title search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub title: String,
    pub year: String,
    /// Remote identifier (IMDb id), unique per movie.
    pub external_id: String,
    pub media_type: String,
    /// Poster URL, or [`NOT_AVAILABLE`].
    pub poster_url: String,
    /// Empty until the item has been enriched by a detail lookup.
    #[serde(default)]
    pub genres: Vec<String>,
}

impl SearchResultItem {
    /// Whether any of this item's genres equals `genre` exactly.
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }
}

/// One page of a remote title search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub items: Vec<SearchResultItem>,
    /// Total number of matches across all pages.
    pub total_results: u32,
}

impl SearchPage {
    /// A page representing "no matches".
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Subset of a remote detail lookup the aggregator cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieDetails {
    pub title: String,
    /// Raw comma separated genre list, e.g. `"Short, Drama"`.
    pub genre: String,
}

impl MovieDetails {
    /// Genre tags parsed from the raw genre string.
    pub fn genres(&self) -> Vec<String> {
        parse_genres(&self.genre)
    }
}

/// Validated search input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub title: String,
    pub genre: Option<String>,
}

impl SearchQuery {
    /// Build a query, rejecting a blank title.
    ///
    /// The title is trimmed. An empty genre means "no genre filter".
    pub fn new(title: &str, genre: Option<&str>) -> Result<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(SearchError::InvalidArgument(
                "title is required".to_string(),
            ));
        }

        Ok(Self {
            title: title.to_string(),
            genre: genre.filter(|g| !g.is_empty()).map(str::to_string),
        })
    }

    /// Cache key for this query. Depends on the title only, so one cached
    /// result serves every genre filter.
    pub fn cache_key(&self) -> String {
        format!("omdb:search:{}", self.title)
    }
}

/// Number of remote pages needed to hold `total_results` matches.
pub fn page_count(total_results: u32) -> u32 {
    let full_pages = total_results / PAGE_SIZE;
    if total_results % PAGE_SIZE != 0 {
        full_pages + 1
    } else {
        full_pages
    }
}

/// Split a comma separated genre string into trimmed tags.
///
/// Never returns an empty list: a blank string yields `[NOT_AVAILABLE]`.
pub fn parse_genres(raw: &str) -> Vec<String> {
    let genres: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect();

    if genres.is_empty() {
        vec![NOT_AVAILABLE.to_string()]
    } else {
        genres
    }
}

/// Keep only items tagged with `genre`, preserving order.
pub fn filter_by_genre(items: Vec<SearchResultItem>, genre: &str) -> Vec<SearchResultItem> {
    items.into_iter().filter(|item| item.has_genre(genre)).collect()
}
