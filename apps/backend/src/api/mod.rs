//! API endpoint handlers for the movie search backend.

pub mod movies;
