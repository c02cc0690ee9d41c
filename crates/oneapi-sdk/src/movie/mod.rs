//! One API movie endpoint module.
//!
//! Builds filter and pagination fragments for `GET /movie`, sends the
//! request with bearer authentication and decodes the movie list.

mod api;
mod client;
mod params;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalMovieApi, MovieApi};
pub use client::{OneApiClient, OneApiClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use params::{ComparisonOperator, Criterion, MovieAttribute, MovieParams};
#[allow(clippy::module_name_repetitions)]
pub use types::{MovieListResponse, MovieRecord};
