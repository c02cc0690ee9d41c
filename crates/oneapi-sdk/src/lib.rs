//! Client library for The One API.
//!
//! Fetches movie metadata from `https://the-one-api.dev/v2/movie` with a
//! bearer API key. Calls can block, run through the async [`LocalMovieApi`]
//! trait, or report to a three-arm [`Callback`].
//!
//! ```no_run
//! use oneapi_sdk::{MovieAttribute, MovieParams, OneApiClient};
//!
//! # fn main() -> oneapi_sdk::Result<()> {
//! let client = OneApiClient::builder().api_key("your-key").build()?;
//! let params = MovieParams::new()
//!     .with_attribute_greater_than(MovieAttribute::AcademyAwardWins, 3)
//!     .with_limit(5)?;
//! let response = client.get_movies(&params)?;
//! assert!(response.movies.len() <= 5);
//! # Ok(())
//! # }
//! ```

mod callback;
mod pool;

/// Static configuration file.
pub mod config;

/// Error types.
pub mod error;

/// Movie endpoint client.
pub mod movie;

pub use callback::Callback;
pub use config::Config;
pub use error::{OneApiError, Result};
pub use movie::{
    ComparisonOperator, Criterion, LocalMovieApi, MovieApi, MovieAttribute, MovieListResponse,
    MovieParams, MovieRecord, OneApiClient, OneApiClientBuilder,
};
