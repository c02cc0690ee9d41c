//! `MovieApi` trait definition.
#![allow(clippy::future_not_send)]

use super::params::MovieParams;
use super::types::MovieListResponse;
use crate::error::Result;

/// One API movie endpoint trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(MovieApi: Send)]
pub trait LocalMovieApi {
    /// Fetches a single page of movies matching `params`.
    ///
    /// # Errors
    ///
    /// Returns `OneApiError::Api` for non-2xx responses,
    /// `OneApiError::Transport` when no response was received and
    /// `OneApiError::Decode` when the body is not valid movie JSON.
    async fn movies(&self, params: &MovieParams) -> Result<MovieListResponse>;
}
