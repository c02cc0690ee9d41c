//! Movie endpoint response types.

use serde::Deserialize;
use serde::de::{self, Deserializer};

/// Response from the `movie` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MovieListResponse {
    /// Total number of matching movies.
    pub total: u32,
    /// Page size used by the server.
    pub limit: u32,
    /// Offset used by the server.
    pub offset: u32,
    /// Current page number.
    pub page: u32,
    /// Total number of pages.
    pub pages: u32,
    /// Movies on this page.
    #[serde(rename = "docs")]
    pub movies: Vec<MovieRecord>,
}

/// A single movie.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    /// Movie ID.
    #[serde(rename = "_id")]
    pub id: String,
    /// Movie name.
    #[serde(default)]
    pub name: String,
    /// Runtime in minutes.
    #[serde(default, deserialize_with = "truncated_u32")]
    pub runtime_in_minutes: u32,
    /// Budget in millions of USD.
    #[serde(default, deserialize_with = "truncated_u32")]
    pub budget_in_millions: u32,
    /// Box office revenue in millions of USD.
    #[serde(default, deserialize_with = "truncated_u32")]
    pub box_office_revenue_in_millions: u32,
    /// Number of Academy Award nominations.
    #[serde(default, deserialize_with = "truncated_u32")]
    pub academy_award_nominations: u32,
    /// Number of Academy Award wins.
    #[serde(default, deserialize_with = "truncated_u32")]
    pub academy_award_wins: u32,
    /// Rotten Tomatoes score.
    #[serde(default, deserialize_with = "truncated_u32")]
    pub rotten_tomatoes_score: u32,
}

/// Accepts integer or fractional JSON numbers; fractions are truncated toward zero.
#[allow(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn truncated_u32<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Integer(u64),
        Float(f64),
    }

    match Number::deserialize(deserializer)? {
        Number::Integer(n) => u32::try_from(n).map_err(de::Error::custom),
        Number::Float(f) if f.is_finite() && (0.0..=f64::from(u32::MAX)).contains(&f) => {
            Ok(f.trunc() as u32)
        }
        Number::Float(f) => Err(de::Error::custom(format!("number out of range: {f}"))),
    }
}
