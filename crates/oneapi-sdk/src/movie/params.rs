//! Movie endpoint request parameter types.
//!
//! Criteria are formatted into query fragments as soon as they are added.
//! The remote filter syntax is a flat `<field><op><value>` DSL, so there is
//! nothing to gain from keeping them structured until serialization.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use url::form_urlencoded;

use crate::error::{OneApiError, Result};

/// Default page number.
const DEFAULT_PAGE: u32 = 1;

/// Default offset.
const DEFAULT_OFFSET: u32 = 0;

/// Default page size.
const DEFAULT_LIMIT: u32 = 10;

/// Regex for parsing `<field><op><value>` criteria.
///
/// Two-character operators come first so `<=` is not read as `<` followed by `=`.
#[allow(clippy::expect_used)]
static CRITERION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_]+)(!=|<=|>=|=|<|>)(.+)$").expect("failed to compile criterion regex")
});

/// Filterable movie attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovieAttribute {
    /// Movie ID (`_id`).
    Id,
    /// Movie name.
    Name,
    /// Runtime in minutes.
    RuntimeInMinutes,
    /// Budget in millions of USD.
    BudgetInMillions,
    /// Box office revenue in millions of USD.
    BoxOfficeRevenueInMillions,
    /// Number of Academy Award nominations.
    AcademyAwardNominations,
    /// Number of Academy Award wins.
    AcademyAwardWins,
    /// Rotten Tomatoes score.
    RottenTomatoesScore,
}

impl MovieAttribute {
    /// Every attribute, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Id,
        Self::Name,
        Self::RuntimeInMinutes,
        Self::BudgetInMillions,
        Self::BoxOfficeRevenueInMillions,
        Self::AcademyAwardNominations,
        Self::AcademyAwardWins,
        Self::RottenTomatoesScore,
    ];

    /// Field name expected by the API.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Id => "_id",
            Self::Name => "name",
            Self::RuntimeInMinutes => "runtimeInMinutes",
            Self::BudgetInMillions => "budgetInMillions",
            Self::BoxOfficeRevenueInMillions => "boxOfficeRevenueInMillions",
            Self::AcademyAwardNominations => "academyAwardNominations",
            Self::AcademyAwardWins => "academyAwardWins",
            Self::RottenTomatoesScore => "rottenTomatoesScore",
        }
    }
}

impl fmt::Display for MovieAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for MovieAttribute {
    type Err = OneApiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|attribute| attribute.wire_name() == s)
            .ok_or_else(|| OneApiError::Validation(format!("unknown movie attribute: {s}")))
    }
}

/// Comparison operators supported by the filter syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    /// `=`
    Equals,
    /// `!=`
    NotEquals,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqualTo,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqualTo,
}

impl ComparisonOperator {
    /// Operator symbol as written in the query string.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::LessThan => "<",
            Self::LessThanOrEqualTo => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqualTo => ">=",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for ComparisonOperator {
    type Err = OneApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "=" => Ok(Self::Equals),
            "!=" => Ok(Self::NotEquals),
            "<" => Ok(Self::LessThan),
            "<=" => Ok(Self::LessThanOrEqualTo),
            ">" => Ok(Self::GreaterThan),
            ">=" => Ok(Self::GreaterThanOrEqualTo),
            other => Err(OneApiError::Validation(format!(
                "unknown comparison operator: {other}"
            ))),
        }
    }
}

/// A single filter condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criterion {
    /// Targeted attribute.
    pub attribute: MovieAttribute,
    /// Comparison applied to the attribute.
    pub operator: ComparisonOperator,
    /// Value in its string form.
    pub value: String,
}

impl Criterion {
    /// Creates a criterion from any displayable value.
    #[must_use]
    pub fn new(
        attribute: MovieAttribute,
        operator: ComparisonOperator,
        value: impl fmt::Display,
    ) -> Self {
        Self {
            attribute,
            operator,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.attribute, self.operator, self.value)
    }
}

impl FromStr for Criterion {
    type Err = OneApiError;

    /// Parses `<field><op><value>`, e.g. `runtimeInMinutes>=120`.
    fn from_str(s: &str) -> Result<Self> {
        let caps = CRITERION_RE.captures(s).ok_or_else(|| {
            OneApiError::Validation(format!(
                "criterion must look like <field><op><value>, got: {s}"
            ))
        })?;
        let (Some(field), Some(op), Some(value)) = (caps.get(1), caps.get(2), caps.get(3)) else {
            return Err(OneApiError::Validation(format!("malformed criterion: {s}")));
        };

        Ok(Self {
            attribute: field.as_str().parse()?,
            operator: op.as_str().parse()?,
            value: String::from(value.as_str()),
        })
    }
}

/// Request parameters for the `movie` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieParams {
    /// Serialized criteria, in insertion order.
    criteria: Vec<String>,
    /// Page number (1-based).
    page: u32,
    /// Offset from the first movie.
    offset: u32,
    /// Maximum number of movies per page.
    limit: u32,
}

impl Default for MovieParams {
    fn default() -> Self {
        Self {
            criteria: Vec::new(),
            page: DEFAULT_PAGE,
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl MovieParams {
    /// Creates parameters with `page=1`, `offset=0`, `limit=10` and no criteria.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a criterion.
    #[must_use]
    pub fn with_criterion(mut self, criterion: &Criterion) -> Self {
        self.criteria.push(criterion.to_string());
        self
    }

    /// Appends an `attribute=value` criterion.
    #[must_use]
    pub fn with_attribute_equals(
        self,
        attribute: MovieAttribute,
        value: impl fmt::Display,
    ) -> Self {
        self.with_attribute(attribute, ComparisonOperator::Equals, value)
    }

    /// Appends an `attribute!=value` criterion.
    #[must_use]
    pub fn with_attribute_not_equals(
        self,
        attribute: MovieAttribute,
        value: impl fmt::Display,
    ) -> Self {
        self.with_attribute(attribute, ComparisonOperator::NotEquals, value)
    }

    /// Appends an `attribute<value` criterion.
    #[must_use]
    pub fn with_attribute_less_than(
        self,
        attribute: MovieAttribute,
        value: impl fmt::Display,
    ) -> Self {
        self.with_attribute(attribute, ComparisonOperator::LessThan, value)
    }

    /// Appends an `attribute<=value` criterion.
    #[must_use]
    pub fn with_attribute_less_than_or_equal_to(
        self,
        attribute: MovieAttribute,
        value: impl fmt::Display,
    ) -> Self {
        self.with_attribute(attribute, ComparisonOperator::LessThanOrEqualTo, value)
    }

    /// Appends an `attribute>value` criterion.
    #[must_use]
    pub fn with_attribute_greater_than(
        self,
        attribute: MovieAttribute,
        value: impl fmt::Display,
    ) -> Self {
        self.with_attribute(attribute, ComparisonOperator::GreaterThan, value)
    }

    /// Appends an `attribute>=value` criterion.
    #[must_use]
    pub fn with_attribute_greater_than_or_equal_to(
        self,
        attribute: MovieAttribute,
        value: impl fmt::Display,
    ) -> Self {
        self.with_attribute(attribute, ComparisonOperator::GreaterThanOrEqualTo, value)
    }

    /// Appends `<attribute><operator><value>`.
    fn with_attribute(
        mut self,
        attribute: MovieAttribute,
        operator: ComparisonOperator,
        value: impl fmt::Display,
    ) -> Self {
        self.criteria.push(format!("{attribute}{operator}{value}"));
        self
    }

    /// Sets the page number.
    ///
    /// # Errors
    ///
    /// Returns `OneApiError::Validation` if `page` is not positive or does not fit in `u32`.
    pub fn with_page(mut self, page: i64) -> Result<Self> {
        if page <= 0 {
            return Err(OneApiError::Validation(String::from(
                "page must be a positive value",
            )));
        }
        self.page = to_u32("page", page)?;
        Ok(self)
    }

    /// Sets the offset.
    ///
    /// # Errors
    ///
    /// Returns `OneApiError::Validation` if `offset` is negative or does not fit in `u32`.
    pub fn with_offset(mut self, offset: i64) -> Result<Self> {
        if offset < 0 {
            return Err(OneApiError::Validation(String::from(
                "offset must not be a negative value",
            )));
        }
        self.offset = to_u32("offset", offset)?;
        Ok(self)
    }

    /// Sets the maximum number of movies to return.
    ///
    /// # Errors
    ///
    /// Returns `OneApiError::Validation` if `limit` is negative or does not fit in `u32`.
    pub fn with_limit(mut self, limit: i64) -> Result<Self> {
        if limit < 0 {
            return Err(OneApiError::Validation(String::from(
                "limit must not be a negative value",
            )));
        }
        self.limit = to_u32("limit", limit)?;
        Ok(self)
    }

    /// Current page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Current offset.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    /// Current limit.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Serialized criteria added so far.
    #[must_use]
    pub fn criteria(&self) -> &[String] {
        &self.criteria
    }

    /// Builds the query fragments: criteria first, then `page`, `offset`, `limit`.
    ///
    /// The returned list is a fresh copy; changing it does not affect `self`.
    #[must_use]
    pub fn to_query_list(&self) -> Vec<String> {
        let mut query = Vec::with_capacity(self.criteria.len().saturating_add(3));
        query.extend(self.criteria.iter().cloned());
        query.push(format!("page={}", self.page));
        query.push(format!("offset={}", self.offset));
        query.push(format!("limit={}", self.limit));
        query
    }
}

/// Operator symbols, longest first so `<=` wins over `<`.
const OPERATOR_SYMBOLS: [&str; 6] = ["!=", "<=", ">=", "=", "<", ">"];

/// Percent-encodes the value part of a `<field><op><value>` fragment.
///
/// Field names never contain operator characters, so the first operator is
/// the split point. `&`, `#`, `+` and `%` in a value stay inside its fragment.
pub(crate) fn encode_fragment(fragment: &str) -> String {
    let split = fragment
        .find(|c: char| !(c.is_ascii_alphabetic() || c == '_'))
        .unwrap_or(fragment.len());
    let (field, rest) = fragment.split_at(split);
    let op = OPERATOR_SYMBOLS
        .into_iter()
        .find(|op| rest.starts_with(op))
        .unwrap_or_default();
    let value = rest.get(op.len()..).unwrap_or_default();

    let mut encoded = format!("{field}{op}");
    encoded.extend(form_urlencoded::byte_serialize(value.as_bytes()));
    encoded
}

/// Narrows a validated, non-negative pagination value.
fn to_u32(name: &str, value: i64) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| OneApiError::Validation(format!("{name} is too large: {value}")))
}
