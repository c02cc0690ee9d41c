//! oneapi - The One API movie CLI.

use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use url::Url;

use oneapi_sdk::{
    Callback, Criterion, MovieListResponse, MovieParams, OneApiClient, OneApiClientBuilder,
    OneApiError,
};

/// Environment variable consulted when `--api-key` is omitted.
const API_KEY_ENV: &str = "ONE_API_KEY";

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory (default: $XDG_CONFIG_HOME/oneapi or ~/.config/oneapi).
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Query the movie endpoint.
    Movies(MoviesArgs),
}

/// Arguments for the `movies` subcommand.
#[derive(clap::Args)]
struct MoviesArgs {
    /// Filter criterion `<field><op><value>` (repeatable), e.g. "runtimeInMinutes>=180".
    /// Fields: _id, name, runtimeInMinutes, budgetInMillions, boxOfficeRevenueInMillions,
    /// academyAwardNominations, academyAwardWins, rottenTomatoesScore.
    #[arg(long = "filter", value_name = "CRITERION")]
    filters: Vec<Criterion>,

    /// Page number.
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    page: i64,

    /// Offset from the first movie.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    offset: i64,

    /// Maximum number of movies to return.
    #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
    limit: i64,

    /// API key. Falls back to `ONE_API_KEY`, then to the config file.
    #[arg(long)]
    api_key: Option<String>,

    /// Override the API base URL.
    #[arg(long)]
    base_url: Option<Url>,

    /// Deliver the result through the callback interface instead of blocking.
    #[arg(long)]
    callback: bool,
}

/// Forwards the callback outcome to the waiting main thread.
struct ForwardCallback(mpsc::Sender<Result<MovieListResponse, OneApiError>>);

impl Callback<MovieListResponse> for ForwardCallback {
    fn on_success(self, status: u16, data: MovieListResponse) {
        tracing::debug!(status, "Callback reported success");
        let _ = self.0.send(Ok(data));
    }

    fn on_failure(self, status: u16) {
        let _ = self.0.send(Err(OneApiError::Api { status }));
    }

    fn on_error(self, error: OneApiError) {
        let _ = self.0.send(Err(error));
    }
}

/// Builds `MovieParams` from CLI arguments.
///
/// # Errors
///
/// Returns an error if a pagination value is out of range.
fn build_params(args: &MoviesArgs) -> Result<MovieParams> {
    let params = args
        .filters
        .iter()
        .fold(MovieParams::new(), MovieParams::with_criterion)
        .with_page(args.page)?
        .with_offset(args.offset)?
        .with_limit(args.limit)?;
    Ok(params)
}

/// Picks the first non-blank key from the flag and the environment.
///
/// `None` leaves the config file key in charge.
fn resolve_api_key(flag: Option<&str>, env: Option<&str>) -> Option<String> {
    [flag, env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|key| !key.is_empty())
        .map(String::from)
}

/// Builds a `OneApiClient` from the config file, environment and flags.
///
/// # Errors
///
/// Returns an error if the config file is invalid or no API key is available.
#[instrument(skip_all)]
fn build_client(args: &MoviesArgs, dir: Option<&PathBuf>) -> Result<OneApiClient> {
    let mut builder = OneApiClientBuilder::from_config_dir(dir.map(PathBuf::as_path))
        .context("failed to load config")?;

    let env_key = std::env::var(API_KEY_ENV).ok();
    if let Some(key) = resolve_api_key(args.api_key.as_deref(), env_key.as_deref()) {
        builder = builder.api_key(key);
    }
    if let Some(url) = &args.base_url {
        builder = builder.base_url(url.clone());
    }

    builder.build().context("failed to build One API client")
}

/// Runs the `movies` subcommand.
///
/// # Errors
///
/// Returns an error if arguments are invalid, the client fails to build,
/// or the API request fails.
#[instrument(skip_all)]
fn run_movies(args: &MoviesArgs, dir: Option<&PathBuf>) -> Result<()> {
    let params = build_params(args).context("invalid movie query")?;
    let client = build_client(args, dir)?;

    tracing::debug!(query = ?params.to_query_list(), "Movie query");

    let response = if args.callback {
        let (tx, rx) = mpsc::channel();
        let _handle = client.get_movies_with_callback(&params, ForwardCallback(tx));
        let Ok(outcome) = rx.recv() else {
            bail!("movie request finished without reporting a result");
        };
        outcome
    } else {
        client.get_movies(&params)
    }
    .context("movie request failed")?;

    print_movies(&response);
    Ok(())
}

/// Logs a movie list as a table.
fn print_movies(response: &MovieListResponse) {
    tracing::info!(
        "Total: {} (page {}/{}, offset {}, limit {})",
        response.total,
        response.page,
        response.pages,
        response.offset,
        response.limit,
    );
    tracing::info!("ID\t\t\t\tName\t\t\tRuntime\tBudget\tBoxOffice\tNoms\tWins\tRT");
    for movie in &response.movies {
        tracing::info!(
            "{}\t{}\t{}\t{}\t{}\t\t{}\t{}\t{}",
            movie.id,
            movie.name,
            movie.runtime_in_minutes,
            movie.budget_in_millions,
            movie.box_office_revenue_in_millions,
            movie.academy_award_nominations,
            movie.academy_award_wins,
            movie.rotten_tomatoes_score,
        );
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Movies(args) => run_movies(&args, cli.dir.as_ref()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn parse_movies(args: &[&str]) -> MoviesArgs {
        let cli = Cli::try_parse_from(["oneapi", "movies"].iter().chain(args).copied()).unwrap();
        match cli.command {
            Commands::Movies(args) => args,
        }
    }

    #[test]
    fn test_build_params_defaults() {
        // Arrange
        let args = parse_movies(&[]);

        // Act
        let params = build_params(&args).unwrap();

        // Assert
        assert_eq!(params.to_query_list(), vec!["page=1", "offset=0", "limit=10"]);
    }

    #[test]
    fn test_build_params_with_filters_and_pagination() {
        // Arrange
        let args = parse_movies(&[
            "--filter",
            "name=/ring/i",
            "--filter",
            "academyAwardWins>=4",
            "--page",
            "2",
            "--limit",
            "3",
        ]);

        // Act
        let params = build_params(&args).unwrap();

        // Assert
        assert_eq!(
            params.to_query_list(),
            vec![
                "name=/ring/i",
                "academyAwardWins>=4",
                "page=2",
                "offset=0",
                "limit=3",
            ]
        );
    }

    #[test]
    fn test_build_params_rejects_negative_limit() {
        // Arrange
        let args = parse_movies(&["--limit", "-1"]);

        // Act
        let result = build_params(&args);

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("limit must not be a negative value")
        );
    }

    #[test]
    fn test_unknown_filter_field_rejected_by_parser() {
        // Arrange & Act
        let result = Cli::try_parse_from(["oneapi", "movies", "--filter", "director=Jackson"]);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_api_key_flag_wins() {
        // Arrange & Act
        let key = resolve_api_key(Some("flag-key"), Some("env-key"));

        // Assert
        assert_eq!(key.as_deref(), Some("flag-key"));
    }

    #[test]
    fn test_resolve_api_key_blank_flag_falls_back_to_env() {
        // Arrange & Act
        let key = resolve_api_key(Some("  "), Some(" env-key "));

        // Assert
        assert_eq!(key.as_deref(), Some("env-key"));
    }

    #[test]
    fn test_resolve_api_key_blank_everywhere_defers_to_config() {
        // Arrange & Act
        let key = resolve_api_key(Some(""), Some(" "));

        // Assert
        assert!(key.is_none());
    }

    #[test]
    fn test_build_client_sends_flag_key_over_config_key() {
        // Arrange
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let server = rt.block_on(MockServer::start());
        rt.block_on(async {
            Mock::given(method("GET"))
                .and(path("/movie"))
                .and(header("Authorization", "Bearer flag-key"))
                .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"docs":[]}"#))
                .expect(1)
                .mount(&server)
                .await;
        });
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "api-key = \"file-key\"\n").unwrap();
        let uri = server.uri();
        let args = parse_movies(&["--api-key", "flag-key", "--base-url", uri.as_str()]);

        // Act
        let client = build_client(&args, Some(&dir.path().to_path_buf())).unwrap();
        let result = client.get_movies(&MovieParams::new());

        // Assert
        assert!(result.is_ok());
    }
}
