#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIXTURE: &str = include_str!("../../../fixtures/oneapi/movies_full.json");

#[test]
fn test_movies_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("oneapi");
    cmd.args(["movies", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--filter"));
}

#[test]
fn test_movies_unknown_filter_field() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("oneapi");
    cmd.args(["movies", "--filter", "director=Jackson"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown movie attribute"));
}

#[test]
fn test_movies_negative_limit() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("oneapi");
    cmd.args(["movies", "--limit", "-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("limit must not be a negative value"));
}

#[test]
fn test_movies_zero_page() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("oneapi");
    cmd.args(["movies", "--page", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("page must be a positive value"));
}

#[test]
fn test_movies_missing_api_key() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("oneapi");
    cmd.env_remove("ONE_API_KEY")
        .arg("--dir")
        .arg(dir.path())
        .arg("movies")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No API key was provided"));
}

#[test]
fn test_movies_invalid_config_file() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "api-key = [1]\n").unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("oneapi");
    cmd.env_remove("ONE_API_KEY")
        .arg("--dir")
        .arg(dir.path())
        .arg("movies")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn test_movies_unreachable_server() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("oneapi");
    cmd.arg("--dir").arg(dir.path()).args([
        "movies",
        "--api-key",
        "test-key",
        "--base-url",
        "http://127.0.0.1:1/",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("failed to get movie data"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_movies_lists_results() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie"))
        .and(header("authorization", "Bearer test-key"))
        .and(query_param("limit", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(FIXTURE.as_bytes(), "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("oneapi");
    cmd.env("ONE_API_KEY", "test-key")
        .arg("--dir")
        .arg(dir.path())
        .args(["movies", "--limit", "2", "--base-url"])
        .arg(server.uri())
        .assert()
        .success()
        .stdout(predicate::str::contains("The Fellowship of the Ring"))
        .stdout(predicate::str::contains("Total: 8"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_movies_callback_reports_failure_status() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("oneapi");
    cmd.arg("--dir")
        .arg(dir.path())
        .args(["movies", "--callback", "--api-key", "bad-key", "--base-url"])
        .arg(server.uri())
        .assert()
        .failure()
        .stderr(predicate::str::contains("server returned 401"));
}

/// Mounts a `GET /movie` mock that only accepts `Bearer {key}`.
async fn server_accepting(key: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie"))
        .and(header("authorization", format!("Bearer {key}").as_str()))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(FIXTURE.as_bytes(), "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;
    server
}

/// Temporary config dir holding `api-key = "file-key"`.
fn config_dir_with_file_key() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "api-key = \"file-key\"\n").unwrap();
    dir
}

#[tokio::test(flavor = "multi_thread")]
async fn test_movies_flag_key_beats_env_and_config() {
    // Arrange
    let server = server_accepting("flag-key").await;
    let dir = config_dir_with_file_key();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("oneapi");
    cmd.env("ONE_API_KEY", "env-key")
        .arg("--dir")
        .arg(dir.path())
        .args(["movies", "--api-key", "flag-key", "--base-url"])
        .arg(server.uri())
        .assert()
        .success();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_movies_env_key_beats_config() {
    // Arrange
    let server = server_accepting("env-key").await;
    let dir = config_dir_with_file_key();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("oneapi");
    cmd.env("ONE_API_KEY", "env-key")
        .arg("--dir")
        .arg(dir.path())
        .args(["movies", "--base-url"])
        .arg(server.uri())
        .assert()
        .success();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_movies_blank_flag_falls_back_to_env_key() {
    // Arrange
    let server = server_accepting("env-key").await;
    let dir = config_dir_with_file_key();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("oneapi");
    cmd.env("ONE_API_KEY", "env-key")
        .arg("--dir")
        .arg(dir.path())
        .args(["movies", "--api-key", " ", "--base-url"])
        .arg(server.uri())
        .assert()
        .success();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_movies_config_key_used_without_flag_or_env() {
    // Arrange
    let server = server_accepting("file-key").await;
    let dir = config_dir_with_file_key();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("oneapi");
    cmd.env("ONE_API_KEY", "")
        .arg("--dir")
        .arg(dir.path())
        .args(["movies", "--base-url"])
        .arg(server.uri())
        .assert()
        .success();
}
