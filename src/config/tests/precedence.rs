//! Tests for layer precedence and loading from real sources.

use ortho_config::OrthoConfig;
use rstest::rstest;
use serde_json::{Value, json};

use super::helpers::{Source, compose};
use crate::BotConfig;
use crate::config::DEFAULT_ROBOT_NAME;

#[rstest]
#[case::file_overrides_defaults(
    vec![
        (Source::Defaults, json!({"repository": "octo/default"})),
        (Source::File, json!({"repository": "octo/file"})),
    ],
    "octo/file",
    "file should override default"
)]
#[case::environment_overrides_file(
    vec![
        (Source::File, json!({"repository": "octo/file"})),
        (Source::Environment, json!({"repository": "octo/env"})),
    ],
    "octo/env",
    "environment should override file"
)]
#[case::cli_overrides_environment(
    vec![
        (Source::Environment, json!({"repository": "octo/env"})),
        (Source::Cli, json!({"repository": "octo/cli"})),
    ],
    "octo/cli",
    "CLI should override environment"
)]
fn repository_follows_layer_precedence(
    #[case] layers: Vec<(Source, Value)>,
    #[case] expected: &str,
    #[case] message: &str,
) {
    let config = compose(&layers);

    assert_eq!(config.repository.as_deref(), Some(expected), "{message}");
}

#[rstest]
fn partial_layers_keep_struct_defaults() {
    let config = compose(&[(Source::Cli, json!({"merge_method": "squash"}))]);

    assert_eq!(config.merge_method.as_deref(), Some("squash"));
    assert_eq!(
        config.robot_name, DEFAULT_ROBOT_NAME,
        "unset robot_name should fall back to the default"
    );
    assert_eq!(config.start_page, 1, "unset start_page should default to 1");
}

#[rstest]
fn file_robot_name_survives_partial_cli_layer() {
    let config = compose(&[
        (Source::File, json!({"robot_name": "widgets-bot", "merge_method": "rebase"})),
        (Source::Cli, json!({"merge_method": "squash"})),
    ]);

    assert_eq!(config.robot_name, "widgets-bot");
    assert_eq!(config.merge_method.as_deref(), Some("squash"));
}

#[rstest]
fn loads_from_environment_and_cli() {
    let temp_dir = tempfile::TempDir::new().expect("temp dir should be created");
    let home = temp_dir.path().to_string_lossy().to_string();
    let _guard = env_lock::lock_env([
        ("PROWBOT_REPOSITORY", Some("octo/widgets")),
        ("PROWBOT_MERGE_METHOD", Some("rebase")),
        ("HOME", Some(home.as_str())),
        ("XDG_CONFIG_HOME", Some(home.as_str())),
    ]);

    let args = ["prowbot", "--merge-method", "squash", "--issue", "7"]
        .map(std::ffi::OsString::from);
    let config = BotConfig::load_from_iter(args).expect("config should load");

    assert_eq!(config.repository.as_deref(), Some("octo/widgets"));
    assert_eq!(
        config.merge_method.as_deref(),
        Some("squash"),
        "CLI should override PROWBOT_MERGE_METHOD"
    );
    assert_eq!(config.issue, Some(7));
}
