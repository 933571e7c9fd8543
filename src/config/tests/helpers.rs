//! Builders for configuration test fixtures.

use std::ffi::OsString;

use ortho_config::{MergeComposer, OrthoConfig};
use serde_json::Value;

use crate::BotConfig;

/// Where a fragment of bot configuration comes from.
#[derive(Debug, Clone, Copy)]
pub enum Source {
    Defaults,
    File,
    Environment,
    Cli,
}

/// Merges `(source, fragment)` pairs in order into a [`BotConfig`].
pub fn compose(fragments: &[(Source, Value)]) -> BotConfig {
    let mut composer = MergeComposer::new();
    for (source, value) in fragments {
        let fragment = value.clone();
        match source {
            Source::Defaults => composer.push_defaults(fragment),
            Source::File => composer.push_file(fragment, None),
            Source::Environment => composer.push_environment(fragment),
            Source::Cli => composer.push_cli(fragment),
        }
    }
    BotConfig::merge_from_layers(composer.layers()).expect("fragments should merge")
}

/// Loads a [`BotConfig`] from `prowbot <flags>` with `HOME` pointed at an
/// empty directory so no dotfile is discovered.
pub fn load_flags(flags: &[&str]) -> BotConfig {
    let home_dir = tempfile::TempDir::new().expect("temp dir should be created");
    let home = home_dir.path().to_string_lossy().to_string();
    let _guard = env_lock::lock_env([
        ("HOME", Some(home.as_str())),
        ("XDG_CONFIG_HOME", Some(home.as_str())),
        ("PROWBOT_ISSUE", None),
        ("PROWBOT_COMMENTER", None),
    ]);

    let argv = std::iter::once("prowbot")
        .chain(flags.iter().copied())
        .map(OsString::from);
    BotConfig::load_from_iter(argv).expect("flags should load")
}
