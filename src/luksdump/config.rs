//! Configuration for the `luksdump` binary.
//!
//! Sources are layered, later ones winning:
//!
//! 1. `defaults/luksdump.default.toml`, compiled in
//! 2. `luksdump.toml` in the working directory, when present
//! 3. the file given with `--config`
//! 4. `LUKSDUMP_<TABLE>__<KEY>` environment variables
//! 5. single keys set from command-line flags
//!
//! The library itself never reads configuration; [`ParseOptions`] and
//! [`NormalizeConfig`] are plain values callers may build however they like.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, Map, ValueKind};
use serde::Deserialize;
use std::path::Path;

use crate::luksdump::formats::OutputFormat;
use crate::luksdump::normalize::NormalizeConfig;
use crate::luksdump::parser::ParseOptions;

const DEFAULT_TOML: &str = include_str!("../../defaults/luksdump.default.toml");

/// Per-directory configuration file picked up when it exists.
pub const LOCAL_FILE: &str = "luksdump.toml";

/// Prefix of environment overrides, e.g. `LUKSDUMP_PARSER__MIN_LUKS2_SECTIONS=0`.
pub const ENV_PREFIX: &str = "LUKSDUMP";

#[derive(Debug, Clone, Deserialize)]
pub struct LuksdumpConfig {
    pub parser: ParseOptions,
    pub normalize: NormalizeConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// A loader holding only the compiled-in defaults.
    pub fn new() -> Self {
        Self {
            builder: Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml)),
        }
    }

    /// Layers a TOML file that has to exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml(path.as_ref(), true)
    }

    /// Layers a TOML file, skipping it when absent.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml(path.as_ref(), false)
    }

    fn with_toml(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layers `LUKSDUMP_*` variables from the process environment.
    pub fn with_environment(self) -> Self {
        self.with_environment_source(None)
    }

    /// Layers `LUKSDUMP_*` variables from `vars` instead of the process environment.
    pub fn with_environment_source(mut self, vars: Option<Map<String, String>>) -> Self {
        let source = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(vars);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Sets one dotted key, e.g. `parser.min_luks2_sections`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<LuksdumpConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Layers the working-directory file, `explicit` and the environment over the defaults.
///
/// Command-line flags go on top with [`Loader::set_override`].
pub fn cli_loader(explicit: Option<&Path>) -> Loader {
    let mut loader = Loader::new().with_optional_file(LOCAL_FILE);
    if let Some(path) = explicit {
        loader = loader.with_file(path);
    }
    loader.with_environment()
}
