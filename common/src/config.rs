use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::de::DeserializeOwned;

use crate::logging;

/// Environment variables starting with this prefix override config values,
/// nested keys are separated by `__` (`HOOKED_DATABASE__URI`).
pub const ENV_PREFIX: &str = "HOOKED";

const FILE_EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
	/// The log level to use, this is a tracing env filter
	pub level: String,

	/// What logging mode we should use
	pub mode: logging::Mode,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			mode: logging::Mode::Default,
		}
	}
}

/// Resolves `path` as given or with one of the supported extensions appended.
fn locate(path: &str) -> Option<PathBuf> {
	let base = Path::new(path);
	if base.is_file() {
		return Some(base.to_path_buf());
	}

	FILE_EXTENSIONS
		.iter()
		.map(|ext| PathBuf::from(format!("{path}.{ext}")))
		.find(|candidate| candidate.is_file())
}

/// Builds `C` from (lowest priority first) its serde defaults, a config file
/// and the environment.
///
/// The file named by `HOOKED_CONFIG_FILE` must exist. Otherwise
/// `default_file` is used when present and silently skipped when missing.
/// Returns the config together with the canonical path of the file that was
/// loaded, if any.
pub fn parse<C: DeserializeOwned>(default_file: Option<&str>) -> Result<(C, Option<String>), ConfigError> {
	let requested = std::env::var(format!("{ENV_PREFIX}_CONFIG_FILE"))
		.ok()
		.filter(|path| !path.is_empty());

	let mut builder = Config::builder();
	let mut loaded = None;

	match (requested, default_file) {
		(Some(path), _) => {
			let file = locate(&path).ok_or(ConfigError::NotFound(path))?;
			builder = builder.add_source(File::from(file.as_path()));
			loaded = Some(file);
		}
		(None, Some(path)) => match locate(path) {
			Some(file) => {
				builder = builder.add_source(File::from(file.as_path()));
				loaded = Some(file);
			}
			None => tracing::debug!(path, "no config file found, using defaults"),
		},
		(None, None) => {}
	}

	let config = builder
		.add_source(
			Environment::with_prefix(ENV_PREFIX)
				.prefix_separator("_")
				.separator("__")
				.try_parsing(true),
		)
		.build()?
		.try_deserialize()?;

	let loaded = loaded
		.map(|file| std::fs::canonicalize(&file).unwrap_or(file))
		.map(|file| file.display().to_string());

	Ok((config, loaded))
}
