//! Settings structure and sources

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix of the environment variables read by [`Settings::apply_env`].
pub const ENV_PREFIX: &str = "HALYARD_";

/// Project-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Suppress the warning emitted when two handlers are registered for the
	/// same model and anonymity.
	pub ignore_duplicate_models: bool,

	/// Logging configuration
	pub logging: LoggingSettings,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
	/// Filter directive, e.g. `info` or `halyard_handlers=debug`.
	pub level: String,
	pub format: LogFormat,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Text,
		}
	}
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	#[default]
	Text,
	Json,
}

impl std::str::FromStr for LogFormat {
	type Err = SettingsError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"text" => Ok(LogFormat::Text),
			"json" => Ok(LogFormat::Json),
			other => Err(SettingsError::ValidationError(format!(
				"unknown log format '{}', expected 'text' or 'json'",
				other
			))),
		}
	}
}

impl Settings {
	/// Create settings with defaults
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse settings from TOML text. Missing keys keep their defaults.
	pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
		toml::from_str(contents)
			.map_err(|e| SettingsError::ParseError(format!("TOML parse error: {}", e)))
	}

	/// Load settings from a `.toml` or `.json` file
	pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
		let path = path.into();
		let contents = std::fs::read_to_string(&path).map_err(|e| {
			SettingsError::FileError(format!("Failed to read {}: {}", path.display(), e))
		})?;

		let settings = match path.extension().and_then(|s| s.to_str()) {
			Some("toml") => Self::from_toml_str(&contents)?,
			Some("json") => serde_json::from_str(&contents)
				.map_err(|e| SettingsError::ParseError(format!("JSON parse error: {}", e)))?,
			_ => {
				return Err(SettingsError::UnsupportedFormat(
					"Supported formats: .toml, .json".to_string(),
				));
			}
		};
		tracing::debug!(path = %path.display(), "loaded settings file");
		Ok(settings)
	}

	/// Load settings from defaults, then `path` if given, then the process
	/// environment.
	pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
		let mut settings = match path {
			Some(path) => Self::from_file(path)?,
			None => Self::default(),
		};
		settings.apply_env()?;
		Ok(settings)
	}

	/// Overlay `HALYARD_*` variables from the process environment.
	pub fn apply_env(&mut self) -> Result<(), SettingsError> {
		self.apply_env_from(|key| std::env::var(key).ok())
	}

	/// Overlay `HALYARD_*` variables obtained from `lookup`.
	///
	/// Recognised keys: `HALYARD_IGNORE_DUPLICATE_MODELS`, `HALYARD_LOG_LEVEL`,
	/// `HALYARD_LOG_FORMAT`.
	pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), SettingsError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let var = |name: &str| {
			let key = format!("{}{}", ENV_PREFIX, name);
			let value = lookup(&key);
			if value.is_some() {
				tracing::debug!(key = %key, "applying environment override");
			}
			value
		};

		if let Some(value) = var("IGNORE_DUPLICATE_MODELS") {
			self.ignore_duplicate_models = parse_bool("IGNORE_DUPLICATE_MODELS", &value)?;
		}
		if let Some(level) = var("LOG_LEVEL") {
			self.logging.level = level;
		}
		if let Some(format) = var("LOG_FORMAT") {
			self.logging.format = format.parse()?;
		}

		Ok(())
	}
}

fn parse_bool(name: &str, value: &str) -> Result<bool, SettingsError> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Ok(true),
		"0" | "false" | "no" | "off" | "" => Ok(false),
		other => Err(SettingsError::ValidationError(format!(
			"{}{} must be a boolean, got '{}'",
			ENV_PREFIX, name, other
		))),
	}
}

/// Settings error
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("File error: {0}")]
	FileError(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Unsupported format: {0}")]
	UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::collections::HashMap;

	fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[rstest]
	fn test_defaults() {
		let settings = Settings::new();
		assert!(!settings.ignore_duplicate_models);
		assert_eq!(settings.logging.level, "info");
		assert_eq!(settings.logging.format, LogFormat::Text);
	}

	#[rstest]
	fn test_partial_toml_keeps_defaults() {
		let settings = Settings::from_toml_str(
			r#"
[logging]
format = "json"
"#,
		)
		.unwrap();

		assert!(!settings.ignore_duplicate_models);
		assert_eq!(settings.logging.level, "info");
		assert_eq!(settings.logging.format, LogFormat::Json);
	}

	#[rstest]
	fn test_invalid_toml() {
		let result = Settings::from_toml_str("ignore_duplicate_models = \"maybe\"");
		assert!(matches!(result, Err(SettingsError::ParseError(_))));
	}

	#[rstest]
	#[case("1", true)]
	#[case("true", true)]
	#[case("ON", true)]
	#[case("0", false)]
	#[case("false", false)]
	fn test_env_bool(#[case] raw: &str, #[case] expected: bool) {
		let vars = env(&[("HALYARD_IGNORE_DUPLICATE_MODELS", raw)]);
		let mut settings = Settings::new();
		settings.apply_env_from(|k| vars.get(k).cloned()).unwrap();
		assert_eq!(settings.ignore_duplicate_models, expected);
	}

	#[rstest]
	fn test_env_overrides_logging() {
		let vars = env(&[
			("HALYARD_LOG_LEVEL", "debug"),
			("HALYARD_LOG_FORMAT", "JSON"),
		]);
		let mut settings = Settings::new();
		settings.apply_env_from(|k| vars.get(k).cloned()).unwrap();

		assert_eq!(settings.logging.level, "debug");
		assert_eq!(settings.logging.format, LogFormat::Json);
	}

	#[rstest]
	fn test_env_overrides_are_logged() {
		use std::sync::{Arc, Mutex};
		use tracing_subscriber::layer::SubscriberExt as _;
		use tracing_subscriber::util::SubscriberInitExt as _;

		struct KeyCapture {
			keys: Arc<Mutex<Vec<String>>>,
		}

		impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for KeyCapture {
			fn on_event(
				&self,
				event: &tracing::Event<'_>,
				_ctx: tracing_subscriber::layer::Context<'_, S>,
			) {
				struct KeyVisitor(Option<String>);

				impl tracing::field::Visit for KeyVisitor {
					fn record_debug(
						&mut self,
						field: &tracing::field::Field,
						value: &dyn std::fmt::Debug,
					) {
						if field.name() == "key" {
							self.0 = Some(format!("{:?}", value));
						}
					}
				}

				let mut visitor = KeyVisitor(None);
				event.record(&mut visitor);
				if let Some(key) = visitor.0 {
					self.keys.lock().unwrap().push(key);
				}
			}
		}

		let keys = Arc::new(Mutex::new(Vec::new()));
		let _guard = tracing_subscriber::registry()
			.with(KeyCapture { keys: keys.clone() })
			.set_default();
		let vars = env(&[("HALYARD_LOG_LEVEL", "warn")]);

		Settings::new()
			.apply_env_from(|k| vars.get(k).cloned())
			.unwrap();

		assert_eq!(*keys.lock().unwrap(), vec!["HALYARD_LOG_LEVEL".to_string()]);
	}

	#[rstest]
	fn test_env_rejects_garbage() {
		let vars = env(&[("HALYARD_IGNORE_DUPLICATE_MODELS", "perhaps")]);
		let mut settings = Settings::new();
		let err = settings
			.apply_env_from(|k| vars.get(k).cloned())
			.unwrap_err();
		assert!(err.to_string().contains("HALYARD_IGNORE_DUPLICATE_MODELS"));
	}
}
