//! Tracing subscriber setup

use crate::settings::{LogFormat, LoggingSettings};
use tracing_subscriber::EnvFilter;

/// Builds the filter for `settings`. `RUST_LOG` takes precedence when set.
pub fn env_filter(settings: &LoggingSettings) -> EnvFilter {
	EnvFilter::try_from_default_env()
		.or_else(|_| EnvFilter::try_new(&settings.level))
		.unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops). Returns `false`
/// when a global subscriber was already installed.
pub fn init(settings: &LoggingSettings) -> bool {
	let filter = env_filter(settings);

	let result = match settings.format {
		LogFormat::Text => tracing_subscriber::fmt()
			.with_env_filter(filter)
			.with_target(true)
			.try_init(),
		LogFormat::Json => tracing_subscriber::fmt()
			.with_env_filter(filter)
			.json()
			.with_timer(tracing_subscriber::fmt::time::SystemTime)
			.with_target(false)
			.try_init(),
	};

	result.is_ok()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_init_is_idempotent() {
		let settings = LoggingSettings::default();
		init(&settings);
		assert!(!init(&settings));
	}

	#[rstest]
	fn test_invalid_level_falls_back() {
		let settings = LoggingSettings {
			level: "not a [directive".to_string(),
			format: LogFormat::Text,
		};
		// Must not panic on a malformed directive.
		let _ = env_filter(&settings);
	}
}
