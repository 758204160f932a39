//! # Settings
//!
//! Configuration for halyard. Settings are layered from defaults, an optional
//! TOML or JSON file, and `HALYARD_`-prefixed environment variables, in that
//! order of increasing priority.
//!
//! ```
//! use halyard_conf::Settings;
//!
//! let settings = Settings::from_toml_str("ignore_duplicate_models = true").unwrap();
//! assert!(settings.ignore_duplicate_models);
//! assert_eq!(settings.logging.level, "info");
//! ```

pub mod logging;
pub mod settings;

pub use logging::init as init_logging;
pub use settings::{ENV_PREFIX, LogFormat, LoggingSettings, Settings, SettingsError};
