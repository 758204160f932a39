//! Settings module.
//!
//! # Examples
//!
//! ```rust
//! use halyard::conf::Settings;
//!
//! let settings = Settings::load(None).unwrap();
//! halyard::conf::init_logging(&settings.logging);
//! ```

pub use halyard_conf::*;
