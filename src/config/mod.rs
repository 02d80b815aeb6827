//! Settings for the position list generator.
//!
//! Settings are layered with Figment, lowest to highest precedence:
//! 1. Built-in defaults (`Settings::default()`)
//! 2. TOML settings file (default: `pos_list.toml`)
//! 3. Environment variables prefixed with `POSLIST_`, nested keys split by `__`
//! 4. Explicit command-line flags (see [`crate::cli::CliOverrides`])
//!
//! # Example
//!
//! ```no_run
//! use pos_list::config::Settings;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::load_from("config/pos_list.toml")?;
//!     println!("Mode: {}", settings.sequence.mode);
//!     println!("Output: {}", settings.output.display());
//!     Ok(())
//! }
//! ```
//!
//! # Environment Variables
//!
//! ```text
//! POSLIST_OUTPUT=/data/run42/Output.pos
//! POSLIST_LOG_LEVEL=debug
//! POSLIST_SEQUENCE__MODE=random
//! POSLIST_SEQUENCE__NOISE_WIDTH=0.5
//! ```

pub mod settings;

pub use settings::{AxesConfig, Settings, DEFAULT_SETTINGS_FILE, ENV_PREFIX};
