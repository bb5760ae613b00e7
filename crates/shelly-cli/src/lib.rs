//! Command-line logger for Shelly EM energy meters.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `status` | Print the device's raw `/status` JSON |
//! | `settings` | Print the device's raw `/settings` JSON |
//! | `read` | Read one meter channel |
//! | `log` | Poll once and store the reading |
//! | `watch` | Poll and store repeatedly |
//! | `history` | Show stored readings in a time range |
//! | `plot` | Chart stored power readings in the terminal |
//! | `config` | Manage CLI configuration |
//! | `completions` | Generate shell completions |
//!
//! # Configuration
//!
//! The CLI stores configuration in `~/.config/shelly/config.toml` (or
//! platform equivalent, or the file named by `SHELLY_CONFIG`):
//!
//! - `device`: Default device address
//! - `db_path`: Reading database path
//! - `timeout`: Request timeout in seconds
//! - `index`: Default meter channel
//!
//! # Environment Variables
//!
//! - `SHELLY_DEVICE`: Default device address (overridden by `--device`)
//! - `SHELLY_DB`: Reading database path (overridden by `--db`)
//! - `NO_COLOR`: Disable colored output when set
//! - `RUST_LOG`: Log filter when neither `--verbose` nor `--quiet` is given
//!
//! # Examples
//!
//! Log one reading from a cron job:
//! ```bash
//! shelly log --device 192.168.1.50
//! ```
//!
//! Export one day as CSV:
//! ```bash
//! shelly history --since 2024-01-01 --until 2024-01-01 --format csv -o day.csv
//! ```

pub mod chart;
pub mod cli;
pub mod commands;
pub mod config;
pub mod format;
pub mod util;

// Re-export core dependencies for convenience
pub use shelly_core;
pub use shelly_store;
pub use shelly_types;
