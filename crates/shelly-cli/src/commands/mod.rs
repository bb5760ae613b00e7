//! Command implementations for the CLI.

mod config;
mod device;
mod history;
mod log;
mod plot;
mod read;
mod watch;

pub use config::cmd_config;
pub use device::{cmd_settings, cmd_status};
pub use history::{HistoryArgs, cmd_history};
pub use log::cmd_log;
pub use plot::{PlotArgs, cmd_plot};
pub use read::cmd_read;
pub use watch::{WatchArgs, cmd_watch};
