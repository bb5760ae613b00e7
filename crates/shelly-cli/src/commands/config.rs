//! Config command implementation.

use std::path::Path;

use anyhow::{Result, bail};

use crate::cli::ConfigAction;
use crate::config::{Config, key_name};

/// Run a `config` subcommand against the file at `path`.
///
/// Returns the text to print.
pub fn cmd_config(action: ConfigAction, path: &Path) -> Result<String> {
    match action {
        ConfigAction::Path => Ok(format!("{}\n", path.display())),
        ConfigAction::Show => {
            let config = Config::load_from(path);
            let content = config.to_toml()?;
            if content.trim().is_empty() {
                Ok(format!("# {} (no values set)\n", path.display()))
            } else {
                Ok(format!("# {}\n{}", path.display(), content))
            }
        }
        ConfigAction::Get { key } => match Config::load_from(path).get(key) {
            Some(value) => Ok(format!("{}\n", value)),
            None => bail!("'{}' is not set", key_name(key)),
        },
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_from(path);
            config.set(key, &value)?;
            config.save_to(path)?;
            Ok(format!("Set {} = {}\n", key_name(key), value.trim()))
        }
        ConfigAction::Unset { key } => {
            let mut config = Config::load_from(path);
            config.unset(key);
            config.save_to(path)?;
            Ok(format!("Unset {}\n", key_name(key)))
        }
        ConfigAction::Init => {
            if path.exists() {
                bail!("Config file already exists: {}", path.display());
            }
            Config::default().save_to(path)?;
            Ok(format!("Created {}\n", path.display()))
        }
    }
}
