//! Config command - inspect and edit the JSON settings file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;
use tracing::debug;

use taxsplit_core::SplitterConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a configuration file with default values
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print one value by dotted key (e.g., "pdf.render_dpi")
    Get { key: String },

    /// Change one value by dotted key
    Set { key: String, value: String },

    /// Print which file is used
    Path,
}

/// The settings file a command works on.
///
/// `--config` selects it explicitly; otherwise it lives under the user's
/// config directory.
pub struct ConfigFile {
    path: PathBuf,
    explicit: bool,
}

impl ConfigFile {
    pub fn resolve(explicit: Option<&str>) -> Self {
        match explicit {
            Some(path) => Self {
                path: PathBuf::from(path),
                explicit: true,
            },
            None => Self {
                path: dirs::config_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("taxsplit")
                    .join("config.json"),
                explicit: false,
            },
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file, or defaults when the default location has none.
    ///
    /// An explicitly named file must exist.
    pub fn load(&self) -> anyhow::Result<SplitterConfig> {
        if self.path.exists() {
            debug!("Loading config from {}", self.path.display());
            SplitterConfig::from_file(&self.path).map_err(|e| {
                anyhow::anyhow!("Failed to read config {}: {}", self.path.display(), e)
            })
        } else if self.explicit {
            anyhow::bail!("Config file not found: {}", self.path.display())
        } else {
            Ok(SplitterConfig::default())
        }
    }

    pub fn save(&self, config: &SplitterConfig) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        config.save(&self.path)?;
        Ok(())
    }
}

/// Load the configuration for a command.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<SplitterConfig> {
    ConfigFile::resolve(explicit).load()
}

pub async fn run(args: ConfigArgs, explicit: Option<&str>) -> anyhow::Result<()> {
    let file = ConfigFile::resolve(explicit);

    match args.command {
        ConfigCommand::Show => {
            if !file.path().exists() && !file.explicit {
                println!("{} No config file found, showing defaults.", style("ℹ").blue());
            }
            println!("{}", serde_json::to_string_pretty(&file.load()?)?);
        }
        ConfigCommand::Init { force } => {
            if file.path().exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    file.path().display()
                );
            }
            file.save(&SplitterConfig::default())?;
            println!(
                "{} Created configuration file at {}",
                style("✓").green(),
                file.path().display()
            );
        }
        ConfigCommand::Get { key } => {
            let json = serde_json::to_value(file.load()?)?;
            let value = lookup(&json, &key)
                .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        ConfigCommand::Set { key, value } => {
            // Seeding a new explicit file is allowed; only reads require it
            let current = if file.path().exists() {
                file.load()?
            } else {
                SplitterConfig::default()
            };
            let value = parse_value(&value);
            let updated = with_value(&current, &key, value.clone())?;
            file.save(&updated)?;
            println!(
                "{} Set {} = {} in {}",
                style("✓").green(),
                key,
                value,
                file.path().display()
            );
        }
        ConfigCommand::Path => {
            println!("Configuration file: {}", file.path().display());
            if file.path().exists() {
                println!("Status: {}", style("exists").green());
            } else {
                println!("Status: {}", style("not created").yellow());
                println!();
                println!("Run 'taxsplit config init' to create a configuration file.");
            }
        }
    }

    Ok(())
}

/// JSON literal when it parses as one, else a plain string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn lookup<'a>(json: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(json, |node, part| node.get(part))
}

/// Copy of `config` with `key` replaced; the key must already exist and the
/// new value must fit its type.
fn with_value(config: &SplitterConfig, key: &str, value: Value) -> anyhow::Result<SplitterConfig> {
    let mut json = serde_json::to_value(config)?;

    let slot = key
        .split('.')
        .try_fold(&mut json, |node, part| node.get_mut(part))
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
    if slot.is_object() {
        anyhow::bail!("{} is a section, set one of its keys instead", key);
    }
    *slot = value;

    serde_json::from_value(json).map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))
}
