use clap::{Args, Subcommand, ValueEnum};
use std::fs;
use std::io::Write;

use crate::config::Config;
use crate::error::CliError;

#[derive(Debug, Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: Option<ConfigSubcommand>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values (default)
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), CliError> {
        match &self.command {
            None => show(config, &OutputFormat::Text),
            Some(ConfigSubcommand::Show { format }) => show(config, format),
            Some(ConfigSubcommand::Init) => init(),
        }
    }
}

fn show(config: &Config, format: &OutputFormat) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(config)
                .map_err(|e| CliError::Runtime(e.to_string()))?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!("Configuration");
            println!("=============\n");

            if let Some(path) = &config.config_file {
                println!("Config file: {}", path.display());
            } else {
                println!(
                    "Config file: {} (not found)",
                    Config::default_config_path().display()
                );
            }
            println!();

            println!("data_dir: {}", config.data_dir.value.display());
            println!("  source: {}", config.data_dir.source);
            println!();

            println!("store.backend: {}", config.store.backend);
            if let Some(url) = &config.store.server_url {
                println!("store.server_url: {}", url);
            }
            if config.store.api_key.is_some() {
                println!("store.api_key: (set)");
            }
        }
    }
    Ok(())
}

fn init() -> Result<(), CliError> {
    let config_path = Config::default_config_path();

    if config_path.exists() {
        println!("Config file already exists: {}", config_path.display());
        println!("Use 'shelf config show' to view current configuration.");
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|e| CliError::Io(parent.to_path_buf(), e))?;
    }

    let default_config = r#"# shelf configuration

# Directory for the session file and the local store
# data_dir: ~/.local/share/shelf

store:
  # memory | file | http
  backend: file
  # server_url: "http://localhost:8080"
  # api_key: "..."
"#;

    let mut file =
        fs::File::create(&config_path).map_err(|e| CliError::Io(config_path.clone(), e))?;
    file.write_all(default_config.as_bytes())
        .map_err(|e| CliError::Io(config_path.clone(), e))?;

    println!("Created config file: {}", config_path.display());
    println!("\nEdit this file to customize your settings.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigSource, ConfigValue, StoreConfig};
    use std::path::PathBuf;

    #[test]
    fn test_show_masks_api_key() {
        let config = Config {
            data_dir: ConfigValue::new(PathBuf::from("/tmp/shelf"), ConfigSource::Default),
            config_file: None,
            store: StoreConfig {
                api_key: Some("secret".into()),
                ..StoreConfig::default()
            },
        };
        show(&config, &OutputFormat::Text).unwrap();
        show(&config, &OutputFormat::Json).unwrap();

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
