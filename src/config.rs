use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rp_log_client::ServiceConfig;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(name = "rp-log", version, about)]
pub struct Cli {
    /// Path to configuration file
    #[clap(long, default_value = "./rp-log.toml")]
    pub config: PathBuf,

    /// Override reporting server URL
    #[clap(long)]
    pub server_url: Option<String>,

    /// Override project name
    #[clap(long)]
    pub project: Option<String>,

    /// Override API token
    #[clap(long)]
    pub api_key: Option<String>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List log items
    List(ListArgs),
    /// Fetch a log item by numeric ID
    Get { id: i64 },
    /// Fetch a log item by UUID
    GetUuid { uuid: String },
    /// Download binary data attached to a log item
    Attachment {
        id: String,
        /// Write to this file instead of stdout
        #[clap(long)]
        output: Option<PathBuf>,
    },
    /// Create a log item
    Create(CreateArgs),
    /// Delete a log item by numeric ID
    Delete { id: i64 },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Page number; paging is sent when this or --size is given
    #[clap(long)]
    pub page: Option<u32>,

    /// Page size; defaults to 20 when only --page is given
    #[clap(long)]
    pub size: Option<u32>,

    /// Equality filter as field=value, repeatable
    #[clap(long = "filter")]
    pub filters: Vec<String>,

    #[clap(long)]
    pub sort: Option<String>,

    #[clap(long)]
    pub desc: bool,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[clap(long)]
    pub launch_uuid: String,

    #[clap(long)]
    pub item_uuid: Option<String>,

    #[clap(long)]
    pub message: String,

    #[clap(long, default_value = "info")]
    pub level: String,

    /// File to attach to the log item
    #[clap(long)]
    pub attach: Option<PathBuf>,

    /// MIME type of the attachment
    #[clap(long, default_value = "application/octet-stream")]
    pub mime: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server_url: String,
    pub project: String,
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    pub fn service_config(&self) -> ServiceConfig {
        let mut service = ServiceConfig::new(&self.server_url, &self.project, &self.api_key);
        service.timeout = Duration::from_secs(self.timeout_secs);
        service
    }
}

pub fn load_config(cli: &Cli) -> Result<Config> {
    let config_content = fs::read_to_string(&cli.config)
        .with_context(|| format!("Failed to read config file: {:?}", cli.config))?;

    let mut config: Config = toml::from_str(&config_content)
        .context("Failed to parse config file")?;

    // Apply CLI overrides
    if let Some(ref server_url) = cli.server_url {
        config.server_url = server_url.clone();
    }

    if let Some(ref project) = cli.project {
        config.project = project.clone();
    }

    if let Some(ref api_key) = cli.api_key {
        config.api_key = api_key.clone();
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_config_with_overrides() {
        let file = write_config(
            "server_url = \"http://rp.local\"\nproject = \"demo\"\napi_key = \"secret\"\n",
        );
        let path = file.path().to_str().unwrap();

        let cli = Cli::parse_from(["rp-log", "--config", path, "--project", "other", "get", "5"]);
        let config = load_config(&cli).unwrap();

        assert_eq!(config.server_url, "http://rp.local");
        assert_eq!(config.project, "other");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.timeout_secs, 30);
        assert!(matches!(cli.command, Command::Get { id: 5 }));
    }

    #[test]
    fn test_service_config_uses_timeout() {
        let file = write_config(
            "server_url = \"http://rp.local\"\nproject = \"demo\"\napi_key = \"k\"\ntimeout_secs = 5\n",
        );
        let path = file.path().to_str().unwrap();

        let cli = Cli::parse_from(["rp-log", "--config", path, "delete", "1"]);
        let service = load_config(&cli).unwrap().service_config();

        assert_eq!(service.timeout, Duration::from_secs(5));
        assert_eq!(service.project, "demo");
    }

    #[test]
    fn test_missing_config_file() {
        let cli = Cli::parse_from(["rp-log", "--config", "/nonexistent/rp-log.toml", "get", "1"]);
        assert!(load_config(&cli).is_err());
    }
}
