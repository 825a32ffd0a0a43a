use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ValueEnum;
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::output::OutputFormat;
use crate::config::TraceviewConfig;

pub const ENV_WIDTH: &str = "TRACEVIEW_WIDTH";
pub const ENV_OUTPUT: &str = "TRACEVIEW_OUTPUT";

const LOCAL_CONFIG: &str = "config/traceview.yaml";

pub fn init_logging(level: &str, debug: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    // Logs go to stderr; stdout carries command output.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

pub struct LoadedConfig {
    pub config: TraceviewConfig,
    pub path: PathBuf,
}

pub fn default_config_path() -> PathBuf {
    // Priority: ./config/traceview.yaml > ~/.config/traceview/config.yaml
    let local_config = PathBuf::from(LOCAL_CONFIG);
    if local_config.exists() {
        return local_config;
    }
    match dirs::config_dir() {
        Some(mut path) => {
            path.push("traceview");
            path.push("config.yaml");
            path
        }
        None => local_config,
    }
}

pub async fn load_config(config_path: Option<&PathBuf>) -> Result<LoadedConfig> {
    let config_path = match config_path {
        Some(path) => path.clone(),
        None => default_config_path(),
    };

    if fs::try_exists(&config_path).await.unwrap_or(false) {
        let content = fs::read_to_string(&config_path)
            .await
            .with_context(|| format!("reading {}", config_path.display()))?;

        let config: TraceviewConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {}", config_path.display()))?;

        info!(path = %config_path.display(), "Loaded configuration");
        Ok(LoadedConfig {
            config,
            path: config_path,
        })
    } else {
        warn!(
            path = %config_path.display(),
            "Config file not found, using defaults"
        );
        Ok(LoadedConfig {
            config: TraceviewConfig::default(),
            path: config_path,
        })
    }
}

pub fn apply_env_overrides(config: &mut TraceviewConfig) {
    if let Ok(raw) = env::var(ENV_WIDTH) {
        match raw.trim().parse::<f64>() {
            Ok(width) if width > 0.0 && width.is_finite() => {
                config.default_width = width;
                info!(width, "Using timeline width from {}", ENV_WIDTH);
            }
            _ => warn!(value = %raw, "ignoring invalid {}", ENV_WIDTH),
        }
    }

    if let Ok(raw) = env::var(ENV_OUTPUT) {
        match OutputFormat::from_str(raw.trim(), true) {
            Ok(format) => config.output = format,
            Err(_) => warn!(value = %raw, "ignoring invalid {}", ENV_OUTPUT),
        }
    }
}
