// src/config.rs
//! Command-line input, the TOML configuration file, and the resolved
//! configuration handed to the pipeline and the HTTP service.

use crate::constants::{
    APP_NAME, CONFIG_SEARCH_PATHS, DEFAULT_QUANTIZATION_SPEED, MAX_CONCURRENT_FETCHES,
};
use crate::error::AppError;
use crate::render::OverlayStyle;
use crate::types::FramesPerSecond;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Configuration file (defaults to wms_animator.toml in ./config, /config or /etc)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable trace-level logging
    #[arg(short, long, default_value_t = false)]
    pub debug: bool,

    /// TrueType font used for overlay text (overrides the config file)
    #[arg(short, long)]
    pub font: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve animations over HTTP (default)
    Serve,
    /// Render a single JSON request file to a GIF
    Render {
        /// Path to the JSON animation request
        request: PathBuf,

        /// Where to write the GIF ("-" for stdout)
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Contents of the configuration file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub metadata: MetadataSettings,
    pub wms: WmsSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub http_host: String,
    pub http_port: u16,
    pub base_path: String,
    /// Comma-separated origins, or `*`.
    pub cors_origins: String,
    pub read_timeout_sec: u64,
    pub write_timeout_sec: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            http_host: "0.0.0.0".to_string(),
            http_port: 9000,
            base_path: String::new(),
            cors_origins: "*".to_string(),
            read_timeout_sec: 5,
            write_timeout_sec: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MetadataSettings {
    pub title: String,
    pub description: String,
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self {
            title: "wms-animator".to_string(),
            description: "WMS Animator".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WmsSettings {
    pub font_path: PathBuf,
    pub frames_per_second: FramesPerSecond,
    pub max_concurrency: usize,
    /// NeuQuant sampling speed, 1 (best) to 30 (fastest).
    pub quantization_speed: i32,
    pub overlay: OverlayStyle,
}

impl Default for WmsSettings {
    fn default() -> Self {
        Self {
            font_path: PathBuf::new(),
            frames_per_second: FramesPerSecond::default(),
            max_concurrency: MAX_CONCURRENT_FETCHES,
            quantization_speed: DEFAULT_QUANTIZATION_SPEED,
            overlay: OverlayStyle::default(),
        }
    }
}

impl Settings {
    pub fn from_toml_str(contents: &str) -> Result<Self, AppError> {
        Ok(toml::from_str(contents)?)
    }

    /// Loads `explicit` if given (it must exist), else the first config file
    /// found on the search path, else the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, AppError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover(),
        };

        match path {
            Some(path) => {
                log::info!("Reading configuration from {}", path.display());
                let contents = fs::read_to_string(&path).map_err(|e| {
                    AppError::Configuration(format!("cannot read {}: {}", path.display(), e))
                })?;
                Self::from_toml_str(&contents)
            }
            None => {
                log::info!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn discover() -> Option<PathBuf> {
        let file_name = format!("{}.toml", APP_NAME);
        CONFIG_SEARCH_PATHS
            .iter()
            .map(|dir| Path::new(dir).join(&file_name))
            .find(|candidate| candidate.is_file())
    }
}

/// Knobs of the fetch-decorate-assemble pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub font_path: PathBuf,
    pub default_fps: FramesPerSecond,
    pub max_concurrency: usize,
    pub quantization_speed: i32,
    pub overlay: OverlayStyle,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from(WmsSettings::default())
    }
}

impl From<WmsSettings> for PipelineConfig {
    fn from(wms: WmsSettings) -> Self {
        Self {
            font_path: wms.font_path,
            default_fps: wms.frames_per_second,
            max_concurrency: wms.max_concurrency.max(1),
            quantization_speed: wms.quantization_speed.clamp(1, 30),
            overlay: wms.overlay,
        }
    }
}

/// Settings of the HTTP front end.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Route prefix without a trailing slash; empty serves at the root.
    pub base_path: String,
    /// Allowed origins; empty means any origin.
    pub cors_origins: Vec<String>,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub title: String,
    pub description: String,
}

impl ServiceConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Full path of the animation endpoint.
    pub fn animation_route(&self) -> String {
        format!("{}{}", self.base_path, crate::constants::ANIMATION_ROUTE)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let settings = Settings::default();
        Self::from_settings(settings.server, settings.metadata)
    }
}

impl ServiceConfig {
    fn from_settings(server: ServerSettings, metadata: MetadataSettings) -> Self {
        let cors_origins = match server.cors_origins.trim() {
            "" | "*" => Vec::new(),
            list => list
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
        };

        Self {
            host: server.http_host,
            port: server.http_port,
            base_path: server.base_path.trim_end_matches('/').to_string(),
            cors_origins,
            read_timeout: Duration::from_secs(server.read_timeout_sec),
            write_timeout: Duration::from_secs(server.write_timeout_sec),
            title: metadata.title,
            description: metadata.description,
        }
    }
}

/// Fully resolved configuration of one run of the binary.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub command: Command,
    pub debug: bool,
    pub pipeline: PipelineConfig,
    pub service: ServiceConfig,
}

impl AppConfig {
    /// Resolves the configuration from CLI input, the config file and `PORT`.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let settings = Settings::load(cli.config.as_deref())?;
        let port = std::env::var("PORT").ok();
        Self::from_parts(cli, settings, port.as_deref())
    }

    /// Applies command-line and environment overrides on top of `settings`.
    pub fn from_parts(
        cli: CommandLineInput,
        mut settings: Settings,
        port_override: Option<&str>,
    ) -> Result<Self, AppError> {
        if let Some(port) = port_override.filter(|p| !p.trim().is_empty()) {
            settings.server.http_port = port.trim().parse().map_err(|_| {
                AppError::Configuration(format!("PORT is not a valid port number: {}", port))
            })?;
        }
        if let Some(font) = cli.font {
            settings.wms.font_path = font;
        }

        Ok(Self {
            command: cli.command.unwrap_or(Command::Serve),
            debug: cli.debug,
            pipeline: PipelineConfig::from(settings.wms),
            service: ServiceConfig::from_settings(settings.server, settings.metadata),
        })
    }
}
