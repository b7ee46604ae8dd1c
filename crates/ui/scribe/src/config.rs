use std::{env, path::Path, path::PathBuf};

use directories::ProjectDirs;
use form_api::DEFAULT_BASE_URL;
use lazy_static::lazy_static;
use serde::Deserialize;
use tracing::debug;

use crate::cli::RunArgs;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub config_dir: PathBuf,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Default, PartialEq)]
pub struct SubmissionConfig {
    /// Where submitted answers are written as JSON, besides the log.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub submission: SubmissionConfig,
    pub tick_rate: f64,
    pub frame_rate: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            api: ApiConfig::default(),
            submission: SubmissionConfig::default(),
            tick_rate: DEFAULT_TICK_RATE,
            frame_rate: DEFAULT_FRAME_RATE,
        }
    }
}

pub const DEFAULT_TICK_RATE: f64 = 4.0;
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref LOG_ENV: String = format!("{}_LOG_LEVEL", PROJECT_NAME.clone());
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

impl Config {
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::load(&get_config_dir(), &get_data_dir())
    }

    /// Defaults, then `config.json5` / `config.toml` from `config_dir` if present.
    pub fn load(config_dir: &Path, data_dir: &Path) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().into_owned())?
            .set_default("config_dir", config_dir.to_string_lossy().into_owned())?
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .set_default("tick_rate", DEFAULT_TICK_RATE)?
            .set_default("frame_rate", DEFAULT_FRAME_RATE)?;

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.toml", config::FileFormat::Toml),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            debug!(dir = %config_dir.display(), "no configuration file found, using defaults");
        }

        let config: Self = builder.build()?.try_deserialize()?;
        config.check_rates()?;
        Ok(config)
    }

    /// Command line flags win over anything read from disk.
    pub fn apply_cli(&mut self, args: &RunArgs) -> Result<(), config::ConfigError> {
        if let Some(url) = &args.base_url {
            self.api.base_url = url.clone();
        }
        if let Some(rate) = args.tick_rate {
            self.tick_rate = rate;
        }
        if let Some(rate) = args.frame_rate {
            self.frame_rate = rate;
        }
        self.check_rates()
    }

    /// Both rates become interval periods, so they must be positive and finite.
    fn check_rates(&self) -> Result<(), config::ConfigError> {
        for (key, rate) in [("tick_rate", self.tick_rate), ("frame_rate", self.frame_rate)] {
            if !is_valid_rate(rate) {
                return Err(config::ConfigError::Message(format!(
                    "{key} must be a positive number, got {rate}"
                )));
            }
        }
        Ok(())
    }
}

pub fn is_valid_rate(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = DATA_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "scribe", env!("CARGO_PKG_NAME"))
}
