//! Layered configuration for the herald binary.
//!
//! Sources, later overriding earlier:
//! - Bundled defaults (include_str! from herald.toml)
//! - `~/.config/herald/herald.toml`
//! - `./herald.toml`
//! - `HERALD__<SECTION>__<KEY>` environment variables
//!
//! Credentials are never part of this file. They are read from the
//! environment by the components that need them.

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use herald_error::{ConfigError, HeraldError, HeraldResult};
use herald_storage::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../herald.toml");

/// Prefix of configuration environment variables.
const ENV_PREFIX: &str = "HERALD";

/// Scheduling settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Minutes east of UTC used as the wall clock; host time zone when unset
    pub utc_offset_minutes: Option<i32>,
    /// Seconds between sweeps in `herald watch`
    pub poll_interval_secs: u64,
    /// Pause after each past-due publish when more items follow
    pub past_due_delay_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: None,
            poll_interval_secs: 300,
            past_due_delay_secs: 5,
        }
    }
}

impl ScheduleConfig {
    /// Interval between sweeps.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    /// Delay between past-due publishes.
    pub fn past_due_delay(&self) -> Duration {
        Duration::from_secs(self.past_due_delay_secs)
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Timeout for platform and generation API calls
    pub timeout_secs: u64,
    /// Timeout for downloading generated media and logos
    pub download_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            download_timeout_secs: 30,
        }
    }
}

impl HttpConfig {
    /// API request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Download timeout.
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

/// Media generation and rendering settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Image generation model
    pub image_model: String,
    /// Diffusion steps per image
    pub image_steps: u32,
    /// Video generation model
    pub video_model: String,
    /// Music mixed under generated videos
    pub background_audio: Option<PathBuf>,
    /// Font for overlay and footer text
    pub font_path: Option<PathBuf>,
    /// Where `herald frame` writes when no output is given
    pub render_dir: PathBuf,
    /// Parent of per-job video scratch directories; system temp when unset
    pub scratch_dir: Option<PathBuf>,
    /// ffmpeg executable
    pub ffmpeg: PathBuf,
    /// ffprobe executable
    pub ffprobe: PathBuf,
    /// Upload retries after the first attempt
    pub upload_retries: usize,
    /// First upload retry delay in milliseconds; doubles per retry
    pub upload_base_delay_ms: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            image_model: herald_media::DEFAULT_IMAGE_MODEL.to_string(),
            image_steps: 4,
            video_model: herald_media::DEFAULT_VIDEO_MODEL.to_string(),
            background_audio: None,
            font_path: None,
            render_dir: PathBuf::from("renders"),
            scratch_dir: None,
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
            upload_retries: 3,
            upload_base_delay_ms: 1000,
        }
    }
}

impl MediaConfig {
    /// Backoff for uploads, capped at eight times the base delay.
    pub fn upload_retry(&self) -> RetryPolicy {
        let base = Duration::from_millis(self.upload_base_delay_ms);
        RetryPolicy::new(base, self.upload_retries, base.saturating_mul(8))
    }
}

/// Object storage backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Cloudinary, credentials from `CLOUDINARY_*`
    #[default]
    Cloudinary,
    /// Local directory
    Filesystem,
}

/// Object storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend to upload to
    pub backend: StorageBackend,
    /// Filesystem backend root
    pub root: PathBuf,
    /// Public URL the filesystem root is served under
    pub public_base_url: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Cloudinary,
            root: PathBuf::from("media"),
            public_base_url: None,
        }
    }
}

/// Database settings. The URL comes from `DATABASE_URL`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Maximum pooled connections
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { pool_size: 8 }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Top-level herald configuration.
///
/// # Example
///
/// ```no_run
/// use herald::HeraldConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = HeraldConfig::load()?;
/// println!("Sweeping every {:?}", config.schedule.poll_interval());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HeraldConfig {
    /// Scheduling
    pub schedule: ScheduleConfig,
    /// HTTP clients
    pub http: HttpConfig,
    /// Media generation and rendering
    pub media: MediaConfig,
    /// Object storage
    pub storage: StorageConfig,
    /// Database pool
    pub database: DatabaseConfig,
    /// Logging
    pub logging: LoggingConfig,
}

impl HeraldConfig {
    /// Load configuration from a specific file path, without defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> HeraldResult<Self> {
        debug!("Loading configuration from file");
        let builder = Config::builder().add_source(File::from(path.as_ref()));
        Self::finish(builder)
    }

    /// Bundled defaults overlaid with a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be parsed.
    pub fn from_toml_str(overrides: &str) -> HeraldResult<Self> {
        let builder = Self::defaults().add_source(File::from_str(overrides, FileFormat::Toml));
        Self::finish(builder)
    }

    /// Load configuration with every source applied.
    ///
    /// User config files are optional and silently skipped if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed.
    #[instrument]
    pub fn load() -> HeraldResult<Self> {
        Self::load_with_environment(Self::environment())
    }

    /// Like [`load`](Self::load), with environment overrides taken from
    /// `vars` instead of the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed.
    pub fn load_with_vars(vars: config::Map<String, String>) -> HeraldResult<Self> {
        Self::load_with_environment(Self::environment().source(Some(vars)))
    }

    fn load_with_environment(environment: Environment) -> HeraldResult<Self> {
        debug!("Loading configuration: env > current dir > home dir > bundled defaults");

        let mut builder = Self::defaults();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/herald/herald.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("herald").required(false))
            .add_source(environment);

        Self::finish(builder)
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> HeraldResult<Self> {
        builder
            .build()
            .map_err(|e| {
                HeraldError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                HeraldError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }
}
