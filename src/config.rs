// Runtime configuration: where the accounts live, where exports go and how
// the validation endpoint is reached. Built once in `main` from command line
// flags (or their environment variables) and handed to the store and the
// API client.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Base URL of the Roblox users API.
pub const DEFAULT_API_URL: &str = "https://users.roblox.com";
/// Seconds to wait for the validation endpoint.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// File name used by the export screen when the user just presses Enter.
pub const DEFAULT_EXPORT_FILE: &str = "cookies_export.txt";

const APP_DIR: &str = "roblox-account-manager";
const ACCOUNTS_FILE: &str = "accounts.json";
const EXPORTS_DIR: &str = "exports";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cookie encryption is not supported")]
    EncryptionUnsupported,

    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    #[error("data file path must not be empty")]
    EmptyDataFile,
}

/// Command line flags. Every flag can also be set through the environment.
#[derive(Parser, Debug)]
#[command(name = "roblox-account-cli", version, about = "Manage saved Roblox accounts")]
pub struct Cli {
    /// JSON file holding the saved accounts
    #[arg(long, env = "RAM_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Directory used for relative export file names
    #[arg(long, env = "RAM_EXPORT_DIR")]
    pub export_dir: Option<PathBuf>,

    /// Base URL of the users API used to validate cookies
    #[arg(long, env = "RAM_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Validation request timeout in seconds
    #[arg(long, env = "RAM_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
}

/// Settings shared by the store, the API client and the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_file: PathBuf,
    pub export_dir: PathBuf,
    pub api_url: String,
    pub timeout: Duration,
    /// Stored cookies are kept in plain text; `true` is rejected by
    /// [`Config::validate`].
    pub encrypt_cookies: bool,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Config {
            data_file: data_dir.join(ACCOUNTS_FILE),
            export_dir: data_dir.join(EXPORTS_DIR),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            encrypt_cookies: false,
        }
    }
}

impl Config {
    /// Build a config from parsed flags, falling back to the per-user data
    /// directory for paths that were not given.
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let defaults = Config::default();
        let data_file = cli.data_file.unwrap_or(defaults.data_file);
        // Exports follow a custom data file unless a directory is given.
        let export_dir = cli.export_dir.unwrap_or_else(|| {
            data_file
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from(EXPORTS_DIR), |p| p.join(EXPORTS_DIR))
        });
        let config = Config {
            data_file,
            export_dir,
            api_url: cli.api_url,
            timeout: Duration::from_secs(cli.timeout),
            encrypt_cookies: false,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.encrypt_cookies {
            return Err(ConfigError::EncryptionUnsupported);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.data_file.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataFile);
        }
        Ok(())
    }

    /// Resolve an export file name typed by the user. Absolute paths are
    /// used as-is, anything else lands in the export directory.
    pub fn export_path(&self, name: &str) -> PathBuf {
        let name = if name.trim().is_empty() {
            DEFAULT_EXPORT_FILE
        } else {
            name.trim()
        };
        let path = Path::new(name);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.export_dir.join(path)
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("data"))
}
