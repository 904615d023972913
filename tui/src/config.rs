//! User configuration, read from `config.toml` and overridden from the
//! command line.

use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:2348/";
pub const DEFAULT_SCROLL_STEP: usize = 3;
const CONFIG_DIR_NAME: &str = "srcview";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("scroll_step must be at least 1")]
    InvalidScrollStep,
}

/// On-disk shape of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigToml {
    server_url: Option<String>,
    vcs_link: Option<String>,
    log_dir: Option<PathBuf>,
    scroll_step: Option<usize>,
}

/// Values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub server_url: Option<String>,
    pub vcs_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server_url: String,
    /// Template with `$file` and `$line` placeholders. `None` hides the
    /// "view in VCS" menu item.
    pub vcs_link: Option<String>,
    pub log_dir: PathBuf,
    pub scroll_step: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            vcs_link: None,
            log_dir: default_log_dir(),
            scroll_step: DEFAULT_SCROLL_STEP,
        }
    }
}

impl Config {
    /// Load the config file named by the overrides, or the default one if it
    /// exists, then apply the overrides.
    pub fn load(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let toml = match &overrides.config_path {
            Some(path) => read_config(path)?,
            None => match default_path() {
                Some(path) => read_optional(&path)?,
                None => ConfigToml::default(),
            },
        };
        Self::from_toml(toml, overrides)
    }

    /// Parse config text directly, as if read from a file.
    pub fn from_str_with_overrides(
        contents: &str,
        overrides: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let toml = parse(contents, Path::new("<inline>"))?;
        Self::from_toml(toml, overrides)
    }

    fn from_toml(toml: ConfigToml, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let defaults = Config::default();
        let scroll_step = toml.scroll_step.unwrap_or(defaults.scroll_step);
        if scroll_step == 0 {
            return Err(ConfigError::InvalidScrollStep);
        }
        Ok(Self {
            server_url: overrides
                .server_url
                .or(toml.server_url)
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(defaults.server_url),
            vcs_link: overrides
                .vcs_link
                .or(toml.vcs_link)
                .filter(|template| !template.trim().is_empty()),
            log_dir: toml.log_dir.unwrap_or(defaults.log_dir),
            scroll_step,
        })
    }
}

/// `<config dir>/srcview/config.toml`.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn default_log_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(CONFIG_DIR_NAME)
        .join("log")
}

fn read_config(path: &Path) -> Result<ConfigToml, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents, path)
}

fn read_optional(path: &Path) -> Result<ConfigToml, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse(&contents, path),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(ConfigToml::default()),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse(contents: &str, path: &Path) -> Result<ConfigToml, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
