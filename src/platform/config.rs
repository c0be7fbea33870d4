// ZipDrop - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolved platform paths for ZipDrop configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/zipdrop/ or %APPDATA%\ZipDrop\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[server]` section.
    pub server: ServerSection,
    /// `[selection]` section.
    pub selection: SelectionSection,
    /// `[transfer]` section.
    pub transfer: TransferSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[server]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Base URL, e.g. "http://nas.local:8081".
    pub url: Option<String>,
    /// Receive endpoint path, e.g. "/upload".
    pub upload_path: Option<String>,
    /// Multipart field name for file parts.
    pub field_name: Option<String>,
}

/// `[selection]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct SelectionSection {
    /// Accepted file name suffix, e.g. ".zip".
    pub accepted_suffix: Option<String>,
}

/// `[transfer]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct TransferSection {
    pub connect_timeout_secs: Option<u64>,
    pub io_timeout_secs: Option<u64>,
    pub max_response_bytes: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    // -- Server --
    pub server_url: String,
    pub upload_path: String,
    pub field_name: String,

    // -- Selection --
    pub accepted_suffix: String,

    // -- Transfer --
    pub connect_timeout: Duration,
    pub io_timeout: Duration,
    pub max_response_bytes: usize,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: constants::DEFAULT_SERVER_URL.to_string(),
            upload_path: constants::DEFAULT_UPLOAD_PATH.to_string(),
            field_name: constants::DEFAULT_FIELD_NAME.to_string(),
            accepted_suffix: constants::DEFAULT_ACCEPTED_SUFFIX.to_string(),
            connect_timeout: Duration::from_secs(constants::DEFAULT_CONNECT_TIMEOUT_SECS),
            io_timeout: Duration::from_secs(constants::DEFAULT_IO_TIMEOUT_SECS),
            max_response_bytes: constants::DEFAULT_MAX_RESPONSE_BYTES,
            log_level: None,
        }
    }
}

impl AppConfig {
    /// Full URL of the receive endpoint.
    pub fn upload_url(&self) -> String {
        join_url(&self.server_url, &self.upload_path)
    }

    /// URL of the server's archive listing page.
    pub fn listing_url(&self) -> String {
        join_url(&self.server_url, "/")
    }

    /// Override the server URL (CLI flag). Only http(s) URLs are accepted.
    pub fn set_server_url(&mut self, url: &str) -> Result<(), ConfigError> {
        validate_server_url(url)?;
        self.server_url = url.trim_end_matches('/').to_string();
        Ok(())
    }

    /// Override the accepted suffix (CLI flag).
    pub fn set_accepted_suffix(&mut self, suffix: &str) -> Result<(), ConfigError> {
        validate_suffix(suffix)?;
        self.accepted_suffix = suffix.to_string();
        Ok(())
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn validate_server_url(url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::ValueOutOfRange {
            field: "server.url".to_string(),
            value: url.to_string(),
            expected: "an http:// or https:// URL".to_string(),
        })
    }
}

fn validate_suffix(suffix: &str) -> Result<(), ConfigError> {
    let well_formed = suffix.len() > 1
        && suffix.len() <= constants::MAX_SUFFIX_LENGTH
        && suffix.starts_with('.')
        && !suffix.contains(['/', '\\']);
    if well_formed {
        Ok(())
    } else {
        Err(ConfigError::ValueOutOfRange {
            field: "selection.accepted_suffix".to_string(),
            value: suffix.to_string(),
            expected: format!(
                "a suffix starting with '.' of at most {} characters",
                constants::MAX_SUFFIX_LENGTH
            ),
        })
    }
}

/// Load and validate the config file at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unreadable or unparseable, returns defaults with a warning
/// so the application still starts and the user is informed.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(source) => {
            let err = ConfigError::Io {
                path: config_path.to_path_buf(),
                source,
            };
            tracing::warn!(error = %err, "Config unreadable");
            return (AppConfig::default(), vec![format!("{err}. Using defaults.")]);
        }
    };

    match parse_config(&content, config_path) {
        Ok((config, warnings)) => {
            tracing::info!(path = %config_path.display(), "Loaded config.toml");
            (config, warnings)
        }
        Err(err) => {
            tracing::warn!(error = %err, "Config unparseable");
            (AppConfig::default(), vec![format!("{err}. Using defaults.")])
        }
    }
}

/// Parse and validate config text. Out-of-range values become warnings;
/// only a TOML syntax error is an `Err`.
pub fn parse_config(content: &str, path: &Path) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let raw: RawConfig = toml::from_str(content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut warnings: Vec<String> = Vec::new();
    let mut config = AppConfig::default();

    // -- Server --
    if let Some(ref url) = raw.server.url {
        if let Err(e) = config.set_server_url(url) {
            warnings.push(format!("{e}. Using default ({}).", constants::DEFAULT_SERVER_URL));
        }
    }
    if let Some(ref path) = raw.server.upload_path {
        if path.starts_with('/') {
            config.upload_path = path.clone();
        } else {
            warnings.push(format!(
                "[server] upload_path = \"{path}\" must start with '/'. Using default ({}).",
                constants::DEFAULT_UPLOAD_PATH
            ));
        }
    }
    if let Some(ref name) = raw.server.field_name {
        if !name.is_empty() && !name.contains(['"', '\r', '\n']) {
            config.field_name = name.clone();
        } else {
            warnings.push(format!(
                "[server] field_name = \"{name}\" is not a valid form field name. Using default ({}).",
                constants::DEFAULT_FIELD_NAME
            ));
        }
    }

    // -- Selection --
    if let Some(ref suffix) = raw.selection.accepted_suffix {
        if let Err(e) = config.set_accepted_suffix(suffix) {
            warnings.push(format!(
                "{e}. Using default ({}).",
                constants::DEFAULT_ACCEPTED_SUFFIX
            ));
        }
    }

    // -- Transfer --
    if let Some(secs) = raw.transfer.connect_timeout_secs {
        if (constants::MIN_CONNECT_TIMEOUT_SECS..=constants::MAX_CONNECT_TIMEOUT_SECS)
            .contains(&secs)
        {
            config.connect_timeout = Duration::from_secs(secs);
        } else {
            warnings.push(format!(
                "[transfer] connect_timeout_secs = {secs} is out of range ({}-{}). Using default ({}).",
                constants::MIN_CONNECT_TIMEOUT_SECS,
                constants::MAX_CONNECT_TIMEOUT_SECS,
                constants::DEFAULT_CONNECT_TIMEOUT_SECS,
            ));
        }
    }
    if let Some(secs) = raw.transfer.io_timeout_secs {
        if (constants::MIN_IO_TIMEOUT_SECS..=constants::MAX_IO_TIMEOUT_SECS).contains(&secs) {
            config.io_timeout = Duration::from_secs(secs);
        } else {
            warnings.push(format!(
                "[transfer] io_timeout_secs = {secs} is out of range ({}-{}). Using default ({}).",
                constants::MIN_IO_TIMEOUT_SECS,
                constants::MAX_IO_TIMEOUT_SECS,
                constants::DEFAULT_IO_TIMEOUT_SECS,
            ));
        }
    }
    if let Some(bytes) = raw.transfer.max_response_bytes {
        if (constants::MIN_MAX_RESPONSE_BYTES..=constants::MAX_MAX_RESPONSE_BYTES).contains(&bytes)
        {
            config.max_response_bytes = bytes;
        } else {
            warnings.push(format!(
                "[transfer] max_response_bytes = {bytes} is out of range ({}-{}). Using default ({}).",
                constants::MIN_MAX_RESPONSE_BYTES,
                constants::MAX_MAX_RESPONSE_BYTES,
                constants::DEFAULT_MAX_RESPONSE_BYTES,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    Ok((config, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> (AppConfig, Vec<String>) {
        parse_config(text, Path::new("config.toml")).unwrap()
    }

    #[test]
    fn empty_file_gives_defaults() {
        let (config, warnings) = parse("");
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
        assert_eq!(config.upload_url(), "http://localhost:8081/upload");
        assert_eq!(config.listing_url(), "http://localhost:8081/");
    }

    #[test]
    fn valid_values_are_applied() {
        let (config, warnings) = parse(
            r#"
            [server]
            url = "https://nas.local:9000/"
            upload_path = "/api/upload"
            field_name = "archive"

            [selection]
            accepted_suffix = ".cbz"

            [transfer]
            connect_timeout_secs = 5
            io_timeout_secs = 120
            max_response_bytes = 2048

            [logging]
            level = "DEBUG"
            "#,
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.upload_url(), "https://nas.local:9000/api/upload");
        assert_eq!(config.field_name, "archive");
        assert_eq!(config.accepted_suffix, ".cbz");
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.io_timeout, Duration::from_secs(120));
        assert_eq!(config.max_response_bytes, 2048);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn out_of_range_values_warn_and_fall_back() {
        let (config, warnings) = parse(
            r#"
            [server]
            url = "ftp://example.com"
            upload_path = "upload"

            [selection]
            accepted_suffix = "zip"

            [transfer]
            connect_timeout_secs = 0
            max_response_bytes = 10

            [logging]
            level = "loud"
            "#,
        );
        assert_eq!(warnings.len(), 6, "{warnings:?}");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn syntax_error_is_an_error() {
        let result = parse_config("[server\nurl = 1", Path::new("config.toml"));
        assert!(matches!(result, Err(ConfigError::TomlParse { .. })));
    }

    #[test]
    fn missing_file_is_not_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(&dir.path().join("config.toml"));
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn unparseable_file_warns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not = [valid").unwrap();
        let (config, warnings) = load_config(&path);
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 1);
    }
}
