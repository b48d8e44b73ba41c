// Configuration loading and validation (config/dashboard.toml).

use pitchlab_core::view::ViewSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides `[data] path`.
pub const DATA_PATH_ENV: &str = "PITCHLAB_DATA";

const CONFIG_FILE: &str = "dashboard.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub data: DataConfig,
    pub server: ServerConfig,
    pub views: ViewSettings,
}

/// Raw deserialization target for dashboard.toml.
#[derive(Debug, Clone, Deserialize)]
struct DashboardFile {
    data: DataConfig,
    server: ServerConfig,
    #[serde(default)]
    views: ViewSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// CSV export to load at startup.
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/dashboard.toml` under `base_dir`.
///
/// Does not copy defaults and ignores the environment; see [`load_config`].
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;
    let file: DashboardFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        data: file.data,
        server: file.server,
        views: file.views,
    };
    validate(&config)?;
    Ok(config)
}

/// Copy every file in `defaults/` that is missing from `config/`.
///
/// `.example` templates are skipped and existing files are left untouched.
/// Returns the paths that were created.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if config_dir.exists() {
            return Ok(vec![]);
        }
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "neither defaults/ nor config/ directory found in {}",
                base_dir.display()
            ),
        });
    }

    let copy_err = |message: String| ConfigError::DefaultsCopyError { message };

    std::fs::create_dir_all(&config_dir)
        .map_err(|e| copy_err(format!("failed to create config directory: {e}")))?;
    let entries = std::fs::read_dir(&defaults_dir)
        .map_err(|e| copy_err(format!("failed to read defaults directory: {e}")))?;

    let mut copied = Vec::new();
    for entry in entries {
        let source = entry
            .map_err(|e| copy_err(format!("failed to read defaults entry: {e}")))?
            .path();
        let Some(file_name) = source.file_name().filter(|_| source.is_file()) else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }

        let target = config_dir.join(file_name);
        if target.exists() {
            continue;
        }
        std::fs::copy(&source, &target).map_err(|e| {
            copy_err(format!(
                "failed to copy {} to {}: {e}",
                source.display(),
                target.display()
            ))
        })?;
        copied.push(target);
    }

    Ok(copied)
}

/// Load config relative to the current working directory, copying defaults
/// first and applying the [`DATA_PATH_ENV`] override.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    let config = load_config_from(&cwd)?;
    apply_data_override(config, std::env::var(DATA_PATH_ENV).ok())
}

/// Replace the data path when an override is present and non-blank.
pub fn apply_data_override(mut config: Config, path: Option<String>) -> Result<Config, ConfigError> {
    if let Some(path) = path.filter(|p| !p.trim().is_empty()) {
        config.data.path = path;
        validate(&config)?;
    }
    Ok(config)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let invalid = |field: &str, message: String| ConfigError::ValidationError {
        field: field.into(),
        message,
    };

    if config.data.path.trim().is_empty() {
        return Err(invalid("data.path", "must not be empty".into()));
    }
    if config.server.host.trim().is_empty() {
        return Err(invalid("server.host", "must not be empty".into()));
    }
    if config.server.port == 0 {
        return Err(invalid("server.port", "must be greater than 0".into()));
    }

    let limit = config.views.axis_limit;
    if !(limit.is_finite() && limit > 0.0) {
        return Err(invalid("views.axis_limit", format!("must be > 0, got {limit}")));
    }
    let dim = config.views.dim_opacity;
    if !(dim > 0.0 && dim <= 1.0) {
        return Err(invalid(
            "views.dim_opacity",
            format!("must be in (0.0, 1.0], got {dim}"),
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// The crate root holding `defaults/` (cargo runs unit tests there, but
    /// tolerate running from the workspace root too).
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("crates/pitchlab-app/defaults").exists() {
            cwd.join("crates/pitchlab-app")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    /// Fresh temp dir with `config/dashboard.toml` holding `contents`.
    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), contents).unwrap();
        tmp
    }

    fn default_text() -> String {
        fs::read_to_string(project_root().join("defaults").join(CONFIG_FILE)).unwrap()
    }

    fn expect_validation_field(base: &Path, expected: &str) {
        match load_config_from(base).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn default_config_loads() {
        let tmp = temp_config("pitchlab_config_default", &default_text());
        let config = load_config_from(&tmp).expect("defaults should be valid");

        assert_eq!(config.data.path, "data/pitches.csv");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 1222);
        assert!((config.views.axis_limit - 30.0).abs() < f64::EPSILON);
        assert!((config.views.dim_opacity - 0.25).abs() < f64::EPSILON);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn views_section_is_optional() {
        let tmp = temp_config(
            "pitchlab_config_no_views",
            r#"
[data]
path = "pitches.csv"

[server]
host = "0.0.0.0"
port = 8080
"#,
        );
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.views, ViewSettings::default());
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn partial_views_section_keeps_other_defaults() {
        let tmp = temp_config(
            "pitchlab_config_partial_views",
            r#"
[data]
path = "pitches.csv"

[server]
host = "127.0.0.1"
port = 1222

[views]
axis_limit = 40.0
"#,
        );
        let config = load_config_from(&tmp).unwrap();
        assert!((config.views.axis_limit - 40.0).abs() < f64::EPSILON);
        assert!((config.views.dim_opacity - 0.25).abs() < f64::EPSILON);
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_port() {
        let text = default_text().replace("port = 1222", "port = 0");
        let tmp = temp_config("pitchlab_config_zero_port", &text);
        expect_validation_field(&tmp, "server.port");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_dim_opacity_out_of_range() {
        let text = default_text().replace("dim_opacity = 0.25", "dim_opacity = 1.5");
        let tmp = temp_config("pitchlab_config_dim_high", &text);
        expect_validation_field(&tmp, "views.dim_opacity");
        let _ = fs::remove_dir_all(&tmp);

        let text = default_text().replace("dim_opacity = 0.25", "dim_opacity = 0.0");
        let tmp = temp_config("pitchlab_config_dim_zero", &text);
        expect_validation_field(&tmp, "views.dim_opacity");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_negative_axis_limit() {
        let text = default_text().replace("axis_limit = 30.0", "axis_limit = -5.0");
        let tmp = temp_config("pitchlab_config_axis_neg", &text);
        expect_validation_field(&tmp, "views.axis_limit");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_data_path() {
        let text = default_text().replace("path = \"data/pitches.csv\"", "path = \"\"");
        let tmp = temp_config("pitchlab_config_empty_path", &text);
        expect_validation_field(&tmp, "data.path");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = temp_config("pitchlab_config_invalid", "this is not valid [[[ toml");
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with(CONFIG_FILE)),
            other => panic!("expected ParseError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_when_missing() {
        let tmp = std::env::temp_dir().join("pitchlab_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();

        match load_config_from(&tmp).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with(CONFIG_FILE)),
            other => panic!("expected FileNotFound, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn data_override_replaces_path() {
        let tmp = temp_config("pitchlab_config_override", &default_text());
        let config = load_config_from(&tmp).unwrap();

        let overridden = apply_data_override(config.clone(), Some("/srv/rapsodo.csv".into())).unwrap();
        assert_eq!(overridden.data.path, "/srv/rapsodo.csv");

        let untouched = apply_data_override(config, Some("   ".into())).unwrap();
        assert_eq!(untouched.data.path, "data/pitches.csv");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_files() {
        let tmp = std::env::temp_dir().join("pitchlab_config_ensure_copies");
        let _ = fs::remove_dir_all(&tmp);
        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::write(defaults_dir.join(CONFIG_FILE), default_text()).unwrap();
        fs::write(defaults_dir.join("dashboard.toml.example"), "# template\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);
        assert!(tmp.join("config").join(CONFIG_FILE).exists());
        assert!(!tmp.join("config/dashboard.toml.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_keeps_existing() {
        let tmp = std::env::temp_dir().join("pitchlab_config_ensure_keeps");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE), default_text()).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), "# custom\n").unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert!(copied.is_empty());
        let content = fs::read_to_string(tmp.join("config").join(CONFIG_FILE)).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("pitchlab_config_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        match ensure_config_files(&tmp).unwrap_err() {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/ nor config/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }
}
