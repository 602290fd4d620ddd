//! Locating and reading `charmatrix.toml`.
//!
//! A project file next to the art (in the working directory or any ancestor)
//! wins over the per-user file under `$XDG_CONFIG_HOME/charmatrix/`. With
//! neither present the built-in defaults apply.

use super::schema::{CharmatrixConfig, ConfigValidationError};
use crate::import::FallbackColors;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file searched for.
pub const CONFIG_FILE_NAME: &str = "charmatrix.toml";

/// Why a configuration file could not be used.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("Cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid configuration in {}:\n{}", .path.display(), list(.errors))]
    Invalid {
        path: PathBuf,
        errors: Vec<ConfigValidationError>,
    },
}

fn list(errors: &[ConfigValidationError]) -> String {
    errors.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n")
}

/// Where the active configuration was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`
    Explicit(PathBuf),
    /// Found in the working directory or one of its ancestors
    Project(PathBuf),
    /// The per-user file
    User(PathBuf),
    /// No file; built-in defaults
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(p) | ConfigSource::Project(p) | ConfigSource::User(p) => Some(p),
            ConfigSource::Defaults => None,
        }
    }
}

/// The per-user configuration directory, `$XDG_CONFIG_HOME/charmatrix` or `~/.config/charmatrix`.
pub fn user_config_dir() -> Option<PathBuf> {
    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(std::env::var_os("HOME")?).join(".config"),
    };
    Some(base.join("charmatrix"))
}

/// Decide which file to read when starting from `dir`.
///
/// `user_dir` is consulted only if no ancestor of `dir` holds a config file.
pub fn locate_config(dir: &Path, user_dir: Option<&Path>) -> ConfigSource {
    let project = dir.ancestors().map(|d| d.join(CONFIG_FILE_NAME)).find(|p| p.is_file());
    if let Some(path) = project {
        return ConfigSource::Project(path);
    }
    match user_dir.map(|d| d.join(CONFIG_FILE_NAME)) {
        Some(path) if path.is_file() => ConfigSource::User(path),
        _ => ConfigSource::Defaults,
    }
}

/// Read, parse and validate one configuration file.
pub fn read_config(path: &Path) -> Result<CharmatrixConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: CharmatrixConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Invalid { path: path.to_path_buf(), errors });
    }
    Ok(config)
}

/// Load the configuration for this process.
///
/// An explicit path must exist. Otherwise the working directory is searched
/// with [`locate_config`].
pub fn load_config(explicit: Option<&Path>) -> Result<(CharmatrixConfig, ConfigSource), ConfigError> {
    let source = match explicit {
        Some(path) => ConfigSource::Explicit(path.to_path_buf()),
        None => {
            let cwd = std::env::current_dir().unwrap_or_default();
            locate_config(&cwd, user_config_dir().as_deref())
        }
    };

    let config = match source.path() {
        Some(path) => {
            log::debug!("loading config from {}", path.display());
            read_config(path)?
        }
        None => CharmatrixConfig::default(),
    };
    Ok((config, source))
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub scale: Option<u32>,
    pub cell_size: Option<u32>,
    pub font: Option<PathBuf>,
    pub fallback: Option<FallbackColors>,
}

impl CliOverrides {
    /// Overwrite every field of `config` that was given on the command line.
    pub fn apply_to(&self, config: &mut CharmatrixConfig) {
        if let Some(rows) = self.rows {
            config.grid.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.grid.cols = cols;
        }
        if let Some(scale) = self.scale {
            config.render.scale = scale;
        }
        if let Some(cell_size) = self.cell_size {
            config.render.cell_size = cell_size;
        }
        if self.font.is_some() {
            config.render.font.clone_from(&self.font);
        }
        if let Some(fallback) = self.fallback {
            config.import.fallback = fallback;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_locate_in_start_dir() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        write(&path, "[grid]\nrows = 4");
        assert_eq!(locate_config(temp.path(), None), ConfigSource::Project(path));
    }

    #[test]
    fn test_locate_in_ancestor() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        write(&path, "");
        let nested = temp.path().join("art").join("levels");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(locate_config(&nested, None), ConfigSource::Project(path));
    }

    #[test]
    fn test_project_wins_over_user() {
        let project = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();
        write(&project.path().join(CONFIG_FILE_NAME), "");
        write(&user.path().join(CONFIG_FILE_NAME), "");
        assert!(matches!(locate_config(project.path(), Some(user.path())), ConfigSource::Project(_)));
    }

    #[test]
    fn test_user_file_then_defaults() {
        let project = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();
        assert_eq!(locate_config(project.path(), Some(user.path())), ConfigSource::Defaults);

        let path = user.path().join(CONFIG_FILE_NAME);
        write(&path, "");
        assert_eq!(locate_config(project.path(), Some(user.path())), ConfigSource::User(path));
    }

    #[test]
    fn test_directory_named_like_config_is_skipped() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(locate_config(temp.path(), None), ConfigSource::Defaults);
    }

    #[test]
    fn test_read_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        write(
            &path,
            r##"
[grid]
rows = 10
cols = 12
default_char = "."

[history]
capacity = 5

[render]
cell_size = 16
border_color = "#333333"
"##,
        );

        let config = read_config(&path).unwrap();
        assert_eq!((config.grid.rows, config.grid.cols), (10, 12));
        assert_eq!(config.grid.default_char, ".");
        assert_eq!(config.history.capacity, 5);
        assert_eq!(config.render.cell_size, 16);
        assert_eq!(config.render.border_color, "#333333");
    }

    #[test]
    fn test_explicit_missing_file_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.toml");
        match load_config(Some(&path)) {
            Err(ConfigError::Read { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected read error, got {:?}", other),
        }
    }

    #[test]
    fn test_explicit_file_is_reported_as_source() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");
        write(&path, "[grid]\ncols = 3\n");
        let (config, source) = load_config(Some(&path)).unwrap();
        assert_eq!(config.grid.cols, 3);
        assert_eq!(source, ConfigSource::Explicit(path));
    }

    #[test]
    fn test_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        write(&path, "this is not valid toml {{{");
        assert!(matches!(read_config(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_validation_errors_are_listed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        write(&path, "[render]\nscale = 0\n\n[history]\ncapacity = 0\n");

        let err = read_config(&path).unwrap_err();
        match &err {
            ConfigError::Invalid { errors, .. } => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["history.capacity", "render.scale"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        let message = err.to_string();
        assert!(message.contains("  - charmatrix.toml: 'render.scale'"));
    }

    #[test]
    fn test_overrides_replace_given_fields() {
        let mut config = CharmatrixConfig::default();
        let overrides = CliOverrides {
            rows: Some(3),
            cols: Some(7),
            scale: Some(4),
            cell_size: Some(10),
            font: Some(PathBuf::from("mono.ttf")),
            fallback: Some(FallbackColors::Hashed),
        };

        overrides.apply_to(&mut config);
        assert_eq!((config.grid.rows, config.grid.cols), (3, 7));
        assert_eq!(config.render.scale, 4);
        assert_eq!(config.render.cell_size, 10);
        assert_eq!(config.render.font, Some(PathBuf::from("mono.ttf")));
        assert_eq!(config.import.fallback, FallbackColors::Hashed);
    }

    #[test]
    fn test_empty_overrides_change_nothing() {
        let mut config = CharmatrixConfig::default();
        CliOverrides::default().apply_to(&mut config);
        assert_eq!(config, CharmatrixConfig::default());
    }
}
