//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// File name inside the config directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory under the XDG config base.
const APP_DIR_NAME: &str = "tvscout";

/// Resolves the config file path from the process environment.
///
/// # Errors
///
/// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is usable
/// (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    resolve_config_path_with(dir, |name| std::env::var(name).ok())
}

/// Resolves the config file path using `lookup` for environment variables.
///
/// - If `dir` is `Some`, returns `{dir}/config.toml`.
/// - Else if `XDG_CONFIG_HOME` is an absolute path, returns
///   `$XDG_CONFIG_HOME/tvscout/config.toml`.
/// - Otherwise returns `$HOME/.config/tvscout/config.toml`.
///
/// Empty or relative `XDG_CONFIG_HOME` values are ignored, as the XDG base
/// directory rules require.
///
/// # Errors
///
/// Returns an error if no base directory can be determined.
pub fn resolve_config_path_with(
    dir: Option<&PathBuf>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE_NAME));
    }

    if let Some(xdg) = lookup("XDG_CONFIG_HOME").filter(|v| Path::new(v).is_absolute()) {
        return Ok(PathBuf::from(xdg).join(APP_DIR_NAME).join(CONFIG_FILE_NAME));
    }

    match lookup("HOME").filter(|v| !v.is_empty()) {
        Some(home) => Ok(PathBuf::from(home)
            .join(".config")
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)),
        None => bail!("cannot locate config directory: set XDG_CONFIG_HOME or HOME, or pass --dir"),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn env_of(pairs: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        let pairs = pairs.to_vec();
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| String::from(*v))
        }
    }

    #[test]
    fn test_resolve_with_dir() {
        // Arrange
        let dir = PathBuf::from("/tmp/tvscout-project");

        // Act
        let path = resolve_config_path_with(
            Some(&dir),
            env_of(&[("XDG_CONFIG_HOME", "/xdg"), ("HOME", "/home/user")]),
        )
        .unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/tmp/tvscout-project/config.toml"));
    }

    #[test]
    fn test_resolve_prefers_xdg_config_home() {
        // Arrange
        let lookup = env_of(&[("XDG_CONFIG_HOME", "/xdg"), ("HOME", "/home/user")]);

        // Act
        let path = resolve_config_path_with(None, lookup).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/xdg/tvscout/config.toml"));
    }

    #[test]
    fn test_resolve_falls_back_to_home() {
        // Arrange
        let lookup = env_of(&[("HOME", "/home/user")]);

        // Act
        let path = resolve_config_path_with(None, lookup).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/home/user/.config/tvscout/config.toml"));
    }

    #[test]
    fn test_resolve_ignores_relative_or_empty_xdg() {
        // Arrange
        let relative = env_of(&[("XDG_CONFIG_HOME", "rel/xdg"), ("HOME", "/home/user")]);
        let empty = env_of(&[("XDG_CONFIG_HOME", ""), ("HOME", "/home/user")]);

        // Act
        let from_relative = resolve_config_path_with(None, relative).unwrap();
        let from_empty = resolve_config_path_with(None, empty).unwrap();

        // Assert
        let expected = PathBuf::from("/home/user/.config/tvscout/config.toml");
        assert_eq!(from_relative, expected);
        assert_eq!(from_empty, expected);
    }

    #[test]
    fn test_resolve_without_any_base_fails() {
        // Arrange & Act
        let err = resolve_config_path_with(None, |_| None).unwrap_err();

        // Assert
        assert!(err.to_string().contains("cannot locate config directory"));
    }
}
