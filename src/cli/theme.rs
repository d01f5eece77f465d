//! Colours for `list`.
//!
//! Loading never fails: a missing, unreadable or malformed theme file logs a
//! warning and `list` falls back to the built-in colours.

use anyhow::{Context, Result};
use crossterm::style::Color;
use directories::ProjectDirs;
use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// `cli.json`; every key optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ThemeFile {
    enabled: Option<bool>,
    header: Option<String>,
    done: Option<String>,
    pending: Option<String>,
    id: Option<String>,
}

pub struct CliTheme {
    pub enabled: bool,
    pub header: Color,
    pub done: Color,
    pub pending: Color,
    pub id: Color,
}

impl Default for CliTheme {
    fn default() -> Self {
        Self {
            enabled: true,
            header: Color::DarkYellow,
            done: Color::DarkGreen,
            pending: Color::DarkRed,
            id: Color::DarkGrey,
        }
    }
}

impl CliTheme {
    fn from_file(file: ThemeFile) -> Self {
        let defaults = Self::default();
        Self {
            enabled: file.enabled.unwrap_or(defaults.enabled),
            header: pick_color("header", file.header.as_deref(), defaults.header),
            done: pick_color("done", file.done.as_deref(), defaults.done),
            pending: pick_color("pending", file.pending.as_deref(), defaults.pending),
            id: pick_color("id", file.id.as_deref(), defaults.id),
        }
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Reads the theme from `override_path`, or from `cli.json` in the config
/// directory when that file exists.
pub fn load_cli_theme(override_path: Option<&Path>) -> CliTheme {
    let path = match override_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_theme_path().filter(|path| path.exists()),
    };
    let Some(path) = path else {
        return CliTheme::default();
    };

    match read_theme_file(&path) {
        Ok(file) => CliTheme::from_file(file),
        Err(err) => {
            warn!(
                "event=theme_load status=fallback path={} error={:#}",
                path.display(),
                err
            );
            CliTheme::default()
        }
    }
}

fn read_theme_file(path: &Path) -> Result<ThemeFile> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("unable to read {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("unable to parse {}", path.display()))
}

fn default_theme_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "wdid").map(|dirs| dirs.config_dir().join("cli.json"))
}

/// Colour names follow crossterm (`dark_red`, `cyan`, `dark_grey`, ...).
fn pick_color(key: &str, name: Option<&str>, fallback: Color) -> Color {
    let Some(name) = name else {
        return fallback;
    };
    Color::try_from(name).unwrap_or_else(|_| {
        warn!("event=theme_color status=unknown key={} name={}", key, name);
        fallback
    })
}
