//! Decoration theme loading.
//!
//! Themes are plain TOML files describing the metrics and colors used when
//! building client frames. Loading tries the configured path first and
//! falls back to [FALLBACK_PATH]; a configured theme that can not be loaded
//! from either is fatal, while unconfigured runs settle for the built in
//! defaults when no file is present.
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::{info, warn};

/// The theme path tried when no theme is configured or the configured one
/// can not be loaded.
pub const FALLBACK_PATH: &str = "/usr/share/oxbow/theme.toml";

/// The colors used for each part of a client frame, as `0xRRGGBB` pixel
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeColors {
    /// The frame window itself, visible as the border around the client
    pub frame: u32,
    /// The titlebar strip
    pub titlebar: u32,
    /// The title label within the titlebar
    pub label: u32,
    /// The titlebar buttons
    pub buttons: u32,
    /// The resize handle and its grips
    pub handle: u32,
}

impl Default for ThemeColors {
    fn default() -> Self {
        ThemeColors {
            frame: 0x2e3440,
            titlebar: 0x3b4252,
            label: 0x434c5e,
            buttons: 0x4c566a,
            handle: 0x3b4252,
        }
    }
}

/// The metrics and colors used when building client decoration frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// The width of the border drawn around the client area
    pub border_width: u32,
    /// The height of the titlebar, including the buttons it holds
    pub titlebar_height: u32,
    /// The height of the resize handle below the client
    pub handle_height: u32,
    /// The width of the grips at either end of the handle
    pub grip_width: u32,
    /// The size of the square titlebar buttons
    pub button_size: u32,
    /// Frame part colors
    pub colors: ThemeColors,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            border_width: 1,
            titlebar_height: 20,
            handle_height: 6,
            grip_width: 16,
            button_size: 14,
            colors: ThemeColors::default(),
        }
    }
}

/// Load a [Theme] from the configured path, trying [FALLBACK_PATH] when
/// that fails.
///
/// An [Error] is only returned when a path was configured and every
/// candidate failed. With no configured path a missing fallback file means
/// the built in default theme.
pub fn load_with_fallback(configured: Option<&str>) -> Result<Theme> {
    if let Some(path) = configured {
        match load_file(path) {
            Ok(theme) => {
                info!(%path, "loaded theme");
                return Ok(theme);
            }
            Err(e) => warn!(%path, error = %e, "unable to load configured theme, falling back"),
        }
    }

    match load_file(FALLBACK_PATH) {
        Ok(theme) => {
            info!(path = FALLBACK_PATH, "loaded fallback theme");
            Ok(theme)
        }

        Err(e) => match configured {
            Some(path) => Err(Error::ThemeLoad {
                path: path.to_string(),
                fallback: FALLBACK_PATH.to_string(),
                reason: e,
            }),

            None => {
                info!("no theme file found, using the built in defaults");
                Ok(Theme::default())
            }
        },
    }
}

fn load_file(path: &str) -> std::result::Result<Theme, String> {
    let raw = fs::read_to_string(path).map_err(|e| e.to_string())?;

    toml::from_str(&raw).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_full_theme_file_parses() {
        let raw = "
border_width = 2
titlebar_height = 24
handle_height = 8
grip_width = 20
button_size = 16

[colors]
frame = 0x101010
titlebar = 0x202020
label = 0x303030
buttons = 0x404040
handle = 0x505050
";
        let theme: Theme = toml::from_str(raw).unwrap();

        assert_eq!(theme.border_width, 2);
        assert_eq!(theme.titlebar_height, 24);
        assert_eq!(theme.colors.frame, 0x101010);
        assert_eq!(theme.colors.handle, 0x505050);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let raw = "titlebar_height = 32";
        let theme: Theme = toml::from_str(raw).unwrap();

        assert_eq!(theme.titlebar_height, 32);
        assert_eq!(theme.border_width, Theme::default().border_width);
        assert_eq!(theme.colors, ThemeColors::default());
    }

    #[test]
    fn an_empty_file_is_the_default_theme() {
        let theme: Theme = toml::from_str("").unwrap();

        assert_eq!(theme, Theme::default());
    }

    #[test]
    fn invalid_toml_is_rejected() {
        let res: std::result::Result<Theme, _> = toml::from_str("border_width = [nope");

        assert!(res.is_err());
    }

    #[test]
    fn a_configured_theme_file_is_loaded() {
        let mut p = std::env::temp_dir();
        p.push(format!("oxbow-theme-test-{}.toml", std::process::id()));
        std::fs::write(&p, "titlebar_height = 32\n").unwrap();

        let path = p.to_string_lossy().to_string();
        let res = load_with_fallback(Some(&path));
        let _ = std::fs::remove_file(&p);

        assert_eq!(res.unwrap().titlebar_height, 32);
    }

    #[test]
    fn an_unloadable_configured_theme_is_fatal() {
        if std::path::Path::new(FALLBACK_PATH).exists() {
            return; // the fallback can not be made to fail on this machine
        }

        let res = load_with_fallback(Some("/definitely/not/a/theme.toml"));

        assert!(matches!(res, Err(Error::ThemeLoad { .. })));
    }

    #[test]
    fn an_unconfigured_run_without_a_fallback_file_uses_the_defaults() {
        if std::path::Path::new(FALLBACK_PATH).exists() {
            return;
        }

        assert_eq!(load_with_fallback(None).unwrap(), Theme::default());
    }
}
