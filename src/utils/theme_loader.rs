use anyhow::{Context, Result};
use ratatui::style::Color;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::internal::models::ThemeMode;

#[derive(Debug, Deserialize, Clone)]
pub struct ThemeFile {
    #[allow(dead_code)]
    pub name: String,
    pub themes: Vec<ThemeVariant>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ThemeVariant {
    #[allow(dead_code)]
    pub name: String,
    pub mode: String, // "light" or "dark"
    pub colors: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TuiTheme {
    pub background: Color,
    pub foreground: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub border: Color,
    pub accent: Color,
    pub muted: Color,
    pub highlight_bg: Color,
    pub error: Color,
    pub user_message: Color,
    pub bot_message: Color,
}

impl TuiTheme {
    /// Palette used when no theme file provides one.
    pub fn builtin(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self {
                background: Color::Rgb(0xff, 0xfc, 0xf0),
                foreground: Color::Rgb(0x10, 0x0f, 0x0f),
                selection_bg: Color::Rgb(0x20, 0x5e, 0xa6),
                selection_fg: Color::Rgb(0xff, 0xfc, 0xf0),
                border: Color::Rgb(0xb7, 0xb5, 0xac),
                accent: Color::Rgb(0x20, 0x5e, 0xa6),
                muted: Color::Rgb(0x6f, 0x6e, 0x69),
                highlight_bg: Color::Rgb(0xfa, 0xe3, 0x8c),
                error: Color::Rgb(0xaf, 0x30, 0x29),
                user_message: Color::Rgb(0x24, 0x83, 0x7b),
                bot_message: Color::Rgb(0x5e, 0x40, 0x9d),
            },
            ThemeMode::Dark => Self {
                background: Color::Rgb(0x10, 0x0f, 0x0f),
                foreground: Color::Rgb(0xce, 0xcd, 0xc3),
                selection_bg: Color::Rgb(0x43, 0x85, 0xbe),
                selection_fg: Color::Rgb(0x10, 0x0f, 0x0f),
                border: Color::Rgb(0x40, 0x3e, 0x3c),
                accent: Color::Rgb(0x43, 0x85, 0xbe),
                muted: Color::Rgb(0x87, 0x85, 0x80),
                highlight_bg: Color::Rgb(0x66, 0x58, 0x00),
                error: Color::Rgb(0xd1, 0x4d, 0x41),
                user_message: Color::Rgb(0x3a, 0xa9, 0x9f),
                bot_message: Color::Rgb(0x8b, 0x7e, 0xc8),
            },
        }
    }
}

/// The two palettes the theme toggle switches between.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemePalettes {
    pub light: TuiTheme,
    pub dark: TuiTheme,
}

impl Default for ThemePalettes {
    fn default() -> Self {
        Self {
            light: TuiTheme::builtin(ThemeMode::Light),
            dark: TuiTheme::builtin(ThemeMode::Dark),
        }
    }
}

impl ThemePalettes {
    /// Load both variants from `theme_file`, falling back per variant to the built-ins.
    pub fn resolve(theme_file: Option<&str>) -> Self {
        let Some(path) = theme_file else {
            return Self::default();
        };
        let path = Path::new(path);
        let load = |mode: ThemeMode| match load_theme(path, mode) {
            Ok(theme) => theme,
            Err(e) => {
                tracing::error!("Failed to load {} theme from '{}': {:#}", mode, path.display(), e);
                TuiTheme::builtin(mode)
            }
        };
        Self {
            light: load(ThemeMode::Light),
            dark: load(ThemeMode::Dark),
        }
    }

    pub fn for_mode(&self, mode: ThemeMode) -> &TuiTheme {
        match mode {
            ThemeMode::Light => &self.light,
            ThemeMode::Dark => &self.dark,
        }
    }
}

#[tracing::instrument(skip(path, mode), fields(path = ?path, mode = %mode))]
pub fn load_theme(path: &Path, mode: ThemeMode) -> Result<TuiTheme> {
    let content = fs::read_to_string(path).context("Failed to read theme file")?;
    let theme_file: ThemeFile =
        serde_json::from_str(&content).context("Failed to parse theme JSON")?;

    let variant = theme_file
        .themes
        .iter()
        .find(|t| t.mode == mode.as_ref())
        .context("No matching theme variant found")?;

    let fallback = TuiTheme::builtin(mode);
    let pick = |keys: &[&str], default: Color| {
        keys.iter()
            .find_map(|key| variant.colors.get(*key))
            .map(|hex| parse_color(hex))
            .unwrap_or(default)
    };

    Ok(TuiTheme {
        background: pick(&["background"], fallback.background),
        foreground: pick(&["foreground"], fallback.foreground),
        selection_bg: pick(
            &[
                "selection.background",
                "list.active.background",
                "primary.background",
            ],
            fallback.selection_bg,
        ),
        selection_fg: pick(
            &["accent.foreground", "foreground"],
            fallback.selection_fg,
        ),
        border: pick(&["border"], fallback.border),
        accent: pick(&["base.blue", "primary.background"], fallback.accent),
        muted: pick(&["muted.foreground"], fallback.muted),
        highlight_bg: pick(&["base.yellow"], fallback.highlight_bg),
        error: pick(&["base.red", "danger.background"], fallback.error),
        user_message: pick(&["base.cyan"], fallback.user_message),
        bot_message: pick(&["base.magenta"], fallback.bot_message),
    })
}

fn parse_color(hex: &str) -> Color {
    if let Ok(c) = hex.parse::<Color>() {
        return c;
    }

    let hex = hex.trim_start_matches('#');
    match hex.len() {
        6 | 8 if hex.is_ascii() => {
            // For 8-char hex (with alpha), ignore the alpha and use the RGB components.
            let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
            let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
            let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
            Color::Rgb(r, g, b)
        }
        _ => Color::Reset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THEME_JSON: &str = r##"{
        "name": "Nook",
        "themes": [
            {"name": "Nook Light", "mode": "light", "colors": {"background": "#fafafa", "base.yellow": "#ffee00"}},
            {"name": "Nook Dark", "mode": "dark", "colors": {"background": "#111111cc", "foreground": "white"}}
        ]
    }"##;

    fn write_theme(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_color_formats() {
        assert_eq!(parse_color("#102030"), Color::Rgb(0x10, 0x20, 0x30));
        assert_eq!(parse_color("10203040"), Color::Rgb(0x10, 0x20, 0x30));
        assert_eq!(parse_color("red"), Color::Red);
        assert_eq!(parse_color("#abc"), Color::Reset);
        assert_eq!(parse_color("#aébcd"), Color::Reset);
    }

    #[test]
    fn test_non_ascii_color_falls_back_without_panicking() {
        let path = write_theme(
            "nook_viewer_theme_non_ascii.json",
            r##"{"name": "Odd", "themes": [{"name": "Odd", "mode": "light", "colors": {"background": "#aébcd", "border": "#000000"}}]}"##,
        );

        let palettes = ThemePalettes::resolve(path.to_str());
        assert_eq!(palettes.light.background, Color::Reset);
        assert_eq!(palettes.light.border, Color::Rgb(0, 0, 0));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_load_variant_by_mode_with_fallbacks() {
        let path = write_theme("nook_viewer_theme_variants.json", THEME_JSON);

        let light = load_theme(&path, ThemeMode::Light).unwrap();
        assert_eq!(light.background, Color::Rgb(0xfa, 0xfa, 0xfa));
        assert_eq!(light.highlight_bg, Color::Rgb(0xff, 0xee, 0x00));
        assert_eq!(
            light.foreground,
            TuiTheme::builtin(ThemeMode::Light).foreground
        );

        let dark = load_theme(&path, ThemeMode::Dark).unwrap();
        assert_eq!(dark.background, Color::Rgb(0x11, 0x11, 0x11));
        assert_eq!(dark.foreground, Color::White);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_resolve_falls_back_for_missing_variant() {
        let path = write_theme(
            "nook_viewer_theme_light_only.json",
            r##"{"name": "Paper", "themes": [{"name": "Paper", "mode": "light", "colors": {"border": "#000000"}}]}"##,
        );

        let palettes = ThemePalettes::resolve(path.to_str());
        assert_eq!(palettes.light.border, Color::Rgb(0, 0, 0));
        assert_eq!(palettes.dark, TuiTheme::builtin(ThemeMode::Dark));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_resolve_without_file_uses_builtins() {
        let palettes = ThemePalettes::resolve(None);
        assert_eq!(palettes, ThemePalettes::default());
        assert_eq!(
            palettes.for_mode(ThemeMode::Dark),
            &TuiTheme::builtin(ThemeMode::Dark)
        );
    }
}
