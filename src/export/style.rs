//! Themes, palettes and the embedded stylesheet.
//!
//! The preview follows the ambient [`Theme`]; exports never do.  Every
//! exported document is rendered with [`Palette::PRINT`], and its stylesheet
//! declares `color-scheme: light` so viewers running a dark theme do not
//! invert it.

use serde::{Deserialize, Serialize};

/// Ambient UI theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Error returned when parsing an unknown theme name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme `{0}` (expected light or dark)")]
pub struct UnknownTheme(pub String);

impl std::str::FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(UnknownTheme(s.to_string())),
        }
    }
}

/// Colours used by the stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub scheme: &'static str,
    pub text: &'static str,
    pub heading: &'static str,
    pub background: &'static str,
    pub quote_border: &'static str,
    pub quote_text: &'static str,
}

impl Palette {
    /// Light, print-friendly palette used by every export.
    pub const PRINT: Palette = Palette {
        scheme: "light",
        text: "#111827",
        heading: "#111827",
        background: "#ffffff",
        quote_border: "#e5e7eb",
        quote_text: "#4b5563",
    };

    pub const DARK: Palette = Palette {
        scheme: "dark",
        text: "#f3f4f6",
        heading: "#ffffff",
        background: "#1f2937",
        quote_border: "#4b5563",
        quote_text: "#d1d5db",
    };

    /// Palette for the on-screen preview.
    pub fn for_preview(theme: Theme) -> Palette {
        match theme {
            Theme::Light => Palette::PRINT,
            Theme::Dark => Palette::DARK,
        }
    }

    /// Palette for exported documents: always [`Palette::PRINT`].
    pub fn for_export(ambient: Theme) -> Palette {
        if ambient == Theme::Dark {
            log::debug!("export: overriding dark ambient theme with print palette");
        }
        Palette::PRINT
    }
}

/// The `<style>` body for a standalone document.
pub fn stylesheet(palette: &Palette) -> String {
    format!(
        "\
:root {{ color-scheme: {scheme}; }}
body {{ font-family: 'Inter', sans-serif; line-height: 1.6; max-width: 800px; margin: 2rem auto; padding: 0 1rem; color: {text}; background: {background}; }}
h1, h2, h3, h4, h5, h6 {{ color: {heading}; font-weight: 700; margin-top: 1.5em; margin-bottom: 0.5em; }}
p {{ margin-bottom: 1em; }}
ul, ol {{ margin-bottom: 1em; padding-left: 1.5em; }}
li {{ margin-bottom: 0.25em; }}
strong {{ font-weight: 600; }}
blockquote {{ border-left: 4px solid {quote_border}; padding-left: 1em; color: {quote_text}; font-style: italic; }}
table {{ border-collapse: collapse; margin-bottom: 1em; }}
th, td {{ border: 1px solid {quote_border}; padding: 0.25em 0.5em; }}
.content {{ color: {text} !important; }}
.content * {{ color: {text}; }}
.content blockquote {{ color: {quote_text}; }}
@media print {{ body {{ margin: 0; max-width: none; background: {background}; }} }}
",
        scheme = palette.scheme,
        text = palette.text,
        heading = palette.heading,
        background = palette.background,
        quote_border = palette.quote_border,
        quote_text = palette.quote_text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_palette_ignores_ambient_theme() {
        assert_eq!(Palette::for_export(Theme::Dark), Palette::PRINT);
        assert_eq!(Palette::for_export(Theme::Light), Palette::PRINT);
    }

    #[test]
    fn preview_palette_follows_theme() {
        assert_eq!(Palette::for_preview(Theme::Dark), Palette::DARK);
        assert_eq!(Palette::for_preview(Theme::Light), Palette::PRINT);
    }

    #[test]
    fn print_stylesheet_forces_light_scheme() {
        let css = stylesheet(&Palette::PRINT);
        assert!(css.contains("color-scheme: light"));
        assert!(css.contains("background: #ffffff"));
        assert!(css.contains("color: #111827 !important"));
    }

    #[test]
    fn theme_parses() {
        assert_eq!("Dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!("light".parse::<Theme>(), Ok(Theme::Light));
        assert_eq!(
            "sepia".parse::<Theme>(),
            Err(UnknownTheme("sepia".to_string()))
        );
        assert_eq!(
            UnknownTheme("sepia".into()).to_string(),
            "unknown theme `sepia` (expected light or dark)"
        );
    }

    #[test]
    fn dark_stylesheet_uses_dark_scheme() {
        let css = stylesheet(&Palette::DARK);
        assert!(css.contains("color-scheme: dark"));
        assert!(!css.contains("background: #ffffff"));
    }
}
