//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use voxtris::PieceKind;

/// Piece kinds in colour-index order (Seed first).
const KINDS: [PieceKind; 5] = [
    PieceKind::Seed,
    PieceKind::Cube,
    PieceKind::Domino,
    PieceKind::Ell,
    PieceKind::Tee,
];

/// Piece colours and UI colours.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Indexed by `PieceKind::color_index`.
    pub pieces: [Color; 5],
    /// Playfield background.
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    /// Text.
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Empty cell dots, secondary text.
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

/// Parse a hex literal that is known to be well-formed; grey if it is not.
fn hex_or_grey(s: &str) -> Color {
    parse_hex(s).unwrap_or(Color::Gray)
}

impl Theme {
    /// One Dark UI colours with the catalog's piece colours.
    pub fn onedark_default() -> Self {
        Self {
            pieces: KINDS.map(|k| hex_or_grey(k.color())),
            bg: hex_or_grey("#282C34"),
            div_line: hex_or_grey("#3F444F"),
            main_fg: hex_or_grey("#ABB2BF"),
            title: hex_or_grey("#E5C07B"),
            inactive_fg: hex_or_grey("#5C6370"),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to defaults if path is None or the file is missing.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default_for_palette(palette)),
        };
        let s = std::fs::read_to_string(path)?;
        let map = parse_theme_file(&s);
        let mut theme = Self::from_map(&map);
        theme.apply_palette(palette);
        Ok(theme)
    }

    pub fn default_for_palette(palette: crate::Palette) -> Self {
        let mut t = Self::onedark_default();
        t.apply_palette(palette);
        t
    }

    /// Override piece colours for high-contrast or colorblind play. Seed stays grey.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        let played = match palette {
            crate::Palette::Normal => return,
            crate::Palette::HighContrast => ["#FF00FF", "#FF8800", "#00FFFF", "#FFFF00"],
            crate::Palette::Colorblind => ["#0077BB", "#EE7733", "#009988", "#EE3377"],
        };
        for (slot, hex) in self.pieces[1..].iter_mut().zip(played) {
            *slot = hex_or_grey(hex);
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).and_then(|v| parse_hex(v).ok());
        let defaults = Self::onedark_default();
        let mut pieces = defaults.pieces;
        for (slot, kind) in pieces.iter_mut().zip(KINDS) {
            if let Some(c) = get(&format!("piece_{}", kind.name().to_lowercase())) {
                *slot = c;
            }
        }
        Self {
            pieces,
            bg: get("main_bg").or_else(|| get("meter_bg")).unwrap_or(defaults.bg),
            div_line: get("div_line").unwrap_or(defaults.div_line),
            main_fg: get("main_fg").unwrap_or(defaults.main_fg),
            title: get("title").unwrap_or(defaults.title),
            inactive_fg: get("inactive_fg").unwrap_or(defaults.inactive_fg),
        }
    }

    #[inline]
    pub fn piece_color(&self, kind: PieceKind) -> Color {
        self.pieces[kind.color_index() % self.pieces.len()]
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(stripped) = line.strip_prefix("theme[") {
            if let Some(end) = stripped.find(']') {
                let key = stripped[..end].trim();
                let rest = stripped[end + 1..].trim();
                if let Some(eq) = rest.find('=') {
                    let value = rest[eq + 1..]
                        .trim()
                        .trim_matches('"')
                        .trim_matches('\'')
                        .to_string();
                    if !value.is_empty() {
                        map.insert(key.to_string(), value);
                    }
                }
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    if !s.is_ascii() {
        return Err(ThemeError::InvalidHex(s.to_string()));
    }
    let channel = |digits: &str| {
        u8::from_str_radix(digits, 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))
    };
    let (r, g, b) = match s.len() {
        6 => (channel(&s[0..2])?, channel(&s[2..4])?, channel(&s[4..6])?),
        3 => (
            channel(&s[0..1])? * 17,
            channel(&s[1..2])? * 17,
            channel(&s[2..3])? * 17,
        ),
        _ => return Err(ThemeError::InvalidHex(s.to_string())),
    };
    Ok(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        let c = parse_hex("#98C379").unwrap();
        assert!(matches!(c, Color::Rgb(0x98, 0xC3, 0x79)));
    }

    #[test]
    fn test_parse_hex_3() {
        let c = parse_hex("#FFF").unwrap();
        assert!(matches!(c, Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(parse_hex("#12345").is_err());
        assert!(parse_hex("#GGGGGG").is_err());
    }

    #[test]
    fn test_parse_hex_rejects_multibyte() {
        assert!(parse_hex("aé123").is_err());
        assert!(parse_hex("#ééé").is_err());
    }

    #[test]
    fn test_non_ascii_value_keeps_default() {
        let map = parse_theme_file("theme[title]=\"aé123\"");
        let theme = Theme::from_map(&map);
        assert_eq!(theme.title, Theme::default().title);
    }

    #[test]
    fn test_parse_theme_line() {
        let map = parse_theme_file(r##"theme[main_bg]="#31353F""##);
        assert_eq!(map.get("main_bg"), Some(&"#31353F".to_string()));
    }

    #[test]
    fn test_default_piece_colours_follow_catalog() {
        let theme = Theme::default();
        assert!(matches!(
            theme.piece_color(PieceKind::Domino),
            Color::Rgb(0xF9, 0x73, 0x16)
        ));
        assert!(matches!(
            theme.piece_color(PieceKind::Seed),
            Color::Rgb(0x88, 0x88, 0x88)
        ));
    }

    #[test]
    fn test_theme_file_overrides_piece() {
        let map = parse_theme_file("theme[piece_cube]=\"#010203\"\ntheme[title]='#FFFFFF'");
        let theme = Theme::from_map(&map);
        assert!(matches!(
            theme.piece_color(PieceKind::Cube),
            Color::Rgb(1, 2, 3)
        ));
        assert!(matches!(theme.title, Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_palette_keeps_seed() {
        let mut theme = Theme::default();
        let seed = theme.piece_color(PieceKind::Seed);
        theme.apply_palette(crate::Palette::Colorblind);
        assert_eq!(theme.piece_color(PieceKind::Seed), seed);
        assert!(matches!(
            theme.piece_color(PieceKind::Cube),
            Color::Rgb(0x00, 0x77, 0xBB)
        ));
    }
}
