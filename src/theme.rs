//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Colour lookup for rendering. Piece colours are indexed by the cell value
/// (1..=7); value 0 is reserved and never drawn.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Piece colours for cell values 1..=7 (O, I, Z, S, L, J, T).
    pub pieces: [Color; 7],
    /// Playfield background.
    pub bg: Color,
    /// Border / grid lines.
    pub border: Color,
    /// Text (counter, key help).
    pub text: Color,
    /// Titles and the highlighted menu item.
    pub title: Color,
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
        Self::classic()
    }
}

impl Theme {
    /// The classic palette: yellow O, cyan I, red Z, green S, orange L,
    /// pink J, purple T on an olive background.
    pub fn classic() -> Self {
        Self {
            pieces: [
                parse_hex("#FAFF00").unwrap(),
                parse_hex("#00E4FF").unwrap(),
                parse_hex("#F60000").unwrap(),
                parse_hex("#69B625").unwrap(),
                parse_hex("#FF8D00").unwrap(),
                parse_hex("#FF51BC").unwrap(),
                parse_hex("#9F0096").unwrap(),
            ],
            bg: parse_hex("#566425").unwrap(),
            border: parse_hex("#3F444F").unwrap(),
            text: parse_hex("#ABB2BF").unwrap(),
            title: parse_hex("#E5C07B").unwrap(),
        }
    }

    /// Load a theme from a btop-style file: `theme[key]="#RRGGBB"` with keys
    /// piece1..piece7, bg, border, text, title. Falls back to the classic
    /// palette if the path is None or the file is missing; per-key fallbacks
    /// apply when a key is absent or unparseable.
    pub fn load(path: Option<&Path>) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default()),
        };
        let s = std::fs::read_to_string(path)?;
        let map = parse_theme_file(&s);
        Ok(Self::from_map(&map))
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let classic = Self::classic();
        let get = |key: &str, fallback: Color| {
            map.get(key)
                .and_then(|v| parse_hex(v).ok())
                .unwrap_or(fallback)
        };
        let mut pieces = classic.pieces;
        for (i, slot) in pieces.iter_mut().enumerate() {
            *slot = get(&format!("piece{}", i + 1), *slot);
        }
        Self {
            pieces,
            bg: get("bg", classic.bg),
            border: get("border", classic.border),
            text: get("text", classic.text),
            title: get("title", classic.title),
        }
    }

    /// Colour for an occupied cell value (1..=7).
    #[inline]
    pub fn piece_color(&self, value: u8) -> Color {
        self.pieces[(value.saturating_sub(1) as usize) % 7]
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
    let (r, g, b) = if s.len() == 6 {
        let r =
            u8::from_str_radix(&s[0..2], 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))?;
        let g =
            u8::from_str_radix(&s[2..4], 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))?;
        let b =
            u8::from_str_radix(&s[4..6], 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))?;
        (r, g, b)
    } else if s.len() == 3 {
        let r = u8::from_str_radix(&s[0..1], 16)
            .map_err(|_| ThemeError::InvalidHex(s.to_string()))?
            * 17;
        let g = u8::from_str_radix(&s[1..2], 16)
            .map_err(|_| ThemeError::InvalidHex(s.to_string()))?
            * 17;
        let b = u8::from_str_radix(&s[2..3], 16)
            .map_err(|_| ThemeError::InvalidHex(s.to_string()))?
            * 17;
        (r, g, b)
    } else {
        return Err(ThemeError::InvalidHex(s.to_string()));
    };
    Ok(Color::Rgb(r, g, b))
}
