use thiserror::Error;

/// Color used when a subscription's color string cannot be parsed.
pub const DEFAULT_COLOR: u32 = 0x000000;

const MAX_COLOR: u32 = 0xFF_FFFF;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("Invalid hex color {0:?}")]
    InvalidHex(String),
    #[error("Color {0:?} exceeds 0xFFFFFF")]
    OutOfRange(String),
}

/// Parses a 24-bit hex color such as `#ff8800` or `FF8800`.
///
/// Every `#` is ignored, so `"#ff8800"` and `"ff8800"` are equivalent.
pub fn parse_color(hex: &str) -> Result<u32, ColorError> {
    let digits: String = hex.chars().filter(|&c| c != '#').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(hex.to_owned()));
    }
    let value = u32::from_str_radix(&digits, 16)
        .map_err(|_| ColorError::InvalidHex(hex.to_owned()))?;
    if value > MAX_COLOR {
        return Err(ColorError::OutOfRange(hex.to_owned()));
    }
    Ok(value)
}

/// Like [`parse_color`], but logs the problem and falls back to [`DEFAULT_COLOR`].
pub fn parse_color_or_default(hex: &str) -> u32 {
    match parse_color(hex) {
        Ok(color) => color,
        Err(e) => {
            tracing::warn!(color = %hex, error = %e, "Invalid color, using default");
            DEFAULT_COLOR
        }
    }
}
