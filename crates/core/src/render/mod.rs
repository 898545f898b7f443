//! Interactive chart renderers and the drawing primitives they share.

pub mod animation;
pub mod canvas;
pub mod donut;
pub mod format;
pub mod line;

use tracing::warn;

use crate::models::settings::DEFAULT_PALETTE;
use canvas::Color;

/// Parse a `#RRGGBB` palette, dropping entries that do not parse.
///
/// Falls back to the default palette when nothing usable remains.
pub fn parse_palette(hex_colors: &[String]) -> Vec<Color> {
    let parsed: Vec<Color> = hex_colors
        .iter()
        .filter_map(|hex| {
            let color = Color::from_hex(hex);
            if color.is_none() {
                warn!(color = %hex, "Ignoring unparsable palette colour");
            }
            color
        })
        .collect();
    if !parsed.is_empty() {
        return parsed;
    }
    DEFAULT_PALETTE
        .iter()
        .filter_map(|hex| Color::from_hex(hex))
        .collect()
}
