use egui::Color32;

/// Colour used for lemons that do not carry one.
pub const DEFAULT_LEMON_COLOR: &str = "#FFC700";

/// Parses `#RGB`, `#RRGGBB` and `#RRGGBBAA` hex colours. The leading `#` is optional.
pub fn parse_hex_color(color: &str) -> Option<Color32> {
    let hex = color.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();

    match hex.len() {
        3 => {
            let short = |i: usize| channel(i..i + 1).map(|v| v * 17);
            Some(Color32::from_rgb(short(0)?, short(1)?, short(2)?))
        }
        6 => Some(Color32::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        8 => Some(Color32::from_rgba_unmultiplied(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        )),
        _ => None,
    }
}
