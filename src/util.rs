use anyhow::{Result, bail};
use eframe::egui::Color32;

pub fn parse_hex_color(value: &str) -> Result<Color32> {
    let digits = value.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        bail!("invalid hex color {value:?}, expected #rrggbb");
    }

    let channel =
        |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).unwrap_or_default();

    Ok(Color32::from_rgb(channel(0..2), channel(2..4), channel(4..6)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!(
            parse_hex_color("#5aa2ff").unwrap(),
            Color32::from_rgb(0x5a, 0xa2, 0xff)
        );
        assert_eq!(
            parse_hex_color("ff8a5c").unwrap(),
            Color32::from_rgb(0xff, 0x8a, 0x5c)
        );
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(parse_hex_color("#12345").is_err());
        assert!(parse_hex_color("#12345g").is_err());
        assert!(parse_hex_color("").is_err());
    }
}
