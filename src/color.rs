/// Display color of a body. Has no physical effect.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parses `#rrggbb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// `#rrggbb`, alpha dropped.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Spawn palette used when the configuration does not override it.
pub const DEFAULT_PALETTE: [&str; 14] = [
    "#dc8a78", "#dd7878", "#ea76cb", "#8839ef", "#d20f39", "#e64553", "#fe640b",
    "#df8e1d", "#40a02b", "#179299", "#04a5e5", "#209fb5", "#1e66f5", "#7287fd",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_palette_entries() {
        assert_eq!(Color::from_hex("#dc8a78"), Some(Color::rgb(0xdc, 0x8a, 0x78)));
        assert_eq!(Color::from_hex("7287FD"), Some(Color::rgb(0x72, 0x87, 0xfd)));
        assert!(DEFAULT_PALETTE.iter().all(|hex| Color::from_hex(hex).is_some()));
    }

    #[test]
    fn rejects_malformed_hex() {
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#gg0000"), None);
        assert_eq!(Color::from_hex("#ééé"), None);
        assert_eq!(Color::from_hex("#+f+f+f"), None);
        assert_eq!(Color::from_hex("-1-1-1"), None);
    }

    #[test]
    fn hex_round_trip_drops_alpha() {
        assert_eq!(Color::rgb(4, 165, 229).to_hex(), "#04a5e5");
    }
}
