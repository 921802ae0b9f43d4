use bon::Builder;

/// RGB color used for every element of the clock face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    pub const GRAY: Color = Color::new(0x80, 0x80, 0x80);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Linear mix from `self` (t = 0) to `other` (t = 1).
    pub fn mix(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| (a as f64 * (1.0 - t) + b as f64 * t).round() as u8;
        Color::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }

    /// Parses the color encodings accepted in a section document.
    ///
    /// Supports `#rgb`, `#rrggbb`, `#rrggbbaa` (alpha is dropped) and a handful
    /// of CSS color names. Returns `None` for anything else.
    pub fn parse(text: &str) -> Option<Color> {
        let text = text.trim();
        if let Some(hex) = text.strip_prefix('#') {
            return parse_hex(hex);
        }
        let named = match text.to_ascii_lowercase().as_str() {
            "black" => Color::BLACK,
            "white" => Color::WHITE,
            "gray" | "grey" => Color::GRAY,
            "red" => Color::new(0xff, 0x00, 0x00),
            "green" => Color::new(0x00, 0x80, 0x00),
            "blue" => Color::new(0x00, 0x00, 0xff),
            "orange" => Color::new(0xff, 0xa5, 0x00),
            "yellow" => Color::new(0xff, 0xff, 0x00),
            "purple" => Color::new(0x80, 0x00, 0x80),
            "teal" => Color::new(0x00, 0x80, 0x80),
            "navy" => Color::new(0x00, 0x00, 0x80),
            _ => return None,
        };
        Some(named)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            // #abc expands to #aabbcc
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 0x11);
            Some(Color::new(expand(0)?, expand(1)?, expand(2)?))
        }
        6 | 8 => Some(Color::new(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => None,
    }
}

/// Configuration for the clock window and dial appearance
#[derive(Builder, Debug, Clone)]
pub struct ClockConfig {
    #[builder(default = "Day Clock".to_string())]
    pub title: String,

    // Window
    #[builder(default = 800)]
    pub window_width: usize,
    #[builder(default = 800)]
    pub window_height: usize,
    #[builder(default = true)]
    pub resizable: bool,
    #[builder(default = 60.0)]
    pub max_framerate: f64,

    // Dial
    #[builder(default = 0.9)]
    pub radius_factor: f64,
    #[builder(default = 1.05)]
    pub active_scale: f64,
    #[builder(default = 0.5)]
    pub inactive_alpha: f32,
    #[builder(default = 4.0)]
    pub active_outline_width: f32,
    #[builder(default = Color::WHITE)]
    pub active_outline_color: Color,
    /// Minutes either side of each section boundary over which the two
    /// colors fade into each other. 0 keeps hard edges.
    #[builder(default = 0.0)]
    pub boundary_blend_minutes: f64,

    // Pointer, sized relative to the dial radius
    #[builder(default = Color::WHITE)]
    pub pointer_color: Color,
    #[builder(default = 0.1)]
    pub pointer_head_factor: f64,
    #[builder(default = 0.05)]
    pub pointer_width_factor: f64,

    // Colors
    #[builder(default = Color::new(0x11, 0x11, 0x11))]
    pub background_color: Color,
    #[builder(default = Color::GRAY)]
    pub fallback_section_color: Color,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(Color::parse("#1f2d3d"), Some(Color::new(0x1f, 0x2d, 0x3d)));
        assert_eq!(Color::parse("#fff"), Some(Color::WHITE));
        assert_eq!(Color::parse("#2E8B57ff"), Some(Color::new(0x2e, 0x8b, 0x57)));
    }

    #[test]
    fn parses_named_colors_case_insensitively() {
        assert_eq!(Color::parse("Navy"), Some(Color::new(0x00, 0x00, 0x80)));
        assert_eq!(Color::parse(" grey "), Some(Color::GRAY));
    }

    #[test]
    fn rejects_unknown_encodings() {
        assert_eq!(Color::parse(""), None);
        assert_eq!(Color::parse("#12345"), None);
        assert_eq!(Color::parse("#gggggg"), None);
        assert_eq!(Color::parse("rgb(1,2,3)"), None);
    }

    #[test]
    fn mix_interpolates_each_channel() {
        let red = Color::new(0xff, 0x00, 0x00);
        let blue = Color::new(0x00, 0x00, 0xff);
        assert_eq!(red.mix(blue, 0.0), red);
        assert_eq!(red.mix(blue, 1.0), blue);
        assert_eq!(red.mix(blue, 0.5), Color::new(0x80, 0x00, 0x80));
        assert_eq!(red.mix(blue, 7.0), blue);
    }

    #[test]
    fn builder_defaults_match_default() {
        let config = ClockConfig::builder().active_scale(1.2).build();
        assert_eq!(config.active_scale, 1.2);
        assert_eq!(config.radius_factor, ClockConfig::default().radius_factor);
        assert_eq!(config.background_color, Color::new(0x11, 0x11, 0x11));
        assert_eq!(config.boundary_blend_minutes, 0.0);
    }
}
