//! Light/dark color tables and the mode resolver.

use std::fmt;

/// 8-bit sRGB color with a floating alpha channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Same channels, replaced alpha (clamped to `[0, 1]`).
    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Multiplies the existing alpha, like `globalAlpha` does on a canvas.
    pub fn fade(self, factor: f64) -> Self {
        self.with_alpha(self.a * factor)
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            // Three decimals are plenty for an 8-bit canvas.
            let a = (self.a * 1000.0).round() / 1000.0;
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, a)
        }
    }
}

/// Page color mode, read from the document's `data-theme` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Dark,
    Light,
}

impl ColorMode {
    /// Anything other than exactly `"light"` resolves to dark.
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some("light") => ColorMode::Light,
            _ => ColorMode::Dark,
        }
    }
}

/// Semantic color roles consumed by the scenes' draw steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub state: Rgba,
    pub state_dim: Rgba,
    pub state_glow: Rgba,
    pub reward: Rgba,
    pub reward_dim: Rgba,
    pub value: Rgba,
    pub value_dim: Rgba,
    pub action: Rgba,
    pub action_dim: Rgba,
    pub grid: Rgba,
    pub text: Rgba,
    pub line: Rgba,
    pub formula: Rgba,
    pub contour: Rgba,
    pub muted: Rgba,
    pub background: Rgba,
}

pub static DARK: Palette = Palette {
    state: Rgba::opaque(0x00, 0xd4, 0xff),
    state_dim: Rgba::new(0, 212, 255, 0.15),
    state_glow: Rgba::new(0, 212, 255, 0.3),
    reward: Rgba::opaque(0xff, 0xb8, 0x00),
    reward_dim: Rgba::new(255, 184, 0, 0.12),
    value: Rgba::opaque(0xa8, 0x55, 0xf7),
    value_dim: Rgba::new(168, 85, 247, 0.15),
    action: Rgba::opaque(0x10, 0xb9, 0x81),
    action_dim: Rgba::new(16, 185, 129, 0.15),
    grid: Rgba::new(30, 42, 58, 0.4),
    text: Rgba::new(230, 237, 243, 0.06),
    line: Rgba::new(0, 212, 255, 0.08),
    formula: Rgba::new(230, 237, 243, 0.12),
    contour: Rgba::new(168, 85, 247, 0.3),
    muted: Rgba::opaque(0x6e, 0x76, 0x81),
    background: Rgba::opaque(0x0a, 0x0e, 0x14),
};

pub static LIGHT: Palette = Palette {
    state: Rgba::opaque(0x00, 0x96, 0xc8),
    state_dim: Rgba::new(0, 150, 200, 0.1),
    state_glow: Rgba::new(0, 150, 200, 0.25),
    reward: Rgba::opaque(0xd9, 0x77, 0x06),
    reward_dim: Rgba::new(217, 119, 6, 0.08),
    value: Rgba::opaque(0x7c, 0x3a, 0xed),
    value_dim: Rgba::new(124, 58, 237, 0.1),
    action: Rgba::opaque(0x05, 0x96, 0x69),
    action_dim: Rgba::new(5, 150, 105, 0.1),
    grid: Rgba::new(209, 217, 224, 0.5),
    text: Rgba::new(26, 31, 38, 0.04),
    line: Rgba::new(0, 150, 200, 0.06),
    formula: Rgba::new(26, 31, 38, 0.08),
    contour: Rgba::new(124, 58, 237, 0.2),
    muted: Rgba::opaque(0x8c, 0x95, 0x9f),
    background: Rgba::opaque(0xfa, 0xfb, 0xfc),
};

impl Palette {
    pub fn resolve(mode: ColorMode) -> &'static Palette {
        match mode {
            ColorMode::Dark => &DARK,
            ColorMode::Light => &LIGHT,
        }
    }

    /// Every role, in declaration order.
    pub fn roles(&self) -> [Rgba; 16] {
        [
            self.state,
            self.state_dim,
            self.state_glow,
            self.reward,
            self.reward_dim,
            self.value,
            self.value_dim,
            self.action,
            self.action_dim,
            self.grid,
            self.text,
            self.line,
            self.formula,
            self.contour,
            self.muted,
            self.background,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_modes_fall_back_to_dark() {
        assert_eq!(ColorMode::from_attribute(None), ColorMode::Dark);
        assert_eq!(ColorMode::from_attribute(Some("")), ColorMode::Dark);
        assert_eq!(ColorMode::from_attribute(Some("solarized")), ColorMode::Dark);
        assert_eq!(ColorMode::from_attribute(Some("Light")), ColorMode::Dark);
        assert_eq!(ColorMode::from_attribute(Some("dark")), ColorMode::Dark);
        assert_eq!(ColorMode::from_attribute(Some("light")), ColorMode::Light);
    }

    #[test]
    fn tables_are_distinct_and_populated() {
        let dark = Palette::resolve(ColorMode::Dark);
        let light = Palette::resolve(ColorMode::Light);
        assert_ne!(dark, light);
        for role in dark.roles().iter().chain(light.roles().iter()) {
            assert!(role.a > 0.0 && role.a <= 1.0, "{role:?}");
        }
        assert_eq!(dark.background, Rgba::opaque(10, 14, 20));
    }

    #[test]
    fn css_serialization() {
        assert_eq!(DARK.state.to_string(), "#00d4ff");
        assert_eq!(DARK.state_dim.to_string(), "rgba(0, 212, 255, 0.15)");
        assert_eq!(DARK.reward.with_alpha(0.5).to_string(), "rgba(255, 184, 0, 0.5)");
        assert_eq!(LIGHT.formula.fade(0.5).to_string(), "rgba(26, 31, 38, 0.04)");
        assert_eq!(Rgba::TRANSPARENT.to_string(), "rgba(0, 0, 0, 0)");
    }
}
