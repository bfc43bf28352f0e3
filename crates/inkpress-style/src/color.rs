//! RGB colors and the grayscale downgrade used for e-ink panels.

use crate::error::ThemeError;

/// Output color capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorProfile {
    /// Full 24-bit color.
    #[default]
    TrueColor,
    /// `levels` evenly spaced grays from black to white.
    Grayscale(u8),
}

impl ColorProfile {
    /// The 16-level grayscale of current e-ink panels.
    pub const EINK: Self = Self::Grayscale(16);

    /// Profile for a level count, where 0 means full color. Fewer than two
    /// levels is raised to two (black and white).
    #[must_use]
    pub const fn from_levels(levels: u8) -> Self {
        match levels {
            0 => Self::TrueColor,
            1 => Self::Grayscale(2),
            n => Self::Grayscale(n),
        }
    }

    #[must_use]
    pub const fn is_grayscale(self) -> bool {
        matches!(self, Self::Grayscale(_))
    }
}

/// RGB color (opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// A neutral gray.
    #[must_use]
    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level)
    }

    /// Parse `#rrggbb` or `#rgb` (the `#` is optional).
    pub fn from_hex(value: &str) -> Result<Self, ThemeError> {
        let invalid = || ThemeError::InvalidColor(value.to_string());
        let hex = value.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let r = channel(&hex[0..1])?;
                let g = channel(&hex[1..2])?;
                let b = channel(&hex[2..3])?;
                Ok(Self::new(r * 17, g * 17, b * 17))
            }
            _ => Err(invalid()),
        }
    }

    /// `#rrggbb`, lowercase.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Perceived luminance (BT.709) as a `u8` (0 = black, 255 = white).
    #[must_use]
    pub fn luminance_u8(self) -> u8 {
        let r = self.r as u32;
        let g = self.g as u32;
        let b = self.b as u32;
        let luma = 2126 * r + 7152 * g + 722 * b;
        ((luma + 5000) / 10_000) as u8
    }

    /// Map into `profile`. Grayscale profiles snap the luminance to the
    /// nearest available gray level.
    #[must_use]
    pub fn downgrade(self, profile: ColorProfile) -> Self {
        match profile {
            ColorProfile::TrueColor => self,
            ColorProfile::Grayscale(levels) => {
                let steps = u32::from(levels.max(2)) - 1;
                let luma = u32::from(self.luminance_u8());
                let index = (luma * steps + 127) / 255;
                Self::gray(((index * 255 + steps / 2) / steps) as u8)
            }
        }
    }
}

impl std::str::FromStr for Rgb {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let c = Rgb::from_hex("#1e2a3B").unwrap();
        assert_eq!(c, Rgb::new(0x1e, 0x2a, 0x3b));
        assert_eq!(c.to_hex(), "#1e2a3b");
        assert_eq!(Rgb::from_hex("fff").unwrap(), Rgb::WHITE);
        assert_eq!("#000".parse::<Rgb>().unwrap(), Rgb::BLACK);
    }

    #[test]
    fn hex_rejects_garbage() {
        for bad in ["", "#12", "#12345g", "#1234567", "#ééé"] {
            assert_eq!(
                Rgb::from_hex(bad),
                Err(ThemeError::InvalidColor(bad.to_string())),
                "{bad}"
            );
        }
    }

    #[test]
    fn luminance_extremes() {
        assert_eq!(Rgb::BLACK.luminance_u8(), 0);
        assert_eq!(Rgb::WHITE.luminance_u8(), 255);
        assert!(Rgb::new(0, 255, 0).luminance_u8() > Rgb::new(0, 0, 255).luminance_u8());
    }

    #[test]
    fn truecolor_is_identity() {
        let c = Rgb::new(12, 200, 99);
        assert_eq!(c.downgrade(ColorProfile::TrueColor), c);
    }

    #[test]
    fn two_levels_is_black_and_white() {
        let profile = ColorProfile::Grayscale(2);
        assert_eq!(Rgb::new(30, 30, 30).downgrade(profile), Rgb::BLACK);
        assert_eq!(Rgb::new(220, 220, 220).downgrade(profile), Rgb::WHITE);
    }

    #[test]
    fn sixteen_levels_are_multiples_of_17() {
        let c = Rgb::new(100, 150, 200).downgrade(ColorProfile::EINK);
        assert_eq!(c.r, c.g);
        assert_eq!(c.g, c.b);
        assert_eq!(c.r % 17, 0);
    }

    #[test]
    fn from_levels() {
        assert_eq!(ColorProfile::from_levels(0), ColorProfile::TrueColor);
        assert_eq!(ColorProfile::from_levels(1), ColorProfile::Grayscale(2));
        assert_eq!(ColorProfile::from_levels(16), ColorProfile::EINK);
        assert!(ColorProfile::EINK.is_grayscale());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn downgrade_lands_on_a_level(r: u8, g: u8, b: u8, levels in 2u8..=64) {
            let gray = Rgb::new(r, g, b).downgrade(ColorProfile::Grayscale(levels));
            prop_assert_eq!(gray.r, gray.g);
            prop_assert_eq!(gray.g, gray.b);
            let steps = u32::from(levels) - 1;
            let on_level = (0..=steps).any(|i| ((i * 255 + steps / 2) / steps) as u8 == gray.r);
            prop_assert!(on_level);
        }

        #[test]
        fn downgrade_is_idempotent(r: u8, g: u8, b: u8, levels in 2u8..=32) {
            let profile = ColorProfile::Grayscale(levels);
            let once = Rgb::new(r, g, b).downgrade(profile);
            prop_assert_eq!(once.downgrade(profile), once);
        }
    }
}
