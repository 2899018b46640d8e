//! Deterministic per-name colors.
//!
//! Every bot gets a hue derived from its name alone, so the same bot keeps
//! the same color across rounds, reconnects and restarts without the arena
//! ever sending color information. Saturation and lightness are fixed.
//!
//! The hash folds UTF-16 code units with `acc = unit + ((acc << 5) - acc)`,
//! where the shift works on the 32-bit truncation of the accumulator. This
//! is exactly what a browser computes for the same expression, so a bot
//! rendered here matches its color in the web dashboard.

/// Fixed saturation, in percent.
pub const SATURATION: u8 = 70;

/// Fixed lightness, in percent.
pub const LIGHTNESS: u8 = 50;

/// Number of distinct hues.
const HUE_RANGE: u64 = 360;

/// A color in HSL space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hsl {
    /// Hue in degrees, `0..360`.
    pub hue: u16,
    /// Saturation in percent.
    pub saturation: u8,
    /// Lightness in percent.
    pub lightness: u8,
}

/// A color in 8-bit RGB space, for outputs that cannot take HSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

/// Stable color for a bot name.
///
/// Pure: no state, no failure. The empty string maps to hue 0.
pub fn color_of(name: &str) -> Hsl {
    let hue = hash_name(name).unsigned_abs() % HUE_RANGE;
    Hsl {
        hue: u16::try_from(hue).unwrap_or(0),
        saturation: SATURATION,
        lightness: LIGHTNESS,
    }
}

/// Fold a name into the hash accumulator.
pub fn hash_name(name: &str) -> i64 {
    name.encode_utf16().fold(0_i64, |acc, unit| {
        #[allow(clippy::cast_possible_truncation)]
        let shifted = i64::from((acc as i32).wrapping_shl(5));
        i64::from(unit).wrapping_add(shifted.wrapping_sub(acc))
    })
}

impl Hsl {
    /// Convert to RGB.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::arithmetic_side_effects
    )]
    pub fn to_rgb(self) -> Rgb {
        let h = f64::from(self.hue % 360) / 60.0;
        let s = f64::from(self.saturation.min(100)) / 100.0;
        let l = f64::from(self.lightness.min(100)) / 100.0;

        let chroma = (1.0 - 2.0_f64.mul_add(l, -1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let m = l - chroma / 2.0;

        let (r, g, b) = match h {
            h if h < 1.0 => (chroma, x, 0.0),
            h if h < 2.0 => (x, chroma, 0.0),
            h if h < 3.0 => (0.0, chroma, x),
            h if h < 4.0 => (0.0, x, chroma),
            h if h < 5.0 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };

        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgb {
            r: channel(r),
            g: channel(g),
            b: channel(b),
        }
    }
}

impl core::fmt::Display for Hsl {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.hue, self.saturation, self.lightness)
    }
}

impl core::fmt::Display for Rgb {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
