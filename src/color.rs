//! Color helpers for the 8-bit RGB output contract.
//!
//! All animation output is expressed as [`Rgb8`] where a higher channel value
//! means a higher intensity. Polarity and PWM conversion belong to the
//! [`RgbLed`](crate::animation::RgbLed) implementation.

use palette::{FromColor, Hsv, Srgb};

/// 8-bit RGB color handed to the LED driver.
pub type Rgb8 = Srgb<u8>;

pub const BLACK: Rgb8 = Srgb::new(0, 0, 0);
pub const RED: Rgb8 = Srgb::new(255, 0, 0);
pub const GREEN: Rgb8 = Srgb::new(0, 255, 0);
pub const BLUE: Rgb8 = Srgb::new(0, 0, 255);
pub const YELLOW: Rgb8 = Srgb::new(255, 255, 0);
pub const WHITE: Rgb8 = Srgb::new(255, 255, 255);

/// Scales every channel by `numerator / denominator` using integer math.
///
/// A zero denominator yields black.
#[inline]
pub fn scale(color: Rgb8, numerator: u16, denominator: u16) -> Rgb8 {
    if denominator == 0 {
        return BLACK;
    }
    let channel = |c: u8| -> u8 {
        let scaled = (c as u32 * numerator as u32) / denominator as u32;
        scaled.min(255) as u8
    };
    Srgb::new(channel(color.red), channel(color.green), channel(color.blue))
}

/// Fully saturated, full value color for a hue in degrees.
///
/// Uses floating point HSV conversion, so it is kept off the animation tick
/// path; the rainbow effect reads a precomputed palette instead.
#[inline]
pub fn hue(degrees: f32) -> Rgb8 {
    let hsv = Hsv::new(degrees, 1.0, 1.0);
    Srgb::from_color(hsv).into_format::<u8>()
}
