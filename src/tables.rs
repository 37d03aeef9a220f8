//! Precomputed lookup tables for the periodic effects.
//!
//! Both tables are indexed by a phase counter that wraps at [`PHASE_STEPS`],
//! so no trigonometry runs while animating.

use crate::color::Rgb8;
use palette::Srgb;

/// Number of entries in one full cycle of each table.
pub const PHASE_STEPS: u8 = 64;

const PHASE_MASK: u8 = PHASE_STEPS - 1;

/// One raised-cosine brightness cycle: 0 at index 0, 255 at index 32.
pub static WAVEFORM: [u8; 64] = [
    0, 1, 2, 5, 10, 15, 21, 29, 37, 47, 57, 67, 79, 90, 103, 115, //
    128, 140, 152, 165, 176, 188, 198, 208, 218, 226, 234, 240, 245, 250, 253, 254, //
    255, 254, 253, 250, 245, 240, 234, 226, 218, 208, 198, 188, 176, 165, 152, 140, //
    128, 115, 103, 90, 79, 67, 57, 47, 37, 29, 21, 15, 10, 5, 2, 1,
];

/// Full hue circle at 5.625 degrees per entry, starting at red.
pub static RAINBOW: [Rgb8; 64] = [
    Srgb::new(255, 0, 0),
    Srgb::new(255, 24, 0),
    Srgb::new(255, 48, 0),
    Srgb::new(255, 72, 0),
    Srgb::new(255, 96, 0),
    Srgb::new(255, 120, 0),
    Srgb::new(255, 143, 0),
    Srgb::new(255, 167, 0),
    Srgb::new(255, 191, 0),
    Srgb::new(255, 215, 0),
    Srgb::new(255, 239, 0),
    Srgb::new(247, 255, 0),
    Srgb::new(223, 255, 0),
    Srgb::new(199, 255, 0),
    Srgb::new(175, 255, 0),
    Srgb::new(151, 255, 0),
    Srgb::new(128, 255, 0),
    Srgb::new(104, 255, 0),
    Srgb::new(80, 255, 0),
    Srgb::new(56, 255, 0),
    Srgb::new(32, 255, 0),
    Srgb::new(8, 255, 0),
    Srgb::new(0, 255, 16),
    Srgb::new(0, 255, 40),
    Srgb::new(0, 255, 64),
    Srgb::new(0, 255, 88),
    Srgb::new(0, 255, 112),
    Srgb::new(0, 255, 135),
    Srgb::new(0, 255, 159),
    Srgb::new(0, 255, 183),
    Srgb::new(0, 255, 207),
    Srgb::new(0, 255, 231),
    Srgb::new(0, 255, 255),
    Srgb::new(0, 231, 255),
    Srgb::new(0, 207, 255),
    Srgb::new(0, 183, 255),
    Srgb::new(0, 159, 255),
    Srgb::new(0, 135, 255),
    Srgb::new(0, 112, 255),
    Srgb::new(0, 88, 255),
    Srgb::new(0, 64, 255),
    Srgb::new(0, 40, 255),
    Srgb::new(0, 16, 255),
    Srgb::new(8, 0, 255),
    Srgb::new(32, 0, 255),
    Srgb::new(56, 0, 255),
    Srgb::new(80, 0, 255),
    Srgb::new(104, 0, 255),
    Srgb::new(128, 0, 255),
    Srgb::new(151, 0, 255),
    Srgb::new(175, 0, 255),
    Srgb::new(199, 0, 255),
    Srgb::new(223, 0, 255),
    Srgb::new(247, 0, 255),
    Srgb::new(255, 0, 239),
    Srgb::new(255, 0, 215),
    Srgb::new(255, 0, 191),
    Srgb::new(255, 0, 167),
    Srgb::new(255, 0, 143),
    Srgb::new(255, 0, 120),
    Srgb::new(255, 0, 96),
    Srgb::new(255, 0, 72),
    Srgb::new(255, 0, 48),
    Srgb::new(255, 0, 24),
];

/// Samples the brightness waveform at a wrapping phase index.
#[inline]
pub fn wave(phase: u8) -> u8 {
    WAVEFORM[(phase & PHASE_MASK) as usize]
}

/// Samples the hue palette at a wrapping phase index.
#[inline]
pub fn rainbow(phase: u8) -> Rgb8 {
    RAINBOW[(phase & PHASE_MASK) as usize]
}

/// Advances a phase index, wrapping at [`PHASE_STEPS`].
#[inline]
pub fn advance(phase: u8, by: u8) -> u8 {
    phase.wrapping_add(by) & PHASE_MASK
}
