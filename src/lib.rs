#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`AnimationEngine`**: Runs one RGB LED effect at a time from a fixed catalog, time-gated and auto-expiring
//! - **`AnimationMode`**: The thirteen effects, with per-mode timing in `MODE_TIMING`
//! - **`CommandRouter`**: Routes `DISP:` lines to the display and `LED:` lines to the engine
//! - **`SignalClassifier`**: Filters noise and repeats from decoded IR frames and prints them
//! - **`Controller`**: Composes the three into one cooperative poll pass
//! - **`RgbLed`**, **`TextDisplay`**, **`IrDecoder`**: Traits to implement for your hardware
//! - **`TimeSource`**: Trait to implement for your timing system
//! - **`Config`**: Output mode and diagnostic options
//!
//! Colors are `Srgb<u8>` where a higher value means a higher intensity. When
//! implementing `RgbLed` for your hardware, convert these values to your
//! device's native format (e.g., inverted PWM duty for common anode LEDs).

#[macro_use]
mod fmt;

pub mod animation;
pub mod color;
pub mod command;
pub mod controller;
pub mod display;
pub mod signal;
pub mod tables;
pub mod time;
pub mod types;

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

pub use animation::{AnimationEngine, AnimationMode, AnimationState, MODE_TIMING, ModeTiming, RgbLed};
pub use color::{BLACK, BLUE, GREEN, RED, Rgb8, WHITE, YELLOW};
pub use command::{CommandRouter, LED_COMMANDS, LedCommandSpec, LineBuffer, LineEvent, RouteOutcome};
pub use controller::{Controller, PollReport};
pub use display::{DisplayCommand, TextDisplay};
pub use signal::{
    ClassifiedSignal, Emission, IrDecoder, IrSignalEvent, SignalClassifier, Statistics, format_hex,
    map_protocol_name,
};
pub use time::{TimeDuration, TimeInstant, TimeSource};
pub use types::{CommandError, Config, OutputMode, SignalCondition};
