//! Non-blocking RGB LED animation engine.
//!
//! Provides [`AnimationEngine`] which owns a single LED and at most one active
//! effect. The host calls [`AnimationEngine::tick`] on every pass of its main
//! loop; the engine only renders a new frame once the active mode's interval
//! has elapsed, and turns itself off when the effect's deadline passes.
//! Also defines the [`RgbLed`] trait for hardware abstraction.

use crate::color::{self, BLACK, BLUE, GREEN, RED, Rgb8, WHITE, YELLOW};
use crate::tables;
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use palette::Srgb;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Trait for abstracting RGB LED hardware.
///
/// Implement this for your LED hardware (GPIO, PWM, SPI, etc.) to allow
/// the engine to control it.
pub trait RgbLed {
    /// Sets the LED to the specified RGB color.
    ///
    /// Higher channel values mean higher intensity. Implementations handle
    /// any polarity inversion (e.g. common anode wiring) and hardware errors
    /// internally - this method cannot fail.
    fn set_color(&mut self, color: Rgb8);
}

/// Visual effects the engine can run.
///
/// Discriminants are the stable numeric indices used on the wire and in
/// [`MODE_TIMING`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AnimationMode {
    /// LED dark, nothing scheduled.
    #[default]
    Off = 0,
    /// Short green acknowledgment flash.
    Ack = 1,
    /// Short red negative-acknowledgment flash.
    Nack = 2,
    /// Police style red/blue alternation.
    RedBlue = 3,
    /// Traffic light red, green, yellow cycle.
    Traffic = 4,
    /// Green brightness fade.
    Matrix = 5,
    /// Hue rotation around the color wheel.
    Rainbow = 6,
    /// Fast red brightness pulse.
    PulseRed = 7,
    /// Fast blue brightness pulse.
    PulseBlue = 8,
    /// White on/off strobe.
    Strobe = 9,
    /// Random red/orange flicker.
    Fire = 10,
    /// Two overlapping blue and cyan waves.
    Ocean = 11,
    /// Four-color sequence with a soft brightness envelope.
    Thinking = 12,
}

impl AnimationMode {
    /// Every mode, ordered by index.
    pub const ALL: [AnimationMode; 13] = [
        AnimationMode::Off,
        AnimationMode::Ack,
        AnimationMode::Nack,
        AnimationMode::RedBlue,
        AnimationMode::Traffic,
        AnimationMode::Matrix,
        AnimationMode::Rainbow,
        AnimationMode::PulseRed,
        AnimationMode::PulseBlue,
        AnimationMode::Strobe,
        AnimationMode::Fire,
        AnimationMode::Ocean,
        AnimationMode::Thinking,
    ];

    /// Maps a numeric index to a mode. Unknown indices map to `Off`.
    pub fn from_index(index: u8) -> Self {
        Self::ALL
            .get(index as usize)
            .copied()
            .unwrap_or(AnimationMode::Off)
    }

    /// Numeric index of this mode.
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Interval and brief-duration entry for this mode.
    #[inline]
    pub const fn timing(self) -> ModeTiming {
        MODE_TIMING[self as usize]
    }

    /// True for modes whose lifetime is fixed internally (Ack/Nack).
    #[inline]
    pub const fn is_brief(self) -> bool {
        self.timing().brief_ms > 0
    }
}

impl From<u8> for AnimationMode {
    fn from(index: u8) -> Self {
        AnimationMode::from_index(index)
    }
}

/// Per-mode timing constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeTiming {
    /// Minimum time between rendered frames.
    pub interval_ms: u16,
    /// Fixed lifetime for brief modes, 0 for caller-controlled modes.
    pub brief_ms: u16,
}

const fn timing(interval_ms: u16, brief_ms: u16) -> ModeTiming {
    ModeTiming {
        interval_ms,
        brief_ms,
    }
}

/// Timing table indexed by [`AnimationMode::index`].
pub const MODE_TIMING: [ModeTiming; 13] = [
    timing(0, 0),     // Off
    timing(100, 300), // Ack
    timing(100, 300), // Nack
    timing(150, 0),   // RedBlue
    timing(800, 0),   // Traffic
    timing(50, 0),    // Matrix
    timing(30, 0),    // Rainbow
    timing(30, 0),    // PulseRed
    timing(30, 0),    // PulseBlue
    timing(100, 0),   // Strobe
    timing(80, 0),    // Fire
    timing(40, 0),    // Ocean
    timing(200, 0),   // Thinking
];

const ACK_COLOR: Rgb8 = Srgb::new(0, 64, 0);
const NACK_COLOR: Rgb8 = Srgb::new(64, 0, 0);

const TRAFFIC_COLORS: [Rgb8; 3] = [RED, GREEN, YELLOW];

const THINKING_COLORS: [Rgb8; 4] = [GREEN, RED, YELLOW, BLUE];
const THINKING_CEILING: u16 = 180;
/// Envelope in tenths of the ceiling: rise, hold, fall.
const THINKING_ENVELOPE: [u16; 3] = [6, 10, 4];

/// Ocean's second wave starts this many table entries ahead of the first.
const OCEAN_PHASE_OFFSET: u8 = 10;
/// Peak of the ocean's green (cyan) channel.
const OCEAN_GREEN_PEAK: u16 = 100;

/// Mutable state of the single active effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationState<I> {
    /// Active mode.
    pub mode: AnimationMode,
    /// Frames rendered since start.
    pub step: u32,
    /// Primary phase index into the lookup tables.
    pub phase: u8,
    /// Secondary phase index (ocean's second wave).
    pub phase_alt: u8,
    /// When the effect was started.
    pub start_time: Option<I>,
    /// Absolute deadline, `None` for no auto-expiry.
    pub end_time: Option<I>,
    /// When the last frame was rendered, `None` before the first frame.
    pub last_update: Option<I>,
}

impl<I> AnimationState<I> {
    const fn off() -> Self {
        Self {
            mode: AnimationMode::Off,
            step: 0,
            phase: 0,
            phase_alt: 0,
            start_time: None,
            end_time: None,
            last_update: None,
        }
    }
}

/// Drives a single RGB LED through the animation catalog.
///
/// Exactly one effect is active at a time. Starting a new effect replaces
/// the previous one immediately; there is no queue and no crossfade.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `L` - LED implementation type
/// * `T` - Time source implementation type
pub struct AnimationEngine<'t, I: TimeInstant, L: RgbLed, T: TimeSource<I>> {
    led: L,
    time_source: &'t T,
    state: AnimationState<I>,
    current_color: Rgb8,
    rng: SmallRng,
}

impl<'t, I: TimeInstant, L: RgbLed, T: TimeSource<I>> AnimationEngine<'t, I, L, T> {
    /// Creates an idle engine and turns the LED off.
    ///
    /// `seed` feeds the fire effect's flicker generator.
    pub fn new(mut led: L, time_source: &'t T, seed: u64) -> Self {
        led.set_color(BLACK);

        Self {
            led,
            time_source,
            state: AnimationState::off(),
            current_color: BLACK,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Starts `mode`, replacing whatever is running.
    ///
    /// Brief modes (Ack/Nack) ignore `duration_secs` and use their fixed
    /// lifetime. Other modes expire after `duration_secs` seconds, or never
    /// when it is zero. Starting `Off` is the same as [`stop`](Self::stop).
    pub fn start(&mut self, mode: AnimationMode, duration_secs: u32) {
        if mode == AnimationMode::Off {
            self.stop();
            return;
        }

        let now = self.time_source.now();
        let timing = mode.timing();

        let run_for_ms = if timing.brief_ms > 0 {
            Some(timing.brief_ms as u64)
        } else if duration_secs > 0 {
            Some(duration_secs as u64 * 1000)
        } else {
            None
        };

        // Falls back to no deadline if the clock type cannot represent it.
        let end_time = run_for_ms.and_then(|ms| {
            let end = now.checked_add(I::Duration::from_millis(ms));
            if end.is_none() {
                warn!("animation deadline overflow, running without expiry");
            }
            end
        });

        let phase_alt = if mode == AnimationMode::Ocean {
            OCEAN_PHASE_OFFSET
        } else {
            0
        };

        self.state = AnimationState {
            mode,
            step: 0,
            phase: 0,
            phase_alt,
            start_time: Some(now),
            end_time,
            last_update: None,
        };

        if !mode.is_brief() {
            info!(
                "LED animation started: mode {}, duration {}s",
                mode.index(),
                duration_secs
            );
        }
    }

    /// Starts a mode by numeric index. Unknown indices turn the LED off.
    pub fn start_index(&mut self, index: u8, duration_secs: u32) {
        self.start(AnimationMode::from_index(index), duration_secs);
    }

    /// Advances the active effect if its interval has elapsed.
    ///
    /// Expiry is checked first against the absolute deadline, so an effect
    /// never outlives its deadline by more than one call.
    pub fn tick(&mut self) {
        if self.state.mode == AnimationMode::Off {
            return;
        }

        let now = self.time_source.now();

        if let Some(end) = self.state.end_time {
            if now >= end {
                debug!("LED animation expired: mode {}", self.state.mode.index());
                self.stop();
                return;
            }
        }

        if let Some(last) = self.state.last_update {
            let interval = self.state.mode.timing().interval_ms as u64;
            if now.duration_since(last).as_millis() < interval {
                return;
            }
        }

        self.state.last_update = Some(now);
        let color = self.render_frame();
        self.apply(color);
    }

    /// Turns the LED off immediately and clears the active effect.
    pub fn stop(&mut self) {
        self.state = AnimationState::off();
        self.led.set_color(BLACK);
        self.current_color = BLACK;
    }

    /// Returns true while an effect is running.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.state.mode != AnimationMode::Off
    }

    /// Returns the active mode.
    #[inline]
    pub fn mode(&self) -> AnimationMode {
        self.state.mode
    }

    /// Returns the color currently shown on the LED.
    #[inline]
    pub fn current_color(&self) -> Rgb8 {
        self.current_color
    }

    /// Returns the active effect's state.
    pub fn state(&self) -> &AnimationState<I> {
        &self.state
    }

    /// Time left until the active effect expires, if it has a deadline.
    pub fn remaining(&self) -> Option<I::Duration> {
        self.state.end_time.map(|end| {
            let now = self.time_source.now();
            if now >= end {
                I::Duration::ZERO
            } else {
                end.duration_since(now)
            }
        })
    }

    /// Returns a reference to the LED.
    pub fn led(&self) -> &L {
        &self.led
    }

    /// Computes the next frame and advances counters.
    fn render_frame(&mut self) -> Rgb8 {
        let state = &mut self.state;
        let step = state.step;
        state.step = state.step.wrapping_add(1);

        match state.mode {
            AnimationMode::Off => BLACK,

            AnimationMode::Ack | AnimationMode::Nack => {
                if step == 0 {
                    if state.mode == AnimationMode::Ack {
                        ACK_COLOR
                    } else {
                        NACK_COLOR
                    }
                } else {
                    // Second frame ends the flash regardless of the deadline
                    state.mode = AnimationMode::Off;
                    state.end_time = None;
                    BLACK
                }
            }

            AnimationMode::RedBlue => {
                if step % 2 == 0 {
                    RED
                } else {
                    BLUE
                }
            }

            AnimationMode::Traffic => TRAFFIC_COLORS[(step % 3) as usize],

            AnimationMode::Matrix => {
                let level = tables::wave(state.phase);
                state.phase = tables::advance(state.phase, 1);
                Srgb::new(0, level, 0)
            }

            AnimationMode::PulseRed => {
                let level = tables::wave(state.phase);
                state.phase = tables::advance(state.phase, 2);
                Srgb::new(level, 0, 0)
            }

            AnimationMode::PulseBlue => {
                let level = tables::wave(state.phase);
                state.phase = tables::advance(state.phase, 2);
                Srgb::new(0, 0, level)
            }

            AnimationMode::Ocean => {
                let blue = tables::wave(state.phase);
                let cyan = (tables::wave(state.phase_alt) as u16 * OCEAN_GREEN_PEAK / 255) as u8;
                state.phase = tables::advance(state.phase, 1);
                // Second wave runs a third faster than the first
                let extra = if step % 3 == 2 { 2 } else { 1 };
                state.phase_alt = tables::advance(state.phase_alt, extra);
                Srgb::new(0, cyan, blue)
            }

            AnimationMode::Rainbow => {
                let hue = tables::rainbow(state.phase);
                state.phase = tables::advance(state.phase, 1);
                hue
            }

            AnimationMode::Strobe => {
                if step % 2 == 0 {
                    WHITE
                } else {
                    BLACK
                }
            }

            AnimationMode::Fire => {
                let red = self.rng.random_range(200..=255u8);
                let green = self.rng.random_range(0..100u8);
                Srgb::new(red, green, 0)
            }

            AnimationMode::Thinking => {
                let base = THINKING_COLORS[((step / 3) % 4) as usize];
                let level = THINKING_CEILING * THINKING_ENVELOPE[(step % 3) as usize] / 10;
                color::scale(base, level, 255)
            }
        }
    }

    /// Writes `color` to the LED if it differs from what is shown.
    fn apply(&mut self, color: Rgb8) {
        if color != self.current_color {
            self.led.set_color(color);
            self.current_color = color;
        }
    }
}
