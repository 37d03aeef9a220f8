//! Text command routing.
//!
//! One input line maps to exactly one [`RouteOutcome`]. The display
//! collaborator gets the first look at every line; `LED:` lines are matched
//! against the static [`LED_COMMANDS`] catalog and dispatched to the
//! [`AnimationEngine`].

use crate::animation::{AnimationEngine, AnimationMode, RgbLed};
use crate::display::TextDisplay;
use crate::time::{TimeInstant, TimeSource};
use crate::types::CommandError;
use core::fmt::Write;
use heapless::String;

/// Prefix of the LED namespace. Case-sensitive.
pub const LED_PREFIX: &str = "LED:";

/// Default maximum input line length.
pub const LINE_CAPACITY: usize = 64;

/// One entry of the LED command catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedCommandSpec {
    /// Command word after `LED:`, matched literally.
    pub name: &'static str,
    /// Mode to start.
    pub mode: AnimationMode,
    /// Whether a `<seconds>` argument must follow.
    pub requires_duration: bool,
    /// Help line text.
    pub help: &'static str,
    /// Listed in the short help outside diagnostic mode.
    pub in_basic_help: bool,
}

const fn led(
    name: &'static str,
    mode: AnimationMode,
    requires_duration: bool,
    help: &'static str,
) -> LedCommandSpec {
    LedCommandSpec {
        name,
        mode,
        requires_duration,
        help,
        in_basic_help: true,
    }
}

const fn hidden(spec: LedCommandSpec) -> LedCommandSpec {
    LedCommandSpec {
        in_basic_help: false,
        ..spec
    }
}

/// The LED command catalog.
pub static LED_COMMANDS: [LedCommandSpec; 13] = [
    led("off", AnimationMode::Off, false, "Turn off LED"),
    led("ack", AnimationMode::Ack, false, "Quick green acknowledgment flash"),
    hidden(led("nack", AnimationMode::Nack, false, "Quick red acknowledgment flash")),
    led("red-blue", AnimationMode::RedBlue, true, "Police style red/blue"),
    led("red-green-yellow", AnimationMode::Traffic, true, "Traffic light cycle"),
    led("matrix", AnimationMode::Matrix, true, "Green Matrix fade"),
    led("rainbow", AnimationMode::Rainbow, true, "Rainbow hue shift"),
    led("pulse-red", AnimationMode::PulseRed, true, "Red pulsing"),
    led("pulse-blue", AnimationMode::PulseBlue, true, "Blue pulsing"),
    led("strobe", AnimationMode::Strobe, true, "White strobe"),
    led("fire", AnimationMode::Fire, true, "Fire flicker"),
    led("ocean", AnimationMode::Ocean, true, "Ocean waves"),
    led("thinking", AnimationMode::Thinking, true, "Simon-like thinking sequence"),
];

/// Result of routing one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RouteOutcome {
    /// The display claimed the line.
    DisplayHandled,

    /// An LED command was applied.
    LedHandled(AnimationMode),

    /// An LED command was recognized but its duration was missing or not
    /// positive. The animation was left untouched.
    LedRejectedInvalidArgument {
        /// Catalog name of the rejected command.
        command: &'static str,
    },

    /// Nothing matched. `led_prefix` is true when the line started with
    /// `LED:`, which warrants showing the LED help.
    Unrecognized { led_prefix: bool },
}

impl RouteOutcome {
    /// The error this outcome represents, if any.
    pub fn error(&self) -> Option<CommandError> {
        match *self {
            RouteOutcome::DisplayHandled | RouteOutcome::LedHandled(_) => None,
            RouteOutcome::LedRejectedInvalidArgument { command } => {
                Some(CommandError::InvalidArgument { command })
            }
            RouteOutcome::Unrecognized { .. } => Some(CommandError::UnrecognizedCommand),
        }
    }
}

/// Stateless dispatcher between the display and the animation engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRouter;

impl CommandRouter {
    pub const fn new() -> Self {
        CommandRouter
    }

    /// Routes one input line.
    ///
    /// Never blocks and never recurses. The display sees the trimmed line
    /// first; only lines it declines are tested for the `LED:` prefix.
    pub fn route<'t, I, L, T, D>(
        &self,
        line: &str,
        display: &mut D,
        engine: &mut AnimationEngine<'t, I, L, T>,
    ) -> RouteOutcome
    where
        I: TimeInstant,
        L: RgbLed,
        T: TimeSource<I>,
        D: TextDisplay,
    {
        let line = line.trim();

        if display.try_handle(line) {
            return RouteOutcome::DisplayHandled;
        }

        let Some(param) = line.strip_prefix(LED_PREFIX) else {
            debug!("unrecognized command");
            return RouteOutcome::Unrecognized { led_prefix: false };
        };

        match match_led(param) {
            Some(LedMatch::Simple(spec)) => {
                match spec.mode {
                    AnimationMode::Off => engine.stop(),
                    mode => engine.start(mode, 0),
                }
                RouteOutcome::LedHandled(spec.mode)
            }
            Some(LedMatch::Timed(spec, seconds)) => match u32::try_from(seconds) {
                Ok(seconds) if seconds > 0 => {
                    engine.start(spec.mode, seconds);
                    RouteOutcome::LedHandled(spec.mode)
                }
                _ => {
                    debug!("invalid duration {} for {}", seconds, spec.name);
                    RouteOutcome::LedRejectedInvalidArgument { command: spec.name }
                }
            },
            None => {
                debug!("unknown LED command");
                RouteOutcome::Unrecognized { led_prefix: true }
            }
        }
    }
}

enum LedMatch {
    Simple(&'static LedCommandSpec),
    Timed(&'static LedCommandSpec, i32),
}

/// Finds the catalog entry for the text after `LED:`.
fn match_led(param: &str) -> Option<LedMatch> {
    LED_COMMANDS.iter().find_map(|spec| {
        if spec.requires_duration {
            let rest = param.strip_prefix(spec.name)?.strip_prefix(' ')?;
            Some(LedMatch::Timed(spec, parse_leading_int(rest)))
        } else if param == spec.name {
            Some(LedMatch::Simple(spec))
        } else {
            None
        }
    })
}

/// Parses the leading integer of `text`, lenient like a serial console.
///
/// Leading whitespace is skipped, an optional sign is accepted, and parsing
/// stops at the first non-digit. Text without digits yields 0. Values
/// saturate at the `i32` bounds.
pub fn parse_leading_int(text: &str) -> i32 {
    let mut bytes = text.trim_start().bytes().peekable();

    let negative = match bytes.peek() {
        Some(b'-') => {
            bytes.next();
            true
        }
        Some(b'+') => {
            bytes.next();
            false
        }
        _ => false,
    };

    let mut value: i32 = 0;
    for b in bytes {
        if !b.is_ascii_digit() {
            break;
        }
        let digit = (b - b'0') as i32;
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}

/// Writes the LED command help block, generated from the catalog.
///
/// The diagnostic variant has a heading and lists every command; the basic
/// variant skips entries not marked `in_basic_help`.
pub fn write_led_help<W: Write>(out: &mut W, diagnostic: bool) -> core::fmt::Result {
    if diagnostic {
        writeln!(out, "LED commands:")?;
    }
    for spec in LED_COMMANDS.iter().filter(|spec| diagnostic || spec.in_basic_help) {
        let mut usage: String<32> = String::new();
        // Longest name plus suffix fits comfortably
        let _ = write!(usage, "{}{}", LED_PREFIX, spec.name);
        if spec.requires_duration {
            let _ = usage.push_str(" <sec>");
        }
        writeln!(out, "  {:<27}- {}", usage.as_str(), spec.help)?;
    }
    Ok(())
}

/// Result of feeding one byte to a [`LineBuffer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent<const N: usize> {
    /// Byte stored, line not complete yet.
    Pending,
    /// A newline completed a non-empty line.
    Line(String<N>),
    /// The line outgrew the buffer; it was discarded and the buffer reset.
    Overflow(CommandError),
}

/// Assembles newline-terminated lines from a byte stream.
///
/// Bytes that are not printable ASCII (other than the terminator) are
/// dropped, `\r` included. A line that outgrows the buffer is discarded up
/// to and including its newline.
#[derive(Debug, Clone, Default)]
pub struct LineBuffer<const N: usize = LINE_CAPACITY> {
    buffer: String<N>,
    discarding: bool,
}

impl<const N: usize> LineBuffer<N> {
    pub const fn new() -> Self {
        Self {
            buffer: String::new(),
            discarding: false,
        }
    }

    /// Feeds one byte.
    pub fn push(&mut self, byte: u8) -> LineEvent<N> {
        match byte {
            b'\n' if self.discarding => {
                self.discarding = false;
                LineEvent::Pending
            }
            b'\n' => {
                let line = core::mem::take(&mut self.buffer);
                if line.trim().is_empty() {
                    LineEvent::Pending
                } else {
                    LineEvent::Line(line)
                }
            }
            _ if self.discarding => LineEvent::Pending,
            b' '..=b'~' => {
                if self.buffer.push(byte as char).is_err() {
                    self.buffer.clear();
                    self.discarding = true;
                    warn!("input line overflow, discarded");
                    LineEvent::Overflow(CommandError::MalformedLine)
                } else {
                    LineEvent::Pending
                }
            }
            _ => LineEvent::Pending,
        }
    }

    /// True while the rest of an overlong line is being skipped.
    pub fn is_discarding(&self) -> bool {
        self.discarding
    }

    /// Bytes currently buffered.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Drops any partial line and stops discarding.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }
}
