//! Seam to the text display collaborator.
//!
//! The display owns the `DISP:` namespace. Rendering, segment encoding and
//! brightness hardware are the implementor's concern; [`DisplayCommand`] is
//! offered as a parser so implementations agree on the command grammar.

use core::fmt::Write;
use heapless::String;

/// Prefix claimed by the display, compared case-insensitively.
pub const DISPLAY_PREFIX: &str = "DISP:";

/// Highest accepted brightness level.
pub const MAX_BRIGHTNESS: u8 = 7;

/// Maximum text length kept by [`DisplayCommand::Text`].
pub const TEXT_CAPACITY: usize = 32;

/// A text display that can claim command lines.
pub trait TextDisplay {
    /// Handles `line` if it belongs to the display and returns true.
    ///
    /// Returning false passes the line on to the next namespace.
    fn try_handle(&mut self, line: &str) -> bool;
}

/// A parsed `DISP:` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCommand {
    /// `DISP:CLR`
    Clear,
    /// `DISP:ON`
    On,
    /// `DISP:OFF`
    Off,
    /// `DISP:BRT:n` with `n` in `0..=7`.
    Brightness(u8),
    /// `DISP:BRT:n` with `n` out of range.
    InvalidBrightness(i32),
    /// Anything else after the prefix, uppercased.
    Text(String<TEXT_CAPACITY>),
}

impl DisplayCommand {
    /// Parses a display command. Returns `None` when the line lacks the
    /// `DISP:` prefix.
    ///
    /// The whole line is uppercased first, so `disp:clr` and `DISP:CLR`
    /// are the same command. Text longer than [`TEXT_CAPACITY`] is cut.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let prefix = line.get(..DISPLAY_PREFIX.len())?;
        if !prefix.eq_ignore_ascii_case(DISPLAY_PREFIX) {
            return None;
        }

        let mut param: String<TEXT_CAPACITY> = String::new();
        for c in line[DISPLAY_PREFIX.len()..].chars() {
            if param.push(c.to_ascii_uppercase()).is_err() {
                break;
            }
        }

        let command = match param.as_str() {
            "CLR" => DisplayCommand::Clear,
            "ON" => DisplayCommand::On,
            "OFF" => DisplayCommand::Off,
            p if p.starts_with("BRT:") => {
                let level = crate::command::parse_leading_int(&p[4..]);
                match u8::try_from(level) {
                    Ok(level) if level <= MAX_BRIGHTNESS => DisplayCommand::Brightness(level),
                    _ => DisplayCommand::InvalidBrightness(level),
                }
            }
            _ => DisplayCommand::Text(param),
        };

        Some(command)
    }
}

/// Writes the display command help block. Only the diagnostic variant has
/// a heading.
pub fn write_display_help<W: Write>(out: &mut W, diagnostic: bool) -> core::fmt::Result {
    if diagnostic {
        writeln!(out, "Display Commands:")?;
    }
    writeln!(out, "  DISP:text    - Display text (up to 4 chars)")?;
    writeln!(out, "  DISP:1234    - Display number")?;
    writeln!(out, "  DISP:CLR     - Clear display")?;
    writeln!(out, "  DISP:BRT:7   - Set brightness (0-7)")?;
    writeln!(out, "  DISP:ON      - Turn display on")?;
    writeln!(out, "  DISP:OFF     - Turn display off")
}
