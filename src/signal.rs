//! IR signal classification and serial formatting.
//!
//! [`SignalClassifier`] takes decoded frames from an [`IrDecoder`], drops noise
//! and (usually) repeats, and prints each accepted frame either in the
//! reference device's format or in the pipe-delimited diagnostic format.

use crate::time::{TimeDuration, TimeInstant, TimeSource};
use crate::types::{Config, OutputMode, SignalCondition};
use core::fmt::Write;
use heapless::String;

/// Protocol name decoders report when they cannot identify a frame.
pub const UNKNOWN_PROTOCOL: &str = "UNKNOWN";

/// Capacity of a formatted reference line.
pub const LINE_CAPACITY: usize = 64;

/// One decoded IR frame, as supplied by the demodulation collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrSignalEvent {
    /// Decoder's protocol name, before mapping.
    pub protocol: &'static str,
    pub address: u16,
    pub command: u16,
    pub raw_value: u32,
    pub bit_count: u8,
    /// Frame is a held-button repeat.
    pub is_repeat: bool,
}

impl IrSignalEvent {
    pub const fn new(protocol: &'static str, address: u16, command: u16, bit_count: u8) -> Self {
        Self {
            protocol,
            address,
            command,
            raw_value: 0,
            bit_count,
            is_repeat: false,
        }
    }

    pub const fn raw_value(mut self, raw_value: u32) -> Self {
        self.raw_value = raw_value;
        self
    }

    pub const fn repeat(mut self, is_repeat: bool) -> Self {
        self.is_repeat = is_repeat;
        self
    }
}

/// Source of decoded frames.
pub trait IrDecoder {
    /// Returns a newly decoded frame, if one is ready.
    fn try_decode(&mut self) -> Option<IrSignalEvent>;

    /// Re-arms the decoder after a frame has been consumed.
    fn resume(&mut self);
}

/// Maps decoder protocol names to the names the reference device prints.
pub fn map_protocol_name(name: &str) -> &str {
    match name {
        "Sony" => "SIRC",
        "Samsung" | "Samsung32" => "Samsung32",
        other => other,
    }
}

/// True when a frame carries no usable information.
pub fn is_noise(event: &IrSignalEvent) -> bool {
    let protocol = map_protocol_name(event.protocol);
    event.bit_count == 0
        || (protocol == UNKNOWN_PROTOCOL && event.address == 0 && event.command == 0)
}

/// Uppercase hex with at least `min_digits` digits. Never truncates.
pub fn format_hex(value: u32, min_digits: usize) -> String<8> {
    let mut out = String::new();
    // Eight hex digits always fit
    let _ = write!(out, "{:0width$X}", value, width = min_digits.min(8));
    out
}

/// Classification of one frame. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedSignal {
    pub event: IrSignalEvent,
    /// Protocol name after mapping.
    pub protocol: &'static str,
    pub is_noise: bool,
    pub is_repeat: bool,
    pub should_emit: bool,
    /// Reference-format line, present for emitted non-repeat frames.
    pub formatted_line: Option<String<LINE_CAPACITY>>,
}

impl ClassifiedSignal {
    /// What processing this signal amounts to, independent of output.
    pub fn emission(&self) -> Emission {
        if self.is_noise {
            Emission::Noise
        } else if self.should_emit {
            Emission::Emitted
        } else {
            Emission::Suppressed
        }
    }
}

/// Running counts of emitted signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Statistics {
    pub total_signals_seen: u32,
    /// Emitted signals that were not repeats.
    pub valid_signals_seen: u32,
}

impl Statistics {
    /// Whole-number success percentage, 0 before any signal.
    pub fn success_percent(&self) -> u32 {
        if self.total_signals_seen == 0 {
            return 0;
        }
        (self.valid_signals_seen as u64 * 100 / self.total_signals_seen as u64) as u32
    }
}

impl core::fmt::Display for Statistics {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "  [Stats: {}/{} valid signals, {}% success rate]",
            self.valid_signals_seen,
            self.total_signals_seen,
            self.success_percent()
        )
    }
}

/// What [`SignalClassifier::process`] did with a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Emission {
    /// Printed.
    Emitted,
    /// Dropped as noise.
    Noise,
    /// Dropped as a repeat.
    Suppressed,
}

/// Classifies frames and writes them to the serial output.
///
/// Owns the statistics counters and the timestamp of the last emitted frame.
pub struct SignalClassifier<'t, I: TimeInstant, T: TimeSource<I>> {
    time_source: &'t T,
    config: Config,
    stats: Statistics,
    last_emit: Option<I>,
}

impl<'t, I: TimeInstant, T: TimeSource<I>> SignalClassifier<'t, I, T> {
    pub fn new(time_source: &'t T, config: Config) -> Self {
        Self {
            time_source,
            config,
            stats: Statistics::default(),
            last_emit: None,
        }
    }

    /// Classifies a frame. Pure: depends only on the frame and configuration.
    pub fn classify(&self, event: &IrSignalEvent) -> ClassifiedSignal {
        let protocol = map_protocol_name(event.protocol);
        let noise = is_noise(event);
        let repeat = event.is_repeat;
        let debug = self.config.is_diagnostic();
        let should_emit = !noise && (!repeat || (debug && self.config.show_repeats));

        let formatted_line = if should_emit && !repeat {
            let mut line = String::new();
            let _ = write_reference_line(&mut line, protocol, event);
            Some(line)
        } else {
            None
        };

        ClassifiedSignal {
            event: *event,
            protocol,
            is_noise: noise,
            is_repeat: repeat,
            should_emit,
            formatted_line,
        }
    }

    /// Classifies a frame, updates statistics and writes its output lines.
    pub fn process<W: Write>(
        &mut self,
        event: &IrSignalEvent,
        out: &mut W,
    ) -> Result<Emission, core::fmt::Error> {
        let now = self.time_source.now();
        let signal = self.classify(event);

        match signal.emission() {
            Emission::Noise => {
                trace!("noise filtered: {} bits", event.bit_count);
                if self.config.is_diagnostic() && self.config.show_noise && !signal.is_repeat {
                    writeln!(out, "{}", SignalCondition::Noise)?;
                }
                return Ok(Emission::Noise);
            }
            Emission::Suppressed => return Ok(Emission::Suppressed),
            Emission::Emitted => {}
        }

        let counting = self.config.is_diagnostic() || self.config.count_stats_in_reference;
        if counting {
            self.stats.total_signals_seen = self.stats.total_signals_seen.saturating_add(1);
            if !signal.is_repeat {
                self.stats.valid_signals_seen = self.stats.valid_signals_seen.saturating_add(1);
            }
        }

        let delta_ms = self
            .last_emit
            .map(|last| now.duration_since(last).as_millis());
        self.last_emit = Some(now);

        match self.config.output_mode {
            OutputMode::Reference => {
                if let Some(line) = &signal.formatted_line {
                    writeln!(out, "{}", line)?;
                }
            }
            OutputMode::Diagnostic => {
                self.write_diagnostic(&signal, delta_ms, out)?;
            }
        }

        Ok(Emission::Emitted)
    }

    /// Counters since construction.
    pub fn statistics(&self) -> Statistics {
        self.stats
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn write_diagnostic<W: Write>(
        &self,
        signal: &ClassifiedSignal,
        delta_ms: Option<u64>,
        out: &mut W,
    ) -> core::fmt::Result {
        let event = &signal.event;

        write!(
            out,
            "{} | A:0x{} | C:0x{}",
            signal.protocol,
            format_hex(event.address as u32, 2),
            format_hex(event.command as u32, 2)
        )?;
        if self.config.show_raw_data {
            write!(out, " | Raw:0x{}", format_hex(event.raw_value, 8))?;
        }
        write!(out, " | {} bits", event.bit_count)?;
        if signal.is_repeat {
            write!(out, " | REPEAT")?;
        }
        if let Some(delta) = delta_ms {
            write!(out, " | +{}ms", delta)?;
        }
        writeln!(out)?;

        for condition in conditions(signal) {
            writeln!(out, "{}", condition)?;
        }

        let every = self.config.stats_interval;
        if every > 0 && self.stats.total_signals_seen > 0 && self.stats.total_signals_seen % every == 0 {
            writeln!(out, "{}", self.stats)?;
        }

        Ok(())
    }
}

/// Warnings attached to an emitted frame, in print order.
fn conditions(signal: &ClassifiedSignal) -> impl Iterator<Item = SignalCondition> {
    let event = signal.event;
    let unknown = signal.protocol == UNKNOWN_PROTOCOL;
    [
        // Never reached from `process`: zero-bit frames are noise
        (event.bit_count == 0).then_some(SignalCondition::ZeroBits),
        unknown.then_some(SignalCondition::UnknownProtocol),
        (event.address == 0 && event.command == 0 && !unknown).then_some(SignalCondition::ZeroPayload),
    ]
    .into_iter()
    .flatten()
}

fn write_reference_line<W: Write>(
    out: &mut W,
    protocol: &str,
    event: &IrSignalEvent,
) -> core::fmt::Result {
    write!(
        out,
        "{}, A:0x{}, C:0x{}",
        protocol,
        format_hex(event.address as u32, 2),
        format_hex(event.command as u32, 2)
    )
}
