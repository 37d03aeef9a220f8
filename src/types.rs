//! Core configuration and error types shared across subsystems.

/// Which serial output format the receiver produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputMode {
    /// One line per accepted decode, matching the reference device.
    #[default]
    Reference,

    /// Pipe-delimited detail lines, warnings, statistics and command feedback.
    Diagnostic,
}

/// Runtime configuration for a receiver.
///
/// Built with `const` builder methods so it can live in a `static`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Output format.
    pub output_mode: OutputMode,

    /// Emit repeat frames. Only honored in diagnostic mode.
    pub show_repeats: bool,

    /// Include the raw 32-bit value in diagnostic lines.
    pub show_raw_data: bool,

    /// Print a `[NOISE FILTERED]` marker for dropped noise in diagnostic mode.
    pub show_noise: bool,

    /// Print a statistics line every this many emitted signals. Zero disables it.
    pub stats_interval: u32,

    /// Also count statistics while in reference mode.
    pub count_stats_in_reference: bool,

    /// Seed for the fire effect's pseudo-random flicker.
    pub fire_seed: u64,
}

impl Config {
    /// Reference-device compatible defaults.
    pub const fn reference() -> Self {
        Self {
            output_mode: OutputMode::Reference,
            show_repeats: true,
            show_raw_data: true,
            show_noise: true,
            stats_interval: 50,
            count_stats_in_reference: false,
            fire_seed: 0x5EED_F1AE,
        }
    }

    /// Diagnostic defaults.
    pub const fn diagnostic() -> Self {
        Self::reference().output_mode(OutputMode::Diagnostic)
    }

    pub const fn output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    pub const fn show_repeats(mut self, enabled: bool) -> Self {
        self.show_repeats = enabled;
        self
    }

    pub const fn show_raw_data(mut self, enabled: bool) -> Self {
        self.show_raw_data = enabled;
        self
    }

    pub const fn show_noise(mut self, enabled: bool) -> Self {
        self.show_noise = enabled;
        self
    }

    pub const fn stats_interval(mut self, every: u32) -> Self {
        self.stats_interval = every;
        self
    }

    pub const fn count_stats_in_reference(mut self, enabled: bool) -> Self {
        self.count_stats_in_reference = enabled;
        self
    }

    pub const fn fire_seed(mut self, seed: u64) -> Self {
        self.fire_seed = seed;
        self
    }

    /// True when diagnostic output is enabled.
    #[inline]
    pub const fn is_diagnostic(&self) -> bool {
        matches!(self.output_mode, OutputMode::Diagnostic)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::reference()
    }
}

/// Command handling errors.
///
/// All of these are terminal at detection: the command is dropped and, in
/// diagnostic mode, reported on the serial output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Missing, non-numeric or non-positive duration.
    InvalidArgument {
        /// LED command name the argument belonged to.
        command: &'static str,
    },

    /// No namespace or catalog entry matched.
    UnrecognizedCommand,

    /// Input line exceeded the line buffer and was discarded.
    MalformedLine,
}

impl core::fmt::Display for CommandError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CommandError::InvalidArgument { command } => {
                write!(f, "Invalid duration for {} animation", command)
            }
            CommandError::UnrecognizedCommand => write!(f, "Unrecognized command"),
            CommandError::MalformedLine => write!(f, "Input line too long, discarded"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CommandError {}

/// Non-error conditions detected while classifying a decoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SignalCondition {
    /// Frame carried no information and was dropped.
    Noise,

    /// Decoder could not name the protocol.
    UnknownProtocol,

    /// Frame had zero bits.
    ZeroBits,

    /// Known protocol with both address and command zero.
    ZeroPayload,
}

impl core::fmt::Display for SignalCondition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SignalCondition::Noise => write!(f, "[NOISE FILTERED]"),
            SignalCondition::UnknownProtocol => {
                write!(f, "  WARNING: Unknown protocol - check remote compatibility")
            }
            SignalCondition::ZeroBits => write!(f, "  WARNING: Zero bits received"),
            SignalCondition::ZeroPayload => {
                write!(f, "  WARNING: Address and command are both zero")
            }
        }
    }
}
