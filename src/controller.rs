//! Cooperative main-loop composition.
//!
//! [`Controller`] owns all three subsystems and their collaborators. The host
//! feeds serial bytes with [`Controller::receive`] and calls
//! [`Controller::poll`] once per loop pass, with a short sleep between passes
//! that stays below the fastest animation interval (30 ms).

use crate::animation::{AnimationEngine, RgbLed};
use crate::command::{
    CommandRouter, LINE_CAPACITY, LineBuffer, LineEvent, RouteOutcome, write_led_help,
};
use crate::display::{TextDisplay, write_display_help};
use crate::signal::{Emission, IrDecoder, SignalClassifier};
use crate::time::{TimeInstant, TimeSource};
use crate::types::{CommandError, Config};
use core::fmt::Write;
use heapless::{Deque, String};

/// Completed lines waiting for a poll pass.
pub const PENDING_LINES: usize = 4;

/// Result of one [`Controller::poll`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollReport {
    /// Outcome of the routed line, if one was pending.
    pub routed: Option<RouteOutcome>,
    /// What happened to the decoded frame, if one was ready.
    pub signal: Option<Emission>,
}

/// Ties the animation engine, command router and signal classifier together.
///
/// # Type Parameters
/// * `'t` - Lifetime of the shared time source
/// * `I` - Time instant type
/// * `T` - Time source implementation type
/// * `L` - LED implementation type
/// * `D` - Display collaborator
/// * `X` - IR decoder collaborator
/// * `W` - Serial output sink
/// * `N` - Maximum input line length
pub struct Controller<'t, I, T, L, D, X, W, const N: usize = LINE_CAPACITY>
where
    I: TimeInstant,
    T: TimeSource<I>,
    L: RgbLed,
    D: TextDisplay,
    X: IrDecoder,
    W: Write,
{
    config: Config,
    animations: AnimationEngine<'t, I, L, T>,
    classifier: SignalClassifier<'t, I, T>,
    router: CommandRouter,
    display: D,
    decoder: X,
    out: W,
    input: LineBuffer<N>,
    pending: Deque<String<N>, PENDING_LINES>,
}

impl<'t, I, T, L, D, X, W, const N: usize> Controller<'t, I, T, L, D, X, W, N>
where
    I: TimeInstant,
    T: TimeSource<I>,
    L: RgbLed,
    D: TextDisplay,
    X: IrDecoder,
    W: Write,
{
    /// Creates a controller with the LED off and no pending input.
    pub fn new(config: Config, time_source: &'t T, led: L, display: D, decoder: X, out: W) -> Self {
        Self {
            config,
            animations: AnimationEngine::new(led, time_source, config.fire_seed),
            classifier: SignalClassifier::new(time_source, config),
            router: CommandRouter::new(),
            display,
            decoder,
            out,
            input: LineBuffer::new(),
            pending: Deque::new(),
        }
    }

    /// Feeds one serial byte.
    pub fn receive_byte(&mut self, byte: u8) {
        match self.input.push(byte) {
            LineEvent::Pending => {}
            LineEvent::Line(line) => {
                if self.pending.push_back(line).is_err() {
                    warn!("pending line queue full, line dropped");
                    self.report(CommandError::MalformedLine);
                }
            }
            LineEvent::Overflow(error) => self.report(error),
        }
    }

    /// Feeds a run of serial bytes.
    pub fn receive(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.receive_byte(byte);
        }
    }

    /// Runs one pass: tick the animation, route at most one pending line,
    /// classify at most one decoded frame.
    pub fn poll(&mut self) -> PollReport {
        self.animations.tick();

        let routed = self.pending.pop_front().map(|line| self.handle_line(&line));

        let signal = self.decoder.try_decode().map(|event| {
            let emission = match self.classifier.process(&event, &mut self.out) {
                Ok(emission) => emission,
                Err(_) => {
                    warn!("serial write failed while printing signal");
                    self.classifier.classify(&event).emission()
                }
            };
            self.decoder.resume();
            emission
        });

        PollReport { routed, signal }
    }

    /// Routes one line immediately, bypassing the input buffer.
    pub fn handle_line(&mut self, line: &str) -> RouteOutcome {
        let outcome = self
            .router
            .route(line, &mut self.display, &mut self.animations);

        if self.config.is_diagnostic() {
            match outcome {
                RouteOutcome::LedRejectedInvalidArgument { .. } => {
                    if let Some(error) = outcome.error() {
                        let _ = writeln!(self.out, "{}", error);
                    }
                }
                RouteOutcome::Unrecognized { led_prefix: true } => {
                    let _ = write_led_help(&mut self.out, true);
                }
                RouteOutcome::Unrecognized { led_prefix: false } => {
                    let _ = writeln!(self.out, "{}: {}", CommandError::UnrecognizedCommand, line.trim());
                }
                RouteOutcome::DisplayHandled | RouteOutcome::LedHandled(_) => {}
            }
        }

        outcome
    }

    /// Writes the command help to the serial output. Outside diagnostic mode
    /// the short list is printed.
    pub fn write_help(&mut self) -> core::fmt::Result {
        let diagnostic = self.config.is_diagnostic();
        write_display_help(&mut self.out, diagnostic)?;
        writeln!(self.out)?;
        write_led_help(&mut self.out, diagnostic)
    }

    pub fn animations(&self) -> &AnimationEngine<'t, I, L, T> {
        &self.animations
    }

    pub fn animations_mut(&mut self) -> &mut AnimationEngine<'t, I, L, T> {
        &mut self.animations
    }

    pub fn classifier(&self) -> &SignalClassifier<'t, I, T> {
        &self.classifier
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn decoder(&self) -> &X {
        &self.decoder
    }

    /// The serial output sink.
    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Number of complete lines waiting to be routed.
    pub fn pending_lines(&self) -> usize {
        self.pending.len()
    }

    fn report(&mut self, error: CommandError) {
        if self.config.is_diagnostic() {
            let _ = writeln!(self.out, "{}", error);
        }
    }
}
