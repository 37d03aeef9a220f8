//! Shared test infrastructure for ir-rgb-bridge integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use ir_rgb_bridge::{IrDecoder, IrSignalEvent, RgbLed, Rgb8, TextDisplay, TimeDuration, TimeInstant, TimeSource};
use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }

    fn checked_add(self, duration: Self::Duration) -> Option<Self> {
        self.0.checked_add(duration.0).map(TestInstant)
    }
}

// ============================================================================
// Mock LED
// ============================================================================

/// Mock LED that records all color changes for testing
pub struct MockLed {
    current_color: Rgb8,
    color_history: Vec<Rgb8>,
}

impl MockLed {
    pub fn new() -> Self {
        Self {
            current_color: Rgb8::new(0, 0, 0),
            color_history: Vec::new(),
        }
    }

    pub fn get_last_color(&self) -> Rgb8 {
        self.current_color
    }

    pub fn color_history(&self) -> &[Rgb8] {
        &self.color_history
    }
}

impl RgbLed for MockLed {
    fn set_color(&mut self, color: Rgb8) {
        self.current_color = color;
        self.color_history.push(color);
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: core::cell::Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: core::cell::Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given number of milliseconds
    pub fn advance(&self, millis: u64) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + millis));
    }

    pub fn set_time(&self, time: TestInstant) {
        self.current_time.set(time);
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Display
// ============================================================================

/// Mock display that claims `DISP:` lines case-insensitively and records them
pub struct MockDisplay {
    handled: Vec<String>,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self {
            handled: Vec::new(),
        }
    }

    pub fn handled(&self) -> &[String] {
        &self.handled
    }
}

impl TextDisplay for MockDisplay {
    fn try_handle(&mut self, line: &str) -> bool {
        if ir_rgb_bridge::DisplayCommand::parse(line).is_some() {
            self.handled.push(line.to_string());
            true
        } else {
            false
        }
    }
}

// ============================================================================
// Mock Decoder
// ============================================================================

/// Mock decoder that hands out queued frames one per call
pub struct MockDecoder {
    frames: VecDeque<IrSignalEvent>,
    resumes: usize,
}

impl MockDecoder {
    pub fn new() -> Self {
        Self {
            frames: VecDeque::new(),
            resumes: 0,
        }
    }

    pub fn queue(&mut self, frame: IrSignalEvent) {
        self.frames.push_back(frame);
    }

    pub fn resumes(&self) -> usize {
        self.resumes
    }
}

impl IrDecoder for MockDecoder {
    fn try_decode(&mut self) -> Option<IrSignalEvent> {
        self.frames.pop_front()
    }

    fn resume(&mut self) {
        self.resumes += 1;
    }
}

// ============================================================================
// Mock Serial Sink
// ============================================================================

/// Serial sink whose writes always fail
pub struct FailingSink;

impl core::fmt::Write for FailingSink {
    fn write_str(&mut self, _s: &str) -> core::fmt::Result {
        Err(core::fmt::Error)
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Ticks `tick` every `step` ms until `total` ms have elapsed (inclusive)
pub fn run_for(timer: &MockTimeSource, total: u64, step: u64, mut tick: impl FnMut()) {
    let mut elapsed = 0;
    tick();
    while elapsed < total {
        timer.advance(step);
        elapsed += step;
        tick();
    }
}
