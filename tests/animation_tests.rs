//! Integration tests for AnimationEngine

mod common;
use common::*;

use ir_rgb_bridge::{
    AnimationEngine, AnimationMode, BLACK, BLUE, GREEN, RED, Rgb8, WHITE, YELLOW, tables,
};

type Engine<'a> = AnimationEngine<'a, TestInstant, MockLed, MockTimeSource>;

fn engine(timer: &MockTimeSource) -> Engine<'_> {
    AnimationEngine::new(MockLed::new(), timer, 7)
}

#[test]
fn new_engine_is_off_and_dark() {
    let timer = MockTimeSource::new();
    let engine = engine(&timer);

    assert!(!engine.is_active());
    assert_eq!(engine.mode(), AnimationMode::Off);
    assert_eq!(engine.led().color_history(), &[BLACK]);
}

#[test]
fn every_mode_expires_after_its_duration() {
    for mode in AnimationMode::ALL {
        if mode == AnimationMode::Off {
            continue;
        }
        for seconds in [1u32, 3] {
            let timer = MockTimeSource::new();
            let mut engine = engine(&timer);

            engine.start(mode, seconds);
            assert!(engine.is_active(), "{:?} should start", mode);

            run_for(&timer, seconds as u64 * 1000, 10, || engine.tick());

            assert!(!engine.is_active(), "{:?} for {}s still active", mode, seconds);
            assert_eq!(engine.led().get_last_color(), BLACK, "{:?}", mode);
        }
    }
}

#[test]
fn effect_is_still_running_just_before_deadline() {
    let timer = MockTimeSource::new();
    let mut engine = engine(&timer);

    engine.start(AnimationMode::Rainbow, 2);
    run_for(&timer, 1990, 10, || engine.tick());
    assert!(engine.is_active());
    assert_eq!(engine.remaining(), Some(TestDuration(10)));

    timer.advance(10);
    engine.tick();
    assert!(!engine.is_active());
    assert_eq!(engine.remaining(), None);
}

#[test]
fn zero_duration_runs_without_deadline() {
    let timer = MockTimeSource::new();
    let mut engine = engine(&timer);

    engine.start(AnimationMode::Matrix, 0);
    assert_eq!(engine.state().end_time, None);

    run_for(&timer, 120_000, 50, || engine.tick());
    assert!(engine.is_active());
}

#[test]
fn ack_and_nack_finish_after_two_ticks_regardless_of_duration() {
    for (mode, on) in [
        (AnimationMode::Ack, Rgb8::new(0, 64, 0)),
        (AnimationMode::Nack, Rgb8::new(64, 0, 0)),
    ] {
        for seconds in [0u32, 5, 600] {
            let timer = MockTimeSource::new();
            let mut engine = engine(&timer);

            engine.start(mode, seconds);
            assert_eq!(engine.state().end_time, Some(TestInstant(300)));

            engine.tick();
            assert_eq!(engine.current_color(), on);
            assert!(engine.is_active());

            timer.advance(50);
            engine.tick();
            assert_eq!(engine.current_color(), on, "interval not yet elapsed");

            timer.advance(50);
            engine.tick();
            assert!(!engine.is_active());
            assert_eq!(engine.led().get_last_color(), BLACK);
            assert!(engine.state().end_time.is_none());
            assert_eq!(engine.led().color_history(), &[BLACK, on, BLACK]);
        }
    }
}

#[test]
fn tick_is_gated_by_interval() {
    let timer = MockTimeSource::new();
    let mut engine = engine(&timer);

    engine.start(AnimationMode::RedBlue, 10);
    engine.tick();
    assert_eq!(engine.current_color(), RED);

    timer.advance(149);
    engine.tick();
    assert_eq!(engine.current_color(), RED);
    assert_eq!(engine.state().step, 1);

    timer.advance(1);
    engine.tick();
    assert_eq!(engine.current_color(), BLUE);
    assert_eq!(engine.state().step, 2);
}

#[test]
fn red_blue_alternates() {
    let timer = MockTimeSource::new();
    let mut engine = engine(&timer);

    engine.start(AnimationMode::RedBlue, 10);
    let mut colors = Vec::new();
    for _ in 0..4 {
        engine.tick();
        colors.push(engine.current_color());
        timer.advance(150);
    }
    assert_eq!(colors, [RED, BLUE, RED, BLUE]);
}

#[test]
fn traffic_cycles_red_green_yellow() {
    let timer = MockTimeSource::new();
    let mut engine = engine(&timer);

    engine.start(AnimationMode::Traffic, 30);
    let mut colors = Vec::new();
    for _ in 0..6 {
        engine.tick();
        colors.push(engine.current_color());
        timer.advance(800);
    }
    assert_eq!(colors, [RED, GREEN, YELLOW, RED, GREEN, YELLOW]);
}

#[test]
fn strobe_alternates_white_and_off() {
    let timer = MockTimeSource::new();
    let mut engine = engine(&timer);

    engine.start(AnimationMode::Strobe, 10);
    let mut colors = Vec::new();
    for _ in 0..4 {
        engine.tick();
        colors.push(engine.current_color());
        timer.advance(100);
    }
    assert_eq!(colors, [WHITE, BLACK, WHITE, BLACK]);
}

#[test]
fn matrix_follows_waveform_one_entry_per_tick() {
    let timer = MockTimeSource::new();
    let mut engine = engine(&timer);

    engine.start(AnimationMode::Matrix, 30);
    for i in 0..70u8 {
        engine.tick();
        assert_eq!(engine.current_color(), Rgb8::new(0, tables::wave(i), 0), "tick {}", i);
        timer.advance(50);
    }
}

#[test]
fn pulses_advance_twice_as_fast_as_matrix() {
    for (mode, channel) in [(AnimationMode::PulseRed, 0usize), (AnimationMode::PulseBlue, 2)] {
        let timer = MockTimeSource::new();
        let mut engine = engine(&timer);

        engine.start(mode, 30);
        for i in 0..40u8 {
            engine.tick();
            let level = tables::wave(i.wrapping_mul(2));
            let c = engine.current_color();
            let channels = [c.red, c.green, c.blue];
            assert_eq!(channels[channel], level, "{:?} tick {}", mode, i);
            assert!(channels.iter().filter(|&&v| v != 0).count() <= 1);
            timer.advance(30);
        }
        // A full rise-fall cycle takes 32 ticks
        assert_eq!(tables::wave(64), tables::wave(0));
    }
}

#[test]
fn rainbow_steps_through_palette_and_wraps() {
    let timer = MockTimeSource::new();
    let mut engine = engine(&timer);

    engine.start(AnimationMode::Rainbow, 60);
    for i in 0..130u8 {
        engine.tick();
        assert_eq!(engine.current_color(), tables::rainbow(i), "tick {}", i);
        timer.advance(30);
    }
}

#[test]
fn ocean_uses_two_phases_with_scaled_green() {
    let timer = MockTimeSource::new();
    let mut engine = engine(&timer);

    engine.start(AnimationMode::Ocean, 60);

    engine.tick();
    let first = engine.current_color();
    assert_eq!(first.red, 0);
    assert_eq!(first.blue, tables::wave(0));
    assert_eq!(first.green as u16, tables::wave(10) as u16 * 100 / 255);

    let mut max_green = 0;
    for _ in 0..200 {
        timer.advance(40);
        engine.tick();
        let c = engine.current_color();
        assert_eq!(c.red, 0);
        assert!(c.green <= 100);
        max_green = max_green.max(c.green);
    }
    assert_eq!(max_green, 100);

    // Phases drift apart because they advance at different rates
    let state = engine.state();
    assert_ne!(state.phase, state.phase_alt.wrapping_sub(10) & 63);
}

#[test]
fn fire_flickers_within_bounds() {
    let timer = MockTimeSource::new();
    let mut engine = engine(&timer);

    engine.start(AnimationMode::Fire, 60);
    let mut distinct = Vec::new();
    for _ in 0..100 {
        engine.tick();
        let c = engine.current_color();
        assert!(c.red >= 200, "red {}", c.red);
        assert!(c.green < 100, "green {}", c.green);
        assert_eq!(c.blue, 0);
        if !distinct.contains(&c) {
            distinct.push(c);
        }
        timer.advance(80);
    }
    assert!(distinct.len() > 10);
}

#[test]
fn fire_is_reproducible_for_a_seed() {
    let run = |seed: u64| {
        let timer = MockTimeSource::new();
        let mut engine = AnimationEngine::new(MockLed::new(), &timer, seed);
        engine.start(AnimationMode::Fire, 60);
        let mut colors = Vec::new();
        for _ in 0..20 {
            engine.tick();
            colors.push(engine.current_color());
            timer.advance(80);
        }
        colors
    };
    assert_eq!(run(42), run(42));
}

#[test]
fn thinking_holds_each_color_three_ticks_with_envelope() {
    let timer = MockTimeSource::new();
    let mut engine = engine(&timer);

    engine.start(AnimationMode::Thinking, 20);
    let mut colors = Vec::new();
    for _ in 0..13 {
        engine.tick();
        colors.push(engine.current_color());
        timer.advance(200);
    }

    assert_eq!(
        colors,
        [
            Rgb8::new(0, 108, 0),
            Rgb8::new(0, 180, 0),
            Rgb8::new(0, 72, 0),
            Rgb8::new(108, 0, 0),
            Rgb8::new(180, 0, 0),
            Rgb8::new(72, 0, 0),
            Rgb8::new(108, 108, 0),
            Rgb8::new(180, 180, 0),
            Rgb8::new(72, 72, 0),
            Rgb8::new(0, 0, 108),
            Rgb8::new(0, 0, 180),
            Rgb8::new(0, 0, 72),
            Rgb8::new(0, 108, 0),
        ]
    );
}

#[test]
fn start_replaces_active_effect_immediately() {
    let timer = MockTimeSource::new();
    let mut engine = engine(&timer);

    engine.start(AnimationMode::Traffic, 60);
    engine.tick();
    engine.tick();
    timer.advance(800);
    engine.tick();
    assert_eq!(engine.state().step, 2);

    timer.advance(10);
    engine.start(AnimationMode::Strobe, 5);
    assert_eq!(engine.mode(), AnimationMode::Strobe);
    assert_eq!(engine.state().step, 0);
    assert_eq!(engine.state().start_time, Some(TestInstant(810)));
    assert_eq!(engine.state().end_time, Some(TestInstant(5810)));

    // First tick after start renders without waiting for the interval
    engine.tick();
    assert_eq!(engine.current_color(), WHITE);
}

#[test]
fn stop_turns_led_off_immediately() {
    let timer = MockTimeSource::new();
    let mut engine = engine(&timer);

    engine.start(AnimationMode::Strobe, 60);
    engine.tick();
    assert_eq!(engine.current_color(), WHITE);

    engine.stop();
    assert!(!engine.is_active());
    assert_eq!(engine.led().get_last_color(), BLACK);

    timer.advance(1000);
    engine.tick();
    assert_eq!(engine.led().get_last_color(), BLACK);
}

#[test]
fn starting_off_is_stop() {
    let timer = MockTimeSource::new();
    let mut engine = engine(&timer);

    engine.start(AnimationMode::Rainbow, 60);
    engine.tick();
    engine.start(AnimationMode::Off, 60);
    assert!(!engine.is_active());
    assert_eq!(engine.led().get_last_color(), BLACK);
}

#[test]
fn unknown_mode_index_is_off() {
    assert_eq!(AnimationMode::from_index(13), AnimationMode::Off);
    assert_eq!(AnimationMode::from_index(255), AnimationMode::Off);
    assert_eq!(AnimationMode::from(6), AnimationMode::Rainbow);

    let timer = MockTimeSource::new();
    let mut engine = engine(&timer);
    engine.start_index(6, 60);
    assert_eq!(engine.mode(), AnimationMode::Rainbow);
    engine.start_index(99, 60);
    assert!(!engine.is_active());
}

#[test]
fn mode_indices_round_trip() {
    for (i, mode) in AnimationMode::ALL.iter().enumerate() {
        assert_eq!(mode.index() as usize, i);
        assert_eq!(AnimationMode::from_index(i as u8), *mode);
    }
}

#[test]
fn unchanged_color_is_not_rewritten() {
    let timer = MockTimeSource::new();
    let mut engine = engine(&timer);

    engine.start(AnimationMode::Thinking, 60);
    engine.tick();
    let writes = engine.led().color_history().len();

    // Gated ticks do not touch the LED
    for _ in 0..10 {
        timer.advance(10);
        engine.tick();
    }
    assert_eq!(engine.led().color_history().len(), writes);
}
