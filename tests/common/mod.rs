//! Shared test infrastructure for exo-spectra integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::convert::Infallible;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType as DigitalErrorType, OutputPin};
use embedded_hal::pwm::{ErrorType as PwmErrorType, SetDutyCycle};
use exo_spectra::{Colour, ColourDetector, ColourSample, LightSensor, RgbLed, SenseChannel, TextDisplay};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock GPIO
// ============================================================================

/// Mock output pin. Clones share state, so a clone kept by the test acts as a probe.
#[derive(Clone, Default)]
pub struct MockPin {
    level: Arc<AtomicBool>,
    history: Arc<Mutex<Vec<bool>>>,
}

impl MockPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_high(&self) -> bool {
        self.level.load(Ordering::SeqCst)
    }

    pub fn history(&self) -> Vec<bool> {
        self.history.lock().unwrap().clone()
    }

    fn drive(&self, high: bool) {
        self.level.store(high, Ordering::SeqCst);
        self.history.lock().unwrap().push(high);
    }
}

impl DigitalErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true);
        Ok(())
    }
}

// ============================================================================
// Mock hardware PWM
// ============================================================================

/// Mock compare channel that records every duty written.
#[derive(Clone)]
pub struct MockPwm {
    max: u16,
    writes: Arc<Mutex<Vec<u16>>>,
}

impl MockPwm {
    pub fn new(max: u16) -> Self {
        Self {
            max,
            writes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn writes(&self) -> Vec<u16> {
        self.writes.lock().unwrap().clone()
    }

    pub fn duty(&self) -> u16 {
        self.writes.lock().unwrap().last().copied().unwrap_or(0)
    }
}

impl PwmErrorType for MockPwm {
    type Error = Infallible;
}

impl SetDutyCycle for MockPwm {
    fn max_duty_cycle(&self) -> u16 {
        self.max
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.writes.lock().unwrap().push(duty);
        Ok(())
    }
}

// ============================================================================
// Event recording for playback ordering
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Colour(Colour),
    DelayUs(u32),
}

pub type EventLog = Arc<Mutex<Vec<Event>>>;

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// LED that appends every duty-cycle update to a shared log.
pub struct RecordingLed {
    log: EventLog,
}

impl RecordingLed {
    pub fn new(log: &EventLog) -> Self {
        Self { log: log.clone() }
    }
}

impl RgbLed for RecordingLed {
    fn set_duty_cycles(&mut self, colour: Colour) {
        self.log.lock().unwrap().push(Event::Colour(colour));
    }
}

/// Delay that appends every wait to a shared log instead of sleeping.
pub struct RecordingDelay {
    log: EventLog,
}

impl RecordingDelay {
    pub fn new(log: &EventLog) -> Self {
        Self { log: log.clone() }
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.lock().unwrap().push(Event::DelayUs(ns / 1_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.log.lock().unwrap().push(Event::DelayUs(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.lock().unwrap().push(Event::DelayUs(ms * 1_000));
    }
}

// ============================================================================
// Simulated sensor head and timer
// ============================================================================

/// Delay provider that simulates the passage of time for the sampler.
///
/// Every wait advances a virtual clock and fires the timer tick into the
/// sense channel at the configured period. On the first wait of each open
/// window it delivers the planned number of sense edges for the phase selected
/// by the illumination outputs. On each window close it fires `late_edges`
/// more edges, which must all be rejected.
pub struct SimulatedSensor<'t> {
    channel: &'t SenseChannel,
    a: MockPin,
    b: MockPin,
    edges: [u32; 3],
    late_edges: u32,
    tick_period_ns: u64,
    ticking: bool,
    elapsed_ns: u64,
    next_tick_ns: u64,
    injected: bool,
    pub late_edges_counted: u32,
    pub windows_closed: u32,
}

impl<'t> SimulatedSensor<'t> {
    pub fn new(channel: &'t SenseChannel, a: &MockPin, b: &MockPin, tick_period_us: u32) -> Self {
        let tick_period_ns = tick_period_us as u64 * 1_000;
        Self {
            channel,
            a: a.clone(),
            b: b.clone(),
            edges: [0; 3],
            late_edges: 0,
            tick_period_ns,
            ticking: true,
            elapsed_ns: 0,
            next_tick_ns: tick_period_ns,
            injected: false,
            late_edges_counted: 0,
            windows_closed: 0,
        }
    }

    /// Edges delivered per window for `[red, green, blue]`.
    pub fn with_edges(mut self, edges: [u32; 3]) -> Self {
        self.edges = edges;
        self
    }

    /// Edges delivered immediately after each window closes.
    pub fn with_late_edges(mut self, late_edges: u32) -> Self {
        self.late_edges = late_edges;
        self
    }

    /// Simulates a stalled timer interrupt.
    pub fn without_ticks(mut self) -> Self {
        self.ticking = false;
        self
    }

    pub fn elapsed_us(&self) -> u64 {
        self.elapsed_ns / 1_000
    }

    fn phase(&self) -> usize {
        match (self.a.is_high(), self.b.is_high()) {
            (true, true) => 0,
            (false, true) => 1,
            (true, false) => 2,
            (false, false) => panic!("window open with illumination off"),
        }
    }

    fn inject_if_counting(&mut self) {
        if !self.channel.is_counting() {
            self.injected = false;
            return;
        }
        if !self.injected {
            for _ in 0..self.edges[self.phase()] {
                self.channel.on_edge();
            }
            self.injected = true;
        }
    }

    fn advance(&mut self, ns: u64) {
        self.inject_if_counting();
        self.elapsed_ns += ns;

        if !self.ticking {
            return;
        }
        while self.next_tick_ns <= self.elapsed_ns {
            self.next_tick_ns += self.tick_period_ns;
            if self.channel.on_tick() {
                self.windows_closed += 1;
                for _ in 0..self.late_edges {
                    if self.channel.on_edge() {
                        self.late_edges_counted += 1;
                    }
                }
            }
        }
    }
}

impl DelayNs for SimulatedSensor<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.advance(ns as u64);
    }

    fn delay_us(&mut self, us: u32) {
        self.advance(us as u64 * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance(ms as u64 * 1_000_000);
    }
}

// ============================================================================
// Collaborator fakes
// ============================================================================

/// Detector that always reports the same sample.
pub struct FixedDetector {
    pub sample: ColourSample,
    pub calls: u32,
}

impl FixedDetector {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            sample: ColourSample::new(r, g, b),
            calls: 0,
        }
    }
}

impl ColourDetector for FixedDetector {
    fn detect(&mut self) -> ColourSample {
        self.calls += 1;
        self.sample
    }
}

/// Light sensor returning a fixed raw reading.
pub struct FixedLight(pub u16);

impl LightSensor for FixedLight {
    fn read_raw(&mut self) -> u16 {
        self.0
    }
}

/// Display that records every pair of lines shown.
#[derive(Default)]
pub struct RecordingDisplay {
    pub screens: Vec<(String, String)>,
}

impl TextDisplay for RecordingDisplay {
    fn show(&mut self, line1: &str, line2: &str) {
        self.screens.push((line1.to_string(), line2.to_string()));
    }
}
