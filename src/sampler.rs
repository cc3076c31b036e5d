//! Three-phase colour frequency sampler.
//!
//! Provides [`ColourSampler`], which drives the sensor head's two illumination
//! outputs through the red, green and blue combinations, counts sense-line
//! edges for one measurement window per phase and converts each count to a
//! calibrated intensity. Also defines [`Illumination`] for the output pair.

use crate::config::SamplerConfig;
use crate::sense::SenseChannel;
use crate::types::{ColourChannel, ColourSample};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

/// Which illumination outputs are driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IlluminationState {
    /// Both outputs off.
    Off,
    /// Both outputs on.
    Red,
    /// Output A off, output B on.
    Green,
    /// Output A on, output B off.
    Blue,
}

impl IlluminationState {
    /// Output levels as `(a, b)`.
    pub fn levels(self) -> (bool, bool) {
        match self {
            IlluminationState::Off => (false, false),
            IlluminationState::Red => (true, true),
            IlluminationState::Green => (false, true),
            IlluminationState::Blue => (true, false),
        }
    }
}

impl From<ColourChannel> for IlluminationState {
    fn from(channel: ColourChannel) -> Self {
        match channel {
            ColourChannel::Red => IlluminationState::Red,
            ColourChannel::Green => IlluminationState::Green,
            ColourChannel::Blue => IlluminationState::Blue,
        }
    }
}

/// The two illumination outputs of the sensor head.
pub struct Illumination<A: OutputPin, B: OutputPin> {
    a: A,
    b: B,
    state: IlluminationState,
}

impl<A: OutputPin, B: OutputPin> Illumination<A, B> {
    /// Takes ownership of both outputs and turns them off.
    pub fn new(a: A, b: B) -> Self {
        let mut illumination = Self {
            a,
            b,
            state: IlluminationState::Off,
        };
        illumination.set(IlluminationState::Off);
        illumination
    }

    /// Drives both outputs for `state`.
    pub fn set(&mut self, state: IlluminationState) {
        let (a, b) = state.levels();
        if self.a.set_state(PinState::from(a)).is_err() {
            warn!("illumination output A write failed");
        }
        if self.b.set_state(PinState::from(b)).is_err() {
            warn!("illumination output B write failed");
        }
        self.state = state;
    }

    /// The last state driven.
    pub fn state(&self) -> IlluminationState {
        self.state
    }

    /// Releases both outputs.
    pub fn release(self) -> (A, B) {
        (self.a, self.b)
    }
}

/// Current phase of a colour detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SamplerState {
    /// No measurement in progress.
    Idle,
    /// Counting with red illumination.
    RedPhase,
    /// Counting with green illumination.
    GreenPhase,
    /// Counting with blue illumination.
    BluePhase,
}

impl From<ColourChannel> for SamplerState {
    fn from(channel: ColourChannel) -> Self {
        match channel {
            ColourChannel::Red => SamplerState::RedPhase,
            ColourChannel::Green => SamplerState::GreenPhase,
            ColourChannel::Blue => SamplerState::BluePhase,
        }
    }
}

/// Measures reflected colour by counting sensor pulses under three illuminations.
///
/// A detection is synchronous and runs to completion: three phases of settle
/// delay plus one measurement window each. The window itself is closed by
/// the timer interrupt through the shared [`SenseChannel`], so PWM rendering
/// driven from the same timer keeps running throughout.
///
/// # Type Parameters
/// * `'t` - Lifetime of the shared sense channel
/// * `A` - Illumination output A
/// * `B` - Illumination output B
/// * `D` - Delay provider for settle and poll waits
pub struct ColourSampler<'t, A: OutputPin, B: OutputPin, D: DelayNs> {
    illumination: Illumination<A, B>,
    channel: &'t SenseChannel,
    delay: D,
    config: SamplerConfig,
    state: SamplerState,
    done: bool,
    raw_counts: [u32; 3],
    last_sample: Option<ColourSample>,
}

impl<'t, A: OutputPin, B: OutputPin, D: DelayNs> ColourSampler<'t, A, B, D> {
    /// Creates an idle sampler.
    pub fn new(
        illumination: Illumination<A, B>,
        channel: &'t SenseChannel,
        delay: D,
        config: SamplerConfig,
    ) -> Self {
        Self {
            illumination,
            channel,
            delay,
            config,
            state: SamplerState::Idle,
            done: false,
            raw_counts: [0; 3],
            last_sample: None,
        }
    }

    /// Runs a full red, green, blue measurement and returns the calibrated sample.
    pub fn detect(&mut self) -> ColourSample {
        self.done = false;
        info!("colour detection started");

        let mut intensities = [0u8; 3];
        for channel in ColourChannel::ALL {
            let count = self.measure(channel);
            self.raw_counts[channel.index()] = count;
            intensities[channel.index()] = self.config.calibration().apply(channel, count);
        }

        self.illumination.set(IlluminationState::Off);
        self.state = SamplerState::Idle;
        self.done = true;

        let sample = ColourSample::new(intensities[0], intensities[1], intensities[2]);
        self.last_sample = Some(sample);

        info!(
            "colour detection done r={} g={} b={}",
            sample.red,
            sample.green,
            sample.blue
        );
        sample
    }

    /// Measures one phase and returns its raw pulse count.
    fn measure(&mut self, channel: ColourChannel) -> u32 {
        self.state = SamplerState::from(channel);
        self.illumination.set(IlluminationState::from(channel));

        // Counting straight after switching picks up switching transients.
        self.delay.delay_us(self.config.settle_us());

        self.channel.begin_window(self.config.window_ticks());
        self.wait_for_window();
        let count = self.channel.finish_window();

        debug!("{} phase counted {} pulses", channel, count);
        count
    }

    /// Busy-polls until the timer interrupt closes the window.
    ///
    /// Gives up after [`SamplerConfig::max_polls`] polls and closes the window
    /// itself, keeping whatever was counted.
    fn wait_for_window(&mut self) {
        let max_polls = self.config.max_polls();
        let mut polls = 0;

        while !self.channel.window_closed() {
            if polls >= max_polls {
                warn!("measurement window did not close after {} polls", polls);
                self.channel.force_close();
                break;
            }
            self.delay.delay_us(self.config.poll_interval_us());
            polls += 1;
        }
    }

    /// Current phase.
    pub fn state(&self) -> SamplerState {
        self.state
    }

    /// Returns `true` once a detection has completed.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Sample from the most recent completed detection.
    pub fn last_sample(&self) -> Option<ColourSample> {
        self.last_sample
    }

    /// Raw pulse counts `[red, green, blue]` from the most recent detection.
    pub fn raw_counts(&self) -> [u32; 3] {
        self.raw_counts
    }

    /// Active configuration.
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Current illumination state.
    pub fn illumination(&self) -> IlluminationState {
        self.illumination.state()
    }

    /// Releases the illumination outputs and delay.
    pub fn release(self) -> (Illumination<A, B>, D) {
        (self.illumination, self.delay)
    }
}
