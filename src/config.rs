//! Timing constants and sampler configuration.
//!
//! The window length, tick period and playback dwell were tuned on the demo
//! board at a 4 MHz clock. A port to a different clock retunes them here.

use crate::calibration::Calibration;
use crate::types::ConfigError;

/// Timer ticks per measurement window.
pub const WINDOW_TICKS: u16 = 100;

/// Period of the measurement timer tick in microseconds.
pub const TICK_PERIOD_US: u32 = 10_000;

/// Hold time after switching illumination before counting starts.
pub const SETTLE_DELAY_US: u32 = 100_000;

/// Interval between window-closed checks while a phase is being measured.
pub const POLL_INTERVAL_US: u32 = 1_000;

/// Software PWM period in ticks for the green and blue channels.
pub const SOFT_PWM_PERIOD: u16 = 256;

/// Reference CPU clock the cycle-count delays were written against.
pub const CPU_CLOCK_HZ: u32 = 4_000_000;

/// Dwell on each emission line during spectrum playback, in CPU cycles.
pub const PLAYBACK_DWELL_CYCLES: u32 = 500_000;

/// Pause after announcing a spectrum on the display, in CPU cycles.
pub const SPECTRUM_INTRO_CYCLES: u32 = 50_000;

/// Converts a cycle count at `clock_hz` to microseconds, rounding down.
pub const fn cycles_to_us(cycles: u32, clock_hz: u32) -> u32 {
    if clock_hz == 0 {
        return 0;
    }
    ((cycles as u64 * 1_000_000) / clock_hz as u64) as u32
}

/// Playback dwell at the reference clock.
pub const PLAYBACK_DWELL_US: u32 = cycles_to_us(PLAYBACK_DWELL_CYCLES, CPU_CLOCK_HZ);

/// Spectrum intro pause at the reference clock.
pub const SPECTRUM_INTRO_US: u32 = cycles_to_us(SPECTRUM_INTRO_CYCLES, CPU_CLOCK_HZ);

/// Validated timing and calibration settings for the colour sampler.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SamplerConfig {
    window_ticks: u16,
    tick_period_us: u32,
    settle_us: u32,
    poll_interval_us: u32,
    calibration: Calibration,
}

impl SamplerConfig {
    /// Creates a builder seeded with the default constants.
    pub fn builder() -> SamplerConfigBuilder {
        SamplerConfigBuilder::new()
    }

    /// Timer ticks per measurement window.
    pub fn window_ticks(&self) -> u16 {
        self.window_ticks
    }

    /// Measurement timer tick period in microseconds.
    pub fn tick_period_us(&self) -> u32 {
        self.tick_period_us
    }

    /// Illumination settle delay in microseconds.
    pub fn settle_us(&self) -> u32 {
        self.settle_us
    }

    /// Busy-poll interval in microseconds.
    pub fn poll_interval_us(&self) -> u32 {
        self.poll_interval_us
    }

    /// Per-channel calibration divisors.
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Upper bound on window-closed polls for one phase.
    ///
    /// Twice the nominal window length, plus one poll. A window still open
    /// after this many polls means the tick interrupt has stopped.
    pub fn max_polls(&self) -> u32 {
        let window_us = self.window_ticks as u64 * self.tick_period_us as u64;
        let polls = (2 * window_us).div_ceil(self.poll_interval_us as u64) + 1;
        polls.min(u32::MAX as u64) as u32
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            window_ticks: WINDOW_TICKS,
            tick_period_us: TICK_PERIOD_US,
            settle_us: SETTLE_DELAY_US,
            poll_interval_us: POLL_INTERVAL_US,
            calibration: Calibration::DEFAULT,
        }
    }
}

/// Builder for validated [`SamplerConfig`] values.
#[derive(Debug)]
pub struct SamplerConfigBuilder {
    config: SamplerConfig,
}

impl SamplerConfigBuilder {
    /// Creates a builder with default timing and calibration.
    pub fn new() -> Self {
        Self {
            config: SamplerConfig::default(),
        }
    }

    /// Sets the measurement window length in ticks.
    pub fn window_ticks(mut self, ticks: u16) -> Self {
        self.config.window_ticks = ticks;
        self
    }

    /// Sets the tick period the window timer runs at.
    pub fn tick_period_us(mut self, us: u32) -> Self {
        self.config.tick_period_us = us;
        self
    }

    /// Sets the illumination settle delay. Zero disables settling.
    pub fn settle_us(mut self, us: u32) -> Self {
        self.config.settle_us = us;
        self
    }

    /// Sets the busy-poll interval.
    pub fn poll_interval_us(mut self, us: u32) -> Self {
        self.config.poll_interval_us = us;
        self
    }

    /// Sets the calibration divisors.
    pub fn calibration(mut self, calibration: Calibration) -> Self {
        self.config.calibration = calibration;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    /// * `ZeroWindow` - Window length is zero
    /// * `ZeroTickPeriod` - Tick period is zero
    /// * `ZeroPollInterval` - Poll interval is zero
    /// * `InvalidCoefficient` - A calibration divisor is not positive and finite
    pub fn build(self) -> Result<SamplerConfig, ConfigError> {
        let config = self.config;

        if config.window_ticks == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if config.tick_period_us == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        if config.poll_interval_us == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        config.calibration.validate()?;

        Ok(config)
    }
}

impl Default for SamplerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
