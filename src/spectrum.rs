//! Gas emission spectra and their playback on the RGB indicator.

use crate::colors::{
    Colour, CYAN, LIGHT_BLUE, LIME_GREEN, OFF, ORANGE, PURE_BLUE, PURE_GREEN, PURE_RED, PURPLE,
    TURQUOISE, YELLOW,
};
use crate::config::PLAYBACK_DWELL_US;
use crate::pwm::RgbLed;
use embedded_hal::delay::DelayNs;

/// A gas name and its characteristic emission lines in display order.
#[derive(Debug, Clone, Copy)]
pub struct GasSpectrum<'a> {
    name: &'a str,
    colours: &'a [Colour],
}

impl<'a> GasSpectrum<'a> {
    /// Creates a spectrum entry.
    pub const fn new(name: &'a str, colours: &'a [Colour]) -> Self {
        Self { name, colours }
    }

    /// Gas name, matched exactly by [`SpectrumPlayer::play`].
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Emission colours in playback order.
    pub fn colours(&self) -> &'a [Colour] {
        self.colours
    }

    /// Number of emission colours.
    pub fn len(&self) -> usize {
        self.colours.len()
    }

    /// Returns `true` if the spectrum has no colours.
    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }
}

/// Built-in spectra, in the order they are presented.
pub static GAS_SPECTRA: &[GasSpectrum<'static>] = &[
    GasSpectrum::new("Hydrogen", &[PURPLE, PURE_BLUE, CYAN, PURE_RED]),
    GasSpectrum::new(
        "Helium",
        &[
            PURPLE, PURE_BLUE, LIGHT_BLUE, CYAN, TURQUOISE, PURE_GREEN, YELLOW, ORANGE, PURE_RED,
        ],
    ),
    GasSpectrum::new(
        "Nitrogen",
        &[PURPLE, TURQUOISE, PURE_GREEN, LIME_GREEN, YELLOW, ORANGE, PURE_RED],
    ),
];

/// Finds the first spectrum named exactly `name` (case-sensitive).
pub fn find<'a>(table: &'a [GasSpectrum<'a>], name: &str) -> Option<&'a GasSpectrum<'a>> {
    table.iter().find(|spectrum| spectrum.name == name)
}

/// Plays gas spectra on an RGB LED, one colour per dwell period.
///
/// Playback is blocking and is not interrupted once started.
pub struct SpectrumPlayer<'a, L: RgbLed, D: DelayNs> {
    led: L,
    delay: D,
    table: &'a [GasSpectrum<'a>],
    dwell_us: u32,
}

impl<'a, L: RgbLed, D: DelayNs> SpectrumPlayer<'a, L, D> {
    /// Creates a player over `table` with the default dwell.
    pub fn new(led: L, delay: D, table: &'a [GasSpectrum<'a>]) -> Self {
        Self {
            led,
            delay,
            table,
            dwell_us: PLAYBACK_DWELL_US,
        }
    }

    /// Overrides the per-colour dwell.
    pub fn with_dwell_us(mut self, dwell_us: u32) -> Self {
        self.dwell_us = dwell_us;
        self
    }

    /// Plays the spectrum named `name`.
    ///
    /// Each colour is applied and held for the dwell before the next.
    /// Returns the number of colours played, or `None` when no spectrum has
    /// that name, in which case the LED is left untouched.
    pub fn play(&mut self, name: &str) -> Option<usize> {
        let Some(spectrum) = find(self.table, name) else {
            debug!("no spectrum named {}", name);
            return None;
        };

        Some(self.play_spectrum(spectrum))
    }

    /// Plays one spectrum entry and returns the number of colours played.
    pub fn play_spectrum(&mut self, spectrum: &GasSpectrum<'_>) -> usize {
        info!("playing {} ({} lines)", spectrum.name, spectrum.len());
        for colour in spectrum.colours {
            self.led.set_duty_cycles(*colour);
            self.delay.delay_us(self.dwell_us);
        }
        spectrum.len()
    }

    /// Applies a single colour immediately.
    pub fn set_colour(&mut self, colour: Colour) {
        self.led.set_duty_cycles(colour);
    }

    /// Turns the LED off.
    pub fn off(&mut self) {
        self.set_colour(OFF);
    }

    /// Blocks for `us` microseconds without changing the LED.
    pub fn hold(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    /// The spectrum table this player reads from.
    pub fn table(&self) -> &'a [GasSpectrum<'a>] {
        self.table
    }

    /// Per-colour dwell in microseconds.
    pub fn dwell_us(&self) -> u32 {
        self.dwell_us
    }

    /// Releases the LED and delay.
    pub fn release(self) -> (L, D) {
        (self.led, self.delay)
    }
}
