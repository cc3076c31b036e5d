//! Command-based control of the detector.
//!
//! [`Controller`] sequences the sampler, the spectrum player, the light
//! sensor and a two-line text display in response to [`DeviceAction`]s, the
//! way the front-panel buttons drive the demo.

use crate::classifier::{ColourLabel, classify};
use crate::light::{LightScale, LightSensor, planet_detected};
use crate::pwm::RgbLed;
use crate::sampler::ColourSampler;
use crate::spectrum::SpectrumPlayer;
use crate::types::ColourSample;
use crate::config::SPECTRUM_INTRO_US;
use core::fmt::Write;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use heapless::String;

/// Trait for the two-line character display.
pub trait TextDisplay {
    /// Clears the display and writes one string per line.
    fn show(&mut self, line1: &str, line2: &str);
}

/// Trait for anything that can take a calibrated colour sample.
pub trait ColourDetector {
    /// Runs a full measurement and returns the sample.
    fn detect(&mut self) -> ColourSample;
}

impl<'t, A: OutputPin, B: OutputPin, D: DelayNs> ColourDetector for ColourSampler<'t, A, B, D> {
    fn detect(&mut self) -> ColourSample {
        ColourSampler::detect(self)
    }
}

/// Actions for controlling the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceAction {
    /// Sample and classify the target colour.
    DetectColour,
    /// Play every gas spectrum in the table.
    PlaySpectra,
    /// Read ambient light as a percentage.
    MeasureLight,
}

/// Result of a handled action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionOutcome {
    /// A colour was sampled and classified.
    Colour {
        sample: ColourSample,
        label: ColourLabel,
    },
    /// Spectra were played; holds how many.
    SpectraPlayed(usize),
    /// Playback was refused because no planet is detected.
    NoPlanet,
    /// Light level in percent.
    Light(u8),
}

/// Drives the detector components in response to actions.
///
/// # Type Parameters
/// * `'a` - Lifetime of the spectrum table
/// * `C` - Colour detector
/// * `L` - RGB LED used for playback
/// * `D` - Delay used for playback
/// * `S` - Light sensor
/// * `X` - Text display
pub struct Controller<'a, C, L, D, S, X>
where
    C: ColourDetector,
    L: RgbLed,
    D: DelayNs,
    S: LightSensor,
    X: TextDisplay,
{
    detector: C,
    player: SpectrumPlayer<'a, L, D>,
    light: S,
    display: X,
    scale: LightScale,
    intro_us: u32,
    require_planet: bool,
    last_label: Option<ColourLabel>,
}

impl<'a, C, L, D, S, X> Controller<'a, C, L, D, S, X>
where
    C: ColourDetector,
    L: RgbLed,
    D: DelayNs,
    S: LightSensor,
    X: TextDisplay,
{
    /// Creates a controller with the default light scale and no planet gate.
    pub fn new(detector: C, player: SpectrumPlayer<'a, L, D>, light: S, display: X) -> Self {
        Self {
            detector,
            player,
            light,
            display,
            scale: LightScale::DEFAULT,
            intro_us: SPECTRUM_INTRO_US,
            require_planet: false,
            last_label: None,
        }
    }

    /// Sets the light scale used for percentages.
    pub fn with_light_scale(mut self, scale: LightScale) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the pause after each spectrum announcement.
    pub fn with_intro_us(mut self, intro_us: u32) -> Self {
        self.intro_us = intro_us;
        self
    }

    /// Only play spectra once a planet has been detected.
    pub fn require_planet(mut self, require: bool) -> Self {
        self.require_planet = require;
        self
    }

    /// Handles an action by dispatching to the matching operation.
    pub fn handle_action(&mut self, action: DeviceAction) -> ActionOutcome {
        debug!("handling {}", action);
        match action {
            DeviceAction::DetectColour => {
                let (sample, label) = self.detect_colour();
                ActionOutcome::Colour { sample, label }
            }
            DeviceAction::PlaySpectra => self.play_spectra(),
            DeviceAction::MeasureLight => ActionOutcome::Light(self.measure_light()),
        }
    }

    /// Samples, classifies and shows the detected colour.
    pub fn detect_colour(&mut self) -> (ColourSample, ColourLabel) {
        self.display.show("Observing", "Colour");
        let sample = self.detector.detect();
        let label = classify(&sample);
        self.last_label = Some(label);
        self.display.show("Detected Colour:", label.as_str());
        (sample, label)
    }

    /// Plays every spectrum in the table, announcing each on the display.
    pub fn play_spectra(&mut self) -> ActionOutcome {
        if self.require_planet && !self.planet_detected() {
            info!("no planet detected, skipping playback");
            self.display.show("No Planet", "Found");
            self.player.off();
            return ActionOutcome::NoPlanet;
        }

        let table = self.player.table();
        for (index, spectrum) in table.iter().enumerate() {
            let mut line2: String<16> = String::new();
            let _ = write!(line2, " Spectrum {}", index + 1);
            self.display.show("Emission", &line2);

            self.player.hold(self.intro_us);
            self.player.play_spectrum(spectrum);
            self.player.off();
        }
        self.display.show("", "");
        ActionOutcome::SpectraPlayed(table.len())
    }

    /// Reads the light sensor and shows the percentage.
    pub fn measure_light(&mut self) -> u8 {
        let percent = self.scale.percentage(self.light.read_raw());

        let mut line2: String<8> = String::new();
        let _ = write!(line2, " {}%", percent);
        self.display.show("Light Intensity:", &line2);
        percent
    }

    /// Applies the planet rule to a fresh light reading and the last colour.
    pub fn planet_detected(&mut self) -> bool {
        let percent = self.scale.percentage(self.light.read_raw());
        let label = self.last_label.unwrap_or(ColourLabel::Unknown);
        planet_detected(percent, label)
    }

    /// Label from the most recent colour detection.
    pub fn last_label(&self) -> Option<ColourLabel> {
        self.last_label
    }

    /// Releases the components.
    pub fn release(self) -> (C, SpectrumPlayer<'a, L, D>, S, X) {
        (self.detector, self.player, self.light, self.display)
    }
}
