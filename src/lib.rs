#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`SenseChannel`**: Pulse counter and measurement window shared with the edge and timer interrupts
//! - **`ColourSampler`**: Runs the red/green/blue measurement and returns a calibrated `ColourSample`
//! - **`Calibration`**: Per-channel divisors converting pulse counts to 0-255 intensities
//! - **`classify`**: Maps a `ColourSample` to a `ColourLabel` by fixed thresholds
//! - **`DutyTargets`**: Duty-cycle triple shared between application code and the PWM tick
//! - **`RgbIndicator`**: Application-side handle; hardware PWM for red, targets for green/blue
//! - **`SoftPwm`**: Timer-interrupt renderer for the software green/blue channels
//! - **`RgbLed`**: Trait for anything that accepts duty-cycle triples
//! - **`SpectrumPlayer`**: Plays a named gas spectrum colour by colour
//! - **`Controller`**: Dispatches `DeviceAction`s across the components
//!
//! Hardware is reached through `embedded-hal` 1.0 traits (`OutputPin`,
//! `SetDutyCycle`, `DelayNs`). Interrupt-shared state uses `critical-section`,
//! so the crate runs on any target with a critical-section implementation.

mod fmt;

pub mod types;
pub mod config;
pub mod calibration;
pub mod colors;
pub mod sense;
pub mod sampler;
pub mod classifier;
pub mod pwm;
pub mod spectrum;
pub mod light;
pub mod command;

pub use palette::Srgb;

pub use types::{ColourChannel, ColourSample, ConfigError};
pub use config::{SamplerConfig, SamplerConfigBuilder};
pub use calibration::{Calibration, calibrate};
pub use colors::Colour;
pub use sense::{MeasurementWindow, PulseCounter, SenseChannel, WindowState};
pub use sampler::{ColourSampler, Illumination, IlluminationState, SamplerState};
pub use classifier::{ColourLabel, classify};
pub use pwm::{DutyTargets, RgbIndicator, RgbLed, SoftPwm};
pub use spectrum::{GAS_SPECTRA, GasSpectrum, SpectrumPlayer};
pub use light::{LightScale, LightSensor, planet_detected};
pub use command::{ActionOutcome, ColourDetector, Controller, DeviceAction, TextDisplay};

pub const COLOUR_OFF: Colour = colors::OFF;
