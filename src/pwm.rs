//! Hybrid hardware/software PWM for the RGB indicator.
//!
//! The red channel runs on a hardware compare timer and is reprogrammed
//! directly by [`RgbIndicator::set_duty_cycles`]. Green and blue are plain
//! GPIOs toggled by [`SoftPwm::tick`] from a periodic timer interrupt, which
//! compares a free-running phase counter against the targets stored in a
//! shared [`DutyTargets`].
//!
//! Targets are written and read as one whole triple inside a critical section,
//! so the tick never observes a half-applied colour. A target change part way
//! through a PWM period affects only the remainder of that period.

use crate::colors::{Colour, OFF};
use crate::types::ConfigError;
use core::cell::Cell;
use critical_section::Mutex;
use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::pwm::SetDutyCycle;

/// Trait for anything that renders duty-cycle triples on an RGB LED.
///
/// Implementations handle hardware errors internally; this method cannot fail.
pub trait RgbLed {
    /// Applies a new `(red, green, blue)` duty-cycle target.
    fn set_duty_cycles(&mut self, colour: Colour);
}

impl<L: RgbLed + ?Sized> RgbLed for &mut L {
    fn set_duty_cycles(&mut self, colour: Colour) {
        (**self).set_duty_cycles(colour);
    }
}

/// Duty-cycle targets shared between the application and the PWM tick.
///
/// Intended to live in a `static`.
pub struct DutyTargets {
    targets: Mutex<Cell<Colour>>,
    period: u16,
}

impl DutyTargets {
    /// Creates all-off targets for a software PWM period of `period` ticks.
    ///
    /// # Panics
    /// Panics if `period` is zero.
    pub const fn new(period: u16) -> Self {
        assert!(period > 0, "PWM period must be non-zero");
        Self {
            targets: Mutex::new(Cell::new(OFF)),
            period,
        }
    }

    /// Creates all-off targets, rejecting a zero period.
    pub fn try_new(period: u16) -> Result<Self, ConfigError> {
        if period == 0 {
            return Err(ConfigError::ZeroPwmPeriod);
        }
        Ok(Self::new(period))
    }

    /// Software PWM period in ticks.
    #[inline]
    pub fn period(&self) -> u16 {
        self.period
    }

    /// Replaces the whole target triple in one step.
    pub fn store(&self, colour: Colour) {
        critical_section::with(|cs| self.targets.borrow(cs).set(colour));
    }

    /// Reads the whole target triple in one step.
    pub fn load(&self) -> Colour {
        critical_section::with(|cs| self.targets.borrow(cs).get())
    }
}

/// Application-side handle to the RGB indicator.
///
/// Owns the red hardware PWM channel and writes green/blue targets for the
/// software renderer.
pub struct RgbIndicator<'t, R: SetDutyCycle> {
    red: R,
    targets: &'t DutyTargets,
}

impl<'t, R: SetDutyCycle> RgbIndicator<'t, R> {
    /// Creates an indicator and turns every channel off.
    pub fn new(red: R, targets: &'t DutyTargets) -> Self {
        let mut indicator = Self { red, targets };
        indicator.set_duty_cycles(OFF);
        indicator
    }

    /// Clamps `colour` to what each channel can render.
    ///
    /// Red is limited to the hardware channel's maximum duty (fully on).
    /// Green and blue are limited to `period - 1`.
    pub fn clamp(&self, colour: Colour) -> Colour {
        let soft_max = self.targets.period() - 1;
        Colour::new(
            colour.red.min(self.red.max_duty_cycle()),
            colour.green.min(soft_max),
            colour.blue.min(soft_max),
        )
    }

    /// Returns the targets currently visible to the software renderer.
    pub fn current(&self) -> Colour {
        self.targets.load()
    }

    /// Releases the red PWM channel.
    pub fn release(self) -> R {
        self.red
    }
}

impl<'t, R: SetDutyCycle> RgbLed for RgbIndicator<'t, R> {
    fn set_duty_cycles(&mut self, colour: Colour) {
        let clamped = self.clamp(colour);

        // Takes effect at the next hardware period boundary.
        if self.red.set_duty_cycle(clamped.red).is_err() {
            warn!("red compare update failed");
        }
        self.targets.store(clamped);

        trace!(
            "duty targets r={} g={} b={}",
            clamped.red,
            clamped.green,
            clamped.blue
        );
    }
}

/// Software PWM renderer for the green and blue channels.
///
/// Call [`tick`](Self::tick) from the periodic timer interrupt.
pub struct SoftPwm<'t, G: OutputPin, B: OutputPin> {
    green: G,
    blue: B,
    targets: &'t DutyTargets,
    phase: u16,
}

impl<'t, G: OutputPin, B: OutputPin> SoftPwm<'t, G, B> {
    /// Creates a renderer with both outputs driven low.
    pub fn new(mut green: G, mut blue: B, targets: &'t DutyTargets) -> Self {
        drive(&mut green, false);
        drive(&mut blue, false);
        Self {
            green,
            blue,
            targets,
            phase: 0,
        }
    }

    /// Advances the phase counter and updates both outputs.
    ///
    /// Returns the `(green, blue)` levels driven on this tick.
    pub fn tick(&mut self) -> (bool, bool) {
        let period = self.targets.period();
        self.phase = (self.phase + 1) % period;

        let duty = self.targets.load();
        let green_on = self.phase < duty.green;
        let blue_on = self.phase < duty.blue;

        drive(&mut self.green, green_on);
        drive(&mut self.blue, blue_on);

        (green_on, blue_on)
    }

    /// Phase counter value after the most recent tick.
    pub fn phase(&self) -> u16 {
        self.phase
    }

    /// Releases the green and blue output pins.
    pub fn release(self) -> (G, B) {
        (self.green, self.blue)
    }
}

fn drive<P: OutputPin>(pin: &mut P, on: bool) {
    if pin.set_state(PinState::from(on)).is_err() {
        warn!("PWM output pin write failed");
    }
}
