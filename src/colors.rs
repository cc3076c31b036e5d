//! Emission-line colours and duty-cycle conversion helpers.
//!
//! Colours are raw duty triples (`Srgb<u16>`) exactly as they are written to
//! the render engine. The red component drives the hardware compare channel
//! and saturates at that channel's maximum, so several entries use red values
//! far above the green/blue range to force the red LED fully on.

use palette::Srgb;

/// A raw `(red, green, blue)` duty-cycle triple.
pub type Colour = Srgb<u16>;

pub const LILAC: Colour = Srgb::new(800, 20, 840);
pub const PURPLE: Colour = Srgb::new(8000, 10, 255);
pub const LIGHT_BLUE: Colour = Srgb::new(0, 50, 200);
pub const PURE_BLUE: Colour = Srgb::new(0, 0, 255);
pub const CYAN: Colour = Srgb::new(0, 255, 255);
pub const TURQUOISE: Colour = Srgb::new(0, 255, 50);
pub const PURE_GREEN: Colour = Srgb::new(0, 255, 0);
pub const LIME_GREEN: Colour = Srgb::new(5000, 190, 0);
pub const YELLOW: Colour = Srgb::new(8000, 100, 0);
pub const ORANGE: Colour = Srgb::new(5000, 25, 0);
pub const PINK: Colour = Srgb::new(8000, 10, 200);
pub const PURE_RED: Colour = Srgb::new(255, 0, 0);
pub const OFF: Colour = Srgb::new(0, 0, 0);

/// Converts a floating-point colour (0.0-1.0 per channel) to duty values.
///
/// Each component is clamped to 0.0-1.0 and scaled to `max_duty`.
#[inline]
pub fn duty_from_srgb(color: Srgb, max_duty: u16) -> Colour {
    Srgb::new(
        float_to_duty(color.red, max_duty),
        float_to_duty(color.green, max_duty),
        float_to_duty(color.blue, max_duty),
    )
}

fn float_to_duty(value: f32, max_duty: u16) -> u16 {
    let value_clamped = value.clamp(0.0, 1.0);
    (value_clamped * max_duty as f32) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duty_from_srgb_scales_to_max() {
        let duty = duty_from_srgb(Srgb::new(1.0, 0.5, 0.0), 255);
        assert_eq!(duty, Srgb::new(255, 127, 0));
    }

    #[test]
    fn duty_from_srgb_clamps_out_of_range() {
        let duty = duty_from_srgb(Srgb::new(2.0, -1.0, 1.0), 100);
        assert_eq!(duty, Srgb::new(100, 0, 100));
    }
}
