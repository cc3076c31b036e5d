//! Threshold classification of colour samples.

use crate::types::ColourSample;

/// Intensity a channel must strictly exceed (or stay strictly below) to count.
pub const INTENSITY_THRESHOLD: u8 = 100;

/// Discrete colour recognised from a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColourLabel {
    Red,
    Blue,
    White,
    /// Anything else, including samples sitting exactly on the threshold.
    Unknown,
}

impl ColourLabel {
    /// Display text for the label.
    pub fn as_str(self) -> &'static str {
        match self {
            ColourLabel::Red => "Red",
            ColourLabel::Blue => "Blue",
            ColourLabel::White => "White",
            ColourLabel::Unknown => "Unknown",
        }
    }

    /// Returns `true` for the colours that count towards a planet detection.
    pub fn is_planet_colour(self) -> bool {
        !matches!(self, ColourLabel::Unknown)
    }
}

impl core::fmt::Display for ColourLabel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a sample against [`INTENSITY_THRESHOLD`].
///
/// Comparisons are strict in both directions. Ambiguous samples are
/// `Unknown`; there is no nearest-match fallback.
pub fn classify(sample: &ColourSample) -> ColourLabel {
    let t = INTENSITY_THRESHOLD;
    let (r, g, b) = (sample.red, sample.green, sample.blue);

    if r > t && g < t && b < t {
        ColourLabel::Red
    } else if b > t && r < t && g < t {
        ColourLabel::Blue
    } else if r > t && g > t && b > t {
        ColourLabel::White
    } else {
        ColourLabel::Unknown
    }
}
