//! Color constants for the ventilator panel.
//!
//! The panel uses the Solarized palette (<https://ethanschoonover.com/solarized/>)
//! converted to Rgb565. Values are written as raw 5/6/5 channel triples so they
//! map one-to-one onto the 16-bit words sent to the display controller.
//!
//! | Name | RGB24 | Rgb565 (r, g, b) |
//! |------|-------|------------------|
//! | `BASE03` | #002b36 | (0, 10, 6) |
//! | `BASE3` | #fdf6e3 | (31, 61, 28) |
//! | `MAGENTA` | #d33682 | (26, 13, 16) |
//! | `CYAN` | #2aa198 | (5, 40, 19) |

use embedded_graphics::pixelcolor::Rgb565;

// =============================================================================
// Solarized Base Tones
// =============================================================================

/// Darkest background tone. Screen background and erase color.
pub const BASE03: Rgb565 = Rgb565::new(0, 10, 6);

/// Muted content tone. Used for the footer log line.
pub const BASE00: Rgb565 = Rgb565::new(12, 30, 16);

/// Lightest tone. Dial face color.
pub const BASE3: Rgb565 = Rgb565::new(31, 61, 28);

// =============================================================================
// Solarized Accents
// =============================================================================

/// Ventilation mode indicator.
pub const ORANGE: Rgb565 = Rgb565::new(25, 18, 2);

/// Out-of-range error glyphs.
pub const RED: Rgb565 = Rgb565::new(27, 12, 5);

/// Target needle and target value text.
pub const MAGENTA: Rgb565 = Rgb565::new(26, 13, 16);

/// Dial labels.
pub const BLUE: Rgb565 = Rgb565::new(4, 34, 26);

/// Current (measured) needle and value text.
pub const CYAN: Rgb565 = Rgb565::new(5, 40, 19);

// =============================================================================
// Gauge Palette
// =============================================================================

/// Role-to-color assignment used by the gauge renderer.
///
/// The renderer only ever paints with these seven roles, so swapping the
/// palette re-themes every dial without touching drawing code.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Palette {
    /// Screen background. Text and glyphs are erased by painting in this color.
    pub back: Rgb565,
    /// Dial label text.
    pub label: Rgb565,
    /// Dial face. Needles are erased by painting in this color.
    pub face: Rgb565,
    /// Target needle and value.
    pub target: Rgb565,
    /// Current needle and value.
    pub current: Rgb565,
    /// Error glyph.
    pub error: Rgb565,
    /// Mode indicator.
    pub mode: Rgb565,
}

impl Palette {
    /// Solarized dark panel theme.
    pub const SOLARIZED: Self = Self {
        back: BASE03,
        label: BLUE,
        face: BASE3,
        target: MAGENTA,
        current: CYAN,
        error: RED,
        mode: ORANGE,
    };
}

impl Default for Palette {
    fn default() -> Self { Self::SOLARIZED }
}
