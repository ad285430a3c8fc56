//! Fonts and text alignment used on the panel.
//!
//! The display capability selects fonts by role ([`FontKind`]) rather than by
//! font reference, so a recording test surface can compare them and a
//! different panel can remap roles without touching the renderer.

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::text::{Alignment, Baseline, TextStyle, TextStyleBuilder};
use profont::{PROFONT_12_POINT, PROFONT_14_POINT, PROFONT_18_POINT, PROFONT_24_POINT};

/// Centered on the alphabetic baseline. All panel text is positioned this way.
pub const CENTERED: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Alphabetic)
    .build();

/// Left-aligned text. Used for the footer log line.
pub const LEFT_ALIGNED: TextStyle = TextStyleBuilder::new().alignment(Alignment::Left).build();

/// Font role.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontKind {
    /// Footer and status text.
    #[default]
    Small,
    /// Dial labels.
    SmallBold,
    /// Current (measured) values.
    Large,
    /// Target values and error glyphs.
    LargeBold,
}

impl FontKind {
    /// `ProFont` face for this role. `ProFont` has no bold cut, so emphasis is size.
    pub const fn font(self) -> &'static MonoFont<'static> {
        match self {
            Self::Small => &PROFONT_12_POINT,
            Self::SmallBold => &PROFONT_14_POINT,
            Self::Large => &PROFONT_18_POINT,
            Self::LargeBold => &PROFONT_24_POINT,
        }
    }
}
