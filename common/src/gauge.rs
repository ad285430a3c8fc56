//! Per-gauge state: layout, target/current branches and painted snapshots.
//!
//! # Three-Slot Snapshots
//!
//! Every renderable element (needle, value text) is tracked as a [`Snapshot`]:
//!
//! | Slot | Meaning |
//! |------|---------|
//! | `live` | Freshly computed from the gauge values this tick |
//! | `shown` | What is on screen right now (`None` = nothing painted) |
//! | `previous` | What was on screen when this tick started |
//!
//! The renderer only paints when `live` differs from `previous`, and
//! [`Gauge::end_tick`] rolls `shown` into `previous`. This is what keeps an
//! idle panel at zero bus traffic.

use core::fmt;
use core::fmt::Write;

use embedded_graphics::prelude::Point;
use heapless::String;
#[allow(unused_imports)]
use micromath::F32Ext;

use crate::config::{FACE_RADIUS, HOLE_RADIUS};
use crate::geometry::{Needle, angle_of, build_needle};
use crate::range::{RangeState, RangeTracker};

/// Capacity of a formatted value string.
pub const VALUE_TEXT_LEN: usize = 12;

/// Highest supported display precision (digits after the decimal point).
pub const MAX_PRECISION: usize = 4;

/// Formatted numeric readout.
pub type ValueText = String<VALUE_TEXT_LEN>;

/// Format `value` with `precision` fractional digits.
///
/// Returns `None` if the text does not fit in [`VALUE_TEXT_LEN`].
pub fn try_format_value(
    value: f32,
    precision: usize,
) -> Option<ValueText> {
    let mut s = ValueText::new();
    write!(s, "{value:.precision$}").ok()?;
    Some(s)
}

/// Format `value` with `precision` fractional digits, empty if too wide.
///
/// [`GaugeConfig::validate`] guarantees every in-range value fits.
pub fn format_value(
    value: f32,
    precision: usize,
) -> ValueText {
    try_format_value(value, precision).unwrap_or_default()
}

// =============================================================================
// Configuration
// =============================================================================

/// Face cutout wedge at the bottom of a dial, painted in background color.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Cutout {
    pub start_x: i32,
    pub mid_x: i32,
    pub end_x: i32,
    /// Apex of the wedge.
    pub upper_y: i32,
    /// Base of the wedge, just below the face.
    pub lower_y: i32,
}

/// Immutable identity and layout of one dial.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct GaugeConfig {
    pub label: &'static str,
    /// Dial center and needle pivot.
    pub origin: Point,
    pub min: f32,
    pub max: f32,
    /// Step used by position and direction input.
    pub increment: f32,
    /// Fractional digits in value readouts.
    pub precision: usize,
    pub face_radius: u32,
    pub hole_radius: u32,
    pub label_pos: Point,
    pub target_pos: Point,
    pub current_pos: Point,
    pub error_pos: Point,
    pub cutout: Cutout,
    /// Glyph shown while the gauge is over range.
    pub error_upper: &'static str,
    /// Glyph shown while the gauge is under range.
    pub error_lower: &'static str,
}

impl GaugeConfig {
    /// Build a configuration with the standard dial layout around `origin`.
    ///
    /// Text positions are horizontal centers on the text baseline.
    pub const fn new(
        label: &'static str,
        origin: Point,
        min: f32,
        max: f32,
        increment: f32,
        precision: usize,
    ) -> Self {
        let x = origin.x;
        let y = origin.y;
        let r = FACE_RADIUS as i32;
        Self {
            label,
            origin,
            min,
            max,
            increment,
            precision,
            face_radius: FACE_RADIUS,
            hole_radius: HOLE_RADIUS,
            label_pos: Point::new(x, y + r - 4),
            target_pos: Point::new(x, y + 2),
            current_pos: Point::new(x, y + 28),
            error_pos: Point::new(x, y + 12),
            cutout: Cutout {
                start_x: x - 34,
                mid_x: x,
                end_x: x + 34,
                upper_y: y + r - 30,
                lower_y: y + r + 2,
            },
            error_upper: "HIGH",
            error_lower: "LOW",
        }
    }

    /// Inner radius of the needle ring, one pixel clear of the hole.
    #[inline]
    pub const fn needle_inner_radius(&self) -> u32 { self.hole_radius + 1 }

    /// Outer radius of the needle ring, one pixel inside the face edge.
    #[inline]
    pub const fn needle_outer_radius(&self) -> u32 { self.face_radius - 1 }

    /// Check the preconditions the renderer relies on.
    pub fn validate(&self) -> Result<(), GaugeError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(GaugeError::NonFiniteBound);
        }
        if self.min >= self.max {
            return Err(GaugeError::EmptyRange);
        }
        if !self.increment.is_finite() || self.increment <= 0.0 {
            return Err(GaugeError::InvalidIncrement);
        }
        if self.precision > MAX_PRECISION {
            return Err(GaugeError::PrecisionTooLarge);
        }
        if self.hole_radius >= self.face_radius {
            return Err(GaugeError::InvalidRadii);
        }
        // The widest in-range readout is one of the bounds
        if try_format_value(self.min, self.precision).is_none()
            || try_format_value(self.max, self.precision).is_none()
        {
            return Err(GaugeError::ValueTooWide);
        }
        Ok(())
    }
}

/// Rejected gauge configuration.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GaugeError {
    /// `min` or `max` is NaN or infinite.
    NonFiniteBound,
    /// `min >= max`.
    EmptyRange,
    /// Step is zero, negative or not finite.
    InvalidIncrement,
    /// More fractional digits than [`MAX_PRECISION`].
    PrecisionTooLarge,
    /// Hole radius does not leave a ring for the needles.
    InvalidRadii,
    /// A bound does not fit in a value readout.
    ValueTooWide,
}

impl fmt::Display for GaugeError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let msg = match self {
            Self::NonFiniteBound => "gauge bounds must be finite",
            Self::EmptyRange => "gauge min must be below max",
            Self::InvalidIncrement => "gauge increment must be positive and finite",
            Self::PrecisionTooLarge => "gauge precision too large for value text",
            Self::InvalidRadii => "gauge hole radius must be below face radius",
            Self::ValueTooWide => "gauge bounds too wide for value text",
        };
        f.write_str(msg)
    }
}

// =============================================================================
// Snapshots
// =============================================================================

/// Live / shown / previously shown copies of one renderable element.
#[derive(Clone, PartialEq, Debug)]
pub struct Snapshot<T> {
    live: T,
    shown: Option<T>,
    previous: Option<T>,
}

impl<T: Clone + PartialEq> Snapshot<T> {
    /// Start with `live` computed and nothing on screen.
    pub const fn new(live: T) -> Self {
        Self {
            live,
            shown: None,
            previous: None,
        }
    }

    #[inline]
    pub const fn live(&self) -> &T { &self.live }

    #[inline]
    pub const fn shown(&self) -> Option<&T> { self.shown.as_ref() }

    #[inline]
    pub const fn previous(&self) -> Option<&T> { self.previous.as_ref() }

    pub fn set_live(
        &mut self,
        live: T,
    ) {
        self.live = live;
    }

    /// True when the live value differs from what was on screen at tick start.
    #[inline]
    pub fn is_dirty(&self) -> bool { self.previous.as_ref() != Some(&self.live) }

    /// Record that the live value is now on screen.
    pub fn mark_shown(&mut self) { self.shown = Some(self.live.clone()); }

    /// Record that the element was erased.
    pub fn clear_shown(&mut self) { self.shown = None; }

    /// Roll `shown` into `previous` for the next tick.
    pub fn advance(&mut self) { self.previous.clone_from(&self.shown); }

    /// Forget everything painted (the area underneath was repainted).
    pub fn invalidate(&mut self) {
        self.shown = None;
        self.previous = None;
    }
}

// =============================================================================
// Branches
// =============================================================================

/// Which of a gauge's two values an operation applies to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Commanded value set by the operator.
    Target,
    /// Measured value reported by the peripheral or a sensor.
    Current,
}

/// Step direction for increment-based input.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Down,
    #[default]
    Hold,
    Up,
}

impl Direction {
    /// Direction of an encoder delta: positive is `Up`, negative `Down`, zero `Hold`.
    pub const fn from_delta(delta: i32) -> Self {
        if delta > 0 {
            Self::Up
        } else if delta < 0 {
            Self::Down
        } else {
            Self::Hold
        }
    }
}

/// One value of a gauge with its derived angle and painted elements.
#[derive(Clone, PartialEq, Debug)]
pub struct Branch {
    pub(crate) value: f32,
    pub(crate) angle: f32,
    pub(crate) position: i32,
    pub(crate) needle: Snapshot<Needle>,
    pub(crate) text: Snapshot<ValueText>,
}

impl Branch {
    fn new(
        config: &GaugeConfig,
        value: f32,
    ) -> Self {
        let angle = angle_of(config, value);
        let needle = build_needle(
            config.origin,
            angle,
            config.needle_inner_radius(),
            config.needle_outer_radius(),
        );
        Self {
            value,
            angle,
            position: 0,
            needle: Snapshot::new(needle),
            text: Snapshot::new(format_value(value, config.precision)),
        }
    }

    #[inline]
    pub const fn value(&self) -> f32 { self.value }

    #[inline]
    pub const fn angle(&self) -> f32 { self.angle }

    #[inline]
    pub const fn position(&self) -> i32 { self.position }

    #[inline]
    pub const fn needle(&self) -> &Snapshot<Needle> { &self.needle }

    #[inline]
    pub const fn text(&self) -> &Snapshot<ValueText> { &self.text }

    fn invalidate(&mut self) {
        self.needle.invalidate();
        self.text.invalidate();
    }

    fn end_tick(&mut self) {
        self.needle.advance();
        self.text.advance();
    }
}

// =============================================================================
// Gauge
// =============================================================================

/// One dial: configuration, both value branches and range state.
#[derive(Clone, PartialEq, Debug)]
pub struct Gauge {
    config: GaugeConfig,
    pub(crate) target: Branch,
    pub(crate) current: Branch,
    /// Classification of the target value.
    pub(crate) error: RangeTracker,
    /// Glyph painted in the shared error region.
    pub(crate) glyph: RangeTracker,
    pub(crate) direction: Direction,
}

impl Gauge {
    /// Create a gauge with both values at `min`.
    pub fn new(config: GaugeConfig) -> Result<Self, GaugeError> {
        if let Err(e) = config.validate() {
            #[cfg(feature = "defmt")]
            defmt::warn!("gauge {=str} rejected: {}", config.label, e);
            return Err(e);
        }

        Ok(Self {
            target: Branch::new(&config, config.min),
            current: Branch::new(&config, config.min),
            config,
            error: RangeTracker::new(),
            glyph: RangeTracker::new(),
            direction: Direction::Hold,
        })
    }

    #[inline]
    pub const fn config(&self) -> &GaugeConfig { &self.config }

    #[inline]
    pub const fn target(&self) -> &Branch { &self.target }

    #[inline]
    pub const fn current(&self) -> &Branch { &self.current }

    #[inline]
    pub const fn branch(
        &self,
        channel: Channel,
    ) -> &Branch {
        match channel {
            Channel::Target => &self.target,
            Channel::Current => &self.current,
        }
    }

    #[inline]
    pub(crate) fn branch_mut(
        &mut self,
        channel: Channel,
    ) -> &mut Branch {
        match channel {
            Channel::Target => &mut self.target,
            Channel::Current => &mut self.current,
        }
    }

    /// Range classification of the target value as of the last refresh.
    #[inline]
    pub const fn error_state(&self) -> RangeState { self.error.state() }

    /// Target classification of the tick before the last refresh.
    #[inline]
    pub const fn error_previous_state(&self) -> RangeState { self.error.previous() }

    /// Glyph currently painted in the error region (`Within` = none).
    #[inline]
    pub const fn glyph_state(&self) -> RangeState { self.glyph.state() }

    #[inline]
    pub const fn direction(&self) -> Direction { self.direction }

    /// Highest position index reachable with position input.
    pub fn max_position(&self) -> i32 { ((self.config.max - self.config.min) / self.config.increment).round() as i32 }

    /// Forget every painted element, e.g. after the dial base was repainted.
    pub fn invalidate(&mut self) {
        self.target.invalidate();
        self.current.invalidate();
        self.glyph = RangeTracker::new();
    }

    /// Roll this tick's shown state into the previous slots.
    pub fn end_tick(&mut self) {
        self.target.end_tick();
        self.current.end_tick();
        self.error.advance();
        self.glyph.advance();
    }
}
