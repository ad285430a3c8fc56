//! Range classification and transition tracking.
//!
//! A gauge value is `Within`, `Over` or `Under` its configured bounds. The
//! classification is recomputed from scratch every tick, so a transient bad
//! value clears itself on the next tick. [`RangeTracker`] remembers the
//! previous tick's state so the renderer only touches the error glyph on an
//! actual transition.

/// Position of a value relative to a gauge's `[min, max]`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangeState {
    #[default]
    Within,
    /// Above `max`.
    Over,
    /// Below `min`.
    Under,
}

impl RangeState {
    #[inline]
    pub const fn is_error(self) -> bool { !matches!(self, Self::Within) }

    /// Short name for log lines.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Within => "OK",
            Self::Over => "OVER",
            Self::Under => "UNDER",
        }
    }
}

/// Classify `value` against inclusive bounds.
#[inline]
pub fn classify(
    value: f32,
    min: f32,
    max: f32,
) -> RangeState {
    if value > max {
        RangeState::Over
    } else if value < min {
        RangeState::Under
    } else {
        RangeState::Within
    }
}

/// A change of range state between two ticks.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: RangeState,
    pub to: RangeState,
}

/// Range state of this tick and the one before.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct RangeTracker {
    state: RangeState,
    previous: RangeState,
}

impl RangeTracker {
    pub const fn new() -> Self {
        Self {
            state: RangeState::Within,
            previous: RangeState::Within,
        }
    }

    #[inline]
    pub const fn state(&self) -> RangeState { self.state }

    #[inline]
    pub const fn previous(&self) -> RangeState { self.previous }

    /// Set this tick's state, returning the transition from the previous tick if any.
    pub fn update(
        &mut self,
        state: RangeState,
    ) -> Option<Transition> {
        self.state = state;
        (self.state != self.previous).then_some(Transition {
            from: self.previous,
            to: self.state,
        })
    }

    /// Roll this tick's state into the previous slot.
    pub fn advance(&mut self) { self.previous = self.state; }
}
