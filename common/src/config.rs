//! Display, dial geometry and gauge configuration constants.
//!
//! All layout is computed at compile time from the dial centers, so the
//! renderer never recalculates positions during a refresh. Every built-in
//! gauge configuration is checked with `const` assertions; a bad range or step
//! fails the build instead of producing a broken dial at runtime.

use embedded_graphics::prelude::Point;

use crate::gauge::GaugeConfig;

// =============================================================================
// Display Configuration
// =============================================================================

/// Display width in pixels (3.5" 480x320 TFT panel).
pub const SCREEN_WIDTH: u32 = 480;

/// Display height in pixels.
pub const SCREEN_HEIGHT: u32 = 320;

/// Nominal interval between refresh passes.
pub const REFRESH_INTERVAL_MS: u64 = 1000;

// =============================================================================
// Dial Geometry
// =============================================================================

/// Radius of the dial face disc.
pub const FACE_RADIUS: u32 = 66;

/// Radius of the background-colored hole in the middle of the face.
/// Needles live in the ring between this and [`FACE_RADIUS`].
pub const HOLE_RADIUS: u32 = 50;

const _: () = assert!(HOLE_RADIUS + 4 < FACE_RADIUS);

/// Needle angle for a gauge's minimum value (degrees, counter-clockwise from +x).
pub const ANGLE_AT_MIN_DEG: f32 = 225.0;

/// Needle angle for a gauge's maximum value.
pub const ANGLE_AT_MAX_DEG: f32 = -45.0;

/// Offset between the mathematical angle and the physical needle pivot.
/// Zero on this panel: the face is drawn centered on the pivot.
pub const PIVOT_OFFSET_DEG: f32 = 0.0;

/// Half of the needle's angular width.
pub const NEEDLE_HALF_WIDTH_DEG: f32 = 3.0;

const _: () = assert!(ANGLE_AT_MAX_DEG < ANGLE_AT_MIN_DEG);

// =============================================================================
// Dial Centers
// =============================================================================

/// Horizontal center of the left dial column.
const LEFT_X: i32 = 120;

/// Horizontal center of the right dial column.
const RIGHT_X: i32 = 360;

const TOP_Y: i32 = 80;

const BOTTOM_Y: i32 = 232;

const _: () = assert!(BOTTOM_Y + FACE_RADIUS as i32 + 2 < FOOTER_Y - 12);

/// Baseline of the footer log line.
pub const FOOTER_Y: i32 = 314;

// =============================================================================
// Gauge Configurations
// =============================================================================

/// Tidal volume in litres.
pub const VOLUME_GAUGE: GaugeConfig = GaugeConfig::new("VOL", Point::new(LEFT_X, TOP_Y), 0.2, 0.8, 0.02, 2);

/// Inhale time in seconds.
pub const INHALE_GAUGE: GaugeConfig = GaugeConfig::new("TIME", Point::new(RIGHT_X, TOP_Y), 0.5, 2.0, 0.05, 2);

/// Breaths per minute.
pub const BPM_GAUGE: GaugeConfig = GaugeConfig::new("BPM", Point::new(LEFT_X, BOTTOM_Y), 8.0, 43.0, 1.0, 0);

/// Airway pressure in cmH2O. Target is the operator's peak pressure limit.
pub const PRESSURE_GAUGE: GaugeConfig = GaugeConfig::new("PRES", Point::new(RIGHT_X, BOTTOM_Y), 0.0, 60.0, 1.0, 0);

const _: () = assert!(VOLUME_GAUGE.min < VOLUME_GAUGE.max);
const _: () = assert!(VOLUME_GAUGE.increment > 0.0);
const _: () = assert!(INHALE_GAUGE.min < INHALE_GAUGE.max);
const _: () = assert!(INHALE_GAUGE.increment > 0.0);
const _: () = assert!(BPM_GAUGE.min < BPM_GAUGE.max);
const _: () = assert!(BPM_GAUGE.increment > 0.0);
const _: () = assert!(PRESSURE_GAUGE.min < PRESSURE_GAUGE.max);
const _: () = assert!(PRESSURE_GAUGE.increment > 0.0);

/// Number of dials on the panel.
pub const GAUGE_COUNT: usize = 4;

/// All panel dials in refresh order.
pub const PANEL_GAUGES: [GaugeConfig; GAUGE_COUNT] = [VOLUME_GAUGE, INHALE_GAUGE, BPM_GAUGE, PRESSURE_GAUGE];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gauge::Gauge;

    #[test]
    fn test_panel_gauges_are_valid() {
        for config in PANEL_GAUGES {
            assert!(Gauge::new(config).is_ok(), "{} should be a valid gauge", config.label);
        }
    }

    #[test]
    fn test_dials_fit_on_screen() {
        for config in PANEL_GAUGES {
            let r = FACE_RADIUS as i32;
            assert!(config.origin.x - r >= 0);
            assert!(config.origin.y - r >= 0);
            assert!(config.origin.x + r < SCREEN_WIDTH as i32);
            assert!(config.origin.y + r < SCREEN_HEIGHT as i32);
        }
    }

    #[test]
    fn test_dials_do_not_overlap() {
        let d = 2 * FACE_RADIUS as i32;
        assert!(RIGHT_X - LEFT_X > d);
        assert!(BOTTOM_Y - TOP_Y > d);
    }
}
