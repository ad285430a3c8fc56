//! Incremental dial renderer.
//!
//! The panel's parallel bus is slow enough that repainting a whole dial every
//! tick flickers visibly. [`DiffRenderer::refresh`] compares each element's live
//! state against what was painted on the previous tick and issues only the
//! erase/paint primitives needed to move the screen from one to the other.
//!
//! # Refresh Order
//!
//! | Step | Element | Rule |
//! |------|---------|------|
//! | 1 | Current needle | Redraw if moved |
//! | 2 | Target needle | Redraw if moved (painted last, stays on top) |
//! | 3 | Error glyph | Repaint on range transition only |
//! | 4 | Value texts | Redraw if the formatted string changed, never while a glyph is up |
//! | 5 | Snapshots | `shown` rolls into `previous` |
//!
//! # Needle Erase
//!
//! A needle is erased by repainting its old polygon. If the other needle was
//! sitting exactly on that polygon, the repaint uses the other needle's color
//! so it survives. Otherwise the old polygon is painted in face color and, if
//! that bit into the other needle's box, the other needle is repainted.
//!
//! # Error Glyph
//!
//! The glyph shows the target's range state; when the target is in range it
//! shows the current value's state instead. Target is evaluated last, so a
//! target error always owns the shared glyph region.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::Point;

use crate::colors::Palette;
use crate::gauge::{Branch, Gauge, GaugeConfig, Snapshot, ValueText, format_value};
use crate::geometry::{Needle, build_needle};
use crate::range::{RangeState, Transition, classify};
use crate::styles::FontKind;
use crate::surface::DisplaySurface;

/// Font for target readouts and error glyphs.
const TARGET_FONT: FontKind = FontKind::LargeBold;

/// Font for current (measured) readouts.
const CURRENT_FONT: FontKind = FontKind::Large;

const LABEL_FONT: FontKind = FontKind::SmallBold;

/// What a refresh pass did.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct RefreshReport {
    /// Triangles, circles and text prints issued.
    pub primitives: u32,
    /// Change of the target's range classification.
    pub error_transition: Option<Transition>,
    /// Change of the painted error glyph.
    pub glyph_transition: Option<Transition>,
}

impl RefreshReport {
    /// Nothing was sent to the display.
    #[inline]
    pub const fn is_idle(&self) -> bool { self.primitives == 0 }
}

/// Counts primitives on their way to the surface.
struct Painter<'a, S> {
    surface: &'a mut S,
    primitives: u32,
}

impl<'a, S: DisplaySurface> Painter<'a, S> {
    fn new(surface: &'a mut S) -> Self {
        Self {
            surface,
            primitives: 0,
        }
    }

    fn needle(
        &mut self,
        needle: &Needle,
        color: Rgb565,
    ) {
        self.surface.draw_polygon(needle, color);
        self.primitives += 4;
    }

    fn text(
        &mut self,
        text: &str,
        position: Point,
        font: FontKind,
        color: Rgb565,
    ) {
        self.surface.draw_text(text, position, font, color);
        self.primitives += 1;
    }
}

/// Paints dials incrementally with a fixed palette.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct DiffRenderer {
    palette: Palette,
}

impl DiffRenderer {
    pub const fn new(palette: Palette) -> Self { Self { palette } }

    #[inline]
    pub const fn palette(&self) -> &Palette { &self.palette }

    /// Paint the static parts of a dial: face, hole, cutout wedge and label.
    ///
    /// Everything dynamic on the dial is covered by this, so the gauge's
    /// painted snapshots are reset and the next refresh repaints them.
    pub fn draw_base<S: DisplaySurface>(
        &self,
        gauge: &mut Gauge,
        surface: &mut S,
    ) {
        let config = *gauge.config();
        let cutout = config.cutout;

        surface.fill_circle(config.origin, config.face_radius, self.palette.face);
        surface.fill_circle(config.origin, config.hole_radius, self.palette.back);
        surface.fill_triangle(
            Point::new(cutout.start_x, cutout.lower_y),
            Point::new(cutout.mid_x, cutout.upper_y),
            Point::new(cutout.end_x, cutout.lower_y),
            self.palette.back,
        );
        surface.draw_text(config.label, config.label_pos, LABEL_FONT, self.palette.label);

        gauge.invalidate();
    }

    /// Wipe a dial off the screen.
    pub fn clear_base<S: DisplaySurface>(
        &self,
        gauge: &mut Gauge,
        surface: &mut S,
    ) {
        let config = *gauge.config();
        surface.fill_circle(config.origin, config.face_radius, self.palette.back);
        surface.draw_text(config.label, config.label_pos, LABEL_FONT, self.palette.back);
        gauge.invalidate();
    }

    /// Run one refresh pass over a single gauge and advance its snapshots.
    pub fn refresh<S: DisplaySurface>(
        &self,
        gauge: &mut Gauge,
        surface: &mut S,
    ) -> RefreshReport {
        let config = *gauge.config();
        let mut painter = Painter::new(surface);
        let mut report = RefreshReport::default();

        {
            let Gauge { target, current, .. } = &mut *gauge;

            rebuild_needle(&config, current);
            rebuild_needle(&config, target);

            self.diff_needle(
                &mut painter,
                &mut current.needle,
                target.needle.shown().copied(),
                self.palette.current,
                self.palette.target,
            );
            self.diff_needle(
                &mut painter,
                &mut target.needle,
                current.needle.shown().copied(),
                self.palette.target,
                self.palette.current,
            );

            current.text.set_live(format_value(current.value, config.precision));
            target.text.set_live(format_value(target.value, config.precision));
        }

        let target_state = classify(gauge.target.value, config.min, config.max);
        let glyph_state = if target_state.is_error() {
            target_state
        } else {
            classify(gauge.current.value, config.min, config.max)
        };

        report.error_transition = gauge.error.update(target_state);
        report.glyph_transition = gauge.glyph.update(glyph_state);

        #[cfg(feature = "defmt")]
        if let Some(t) = report.error_transition {
            defmt::info!("{=str}: target {} -> {}", config.label, t.from, t.to);
        }

        if let Some(t) = report.glyph_transition {
            self.apply_glyph_transition(&mut painter, gauge, t);
        }

        if !glyph_state.is_error() {
            self.diff_text(
                &mut painter,
                &mut gauge.current.text,
                config.current_pos,
                CURRENT_FONT,
                self.palette.current,
            );
            self.diff_text(
                &mut painter,
                &mut gauge.target.text,
                config.target_pos,
                TARGET_FONT,
                self.palette.target,
            );
        }

        report.primitives = painter.primitives;
        gauge.end_tick();
        report
    }

    /// Refresh every gauge in order, returning the total primitive count.
    pub fn refresh_all<S: DisplaySurface>(
        &self,
        gauges: &mut [Gauge],
        surface: &mut S,
    ) -> u32 {
        gauges.iter_mut().map(|g| self.refresh(g, surface).primitives).sum()
    }

    fn diff_needle<S: DisplaySurface>(
        &self,
        painter: &mut Painter<'_, S>,
        needle: &mut Snapshot<Needle>,
        other_shown: Option<Needle>,
        color: Rgb565,
        other_color: Rgb565,
    ) {
        if !needle.is_dirty() {
            return;
        }

        if let Some(old) = needle.previous().copied() {
            match other_shown {
                Some(other) if other == old => painter.needle(&old, other_color),
                Some(other) => {
                    painter.needle(&old, self.palette.face);
                    if other.overlaps(&old) {
                        painter.needle(&other, other_color);
                    }
                }
                None => painter.needle(&old, self.palette.face),
            }
        }

        painter.needle(needle.live(), color);
        needle.mark_shown();
    }

    fn diff_text<S: DisplaySurface>(
        &self,
        painter: &mut Painter<'_, S>,
        text: &mut Snapshot<ValueText>,
        position: Point,
        font: FontKind,
        color: Rgb565,
    ) {
        if !text.is_dirty() {
            return;
        }

        if let Some(old) = text.previous() {
            painter.text(old, position, font, self.palette.back);
        }
        painter.text(text.live(), position, font, color);
        text.mark_shown();
    }

    fn apply_glyph_transition<S: DisplaySurface>(
        &self,
        painter: &mut Painter<'_, S>,
        gauge: &mut Gauge,
        transition: Transition,
    ) {
        let config = *gauge.config();

        if transition.from == RangeState::Within {
            self.erase_text(painter, &mut gauge.current.text, config.current_pos, CURRENT_FONT);
            self.erase_text(painter, &mut gauge.target.text, config.target_pos, TARGET_FONT);
        } else {
            self.glyph(painter, &config, transition.from, self.palette.back);
        }

        if transition.to != RangeState::Within {
            self.glyph(painter, &config, transition.to, self.palette.error);
        }
    }

    fn erase_text<S: DisplaySurface>(
        &self,
        painter: &mut Painter<'_, S>,
        text: &mut Snapshot<ValueText>,
        position: Point,
        font: FontKind,
    ) {
        if let Some(old) = text.shown() {
            painter.text(old, position, font, self.palette.back);
        }
        text.clear_shown();
    }

    fn glyph<S: DisplaySurface>(
        &self,
        painter: &mut Painter<'_, S>,
        config: &GaugeConfig,
        state: RangeState,
        color: Rgb565,
    ) {
        let text = match state {
            RangeState::Over => config.error_upper,
            RangeState::Under => config.error_lower,
            RangeState::Within => return,
        };
        painter.text(text, config.error_pos, TARGET_FONT, color);
    }
}

fn rebuild_needle(
    config: &GaugeConfig,
    branch: &mut Branch,
) {
    let needle = build_needle(
        config.origin,
        branch.angle,
        config.needle_inner_radius(),
        config.needle_outer_radius(),
    );
    branch.needle.set_live(needle);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::Palette;
    use crate::gauge::Channel;
    use crate::surface::{DrawCall, RecordingSurface};

    const P: Palette = Palette::SOLARIZED;

    fn test_gauge() -> Gauge { Gauge::new(GaugeConfig::new("VOL", Point::new(100, 100), 20.0, 50.0, 0.5, 1)).unwrap() }

    /// Gauge that has been through one refresh with target 25.0 and current 30.0.
    fn settled_gauge(renderer: &DiffRenderer) -> Gauge {
        let mut gauge = test_gauge();
        gauge.update_by_value(Channel::Target, 25.0);
        gauge.update_by_value(Channel::Current, 30.0);
        let mut surface: RecordingSurface = RecordingSurface::new();
        renderer.refresh(&mut gauge, &mut surface);
        gauge
    }

    #[test]
    fn test_first_refresh_paints_everything() {
        let renderer = DiffRenderer::default();
        let mut gauge = test_gauge();
        gauge.update_by_value(Channel::Target, 25.0);
        gauge.update_by_value(Channel::Current, 30.0);

        let mut surface: RecordingSurface = RecordingSurface::new();
        let report = renderer.refresh(&mut gauge, &mut surface);

        assert_eq!(surface.triangles_in(P.target), 4);
        assert_eq!(surface.triangles_in(P.current), 4);
        assert_eq!(surface.triangles_in(P.face), 0, "nothing to erase on first paint");
        assert!(surface.printed("25.0", P.target));
        assert!(surface.printed("30.0", P.current));
        assert_eq!(report.primitives, 10);
        assert_eq!(report.glyph_transition, None);
    }

    #[test]
    fn test_unchanged_values_issue_no_draw_calls() {
        let renderer = DiffRenderer::default();
        let mut gauge = settled_gauge(&renderer);

        let mut surface: RecordingSurface = RecordingSurface::new();
        let report = renderer.refresh(&mut gauge, &mut surface);
        assert!(surface.is_empty());
        assert!(report.is_idle());

        // Re-applying the same values is still a no-op
        gauge.update_by_value(Channel::Target, 25.0);
        gauge.update_by_value(Channel::Current, 30.0);
        renderer.refresh(&mut gauge, &mut surface);
        assert!(surface.is_empty());
    }

    #[test]
    fn test_position_scenario_shows_value_without_glyph() {
        let renderer = DiffRenderer::default();
        let mut gauge = test_gauge();
        gauge.set_position(Channel::Target, 10);
        gauge.update_by_position(Channel::Target);
        assert_eq!(gauge.target().value(), 25.0);

        let mut surface: RecordingSurface = RecordingSurface::new();
        renderer.refresh(&mut gauge, &mut surface);

        assert_eq!(gauge.target().text().shown().map(|s| s.as_str()), Some("25.0"));
        assert!(surface.printed("25.0", P.target));
        assert_eq!(surface.texts().filter(|(_, c)| *c == P.error).count(), 0);
        assert_eq!(gauge.error_state(), RangeState::Within);
    }

    #[test]
    fn test_over_range_then_back_within() {
        let renderer = DiffRenderer::default();
        let mut gauge = settled_gauge(&renderer);

        // Over range: values erased, upper glyph painted
        gauge.update_by_value(Channel::Target, 55.0);
        let mut surface: RecordingSurface = RecordingSurface::new();
        let report = renderer.refresh(&mut gauge, &mut surface);

        assert_eq!(gauge.error_state(), RangeState::Over);
        assert_eq!(
            report.error_transition,
            Some(Transition {
                from: RangeState::Within,
                to: RangeState::Over
            })
        );
        assert!(surface.printed("25.0", P.back));
        assert!(surface.printed("30.0", P.back));
        assert!(surface.printed("HIGH", P.error));
        assert!(!surface.printed("55.0", P.target), "no value drawn behind the glyph");
        // Needle stays at its last in-range angle
        assert_eq!(surface.triangles_in(P.target), 0);

        // Holding the error is silent
        surface.clear();
        renderer.refresh(&mut gauge, &mut surface);
        assert!(surface.is_empty());

        // Back within range: glyph erased, both values repainted
        gauge.update_by_value(Channel::Target, 40.0);
        surface.clear();
        let report = renderer.refresh(&mut gauge, &mut surface);

        assert_eq!(gauge.error_state(), RangeState::Within);
        assert_eq!(report.glyph_transition.map(|t| t.to), Some(RangeState::Within));
        assert!(surface.printed("HIGH", P.back));
        assert!(surface.printed("40.0", P.target));
        assert!(surface.printed("30.0", P.current));
        assert_eq!(surface.texts().filter(|(_, c)| *c == P.back).count(), 1, "only the glyph is erased");
    }

    #[test]
    fn test_glyph_erase_precedes_value_repaint() {
        let renderer = DiffRenderer::default();
        let mut gauge = settled_gauge(&renderer);
        let mut surface: RecordingSurface = RecordingSurface::new();

        gauge.update_by_value(Channel::Target, 55.0);
        renderer.refresh(&mut gauge, &mut surface);
        gauge.update_by_value(Channel::Target, 40.0);
        surface.clear();
        renderer.refresh(&mut gauge, &mut surface);

        let texts: std::vec::Vec<_> = surface.texts().collect();
        assert_eq!(texts[0], ("HIGH", P.back));
    }

    #[test]
    fn test_under_range_then_back_within() {
        let renderer = DiffRenderer::default();
        let mut gauge = settled_gauge(&renderer);
        let mut surface: RecordingSurface = RecordingSurface::new();

        gauge.update_by_value(Channel::Target, 10.0);
        renderer.refresh(&mut gauge, &mut surface);
        assert_eq!(gauge.error_state(), RangeState::Under);
        assert!(surface.printed("LOW", P.error));

        gauge.update_by_value(Channel::Target, 35.0);
        surface.clear();
        let report = renderer.refresh(&mut gauge, &mut surface);

        assert_eq!(
            report.error_transition,
            Some(Transition {
                from: RangeState::Under,
                to: RangeState::Within
            })
        );
        let texts: std::vec::Vec<_> = surface.texts().collect();
        assert_eq!(texts, [("LOW", P.back), ("30.0", P.current), ("35.0", P.target)]);
    }

    #[test]
    fn test_current_back_within_clears_shared_glyph() {
        let renderer = DiffRenderer::default();
        let mut gauge = settled_gauge(&renderer);
        let mut surface: RecordingSurface = RecordingSurface::new();

        gauge.update_by_value(Channel::Current, 12.0);
        renderer.refresh(&mut gauge, &mut surface);
        assert_eq!(gauge.glyph_state(), RangeState::Under);

        gauge.update_by_value(Channel::Current, 31.0);
        surface.clear();
        let report = renderer.refresh(&mut gauge, &mut surface);

        assert_eq!(gauge.glyph_state(), RangeState::Within);
        assert_eq!(report.error_transition, None);
        assert_eq!(report.glyph_transition.map(|t| t.from), Some(RangeState::Under));
        let texts: std::vec::Vec<_> = surface.texts().collect();
        assert_eq!(texts, [("LOW", P.back), ("31.0", P.current), ("25.0", P.target)]);
    }

    #[test]
    fn test_over_to_under_swaps_glyph() {
        let renderer = DiffRenderer::default();
        let mut gauge = settled_gauge(&renderer);
        let mut surface: RecordingSurface = RecordingSurface::new();

        gauge.update_by_value(Channel::Target, 55.0);
        renderer.refresh(&mut gauge, &mut surface);

        gauge.update_by_value(Channel::Target, 10.0);
        surface.clear();
        renderer.refresh(&mut gauge, &mut surface);

        assert_eq!(gauge.error_state(), RangeState::Under);
        let texts: std::vec::Vec<_> = surface.texts().collect();
        assert_eq!(texts, [("HIGH", P.back), ("LOW", P.error)]);
    }

    #[test]
    fn test_values_frozen_while_glyph_shown() {
        let renderer = DiffRenderer::default();
        let mut gauge = settled_gauge(&renderer);
        let mut surface: RecordingSurface = RecordingSurface::new();

        gauge.update_by_value(Channel::Target, 55.0);
        renderer.refresh(&mut gauge, &mut surface);

        // Current keeps moving: its needle follows, its text does not
        gauge.update_by_value(Channel::Current, 35.0);
        surface.clear();
        renderer.refresh(&mut gauge, &mut surface);

        assert_eq!(surface.triangles_in(P.current), 4);
        assert_eq!(surface.texts().count(), 0);

        // Leaving the error shows the latest current value
        gauge.update_by_value(Channel::Target, 40.0);
        surface.clear();
        renderer.refresh(&mut gauge, &mut surface);
        assert!(surface.printed("35.0", P.current));
    }

    #[test]
    fn test_current_out_of_range_uses_shared_glyph() {
        let renderer = DiffRenderer::default();
        let mut gauge = settled_gauge(&renderer);
        let mut surface: RecordingSurface = RecordingSurface::new();

        gauge.update_by_value(Channel::Current, 12.0);
        let report = renderer.refresh(&mut gauge, &mut surface);

        // Target is fine, so there is no target error, but the glyph is up
        assert_eq!(gauge.error_state(), RangeState::Within);
        assert_eq!(report.error_transition, None);
        assert_eq!(gauge.glyph_state(), RangeState::Under);
        assert!(surface.printed("LOW", P.error));
        assert_eq!(surface.triangles_in(P.current), 0, "needle keeps its in-range angle");
    }

    #[test]
    fn test_target_error_dominates_current_error() {
        let renderer = DiffRenderer::default();
        let mut gauge = settled_gauge(&renderer);
        let mut surface: RecordingSurface = RecordingSurface::new();

        gauge.update_by_value(Channel::Current, 12.0);
        gauge.update_by_value(Channel::Target, 60.0);
        renderer.refresh(&mut gauge, &mut surface);

        assert_eq!(gauge.glyph_state(), RangeState::Over);
        assert!(surface.printed("HIGH", P.error));
        assert!(!surface.printed("LOW", P.error));
    }

    #[test]
    fn test_value_text_redrawn_only_on_rounded_change() {
        let renderer = DiffRenderer::default();
        let mut gauge = settled_gauge(&renderer);
        let mut surface: RecordingSurface = RecordingSurface::new();

        // Same at one decimal: "30.0"
        gauge.update_by_value(Channel::Current, 30.02);
        renderer.refresh(&mut gauge, &mut surface);
        assert_eq!(surface.texts().count(), 0);

        gauge.update_by_value(Channel::Current, 31.0);
        surface.clear();
        renderer.refresh(&mut gauge, &mut surface);
        let texts: std::vec::Vec<_> = surface.texts().collect();
        assert_eq!(texts, [("30.0", P.back), ("31.0", P.current)]);
    }

    #[test]
    fn test_moving_needle_erases_in_face_color() {
        let renderer = DiffRenderer::default();
        let mut gauge = settled_gauge(&renderer);
        let old = *gauge.target().needle().shown().unwrap();

        gauge.update_by_value(Channel::Target, 45.0);
        let mut surface: RecordingSurface = RecordingSurface::new();
        renderer.refresh(&mut gauge, &mut surface);

        let new = *gauge.target().needle().shown().unwrap();
        let erase = surface.needle_paint_index(&old, P.face).unwrap();
        let paint = surface.needle_paint_index(&new, P.target).unwrap();
        assert!(erase < paint, "erase before paint");
        assert_eq!(surface.triangles_in(P.current), 0);
    }

    #[test]
    fn test_coincident_needles_restore_other_color() {
        let renderer = DiffRenderer::default();
        let mut gauge = test_gauge();
        gauge.update_by_value(Channel::Target, 30.0);
        gauge.update_by_value(Channel::Current, 30.0);
        let mut surface: RecordingSurface = RecordingSurface::new();
        renderer.refresh(&mut gauge, &mut surface);

        let shared = *gauge.target().needle().shown().unwrap();
        assert_eq!(gauge.current().needle().shown(), Some(&shared));

        // Target leaves; current must survive at the shared location
        gauge.update_by_value(Channel::Target, 45.0);
        surface.clear();
        renderer.refresh(&mut gauge, &mut surface);

        assert_eq!(surface.needle_paint_index(&shared, P.current), Some(0));
        assert_eq!(surface.needle_paint_index(&shared, P.face), None);
        assert_eq!(surface.triangles_in(P.face), 0);
    }

    #[test]
    fn test_current_leaving_coincidence_restores_target() {
        let renderer = DiffRenderer::default();
        let mut gauge = test_gauge();
        gauge.update_by_value(Channel::Target, 30.0);
        gauge.update_by_value(Channel::Current, 30.0);
        let mut surface: RecordingSurface = RecordingSurface::new();
        renderer.refresh(&mut gauge, &mut surface);
        let shared = *gauge.current().needle().shown().unwrap();

        gauge.update_by_value(Channel::Current, 22.0);
        surface.clear();
        renderer.refresh(&mut gauge, &mut surface);

        assert_eq!(surface.needle_paint_index(&shared, P.target), Some(0));
        assert_eq!(surface.triangles_in(P.face), 0);
    }

    #[test]
    fn test_partial_overlap_repaints_neighbor() {
        let renderer = DiffRenderer::default();
        let mut gauge = test_gauge();
        gauge.update_by_value(Channel::Target, 30.0);
        gauge.update_by_value(Channel::Current, 30.5);
        let mut surface: RecordingSurface = RecordingSurface::new();
        renderer.refresh(&mut gauge, &mut surface);

        let target_old = *gauge.target().needle().shown().unwrap();
        let current = *gauge.current().needle().shown().unwrap();
        assert_ne!(target_old, current);
        assert!(target_old.overlaps(&current));

        gauge.update_by_value(Channel::Target, 45.0);
        surface.clear();
        renderer.refresh(&mut gauge, &mut surface);

        let erase = surface.needle_paint_index(&target_old, P.face).unwrap();
        let repair = surface.needle_paint_index(&current, P.current).unwrap();
        assert!(erase < repair);
    }

    #[test]
    fn test_draw_base_forces_full_repaint() {
        let renderer = DiffRenderer::default();
        let mut gauge = settled_gauge(&renderer);
        let mut surface: RecordingSurface = RecordingSurface::new();

        renderer.draw_base(&mut gauge, &mut surface);
        assert_eq!(
            surface.calls()[0],
            DrawCall::FillCircle {
                center: Point::new(100, 100),
                radius: gauge.config().face_radius,
                color: P.face
            }
        );
        assert!(surface.printed("VOL", P.label));

        surface.clear();
        let report = renderer.refresh(&mut gauge, &mut surface);
        assert_eq!(report.primitives, 10);
        assert_eq!(surface.triangles_in(P.face), 0, "face already clean");
    }

    #[test]
    fn test_clear_base_wipes_dial() {
        let renderer = DiffRenderer::default();
        let mut gauge = settled_gauge(&renderer);
        let mut surface: RecordingSurface = RecordingSurface::new();

        renderer.clear_base(&mut gauge, &mut surface);
        assert!(matches!(
            surface.calls()[0],
            DrawCall::FillCircle { color, .. } if color == P.back
        ));
        assert!(surface.printed("VOL", P.back));
        assert!(gauge.target().needle().shown().is_none());
        assert!(gauge.current().text().shown().is_none());
    }

    #[test]
    fn test_refresh_all_sums_primitives() {
        let renderer = DiffRenderer::default();
        let mut gauges = [test_gauge(), test_gauge()];
        let mut surface: RecordingSurface<512> = RecordingSurface::new();

        assert_eq!(renderer.refresh_all(&mut gauges, &mut surface), 20);
        assert_eq!(renderer.refresh_all(&mut gauges, &mut surface), 0);
    }
}
