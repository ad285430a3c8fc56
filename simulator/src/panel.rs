//! The four-dial panel: gauges, selection and footer.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Text, TextStyleBuilder};
use heapless::String;
use profont::PROFONT_10_POINT;
use ventilator_common::colors::BASE00;
use ventilator_common::config::{FOOTER_Y, GAUGE_COUNT, PANEL_GAUGES, SCREEN_HEIGHT, SCREEN_WIDTH};
use ventilator_common::profiling::DebugLog;
use ventilator_common::styles::{FontKind, LEFT_ALIGNED};
use ventilator_common::surface::{DisplaySurface, GraphicsSurface};
use ventilator_common::{Channel, DiffRenderer, Gauge, GaugeError, Palette};

/// Gauge indices in [`PANEL_GAUGES`] order.
pub mod idx {
    pub const VOLUME: usize = 0;
    pub const INHALE: usize = 1;
    pub const BPM: usize = 2;
    pub const PRESSURE: usize = 3;
}

/// Top of the footer strip, one small-font ascent above the baseline.
const FOOTER_TOP: i32 = FOOTER_Y - 12;

const FOOTER_MARGIN: i32 = 4;

/// Panel state owned by the main loop.
pub struct Panel {
    gauges: [Gauge; GAUGE_COUNT],
    renderer: DiffRenderer,
    selected: usize,
    /// Selection currently highlighted on screen.
    highlighted: Option<usize>,
    /// Log revision and status text currently in the footer.
    footer: Option<(u32, String<32>)>,
}

impl Panel {
    pub fn new() -> Result<Self, GaugeError> {
        let [volume, inhale, bpm, pressure] = PANEL_GAUGES.map(Gauge::new);
        Ok(Self {
            gauges: [volume?, inhale?, bpm?, pressure?],
            renderer: DiffRenderer::new(Palette::SOLARIZED),
            selected: idx::VOLUME,
            highlighted: None,
            footer: None,
        })
    }

    #[inline]
    pub const fn palette(&self) -> &Palette { self.renderer.palette() }

    #[inline]
    pub fn gauge(
        &self,
        i: usize,
    ) -> &Gauge {
        &self.gauges[i]
    }

    #[inline]
    pub fn gauge_mut(
        &mut self,
        i: usize,
    ) -> &mut Gauge {
        &mut self.gauges[i]
    }

    #[inline]
    pub fn selected_mut(&mut self) -> &mut Gauge { &mut self.gauges[self.selected] }

    pub fn select_next(&mut self) { self.selected = (self.selected + 1) % GAUGE_COUNT; }

    pub fn select_prev(&mut self) { self.selected = (self.selected + GAUGE_COUNT - 1) % GAUGE_COUNT; }

    /// Paint every dial base. The next refresh repaints all dynamic elements.
    pub fn draw_base<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        surface: &mut GraphicsSurface<'_, D>,
    ) {
        for gauge in &mut self.gauges {
            self.renderer.draw_base(gauge, surface);
        }
        self.highlighted = None;
        self.footer = None;
    }

    /// Refresh all dials and the selection highlight. Returns primitives sent.
    pub fn refresh<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        surface: &mut GraphicsSurface<'_, D>,
        log: &mut DebugLog,
    ) -> u32 {
        let mut primitives = 0;

        for gauge in &mut self.gauges {
            let report = self.renderer.refresh(gauge, surface);
            primitives += report.primitives;

            if let Some(t) = report.glyph_transition {
                let label = gauge.config().label;
                if t.to.is_error() {
                    let source = if gauge.error_state().is_error() { "target" } else { "current" };
                    log.push_fmt(format_args!("{label}: {source} {}", t.to.label()));
                } else {
                    log.push_fmt(format_args!("{label}: back in range"));
                }
            }
        }

        if self.highlighted != Some(self.selected) {
            let palette = *self.renderer.palette();
            if let Some(old) = self.highlighted {
                let config = self.gauges[old].config();
                surface.draw_text(config.label, config.label_pos, FontKind::SmallBold, palette.label);
            }
            let config = self.gauges[self.selected].config();
            surface.draw_text(config.label, config.label_pos, FontKind::SmallBold, palette.mode);
            self.highlighted = Some(self.selected);
            primitives += 2;
        }

        primitives
    }

    /// Redraw the footer if the newest log line or the status text changed.
    pub fn draw_footer<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
        log: &DebugLog,
        status: String<32>,
    ) {
        if self
            .footer
            .as_ref()
            .is_some_and(|(rev, shown)| *rev == log.revision() && *shown == status)
        {
            return;
        }

        let back = self.renderer.palette().back;
        Rectangle::new(
            Point::new(0, FOOTER_TOP),
            Size::new(SCREEN_WIDTH, (SCREEN_HEIGHT as i32 - FOOTER_TOP) as u32),
        )
        .into_styled(PrimitiveStyle::with_fill(back))
        .draw(display)
        .ok();

        if let Some(line) = log.latest() {
            let style = MonoTextStyle::new(FontKind::Small.font(), BASE00);
            Text::with_text_style(line, Point::new(FOOTER_MARGIN, FOOTER_Y), style, LEFT_ALIGNED)
                .draw(display)
                .ok();
        }

        let right = TextStyleBuilder::new().alignment(Alignment::Right).build();
        let style = MonoTextStyle::new(&PROFONT_10_POINT, BASE00);
        Text::with_text_style(
            &status,
            Point::new(SCREEN_WIDTH as i32 - FOOTER_MARGIN, FOOTER_Y),
            style,
            right,
        )
        .draw(display)
        .ok();

        self.footer = Some((log.revision(), status));
    }

    /// Set a gauge's current value from the measurement loop.
    pub fn measure(
        &mut self,
        i: usize,
        value: f32,
    ) {
        self.gauges[i].update_by_value(Channel::Current, value);
    }
}
