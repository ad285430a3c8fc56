//! Display capability used by the gauge renderer.
//!
//! The renderer never talks to a display driver directly. It issues the small
//! set of primitives below, which is all the panel's slow parallel bus needs to
//! support:
//!
//! - [`GraphicsSurface`] forwards them to any `embedded-graphics`
//!   `DrawTarget<Color = Rgb565>` (hardware framebuffer or simulator window).
//! - [`RecordingSurface`] records them for host tests, so draw-call counts and
//!   paint order can be asserted without hardware.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Triangle};
use embedded_graphics::text::Text;
use heapless::{String, Vec};

use crate::colors::BASE03;
use crate::geometry::Needle;
use crate::styles::{CENTERED, FontKind};

/// Drawing primitives required by the gauge renderer.
///
/// Text is drawn with the color and font selected by the last
/// [`set_color`](Self::set_color) / [`set_font`](Self::set_font) call, centered
/// horizontally on `position` with `position.y` as the baseline.
pub trait DisplaySurface {
    fn set_color(
        &mut self,
        color: Rgb565,
    );

    fn set_font(
        &mut self,
        font: FontKind,
    );

    fn fill_triangle(
        &mut self,
        p1: Point,
        p2: Point,
        p3: Point,
        color: Rgb565,
    );

    fn fill_circle(
        &mut self,
        center: Point,
        radius: u32,
        color: Rgb565,
    );

    fn print_text_at(
        &mut self,
        text: &str,
        position: Point,
    );

    /// Fill a needle polygon as its four triangles.
    fn draw_polygon(
        &mut self,
        needle: &Needle,
        color: Rgb565,
    ) {
        for [a, b, c] in needle.triangles() {
            self.fill_triangle(a, b, c, color);
        }
    }

    /// Select color and font, then print.
    fn draw_text(
        &mut self,
        text: &str,
        position: Point,
        font: FontKind,
        color: Rgb565,
    ) {
        self.set_color(color);
        self.set_font(font);
        self.print_text_at(text, position);
    }
}

// =============================================================================
// embedded-graphics Adapter
// =============================================================================

/// [`DisplaySurface`] over an `embedded-graphics` draw target.
///
/// Draw errors are discarded: panel targets are infallible and a failed
/// primitive is simply repainted on the next change.
pub struct GraphicsSurface<'a, D> {
    target: &'a mut D,
    color: Rgb565,
    font: FontKind,
}

impl<'a, D> GraphicsSurface<'a, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(target: &'a mut D) -> Self {
        Self {
            target,
            color: BASE03,
            font: FontKind::default(),
        }
    }

    /// Access the wrapped target for drawing outside the gauge engine.
    pub fn target(&mut self) -> &mut D { &mut *self.target }
}

impl<D> DisplaySurface for GraphicsSurface<'_, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn set_color(
        &mut self,
        color: Rgb565,
    ) {
        self.color = color;
    }

    fn set_font(
        &mut self,
        font: FontKind,
    ) {
        self.font = font;
    }

    fn fill_triangle(
        &mut self,
        p1: Point,
        p2: Point,
        p3: Point,
        color: Rgb565,
    ) {
        Triangle::new(p1, p2, p3)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(self.target)
            .ok();
    }

    fn fill_circle(
        &mut self,
        center: Point,
        radius: u32,
        color: Rgb565,
    ) {
        Circle::with_center(center, radius * 2 + 1)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(self.target)
            .ok();
    }

    fn print_text_at(
        &mut self,
        text: &str,
        position: Point,
    ) {
        let style = MonoTextStyle::new(self.font.font(), self.color);
        Text::with_text_style(text, position, style, CENTERED)
            .draw(self.target)
            .ok();
    }
}

// =============================================================================
// Recording Test Double
// =============================================================================

/// Capacity of recorded text strings.
pub const RECORDED_TEXT_LEN: usize = 16;

/// One recorded primitive.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum DrawCall {
    SetColor(Rgb565),
    SetFont(FontKind),
    FillTriangle {
        points: [Point; 3],
        color: Rgb565,
    },
    FillCircle {
        center: Point,
        radius: u32,
        color: Rgb565,
    },
    /// Text together with the color and font in effect when it was printed.
    Text {
        text: String<RECORDED_TEXT_LEN>,
        position: Point,
        color: Rgb565,
        font: FontKind,
    },
}

/// [`DisplaySurface`] that records every call instead of drawing.
///
/// Holds up to `N` calls; further calls are counted in
/// [`dropped`](Self::dropped) but not stored.
pub struct RecordingSurface<const N: usize = 256> {
    calls: Vec<DrawCall, N>,
    dropped: usize,
    color: Rgb565,
    font: FontKind,
}

impl<const N: usize> RecordingSurface<N> {
    pub const fn new() -> Self {
        Self {
            calls: Vec::new(),
            dropped: 0,
            color: BASE03,
            font: FontKind::Small,
        }
    }

    #[inline]
    pub fn calls(&self) -> &[DrawCall] { &self.calls }

    /// Total calls received, including dropped ones.
    #[inline]
    pub fn len(&self) -> usize { self.calls.len() + self.dropped }

    #[inline]
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    #[inline]
    pub const fn dropped(&self) -> usize { self.dropped }

    pub fn clear(&mut self) {
        self.calls.clear();
        self.dropped = 0;
    }

    /// Printed strings with their colors, in call order.
    pub fn texts(&self) -> impl Iterator<Item = (&str, Rgb565)> {
        self.calls.iter().filter_map(|c| match c {
            DrawCall::Text { text, color, .. } => Some((text.as_str(), *color)),
            _ => None,
        })
    }

    /// True if `text` was printed in `color`.
    pub fn printed(
        &self,
        text: &str,
        color: Rgb565,
    ) -> bool {
        self.texts().any(|(t, c)| t == text && c == color)
    }

    /// Number of triangles filled with `color`.
    pub fn triangles_in(
        &self,
        color: Rgb565,
    ) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::FillTriangle { color: fill, .. } if *fill == color))
            .count()
    }

    /// Index of the first call painting `needle` in `color`, if any.
    ///
    /// A needle paint is the four triangles from [`Needle::triangles`] issued
    /// back to back.
    pub fn needle_paint_index(
        &self,
        needle: &Needle,
        color: Rgb565,
    ) -> Option<usize> {
        let expected = needle.triangles().map(|points| DrawCall::FillTriangle { points, color });
        self.calls.windows(4).position(|w| w == expected)
    }

    fn record(
        &mut self,
        call: DrawCall,
    ) {
        if self.calls.push(call).is_err() {
            self.dropped += 1;
        }
    }
}

impl<const N: usize> Default for RecordingSurface<N> {
    fn default() -> Self { Self::new() }
}

impl<const N: usize> DisplaySurface for RecordingSurface<N> {
    fn set_color(
        &mut self,
        color: Rgb565,
    ) {
        self.color = color;
        self.record(DrawCall::SetColor(color));
    }

    fn set_font(
        &mut self,
        font: FontKind,
    ) {
        self.font = font;
        self.record(DrawCall::SetFont(font));
    }

    fn fill_triangle(
        &mut self,
        p1: Point,
        p2: Point,
        p3: Point,
        color: Rgb565,
    ) {
        self.record(DrawCall::FillTriangle {
            points: [p1, p2, p3],
            color,
        });
    }

    fn fill_circle(
        &mut self,
        center: Point,
        radius: u32,
        color: Rgb565,
    ) {
        self.record(DrawCall::FillCircle { center, radius, color });
    }

    fn print_text_at(
        &mut self,
        text: &str,
        position: Point,
    ) {
        let mut recorded = String::new();
        for c in text.chars() {
            if recorded.push(c).is_err() {
                break;
            }
        }
        self.record(DrawCall::Text {
            text: recorded,
            position,
            color: self.color,
            font: self.font,
        });
    }
}
