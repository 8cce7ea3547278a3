use crate::surface::{DrawingSurface, LineCap, LineJoin, Segment, StyleSource};
use crate::Point;

/// Freehand drawing with a mouse: one stroke at a time, painted while the
/// button is held.
#[derive(Debug, Default)]
pub struct MouseStroke {
    painting: bool,
    last: Option<Point>,
}

impl MouseStroke {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_painting(&self) -> bool {
        self.painting
    }

    pub fn press(&mut self) {
        self.painting = true;
        self.last = None;
    }

    /// Extends the stroke to `point`. The first move after a press only
    /// anchors the stroke.
    pub fn drag(
        &mut self,
        point: Point,
        surface: &mut impl DrawingSurface,
        style: &impl StyleSource,
    ) {
        if !self.painting {
            return;
        }
        if let Some(from) = self.last {
            surface.draw_segment(&Segment {
                from,
                to: point,
                line_width: style.stroke_style().line_width,
                line_join: LineJoin::Miter,
                line_cap: LineCap::Round,
            });
        }
        self.last = Some(point);
    }

    pub fn release(&mut self) {
        self.painting = false;
        self.last = None;
    }
}
