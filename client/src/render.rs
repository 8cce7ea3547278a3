use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use lilyboard_shared::{DrawingSurface, Segment};

/// The 2D canvas as a drawing surface.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self { canvas, ctx }
    }

    pub fn set_color(&self, color: &str) {
        self.ctx.set_stroke_style_str(color);
    }
}

impl DrawingSurface for CanvasSurface {
    fn draw_segment(&mut self, segment: &Segment) {
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(segment.from.x, segment.from.y);
        ctx.line_to(segment.to.x, segment.to.y);
        ctx.set_line_width(segment.line_width);
        ctx.set_line_join(segment.line_join.as_str());
        ctx.set_line_cap(segment.line_cap.as_str());
        ctx.stroke();
    }

    fn clear(&mut self) {
        if let Err(err) = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0) {
            tracing::warn!(error = ?err, "could not reset canvas transform before clearing");
        }
        self.ctx.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }
}
