use std::cell::{Cell, RefCell};
use std::rc::Rc;

use web_sys::HtmlCanvasElement;

use lilyboard_shared::{
    MouseStroke, StrokeStyle, StrokeTracker, StyleSource, SurfaceOrigin, DEFAULT_LINE_WIDTH,
};

use crate::render::CanvasSurface;

/// Stroke settings edited from the toolbar.
pub struct ToolbarStyle {
    line_width: Cell<f64>,
    color: RefCell<Option<String>>,
}

impl Default for ToolbarStyle {
    fn default() -> Self {
        Self {
            line_width: Cell::new(DEFAULT_LINE_WIDTH),
            color: RefCell::new(None),
        }
    }
}

impl ToolbarStyle {
    pub fn set_line_width(&self, width: f64) {
        self.line_width.set(width);
    }

    pub fn set_color(&self, color: String) {
        *self.color.borrow_mut() = Some(color);
    }
}

impl StyleSource for ToolbarStyle {
    fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle {
            line_width: self.line_width.get(),
            color: self.color.borrow().clone(),
        }
    }
}

pub struct State {
    pub canvas: HtmlCanvasElement,
    pub style: Rc<ToolbarStyle>,
    pub touches: StrokeTracker<CanvasSurface, Rc<ToolbarStyle>>,
    pub mouse: MouseStroke,
    /// Canvas offset used for mouse input, taken once at startup.
    pub mouse_origin: SurfaceOrigin,
    /// Canvas position used for touch input, refreshed when a touch begins.
    pub touch_origin: SurfaceOrigin,
}

impl State {
    pub fn new(
        canvas: HtmlCanvasElement,
        surface: CanvasSurface,
        mouse_origin: SurfaceOrigin,
    ) -> Self {
        let style = Rc::new(ToolbarStyle::default());
        Self {
            canvas,
            touches: StrokeTracker::new(surface, style.clone()),
            style,
            mouse: MouseStroke::new(),
            mouse_origin,
            touch_origin: SurfaceOrigin::default(),
        }
    }
}
