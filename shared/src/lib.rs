mod mouse;
mod surface;
mod touch;

pub use mouse::MouseStroke;
pub use surface::{DrawingSurface, LineCap, LineJoin, Segment, StrokeStyle, StyleSource};
pub use touch::{StrokeTracker, SurfaceOrigin, TouchContact, TouchRecord};

/// Display width in pixels (landscape).
pub const DISPLAY_WIDTH: usize = 960;
/// Display height in pixels (landscape).
pub const DISPLAY_HEIGHT: usize = 540;
/// The display is fetched in this many equally sized pieces.
pub const FRAMEBUFFER_QUARTERS: usize = 4;

/// The browser canvas is the display turned on its side.
pub const CANVAS_MAX_WIDTH: u32 = DISPLAY_HEIGHT as u32;
pub const CANVAS_MAX_HEIGHT: u32 = DISPLAY_WIDTH as u32;
pub const CANVAS_MARGIN: u32 = 10;
pub const TOOLBAR_HEIGHT: u32 = 50;

pub const DEFAULT_LINE_WIDTH: f64 = 10.0;

pub const IMAGE_PATH: &str = "/image";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Canvas size for a screen, leaving room for the margin and the toolbar.
pub fn canvas_size(screen_width: u32, screen_height: u32) -> (u32, u32) {
    let width = CANVAS_MAX_WIDTH.min(screen_width.saturating_sub(CANVAS_MARGIN));
    let height =
        CANVAS_MAX_HEIGHT.min(screen_height.saturating_sub(CANVAS_MARGIN + TOOLBAR_HEIGHT));
    (width, height)
}
