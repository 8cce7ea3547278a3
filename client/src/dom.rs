use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, HtmlElement, MouseEvent, TouchEvent, Window};

use lilyboard_shared::{canvas_size, Point, SurfaceOrigin, TouchRecord};

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

/// Fits the canvas to the screen, capped at the display size.
pub fn size_canvas(window: &Window, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let screen = window.screen()?;
    let screen_width = screen.width()?.max(0) as u32;
    let screen_height = screen.height()?.max(0) as u32;
    let (width, height) = canvas_size(screen_width, screen_height);
    canvas.set_width(width);
    canvas.set_height(height);
    tracing::info!(
        width,
        height,
        screen_width,
        screen_height,
        "sized drawing board"
    );
    Ok(())
}

/// Layout offset of the canvas within the page.
pub fn offset_origin(canvas: &HtmlCanvasElement) -> SurfaceOrigin {
    let element: &HtmlElement = canvas.as_ref();
    SurfaceOrigin::new(element.offset_left() as f64, element.offset_top() as f64)
}

/// Current position of the canvas within the viewport.
pub fn client_origin(canvas: &HtmlCanvasElement) -> SurfaceOrigin {
    let rect = canvas.get_bounding_client_rect();
    SurfaceOrigin::new(rect.left(), rect.top())
}

pub fn mouse_point(event: &MouseEvent, origin: &SurfaceOrigin) -> Point {
    Point::new(
        event.client_x() as f64 - origin.left,
        event.client_y() as f64 - origin.top,
    )
}

/// The touches that changed in this event, in surface-local coordinates.
pub fn changed_touches(event: &TouchEvent, origin: &SurfaceOrigin) -> Vec<TouchRecord> {
    let touches = event.changed_touches();
    (0..touches.length())
        .filter_map(|index| touches.get(index))
        .map(|touch| {
            origin.to_local(&TouchRecord::new(
                touch.identifier(),
                touch.client_x() as f64,
                touch.client_y() as f64,
            ))
        })
        .collect()
}
