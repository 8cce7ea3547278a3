use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Event, HtmlCanvasElement, HtmlElement, MouseEvent, TouchEvent,
};

use lilyboard_shared::{DrawingSurface, TouchRecord};

use crate::dom::{
    changed_touches, client_origin, get_element, mouse_point, offset_origin, size_canvas,
};
use crate::net::submit_canvas;
use crate::render::CanvasSurface;
use crate::state::State;
use crate::toolbar::{
    change_action_from_event, click_action_from_event, ToolbarChange, ToolbarClick,
};

const CANVAS_ID: &str = "drawing-board";
const TOOLBAR_ID: &str = "toolbar";

fn document_ready_state(document: &web_sys::Document) -> Option<String> {
    Reflect::get(document.as_ref(), &JsValue::from_str("readyState"))
        .ok()?
        .as_string()
}

fn configure_logging() {
    console_error_panic_hook::set_once();
    // A second start (hot reload, tests) finds the subscriber already set.
    let _ = tracing_wasm::try_set_as_global_default();
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    configure_logging();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    let started = Rc::new(Cell::new(false));

    if document_ready_state(&document).as_deref() == Some("complete") {
        started.set(true);
        return start_app();
    }

    let onload_started = started.clone();
    let onload = Closure::<dyn FnMut(Event)>::new(move |_| {
        if onload_started.replace(true) {
            return;
        }
        if let Err(err) = start_app() {
            tracing::error!(error = ?err, "drawing board failed to start");
        }
    });
    window.add_event_listener_with_callback("load", onload.as_ref().unchecked_ref())?;
    onload.forget();

    Ok(())
}

fn start_app() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let canvas: HtmlCanvasElement = get_element(&document, CANVAS_ID)?;
    let toolbar: HtmlElement = get_element(&document, TOOLBAR_ID)?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    size_canvas(&window, &canvas)?;

    let state = Rc::new(RefCell::new(State::new(
        canvas.clone(),
        CanvasSurface::new(canvas.clone(), ctx),
        offset_origin(&canvas),
    )));

    {
        let click_state = state.clone();
        let window = window.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(action) = click_action_from_event(&event) else {
                return;
            };
            let mut state = click_state.borrow_mut();
            match action {
                ToolbarClick::Clear => {
                    state.touches.surface_mut().clear();
                    tracing::debug!("cleared drawing board");
                }
                ToolbarClick::Submit => {
                    if let Err(err) = submit_canvas(&window, &state.canvas) {
                        tracing::error!(error = ?err, "could not submit drawing");
                    }
                }
            }
        });
        toolbar.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let change_state = state.clone();
        let onchange = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(action) = change_action_from_event(&event) else {
                return;
            };
            let state = change_state.borrow();
            match action {
                ToolbarChange::StrokeColor(color) => {
                    state.touches.surface().set_color(&color);
                    state.style.set_color(color);
                }
                ToolbarChange::LineWidth(width) => state.style.set_line_width(width),
            }
        });
        toolbar.add_event_listener_with_callback("change", onchange.as_ref().unchecked_ref())?;
        onchange.forget();
    }

    {
        let down_state = state.clone();
        let ondown = Closure::<dyn FnMut(MouseEvent)>::new(move |_event: MouseEvent| {
            down_state.borrow_mut().mouse.press();
        });
        canvas.add_event_listener_with_callback("mousedown", ondown.as_ref().unchecked_ref())?;
        ondown.forget();
    }

    {
        let up_state = state.clone();
        let onup = Closure::<dyn FnMut(MouseEvent)>::new(move |_event: MouseEvent| {
            up_state.borrow_mut().mouse.release();
        });
        canvas.add_event_listener_with_callback("mouseup", onup.as_ref().unchecked_ref())?;
        onup.forget();
    }

    {
        let move_state = state.clone();
        let onmove = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let mut state = move_state.borrow_mut();
            let state = &mut *state;
            let point = mouse_point(&event, &state.mouse_origin);
            state
                .mouse
                .drag(point, state.touches.surface_mut(), &*state.style);
        });
        canvas.add_event_listener_with_callback("mousemove", onmove.as_ref().unchecked_ref())?;
        onmove.forget();
    }

    add_touch_listener(&canvas, &state, "touchstart", |state, batch| {
        state.touches.on_contacts_begin(batch)
    })?;
    add_touch_listener(&canvas, &state, "touchmove", |state, batch| {
        state.touches.on_contacts_move(batch)
    })?;
    add_touch_listener(&canvas, &state, "touchend", |state, batch| {
        state.touches.on_contacts_end(batch)
    })?;
    add_touch_listener(&canvas, &state, "touchcancel", |state, batch| {
        state.touches.on_contacts_cancel(batch)
    })?;

    {
        let hide_state = state.clone();
        let onpagehide = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            let mut state = hide_state.borrow_mut();
            state.touches.clear_contacts();
            state.mouse.release();
        });
        window.add_event_listener_with_callback("pagehide", onpagehide.as_ref().unchecked_ref())?;
        onpagehide.forget();
    }

    tracing::info!("drawing board ready");
    Ok(())
}

/// Routes one kind of touch event into the tracker. A touch start also
/// refreshes the canvas origin used for the touches that follow.
fn add_touch_listener(
    canvas: &HtmlCanvasElement,
    state: &Rc<RefCell<State>>,
    kind: &'static str,
    apply: fn(&mut State, &[TouchRecord]),
) -> Result<(), JsValue> {
    let touch_state = state.clone();
    let handler = Closure::<dyn FnMut(TouchEvent)>::new(move |event: TouchEvent| {
        event.prevent_default();
        let mut state = touch_state.borrow_mut();
        if kind == "touchstart" {
            state.touch_origin = client_origin(&state.canvas);
        }
        let batch = changed_touches(&event, &state.touch_origin);
        tracing::trace!(kind, touches = batch.len(), active = state.touches.len());
        apply(&mut *state, &batch);
    });
    canvas.add_event_listener_with_callback(kind, handler.as_ref().unchecked_ref())?;
    handler.forget();
    Ok(())
}
