use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Headers, HtmlCanvasElement, RequestInit, Response, Window};

use lilyboard_shared::IMAGE_PATH;

/// Posts the canvas as a PNG data URL. The outcome is only logged.
pub fn submit_canvas(window: &Window, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let data_url = canvas.to_data_url()?;
    tracing::debug!(bytes = data_url.len(), "submitting drawing");

    let headers = Headers::new()?;
    headers.set("Content-Type", "application/x-www-form-urlencoded")?;
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(&data_url));
    let promise = window.fetch_with_str_and_init(IMAGE_PATH, &init);

    let on_ok = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
        let Ok(response) = value.dyn_into::<Response>() else {
            return;
        };
        if response.ok() {
            tracing::info!(status = response.status(), "drawing submitted");
        } else {
            tracing::warn!(
                status = response.status(),
                status_text = %response.status_text(),
                "drawing rejected"
            );
        }
    });
    let on_err = Closure::<dyn FnMut(JsValue)>::new(move |err: JsValue| {
        tracing::error!(error = ?err, "drawing submission failed");
    });

    let _ = promise.then2(&on_ok, &on_err);
    on_ok.forget();
    on_err.forget();
    Ok(())
}
