use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use uuid::Uuid;

use crate::drawing::{decode_png_data_url, Framebuffer, FramebufferError};
use crate::error::AppError;
use crate::state::AppState;

use lilyboard_shared::FRAMEBUFFER_QUARTERS;

const FAVICON_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
<text y=".9em" font-size="90">🎨️</text>
</svg>"#;

/// `POST /image`: the body is the canvas as a PNG data URL.
pub async fn store_image(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    state.limits.store.check()?;
    let png = decode_png_data_url(&body)?;
    let id = state.images.add_image(&png).await?;
    tracing::info!(%id, bytes = png.len(), "stored image");
    Ok(StatusCode::OK)
}

/// `GET /image`: a random image id for the display to show next.
pub async fn pick_image(State(state): State<AppState>) -> Result<String, AppError> {
    let id = state.images.random_image().await?;
    Ok(id.to_string())
}

/// `GET /image/:id/:index`: one quarter of the image as display framebuffer.
pub async fn image_quarter(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Response, AppError> {
    if index >= FRAMEBUFFER_QUARTERS {
        return Err(FramebufferError::QuarterOutOfRange(index).into());
    }
    let png = state.images.read_image(id).await?;
    let quarter = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, FramebufferError> {
        let framebuffer = Framebuffer::from_png(&png)?;
        let quarter = framebuffer.quarter(index)?.to_vec();
        Ok(quarter)
    })
    .await??;
    Ok(([(CONTENT_TYPE, "application/octet-stream")], quarter).into_response())
}

/// `GET /images`: stored ids, newest first.
pub async fn list_images(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let ids = state.images.list_images().await?;
    let accept = headers
        .get(ACCEPT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let response = if accept.contains("text/html") {
        Html(render_image_list(&ids)).into_response()
    } else if accept.contains("application/json") {
        Json(ids).into_response()
    } else {
        let mut text = String::new();
        for id in &ids {
            text.push_str(&id.to_string());
            text.push('\n');
        }
        text.into_response()
    };
    Ok(response)
}

fn render_image_list(ids: &[Uuid]) -> String {
    let mut items = String::new();
    for id in ids {
        items.push_str(&format!("  <li><a href=/images/{id}>{id}</a></li>\n"));
    }
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"UTF-8\">\n  <link rel=\"stylesheet\" href=\"style.css\">\n  <link rel=\"icon\" href=\"favicon.svg\">\n</head>\n<body>\n<ul>\n{items}</ul>\n</body>\n</html>\n"
    )
}

/// `GET /images/:id`: the stored PNG.
pub async fn image_png(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let png = state.images.read_image(id).await?;
    Ok(([(CONTENT_TYPE, "image/png")], png).into_response())
}

pub async fn favicon() -> impl IntoResponse {
    ([(CONTENT_TYPE, "image/svg+xml")], FAVICON_SVG)
}

#[cfg(test)]
#[path = "handlers_test.rs"]
mod tests;
