//! Submitted drawings and the display framebuffer.
//!
//! The browser posts its canvas as a PNG data URL. The display wants 4-bit
//! grayscale, two pixels per byte, landscape, fetched in four equal pieces.
//! The canvas is portrait, so drawing into the framebuffer transposes it and
//! mirrors the short axis to keep the picture the right way round.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageFormat;
use lilyboard_shared::{DISPLAY_HEIGHT, DISPLAY_WIDTH, FRAMEBUFFER_QUARTERS};

const PNG_DATA_URL_HEADER: &str = "data:image/png;base64";

pub const FRAMEBUFFER_LEN: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT / 2;
pub const QUARTER_LEN: usize = FRAMEBUFFER_LEN / FRAMEBUFFER_QUARTERS;

const WHITE: u8 = 0xFF;
const TRANSPARENT: u8 = 16;

#[derive(Debug, thiserror::Error)]
pub enum DataUrlError {
    #[error("not an image")]
    NotDataUrl,
    #[error("cannot handle header: {0:?}")]
    UnsupportedHeader(String),
    #[error("b64 decode: {0}")]
    Base64(#[from] base64::DecodeError),
}

#[derive(Debug, thiserror::Error)]
pub enum FramebufferError {
    #[error("png decode: {0}")]
    Decode(#[from] image::ImageError),
    #[error("quarter {0} out of bounds [0,4)")]
    QuarterOutOfRange(usize),
}

/// Extracts the PNG bytes from a `data:image/png;base64,...` body.
pub fn decode_png_data_url(body: &[u8]) -> Result<Vec<u8>, DataUrlError> {
    let text = std::str::from_utf8(body).map_err(|_| DataUrlError::NotDataUrl)?;
    let (head, payload) = text.trim().split_once(',').ok_or(DataUrlError::NotDataUrl)?;
    if head != PNG_DATA_URL_HEADER {
        return Err(DataUrlError::UnsupportedHeader(head.to_string()));
    }
    Ok(STANDARD.decode(unescape_base64(payload))?)
}

/// Form encoding may have escaped the base64 punctuation.
fn unescape_base64(payload: &str) -> String {
    if !payload.contains('%') {
        return payload.to_string();
    }
    payload
        .replace("%2B", "+")
        .replace("%2b", "+")
        .replace("%2F", "/")
        .replace("%2f", "/")
        .replace("%3D", "=")
        .replace("%3d", "=")
}

#[derive(Clone)]
pub struct Framebuffer {
    bytes: Vec<u8>,
}

impl Framebuffer {
    pub fn blank() -> Self {
        Self {
            bytes: vec![WHITE; FRAMEBUFFER_LEN],
        }
    }

    /// Renders a portrait canvas PNG onto the landscape display.
    pub fn from_png(png: &[u8]) -> Result<Self, FramebufferError> {
        let canvas = image::load_from_memory_with_format(png, ImageFormat::Png)?.into_rgba16();
        let mut framebuffer = Self::blank();
        let columns = (canvas.width() as usize).min(DISPLAY_HEIGHT);
        let rows = (canvas.height() as usize).min(DISPLAY_WIDTH);
        for i in 0..columns {
            for j in 0..rows {
                let alpha = canvas.get_pixel(i as u32, j as u32).0[3];
                let color = alpha_to_color(alpha);
                if color < TRANSPARENT {
                    framebuffer.draw_pixel(j, DISPLAY_HEIGHT - 1 - i, color);
                }
            }
        }
        Ok(framebuffer)
    }

    /// Sets one 4-bit pixel. Even columns live in the low nibble.
    pub fn draw_pixel(&mut self, x: usize, y: usize, color: u8) {
        if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
            return;
        }
        let index = y * DISPLAY_WIDTH / 2 + x / 2;
        let v = self.bytes[index];
        self.bytes[index] = if x % 2 > 0 {
            (v & 0x0F) | (color << 4)
        } else {
            (v & 0xF0) | (color & 0x0F)
        };
    }

    pub fn quarter(&self, index: usize) -> Result<&[u8], FramebufferError> {
        if index >= FRAMEBUFFER_QUARTERS {
            return Err(FramebufferError::QuarterOutOfRange(index));
        }
        Ok(&self.bytes[index * QUARTER_LEN..(index + 1) * QUARTER_LEN])
    }
}

/// Ink darkness from coverage: opaque is 1 (darkest drawn shade), fully
/// transparent is 16 and left white.
fn alpha_to_color(alpha: u16) -> u8 {
    TRANSPARENT - (alpha / 4096) as u8
}

#[cfg(test)]
#[path = "drawing_test.rs"]
mod tests;
