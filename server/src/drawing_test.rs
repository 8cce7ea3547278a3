use super::*;
use image::{Rgba, RgbaImage};

fn png_bytes(canvas: &RgbaImage) -> Vec<u8> {
    let mut out = std::io::Cursor::new(Vec::new());
    canvas.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn pixel(fb: &Framebuffer, x: usize, y: usize) -> Option<u8> {
    if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
        return None;
    }
    let v = fb.bytes[y * DISPLAY_WIDTH / 2 + x / 2];
    Some(if x % 2 > 0 { v >> 4 } else { v & 0x0F })
}

fn transparent_canvas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]))
}

#[test]
fn data_url_yields_png_bytes() {
    let body = format!("data:image/png;base64,{}", STANDARD.encode([1u8, 2, 3]));
    assert_eq!(decode_png_data_url(body.as_bytes()).unwrap(), vec![1, 2, 3]);
}

#[test]
fn data_url_tolerates_form_escapes() {
    let encoded = STANDARD.encode([0xfbu8, 0xff, 0xbf, 0x01]);
    assert!(encoded.contains('+') || encoded.contains('/') || encoded.contains('='));
    let escaped = encoded
        .replace('+', "%2B")
        .replace('/', "%2F")
        .replace('=', "%3D");
    let body = format!("data:image/png;base64,{escaped}\n");
    assert_eq!(
        decode_png_data_url(body.as_bytes()).unwrap(),
        vec![0xfb, 0xff, 0xbf, 0x01]
    );
}

#[test]
fn data_url_without_comma_is_rejected() {
    assert!(matches!(
        decode_png_data_url(b"hello"),
        Err(DataUrlError::NotDataUrl)
    ));
}

#[test]
fn data_url_with_other_media_type_is_rejected() {
    let err = decode_png_data_url(b"data:image/jpeg;base64,AAAA").unwrap_err();
    match err {
        DataUrlError::UnsupportedHeader(head) => assert_eq!(head, "data:image/jpeg;base64"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn data_url_with_bad_base64_is_rejected() {
    assert!(matches!(
        decode_png_data_url(b"data:image/png;base64,!!!"),
        Err(DataUrlError::Base64(_))
    ));
}

#[test]
fn blank_framebuffer_is_white() {
    let fb = Framebuffer::blank();
    assert_eq!(fb.bytes.len(), FRAMEBUFFER_LEN);
    assert!(fb.bytes.iter().all(|b| *b == 0xFF));
    assert_eq!(pixel(&fb, 0, 0), Some(0x0F));
}

#[test]
fn pixels_pack_two_per_byte() {
    let mut fb = Framebuffer::blank();
    fb.draw_pixel(0, 0, 3);
    assert_eq!(fb.bytes[0], 0xF3);
    fb.draw_pixel(1, 0, 5);
    assert_eq!(fb.bytes[0], 0x53);
    fb.draw_pixel(2, 1, 0);
    assert_eq!(fb.bytes[DISPLAY_WIDTH / 2 + 1], 0xF0);
    assert_eq!(pixel(&fb, 1, 0), Some(5));
    assert_eq!(pixel(&fb, 2, 1), Some(0));
}

#[test]
fn pixels_outside_the_display_are_ignored() {
    let mut fb = Framebuffer::blank();
    fb.draw_pixel(DISPLAY_WIDTH, 0, 0);
    fb.draw_pixel(0, DISPLAY_HEIGHT, 0);
    assert!(fb.bytes.iter().all(|b| *b == 0xFF));
    assert_eq!(pixel(&fb, DISPLAY_WIDTH, 0), None);
}

#[test]
fn png_is_transposed_onto_the_display() {
    let mut canvas = transparent_canvas(540, 960);
    canvas.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
    canvas.put_pixel(2, 5, Rgba([0, 0, 0, 128]));

    let fb = Framebuffer::from_png(&png_bytes(&canvas)).unwrap();

    assert_eq!(pixel(&fb, 0, 539), Some(1));
    assert_eq!(pixel(&fb, 5, 537), Some(8));
    assert_eq!(pixel(&fb, 0, 0), Some(0x0F));
    assert_eq!(pixel(&fb, 2, 5), Some(0x0F));
}

#[test]
fn oversized_png_is_clipped() {
    let mut canvas = transparent_canvas(600, 1000);
    canvas.put_pixel(599, 999, Rgba([0, 0, 0, 255]));
    canvas.put_pixel(539, 959, Rgba([0, 0, 0, 255]));

    let fb = Framebuffer::from_png(&png_bytes(&canvas)).unwrap();

    assert_eq!(pixel(&fb, 959, 0), Some(1));
    let drawn = fb.bytes.iter().filter(|b| **b != 0xFF).count();
    assert_eq!(drawn, 1);
}

#[test]
fn garbage_is_not_a_png() {
    assert!(matches!(
        Framebuffer::from_png(&[1, 2, 3]),
        Err(FramebufferError::Decode(_))
    ));
}

#[test]
fn quarters_split_the_framebuffer() {
    let mut fb = Framebuffer::blank();
    fb.draw_pixel(DISPLAY_WIDTH - 1, DISPLAY_HEIGHT - 1, 0);

    for index in 0..FRAMEBUFFER_QUARTERS {
        assert_eq!(fb.quarter(index).unwrap().len(), QUARTER_LEN);
    }
    assert_eq!(*fb.quarter(3).unwrap().last().unwrap(), 0x0F);
    assert!(matches!(
        fb.quarter(4),
        Err(FramebufferError::QuarterOutOfRange(4))
    ));
}
