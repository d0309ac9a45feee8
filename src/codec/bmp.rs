//! 24-bit BMP writer matching the frame's decoder.
//!
//! The device consumes a minimal Windows BMP: 14-byte file header,
//! 40-byte BITMAPINFOHEADER, uncompressed 24-bit pixels stored bottom-up
//! in BGR order with each row zero-padded to a 4-byte multiple. The
//! `image` crate's BMP support does not guarantee these exact header
//! fields, so the file is assembled by hand.

use epaper_pipeline::PixelBuffer;

const FILE_HEADER_SIZE: u32 = 14;
const INFO_HEADER_SIZE: u32 = 40;

/// Pixels-per-meter written to both resolution fields (72 DPI).
const PPM: i32 = 2835;

fn put_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn put_i32(buf: &mut Vec<u8>, v: i32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

/// Row stride in bytes: 3 bytes per pixel, padded to a 4-byte multiple.
pub fn row_size(width: u32) -> u32 {
    (width * 3 + 3) / 4 * 4
}

/// Encode a buffer as a 24-bit bottom-up BGR BMP file.
pub fn encode_bmp(buffer: &PixelBuffer) -> Vec<u8> {
    let width = buffer.width();
    let height = buffer.height();

    let row = row_size(width);
    let image_size = row * height;
    let header_size = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
    let file_size = header_size + image_size;

    let mut out = Vec::with_capacity(file_size as usize);

    // File header
    out.extend_from_slice(b"BM");
    put_u32(&mut out, file_size);
    put_u32(&mut out, 0); // reserved
    put_u32(&mut out, header_size); // pixel data offset

    // Info header
    put_u32(&mut out, INFO_HEADER_SIZE);
    put_i32(&mut out, width as i32);
    put_i32(&mut out, height as i32);
    put_u16(&mut out, 1); // planes
    put_u16(&mut out, 24); // bits per pixel
    put_u32(&mut out, 0); // no compression
    put_u32(&mut out, image_size);
    put_i32(&mut out, PPM);
    put_i32(&mut out, PPM);
    put_u32(&mut out, 0); // colors used
    put_u32(&mut out, 0); // important colors

    // Pixel rows, bottom-up, BGR, padded
    let padding = (row - width * 3) as usize;
    for y in (0..height).rev() {
        for x in 0..width {
            let [r, g, b] = buffer.rgb_at(x, y);
            out.push(b);
            out.push(g);
            out.push(r);
        }
        out.extend(std::iter::repeat(0u8).take(padding));
    }

    out
}
