// ============================================================================
// SHAPES - rectangle outline
// ============================================================================

use crate::buffer::PixelBuffer;

/// Outline colour in storage order: full first channel (blue on screen).
pub const RECT_COLOR: [u8; 3] = [255, 0, 0];

/// Outline width in pixels.
pub const RECT_THICKNESS: u32 = 2;

/// Draw a rectangle outline with corners at `p1` and `p2` (any order).
///
/// The band covers the corner rows/columns and `thickness - 1` more pixels
/// inward. Unlike a stroke centred on the edge, nothing is painted outside
/// the corner coordinates, so the visible outline sits inside the box.
/// Anything outside the buffer is clipped; a rectangle entirely off the
/// buffer draws nothing.
pub fn draw_rectangle(
    buf: &mut PixelBuffer,
    p1: (i32, i32),
    p2: (i32, i32),
    color: [u8; 3],
    thickness: u32,
) {
    let thickness = thickness.max(1) as i64;
    let left = p1.0.min(p2.0) as i64;
    let right = p1.0.max(p2.0) as i64;
    let top = p1.1.min(p2.1) as i64;
    let bottom = p1.1.max(p2.1) as i64;

    // Clip the bounding box first so the loops stay within the buffer.
    let x0 = left.max(0);
    let x1 = right.min(buf.width() as i64 - 1);
    let y0 = top.max(0);
    let y1 = bottom.min(buf.height() as i64 - 1);
    if x0 > x1 || y0 > y1 {
        return;
    }

    for y in y0..=y1 {
        let on_row_band = y - top < thickness || bottom - y < thickness;
        for x in x0..=x1 {
            let on_band = on_row_band || x - left < thickness || right - x < thickness;
            if on_band {
                buf.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}
