//! In-place rendering of detection results onto an RGB pixel grid.
//!
//! Draws a coloured box outline per detection plus a filled label tag with
//! the class name and confidence. Everything is plain pixel writes into the
//! HWC buffer; a frame with no detections is left untouched.

use crate::yolo::Detection;
use argus_base::Tensor;

const BOX_THICKNESS: usize = 2;

const GLYPH_W: usize = 5;
const GLYPH_H: usize = 7;
// Tag box: glyphs plus 2px padding on every side.
const TAG_H: usize = GLYPH_H + 4;

/// Per-class box colours, cycled by class id.
const PALETTE: [[u8; 3]; 20] = [
    [0xFF, 0x38, 0x38],
    [0xFF, 0x9D, 0x97],
    [0xFF, 0x70, 0x1F],
    [0xFF, 0xB2, 0x1D],
    [0xCF, 0xD2, 0x31],
    [0x48, 0xF9, 0x0A],
    [0x92, 0xCC, 0x17],
    [0x3D, 0xDB, 0x86],
    [0x1A, 0x93, 0x34],
    [0x00, 0xD4, 0xBB],
    [0x2C, 0x99, 0xA8],
    [0x00, 0xC2, 0xFF],
    [0x34, 0x45, 0x93],
    [0x64, 0x73, 0xFF],
    [0x00, 0x18, 0xEC],
    [0x84, 0x38, 0xFF],
    [0x52, 0x00, 0x85],
    [0xCB, 0x38, 0xFF],
    [0xFF, 0x95, 0xC8],
    [0xFF, 0x37, 0xC7],
];

pub fn class_color(class_id: usize) -> [u8; 3] {
    PALETTE[class_id % PALETTE.len()]
}

/// Draw boxes and label tags for `detections` onto `frame` (`[H, W, 3]`).
///
/// Boxes falling partially outside the grid are clipped. Frames with a
/// non-RGB shape are returned untouched.
pub fn annotate(frame: &mut Tensor<u8>, detections: &[Detection]) {
    let [height, width] = match frame.shape[..] {
        [h, w, 3] => [h, w],
        _ => return,
    };
    if height == 0 || width == 0 {
        return;
    }

    for det in detections {
        let color = class_color(det.class_id);

        let x0 = (det.bbox.min().x.round().max(0.0) as usize).min(width - 1);
        let y0 = (det.bbox.min().y.round().max(0.0) as usize).min(height - 1);
        let x1 = (det.bbox.max().x.round().max(0.0) as usize).min(width - 1);
        let y1 = (det.bbox.max().y.round().max(0.0) as usize).min(height - 1);
        if x1 <= x0 || y1 <= y0 {
            continue;
        }

        draw_box_outline(frame, width, x0, y0, x1, y1, color);

        let text = format!(
            "{} {:.0}%",
            det.label.to_ascii_uppercase(),
            det.confidence * 100.0
        );
        draw_tag(frame, width, height, x0, y0, &text, color);
    }
}

fn put_pixel(frame: &mut Tensor<u8>, width: usize, x: usize, y: usize, color: [u8; 3]) {
    let idx = (y * width + x) * 3;
    frame.data[idx] = color[0];
    frame.data[idx + 1] = color[1];
    frame.data[idx + 2] = color[2];
}

fn draw_box_outline(
    frame: &mut Tensor<u8>,
    width: usize,
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
    color: [u8; 3],
) {
    let thickness = BOX_THICKNESS.min(y1 - y0).min(x1 - x0);

    for t in 0..thickness {
        for x in x0..=x1 {
            put_pixel(frame, width, x, y0 + t, color);
            put_pixel(frame, width, x, y1 - t, color);
        }
        for y in y0..=y1 {
            put_pixel(frame, width, x0 + t, y, color);
            put_pixel(frame, width, x1 - t, y, color);
        }
    }
}

/// Filled label tag anchored to the box's top-left corner. Sits above the
/// box when there is room, inside it otherwise.
fn draw_tag(
    frame: &mut Tensor<u8>,
    width: usize,
    height: usize,
    x0: usize,
    y0: usize,
    text: &str,
    color: [u8; 3],
) {
    let tag_w = text.chars().count() * (GLYPH_W + 1) + 3;
    let tag_x0 = x0.min(width.saturating_sub(tag_w));
    let tag_y0 = if y0 >= TAG_H { y0 - TAG_H } else { y0 };

    let tag_x1 = (tag_x0 + tag_w).min(width);
    let tag_y1 = (tag_y0 + TAG_H).min(height);

    for y in tag_y0..tag_y1 {
        for x in tag_x0..tag_x1 {
            put_pixel(frame, width, x, y, color);
        }
    }

    // Black on bright colours, white on dark ones.
    let luminance =
        0.299 * color[0] as f32 + 0.587 * color[1] as f32 + 0.114 * color[2] as f32;
    let text_color = if luminance > 140.0 {
        [0u8, 0, 0]
    } else {
        [255u8, 255, 255]
    };

    let mut pen_x = tag_x0 + 2;
    let pen_y = tag_y0 + 2;
    for c in text.chars() {
        let rows = glyph(c);
        for (dy, row) in rows.iter().enumerate() {
            for dx in 0..GLYPH_W {
                if row & (0x10 >> dx) != 0 {
                    let x = pen_x + dx;
                    let y = pen_y + dy;
                    if x < width && y < height {
                        put_pixel(frame, width, x, y, text_color);
                    }
                }
            }
        }
        pen_x += GLYPH_W + 1;
    }
}

/// 5x7 bitmap rows for the tag charset (uppercase, digits, a few symbols).
/// Each row holds 5 bits, most significant bit leftmost.
fn glyph(c: char) -> [u8; 7] {
    match c {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '%' => [0x18, 0x19, 0x02, 0x04, 0x08, 0x13, 0x03],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        _ => [0x00; 7],
    }
}
