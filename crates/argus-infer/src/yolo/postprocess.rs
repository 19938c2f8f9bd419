use crate::InferError;
use argus_base::{Rect, Tensor, Vec2};

use super::labels::COCO_CLASSES;
use super::types::{Detection, LetterboxInfo};

/// Intersection over Union of two bounding boxes.
///
/// Zero-area and non-overlapping boxes score 0.0; never divides by zero.
pub fn iou(a: &Rect<f32>, b: &Rect<f32>) -> f32 {
    if a.size.x <= 0.0 || a.size.y <= 0.0 || b.size.x <= 0.0 || b.size.y <= 0.0 {
        return 0.0;
    }

    let intersection_area = match a.intersection(*b) {
        Some(rect) => rect.size.x * rect.size.y,
        None => 0.0,
    };

    let union_area = a.area() + b.area() - intersection_area;
    if union_area <= 0.0 {
        return 0.0;
    }

    intersection_area / union_area
}

/// Post-process raw YOLO detection output.
///
/// Expects `[1, 4 + classes, N]`: rows 0-3 are the center-format box
/// (cx, cy, w, h) in model space, the remaining rows are per-class scores.
/// Applies confidence filtering, class-aware greedy NMS, letterbox
/// unmapping, and clamps boxes to the original grid.
///
/// Returns detections sorted by confidence descending; a frame with nothing
/// above threshold yields an empty vector.
pub fn postprocess(
    output: &Tensor<f32>,
    letterbox: &LetterboxInfo,
    original_hw: (usize, usize),
    conf_threshold: f32,
    iou_threshold: f32,
) -> Result<Vec<Detection>, InferError> {
    let rows = 4 + COCO_CLASSES.len();
    if output.shape.len() != 3 || output.shape[0] != 1 || output.shape[1] != rows {
        return Err(InferError::ShapeMismatch {
            expected: format!("[1, {rows}, N]"),
            got: format!("{:?}", output.shape),
        });
    }

    let n = output.shape[2];
    if n == 0 {
        return Ok(Vec::new());
    }

    let (orig_h, orig_w) = (original_hw.0 as f32, original_hw.1 as f32);
    let mut candidates = Vec::new();

    for i in 0..n {
        // Element [0, row, i] lives at row * N + i in the flat data.
        let cx = output.data[i];
        let cy = output.data[n + i];
        let w = output.data[2 * n + i];
        let h = output.data[3 * n + i];

        // Best class for this anchor.
        let mut class_id = 0;
        let mut confidence = 0.0f32;
        for class in 0..COCO_CLASSES.len() {
            let score = output.data[(4 + class) * n + i];
            if score > confidence {
                confidence = score;
                class_id = class;
            }
        }

        if confidence < conf_threshold {
            continue;
        }

        // Undo the letterbox, convert center format to origin format, clamp.
        let bw = w / letterbox.scale;
        let bh = h / letterbox.scale;
        let x0 = (cx - letterbox.pad_x) / letterbox.scale - bw / 2.0;
        let y0 = (cy - letterbox.pad_y) / letterbox.scale - bh / 2.0;

        let min_x = x0.clamp(0.0, orig_w);
        let min_y = y0.clamp(0.0, orig_h);
        let max_x = (x0 + bw).clamp(0.0, orig_w);
        let max_y = (y0 + bh).clamp(0.0, orig_h);

        let bbox = Rect::from_min_max(Vec2::new(min_x, min_y), Vec2::new(max_x, max_y));

        candidates.push(Detection {
            bbox,
            class_id,
            label: COCO_CLASSES[class_id],
            confidence,
        });
    }

    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Greedy NMS, class-aware: boxes of different classes never suppress
    // each other.
    let mut keep: Vec<Detection> = Vec::new();
    let mut suppressed = vec![false; candidates.len()];

    for i in 0..candidates.len() {
        if suppressed[i] {
            continue;
        }

        for j in (i + 1)..candidates.len() {
            if suppressed[j] || candidates[j].class_id != candidates[i].class_id {
                continue;
            }
            if iou(&candidates[i].bbox, &candidates[j].bbox) > iou_threshold {
                suppressed[j] = true;
            }
        }

        keep.push(candidates[i].clone());
    }

    Ok(keep)
}
