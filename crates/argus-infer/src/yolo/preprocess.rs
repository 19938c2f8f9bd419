use crate::InferError;
use argus_base::Tensor;

use super::types::LetterboxInfo;

// Ultralytics-convention gray padding, normalized.
const PAD_COLOR: f32 = 114.0 / 255.0;

/// Prepare an RGB pixel grid for YOLO inference.
///
/// Takes an HWC `Tensor<u8>` `[height, width, 3]` and returns an NCHW
/// `Tensor<f32>` `[1, 3, target, target]` with values in [0, 1]:
/// letterbox resize to the square model input (aspect preserved,
/// nearest-neighbor), gray padding, channel transpose, rescale.
///
/// The returned `LetterboxInfo` maps model-space coordinates back to the
/// original grid.
pub fn preprocess(
    frame: &Tensor<u8>,
    target: usize,
) -> Result<(Tensor<f32>, LetterboxInfo), InferError> {
    if frame.shape.len() != 3 {
        return Err(InferError::ShapeMismatch {
            expected: "[H, W, 3]".to_string(),
            got: format!("{:?}", frame.shape),
        });
    }
    let [h, w, c] = [frame.shape[0], frame.shape[1], frame.shape[2]];
    if c != 3 {
        return Err(InferError::ShapeMismatch {
            expected: "3 channels".to_string(),
            got: format!("{c} channels"),
        });
    }
    if h == 0 || w == 0 {
        return Err(InferError::ShapeMismatch {
            expected: "non-zero dimensions".to_string(),
            got: format!("{h}x{w}"),
        });
    }

    let scale = (target as f32 / w as f32).min(target as f32 / h as f32);
    let new_w = ((w as f32 * scale) as usize).max(1);
    let new_h = ((h as f32 * scale) as usize).max(1);
    let pad_x = ((target - new_w) / 2) as f32;
    let pad_y = ((target - new_h) / 2) as f32;

    let pad_x_int = pad_x as usize;
    let pad_y_int = pad_y as usize;

    let mut nchw_data = vec![PAD_COLOR; 3 * target * target];

    for out_y in 0..new_h {
        let src_y = ((out_y as f32 / scale).floor() as usize).min(h - 1);
        for out_x in 0..new_w {
            let src_x = ((out_x as f32 / scale).floor() as usize).min(w - 1);
            let src_idx = (src_y * w + src_x) * 3;
            let dst_y = out_y + pad_y_int;
            let dst_x = out_x + pad_x_int;

            for ch in 0..3 {
                let dst_idx = ch * (target * target) + dst_y * target + dst_x;
                nchw_data[dst_idx] = frame.data[src_idx + ch] as f32 / 255.0;
            }
        }
    }

    let preprocessed = Tensor::new(vec![1, 3, target, target], nchw_data)?;

    Ok((
        preprocessed,
        LetterboxInfo {
            scale,
            pad_x,
            pad_y,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(h: usize, w: usize, value: u8) -> Tensor<u8> {
        Tensor::new(vec![h, w, 3], vec![value; h * w * 3]).unwrap()
    }

    #[test]
    fn output_shape_and_normalization() {
        let frame = solid_frame(480, 640, 128);
        let (tensor, letterbox) = preprocess(&frame, 640).unwrap();

        assert_eq!(tensor.shape, vec![1, 3, 640, 640]);
        assert_eq!(letterbox.scale, 1.0);
        assert_eq!(letterbox.pad_x, 0.0);
        assert_eq!(letterbox.pad_y, 80.0);

        // Center pixel (channel 0) comes from the image, normalized.
        let center = 320 * 640 + 320;
        assert!((tensor.data[center] - 128.0 / 255.0).abs() < 1e-6);

        // Top rows are padding.
        assert!((tensor.data[0] - 114.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn wide_image_pads_vertically_only() {
        let frame = solid_frame(100, 200, 0);
        let (_, letterbox) = preprocess(&frame, 640).unwrap();
        assert!((letterbox.scale - 3.2).abs() < 1e-6);
        assert_eq!(letterbox.pad_x, 0.0);
        assert_eq!(letterbox.pad_y, 160.0);
    }

    #[test]
    fn rejects_wrong_rank() {
        let flat = Tensor::new(vec![100, 100], vec![0u8; 10000]).unwrap();
        assert!(preprocess(&flat, 640).is_err());
    }

    #[test]
    fn rejects_wrong_channel_count() {
        let rgba = Tensor::new(vec![4, 4, 4], vec![0u8; 64]).unwrap();
        assert!(preprocess(&rgba, 640).is_err());
    }

    #[test]
    fn rejects_zero_dimension() {
        let empty = Tensor::new(vec![0, 640, 3], vec![]).unwrap();
        assert!(preprocess(&empty, 640).is_err());
    }
}
