//! Frame codec for the argus pipeline.
//!
//! Wraps the `image` crate to decode compressed frames from memory into HWC
//! tensors and to encode pixel grids back to JPEG. The per-frame exchange is
//! byte-in, byte-out; nothing here resizes or renegotiates colour spaces.

pub mod error;
pub mod types;

pub use error::ImageError;
pub use types::Image;

use argus_base::Tensor;
use crates_image::{DynamicImage, ImageEncoder};

fn to_tensor<T>(
    width: u32,
    height: u32,
    channels: usize,
    data: Vec<T>,
) -> Result<Tensor<T>, ImageError> {
    let shape = vec![height as usize, width as usize, channels];
    Ok(Tensor::new(shape, data)?)
}

fn decode_inner(data: &[u8]) -> Result<Image, ImageError> {
    let img = crates_image::load_from_memory(data)?;

    match img {
        DynamicImage::ImageLuma8(buf) => {
            let (w, h) = buf.dimensions();
            Ok(Image::U8(to_tensor(w, h, 1, buf.into_raw())?))
        }
        DynamicImage::ImageLumaA8(buf) => {
            let (w, h) = buf.dimensions();
            Ok(Image::U8(to_tensor(w, h, 2, buf.into_raw())?))
        }
        DynamicImage::ImageRgb8(buf) => {
            let (w, h) = buf.dimensions();
            Ok(Image::U8(to_tensor(w, h, 3, buf.into_raw())?))
        }
        DynamicImage::ImageRgba8(buf) => {
            let (w, h) = buf.dimensions();
            Ok(Image::U8(to_tensor(w, h, 4, buf.into_raw())?))
        }
        DynamicImage::ImageLuma16(buf) => {
            let (w, h) = buf.dimensions();
            Ok(Image::U16(to_tensor(w, h, 1, buf.into_raw())?))
        }
        DynamicImage::ImageLumaA16(buf) => {
            let (w, h) = buf.dimensions();
            Ok(Image::U16(to_tensor(w, h, 2, buf.into_raw())?))
        }
        DynamicImage::ImageRgb16(buf) => {
            let (w, h) = buf.dimensions();
            Ok(Image::U16(to_tensor(w, h, 3, buf.into_raw())?))
        }
        DynamicImage::ImageRgba16(buf) => {
            let (w, h) = buf.dimensions();
            Ok(Image::U16(to_tensor(w, h, 4, buf.into_raw())?))
        }
        DynamicImage::ImageRgb32F(buf) => {
            let (w, h) = buf.dimensions();
            Ok(Image::F32(to_tensor(w, h, 3, buf.into_raw())?))
        }
        DynamicImage::ImageRgba32F(buf) => {
            let (w, h) = buf.dimensions();
            Ok(Image::F32(to_tensor(w, h, 4, buf.into_raw())?))
        }
        // Unknown future variants go through an RGBA8 conversion
        _ => {
            let rgba = img.to_rgba8();
            let (w, h) = rgba.dimensions();
            Ok(Image::U8(to_tensor(w, h, 4, rgba.into_raw())?))
        }
    }
}

fn encode_jpeg_inner(image: &Image, quality: u8) -> Result<Vec<u8>, ImageError> {
    let (width, height) = (image.width() as u32, image.height() as u32);
    let channels = image.channels();

    let u8_data: Vec<u8> = match image {
        Image::U8(t) => t.data.clone(),
        Image::U16(t) => t.data.iter().map(|&v| (v >> 8) as u8).collect(),
        Image::F32(t) => t
            .data
            .iter()
            .map(|&v| (v.clamp(0.0, 1.0) * 255.0) as u8)
            .collect(),
    };

    // JPEG holds grayscale or RGB; alpha channels are stripped.
    let (jpeg_data, color_type) = match channels {
        1 => (u8_data, crates_image::ExtendedColorType::L8),
        2 => {
            let stripped: Vec<u8> = u8_data.chunks_exact(2).map(|c| c[0]).collect();
            (stripped, crates_image::ExtendedColorType::L8)
        }
        3 => (u8_data, crates_image::ExtendedColorType::Rgb8),
        4 => {
            let stripped: Vec<u8> = u8_data
                .chunks_exact(4)
                .flat_map(|c| &c[..3])
                .copied()
                .collect();
            (stripped, crates_image::ExtendedColorType::Rgb8)
        }
        _ => {
            return Err(ImageError::Encode(format!(
                "unsupported channel count: {channels}"
            )));
        }
    };

    let mut buffer = Vec::new();
    let encoder = crates_image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(&jpeg_data, width, height, color_type)
        .map_err(|e| ImageError::Encode(e.to_string()))?;

    Ok(buffer)
}

/// Decode a compressed frame from memory.
///
/// The format is auto-detected. Malformed input yields `ImageError::Decode`
/// and no pixel grid. The CPU-bound work runs on tokio's blocking pool.
pub async fn decode(data: &[u8]) -> Result<Image, ImageError> {
    let owned = data.to_vec();
    tokio::task::spawn_blocking(move || decode_inner(&owned))
        .await
        .map_err(|e| ImageError::Decode(e.to_string()))?
}

/// Decode a compressed frame synchronously.
pub fn decode_blocking(data: &[u8]) -> Result<Image, ImageError> {
    decode_inner(data)
}

/// Encode an image as JPEG bytes.
///
/// `quality` is 1-100, higher keeping more detail. The CPU-bound work runs
/// on tokio's blocking pool.
pub async fn encode_jpeg(image: Image, quality: u8) -> Result<Vec<u8>, ImageError> {
    tokio::task::spawn_blocking(move || encode_jpeg_inner(&image, quality))
        .await
        .map_err(|e| ImageError::Encode(e.to_string()))?
}

/// Encode an image as JPEG bytes synchronously.
pub fn encode_jpeg_blocking(image: &Image, quality: u8) -> Result<Vec<u8>, ImageError> {
    encode_jpeg_inner(image, quality)
}
