use argus_base::Tensor;

/// A decoded image preserving the source pixel precision.
///
/// All variants use HWC layout `[height, width, channels]`.
#[derive(Debug, Clone, PartialEq)]
pub enum Image {
    U8(Tensor<u8>),
    U16(Tensor<u16>),
    F32(Tensor<f32>),
}

impl Image {
    pub fn shape(&self) -> &[usize] {
        match self {
            Image::U8(t) => &t.shape,
            Image::U16(t) => &t.shape,
            Image::F32(t) => &t.shape,
        }
    }

    pub fn height(&self) -> usize {
        self.shape()[0]
    }

    pub fn width(&self) -> usize {
        self.shape()[1]
    }

    pub fn channels(&self) -> usize {
        self.shape()[2]
    }

    /// Convert to the canonical 3-channel 8-bit RGB pixel grid.
    ///
    /// Grayscale is replicated across channels, alpha is stripped, 16-bit
    /// samples are narrowed to their high byte, and float samples are
    /// clamped to [0, 1] and rescaled.
    pub fn into_rgb8(self) -> Tensor<u8> {
        let height = self.height();
        let width = self.width();
        let channels = self.channels();

        let u8_data: Vec<u8> = match self {
            Image::U8(t) => t.data,
            Image::U16(t) => t.data.iter().map(|&v| (v >> 8) as u8).collect(),
            Image::F32(t) => t
                .data
                .iter()
                .map(|&v| (v.clamp(0.0, 1.0) * 255.0) as u8)
                .collect(),
        };

        let rgb: Vec<u8> = match channels {
            1 => u8_data.iter().flat_map(|&v| [v, v, v]).collect(),
            2 => u8_data.chunks_exact(2).flat_map(|c| [c[0], c[0], c[0]]).collect(),
            3 => u8_data,
            _ => u8_data
                .chunks_exact(channels)
                .flat_map(|c| [c[0], c[1], c[2]])
                .collect(),
        };

        // Length is width * height * 3 by construction.
        Tensor {
            shape: vec![height, width, 3],
            data: rgb,
        }
    }
}
