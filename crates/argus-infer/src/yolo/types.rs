use argus_base::Rect;

/// One detected object instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Bounding box in original pixel-grid coordinates, origin top-left.
    pub bbox: Rect<f32>,
    pub class_id: usize,
    pub label: &'static str,
    pub confidence: f32,
}

/// Letterbox transformation parameters for mapping model-space coordinates
/// back onto the original pixel grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxInfo {
    /// Scale factor applied to the image (min over both axes, capped at 1 side fit)
    pub scale: f32,
    /// Horizontal padding added (pixels, model space)
    pub pad_x: f32,
    /// Vertical padding added (pixels, model space)
    pub pad_y: f32,
}

/// Detector tuning. Thresholds follow the usual YOLO defaults; the service
/// overrides confidence from its own configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    conf_threshold: f32,
    iou_threshold: f32,
    input_size: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            conf_threshold: 0.25,
            iou_threshold: 0.45,
            input_size: 640,
        }
    }
}

impl DetectorConfig {
    pub fn with_conf_threshold(mut self, conf: f32) -> Self {
        self.conf_threshold = conf;
        self
    }

    pub fn with_iou_threshold(mut self, iou: f32) -> Self {
        self.iou_threshold = iou;
        self
    }

    /// Side length of the square model input, must match the exported model.
    pub fn with_input_size(mut self, size: usize) -> Self {
        self.input_size = size;
        self
    }

    pub fn conf_threshold(&self) -> f32 {
        self.conf_threshold
    }

    pub fn iou_threshold(&self) -> f32 {
        self.iou_threshold
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }
}
