use argus_infer::DetectorConfig;
use std::path::{Path, PathBuf};

/// What to do with a frame that cannot be decoded or re-encoded.
///
/// The session always stays open either way; this only controls whether the
/// client hears about the dropped frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Drop the frame without replying.
    Silent,
    /// Send one text notice per dropped frame.
    Notify,
}

impl ErrorPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "silent" => Some(ErrorPolicy::Silent),
            "notify" => Some(ErrorPolicy::Notify),
            _ => None,
        }
    }
}

/// Service configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    port: u16,
    model_path: PathBuf,
    workers: usize,
    conf_threshold: f32,
    jpeg_quality: u8,
    error_policy: ErrorPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            model_path: PathBuf::from("yolov8n.onnx"),
            workers: 2,
            conf_threshold: 0.35,
            jpeg_quality: 90,
            error_policy: ErrorPolicy::Silent,
        }
    }
}

impl ServerConfig {
    /// Build the configuration from environment variables.
    ///
    /// `PORT` (hosting platforms set this one), `ARGUS_MODEL`,
    /// `ARGUS_WORKERS`, `ARGUS_CONF`, `ARGUS_JPEG_QUALITY`,
    /// `ARGUS_ERROR_REPLY` (`silent` or `notify`). Unset or unparsable
    /// values keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(port) = env_parse("PORT") {
            config.port = port;
        }
        if let Ok(path) = std::env::var("ARGUS_MODEL") {
            config.model_path = PathBuf::from(path);
        }
        if let Some(workers) = env_parse("ARGUS_WORKERS") {
            config.workers = workers;
        }
        if let Some(conf) = env_parse("ARGUS_CONF") {
            config.conf_threshold = conf;
        }
        if let Some(quality) = env_parse("ARGUS_JPEG_QUALITY") {
            config.jpeg_quality = quality;
        }
        if let Some(policy) = std::env::var("ARGUS_ERROR_REPLY")
            .ok()
            .and_then(|v| ErrorPolicy::parse(&v))
        {
            config.error_policy = policy;
        }

        config
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_conf_threshold(mut self, conf: f32) -> Self {
        self.conf_threshold = conf;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn conf_threshold(&self) -> f32 {
        self.conf_threshold
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        self.error_policy
    }

    /// Detector tuning derived from the service configuration.
    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig::default().with_conf_threshold(self.conf_threshold)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
