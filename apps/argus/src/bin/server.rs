use argus::{serve_session, FrameProcessor, ServerConfig};
use argus_base::log;
use argus_com::WsListener;
use argus_infer::{DetectorPool, Device, ModelSource};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    argus_base::init_stdout_logger();

    let config = ServerConfig::from_env();

    log::info!("Argus Detection Service");
    log::info!("loading model: {}", config.model_path().display());

    // The model file is read once here; every session shares the pool.
    let pool = DetectorPool::new(
        ModelSource::File(config.model_path().to_path_buf()),
        Device::Cpu,
        config.detector_config(),
        config.workers(),
    )?;
    log::info!("model loaded, {} inference workers", pool.workers());

    let processor = Arc::new(FrameProcessor::new(pool).with_jpeg_quality(config.jpeg_quality()));

    let listener = WsListener::bind(config.listen_addr()).await?;
    log::info!("listening on {}", listener.local_addr());

    loop {
        let (conn, peer) = listener.accept().await?;
        let processor = processor.clone();
        let policy = config.error_policy();
        tokio::spawn(async move {
            serve_session(conn, peer, processor, policy).await;
        });
    }
}
