use argus_base::Tensor;
use argus_infer::{
    Detection, DetectorConfig, DetectorPool, Device, Infer, InferError, ModelSource,
};

const MODEL_PATH: &str = "../../models/yolov8n.onnx";

#[test]
fn pool_construction_fails_for_missing_file() {
    let result = DetectorPool::new(
        ModelSource::File("no-such-model.onnx".into()),
        Device::Cpu,
        DetectorConfig::default(),
        2,
    );
    match result {
        Err(InferError::ModelLoad(_)) => {}
        Err(other) => panic!("expected ModelLoad error, got {other}"),
        Ok(_) => panic!("expected failure"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn pool_runs_real_model() {
    if !std::path::Path::new(MODEL_PATH).exists() {
        eprintln!("Skipping real model test: {} not found", MODEL_PATH);
        return;
    }

    let pool = DetectorPool::new(
        ModelSource::File(MODEL_PATH.into()),
        Device::Cpu,
        DetectorConfig::default(),
        2,
    )
    .expect("failed to load model");
    assert_eq!(pool.workers(), 2);

    // Featureless gray frame: structure of the output matters, not content.
    let frame = Tensor::new(vec![480, 640, 3], vec![128u8; 480 * 640 * 3]).unwrap();
    let detections: Vec<Detection> = pool.detect(frame, None).await.expect("inference failed");

    for det in &detections {
        assert!(det.confidence > 0.0 && det.confidence <= 1.0);
        assert!(det.class_id < argus_infer::COCO_CLASSES.len());
        assert!(det.bbox.size.x >= 0.0 && det.bbox.size.y >= 0.0);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn pool_serves_concurrent_callers() {
    if !std::path::Path::new(MODEL_PATH).exists() {
        eprintln!("Skipping real model test: {} not found", MODEL_PATH);
        return;
    }

    let pool = std::sync::Arc::new(
        DetectorPool::new(
            ModelSource::File(MODEL_PATH.into()),
            Device::Cpu,
            DetectorConfig::default(),
            2,
        )
        .expect("failed to load model"),
    );

    let mut tasks = Vec::new();
    for _ in 0..4 {
        let pool = pool.clone();
        tasks.push(tokio::spawn(async move {
            let frame = Tensor::new(vec![240, 320, 3], vec![128u8; 240 * 320 * 3]).unwrap();
            pool.detect(frame, None).await
        }));
    }

    for task in tasks {
        task.await.unwrap().expect("inference failed");
    }
}
