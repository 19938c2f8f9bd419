//! Bounded inference worker pool.
//!
//! Inference is CPU-bound and must not run inline on a connection task:
//! one slow frame would serialize every other session behind the
//! scheduler. The pool owns dedicated threads fed by a bounded job queue;
//! callers await a oneshot reply.

use crate::{Detection, DetectorConfig, Device, Infer, InferError, ModelSource, OnnxBackend};
use crate::yolo::YoloDetector;
use argus_base::Tensor;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tokio::sync::{mpsc, oneshot};

struct Job {
    frame: Tensor<u8>,
    conf_override: Option<f32>,
    reply: oneshot::Sender<Result<Vec<Detection>, InferError>>,
}

pub struct DetectorPool {
    tx: Option<mpsc::Sender<Job>>,
    handles: Vec<JoinHandle<()>>,
}

impl DetectorPool {
    /// Load the model and spawn `workers` inference threads.
    ///
    /// The model source is read exactly once; every worker commits its own
    /// session from the same in-memory weights, so there is no lock on the
    /// hot path. The job queue is bounded at two jobs per worker.
    pub fn new(
        model: ModelSource,
        device: Device,
        config: DetectorConfig,
        workers: usize,
    ) -> Result<Self, InferError> {
        let workers = workers.max(1);
        let model_bytes = model.read()?;

        let (tx, rx) = mpsc::channel::<Job>(workers * 2);
        let rx = Arc::new(Mutex::new(rx));

        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let backend = OnnxBackend::new(device.clone());
            let mut detector = YoloDetector::new(
                ModelSource::Memory(model_bytes.clone()),
                &backend,
                config,
            )?;
            let rx = rx.clone();

            handles.push(thread::spawn(move || {
                log::debug!("inference worker {worker_id} up");
                loop {
                    // Hold the lock only while waiting for the next job.
                    let job = {
                        let mut rx = rx.lock().unwrap_or_else(|e| e.into_inner());
                        rx.blocking_recv()
                    };
                    let Some(job) = job else {
                        break; // Pool dropped
                    };

                    let result = detector.detect(&job.frame, job.conf_override);
                    // The caller may have gone away; nothing to do then.
                    let _ = job.reply.send(result);
                }
                log::debug!("inference worker {worker_id} down");
            }));
        }

        Ok(Self {
            tx: Some(tx),
            handles,
        })
    }

    pub fn workers(&self) -> usize {
        self.handles.len()
    }
}

impl Infer for DetectorPool {
    async fn detect(
        &self,
        frame: Tensor<u8>,
        conf_override: Option<f32>,
    ) -> Result<Vec<Detection>, InferError> {
        let (reply, response) = oneshot::channel();
        let job = Job {
            frame,
            conf_override,
            reply,
        };

        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| InferError::Pool("pool is shutting down".to_string()))?;

        tx.send(job)
            .await
            .map_err(|_| InferError::Pool("all workers exited".to_string()))?;

        response
            .await
            .map_err(|_| InferError::Pool("worker dropped job".to_string()))?
    }
}

impl Drop for DetectorPool {
    fn drop(&mut self) {
        // Closing the queue lets the workers drain and exit.
        drop(self.tx.take());
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}
