use image::RgbImage;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};

use crate::detection::FramePipeline;
use crate::models::{FrameResult, ScanResult};

/// Last successful scan of a session, shared between the worker that
/// writes it and whatever displays it.
#[derive(Clone, Default)]
pub struct ResultSlot {
    inner: Arc<RwLock<Option<ScanResult>>>,
}

impl ResultSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<ScanResult> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn store(&self, scan: ScanResult) {
        *self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(scan);
    }

    /// Record the frame's scan if it found a code; misses leave the slot alone
    pub fn update(&self, result: &FrameResult) {
        if let Some(scan) = result.scan() {
            self.store(scan);
        }
    }

    pub fn clear(&self) {
        *self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}

/// One live video session: a worker thread running the pipeline over
/// submitted frames, at most one frame in flight plus one queued.
pub struct ScanSession {
    sender: Option<SyncSender<RgbImage>>,
    results: Receiver<FrameResult>,
    worker: Option<JoinHandle<()>>,
    slot: ResultSlot,
    dropped: Arc<AtomicUsize>,
}

impl ScanSession {
    pub fn start(pipeline: Arc<FramePipeline>) -> Self {
        let (sender, frames) = mpsc::sync_channel::<RgbImage>(1);
        let (result_tx, results) = mpsc::channel();
        let slot = ResultSlot::new();
        let worker_slot = slot.clone();

        let worker = thread::spawn(move || {
            for frame in frames {
                let result = pipeline.process(&frame);
                worker_slot.update(&result);
                // Display side may have gone away; keep draining until the queue closes
                let _ = result_tx.send(result);
            }
            log::debug!("Scan session worker finished");
        });

        Self {
            sender: Some(sender),
            results,
            worker: Some(worker),
            slot,
            dropped: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Queue a frame without blocking. Returns false and drops the frame
    /// when the worker is still busy with earlier ones.
    pub fn submit(&self, frame: RgbImage) -> bool {
        let Some(sender) = &self.sender else {
            return false;
        };
        match sender.try_send(frame) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                log::debug!("Worker busy, dropped frame ({} so far)", dropped);
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                log::warn!("Scan session worker is gone, frame discarded");
                false
            }
        }
    }

    /// Queue a frame, waiting for room
    pub fn submit_blocking(&self, frame: RgbImage) -> anyhow::Result<()> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Scan session already shut down"))?;
        sender
            .send(frame)
            .map_err(|e| anyhow::anyhow!("Failed to send frame: {}", e))
    }

    /// Annotated results in submission order
    pub fn results(&self) -> &Receiver<FrameResult> {
        &self.results
    }

    /// Handle for reading the last successful scan from another thread
    pub fn slot(&self) -> ResultSlot {
        self.slot.clone()
    }

    pub fn latest(&self) -> Option<ScanResult> {
        self.slot.latest()
    }

    pub fn dropped_frames(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Stop accepting frames, finish the queued ones and join the worker.
    /// Results already produced stay readable through `results()`.
    pub fn shutdown(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("Scan session worker panicked");
            }
        }
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
