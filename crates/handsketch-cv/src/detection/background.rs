//! Detector running on a worker thread
//!
//! Detection may be slow (model inference), so it can run off the logic
//! thread. Only one request is ever in flight and each reply is received
//! back on the caller's thread before the pipeline touches any state.

use crate::Result;
use anyhow::anyhow;
use handsketch_core::{Detection, Detector};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

type Reply = Result<Option<Vec<Detection>>>;

/// Forwards [`Detector::detect`] calls to a detector owned by a worker thread.
pub struct BackgroundDetector {
    requests: Option<Sender<()>>,
    replies: Receiver<Reply>,
    worker: Option<JoinHandle<()>>,
}

impl BackgroundDetector {
    /// Move `detector` onto its own thread.
    pub fn spawn<D>(mut detector: D) -> Self
    where
        D: Detector + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<()>();
        let (reply_tx, reply_rx) = mpsc::channel::<Reply>();

        let worker = thread::spawn(move || {
            for () in request_rx {
                if reply_tx.send(detector.detect()).is_err() {
                    break;
                }
            }
            debug!("detector worker exiting");
        });

        Self {
            requests: Some(request_tx),
            replies: reply_rx,
            worker: Some(worker),
        }
    }
}

impl Detector for BackgroundDetector {
    fn detect(&mut self) -> Result<Option<Vec<Detection>>> {
        let requests = self
            .requests
            .as_ref()
            .ok_or_else(|| anyhow!("detector worker already shut down"))?;

        requests
            .send(())
            .map_err(|_| anyhow!("detector worker stopped"))?;
        self.replies
            .recv()
            .map_err(|_| anyhow!("detector worker exited without replying"))?
    }
}

impl Drop for BackgroundDetector {
    fn drop(&mut self) {
        // closing the request channel ends the worker loop
        self.requests.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("detector worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::ReplayDetector;
    use handsketch_core::BBox;

    #[test]
    fn replies_arrive_in_request_order() -> Result<()> {
        let frames = (0..5)
            .map(|i| {
                Some(vec![Detection::new(
                    "point",
                    BBox::new(i as f64, 0.0, 1.0, 1.0),
                    1.0,
                )])
            })
            .collect();
        let mut detector = BackgroundDetector::spawn(ReplayDetector::from_frames(frames));

        for i in 0..5 {
            let frame = detector.detect()?.unwrap();
            assert_eq!(frame[0].bbox.x, i as f64);
        }
        assert_eq!(detector.detect()?, None);
        Ok(())
    }

    #[test]
    fn worker_errors_are_forwarded() {
        let mut detector = BackgroundDetector::spawn(ReplayDetector::from_frames(vec![None]));
        assert!(detector.detect().is_err());
    }

    struct Panicking;

    impl Detector for Panicking {
        fn detect(&mut self) -> Result<Option<Vec<Detection>>> {
            panic!("model crashed");
        }
    }

    #[test]
    fn worker_panic_surfaces_as_error_and_drop_survives_it() {
        let mut detector = BackgroundDetector::spawn(Panicking);
        let err = detector.detect().unwrap_err();
        assert!(err.to_string().contains("exited without replying"));
        assert!(detector.detect().is_err());
        drop(detector);
    }
}
