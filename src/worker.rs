//! Background thread for backend calls.
//!
//! The UI thread never blocks on the network. Requests emitted by the
//! controller are queued to a [`BackendWorker`]; completions come back as
//! controller events and are drained once per frame.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use hdrprobe_client::{execute, Backend};
use hdrprobe_core::{Event, Request};

/// Callback that wakes the UI after a result is queued.
pub type Waker = Box<dyn Fn() + Send>;

/// Message sent to the worker thread.
enum ThreadMessage {
    /// Run a backend request
    Execute(Request),
    /// Shutdown the thread
    Shutdown,
}

/// Manages the thread that runs backend requests in order.
pub struct BackendWorker {
    /// Sender for requests to the background thread
    request_tx: Sender<ThreadMessage>,
    /// Receiver for completion events from the background thread
    result_rx: Receiver<Event>,
    /// Handle to the background thread (for joining on drop)
    thread_handle: Option<JoinHandle<()>>,
    /// Requests sent but not yet drained
    pending: usize,
}

impl BackendWorker {
    /// Spawn the worker thread around `backend`.
    ///
    /// The thread checks backend health once before serving requests.
    pub fn spawn<B>(backend: B, waker: Waker) -> std::io::Result<Self>
    where
        B: Backend + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<ThreadMessage>();
        let (result_tx, result_rx) = mpsc::channel::<Event>();

        let thread_handle = thread::Builder::new()
            .name("backend-worker".to_string())
            .spawn(move || {
                log::info!("Backend worker thread started");
                match backend.health() {
                    Ok(()) => log::info!("Backend is reachable"),
                    Err(e) => log::warn!("Backend health check failed: {}", e),
                }
                Self::thread_loop(&backend, request_rx, result_tx, waker);
                log::info!("Backend worker thread exiting");
            })?;

        Ok(Self {
            request_tx,
            result_rx,
            thread_handle: Some(thread_handle),
            pending: 0,
        })
    }

    /// Background thread main loop.
    fn thread_loop(
        backend: &dyn Backend,
        request_rx: Receiver<ThreadMessage>,
        result_tx: Sender<Event>,
        waker: Waker,
    ) {
        loop {
            match request_rx.recv() {
                Ok(ThreadMessage::Execute(request)) => {
                    let event = execute(backend, request);
                    if result_tx.send(event).is_err() {
                        log::warn!("Result channel closed, backend worker exiting");
                        break;
                    }
                    waker();
                }
                Ok(ThreadMessage::Shutdown) => {
                    log::debug!("Received shutdown signal");
                    break;
                }
                Err(_) => {
                    log::debug!("Request channel closed, backend worker exiting");
                    break;
                }
            }
        }
    }

    /// Queue a request for the background thread.
    pub fn submit(&mut self, request: Request) {
        let operation = request.operation();
        if self
            .request_tx
            .send(ThreadMessage::Execute(request))
            .is_err()
        {
            log::error!("Failed to send {} request: channel closed", operation);
        } else {
            self.pending += 1;
            log::debug!("Queued {} request ({} pending)", operation, self.pending);
        }
    }

    /// Take one completion event. Non-blocking.
    pub fn take_one_result(&mut self) -> Option<Event> {
        match self.result_rx.try_recv() {
            Ok(event) => {
                self.pending = self.pending.saturating_sub(1);
                Some(event)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::warn!("Backend worker disconnected");
                None
            }
        }
    }

    /// Get the number of requests not yet drained.
    pub fn pending_count(&self) -> usize {
        self.pending
    }
}

impl Drop for BackendWorker {
    fn drop(&mut self) {
        log::debug!("Shutting down backend worker");

        let _ = self.request_tx.send(ThreadMessage::Shutdown);

        if let Some(handle) = self.thread_handle.take() {
            if let Err(e) = handle.join() {
                log::warn!("Backend worker panicked: {:?}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    use hdrprobe_client::ClientError;
    use hdrprobe_core::{
        CalibrationOutcome, CalibrationRequest, Histogram, HistogramMode, RenderParameters,
        RenderedFrame, RequestChannel, RequestSequencer, SessionId, SourceCoordinates,
        UploadOutcome,
    };

    struct FakeBackend;

    impl Backend for FakeBackend {
        fn health(&self) -> hdrprobe_client::Result<()> {
            Err(ClientError::Transport("offline".to_string()))
        }

        fn upload(&self, _: &Path) -> hdrprobe_client::Result<UploadOutcome> {
            Err(ClientError::Transport("offline".to_string()))
        }

        fn render(
            &self,
            _: &SessionId,
            _: &RenderParameters,
        ) -> hdrprobe_client::Result<RenderedFrame> {
            Err(ClientError::Transport("offline".to_string()))
        }

        fn probe_pixel(&self, _: &SessionId, at: SourceCoordinates) -> hdrprobe_client::Result<f64> {
            Ok(f64::from(at.x) * 10.0)
        }

        fn probe_region(
            &self,
            _: &SessionId,
            _: SourceCoordinates,
            _: SourceCoordinates,
        ) -> hdrprobe_client::Result<f64> {
            Ok(1.0)
        }

        fn calibrate(
            &self,
            _: &SessionId,
            _: &CalibrationRequest,
        ) -> hdrprobe_client::Result<CalibrationOutcome> {
            Err(ClientError::Transport("offline".to_string()))
        }

        fn histogram(
            &self,
            _: &SessionId,
            _: HistogramMode,
        ) -> hdrprobe_client::Result<Histogram> {
            Ok(Histogram::default())
        }
    }

    fn wait_for_result(worker: &mut BackendWorker) -> Event {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(event) = worker.take_one_result() {
                return event;
            }
            assert!(Instant::now() < deadline, "worker did not answer");
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn probe(sequencer: &mut RequestSequencer, x: u32) -> Request {
        Request::ProbePixel {
            token: sequencer.issue(RequestChannel::Probe),
            session: SessionId::new("s"),
            at: SourceCoordinates::new(x, 0),
        }
    }

    #[test]
    fn test_results_arrive_in_submission_order() {
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&wakes);
        let mut worker = BackendWorker::spawn(
            FakeBackend,
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .unwrap();

        let mut sequencer = RequestSequencer::new();
        worker.submit(probe(&mut sequencer, 1));
        worker.submit(probe(&mut sequencer, 2));
        assert_eq!(worker.pending_count(), 2);

        for expected in [10.0, 20.0] {
            match wait_for_result(&mut worker) {
                Event::PixelProbeCompleted { result, .. } => assert_eq!(result, Ok(expected)),
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert_eq!(worker.pending_count(), 0);
        assert_eq!(wakes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failures_come_back_as_events() {
        let mut worker = BackendWorker::spawn(FakeBackend, Box::new(|| {})).unwrap();
        let mut sequencer = RequestSequencer::new();
        worker.submit(Request::Upload {
            token: sequencer.issue(RequestChannel::Upload),
            path: "scene.hdr".into(),
        });

        match wait_for_result(&mut worker) {
            Event::UploadCompleted { result, .. } => {
                let err = result.unwrap_err();
                assert_eq!(err.to_string(), "Request failed: offline");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_drop_joins_thread() {
        let worker = BackendWorker::spawn(FakeBackend, Box::new(|| {})).unwrap();
        drop(worker);
    }
}
