//! The backend seam and request execution.

use std::path::Path;

use hdrprobe_core::{
    CalibrationOutcome, CalibrationRequest, Event, Histogram, HistogramMode, RenderParameters,
    RenderedFrame, Request, SessionId, SourceCoordinates, UploadOutcome,
};

use crate::error::Result;

/// Blocking calls to the processing backend.
///
/// Implementations are driven from a worker thread, one call at a time.
pub trait Backend: Send {
    /// Check that the backend is reachable.
    fn health(&self) -> Result<()>;

    /// Upload an image file and open a session for it.
    fn upload(&self, path: &Path) -> Result<UploadOutcome>;

    /// Render the session with the given parameters.
    fn render(&self, session: &SessionId, params: &RenderParameters) -> Result<RenderedFrame>;

    /// Luminance of one pixel in cd/m².
    fn probe_pixel(&self, session: &SessionId, at: SourceCoordinates) -> Result<f64>;

    /// Mean luminance of the rectangle spanned by two corners.
    fn probe_region(
        &self,
        session: &SessionId,
        start: SourceCoordinates,
        end: SourceCoordinates,
    ) -> Result<f64>;

    /// Calibrate the session so `calibration.target` reads `known_value`.
    fn calibrate(
        &self,
        session: &SessionId,
        calibration: &CalibrationRequest,
    ) -> Result<CalibrationOutcome>;

    fn histogram(&self, session: &SessionId, mode: HistogramMode) -> Result<Histogram>;
}

/// Run one request and wrap its outcome in the matching completion event.
pub fn execute(backend: &dyn Backend, request: Request) -> Event {
    let operation = request.operation();
    log::debug!("Executing {} request", operation);

    match request {
        Request::Upload { token, path } => Event::UploadCompleted {
            token,
            result: backend
                .upload(&path)
                .map_err(|e| e.into_probe_error(operation)),
        },
        Request::Render {
            token,
            session,
            params,
        } => Event::RenderCompleted {
            token,
            result: backend
                .render(&session, &params)
                .map_err(|e| e.into_probe_error(operation)),
        },
        Request::ProbePixel { token, session, at } => Event::PixelProbeCompleted {
            token,
            at,
            result: backend
                .probe_pixel(&session, at)
                .map_err(|e| e.into_probe_error(operation)),
        },
        Request::ProbeRegion {
            token,
            session,
            start,
            end,
        } => Event::RegionProbeCompleted {
            token,
            start,
            end,
            result: backend
                .probe_region(&session, start, end)
                .map_err(|e| e.into_probe_error(operation)),
        },
        Request::Calibrate {
            token,
            session,
            calibration,
        } => Event::CalibrationCompleted {
            token,
            result: backend
                .calibrate(&session, &calibration)
                .map_err(|e| e.into_probe_error(operation)),
        },
        Request::Histogram {
            token,
            session,
            mode,
        } => Event::HistogramCompleted {
            token,
            mode,
            result: backend
                .histogram(&session, mode)
                .map_err(|e| e.into_probe_error(operation)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use hdrprobe_core::{ProbeError, RequestChannel, RequestSequencer};

    struct FlakyBackend;

    impl Backend for FlakyBackend {
        fn health(&self) -> Result<()> {
            Ok(())
        }

        fn upload(&self, _path: &Path) -> Result<UploadOutcome> {
            Err(ClientError::Backend {
                status: 400,
                detail: "Unsupported image format".to_string(),
            })
        }

        fn render(&self, _: &SessionId, _: &RenderParameters) -> Result<RenderedFrame> {
            Err(ClientError::Transport("connection refused".to_string()))
        }

        fn probe_pixel(&self, _: &SessionId, at: SourceCoordinates) -> Result<f64> {
            Ok(f64::from(at.x + at.y))
        }

        fn probe_region(
            &self,
            _: &SessionId,
            _: SourceCoordinates,
            _: SourceCoordinates,
        ) -> Result<f64> {
            Ok(7.5)
        }

        fn calibrate(
            &self,
            _: &SessionId,
            calibration: &CalibrationRequest,
        ) -> Result<CalibrationOutcome> {
            Ok(CalibrationOutcome {
                scale_factor: calibration.known_value / 50.0,
                stats: Default::default(),
            })
        }

        fn histogram(&self, _: &SessionId, _: HistogramMode) -> Result<Histogram> {
            Ok(Histogram::default())
        }
    }

    #[test]
    fn test_execute_echoes_probe_context() {
        let mut sequencer = RequestSequencer::new();
        let token = sequencer.issue(RequestChannel::Probe);
        let at = SourceCoordinates::new(3, 4);

        let event = execute(
            &FlakyBackend,
            Request::ProbePixel {
                token,
                session: SessionId::new("s"),
                at,
            },
        );
        assert_eq!(
            event,
            Event::PixelProbeCompleted {
                token,
                at,
                result: Ok(7.0)
            }
        );
    }

    #[test]
    fn test_execute_maps_errors_to_network_failure() {
        let mut sequencer = RequestSequencer::new();
        let token = sequencer.issue(RequestChannel::Upload);

        let event = execute(
            &FlakyBackend,
            Request::Upload {
                token,
                path: "missing.hdr".into(),
            },
        );
        match event {
            Event::UploadCompleted { result, .. } => assert_eq!(
                result,
                Err(ProbeError::network("upload", "Unsupported image format"))
            ),
            other => panic!("unexpected event {other:?}"),
        }

        let token = sequencer.issue(RequestChannel::Render);
        let event = execute(
            &FlakyBackend,
            Request::Render {
                token,
                session: SessionId::new("s"),
                params: hdrprobe_core::ControlState::new().build(),
            },
        );
        assert!(matches!(
            event,
            Event::RenderCompleted {
                result: Err(ProbeError::NetworkFailure { .. }),
                ..
            }
        ));
    }

    #[test]
    fn test_execute_calibration() {
        let mut sequencer = RequestSequencer::new();
        let token = sequencer.issue(RequestChannel::Calibration);
        let event = execute(
            &FlakyBackend,
            Request::Calibrate {
                token,
                session: SessionId::new("s"),
                calibration: CalibrationRequest {
                    target: SourceCoordinates::new(1, 1),
                    known_value: 100.0,
                },
            },
        );
        match event {
            Event::CalibrationCompleted { result, .. } => {
                assert_eq!(result.unwrap().scale_factor, 2.0)
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
