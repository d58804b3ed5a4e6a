//! Blocking HTTP implementation of [`Backend`].

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use hdrprobe_core::{
    CalibrationOutcome, CalibrationRequest, Histogram, HistogramMode, RenderParameters,
    RenderedFrame, SessionId, SourceCoordinates, UploadOutcome,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::{
    CalibrateBody, CalibrateResponse, HealthResponse, PixelBody, PixelResponse, RenderBody,
    RenderResponse, RoiBody, RoiResponse, UploadResponse,
};
use crate::backend::Backend;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::raster::decode_data_url;

/// Talks to the processing server over its JSON API.
pub struct HttpBackend {
    agent: ureq::Agent,
    config: ClientConfig,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout()).build();
        Self { agent, config }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.config.endpoint(path);
        log::trace!("POST {}", url);
        let response = self.agent.post(&url).send_json(body)?;
        Ok(response.into_json()?)
    }
}

impl Backend for HttpBackend {
    fn health(&self) -> Result<()> {
        let url = self.config.endpoint("/healthz");
        let health: HealthResponse = self.agent.get(&url).call()?.into_json()?;
        log::debug!("Backend health: {}", health.status);
        Ok(())
    }

    fn upload(&self, path: &Path) -> Result<UploadOutcome> {
        let bytes = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        log::info!("Uploading {} ({} bytes)", filename, bytes.len());

        let boundary = multipart_boundary();
        let body = multipart_body(&boundary, &filename, &bytes);
        let url = self.config.endpoint("/api/upload");
        let response: UploadResponse = self
            .agent
            .post(&url)
            .set(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .send_bytes(&body)?
            .into_json()?;
        Ok(response.into())
    }

    fn render(&self, session: &SessionId, params: &RenderParameters) -> Result<RenderedFrame> {
        let response: RenderResponse = self.post_json(
            "/api/render",
            &RenderBody {
                session_id: session.as_str(),
                params,
            },
        )?;
        let image = decode_data_url(&response.image)?;
        response.check_size(&image)?;
        let colorbar = response
            .colorbar
            .as_deref()
            .map(decode_data_url)
            .transpose()?;
        Ok(RenderedFrame { image, colorbar })
    }

    fn probe_pixel(&self, session: &SessionId, at: SourceCoordinates) -> Result<f64> {
        let response: PixelResponse = self.post_json(
            "/api/pixel",
            &PixelBody {
                session_id: session.as_str(),
                x: at.x,
                y: at.y,
            },
        )?;
        Ok(response.luminance)
    }

    fn probe_region(
        &self,
        session: &SessionId,
        start: SourceCoordinates,
        end: SourceCoordinates,
    ) -> Result<f64> {
        let response: RoiResponse = self.post_json(
            "/api/roi",
            &RoiBody {
                session_id: session.as_str(),
                x0: start.x,
                y0: start.y,
                x1: end.x,
                y1: end.y,
            },
        )?;
        Ok(response.mean)
    }

    fn calibrate(
        &self,
        session: &SessionId,
        calibration: &CalibrationRequest,
    ) -> Result<CalibrationOutcome> {
        let response: CalibrateResponse = self.post_json(
            "/api/calibrate",
            &CalibrateBody {
                session_id: session.as_str(),
                x: calibration.target.x,
                y: calibration.target.y,
                known_value: calibration.known_value,
            },
        )?;
        Ok(response.into())
    }

    fn histogram(&self, session: &SessionId, mode: HistogramMode) -> Result<Histogram> {
        let url = self.config.endpoint("/api/histogram");
        let histogram = self
            .agent
            .get(&url)
            .query("sessionId", session.as_str())
            .query("mode", mode.as_str())
            .call()?
            .into_json()?;
        Ok(histogram)
    }
}

fn multipart_boundary() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    format!("hdrprobe-{nanos:x}")
}

/// Build a `multipart/form-data` body with the file in field `file`.
fn multipart_body(boundary: &str, filename: &str, bytes: &[u8]) -> Vec<u8> {
    let filename = filename.replace(['"', '\r', '\n'], "_");
    let mut body = Vec::with_capacity(bytes.len() + 256);
    body.extend_from_slice(
        format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one canned response and hand back the raw request.
    fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request = String::new();
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap();
                }
                request.push_str(&line);
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }
            let mut payload = vec![0; content_length];
            reader.read_exact(&mut payload).unwrap();
            request.push_str(&String::from_utf8_lossy(&payload));

            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();
            request
        });
        (url, handle)
    }

    fn backend(url: String) -> HttpBackend {
        HttpBackend::new(ClientConfig {
            base_url: url,
            timeout_secs: 5,
        })
    }

    #[test]
    fn test_pixel_probe_round_trip() {
        let (url, server) = serve_once("200 OK", r#"{"luminance": 42.25}"#);
        let value = backend(url)
            .probe_pixel(&SessionId::new("abc"), SourceCoordinates::new(204, 202))
            .unwrap();
        assert_eq!(value, 42.25);

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /api/pixel "));
        assert!(request.contains(r#"{"sessionId":"abc","x":204,"y":202}"#));
    }

    #[test]
    fn test_backend_error_detail() {
        let (url, server) = serve_once("404 Not Found", r#"{"detail":"Session not found"}"#);
        let err = backend(url)
            .probe_region(
                &SessionId::new("gone"),
                SourceCoordinates::new(1, 1),
                SourceCoordinates::new(5, 5),
            )
            .unwrap_err();
        server.join().unwrap();

        match err {
            ClientError::Backend { status, detail } => {
                assert_eq!(status, 404);
                assert_eq!(detail, "Session not found");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_histogram_query() {
        let (url, server) = serve_once("200 OK", r#"{"bins": [1.0, 10.0], "counts": [5]}"#);
        let histogram = backend(url)
            .histogram(&SessionId::new("abc"), HistogramMode::Original)
            .unwrap();
        assert_eq!(histogram.counts, vec![5]);

        let request = server.join().unwrap();
        assert!(request.starts_with("GET /api/histogram?sessionId=abc&mode=original "));
    }

    #[test]
    fn test_upload_sends_multipart_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.hdr");
        std::fs::write(&path, b"#?RADIANCE").unwrap();

        let (url, server) = serve_once(
            "200 OK",
            r#"{"sessionId":"s1","filename":"scene.hdr","width":4,"height":3,"stats":{"min":0.0,"max":1.0,"mean":0.5},"calibrated":false}"#,
        );
        let outcome = backend(url).upload(&path).unwrap();
        assert_eq!(outcome.session_id.as_str(), "s1");
        assert_eq!((outcome.width, outcome.height), (4, 3));

        let request = server.join().unwrap();
        assert!(request.contains("multipart/form-data; boundary=hdrprobe-"));
        assert!(request.contains(r#"name="file"; filename="scene.hdr""#));
        assert!(request.contains("#?RADIANCE"));
    }

    #[test]
    fn test_unreachable_backend_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        assert!(matches!(
            backend(url).health(),
            Err(ClientError::Transport(_))
        ));
    }

    #[test]
    fn test_multipart_body_layout() {
        let body = multipart_body("b", "a\"b.exr", b"xyz");
        let text = String::from_utf8(body).unwrap();
        assert!(text.starts_with("--b\r\n"));
        assert!(text.contains("filename=\"a_b.exr\""));
        assert!(text.ends_with("\r\nxyz\r\n--b--\r\n"));
    }
}
