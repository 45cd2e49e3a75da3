use std::time::Duration;

use chrono::Utc;
use log::{error, info};
use reqwest::header::{self, HeaderMap, HeaderValue};

use geopost_core::{FixReporter, LocationFix, prelude::*};

use crate::{endpoint, payload::ReportPayload};

const REPORT_TIMEOUT: Duration = Duration::from_secs(30);

/// Ships fixes to the remote collection endpoint. Each report runs on its own
/// task, overlapping reports may complete out of order. A failed report is
/// logged and dropped, nothing is retried or buffered.
pub struct HttpReporter {
    client: reqwest::Client,
    url: String,
}

impl HttpReporter {
    pub fn new() -> Result<Self> {
        Self::with_url(endpoint::REPORT_URL)
    }

    /// Point reports somewhere other than the compiled-in endpoint
    pub fn with_url(url: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let client = reqwest::Client::builder()
            .timeout(REPORT_TIMEOUT)
            .default_headers(headers)
            .build()
            .context("Failed to build report client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    async fn send(client: reqwest::Client, url: String, payload: ReportPayload) {
        let body = match serde_json::to_vec(&payload) {
            Ok(body) => body,
            Err(why) => {
                error!("Failed to encode report: {why:?}");
                return;
            }
        };

        let res = async {
            let resp = client
                .post(&url)
                .header(header::CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await
                .context("Could not send report")?;

            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            Ok::<_, anyhow::Error>((status, text))
        }
        .await;

        match res {
            Ok((status, text)) => info!("Report response ({status}): {text}"),
            Err(why) => error!("Report failed: {why:?}"),
        }
    }
}

impl FixReporter for HttpReporter {
    async fn report(&self, fix: &LocationFix) {
        let payload = ReportPayload::new(fix, Utc::now());
        let client = self.client.clone();
        let url = self.url.clone();

        // The session must never wait on the network
        tokio::spawn(Self::send(client, url, payload));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::{TcpListener, TcpStream},
        test,
    };

    fn mk_fix() -> LocationFix {
        LocationFix {
            longitude: 1.0,
            latitude: 2.0,
            altitude: 3.0,
            horizontal_accuracy: 4.0,
            vertical_accuracy: 5.0,
            course: 6.0,
            speed: 7.0,
            timestamp: chrono::Utc.timestamp_opt(1_740_000_000, 0).unwrap(),
        }
    }

    /// Read one full request (headers plus content-length body) off a stream
    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        loop {
            let read = stream.read(&mut chunk).await.expect("Failed to read");
            buf.extend_from_slice(&chunk[..read]);

            let text = String::from_utf8_lossy(&buf).into_owned();
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);

                if buf.len() >= end + 4 + content_length {
                    return text;
                }
            }

            if read == 0 {
                return text;
            }
        }
    }

    #[test]
    async fn test_report_posts_json() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("No local addr");

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("Failed to accept");
            let request = read_request(&mut stream).await;
            stream
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok")
                .await
                .expect("Failed to respond");
            request
        });

        let reporter =
            HttpReporter::with_url(format!("http://{addr}/api/setGps")).expect("Failed to build");
        reporter.report(&mk_fix()).await;

        let request = server.await.expect("Server died");

        assert!(
            request.starts_with("POST /api/setGps"),
            "Not a POST to the report path: {request}"
        );
        let lower = request.to_lowercase();
        assert!(
            lower.contains("content-type: application/json"),
            "Missing JSON content type"
        );
        assert!(
            lower.contains("cache-control: no-cache"),
            "Missing no-cache policy"
        );

        let body = &request[request.find("\r\n\r\n").expect("No body separator") + 4..];
        let value: serde_json::Value = serde_json::from_str(body).expect("Body is not JSON");
        assert_eq!(value["longitude"], 1.0);
        assert_eq!(value["latitude"], 2.0);
        assert_eq!(value["altitude"], 3.0);
        assert_eq!(value["horizontalAccuracy"], 4.0);
        assert_eq!(value["verticalAccuracy"], 5.0);
        assert_eq!(value["course"], 6.0);
        assert_eq!(value["speed"], 7.0);
        assert!(value["timestamp"].is_number(), "Timestamp is not numeric");
    }

    #[test]
    async fn test_network_failure_is_swallowed() {
        // Grab a free port, then close it so nothing is listening
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("No local addr");
        drop(listener);

        let client = reqwest::Client::builder()
            .timeout(REPORT_TIMEOUT)
            .build()
            .expect("Failed to build client");
        let payload = ReportPayload::new(&mk_fix(), Utc::now());

        // Must return normally, the failure only gets logged
        HttpReporter::send(client, format!("http://{addr}/api/setGps"), payload).await;
    }
}
