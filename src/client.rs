// 🌐 Plans client - GET {api_base}/plans
//
// The endpoint takes no parameters; all filtering happens after retrieval.

use crate::config::Config;
use crate::error::{PlanBoardError, Result};
use crate::plan::{load_json, parse_plans, Plan};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Anything that can produce a full plan list
pub trait PlanSource: Send + Sync + 'static {
    fn fetch_plans(&self) -> impl Future<Output = Result<Vec<Plan>>> + Send;
}

// ============================================================================
// HTTP
// ============================================================================

#[derive(Debug, Clone)]
pub struct PlansClient {
    plans_url: String,
    client: reqwest::Client,
}

impl PlansClient {
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(PlansClient {
            plans_url: plans_url(api_base),
            client,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_base, config.request_timeout)
    }

    pub fn plans_url(&self) -> &str {
        &self.plans_url
    }
}

impl PlanSource for PlansClient {
    async fn fetch_plans(&self) -> Result<Vec<Plan>> {
        debug!(url = %self.plans_url, "fetching plans");

        let response = self.client.get(&self.plans_url).send().await.map_err(|e| {
            warn!(url = %self.plans_url, error = %e, "plans request failed");
            PlanBoardError::Transport(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                url = %self.plans_url,
                status = status.as_u16(),
                "plans endpoint returned an error"
            );
            return Err(PlanBoardError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let plans = parse_plans(&body)?;
        info!(count = plans.len(), "fetched plans");
        Ok(plans)
    }
}

fn plans_url(api_base: &str) -> String {
    format!("{}/plans", api_base.trim_end_matches('/'))
}

// ============================================================================
// FILE
// ============================================================================

/// A saved `/plans` response on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }
}

impl PlanSource for FileSource {
    async fn fetch_plans(&self) -> Result<Vec<Plan>> {
        let path = self.path.clone();
        let plans = tokio::task::spawn_blocking(move || load_json(&path))
            .await
            .map_err(|e| PlanBoardError::Io(std::io::Error::other(e)))??;
        info!(count = plans.len(), path = %self.path.display(), "loaded plans");
        Ok(plans)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// One-shot HTTP responder; returns the base URL and the request line
    pub(crate) async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            let text = String::from_utf8_lossy(&request).to_string();
            text.lines().next().unwrap_or_default().to_string()
        });

        (format!("http://{}/api", addr), handle)
    }

    const BODY: &str = r#"[{"plan_name":"Magnolia","price":389990,"sqft":2044,"stories":"1",
        "price_per_sqft":190.8,"last_updated":"2024-06-02T08:15:00Z",
        "price_changed_recently":false,"company":"Chesmar Homes","community":"Elevon","type":"plan"}]"#;

    #[test]
    fn test_plans_url_joins_base() {
        assert_eq!(plans_url("http://localhost:8080/api"), "http://localhost:8080/api/plans");
        assert_eq!(plans_url("http://localhost:8080/api/"), "http://localhost:8080/api/plans");
    }

    #[tokio::test]
    async fn test_fetch_plans_success() {
        let (base, server) = serve_once("200 OK", BODY).await;
        let client = PlansClient::new(&base, Duration::from_secs(5)).unwrap();
        assert_eq!(client.plans_url(), format!("{}/plans", base));

        let plans = client.fetch_plans().await.unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].company, "Chesmar Homes");

        let request_line = server.await.unwrap();
        assert_eq!(request_line, "GET /api/plans HTTP/1.1");
    }

    #[tokio::test]
    async fn test_fetch_plans_non_2xx_is_failure() {
        let (base, _server) = serve_once("500 Internal Server Error", "oops").await;
        let client = PlansClient::new(&base, Duration::from_secs(5)).unwrap();

        let err = client.fetch_plans().await.unwrap_err();
        assert!(matches!(err, PlanBoardError::Status { status: 500 }));
        assert!(err.is_fetch_failure());
    }

    #[tokio::test]
    async fn test_fetch_plans_bad_body_is_decode_error() {
        let (base, _server) = serve_once("200 OK", "{\"not\": \"a list\"}").await;
        let client = PlansClient::new(&base, Duration::from_secs(5)).unwrap();

        let err = client.fetch_plans().await.unwrap_err();
        assert!(matches!(err, PlanBoardError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_plans_connection_refused() {
        // Bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let base = format!("http://{}/api", addr);
        let client = PlansClient::new(&base, Duration::from_secs(2)).unwrap();
        let err = client.fetch_plans().await.unwrap_err();
        assert!(matches!(err, PlanBoardError::Transport(_)));
    }

    #[tokio::test]
    async fn test_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plans.json");
        std::fs::write(&path, BODY).unwrap();

        let plans = FileSource::new(&path).fetch_plans().await.unwrap();
        assert_eq!(plans[0].plan_name, "Magnolia");

        let missing = FileSource::new(dir.path().join("missing.json"));
        assert!(matches!(missing.fetch_plans().await, Err(PlanBoardError::Io(_))));
    }
}
