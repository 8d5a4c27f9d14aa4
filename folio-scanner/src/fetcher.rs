use crate::error::{Result, ScanError};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Some storefronts reject requests that don't look like they come from a browser.
pub const USER_AGENT: &str = "Mozilla/5.0";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Issues single GET requests and hands back the raw markup.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    timeout: Duration,
}

impl PageFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .connect_timeout(timeout / 2)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch `url` once. Anything but a 200 is an error, redirects included;
    /// there are no retries.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        if url.trim().is_empty() {
            return Err(ScanError::InvalidArgument(
                "cannot fetch an empty URL".to_string(),
            ));
        }

        debug!("Fetching {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!("{} answered with {}", url, status);
            return Err(ScanError::FetchError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[tokio::test]
    async fn test_fetch_returns_body_verbatim() {
        let mock_server = MockServer::start().await;
        let body = "<html><body>Test content</body></html>";

        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetcher = PageFetcher::new().unwrap();
        let html = fetcher.fetch(&format!("{}/", mock_server.uri())).await.unwrap();

        assert_eq!(html, body);
    }

    #[tokio::test]
    async fn test_fetch_non_200_is_fetch_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetcher = PageFetcher::new().unwrap();
        let err = fetcher.fetch(&mock_server.uri()).await.unwrap_err();

        assert!(matches!(err, ScanError::FetchError { status: 404, .. }));
        assert_eq!(err.status(), Some(404));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_fetch_other_success_codes_are_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let fetcher = PageFetcher::new().unwrap();
        let err = fetcher.fetch(&mock_server.uri()).await.unwrap_err();

        assert_eq!(err.status(), Some(204));
    }

    #[tokio::test]
    async fn test_fetch_does_not_follow_redirects() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string("moved body"))
            .expect(0)
            .mount(&mock_server)
            .await;

        let fetcher = PageFetcher::new().unwrap();
        let err = fetcher
            .fetch(&format!("{}/old", mock_server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, ScanError::FetchError { status: 301, .. }));
        let received = mock_server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_empty_url_is_invalid_argument() {
        let fetcher = PageFetcher::new().unwrap();

        let err = fetcher.fetch("").await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidArgument(_)));

        let err = fetcher.fetch("   ").await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidArgument(_)));
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_transport_error() {
        // Bind then release a port so nothing is listening on it
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let uri = format!("http://{}/", listener.local_addr().unwrap());
        drop(listener);

        let fetcher = PageFetcher::with_timeout(Duration::from_secs(2)).unwrap();
        let err = fetcher.fetch(&uri).await.unwrap_err();

        assert!(matches!(err, ScanError::TransportError(_)));
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("slow")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let fetcher = PageFetcher::with_timeout(Duration::from_millis(100)).unwrap();
        let err = fetcher.fetch(&mock_server.uri()).await.unwrap_err();

        assert!(matches!(err, ScanError::TransportError(_)));
        assert_eq!(fetcher.timeout(), Duration::from_millis(100));
    }
}
