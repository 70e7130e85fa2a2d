use reqwest::Client;
use std::time::Duration;

/// Desktop browser user agent; the scraped pages reject obvious bots.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates the HTTP client shared by all trend sources.
    ///
    /// The request timeout bounds each HTTP call; the cookie store keeps
    /// session cookies handed out by Google Trends between requests.
    pub fn create_client(request_timeout: Duration) -> Client {
        Client::builder()
            .pool_max_idle_per_host(5)
            .timeout(request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(BROWSER_USER_AGENT)
            .cookie_store(true)
            .build()
            .unwrap_or_else(|_| Client::new())
    }
}
