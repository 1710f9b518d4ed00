use std::time::Duration;

use reqwest::{Client, Proxy, StatusCode};

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_TIMEOUT: u64 = 15;

/// Per-source HTTP settings
#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    /// Upstream proxy used for the request, e.g. `http://127.0.0.1:8080`
    pub proxy: Option<String>,
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            proxy: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
        }
    }
}

/// Makes an HTTP GET request to the specified URL
///
/// # Arguments
/// * `url` - The URL to request
/// * `config` - Timeout and optional upstream proxy
///
/// # Returns
/// * `Ok(String)` - The response body as a string
/// * `Err(String)` - Error message if the request failed
pub async fn web_get_async(url: &str, config: &FetchConfig) -> Result<String, String> {
    let mut client_builder = Client::builder()
        .timeout(config.timeout)
        .user_agent("proxypool");

    if let Some(proxy) = &config.proxy {
        if !proxy.is_empty() {
            match Proxy::all(proxy) {
                Ok(proxy) => {
                    client_builder = client_builder.proxy(proxy);
                }
                Err(e) => {
                    return Err(format!("Failed to set proxy: {}", e));
                }
            }
        }
    }

    let client = match client_builder.build() {
        Ok(client) => client,
        Err(e) => {
            return Err(format!("Failed to build HTTP client: {}", e));
        }
    };

    let response = match client.get(url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            return Err(format!("Failed to send request: {}", e));
        }
    };

    if response.status() != StatusCode::OK {
        return Err(format!("HTTP error: {}", response.status()));
    }

    match response.text().await {
        Ok(body) => Ok(body),
        Err(e) => Err(format!("Failed to read response body: {}", e)),
    }
}
