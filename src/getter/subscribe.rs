use futures::future::BoxFuture;

use super::{fetch_config, required_string, Getter, GetterError, Options};
use crate::models::ProxyList;
use crate::parser::parse_proxies_from_text;
use crate::utils::base64::base64_decode_lenient;
use crate::utils::{web_get_async, FetchConfig};

/// A subscription: base64 of newline-separated share links
#[derive(Debug, Clone)]
pub struct SubscribeGetter {
    url: String,
    fetch: FetchConfig,
}

impl SubscribeGetter {
    pub fn new(options: &Options) -> Result<Self, GetterError> {
        Ok(SubscribeGetter {
            url: required_string(options, "url")?,
            fetch: fetch_config(options)?,
        })
    }

    pub(crate) fn with_url(url: &str, fetch: FetchConfig) -> Self {
        SubscribeGetter {
            url: url.to_string(),
            fetch,
        }
    }
}

impl Getter for SubscribeGetter {
    fn source(&self) -> String {
        format!("Subscribe({})", self.url)
    }

    fn get(&self) -> BoxFuture<'_, Result<ProxyList, GetterError>> {
        Box::pin(async move {
            let body = web_get_async(&self.url, &self.fetch)
                .await
                .map_err(GetterError::Fetch)?;
            Ok(parse_subscription(&body))
        })
    }
}

/// Decode a subscription body; bodies that are not base64 are read as plain links
pub fn parse_subscription(body: &str) -> ProxyList {
    let compact: String = body.split_whitespace().collect();
    match base64_decode_lenient(&compact) {
        Some(decoded) if decoded.contains("://") => parse_proxies_from_text(&decoded),
        _ => parse_proxies_from_text(body),
    }
}
