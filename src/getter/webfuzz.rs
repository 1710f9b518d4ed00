use futures::future::BoxFuture;
use log::debug;

use super::{fetch_config, required_string, Getter, GetterError, Options};
use crate::models::ProxyList;
use crate::parser::{grep_links_from_string, parse_proxy_from_link};
use crate::utils::{web_get_async, FetchConfig};

/// Any web page; share links are scraped out of its text
#[derive(Debug, Clone)]
pub struct WebFuzzGetter {
    url: String,
    fetch: FetchConfig,
}

impl WebFuzzGetter {
    pub fn new(options: &Options) -> Result<Self, GetterError> {
        Ok(WebFuzzGetter {
            url: required_string(options, "url")?,
            fetch: fetch_config(options)?,
        })
    }
}

impl Getter for WebFuzzGetter {
    fn source(&self) -> String {
        format!("WebFuzz({})", self.url)
    }

    fn get(&self) -> BoxFuture<'_, Result<ProxyList, GetterError>> {
        Box::pin(async move {
            let body = web_get_async(&self.url, &self.fetch)
                .await
                .map_err(GetterError::Fetch)?;
            Ok(fuzz_links(&body))
        })
    }
}

/// Parse every link found anywhere in `text`
pub fn fuzz_links(text: &str) -> ProxyList {
    let mut list = ProxyList::new();
    for link in grep_links_from_string(text) {
        match parse_proxy_from_link(&link) {
            Ok(proxy) => {
                list.push_unique(proxy);
            }
            Err(e) => debug!("Dropping scraped link: {}", e),
        }
    }
    list
}
