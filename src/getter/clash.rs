use futures::future::BoxFuture;
use log::debug;
use serde::Deserialize;

use super::{fetch_config, required_string, Getter, GetterError, Options};
use crate::models::{Proxy, ProxyList};
use crate::utils::{web_get_async, FetchConfig};

/// A Clash/mihomo configuration file; only its `proxies` are read
#[derive(Debug, Clone)]
pub struct ClashGetter {
    url: String,
    fetch: FetchConfig,
}

#[derive(Deserialize)]
struct ClashConfig {
    #[serde(default)]
    proxies: Vec<serde_yaml::Value>,
}

impl ClashGetter {
    pub fn new(options: &Options) -> Result<Self, GetterError> {
        Ok(ClashGetter {
            url: required_string(options, "url")?,
            fetch: fetch_config(options)?,
        })
    }

    pub(crate) fn with_url(url: &str, fetch: FetchConfig) -> Self {
        ClashGetter {
            url: url.to_string(),
            fetch,
        }
    }
}

impl Getter for ClashGetter {
    fn source(&self) -> String {
        format!("Clash({})", self.url)
    }

    fn get(&self) -> BoxFuture<'_, Result<ProxyList, GetterError>> {
        Box::pin(async move {
            let body = web_get_async(&self.url, &self.fetch)
                .await
                .map_err(GetterError::Fetch)?;
            parse_clash_config(&body)
        })
    }
}

/// Read the `proxies` of a Clash config, skipping entries of unsupported types
pub fn parse_clash_config(text: &str) -> Result<ProxyList, GetterError> {
    let config: ClashConfig =
        serde_yaml::from_str(text).map_err(|e| GetterError::Decode(e.to_string()))?;

    let mut list = ProxyList::new();
    for entry in config.proxies {
        match serde_yaml::from_value::<Proxy>(entry) {
            Ok(proxy) => {
                list.push_unique(proxy);
            }
            Err(e) => debug!("Skipping clash proxy: {}", e),
        }
    }
    Ok(list)
}
