//! Proxy sources
//!
//! A getter is a configured, stateless description of where proxies come
//! from. It can be invoked any number of times; each invocation returns a
//! fresh [`ProxyList`]. Getters are built by name through a
//! [`GetterRegistry`] from a loose option map.

mod clash;
mod custom;
mod registry;
mod subscribe;
mod webfuzz;

use std::collections::HashMap;
use std::time::Duration;

use futures::future::BoxFuture;
use log::{error, info, warn};
use serde_yaml::Value;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::models::{Proxy, ProxyList};
use crate::utils::FetchConfig;

pub use clash::ClashGetter;
pub use custom::CustomGetter;
pub use registry::{GetterFactory, GetterRegistry};
pub use subscribe::SubscribeGetter;
pub use webfuzz::WebFuzzGetter;

/// Loose getter configuration, as found under `options` in the config file
pub type Options = HashMap<String, Value>;

#[derive(Error, Debug)]
pub enum GetterError {
    #[error("option `url` not found")]
    UrlNotFound,

    #[error("option `{0}` not found")]
    MissingOption(String),

    #[error("option `{key}` must be {expected}")]
    InvalidOption { key: String, expected: &'static str },

    #[error("unknown getter type: {0}")]
    UnknownGetter(String),

    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("exec failed: {0}")]
    Exec(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("decode failed: {0}")]
    Decode(String),
}

impl GetterError {
    /// Errors that mean the getter was configured wrongly, as opposed to a
    /// source being unavailable right now
    pub fn is_misconfiguration(&self) -> bool {
        matches!(
            self,
            GetterError::UrlNotFound
                | GetterError::MissingOption(_)
                | GetterError::InvalidOption { .. }
                | GetterError::UnknownGetter(_)
        )
    }
}

pub trait Getter: Send + Sync {
    /// Identity used in logs, e.g. `Subscribe(https://example.com/sub)`
    fn source(&self) -> String;

    /// Fetch and parse the source once
    fn get(&self) -> BoxFuture<'_, Result<ProxyList, GetterError>>;

    /// Run [`Getter::get`] under `deadline` and forward every proxy into `tx`
    ///
    /// Errors and timeouts are logged against [`Getter::source`] and reported
    /// as zero proxies, so one failing source never affects the others.
    /// Returns the number of proxies sent.
    fn get_to_chan(&self, tx: mpsc::Sender<Proxy>, deadline: Duration) -> BoxFuture<'_, usize> {
        Box::pin(async move {
            let list = match tokio::time::timeout(deadline, self.get()).await {
                Ok(Ok(list)) => list,
                Ok(Err(e)) => {
                    warn!("{} failed: {}", self.source(), e);
                    return 0;
                }
                Err(_) => {
                    warn!("{} failed: {}", self.source(), GetterError::Timeout(deadline));
                    return 0;
                }
            };

            info!("STATISTIC: {} count={}", self.source(), list.len());
            let mut sent = 0;
            for proxy in list {
                if tx.send(proxy).await.is_err() {
                    warn!("{}: collector closed, dropping remaining proxies", self.source());
                    break;
                }
                sent += 1;
            }
            sent
        })
    }

    /// Blocking variant of [`Getter::get`] for callers outside any runtime
    ///
    /// Failures are logged and yield an empty list. Must not be called from
    /// within a tokio runtime.
    fn get_blocking(&self) -> ProxyList {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                error!("{}: failed to start runtime: {}", self.source(), e);
                return ProxyList::new();
            }
        };
        match runtime.block_on(self.get()) {
            Ok(list) => list,
            Err(e) => {
                warn!("{} failed: {}", self.source(), e);
                ProxyList::new()
            }
        }
    }
}

/// Read a required non-empty string option
pub fn required_string(options: &Options, key: &str) -> Result<String, GetterError> {
    match options.get(key) {
        None | Some(Value::Null) if key == "url" => Err(GetterError::UrlNotFound),
        None | Some(Value::Null) => Err(GetterError::MissingOption(key.to_string())),
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(_) => Err(GetterError::InvalidOption {
            key: key.to_string(),
            expected: "a non-empty string",
        }),
    }
}

/// Read an optional string option; an empty string counts as absent
pub fn optional_string(options: &Options, key: &str) -> Result<Option<String>, GetterError> {
    match options.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(_) => Err(GetterError::InvalidOption {
            key: key.to_string(),
            expected: "a string",
        }),
    }
}

/// HTTP settings shared by the fetching getters: `timeout` (seconds) and `proxy`
pub fn fetch_config(options: &Options) -> Result<FetchConfig, GetterError> {
    let mut config = FetchConfig {
        proxy: optional_string(options, "proxy")?,
        ..Default::default()
    };
    match options.get("timeout") {
        None | Some(Value::Null) => {}
        Some(value) => match value.as_u64().filter(|secs| *secs > 0) {
            Some(secs) => config.timeout = Duration::from_secs(secs),
            None => {
                return Err(GetterError::InvalidOption {
                    key: "timeout".to_string(),
                    expected: "a positive number of seconds",
                })
            }
        },
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProxyNode;
    use crate::parser::parse_proxy_from_link;

    pub(crate) fn options(pairs: &[(&str, Value)]) -> Options {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    struct Fixed(ProxyList);

    impl Getter for Fixed {
        fn source(&self) -> String {
            "Fixed".to_string()
        }

        fn get(&self) -> BoxFuture<'_, Result<ProxyList, GetterError>> {
            Box::pin(async move { Ok(self.0.clone()) })
        }
    }

    struct Failing;

    impl Getter for Failing {
        fn source(&self) -> String {
            "Failing".to_string()
        }

        fn get(&self) -> BoxFuture<'_, Result<ProxyList, GetterError>> {
            Box::pin(async { Err(GetterError::Fetch("connection refused".to_string())) })
        }
    }

    fn sample() -> ProxyList {
        ["trojan://a@one.com:443", "trojan://b@two.com:443"]
            .iter()
            .map(|l| parse_proxy_from_link(l).unwrap())
            .collect()
    }

    #[test]
    fn test_required_string() {
        let opts = options(&[
            ("url", Value::String(" https://a.com ".into())),
            ("empty", Value::String("".into())),
            ("number", Value::from(3)),
        ]);
        assert_eq!(required_string(&opts, "url").unwrap(), "https://a.com");
        assert!(matches!(
            required_string(&Options::new(), "url"),
            Err(GetterError::UrlNotFound)
        ));
        assert!(matches!(
            required_string(&opts, "exec"),
            Err(GetterError::MissingOption(key)) if key == "exec"
        ));
        assert!(matches!(
            required_string(&opts, "empty"),
            Err(GetterError::InvalidOption { .. })
        ));
        assert!(matches!(
            required_string(&opts, "number"),
            Err(GetterError::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_optional_string() {
        let opts = options(&[
            ("args", Value::String("-a b".into())),
            ("empty", Value::String("".into())),
            ("blank", Value::String("  ".into())),
            ("number", Value::from(3)),
        ]);
        assert_eq!(
            optional_string(&opts, "args").unwrap().as_deref(),
            Some("-a b")
        );
        assert_eq!(optional_string(&opts, "empty").unwrap(), None);
        assert_eq!(optional_string(&opts, "blank").unwrap(), None);
        assert_eq!(optional_string(&opts, "missing").unwrap(), None);
        assert!(matches!(
            optional_string(&opts, "number"),
            Err(GetterError::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_fetch_config() {
        let config = fetch_config(&options(&[
            ("timeout", Value::from(5)),
            ("proxy", Value::String("socks5://127.0.0.1:1080".into())),
        ]))
        .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.proxy.as_deref(), Some("socks5://127.0.0.1:1080"));

        assert_eq!(fetch_config(&Options::new()).unwrap(), FetchConfig::default());
        assert!(fetch_config(&options(&[("timeout", Value::from(-1))])).is_err());
    }

    #[tokio::test]
    async fn test_get_to_chan_forwards_everything() {
        let (tx, mut rx) = mpsc::channel(1);
        let getter = Fixed(sample());
        let worker = tokio::spawn(async move {
            getter.get_to_chan(tx, Duration::from_secs(5)).await
        });

        let mut received = Vec::new();
        while let Some(proxy) = rx.recv().await {
            received.push(proxy.identifier());
        }
        assert_eq!(worker.await.unwrap(), 2);
        assert_eq!(received, vec!["one.com:443a", "two.com:443b"]);
    }

    #[tokio::test]
    async fn test_get_to_chan_isolates_errors() {
        let (tx, mut rx) = mpsc::channel(4);
        assert_eq!(Failing.get_to_chan(tx, Duration::from_secs(5)).await, 0);
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn test_get_blocking() {
        assert_eq!(Fixed(sample()).get_blocking().len(), 2);
        assert!(Failing.get_blocking().is_empty());
    }
}
