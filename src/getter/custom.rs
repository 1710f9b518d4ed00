use futures::future::BoxFuture;
use log::{debug, error, warn};
use tokio::process::Command;

use super::{
    fetch_config, optional_string, required_string, ClashGetter, Getter, GetterError, Options,
    SubscribeGetter,
};
use crate::models::ProxyList;
use crate::parser::parse_proxy_from_link;
use crate::utils::FetchConfig;

/// Runs a user supplied executable and reads proxies from its output
///
/// Every whitespace-separated field the program prints is either a
/// subscription address (anything starting with `http`) or a share link.
#[derive(Debug, Clone)]
pub struct CustomGetter {
    exec: String,
    args: String,
    fetch: FetchConfig,
}

impl CustomGetter {
    pub fn new(options: &Options) -> Result<Self, GetterError> {
        Ok(CustomGetter {
            exec: required_string(options, "exec")?,
            args: optional_string(options, "args")?.unwrap_or_default(),
            fetch: fetch_config(options)?,
        })
    }

    /// Stdout followed by stderr, or `None` when the program could not run
    /// or exited unsuccessfully
    async fn run(&self) -> Option<String> {
        let output = match Command::new(&self.exec)
            .args(self.args.split_whitespace())
            .kill_on_drop(true)
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                error!("{} failed to start: {}", self.exec, e);
                return None;
            }
        };

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push('\n');
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            error!("{} failed ({}): {}", self.exec, output.status, text.trim());
            return None;
        }
        Some(text)
    }

    async fn collect(&self, output: &str) -> ProxyList {
        let mut result = ProxyList::new();
        for field in output.split_whitespace() {
            if field.starts_with("http") {
                let subscribe = SubscribeGetter::with_url(field, self.fetch.clone());
                let mut list = fetch_logged(&subscribe).await;
                if list.is_empty() {
                    let clash = ClashGetter::with_url(field, self.fetch.clone());
                    list = fetch_logged(&clash).await;
                }
                result.uniq_append(list);
            } else {
                match parse_proxy_from_link(field) {
                    Ok(proxy) => {
                        result.push_unique(proxy);
                    }
                    Err(e) => debug!("{}: dropping `{}`: {}", self.exec, field, e),
                }
            }
        }
        result
    }
}

/// Run a nested getter, logging its failure and yielding nothing instead
async fn fetch_logged(getter: &dyn Getter) -> ProxyList {
    match getter.get().await {
        Ok(list) => list,
        Err(e) => {
            warn!("{} failed: {}", getter.source(), e);
            ProxyList::new()
        }
    }
}

impl Getter for CustomGetter {
    fn source(&self) -> String {
        if self.args.is_empty() {
            format!("Custom({})", self.exec)
        } else {
            format!("Custom({} {})", self.exec, self.args)
        }
    }

    fn get(&self) -> BoxFuture<'_, Result<ProxyList, GetterError>> {
        Box::pin(async move {
            match self.run().await {
                Some(output) => Ok(self.collect(&output).await),
                None => Ok(ProxyList::new()),
            }
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::getter::tests::options;
    use crate::models::ProxyNode;
    use serde_yaml::Value;

    fn custom(exec: &str, args: &str) -> CustomGetter {
        CustomGetter::new(&options(&[
            ("exec", Value::String(exec.into())),
            ("args", Value::String(args.into())),
        ]))
        .unwrap()
    }

    #[tokio::test]
    async fn test_links_from_output() {
        let getter = custom(
            "echo",
            "trojan://a@one.com:443 not-a-link trojan://a@one.com:443#dup vless://u@two.com:443",
        );
        let list = getter.get().await.unwrap();

        let ids: Vec<String> = list.iter().map(|p| p.identifier()).collect();
        assert_eq!(ids, vec!["one.com:443a", "two.com:443u"]);
    }

    #[tokio::test]
    async fn test_unreachable_subscription_keeps_links() {
        let getter = custom(
            "echo",
            "http://127.0.0.1:1/sub trojan://a@one.com:443",
        );
        let list = getter.get().await.unwrap();

        let ids: Vec<String> = list.iter().map(|p| p.identifier()).collect();
        assert_eq!(ids, vec!["one.com:443a"]);
    }

    #[tokio::test]
    async fn test_failing_program_yields_nothing() {
        let list = custom("false", "").get().await.unwrap();
        assert!(list.is_empty());

        let list = custom("/nonexistent/proxypool-plugin", "").get().await.unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_new() {
        assert!(matches!(
            CustomGetter::new(&Options::new()),
            Err(GetterError::MissingOption(key)) if key == "exec"
        ));
        assert_eq!(custom("echo", "").source(), "Custom(echo)");
        assert_eq!(custom("./plugin", "-a b").source(), "Custom(./plugin -a b)");
    }
}
