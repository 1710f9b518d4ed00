use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{CommonOptions, ProxyNode, ProxyType};
use crate::parser::explodes::ss::ss_link;
use crate::utils::join_host_port;

/// Shadowsocks node
///
/// `plugin` uses Clash naming (`obfs`, `v2ray-plugin`); the link codec maps it
/// to and from the SIP003 plugin string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShadowsocksProxy {
    #[serde(flatten)]
    pub common: CommonOptions,
    pub cipher: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub plugin: String,
    #[serde(
        rename = "plugin-opts",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub plugin_opts: BTreeMap<String, Value>,
}

impl ProxyNode for ShadowsocksProxy {
    fn proxy_type(&self) -> ProxyType {
        ProxyType::Shadowsocks
    }

    fn common(&self) -> &CommonOptions {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonOptions {
        &mut self.common
    }

    fn identifier(&self) -> String {
        join_host_port(&self.common.server, self.common.port) + &self.cipher + &self.password
    }

    fn link(&self) -> String {
        ss_link(self)
    }
}
