use serde::{Deserialize, Serialize};

use crate::models::{CommonOptions, ProxyNode, ProxyType};
use crate::parser::explodes::ssr::ssr_link;
use crate::utils::join_host_port;

/// ShadowsocksR node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShadowsocksRProxy {
    #[serde(flatten)]
    pub common: CommonOptions,
    pub cipher: String,
    pub password: String,
    pub protocol: String,
    pub obfs: String,
    #[serde(
        rename = "protocol-param",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub protocol_param: String,
    #[serde(rename = "obfs-param", default, skip_serializing_if = "String::is_empty")]
    pub obfs_param: String,
    /// Publisher group carried by the link, not part of the Clash record
    #[serde(skip)]
    pub group: String,
}

impl ProxyNode for ShadowsocksRProxy {
    fn proxy_type(&self) -> ProxyType {
        ProxyType::ShadowsocksR
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
        ssr_link(self)
    }
}
