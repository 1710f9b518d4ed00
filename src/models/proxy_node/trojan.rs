use serde::{Deserialize, Serialize};

use super::transport::{GrpcOptions, WsOptions};
use super::is_false;
use crate::models::{CommonOptions, ProxyNode, ProxyType};
use crate::parser::explodes::trojan::trojan_link;
use crate::utils::join_host_port;

/// Trojan node; TLS is implied by the protocol
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrojanProxy {
    #[serde(flatten)]
    pub common: CommonOptions,
    pub password: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sni: String,
    #[serde(rename = "skip-cert-verify", default, skip_serializing_if = "is_false")]
    pub skip_cert_verify: bool,
    /// Empty means plain TCP
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub network: String,
    #[serde(
        rename = "client-fingerprint",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub client_fingerprint: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alpn: Vec<String>,
    #[serde(rename = "ws-opts", default, skip_serializing_if = "WsOptions::is_empty")]
    pub ws_opts: WsOptions,
    #[serde(
        rename = "grpc-opts",
        default,
        skip_serializing_if = "GrpcOptions::is_empty"
    )]
    pub grpc_opts: GrpcOptions,
}

impl ProxyNode for TrojanProxy {
    fn proxy_type(&self) -> ProxyType {
        ProxyType::Trojan
    }

    fn common(&self) -> &CommonOptions {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonOptions {
        &mut self.common
    }

    fn identifier(&self) -> String {
        join_host_port(&self.common.server, self.common.port) + &self.password
    }

    fn link(&self) -> String {
        trojan_link(self)
    }
}
