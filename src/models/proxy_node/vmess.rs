use serde::{Deserialize, Serialize};

use super::transport::{GrpcOptions, H2Options, HttpOptions, WsOptions};
use super::{default_cipher, default_network, is_false};
use crate::models::{CommonOptions, ProxyNode, ProxyType};
use crate::parser::explodes::vmess::vmess_link;
use crate::utils::join_host_port;

/// VMess node in Clash/mihomo field layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VmessProxy {
    #[serde(flatten)]
    pub common: CommonOptions,
    pub uuid: String,
    #[serde(rename = "alterId", default)]
    pub alter_id: u32,
    #[serde(default = "default_cipher")]
    pub cipher: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub tls: bool,
    #[serde(rename = "skip-cert-verify", default, skip_serializing_if = "is_false")]
    pub skip_cert_verify: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub servername: String,
    #[serde(default = "default_network")]
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
        rename = "http-opts",
        default,
        skip_serializing_if = "HttpOptions::is_empty"
    )]
    pub http_opts: HttpOptions,
    #[serde(rename = "h2-opts", default, skip_serializing_if = "H2Options::is_empty")]
    pub h2_opts: H2Options,
    #[serde(
        rename = "grpc-opts",
        default,
        skip_serializing_if = "GrpcOptions::is_empty"
    )]
    pub grpc_opts: GrpcOptions,
}

impl Default for VmessProxy {
    fn default() -> Self {
        VmessProxy {
            common: CommonOptions::default(),
            uuid: String::new(),
            alter_id: 0,
            cipher: default_cipher(),
            tls: false,
            skip_cert_verify: false,
            servername: String::new(),
            network: default_network(),
            client_fingerprint: String::new(),
            alpn: Vec::new(),
            ws_opts: WsOptions::default(),
            http_opts: HttpOptions::default(),
            h2_opts: H2Options::default(),
            grpc_opts: GrpcOptions::default(),
        }
    }
}

impl ProxyNode for VmessProxy {
    fn proxy_type(&self) -> ProxyType {
        ProxyType::VMess
    }

    fn common(&self) -> &CommonOptions {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonOptions {
        &mut self.common
    }

    fn identifier(&self) -> String {
        join_host_port(&self.common.server, self.common.port) + &self.cipher + &self.uuid
    }

    fn link(&self) -> String {
        vmess_link(self)
    }
}
