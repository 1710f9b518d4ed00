use serde::{Deserialize, Serialize};

use super::transport::{GrpcOptions, RealityOptions, WsOptions};
use super::{default_network, is_false};
use crate::models::{CommonOptions, ProxyNode, ProxyType};
use crate::parser::explodes::vless::vless_link;
use crate::utils::join_host_port;

/// VLESS node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VlessProxy {
    #[serde(flatten)]
    pub common: CommonOptions,
    pub uuid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub flow: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub tls: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub servername: String,
    #[serde(rename = "skip-cert-verify", default, skip_serializing_if = "is_false")]
    pub skip_cert_verify: bool,
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
    #[serde(
        rename = "reality-opts",
        default,
        skip_serializing_if = "RealityOptions::is_empty"
    )]
    pub reality_opts: RealityOptions,
    #[serde(rename = "ws-opts", default, skip_serializing_if = "WsOptions::is_empty")]
    pub ws_opts: WsOptions,
    #[serde(
        rename = "grpc-opts",
        default,
        skip_serializing_if = "GrpcOptions::is_empty"
    )]
    pub grpc_opts: GrpcOptions,
}

impl Default for VlessProxy {
    fn default() -> Self {
        VlessProxy {
            common: CommonOptions::default(),
            uuid: String::new(),
            flow: String::new(),
            tls: false,
            servername: String::new(),
            skip_cert_verify: false,
            network: default_network(),
            client_fingerprint: String::new(),
            alpn: Vec::new(),
            reality_opts: RealityOptions::default(),
            ws_opts: WsOptions::default(),
            grpc_opts: GrpcOptions::default(),
        }
    }
}

impl ProxyNode for VlessProxy {
    fn proxy_type(&self) -> ProxyType {
        ProxyType::Vless
    }

    fn common(&self) -> &CommonOptions {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonOptions {
        &mut self.common
    }

    fn identifier(&self) -> String {
        join_host_port(&self.common.server, self.common.port) + &self.uuid
    }

    fn link(&self) -> String {
        vless_link(self)
    }
}
