use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// Ordered maps keep renders byte-identical between calls.

/// Websocket transport options (`ws-opts`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WsOptions {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl WsOptions {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The `Host` header, looked up case-insensitively.
    pub fn host(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("host"))
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }
}

/// HTTP camouflage options (`http-opts`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpOptions {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub method: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, Vec<String>>,
}

impl HttpOptions {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// HTTP/2 transport options (`h2-opts`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct H2Options {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub host: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
}

impl H2Options {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// gRPC transport options (`grpc-opts`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrpcOptions {
    #[serde(
        rename = "grpc-service-name",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub service_name: String,
}

impl GrpcOptions {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// REALITY options (`reality-opts`), vless only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RealityOptions {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub public_key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub short_id: String,
}

impl RealityOptions {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
