//! Proxy model definitions
//!
//! Contains the canonical proxy entity every share-link dialect is parsed into,
//! and the capability contract each protocol variant implements.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::proxy_node::{
    is_false, ShadowsocksProxy, ShadowsocksRProxy, TrojanProxy, VlessProxy, VmessProxy,
};

/// Represents the type of a proxy.
/// This is the canonical enum used for proxy type identification across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProxyType {
    #[serde(rename = "ss")]
    Shadowsocks,
    #[serde(rename = "ssr")]
    ShadowsocksR,
    #[serde(rename = "vmess")]
    VMess,
    #[serde(rename = "trojan")]
    Trojan,
    #[serde(rename = "vless")]
    Vless,
}

impl ProxyType {
    /// The type name used in canonical-config records, which is also the link scheme.
    pub fn as_str(self) -> &'static str {
        match self {
            ProxyType::Shadowsocks => "ss",
            ProxyType::ShadowsocksR => "ssr",
            ProxyType::VMess => "vmess",
            ProxyType::Trojan => "trojan",
            ProxyType::Vless => "vless",
        }
    }
}

impl fmt::Display for ProxyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields shared by every protocol variant.
///
/// `name`, `country` and `usable` are the only fields enrichers may change
/// after parsing; everything that feeds the identifier stays fixed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommonOptions {
    #[serde(default)]
    pub name: String,
    pub server: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "is_false")]
    pub udp: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub country: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub usable: bool,
}

/// Protocol-independent projection used for display and listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseInfo {
    pub name: String,
    pub server: String,
    #[serde(rename = "type")]
    pub proxy_type: ProxyType,
    pub country: String,
    pub port: u16,
    pub udp: bool,
    pub usable: bool,
}

/// Capability set implemented by every protocol variant.
pub trait ProxyNode {
    fn proxy_type(&self) -> ProxyType;

    fn common(&self) -> &CommonOptions;

    fn common_mut(&mut self) -> &mut CommonOptions;

    /// Deduplication key built from the network and auth identity fields only.
    fn identifier(&self) -> String;

    /// Render the node as a share link.
    fn link(&self) -> String;

    fn set_name(&mut self, name: &str) {
        self.common_mut().name = name.to_string();
    }

    fn add_to_name(&mut self, suffix: &str) {
        self.common_mut().name.push_str(suffix);
    }

    fn set_country(&mut self, country: &str) {
        self.common_mut().country = country.to_string();
    }

    fn set_usable(&mut self, usable: bool) {
        self.common_mut().usable = usable;
    }

    fn base_info(&self) -> BaseInfo {
        let common = self.common();
        BaseInfo {
            name: common.name.clone(),
            server: common.server.clone(),
            proxy_type: self.proxy_type(),
            country: if common.country.is_empty() {
                "unknown".to_string()
            } else {
                common.country.clone()
            },
            port: common.port,
            udp: common.udp,
            usable: common.usable,
        }
    }
}

/// A parsed proxy node.
///
/// Serializes to (and deserializes from) the Clash/mihomo proxy record, tagged
/// by `type`. Cloning yields an independent copy, so the same node can sit in
/// several lists whose usable/country flags diverge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Proxy {
    #[serde(rename = "vmess")]
    Vmess(VmessProxy),
    #[serde(rename = "ss")]
    Shadowsocks(ShadowsocksProxy),
    #[serde(rename = "ssr")]
    ShadowsocksR(ShadowsocksRProxy),
    #[serde(rename = "trojan")]
    Trojan(TrojanProxy),
    #[serde(rename = "vless")]
    Vless(VlessProxy),
}

impl Proxy {
    fn node(&self) -> &dyn ProxyNode {
        match self {
            Proxy::Vmess(p) => p,
            Proxy::Shadowsocks(p) => p,
            Proxy::ShadowsocksR(p) => p,
            Proxy::Trojan(p) => p,
            Proxy::Vless(p) => p,
        }
    }

    fn node_mut(&mut self) -> &mut dyn ProxyNode {
        match self {
            Proxy::Vmess(p) => p,
            Proxy::Shadowsocks(p) => p,
            Proxy::ShadowsocksR(p) => p,
            Proxy::Trojan(p) => p,
            Proxy::Vless(p) => p,
        }
    }

    pub fn name(&self) -> &str {
        &self.common().name
    }

    pub fn server(&self) -> &str {
        &self.common().server
    }

    pub fn port(&self) -> u16 {
        self.common().port
    }

    /// Canonical-config render: one Clash proxy list entry on a single line.
    pub fn to_clash(&self) -> String {
        format!("- {}", self)
    }
}

impl ProxyNode for Proxy {
    fn proxy_type(&self) -> ProxyType {
        self.node().proxy_type()
    }

    fn common(&self) -> &CommonOptions {
        self.node().common()
    }

    fn common_mut(&mut self) -> &mut CommonOptions {
        self.node_mut().common_mut()
    }

    fn identifier(&self) -> String {
        self.node().identifier()
    }

    fn link(&self) -> String {
        self.node().link()
    }
}

/// The bare JSON record, as consumed by the proxy engine.
impl fmt::Display for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&record)
    }
}

impl From<VmessProxy> for Proxy {
    fn from(p: VmessProxy) -> Self {
        Proxy::Vmess(p)
    }
}

impl From<ShadowsocksProxy> for Proxy {
    fn from(p: ShadowsocksProxy) -> Self {
        Proxy::Shadowsocks(p)
    }
}

impl From<ShadowsocksRProxy> for Proxy {
    fn from(p: ShadowsocksRProxy) -> Self {
        Proxy::ShadowsocksR(p)
    }
}

impl From<TrojanProxy> for Proxy {
    fn from(p: TrojanProxy) -> Self {
        Proxy::Trojan(p)
    }
}

impl From<VlessProxy> for Proxy {
    fn from(p: VlessProxy) -> Self {
        Proxy::Vless(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Proxy {
        Proxy::Trojan(TrojanProxy {
            common: CommonOptions {
                name: "node".to_string(),
                server: "example.com".to_string(),
                port: 443,
                ..Default::default()
            },
            password: "secret".to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_enrichers_do_not_touch_identifier() {
        let mut proxy = sample();
        let id = proxy.identifier();

        proxy.set_name("renamed");
        proxy.add_to_name("_HK");
        proxy.set_country("HK");
        proxy.set_usable(true);

        assert_eq!(proxy.name(), "renamed_HK");
        assert_eq!(proxy.identifier(), id);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = sample();
        let mut copy = original.clone();
        copy.set_usable(true);
        copy.set_country("JP");

        assert!(!original.common().usable);
        assert!(original.common().country.is_empty());
        assert!(copy.common().usable);
    }

    #[test]
    fn test_base_info() {
        let info = sample().base_info();
        assert_eq!(info.proxy_type, ProxyType::Trojan);
        assert_eq!(info.country, "unknown");
        assert_eq!(info.server, "example.com");
        assert!(!info.usable);
    }

    #[test]
    fn test_to_clash_is_tagged_single_line() {
        let rendered = sample().to_clash();
        assert!(rendered.starts_with("- {\"type\":\"trojan\""));
        assert!(!rendered.contains('\n'));
        assert_eq!(rendered, sample().to_clash());
    }

    #[test]
    fn test_deserialize_clash_record() {
        let yaml = "type: trojan\nname: t1\nserver: 1.1.1.1\nport: 8443\npassword: pw\nsni: a.com\n";
        let proxy: Proxy = serde_yaml::from_str(yaml).unwrap();
        match &proxy {
            Proxy::Trojan(t) => {
                assert_eq!(t.password, "pw");
                assert_eq!(t.sni, "a.com");
            }
            other => panic!("unexpected variant {:?}", other),
        }
        assert_eq!(proxy.port(), 8443);
    }
}
