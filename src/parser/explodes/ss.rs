use std::collections::BTreeMap;

use serde_json::Value;

use crate::models::{CommonOptions, ShadowsocksProxy};
use crate::parser::ParseError;
use crate::utils::base64::{base64_decode_lenient, url_safe_base64_encode};
use crate::utils::join_host_port;
use crate::utils::string::{disambiguate_name, split_host_port};
use crate::utils::url::{url_decode, url_encode};

const SCHEME: &str = "ss";
const PREFIX: &str = "ss://";

/// SIP003 option keys of simple-obfs and their Clash names
const OBFS_OPTION_KEYS: &[(&str, &str)] = &[("obfs", "mode"), ("obfs-host", "host")];

/// Parse a Shadowsocks link into a proxy
///
/// Accepts SIP002 (`ss://base64(method:password)@server:port/?plugin=..#name`)
/// and the legacy form (`ss://base64(method:password@server:port)#name`).
pub fn parse_ss_link(link: &str) -> Result<ShadowsocksProxy, ParseError> {
    let content = link
        .strip_prefix(PREFIX)
        .ok_or(ParseError::NotThisScheme(SCHEME))?;

    // Extract fragment (remark) if present
    let (content, remark) = match content.split_once('#') {
        Some((content, fragment)) => (content, url_decode(fragment)),
        None => (content, String::new()),
    };

    let content = content.replace("/?", "?");
    let (main, query) = content.split_once('?').unwrap_or((content.as_str(), ""));
    let main = main.trim_end_matches('/');

    let (secret, server_port) = match main.rsplit_once('@') {
        Some((userinfo, server_port)) => {
            // SIP002 userinfo is base64, but AEAD-2022 links publish it percent-encoded
            let userinfo = url_decode(userinfo);
            let secret = match base64_decode_lenient(&userinfo) {
                Some(decoded) if decoded.contains(':') => decoded,
                _ => userinfo,
            };
            (secret, server_port.to_string())
        }
        None => {
            let decoded =
                base64_decode_lenient(main).ok_or(ParseError::PayloadParseFailed(SCHEME))?;
            let (secret, server_port) = decoded
                .rsplit_once('@')
                .ok_or(ParseError::PayloadParseFailed(SCHEME))?;
            (secret.to_string(), server_port.to_string())
        }
    };

    let (cipher, password) = secret
        .split_once(':')
        .ok_or(ParseError::PayloadParseFailed(SCHEME))?;
    let (server, port) =
        split_host_port(&server_port).ok_or(ParseError::PathNotComplete(SCHEME))?;
    let port = port
        .parse::<u16>()
        .ok()
        .filter(|p| *p != 0)
        .ok_or(ParseError::PayloadParseFailed(SCHEME))?;

    if server.is_empty() {
        return Err(ParseError::MissingField {
            scheme: SCHEME,
            field: "server",
        });
    }
    if cipher.is_empty() {
        return Err(ParseError::MissingField {
            scheme: SCHEME,
            field: "cipher",
        });
    }

    let mut plugin = String::new();
    let mut plugin_opts = BTreeMap::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if key == "plugin" && plugin.is_empty() {
            (plugin, plugin_opts) = plugin_from_sip003(&value);
        }
    }

    Ok(ShadowsocksProxy {
        common: CommonOptions {
            name: if remark.is_empty() {
                disambiguate_name(SCHEME)
            } else {
                remark
            },
            server: server.to_string(),
            port,
            ..Default::default()
        },
        cipher: cipher.to_string(),
        password: password.to_string(),
        plugin,
        plugin_opts,
    })
}

/// Split a SIP003 plugin string (`name;key=value;flag`) into Clash naming
fn plugin_from_sip003(plugin: &str) -> (String, BTreeMap<String, Value>) {
    let mut items = plugin.split(';').map(str::trim).filter(|s| !s.is_empty());
    let name = items.next().unwrap_or_default();

    let (plugin, key_map): (&str, &[(&str, &str)]) = match name {
        "obfs-local" | "simple-obfs" => ("obfs", OBFS_OPTION_KEYS),
        other => (other, &[]),
    };

    let mut opts = BTreeMap::new();
    for item in items {
        let (key, value) = match item.split_once('=') {
            Some((k, v)) => (k, Value::String(v.to_string())),
            None => (item, Value::Bool(true)),
        };
        let key = key_map
            .iter()
            .find(|(sip003, _)| *sip003 == key)
            .map_or(key, |(_, clash)| *clash);
        opts.insert(key.to_string(), value);
    }

    (plugin.to_string(), opts)
}

fn plugin_to_sip003(plugin: &str, opts: &BTreeMap<String, Value>) -> String {
    let (name, key_map): (&str, &[(&str, &str)]) = match plugin {
        "obfs" => ("obfs-local", OBFS_OPTION_KEYS),
        other => (other, &[]),
    };

    let mut out = name.to_string();
    for (key, value) in opts {
        let key = key_map
            .iter()
            .find(|(_, clash)| *clash == key.as_str())
            .map_or(key.as_str(), |(sip003, _)| *sip003);
        match value {
            Value::Bool(true) => {
                out.push(';');
                out.push_str(key);
            }
            Value::Bool(false) | Value::Null => {}
            Value::String(s) => out.push_str(&format!(";{}={}", key, s)),
            other => out.push_str(&format!(";{}={}", key, other)),
        }
    }
    out
}

/// Render a Shadowsocks node as a SIP002 link
pub fn ss_link(proxy: &ShadowsocksProxy) -> String {
    let userinfo = url_safe_base64_encode(&format!("{}:{}", proxy.cipher, proxy.password));
    let mut link = format!(
        "{}{}@{}",
        PREFIX,
        userinfo,
        join_host_port(&proxy.common.server, proxy.common.port)
    );

    if !proxy.plugin.is_empty() {
        link.push_str("/?plugin=");
        link.push_str(&url_encode(&plugin_to_sip003(
            &proxy.plugin,
            &proxy.plugin_opts,
        )));
    }
    if !proxy.common.name.is_empty() {
        link.push('#');
        link.push_str(&url_encode(&proxy.common.name));
    }
    link
}
