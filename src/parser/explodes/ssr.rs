use std::collections::HashMap;

use crate::models::{CommonOptions, ShadowsocksRProxy};
use crate::parser::ParseError;
use crate::utils::base64::{base64_decode_lenient, url_safe_base64_encode};
use crate::utils::string::{disambiguate_name, strip_brackets};

const SCHEME: &str = "ssr";
const PREFIX: &str = "ssr://";

/// Parse a ShadowsocksR link into a proxy
///
/// `ssr://base64(server:port:protocol:method:obfs:base64(password)/?obfsparam=..&protoparam=..&remarks=..&group=..)`
/// where every parameter value is itself URL-safe base64.
pub fn parse_ssr_link(link: &str) -> Result<ShadowsocksRProxy, ParseError> {
    let payload = link
        .strip_prefix(PREFIX)
        .ok_or(ParseError::NotThisScheme(SCHEME))?;
    let decoded = base64_decode_lenient(payload).ok_or(ParseError::PayloadParseFailed(SCHEME))?;

    let (main, query) = decoded
        .split_once("/?")
        .or_else(|| decoded.split_once('?'))
        .unwrap_or((decoded.as_str(), ""));

    // Split from the right so bare IPv6 servers keep their colons
    let parts: Vec<&str> = main.trim_end_matches('/').rsplitn(6, ':').collect();
    if parts.len() < 6 {
        return Err(ParseError::PathNotComplete(SCHEME));
    }
    let (password_encoded, obfs, cipher, protocol, port, server) =
        (parts[0], parts[1], parts[2], parts[3], parts[4], parts[5]);

    let server = strip_brackets(server);
    if server.is_empty() {
        return Err(ParseError::MissingField {
            scheme: SCHEME,
            field: "server",
        });
    }
    let port = port
        .parse::<u16>()
        .ok()
        .filter(|p| *p != 0)
        .ok_or(ParseError::PayloadParseFailed(SCHEME))?;
    if password_encoded.is_empty() {
        return Err(ParseError::MissingField {
            scheme: SCHEME,
            field: "password",
        });
    }
    let password = base64_decode_lenient(password_encoded)
        .ok_or(ParseError::PayloadParseFailed(SCHEME))?;

    let mut params: HashMap<String, String> = HashMap::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        let value = base64_decode_lenient(&value).unwrap_or_default();
        params.entry(key.into_owned()).or_insert(value);
    }
    let mut param = |key: &str| params.remove(key).unwrap_or_default();

    let remarks = param("remarks");
    Ok(ShadowsocksRProxy {
        common: CommonOptions {
            name: if remarks.is_empty() {
                disambiguate_name(SCHEME)
            } else {
                remarks
            },
            server: server.to_string(),
            port,
            ..Default::default()
        },
        cipher: cipher.to_string(),
        password,
        protocol: protocol.to_string(),
        obfs: obfs.to_string(),
        protocol_param: param("protoparam"),
        obfs_param: param("obfsparam"),
        group: param("group"),
    })
}

/// Render a ShadowsocksR node as an `ssr://` link
pub fn ssr_link(proxy: &ShadowsocksRProxy) -> String {
    let mut body = format!(
        "{}:{}:{}:{}:{}:{}/?obfsparam={}&protoparam={}",
        proxy.common.server,
        proxy.common.port,
        proxy.protocol,
        proxy.cipher,
        proxy.obfs,
        url_safe_base64_encode(&proxy.password),
        url_safe_base64_encode(&proxy.obfs_param),
        url_safe_base64_encode(&proxy.protocol_param),
    );
    if !proxy.common.name.is_empty() {
        body.push_str("&remarks=");
        body.push_str(&url_safe_base64_encode(&proxy.common.name));
    }
    if !proxy.group.is_empty() {
        body.push_str("&group=");
        body.push_str(&url_safe_base64_encode(&proxy.group));
    }
    format!("{}{}", PREFIX, url_safe_base64_encode(&body))
}
