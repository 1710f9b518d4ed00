use std::collections::HashMap;

use url::Url;

use crate::models::{CommonOptions, VlessProxy};
use crate::parser::ParseError;
use crate::utils::join_host_port;
use crate::utils::string::{disambiguate_name, strip_brackets};
use crate::utils::url::{url_decode, url_encode};

const SCHEME: &str = "vless";
const PREFIX: &str = "vless://";
const DEFAULT_PORT: u16 = 443;

/// Parse a VLESS link into a proxy
///
/// `vless://uuid@host:port?security=tls|reality&type=ws&sni=..&flow=..#name`
pub fn parse_vless_link(link: &str) -> Result<VlessProxy, ParseError> {
    if !link.starts_with(PREFIX) {
        return Err(ParseError::NotThisScheme(SCHEME));
    }
    let url = Url::parse(link).map_err(|_| ParseError::PayloadParseFailed(SCHEME))?;

    let uuid = url_decode(url.username());
    if uuid.is_empty() {
        return Err(ParseError::MissingField {
            scheme: SCHEME,
            field: "uuid",
        });
    }
    let host = url
        .host_str()
        .map(strip_brackets)
        .filter(|h| !h.is_empty())
        .ok_or(ParseError::MissingField {
            scheme: SCHEME,
            field: "server",
        })?;
    let port = url.port().unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(ParseError::PayloadParseFailed(SCHEME));
    }

    let mut params: HashMap<String, String> = HashMap::new();
    for (key, value) in url.query_pairs() {
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    let param = |key: &str| params.get(key).map(String::as_str).unwrap_or("");

    let security = param("security");
    let network = match param("type") {
        "" => "tcp",
        other => other,
    };

    let remark = url.fragment().map(url_decode).unwrap_or_default();
    let mut proxy = VlessProxy {
        common: CommonOptions {
            name: if remark.is_empty() {
                disambiguate_name(SCHEME)
            } else {
                remark
            },
            server: host.to_string(),
            port,
            ..Default::default()
        },
        uuid,
        flow: param("flow").to_string(),
        tls: matches!(security, "tls" | "reality"),
        servername: param("sni").to_string(),
        skip_cert_verify: matches!(param("allowInsecure"), "1" | "true"),
        network: network.to_string(),
        client_fingerprint: param("fp").to_string(),
        alpn: param("alpn")
            .split(',')
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        ..Default::default()
    };

    if security == "reality" {
        proxy.reality_opts.public_key = param("pbk").to_string();
        proxy.reality_opts.short_id = param("sid").to_string();
    }

    match network {
        "ws" => {
            proxy.ws_opts.path = match param("path") {
                "" => "/".to_string(),
                path => path.to_string(),
            };
            if !param("host").is_empty() {
                proxy
                    .ws_opts
                    .headers
                    .insert("Host".to_string(), param("host").to_string());
            }
        }
        "grpc" => proxy.grpc_opts.service_name = param("serviceName").to_string(),
        _ => {}
    }

    Ok(proxy)
}

/// Render a VLESS node as a `vless://` link
pub fn vless_link(proxy: &VlessProxy) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("encryption", "none");

    let security = if !proxy.reality_opts.is_empty() {
        "reality"
    } else if proxy.tls {
        "tls"
    } else {
        "none"
    };
    query.append_pair("security", security);
    query.append_pair("type", &proxy.network);

    if !proxy.servername.is_empty() {
        query.append_pair("sni", &proxy.servername);
    }
    if !proxy.flow.is_empty() {
        query.append_pair("flow", &proxy.flow);
    }
    if !proxy.client_fingerprint.is_empty() {
        query.append_pair("fp", &proxy.client_fingerprint);
    }
    if !proxy.reality_opts.public_key.is_empty() {
        query.append_pair("pbk", &proxy.reality_opts.public_key);
    }
    if !proxy.reality_opts.short_id.is_empty() {
        query.append_pair("sid", &proxy.reality_opts.short_id);
    }
    if !proxy.alpn.is_empty() {
        query.append_pair("alpn", &proxy.alpn.join(","));
    }
    if proxy.skip_cert_verify {
        query.append_pair("allowInsecure", "1");
    }
    match proxy.network.as_str() {
        "ws" => {
            query.append_pair("path", &proxy.ws_opts.path);
            if let Some(host) = proxy.ws_opts.host() {
                query.append_pair("host", host);
            }
        }
        "grpc" => {
            query.append_pair("serviceName", &proxy.grpc_opts.service_name);
        }
        _ => {}
    }

    let mut link = format!(
        "{}{}@{}?{}",
        PREFIX,
        url_encode(&proxy.uuid),
        join_host_port(&proxy.common.server, proxy.common.port),
        query.finish()
    );
    if !proxy.common.name.is_empty() {
        link.push('#');
        link.push_str(&url_encode(&proxy.common.name));
    }
    link
}
