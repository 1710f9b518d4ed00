use std::collections::HashMap;

use url::Url;

use crate::models::{CommonOptions, TrojanProxy};
use crate::parser::ParseError;
use crate::utils::join_host_port;
use crate::utils::string::{disambiguate_name, strip_brackets};
use crate::utils::url::{url_decode, url_encode};

const SCHEME: &str = "trojan";
const PREFIX: &str = "trojan://";
const DEFAULT_PORT: u16 = 443;

/// Parse a Trojan link into a proxy
pub fn parse_trojan_link(link: &str) -> Result<TrojanProxy, ParseError> {
    if !link.starts_with(PREFIX) {
        return Err(ParseError::NotThisScheme(SCHEME));
    }
    let url = Url::parse(link).map_err(|_| ParseError::PayloadParseFailed(SCHEME))?;

    let password = url_decode(url.username());
    if password.is_empty() {
        return Err(ParseError::MissingField {
            scheme: SCHEME,
            field: "password",
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

    // Extract SNI - check for both "sni" and "peer" parameters
    let sni = match param("sni") {
        "" => param("peer"),
        sni => sni,
    };

    let remark = url.fragment().map(url_decode).unwrap_or_default();
    let mut proxy = TrojanProxy {
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
        password,
        sni: sni.to_string(),
        skip_cert_verify: matches!(param("allowInsecure"), "1" | "true"),
        client_fingerprint: param("fp").to_string(),
        alpn: param("alpn")
            .split(',')
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        ..Default::default()
    };

    // Handle WebSocket support, old clients use ws=1 and wspath
    if param("type") == "ws" || param("ws") == "1" {
        proxy.network = "ws".to_string();
        let path = match (param("path"), param("wspath")) {
            ("", "") => "/",
            ("", wspath) => wspath,
            (path, _) => path,
        };
        proxy.ws_opts.path = path.to_string();
        if !param("host").is_empty() {
            proxy
                .ws_opts
                .headers
                .insert("Host".to_string(), param("host").to_string());
        }
    } else if param("type") == "grpc" {
        proxy.network = "grpc".to_string();
        proxy.grpc_opts.service_name = param("serviceName").to_string();
    }

    Ok(proxy)
}

/// Render a Trojan node as a `trojan://` link
pub fn trojan_link(proxy: &TrojanProxy) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    if !proxy.sni.is_empty() {
        query.append_pair("sni", &proxy.sni);
    }
    if proxy.skip_cert_verify {
        query.append_pair("allowInsecure", "1");
    }
    match proxy.network.as_str() {
        "ws" => {
            query.append_pair("type", "ws");
            query.append_pair("path", &proxy.ws_opts.path);
            if let Some(host) = proxy.ws_opts.host() {
                query.append_pair("host", host);
            }
        }
        "grpc" => {
            query.append_pair("type", "grpc");
            query.append_pair("serviceName", &proxy.grpc_opts.service_name);
        }
        _ => {}
    }
    if !proxy.alpn.is_empty() {
        query.append_pair("alpn", &proxy.alpn.join(","));
    }
    if !proxy.client_fingerprint.is_empty() {
        query.append_pair("fp", &proxy.client_fingerprint);
    }
    let query = query.finish();

    let mut link = format!(
        "{}{}@{}",
        PREFIX,
        url_encode(&proxy.password),
        join_host_port(&proxy.common.server, proxy.common.port)
    );
    if !query.is_empty() {
        link.push('?');
        link.push_str(&query);
    }
    if !proxy.common.name.is_empty() {
        link.push('#');
        link.push_str(&url_encode(&proxy.common.name));
    }
    link
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProxyNode;

    #[test]
    fn test_parse_trojan() {
        let proxy = parse_trojan_link(
            "trojan://secret@example.com:8443?sni=sni.example.com&allowInsecure=1#HK%2001",
        )
        .unwrap();

        assert_eq!(proxy.common.server, "example.com");
        assert_eq!(proxy.common.port, 8443);
        assert_eq!(proxy.password, "secret");
        assert_eq!(proxy.sni, "sni.example.com");
        assert!(proxy.skip_cert_verify);
        assert_eq!(proxy.common.name, "HK 01");
        assert!(proxy.network.is_empty());
    }

    #[test]
    fn test_parse_trojan_defaults() {
        let proxy = parse_trojan_link("trojan://p%40ss@example.com?peer=peer.com").unwrap();
        assert_eq!(proxy.common.port, 443);
        assert_eq!(proxy.password, "p@ss");
        assert_eq!(proxy.sni, "peer.com");
        assert!(proxy.common.name.starts_with("trojan_"));
    }

    #[test]
    fn test_parse_trojan_websocket() {
        let proxy =
            parse_trojan_link("trojan://pw@example.com:443?type=ws&host=cdn.com#ws").unwrap();
        assert_eq!(proxy.network, "ws");
        assert_eq!(proxy.ws_opts.path, "/");
        assert_eq!(proxy.ws_opts.host(), Some("cdn.com"));

        let legacy =
            parse_trojan_link("trojan://pw@example.com:443?ws=1&wspath=%2Fws#ws").unwrap();
        assert_eq!(legacy.network, "ws");
        assert_eq!(legacy.ws_opts.path, "/ws");
    }

    #[test]
    fn test_parse_trojan_errors() {
        assert_eq!(
            parse_trojan_link("vless://u@a.com:443"),
            Err(ParseError::NotThisScheme(SCHEME))
        );
        assert_eq!(
            parse_trojan_link("trojan://a.com:443"),
            Err(ParseError::MissingField {
                scheme: SCHEME,
                field: "password"
            })
        );
        assert_eq!(
            parse_trojan_link("trojan://pw@a.com:notaport"),
            Err(ParseError::PayloadParseFailed(SCHEME))
        );
    }

    #[test]
    fn test_trojan_link_round_trip() {
        let proxy = parse_trojan_link(
            "trojan://pw@[2001:db8::1]:443?type=grpc&serviceName=svc&alpn=h2,http%2F1.1&fp=chrome#v6",
        )
        .unwrap();
        assert_eq!(proxy.common.server, "2001:db8::1");
        assert_eq!(proxy.grpc_opts.service_name, "svc");
        assert_eq!(proxy.alpn, vec!["h2", "http/1.1"]);

        let reparsed = parse_trojan_link(&proxy.link()).unwrap();
        assert_eq!(reparsed, proxy);
        assert_eq!(reparsed.identifier(), "[2001:db8::1]:443pw");
    }
}
