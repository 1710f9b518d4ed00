use log::debug;

use super::{ss, ssr, trojan, vless, vmess};
use crate::models::{Proxy, ProxyList};
use crate::parser::ParseError;

type LinkParser = fn(&str) -> Result<Proxy, ParseError>;

/// Tried in order. `ss://` never matches an `ssr://` link since the prefix
/// check includes the slashes.
const PARSERS: &[LinkParser] = &[
    |l| vmess::parse_vmess_link(l).map(Proxy::Vmess),
    |l| ss::parse_ss_link(l).map(Proxy::Shadowsocks),
    |l| ssr::parse_ssr_link(l).map(Proxy::ShadowsocksR),
    |l| trojan::parse_trojan_link(l).map(Proxy::Trojan),
    |l| vless::parse_vless_link(l).map(Proxy::Vless),
];

/// Parse a share link of any supported scheme into a proxy
///
/// Each parser is tried in turn; the first one that recognises the scheme
/// decides the result, so a malformed vmess link reports the vmess error
/// rather than [`ParseError::UnknownScheme`].
pub fn parse_proxy_from_link(link: &str) -> Result<Proxy, ParseError> {
    let link = link.trim();
    for parser in PARSERS {
        match parser(link) {
            Err(ParseError::NotThisScheme(_)) => continue,
            result => return result,
        }
    }
    Err(ParseError::UnknownScheme)
}

/// Parse every whitespace-separated field of `text` as a link
///
/// Fields that fail to parse are dropped; duplicates are merged.
pub fn parse_proxies_from_text(text: &str) -> ProxyList {
    let mut list = ProxyList::new();
    for field in text.split_whitespace() {
        match parse_proxy_from_link(field) {
            Ok(proxy) => {
                list.push_unique(proxy);
            }
            Err(e) if e.is_scheme_mismatch() => {}
            Err(e) => debug!("Dropping link {}: {}", field, e),
        }
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProxyNode, ProxyType};

    #[test]
    fn test_dispatch_by_scheme() {
        let cases = [
            ("ss://YWVzLTI1Ni1nY206cHc=@example.com:8388", ProxyType::Shadowsocks),
            ("  trojan://pw@example.com:443  ", ProxyType::Trojan),
            ("vless://u@example.com:443?type=tcp", ProxyType::Vless),
        ];
        for (link, expected) in cases {
            let proxy = parse_proxy_from_link(link).unwrap();
            assert_eq!(proxy.proxy_type(), expected, "{}", link);
        }
    }

    #[test]
    fn test_dispatch_errors() {
        assert_eq!(
            parse_proxy_from_link("http://example.com"),
            Err(ParseError::UnknownScheme)
        );
        assert_eq!(parse_proxy_from_link(""), Err(ParseError::UnknownScheme));
        assert_eq!(
            parse_proxy_from_link("vmess://!!!"),
            Err(ParseError::PayloadParseFailed("vmess"))
        );
    }

    #[test]
    fn test_parse_proxies_from_text() {
        let text = "trojan://pw@a.com:443#one\n\
                    garbage trojan://pw@a.com:443#dup\n\
                    ss://YWVzLTI1Ni1nY206cHc=@b.com:8388 vmess://broken";
        let list = parse_proxies_from_text(text);

        assert_eq!(list.len(), 2);
        assert_eq!(list.as_slice()[0].name(), "one");
    }
}
