//! String utility functions for host and name handling

/// Combine a host and port into `host:port`, bracketing IPv6 literals.
///
/// # Examples
/// ```
/// use proxypool::utils::string::join_host_port;
///
/// assert_eq!(join_host_port("1.2.3.4", 443), "1.2.3.4:443");
/// assert_eq!(join_host_port("::1", 8080), "[::1]:8080");
/// ```
pub fn join_host_port(host: &str, port: u16) -> String {
    if host.contains(':') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}

/// Split `host:port`, accepting bracketed IPv6 hosts.
///
/// Returns `None` when there is no port separator. The port is returned raw so
/// callers can apply their own defaulting rules.
pub fn split_host_port(s: &str) -> Option<(&str, &str)> {
    let (host, port) = s.rsplit_once(':')?;
    Some((strip_brackets(host), port))
}

/// Remove the brackets `url` keeps around IPv6 hosts.
pub fn strip_brackets(host: &str) -> &str {
    host.strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host)
}

/// Build a display name for a node whose source gave it no stable one.
///
/// Many publishers reuse one remark across all their nodes, so a random
/// suffix keeps names distinct. Deduplication never looks at names.
pub fn disambiguate_name(prefix: &str) -> String {
    format!("{}_{}", prefix, fastrand::u32(..))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_host_port() {
        assert_eq!(split_host_port("example.com:443"), Some(("example.com", "443")));
        assert_eq!(split_host_port("[2001:db8::1]:80"), Some(("2001:db8::1", "80")));
        assert_eq!(split_host_port("example.com"), None);
    }

    #[test]
    fn test_join_split_ipv6() {
        let joined = join_host_port("2001:db8::1", 80);
        assert_eq!(split_host_port(&joined), Some(("2001:db8::1", "80")));
    }

    #[test]
    fn test_disambiguate_name() {
        let name = disambiguate_name("test");
        assert!(name.starts_with("test_"));
        assert!(name["test_".len()..].parse::<u32>().is_ok());
    }
}
