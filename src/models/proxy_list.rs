use std::collections::HashSet;

use super::{Proxy, ProxyNode};

/// Ordered collection of proxies, unique by [`ProxyNode::identifier`].
///
/// Insertion order is discovery order and carries no meaning for consumers.
/// The seen-set makes every append linear in the number of incoming nodes.
#[derive(Debug, Clone, Default)]
pub struct ProxyList {
    proxies: Vec<Proxy>,
    seen: HashSet<String>,
}

impl ProxyList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `proxy` unless a node with the same identifier is already present.
    ///
    /// Returns `true` if the proxy was added.
    pub fn push_unique(&mut self, proxy: Proxy) -> bool {
        if self.seen.insert(proxy.identifier()) {
            self.proxies.push(proxy);
            true
        } else {
            false
        }
    }

    /// Append every node of `other` whose identifier is not yet present.
    /// The first occurrence wins.
    pub fn uniq_append<I>(&mut self, other: I) -> &mut Self
    where
        I: IntoIterator<Item = Proxy>,
    {
        for proxy in other {
            self.push_unique(proxy);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.seen.contains(identifier)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Proxy> {
        self.proxies.iter()
    }

    /// Mutable access for enrichers. Only name, country and usable may be
    /// changed through it; identity fields are fixed once a node is listed.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Proxy> {
        self.proxies.iter_mut()
    }

    pub fn as_slice(&self) -> &[Proxy] {
        &self.proxies
    }

    pub fn into_vec(self) -> Vec<Proxy> {
        self.proxies
    }

    /// One share link per line
    pub fn to_links(&self) -> String {
        let mut out = String::new();
        for proxy in &self.proxies {
            out.push_str(&proxy.link());
            out.push('\n');
        }
        out
    }

    /// A Clash `proxies:` document with one flow-style record per line
    pub fn to_clash_yaml(&self) -> String {
        let mut out = String::from("proxies:\n");
        for proxy in &self.proxies {
            out.push_str("  ");
            out.push_str(&proxy.to_clash());
            out.push('\n');
        }
        out
    }
}

impl FromIterator<Proxy> for ProxyList {
    fn from_iter<T: IntoIterator<Item = Proxy>>(iter: T) -> Self {
        let mut list = ProxyList::new();
        list.uniq_append(iter);
        list
    }
}

impl IntoIterator for ProxyList {
    type Item = Proxy;
    type IntoIter = std::vec::IntoIter<Proxy>;

    fn into_iter(self) -> Self::IntoIter {
        self.proxies.into_iter()
    }
}

impl<'a> IntoIterator for &'a ProxyList {
    type Item = &'a Proxy;
    type IntoIter = std::slice::Iter<'a, Proxy>;

    fn into_iter(self) -> Self::IntoIter {
        self.proxies.iter()
    }
}

impl Extend<Proxy> for ProxyList {
    fn extend<T: IntoIterator<Item = Proxy>>(&mut self, iter: T) {
        self.uniq_append(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CommonOptions, TrojanProxy, VmessProxy};

    fn trojan(server: &str, password: &str, name: &str) -> Proxy {
        Proxy::Trojan(TrojanProxy {
            common: CommonOptions {
                name: name.to_string(),
                server: server.to_string(),
                port: 443,
                ..Default::default()
            },
            password: password.to_string(),
            ..Default::default()
        })
    }

    fn vmess(server: &str, uuid: &str) -> Proxy {
        Proxy::Vmess(VmessProxy {
            common: CommonOptions {
                name: "v".to_string(),
                server: server.to_string(),
                port: 443,
                ..Default::default()
            },
            uuid: uuid.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_first_occurrence_wins() {
        let mut list = ProxyList::new();
        assert!(list.push_unique(trojan("a.com", "pw", "first")));
        assert!(!list.push_unique(trojan("a.com", "pw", "second")));

        assert_eq!(list.len(), 1);
        assert_eq!(list.iter().next().unwrap().name(), "first");
    }

    #[test]
    fn test_uniq_append_merges_and_dedups() {
        let mut list: ProxyList = vec![trojan("a.com", "pw", "a"), vmess("b.com", "u1")]
            .into_iter()
            .collect();
        list.uniq_append(vec![
            vmess("b.com", "u1"),
            vmess("b.com", "u2"),
            vmess("b.com", "u2"),
        ]);

        assert_eq!(list.len(), 3);
        let ids: HashSet<String> = list.iter().map(|p| p.identifier()).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_uniq_append_sublist_is_idempotent() {
        let mut list: ProxyList = (0..50)
            .map(|i| trojan(&format!("host{}.com", i), "pw", "n"))
            .collect();
        let before: Vec<String> = list.iter().map(|p| p.identifier()).collect();

        let sublist: Vec<Proxy> = list.iter().step_by(3).cloned().collect();
        list.uniq_append(sublist);

        let after: Vec<String> = list.iter().map(|p| p.identifier()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_to_clash_yaml_is_valid_yaml() {
        let list: ProxyList = vec![trojan("a.com", "pw", "a"), vmess("b.com", "u1")]
            .into_iter()
            .collect();
        let doc: serde_yaml::Value = serde_yaml::from_str(&list.to_clash_yaml()).unwrap();
        assert_eq!(doc["proxies"].as_sequence().unwrap().len(), 2);
    }
}
