//! Core data models for the application
//!
//! This module contains the canonical proxy representation every share-link
//! dialect is parsed into, and the deduplicating list the pipeline fills.
//!
//! # Usage
//!
//! ```rust
//! use proxypool::models::{Proxy, ProxyList, ProxyNode};
//! use proxypool::parser::parse_proxy_from_link;
//!
//! let link = "trojan://secret@example.com:443#demo";
//! let proxy: Proxy = parse_proxy_from_link(link).unwrap();
//! assert_eq!(proxy.identifier(), "example.com:443secret");
//!
//! let mut list = ProxyList::new();
//! list.push_unique(proxy.clone());
//! assert!(!list.push_unique(proxy));
//! ```

mod proxy;
mod proxy_list;
pub mod proxy_node;

pub use proxy::*;
pub use proxy_list::ProxyList;
pub use proxy_node::{
    GrpcOptions, H2Options, HttpOptions, RealityOptions, ShadowsocksProxy, ShadowsocksRProxy,
    TrojanProxy, VlessProxy, VmessProxy, WsOptions,
};
