pub mod getter;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod settings;
pub mod store;
pub mod utils;

// Re-export the main proxy types for easier access
pub use models::{Proxy, ProxyList, ProxyNode, ProxyType};

pub use getter::{Getter, GetterError, GetterRegistry};
pub use parser::{parse_proxy_from_link, ParseError};
pub use pipeline::Pipeline;
pub use settings::Settings;
pub use store::{JsonFileStore, ProxyPool, ProxyStore};
