pub mod base64;
pub mod http;
pub mod string;
pub mod url;

// Re-export common utilities
pub use http::{web_get_async, FetchConfig};
pub use string::join_host_port;
