pub mod common;
pub mod grep;
pub mod ss;
pub mod ssr;
pub mod trojan;
pub mod vless;
pub mod vmess;
