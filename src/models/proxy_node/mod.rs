mod shadowsocks;
mod shadowsocksr;
pub mod transport;
mod trojan;
mod vless;
mod vmess;

pub use shadowsocks::ShadowsocksProxy;
pub use shadowsocksr::ShadowsocksRProxy;
pub use transport::{GrpcOptions, H2Options, HttpOptions, RealityOptions, WsOptions};
pub use trojan::TrojanProxy;
pub use vless::VlessProxy;
pub use vmess::VmessProxy;

pub(crate) fn is_false(b: &bool) -> bool {
    !*b
}

pub(crate) fn default_cipher() -> String {
    "auto".to_string()
}

pub(crate) fn default_network() -> String {
    "tcp".to_string()
}
