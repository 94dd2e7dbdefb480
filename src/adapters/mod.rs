pub mod jito_relay;
pub mod rpc_transport;

pub use jito_relay::JitoBundleRelay;
pub use rpc_transport::RpcTransport;
