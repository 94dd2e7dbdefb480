pub mod relay;
pub mod transport;
