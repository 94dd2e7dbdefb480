pub mod bootstrap;
pub mod errors;
pub mod logging;
