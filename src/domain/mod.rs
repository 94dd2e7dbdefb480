pub mod config;
pub mod entities;
pub mod execution_config;
pub mod outcome;
pub mod services;
pub mod settings;
pub mod value_objects;
