pub mod agents;
pub mod build;
pub mod config;
pub mod deploy;
