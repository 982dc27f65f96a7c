#![forbid(unsafe_code)]

pub mod agents;
pub mod cli;
pub mod cloud;
pub mod commands;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod project;
pub mod rewrite;
pub mod runner;
pub mod staging;
pub mod utils;
