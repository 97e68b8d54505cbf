// ABOUTME: Library root for stackpack - exposes the packaging and deployment pipeline.
// ABOUTME: The main binary is in main.rs.

pub mod archive;
pub mod aws;
pub mod config;
pub mod deploy;
pub mod error;
pub mod fleet;
pub mod hooks;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod source;
pub mod store;
pub mod types;
