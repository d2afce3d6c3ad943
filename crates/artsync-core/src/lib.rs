pub mod config;
pub mod logging;

pub mod artifact;
pub mod build_info;
pub mod checksum;
pub mod engine;
pub mod error;
pub mod layout;
pub mod remote;
pub mod store;
