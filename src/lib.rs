pub mod backend;
pub mod browser;
pub mod config;
pub mod fetch;
pub mod output;
pub mod scoring;
pub mod session;
