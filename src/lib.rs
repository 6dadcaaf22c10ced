pub mod app;
pub mod client;
pub mod config;
pub mod domain;
pub mod email;
pub mod rate_limit;
pub mod telemetry;
