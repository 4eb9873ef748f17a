// Library for the binary and for tests

pub mod cgi;
pub mod config;
pub mod error;
pub mod host;
pub mod metrics_repo;
pub mod models;
pub mod routes;
pub mod version;
